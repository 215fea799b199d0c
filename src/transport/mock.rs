use std::collections::VecDeque;

use crate::transport::Transport;
use crate::Error;

/// An in-memory [`Transport`] for tests and dry runs.
///
/// Bytes queued with [`MockTransport::queue`] are handed out to reads in order. A read that
/// asks for more bytes than are queued drains the queue and fails with [`Error::Timeout`].
#[derive(Debug, Default)]
pub struct MockTransport {
    written: Vec<u8>,
    pending: VecDeque<u8>,
}

impl MockTransport {
    /// Creates an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues bytes to be returned by later reads.
    pub fn queue(&mut self, bytes: &[u8]) -> &mut Self {
        self.pending.extend(bytes);
        self
    }

    /// Everything written so far.
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Takes everything written so far, leaving the record empty.
    pub fn take_written(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.written)
    }

    /// Number of queued bytes not read yet.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl Transport for MockTransport {
    fn transmit(&mut self, bytes: &[u8]) -> Result<(), Error> {
        log::trace!("mock tx {}", crate::protocol::dump(bytes));
        self.written.extend_from_slice(bytes);
        Ok(())
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        let available = self.pending.len().min(buf.len());
        for (slot, byte) in buf.iter_mut().zip(self.pending.drain(..available)) {
            *slot = byte;
        }
        if available < buf.len() {
            return Err(Error::Timeout {
                expected: buf.len(),
                received: available,
            });
        }
        Ok(())
    }

    fn discard(&mut self) -> Result<(), Error> {
        self.pending.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn reads_queued_bytes_in_order() {
        let mut mock = MockTransport::new();
        mock.queue(&[1, 2]).queue(&[3]);
        let mut buf = [0u8; 2];
        mock.receive(&mut buf).unwrap();
        assert_eq!(buf, [1, 2]);
        assert_eq!(mock.pending(), 1);
    }

    #[test]
    fn short_read_times_out() {
        let mut mock = MockTransport::new();
        mock.queue(&[1]);
        let mut buf = [0u8; 3];
        assert!(matches!(
            mock.receive(&mut buf),
            Err(Error::Timeout {
                expected: 3,
                received: 1
            })
        ));
        assert_eq!(mock.pending(), 0);
    }

    #[test]
    fn records_writes() {
        let mut mock = MockTransport::new();
        mock.transmit(&[0x50, 0x01]).unwrap();
        mock.transmit(&[0x11]).unwrap();
        assert_eq!(mock.written(), &[0x50, 0x01, 0x11]);
        assert_eq!(mock.take_written(), vec![0x50, 0x01, 0x11]);
        assert!(mock.written().is_empty());
    }
}
