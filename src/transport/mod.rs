//! A trait for writing and reading raw bytes over the link to the mount.

mod mock;
#[cfg(feature = "serial2")]
mod serial;

pub use mock::MockTransport;
#[cfg(feature = "serial2")]
pub use serial::{SerialTransport, BAUD_RATE, DEFAULT_TIMEOUT};

use crate::Error;

/// A half-duplex byte channel.
///
/// Implementations report a read that does not complete in time as [`Error::Timeout`].
pub trait Transport {
    /// Writes all of `bytes`.
    fn transmit(&mut self, bytes: &[u8]) -> Result<(), Error>;

    /// Fills `buf` completely, or fails with [`Error::Timeout`].
    fn receive(&mut self, buf: &mut [u8]) -> Result<(), Error>;

    /// Drops any bytes that have arrived but were not read yet.
    fn discard(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// Releases the underlying device.
    fn close(self) -> Result<(), Error>
    where
        Self: Sized,
    {
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn transmit(&mut self, bytes: &[u8]) -> Result<(), Error> {
        (**self).transmit(bytes)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        (**self).receive(buf)
    }

    fn discard(&mut self) -> Result<(), Error> {
        (**self).discard()
    }
}
