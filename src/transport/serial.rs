use std::io::{self, ErrorKind};
use std::path::Path;
use std::time::{Duration, Instant};

use serial2::{CharSize, FlowControl, Parity, SerialPort, Settings, StopBits};

use crate::transport::Transport;
use crate::Error;

/// Line speed of the hand controller's serial port.
pub const BAUD_RATE: u32 = 9600;
/// Hand controller turnaround used for both read and write timeouts.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3500);

/// A [`Transport`] backed by a serial port, configured 9600 8N1 without flow control.
pub struct SerialTransport {
    port: SerialPort,
    read_timeout: Duration,
}

impl SerialTransport {
    /// Opens the serial port at `path` with the default 3.5 s timeouts.
    ///
    /// ```no_run
    /// # fn main() -> Result<(), auxstar::Error> {
    /// let transport = auxstar::SerialTransport::open("/dev/ttyUSB0")?;
    /// let controller = auxstar::HandController::new(transport);
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::with_timeouts(path, DEFAULT_TIMEOUT, DEFAULT_TIMEOUT)
    }

    /// Opens the serial port at `path` with custom read and write timeouts.
    ///
    /// The read timeout bounds a whole reply, however many reads it takes to arrive.
    pub fn with_timeouts(
        path: impl AsRef<Path>,
        read_timeout: Duration,
        write_timeout: Duration,
    ) -> Result<Self, Error> {
        let port = SerialPort::open(path.as_ref(), |mut settings: Settings| -> io::Result<Settings> {
            settings.set_raw();
            settings.set_baud_rate(BAUD_RATE)?;
            settings.set_char_size(CharSize::Bits8);
            settings.set_parity(Parity::None);
            settings.set_stop_bits(StopBits::One);
            settings.set_flow_control(FlowControl::None);
            Ok(settings)
        })?;
        let mut transport = Self {
            port,
            read_timeout,
        };
        transport.set_timeouts(read_timeout, write_timeout)?;
        log::debug!("opened {} at {} baud", path.as_ref().display(), BAUD_RATE);
        Ok(transport)
    }

    /// Changes the read and write timeouts.
    pub fn set_timeouts(&mut self, read_timeout: Duration, write_timeout: Duration) -> Result<(), Error> {
        self.port.set_read_timeout(read_timeout)?;
        self.port.set_write_timeout(write_timeout)?;
        self.read_timeout = read_timeout;
        Ok(())
    }

    /// The underlying serial port.
    pub fn port(&self) -> &SerialPort {
        &self.port
    }
}

impl Transport for SerialTransport {
    fn transmit(&mut self, bytes: &[u8]) -> Result<(), Error> {
        match self.port.write_all(bytes) {
            Err(e) if e.kind() == ErrorKind::TimedOut => Err(Error::Timeout {
                expected: bytes.len(),
                received: 0,
            }),
            other => Ok(other?),
        }
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        let deadline = Instant::now() + self.read_timeout;
        let port = &mut self.port;
        fill_before(buf, deadline, |chunk, remaining| {
            port.set_read_timeout(remaining)?;
            port.read(chunk)
        })
    }

    fn discard(&mut self) -> Result<(), Error> {
        Ok(self.port.discard_input_buffer()?)
    }
}

/// Fills `buf` from `read`, handing it the time left until `deadline` on every call.
fn fill_before<F>(buf: &mut [u8], deadline: Instant, mut read: F) -> Result<(), Error>
where
    F: FnMut(&mut [u8], Duration) -> io::Result<usize>,
{
    let mut filled = 0;
    while filled < buf.len() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        match read(&mut buf[filled..], remaining) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => break,
            Err(e) => return Err(e.into()),
        }
    }
    if filled < buf.len() {
        return Err(Error::Timeout {
            expected: buf.len(),
            received: filled,
        });
    }
    Ok(())
}
