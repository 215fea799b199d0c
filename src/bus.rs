use crate::protocol::{codec, commands, dump, passthrough, Command, Descriptor, Frame, Target, PREAMBLE};
use crate::rate::Axis;
use crate::transport::Transport;
use crate::{Error, FrameError};

/// How commands reach the motor controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Link {
    /// Through the hand controller's serial port, using its passthrough command.
    #[default]
    Passthrough,
    /// Directly on the AUX bus, using raw frames.
    Direct,
}

/// Settings for a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// How commands reach the motor controllers
    pub link: Link,
    /// Device id this session sends from on a [`Link::Direct`] bus
    pub origin: Target,
    /// On a [`Link::Direct`] bus, the adapter echoes every request. The echo is read back and
    /// checked before the reply.
    pub expect_echo: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            link: Link::Passthrough,
            origin: Target::App,
            expect_echo: false,
        }
    }
}

/// Where a [`Session`] is in a request/response exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Ready for the next command.
    Idle,
    /// The request is being written.
    RequestSent,
    /// Waiting for the reply.
    AwaitingResponse,
    /// The last exchange completed. The session returns to [`SessionState::Idle`] straight away.
    ResponseOk,
    /// The last reply did not arrive in time.
    Timeout,
    /// The last reply was corrupted or did not answer the request.
    ChecksumFail,
}

/// The request/response channel to the mount.
///
/// The bus has no request ids, so exchanges are strictly serialized: a session owns its
/// transport and takes `&mut self` for every command. Callers with several producers must
/// put the session behind a mutex or a single owner task.
///
/// Once a request has been written, any failure to read its reply leaves the session in
/// [`SessionState::Timeout`] or [`SessionState::ChecksumFail`]. It then refuses further
/// commands until [`Session::reset`] drops whatever is still pending.
pub struct Session<T: Transport> {
    transport: T,
    config: SessionConfig,
    state: SessionState,
    altitude: Option<f64>,
    azimuth: Option<f64>,
}

impl<T: Transport> Session<T> {
    /// Creates a session talking through the hand controller.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, SessionConfig::default())
    }

    /// Creates a session with custom settings.
    pub fn with_config(transport: T, config: SessionConfig) -> Self {
        Self {
            transport,
            config,
            state: SessionState::Idle,
            altitude: None,
            azimuth: None,
        }
    }

    /// The current exchange state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The session settings.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The underlying transport, mutably.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// The last position read from `axis`, as a fraction of a rotation.
    ///
    /// Only updated by a successful [`Command::GetPosition`] exchange; it is never refreshed
    /// on its own.
    pub fn last_position(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::Altitude => self.altitude,
            Axis::Azimuth => self.azimuth,
        }
    }

    /// Drops any unread input and returns the session to [`SessionState::Idle`].
    pub fn reset(&mut self) -> Result<(), Error> {
        if self.state != SessionState::Idle {
            log::warn!("resetting session from {:?}", self.state);
        }
        self.transport.discard()?;
        self.state = SessionState::Idle;
        Ok(())
    }

    /// Closes the session and releases the transport.
    pub fn close(self) -> Result<(), Error> {
        self.transport.close()
    }

    /// Sends a command looked up by its catalog name, e.g. `MC_GET_VER`.
    pub fn send_named(&mut self, target: Target, name: &str, data: &[u8]) -> Result<Vec<u8>, Error> {
        let descriptor = commands::lookup(name)?;
        self.exchange(target, descriptor, data)
    }

    /// Sends `command` with its already encoded `data` to `target` and returns the reply payload.
    pub fn send_command(&mut self, target: Target, command: Command, data: &[u8]) -> Result<Vec<u8>, Error> {
        self.exchange(target, command.descriptor(), data)
    }

    fn exchange(&mut self, target: Target, descriptor: &Descriptor, data: &[u8]) -> Result<Vec<u8>, Error> {
        if self.state != SessionState::Idle {
            return Err(Error::NotIdle(self.state));
        }
        descriptor.validate_request(data.len() + 1)?;
        log::debug!("{} -> {:?} data [{}]", descriptor.name, target, hex::encode(data));

        let result = match self.config.link {
            Link::Passthrough => self.exchange_passthrough(target, descriptor, data),
            Link::Direct => self.exchange_direct(target, descriptor, data),
        };
        let payload = match result {
            Ok(payload) => payload,
            Err(e) => {
                // a reply to a request that went out may still be on its way
                self.state = match (&e, self.state) {
                    (_, SessionState::Idle) => SessionState::Idle,
                    (Error::Timeout { .. }, _) => SessionState::Timeout,
                    _ => SessionState::ChecksumFail,
                };
                if self.state != SessionState::Idle {
                    log::warn!("{} to {:?} failed: {}", descriptor.name, target, e);
                }
                return Err(e);
            }
        };
        self.state = SessionState::ResponseOk;
        log::debug!("{} <- {:?} reply [{}]", descriptor.name, target, hex::encode(&payload));

        if descriptor.command == Command::GetPosition {
            self.cache_position(target, &payload);
        }
        self.state = SessionState::Idle;
        Ok(payload)
    }

    fn exchange_passthrough(
        &mut self,
        target: Target,
        descriptor: &Descriptor,
        data: &[u8],
    ) -> Result<Vec<u8>, Error> {
        let request = passthrough::encode_request(target, descriptor, data)?;
        self.write(&request)?;

        let mut reply = vec![0u8; passthrough::reply_len(descriptor)];
        self.read(&mut reply)?;
        Ok(passthrough::decode_reply(descriptor, &reply)?)
    }

    fn exchange_direct(&mut self, target: Target, descriptor: &Descriptor, data: &[u8]) -> Result<Vec<u8>, Error> {
        let request = Frame::new(target, self.config.origin, descriptor.opcode(), data).encode()?;
        self.write(&request)?;

        if self.config.expect_echo {
            let mut echo = vec![0u8; request.len()];
            self.read(&mut echo)?;
            if echo != request {
                return Err(Error::UnexpectedResponse {
                    expected: format!("echo {}", dump(&request)),
                    actual: dump(&echo),
                });
            }
        }

        // preamble and length first, the length byte then covers the rest but the checksum
        let mut header = [0u8; 2];
        self.read(&mut header)?;
        if header[0] != PREAMBLE {
            return Err(FrameError::Preamble(header[0]).into());
        }
        let mut reply = vec![0u8; header.len() + usize::from(header[1]) + 1];
        reply[..header.len()].copy_from_slice(&header);
        self.read(&mut reply[header.len()..])?;
        let mut frame = Frame::decode(&reply)?;
        if frame.source != target || frame.destination != self.config.origin || frame.opcode != descriptor.opcode()
        {
            return Err(Error::UnexpectedResponse {
                expected: format!(
                    "{} from {:?} to {:?}",
                    descriptor.name, target, self.config.origin
                ),
                actual: format!(
                    "opcode {:#04x} from {:?} to {:?}",
                    frame.opcode, frame.source, frame.destination
                ),
            });
        }
        if frame.payload.len() < descriptor.response_len {
            return Err(Error::UnexpectedResponse {
                expected: format!("{} bytes from {}", descriptor.response_len, descriptor.name),
                actual: format!("{} bytes", frame.payload.len()),
            });
        }
        if frame.payload.len() > descriptor.response_len {
            log::debug!(
                "{} ack [{}] past the reply",
                descriptor.name,
                hex::encode(&frame.payload[descriptor.response_len..])
            );
            frame.payload.truncate(descriptor.response_len);
        }
        Ok(frame.payload)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.state = SessionState::RequestSent;
        log::trace!("tx {}", dump(bytes));
        self.transport.transmit(bytes)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        self.state = SessionState::AwaitingResponse;
        let result = self.transport.receive(buf);
        log::trace!("rx {}", dump(buf));
        result
    }

    fn cache_position(&mut self, target: Target, payload: &[u8]) {
        let Ok(bytes) = <[u8; 3]>::try_from(payload) else {
            return;
        };
        let position = codec::decode_angle24(bytes);
        match Axis::from_target(target) {
            Some(Axis::Altitude) => self.altitude = Some(position),
            Some(Axis::Azimuth) => self.azimuth = Some(position),
            None => {}
        }
    }
}
