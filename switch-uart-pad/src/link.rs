//! The serial link to the MCU.
//!
//! A [Link] starts out [Unsynced]. The only way to get a [Synced] link, which is the
//! only kind that can send commands, is to complete the sync handshake. A failed send
//! leaves the link [Synced].

use std::{
    fmt,
    io::{self, Read, Write},
    marker::PhantomData,
    thread::sleep,
    time::{Duration, Instant},
};

use serialport::{ClearBuffer, SerialPort};
use slog::{debug, info, Logger};

use crate::{
    command::Command,
    error::{Error, Result},
    packet::{self, request, response},
};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// A byte-oriented duplex channel to the MCU
pub trait Transport {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Read one byte, or `None` if nothing arrived within the transport's timeout
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// How many received bytes are waiting to be read
    fn bytes_pending(&mut self) -> io::Result<usize>;

    /// Throw away everything received so far
    fn discard_input(&mut self) -> io::Result<()>;
}

/// The transport used outside of tests
pub type SerialTransport = Box<dyn SerialPort>;

/// Open a serial device with a fixed read timeout
pub fn open_serial(device: &str, baud: u32, timeout: Duration) -> Result<SerialTransport> {
    serialport::new(device, baud)
        .timeout(timeout)
        .open()
        .map_err(|source| Error::TransportOpen {
            device: device.to_owned(),
            source,
        })
}

impl Transport for SerialTransport {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        Write::write_all(self, bytes)?;
        self.flush()
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0];
        match self.read(&mut byte) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(byte[0])),
            Err(err) if err.kind() == io::ErrorKind::TimedOut => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn bytes_pending(&mut self) -> io::Result<usize> {
        Ok(self.bytes_to_read()? as usize)
    }

    fn discard_input(&mut self) -> io::Result<()> {
        Ok(self.clear(ClearBuffer::Input)?)
    }
}

/// A marker type representing a link whose peer is in an unknown state
#[derive(Debug, Clone, Copy)]
pub enum Unsynced {}

/// A marker type representing a link whose peer accepts command packets
#[derive(Debug, Clone, Copy)]
pub enum Synced {}

/// A serial link to the MCU, either [Unsynced] or [Synced]
pub struct Link<T, State> {
    transport: T,
    timeout: Duration,
    _marker: PhantomData<State>,
}

impl<T, State> fmt::Debug for Link<T, State> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("state", &std::any::type_name::<State>())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl<T: Transport, State> Link<T, State> {
    /// Write one command packet and wait for the MCU to acknowledge it
    fn send_packet(&mut self, command: Command) -> Result<()> {
        self.transport.discard_input()?;
        self.transport.write_all(&packet::encode(command))?;

        match self.transport.read_byte()? {
            Some(response::USB_ACK) => Ok(()),
            response => Err(Error::Send {
                command: command.bits(),
                response,
            }),
        }
    }

    fn wait_for_data(&mut self) -> Result<bool> {
        let start = Instant::now();
        loop {
            if self.transport.bytes_pending()? > 0 {
                return Ok(true);
            }
            if start.elapsed() >= self.timeout {
                return Ok(false);
            }
            sleep(POLL_INTERVAL);
        }
    }

    /// Drain everything pending and keep the newest byte
    fn read_latest(&mut self) -> Result<Option<u8>> {
        let pending = self.transport.bytes_pending()?.max(1);
        let mut latest = None;
        for _ in 0..pending {
            match self.transport.read_byte()? {
                Some(byte) => latest = Some(byte),
                None => break,
            }
        }
        Ok(latest)
    }

    fn expect(&mut self, stage: &'static str, expected: u8) -> Result<()> {
        match self.transport.read_byte()? {
            Some(got) if got == expected => Ok(()),
            got => Err(Error::SyncFailed { stage, got }),
        }
    }
}

impl<T: Transport> Link<T, Unsynced> {
    /// Wrap a transport whose reads give up after `timeout`
    pub fn new(transport: T, timeout: Duration) -> Self {
        Self {
            transport,
            timeout,
            _marker: PhantomData,
        }
    }

    /// Bring the MCU into a known state.
    ///
    /// A neutral packet is tried first; if the MCU does not acknowledge it, it is forced
    /// through the sync sequence and the neutral packet is sent again.
    pub fn sync(mut self, logger: &Logger) -> Result<Link<T, Synced>> {
        match self.send_packet(Command::NEUTRAL) {
            Ok(()) => {
                debug!(logger, "link.sync.already");
            }
            Err(Error::Send { response, .. }) => {
                info!(logger, "link.sync.forced"; "response" => ?response);
                self.force_sync()?;
                self.send_packet(Command::NEUTRAL)
                    .map_err(|err| match err {
                        Error::Send { response, .. } => Error::SyncFailed {
                            stage: "neutral packet",
                            got: response,
                        },
                        err => err,
                    })?;
            }
            Err(err) => return Err(err),
        }

        Ok(Link {
            transport: self.transport,
            timeout: self.timeout,
            _marker: PhantomData,
        })
    }

    fn force_sync(&mut self) -> Result<()> {
        self.transport
            .write_all(&[request::SYNC_START; request::FLUSH_LEN])?;

        if !self.wait_for_data()? {
            return Err(Error::SyncFailed {
                stage: "sync start",
                got: None,
            });
        }
        match self.read_latest()? {
            Some(response::SYNC_START) => {}
            got => {
                return Err(Error::SyncFailed {
                    stage: "sync start",
                    got,
                })
            }
        }

        self.transport.write_all(&[request::SYNC_1])?;
        self.expect("sync 1", response::SYNC_1)?;

        self.transport.write_all(&[request::SYNC_2])?;
        self.expect("sync 2", response::SYNC_OK)
    }
}

impl<T: Transport> Link<T, Synced> {
    /// Send a command and wait for it to be acknowledged
    pub fn send(&mut self, command: Command) -> Result<()> {
        self.send_packet(command)
    }

    /// Check that commands get through: press a combination of every input, wait
    /// `settle`, then let go of everything
    pub fn exercise(&mut self, settle: Duration) -> Result<()> {
        self.send(Command::exercise())?;
        sleep(settle);
        self.send(Command::NEUTRAL)
    }
}
