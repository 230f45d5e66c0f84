#![allow(dead_code)]

use std::{
    collections::VecDeque,
    io,
    sync::{Arc, Mutex},
};

use slog::Logger;
use switch_uart_pad::Transport;

#[derive(Debug, Default)]
struct Wire {
    replies: VecDeque<Vec<u8>>,
    inbox: VecDeque<u8>,
    writes: Vec<Vec<u8>>,
    fail_writes: bool,
}

/// An in-memory MCU: every write is answered with the next scripted reply
#[derive(Debug, Clone, Default)]
pub struct ScriptedPort(Arc<Mutex<Wire>>);

impl ScriptedPort {
    pub fn new<I, R>(replies: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[u8]>,
    {
        let port = Self::default();
        port.script(replies);
        port
    }

    pub fn script<I, R>(&self, replies: I)
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[u8]>,
    {
        self.0
            .lock()
            .unwrap()
            .replies
            .extend(replies.into_iter().map(|r| r.as_ref().to_vec()));
    }

    /// Acknowledge the next `n` packets
    pub fn ack(&self, n: usize) {
        self.script(std::iter::repeat([0x90u8]).take(n));
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.0.lock().unwrap().writes.clone()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.0.lock().unwrap().fail_writes = fail;
    }
}

impl Transport for ScriptedPort {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        let mut wire = self.0.lock().unwrap();
        if wire.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "unplugged"));
        }
        wire.writes.push(bytes.to_vec());
        if let Some(reply) = wire.replies.pop_front() {
            wire.inbox.extend(reply);
        }
        Ok(())
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        Ok(self.0.lock().unwrap().inbox.pop_front())
    }

    fn bytes_pending(&mut self) -> io::Result<usize> {
        Ok(self.0.lock().unwrap().inbox.len())
    }

    fn discard_input(&mut self) -> io::Result<()> {
        self.0.lock().unwrap().inbox.clear();
        Ok(())
    }
}

pub fn logger() -> Logger {
    Logger::root(slog::Discard, slog::o!())
}

pub const NEUTRAL_PACKET: [u8; 9] = [0x00, 0x00, 0x08, 0x80, 0x80, 0x80, 0x80, 0x00, 0x54];
