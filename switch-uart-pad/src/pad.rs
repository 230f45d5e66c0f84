//! The main entry point of the library, contains the [Pad] every input event goes
//! through.
//!
//! Every operation holds one lock from the state change until the MCU acknowledges the
//! command. A failed send keeps the change.

use std::sync::{Mutex, MutexGuard, PoisonError};

use slog::{debug, trace, warn, Logger};

use crate::{
    command::{encode, Command},
    error::Result,
    input::Key,
    link::{Link, Synced, Transport},
    state::HeldState,
    stick::PointerConfig,
};

/// What an input event led to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The state changed and this command was acknowledged
    Sent(Command),

    /// The event did not change anything, nothing was sent
    Unchanged,
}

/// A consistent view of the pad between two events
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub held: HeldState,

    /// The command the held state encodes to
    pub command: Command,

    /// The last command the MCU acknowledged
    pub last_sent: Command,
}

#[derive(Debug)]
struct Inner<T> {
    held: HeldState,
    last_sent: Command,
    link: Link<T, Synced>,
}

/// A virtual controller driven over a synced serial link
#[derive(Debug)]
pub struct Pad<T> {
    logger: Logger,
    pointer: PointerConfig,
    inner: Mutex<Inner<T>>,
}

impl<T: Transport> Pad<T> {
    /// Take over a synced link. The MCU is assumed to be showing the neutral command.
    pub fn new(logger: Logger, link: Link<T, Synced>, pointer: PointerConfig) -> Self {
        Self {
            logger,
            pointer,
            inner: Mutex::new(Inner {
                held: HeldState::new(),
                last_sent: Command::NEUTRAL,
                link,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `mutate` and, if it changed the state (or `always_send` is set), send the
    /// resulting command, all under the lock
    fn apply<F>(&self, event: &'static str, always_send: bool, mutate: F) -> Result<Outcome>
    where
        F: FnOnce(&mut HeldState, &PointerConfig) -> bool,
    {
        let mut inner = self.lock();
        let changed = mutate(&mut inner.held, &self.pointer);
        if !changed && !always_send {
            trace!(self.logger, "pad.unchanged"; "event" => event);
            return Ok(Outcome::Unchanged);
        }

        let command = encode(&inner.held, &self.pointer, &self.logger);
        match inner.link.send(command) {
            Ok(()) => {
                inner.last_sent = command;
                debug!(self.logger, "pad.send";
                    "event" => event,
                    "command" => format_args!("{:#018x}", command.bits()));
                Ok(Outcome::Sent(command))
            }
            Err(err) => {
                warn!(self.logger, "pad.send.failed"; "event" => event, "error" => %err);
                Err(err)
            }
        }
    }

    /// Hold a key down. Holding a stick direction lets go of its opposite.
    pub fn press(&self, key: Key) -> Result<Outcome> {
        self.apply("press", false, |held, _| held.press(key))
    }

    pub fn release(&self, key: Key) -> Result<Outcome> {
        self.apply("release", false, |held, _| held.release(key))
    }

    /// Release the key if it is held, otherwise press it
    pub fn toggle_held(&self, key: Key) -> Result<Outcome> {
        self.apply("toggle", false, |held, _| held.toggle_held(key))
    }

    /// Let go of every button and stick direction. The resulting command is always
    /// sent, even if nothing was held.
    pub fn clear_all(&self) -> Result<Outcome> {
        self.apply("clear", true, |held, _| held.clear_all())
    }

    /// Record a raw pointer displacement; it drives the configured stick until
    /// overwritten or reset
    pub fn set_pointer(&self, dx: i32, dy: i32) -> Result<Outcome> {
        self.apply("pointer", false, |held, pointer| {
            held.set_pointer_delta(dx, dy, pointer)
        })
    }

    pub fn reset_pointer(&self) -> Result<Outcome> {
        self.apply("pointer.reset", false, |held, _| held.reset_pointer())
    }

    pub fn snapshot(&self) -> Snapshot {
        let inner = self.lock();
        Snapshot {
            held: inner.held,
            command: encode(&inner.held, &self.pointer, &self.logger),
            last_sent: inner.last_sent,
        }
    }
}
