//! Contains the command word sent to the MCU and the encoder building it from the
//! held state

use slog::{warn, Logger};

use crate::{
    input::{Buttons, Stick},
    state::HeldState,
    stick::{resolve_held, resolve_pointer, PointerConfig, StickPosition},
};

const LEFT_SHIFT: u32 = 24;
const RIGHT_SHIFT: u32 = 44;

/// The simultaneous state of every input on the controller.
///
/// The fields occupy disjoint bit ranges of a 64-bit word:
/// buttons and D-pad in bits 0..20, the left stick in bits 24..44 and the right stick
/// in bits 44..64 (intensity in the low byte of each stick field, angle above it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Command {
    pub buttons: Buttons,
    pub left: StickPosition,
    pub right: StickPosition,
}

impl Command {
    /// Nothing pressed, both sticks resting
    pub const NEUTRAL: Self = Self {
        buttons: Buttons::empty(),
        left: StickPosition::CENTER,
        right: StickPosition::CENTER,
    };

    /// A non-trivial combination touching every field, sent once after syncing to
    /// check that commands get through
    pub fn exercise() -> Self {
        Self {
            buttons: Buttons::A | Buttons::DPAD_UP | Buttons::DPAD_RIGHT,
            left: StickPosition::UP,
            right: StickPosition::DOWN_LEFT,
        }
    }

    /// The packed command word
    pub const fn bits(self) -> u64 {
        self.buttons.bits() as u64
            | self.left.field() << LEFT_SHIFT
            | self.right.field() << RIGHT_SHIFT
    }

    /// Unpack a command word. Bits outside the known fields are dropped.
    pub const fn from_bits(bits: u64) -> Self {
        Self {
            buttons: Buttons::from_bits_truncate(bits as u32),
            left: StickPosition::from_field((bits >> LEFT_SHIFT) & 0xF_FFFF),
            right: StickPosition::from_field(bits >> RIGHT_SHIFT),
        }
    }
}

/// Build the command for a held state.
///
/// Each stick resolves its held directions. When the pointer has moved, it replaces
/// whatever is held on the stick it drives. An unresolvable stick is logged and sent
/// as resting.
pub fn encode(state: &HeldState, pointer: &PointerConfig, logger: &Logger) -> Command {
    let resolve = |stick: Stick| {
        let dirs = state.stick(stick);
        resolve_held(dirs).unwrap_or_else(|err| {
            warn!(logger, "pad.stick.fault"; "stick" => ?stick, "error" => %err);
            StickPosition::CENTER
        })
    };

    let mut command = Command {
        buttons: state.buttons(),
        left: resolve(Stick::Left),
        right: resolve(Stick::Right),
    };

    let delta = state.pointer();
    if !delta.is_zero() {
        let position = resolve_pointer(delta, pointer.max_magnitude);
        match pointer.stick {
            Stick::Left => command.left = position,
            Stick::Right => command.right = position,
        }
    }

    command
}
