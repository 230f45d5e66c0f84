//! Wire format of the serial link: command packets and the single-byte responses

use crc::{Crc, CRC_8_SMBUS};

use crate::{command::Command, input::Buttons};

/// Report bytes plus the trailing CRC
pub const PACKET_LEN: usize = 9;

/// CRC-8 with polynomial 0x07, no reflection, zero init
const CRC8: Crc<u8> = Crc::<u8>::new(&CRC_8_SMBUS);

/// Bytes the MCU sends back
pub mod response {
    /// The command was forwarded over USB
    pub const USB_ACK: u8 = 0x90;
    /// The packet failed its CRC check
    pub const UPDATE_NACK: u8 = 0x92;
    pub const SYNC_START: u8 = 0xFF;
    pub const SYNC_1: u8 = 0xCC;
    pub const SYNC_OK: u8 = 0x33;
}

/// Bytes sent to the MCU outside of command packets
pub mod request {
    pub const SYNC_START: u8 = 0xFF;
    pub const SYNC_1: u8 = 0x33;
    pub const SYNC_2: u8 = 0xCC;

    /// How many sync-start bytes flush a partially received packet out of the MCU
    pub const FLUSH_LEN: usize = 9;
}

/// Hat switch value for the held D-pad directions. Conflicting or absent directions
/// report the centered hat.
pub fn hat(buttons: Buttons) -> u8 {
    let dpad = buttons
        & (Buttons::DPAD_UP | Buttons::DPAD_RIGHT | Buttons::DPAD_DOWN | Buttons::DPAD_LEFT);

    match dpad.bits() >> 16 {
        0x1 => 0,
        0x3 => 1,
        0x2 => 2,
        0x6 => 3,
        0x4 => 4,
        0xC => 5,
        0x8 => 6,
        0x9 => 7,
        _ => 8,
    }
}

/// The 8-byte USB report for a command
pub fn report(command: Command) -> [u8; 8] {
    let buttons = command.buttons.bits();
    let (lx, ly) = command.left.axes();
    let (rx, ry) = command.right.axes();

    [
        (buttons >> 8) as u8,
        buttons as u8,
        hat(command.buttons),
        lx,
        ly,
        rx,
        ry,
        0x00,
    ]
}

pub fn checksum(data: &[u8]) -> u8 {
    CRC8.checksum(data)
}

/// The full packet for a command: its report followed by the report's checksum
pub fn encode(command: Command) -> [u8; PACKET_LEN] {
    let report = report(command);
    let mut packet = [0; PACKET_LEN];
    packet[..8].copy_from_slice(&report);
    packet[8] = checksum(&report);
    packet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stick::StickPosition;

    #[test]
    fn test_hat() {
        assert_eq!(hat(Buttons::empty()), 8);
        assert_eq!(hat(Buttons::DPAD_UP), 0);
        assert_eq!(hat(Buttons::DPAD_UP | Buttons::DPAD_RIGHT), 1);
        assert_eq!(hat(Buttons::DPAD_DOWN | Buttons::DPAD_RIGHT), 3);
        assert_eq!(hat(Buttons::DPAD_DOWN | Buttons::DPAD_LEFT), 5);
        assert_eq!(hat(Buttons::DPAD_UP | Buttons::DPAD_LEFT | Buttons::A), 7);
        assert_eq!(hat(Buttons::DPAD_UP | Buttons::DPAD_DOWN), 8);
    }

    #[test]
    fn test_neutral_packet() {
        assert_eq!(
            encode(Command::NEUTRAL),
            [0x00, 0x00, 0x08, 0x80, 0x80, 0x80, 0x80, 0x00, 0x54]
        );
    }

    #[test]
    fn test_exercise_packet() {
        assert_eq!(
            encode(Command::exercise()),
            [0x00, 0x04, 0x01, 0x80, 0x01, 0x27, 0xD9, 0x00, 0x8F]
        );
    }

    #[test]
    fn test_buttons_split_high_first() {
        let command = Command {
            buttons: Buttons::HOME | Buttons::Y,
            left: StickPosition::CENTER,
            right: StickPosition::CENTER,
        };
        assert_eq!(&report(command)[..3], &[0x10, 0x01, 0x08]);
    }
}
