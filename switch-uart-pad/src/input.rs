//! Contains the closed set of inputs the controller understands and the key names
//! callers use to refer to them

use std::{fmt, str::FromStr};

use bitflags::bitflags;

use crate::error::{Error, Result};

bitflags! {
    /// Represents the controller's digital buttons and D-pad, laid out exactly as they
    /// appear in the low bits of a command word
    #[derive(Default)]
    pub struct Buttons: u32 {
        const Y = 0x0000_0001;
        const B = 0x0000_0002;
        const A = 0x0000_0004;
        const X = 0x0000_0008;
        const L = 0x0000_0010;
        const R = 0x0000_0020;
        const ZL = 0x0000_0040;
        const ZR = 0x0000_0080;
        const MINUS = 0x0000_0100;
        const PLUS = 0x0000_0200;
        const LCLICK = 0x0000_0400;
        const RCLICK = 0x0000_0800;
        const HOME = 0x0000_1000;
        const CAPTURE = 0x0000_2000;

        const DPAD_UP = 0x0001_0000;
        const DPAD_RIGHT = 0x0002_0000;
        const DPAD_DOWN = 0x0004_0000;
        const DPAD_LEFT = 0x0008_0000;
    }
}

bitflags! {
    /// Represents the cardinal directions currently held on one analog stick
    #[derive(Default)]
    pub struct Directions: u8 {
        const UP = 0x01;
        const RIGHT = 0x02;
        const DOWN = 0x04;
        const LEFT = 0x08;
    }
}

/// A single cardinal direction on a stick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// The direction on the same axis pointing the other way
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    pub fn flag(self) -> Directions {
        match self {
            Self::Up => Directions::UP,
            Self::Right => Directions::RIGHT,
            Self::Down => Directions::DOWN,
            Self::Left => Directions::LEFT,
        }
    }
}

/// A single digital button or D-pad direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    A,
    B,
    X,
    Y,
    L,
    R,
    ZL,
    ZR,
    Minus,
    Plus,
    LClick,
    RClick,
    Home,
    Capture,
    DpadUp,
    DpadRight,
    DpadDown,
    DpadLeft,
}

impl Button {
    pub fn flag(self) -> Buttons {
        match self {
            Self::A => Buttons::A,
            Self::B => Buttons::B,
            Self::X => Buttons::X,
            Self::Y => Buttons::Y,
            Self::L => Buttons::L,
            Self::R => Buttons::R,
            Self::ZL => Buttons::ZL,
            Self::ZR => Buttons::ZR,
            Self::Minus => Buttons::MINUS,
            Self::Plus => Buttons::PLUS,
            Self::LClick => Buttons::LCLICK,
            Self::RClick => Buttons::RCLICK,
            Self::Home => Buttons::HOME,
            Self::Capture => Buttons::CAPTURE,
            Self::DpadUp => Buttons::DPAD_UP,
            Self::DpadRight => Buttons::DPAD_RIGHT,
            Self::DpadDown => Buttons::DPAD_DOWN,
            Self::DpadLeft => Buttons::DPAD_LEFT,
        }
    }
}

/// One of the two analog sticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Stick {
    Left,
    Right,
}

/// A single physical input, as named by callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A face/shoulder/system button or a D-pad direction
    Button(Button),

    /// One cardinal direction on one stick
    Stick(Stick, Direction),
}

const KEYS: [(&str, Key); 26] = [
    ("A", Key::Button(Button::A)),
    ("B", Key::Button(Button::B)),
    ("X", Key::Button(Button::X)),
    ("Y", Key::Button(Button::Y)),
    ("U", Key::Button(Button::DpadUp)),
    ("R", Key::Button(Button::DpadRight)),
    ("D", Key::Button(Button::DpadDown)),
    ("L", Key::Button(Button::DpadLeft)),
    ("ZR", Key::Button(Button::ZR)),
    ("ZL", Key::Button(Button::ZL)),
    ("LR", Key::Button(Button::R)),
    ("LL", Key::Button(Button::L)),
    ("LClick", Key::Button(Button::LClick)),
    ("RClick", Key::Button(Button::RClick)),
    ("Plus", Key::Button(Button::Plus)),
    ("Minus", Key::Button(Button::Minus)),
    ("Home", Key::Button(Button::Home)),
    ("Capture", Key::Button(Button::Capture)),
    ("LUp", Key::Stick(Stick::Left, Direction::Up)),
    ("LDown", Key::Stick(Stick::Left, Direction::Down)),
    ("LLeft", Key::Stick(Stick::Left, Direction::Left)),
    ("LRight", Key::Stick(Stick::Left, Direction::Right)),
    ("RUp", Key::Stick(Stick::Right, Direction::Up)),
    ("RDown", Key::Stick(Stick::Right, Direction::Down)),
    ("RLeft", Key::Stick(Stick::Right, Direction::Left)),
    ("RRight", Key::Stick(Stick::Right, Direction::Right)),
];

impl Key {
    /// The name this key is addressed by
    pub fn name(self) -> &'static str {
        KEYS.iter()
            .find(|(_, key)| *key == self)
            .map_or("?", |(name, _)| *name)
    }
}

impl FromStr for Key {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        KEYS.iter()
            .find(|(name, _)| *name == s)
            .map(|(_, key)| *key)
            .ok_or_else(|| Error::UnknownKey(s.to_owned()))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Buttons {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bits().serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Buttons {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <u32 as serde::Deserialize<'de>>::deserialize(deserializer)?;

        Self::from_bits(value)
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid Buttons: {:#x}", value)))
    }
}
