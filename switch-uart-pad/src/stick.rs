//! Resolves held stick directions and pointer motion into a single stick position

use crate::{
    error::{Error, Result},
    input::{Directions, Stick},
};

/// A stick position as the MCU expects it: an angle in whole degrees and how far the
/// stick is pushed.
///
/// Angles follow the usual mathematical convention, 0° pointing right and increasing
/// counter-clockwise, so 90° is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StickPosition {
    /// Angle in degrees, in `0..360`
    pub angle: u16,

    /// How far the stick is pushed, from 0 (resting) to 255 (fully tilted)
    pub intensity: u8,
}

impl StickPosition {
    pub const CENTER: Self = Self::new(0, 0);
    pub const RIGHT: Self = Self::new(0, 0xFF);
    pub const UP_RIGHT: Self = Self::new(45, 0xFF);
    pub const UP: Self = Self::new(90, 0xFF);
    pub const UP_LEFT: Self = Self::new(135, 0xFF);
    pub const LEFT: Self = Self::new(180, 0xFF);
    pub const DOWN_LEFT: Self = Self::new(225, 0xFF);
    pub const DOWN: Self = Self::new(270, 0xFF);
    pub const DOWN_RIGHT: Self = Self::new(315, 0xFF);

    pub const fn new(angle: u16, intensity: u8) -> Self {
        Self { angle, intensity }
    }

    /// The 20-bit field this position occupies in a command word, before shifting it
    /// into the left or right stick's slot
    pub const fn field(self) -> u64 {
        self.intensity as u64 + ((self.angle as u64 & 0xFFF) << 8)
    }

    /// Inverse of [field](Self::field)
    pub const fn from_field(field: u64) -> Self {
        Self {
            angle: ((field >> 8) & 0xFFF) as u16,
            intensity: (field & 0xFF) as u8,
        }
    }

    /// The X and Y axis bytes reported over USB, centered on 0x80.
    ///
    /// Y grows downwards on the wire, so a stick pushed up reports a small Y.
    pub fn axes(self) -> (u8, u8) {
        let radians = f64::from(self.angle).to_radians();
        let scale = 127.0 * f64::from(self.intensity) / 255.0;
        let x = 0x80 + (radians.cos() * scale) as i32;
        let y = 0x80 - (radians.sin() * scale) as i32;
        (x.clamp(0, 0xFF) as u8, y.clamp(0, 0xFF) as u8)
    }
}

/// Resolve the directions held on one stick to a position.
///
/// Diagonals are their own positions, not a blend of two cardinals. A set holding
/// both directions of one axis (or more than two directions) cannot be resolved.
pub fn resolve_held(dirs: Directions) -> Result<StickPosition> {
    const UP_LEFT: Directions = Directions::from_bits_truncate(0x01 | 0x08);
    const UP_RIGHT: Directions = Directions::from_bits_truncate(0x01 | 0x02);
    const DOWN_LEFT: Directions = Directions::from_bits_truncate(0x04 | 0x08);
    const DOWN_RIGHT: Directions = Directions::from_bits_truncate(0x04 | 0x02);

    Ok(match dirs {
        d if d.is_empty() => StickPosition::CENTER,
        Directions::UP => StickPosition::UP,
        Directions::DOWN => StickPosition::DOWN,
        Directions::LEFT => StickPosition::LEFT,
        Directions::RIGHT => StickPosition::RIGHT,
        UP_LEFT => StickPosition::UP_LEFT,
        UP_RIGHT => StickPosition::UP_RIGHT,
        DOWN_LEFT => StickPosition::DOWN_LEFT,
        DOWN_RIGHT => StickPosition::DOWN_RIGHT,
        _ => return Err(Error::InvalidStickCombination(dirs)),
    })
}

/// How pointer motion is turned into a stick position
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PointerConfig {
    /// The stick the pointer drives
    pub stick: Stick,

    /// Displacement that maps to a fully tilted stick
    pub max_magnitude: u32,

    /// Horizontal amplification applied to every raw delta
    pub x_amp: f64,

    /// Vertical amplification applied to every raw delta
    pub y_amp: f64,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            stick: Stick::Right,
            max_magnitude: 5,
            x_amp: 1.8,
            y_amp: 1.0,
        }
    }
}

/// The last reported pointer displacement, already scaled into stick space
/// (positive Y is up)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerDelta {
    pub x: f64,
    pub y: f64,
}

impl PointerDelta {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Scale a raw pointer delta, whose Y axis grows downwards, into stick space
    pub fn from_raw(dx: i32, dy: i32, config: &PointerConfig) -> Self {
        Self {
            x: f64::from(dx) * config.x_amp,
            y: -f64::from(dy) * config.y_amp,
        }
    }

    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Length of the vector, rounded to a whole number
    pub fn magnitude(self) -> u32 {
        self.x.hypot(self.y).round() as u32
    }

    /// Direction of the vector in degrees, `0.0..360.0`.
    ///
    /// This is the single-argument arctangent with a quadrant fix: add 180° when X is
    /// negative, otherwise add 360° when Y is negative. A zero X is taken as straight
    /// up or down, and the zero vector has angle 0.
    pub fn angle(self) -> f64 {
        if self.x == 0.0 {
            return if self.y > 0.0 {
                90.0
            } else if self.y < 0.0 {
                270.0
            } else {
                0.0
            };
        }

        let angle = (self.y / self.x).atan().to_degrees();
        if self.x < 0.0 {
            angle + 180.0
        } else if self.y < 0.0 {
            angle + 360.0
        } else {
            angle
        }
    }
}

/// Resolve a pointer displacement to a stick position.
///
/// The magnitude is clamped to `max_magnitude` and scaled to a full 8-bit intensity.
pub fn resolve_pointer(delta: PointerDelta, max_magnitude: u32) -> StickPosition {
    let max_magnitude = max_magnitude.max(1);
    let magnitude = delta.magnitude().min(max_magnitude);
    if magnitude == 0 {
        return StickPosition::CENTER;
    }

    let intensity = (f64::from(magnitude) / f64::from(max_magnitude) * 255.0).round() as u8;
    let angle = delta.angle().round() as u16 % 360;
    StickPosition::new(angle, intensity)
}
