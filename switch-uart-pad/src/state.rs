//! Contains the model of which inputs are currently held

use crate::{
    input::{Button, Buttons, Direction, Directions, Key, Stick},
    stick::{PointerConfig, PointerDelta},
};

/// Everything currently held on the virtual controller.
///
/// Every mutating method returns whether it changed anything, so callers can skip
/// resending an identical command. A stick never holds both directions of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeldState {
    buttons: Buttons,
    left: Directions,
    right: Directions,
    pointer: PointerDelta,
}

impl HeldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A state whose stick holds an arbitrary set of directions, including ones the
    /// public operations can never produce
    #[cfg(test)]
    pub(crate) fn with_stick_dirs(stick: Stick, dirs: Directions) -> Self {
        let mut state = Self::new();
        *state.stick_mut(stick) = dirs;
        state
    }

    /// The held buttons and D-pad directions
    pub fn buttons(&self) -> Buttons {
        self.buttons
    }

    /// The directions held on a stick
    pub fn stick(&self, stick: Stick) -> Directions {
        match stick {
            Stick::Left => self.left,
            Stick::Right => self.right,
        }
    }

    /// The last stored pointer displacement
    pub fn pointer(&self) -> PointerDelta {
        self.pointer
    }

    fn stick_mut(&mut self, stick: Stick) -> &mut Directions {
        match stick {
            Stick::Left => &mut self.left,
            Stick::Right => &mut self.right,
        }
    }

    pub fn add_button(&mut self, button: Button) -> bool {
        let before = self.buttons;
        self.buttons.insert(button.flag());
        before != self.buttons
    }

    pub fn remove_button(&mut self, button: Button) -> bool {
        let before = self.buttons;
        self.buttons.remove(button.flag());
        before != self.buttons
    }

    /// Hold a direction on a stick, first letting go of the opposite direction on the
    /// same axis
    pub fn add_stick_dir(&mut self, stick: Stick, dir: Direction) -> bool {
        let dirs = self.stick_mut(stick);
        let before = *dirs;
        dirs.remove(dir.opposite().flag());
        dirs.insert(dir.flag());
        before != *dirs
    }

    pub fn remove_stick_dir(&mut self, stick: Stick, dir: Direction) -> bool {
        let dirs = self.stick_mut(stick);
        let before = *dirs;
        dirs.remove(dir.flag());
        before != *dirs
    }

    /// Let go of every button and stick direction. Pointer motion is kept.
    pub fn clear_all(&mut self) -> bool {
        let before = *self;
        self.buttons = Buttons::empty();
        self.left = Directions::empty();
        self.right = Directions::empty();
        before != *self
    }

    /// Store a raw pointer displacement, scaled into stick space
    pub fn set_pointer_delta(&mut self, dx: i32, dy: i32, config: &PointerConfig) -> bool {
        let delta = PointerDelta::from_raw(dx, dy, config);
        let changed = delta != self.pointer;
        self.pointer = delta;
        changed
    }

    pub fn reset_pointer(&mut self) -> bool {
        let changed = !self.pointer.is_zero();
        self.pointer = PointerDelta::ZERO;
        changed
    }

    pub fn is_held(&self, key: Key) -> bool {
        match key {
            Key::Button(button) => self.buttons.contains(button.flag()),
            Key::Stick(stick, dir) => self.stick(stick).contains(dir.flag()),
        }
    }

    pub fn press(&mut self, key: Key) -> bool {
        match key {
            Key::Button(button) => self.add_button(button),
            Key::Stick(stick, dir) => self.add_stick_dir(stick, dir),
        }
    }

    pub fn release(&mut self, key: Key) -> bool {
        match key {
            Key::Button(button) => self.remove_button(button),
            Key::Stick(stick, dir) => self.remove_stick_dir(stick, dir),
        }
    }

    /// Release a held key, or press it (with opposite-direction exclusion) if it is not
    /// held. Always changes the state.
    pub fn toggle_held(&mut self, key: Key) -> bool {
        if self.is_held(key) {
            self.release(key)
        } else {
            self.press(key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIRECTIONS: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    fn has_conflict(dirs: Directions) -> bool {
        dirs.contains(Directions::UP | Directions::DOWN)
            || dirs.contains(Directions::LEFT | Directions::RIGHT)
    }

    #[test]
    fn test_stick_never_holds_opposites() {
        // Every sequence of three presses over the four directions.
        for a in DIRECTIONS {
            for b in DIRECTIONS {
                for c in DIRECTIONS {
                    let mut state = HeldState::new();
                    for dir in [a, b, c] {
                        let _ = state.add_stick_dir(Stick::Left, dir);
                        assert!(!has_conflict(state.stick(Stick::Left)));
                        assert!(state.stick(Stick::Left).contains(dir.flag()));
                    }
                    assert!(state.stick(Stick::Right).is_empty());
                }
            }
        }
    }

    #[test]
    fn test_every_stick_key_keeps_axes_exclusive() {
        let keys: Vec<Key> = ["LUp", "LDown", "LLeft", "LRight", "RUp", "RDown", "RLeft", "RRight"]
            .iter()
            .map(|name| name.parse().unwrap())
            .collect();

        let mut state = HeldState::new();
        for first in &keys {
            for second in &keys {
                let _ = state.press(*first);
                let _ = state.toggle_held(*second);
                let _ = state.press(*second);
                assert!(!has_conflict(state.stick(Stick::Left)));
                assert!(!has_conflict(state.stick(Stick::Right)));
                assert!(state.stick(Stick::Left).bits().count_ones() <= 2);
                assert!(state.stick(Stick::Right).bits().count_ones() <= 2);
            }
        }
    }

    #[test]
    fn test_opposite_replaces() {
        let mut state = HeldState::new();
        assert!(state.add_stick_dir(Stick::Right, Direction::Up));
        assert!(state.add_stick_dir(Stick::Right, Direction::Left));
        assert!(state.add_stick_dir(Stick::Right, Direction::Down));
        assert_eq!(state.stick(Stick::Right), Directions::DOWN | Directions::LEFT);
    }

    #[test]
    fn test_noop_reports_unchanged() {
        let mut state = HeldState::new();
        assert!(state.add_button(Button::A));
        assert!(!state.add_button(Button::A));
        assert!(state.remove_button(Button::A));
        assert!(!state.remove_button(Button::A));
        assert!(!state.remove_stick_dir(Stick::Left, Direction::Up));
        assert!(!state.clear_all());
        assert!(!state.reset_pointer());
    }

    #[test]
    fn test_buttons_are_independent() {
        let mut state = HeldState::new();
        assert!(state.add_button(Button::DpadUp));
        assert!(state.add_button(Button::DpadDown));
        assert!(state.remove_button(Button::DpadUp));
        assert_eq!(state.buttons(), Buttons::DPAD_DOWN);
    }

    #[test]
    fn test_clear_all_keeps_pointer() {
        let config = PointerConfig::default();
        let mut state = HeldState::new();
        let _ = state.press(Key::Button(Button::B));
        let _ = state.press(Key::Stick(Stick::Left, Direction::Up));
        let _ = state.set_pointer_delta(2, 1, &config);

        assert!(state.clear_all());
        assert!(state.buttons().is_empty());
        assert!(state.stick(Stick::Left).is_empty());
        assert_eq!(state.pointer(), PointerDelta { x: 3.6, y: -1.0 });
    }

    #[test]
    fn test_pointer_change_detection() {
        let config = PointerConfig::default();
        let mut state = HeldState::new();
        assert!(state.set_pointer_delta(1, 1, &config));
        assert!(!state.set_pointer_delta(1, 1, &config));
        assert!(state.reset_pointer());
        assert!(state.pointer().is_zero());
    }

    #[test]
    fn test_toggle() {
        let key = Key::Stick(Stick::Left, Direction::Right);
        let mut state = HeldState::new();
        let _ = state.press(Key::Stick(Stick::Left, Direction::Left));

        assert!(state.toggle_held(key));
        assert_eq!(state.stick(Stick::Left), Directions::RIGHT);
        assert!(state.toggle_held(key));
        assert!(state.stick(Stick::Left).is_empty());
    }
}
