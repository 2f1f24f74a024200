use crate::binding::{Direction, KeyBindings};

/// Which movement directions are currently held.
///
/// `Copy` so the frame loop can take a consistent snapshot once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    held: [bool; 4],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_held(&mut self, direction: Direction, held: bool) {
        self.held[direction.index()] = held;
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        self.held[direction.index()]
    }

    /// Apply a raw key event. Returns `false` (and changes nothing) when the
    /// key is not bound to a direction.
    pub fn apply_key(&mut self, bindings: &KeyBindings, key: &str, pressed: bool) -> bool {
        match bindings.resolve(key) {
            Some(direction) => {
                self.set_held(direction, pressed);
                true
            }
            None => false,
        }
    }

    /// Directions currently held, in `Direction::ALL` order.
    pub fn held(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(|d| self.is_held(*d))
    }

    pub fn any_held(&self) -> bool {
        self.held.iter().any(|h| *h)
    }

    pub fn release_all(&mut self) {
        self.held = [false; 4];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_nothing_held() {
        let s = InputState::new();
        for d in Direction::ALL {
            assert!(!s.is_held(d));
        }
        assert!(!s.any_held());
    }

    #[test]
    fn set_and_clear_held() {
        let mut s = InputState::new();
        s.set_held(Direction::Left, true);
        assert!(s.is_held(Direction::Left));
        assert!(!s.is_held(Direction::Right));
        s.set_held(Direction::Left, false);
        assert!(!s.is_held(Direction::Left));
    }

    #[test]
    fn apply_key_maps_bound_keys() {
        let bindings = KeyBindings::default();
        let mut s = InputState::new();
        assert!(s.apply_key(&bindings, "w", true));
        assert!(s.apply_key(&bindings, "d", true));
        assert!(s.is_held(Direction::Forward));
        assert!(s.is_held(Direction::Right));
        assert_eq!(
            s.held().collect::<Vec<_>>(),
            vec![Direction::Forward, Direction::Right]
        );

        assert!(s.apply_key(&bindings, "w", false));
        assert!(!s.is_held(Direction::Forward));
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let bindings = KeyBindings::default();
        let mut s = InputState::new();
        assert!(!s.apply_key(&bindings, "Shift", true));
        assert!(!s.apply_key(&bindings, "x", true));
        assert_eq!(s, InputState::new());
    }

    #[test]
    fn snapshot_is_independent() {
        let mut s = InputState::new();
        s.set_held(Direction::Backward, true);
        let snapshot = s;
        s.release_all();
        assert!(snapshot.is_held(Direction::Backward));
        assert!(!s.any_held());
    }
}
