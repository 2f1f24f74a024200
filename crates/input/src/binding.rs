use serde::{Deserialize, Serialize};

/// A logical movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Forward,
        Direction::Backward,
        Direction::Left,
        Direction::Right,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Forward => 0,
            Self::Backward => 1,
            Self::Left => 2,
            Self::Right => 3,
        }
    }
}

/// Errors from key binding validation.
#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    #[error("key {key:?} is bound to both {first:?} and {second:?}")]
    Duplicate {
        key: String,
        first: Direction,
        second: Direction,
    },
    #[error("{0:?} has an empty key binding")]
    Empty(Direction),
}

/// Maps host key identifiers to directions.
///
/// Identifiers are the host's logical key strings and are matched exactly,
/// so `"W"` (shift held) is not the same key as `"w"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub forward: String,
    pub backward: String,
    pub left: String,
    pub right: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: "w".into(),
            backward: "s".into(),
            left: "a".into(),
            right: "d".into(),
        }
    }
}

impl KeyBindings {
    pub fn key_for(&self, direction: Direction) -> &str {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Backward => &self.backward,
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        }
    }

    /// Resolve a raw key identifier. Unbound keys yield `None`.
    pub fn resolve(&self, key: &str) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|d| self.key_for(*d) == key)
    }

    /// Reject empty bindings and keys bound to more than one direction.
    pub fn validate(&self) -> Result<(), BindingError> {
        for (i, first) in Direction::ALL.iter().enumerate() {
            let key = self.key_for(*first);
            if key.is_empty() {
                return Err(BindingError::Empty(*first));
            }
            for second in &Direction::ALL[i + 1..] {
                if self.key_for(*second) == key {
                    return Err(BindingError::Duplicate {
                        key: key.to_string(),
                        first: *first,
                        second: *second,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_are_wasd() {
        let b = KeyBindings::default();
        assert_eq!(b.resolve("w"), Some(Direction::Forward));
        assert_eq!(b.resolve("s"), Some(Direction::Backward));
        assert_eq!(b.resolve("a"), Some(Direction::Left));
        assert_eq!(b.resolve("d"), Some(Direction::Right));
        assert!(b.validate().is_ok());
    }

    #[test]
    fn unknown_and_uppercase_keys_resolve_to_none() {
        let b = KeyBindings::default();
        assert_eq!(b.resolve("q"), None);
        assert_eq!(b.resolve("W"), None);
        assert_eq!(b.resolve("ArrowUp"), None);
        assert_eq!(b.resolve(""), None);
    }

    #[test]
    fn duplicate_binding_rejected() {
        let b = KeyBindings {
            left: "w".into(),
            ..KeyBindings::default()
        };
        let err = b.validate().unwrap_err();
        assert!(matches!(
            err,
            BindingError::Duplicate {
                first: Direction::Forward,
                second: Direction::Left,
                ..
            }
        ));
    }

    #[test]
    fn empty_binding_rejected() {
        let b = KeyBindings {
            right: String::new(),
            ..KeyBindings::default()
        };
        assert!(matches!(
            b.validate(),
            Err(BindingError::Empty(Direction::Right))
        ));
    }

    #[test]
    fn direction_indices_are_distinct() {
        let mut seen = [false; 4];
        for d in Direction::ALL {
            assert!(!seen[d.index()]);
            seen[d.index()] = true;
        }
    }
}
