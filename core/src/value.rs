//! The tri-state attribute value.
//!
//! A field value is either absent (`Null`), not yet decided by the backend
//! (`Unknown`), or present (`Known`). `Null` and `Unknown` are never merged:
//! the wire format can express the first but not the second.

/// A value that is null, unknown, or known.
#[derive(Debug, Clone, PartialEq)]
pub enum TriState<T> {
    Null,
    Unknown,
    Known(T),
}

impl<T> TriState<T> {
    pub fn is_null(&self) -> bool {
        matches!(self, TriState::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, TriState::Unknown)
    }

    pub fn is_known(&self) -> bool {
        matches!(self, TriState::Known(_))
    }

    /// Borrow the known value, if any.
    pub fn as_known(&self) -> Option<&T> {
        match self {
            TriState::Known(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_known_mut(&mut self) -> Option<&mut T> {
        match self {
            TriState::Known(v) => Some(v),
            _ => None,
        }
    }

    /// Consume the value, keeping only the known payload.
    pub fn known(self) -> Option<T> {
        match self {
            TriState::Known(v) => Some(v),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> TriState<U> {
        match self {
            TriState::Null => TriState::Null,
            TriState::Unknown => TriState::Unknown,
            TriState::Known(v) => TriState::Known(f(v)),
        }
    }
}

impl<T> Default for TriState<T> {
    fn default() -> Self {
        TriState::Null
    }
}

impl<T> From<T> for TriState<T> {
    fn from(value: T) -> Self {
        TriState::Known(value)
    }
}

impl<T> TriState<T> {
    /// `None` becomes `Null`; there is no optional form of `Unknown`.
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(TriState::Null, TriState::Known)
    }
}
