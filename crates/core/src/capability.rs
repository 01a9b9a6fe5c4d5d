use std::fmt::{self, Debug};

/// Whether an external collaborator is present in the current runtime.
///
/// The mini app may run outside of its intended host (in tests, or in a
/// plain browser tab), so collaborators are injected together with their
/// availability instead of being probed from the environment.
#[derive(Clone)]
pub enum Capability<T> {
    /// The collaborator is present.
    Available(T),
    /// The collaborator is absent, every operation on it is a no-op.
    Unavailable,
}

impl<T> Capability<T> {
    /// Returns the collaborator if it's present.
    #[inline]
    pub fn as_available(&self) -> Option<&T> {
        match self {
            Capability::Available(value) => Some(value),
            Capability::Unavailable => None,
        }
    }

    /// Returns `true` if the collaborator is present.
    #[inline]
    pub fn is_available(&self) -> bool {
        matches!(self, Capability::Available(_))
    }
}

impl<T> Default for Capability<T> {
    #[inline]
    fn default() -> Self {
        Capability::Unavailable
    }
}

impl<T> From<Option<T>> for Capability<T> {
    #[inline]
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Capability::Available(value),
            None => Capability::Unavailable,
        }
    }
}

impl<T> Debug for Capability<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Available(_) => f.write_str("Available(..)"),
            Capability::Unavailable => f.write_str("Unavailable"),
        }
    }
}
