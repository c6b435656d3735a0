use std::fmt;

use uuid::Uuid;

/// Identifies one relayed command from acknowledgment to final notification.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RunId(pub Uuid);

impl RunId {
    #[inline]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
