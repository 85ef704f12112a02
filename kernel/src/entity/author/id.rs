use std::fmt::Display;

use vodca::{AsRefln, Fromln};

/// `0` is the id of an author that has never been stored.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Default, Fromln, AsRefln)]
pub struct AuthorId(i32);

impl AuthorId {
    pub const UNASSIGNED: AuthorId = AuthorId(0);

    pub fn new(id: impl Into<i32>) -> Self {
        Self(id.into())
    }

    pub fn is_assigned(&self) -> bool {
        *self != Self::UNASSIGNED
    }
}

impl Display for AuthorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
