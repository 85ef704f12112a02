use std::hash::Hash;

/// Entities compare by their key rather than by every field.
pub trait Identifiable {
    type Key: Clone + Eq + Hash;

    fn identity(&self) -> &Self::Key;

    fn is_same(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}
