mod id;
mod name;

pub use self::{id::*, name::*};
use crate::entity::Identifiable;
use destructure::{Destructure, Mutation};
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Author {
    id: AuthorId,
    first_name: FirstName,
    last_name: LastName,
}

impl Author {
    pub fn new(id: AuthorId, first_name: FirstName, last_name: LastName) -> Self {
        Self {
            id,
            first_name,
            last_name,
        }
    }

    /// An author that storage has not assigned an id to yet.
    pub fn unsaved(first_name: FirstName, last_name: LastName) -> Self {
        Self::new(AuthorId::default(), first_name, last_name)
    }

    pub fn assign_id(&mut self, id: AuthorId) {
        self.id = id;
    }

    pub fn has_full_name(&self, first_name: &FirstName, last_name: &LastName) -> bool {
        &self.first_name == first_name && &self.last_name == last_name
    }
}

impl Identifiable for Author {
    type Key = AuthorId;

    fn identity(&self) -> &AuthorId {
        &self.id
    }
}
