use destructure::Destructure;
use vodca::References;

use crate::entity::{AuthorId, Isbn};

/// One row of the `authorISBN` join table.
#[derive(Debug, Clone, Hash, Eq, PartialEq, References, Destructure)]
pub struct Authorship {
    author_id: AuthorId,
    isbn: Isbn,
}

impl Authorship {
    pub fn new(author_id: AuthorId, isbn: Isbn) -> Self {
        Self { author_id, isbn }
    }
}
