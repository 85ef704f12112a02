mod copyright;
mod edition;
mod isbn;
mod title;

pub use self::{copyright::*, edition::*, isbn::*, title::*};
use crate::entity::Identifiable;
use destructure::{Destructure, Mutation};
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Book {
    isbn: Isbn,
    title: BookTitle,
    edition_number: EditionNumber,
    copyright: Copyright,
}

impl Book {
    pub fn new(
        isbn: Isbn,
        title: BookTitle,
        edition_number: EditionNumber,
        copyright: Copyright,
    ) -> Self {
        Self {
            isbn,
            title,
            edition_number,
            copyright,
        }
    }
}

impl Identifiable for Book {
    type Key = Isbn;

    fn identity(&self) -> &Isbn {
        &self.isbn
    }
}
