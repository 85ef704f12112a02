use error_stack::Report;

use kernel::prelude::entity::{Author, Book, BookTitle, Copyright, EditionNumber, Isbn};
use kernel::KernelError;

/// A book with the authors joined to it in storage.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BookWithAuthors {
    pub book: Book,
    pub authors: Vec<Author>,
}

impl BookWithAuthors {
    pub fn new(book: Book, authors: Vec<Author>) -> Self {
        Self { book, authors }
    }
}

#[derive(Debug, Clone)]
pub struct CreateBookDto {
    pub isbn: String,
    pub title: String,
    pub edition_number: i32,
    pub copyright: String,
}

impl TryFrom<CreateBookDto> for Book {
    type Error = Report<KernelError>;
    fn try_from(value: CreateBookDto) -> Result<Self, Self::Error> {
        let isbn = value.isbn.trim();
        if isbn.is_empty() {
            return Err(Report::new(KernelError::Validation).attach_printable("isbn is empty"));
        }
        Ok(Book::new(
            Isbn::new(isbn),
            BookTitle::new(value.title),
            EditionNumber::new(value.edition_number)?,
            Copyright::new(value.copyright),
        ))
    }
}
