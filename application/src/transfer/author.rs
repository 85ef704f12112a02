use kernel::prelude::entity::{Author, Book, FirstName, LastName};

/// An author with the books joined to it in storage.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AuthorWithBooks {
    pub author: Author,
    pub books: Vec<Book>,
}

impl AuthorWithBooks {
    pub fn new(author: Author, books: Vec<Book>) -> Self {
        Self { author, books }
    }
}

#[derive(Debug, Clone)]
pub struct CreateAuthorDto {
    pub first_name: String,
    pub last_name: String,
}

impl From<CreateAuthorDto> for Author {
    fn from(value: CreateAuthorDto) -> Self {
        Author::unsaved(
            FirstName::new(value.first_name),
            LastName::new(value.last_name),
        )
    }
}
