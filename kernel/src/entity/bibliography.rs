use std::collections::HashMap;

use error_stack::Report;

use crate::entity::{Author, AuthorId, Authorship, Book, Isbn};
use crate::KernelError;

/// Book ↔ author associations, kept symmetric.
///
/// Both directions are stored by identity and only ever change together, so
/// `authors_of(isbn)` contains an author exactly when `books_of(author)` contains the book.
/// Insertion order is preserved on each side.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Bibliography {
    authors_by_book: HashMap<Isbn, Vec<AuthorId>>,
    books_by_author: HashMap<AuthorId, Vec<Isbn>>,
}

impl Bibliography {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the pair was already present.
    pub fn associate(
        &mut self,
        book: &Book,
        author: &Author,
    ) -> error_stack::Result<bool, KernelError> {
        self.associate_keys(book.isbn(), author.id())
    }

    pub fn associate_keys(
        &mut self,
        isbn: &Isbn,
        author_id: &AuthorId,
    ) -> error_stack::Result<bool, KernelError> {
        if !author_id.is_assigned() {
            return Err(Report::new(KernelError::Validation).attach_printable(format!(
                "cannot associate book {isbn} with an author that has no id"
            )));
        }
        let authors = self.authors_by_book.entry(isbn.clone()).or_default();
        if authors.contains(author_id) {
            return Ok(false);
        }
        authors.push(*author_id);
        let books = self.books_by_author.entry(*author_id).or_default();
        if !books.contains(isbn) {
            books.push(isbn.clone());
        }
        Ok(true)
    }

    pub fn dissociate(&mut self, isbn: &Isbn, author_id: &AuthorId) -> bool {
        let removed = remove_from(&mut self.authors_by_book, isbn, author_id);
        remove_from(&mut self.books_by_author, author_id, isbn);
        removed
    }

    /// Drops the book and prunes it from every author that listed it.
    pub fn remove_book(&mut self, isbn: &Isbn) {
        let Some(authors) = self.authors_by_book.remove(isbn) else {
            return;
        };
        for author_id in authors {
            remove_from(&mut self.books_by_author, &author_id, isbn);
        }
    }

    pub fn remove_author(&mut self, author_id: &AuthorId) {
        let Some(books) = self.books_by_author.remove(author_id) else {
            return;
        };
        for isbn in books {
            remove_from(&mut self.authors_by_book, &isbn, author_id);
        }
    }

    pub fn authors_of(&self, isbn: &Isbn) -> &[AuthorId] {
        self.authors_by_book
            .get(isbn)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn books_of(&self, author_id: &AuthorId) -> &[Isbn] {
        self.books_by_author
            .get(author_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, isbn: &Isbn, author_id: &AuthorId) -> bool {
        self.authors_of(isbn).contains(author_id)
    }

    pub fn authorships(&self) -> impl Iterator<Item = Authorship> + '_ {
        self.authors_by_book.iter().flat_map(|(isbn, authors)| {
            authors
                .iter()
                .map(move |author_id| Authorship::new(*author_id, isbn.clone()))
        })
    }

    /// Number of associated pairs.
    pub fn len(&self) -> usize {
        self.authors_by_book.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.authors_by_book.is_empty()
    }
}

fn remove_from<K, V>(map: &mut HashMap<K, Vec<V>>, key: &K, value: &V) -> bool
where
    K: Eq + std::hash::Hash,
    V: PartialEq,
{
    let Some(values) = map.get_mut(key) else {
        return false;
    };
    let before = values.len();
    values.retain(|v| v != value);
    let removed = values.len() != before;
    if values.is_empty() {
        map.remove(key);
    }
    removed
}
