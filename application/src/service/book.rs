use kernel::interface::database::Session;
use kernel::interface::query::{AuthorQuery, BookQuery, DependOnAuthorQuery, DependOnBookQuery};
use kernel::interface::update::{
    AuthorModifier, AuthorshipModifier, BookModifier, DependOnAuthorModifier,
    DependOnAuthorshipModifier, DependOnBookModifier,
};
use kernel::prelude::entity::{Author, AuthorId, Authorship, Book, Isbn};
use kernel::KernelError;

use crate::transfer::BookWithAuthors;

#[async_trait::async_trait]
pub trait FetchBookService<Connection: Session>:
    'static + Sync + Send + DependOnBookQuery<Connection> + DependOnAuthorQuery<Connection>
{
    async fn fetch_all_books(
        &self,
        con: &mut Connection,
    ) -> error_stack::Result<Vec<BookWithAuthors>, KernelError> {
        let books = self.book_query().find_all(con).await?;
        let mut fetched = Vec::with_capacity(books.len());
        for book in books {
            let authors = self.author_query().find_by_isbn(con, book.isbn()).await?;
            fetched.push(BookWithAuthors::new(book, authors));
        }
        Ok(fetched)
    }

    async fn fetch_book_by_isbn(
        &self,
        con: &mut Connection,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<BookWithAuthors>, KernelError> {
        let Some(book) = self.book_query().find_by_isbn(con, isbn).await? else {
            return Ok(None);
        };
        let authors = self.author_query().find_by_isbn(con, isbn).await?;
        Ok(Some(BookWithAuthors::new(book, authors)))
    }
}

impl<Connection: Session, T> FetchBookService<Connection> for T where
    T: DependOnBookQuery<Connection> + DependOnAuthorQuery<Connection>
{
}

#[async_trait::async_trait]
pub trait InsertBookService<Connection: Session>:
    'static
    + Sync
    + Send
    + DependOnBookModifier<Connection>
    + DependOnAuthorModifier<Connection>
    + DependOnAuthorshipModifier<Connection>
{
    /// Inserts the `titles` row, then one `authorISBN` row per attached author.
    ///
    /// Authors without an id are inserted just before their join row, and get their
    /// generated id written back. Nothing is rolled back if a later statement fails.
    async fn insert_book(
        &self,
        con: &mut Connection,
        book: &Book,
        authors: &mut [Author],
    ) -> error_stack::Result<(), KernelError> {
        self.book_modifier().create(con, book).await?;
        let mut linked: Vec<AuthorId> = Vec::with_capacity(authors.len());
        for author in authors.iter_mut() {
            if !author.id().is_assigned() {
                self.author_modifier().create(con, author).await?;
            }
            if linked.contains(author.id()) {
                continue;
            }
            let authorship = Authorship::new(*author.id(), book.isbn().clone());
            self.authorship_modifier().create(con, &authorship).await?;
            linked.push(*author.id());
        }
        Ok(())
    }
}

impl<Connection: Session, T> InsertBookService<Connection> for T where
    T: DependOnBookModifier<Connection>
        + DependOnAuthorModifier<Connection>
        + DependOnAuthorshipModifier<Connection>
{
}

#[async_trait::async_trait]
pub trait UpdateBookService<Connection: Session>:
    'static + Sync + Send + DependOnBookModifier<Connection>
{
    async fn update_book(
        &self,
        con: &mut Connection,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        self.book_modifier().update(con, book).await
    }
}

impl<Connection: Session, T> UpdateBookService<Connection> for T where
    T: DependOnBookModifier<Connection>
{
}

#[async_trait::async_trait]
pub trait DeleteBookService<Connection: Session>:
    'static
    + Sync
    + Send
    + DependOnBookModifier<Connection>
    + DependOnAuthorshipModifier<Connection>
{
    /// Join rows go first so the `titles` row is no longer referenced.
    async fn delete_book(
        &self,
        con: &mut Connection,
        isbn: &Isbn,
    ) -> error_stack::Result<(), KernelError> {
        self.authorship_modifier().delete_by_isbn(con, isbn).await?;
        self.book_modifier().delete(con, isbn).await
    }
}

impl<Connection: Session, T> DeleteBookService<Connection> for T where
    T: DependOnBookModifier<Connection> + DependOnAuthorshipModifier<Connection>
{
}
