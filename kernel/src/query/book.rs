use crate::database::Session;
use crate::entity::{AuthorId, Book, Isbn};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BookQuery<Connection: Session>: Sync + Send + 'static {
    async fn find_all(&self, con: &mut Connection) -> error_stack::Result<Vec<Book>, KernelError>;
    async fn find_by_isbn(
        &self,
        con: &mut Connection,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Book>, KernelError>;
    /// Books joined to the author through `authorISBN`.
    async fn find_by_author_id(
        &self,
        con: &mut Connection,
        author_id: &AuthorId,
    ) -> error_stack::Result<Vec<Book>, KernelError>;
}

pub trait DependOnBookQuery<Connection: Session>: Sync + Send + 'static {
    type BookQuery: BookQuery<Connection>;
    fn book_query(&self) -> &Self::BookQuery;
}
