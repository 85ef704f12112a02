use crate::database::Session;
use crate::entity::{Author, AuthorId, FirstName, Isbn, LastName};
use crate::KernelError;

#[async_trait::async_trait]
pub trait AuthorQuery<Connection: Session>: Sync + Send + 'static {
    async fn find_all(&self, con: &mut Connection)
        -> error_stack::Result<Vec<Author>, KernelError>;
    async fn find_by_id(
        &self,
        con: &mut Connection,
        id: &AuthorId,
    ) -> error_stack::Result<Option<Author>, KernelError>;
    /// Exact, case-sensitive match on both names. The first row wins.
    async fn find_by_name(
        &self,
        con: &mut Connection,
        first_name: &FirstName,
        last_name: &LastName,
    ) -> error_stack::Result<Option<Author>, KernelError>;
    /// Authors joined to the book through `authorISBN`.
    async fn find_by_isbn(
        &self,
        con: &mut Connection,
        isbn: &Isbn,
    ) -> error_stack::Result<Vec<Author>, KernelError>;
}

pub trait DependOnAuthorQuery<Connection: Session>: Sync + Send + 'static {
    type AuthorQuery: AuthorQuery<Connection>;
    fn author_query(&self) -> &Self::AuthorQuery;
}
