use crate::database::Session;
use crate::entity::{AuthorId, Authorship, Isbn};
use crate::KernelError;

#[async_trait::async_trait]
pub trait AuthorshipQuery<Connection: Session>: Sync + Send + 'static {
    async fn find_by_isbn(
        &self,
        con: &mut Connection,
        isbn: &Isbn,
    ) -> error_stack::Result<Vec<Authorship>, KernelError>;
    async fn find_by_author_id(
        &self,
        con: &mut Connection,
        author_id: &AuthorId,
    ) -> error_stack::Result<Vec<Authorship>, KernelError>;
}

pub trait DependOnAuthorshipQuery<Connection: Session>: Sync + Send + 'static {
    type AuthorshipQuery: AuthorshipQuery<Connection>;
    fn authorship_query(&self) -> &Self::AuthorshipQuery;
}
