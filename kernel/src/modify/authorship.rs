use crate::database::Session;
use crate::entity::{AuthorId, Authorship, Isbn};
use crate::KernelError;

#[async_trait::async_trait]
pub trait AuthorshipModifier<Connection: Session>: 'static + Sync + Send {
    async fn create(
        &self,
        con: &mut Connection,
        authorship: &Authorship,
    ) -> error_stack::Result<(), KernelError>;
    async fn delete(
        &self,
        con: &mut Connection,
        authorship: &Authorship,
    ) -> error_stack::Result<(), KernelError>;
    async fn delete_by_isbn(
        &self,
        con: &mut Connection,
        isbn: &Isbn,
    ) -> error_stack::Result<(), KernelError>;
    async fn delete_by_author_id(
        &self,
        con: &mut Connection,
        author_id: &AuthorId,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnAuthorshipModifier<Connection: Session>: 'static + Sync + Send {
    type AuthorshipModifier: AuthorshipModifier<Connection>;
    fn authorship_modifier(&self) -> &Self::AuthorshipModifier;
}
