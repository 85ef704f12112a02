use crate::database::Session;
use crate::entity::{Author, AuthorId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait AuthorModifier<Connection: Session>: 'static + Sync + Send {
    /// Inserts the author and writes the generated id back onto `author`.
    async fn create(
        &self,
        con: &mut Connection,
        author: &mut Author,
    ) -> error_stack::Result<(), KernelError>;
    async fn update(
        &self,
        con: &mut Connection,
        author: &Author,
    ) -> error_stack::Result<(), KernelError>;
    async fn delete(
        &self,
        con: &mut Connection,
        author_id: &AuthorId,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnAuthorModifier<Connection: Session>: 'static + Sync + Send {
    type AuthorModifier: AuthorModifier<Connection>;
    fn author_modifier(&self) -> &Self::AuthorModifier;
}
