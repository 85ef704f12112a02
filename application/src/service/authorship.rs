use kernel::interface::database::Session;
use kernel::interface::query::{AuthorshipQuery, DependOnAuthorshipQuery};
use kernel::interface::update::{AuthorshipModifier, DependOnAuthorshipModifier};
use kernel::prelude::entity::{AuthorId, Authorship, Isbn};
use kernel::KernelError;

#[async_trait::async_trait]
pub trait LinkAuthorService<Connection: Session>:
    'static
    + Sync
    + Send
    + DependOnAuthorshipQuery<Connection>
    + DependOnAuthorshipModifier<Connection>
{
    /// Returns `false` without writing when the row already exists.
    async fn link(
        &self,
        con: &mut Connection,
        isbn: &Isbn,
        author_id: &AuthorId,
    ) -> error_stack::Result<bool, KernelError> {
        let existing = self.authorship_query().find_by_isbn(con, isbn).await?;
        if existing.iter().any(|row| row.author_id() == author_id) {
            return Ok(false);
        }
        let authorship = Authorship::new(*author_id, isbn.clone());
        self.authorship_modifier().create(con, &authorship).await?;
        Ok(true)
    }

    async fn unlink(
        &self,
        con: &mut Connection,
        isbn: &Isbn,
        author_id: &AuthorId,
    ) -> error_stack::Result<(), KernelError> {
        let authorship = Authorship::new(*author_id, isbn.clone());
        self.authorship_modifier().delete(con, &authorship).await
    }
}

impl<Connection: Session, T> LinkAuthorService<Connection> for T where
    T: DependOnAuthorshipQuery<Connection> + DependOnAuthorshipModifier<Connection>
{
}
