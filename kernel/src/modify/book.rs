use crate::database::Session;
use crate::entity::{Book, Isbn};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BookModifier<Connection: Session>: 'static + Sync + Send {
    async fn create(&self, con: &mut Connection, book: &Book)
        -> error_stack::Result<(), KernelError>;
    /// Rewrites every column except the isbn.
    async fn update(&self, con: &mut Connection, book: &Book)
        -> error_stack::Result<(), KernelError>;
    /// Fails while `authorISBN` still references the isbn.
    async fn delete(&self, con: &mut Connection, isbn: &Isbn)
        -> error_stack::Result<(), KernelError>;
}

pub trait DependOnBookModifier<Connection: Session>: 'static + Sync + Send {
    type BookModifier: BookModifier<Connection>;
    fn book_modifier(&self) -> &Self::BookModifier;
}
