use crate::KernelError;

/// One open connection to the catalog store.
///
/// Statements run one after another on it. Nothing is wrapped in a transaction.
pub trait Session: 'static + Send {}

#[async_trait::async_trait]
pub trait DatabaseConnection<Connection: Session>: 'static + Sync + Send {
    async fn connect(&self) -> error_stack::Result<Connection, KernelError>;
}

pub trait DependOnDatabaseConnection<Connection: Session>: 'static + Sync + Send {
    type DatabaseConnection: DatabaseConnection<Connection>;
    fn database_connection(&self) -> &Self::DatabaseConnection;
}
