use driver::database::{
    PostgresAuthorRepository, PostgresAuthorshipRepository, PostgresBookRepository,
    PostgresConnection, PostgresDatabase,
};
use kernel::interface::database::DependOnDatabaseConnection;
use kernel::interface::query::{DependOnAuthorQuery, DependOnAuthorshipQuery, DependOnBookQuery};
use kernel::interface::update::{
    DependOnAuthorModifier, DependOnAuthorshipModifier, DependOnBookModifier,
};
use kernel::KernelError;
use vodca::References;

#[derive(References)]
pub struct Handler {
    database: PostgresDatabase,
}

impl Handler {
    pub fn init() -> error_stack::Result<Self, KernelError> {
        let database = PostgresDatabase::new()?;

        Ok(Self { database })
    }
}

impl DependOnDatabaseConnection<PostgresConnection> for Handler {
    type DatabaseConnection = PostgresDatabase;
    fn database_connection(&self) -> &PostgresDatabase {
        self.database()
    }
}

impl DependOnBookQuery<PostgresConnection> for Handler {
    type BookQuery = PostgresBookRepository;
    fn book_query(&self) -> &PostgresBookRepository {
        &PostgresBookRepository
    }
}

impl DependOnAuthorQuery<PostgresConnection> for Handler {
    type AuthorQuery = PostgresAuthorRepository;
    fn author_query(&self) -> &PostgresAuthorRepository {
        &PostgresAuthorRepository
    }
}

impl DependOnAuthorshipQuery<PostgresConnection> for Handler {
    type AuthorshipQuery = PostgresAuthorshipRepository;
    fn authorship_query(&self) -> &PostgresAuthorshipRepository {
        &PostgresAuthorshipRepository
    }
}

impl DependOnBookModifier<PostgresConnection> for Handler {
    type BookModifier = PostgresBookRepository;
    fn book_modifier(&self) -> &PostgresBookRepository {
        &PostgresBookRepository
    }
}

impl DependOnAuthorModifier<PostgresConnection> for Handler {
    type AuthorModifier = PostgresAuthorRepository;
    fn author_modifier(&self) -> &PostgresAuthorRepository {
        &PostgresAuthorRepository
    }
}

impl DependOnAuthorshipModifier<PostgresConnection> for Handler {
    type AuthorshipModifier = PostgresAuthorshipRepository;
    fn authorship_modifier(&self) -> &PostgresAuthorshipRepository {
        &PostgresAuthorshipRepository
    }
}
