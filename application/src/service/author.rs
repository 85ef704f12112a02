use kernel::interface::database::Session;
use kernel::interface::query::{AuthorQuery, BookQuery, DependOnAuthorQuery, DependOnBookQuery};
use kernel::interface::update::{
    AuthorModifier, AuthorshipModifier, DependOnAuthorModifier, DependOnAuthorshipModifier,
};
use kernel::prelude::entity::{Author, AuthorId, FirstName, LastName};
use kernel::KernelError;

use crate::transfer::AuthorWithBooks;

#[async_trait::async_trait]
pub trait FetchAuthorService<Connection: Session>:
    'static + Sync + Send + DependOnAuthorQuery<Connection> + DependOnBookQuery<Connection>
{
    async fn fetch_all_authors(
        &self,
        con: &mut Connection,
    ) -> error_stack::Result<Vec<AuthorWithBooks>, KernelError> {
        let authors = self.author_query().find_all(con).await?;
        let mut fetched = Vec::with_capacity(authors.len());
        for author in authors {
            let books = self.book_query().find_by_author_id(con, author.id()).await?;
            fetched.push(AuthorWithBooks::new(author, books));
        }
        Ok(fetched)
    }

    async fn fetch_author_by_id(
        &self,
        con: &mut Connection,
        id: &AuthorId,
    ) -> error_stack::Result<Option<AuthorWithBooks>, KernelError> {
        let Some(author) = self.author_query().find_by_id(con, id).await? else {
            return Ok(None);
        };
        let books = self.book_query().find_by_author_id(con, id).await?;
        Ok(Some(AuthorWithBooks::new(author, books)))
    }

    async fn fetch_author_by_name(
        &self,
        con: &mut Connection,
        first_name: &FirstName,
        last_name: &LastName,
    ) -> error_stack::Result<Option<AuthorWithBooks>, KernelError> {
        let Some(author) = self
            .author_query()
            .find_by_name(con, first_name, last_name)
            .await?
        else {
            return Ok(None);
        };
        let books = self.book_query().find_by_author_id(con, author.id()).await?;
        Ok(Some(AuthorWithBooks::new(author, books)))
    }
}

impl<Connection: Session, T> FetchAuthorService<Connection> for T where
    T: DependOnAuthorQuery<Connection> + DependOnBookQuery<Connection>
{
}

#[async_trait::async_trait]
pub trait InsertAuthorService<Connection: Session>:
    'static + Sync + Send + DependOnAuthorModifier<Connection>
{
    /// `author` carries the generated id afterwards.
    async fn insert_author(
        &self,
        con: &mut Connection,
        author: &mut Author,
    ) -> error_stack::Result<AuthorId, KernelError> {
        self.author_modifier().create(con, author).await?;
        Ok(*author.id())
    }
}

impl<Connection: Session, T> InsertAuthorService<Connection> for T where
    T: DependOnAuthorModifier<Connection>
{
}

#[async_trait::async_trait]
pub trait UpdateAuthorService<Connection: Session>:
    'static + Sync + Send + DependOnAuthorModifier<Connection>
{
    async fn update_author(
        &self,
        con: &mut Connection,
        author: &Author,
    ) -> error_stack::Result<(), KernelError> {
        self.author_modifier().update(con, author).await
    }
}

impl<Connection: Session, T> UpdateAuthorService<Connection> for T where
    T: DependOnAuthorModifier<Connection>
{
}

#[async_trait::async_trait]
pub trait DeleteAuthorService<Connection: Session>:
    'static
    + Sync
    + Send
    + DependOnAuthorModifier<Connection>
    + DependOnAuthorshipModifier<Connection>
{
    /// Join rows go first, same as for books.
    async fn delete_author(
        &self,
        con: &mut Connection,
        author_id: &AuthorId,
    ) -> error_stack::Result<(), KernelError> {
        self.authorship_modifier()
            .delete_by_author_id(con, author_id)
            .await?;
        self.author_modifier().delete(con, author_id).await
    }
}

impl<Connection: Session, T> DeleteAuthorService<Connection> for T where
    T: DependOnAuthorModifier<Connection> + DependOnAuthorshipModifier<Connection>
{
}

#[cfg(test)]
mod test {
    use kernel::interface::database::DatabaseConnection;
    use kernel::prelude::entity::{AuthorId, FirstName, Isbn, LastName};
    use kernel::KernelError;

    use crate::fake::{FakeDatabase, FakeModule};
    use crate::service::FetchAuthorService;

    fn seeded() -> FakeDatabase {
        let database = FakeDatabase::default();
        {
            let mut store = database.store();
            let java = store.seed_book("0-13-468599-7", "Java How to Program");
            let cpp = store.seed_book("0-13-444823-5", "C++ How to Program");
            let paul = store.seed_author("Paul", "Deitel");
            store.seed_author("Abbey", "Deitel");
            store.seed_authorship(&java, &paul);
            store.seed_authorship(&cpp, &paul);
        }
        database
    }

    #[tokio::test]
    async fn fetch_author_by_id_joins_books() -> error_stack::Result<(), KernelError> {
        let database = seeded();
        let module = FakeModule::new(database.clone());
        let mut con = database.connect().await?;

        let found = module
            .fetch_author_by_id(&mut con, &AuthorId::new(1))
            .await?
            .unwrap();
        assert_eq!(found.author.first_name(), &FirstName::new("Paul"));
        let isbns = found
            .books
            .iter()
            .map(|book| book.isbn().clone())
            .collect::<Vec<_>>();
        assert_eq!(
            isbns,
            vec![Isbn::new("0-13-468599-7"), Isbn::new("0-13-444823-5")]
        );

        let found = module
            .fetch_author_by_id(&mut con, &AuthorId::new(2))
            .await?
            .unwrap();
        assert!(found.books.is_empty());

        let found = module
            .fetch_author_by_id(&mut con, &AuthorId::new(99))
            .await?;
        assert!(found.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn fetch_author_by_name_is_case_sensitive() -> error_stack::Result<(), KernelError> {
        let database = seeded();
        let module = FakeModule::new(database.clone());
        let mut con = database.connect().await?;

        let found = module
            .fetch_author_by_name(&mut con, &FirstName::new("Paul"), &LastName::new("Deitel"))
            .await?
            .unwrap();
        assert_eq!(found.author.id(), &AuthorId::new(1));
        assert_eq!(found.books.len(), 2);

        let found = module
            .fetch_author_by_name(&mut con, &FirstName::new("paul"), &LastName::new("deitel"))
            .await?;
        assert!(found.is_none());

        let found = module
            .fetch_author_by_name(&mut con, &FirstName::new("Grace"), &LastName::new("Hopper"))
            .await?;
        assert!(found.is_none());
        Ok(())
    }
}
