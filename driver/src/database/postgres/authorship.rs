use sqlx::PgConnection;

use kernel::interface::query::AuthorshipQuery;
use kernel::interface::update::AuthorshipModifier;
use kernel::prelude::entity::{AuthorId, Authorship, Isbn};
use kernel::KernelError;

use crate::database::postgres::PostgresConnection;
use crate::error::ConvertError;

pub struct PostgresAuthorshipRepository;

#[async_trait::async_trait]
impl AuthorshipQuery<PostgresConnection> for PostgresAuthorshipRepository {
    async fn find_by_isbn(
        &self,
        con: &mut PostgresConnection,
        isbn: &Isbn,
    ) -> error_stack::Result<Vec<Authorship>, KernelError> {
        PgAuthorshipInternal::find_by_isbn(con, isbn).await
    }

    async fn find_by_author_id(
        &self,
        con: &mut PostgresConnection,
        author_id: &AuthorId,
    ) -> error_stack::Result<Vec<Authorship>, KernelError> {
        PgAuthorshipInternal::find_by_author_id(con, author_id).await
    }
}

#[async_trait::async_trait]
impl AuthorshipModifier<PostgresConnection> for PostgresAuthorshipRepository {
    async fn create(
        &self,
        con: &mut PostgresConnection,
        authorship: &Authorship,
    ) -> error_stack::Result<(), KernelError> {
        PgAuthorshipInternal::create(con, authorship).await
    }

    async fn delete(
        &self,
        con: &mut PostgresConnection,
        authorship: &Authorship,
    ) -> error_stack::Result<(), KernelError> {
        PgAuthorshipInternal::delete(con, authorship).await
    }

    async fn delete_by_isbn(
        &self,
        con: &mut PostgresConnection,
        isbn: &Isbn,
    ) -> error_stack::Result<(), KernelError> {
        PgAuthorshipInternal::delete_by_isbn(con, isbn).await
    }

    async fn delete_by_author_id(
        &self,
        con: &mut PostgresConnection,
        author_id: &AuthorId,
    ) -> error_stack::Result<(), KernelError> {
        PgAuthorshipInternal::delete_by_author_id(con, author_id).await
    }
}

#[derive(sqlx::FromRow)]
struct AuthorshipRow {
    author_id: i32,
    isbn: String,
}

impl From<AuthorshipRow> for Authorship {
    fn from(value: AuthorshipRow) -> Self {
        Authorship::new(AuthorId::new(value.author_id), Isbn::new(value.isbn))
    }
}

pub(in crate::database) struct PgAuthorshipInternal;

impl PgAuthorshipInternal {
    async fn find_by_isbn(
        con: &mut PgConnection,
        isbn: &Isbn,
    ) -> error_stack::Result<Vec<Authorship>, KernelError> {
        let rows = sqlx::query_as::<_, AuthorshipRow>(
            // language=postgresql
            r#"
            SELECT
                authorID AS author_id,
                isbn
            FROM
                authorISBN
            WHERE
                isbn = $1
            "#,
        )
        .bind(isbn.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Authorship::from).collect())
    }

    async fn find_by_author_id(
        con: &mut PgConnection,
        author_id: &AuthorId,
    ) -> error_stack::Result<Vec<Authorship>, KernelError> {
        let rows = sqlx::query_as::<_, AuthorshipRow>(
            // language=postgresql
            r#"
            SELECT
                authorID AS author_id,
                isbn
            FROM
                authorISBN
            WHERE
                authorID = $1
            "#,
        )
        .bind(author_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Authorship::from).collect())
    }

    async fn create(
        con: &mut PgConnection,
        authorship: &Authorship,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO authorISBN (authorID, isbn)
            VALUES ($1, $2)
            "#,
        )
        .bind(authorship.author_id().as_ref())
        .bind(authorship.isbn().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        tracing::debug!(
            author_id = %authorship.author_id(),
            isbn = %authorship.isbn(),
            "inserted authorISBN row"
        );
        Ok(())
    }

    async fn delete(
        con: &mut PgConnection,
        authorship: &Authorship,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM authorISBN
            WHERE authorID = $1 AND isbn = $2
            "#,
        )
        .bind(authorship.author_id().as_ref())
        .bind(authorship.isbn().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn delete_by_isbn(
        con: &mut PgConnection,
        isbn: &Isbn,
    ) -> error_stack::Result<(), KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM authorISBN
            WHERE isbn = $1
            "#,
        )
        .bind(isbn.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        tracing::debug!(%isbn, rows = result.rows_affected(), "deleted authorISBN rows");
        Ok(())
    }

    async fn delete_by_author_id(
        con: &mut PgConnection,
        author_id: &AuthorId,
    ) -> error_stack::Result<(), KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM authorISBN
            WHERE authorID = $1
            "#,
        )
        .bind(author_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        tracing::debug!(%author_id, rows = result.rows_affected(), "deleted authorISBN rows");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::{AuthorQuery, AuthorshipQuery, BookQuery};
    use kernel::interface::update::{AuthorModifier, AuthorshipModifier, BookModifier};
    use kernel::prelude::entity::{
        Author, Authorship, Book, BookTitle, Copyright, EditionNumber, FirstName, Isbn, LastName,
    };
    use kernel::KernelError;

    use crate::database::postgres::{
        PostgresAuthorRepository, PostgresAuthorshipRepository, PostgresBookRepository,
        PostgresDatabase,
    };

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn test() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new()?;
        let mut con = db.connect().await?;
        let isbn = Isbn::new(format!("test-{}", rand::random::<u32>()));
        let book = Book::new(
            isbn.clone(),
            BookTitle::new("title"),
            EditionNumber::new(1)?,
            Copyright::new("2024"),
        );
        PostgresBookRepository.create(&mut con, &book).await?;

        let mut author = Author::unsaved(FirstName::new("first"), LastName::new("last"));
        PostgresAuthorRepository.create(&mut con, &mut author).await?;

        let authorship = Authorship::new(*author.id(), isbn.clone());
        PostgresAuthorshipRepository
            .create(&mut con, &authorship)
            .await?;

        let found = PostgresAuthorshipRepository
            .find_by_isbn(&mut con, &isbn)
            .await?;
        assert_eq!(found, vec![authorship.clone()]);
        let found = PostgresAuthorshipRepository
            .find_by_author_id(&mut con, author.id())
            .await?;
        assert_eq!(found, vec![authorship.clone()]);

        let authors = PostgresAuthorRepository.find_by_isbn(&mut con, &isbn).await?;
        assert_eq!(authors, vec![author.clone()]);
        let books = PostgresBookRepository
            .find_by_author_id(&mut con, author.id())
            .await?;
        assert_eq!(books, vec![book.clone()]);

        PostgresAuthorshipRepository
            .delete_by_isbn(&mut con, &isbn)
            .await?;
        let found = PostgresAuthorshipRepository
            .find_by_isbn(&mut con, &isbn)
            .await?;
        assert!(found.is_empty());

        PostgresBookRepository.delete(&mut con, &isbn).await?;
        PostgresAuthorRepository.delete(&mut con, author.id()).await?;
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn referenced_book_cannot_be_deleted() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new()?;
        let mut con = db.connect().await?;
        let isbn = Isbn::new(format!("test-{}", rand::random::<u32>()));
        let book = Book::new(
            isbn.clone(),
            BookTitle::new("title"),
            EditionNumber::new(1)?,
            Copyright::new("2024"),
        );
        PostgresBookRepository.create(&mut con, &book).await?;
        let mut author = Author::unsaved(FirstName::new("first"), LastName::new("last"));
        PostgresAuthorRepository.create(&mut con, &mut author).await?;
        let authorship = Authorship::new(*author.id(), isbn.clone());
        PostgresAuthorshipRepository
            .create(&mut con, &authorship)
            .await?;

        let report = PostgresBookRepository
            .delete(&mut con, &isbn)
            .await
            .unwrap_err();
        assert!(matches!(report.current_context(), KernelError::Storage));

        PostgresAuthorshipRepository
            .delete(&mut con, &authorship)
            .await?;
        PostgresBookRepository.delete(&mut con, &isbn).await?;
        PostgresAuthorRepository.delete(&mut con, author.id()).await?;
        Ok(())
    }
}
