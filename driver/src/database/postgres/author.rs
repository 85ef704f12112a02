use sqlx::PgConnection;

use kernel::interface::query::AuthorQuery;
use kernel::interface::update::AuthorModifier;
use kernel::prelude::entity::{Author, AuthorId, FirstName, Isbn, LastName};
use kernel::KernelError;

use crate::database::postgres::PostgresConnection;
use crate::error::ConvertError;

pub struct PostgresAuthorRepository;

#[async_trait::async_trait]
impl AuthorQuery<PostgresConnection> for PostgresAuthorRepository {
    async fn find_all(
        &self,
        con: &mut PostgresConnection,
    ) -> error_stack::Result<Vec<Author>, KernelError> {
        PgAuthorInternal::find_all(con).await
    }

    async fn find_by_id(
        &self,
        con: &mut PostgresConnection,
        id: &AuthorId,
    ) -> error_stack::Result<Option<Author>, KernelError> {
        PgAuthorInternal::find_by_id(con, id).await
    }

    async fn find_by_name(
        &self,
        con: &mut PostgresConnection,
        first_name: &FirstName,
        last_name: &LastName,
    ) -> error_stack::Result<Option<Author>, KernelError> {
        PgAuthorInternal::find_by_name(con, first_name, last_name).await
    }

    async fn find_by_isbn(
        &self,
        con: &mut PostgresConnection,
        isbn: &Isbn,
    ) -> error_stack::Result<Vec<Author>, KernelError> {
        PgAuthorInternal::find_by_isbn(con, isbn).await
    }
}

#[async_trait::async_trait]
impl AuthorModifier<PostgresConnection> for PostgresAuthorRepository {
    async fn create(
        &self,
        con: &mut PostgresConnection,
        author: &mut Author,
    ) -> error_stack::Result<(), KernelError> {
        PgAuthorInternal::create(con, author).await
    }

    async fn update(
        &self,
        con: &mut PostgresConnection,
        author: &Author,
    ) -> error_stack::Result<(), KernelError> {
        PgAuthorInternal::update(con, author).await
    }

    async fn delete(
        &self,
        con: &mut PostgresConnection,
        author_id: &AuthorId,
    ) -> error_stack::Result<(), KernelError> {
        PgAuthorInternal::delete(con, author_id).await
    }
}

#[derive(sqlx::FromRow)]
struct AuthorRow {
    author_id: i32,
    first_name: String,
    last_name: String,
}

impl From<AuthorRow> for Author {
    fn from(row: AuthorRow) -> Self {
        Author::new(
            AuthorId::new(row.author_id),
            FirstName::new(row.first_name),
            LastName::new(row.last_name),
        )
    }
}

pub(in crate::database) struct PgAuthorInternal;

impl PgAuthorInternal {
    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Author>, KernelError> {
        let rows = sqlx::query_as::<_, AuthorRow>(
            // language=postgresql
            r#"
            SELECT authorID AS author_id, firstName AS first_name, lastName AS last_name
            FROM authors
            ORDER BY authorID
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Author::from).collect())
    }

    async fn find_by_id(
        con: &mut PgConnection,
        id: &AuthorId,
    ) -> error_stack::Result<Option<Author>, KernelError> {
        let row = sqlx::query_as::<_, AuthorRow>(
            // language=postgresql
            r#"
            SELECT authorID AS author_id, firstName AS first_name, lastName AS last_name
            FROM authors
            WHERE authorID = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Author::from))
    }

    async fn find_by_name(
        con: &mut PgConnection,
        first_name: &FirstName,
        last_name: &LastName,
    ) -> error_stack::Result<Option<Author>, KernelError> {
        let row = sqlx::query_as::<_, AuthorRow>(
            // language=postgresql
            r#"
            SELECT authorID AS author_id, firstName AS first_name, lastName AS last_name
            FROM authors
            WHERE firstName = $1 AND lastName = $2
            ORDER BY authorID
            LIMIT 1
            "#,
        )
        .bind(first_name.as_ref())
        .bind(last_name.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Author::from))
    }

    async fn find_by_isbn(
        con: &mut PgConnection,
        isbn: &Isbn,
    ) -> error_stack::Result<Vec<Author>, KernelError> {
        let rows = sqlx::query_as::<_, AuthorRow>(
            // language=postgresql
            r#"
            SELECT a.authorID AS author_id, a.firstName AS first_name, a.lastName AS last_name
            FROM authors a
            JOIN authorISBN ai ON a.authorID = ai.authorID
            WHERE ai.isbn = $1
            ORDER BY a.authorID
            "#,
        )
        .bind(isbn.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Author::from).collect())
    }

    async fn create(
        con: &mut PgConnection,
        author: &mut Author,
    ) -> error_stack::Result<(), KernelError> {
        let id = sqlx::query_scalar::<_, i32>(
            // language=postgresql
            r#"
            INSERT INTO authors (firstName, lastName)
            VALUES ($1, $2)
            RETURNING authorID
            "#,
        )
        .bind(author.first_name().as_ref())
        .bind(author.last_name().as_ref())
        .fetch_one(con)
        .await
        .convert_error()?;
        author.assign_id(AuthorId::new(id));
        tracing::debug!(author_id = id, "inserted authors row");
        Ok(())
    }

    async fn update(
        con: &mut PgConnection,
        author: &Author,
    ) -> error_stack::Result<(), KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            UPDATE authors
            SET firstName = $2, lastName = $3
            WHERE authorID = $1
            "#,
        )
        .bind(author.id().as_ref())
        .bind(author.first_name().as_ref())
        .bind(author.last_name().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        tracing::debug!(author_id = %author.id(), rows = result.rows_affected(), "updated authors");
        Ok(())
    }

    async fn delete(
        con: &mut PgConnection,
        author_id: &AuthorId,
    ) -> error_stack::Result<(), KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM authors
            WHERE authorID = $1
            "#,
        )
        .bind(author_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        tracing::debug!(%author_id, rows = result.rows_affected(), "deleted from authors");
        Ok(())
    }
}
