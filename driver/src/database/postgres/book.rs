use error_stack::Report;
use sqlx::PgConnection;

use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{AuthorId, Book, BookTitle, Copyright, EditionNumber, Isbn};
use kernel::KernelError;

use crate::database::postgres::PostgresConnection;
use crate::error::ConvertError;

pub struct PostgresBookRepository;

#[async_trait::async_trait]
impl BookQuery<PostgresConnection> for PostgresBookRepository {
    async fn find_all(
        &self,
        con: &mut PostgresConnection,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        PgBookInternal::find_all(con).await
    }

    async fn find_by_isbn(
        &self,
        con: &mut PostgresConnection,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_isbn(con, isbn).await
    }

    async fn find_by_author_id(
        &self,
        con: &mut PostgresConnection,
        author_id: &AuthorId,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        PgBookInternal::find_by_author_id(con, author_id).await
    }
}

#[async_trait::async_trait]
impl BookModifier<PostgresConnection> for PostgresBookRepository {
    async fn create(
        &self,
        con: &mut PostgresConnection,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::create(con, book).await
    }

    async fn update(
        &self,
        con: &mut PostgresConnection,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::update(con, book).await
    }

    async fn delete(
        &self,
        con: &mut PostgresConnection,
        isbn: &Isbn,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::delete(con, isbn).await
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    isbn: String,
    title: String,
    edition_number: i32,
    copyright: String,
}

impl TryFrom<BookRow> for Book {
    type Error = Report<KernelError>;
    fn try_from(value: BookRow) -> Result<Self, Self::Error> {
        let edition_number = EditionNumber::new(value.edition_number)
            .map_err(|report| report.attach_printable(format!("titles row {}", value.isbn)))?;
        Ok(Book::new(
            Isbn::new(value.isbn),
            BookTitle::new(value.title),
            edition_number,
            Copyright::new(value.copyright),
        ))
    }
}

fn into_books(rows: Vec<BookRow>) -> error_stack::Result<Vec<Book>, KernelError> {
    rows.into_iter().map(Book::try_from).collect()
}

pub(in crate::database) struct PgBookInternal;

impl PgBookInternal {
    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Book>, KernelError> {
        let rows = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT isbn, title, editionNumber AS edition_number, copyright
            FROM titles
            ORDER BY isbn
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        into_books(rows)
    }

    async fn find_by_isbn(
        con: &mut PgConnection,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT isbn, title, editionNumber AS edition_number, copyright
            FROM titles
            WHERE isbn = $1
            "#,
        )
        .bind(isbn.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Book::try_from).transpose()
    }

    async fn find_by_author_id(
        con: &mut PgConnection,
        author_id: &AuthorId,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        let rows = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT t.isbn, t.title, t.editionNumber AS edition_number, t.copyright
            FROM titles t
            JOIN authorISBN ai ON t.isbn = ai.isbn
            WHERE ai.authorID = $1
            ORDER BY t.isbn
            "#,
        )
        .bind(author_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        into_books(rows)
    }

    async fn create(con: &mut PgConnection, book: &Book) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO titles (isbn, title, editionNumber, copyright)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(book.isbn().as_ref())
        .bind(book.title().as_ref())
        .bind(book.edition_number().as_ref())
        .bind(book.copyright().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        tracing::debug!(isbn = %book.isbn(), "inserted titles row");
        Ok(())
    }

    async fn update(con: &mut PgConnection, book: &Book) -> error_stack::Result<(), KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            UPDATE titles
            SET title = $2, editionNumber = $3, copyright = $4
            WHERE isbn = $1
            "#,
        )
        .bind(book.isbn().as_ref())
        .bind(book.title().as_ref())
        .bind(book.edition_number().as_ref())
        .bind(book.copyright().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        tracing::debug!(isbn = %book.isbn(), rows = result.rows_affected(), "updated titles");
        Ok(())
    }

    async fn delete(con: &mut PgConnection, isbn: &Isbn) -> error_stack::Result<(), KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM titles
            WHERE isbn = $1
            "#,
        )
        .bind(isbn.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        tracing::debug!(%isbn, rows = result.rows_affected(), "deleted from titles");
        Ok(())
    }
}
