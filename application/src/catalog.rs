use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Session};
use kernel::interface::query::{DependOnAuthorQuery, DependOnAuthorshipQuery, DependOnBookQuery};
use kernel::interface::update::{
    DependOnAuthorModifier, DependOnAuthorshipModifier, DependOnBookModifier,
};
use kernel::prelude::entity::{
    Author, AuthorId, Bibliography, Book, FirstName, Identifiable, Isbn, LastName,
};
use kernel::KernelError;

use crate::service::{
    DeleteAuthorService, DeleteBookService, FetchAuthorService, FetchBookService,
    InsertAuthorService, InsertBookService, LinkAuthorService, UpdateAuthorService,
    UpdateBookService,
};
use crate::transfer::{AuthorWithBooks, BookWithAuthors};

/// Everything the catalog needs from storage.
pub trait DependOnCatalogStore<Connection: Session>:
    DependOnDatabaseConnection<Connection>
    + DependOnBookQuery<Connection>
    + DependOnAuthorQuery<Connection>
    + DependOnAuthorshipQuery<Connection>
    + DependOnBookModifier<Connection>
    + DependOnAuthorModifier<Connection>
    + DependOnAuthorshipModifier<Connection>
{
}

impl<Connection: Session, T> DependOnCatalogStore<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnBookQuery<Connection>
        + DependOnAuthorQuery<Connection>
        + DependOnAuthorshipQuery<Connection>
        + DependOnBookModifier<Connection>
        + DependOnAuthorModifier<Connection>
        + DependOnAuthorshipModifier<Connection>
{
}

trait LogFailure {
    fn log_failure(self, action: &str) -> Self;
}

impl<T> LogFailure for error_stack::Result<T, KernelError> {
    fn log_failure(self, action: &str) -> Self {
        if let Err(report) = &self {
            tracing::error!("failed to {action}: {report:?}");
        }
        self
    }
}

/// In-memory copy of the catalog, written through to storage.
///
/// Every mutation hits storage first and only touches the cached books, authors and
/// [`Bibliography`] once that succeeded, so a failed call leaves the cache as it was.
pub struct Library<Connection: Session, Module> {
    module: Module,
    connection: Connection,
    books: Vec<Book>,
    authors: Vec<Author>,
    bibliography: Bibliography,
}

impl<Connection, Module> Library<Connection, Module>
where
    Connection: Session,
    Module: DependOnCatalogStore<Connection>,
{
    /// Connects and performs the first [`load`](Self::load).
    pub async fn new(module: Module) -> error_stack::Result<Self, KernelError> {
        let connection = module
            .database_connection()
            .connect()
            .await
            .log_failure("connect to the catalog store")?;
        let mut library = Self {
            module,
            connection,
            books: Vec::new(),
            authors: Vec::new(),
            bibliography: Bibliography::new(),
        };
        library.load().await?;
        Ok(library)
    }

    /// Replaces the cache wholesale. The association is rebuilt from both join queries.
    pub async fn load(&mut self) -> error_stack::Result<(), KernelError> {
        let fetched_books = self
            .module
            .fetch_all_books(&mut self.connection)
            .await
            .log_failure("load books")?;
        let fetched_authors = self
            .module
            .fetch_all_authors(&mut self.connection)
            .await
            .log_failure("load authors")?;

        let mut bibliography = Bibliography::new();
        let mut books = Vec::with_capacity(fetched_books.len());
        for BookWithAuthors {
            book,
            authors: credited,
        } in fetched_books
        {
            for author in &credited {
                bibliography.associate(&book, author)?;
            }
            books.push(book);
        }
        let mut authors = Vec::with_capacity(fetched_authors.len());
        for AuthorWithBooks {
            author,
            books: written,
        } in fetched_authors
        {
            for book in &written {
                bibliography.associate(book, &author)?;
            }
            authors.push(author);
        }

        self.books = books;
        self.authors = authors;
        self.bibliography = bibliography;
        tracing::info!(
            books = self.books.len(),
            authors = self.authors.len(),
            authorships = self.bibliography.len(),
            "catalog loaded"
        );
        Ok(())
    }

    pub async fn refresh(&mut self) -> error_stack::Result<(), KernelError> {
        self.load().await
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    pub fn bibliography(&self) -> &Bibliography {
        &self.bibliography
    }

    pub fn find_book_by_isbn(&self, isbn: &Isbn) -> Option<&Book> {
        self.books.iter().find(|book| book.isbn() == isbn)
    }

    /// Case-sensitive on both names.
    pub fn find_author_by_full_name(
        &self,
        first_name: &FirstName,
        last_name: &LastName,
    ) -> Option<&Author> {
        self.authors
            .iter()
            .find(|author| author.has_full_name(first_name, last_name))
    }

    pub fn find_author_by_id(&self, id: &AuthorId) -> Option<&Author> {
        self.authors.iter().find(|author| author.id() == id)
    }

    pub fn authors_of(&self, isbn: &Isbn) -> Vec<&Author> {
        self.bibliography
            .authors_of(isbn)
            .iter()
            .filter_map(|id| self.find_author_by_id(id))
            .collect()
    }

    pub fn books_of(&self, author_id: &AuthorId) -> Vec<&Book> {
        self.bibliography
            .books_of(author_id)
            .iter()
            .filter_map(|isbn| self.find_book_by_isbn(isbn))
            .collect()
    }

    /// Stores `book` together with `authors`.
    ///
    /// Authors that have no id yet are stored as well and join the cache.
    pub async fn add_book(
        &mut self,
        book: Book,
        mut authors: Vec<Author>,
    ) -> error_stack::Result<(), KernelError> {
        self.module
            .insert_book(&mut self.connection, &book, &mut authors)
            .await
            .log_failure("add book")?;
        for author in authors {
            self.bibliography.associate(&book, &author)?;
            if self.find_author_by_id(author.id()).is_none() {
                self.authors.push(author);
            }
        }
        self.books.push(book);
        Ok(())
    }

    pub async fn add_author(
        &mut self,
        mut author: Author,
    ) -> error_stack::Result<AuthorId, KernelError> {
        let id = self
            .module
            .insert_author(&mut self.connection, &mut author)
            .await
            .log_failure("add author")?;
        self.authors.push(author);
        Ok(id)
    }

    pub async fn update_book(&mut self, book: Book) -> error_stack::Result<(), KernelError> {
        self.module
            .update_book(&mut self.connection, &book)
            .await
            .log_failure("update book")?;
        self.books
            .iter_mut()
            .filter(|cached| cached.is_same(&book))
            .for_each(|cached| *cached = book.clone());
        Ok(())
    }

    pub async fn update_author(&mut self, author: Author) -> error_stack::Result<(), KernelError> {
        self.module
            .update_author(&mut self.connection, &author)
            .await
            .log_failure("update author")?;
        self.authors
            .iter_mut()
            .filter(|cached| cached.is_same(&author))
            .for_each(|cached| *cached = author.clone());
        Ok(())
    }

    pub async fn delete_book(&mut self, isbn: &Isbn) -> error_stack::Result<(), KernelError> {
        self.module
            .delete_book(&mut self.connection, isbn)
            .await
            .log_failure("delete book")?;
        self.books.retain(|book| book.identity() != isbn);
        self.bibliography.remove_book(isbn);
        Ok(())
    }

    pub async fn delete_author(
        &mut self,
        author_id: &AuthorId,
    ) -> error_stack::Result<(), KernelError> {
        self.module
            .delete_author(&mut self.connection, author_id)
            .await
            .log_failure("delete author")?;
        self.authors.retain(|author| author.identity() != author_id);
        self.bibliography.remove_author(author_id);
        Ok(())
    }

    /// Links two catalogued entities. Returns `false` when they already were.
    pub async fn associate(
        &mut self,
        isbn: &Isbn,
        author_id: &AuthorId,
    ) -> error_stack::Result<bool, KernelError> {
        if self.find_book_by_isbn(isbn).is_none() {
            return Err(Report::new(KernelError::Validation)
                .attach_printable(format!("book {isbn} is not in the catalog")));
        }
        if self.find_author_by_id(author_id).is_none() {
            return Err(Report::new(KernelError::Validation)
                .attach_printable(format!("author {author_id} is not in the catalog")));
        }
        if self.bibliography.contains(isbn, author_id) {
            return Ok(false);
        }
        self.module
            .link(&mut self.connection, isbn, author_id)
            .await
            .log_failure("link author")?;
        self.bibliography.associate_keys(isbn, author_id)
    }

    pub async fn dissociate(
        &mut self,
        isbn: &Isbn,
        author_id: &AuthorId,
    ) -> error_stack::Result<bool, KernelError> {
        if !self.bibliography.contains(isbn, author_id) {
            return Ok(false);
        }
        self.module
            .unlink(&mut self.connection, isbn, author_id)
            .await
            .log_failure("unlink author")?;
        Ok(self.bibliography.dissociate(isbn, author_id))
    }
}
