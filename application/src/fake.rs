//! In-process stand-in for the relational store.
//!
//! Records every statement and enforces the `authorISBN` foreign keys, so ordering
//! mistakes fail the same way they would against a real database.

use std::sync::{Arc, Mutex, MutexGuard};

use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Session};
use kernel::interface::query::{
    AuthorQuery, AuthorshipQuery, BookQuery, DependOnAuthorQuery, DependOnAuthorshipQuery,
    DependOnBookQuery,
};
use kernel::interface::update::{
    AuthorModifier, AuthorshipModifier, BookModifier, DependOnAuthorModifier,
    DependOnAuthorshipModifier, DependOnBookModifier,
};
use kernel::prelude::entity::{
    Author, AuthorId, Authorship, Book, BookTitle, Copyright, EditionNumber, FirstName, Isbn,
    LastName,
};
use kernel::KernelError;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Statement {
    InsertBook(Isbn),
    UpdateBook(Isbn),
    DeleteBook(Isbn),
    InsertAuthor(AuthorId),
    UpdateAuthor(AuthorId),
    DeleteAuthor(AuthorId),
    InsertAuthorship(Authorship),
    DeleteAuthorship(Authorship),
    DeleteAuthorshipsByIsbn(Isbn),
    DeleteAuthorshipsByAuthor(AuthorId),
}

#[derive(Debug, Default)]
pub struct Store {
    pub titles: Vec<Book>,
    pub authors: Vec<Author>,
    pub authorships: Vec<Authorship>,
    pub executed: Vec<Statement>,
    /// Every statement fails while set.
    pub unavailable: bool,
    last_author_id: i32,
}

fn rejected(reason: impl Into<String>) -> Report<KernelError> {
    Report::new(KernelError::Storage).attach_printable(reason.into())
}

impl Store {
    fn check_available(&self) -> error_stack::Result<(), KernelError> {
        if self.unavailable {
            return Err(rejected("store unavailable"));
        }
        Ok(())
    }

    fn execute(
        &mut self,
        statement: Statement,
        apply: impl FnOnce(&mut Store) -> error_stack::Result<(), KernelError>,
    ) -> error_stack::Result<(), KernelError> {
        self.check_available()?;
        apply(self)?;
        self.executed.push(statement);
        Ok(())
    }

    pub fn seed_book(&mut self, isbn: &str, title: &str) -> Book {
        let book = Book::new(
            Isbn::new(isbn),
            BookTitle::new(title),
            EditionNumber::new(1).unwrap(),
            Copyright::new("2018"),
        );
        self.titles.push(book.clone());
        book
    }

    pub fn seed_author(&mut self, first_name: &str, last_name: &str) -> Author {
        self.last_author_id += 1;
        let author = Author::new(
            AuthorId::new(self.last_author_id),
            FirstName::new(first_name),
            LastName::new(last_name),
        );
        self.authors.push(author.clone());
        author
    }

    pub fn seed_authorship(&mut self, book: &Book, author: &Author) {
        self.authorships
            .push(Authorship::new(*author.id(), book.isbn().clone()));
    }
}

#[derive(Clone, Default)]
pub struct FakeDatabase(Arc<Mutex<Store>>);

impl FakeDatabase {
    pub fn store(&self) -> MutexGuard<'_, Store> {
        self.0.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl DatabaseConnection<FakeConnection> for FakeDatabase {
    async fn connect(&self) -> error_stack::Result<FakeConnection, KernelError> {
        self.store().check_available()?;
        Ok(FakeConnection(Arc::clone(&self.0)))
    }
}

pub struct FakeConnection(Arc<Mutex<Store>>);

impl FakeConnection {
    fn with<T>(&self, f: impl FnOnce(&mut Store) -> T) -> T {
        let mut store = self.0.lock().unwrap();
        f(&mut store)
    }
}

impl Session for FakeConnection {}

pub struct FakeRepository;

#[async_trait::async_trait]
impl BookQuery<FakeConnection> for FakeRepository {
    async fn find_all(
        &self,
        con: &mut FakeConnection,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        con.with(|store| {
            store.check_available()?;
            Ok(store.titles.clone())
        })
    }

    async fn find_by_isbn(
        &self,
        con: &mut FakeConnection,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        con.with(|store| {
            store.check_available()?;
            Ok(store.titles.iter().find(|b| b.isbn() == isbn).cloned())
        })
    }

    async fn find_by_author_id(
        &self,
        con: &mut FakeConnection,
        author_id: &AuthorId,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        con.with(|store| {
            store.check_available()?;
            Ok(store
                .authorships
                .iter()
                .filter(|row| row.author_id() == author_id)
                .filter_map(|row| store.titles.iter().find(|b| b.isbn() == row.isbn()))
                .cloned()
                .collect())
        })
    }
}

#[async_trait::async_trait]
impl BookModifier<FakeConnection> for FakeRepository {
    async fn create(
        &self,
        con: &mut FakeConnection,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        con.with(|store| {
            store.execute(Statement::InsertBook(book.isbn().clone()), |store| {
                if store.titles.iter().any(|b| b.isbn() == book.isbn()) {
                    return Err(rejected(format!("duplicate isbn {}", book.isbn())));
                }
                store.titles.push(book.clone());
                Ok(())
            })
        })
    }

    async fn update(
        &self,
        con: &mut FakeConnection,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        con.with(|store| {
            store.execute(Statement::UpdateBook(book.isbn().clone()), |store| {
                store
                    .titles
                    .iter_mut()
                    .filter(|b| b.isbn() == book.isbn())
                    .for_each(|b| *b = book.clone());
                Ok(())
            })
        })
    }

    async fn delete(
        &self,
        con: &mut FakeConnection,
        isbn: &Isbn,
    ) -> error_stack::Result<(), KernelError> {
        con.with(|store| {
            store.execute(Statement::DeleteBook(isbn.clone()), |store| {
                if store.authorships.iter().any(|row| row.isbn() == isbn) {
                    return Err(rejected(format!("{isbn} is still referenced by authorISBN")));
                }
                store.titles.retain(|b| b.isbn() != isbn);
                Ok(())
            })
        })
    }
}

#[async_trait::async_trait]
impl AuthorQuery<FakeConnection> for FakeRepository {
    async fn find_all(
        &self,
        con: &mut FakeConnection,
    ) -> error_stack::Result<Vec<Author>, KernelError> {
        con.with(|store| {
            store.check_available()?;
            Ok(store.authors.clone())
        })
    }

    async fn find_by_id(
        &self,
        con: &mut FakeConnection,
        id: &AuthorId,
    ) -> error_stack::Result<Option<Author>, KernelError> {
        con.with(|store| {
            store.check_available()?;
            Ok(store.authors.iter().find(|a| a.id() == id).cloned())
        })
    }

    async fn find_by_name(
        &self,
        con: &mut FakeConnection,
        first_name: &FirstName,
        last_name: &LastName,
    ) -> error_stack::Result<Option<Author>, KernelError> {
        con.with(|store| {
            store.check_available()?;
            Ok(store
                .authors
                .iter()
                .find(|a| a.has_full_name(first_name, last_name))
                .cloned())
        })
    }

    async fn find_by_isbn(
        &self,
        con: &mut FakeConnection,
        isbn: &Isbn,
    ) -> error_stack::Result<Vec<Author>, KernelError> {
        con.with(|store| {
            store.check_available()?;
            Ok(store
                .authorships
                .iter()
                .filter(|row| row.isbn() == isbn)
                .filter_map(|row| store.authors.iter().find(|a| a.id() == row.author_id()))
                .cloned()
                .collect())
        })
    }
}

#[async_trait::async_trait]
impl AuthorModifier<FakeConnection> for FakeRepository {
    async fn create(
        &self,
        con: &mut FakeConnection,
        author: &mut Author,
    ) -> error_stack::Result<(), KernelError> {
        con.with(|store| {
            store.check_available()?;
            store.last_author_id += 1;
            let id = AuthorId::new(store.last_author_id);
            store.execute(Statement::InsertAuthor(id), |store| {
                author.assign_id(id);
                store.authors.push(author.clone());
                Ok(())
            })
        })
    }

    async fn update(
        &self,
        con: &mut FakeConnection,
        author: &Author,
    ) -> error_stack::Result<(), KernelError> {
        con.with(|store| {
            store.execute(Statement::UpdateAuthor(*author.id()), |store| {
                store
                    .authors
                    .iter_mut()
                    .filter(|a| a.id() == author.id())
                    .for_each(|a| *a = author.clone());
                Ok(())
            })
        })
    }

    async fn delete(
        &self,
        con: &mut FakeConnection,
        author_id: &AuthorId,
    ) -> error_stack::Result<(), KernelError> {
        con.with(|store| {
            store.execute(Statement::DeleteAuthor(*author_id), |store| {
                if store.authorships.iter().any(|row| row.author_id() == author_id) {
                    return Err(rejected(format!(
                        "author {author_id} is still referenced by authorISBN"
                    )));
                }
                store.authors.retain(|a| a.id() != author_id);
                Ok(())
            })
        })
    }
}

#[async_trait::async_trait]
impl AuthorshipQuery<FakeConnection> for FakeRepository {
    async fn find_by_isbn(
        &self,
        con: &mut FakeConnection,
        isbn: &Isbn,
    ) -> error_stack::Result<Vec<Authorship>, KernelError> {
        con.with(|store| {
            store.check_available()?;
            Ok(store
                .authorships
                .iter()
                .filter(|row| row.isbn() == isbn)
                .cloned()
                .collect())
        })
    }

    async fn find_by_author_id(
        &self,
        con: &mut FakeConnection,
        author_id: &AuthorId,
    ) -> error_stack::Result<Vec<Authorship>, KernelError> {
        con.with(|store| {
            store.check_available()?;
            Ok(store
                .authorships
                .iter()
                .filter(|row| row.author_id() == author_id)
                .cloned()
                .collect())
        })
    }
}

#[async_trait::async_trait]
impl AuthorshipModifier<FakeConnection> for FakeRepository {
    async fn create(
        &self,
        con: &mut FakeConnection,
        authorship: &Authorship,
    ) -> error_stack::Result<(), KernelError> {
        con.with(|store| {
            store.execute(Statement::InsertAuthorship(authorship.clone()), |store| {
                if !store.titles.iter().any(|b| b.isbn() == authorship.isbn()) {
                    return Err(rejected(format!("no titles row {}", authorship.isbn())));
                }
                if !store
                    .authors
                    .iter()
                    .any(|a| a.id() == authorship.author_id())
                {
                    return Err(rejected(format!(
                        "no authors row {}",
                        authorship.author_id()
                    )));
                }
                if store.authorships.contains(authorship) {
                    return Err(rejected("duplicate authorISBN row"));
                }
                store.authorships.push(authorship.clone());
                Ok(())
            })
        })
    }

    async fn delete(
        &self,
        con: &mut FakeConnection,
        authorship: &Authorship,
    ) -> error_stack::Result<(), KernelError> {
        con.with(|store| {
            store.execute(Statement::DeleteAuthorship(authorship.clone()), |store| {
                store.authorships.retain(|row| row != authorship);
                Ok(())
            })
        })
    }

    async fn delete_by_isbn(
        &self,
        con: &mut FakeConnection,
        isbn: &Isbn,
    ) -> error_stack::Result<(), KernelError> {
        con.with(|store| {
            store.execute(Statement::DeleteAuthorshipsByIsbn(isbn.clone()), |store| {
                store.authorships.retain(|row| row.isbn() != isbn);
                Ok(())
            })
        })
    }

    async fn delete_by_author_id(
        &self,
        con: &mut FakeConnection,
        author_id: &AuthorId,
    ) -> error_stack::Result<(), KernelError> {
        con.with(|store| {
            store.execute(Statement::DeleteAuthorshipsByAuthor(*author_id), |store| {
                store.authorships.retain(|row| row.author_id() != author_id);
                Ok(())
            })
        })
    }
}

#[derive(Clone, Default)]
pub struct FakeModule {
    database: FakeDatabase,
}

impl FakeModule {
    pub fn new(database: FakeDatabase) -> Self {
        Self { database }
    }
}

impl DependOnDatabaseConnection<FakeConnection> for FakeModule {
    type DatabaseConnection = FakeDatabase;
    fn database_connection(&self) -> &FakeDatabase {
        &self.database
    }
}

impl DependOnBookQuery<FakeConnection> for FakeModule {
    type BookQuery = FakeRepository;
    fn book_query(&self) -> &FakeRepository {
        &FakeRepository
    }
}

impl DependOnAuthorQuery<FakeConnection> for FakeModule {
    type AuthorQuery = FakeRepository;
    fn author_query(&self) -> &FakeRepository {
        &FakeRepository
    }
}

impl DependOnAuthorshipQuery<FakeConnection> for FakeModule {
    type AuthorshipQuery = FakeRepository;
    fn authorship_query(&self) -> &FakeRepository {
        &FakeRepository
    }
}

impl DependOnBookModifier<FakeConnection> for FakeModule {
    type BookModifier = FakeRepository;
    fn book_modifier(&self) -> &FakeRepository {
        &FakeRepository
    }
}

impl DependOnAuthorModifier<FakeConnection> for FakeModule {
    type AuthorModifier = FakeRepository;
    fn author_modifier(&self) -> &FakeRepository {
        &FakeRepository
    }
}

impl DependOnAuthorshipModifier<FakeConnection> for FakeModule {
    type AuthorshipModifier = FakeRepository;
    fn authorship_modifier(&self) -> &FakeRepository {
        &FakeRepository
    }
}
