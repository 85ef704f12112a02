use std::fmt::Display;
use std::io::Write;
use std::str::FromStr;

use error_stack::{AttachmentKind, FrameKind, Report};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

use application::transfer::{CreateAuthorDto, CreateBookDto};
use application::{DependOnCatalogStore, Library};
use kernel::interface::database::Session;
use kernel::prelude::entity::{
    Author, Book, BookTitle, Copyright, EditionNumber, FirstName, Isbn, LastName,
};
use kernel::KernelError;

/// Line oriented reader for the interactive menu.
///
/// Once the input is exhausted every question answers with an empty line and
/// [`is_closed`](Self::is_closed) turns true.
pub struct Prompt<R> {
    lines: Lines<R>,
    closed: bool,
}

impl Prompt<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> Prompt<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            closed: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub async fn line(
        &mut self,
        question: impl Display,
    ) -> error_stack::Result<String, KernelError> {
        println!("{question}");
        // stdout is line buffered only when attached to a terminal
        std::io::stdout().flush().map_err(|e| {
            Report::new(e)
                .change_context(KernelError::Internal)
                .attach_printable("failed to flush stdout")
        })?;
        if self.closed {
            return Ok(String::new());
        }
        match self.lines.next_line().await {
            Ok(Some(line)) => Ok(line.trim_end_matches('\r').to_string()),
            Ok(None) => {
                self.closed = true;
                Ok(String::new())
            }
            Err(e) => Err(Report::new(e)
                .change_context(KernelError::Internal)
                .attach_printable("failed to read from stdin")),
        }
    }

    /// Asks until the answer parses. Fails with `Validation` if the input closes first.
    pub async fn number<T: FromStr>(
        &mut self,
        question: impl Display,
    ) -> error_stack::Result<T, KernelError> {
        loop {
            let answer = self.line(&question).await?;
            if let Ok(number) = answer.trim().parse::<T>() {
                return Ok(number);
            }
            if self.closed {
                return Err(Report::new(KernelError::Validation)
                    .attach_printable("input closed while a number was expected"));
            }
            println!("Please enter a valid number.");
        }
    }

    async fn target(&mut self, verb: &str) -> error_stack::Result<Option<Target>, KernelError> {
        let answer = self
            .line(format!(
                "Do you want to {verb} a book or an author? (Enter 'book' or 'author'):"
            ))
            .await?;
        Ok(match answer.trim().to_lowercase().as_str() {
            "book" => Some(Target::Book),
            "author" => Some(Target::Author),
            _ => None,
        })
    }

    async fn full_name(
        &mut self,
        which: &str,
    ) -> error_stack::Result<(FirstName, LastName), KernelError> {
        let first_name = self
            .line(format!("Enter the first name of {which}:"))
            .await?;
        let last_name = self
            .line(format!("Enter the last name of {which}:"))
            .await?;
        if self.closed {
            return Err(Report::new(KernelError::Validation)
                .attach_printable(format!("input closed before the name of {which} was given")));
        }
        Ok((FirstName::new(first_name), LastName::new(last_name)))
    }

    /// Reads the author count and that many full names, dropping repeated names.
    async fn new_authors(&mut self) -> error_stack::Result<Vec<CreateAuthorDto>, KernelError> {
        let count = self
            .number::<u8>("How many authors does this book have?")
            .await?;
        let mut authors: Vec<CreateAuthorDto> = Vec::new();
        for n in 1..=count {
            let (first_name, last_name) = self.full_name(&format!("author {n}")).await?;
            let first_name = first_name.as_ref().to_string();
            let last_name = last_name.as_ref().to_string();
            if authors
                .iter()
                .any(|author| author.first_name == first_name && author.last_name == last_name)
            {
                continue;
            }
            authors.push(CreateAuthorDto {
                first_name,
                last_name,
            });
        }
        Ok(authors)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Target {
    Book,
    Author,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Choice {
    PrintBooks,
    PrintAuthors,
    Edit,
    BooksByAuthor,
    AuthorsOfBook,
    AddBook,
    Delete,
    Quit,
}

impl TryFrom<u8> for Choice {
    type Error = u8;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            1 => Choice::PrintBooks,
            2 => Choice::PrintAuthors,
            3 => Choice::Edit,
            4 => Choice::BooksByAuthor,
            5 => Choice::AuthorsOfBook,
            6 => Choice::AddBook,
            7 => Choice::Delete,
            8 => Choice::Quit,
            other => return Err(other),
        })
    }
}

static MENU: &str = "
Menu:
1. Print all books
2. Print all authors
3. Edit a book or author
4. Print all books by Author
5. Print all authors of a Book
6. Add a new book
7. Delete a book or author
8. Quit";

pub struct Menu<Connection: Session, Module, R> {
    library: Library<Connection, Module>,
    prompt: Prompt<R>,
}

impl<Connection, Module, R> Menu<Connection, Module, R>
where
    Connection: Session,
    Module: DependOnCatalogStore<Connection>,
    R: AsyncBufRead + Unpin,
{
    pub fn new(library: Library<Connection, Module>, prompt: Prompt<R>) -> Self {
        Self { library, prompt }
    }

    pub async fn run(&mut self) -> error_stack::Result<(), KernelError> {
        loop {
            let choice = match self.prompt.number::<u8>(MENU).await {
                Ok(choice) => choice,
                Err(_) if self.prompt.is_closed() => return Ok(()),
                Err(report) => return Err(report),
            };
            let choice = match Choice::try_from(choice) {
                Ok(Choice::Quit) => return Ok(()),
                Ok(choice) => choice,
                Err(_) => {
                    println!("Invalid choice. Please try again.");
                    continue;
                }
            };
            match self.dispatch(choice).await {
                Ok(()) => {}
                Err(report) => match report.current_context() {
                    KernelError::Validation => println!("Invalid input: {}", reason(&report)),
                    KernelError::Storage | KernelError::Internal => {
                        eprintln!("Operation failed: {}", reason(&report));
                        tracing::warn!("menu action failed: {report:?}");
                    }
                },
            }
            if self.prompt.is_closed() {
                return Ok(());
            }
        }
    }

    async fn dispatch(&mut self, choice: Choice) -> error_stack::Result<(), KernelError> {
        match choice {
            Choice::PrintBooks => {
                self.print_books();
                Ok(())
            }
            Choice::PrintAuthors => {
                self.print_authors();
                Ok(())
            }
            Choice::Edit => self.edit().await,
            Choice::BooksByAuthor => self.books_by_author().await,
            Choice::AuthorsOfBook => self.authors_of_book().await,
            Choice::AddBook => self.add_book().await,
            Choice::Delete => self.delete().await,
            Choice::Quit => Ok(()),
        }
    }

    fn print_books(&self) {
        for book in self.library.books() {
            println!("{} (ISBN: {})", book.title(), book.isbn());
            for author in self.library.authors_of(book.isbn()) {
                println!("  - {} {}", author.first_name(), author.last_name());
            }
        }
    }

    fn print_authors(&self) {
        for author in self.library.authors() {
            println!("{} {}", author.first_name(), author.last_name());
            for book in self.library.books_of(author.id()) {
                println!("  - {} (ISBN: {})", book.title(), book.isbn());
            }
        }
    }

    async fn books_by_author(&mut self) -> error_stack::Result<(), KernelError> {
        let (first_name, last_name) = self.prompt.full_name("the author").await?;
        let Some(author) = self
            .library
            .find_author_by_full_name(&first_name, &last_name)
        else {
            println!("Author not found.");
            return Ok(());
        };
        let books = self.library.books_of(author.id());
        if books.is_empty() {
            println!("No books found for this author.");
        } else {
            println!("Books by {} {}:", author.first_name(), author.last_name());
            for book in books {
                println!(" - {} (ISBN: {})", book.title(), book.isbn());
            }
        }
        Ok(())
    }

    async fn authors_of_book(&mut self) -> error_stack::Result<(), KernelError> {
        let isbn = Isbn::new(self.prompt.line("Enter the ISBN of the book:").await?.trim());
        let Some(book) = self.library.find_book_by_isbn(&isbn) else {
            println!("Book not found.");
            return Ok(());
        };
        let authors = self.library.authors_of(book.isbn());
        if authors.is_empty() {
            println!("No authors found for this book.");
        } else {
            println!("Authors for \"{}\":", book.title());
            for author in authors {
                println!(" - {} {}", author.first_name(), author.last_name());
            }
        }
        Ok(())
    }

    async fn edit(&mut self) -> error_stack::Result<(), KernelError> {
        match self.prompt.target("edit").await? {
            Some(Target::Book) => self.edit_book().await,
            Some(Target::Author) => self.edit_author().await,
            None => {
                println!("Invalid choice.");
                Ok(())
            }
        }
    }

    async fn edit_book(&mut self) -> error_stack::Result<(), KernelError> {
        let isbn = self
            .prompt
            .line("Enter the ISBN of the book you want to edit:")
            .await?;
        let Some(book) = self.library.find_book_by_isbn(&Isbn::new(isbn.trim())).cloned() else {
            println!("Book not found.");
            return Ok(());
        };

        println!("Current title: {}", book.title());
        let title = self
            .prompt
            .line("Enter new title (or press Enter to keep the current title):")
            .await?;
        println!("Current edition: {}", book.edition_number().as_ref());
        let edition = self
            .prompt
            .line("Enter new edition number (or press Enter to keep the current edition):")
            .await?;
        println!("Current copyright: {}", book.copyright().as_ref());
        let copyright = self
            .prompt
            .line("Enter new copyright (or press Enter to keep the current copyright):")
            .await?;

        if title.is_empty() && edition.trim().is_empty() && copyright.is_empty() {
            println!("No changes made.");
            return Ok(());
        }
        let edition_number = match edition.trim() {
            "" => *book.edition_number(),
            given => EditionNumber::new(given.parse::<i32>().map_err(|e| {
                Report::new(e)
                    .change_context(KernelError::Validation)
                    .attach_printable(format!("edition number {given:?} is not a number"))
            })?)?,
        };
        let updated = Book::new(
            book.isbn().clone(),
            keep_or(title, book.title(), BookTitle::new),
            edition_number,
            keep_or(copyright, book.copyright(), Copyright::new),
        );
        self.library.update_book(updated).await?;
        self.library.refresh().await?;
        println!("Book updated successfully.");
        Ok(())
    }

    async fn edit_author(&mut self) -> error_stack::Result<(), KernelError> {
        let (first_name, last_name) = self.prompt.full_name("the author").await?;
        let Some(author) = self
            .library
            .find_author_by_full_name(&first_name, &last_name)
            .cloned()
        else {
            println!("Author not found.");
            return Ok(());
        };

        println!(
            "Current name: {} {}",
            author.first_name(),
            author.last_name()
        );
        let new_first = self
            .prompt
            .line("Enter new first name (or press Enter to keep the current first name):")
            .await?;
        let new_last = self
            .prompt
            .line("Enter new last name (or press Enter to keep the current last name):")
            .await?;

        let updated = Author::new(
            *author.id(),
            keep_or(new_first, author.first_name(), FirstName::new),
            keep_or(new_last, author.last_name(), LastName::new),
        );
        self.library.update_author(updated).await?;
        self.library.refresh().await?;
        println!("Author updated successfully.");
        Ok(())
    }

    async fn add_book(&mut self) -> error_stack::Result<(), KernelError> {
        let title = self.prompt.line("Enter the title of the new book:").await?;
        let isbn = self.prompt.line("Enter the ISBN of the new book:").await?;
        let edition_number = self.prompt.number::<i32>("Enter the edition number:").await?;
        let copyright = self
            .prompt
            .line("Enter the copyright information:")
            .await?;
        let book = Book::try_from(CreateBookDto {
            isbn,
            title,
            edition_number,
            copyright,
        })?;
        if self.library.find_book_by_isbn(book.isbn()).is_some() {
            return Err(Report::new(KernelError::Validation)
                .attach_printable(format!("a book with ISBN {} already exists", book.isbn())));
        }

        let authors = self
            .prompt
            .new_authors()
            .await?
            .into_iter()
            .map(|dto| {
                let unsaved = Author::from(dto);
                self.library
                    .find_author_by_full_name(unsaved.first_name(), unsaved.last_name())
                    .cloned()
                    .unwrap_or(unsaved)
            })
            .collect::<Vec<_>>();
        if self.prompt.is_closed() {
            return Err(Report::new(KernelError::Validation)
                .attach_printable("input closed before the book was complete"));
        }

        self.library.add_book(book, authors).await?;
        self.library.refresh().await?;
        println!("New book added successfully.");
        Ok(())
    }

    async fn delete(&mut self) -> error_stack::Result<(), KernelError> {
        match self.prompt.target("delete").await? {
            Some(Target::Book) => {
                let isbn = self
                    .prompt
                    .line("Enter the ISBN of the book you want to delete:")
                    .await?;
                let isbn = Isbn::new(isbn.trim());
                if self.library.find_book_by_isbn(&isbn).is_none() {
                    println!("Book not found.");
                    return Ok(());
                }
                self.library.delete_book(&isbn).await?;
                self.library.refresh().await?;
                println!("Book deleted successfully.");
            }
            Some(Target::Author) => {
                let (first_name, last_name) = self.prompt.full_name("the author").await?;
                let Some(author_id) = self
                    .library
                    .find_author_by_full_name(&first_name, &last_name)
                    .map(|author| *author.id())
                else {
                    println!("Author not found.");
                    return Ok(());
                };
                self.library.delete_author(&author_id).await?;
                self.library.refresh().await?;
                println!("Author deleted successfully.");
            }
            None => println!("Invalid choice."),
        }
        Ok(())
    }
}

/// The most recent printable attachment, or the context when nothing was attached.
fn reason(report: &Report<KernelError>) -> String {
    report
        .frames()
        .find_map(|frame| match frame.kind() {
            FrameKind::Attachment(AttachmentKind::Printable(printable)) => {
                Some(printable.to_string())
            }
            _ => None,
        })
        .unwrap_or_else(|| report.current_context().to_string())
}

fn keep_or<T: Clone>(answer: String, current: &T, new: impl FnOnce(String) -> T) -> T {
    if answer.is_empty() {
        current.clone()
    } else {
        new(answer)
    }
}
