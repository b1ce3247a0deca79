//! Interactive text menu
//!
//! Reads from any `AsyncBufRead` and prints to any `io::Write`, so the whole
//! loop can be driven from a script in tests. Every operation failure is
//! printed and the loop carries on; only I/O errors end it early.

mod prompt;
mod table;

use std::io::{self, Write};

use tokio::io::AsyncBufRead;

use crate::domain::circulation;
use crate::domain::{CirculationPolicy, DomainError};
use crate::infrastructure::Gateway;
use crate::infrastructure::config::{APP_NAME, VERSION};
use crate::models::{BookSummary, TransactionDetails};
use crate::services::{
    NewBook, NewLibrarian, NewMember, catalog_service, circulation_service, librarian_service,
    member_service, report_service,
};

pub use prompt::Prompt;
pub use table::Table;

const MAIN_MENU: &[&str] = &[
    "Book Management",
    "Member Management",
    "Transaction Management",
    "Reports",
    "Exit",
];

const BOOK_MENU: &[&str] = &[
    "Add New Book",
    "Add Book Copy",
    "Add Category",
    "View All Books",
    "Search Books",
    "View Categories",
    "Back to Main Menu",
];

const MEMBER_MENU: &[&str] = &[
    "Register New Member",
    "View All Members",
    "Search Members",
    "Register Librarian",
    "View Librarians",
    "Back to Main Menu",
];

const TRANSACTION_MENU: &[&str] = &[
    "Borrow Book",
    "Return Book",
    "View Active Transactions",
    "View Transaction History",
    "Back to Main Menu",
];

const REPORT_MENU: &[&str] = &[
    "Overdue Books",
    "Popular Books",
    "Member Activity",
    "Back to Main Menu",
];

/// Run the menu until the user exits or input ends.
pub async fn run<R, W>(
    gateway: &Gateway,
    policy: CirculationPolicy,
    input: R,
    out: W,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut menu = Menu {
        gateway,
        policy,
        prompt: Prompt::new(input),
        out,
    };

    match menu.main_loop().await {
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            tracing::debug!("Input closed, leaving menu");
            menu.farewell()
        }
        other => other,
    }
}

struct Menu<'a, R, W> {
    gateway: &'a Gateway,
    policy: CirculationPolicy,
    prompt: Prompt<R>,
    out: W,
}

impl<R, W> Menu<'_, R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    async fn main_loop(&mut self) -> io::Result<()> {
        loop {
            let title = format!("{} v{}", APP_NAME, VERSION);
            match self.choose(&title, 50, MAIN_MENU).await? {
                Some(1) => self.book_menu().await?,
                Some(2) => self.member_menu().await?,
                Some(3) => self.transaction_menu().await?,
                Some(4) => self.report_menu().await?,
                Some(5) => return self.farewell(),
                _ => writeln!(self.out, "\nInvalid choice. Please try again.")?,
            }
        }
    }

    fn farewell(&mut self) -> io::Result<()> {
        writeln!(self.out, "\nThank you for using the {}!", APP_NAME)
    }

    /// Print a numbered menu and read the choice; `None` if it is not a number.
    async fn choose(&mut self, title: &str, rule: usize, options: &[&str]) -> io::Result<Option<usize>> {
        writeln!(self.out, "\n{}", title)?;
        writeln!(self.out, "{}", "=".repeat(rule))?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.out, "{}. {}", i + 1, option)?;
        }
        writeln!(self.out, "{}", "=".repeat(rule))?;

        let label = format!("\nEnter your choice (1-{}): ", options.len());
        let raw = self.prompt.ask(&mut self.out, &label).await?;
        Ok(raw.trim().parse().ok())
    }

    async fn ask(&mut self, label: &str) -> io::Result<String> {
        self.prompt.ask(&mut self.out, label).await
    }

    async fn ask_id(&mut self, label: &str) -> io::Result<Option<i32>> {
        self.prompt.ask_number(&mut self.out, label).await
    }

    fn report_error(&mut self, context: &str, e: &DomainError) -> io::Result<()> {
        if e.is_store_failure() {
            tracing::error!("{}: {}", context, e);
        }
        match e {
            DomainError::Validation(_) => writeln!(self.out, "{}", e),
            _ => writeln!(self.out, "{}: {}", context, e),
        }
    }

    fn print_table(&mut self, table: &Table) -> io::Result<()> {
        if table.is_empty() {
            writeln!(self.out, "No records found.")
        } else {
            write!(self.out, "{}", table)
        }
    }

    async fn book_menu(&mut self) -> io::Result<()> {
        loop {
            match self.choose("Book Management", 30, BOOK_MENU).await? {
                Some(1) => self.add_book().await?,
                Some(2) => self.add_copy().await?,
                Some(3) => self.add_category().await?,
                Some(4) => {
                    let books = catalog_service::list_books(self.gateway).await;
                    self.show_books(books)?;
                }
                Some(5) => {
                    let query = self.ask("Enter title, author or ISBN: ").await?;
                    let books = catalog_service::search_books(self.gateway, &query).await;
                    self.show_books(books)?;
                }
                Some(6) => self.show_categories().await?,
                Some(7) => return Ok(()),
                _ => writeln!(self.out, "\nInvalid choice. Please try again.")?,
            }
        }
    }

    async fn add_book(&mut self) -> io::Result<()> {
        let title = self.ask("Enter book title: ").await?;
        let isbn = self.ask("Enter ISBN: ").await?;
        let Some(publish_year) = self
            .prompt
            .ask_number::<i32, _>(&mut self.out, "Enter publish year: ")
            .await?
        else {
            return Ok(());
        };
        let Some(category_id) = self.ask_id("Enter category ID: ").await? else {
            return Ok(());
        };
        let author = self.ask("Enter author name: ").await?;

        let input = NewBook {
            title,
            isbn,
            publish_year,
            category_id,
            author: Some(author),
        };
        match catalog_service::add_book(self.gateway, input).await {
            Ok(book) => writeln!(self.out, "Book added successfully (ID {}).", book.id),
            Err(e) => self.report_error("Error adding book", &e),
        }
    }

    async fn add_copy(&mut self) -> io::Result<()> {
        let Some(book_id) = self.ask_id("Enter book ID: ").await? else {
            return Ok(());
        };
        let condition = self.ask("Enter book condition: ").await?;

        match catalog_service::add_copy(self.gateway, book_id, Some(&condition)).await {
            Ok(copy) => writeln!(self.out, "Book copy added successfully (copy ID {}).", copy.id),
            Err(e) => self.report_error("Error adding book copy", &e),
        }
    }

    async fn add_category(&mut self) -> io::Result<()> {
        let name = self.ask("Enter category name: ").await?;
        match catalog_service::add_category(self.gateway, &name).await {
            Ok(category) => writeln!(self.out, "Category added successfully (ID {}).", category.id),
            Err(e) => self.report_error("Error adding category", &e),
        }
    }

    fn show_books(&mut self, books: Result<Vec<BookSummary>, DomainError>) -> io::Result<()> {
        let books = match books {
            Ok(books) => books,
            Err(e) => return self.report_error("Error listing books", &e),
        };

        let mut table = Table::new([
            "ID", "Title", "ISBN", "Year", "Category", "Author", "Total", "Available",
        ]);
        for book in books {
            table.add_row([
                book.id.to_string(),
                book.title,
                book.isbn,
                book.publish_year.to_string(),
                book.category.unwrap_or_default(),
                book.author.unwrap_or_default(),
                book.total_copies.to_string(),
                book.available_copies.to_string(),
            ]);
        }
        self.print_table(&table)
    }

    async fn show_categories(&mut self) -> io::Result<()> {
        let categories = match catalog_service::list_categories(self.gateway).await {
            Ok(categories) => categories,
            Err(e) => return self.report_error("Error listing categories", &e),
        };

        let mut table = Table::new(["ID", "Name"]);
        for category in categories {
            table.add_row([category.id.to_string(), category.name]);
        }
        self.print_table(&table)
    }

    async fn member_menu(&mut self) -> io::Result<()> {
        loop {
            match self.choose("Member Management", 30, MEMBER_MENU).await? {
                Some(1) => self.register_member().await?,
                Some(2) => {
                    let members = member_service::list_members(self.gateway).await;
                    self.show_members(members)?;
                }
                Some(3) => {
                    let query = self.ask("Enter name or email: ").await?;
                    let members = member_service::search_members(self.gateway, &query).await;
                    self.show_members(members)?;
                }
                Some(4) => self.register_librarian().await?,
                Some(5) => self.show_librarians().await?,
                Some(6) => return Ok(()),
                _ => writeln!(self.out, "\nInvalid choice. Please try again.")?,
            }
        }
    }

    async fn register_member(&mut self) -> io::Result<()> {
        let input = NewMember {
            name: self.ask("Enter member name: ").await?,
            email: self.ask("Enter email: ").await?,
            phone: self.ask("Enter phone number: ").await?,
            address: self.ask("Enter address: ").await?,
        };

        match member_service::register_member(self.gateway, input).await {
            Ok(member) => writeln!(
                self.out,
                "Member registered successfully (ID {}, expires {}).",
                member.id, member.expire_date
            ),
            Err(e) => self.report_error("Error registering member", &e),
        }
    }

    fn show_members(
        &mut self,
        members: Result<Vec<crate::models::member::Model>, DomainError>,
    ) -> io::Result<()> {
        let members = match members {
            Ok(members) => members,
            Err(e) => return self.report_error("Error listing members", &e),
        };

        let mut table = Table::new(["ID", "Name", "Email", "Phone", "Joined", "Expires"]);
        for member in members {
            table.add_row([
                member.id.to_string(),
                member.name,
                member.email,
                member.phone,
                member.join_date,
                member.expire_date,
            ]);
        }
        self.print_table(&table)
    }

    async fn register_librarian(&mut self) -> io::Result<()> {
        let input = NewLibrarian {
            name: self.ask("Enter librarian name: ").await?,
            email: self.ask("Enter email: ").await?,
            hire_date: self.ask("Enter hire date (YYYY-MM-DD): ").await?,
        };

        match librarian_service::register_librarian(self.gateway, input).await {
            Ok(librarian) => {
                writeln!(self.out, "Librarian registered successfully (ID {}).", librarian.id)
            }
            Err(e) => self.report_error("Error registering librarian", &e),
        }
    }

    async fn show_librarians(&mut self) -> io::Result<()> {
        let librarians = match librarian_service::list_librarians(self.gateway).await {
            Ok(librarians) => librarians,
            Err(e) => return self.report_error("Error listing librarians", &e),
        };

        let mut table = Table::new(["ID", "Name", "Email", "Hired"]);
        for librarian in librarians {
            table.add_row([
                librarian.id.to_string(),
                librarian.name,
                librarian.email,
                librarian.hire_date,
            ]);
        }
        self.print_table(&table)
    }

    async fn transaction_menu(&mut self) -> io::Result<()> {
        loop {
            match self.choose("Transaction Management", 30, TRANSACTION_MENU).await? {
                Some(1) => self.borrow().await?,
                Some(2) => self.return_book().await?,
                Some(3) => {
                    let loans = circulation_service::active_transactions(self.gateway).await;
                    self.show_transactions(loans)?;
                }
                Some(4) => self.history().await?,
                Some(5) => return Ok(()),
                _ => writeln!(self.out, "\nInvalid choice. Please try again.")?,
            }
        }
    }

    async fn borrow(&mut self) -> io::Result<()> {
        let Some(member_id) = self.ask_id("Enter member ID: ").await? else {
            return Ok(());
        };
        let Some(copy_id) = self.ask_id("Enter book copy ID: ").await? else {
            return Ok(());
        };
        let Some(librarian_id) = self.ask_id("Enter librarian ID: ").await? else {
            return Ok(());
        };

        let policy = self.policy;
        match circulation_service::borrow(self.gateway, &policy, member_id, copy_id, librarian_id).await {
            Ok(loan) => writeln!(
                self.out,
                "Book borrowed successfully (transaction {}, due {}).",
                loan.id, loan.due_date
            ),
            Err(e) => self.report_error("Error borrowing book", &e),
        }
    }

    async fn return_book(&mut self) -> io::Result<()> {
        let Some(transaction_id) = self.ask_id("Enter transaction ID: ").await? else {
            return Ok(());
        };
        let Some(librarian_id) = self.ask_id("Enter librarian ID: ").await? else {
            return Ok(());
        };

        match circulation_service::return_book(self.gateway, transaction_id, librarian_id).await {
            Ok(_) => writeln!(self.out, "Book returned successfully."),
            Err(e) => self.report_error("Error returning book", &e),
        }
    }

    async fn history(&mut self) -> io::Result<()> {
        let raw = self.ask("Enter member ID (blank for all): ").await?;
        let member_id = match raw.trim() {
            "" => None,
            id => match id.parse() {
                Ok(id) => Some(id),
                Err(_) => return writeln!(self.out, "Invalid number: '{}'", id),
            },
        };

        let loans = circulation_service::transaction_history(self.gateway, member_id).await;
        self.show_transactions(loans)
    }

    fn show_transactions(
        &mut self,
        loans: Result<Vec<TransactionDetails>, DomainError>,
    ) -> io::Result<()> {
        let loans = match loans {
            Ok(loans) => loans,
            Err(e) => return self.report_error("Error listing transactions", &e),
        };

        let mut table = Table::new(["ID", "Book", "Member", "Copy", "Borrowed", "Due", "Returned"]);
        for loan in loans {
            table.add_row([
                loan.id.to_string(),
                loan.book_title,
                loan.member_name,
                loan.copy_id.to_string(),
                loan.borrow_date,
                loan.due_date,
                loan.return_date.unwrap_or_else(|| "-".to_string()),
            ]);
        }
        self.print_table(&table)
    }

    async fn report_menu(&mut self) -> io::Result<()> {
        loop {
            match self.choose("Reports", 30, REPORT_MENU).await? {
                Some(1) => self.overdue_report().await?,
                Some(2) => self.popular_report().await?,
                Some(3) => self.activity_report().await?,
                Some(4) => return Ok(()),
                _ => writeln!(self.out, "\nInvalid choice. Please try again.")?,
            }
        }
    }

    async fn overdue_report(&mut self) -> io::Result<()> {
        let overdue = match report_service::overdue_books(self.gateway, circulation::now()).await {
            Ok(overdue) => overdue,
            Err(e) => return self.report_error("Error building overdue report", &e),
        };

        let mut table = Table::new(["Transaction ID", "Book", "Member", "Borrow Date", "Due Date"]);
        for loan in overdue {
            table.add_row([
                loan.transaction_id.to_string(),
                loan.book_title,
                loan.member_name,
                loan.borrow_date,
                loan.due_date,
            ]);
        }
        self.print_table(&table)
    }

    async fn popular_report(&mut self) -> io::Result<()> {
        let popular = match report_service::popular_books(
            self.gateway,
            report_service::DEFAULT_POPULAR_LIMIT,
        )
        .await
        {
            Ok(popular) => popular,
            Err(e) => return self.report_error("Error building popular books report", &e),
        };

        let mut table = Table::new(["Book ID", "Title", "Author", "Times Borrowed"]);
        for book in popular {
            table.add_row([
                book.book_id.to_string(),
                book.title,
                book.author.unwrap_or_default(),
                book.times_borrowed.to_string(),
            ]);
        }
        self.print_table(&table)
    }

    async fn activity_report(&mut self) -> io::Result<()> {
        let activity = match report_service::member_activity(self.gateway, circulation::now()).await {
            Ok(activity) => activity,
            Err(e) => return self.report_error("Error building member activity report", &e),
        };

        let mut table = Table::new(["Member ID", "Name", "Total", "Current", "Overdue"]);
        for member in activity {
            table.add_row([
                member.member_id.to_string(),
                member.name,
                member.total_borrowed.to_string(),
                member.currently_borrowed.to_string(),
                member.overdue.to_string(),
            ]);
        }
        self.print_table(&table)
    }
}
