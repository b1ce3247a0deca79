pub mod book;
pub mod category;
pub mod copy;
pub mod librarian;
pub mod member;
pub mod transaction;

pub use book::BookSummary;
pub use copy::Availability;
pub use transaction::TransactionDetails;
