//! The bills page, where recorded expenses are filtered, totalled, exported
//! and managed.

mod download;
mod export;
mod filter;
mod page;
mod query;
mod table;

pub use download::{bill_file_url, get_bill_file};
pub use export::get_bills_export;
pub use page::{BillsState, get_bills_content, get_bills_page};
