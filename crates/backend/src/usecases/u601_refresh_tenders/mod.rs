pub mod executor;
pub mod tender_parser;

pub use executor::RefreshExecutor;
pub use tender_parser::{parse_tender_file, ParseOutcome};
