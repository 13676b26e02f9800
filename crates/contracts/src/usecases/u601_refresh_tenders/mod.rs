pub mod response;

pub use response::RefreshReport;
