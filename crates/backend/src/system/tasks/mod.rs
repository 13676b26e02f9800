pub mod worker;

pub use worker::RefreshWorker;
