pub mod dto;

pub use dto::{Dataset, RegistryStatusDto, TenderRow};
