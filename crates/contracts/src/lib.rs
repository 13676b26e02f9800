pub mod enums;
pub mod projections;
pub mod usecases;
