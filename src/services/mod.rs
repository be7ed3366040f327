pub mod days;
pub mod export;
pub mod filters;
pub mod reports;
