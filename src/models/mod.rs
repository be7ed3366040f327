pub mod child;
pub mod classroom;
pub mod filters;
pub mod report;
pub mod school;
pub mod staff;
