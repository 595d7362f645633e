pub mod availability;
pub mod courts;
pub mod scheduling;
