pub mod models;
pub mod repos;
