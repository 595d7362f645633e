pub mod app;
pub mod error;
pub mod routes;
pub mod scheduling;
pub mod state;

pub use state::AppState;
