pub mod clubs;
pub mod competition_matches;
pub mod courts;
pub mod team_availability;

pub use competition_matches::{CreateCompetitionMatch, OccupiedSlotRow};
pub use courts::CreateCourt;
pub use team_availability::CreateTeamAvailability;
