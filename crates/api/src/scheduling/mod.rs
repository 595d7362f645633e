pub mod assigner;
pub mod availability;
pub mod service;
pub mod store;
pub mod types;

pub use assigner::{assign_slots, AssignmentOutcome, AssignmentParams};
pub use availability::{
    assign_start_times, build_availability_map, find_overlaps, AvailabilityError,
    AvailabilityWindow, SlotIntersection, WeekdayPolicy,
};
pub use service::{schedule_competition, ScheduleError, ScheduleRunParams};
pub use store::{MatchStore, NewMatch, OccupiedRange, PgMatchStore, StoreError};
pub use types::{
    CandidateFixture, CategoryCandidates, CategorySchedule, Fixture, MatchStatus, Round,
    UnscheduledReason, UnscheduledRecord, DEFAULT_MATCH_DURATION_MINUTES,
};
