use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed match duration in minutes. League matches all run the same length;
/// callers may override it per scheduling run.
pub const DEFAULT_MATCH_DURATION_MINUTES: i64 = 90;

/// One round-robin pairing within a round. Fixture generation happens
/// upstream; a team appears at most once per round by construction there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
}

/// One round of play: the fixtures sharing a matchday.
pub type Round = Vec<Fixture>;

/// The full round-robin schedule of one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySchedule {
    pub category_id: Uuid,
    pub rounds: Vec<Round>,
}

/// A fixture annotated with every start time at which both teams are
/// available, chronologically ascending. Empty is a valid terminal state
/// (the pairing has no mutual availability), not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFixture {
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub start_times: Vec<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct CategoryCandidates {
    pub category_id: Uuid,
    pub rounds: Vec<Vec<CandidateFixture>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Scheduled,
    Pending,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::Pending => "pending",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnscheduledReason {
    /// The two teams share no availability window at all.
    NoCandidates,
    /// Every (candidate time, court) combination was already taken.
    NoSlotAvailable,
}

/// Diagnostic output for a fixture the pass could not place. The
/// competition proceeds; these are surfaced for manual follow-up.
#[derive(Debug, Clone, Serialize)]
pub struct UnscheduledRecord {
    pub category_id: Uuid,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub round: i32,
    pub matchday: i32,
    pub reason: UnscheduledReason,
}
