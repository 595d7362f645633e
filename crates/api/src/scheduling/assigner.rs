use std::collections::HashMap;

use chrono::{Days, Duration, NaiveDate, NaiveDateTime};
use tracing::{debug, info, warn};
use uuid::Uuid;

use infra::models::CompetitionMatchRow;

use super::store::{MatchStore, NewMatch, OccupiedRange, StoreError};
use super::types::{
    CandidateFixture, CategoryCandidates, MatchStatus, UnscheduledReason, UnscheduledRecord,
};

pub struct AssignmentParams {
    pub competition_id: Uuid,
    /// Courts in preference order; among courts free at the same time the
    /// first listed wins.
    pub court_ids: Vec<Uuid>,
    /// Monday anchor of round 1; round n is stamped with this date plus
    /// 7 * (n - 1) days. Display metadata only, no part of the overlap math.
    pub first_round_week_start: NaiveDate,
    pub match_duration: Duration,
}

pub struct AssignmentOutcome {
    /// Every row created by the pass, scheduled and pending alike.
    pub matches: Vec<CompetitionMatchRow>,
    pub unscheduled: Vec<UnscheduledRecord>,
}

/// Per-court sorted interval index, owned by a single assignment run.
/// Seeded from the prefetch and grown monotonically as matches commit;
/// a performance cache only — the store constraint is the correctness
/// guarantee against other writers.
#[derive(Debug, Default)]
struct BusyIndex {
    by_court: HashMap<Uuid, Vec<(NaiveDateTime, NaiveDateTime)>>,
}

impl BusyIndex {
    fn from_ranges(ranges: &[OccupiedRange]) -> Self {
        let mut index = Self::default();
        for range in ranges {
            index.block(range.court_id, range.start_time, range.end_time);
        }
        index
    }

    /// Half-open overlap test: back-to-back intervals sharing a boundary
    /// do not conflict.
    fn is_free(&self, court_id: Uuid, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        match self.by_court.get(&court_id) {
            None => true,
            Some(slots) => {
                let before_end = slots.partition_point(|&(s, _)| s < end);
                slots[..before_end].iter().all(|&(_, e)| e <= start)
            }
        }
    }

    fn block(&mut self, court_id: Uuid, start: NaiveDateTime, end: NaiveDateTime) {
        let slots = self.by_court.entry(court_id).or_default();
        let at = slots.partition_point(|&(s, _)| s < start);
        slots.insert(at, (start, end));
    }
}

/// Global [min, max) window of interest across every candidate timestamp,
/// widened by one match duration so occupancy overlapping the final
/// candidate's play window is seen. None when no fixture has candidates.
fn candidate_span(
    categories: &[CategoryCandidates],
    duration: Duration,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let mut span: Option<(NaiveDateTime, NaiveDateTime)> = None;
    for category in categories {
        for round in &category.rounds {
            for fixture in round {
                for &start in &fixture.start_times {
                    span = Some(match span {
                        None => (start, start),
                        Some((min, max)) => (min.min(start), max.max(start)),
                    });
                }
            }
        }
    }
    span.map(|(min, max)| (min, max + duration))
}

/// Greedy first-fit court/time assignment over a whole competition.
///
/// Single sequential pass in input order: per fixture, candidate times are
/// tried earliest first and courts in `court_ids` order within a time, so
/// time priority beats court preference. The first free pair that the store
/// accepts wins; a store-level `SlotConflict` means another writer took the
/// slot, so the interval is blocked in memory and the next court is tried.
/// Any other store error aborts the pass, leaving earlier commits in place.
pub async fn assign_slots<S: MatchStore>(
    store: &S,
    categories: &[CategoryCandidates],
    params: &AssignmentParams,
) -> Result<AssignmentOutcome, StoreError> {
    let mut busy = match candidate_span(categories, params.match_duration) {
        Some((from, to)) => {
            let ranges = store.occupied_ranges(&params.court_ids, from, to).await?;
            debug!(
                occupied = ranges.len(),
                %from,
                %to,
                "prefetched court occupancy"
            );
            BusyIndex::from_ranges(&ranges)
        }
        None => BusyIndex::default(),
    };

    let mut matches = Vec::new();
    let mut unscheduled = Vec::new();

    for category in categories {
        for (round_index, round) in category.rounds.iter().enumerate() {
            let round_number = round_index as i32 + 1;
            let round_week_start =
                params.first_round_week_start + Days::new(7 * round_index as u64);

            for fixture in round {
                if fixture.start_times.is_empty() {
                    let row = store
                        .insert_match(&pending_match(
                            params,
                            category.category_id,
                            fixture,
                            round_number,
                            round_week_start,
                        ))
                        .await?;
                    matches.push(row);
                    unscheduled.push(unscheduled_record(
                        category.category_id,
                        fixture,
                        round_number,
                        UnscheduledReason::NoCandidates,
                    ));
                    continue;
                }

                let mut placed = false;
                'candidates: for &start in &fixture.start_times {
                    let end = start + params.match_duration;
                    for &court_id in &params.court_ids {
                        if !busy.is_free(court_id, start, end) {
                            continue;
                        }

                        let attempt = NewMatch {
                            competition_id: params.competition_id,
                            category_id: category.category_id,
                            home_team_id: fixture.home_team_id,
                            away_team_id: fixture.away_team_id,
                            court_id: Some(court_id),
                            start_time: Some(start),
                            end_time: Some(end),
                            round: round_number,
                            matchday: round_number,
                            round_week_start,
                            status: MatchStatus::Scheduled,
                        };

                        match store.insert_match(&attempt).await {
                            Ok(row) => {
                                busy.block(court_id, start, end);
                                debug!(%court_id, %start, round = round_number, "scheduled match");
                                matches.push(row);
                                placed = true;
                                break 'candidates;
                            }
                            Err(StoreError::SlotConflict) => {
                                // Raced by another writer; remember the slot
                                // as taken and try the next court.
                                warn!(%court_id, %start, "slot conflict on insert, trying next court");
                                busy.block(court_id, start, end);
                            }
                            Err(e) => return Err(e),
                        }
                    }
                }

                if !placed {
                    let row = store
                        .insert_match(&pending_match(
                            params,
                            category.category_id,
                            fixture,
                            round_number,
                            round_week_start,
                        ))
                        .await?;
                    matches.push(row);
                    unscheduled.push(unscheduled_record(
                        category.category_id,
                        fixture,
                        round_number,
                        UnscheduledReason::NoSlotAvailable,
                    ));
                }
            }
        }
    }

    info!(
        created = matches.len(),
        unscheduled = unscheduled.len(),
        "assignment pass finished"
    );

    Ok(AssignmentOutcome {
        matches,
        unscheduled,
    })
}

fn pending_match(
    params: &AssignmentParams,
    category_id: Uuid,
    fixture: &CandidateFixture,
    round_number: i32,
    round_week_start: NaiveDate,
) -> NewMatch {
    NewMatch {
        competition_id: params.competition_id,
        category_id,
        home_team_id: fixture.home_team_id,
        away_team_id: fixture.away_team_id,
        court_id: None,
        start_time: None,
        end_time: None,
        round: round_number,
        matchday: round_number,
        round_week_start,
        status: MatchStatus::Pending,
    }
}

fn unscheduled_record(
    category_id: Uuid,
    fixture: &CandidateFixture,
    round_number: i32,
    reason: UnscheduledReason,
) -> UnscheduledRecord {
    UnscheduledRecord {
        category_id,
        home_team_id: fixture.home_team_id,
        away_team_id: fixture.away_team_id,
        round: round_number,
        matchday: round_number,
        reason,
    }
}
