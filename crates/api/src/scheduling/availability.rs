use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use thiserror::Error;
use uuid::Uuid;

use super::types::{CandidateFixture, CategoryCandidates, CategorySchedule};

/// One weekly availability window. Weekday is 0 = Monday .. 6 = Sunday;
/// windows need not be sorted and may overlap each other.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityWindow {
    pub team_id: Uuid,
    pub weekday: i16,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// A simultaneous window of two teams, in minutes since midnight.
/// Internal interval form, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotIntersection {
    pub weekday: u8,
    pub start_minutes: i32,
    pub end_minutes: i32,
}

/// What to do with availability rows whose weekday is outside 0..=6.
/// `Lenient` (the historical behavior) treats them as "no availability that
/// day"; `Strict` fails the whole computation when such a row belongs to a
/// team appearing in the submitted schedules (rows of uninvolved teams are
/// never their problem).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WeekdayPolicy {
    #[default]
    Lenient,
    Strict,
}

#[derive(Debug, Error)]
pub enum AvailabilityError {
    #[error("invalid weekday {weekday} in availability for team {team_id}")]
    InvalidWeekday { team_id: Uuid, weekday: i16 },
}

fn minutes_of(t: NaiveTime) -> i32 {
    // Seconds are dropped; availability granularity is whole minutes.
    (t.hour() * 60 + t.minute()) as i32
}

/// Monday of the ISO week containing `date`.
pub fn week_monday(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

/// Group raw availability rows by team. No validation: a team may list
/// redundant or mutually overlapping windows.
pub fn build_availability_map(
    entries: &[AvailabilityWindow],
) -> HashMap<Uuid, Vec<AvailabilityWindow>> {
    let mut map: HashMap<Uuid, Vec<AvailabilityWindow>> = HashMap::new();
    for window in entries {
        map.entry(window.team_id).or_default().push(*window);
    }
    map
}

/// Intersect two teams' weekly windows, weekday by weekday.
///
/// For each pair of windows on the same weekday the overlap is
/// [max(starts), min(ends)); it counts only if strictly non-empty, so
/// boundary-touching windows do not overlap. Output is sorted by
/// (weekday, start). Either side empty yields no intersections; no
/// fallback availability is assumed.
pub fn find_overlaps(
    home: &[AvailabilityWindow],
    away: &[AvailabilityWindow],
) -> Vec<SlotIntersection> {
    let mut overlaps = Vec::new();

    for weekday in 0..7u8 {
        let day = weekday as i16;
        for h in home.iter().filter(|w| w.weekday == day) {
            for a in away.iter().filter(|w| w.weekday == day) {
                let start = minutes_of(h.start).max(minutes_of(a.start));
                let end = minutes_of(h.end).min(minutes_of(a.end));
                if start < end {
                    overlaps.push(SlotIntersection {
                        weekday,
                        start_minutes: start,
                        end_minutes: end,
                    });
                }
            }
        }
    }

    overlaps.sort_by_key(|s| (s.weekday, s.start_minutes));
    overlaps
}

/// Compute candidate start times for every fixture of every category.
///
/// The anchor is the Monday of the ISO week containing `reference_date`;
/// an intersection on weekday `d` starting at minute `m` becomes the
/// concrete local instant `anchor + d days + m minutes`. Only the start of
/// each overlap is kept; the caller combines it with the fixed match
/// duration. Per-fixture lists come out chronologically ascending because
/// the overlap sort is (weekday, start) and dates grow with weekday for a
/// fixed anchor week. A team with no rows simply produces empty candidate
/// lists.
pub fn assign_start_times(
    categories: &[CategorySchedule],
    entries: &[AvailabilityWindow],
    reference_date: NaiveDate,
    policy: WeekdayPolicy,
) -> Result<Vec<CategoryCandidates>, AvailabilityError> {
    if policy == WeekdayPolicy::Strict {
        let scheduled_teams: HashSet<Uuid> = categories
            .iter()
            .flat_map(|category| category.rounds.iter())
            .flat_map(|round| round.iter())
            .flat_map(|fixture| [fixture.home_team_id, fixture.away_team_id])
            .collect();
        if let Some(bad) = entries
            .iter()
            .find(|w| scheduled_teams.contains(&w.team_id) && !(0..7).contains(&w.weekday))
        {
            return Err(AvailabilityError::InvalidWeekday {
                team_id: bad.team_id,
                weekday: bad.weekday,
            });
        }
    }

    let anchor = week_monday(reference_date);
    let map = build_availability_map(entries);
    let no_windows: Vec<AvailabilityWindow> = Vec::new();

    let result = categories
        .iter()
        .map(|category| CategoryCandidates {
            category_id: category.category_id,
            rounds: category
                .rounds
                .iter()
                .map(|round| {
                    round
                        .iter()
                        .map(|fixture| {
                            let home = map.get(&fixture.home_team_id).unwrap_or(&no_windows);
                            let away = map.get(&fixture.away_team_id).unwrap_or(&no_windows);
                            let start_times = find_overlaps(home, away)
                                .into_iter()
                                .map(|slot| slot_start(anchor, slot))
                                .collect();
                            CandidateFixture {
                                home_team_id: fixture.home_team_id,
                                away_team_id: fixture.away_team_id,
                                start_times,
                            }
                        })
                        .collect()
                })
                .collect(),
        })
        .collect();

    Ok(result)
}

fn slot_start(anchor_monday: NaiveDate, slot: SlotIntersection) -> NaiveDateTime {
    (anchor_monday + Days::new(u64::from(slot.weekday))).and_time(NaiveTime::MIN)
        + Duration::minutes(i64::from(slot.start_minutes))
}
