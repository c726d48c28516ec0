// Validated input of one rostering run

use super::entities::{CoverageRequirement, Nurse, Preference, Slot};
use super::value_objects::{Day, Shift};
use std::collections::{HashMap, HashSet};

/// Input data that cannot be turned into a roster model
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DataError {
    #[error("duplicate nurse id {0}")]
    DuplicateNurse(u32),

    #[error("duplicate coverage requirement for {day}/{shift}")]
    DuplicateCoverage { day: Day, shift: Shift },

    #[error("coverage for {day}/{shift}: required_{tier} ({required}) exceeds required_total ({total})")]
    TierExceedsTotal {
        day: Day,
        shift: Shift,
        tier: &'static str,
        required: u32,
        total: u32,
    },

    #[error("coverage for {day}/{shift} lies outside the declared days and shifts")]
    SlotOutsideCalendar { day: Day, shift: Shift },

    #[error("day {0} is declared more than once")]
    DuplicateDay(Day),

    #[error("shift {0} is declared more than once")]
    DuplicateShift(Shift),

    #[error("nurse {nurse_id}: absence probability {value} is outside [0, 1]")]
    AbsenceOutOfRange { nurse_id: u32, value: f64 },

    #[error("preference of nurse {nurse_id} for {day}/{shift} has weight 0")]
    ZeroWeight { nurse_id: u32, day: Day, shift: Shift },
}

/// Nurses, coverage and preferences plus the ordered day/shift universe.
#[derive(Debug, Clone)]
pub struct RosterInput {
    pub nurses: Vec<Nurse>,
    pub coverage: Vec<CoverageRequirement>,
    pub preferences: Vec<Preference>,
    pub days: Vec<Day>,
    pub shifts: Vec<Shift>,
}

impl RosterInput {
    /// Days and shifts are taken from the coverage table in order of first appearance.
    pub fn new(
        nurses: Vec<Nurse>,
        coverage: Vec<CoverageRequirement>,
        preferences: Vec<Preference>,
    ) -> Self {
        let mut days = Vec::new();
        let mut shifts = Vec::new();
        for req in &coverage {
            if !days.contains(&req.day) {
                days.push(req.day);
            }
            if !shifts.contains(&req.shift) {
                shifts.push(req.shift);
            }
        }

        Self {
            nurses,
            coverage,
            preferences,
            days,
            shifts,
        }
    }

    pub fn with_calendar(mut self, days: Vec<Day>, shifts: Vec<Shift>) -> Self {
        self.days = days;
        self.shifts = shifts;
        self
    }

    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.days
            .iter()
            .flat_map(move |&d| self.shifts.iter().map(move |&s| (d, s)))
    }

    pub fn in_calendar(&self, day: Day, shift: Shift) -> bool {
        self.days.contains(&day) && self.shifts.contains(&shift)
    }

    pub fn coverage_map(&self) -> HashMap<Slot, &CoverageRequirement> {
        self.coverage.iter().map(|c| (c.slot(), c)).collect()
    }

    /// Check the tables for inconsistencies the model builder cannot express.
    pub fn validate(&self) -> Result<(), DataError> {
        let mut seen_days = HashSet::new();
        for &day in &self.days {
            if !seen_days.insert(day) {
                return Err(DataError::DuplicateDay(day));
            }
        }
        let mut seen_shifts = HashSet::new();
        for &shift in &self.shifts {
            if !seen_shifts.insert(shift) {
                return Err(DataError::DuplicateShift(shift));
            }
        }

        let mut ids = HashSet::new();
        for nurse in &self.nurses {
            if !ids.insert(nurse.id) {
                return Err(DataError::DuplicateNurse(nurse.id));
            }
            if !(0.0..=1.0).contains(&nurse.absence_prob) {
                return Err(DataError::AbsenceOutOfRange {
                    nurse_id: nurse.id,
                    value: nurse.absence_prob,
                });
            }
        }

        let mut slots = HashSet::new();
        for req in &self.coverage {
            let (day, shift) = req.slot();
            if !slots.insert(req.slot()) {
                return Err(DataError::DuplicateCoverage { day, shift });
            }
            if !self.in_calendar(day, shift) {
                return Err(DataError::SlotOutsideCalendar { day, shift });
            }
            for (tier, required) in [("senior", req.required_senior), ("icu", req.required_icu)] {
                if required > req.required_total {
                    return Err(DataError::TierExceedsTotal {
                        day,
                        shift,
                        tier,
                        required,
                        total: req.required_total,
                    });
                }
            }
        }

        if let Some(p) = self.preferences.iter().find(|p| p.weight == 0) {
            return Err(DataError::ZeroWeight {
                nurse_id: p.nurse_id,
                day: p.day,
                shift: p.shift,
            });
        }

        Ok(())
    }

    /// Preferences that can contribute a penalty term.
    ///
    /// Exact duplicates collapse to their first occurrence. Rows naming an unknown
    /// nurse or a slot outside the calendar are dropped with a warning.
    pub fn effective_preferences(&self) -> Vec<&Preference> {
        let ids: HashSet<u32> = self.nurses.iter().map(|n| n.id).collect();
        let mut seen = HashSet::new();
        let mut kept = Vec::new();

        for pref in &self.preferences {
            if !ids.contains(&pref.nurse_id) {
                tracing::warn!(
                    nurse_id = pref.nurse_id,
                    day = %pref.day,
                    shift = %pref.shift,
                    "dropping preference for unknown nurse"
                );
                continue;
            }
            if !self.in_calendar(pref.day, pref.shift) {
                tracing::warn!(
                    nurse_id = pref.nurse_id,
                    day = %pref.day,
                    shift = %pref.shift,
                    "dropping preference outside the declared days and shifts"
                );
                continue;
            }
            if !seen.insert(pref) {
                tracing::debug!(nurse_id = pref.nurse_id, "dropping duplicate preference");
                continue;
            }
            kept.push(pref);
        }

        kept
    }
}
