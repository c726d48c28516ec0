// Output schedule: extraction from solver values, invariant checks and statistics

use super::model_builder::RosterModel;
use crate::domain::{
    entities::{ScheduleRow, Slot},
    roster::RosterInput,
    value_objects::{Day, Shift},
};
use std::collections::HashMap;
use std::fmt;

/// A hard constraint the schedule fails to meet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    DoubleBooked {
        nurse_id: u32,
        day: Day,
        shifts: usize,
    },
    Understaffed {
        day: Day,
        shift: Shift,
        tier: &'static str,
        assigned: u32,
        required: u32,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::DoubleBooked {
                nurse_id,
                day,
                shifts,
            } => write!(f, "nurse {} works {} shifts on {}", nurse_id, shifts, day),
            Violation::Understaffed {
                day,
                shift,
                tier,
                assigned,
                required,
            } => write!(
                f,
                "{}/{} has {} {} nurse(s), needs {}",
                day, shift, assigned, tier, required
            ),
        }
    }
}

/// Staffing actually assigned to one slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCoverage {
    pub day: Day,
    pub shift: Shift,
    pub assigned: u32,
    pub senior_like: u32,
    pub icu: u32,
    pub required_total: Option<u32>,
}

/// Descriptive statistics of assigned shifts per nurse
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; undefined for fewer than two nurses
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl AssignmentStats {
    /// Returns `None` for an empty sample.
    pub fn from_counts(counts: &[usize]) -> Option<Self> {
        if counts.is_empty() {
            return None;
        }

        let mut sorted: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let std = (n > 1).then(|| {
            let ss: f64 = sorted.iter().map(|x| (x - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        });

        Some(Self {
            count: n,
            mean,
            std,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted[n - 1],
        })
    }
}

/// Linear interpolation between closest ranks of a sorted, non-empty sample.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

impl fmt::Display for AssignmentStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let std = self.std.map_or_else(|| "NaN".to_string(), |s| format!("{:.6}", s));
        writeln!(f, "count {:>12.6}", self.count as f64)?;
        writeln!(f, "mean  {:>12.6}", self.mean)?;
        writeln!(f, "std   {:>12}", std)?;
        writeln!(f, "min   {:>12.6}", self.min)?;
        writeln!(f, "25%   {:>12.6}", self.q25)?;
        writeln!(f, "50%   {:>12.6}", self.median)?;
        writeln!(f, "75%   {:>12.6}", self.q75)?;
        write!(f, "max   {:>12.6}", self.max)
    }
}

/// One row per (nurse, day, shift), nurse-major then day then shift.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    rows: Vec<ScheduleRow>,
}

impl Schedule {
    pub fn from_rows(rows: Vec<ScheduleRow>) -> Self {
        Self { rows }
    }

    /// Read assignment variables back out of solver values.
    pub fn from_solution(input: &RosterInput, model: &RosterModel, values: &[f64]) -> Self {
        let mut rows = Vec::with_capacity(model.num_assignments());
        for nurse in &input.nurses {
            for &day in &input.days {
                for &shift in &input.shifts {
                    let value = model
                        .assignment_index(nurse.id, day, shift)
                        .and_then(|i| values.get(i).copied())
                        .unwrap_or(0.0);
                    rows.push(ScheduleRow {
                        nurse_id: nurse.id,
                        name: nurse.name.clone(),
                        day,
                        shift,
                        assigned: u8::from(value > 0.5),
                        skill_level: nurse.skill_level,
                    });
                }
            }
        }
        Self { rows }
    }

    pub fn rows(&self) -> &[ScheduleRow] {
        &self.rows
    }

    pub fn assigned(&self) -> impl Iterator<Item = &ScheduleRow> {
        self.rows.iter().filter(|r| r.is_assigned())
    }

    pub fn is_assigned(&self, nurse_id: u32, day: Day, shift: Shift) -> bool {
        self.assigned()
            .any(|r| r.nurse_id == nurse_id && r.day == day && r.shift == shift)
    }

    /// Assigned shift count per nurse, in order of first appearance, zero counts included.
    pub fn shifts_per_nurse(&self) -> Vec<(u32, usize)> {
        let mut counts: Vec<(u32, usize)> = Vec::new();
        for row in &self.rows {
            let pos = match counts.iter().position(|&(id, _)| id == row.nurse_id) {
                Some(pos) => pos,
                None => {
                    counts.push((row.nurse_id, 0));
                    counts.len() - 1
                }
            };
            counts[pos].1 += usize::from(row.is_assigned());
        }
        counts
    }

    /// Statistics over nurses with at least one assigned shift; `None` when nobody works.
    pub fn stats(&self) -> Option<AssignmentStats> {
        let counts: Vec<usize> = self
            .shifts_per_nurse()
            .into_iter()
            .map(|(_, c)| c)
            .filter(|&c| c > 0)
            .collect();
        AssignmentStats::from_counts(&counts)
    }

    /// Staffing per slot of the input calendar.
    pub fn coverage_summary(&self, input: &RosterInput) -> Vec<SlotCoverage> {
        let mut staffed: HashMap<Slot, (u32, u32, u32)> = HashMap::new();
        for row in self.assigned() {
            let entry = staffed.entry((row.day, row.shift)).or_default();
            entry.0 += 1;
            entry.1 += u32::from(row.skill_level.is_senior_like());
            entry.2 += u32::from(row.skill_level.is_icu());
        }

        let coverage = input.coverage_map();
        input
            .slots()
            .map(|(day, shift)| {
                let (assigned, senior_like, icu) =
                    staffed.get(&(day, shift)).copied().unwrap_or_default();
                SlotCoverage {
                    day,
                    shift,
                    assigned,
                    senior_like,
                    icu,
                    required_total: coverage.get(&(day, shift)).map(|c| c.required_total),
                }
            })
            .collect()
    }

    /// Check the hard constraints of `input` against this schedule.
    pub fn violations(&self, input: &RosterInput) -> Vec<Violation> {
        let mut violations = Vec::new();

        let mut per_day: HashMap<(u32, Day), usize> = HashMap::new();
        for row in self.assigned() {
            *per_day.entry((row.nurse_id, row.day)).or_default() += 1;
        }
        for nurse in &input.nurses {
            for &day in &input.days {
                let shifts = per_day.get(&(nurse.id, day)).copied().unwrap_or(0);
                if shifts > 1 {
                    violations.push(Violation::DoubleBooked {
                        nurse_id: nurse.id,
                        day,
                        shifts,
                    });
                }
            }
        }

        let staffed: HashMap<Slot, SlotCoverage> = self
            .coverage_summary(input)
            .into_iter()
            .map(|c| ((c.day, c.shift), c))
            .collect();
        for req in &input.coverage {
            let Some(actual) = staffed.get(&req.slot()) else {
                continue;
            };
            for (tier, assigned, required) in [
                ("total", actual.assigned, req.required_total),
                ("senior", actual.senior_like, req.required_senior),
                ("icu", actual.icu, req.required_icu),
            ] {
                if assigned < required {
                    violations.push(Violation::Understaffed {
                        day: req.day,
                        shift: req.shift,
                        tier,
                        assigned,
                        required,
                    });
                }
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::model_builder::ModelBuilder;
    use crate::domain::{
        entities::{CoverageRequirement, Nurse},
        value_objects::SkillLevel,
    };

    fn input() -> RosterInput {
        RosterInput::new(
            vec![
                Nurse::new(1, "N1", SkillLevel::Senior),
                Nurse::new(2, "N2", SkillLevel::Junior),
                Nurse::new(3, "N3", SkillLevel::Icu),
            ],
            vec![
                CoverageRequirement::new(Day::Mon, Shift::Morning, 2).with_senior(1),
                CoverageRequirement::new(Day::Mon, Shift::Night, 1).with_icu(1),
            ],
            vec![],
        )
    }

    fn schedule_with(input: &RosterInput, on: &[(u32, Day, Shift)]) -> Schedule {
        let model = ModelBuilder::new(input).build();
        let mut values = vec![0.0; model.problem.num_variables()];
        for &(id, day, shift) in on {
            values[model.assignment_index(id, day, shift).unwrap()] = 1.0;
        }
        Schedule::from_solution(input, &model, &values)
    }

    #[test]
    fn test_rows_in_nurse_day_shift_order() {
        let input = input();
        let schedule = schedule_with(&input, &[(2, Day::Mon, Shift::Night)]);
        let keys: Vec<(u32, Shift)> = schedule.rows().iter().map(|r| (r.nurse_id, r.shift)).collect();
        assert_eq!(
            keys,
            vec![
                (1, Shift::Morning),
                (1, Shift::Night),
                (2, Shift::Morning),
                (2, Shift::Night),
                (3, Shift::Morning),
                (3, Shift::Night),
            ]
        );
        assert_eq!(schedule.rows()[3].assigned, 1);
        assert_eq!(schedule.rows()[3].skill_level, SkillLevel::Junior);
        assert_eq!(schedule.assigned().count(), 1);
    }

    #[test]
    fn test_feasible_schedule_has_no_violations() {
        let input = input();
        let schedule = schedule_with(
            &input,
            &[(1, Day::Mon, Shift::Morning), (2, Day::Mon, Shift::Morning), (3, Day::Mon, Shift::Night)],
        );
        assert!(schedule.violations(&input).is_empty());
    }

    #[test]
    fn test_detects_double_booking_and_understaffing() {
        let input = input();
        let schedule = schedule_with(
            &input,
            &[(2, Day::Mon, Shift::Morning), (2, Day::Mon, Shift::Night)],
        );
        let violations = schedule.violations(&input);
        assert!(violations.contains(&Violation::DoubleBooked {
            nurse_id: 2,
            day: Day::Mon,
            shifts: 2
        }));
        assert!(violations.contains(&Violation::Understaffed {
            day: Day::Mon,
            shift: Shift::Morning,
            tier: "total",
            assigned: 1,
            required: 2
        }));
        assert!(violations.contains(&Violation::Understaffed {
            day: Day::Mon,
            shift: Shift::Morning,
            tier: "senior",
            assigned: 0,
            required: 1
        }));
        assert!(violations.contains(&Violation::Understaffed {
            day: Day::Mon,
            shift: Shift::Night,
            tier: "icu",
            assigned: 0,
            required: 1
        }));
        assert_eq!(violations.len(), 4);
    }

    #[test]
    fn test_stats_skip_idle_nurses() {
        let input = input();
        let schedule = schedule_with(
            &input,
            &[(1, Day::Mon, Shift::Morning), (3, Day::Mon, Shift::Night)],
        );
        assert_eq!(schedule.shifts_per_nurse(), vec![(1, 1), (2, 0), (3, 1)]);

        let stats = schedule.stats().unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, 1.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 1.0);
        assert_eq!(stats.std, Some(0.0));
    }

    #[test]
    fn test_stats_of_empty_roster() {
        let input = input();
        assert!(schedule_with(&input, &[]).stats().is_none());
    }

    #[test]
    fn test_quantiles_interpolate() {
        let stats = AssignmentStats::from_counts(&[4, 1, 3, 2]).unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.q25, 1.75);
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.q75, 3.25);
        assert_eq!(stats.max, 4.0);
        let std = stats.std.unwrap();
        assert!((std - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);

        let single = AssignmentStats::from_counts(&[5]).unwrap();
        assert_eq!(single.std, None);
        assert!(AssignmentStats::from_counts(&[]).is_none());
    }

    #[test]
    fn test_coverage_summary_lists_every_slot() {
        let input = input();
        let schedule = schedule_with(&input, &[(3, Day::Mon, Shift::Night)]);
        let summary = schedule.coverage_summary(&input);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[1].assigned, 1);
        assert_eq!(summary[1].senior_like, 1);
        assert_eq!(summary[1].icu, 1);
        assert_eq!(summary[1].required_total, Some(1));
    }
}
