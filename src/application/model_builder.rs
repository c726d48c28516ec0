// Translates roster tables into a solver-neutral binary program

use crate::domain::{
    entities::{Nurse, Preference},
    models::{Constraint, ObjectiveFunction, OptimizationProblem, SolverConfig, Term, Variable},
    roster::RosterInput,
    value_objects::{Day, PreferenceType, Shift},
};
use std::collections::HashMap;

/// Identifies one assignment decision: does `nurse_id` work `shift` on `day`?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssignmentKey {
    pub nurse_id: u32,
    pub day: Day,
    pub shift: Shift,
}

/// Auxiliary variable that is 1 exactly when `preference` is violated
#[derive(Debug, Clone)]
pub struct PenaltyTerm {
    pub variable: usize,
    pub assignment: usize,
    pub preference: Preference,
}

/// The built problem together with the mapping needed to read results back.
#[derive(Debug, Clone)]
pub struct RosterModel {
    pub problem: OptimizationProblem,
    pub penalties: Vec<PenaltyTerm>,
    assignments: HashMap<AssignmentKey, usize>,
}

impl RosterModel {
    pub fn assignment_index(&self, nurse_id: u32, day: Day, shift: Shift) -> Option<usize> {
        self.assignments
            .get(&AssignmentKey {
                nurse_id,
                day,
                shift,
            })
            .copied()
    }

    pub fn num_assignments(&self) -> usize {
        self.assignments.len()
    }

    /// Preferences whose penalty variable is set in `values`.
    pub fn violated_preferences(&self, values: &[f64]) -> Vec<&Preference> {
        self.penalties
            .iter()
            .filter(|p| values.get(p.variable).is_some_and(|&v| v > 0.5))
            .map(|p| &p.preference)
            .collect()
    }
}

/// Builds the rostering model:
///
/// - one binary `x[n,d,s]` per nurse, day and shift (nurse-major order);
/// - `Σ_s x[n,d,s] ≤ 1` for every nurse and day;
/// - per covered slot, total / senior-like / icu minimums (zero tier minimums are omitted);
/// - per preference, a binary penalty tied to its assignment variable;
/// - minimise the weighted sum of penalties.
pub struct ModelBuilder<'a> {
    input: &'a RosterInput,
    config: SolverConfig,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(input: &'a RosterInput) -> Self {
        Self {
            input,
            config: SolverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(&self) -> RosterModel {
        let input = self.input;
        let num_days = input.days.len();
        let num_shifts = input.shifts.len();
        let index = |n: usize, d: usize, s: usize| (n * num_days + d) * num_shifts + s;

        let mut variables = Vec::with_capacity(input.nurses.len() * num_days * num_shifts);
        let mut assignments = HashMap::with_capacity(variables.capacity());
        for nurse in &input.nurses {
            for &day in &input.days {
                for &shift in &input.shifts {
                    let key = AssignmentKey {
                        nurse_id: nurse.id,
                        day,
                        shift,
                    };
                    assignments.insert(key, variables.len());
                    variables.push(Variable::binary(format!(
                        "x_n{}_{}_{}",
                        nurse.id, day, shift
                    )));
                }
            }
        }

        let mut constraints = Vec::new();

        for (n, nurse) in input.nurses.iter().enumerate() {
            for (d, day) in input.days.iter().enumerate() {
                let terms = (0..num_shifts).map(|s| (index(n, d, s), 1.0)).collect();
                constraints.push(
                    Constraint::leq(terms, 1.0).with_name(format!("one_shift_n{}_{}", nurse.id, day)),
                );
            }
        }

        let tier = |select: fn(&Nurse) -> bool| -> Vec<usize> {
            input
                .nurses
                .iter()
                .enumerate()
                .filter(|(_, nurse)| select(nurse))
                .map(|(n, _)| n)
                .collect()
        };
        let everyone = tier(|_| true);
        let senior_like = tier(|nurse| nurse.skill_level.is_senior_like());
        let icu_only = tier(|nurse| nurse.skill_level.is_icu());

        let coverage = input.coverage_map();
        for (d, &day) in input.days.iter().enumerate() {
            for (s, &shift) in input.shifts.iter().enumerate() {
                let Some(req) = coverage.get(&(day, shift)) else {
                    continue;
                };
                let slot_terms = |members: &[usize]| -> Vec<Term> {
                    members.iter().map(|&n| (index(n, d, s), 1.0)).collect()
                };

                constraints.push(
                    Constraint::geq(slot_terms(&everyone), req.required_total as f64)
                        .with_name(format!("cover_total_{}_{}", day, shift)),
                );
                if req.required_senior > 0 {
                    constraints.push(
                        Constraint::geq(slot_terms(&senior_like), req.required_senior as f64)
                            .with_name(format!("cover_senior_{}_{}", day, shift)),
                    );
                }
                if req.required_icu > 0 {
                    constraints.push(
                        Constraint::geq(slot_terms(&icu_only), req.required_icu as f64)
                            .with_name(format!("cover_icu_{}_{}", day, shift)),
                    );
                }
            }
        }

        let mut penalties = Vec::new();
        let mut objective_terms = Vec::new();
        for (i, pref) in input.effective_preferences().into_iter().enumerate() {
            let key = AssignmentKey {
                nurse_id: pref.nurse_id,
                day: pref.day,
                shift: pref.shift,
            };
            let Some(&assignment) = assignments.get(&key) else {
                continue;
            };

            let penalty = variables.len();
            variables.push(Variable::binary(format!("penalty_pref_{}", i)));

            let link = match pref.preference_type {
                // penalty == x
                PreferenceType::Avoid => {
                    Constraint::eq(vec![(penalty, 1.0), (assignment, -1.0)], 0.0)
                }
                // penalty + x == 1
                PreferenceType::Want => {
                    Constraint::eq(vec![(penalty, 1.0), (assignment, 1.0)], 1.0)
                }
            };
            constraints.push(link.with_name(format!("pref_{}_{}", i, pref.preference_type)));

            objective_terms.push((penalty, pref.weight as f64));
            penalties.push(PenaltyTerm {
                variable: penalty,
                assignment,
                preference: pref.clone(),
            });
        }

        let mut problem = OptimizationProblem::new(ObjectiveFunction::minimize(objective_terms))
            .with_name("nurse_rostering")
            .with_description(format!(
                "{} nurses over {} days x {} shifts with {} preferences",
                input.nurses.len(),
                num_days,
                num_shifts,
                penalties.len()
            ))
            .with_variables(variables)
            .with_config(self.config.clone());
        problem.constraints = constraints;

        tracing::debug!(
            variables = problem.num_variables(),
            constraints = problem.constraints.len(),
            penalties = penalties.len(),
            "roster model built"
        );

        RosterModel {
            problem,
            penalties,
            assignments,
        }
    }
}
