// Synthetic rostering scenarios; one seeded StdRng drives every draw

use crate::domain::{
    entities::{CoverageRequirement, Nurse, Preference},
    roster::RosterInput,
    value_objects::{Contract, Day, PreferenceType, Shift, SkillLevel},
};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

const SKILL_MIX: [(SkillLevel, f64); 3] = [
    (SkillLevel::Junior, 0.5),
    (SkillLevel::Senior, 0.35),
    (SkillLevel::Icu, 0.15),
];
const CONTRACT_MIX: [(Contract, f64); 2] = [(Contract::FullTime, 0.7), (Contract::PartTime, 0.3)];
const ABSENCE_RANGE: std::ops::Range<f64> = 0.01..0.04;
const ICU_ABSENCE_FACTOR: f64 = 0.7;
const PREFERENCES_PER_NURSE: std::ops::RangeInclusive<u32> = 2..=5;
const AVOID_PROBABILITY: f64 = 0.6;
const WEIGHT_RANGE: std::ops::RangeInclusive<u32> = 1..=5;

/// Which coverage table to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageProfile {
    /// Flat weekday staffing every day, no skill minimums, no preferences
    Basic,
    /// Weekend uplift, senior and icu minimums, random preferences
    #[default]
    Complex,
}

impl FromStr for CoverageProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(CoverageProfile::Basic),
            "complex" => Ok(CoverageProfile::Complex),
            other => Err(format!(
                "unknown coverage profile '{}' (expected basic or complex)",
                other
            )),
        }
    }
}

/// Staffing thresholds of the generated coverage table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageRules {
    pub weekday_total: u32,
    pub weekend_total: u32,
    pub night_total: u32,
    pub senior_min: u32,
    pub icu_min: u32,
}

impl Default for CoverageRules {
    fn default() -> Self {
        Self {
            weekday_total: 5,
            weekend_total: 6,
            night_total: 3,
            senior_min: 1,
            icu_min: 1,
        }
    }
}

impl CoverageRules {
    pub fn requirement(
        &self,
        profile: CoverageProfile,
        day: Day,
        shift: Shift,
    ) -> CoverageRequirement {
        let weekend = profile == CoverageProfile::Complex && day.is_weekend();
        let total = if shift.is_night() {
            self.night_total
        } else if weekend {
            self.weekend_total
        } else {
            self.weekday_total
        };

        let req = CoverageRequirement::new(day, shift, total);
        if profile == CoverageProfile::Basic || total == 0 {
            return req;
        }

        let icu = if shift.is_night() || weekend {
            self.icu_min.min(total)
        } else {
            0
        };
        req.with_senior(self.senior_min.min(total)).with_icu(icu)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub nurse_count: usize,
    pub days: Vec<Day>,
    pub shifts: Vec<Shift>,
    pub seed: u64,
    pub profile: CoverageProfile,
    pub rules: CoverageRules,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            nurse_count: 20,
            days: Day::WEEK.to_vec(),
            shifts: Shift::ALL.to_vec(),
            seed: 42,
            profile: CoverageProfile::Complex,
            rules: CoverageRules::default(),
        }
    }
}

/// The three generated tables
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub nurses: Vec<Nurse>,
    pub coverage: Vec<CoverageRequirement>,
    pub preferences: Vec<Preference>,
}

impl Scenario {
    pub fn into_input(self) -> RosterInput {
        RosterInput::new(self.nurses, self.coverage, self.preferences)
    }
}

pub struct ScenarioGenerator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl ScenarioGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    pub fn generate(&mut self) -> Scenario {
        let nurses = self.nurses();
        let coverage = self.coverage();
        let preferences = match self.config.profile {
            CoverageProfile::Basic => Vec::new(),
            CoverageProfile::Complex => self.preferences(&nurses),
        };

        tracing::info!(
            nurses = nurses.len(),
            slots = coverage.len(),
            preferences = preferences.len(),
            seed = self.config.seed,
            "scenario generated"
        );

        Scenario {
            nurses,
            coverage,
            preferences,
        }
    }

    fn nurses(&mut self) -> Vec<Nurse> {
        let n = self.config.nurse_count;
        let skills: Vec<SkillLevel> = (0..n).map(|_| pick(&mut self.rng, &SKILL_MIX)).collect();
        let contracts: Vec<Contract> =
            (0..n).map(|_| pick(&mut self.rng, &CONTRACT_MIX)).collect();
        let absences: Vec<f64> = (0..n)
            .map(|_| self.rng.random_range(ABSENCE_RANGE))
            .collect();

        skills
            .into_iter()
            .zip(contracts)
            .zip(absences)
            .enumerate()
            .map(|(i, ((skill, contract), absence))| {
                let absence = if skill.is_icu() {
                    absence * ICU_ABSENCE_FACTOR
                } else {
                    absence
                };
                Nurse::new(i as u32, format!("Nurse_{}", i + 1), skill)
                    .with_contract(contract)
                    .with_absence_prob((absence * 1000.0).round() / 1000.0)
            })
            .collect()
    }

    /// Coverage table for the configured calendar; draws nothing from the RNG.
    pub fn coverage(&self) -> Vec<CoverageRequirement> {
        let GeneratorConfig {
            days,
            shifts,
            profile,
            rules,
            ..
        } = &self.config;
        days.iter()
            .flat_map(|&day| {
                shifts
                    .iter()
                    .map(move |&shift| rules.requirement(*profile, day, shift))
            })
            .collect()
    }

    fn preferences(&mut self, nurses: &[Nurse]) -> Vec<Preference> {
        let mut seen = HashSet::new();
        let mut preferences = Vec::new();

        for nurse in nurses {
            let count = self.rng.random_range(PREFERENCES_PER_NURSE);
            for _ in 0..count {
                let (Some(&day), Some(&shift)) = (
                    self.config.days.choose(&mut self.rng),
                    self.config.shifts.choose(&mut self.rng),
                ) else {
                    return preferences;
                };
                let preference_type = if self.rng.random::<f64>() < AVOID_PROBABILITY {
                    PreferenceType::Avoid
                } else {
                    PreferenceType::Want
                };
                let pref = Preference {
                    nurse_id: nurse.id,
                    day,
                    shift,
                    preference_type,
                    weight: self.rng.random_range(WEIGHT_RANGE),
                };
                if seen.insert(pref.clone()) {
                    preferences.push(pref);
                }
            }
        }

        preferences
    }
}

/// Categorical draw; the last category absorbs rounding in the weights.
fn pick<T: Copy>(rng: &mut StdRng, weights: &[(T, f64)]) -> T {
    let mut u = rng.random::<f64>();
    for &(value, p) in weights {
        if u < p {
            return value;
        }
        u -= p;
    }
    weights[weights.len() - 1].0
}
