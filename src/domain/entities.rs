// Roster entities: plain records loaded from the input tables

use super::value_objects::{Contract, Day, PreferenceType, Shift, SkillLevel};
use serde::{Deserialize, Serialize};

/// A staffing period
pub type Slot = (Day, Shift);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nurse {
    #[serde(rename = "nurse_id")]
    pub id: u32,
    pub name: String,
    pub skill_level: SkillLevel,
    pub contract: Contract,
    pub absence_prob: f64,
}

impl Nurse {
    pub fn new(id: u32, name: impl Into<String>, skill_level: SkillLevel) -> Self {
        Self {
            id,
            name: name.into(),
            skill_level,
            contract: Contract::FullTime,
            absence_prob: 0.0,
        }
    }

    pub fn with_contract(mut self, contract: Contract) -> Self {
        self.contract = contract;
        self
    }

    pub fn with_absence_prob(mut self, absence_prob: f64) -> Self {
        self.absence_prob = absence_prob;
        self
    }
}

/// Minimum staffing for one slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageRequirement {
    pub day: Day,
    pub shift: Shift,
    pub required_total: u32,
    pub required_senior: u32,
    pub required_icu: u32,
}

impl CoverageRequirement {
    pub fn new(day: Day, shift: Shift, required_total: u32) -> Self {
        Self {
            day,
            shift,
            required_total,
            required_senior: 0,
            required_icu: 0,
        }
    }

    pub fn with_senior(mut self, required_senior: u32) -> Self {
        self.required_senior = required_senior;
        self
    }

    pub fn with_icu(mut self, required_icu: u32) -> Self {
        self.required_icu = required_icu;
        self
    }

    pub fn slot(&self) -> Slot {
        (self.day, self.shift)
    }
}

/// A soft request from a nurse about a single slot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Preference {
    pub nurse_id: u32,
    pub day: Day,
    pub shift: Shift,
    pub preference_type: PreferenceType,
    pub weight: u32,
}

impl Preference {
    pub fn want(nurse_id: u32, day: Day, shift: Shift, weight: u32) -> Self {
        Self {
            nurse_id,
            day,
            shift,
            preference_type: PreferenceType::Want,
            weight,
        }
    }

    pub fn avoid(nurse_id: u32, day: Day, shift: Shift, weight: u32) -> Self {
        Self {
            nurse_id,
            day,
            shift,
            preference_type: PreferenceType::Avoid,
            weight,
        }
    }

    pub fn slot(&self) -> Slot {
        (self.day, self.shift)
    }
}

/// One row of the output schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub nurse_id: u32,
    pub name: String,
    pub day: Day,
    pub shift: Shift,
    pub assigned: u8,
    pub skill_level: SkillLevel,
}

impl ScheduleRow {
    pub fn is_assigned(&self) -> bool {
        self.assigned == 1
    }
}
