// Domain value objects representing core business concepts

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type of decision variable in the optimization problem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableType {
    /// Continuous real number (x ∈ ℝ)
    Continuous,
    /// Integer number (x ∈ ℤ)
    Integer,
    /// Binary variable (x ∈ {0, 1})
    Binary,
}

/// Type of constraint comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintType {
    /// Less than or equal (≤)
    LessThanOrEqual,
    /// Equal (=)
    Equal,
    /// Greater than or equal (≥)
    GreaterThanOrEqual,
}

impl ConstraintType {
    /// Amount by which `lhs` misses `bound`; zero when satisfied.
    pub fn violation(&self, lhs: f64, bound: f64) -> f64 {
        match self {
            ConstraintType::LessThanOrEqual => (lhs - bound).max(0.0),
            ConstraintType::Equal => (lhs - bound).abs(),
            ConstraintType::GreaterThanOrEqual => (bound - lhs).max(0.0),
        }
    }
}

/// Direction of optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationType {
    /// Minimize the objective function
    Minimize,
    /// Maximize the objective function
    Maximize,
}

/// Status of the optimization solution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// Found optimal solution
    Optimal,
    /// Found feasible solution (may not be optimal)
    Feasible,
    /// Problem has no feasible solution
    Infeasible,
    /// Objective can be improved infinitely
    Unbounded,
    /// Time limit reached without an incumbent
    TimeLimit,
    /// Iteration limit reached
    IterationLimit,
}

impl fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolutionStatus::Optimal => write!(f, "Optimal"),
            SolutionStatus::Feasible => write!(f, "Feasible"),
            SolutionStatus::Infeasible => write!(f, "Infeasible"),
            SolutionStatus::Unbounded => write!(f, "Unbounded"),
            SolutionStatus::TimeLimit => write!(f, "Time Limit Reached"),
            SolutionStatus::IterationLimit => write!(f, "Iteration Limit Reached"),
        }
    }
}

/// Solver backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverBackend {
    /// Automatically select best available solver
    #[default]
    Auto,
    /// COIN-OR CBC solver
    #[serde(alias = "cbc")]
    CoinCbc,
    /// HiGHS solver
    Highs,
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverBackend::Auto => write!(f, "Auto"),
            SolverBackend::CoinCbc => write!(f, "COIN-OR CBC"),
            SolverBackend::Highs => write!(f, "HiGHS"),
        }
    }
}

impl FromStr for SolverBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(SolverBackend::Auto),
            "cbc" | "coin_cbc" | "coin-cbc" => Ok(SolverBackend::CoinCbc),
            "highs" => Ok(SolverBackend::Highs),
            other => Err(format!(
                "unknown solver backend '{}' (expected auto, cbc or highs)",
                other
            )),
        }
    }
}

/// Skill tier of a nurse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Junior,
    Senior,
    Icu,
}

impl SkillLevel {
    /// Senior and ICU nurses both count towards the senior minimum.
    pub fn is_senior_like(&self) -> bool {
        matches!(self, SkillLevel::Senior | SkillLevel::Icu)
    }

    pub fn is_icu(&self) -> bool {
        matches!(self, SkillLevel::Icu)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Junior => "junior",
            SkillLevel::Senior => "senior",
            SkillLevel::Icu => "icu",
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Employment contract of a nurse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Contract {
    FullTime,
    PartTime,
}

/// Whether a nurse wants or wants to avoid a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferenceType {
    Want,
    Avoid,
}

impl FromStr for PreferenceType {
    type Err = String;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "want" => Ok(PreferenceType::Want),
            "avoid" => Ok(PreferenceType::Avoid),
            other => Err(format!("unknown preference type '{}'", other)),
        }
    }
}

impl fmt::Display for PreferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferenceType::Want => write!(f, "want"),
            PreferenceType::Avoid => write!(f, "avoid"),
        }
    }
}

/// Day of the fixed seven-day cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    #[serde(alias = "Monday", alias = "mon")]
    Mon,
    #[serde(alias = "Tuesday", alias = "tue")]
    Tue,
    #[serde(alias = "Wednesday", alias = "wed")]
    Wed,
    #[serde(alias = "Thursday", alias = "thu")]
    Thu,
    #[serde(alias = "Friday", alias = "fri")]
    Fri,
    #[serde(alias = "Saturday", alias = "sat")]
    Sat,
    #[serde(alias = "Sunday", alias = "sun")]
    Sun,
}

impl Day {
    pub const WEEK: [Day; 7] = [
        Day::Mon,
        Day::Tue,
        Day::Wed,
        Day::Thu,
        Day::Fri,
        Day::Sat,
        Day::Sun,
    ];

    pub fn is_weekend(&self) -> bool {
        matches!(self, Day::Sat | Day::Sun)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Mon => "Mon",
            Day::Tue => "Tue",
            Day::Wed => "Wed",
            Day::Thu => "Thu",
            Day::Fri => "Fri",
            Day::Sat => "Sat",
            Day::Sun => "Sun",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shift within a day. Serialized with the one-letter codes used in the tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Shift {
    #[serde(rename = "M", alias = "morning")]
    Morning,
    #[serde(rename = "A", alias = "afternoon")]
    Afternoon,
    #[serde(rename = "N", alias = "night")]
    Night,
}

impl Shift {
    pub const ALL: [Shift; 3] = [Shift::Morning, Shift::Afternoon, Shift::Night];

    pub fn is_night(&self) -> bool {
        matches!(self, Shift::Night)
    }

    pub fn code(&self) -> &'static str {
        match self {
            Shift::Morning => "M",
            Shift::Afternoon => "A",
            Shift::Night => "N",
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
