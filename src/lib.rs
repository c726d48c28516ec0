// Domain layer: roster entities, solver-neutral models and the solver contract
pub mod domain;

// Application layer: model building, scenario generation, schedule checks
pub mod application;

// Infrastructure layer: configuration, tables, logging, pipeline
pub mod infrastructure;

// Solver adapters: concrete implementations of SolverService
pub mod solver;

// Re-export commonly used types
pub use domain::{
    Constraint, ConstraintType, CoverageRequirement, DataError, Day, Nurse, ObjectiveFunction,
    OptimizationProblem, OptimizationType, Preference, PreferenceType, RosterInput, ScheduleRow,
    Shift, SkillLevel, Solution, SolutionStatus, SolverBackend, SolverConfig, SolverError,
    SolverService, Variable, VariableType,
};

pub use application::{
    CoverageProfile, GeneratorConfig, ModelBuilder, RosterError, RosterModel, RosterService,
    RosterSolution, Scenario, ScenarioGenerator, Schedule,
};

pub use infrastructure::{RosterConfig, RunError};

pub use solver::SolverFactory;
#[cfg(feature = "cbc")]
pub use solver::CoinCbcSolver;
#[cfg(feature = "highs")]
pub use solver::HighsSolver;
