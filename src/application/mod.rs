// Application layer: roster use cases on top of the domain and solver adapters

pub mod generator;
pub mod model_builder;
pub mod roster_service;
pub mod schedule;

pub use generator::{CoverageProfile, CoverageRules, GeneratorConfig, Scenario, ScenarioGenerator};
pub use model_builder::{AssignmentKey, ModelBuilder, PenaltyTerm, RosterModel};
pub use roster_service::{RosterError, RosterService, RosterSolution};
pub use schedule::{AssignmentStats, Schedule, SlotCoverage, Violation};
