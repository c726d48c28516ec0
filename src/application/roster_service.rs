// Use case: solve one rostering instance end to end

use super::model_builder::ModelBuilder;
use super::schedule::{Schedule, SlotCoverage, Violation};
use crate::domain::{
    entities::Preference,
    models::{ModelSummary, SolverConfig, SolverStatistics},
    roster::{DataError, RosterInput},
    solver_service::{SolverError, SolverService},
    value_objects::SolutionStatus,
};
use crate::solver::SolverFactory;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("data error: {0}")]
    Data(#[from] DataError),

    /// Backend could not be created; raised before any solve
    #[error("solver setup error: {0}")]
    Setup(SolverError),

    /// Backend rejected the model or failed while solving
    #[error("solver failure: {0}")]
    Execution(SolverError),

    #[error("solver failure: no feasible solution found (status={status}): {message}")]
    NoFeasibleSolution {
        status: SolutionStatus,
        message: String,
    },

    #[error("solver failure: returned schedule breaks {count} hard constraint(s), first: {first}")]
    InvalidSchedule { count: usize, first: Violation },
}

/// A solved roster
#[derive(Debug, Clone)]
pub struct RosterSolution {
    pub schedule: Schedule,
    /// Staffing per slot, in calendar order
    pub coverage: Vec<SlotCoverage>,
    pub status: SolutionStatus,
    /// Total weight of violated preferences
    pub objective: f64,
    pub violated_preferences: Vec<Preference>,
    pub summary: ModelSummary,
    pub statistics: SolverStatistics,
    pub solver_name: String,
}

pub struct RosterService {
    solver: Arc<dyn SolverService>,
    config: SolverConfig,
}

impl RosterService {
    pub fn new(solver: Arc<dyn SolverService>, config: SolverConfig) -> Self {
        Self { solver, config }
    }

    /// Pick the backend named in `config`; fails before any solve if it is unavailable.
    pub fn from_config(config: SolverConfig) -> Result<Self, RosterError> {
        let solver =
            SolverFactory::create_from_backend(config.backend).map_err(RosterError::Setup)?;
        Ok(Self::new(solver, config))
    }

    pub fn solve(&self, input: &RosterInput) -> Result<RosterSolution, RosterError> {
        input.validate()?;

        let model = ModelBuilder::new(input)
            .with_config(self.config.clone())
            .build();

        tracing::info!(
            solver = self.solver.name(),
            variables = model.problem.num_variables(),
            constraints = model.problem.constraints.len(),
            time_limit = ?self.config.time_limit,
            threads = ?self.config.threads,
            "solving roster"
        );

        let solution = self
            .solver
            .solve(&model.problem)
            .map_err(RosterError::Execution)?;
        if !solution.is_feasible() {
            tracing::error!(status = %solution.status, "no feasible roster");
            return Err(RosterError::NoFeasibleSolution {
                status: solution.status,
                message: solution.message,
            });
        }

        let schedule = Schedule::from_solution(input, &model, &solution.variable_values);
        let violations = schedule.violations(input);
        if let Some(first) = violations.first() {
            return Err(RosterError::InvalidSchedule {
                count: violations.len(),
                first: first.clone(),
            });
        }

        let violated_preferences = model
            .violated_preferences(&solution.variable_values)
            .into_iter()
            .cloned()
            .collect();
        let objective = solution
            .optimal_value
            .unwrap_or_else(|| model.problem.objective_value(&solution.variable_values));

        tracing::info!(
            status = %solution.status,
            objective,
            solve_time_ms = solution.statistics.solve_time_ms,
            "roster solved"
        );

        Ok(RosterSolution {
            coverage: schedule.coverage_summary(input),
            schedule,
            status: solution.status,
            objective,
            violated_preferences,
            summary: model.problem.summary(),
            statistics: solution.statistics,
            solver_name: self.solver.name().to_string(),
        })
    }
}
