// Pipeline steps behind the CLI commands

use super::config::RosterConfig;
use super::tables::{self, TableError};
use crate::application::{
    RosterError, RosterService, RosterSolution, Scenario, ScenarioGenerator, Violation,
};

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Roster(#[from] RosterError),
}

/// Generate a scenario and write its three tables into the data directory.
pub fn run_generate(config: &RosterConfig) -> Result<Scenario, RunError> {
    let scenario = ScenarioGenerator::new(config.scenario.clone()).generate();
    tables::save_scenario(&config.data_dir, &scenario)?;
    tracing::info!(dir = %config.data_dir.display(), "scenario tables written");
    Ok(scenario)
}

/// Load the tables, solve, and write the schedule.
///
/// The solution file is only written after a successful solve.
pub fn run_solve(config: &RosterConfig) -> Result<RosterSolution, RunError> {
    let service = RosterService::from_config(config.solver.clone())?;
    let input = tables::load_input(&config.data_dir)?;
    let solution = service.solve(&input)?;

    let path = config.solution_path();
    tables::save_schedule(&path, &solution.schedule)?;
    tracing::info!(path = %path.display(), "schedule written");
    Ok(solution)
}

/// Re-check an existing solution file against the input tables.
pub fn run_check(config: &RosterConfig) -> Result<Vec<Violation>, RunError> {
    let input = tables::load_input(&config.data_dir)?;
    input.validate().map_err(RosterError::from)?;
    let schedule = tables::load_schedule(&config.solution_path())?;
    Ok(schedule.violations(&input))
}
