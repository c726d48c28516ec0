// HiGHS Solver Adapter
// Translates the domain model into a HiGHS row problem

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution, SolverConfig, SolverStatistics},
    solver_service::{incumbent_or, trivial_solution, Result, SolverError, SolverService},
    value_objects::{
        ConstraintType, OptimizationType, SolutionStatus as DomainSolutionStatus, VariableType,
    },
};
use highs::{Col, HighsModelStatus, Model, RowProblem, Sense};
use std::time::Instant;

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }

    fn apply_config(model: &mut Model, config: &SolverConfig) {
        if let Some(limit) = config.time_limit {
            model.set_option("time_limit", limit);
        }
        if let Some(threads) = config.threads {
            model.set_option("threads", Self::thread_option(threads));
        }
        if let Some(gap) = config.gap_tolerance {
            model.set_option("mip_rel_gap", gap);
        }
        model.set_option("output_flag", config.verbose);
    }

    /// HiGHS takes the thread count as a C int; larger requests saturate.
    fn thread_option(threads: u32) -> i32 {
        i32::try_from(threads).unwrap_or(i32::MAX)
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for HighsSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        self.validate(problem)?;

        let start_time = Instant::now();

        if let Some(solution) = trivial_solution(problem) {
            let statistics = SolverStatistics::for_problem(problem, 0.0);
            return Ok(solution.with_statistics(statistics));
        }

        let mut pb = RowProblem::default();
        let objective = problem.objective_coefficients();

        let cols: Vec<Col> = problem
            .variables
            .iter()
            .zip(&objective)
            .map(|(var_def, &obj_coeff)| {
                let lower = var_def.lower_bound;
                let integer = var_def.variable_type != VariableType::Continuous;
                match (var_def.upper_bound, integer) {
                    (Some(upper), true) => pb.add_integer_column(obj_coeff, lower..=upper),
                    (Some(upper), false) => pb.add_column(obj_coeff, lower..=upper),
                    (None, true) => pb.add_integer_column(obj_coeff, lower..),
                    (None, false) => pb.add_column(obj_coeff, lower..),
                }
            })
            .collect();

        for constraint in problem.constraints.iter().filter(|c| !c.terms.is_empty()) {
            let terms: Vec<(Col, f64)> = constraint
                .terms
                .iter()
                .map(|&(i, coeff)| (cols[i], coeff))
                .collect();

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    pb.add_row(..=constraint.bound, &terms);
                }
                ConstraintType::Equal => {
                    pb.add_row(constraint.bound..=constraint.bound, &terms);
                }
                ConstraintType::GreaterThanOrEqual => {
                    pb.add_row(constraint.bound.., &terms);
                }
            }
        }

        let sense = match problem.objective.optimization_type {
            OptimizationType::Minimize => Sense::Minimise,
            OptimizationType::Maximize => Sense::Maximise,
        };

        let mut model = pb.optimise(sense);
        Self::apply_config(&mut model, &problem.solver_config);

        tracing::debug!(
            variables = problem.num_variables(),
            constraints = problem.constraints.len(),
            "handing model to HiGHS"
        );

        let solved = model.try_solve().map_err(|status| {
            SolverError::ExecutionFailed(format!("HiGHS failed to run: {:?}", status))
        })?;
        let solve_time = start_time.elapsed().as_secs_f64() * 1000.0;
        let statistics = SolverStatistics::for_problem(problem, solve_time);

        let solution = match solved.status() {
            HighsModelStatus::Optimal => {
                let values = solved.get_solution().columns().to_vec();
                let quality = problem.quality_of(&values);
                let objective = problem.objective_value(&values);
                DomainSolution::optimal(objective, values)
                    .with_quality(quality)
                    .with_message(format!("Optimal solution found for '{}'", problem.name))
            }
            HighsModelStatus::Infeasible => DomainSolution::new(
                DomainSolutionStatus::Infeasible,
                "Problem is infeasible: no solution satisfies all constraints",
            ),
            // With every variable boxed the objective cannot run away
            HighsModelStatus::UnboundedOrInfeasible
                if problem.variables.iter().all(|v| v.upper_bound.is_some()) =>
            {
                DomainSolution::new(
                    DomainSolutionStatus::Infeasible,
                    "Problem is infeasible: no solution satisfies all constraints",
                )
            }
            HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => {
                DomainSolution::new(
                    DomainSolutionStatus::Unbounded,
                    "Problem is unbounded: objective can be improved infinitely",
                )
            }
            HighsModelStatus::ReachedTimeLimit => {
                let values = solved.get_solution().columns().to_vec();
                incumbent_or(problem, values, DomainSolutionStatus::TimeLimit)
            }
            HighsModelStatus::ReachedIterationLimit => {
                let values = solved.get_solution().columns().to_vec();
                incumbent_or(problem, values, DomainSolutionStatus::IterationLimit)
            }
            status => {
                return Err(SolverError::ExecutionFailed(format!(
                    "HiGHS solver returned status: {:?}",
                    status
                )))
            }
        };

        Ok(solution.with_statistics(statistics))
    }

    fn name(&self) -> &str {
        "HiGHS"
    }
}
