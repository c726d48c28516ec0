// Domain service interface for solving optimization problems
// Defines the contract that any solver implementation must follow

use super::models::{OptimizationProblem, Solution};
use super::value_objects::SolutionStatus;

/// Error types for the solver service
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Outcome of a problem that needs no backend: a constant row that can never
/// hold, or a model without variables.
pub fn trivial_solution(problem: &OptimizationProblem) -> Option<Solution> {
    if let Some(c) = problem.violated_constant_constraint() {
        return Some(Solution::new(
            SolutionStatus::Infeasible,
            format!("Constraint '{}' cannot be satisfied by any assignment", c.name),
        ));
    }
    if problem.variables.is_empty() {
        return Some(Solution::optimal(0.0, Vec::new()));
    }
    None
}

/// Result of a backend that stopped on a limit: `values` count as a feasible
/// incumbent only if they satisfy every row and integrality, otherwise the
/// solve ends with `status` and no values.
pub fn incumbent_or(
    problem: &OptimizationProblem,
    values: Vec<f64>,
    status: SolutionStatus,
) -> Solution {
    if problem.is_satisfied_by(&values) {
        let quality = problem.quality_of(&values);
        Solution::feasible(problem.objective_value(&values), values)
            .with_quality(quality)
            .with_message(format!("Stopped early ({}), best incumbent kept", status))
    } else {
        Solution::new(status, format!("Solver stopped without an incumbent ({})", status))
    }
}

/// Domain service interface for optimization solvers
///
/// Every backend consumes the same [`OptimizationProblem`], so the roster model is
/// built once and handed to whichever solver the configuration selects.
/// Backends report infeasibility and limits through [`Solution::status`];
/// `Err` is reserved for malformed problems and backend failures.
pub trait SolverService: Send + Sync {
    /// Solve an optimization problem
    fn solve(&self, problem: &OptimizationProblem) -> Result<Solution>;

    /// Validate a problem without solving it
    fn validate(&self, problem: &OptimizationProblem) -> Result<()> {
        let mut errors = Vec::new();
        let num_vars = problem.num_variables();

        for &(i, coeff) in &problem.objective.terms {
            if i >= num_vars {
                errors.push(format!(
                    "Objective references variable {} but problem has {} variables",
                    i, num_vars
                ));
            } else if !coeff.is_finite() {
                errors.push(format!("Objective coefficient of variable {} is not finite", i));
            }
        }

        for (c, constraint) in problem.constraints.iter().enumerate() {
            if !constraint.bound.is_finite() {
                errors.push(format!(
                    "Constraint {} '{}' has a non-finite bound",
                    c, constraint.name
                ));
            }
            for &(i, coeff) in &constraint.terms {
                if i >= num_vars {
                    errors.push(format!(
                        "Constraint {} '{}' references variable {} but problem has {} variables",
                        c, constraint.name, i, num_vars
                    ));
                } else if !coeff.is_finite() {
                    errors.push(format!(
                        "Constraint {} '{}' has a non-finite coefficient",
                        c, constraint.name
                    ));
                }
            }
        }

        for (i, var) in problem.variables.iter().enumerate() {
            if let Some(upper) = var.upper_bound {
                if var.lower_bound > upper {
                    errors.push(format!(
                        "Variable {} '{}' has lower bound ({}) > upper bound ({})",
                        i, var.name, var.lower_bound, upper
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidProblem(errors.join("; ")))
        }
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;
}
