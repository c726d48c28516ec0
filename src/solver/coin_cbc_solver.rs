// COIN-OR CBC adapter through good_lp

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution, SolverConfig, SolverStatistics},
    solver_service::{incumbent_or, trivial_solution, Result, SolverError, SolverService},
    value_objects::{
        ConstraintType, OptimizationType, SolutionStatus as DomainSolutionStatus, VariableType,
    },
};
use good_lp::{
    solvers::coin_cbc::{self, CoinCbcProblem},
    variable, variables, Expression, ResolutionError, Solution as GoodLpSolutionTrait,
    SolutionStatus as GoodLpStatus, SolverModel, Variable as GoodLpVariable,
};
use std::time::Instant;

pub struct CoinCbcSolver;

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self
    }

    fn apply_config(model: &mut CoinCbcProblem, config: &SolverConfig) {
        if let Some(limit) = config.time_limit {
            model.set_parameter("sec", &limit.to_string());
        }
        if let Some(threads) = config.threads {
            model.set_parameter("threads", &threads.to_string());
        }
        if let Some(gap) = config.gap_tolerance {
            model.set_parameter("ratioGap", &gap.to_string());
        }
        model.set_parameter("log", if config.verbose { "1" } else { "0" });
    }

    /// Map CBC's outcome onto the domain status. A stop on the time or gap limit
    /// keeps the incumbent only if it satisfies the model.
    fn classify(
        problem: &OptimizationProblem,
        status: GoodLpStatus,
        values: Vec<f64>,
    ) -> Result<DomainSolution> {
        match status {
            GoodLpStatus::Optimal if problem.is_satisfied_by(&values) => {
                let quality = problem.quality_of(&values);
                Ok(DomainSolution::optimal(problem.objective_value(&values), values)
                    .with_quality(quality)
                    .with_message(format!("Optimal solution found for '{}'", problem.name)))
            }
            GoodLpStatus::Optimal => Err(SolverError::ExecutionFailed(
                "CBC reported an optimum that violates the model".to_string(),
            )),
            GoodLpStatus::TimeLimit | GoodLpStatus::GapLimit => Ok(incumbent_or(
                problem,
                values,
                DomainSolutionStatus::TimeLimit,
            )),
        }
    }
}

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for CoinCbcSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        self.validate(problem)?;

        let start_time = Instant::now();
        let elapsed_ms = || start_time.elapsed().as_secs_f64() * 1000.0;

        if let Some(solution) = trivial_solution(problem) {
            let statistics = SolverStatistics::for_problem(problem, elapsed_ms());
            return Ok(solution.with_statistics(statistics));
        }

        let mut vars = variables!();
        let mut lp_variables: Vec<GoodLpVariable> = Vec::with_capacity(problem.num_variables());

        for var_def in &problem.variables {
            let lower = var_def.lower_bound;
            let upper = var_def.upper_bound.unwrap_or(f64::INFINITY);

            let var = match var_def.variable_type {
                VariableType::Binary => vars.add(variable().binary().name(&var_def.name)),
                VariableType::Integer => vars.add(
                    variable()
                        .integer()
                        .min(lower)
                        .max(upper)
                        .name(&var_def.name),
                ),
                VariableType::Continuous => {
                    vars.add(variable().min(lower).max(upper).name(&var_def.name))
                }
            };
            lp_variables.push(var);
        }

        // good_lp minimises, so negate for maximisation
        let sign = match problem.objective.optimization_type {
            OptimizationType::Minimize => 1.0,
            OptimizationType::Maximize => -1.0,
        };
        let mut obj_expr: Expression = 0.into();
        for &(i, coeff) in &problem.objective.terms {
            obj_expr += (sign * coeff) * lp_variables[i];
        }

        let mut lp_model = vars.minimise(obj_expr).using(coin_cbc::coin_cbc);
        Self::apply_config(&mut lp_model, &problem.solver_config);

        for constraint in problem.constraints.iter().filter(|c| !c.terms.is_empty()) {
            let mut lhs: Expression = 0.into();
            for &(i, coeff) in &constraint.terms {
                lhs += coeff * lp_variables[i];
            }

            lp_model = match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => lp_model.with(lhs.leq(constraint.bound)),
                ConstraintType::Equal => lp_model.with(lhs.eq(constraint.bound)),
                ConstraintType::GreaterThanOrEqual => lp_model.with(lhs.geq(constraint.bound)),
            };
        }

        tracing::debug!(
            variables = problem.num_variables(),
            constraints = problem.constraints.len(),
            "handing model to CBC"
        );

        let solution_result = lp_model.solve();
        let solve_time = elapsed_ms();
        let statistics = SolverStatistics::for_problem(problem, solve_time);

        match solution_result {
            Ok(sol) => {
                let variable_values: Vec<f64> =
                    lp_variables.iter().map(|&var| sol.value(var)).collect();
                let solution = Self::classify(problem, sol.status(), variable_values)?;
                Ok(solution.with_statistics(statistics))
            }
            Err(ResolutionError::Infeasible) => Ok(DomainSolution::new(
                DomainSolutionStatus::Infeasible,
                "Problem is infeasible: no solution satisfies all constraints",
            )
            .with_statistics(statistics)),
            Err(ResolutionError::Unbounded) => Ok(DomainSolution::new(
                DomainSolutionStatus::Unbounded,
                "Problem is unbounded: objective can be improved infinitely",
            )
            .with_statistics(statistics)),
            Err(ResolutionError::Other("Stopped")) => Ok(DomainSolution::new(
                DomainSolutionStatus::TimeLimit,
                "CBC stopped before finding a feasible solution",
            )
            .with_statistics(statistics)),
            Err(e) => Err(SolverError::ExecutionFailed(format!("{:?}", e))),
        }
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Constraint, ObjectiveFunction, Variable};

    #[test]
    fn test_small_binary_program() {
        // min 2a + b  s.t. a + b >= 1, a <= 0
        let problem = OptimizationProblem::new(ObjectiveFunction::minimize(vec![
            (0, 2.0),
            (1, 1.0),
        ]))
        .with_name("small")
        .with_variables(vec![Variable::binary("a"), Variable::binary("b")])
        .add_constraint(Constraint::geq(vec![(0, 1.0), (1, 1.0)], 1.0))
        .add_constraint(Constraint::leq(vec![(0, 1.0)], 0.0));

        let solution = CoinCbcSolver::new().solve(&problem).unwrap();
        assert!(solution.is_optimal());
        assert!((solution.optimal_value.unwrap() - 1.0).abs() < 1e-6);
        assert_eq!(solution.variable_values[1].round(), 1.0);
    }

    #[test]
    fn test_constant_conflict_is_infeasible() {
        let problem = OptimizationProblem::new(ObjectiveFunction::minimize(vec![]))
            .add_constraint(Constraint::geq(vec![], 1.0).with_name("empty_slot"));

        let solution = CoinCbcSolver::new().solve(&problem).unwrap();
        assert_eq!(solution.status, DomainSolutionStatus::Infeasible);
        assert!(solution.message.contains("empty_slot"));
    }

    /// a + b >= 1 over two binaries, minimise 2a + b
    fn cover_problem() -> OptimizationProblem {
        OptimizationProblem::new(ObjectiveFunction::minimize(vec![(0, 2.0), (1, 1.0)]))
            .with_variables(vec![Variable::binary("a"), Variable::binary("b")])
            .add_constraint(Constraint::geq(vec![(0, 1.0), (1, 1.0)], 1.0))
    }

    #[test]
    fn test_gap_stop_is_feasible_not_optimal() {
        let solution =
            CoinCbcSolver::classify(&cover_problem(), GoodLpStatus::GapLimit, vec![1.0, 0.0])
                .unwrap();
        assert_eq!(solution.status, DomainSolutionStatus::Feasible);
        assert_eq!(solution.optimal_value, Some(2.0));
    }

    #[test]
    fn test_proven_optimum_keeps_its_status() {
        let solution =
            CoinCbcSolver::classify(&cover_problem(), GoodLpStatus::Optimal, vec![0.0, 1.0])
                .unwrap();
        assert!(solution.is_optimal());
        assert_eq!(solution.optimal_value, Some(1.0));
    }

    #[test]
    fn test_time_stop_without_incumbent() {
        let solution =
            CoinCbcSolver::classify(&cover_problem(), GoodLpStatus::TimeLimit, vec![0.0, 0.0])
                .unwrap();
        assert_eq!(solution.status, DomainSolutionStatus::TimeLimit);
        assert!(solution.variable_values.is_empty());
    }

    #[test]
    fn test_optimum_violating_the_model_is_an_error() {
        let err = CoinCbcSolver::classify(&cover_problem(), GoodLpStatus::Optimal, vec![0.0, 0.0])
            .unwrap_err();
        assert!(matches!(err, SolverError::ExecutionFailed(_)));
    }
}
