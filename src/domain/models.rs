use super::value_objects::{
    ConstraintType, OptimizationType, SolutionStatus, SolverBackend, VariableType,
};
use serde::{Deserialize, Serialize};

/// Tolerance used when checking solver output against the model.
pub const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// Decision variable in an optimization problem
#[derive(Debug, Clone)]
pub struct Variable {
    pub variable_type: VariableType,
    pub lower_bound: f64,
    pub upper_bound: Option<f64>,
    pub name: String,
}

impl Variable {
    pub fn integer(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Integer,
            lower_bound: 0.0,
            upper_bound: None,
            name: name.into(),
        }
    }

    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Binary,
            lower_bound: 0.0,
            upper_bound: Some(1.0),
            name: name.into(),
        }
    }

    pub fn with_bounds(mut self, lower: f64, upper: Option<f64>) -> Self {
        self.lower_bound = lower;
        self.upper_bound = upper;
        self
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self.variable_type,
            VariableType::Integer | VariableType::Binary
        )
    }
}

/// Sparse linear expression term: (variable index, coefficient)
pub type Term = (usize, f64);

fn evaluate(terms: &[Term], values: &[f64]) -> f64 {
    terms
        .iter()
        .map(|&(i, coeff)| coeff * values.get(i).copied().unwrap_or(0.0))
        .sum()
}

/// Objective function to minimize or maximize.
///
/// An objective without terms is the zero constant.
#[derive(Debug, Clone)]
pub struct ObjectiveFunction {
    pub optimization_type: OptimizationType,
    pub terms: Vec<Term>,
}

impl ObjectiveFunction {
    pub fn new(optimization_type: OptimizationType, terms: Vec<Term>) -> Self {
        Self {
            optimization_type,
            terms,
        }
    }

    pub fn minimize(terms: Vec<Term>) -> Self {
        Self::new(OptimizationType::Minimize, terms)
    }

    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Linear constraint on variables
#[derive(Debug, Clone)]
pub struct Constraint {
    pub constraint_type: ConstraintType,
    pub terms: Vec<Term>,
    pub bound: f64,
    pub name: String,
}

impl Constraint {
    pub fn new(constraint_type: ConstraintType, terms: Vec<Term>, bound: f64) -> Self {
        Self {
            constraint_type,
            terms,
            bound,
            name: String::new(),
        }
    }

    pub fn leq(terms: Vec<Term>, bound: f64) -> Self {
        Self::new(ConstraintType::LessThanOrEqual, terms, bound)
    }

    pub fn eq(terms: Vec<Term>, bound: f64) -> Self {
        Self::new(ConstraintType::Equal, terms, bound)
    }

    pub fn geq(terms: Vec<Term>, bound: f64) -> Self {
        Self::new(ConstraintType::GreaterThanOrEqual, terms, bound)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn violation(&self, values: &[f64]) -> f64 {
        self.constraint_type
            .violation(evaluate(&self.terms, values), self.bound)
    }
}

/// Configuration for the solver
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    /// Wall-clock limit in seconds
    pub time_limit: Option<f64>,
    /// Worker threads requested from the backend
    pub threads: Option<u32>,
    pub gap_tolerance: Option<f64>,
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: SolverBackend::Auto,
            time_limit: Some(60.0),
            threads: Some(8),
            gap_tolerance: None,
            verbose: false,
        }
    }
}

impl SolverConfig {
    pub fn with_backend(mut self, backend: SolverBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    pub fn with_threads(mut self, threads: u32) -> Self {
        self.threads = Some(threads);
        self
    }
}

/// Structural fingerprint of a model: identical inputs must produce identical summaries.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSummary {
    pub num_variables: usize,
    pub num_constraints: usize,
    pub objective_coefficients: Vec<f64>,
}

/// Complete optimization problem
#[derive(Debug, Clone)]
pub struct OptimizationProblem {
    pub name: String,
    pub description: String,
    pub objective: ObjectiveFunction,
    pub constraints: Vec<Constraint>,
    pub variables: Vec<Variable>,
    pub solver_config: SolverConfig,
}

impl OptimizationProblem {
    pub fn new(objective: ObjectiveFunction) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            objective,
            constraints: Vec::new(),
            variables: Vec::new(),
            solver_config: SolverConfig::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn add_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn with_variables(mut self, variables: Vec<Variable>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.solver_config = config;
        self
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_integer_variables(&self) -> usize {
        self.variables.iter().filter(|v| v.is_integer()).count()
    }

    pub fn num_binary_variables(&self) -> usize {
        self.variables
            .iter()
            .filter(|v| v.variable_type == VariableType::Binary)
            .count()
    }

    /// Dense objective coefficients, one per variable.
    pub fn objective_coefficients(&self) -> Vec<f64> {
        let mut coefficients = vec![0.0; self.num_variables()];
        for &(i, coeff) in &self.objective.terms {
            if let Some(c) = coefficients.get_mut(i) {
                *c += coeff;
            }
        }
        coefficients
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            num_variables: self.num_variables(),
            num_constraints: self.constraints.len(),
            objective_coefficients: self.objective_coefficients(),
        }
    }

    pub fn objective_value(&self, values: &[f64]) -> f64 {
        evaluate(&self.objective.terms, values)
    }

    pub fn max_constraint_violation(&self, values: &[f64]) -> f64 {
        self.constraints
            .iter()
            .map(|c| c.violation(values))
            .fold(0.0, f64::max)
    }

    pub fn max_integrality_violation(&self, values: &[f64]) -> f64 {
        self.variables
            .iter()
            .zip(values)
            .filter(|(v, _)| v.is_integer())
            .map(|(_, &x)| (x - x.round()).abs())
            .fold(0.0, f64::max)
    }

    pub fn quality_of(&self, values: &[f64]) -> SolutionQuality {
        SolutionQuality {
            max_constraint_violation: self.max_constraint_violation(values),
            max_integrality_violation: self.max_integrality_violation(values),
        }
    }

    /// Whether `values` assigns every variable and satisfies the whole model.
    pub fn is_satisfied_by(&self, values: &[f64]) -> bool {
        values.len() == self.num_variables()
            && self.quality_of(values).is_within(FEASIBILITY_TOLERANCE)
    }

    /// Constraints without terms reduce to `0 <op> bound`; returns the first one that fails.
    pub fn violated_constant_constraint(&self) -> Option<&Constraint> {
        self.constraints
            .iter()
            .find(|c| c.terms.is_empty() && c.violation(&[]) > FEASIBILITY_TOLERANCE)
    }
}

/// Statistics about the solve process
#[derive(Debug, Clone, Default)]
pub struct SolverStatistics {
    pub solve_time_ms: f64,
    pub num_variables: u32,
    pub num_constraints: u32,
    pub num_integer_vars: u32,
    pub num_binary_vars: u32,
}

impl SolverStatistics {
    pub fn for_problem(problem: &OptimizationProblem, solve_time_ms: f64) -> Self {
        Self {
            solve_time_ms,
            num_variables: problem.num_variables() as u32,
            num_constraints: problem.constraints.len() as u32,
            num_integer_vars: problem.num_integer_variables() as u32,
            num_binary_vars: problem.num_binary_variables() as u32,
        }
    }
}

/// Quality metrics for the solution
#[derive(Debug, Clone, Default)]
pub struct SolutionQuality {
    pub max_constraint_violation: f64,
    pub max_integrality_violation: f64,
}

impl SolutionQuality {
    pub fn is_within(&self, tolerance: f64) -> bool {
        self.max_constraint_violation <= tolerance && self.max_integrality_violation <= tolerance
    }
}

/// Solution to an optimization problem
#[derive(Debug, Clone)]
pub struct Solution {
    pub status: SolutionStatus,
    pub optimal_value: Option<f64>,
    pub variable_values: Vec<f64>,
    pub message: String,
    pub statistics: SolverStatistics,
    pub quality: SolutionQuality,
}

impl Solution {
    pub fn new(status: SolutionStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            optimal_value: None,
            variable_values: Vec::new(),
            message: message.into(),
            statistics: SolverStatistics::default(),
            quality: SolutionQuality::default(),
        }
    }

    pub fn optimal(value: f64, variable_values: Vec<f64>) -> Self {
        Self::with_values(SolutionStatus::Optimal, value, variable_values)
    }

    pub fn feasible(value: f64, variable_values: Vec<f64>) -> Self {
        Self::with_values(SolutionStatus::Feasible, value, variable_values)
    }

    fn with_values(status: SolutionStatus, value: f64, variable_values: Vec<f64>) -> Self {
        Self {
            status,
            optimal_value: Some(value),
            variable_values,
            message: format!("{} solution found", status),
            statistics: SolverStatistics::default(),
            quality: SolutionQuality::default(),
        }
    }

    pub fn with_statistics(mut self, statistics: SolverStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn with_quality(mut self, quality: SolutionQuality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    pub fn is_feasible(&self) -> bool {
        matches!(
            self.status,
            SolutionStatus::Optimal | SolutionStatus::Feasible
        )
    }
}
