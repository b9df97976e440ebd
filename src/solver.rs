use std::time::{Duration, Instant};

use good_lp::{
    constraint, solvers::microlp::microlp, variable, Expression, ProblemVariables,
    ResolutionError, Solution as _, SolutionStatus, SolverModel, WithTimeLimit,
};
use thiserror::Error;

use crate::model::{Constraint, Model, Var};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("solver exceeded the time limit of {0:?}")]
    TimeLimit(Duration),
    #[error("solver reported an infeasible model")]
    Infeasible,
    #[error("solver reported an unbounded model")]
    Unbounded,
    #[error("solver returned an assignment that violates the model: {0}")]
    Inconsistent(String),
    #[error("solver failed: {0}")]
    Backend(String),
}

/// An optimal assignment of a [`Model`].
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    objective: f64,
    assignment: Vec<bool>,
}

impl Solution {
    pub fn new(objective: f64, assignment: Vec<bool>) -> Self {
        Self {
            objective,
            assignment,
        }
    }

    /// The all-zero assignment.
    pub fn empty(model: &Model) -> Self {
        Self::new(0.0, vec![false; model.variable_count()])
    }

    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Number of matched triples.
    pub fn matched(&self) -> usize {
        self.objective.round().max(0.0) as usize
    }

    pub fn value(&self, var: Var) -> bool {
        self.assignment[var.index()]
    }

    pub fn assignment(&self) -> &[bool] {
        &self.assignment
    }

    /// Checks that the assignment satisfies the model and that the reported
    /// objective is the one of the assignment.
    pub fn verify(&self, model: &Model) -> Result<(), SolveError> {
        if self.assignment.len() != model.variable_count() {
            return Err(SolveError::Inconsistent(format!(
                "{} values for {} variables",
                self.assignment.len(),
                model.variable_count()
            )));
        }
        if !model.is_satisfied_by(&self.assignment) {
            return Err(SolveError::Inconsistent(
                "constraint violated".to_string(),
            ));
        }
        let objective = model.objective_value(&self.assignment);
        if (self.objective - objective as f64).abs() > 1e-6 {
            return Err(SolveError::Inconsistent(format!(
                "objective {} but {} triples matched",
                self.objective, objective
            )));
        }
        Ok(())
    }
}

/// A mixed-integer solver that finds an optimal assignment of a model.
pub trait Solver {
    fn solve(&self, model: &Model) -> Result<Solution, SolveError>;
}

/// Solver backed by the pure Rust `microlp` solver of `good_lp`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLp {
    quiet: bool,
    time_limit: Option<Duration>,
}

impl MicroLp {
    pub fn new(quiet: bool, time_limit: Option<Duration>) -> Self {
        Self { quiet, time_limit }
    }
}

impl Solver for MicroLp {
    fn solve(&self, model: &Model) -> Result<Solution, SolveError> {
        // nothing to match, selecting nothing is optimal
        if model.edge_variable_count() == 0 {
            return Ok(Solution::empty(model));
        }

        let start = Instant::now();
        let solution = solve(model, self.time_limit)?;

        if !self.quiet {
            log::info!(
                "Solved {} variables in {:?}, objective = {}",
                model.variable_count(),
                start.elapsed(),
                solution.objective()
            );
        }

        Ok(solution)
    }
}

/// Solves the model on the calling thread.
///
/// `microlp` checks the deadline itself. Running out of time is an error
/// even if an incumbent was found, since only optimal solutions give exact
/// scores.
fn solve(model: &Model, time_limit: Option<Duration>) -> Result<Solution, SolveError> {
    let mut problem = ProblemVariables::new();
    let vars = (0..model.variable_count())
        .map(|_| problem.add(variable().binary()))
        .collect::<Vec<_>>();

    let objective: Expression = model.objective().map(|var| vars[var.index()]).sum();

    let mut lp = problem.maximise(objective).using(microlp);
    if let Some(limit) = time_limit {
        lp = lp.with_time_limit(limit.as_secs_f64());
    }

    for c in model.constraints() {
        lp = match c {
            Constraint::AtMostOne(terms) => {
                let sum: Expression = terms.iter().map(|var| vars[var.index()]).sum();
                lp.with(constraint!(sum <= 1))
            }
            Constraint::Implies { edge, node } => {
                let (edge, node) = (vars[edge.index()], vars[node.index()]);
                lp.with(constraint!(edge <= node))
            }
        };
    }

    let solution = lp.solve().map_err(|e| match (e, time_limit) {
        (ResolutionError::Infeasible, _) => SolveError::Infeasible,
        (ResolutionError::Unbounded, _) => SolveError::Unbounded,
        // interrupted before any feasible solution was found
        (ResolutionError::Other(_), Some(limit)) => SolveError::TimeLimit(limit),
        (other, _) => SolveError::Backend(other.to_string()),
    })?;

    if let (SolutionStatus::TimeLimit, Some(limit)) = (solution.status(), time_limit) {
        return Err(SolveError::TimeLimit(limit));
    }

    let assignment = vars
        .iter()
        .map(|&var| solution.value(var) > 0.5)
        .collect::<Vec<_>>();
    let objective = model.objective_value(&assignment) as f64;

    Ok(Solution::new(objective, assignment))
}
