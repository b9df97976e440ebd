use std::time::Instant;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::{
    candidates::Candidates,
    config::Config,
    graph::Graph,
    model::Model,
    score::Score,
    solver::{MicroLp, Solver},
    Error, Result,
};

/// Scores one pair of graphs with the solver configured by `config`.
pub fn evaluate(left: &Graph, right: &Graph, config: &Config) -> Result<Score> {
    evaluate_with(left, right, config, &config.solver())
}

/// Scores one pair of graphs: enumerate candidates, build the model, solve
/// it, score the solution. Each phase completes before the next starts.
pub fn evaluate_with<S>(left: &Graph, right: &Graph, config: &Config, solver: &S) -> Result<Score>
where
    S: Solver + ?Sized,
{
    let candidates = measure("Enumerate candidates", || {
        Candidates::enumerate(left, right)
    })?;
    log::debug!("Candidates: {}", candidates);

    let model = measure("Build model", || Model::build(&candidates));

    let solution = measure("Solve model", || solver.solve(&model))?;
    solution.verify(&model)?;

    Ok(Score::from_solution(
        &solution,
        &model,
        &candidates,
        config.detail,
    ))
}

fn measure<R>(desc: &str, func: impl FnOnce() -> R) -> R {
    log::debug!("Start :: {}", desc);
    let start = Instant::now();
    let result = func();
    log::debug!("Finish :: {} took {:?}", desc, start.elapsed());
    result
}

/// Score of a single pair, or why it has none.
pub type Outcome = Result<Score>;

/// Scores a sequence of graph pairs.
pub struct Batch<S = MicroLp> {
    config: Config,
    solver: S,
}

impl Batch<MicroLp> {
    pub fn new(config: Config) -> Self {
        Self {
            solver: config.solver(),
            config,
        }
    }
}

impl<S> Batch<S>
where
    S: Solver + Sync,
{
    pub fn with_solver(config: Config, solver: S) -> Self {
        Self { config, solver }
    }

    /// Scores every pair. A failing pair does not stop the batch, its
    /// outcome is recorded and the remaining pairs are scored.
    pub fn run(&self, pairs: &[(Graph, Graph)]) -> Report {
        let evaluate_pair = |(idx, (left, right)): (usize, &(Graph, Graph))| {
            let outcome = evaluate_with(left, right, &self.config, &self.solver);
            match &outcome {
                Ok(score) => log::info!("pair {}: {}", idx, score),
                Err(e) if e.is_recoverable() => log::warn!("pair {} skipped: {}", idx, e),
                Err(e) => log::error!("pair {} failed: {}", idx, e),
            }
            outcome
        };

        #[cfg(feature = "rayon")]
        let outcomes = if self.config.parallel {
            pairs.par_iter().enumerate().map(&evaluate_pair).collect()
        } else {
            pairs.iter().enumerate().map(&evaluate_pair).collect()
        };

        #[cfg(not(feature = "rayon"))]
        let outcomes = {
            if self.config.parallel {
                log::warn!("parallel scoring requires the `rayon` feature, scoring sequentially");
            }
            pairs.iter().enumerate().map(evaluate_pair).collect()
        };

        Report { outcomes }
    }
}

/// Per-pair outcomes of a batch, in input order.
#[derive(Debug)]
pub struct Report {
    outcomes: Vec<Outcome>,
}

impl Report {
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn scores(&self) -> impl Iterator<Item = &Score> {
        self.outcomes.iter().filter_map(|outcome| outcome.as_ref().ok())
    }

    /// Number of pairs with a score.
    pub fn scored(&self) -> usize {
        self.scores().count()
    }

    /// Number of pairs skipped because the solver ran out of time.
    pub fn skipped(&self) -> usize {
        self.errors().filter(|(_, e)| e.is_recoverable()).count()
    }

    /// Number of pairs with broken input or a broken solve.
    pub fn failed(&self) -> usize {
        self.errors().filter(|(_, e)| !e.is_recoverable()).count()
    }

    /// Errors with the index of their pair.
    pub fn errors(&self) -> impl Iterator<Item = (usize, &Error)> {
        self.outcomes
            .iter()
            .enumerate()
            .filter_map(|(idx, outcome)| outcome.as_ref().err().map(|e| (idx, e)))
    }

    /// Mean F-score over all scored pairs, `None` if no pair was scored.
    pub fn average(&self) -> Option<f64> {
        let (total, count) = self
            .scores()
            .fold((0.0, 0), |(total, count), score| (total + score.f_score, count + 1));

        if count == 0 {
            None
        } else {
            Some(total / count as f64)
        }
    }
}

/// Renders a score with `digits` decimal places.
pub fn format_score(score: f64, digits: usize) -> String {
    format!("{:.*}", digits, score)
}
