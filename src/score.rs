use std::fmt::Display;

use crate::{
    candidates::Candidates,
    config::Detail,
    graph::Triple,
    model::Model,
    solver::Solution,
};

/// Matched nodes and triples of an optimal alignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alignment {
    pub nodes: Vec<(String, String)>,
    pub triples: Vec<(Triple, Triple)>,
}

impl Alignment {
    fn new(solution: &Solution, model: &Model, candidates: &Candidates) -> Self {
        let nodes = candidates
            .node_pairs()
            .filter(|&pair| solution.value(model.node_var(pair)))
            .map(|pair| {
                (
                    candidates.left_nodes()[pair.left].clone(),
                    candidates.right_nodes()[pair.right].clone(),
                )
            })
            .collect();

        let triples = candidates
            .edge_pairs()
            .iter()
            .enumerate()
            .filter(|&(idx, _)| solution.value(model.edge_var(idx)))
            .map(|(_, pair)| {
                (
                    candidates.left_triples()[pair.left].clone(),
                    candidates.right_triples()[pair.right].clone(),
                )
            })
            .collect();

        Self { nodes, triples }
    }
}

impl Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Matched nodes:")?;
        for (left, right) in &self.nodes {
            writeln!(f, "  {} -> {}", left, right)?;
        }
        writeln!(f, "Matched triples:")?;
        for (left, right) in &self.triples {
            writeln!(f, "  {} -> {}", left, right)?;
        }
        Ok(())
    }
}

/// Precision, recall and F-score of the best alignment of two graphs.
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    /// Number of matched triples.
    pub matched: usize,
    /// Number of triples of the left graph, instances included.
    pub left_size: usize,
    /// Number of triples of the right graph, instances included.
    pub right_size: usize,
    pub precision: f64,
    pub recall: f64,
    pub f_score: f64,
    /// Present if [`Detail::WithAlignmentDetail`] was requested.
    pub alignment: Option<Alignment>,
}

impl Score {
    /// Precision is taken over the smaller graph and recall over the
    /// larger one, which makes the F-score symmetric.
    ///
    /// An empty graph scores `0.0`, as do two graphs without any overlap.
    pub fn new(matched: usize, left_size: usize, right_size: usize) -> Self {
        let (precision, recall) = if left_size == 0 || right_size == 0 {
            (0.0, 0.0)
        } else {
            (
                matched as f64 / left_size.min(right_size) as f64,
                matched as f64 / left_size.max(right_size) as f64,
            )
        };

        let denominator = precision + recall;
        let f_score = if denominator.abs() < 1e-6 {
            0.0
        } else {
            2.0 * precision * recall / denominator
        };

        Self {
            matched,
            left_size,
            right_size,
            precision,
            recall,
            f_score,
            alignment: None,
        }
    }

    pub fn from_solution(
        solution: &Solution,
        model: &Model,
        candidates: &Candidates,
        detail: Detail,
    ) -> Self {
        let mut score = Score::new(
            solution.matched(),
            candidates.left_size(),
            candidates.right_size(),
        );

        log::debug!("Number of triples matched: {}", score.matched);
        log::debug!("Triples in first graph: {}", score.left_size);
        log::debug!("Triples in second graph: {}", score.right_size);

        if detail == Detail::WithAlignmentDetail {
            score.alignment = Some(Alignment::new(solution, model, candidates));
        }

        score
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "P: {:.4}, R: {:.4}, F: {:.4} ({} of {}/{} triples)",
            self.precision, self.recall, self.f_score, self.matched, self.left_size, self.right_size
        )
    }
}
