use std::fmt::Display;

use crate::candidates::{Candidates, NodePair};

/// A binary decision variable.
///
/// The first variables of a model stand for node pairs, the remaining
/// ones for edge pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Var(usize);

impl Var {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// `sum(vars) <= 1`
    AtMostOne(Vec<Var>),
    /// `edge <= node`
    Implies { edge: Var, node: Var },
}

impl Constraint {
    pub fn is_satisfied_by(&self, assignment: &[bool]) -> bool {
        match self {
            Constraint::AtMostOne(vars) => {
                vars.iter().filter(|var| assignment[var.index()]).count() <= 1
            }
            Constraint::Implies { edge, node } => {
                !assignment[edge.index()] || assignment[node.index()]
            }
        }
    }
}

/// The 0-1 program whose optimum is the number of triples matched by the
/// best alignment of two graphs.
///
/// Maximizes the number of selected edge pairs subject to
/// - every node is aligned to at most one node of the other graph,
/// - an edge pair is only selected if the node pairs it couples are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    left_node_count: usize,
    right_node_count: usize,
    edge_count: usize,
    constraints: Vec<Constraint>,
}

impl Model {
    pub fn build(candidates: &Candidates) -> Self {
        let left_node_count = candidates.left_nodes().len();
        let right_node_count = candidates.right_nodes().len();
        let edge_count = candidates.edge_pairs().len();

        let mut model = Model {
            left_node_count,
            right_node_count,
            edge_count,
            constraints: Vec::new(),
        };

        let mut constraints = Vec::with_capacity(
            left_node_count + right_node_count + candidates.coupling_count(),
        );

        if right_node_count > 0 {
            for left in 0..left_node_count {
                constraints.push(Constraint::AtMostOne(
                    (0..right_node_count)
                        .map(|right| model.node_var(NodePair::new(left, right)))
                        .collect(),
                ));
            }
        }

        if left_node_count > 0 {
            for right in 0..right_node_count {
                constraints.push(Constraint::AtMostOne(
                    (0..left_node_count)
                        .map(|left| model.node_var(NodePair::new(left, right)))
                        .collect(),
                ));
            }
        }

        for (idx, pair) in candidates.edge_pairs().iter().enumerate() {
            let edge = model.edge_var(idx);
            for coupling in pair.couplings() {
                constraints.push(Constraint::Implies {
                    edge,
                    node: model.node_var(coupling),
                });
            }
        }

        model.constraints = constraints;

        log::info!("Number of possible node matches {}", model.node_variable_count());
        log::info!("Number of possible triple matches {}", model.edge_variable_count());
        log::info!("ILP size: {}", model);

        model
    }

    pub fn node_variable_count(&self) -> usize {
        self.left_node_count * self.right_node_count
    }

    pub fn edge_variable_count(&self) -> usize {
        self.edge_count
    }

    pub fn variable_count(&self) -> usize {
        self.node_variable_count() + self.edge_count
    }

    pub fn node_var(&self, pair: NodePair) -> Var {
        debug_assert!(pair.left < self.left_node_count && pair.right < self.right_node_count);
        Var(pair.left * self.right_node_count + pair.right)
    }

    /// Variable of the edge pair at `idx` in [`Candidates::edge_pairs`].
    pub fn edge_var(&self, idx: usize) -> Var {
        debug_assert!(idx < self.edge_count);
        Var(self.node_variable_count() + idx)
    }

    pub fn node_pair(&self, var: Var) -> Option<NodePair> {
        if var.index() < self.node_variable_count() {
            Some(NodePair::new(
                var.index() / self.right_node_count,
                var.index() % self.right_node_count,
            ))
        } else {
            None
        }
    }

    /// The variables summed up by the objective, i.e. all edge variables.
    pub fn objective(&self) -> impl Iterator<Item = Var> {
        let offset = self.node_variable_count();
        (offset..offset + self.edge_count).map(Var)
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn is_satisfied_by(&self, assignment: &[bool]) -> bool {
        assignment.len() == self.variable_count()
            && self.constraints.iter().all(|c| c.is_satisfied_by(assignment))
    }

    pub fn objective_value(&self, assignment: &[bool]) -> usize {
        self.objective().filter(|var| assignment[var.index()]).count()
    }
}

impl Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let implications = self
            .constraints
            .iter()
            .filter(|c| matches!(c, Constraint::Implies { .. }))
            .count();

        write!(
            f,
            "{} binary variables ({} node + {} triple), {} constraints ({} between nodes and triples)",
            self.variable_count(),
            self.node_variable_count(),
            self.edge_count,
            self.constraints.len(),
            implications
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Graph, Triple};

    fn dog_barks(dog: &str, bark: &str) -> Graph {
        Graph::new(
            vec![Triple::instance(dog, "dog"), Triple::instance(bark, "bark-01")],
            vec![Triple::new("ARG0", bark, dog)],
        )
    }

    fn model() -> Model {
        let candidates =
            Candidates::enumerate(&dog_barks("a", "b"), &dog_barks("x", "y")).unwrap();
        Model::build(&candidates)
    }

    #[test]
    fn test_variables() {
        let model = model();

        assert_eq!(model.node_variable_count(), 4);
        assert_eq!(model.edge_variable_count(), 3);
        assert_eq!(model.variable_count(), 7);

        assert_eq!(model.node_var(NodePair::new(0, 0)), Var(0));
        assert_eq!(model.node_var(NodePair::new(1, 0)), Var(2));
        assert_eq!(model.edge_var(0), Var(4));
        assert_eq!(model.node_pair(Var(3)), Some(NodePair::new(1, 1)));
        assert_eq!(model.node_pair(Var(4)), None);
        assert_eq!(model.objective().collect::<Vec<_>>(), vec![Var(4), Var(5), Var(6)]);
    }

    #[test]
    fn test_constraints() {
        let model = model();

        assert_eq!(
            model.constraints(),
            &[
                Constraint::AtMostOne(vec![Var(0), Var(1)]),
                Constraint::AtMostOne(vec![Var(2), Var(3)]),
                Constraint::AtMostOne(vec![Var(0), Var(2)]),
                Constraint::AtMostOne(vec![Var(1), Var(3)]),
                // arg0(b, a) ~ arg0(y, x)
                Constraint::Implies { edge: Var(4), node: Var(3) },
                Constraint::Implies { edge: Var(4), node: Var(0) },
                // instance(a, dog) ~ instance(x, dog)
                Constraint::Implies { edge: Var(5), node: Var(0) },
                // instance(b, bark-01) ~ instance(y, bark-01)
                Constraint::Implies { edge: Var(6), node: Var(3) },
            ]
        );
        assert_eq!(
            model.to_string(),
            "7 binary variables (4 node + 3 triple), 8 constraints (4 between nodes and triples)"
        );
    }

    #[test]
    fn test_is_satisfied_by() {
        let model = model();

        assert!(model.is_satisfied_by(&[false; 7]));
        assert!(model.is_satisfied_by(&[true, false, false, true, true, true, true]));
        assert_eq!(
            model.objective_value(&[true, false, false, true, true, true, true]),
            3
        );

        // a aligned twice
        assert!(!model.is_satisfied_by(&[true, true, false, false, false, false, false]));
        // x aligned twice
        assert!(!model.is_satisfied_by(&[true, false, true, false, false, false, false]));
        // edge without its nodes
        assert!(!model.is_satisfied_by(&[true, false, false, false, true, false, false]));
        // wrong length
        assert!(!model.is_satisfied_by(&[false; 6]));
    }

    #[test]
    fn test_empty_side_has_no_uniqueness_constraints() {
        let candidates = Candidates::enumerate(&Graph::default(), &dog_barks("x", "y")).unwrap();
        let model = Model::build(&candidates);

        assert_eq!(model.variable_count(), 0);
        assert!(model.constraints().is_empty());
        assert!(model.is_satisfied_by(&[]));
    }
}
