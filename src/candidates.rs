use std::{
    collections::{HashMap, HashSet},
    fmt::Display,
    iter,
};

use crate::{
    graph::{Graph, Triple},
    normalize::normalize,
    Result,
};

/// A hypothesized alignment of a node of the left graph (by index into
/// [`Candidates::left_nodes`]) with a node of the right graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePair {
    pub left: usize,
    pub right: usize,
}

impl NodePair {
    pub fn new(left: usize, right: usize) -> Self {
        Self { left, right }
    }
}

/// A hypothesized alignment of a triple of the left graph with a triple
/// of the right graph, together with the node pairs it depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgePair {
    /// Index into [`Candidates::left_triples`].
    pub left: usize,
    /// Index into [`Candidates::right_triples`].
    pub right: usize,
    pub source: NodePair,
    /// `None` if both targets are the same constant.
    pub target: Option<NodePair>,
}

impl EdgePair {
    /// The node pairs that must be aligned for this pair to be aligned.
    pub fn couplings(&self) -> impl Iterator<Item = NodePair> {
        iter::once(self.source).chain(self.target)
    }
}

/// All node pairs and edge pairs that may take part in an alignment of two
/// graphs.
///
/// Node pairs are the full cross product of both node sets. Edge pairs are
/// restricted to triples with the same label whose sources form a node pair
/// and whose targets either form a node pair or are equal constants.
#[derive(Debug, Default)]
pub struct Candidates {
    left: Side,
    right: Side,
    edge_pairs: Vec<EdgePair>,
}

impl Candidates {
    pub fn enumerate(left_graph: &Graph, right_graph: &Graph) -> Result<Self> {
        let left = Side::new(left_graph)?;
        let right = Side::new(right_graph)?;

        let mut right_by_label = HashMap::<&str, Vec<usize>>::new();
        for (idx, triple) in right.triples.iter().enumerate() {
            right_by_label
                .entry(triple.label.as_str())
                .or_default()
                .push(idx);
        }

        let mut edge_pairs = Vec::new();

        for (left_idx, left_triple) in left.triples.iter().enumerate() {
            let right_indices = match right_by_label.get(left_triple.label.as_str()) {
                Some(indices) => indices,
                None => continue,
            };

            let left_source = left.source_nodes[left_idx];
            let left_target = left.target_nodes[left_idx];

            for &right_idx in right_indices {
                let source = NodePair::new(left_source, right.source_nodes[right_idx]);

                let target = match (left_target, right.target_nodes[right_idx]) {
                    (Some(l), Some(r)) => Some(NodePair::new(l, r)),
                    (None, None) if left_triple.target == right.triples[right_idx].target => None,
                    // differing constants, or a node facing a constant
                    _ => continue,
                };

                edge_pairs.push(EdgePair {
                    left: left_idx,
                    right: right_idx,
                    source,
                    target,
                });
            }
        }

        Ok(Self {
            left,
            right,
            edge_pairs,
        })
    }

    pub fn left_nodes(&self) -> &[String] {
        &self.left.nodes
    }

    pub fn right_nodes(&self) -> &[String] {
        &self.right.nodes
    }

    /// Normalized relation triples followed by normalized instance triples.
    pub fn left_triples(&self) -> &[Triple] {
        &self.left.triples
    }

    pub fn right_triples(&self) -> &[Triple] {
        &self.right.triples
    }

    /// Number of triples of the left graph, instances included.
    pub fn left_size(&self) -> usize {
        self.left.triples.len()
    }

    /// Number of triples of the right graph, instances included.
    pub fn right_size(&self) -> usize {
        self.right.triples.len()
    }

    pub fn node_pair_count(&self) -> usize {
        self.left.nodes.len() * self.right.nodes.len()
    }

    /// Node pairs in row-major order, left node first.
    pub fn node_pairs(&self) -> impl Iterator<Item = NodePair> + '_ {
        (0..self.left.nodes.len())
            .flat_map(move |left| (0..self.right.nodes.len()).map(move |right| NodePair::new(left, right)))
    }

    pub fn edge_pairs(&self) -> &[EdgePair] {
        &self.edge_pairs
    }

    pub fn coupling_count(&self) -> usize {
        self.edge_pairs.iter().map(|pair| pair.couplings().count()).sum()
    }
}

impl Display for Candidates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{node pairs: {}, edge pairs: {}, couplings: {}}}",
            self.node_pair_count(),
            self.edge_pairs.len(),
            self.coupling_count()
        )
    }
}

/// One graph prepared for enumeration.
#[derive(Debug, Default)]
struct Side {
    nodes: Vec<String>,
    triples: Vec<Triple>,
    // node index of each triple's source
    source_nodes: Vec<usize>,
    // node index of each triple's target, `None` for constants
    target_nodes: Vec<Option<usize>>,
}

impl Side {
    fn new(graph: &Graph) -> Result<Self> {
        graph.validate()?;

        let nodes = graph.nodes().map(String::from).collect::<Vec<_>>();
        let index = nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.as_str(), idx))
            .collect::<HashMap<_, _>>();

        let capacity = graph.relation_count() + graph.node_count();
        let mut side = Side {
            nodes: Vec::with_capacity(graph.node_count()),
            triples: Vec::with_capacity(capacity),
            source_nodes: Vec::with_capacity(capacity),
            target_nodes: Vec::with_capacity(capacity),
        };
        let mut seen = HashSet::with_capacity(capacity);

        // instances are relations too
        let relations = graph.relation_triples().iter().map(|t| (t, true));
        let instances = graph.instance_triples().iter().map(|t| (t, false));

        for (triple, is_relation) in relations.chain(instances) {
            // validated: every source is a node
            let source = match index.get(triple.source.as_str()) {
                Some(&source) => source,
                None => continue,
            };
            let target = if is_relation {
                index.get(triple.target.as_str()).copied()
            } else {
                None
            };

            let normalized = Triple::new(
                normalize(&triple.label),
                triple.source.clone(),
                match target {
                    Some(_) => triple.target.clone(),
                    None => normalize(&triple.target),
                },
            );

            if !seen.insert(normalized.clone()) {
                log::debug!("dropping duplicate triple {}", normalized);
                continue;
            }

            side.triples.push(normalized);
            side.source_nodes.push(source);
            side.target_nodes.push(target);
        }

        side.nodes = nodes;
        Ok(side)
    }
}
