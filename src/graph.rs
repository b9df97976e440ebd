use std::{
    collections::HashSet, fmt::Display, fs::File, io::Read, ops::Deref, path::Path,
    str::FromStr, time::Instant,
};

use crate::{normalize::normalize, Error, Result};

use linereader::LineReader;

mod penman;

/// Relation label of the triple that names a node's concept.
pub const INSTANCE: &str = "instance";

/// A `(label, source, target)` fact.
///
/// For instance triples the source is the node and the target its concept.
/// For relation triples the target is either another node or a constant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    pub label: String,
    pub source: String,
    pub target: String,
}

impl Triple {
    pub fn new(
        label: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn instance(node: impl Into<String>, concept: impl Into<String>) -> Self {
        Self::new(INSTANCE, node, concept)
    }
}

impl Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({}, {})", self.label, self.source, self.target)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    instances: Vec<Triple>,
    relations: Vec<Triple>,
}

impl Graph {
    pub fn new(instances: Vec<Triple>, relations: Vec<Triple>) -> Self {
        Self {
            instances,
            relations,
        }
    }

    /// One `instance(node, concept)` triple per node.
    pub fn instance_triples(&self) -> &[Triple] {
        &self.instances
    }

    pub fn relation_triples(&self) -> &[Triple] {
        &self.relations
    }

    pub fn node_count(&self) -> usize {
        self.instances.len()
    }

    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.instances.iter().map(|t| t.source.as_str())
    }

    /// Checks the invariants every graph must satisfy before it can be
    /// turned into a model.
    pub fn validate(&self) -> Result<()> {
        let mut nodes = HashSet::with_capacity(self.instances.len());

        for triple in &self.instances {
            if normalize(&triple.label) != INSTANCE {
                return Err(Error::MalformedTriple(format!(
                    "{}: instance triple expected",
                    triple
                )));
            }
            check_fields(triple)?;
            if !nodes.insert(triple.source.as_str()) {
                return Err(Error::DuplicateNode(triple.source.clone()));
            }
        }

        for triple in &self.relations {
            check_fields(triple)?;
            if !nodes.contains(triple.source.as_str()) {
                return Err(Error::MalformedTriple(format!(
                    "{}: source is not a node",
                    triple
                )));
            }
        }

        Ok(())
    }
}

fn check_fields(triple: &Triple) -> Result<()> {
    if triple.label.trim().is_empty()
        || triple.source.trim().is_empty()
        || triple.target.trim().is_empty()
    {
        return Err(Error::MalformedTriple(format!("{}: empty field", triple)));
    }
    Ok(())
}

impl Display for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "|V|: {}, |E|: {}",
            self.node_count(),
            self.relation_count()
        )
    }
}

/// Parses a single graph in PENMAN notation.
impl FromStr for Graph {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        penman::parse(input, 1)
    }
}

/// A graph written in GDL, e.g. `(a:Dog), (b:Bark), (b)-[:ARG0]->(a)`.
///
/// Node variables become node identifiers, the first label of a node its
/// concept and the relationship type the relation label. GDL labels start
/// with an uppercase letter and contain only alphanumerics and `_`, so
/// concepts like `bark-01` are written as `Bark_01`. Normalization takes
/// care of the case.
pub struct GdlGraph(Graph);

impl Deref for GdlGraph {
    type Target = Graph;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<GdlGraph> for Graph {
    fn from(gdl_graph: GdlGraph) -> Self {
        gdl_graph.0
    }
}

impl FromStr for GdlGraph {
    type Err = Error;

    fn from_str(gdl: &str) -> Result<Self> {
        let gdl_graph = gdl.parse::<gdl::Graph>()?;

        let mut sorted_nodes = gdl_graph.nodes().collect::<Vec<_>>();
        sorted_nodes.sort_by_key(|node| node.id());

        let mut instances = Vec::with_capacity(sorted_nodes.len());
        for node in sorted_nodes {
            let concept = node.labels().next().ok_or_else(|| {
                Error::MalformedTriple(format!("node `{}` has no label", node.variable()))
            })?;
            instances.push(Triple::instance(node.variable(), concept.to_string()));
        }

        let mut sorted_rels = gdl_graph.relationships().collect::<Vec<_>>();
        sorted_rels.sort_by_key(|rel| (rel.source(), rel.target()));

        let mut relations = Vec::with_capacity(sorted_rels.len());
        for rel in sorted_rels {
            let label = rel.rel_type().ok_or_else(|| {
                Error::MalformedTriple(format!(
                    "relationship ({})-->({}) has no type",
                    rel.source(),
                    rel.target()
                ))
            })?;
            relations.push(Triple::new(label, rel.source(), rel.target()));
        }

        Ok(GdlGraph(Graph::new(instances, relations)))
    }
}

/// Reads all graphs from a file of PENMAN graphs separated by blank lines.
///
/// Lines starting with `#` are comments.
pub fn read(path: &Path) -> Result<Vec<Graph>> {
    log::info!("Reading from: {:?}", path);
    let start = Instant::now();
    let file = File::open(path)?;
    let graphs = read_from(LineReader::new(file))?;
    log::info!("Parsing {} graphs: {:?}", graphs.len(), start.elapsed());
    Ok(graphs)
}

/// Reads two graph files and pairs their graphs up in file order.
pub fn read_pairs(left: &Path, right: &Path) -> Result<Vec<(Graph, Graph)>> {
    let left = read(left)?;
    let right = read(right)?;

    if left.len() != right.len() {
        return Err(Error::PairCountMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    Ok(left.into_iter().zip(right).collect())
}

fn read_from<R>(mut lines: LineReader<R>) -> Result<Vec<Graph>>
where
    R: Read,
{
    let mut graphs = Vec::new();
    let mut block = String::new();
    let mut block_start = 0;
    let mut line_number = 0;

    while let Some(line) = lines.next_line() {
        let line = line?;
        line_number += 1;

        let line = std::str::from_utf8(line)
            .map_err(|e| Error::ParsePenman {
                line: line_number,
                message: e.to_string(),
            })?
            .trim();

        if line.is_empty() {
            if !block.is_empty() {
                graphs.push(penman::parse(&block, block_start)?);
                block.clear();
            }
        } else if !line.starts_with('#') {
            if block.is_empty() {
                block_start = line_number;
            }
            block.push_str(line);
            block.push('\n');
        }
    }

    if !block.is_empty() {
        graphs.push(penman::parse(&block, block_start)?);
    }

    Ok(graphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trim_margin::MarginTrimmable;

    #[test]
    fn read_from_slice() {
        let input = "
        |# ::id 1
        |# ::snt The dog barks.
        |(b / bark-01
        |   :ARG0 (d / dog))
        |
        |
        |# ::id 2
        |(d / dog)
        |"
        .trim_margin()
        .unwrap();

        let graphs = read_from(LineReader::new(input.as_bytes())).unwrap();

        assert_eq!(graphs.len(), 2);
        assert_eq!(graphs[0].node_count(), 2);
        assert_eq!(graphs[0].relation_count(), 2);
        assert_eq!(graphs[1].node_count(), 1);
        assert_eq!(graphs[1].relation_count(), 1);
    }

    #[test]
    fn read_from_slice_without_trailing_newline() {
        let graphs = read_from(LineReader::new("(d / dog)".as_bytes())).unwrap();
        assert_eq!(graphs.len(), 1);
    }

    #[test]
    fn read_reports_line_of_broken_graph() {
        let input = "(d / dog)\n\n(b / bark-01\n  :ARG0 (d / dog)\n";
        let err = read_from(LineReader::new(input.as_bytes())).unwrap_err();
        assert!(matches!(err, Error::ParsePenman { line: 4, .. }), "{:?}", err);
    }

    #[test]
    fn read_from_gdl() {
        let graph = "
        |(a:Dog),
        |(b:Bark_01),
        |(b)-[:ARG0]->(a)
        |"
        .trim_margin()
        .unwrap()
        .parse::<GdlGraph>()
        .unwrap();

        assert_eq!(graph.node_count(), 2);
        assert_eq!(
            graph.instance_triples(),
            &[Triple::instance("a", "Dog"), Triple::instance("b", "Bark_01")]
        );
        assert_eq!(graph.relation_triples(), &[Triple::new("ARG0", "b", "a")]);
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn gdl_relationship_needs_a_type() {
        let result = "(a:Dog), (b:Bark), (b)-->(a)".parse::<GdlGraph>();
        assert!(matches!(result, Err(Error::MalformedTriple(_))));
    }

    #[test]
    fn validate_duplicate_node() {
        let graph = Graph::new(
            vec![Triple::instance("a", "dog"), Triple::instance("a", "cat")],
            vec![],
        );
        assert!(matches!(graph.validate(), Err(Error::DuplicateNode(node)) if node == "a"));
    }

    #[test]
    fn validate_dangling_source() {
        let graph = Graph::new(
            vec![Triple::instance("a", "dog")],
            vec![Triple::new("ARG0", "x", "a")],
        );
        assert!(matches!(graph.validate(), Err(Error::MalformedTriple(_))));
    }

    #[test]
    fn validate_instance_label() {
        let graph = Graph::new(vec![Triple::new("ARG0", "a", "dog")], vec![]);
        assert!(matches!(graph.validate(), Err(Error::MalformedTriple(_))));

        let graph = Graph::new(vec![Triple::new("Instance", "a", "dog")], vec![]);
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn validate_empty_field() {
        let graph = Graph::new(
            vec![Triple::instance("a", "dog")],
            vec![Triple::new("mod", "a", " ")],
        );
        assert!(matches!(graph.validate(), Err(Error::MalformedTriple(_))));
    }
}
