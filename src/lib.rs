/*!
## Smatch ILP

A library for scoring the similarity of two semantic graphs.

The score is the SMATCH F-score, computed exactly: the best alignment
between the nodes of both graphs is found by solving a 0-1 integer
linear program instead of running a hill-climbing search.

```text
graphs -> candidates -> model -> solver -> score
```

This project is inspired by the ILP variant of https://github.com/snowblink14/smatch.

### License

MIT
*/
pub mod batch;
pub mod candidates;
pub mod config;
pub mod graph;
pub mod model;
pub mod normalize;
pub mod score;
pub mod solver;

use std::io;

pub use batch::{evaluate, format_score, Batch, Outcome, Report};
pub use config::{Config, Detail};
pub use graph::{Graph, Triple};
pub use score::Score;
pub use solver::SolveError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("error while reading graph file")]
    ReadGraph {
        #[from]
        source: io::Error,
    },
    #[error("error while parsing GDL graph")]
    ParseGdlGraph {
        #[from]
        source: gdl::graph::GraphHandlerError,
    },
    #[error("malformed PENMAN graph at line {line}: {message}")]
    ParsePenman { line: usize, message: String },
    #[error("duplicate node identifier `{0}`")]
    DuplicateNode(String),
    #[error("malformed triple {0}")]
    MalformedTriple(String),
    #[error("graph files contain a different number of graphs ({left} vs {right})")]
    PairCountMismatch { left: usize, right: usize },
    #[error(transparent)]
    Solve(#[from] SolveError),
}

impl Error {
    /// Returns true if the batch may skip the affected pair and carry on.
    ///
    /// Only running out of solver time qualifies; every other error points
    /// at broken input or a broken model.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Solve(SolveError::TimeLimit(_)))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
