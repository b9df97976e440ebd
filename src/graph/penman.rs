//! Reader for graphs in PENMAN notation, the serialization used by AMR.
//!
//! ```text
//! (b / bark-01
//!    :ARG0 (d / dog
//!             :mod (l / little))
//!    :time "now")
//! ```

use std::collections::HashSet;

use crate::{Error, Result};

use super::{Graph, Triple};

/// Relation label of the attribute that marks the root node.
pub const TOP: &str = "TOP";

/// Deepest node nesting a graph may have.
const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Open,
    Close,
    Slash,
    Role(String),
    Symbol(String),
    Quoted(String),
}

#[derive(Debug)]
enum Target {
    Node(String),
    Token(String),
    Quoted(String),
}

struct Edge {
    role: String,
    source: String,
    target: Target,
}

/// Parses one PENMAN graph. `first_line` is the line number of the first
/// line of `input` and is only used for error messages.
pub(crate) fn parse(input: &str, first_line: usize) -> Result<Graph> {
    let tokens = tokenize(input, first_line)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        last_line: first_line,
        instances: Vec::new(),
        edges: Vec::new(),
    };

    let root = parser.node(0)?;

    if let Some((token, line)) = parser.tokens.get(parser.pos) {
        return Err(Error::ParsePenman {
            line: *line,
            message: format!("unexpected {:?} after end of graph", token),
        });
    }

    Ok(parser.into_graph(root))
}

fn tokenize(input: &str, first_line: usize) -> Result<Vec<(Token, usize)>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    let mut line = first_line;

    while let Some(c) = chars.next() {
        match c {
            '\n' => line += 1,
            c if c.is_whitespace() => {}
            '(' => tokens.push((Token::Open, line)),
            ')' => tokens.push((Token::Close, line)),
            '/' => tokens.push((Token::Slash, line)),
            '"' => {
                let start = line;
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => {
                            if let Some(escaped) = chars.next() {
                                value.push(escaped);
                            }
                        }
                        Some(c) => {
                            if c == '\n' {
                                line += 1;
                            }
                            value.push(c);
                        }
                        None => {
                            return Err(Error::ParsePenman {
                                line: start,
                                message: "unterminated string".to_string(),
                            })
                        }
                    }
                }
                tokens.push((Token::Quoted(value), start));
            }
            c => {
                let mut value = String::new();
                value.push(c);
                while let Some(&next) = chars.peek() {
                    if next.is_whitespace() || next == '(' || next == ')' || next == '"' {
                        break;
                    }
                    if next == '/' && c != ':' {
                        break;
                    }
                    value.push(next);
                    chars.next();
                }
                let token = match value.strip_prefix(':') {
                    Some(role) => Token::Role(role.to_string()),
                    None => Token::Symbol(value),
                };
                tokens.push((token, line));
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    last_line: usize,
    instances: Vec<Triple>,
    edges: Vec<Edge>,
}

impl Parser {
    fn next(&mut self) -> Option<Token> {
        let (token, line) = self.tokens.get(self.pos)?.clone();
        self.pos += 1;
        self.last_line = line;
        Some(token)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn error<T>(&self, message: impl Into<String>) -> Result<T> {
        Err(Error::ParsePenman {
            line: self.last_line,
            message: message.into(),
        })
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            Some(token) => self.error(format!("expected {:?}, found {:?}", expected, token)),
            None => self.error(format!("expected {:?}, found end of graph", expected)),
        }
    }

    /// `( variable / concept (:role target)* )`, returns the variable.
    fn node(&mut self, depth: usize) -> Result<String> {
        if depth >= MAX_DEPTH {
            return self.error(format!("nodes nested deeper than {} levels", MAX_DEPTH));
        }
        self.expect(Token::Open)?;

        let variable = match self.next() {
            Some(Token::Symbol(variable)) => variable,
            Some(token) => return self.error(format!("expected variable, found {:?}", token)),
            None => return self.error("expected variable, found end of graph"),
        };

        self.expect(Token::Slash)?;

        let concept = match self.next() {
            Some(Token::Symbol(concept)) | Some(Token::Quoted(concept)) => concept,
            Some(token) => return self.error(format!("expected concept, found {:?}", token)),
            None => return self.error("expected concept, found end of graph"),
        };

        self.instances.push(Triple::instance(variable.clone(), concept));

        loop {
            match self.next() {
                Some(Token::Close) => return Ok(variable),
                Some(Token::Role(role)) => {
                    let target = if self.peek() == Some(&Token::Open) {
                        Target::Node(self.node(depth + 1)?)
                    } else {
                        match self.next() {
                            Some(Token::Symbol(value)) => Target::Token(value),
                            Some(Token::Quoted(value)) => Target::Quoted(value),
                            Some(token) => {
                                return self.error(format!(
                                    "expected target of :{}, found {:?}",
                                    role, token
                                ))
                            }
                            None => {
                                return self.error(format!(
                                    "expected target of :{}, found end of graph",
                                    role
                                ))
                            }
                        }
                    };
                    self.edges.push(Edge {
                        role,
                        source: variable.clone(),
                        target,
                    });
                }
                Some(token) => {
                    return self.error(format!("expected role or `)`, found {:?}", token))
                }
                None => return self.error("expected role or `)`, found end of graph"),
            }
        }
    }

    /// Resolves bare tokens that name a variable to node references and
    /// turns inverse roles around.
    fn into_graph(self, root: String) -> Graph {
        let variables = self
            .instances
            .iter()
            .map(|t| t.source.clone())
            .collect::<HashSet<_>>();

        let mut relations = Vec::with_capacity(self.edges.len() + 1);
        relations.push(Triple::new(TOP, root, "top"));

        for Edge {
            role,
            source,
            target,
        } in self.edges
        {
            let (target, is_node) = match target {
                Target::Node(node) => (node, true),
                Target::Token(token) => {
                    let is_node = variables.contains(&token);
                    (token, is_node)
                }
                Target::Quoted(value) => (value, false),
            };

            match inverse(&role) {
                Some(base) if is_node => relations.push(Triple::new(base, target, source)),
                _ => relations.push(Triple::new(role, source, target)),
            }
        }

        Graph::new(self.instances, relations)
    }
}

/// `ARG0-of` is the inverse of `ARG0`. `consist-of` is a role of its own.
fn inverse(role: &str) -> Option<&str> {
    if role.eq_ignore_ascii_case("consist-of") {
        return None;
    }
    role.strip_suffix("-of").filter(|base| !base.is_empty())
}
