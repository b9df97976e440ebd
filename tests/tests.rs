use std::path::PathBuf;
use smatch_ilp::{
    evaluate,
    graph::{read_pairs, GdlGraph, Graph, Triple},
    Batch, Config, Detail, Error,
};

const CRATE_ROOT: &str = env!("CARGO_MANIFEST_DIR");

fn resource(name: &str) -> PathBuf {
    [CRATE_ROOT, "resources", name].iter().collect::<PathBuf>()
}

fn graph(penman: &str) -> Graph {
    penman.parse::<Graph>().unwrap()
}

fn f_score(left: &Graph, right: &Graph) -> f64 {
    evaluate(left, right, &Config::default()).unwrap().f_score
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {} but was {}",
        expected,
        actual
    );
}

const GRAPHS: &[&str] = &[
    "(d / dog)",
    "(b / bark-01 :ARG0 (d / dog))",
    "(w / want-01 :ARG0 (b / boy) :ARG1 (g / go-02 :ARG0 b))",
    "(w / want-01 :ARG0 (g / girl) :ARG1 (l / leave-11 :ARG0 g))",
    "(s / sleep-01 :ARG0 (p / person :name (n / name :op1 \"John\")) :polarity -)",
    "(a / and :op1 (d / dog) :op2 (c / cat) :op3 (d2 / dog :mod (b / big)))",
];

#[test]
fn identity() {
    for penman in GRAPHS {
        let left = graph(penman);
        let right = left.clone();
        assert_close(f_score(&left, &right), 1.0);
    }
}

#[test]
fn symmetry() {
    for left in GRAPHS {
        for right in GRAPHS {
            let (left, right) = (graph(left), graph(right));
            assert_close(f_score(&left, &right), f_score(&right, &left));
        }
    }
}

#[test]
fn matched_triples_are_bounded() {
    for left in GRAPHS {
        for right in GRAPHS {
            let score = evaluate(&graph(left), &graph(right), &Config::default()).unwrap();
            assert!(score.matched <= score.left_size.min(score.right_size));
            assert!(score.f_score >= 0.0 && score.f_score <= 1.0);
        }
    }
}

#[test]
fn disjoint_graphs() {
    let left = Graph::new(
        vec![Triple::instance("a", "dog"), Triple::instance("b", "cat")],
        vec![Triple::new("ARG0", "a", "b")],
    );
    let right = Graph::new(
        vec![Triple::instance("x", "tree"), Triple::instance("y", "house")],
        vec![Triple::new("location", "x", "y")],
    );

    let score = evaluate(&left, &right, &Config::default()).unwrap();

    assert_eq!(score.matched, 0);
    assert_close(score.f_score, 0.0);
}

#[test]
fn empty_graph() {
    for penman in GRAPHS {
        let score = evaluate(&Graph::default(), &graph(penman), &Config::default()).unwrap();
        assert_close(score.f_score, 0.0);
        let score = evaluate(&graph(penman), &Graph::default(), &Config::default()).unwrap();
        assert_close(score.f_score, 0.0);
    }
    assert_close(f_score(&Graph::default(), &Graph::default()), 0.0);
}

#[test]
fn single_node_scenario() {
    let left = Graph::new(vec![Triple::instance("a", "dog")], vec![]);
    let right = Graph::new(vec![Triple::instance("b", "dog")], vec![]);

    let score = evaluate(&left, &right, &Config::default()).unwrap();

    assert_eq!(score.matched, 1);
    assert_eq!((score.left_size, score.right_size), (1, 1));
    assert_close(score.f_score, 1.0);
}

#[test]
fn renamed_nodes_scenario() {
    let left = "(a:Dog), (b:Bark), (b)-[:ARG0]->(a)"
        .parse::<GdlGraph>()
        .unwrap();
    let right = "(x:DOG), (y:Bark), (y)-[:ARG0]->(x)"
        .parse::<GdlGraph>()
        .unwrap();

    let score = evaluate(&left, &right, &Config::from(Detail::WithAlignmentDetail)).unwrap();

    assert_eq!(score.matched, 3);
    assert_eq!((score.left_size, score.right_size), (3, 3));
    assert_close(score.f_score, 1.0);

    let alignment = score.alignment.unwrap();
    assert_eq!(
        alignment.nodes,
        vec![
            ("a".to_string(), "x".to_string()),
            ("b".to_string(), "y".to_string())
        ]
    );
    assert_eq!(alignment.triples.len(), 3);
}

#[test]
fn structure_beats_labels() {
    // the two `want-01` nodes must be aligned for the role structure to match
    let left = graph("(w / want-01 :ARG0 (b / boy) :ARG1 (g / go-02 :ARG0 b))");
    let right = graph("(w / want-01 :ARG0 (g / girl) :ARG1 (l / leave-11 :ARG0 g))");

    let score = evaluate(&left, &right, &Config::default()).unwrap();

    // TOP, want-01 and the three roles
    assert_eq!(score.matched, 5);
    assert_eq!((score.left_size, score.right_size), (7, 7));
    assert_close(score.f_score, 5.0 / 7.0);
}

#[test]
fn batch_from_files() {
    let pairs = read_pairs(&resource("left.amr"), &resource("right.amr")).unwrap();
    assert_eq!(pairs.len(), 3);

    let report = Batch::new(Config::default()).run(&pairs);

    let f_scores = report.scores().map(|s| s.f_score).collect::<Vec<_>>();
    assert_eq!(f_scores.len(), 3);
    assert_close(f_scores[0], 1.0);
    assert_close(f_scores[1], 5.0 / 7.0);
    assert_close(f_scores[2], 0.5);

    assert_close(report.average().unwrap(), (1.0 + 5.0 / 7.0 + 0.5) / 3.0);
    assert_eq!(
        smatch_ilp::format_score(report.average().unwrap(), 2),
        "0.74"
    );
}

#[test]
fn batch_with_constants() {
    let pairs = read_pairs(&resource("names.amr"), &resource("names_other.amr")).unwrap();

    let report = Batch::new(Config::default()).run(&pairs);
    let scores = report.scores().collect::<Vec<_>>();

    // everything but the name constant
    assert_eq!(scores[0].matched, 6);
    assert_close(scores[0].f_score, 6.0 / 7.0);

    // everything but the polarity
    assert_eq!(scores[1].matched, 4);
    assert_eq!((scores[1].left_size, scores[1].right_size), (5, 4));
    assert_close(scores[1].precision, 1.0);
    assert_close(scores[1].recall, 0.8);
    assert_close(scores[1].f_score, 1.6 / 1.8);

    assert_close(report.average().unwrap(), (6.0 / 7.0 + 1.6 / 1.8) / 2.0);
}

#[test]
fn different_number_of_graphs() {
    let result = read_pairs(&resource("left.amr"), &resource("short.amr"));
    assert!(matches!(
        result,
        Err(Error::PairCountMismatch { left: 3, right: 1 })
    ));
}

#[test]
fn missing_file() {
    let result = read_pairs(&resource("left.amr"), &resource("missing.amr"));
    assert!(matches!(result, Err(Error::ReadGraph { .. })));
}
