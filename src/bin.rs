/*!
## Smatch

A command-line utility for computing exact SMATCH scores between two files
of semantic graphs in PENMAN notation.

### License

MIT
*/
use smatch_ilp::{format_score, graph, Batch};

use std::time::Instant;

use eyre::Result;

mod cli;

fn main() -> Result<()> {
    let args = cli::main()?;

    env_logger::Builder::new()
        .filter_level(args.log_level)
        .parse_default_env()
        .init();

    let config = args.config();
    log::info!("Config: {}", config);

    let total = Instant::now();

    let pairs = measure("Load graph pairs", || {
        graph::read_pairs(&args.left, &args.right)
    })?;

    let report = measure("Score graph pairs", || Batch::new(config).run(&pairs));

    if args.multiple_scores {
        for outcome in report.outcomes() {
            match outcome {
                Ok(score) => {
                    println!("F-score: {}", format_score(score.f_score, args.significant));
                    if let Some(alignment) = &score.alignment {
                        print!("{}", alignment);
                    }
                }
                Err(e) => println!("F-score: - ({})", e),
            }
        }
    } else {
        for alignment in report.scores().filter_map(|score| score.alignment.as_ref()) {
            print!("{}", alignment);
        }
    }

    match report.average() {
        Some(average) => println!(
            "\nAverage F-score: {}",
            format_score(average, args.significant)
        ),
        None if report.is_empty() => println!("No graph pairs found"),
        None => println!("No graph pair could be scored"),
    }

    if report.skipped() > 0 {
        log::warn!(
            "{} of {} graph pairs skipped after reaching the time limit",
            report.skipped(),
            report.len()
        );
    }

    log::info!("Total runtime = {:?}", total.elapsed());

    if report.failed() > 0 {
        return Err(eyre::eyre!(
            "{} of {} graph pairs failed",
            report.failed(),
            report.len()
        ));
    }

    Ok(())
}

fn measure<R>(desc: &str, func: impl FnOnce() -> R) -> R {
    log::info!("Start :: {}", desc);
    let start = Instant::now();
    let result = func();
    log::info!("Finish :: {} took {:?}", desc, start.elapsed());
    result
}
