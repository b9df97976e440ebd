use log::LevelFilter;
use pico_args::Arguments;
use smatch_ilp::{Config, Detail};
use std::{ffi::OsStr, path::PathBuf, str::FromStr, time::Duration};

use crate::Result;

const HELP: &str = "\
Computes the exact SMATCH score of graph pairs.

USAGE:
  smatch [OPTIONS] FILE1 FILE2

ARGS:
  FILE1, FILE2            files of PENMAN graphs, paired up in file order

OPTIONS:
  -s, --significant N     decimal places of printed scores [default: 2]
  --ms                    print one score per graph pair
  -d, --detail MODE       `summary` or `alignment` [default: summary]
  -t, --time-limit SECS   give up on a graph pair after SECS seconds
  -p, --parallel          score graph pairs in parallel
  --solver-log            report every solve
  -v                      verbose (info)
  -vv                     more verbose (debug)
  -h, --help              print this help
";

#[derive(Debug)]
pub(crate) struct AppArgs {
    pub(crate) left: PathBuf,
    pub(crate) right: PathBuf,
    pub(crate) significant: usize,
    pub(crate) multiple_scores: bool,
    pub(crate) detail: Detail,
    pub(crate) time_limit: Option<Duration>,
    pub(crate) parallel: bool,
    pub(crate) solver_log: bool,
    pub(crate) log_level: LevelFilter,
}

impl AppArgs {
    pub(crate) fn config(&self) -> Config {
        Config::new(
            self.detail,
            !self.solver_log,
            self.time_limit,
            self.parallel,
        )
    }
}

pub(crate) fn main() -> Result<AppArgs> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{}", HELP);
        std::process::exit(0);
    }

    fn as_path_buf(arg: &OsStr) -> Result<PathBuf> {
        Ok(arg.into())
    }

    fn as_duration(arg: &str) -> Result<Duration> {
        let seconds = arg.parse::<f64>()?;
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(eyre::eyre!("time limit must be positive, got {}", arg));
        }
        Ok(Duration::from_secs_f64(seconds))
    }

    let log_level = if pargs.contains("-vv") {
        LevelFilter::Debug
    } else if pargs.contains("-v") {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    let mut args = AppArgs {
        left: PathBuf::new(),
        right: PathBuf::new(),
        significant: pargs
            .opt_value_from_str(["-s", "--significant"])?
            .unwrap_or(2),
        multiple_scores: pargs.contains("--ms"),
        detail: pargs
            .opt_value_from_fn(["-d", "--detail"], DetailWrapper::from_str)?
            .unwrap_or(DetailWrapper(Detail::SummaryOnly))
            .into(),
        time_limit: pargs.opt_value_from_fn(["-t", "--time-limit"], as_duration)?,
        parallel: pargs.contains(["-p", "--parallel"]),
        solver_log: pargs.contains("--solver-log"),
        log_level,
    };

    args.left = pargs.free_from_os_str(as_path_buf)?;
    args.right = pargs.free_from_os_str(as_path_buf)?;

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        return Err(eyre::eyre!("unexpected arguments: {:?}", remaining));
    }

    Ok(args)
}

struct DetailWrapper(Detail);

impl From<DetailWrapper> for Detail {
    fn from(d: DetailWrapper) -> Self {
        d.0
    }
}

impl FromStr for DetailWrapper {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<DetailWrapper> {
        match s {
            "summary" | "SUMMARY" => Ok(DetailWrapper(Detail::SummaryOnly)),
            "alignment" | "ALIGNMENT" => Ok(DetailWrapper(Detail::WithAlignmentDetail)),
            _ => Err(eyre::eyre!("Unsupported detail mode {}", s)),
        }
    }
}
