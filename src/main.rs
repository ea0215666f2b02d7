use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use series_ta::indicators::probability::{ThresholdSweepBuilder, MAX_THRESHOLD, MIN_THRESHOLD};
use series_ta::pipeline::{AppendReport, EngineBuilder, Row, Session};
use series_ta::store::CsvStore;
use series_ta::utilities::enums::{MeanMode, ScoringVariant};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum MeanModeArg {
    PairwiseLag,
    ExpandingAverage,
}

impl From<MeanModeArg> for MeanMode {
    fn from(m: MeanModeArg) -> Self {
        match m {
            MeanModeArg::PairwiseLag => MeanMode::PairwiseLag,
            MeanModeArg::ExpandingAverage => MeanMode::ExpandingAverage,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ScoringArg {
    Composite,
    RawWeighted,
}

impl From<ScoringArg> for ScoringVariant {
    fn from(s: ScoringArg) -> Self {
        match s {
            ScoringArg::Composite => ScoringVariant::Composite,
            ScoringArg::RawWeighted => ScoringVariant::RawWeighted,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "series_ta", about = "Sequential indicators over a series of round outcomes")]
struct Cli {
    #[arg(long, default_value = "data.csv")]
    csv: PathBuf,

    #[arg(long, value_enum, default_value_t = MeanModeArg::PairwiseLag)]
    mean_mode: MeanModeArg,

    #[arg(long, default_value_t = 0.55)]
    threshold: f64,

    #[arg(long, value_enum, default_value_t = ScoringArg::Composite)]
    scoring: ScoringArg,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Append readings, one per line, from a file or stdin.
    Append {
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Print the last rows of the table.
    Show {
        #[arg(long, default_value_t = 6)]
        tail: usize,
    },
    /// Remove the stored history.
    Clear,
    /// Rewrite the stored table under the current options.
    Recompute,
    /// Count `Yes` predictions for a range of thresholds.
    Sweep {
        #[arg(long, default_value_t = MIN_THRESHOLD)]
        start: f64,
        #[arg(long, default_value_t = MAX_THRESHOLD)]
        end: f64,
        #[arg(long, default_value_t = 0.05)]
        step: f64,
    },
}

fn fmt_cell(v: f64) -> String {
    if v.is_nan() {
        "-".to_string()
    } else {
        format!("{:.4}", v)
    }
}

fn print_table(rows: &[Row], tail: usize) {
    let start = rows.len().saturating_sub(tail);
    println!(
        "{:>5} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>5} {:>7} {:>4} {:>7}  {}",
        "#", "target", "mean", "var_tv", "vstatus", "vstat_lv", "std_tv", "score", "prob", "pred", "color", "remarks"
    );
    for (i, r) in rows.iter().enumerate().skip(start) {
        let notes: Vec<&str> = [r.remark.as_str(), r.remark2.as_str(), r.remark3.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        println!(
            "{:>5} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>5} {:>7} {:>4} {:>7}  {}",
            i,
            fmt_cell(r.target),
            fmt_cell(r.mean),
            fmt_cell(r.variation_tv),
            fmt_cell(r.vstatus),
            fmt_cell(r.vstatus_lv),
            fmt_cell(r.std_tv),
            r.indicator_score,
            fmt_cell(r.probability),
            r.prediction,
            r.color,
            notes.join("; ")
        );
    }
}

fn read_batch(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).context("reading stdin")?;
            Ok(text)
        }
    }
}

fn report(r: &AppendReport) {
    for bad in &r.rejected {
        warn!("{}", bad);
    }
    println!("appended {} readings ({} total, {} rejected)", r.appended, r.total, r.rejected.len());
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("series_ta=info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let params = EngineBuilder::new()
        .mean_mode(cli.mean_mode.into())
        .threshold(cli.threshold)
        .scoring(cli.scoring.into())
        .params();

    let mut store = CsvStore::new(&cli.csv);
    let mut session = Session::open(&mut store, params)
        .with_context(|| format!("opening {}", cli.csv.display()))?;

    match cli.command {
        Command::Append { file } => {
            let text = read_batch(file.as_ref())?;
            let r = session.append_text(&text).context("appending readings")?;
            report(&r);
            print_table(session.rows(), 6);
        }
        Command::Show { tail } => print_table(session.rows(), tail),
        Command::Clear => {
            session.clear().context("clearing history")?;
            println!("history cleared");
        }
        Command::Recompute => {
            let n = session.recompute().context("recomputing table")?.len();
            println!("recomputed {} rows", n);
        }
        Command::Sweep { start, end, step } => {
            let probs: Vec<f64> = session.rows().iter().map(|r| r.probability).collect();
            let out = ThresholdSweepBuilder::new()
                .threshold_range(start, end, step)
                .apply_slice(&probs)
                .context("threshold sweep")?;
            println!("{:>9} {:>6} {:>6}", "threshold", "yes", "no");
            for (t, yes) in out.thresholds.iter().zip(out.yes_counts()) {
                println!("{:>9.2} {:>6} {:>6}", t, yes, out.cols - yes);
            }
        }
    }
    Ok(())
}
