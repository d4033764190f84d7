// src/cli.rs
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::consts::*;
use crate::config::options::{CompareOptions, FetchOptions, ImportOptions};
use crate::progress::Progress;
use crate::record::TierSet;
use crate::runner;

#[derive(Parser, Debug)]
#[command(
    name = "qualis_compare",
    version,
    about = "Compare the 2019 Qualis PDF with the classification served by Sucupira"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Debug-level logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also append log lines to this file
    #[arg(long, global = true, env = "QUALIS_LOG_FILE")]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import the new classification from its PDF into a flat file
    Import {
        /// The classification PDF
        pdf: PathBuf,
        #[arg(short, long, default_value = DEFAULT_NEW_FILE)]
        out: PathBuf,
    },
    /// Fetch the current classification from the Sucupira report
    Fetch {
        #[command(flatten)]
        remote: RemoteArgs,
        #[arg(short, long, default_value = DEFAULT_OLD_FILE)]
        out: PathBuf,
    },
    /// Merge two flat files and render the comparison charts
    Compare {
        #[command(flatten)]
        files: CompareArgs,
    },
    /// Import, fetch and compare in one go
    Run {
        /// The classification PDF
        pdf: PathBuf,
        #[command(flatten)]
        remote: RemoteArgs,
        #[command(flatten)]
        files: CompareArgs,
    },
}

#[derive(Args, Debug)]
struct RemoteArgs {
    /// Tiers to request, in selector order
    #[arg(long, value_parser = parse_tiers, default_value = "A1,A2,B1,B2,B3,B4,B5,C", env = "QUALIS_TIERS")]
    tiers: TierSet,

    /// Evaluation area id (16 = MEDICINA II)
    #[arg(long, default_value_t = DEFAULT_AREA, env = "QUALIS_AREA")]
    area: u32,

    /// Form value of the first requested tier
    #[arg(long, default_value_t = BASE_SELECTOR)]
    base_selector: u32,

    #[arg(long, default_value = LANDING_URL, env = "QUALIS_URL")]
    landing_url: String,

    #[arg(long, default_value_t = TIMEOUT_SECS, env = "QUALIS_TIMEOUT_SECS")]
    timeout_secs: u64,

    /// Start a fresh session for every tier
    #[arg(long)]
    rebootstrap_per_tier: bool,
}

#[derive(Args, Debug)]
struct CompareArgs {
    /// Flat file of the new classification
    #[arg(long = "new", default_value = DEFAULT_NEW_FILE)]
    new_path: PathBuf,

    /// Flat file of the current classification
    #[arg(long = "old", default_value = DEFAULT_OLD_FILE)]
    old_path: PathBuf,

    #[arg(long = "merged", default_value = DEFAULT_MERGED_FILE)]
    merged_path: PathBuf,

    /// Chart by new tier (.svg or .png)
    #[arg(long = "chart", default_value = DEFAULT_CHART_FILE)]
    chart_path: PathBuf,

    /// Chart by current tier (.svg or .png)
    #[arg(long = "chart-by-old", default_value = DEFAULT_CHART_BY_OLD_FILE)]
    chart_by_old_path: PathBuf,

    /// Current-classification tiers on the chart axis
    #[arg(long, value_parser = parse_tiers, default_value = "A1,A2,B1,B2,B3,B4,B5,C")]
    old_tiers: TierSet,

    #[arg(long, default_value_t = CHART_COLUMNS)]
    columns: usize,
}

fn parse_tiers(s: &str) -> Result<TierSet, String> {
    let set = TierSet::parse_list(s).map_err(|e| e.to_string())?;
    if set.is_empty() {
        return Err(s!("at least one tier is required"));
    }
    Ok(set)
}

impl RemoteArgs {
    fn into_options(self, out: PathBuf) -> FetchOptions {
        FetchOptions {
            landing_url: self.landing_url,
            area: self.area,
            base_selector: self.base_selector,
            tiers: self.tiers,
            timeout: Duration::from_secs(self.timeout_secs),
            rebootstrap_per_tier: self.rebootstrap_per_tier,
            out,
            ..FetchOptions::default()
        }
    }
}

impl From<CompareArgs> for CompareOptions {
    fn from(a: CompareArgs) -> Self {
        CompareOptions {
            new_path: a.new_path,
            old_path: a.old_path,
            merged_path: a.merged_path,
            chart_path: a.chart_path,
            chart_by_old_path: a.chart_by_old_path,
            old_tiers: a.old_tiers,
            columns: a.columns.max(1),
        }
    }
}

/// Progress lines on stderr.
struct StderrProgress {
    total: usize,
    done: usize,
}

impl Progress for StderrProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        eprintln!("Fetching {total} tiers…");
    }
    fn log(&mut self, msg: &str) {
        eprint!("\r{msg:<48}");
        let _ = std::io::stderr().flush();
    }
    fn item_done(&mut self, label: &str, records: usize) {
        self.done += 1;
        eprintln!("\r[{}/{}] Qualis {label}: {records} records{:<16}", self.done, self.total, "");
    }
    fn finish(&mut self) {
        eprintln!();
    }
}

pub fn run() -> color_eyre::Result<()> {
    let cli = Cli::parse();
    crate::log::init(cli.verbose, cli.log_file.as_deref())?;

    let mut progress = StderrProgress { total: 0, done: 0 };

    match cli.command {
        Command::Import { pdf, out } => {
            let opts = ImportOptions { out, ..ImportOptions::new(pdf) };
            let records = runner::import_pdf(&opts)?;
            println!("Wrote {} journals to {}", records.len(), opts.out.display());
        }
        Command::Fetch { remote, out } => {
            let opts = remote.into_options(out);
            let records = runner::fetch_report(&opts, Some(&mut progress))?;
            println!("Wrote {} journals to {}", records.len(), opts.out.display());
        }
        Command::Compare { files } => {
            let summary = runner::compare_files(&files.into())?;
            print_summary(&summary);
        }
        Command::Run { pdf, remote, files } => {
            let compare: CompareOptions = files.into();
            let import = ImportOptions { out: compare.new_path.clone(), ..ImportOptions::new(pdf) };
            let fetch = remote.into_options(compare.old_path.clone());
            let summary = runner::run_all(&import, &fetch, &compare, Some(&mut progress))?;
            print_summary(&summary);
        }
    }
    Ok(())
}

fn print_summary(summary: &runner::CompareSummary) {
    println!("Wrote {}", summary.merged.display());
    for chart in &summary.charts {
        println!("Wrote {}", chart.display());
    }
}
