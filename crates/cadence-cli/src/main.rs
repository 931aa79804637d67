mod analyze;
mod cmd_compare;
mod cmd_phases;
mod cmd_timeline;
mod loader;

use std::path::PathBuf;

use cadence_classify::ClassifierConfig;
use cadence_filter::{Bound, PhaseBounds, PhaseFilter};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cadence", version, about = "Merge-request lifecycle analytics")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

/// Classifier configuration shared by all subcommands.
#[derive(Args)]
struct ClassifierOpts {
    /// Allow-listed automated reviewer handle (repeatable; disables content
    /// and length heuristics)
    #[arg(long = "ai-reviewer")]
    ai_reviewers: Vec<String>,
    /// Additional CI account name (repeatable; case-insensitive substring)
    #[arg(long = "ci-account")]
    ci_accounts: Vec<String>,
    /// Treat comments within this many minutes of change creation as
    /// automated (0 disables the window)
    #[arg(long, default_value_t = 0)]
    automation_window_mins: u64,
}

impl ClassifierOpts {
    fn to_config(&self) -> ClassifierConfig {
        let mut config = ClassifierConfig::new()
            .with_ci_accounts(&self.ci_accounts)
            .with_automation_window_mins(self.automation_window_mins);
        if !self.ai_reviewers.is_empty() {
            config = config.with_allow_list(&self.ai_reviewers);
        }
        config
    }
}

/// The sixteen phase bound flags for `compare`.
#[derive(Args, Default)]
struct BoundOpts {
    /// Minimum development phase share in percent
    #[arg(long)]
    dev_percent_min: Option<f64>,
    /// Maximum development phase share in percent
    #[arg(long)]
    dev_percent_max: Option<f64>,
    /// Minimum development phase duration in days
    #[arg(long)]
    dev_days_min: Option<f64>,
    /// Maximum development phase duration in days
    #[arg(long)]
    dev_days_max: Option<f64>,
    /// Minimum wait phase share in percent
    #[arg(long)]
    wait_percent_min: Option<f64>,
    /// Maximum wait phase share in percent
    #[arg(long)]
    wait_percent_max: Option<f64>,
    /// Minimum wait phase duration in days
    #[arg(long)]
    wait_days_min: Option<f64>,
    /// Maximum wait phase duration in days
    #[arg(long)]
    wait_days_max: Option<f64>,
    /// Minimum review phase share in percent
    #[arg(long)]
    review_percent_min: Option<f64>,
    /// Maximum review phase share in percent
    #[arg(long)]
    review_percent_max: Option<f64>,
    /// Minimum review phase duration in days
    #[arg(long)]
    review_days_min: Option<f64>,
    /// Maximum review phase duration in days
    #[arg(long)]
    review_days_max: Option<f64>,
    /// Minimum merge phase share in percent
    #[arg(long)]
    merge_percent_min: Option<f64>,
    /// Maximum merge phase share in percent
    #[arg(long)]
    merge_percent_max: Option<f64>,
    /// Minimum merge phase duration in days
    #[arg(long)]
    merge_days_min: Option<f64>,
    /// Maximum merge phase duration in days
    #[arg(long)]
    merge_days_max: Option<f64>,
}

impl BoundOpts {
    fn to_filter(&self) -> PhaseFilter {
        let bound = |min: Option<f64>, max: Option<f64>| Bound { min, max };
        PhaseFilter {
            development: PhaseBounds {
                percent: bound(self.dev_percent_min, self.dev_percent_max),
                days: bound(self.dev_days_min, self.dev_days_max),
            },
            wait: PhaseBounds {
                percent: bound(self.wait_percent_min, self.wait_percent_max),
                days: bound(self.wait_days_min, self.wait_days_max),
            },
            review: PhaseBounds {
                percent: bound(self.review_percent_min, self.review_percent_max),
                days: bound(self.review_days_min, self.review_days_max),
            },
            merge: PhaseBounds {
                percent: bound(self.merge_percent_min, self.merge_percent_max),
                days: bound(self.merge_days_min, self.merge_days_max),
            },
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Print the ordered event timeline for one change
    Timeline {
        /// Change record JSON file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        classifier: ClassifierOpts,
    },
    /// Print the phase breakdown for one change
    Phases {
        /// Change record JSON file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        classifier: ClassifierOpts,
    },
    /// Compare a batch of changes, optionally filtered by phase bounds
    Compare {
        /// Change record JSON files
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        classifier: ClassifierOpts,
        #[command(flatten)]
        bounds: BoundOpts,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Timeline {
            file,
            json,
            classifier,
        } => cmd_timeline::execute(&file, json, &classifier.to_config()),
        Command::Phases {
            file,
            json,
            classifier,
        } => cmd_phases::execute(&file, json, &classifier.to_config()),
        Command::Compare {
            files,
            json,
            classifier,
            bounds,
        } => cmd_compare::execute(&files, json, &classifier.to_config(), &bounds.to_filter()),
    }
}
