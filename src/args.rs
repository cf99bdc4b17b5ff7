//! These structs provide the CLI interface for the money CLI.

use crate::aggregate::Direction;
use crate::period::{Granularity, PeriodSelector};
use crate::report::ReportMode;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// money: balances, category breakdowns and financial-health advice for your transactions.
///
/// The program reads a snapshot of your transactions exported from the document store, keyed by
/// transaction id, and reports on any month, ISO week, or on all time. Nothing is ever written
/// back to the store.
///
/// Start with `money init`, then point `snapshot_path` in `$MONEY_HOME/config.json` at your
/// export (or pass `--snapshot` to init).
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and the configuration file.
    ///
    /// By default the data directory is $HOME/money and the snapshot is expected at
    /// $MONEY_HOME/transactions.json. An empty snapshot is created there if the file does not
    /// exist yet.
    Init(InitArgs),
    /// List the transactions of a period, newest first.
    List(ListArgs),
    /// Show the balance, income and expense of a period.
    Summary(PeriodArgs),
    /// Break a period down by category and show the financial-health advice.
    Report(ReportArgs),
    /// Show totals and the running balance per day, week or month.
    Trend(TrendArgs),
    /// Print the fixed category table.
    Categories,
    /// Print the summary again every time the snapshot changes. Stop with Ctrl-C.
    Watch(PeriodArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where money data and configuration is held. Defaults to ~/money
    #[arg(long, env = "MONEY_HOME", default_value_t = default_money_home())]
    money_home: DisplayPath,

    /// Use this date as "today" when resolving the current month or week. Format: YYYY-MM-DD
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Print the structured result as JSON instead of text.
    #[arg(long)]
    json: bool,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn money_home(&self) -> &DisplayPath {
        &self.money_home
    }

    pub fn today(&self) -> Option<NaiveDate> {
        self.today
    }

    pub fn json(&self) -> bool {
        self.json
    }
}

/// (Not shown): Args for the `money init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The path to the exported transaction snapshot. Relative paths are resolved against
    /// $MONEY_HOME.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Only show transactions belonging to this user id.
    #[arg(long)]
    owner: Option<String>,
}

impl InitArgs {
    pub fn snapshot(&self) -> Option<&Path> {
        self.snapshot.as_deref()
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }
}

/// (Not shown): Selects the period a command looks at.
#[derive(Debug, Parser, Clone, Default)]
pub struct PeriodArgs {
    /// The period: all, month, month:YYYY-MM, week or week:YYYY-Www. `month` and `week` alone
    /// mean the current one. Defaults to `default_period` from the config file.
    #[arg(long)]
    period: Option<PeriodSelector>,
}

impl PeriodArgs {
    pub fn new(period: Option<PeriodSelector>) -> Self {
        Self { period }
    }

    pub fn period(&self) -> Option<PeriodSelector> {
        self.period
    }
}

/// How tabular output is rendered.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// A markdown table.
    #[default]
    Table,
    /// Comma-separated values with a header row.
    Csv,
    /// A JSON array of objects.
    Json,
}

serde_plain::derive_display_from_serialize!(OutputFormat);
serde_plain::derive_fromstr_from_deserialize!(OutputFormat);

/// (Not shown): Args for the `money list` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ListArgs {
    #[clap(flatten)]
    period: PeriodArgs,

    /// Only list income or only list expenses.
    #[arg(long)]
    direction: Option<Direction>,

    /// Output format for the rows.
    #[arg(long, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl ListArgs {
    pub fn new(period: Option<PeriodSelector>, format: OutputFormat) -> Self {
        Self {
            period: PeriodArgs::new(period),
            direction: None,
            format,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn period(&self) -> Option<PeriodSelector> {
        self.period.period()
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// (Not shown): Args for the `money report` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ReportArgs {
    #[clap(flatten)]
    period: PeriodArgs,

    /// What to break down: expense or income by category, or income against expense.
    #[arg(long, default_value_t = ReportMode::Expense)]
    mode: ReportMode,
}

impl ReportArgs {
    pub fn new(period: Option<PeriodSelector>, mode: ReportMode) -> Self {
        Self {
            period: PeriodArgs::new(period),
            mode,
        }
    }

    pub fn period(&self) -> Option<PeriodSelector> {
        self.period.period()
    }

    pub fn mode(&self) -> ReportMode {
        self.mode
    }
}

/// (Not shown): Args for the `money trend` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct TrendArgs {
    #[clap(flatten)]
    period: PeriodArgs,

    /// The bucket size.
    #[arg(long, default_value_t = Granularity::Month)]
    by: Granularity,
}

impl TrendArgs {
    pub fn new(period: Option<PeriodSelector>, by: Granularity) -> Self {
        Self {
            period: PeriodArgs::new(period),
            by,
        }
    }

    pub fn period(&self) -> Option<PeriodSelector> {
        self.period.period()
    }

    pub fn by(&self) -> Granularity {
        self.by
    }
}

fn default_money_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("money"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --money-home or MONEY_HOME instead of relying on the default \
                money home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("money")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::YearMonth;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["money", "--money-home", "/tmp/money-home"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_common_args() {
        let args = parse(&["--today", "2024-02-29", "--json", "--log-level", "debug", "categories"]);
        assert_eq!(args.common().today(), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert!(args.common().json());
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
        assert_eq!(args.common().money_home().path(), Path::new("/tmp/money-home"));
        assert!(matches!(args.command(), Command::Categories));
    }

    #[test]
    fn test_report_args() {
        let args = parse(&["report", "--period", "month:2024-01", "--mode", "comparison"]);
        let Command::Report(report) = args.command() else {
            panic!("expected report");
        };
        assert_eq!(
            report.period(),
            Some(PeriodSelector::Month(Some(YearMonth::new(2024, 1).unwrap())))
        );
        assert_eq!(report.mode(), ReportMode::Comparison);
    }

    #[test]
    fn test_list_defaults() {
        let args = parse(&["list"]);
        let Command::List(list) = args.command() else {
            panic!("expected list");
        };
        assert_eq!(list.period(), None);
        assert_eq!(list.direction(), None);
        assert_eq!(list.format(), OutputFormat::Table);
    }

    #[test]
    fn test_trend_args() {
        let args = parse(&["trend", "--by", "week", "--period", "all"]);
        let Command::Trend(trend) = args.command() else {
            panic!("expected trend");
        };
        assert_eq!(trend.by(), Granularity::Week);
        assert_eq!(trend.period(), Some(PeriodSelector::All));
    }

    #[test]
    fn test_bad_period_is_rejected() {
        let argv = ["money", "summary", "--period", "fortnight"];
        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_bad_today_is_rejected() {
        let argv = ["money", "--today", "2024-13-01", "categories"];
        assert!(Args::try_parse_from(argv).is_err());
    }
}
