use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;
use xpns_core::state::MonthDisplay;

#[derive(Debug, Clone)]
pub struct PreprocessedArgs {
    pub cleaned_args: Vec<OsString>,
    pub rc_overrides: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        Ok(Self {
            key: k.trim().to_string(),
            value: v.trim().to_string(),
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "xpns",
    version,
    about = "Expense tracker with a hierarchical, colored tag taxonomy",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[arg(
        long = "rc",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append
    )]
    pub rc_overrides: Vec<KeyVal>,

    #[arg(long = "xpnsrc")]
    pub xpnsrc: Option<PathBuf>,

    #[arg(long = "data")]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DisplayArg {
    Overview,
    Calendar,
    Chart,
}

impl From<DisplayArg> for MonthDisplay {
    fn from(arg: DisplayArg) -> Self {
        match arg {
            DisplayArg::Overview => MonthDisplay::Overview,
            DisplayArg::Calendar => MonthDisplay::Calendar,
            DisplayArg::Chart => MonthDisplay::Chart,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the tag hierarchy.
    Tags,
    /// Create a tag or change its parent and color.
    TagEdit {
        name: String,
        #[arg(long, conflicts_with = "root")]
        parent: Option<String>,
        /// Move the tag to the top level.
        #[arg(long)]
        root: bool,
        #[arg(long)]
        color: Option<String>,
    },
    /// List the available tag colors.
    Colors,
    /// Month summary in the remembered (or given) display.
    Expenses {
        #[arg(long, value_parser = parse_month)]
        month: Option<NaiveDate>,
        #[arg(long, value_enum)]
        display: Option<DisplayArg>,
    },
    /// Record an expense. `#Name` in the description tags it.
    Add {
        date: NaiveDate,
        amount: String,
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        rate: Option<String>,
    },
    /// Delete an expense by id.
    Delete { id: Uuid },
    /// Expenses of a single day.
    Show { date: NaiveDate },
}

/// `YYYY-MM` to the first day of that month.
pub fn parse_month(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .map_err(|err| anyhow!("expected YYYY-MM, got {s}: {err}"))
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = match (quiet, verbose) {
        (q, _) if q >= 2 => "error",
        (1, _) => "warn",
        (_, v) if v >= 3 => "trace",
        (_, 2) => "debug",
        (_, 1) => "info",
        _ => "warn",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

/// Pulls bare `rc.key=value` arguments out before clap sees them.
#[tracing::instrument(skip_all)]
pub fn preprocess_args(raw: &[OsString]) -> PreprocessedArgs {
    let mut cleaned = Vec::with_capacity(raw.len());
    let mut overrides = Vec::new();

    let mut iter = raw.iter().cloned();
    if let Some(bin) = iter.next() {
        cleaned.push(bin);
    }

    for arg in iter {
        let parsed = arg
            .to_str()
            .and_then(|text| text.strip_prefix("rc."))
            .and_then(|rest| rest.split_once('='))
            .map(|(k, v)| (format!("rc.{k}"), v.to_string()));

        match parsed {
            Some((key, value)) => {
                debug!(key = %key, value = %value, "captured positional rc override");
                overrides.push((key, value));
            }
            None => cleaned.push(arg),
        }
    }

    PreprocessedArgs {
        cleaned_args: cleaned,
        rc_overrides: overrides,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<OsString> {
        list.iter().map(OsString::from).collect()
    }

    #[test]
    fn rc_arguments_are_split_off() {
        let pre = preprocess_args(&args(&["xpns", "rc.locale=en", "tags"]));
        assert_eq!(pre.cleaned_args, args(&["xpns", "tags"]));
        assert_eq!(
            pre.rc_overrides,
            vec![("rc.locale".to_string(), "en".to_string())]
        );
    }

    #[test]
    fn add_collects_the_description_words() {
        let cli = GlobalCli::try_parse_from([
            "xpns",
            "add",
            "2026-10-16",
            "12,50",
            "Lunch",
            "#Food",
            "--currency",
            "CHF",
        ])
        .expect("parse");
        match cli.command {
            Some(Command::Add {
                description,
                currency,
                ..
            }) => {
                assert_eq!(description, vec!["Lunch", "#Food"]);
                assert_eq!(currency.as_deref(), Some("CHF"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parent_and_root_conflict() {
        let result =
            GlobalCli::try_parse_from(["xpns", "tag-edit", "Food", "--parent", "X", "--root"]);
        assert!(result.is_err());
    }

    #[test]
    fn month_argument() {
        let month = parse_month("2026-10").expect("month");
        assert_eq!(month, NaiveDate::from_ymd_opt(2026, 10, 1).expect("date"));
        assert!(parse_month("October").is_err());
    }
}
