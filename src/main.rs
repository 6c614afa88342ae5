use chrono::NaiveDate;
use clap::Parser;
use hrdesk::calendar::{self, Clock, FixedClock, SharedClock};
use hrdesk::config::Config;
use hrdesk::error::Result;
use hrdesk::forms::AttendanceScreen;
use hrdesk::hr::{DashboardSource, EmployeeDirectory};
use hrdesk::runtime::Runtime;
use hrdesk::terminal::Terminal;
use serde_json::json;
use std::fs::File;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

/// Terminal attendance desk.
#[derive(Debug, Parser)]
#[command(name = "hrdesk", version, about)]
struct Args {
    /// YAML file with seed employees and attendance.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Write logs here. Without it logs go to stderr for `--dump` and are
    /// discarded while the interactive screen is up.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Pretend today is this date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_day)]
    today: Option<NaiveDate>,

    /// Print the dashboard summary as JSON and exit.
    #[arg(long)]
    dump: bool,
}

fn parse_day(text: &str) -> std::result::Result<NaiveDate, String> {
    calendar::parse_ymd(text).ok_or_else(|| format!("'{text}' is not a YYYY-MM-DD date"))
}

/// Where log events go for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LogTarget {
    File(PathBuf),
    Stderr,
    /// Interactive runs without `--log-file`: the alternate screen owns the
    /// terminal.
    Discard,
}

impl LogTarget {
    fn for_run(log_file: Option<&PathBuf>, interactive: bool) -> Self {
        match log_file {
            Some(path) => Self::File(path.clone()),
            None if interactive => Self::Discard,
            None => Self::Stderr,
        }
    }
}

fn init_tracing(target: LogTarget) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match target {
        LogTarget::File(path) => {
            let file = File::create(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        LogTarget::Stderr => builder.with_writer(std::io::stderr).init(),
        LogTarget::Discard => builder.with_writer(std::io::sink).init(),
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(LogTarget::for_run(args.log_file.as_ref(), !args.dump))?;

    let config = Config::load_or_default(args.config.as_deref())?;
    let hr = config.build_hr()?;
    let clock: SharedClock = match args.today {
        Some(day) => Arc::new(FixedClock(day)),
        None => calendar::system_clock(),
    };

    if args.dump {
        let today = clock.today();
        let report = json!({
            "date": calendar::format_ymd(today),
            "summary": hr.summary(today),
            "week": hr.trailing_week(today),
            "employees": hr.list_employees(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    tracing::info!(employees = hr.employee_count(), "starting attendance desk");
    let screen = AttendanceScreen::new(config.title.clone(), hr, clock);
    let mut runtime = Runtime::new(screen, Terminal::new()?);
    runtime.run()?;
    tracing::info!("attendance desk closed");
    Ok(())
}
