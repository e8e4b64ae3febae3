use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum, crate_authors, crate_description};
use kanshi::{Almanac, CalendarDate, Config, ConfigError, DataError, MessageCatalog, MonthKeying, Wizard, WizardError};
use log::{LevelFilter, info};

#[derive(Parser, Debug)]
#[command(author=crate_authors!(), version, about=crate_description!())]
struct Args {
    /// Birth date, YYYY-MM-DD
    date: CalendarDate,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read tables from this directory instead of the bundled ones
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Order in which month-table keys are tried
    #[arg(long, value_enum)]
    month_keying: Option<KeyingArg>,

    /// Print the diagnosis as JSON
    #[arg(long, action)]
    json: bool,

    /// Print the table keys each index was resolved from
    #[arg(long, action)]
    explain: bool,

    /// More logging; repeat for more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KeyingArg {
    Solar,
    SolarWithFallback,
    CalendarFirst,
}

impl From<KeyingArg> for MonthKeying {
    fn from(arg: KeyingArg) -> Self {
        match arg {
            KeyingArg::Solar => Self::Solar,
            KeyingArg::SolarWithFallback => Self::SolarWithFallback,
            KeyingArg::CalendarFirst => Self::CalendarFirst,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// 0 -> warn, 1 -> info, 2 -> debug, 3+ -> trace. `RUST_LOG` overrides.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_config(args: &Args) -> Result<Config, ConfigError> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(dir) = &args.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if let Some(keying) = args.month_keying {
        config.month_keying = keying.into();
    }
    Ok(config)
}

fn explain(almanac: &Almanac, date: CalendarDate) {
    println!("risshun {}: {}", date.year(), almanac.risshun_date(date.year()));
    println!("solar year: {}", almanac.solar_year(date));
    println!("setsu month: {}", almanac.setsu_month(date));
    match almanac.month_lookup(date) {
        Some(hit) => println!("month key: {} -> {}", hit.key, hit.index.get()),
        None => println!("month key: none"),
    }
    match almanac.day_lookup(date) {
        Some(hit) => println!(
            "day anchor: {} = {} + {} days -> {}",
            hit.anchor_key,
            hit.anchor.get(),
            hit.offset_days,
            hit.index.get()
        ),
        None => println!("day anchor: none"),
    }
    println!();
}

fn run(args: &Args) -> Result<(), CliError> {
    let config = load_config(args)?;
    let almanac = config.load_almanac()?;
    let messages: MessageCatalog = config.load_messages()?;
    info!("month keying: {:?}", almanac.keying());

    let mut wizard = Wizard::new(&almanac, &messages, config.supported_range);
    wizard.submit(args.date)?;
    let diagnosis = wizard.confirm()?;

    if args.explain {
        explain(&almanac, args.date);
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(diagnosis)?);
    } else {
        print!("{diagnosis}");
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        },
    }
}

#[test]
fn verify_cli() {
    use clap::CommandFactory;
    Args::command().debug_assert();
}
