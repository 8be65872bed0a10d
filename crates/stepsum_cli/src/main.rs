use clap::{Parser as ClapParser, Subcommand};
use colored::Colorize;
use dotenv::dotenv;
use log::{debug, info};
use std::fmt;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use stepsum::{
    format_combination,
    parse_step_values,
    run_config,
    CaseOutcome,
    CaseReport,
    ConfigError,
    DemoConfig,
    Report,
    SolverError,
    StairsCase,
    Strategy,
    SumCase,
    SumMode,
};

#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Output results in JSON format
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum Command {
    /// Run the demonstration cases (the default)
    Demo {
        /// TOML file of cases, overriding STEPSUM_CASES and the config directory
        #[arg(long)]
        cases: Option<PathBuf>,

        /// Print the cases as TOML instead of running them
        #[arg(long, default_value_t = false)]
        print_cases: bool,
    },
    /// Count the ways to climb N stairs taking one or two steps at a time
    Stairs {
        #[arg(allow_negative_numbers = true)]
        n: i64,

        /// naive, memoized or tabulated
        #[arg(long, default_value = "memoized", value_parser = parse_strategy)]
        strategy: Strategy,
    },
    /// Check whether TARGET can be built from STEPS, and how
    Sum {
        #[arg(allow_negative_numbers = true)]
        target: i64,

        /// Step values, e.g. "3,4,5,7" or "[3, 4, 5, 7]"
        steps: String,

        /// exists, witness or all
        #[arg(long, default_value = "exists", value_parser = parse_mode)]
        mode: SumMode,

        /// naive, memoized or tabulated
        #[arg(long, default_value = "memoized", value_parser = parse_strategy)]
        strategy: Strategy,
    },
}

#[derive(Debug)]
enum CliError {
    Solver(SolverError),
    Config(ConfigError),
    Output(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Solver(e) => write!(f, "{}", e),
            CliError::Config(e) => write!(f, "{}", e),
            CliError::Output(msg) => write!(f, "Output error: {}", msg),
        }
    }
}

impl From<SolverError> for CliError {
    fn from(error: SolverError) -> Self {
        CliError::Solver(error)
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        CliError::Config(error)
    }
}

fn parse_strategy(name: &str) -> Result<Strategy, String> {
    Strategy::from_name(name)
        .ok_or_else(|| format!("unknown strategy '{}' (naive, memoized, tabulated)", name))
}

fn parse_mode(name: &str) -> Result<SumMode, String> {
    SumMode::from_name(name).ok_or_else(|| format!("unknown mode '{}' (exists, witness, all)", name))
}

fn main() {
    dotenv().ok();
    env_logger::init();
    let args = Args::parse();

    let start_time = Instant::now();
    let command = args.command.unwrap_or(Command::Demo {
        cases: None,
        print_cases: false,
    });

    match run(&command, args.json) {
        Ok(failed_cases) => {
            info!("Finished in {:.3} seconds", start_time.elapsed().as_secs_f64());
            if failed_cases > 0 {
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            process::exit(1);
        }
    }
}

/// Runs one command and returns how many of its cases failed.
fn run(command: &Command, json_output: bool) -> Result<usize, CliError> {
    if let Command::Demo { cases, print_cases: true } = command {
        print!("{}", load_cases(cases.as_ref())?.to_toml()?);
        return Ok(0);
    }

    let config = build_config(command)?;
    debug!(
        "Running {} stairs and {} sums cases",
        config.stairs.len(),
        config.sums.len()
    );

    let report = run_config(&config);
    print_report(&report, json_output)?;
    Ok(report.summary.failed_cases)
}

fn load_cases(path: Option<&PathBuf>) -> Result<DemoConfig, CliError> {
    let config = match path {
        Some(path) => DemoConfig::load_from_path(path)?,
        None => DemoConfig::load()?,
    };
    Ok(config)
}

fn build_config(command: &Command) -> Result<DemoConfig, CliError> {
    match command {
        Command::Demo { cases, .. } => load_cases(cases.as_ref()),
        Command::Stairs { n, strategy } => Ok(DemoConfig {
            stairs: vec![StairsCase { n: *n, strategy: *strategy }],
            sums: Vec::new(),
        }),
        Command::Sum { target, steps, mode, strategy } => Ok(DemoConfig {
            stairs: Vec::new(),
            sums: vec![SumCase {
                target: *target,
                steps: parse_step_values(steps)?,
                mode: *mode,
                strategy: *strategy,
            }],
        }),
    }
}

fn format_case(case: &CaseReport) -> Vec<String> {
    let outcome = match (&case.outcome, &case.error) {
        (_, Some(error)) => return vec![format!("{}: {}", case.label, error.red())],
        (Some(outcome), None) => outcome,
        (None, None) => return vec![format!("{}: {}", case.label, "no result".yellow())],
    };

    match outcome {
        CaseOutcome::Stairs { count } => vec![format!("{}: {}", case.label, count)],
        CaseOutcome::Sum { reachable, combinations } => {
            let answer = if *reachable {
                "true".green().to_string()
            } else {
                "false".red().to_string()
            };
            let mut lines = vec![format!("{}? {}", case.label, answer)];
            if combinations.len() > 1 {
                lines[0].push_str(&format!(" ({} combinations)", combinations.len()));
            }
            for combination in combinations {
                lines.push(format!("    {}", format_combination(combination)));
            }
            lines
        }
    }
}

fn print_report(report: &Report, json_output: bool) -> Result<(), CliError> {
    if json_output {
        let output = serde_json::to_string_pretty(report)
            .map_err(|e| CliError::Output(e.to_string()))?;
        println!("{}", output);
        return Ok(());
    }

    for case in &report.cases {
        for line in format_case(case) {
            println!("{}", line);
        }
    }

    let summary = &report.summary;
    println!("\nSummary:");
    println!("Total cases: {}", summary.total_cases);
    println!("Reachable sums: {}", summary.reachable_sums);
    println!("Unreachable sums: {}", summary.unreachable_sums);
    if summary.failed_cases > 0 {
        println!("Failed cases: {}", summary.failed_cases.to_string().red());
    }
    Ok(())
}
