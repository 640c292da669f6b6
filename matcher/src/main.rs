mod logging;
mod prompt;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use belegium::{Cost, PreferenceTable, Scoring, DEFAULT_DIRECT_MATCH_BONUS};
use clap::Parser;
use log::info;
use strum::VariantArray;

use crate::logging::LogLevel;

#[derive(Parser)]
#[command(name = "matcher")]
#[command(about = "Match applicants to shared flats from a two-table preference file")]
#[command(version)]
pub struct Cli {
    #[arg(help = "Path to the preference file")]
    input: PathBuf,
    #[arg(long, default_value_t = DEFAULT_DIRECT_MATCH_BONUS, help = "Extra points for pairs that both gave top marks")]
    direct_match_bonus: Cost,
    #[arg(long, value_name = "NAME=PLACES", value_parser = parse_capacity, help = "Free places of a destination, may be repeated")]
    capacity: Vec<(String, usize)>,
    #[arg(long, help = "Do not ask for further capacities on stdin")]
    no_prompt: bool,
    #[arg(long, value_name = "STRATEGY", help = "Scoring to solve with (sum, product, balanced), may be repeated; default all")]
    scoring: Vec<Scoring>,
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, help = "Log level")]
    log_level: LogLevel,
}

fn parse_capacity(arg: &str) -> Result<(String, usize), String> {
    let (name, places) = arg.rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=PLACES, found `{arg}`"))?;
    let places = places.trim().parse().map_err(|e| format!("invalid number of places `{places}`: {e}"))?;

    Ok((name.trim().to_string(), places))
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut table = PreferenceTable::read(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    info!("read {} destinations and {} applicants", table.destinations().len(), table.applicants().len());
    println!("{table}");

    for (name, places) in &cli.capacity {
        table.set_capacity(name, *places)?;
    }
    if !cli.no_prompt {
        prompt::collect_capacities(&mut table, io::stdin().lock(), io::stdout().lock())?;
    }

    table.apply_extrema(cli.direct_match_bonus);
    let table = table.expand_capacities();

    let strategies = if cli.scoring.is_empty() { Scoring::VARIANTS.to_vec() } else { cli.scoring };

    println!();
    println!("Each solution maximizes the sum of scores over all matched pairs.");
    println!("A score combines the points an applicant gave a destination (a) and the points the destination gave the applicant (b).");
    for (index, scoring) in strategies.into_iter().enumerate() {
        println!();
        println!("Solution {}: {} ({})", index + 1, scoring, scoring.formula());
        let matching = table.match_with(|a, b| scoring.combine(a, b))?;
        print!("{matching}");
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logging::init_logger(cli.log_level) {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
