//! exprtree - runs expression tree walkthroughs

use anyhow::{bail, Context, Result};
use clap::Parser as ClapParser;
use exprtree::demo::{Report, Scenario};

/// Build, rewrite, evaluate and render small expression trees
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario to run; runs all of them when omitted
    #[arg(value_enum)]
    scenario: Option<Scenario>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Print reports as JSON
    #[arg(short, long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let scenarios = match args.scenario {
        Some(scenario) => vec![scenario],
        None => Scenario::ALL.to_vec(),
    };

    let mut reports = Vec::new();
    let mut failed = 0;
    for scenario in scenarios {
        log::info!("Running scenario {}", scenario.name());
        match scenario.run() {
            Ok(report) => reports.push(report),
            Err(e) => {
                eprintln!("❌ Scenario {} failed: {}", scenario.name(), e);
                failed += 1;
            }
        }
    }

    if args.json {
        let json = serde_json::to_string_pretty(&reports).context("Failed to serialize reports")?;
        println!("{}", json);
    } else {
        for report in &reports {
            print_report(report);
        }
    }

    if failed > 0 {
        bail!("{} scenario(s) failed", failed);
    }
    Ok(())
}

fn print_report(report: &Report) {
    println!("== {} ==", report.scenario);
    for entry in &report.entries {
        if entry.text.contains('\n') {
            println!("   {}:", entry.label);
            for line in entry.text.lines() {
                println!("      {}", line);
            }
        } else {
            println!("   {}: {}", entry.label, entry.text);
        }
    }
    println!();
}
