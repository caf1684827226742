use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use blendplan_model::{PlanError, PlanReport, PlanTables, Planner};

#[derive(Parser)]
#[command(name = "blendplan")]
#[command(about = "Least-cost multi-period blend planning", long_about = None)]
struct Cli {
    /// Log filter written to stderr (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a planning input and output the optimal plan
    Solve {
        /// The JSON file with the planning tables
        file: PathBuf,
        /// Output format (json, pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Check a planning input for errors
    Check {
        /// The file to check
        file: PathBuf,
    },
}

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load(file: &Path) -> PlanTables {
    match PlanTables::load_file(file) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error reading {}: {}", file.display(), e);
            std::process::exit(2);
        }
    }
}

fn print_report(report: &PlanReport) {
    println!("Status: {}", report.status);
    println!("Total cost: {:.2}", report.total_cost);

    for period in &report.periods {
        println!();
        println!("--------------------");
        println!("Period {} (purchases {:.2})", period.period, period.purchase_cost);
        for b in &period.blendstocks {
            if b.bought > 0.001 || b.held > 0.001 {
                println!("  {:10} held {:10.2}  bought {:10.2}  cost {:12.2}", b.name, b.held, b.bought, b.cost);
            }
        }
        for product in &period.products {
            println!("  Material blended: {} = {:.2}", product.name, product.produced);
            for line in &product.blend {
                if line.quantity > 0.001 {
                    println!("    {:10} {:10.2}", line.blendstock, line.quantity);
                }
            }
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Commands::Solve { file, format } => {
            let tables = load(&file);

            match Planner::new().plan_tables(&tables) {
                Ok(report) => {
                    if format == "json" {
                        match serde_json::to_string_pretty(&report) {
                            Ok(json) => println!("{}", json),
                            Err(e) => {
                                eprintln!("Error encoding report: {}", e);
                                std::process::exit(1);
                            }
                        }
                    } else {
                        print_report(&report);
                    }
                }
                Err(PlanError::InvalidInput(e)) => {
                    eprintln!("Invalid input: {}", e);
                    std::process::exit(2);
                }
                Err(e) => {
                    if let Some(status) = e.status() {
                        println!("Status: {}", status);
                    }
                    println!("{}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Check { file } => {
            let tables = load(&file);

            match tables.build() {
                Ok(data) => {
                    println!("✓ {} is valid", file.display());
                    println!("  {} specs", data.specs().len());
                    println!("  {} blendstocks", data.blendstocks().len());
                    println!("  {} products", data.products().len());
                    println!("  {} periods", data.num_periods());
                }
                Err(e) => {
                    eprintln!("✗ {} has errors:", file.display());
                    eprintln!("  {}", e);
                    std::process::exit(2);
                }
            }
        }
    }
}
