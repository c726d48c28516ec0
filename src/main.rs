use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use nurse_roster::application::{RosterSolution, Scenario};
use nurse_roster::infrastructure::{self, init_logging, RosterConfig};
use nurse_roster::{CoverageProfile, SolverBackend};
use std::path::PathBuf;

/// Generate nurse rostering scenarios and solve them with a MIP backend
#[derive(Parser)]
#[command(name = "nurse-roster", version)]
struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON configuration file; flags below override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding nurses.csv, coverage.csv, preferences.csv and the solution
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a synthetic scenario into the data directory
    Generate(GenerateArgs),
    /// Solve the scenario in the data directory and write the schedule
    Solve(SolveArgs),
    /// Generate, then solve
    Run {
        #[command(flatten)]
        generate: GenerateArgs,
        #[command(flatten)]
        solve: SolveArgs,
    },
    /// Re-check an existing schedule against the input tables
    Check,
}

#[derive(Args)]
struct GenerateArgs {
    #[arg(long)]
    nurses: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    /// basic or complex
    #[arg(long)]
    profile: Option<CoverageProfile>,
}

#[derive(Args)]
struct SolveArgs {
    /// auto, cbc or highs
    #[arg(long)]
    backend: Option<SolverBackend>,
    /// Seconds
    #[arg(long)]
    time_limit: Option<f64>,
    #[arg(long)]
    threads: Option<u32>,
    /// Solution file name inside the data directory
    #[arg(long)]
    output: Option<String>,
}

impl GenerateArgs {
    fn apply(&self, config: &mut RosterConfig) {
        if let Some(n) = self.nurses {
            config.scenario.nurse_count = n;
        }
        if let Some(seed) = self.seed {
            config.scenario.seed = seed;
        }
        if let Some(profile) = self.profile {
            config.scenario.profile = profile;
        }
    }
}

impl SolveArgs {
    fn apply(&self, config: &mut RosterConfig) {
        if let Some(backend) = self.backend {
            config.solver.backend = backend;
        }
        if let Some(limit) = self.time_limit {
            config.solver.time_limit = Some(limit);
        }
        if let Some(threads) = self.threads {
            config.solver.threads = Some(threads);
        }
        if let Some(output) = &self.output {
            config.solution_file = output.clone();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => RosterConfig::load(path)?,
        None => RosterConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }

    match &cli.command {
        Command::Generate(args) => {
            args.apply(&mut config);
            generate(&config)?;
        }
        Command::Solve(args) => {
            args.apply(&mut config);
            solve(&config)?;
        }
        Command::Run { generate: g, solve: s } => {
            g.apply(&mut config);
            s.apply(&mut config);
            generate(&config)?;
            solve(&config)?;
        }
        Command::Check => check(&config)?,
    }

    Ok(())
}

fn generate(config: &RosterConfig) -> Result<()> {
    let scenario = infrastructure::run_generate(config).context("scenario generation failed")?;
    print_scenario(config, &scenario);
    Ok(())
}

fn solve(config: &RosterConfig) -> Result<()> {
    let solution = infrastructure::run_solve(config).context("rostering failed")?;
    println!("Solution saved to: {}", config.solution_path().display());
    print_solution(&solution);
    Ok(())
}

fn check(config: &RosterConfig) -> Result<()> {
    let violations = infrastructure::run_check(config).context("schedule check failed")?;
    if violations.is_empty() {
        println!("✓ {} satisfies every hard constraint", config.solution_path().display());
        return Ok(());
    }
    for v in &violations {
        println!("✗ {}", v);
    }
    anyhow::bail!("{} hard constraint violation(s)", violations.len())
}

fn print_scenario(config: &RosterConfig, scenario: &Scenario) {
    println!(
        "Generated {} nurses, {} coverage rows, {} preferences in {}",
        scenario.nurses.len(),
        scenario.coverage.len(),
        scenario.preferences.len(),
        config.data_dir.display()
    );
}

fn print_solution(solution: &RosterSolution) {
    println!("Solver:     {}", solution.solver_name);
    println!("Status:     {}", solution.status);
    println!("Objective:  {}", solution.objective);
    println!(
        "Runtime:    {:.3} s",
        solution.statistics.solve_time_ms / 1000.0
    );

    if !solution.violated_preferences.is_empty() {
        println!("\nUnmet preferences:");
        for p in &solution.violated_preferences {
            println!(
                "  nurse {:>3} {} {} {:<5} (weight {})",
                p.nurse_id, p.day, p.shift, p.preference_type, p.weight
            );
        }
    }

    println!("\nCoverage (assigned/required, senior, icu):");
    for slot in &solution.coverage {
        let required = slot
            .required_total
            .map_or_else(|| "-".to_string(), |r| r.to_string());
        println!(
            "  {} {}  {:>2}/{:<2}  senior {:>2}  icu {:>2}",
            slot.day, slot.shift, slot.assigned, required, slot.senior_like, slot.icu
        );
    }

    if let Some(stats) = solution.schedule.stats() {
        println!("\nAssigned shifts per nurse:\n{}", stats);
    }
}
