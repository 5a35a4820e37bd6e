//! The command-line interface.

use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use log::info;

use crate::cost::CostMatrix;
use crate::cost::DepartureTime;
use crate::cost::TableLookup;
use crate::formulation::TspModel;
use crate::pipeline::PlannedTour;
use crate::pipeline::PlannerOptions;
use crate::pipeline::PlanningError;
use crate::pipeline::TourPlanner;
use crate::solver::GoodLpBackend;
use crate::solver::SolverAdapter;
use crate::statistics;
use crate::termination::Cancellation;

#[derive(Debug, clap::Parser)]
#[command(version, about = "Optimal asymmetric tours through mixed-integer programming")]
pub struct Cli {
    /// The DZN instance with the number of locations `N` and the travel times `Dist`.
    pub instance: PathBuf,

    /// Log debug output, unless `RUST_LOG` says otherwise.
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Action,
}

#[derive(Clone, Debug, clap::Subcommand)]
pub enum Action {
    /// Solve the given instance.
    Solve {
        /// The number of seconds the solver is allowed to run.
        #[arg(short = 'T', long = "time-out", default_value_t = 60)]
        time_out: u64,

        /// The departure time for all cost lookups, in seconds since the Unix epoch.
        ///
        /// Defaults to the current time.
        #[arg(short = 'D', long = "departure")]
        departure: Option<u64>,

        /// The file path to which the model will be written in LP format.
        #[arg(long = "write-lp")]
        lp_path: Option<PathBuf>,

        /// Print solver statistics as `%% name=value` lines.
        #[arg(short = 'S', long = "statistics")]
        log_statistics: bool,
    },

    /// Write a random asymmetric instance to the instance path.
    Generate {
        /// The number of locations.
        #[arg(short = 'N', long = "nodes")]
        nodes: usize,

        /// The seed of the random generator.
        #[arg(short = 's', long = "seed", default_value_t = 0)]
        seed: u64,
    },
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let args = Cli::parse();
    statistics::init_logging(args.verbose);

    match args.command {
        Action::Solve {
            time_out,
            departure,
            lp_path,
            log_statistics,
        } => {
            statistics::configure(log_statistics, "%% ");

            let options = PlannerOptions {
                time_budget: Duration::from_secs(time_out),
                departure: departure
                    .map(DepartureTime::from_unix_seconds)
                    .unwrap_or_else(DepartureTime::now),
            };

            solve(&args.instance, options, lp_path.as_deref())
        }
        Action::Generate { nodes, seed } => generate(&args.instance, nodes, seed),
    }
}

pub fn solve(
    instance: &Path,
    options: PlannerOptions,
    lp_path: Option<&Path>,
) -> anyhow::Result<()> {
    let data = std::fs::read_to_string(instance)
        .with_context(|| format!("Error reading {}", instance.display()))?;

    let data = dzn_rs::parse::<i32>(data.as_bytes())
        .with_context(|| format!("Failed to parse DZN from {}", instance.display()))?;

    let table = TableLookup::from_dzn(&data)
        .with_context(|| format!("Invalid instance {}", instance.display()))?;

    let costs = match CostMatrix::build(&table.locations(), &table, options.departure) {
        Ok(costs) => costs,
        Err(error) => return report_failure(PlanningError::from(error)),
    };

    if let Some(lp_path) = lp_path {
        match TspModel::build(&costs) {
            Ok(formulation) => write_lp(&formulation, lp_path)?,
            Err(error) => return report_failure(PlanningError::from(error)),
        }
    }

    let cancellation = Cancellation::on_termination_signals()
        .context("Failed to register the termination signal handlers")?;
    let planner = TourPlanner::new(
        SolverAdapter::new(GoodLpBackend).with_cancellation(cancellation),
        options,
    );

    match planner.plan_with_costs(&costs) {
        Ok(tour) => {
            print_tour(&tour);
            Ok(())
        }
        Err(error) => report_failure(error),
    }
}

fn report_failure(error: PlanningError) -> anyhow::Result<()> {
    match error {
        PlanningError::NoTour { .. } => {
            info!("{error}");
            println!("UNSATISFIABLE");
            Ok(())
        }
        PlanningError::TimedOut { .. } => {
            info!("{error}");
            println!("UNKNOWN");
            Ok(())
        }
        error => {
            let stage = error.stage();
            Err(anyhow::Error::new(error).context(format!("Planning failed in the {stage} stage")))
        }
    }
}

fn print_tour(tour: &PlannedTour) {
    let order: Vec<String> = tour.order.iter().map(usize::to_string).collect();

    println!("Tour = [{}];", order.join(", "));
    println!("Cost = {};", tour.total_cost);
    println!("Edges = [");
    for edge in &tour.edges {
        println!("  {edge},");
    }
    println!("];");
    println!("----------");
    println!("==========");
}

fn write_lp(formulation: &TspModel, path: &Path) -> anyhow::Result<()> {
    let file =
        File::create(path).with_context(|| format!("Error creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    formulation
        .model()
        .write_lp(&mut writer)
        .and_then(|_| writer.flush())
        .with_context(|| format!("Error writing the model to {}", path.display()))?;

    info!("Wrote the model to {}", path.display());
    Ok(())
}

pub fn generate(instance: &Path, nodes: usize, seed: u64) -> anyhow::Result<()> {
    let table = TableLookup::random(nodes, seed);

    std::fs::write(instance, table.to_dzn())
        .with_context(|| format!("Error writing {}", instance.display()))?;

    info!(
        "Wrote a random instance with {nodes} locations to {}",
        instance.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::SolveStatus;

    fn options() -> PlannerOptions {
        PlannerOptions {
            time_budget: Duration::from_secs(120),
            departure: DepartureTime::from_unix_seconds(1_700_000_000),
        }
    }

    #[test]
    fn no_tour_and_timeout_are_reported_as_outcomes() {
        let no_tour = PlanningError::NoTour {
            status: SolveStatus::Infeasible,
        };
        let timed_out = PlanningError::TimedOut {
            elapsed: Duration::from_secs(60),
            best_bound: None,
        };

        assert!(report_failure(no_tour).is_ok());
        assert!(report_failure(timed_out).is_ok());
    }

    #[test]
    fn other_failures_carry_their_stage() {
        let error = report_failure(PlanningError::SolverFailed {
            message: "out of memory".to_owned(),
        })
        .expect_err("a solver failure is an error");

        assert_eq!(error.to_string(), "Planning failed in the solve stage");
        assert_eq!(
            error.root_cause().to_string(),
            "the solver failed: out of memory"
        );
    }

    #[test]
    fn generated_instance_can_be_solved_and_exported() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let instance = dir.path().join("random.dzn");
        let lp_path = dir.path().join("random.lp");

        generate(&instance, 5, 7).expect("instance is written");
        solve(&instance, options(), Some(&lp_path)).expect("the instance is solved");

        let lp = std::fs::read_to_string(&lp_path).expect("model is written");
        assert!(lp.starts_with("Minimize"));
        assert!(lp.contains(" mtz_1_2:"));
        assert!(lp.trim_end().ends_with("End"));
    }

    #[test]
    fn generated_instance_matches_the_seeded_table() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let instance = dir.path().join("random.dzn");

        generate(&instance, 4, 11).expect("instance is written");

        let written = std::fs::read_to_string(&instance).expect("instance is readable");
        assert_eq!(written, TableLookup::random(4, 11).to_dzn());
    }

    #[test]
    fn missing_instance_is_an_error() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let instance = dir.path().join("missing.dzn");

        let error = solve(&instance, options(), None).expect_err("nothing to read");

        assert!(error.to_string().starts_with("Error reading"));
    }

    #[test]
    fn instance_without_distances_is_an_error() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let instance = dir.path().join("incomplete.dzn");
        std::fs::write(&instance, "N = 3;\n").expect("instance is written");

        let error = solve(&instance, options(), None).expect_err("Dist is missing");

        assert!(error.to_string().starts_with("Invalid instance"));
    }

    #[test]
    fn single_location_instance_fails_in_the_model_stage() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let instance = dir.path().join("single.dzn");
        generate(&instance, 1, 0).expect("instance is written");

        let error = solve(&instance, options(), None).expect_err("one location has no tour");

        assert_eq!(error.to_string(), "Planning failed in the model stage");
    }
}
