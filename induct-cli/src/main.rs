//! A command line interface to the nightly fleet induction planner.
//!
//! ## Usage
//!
//! Plan the coming night from a problem definition in json format:
//!
//!     induct-cli fleet_snapshot.json -o induction_plan.json
//!
//! Override the search effort and make the run reproducible:
//!
//!     induct-cli fleet_snapshot.json --mode=thorough --seed=42 --log
//!
//! For more details, simply run
//!
//!     induct-cli --help

#[cfg(test)]
#[path = "../tests/unit/main_test.rs"]
mod main_test;

use clap::{Arg, ArgAction, ArgMatches, Command};

use std::fs::File;
use std::io::{stdout, BufReader, BufWriter, Write};
use std::process;
use std::str::FromStr;
use std::sync::Arc;

use induct_core::prelude::*;

const PROBLEM_ARG_NAME: &str = "PROBLEM";
const OUT_RESULT_ARG_NAME: &str = "out-result";
const MODE_ARG_NAME: &str = "mode";
const POPULATION_ARG_NAME: &str = "population-size";
const GENERATIONS_ARG_NAME: &str = "max-generations";
const TIME_ARG_NAME: &str = "max-time";
const MIN_SERVICE_ARG_NAME: &str = "min-service";
const SEED_ARG_NAME: &str = "seed";
const RUN_ID_ARG_NAME: &str = "run-id";
const LOG_ARG_NAME: &str = "log";

fn get_app() -> Command {
    Command::new("induct-cli")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Plans nightly trainset induction with a multi-objective search")
        .arg(
            Arg::new(PROBLEM_ARG_NAME)
                .help("Sets the problem file to use")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new(OUT_RESULT_ARG_NAME)
                .help("Specifies path to file for result output")
                .short('o')
                .long(OUT_RESULT_ARG_NAME)
                .required(false),
        )
        .arg(
            Arg::new(MODE_ARG_NAME)
                .help("Specifies the search mode")
                .long(MODE_ARG_NAME)
                .value_parser(["fast", "balanced", "thorough"])
                .required(false),
        )
        .arg(
            Arg::new(POPULATION_ARG_NAME)
                .help("Specifies population size used by the search")
                .short('p')
                .long(POPULATION_ARG_NAME)
                .required(false),
        )
        .arg(
            Arg::new(GENERATIONS_ARG_NAME)
                .help("Specifies maximum number of generations")
                .short('n')
                .long(GENERATIONS_ARG_NAME)
                .required(false),
        )
        .arg(
            Arg::new(TIME_ARG_NAME)
                .help("Specifies max time algorithm run in seconds")
                .short('t')
                .long(TIME_ARG_NAME)
                .required(false),
        )
        .arg(
            Arg::new(MIN_SERVICE_ARG_NAME)
                .help("Specifies minimum number of trainsets assigned to revenue service")
                .long(MIN_SERVICE_ARG_NAME)
                .required(false),
        )
        .arg(
            Arg::new(SEED_ARG_NAME)
                .help("Specifies seed used by the search for reproducible results")
                .long(SEED_ARG_NAME)
                .required(false),
        )
        .arg(
            Arg::new(RUN_ID_ARG_NAME)
                .help("Specifies id under which the run is registered")
                .long(RUN_ID_ARG_NAME)
                .required(false),
        )
        .arg(
            Arg::new(LOG_ARG_NAME)
                .help("Prints progress of the search to stderr")
                .short('l')
                .long(LOG_ARG_NAME)
                .action(ArgAction::SetTrue)
                .required(false),
        )
}

fn open_file(path: &str, description: &str) -> File {
    File::open(path).unwrap_or_else(|err| {
        eprintln!("cannot open {description} file '{path}': '{err}'");
        process::exit(1);
    })
}

fn create_file(path: &str, description: &str) -> File {
    File::create(path).unwrap_or_else(|err| {
        eprintln!("cannot create {description} file '{path}': '{err}'");
        process::exit(1);
    })
}

fn create_write_buffer(out_file: Option<File>) -> BufWriter<Box<dyn Write>> {
    if let Some(out_file) = out_file {
        BufWriter::new(Box::new(out_file))
    } else {
        BufWriter::new(Box::new(stdout()))
    }
}

fn parse_float_value<T: FromStr<Err = std::num::ParseFloatError>>(
    matches: &ArgMatches,
    arg_name: &str,
    arg_desc: &str,
) -> Result<Option<T>, String> {
    matches
        .get_one::<String>(arg_name)
        .map(|arg| {
            arg.parse::<T>().map_err(|err| format!("cannot get float value, error: '{err}': '{arg_desc}'")).map(Some)
        })
        .unwrap_or(Ok(None))
}

fn parse_int_value<T: FromStr<Err = std::num::ParseIntError>>(
    matches: &ArgMatches,
    arg_name: &str,
    arg_desc: &str,
) -> Result<Option<T>, String> {
    matches
        .get_one::<String>(arg_name)
        .map(|arg| {
            arg.parse::<T>().map_err(|err| format!("cannot get integer value, error: '{err}': '{arg_desc}'")).map(Some)
        })
        .unwrap_or(Ok(None))
}

fn get_solver_config(problem: &InductionProblem, matches: &ArgMatches) -> Result<SolverConfig, String> {
    let mut config = problem.solver_config().map_err(|err| err.to_string())?;

    if let Some(mode) = matches.get_one::<String>(MODE_ARG_NAME) {
        config.mode = match mode.as_str() {
            "fast" => SearchMode::Fast,
            "balanced" => SearchMode::Balanced,
            "thorough" => SearchMode::Thorough,
            _ => unreachable!(),
        };
    }

    if let Some(population_size) = parse_int_value::<usize>(matches, POPULATION_ARG_NAME, "population size")? {
        config.population_size = Some(population_size);
    }

    if let Some(max_generations) = parse_int_value::<usize>(matches, GENERATIONS_ARG_NAME, "max generations")? {
        config.max_generations = Some(max_generations);
    }

    if let Some(max_time) = parse_float_value::<Float>(matches, TIME_ARG_NAME, "max time")? {
        config.max_runtime_seconds = Some(max_time);
    }

    if let Some(min_service) = parse_int_value::<usize>(matches, MIN_SERVICE_ARG_NAME, "min service count")? {
        config.min_service_count = min_service;
    }

    if let Some(seed) = parse_int_value::<u64>(matches, SEED_ARG_NAME, "seed")? {
        config.seed = Some(seed);
    }

    Ok(config)
}

fn run_plan<F>(matches: &ArgMatches, writer_factory: F) -> Result<RunStatus, String>
where
    F: Fn(Option<File>) -> BufWriter<Box<dyn Write>>,
{
    let problem_path = matches.get_one::<String>(PROBLEM_ARG_NAME).expect("problem path is required");
    let problem_file = open_file(problem_path, "problem");

    let problem = deserialize_problem(BufReader::new(problem_file)).map_err(|err| err.to_string())?;
    let snapshot = Arc::new(problem.build_snapshot().map_err(|err| err.to_string())?);
    let config = get_solver_config(&problem, matches)?;

    let is_logging = matches.get_flag(LOG_ARG_NAME);
    let logger: InfoLogger = if is_logging {
        Arc::new(|msg: &str| eprintln!("{msg}"))
    } else {
        Arc::new(|_: &str| {})
    };

    let run_id = matches.get_one::<String>(RUN_ID_ARG_NAME).cloned().unwrap_or_else(|| "night-plan".to_string());

    let controller = Arc::new(ExecutionController::new(logger));
    let handle = controller.start(&run_id, snapshot.clone(), config).map_err(|err| err.to_string())?;

    let ctrlc_controller = controller.clone();
    let ctrlc_run_id = run_id.clone();
    // NOTE: only the first run of the process gets the interrupt handler.
    match ctrlc::set_handler(move || {
        eprintln!("received interrupt signal, cancelling run '{ctrlc_run_id}'");
        ctrlc_controller.cancel(&ctrlc_run_id);
    }) {
        Ok(()) | Err(ctrlc::Error::MultipleHandlers) => {}
        Err(err) => return Err(format!("cannot set interrupt handler: '{err}'")),
    }

    if is_logging {
        for event in handle.progress().iter() {
            if let Some(best) = event.best_objectives.as_ref() {
                eprintln!(
                    "[{:.3}s] generation {}: {} feasible, best readiness {:.3}, cost {:.3}, exposure {:.3}",
                    event.elapsed_ms as Float / 1000.,
                    event.generation,
                    event.feasible_count,
                    best.service_readiness,
                    best.maintenance_cost,
                    best.branding_exposure,
                );
            }
        }
    }

    let optimization = handle.join();
    if let Some(failure) = optimization.failure.as_ref() {
        eprintln!("run '{run_id}' failed: {failure}");
    }

    let result = create_result(&optimization, &snapshot);
    let out_file = matches.get_one::<String>(OUT_RESULT_ARG_NAME).map(|path| create_file(path, "result"));
    serialize_result(&result, writer_factory(out_file)).map_err(|err| err.to_string())?;

    Ok(optimization.status)
}

fn main() {
    let matches = get_app().get_matches();

    match run_plan(&matches, create_write_buffer) {
        Ok(RunStatus::Failed) => process::exit(1),
        Ok(_) => {}
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}
