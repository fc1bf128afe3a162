use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Duration, Instant};

use clap::{Args, Command, FromArgMatches as _};
use humantime::format_duration;
use log::info;

use crate::error::HerdError;
use crate::log::{set_log_level, set_module_filter, LevelFilter};
use crate::parameters::Parameters;
use crate::report::{log_file_name, CsvRecorder, Recorder, TextRecorder};
use crate::simulation::{Simulation, SimulationOutcome};

/// Default cli arguments for the herd runner
#[derive(Args, Debug)]
pub struct BaseArgs {
    /// Random seed. Overrides the seed from a parameter file
    #[arg(short, long)]
    pub random_seed: Option<u64>,

    /// Optional path for a JSON parameter file, used when no model arguments are given
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for the event log and reports
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Also write CSV reports of every interaction, survival outcome and step
    #[arg(long)]
    pub csv: bool,

    /// Diagnostic log levels, e.g. `info` or `warn,herd::simulation=debug`. Levels are off,
    /// error, warn, info, debug or trace
    #[arg(long, default_value = "off")]
    pub log_level: String,
}

/// A parsed `--log-level` value: an optional global level plus per-module levels.
#[derive(Debug, Default, PartialEq)]
pub struct LogLevels {
    pub global: Option<LevelFilter>,
    pub modules: Vec<(String, LevelFilter)>,
}

impl FromStr for LogLevels {
    type Err = HerdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parse_level = |level: &str| {
            LevelFilter::from_str(level.trim())
                .map_err(|_| HerdError::InvalidConfiguration(format!("unknown log level {level:?}")))
        };

        let mut log_levels = LogLevels::default();
        for entry in value.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
            match entry.split_once('=') {
                Some((module, level)) => {
                    let module = module.trim();
                    if module.is_empty() {
                        return Err(format!("missing module path in {entry:?}").into());
                    }
                    log_levels.modules.push((module.to_string(), parse_level(level)?));
                }
                None => log_levels.global = Some(parse_level(entry)?),
            }
        }
        Ok(log_levels)
    }
}

impl LogLevels {
    /// Installs these levels in the global logger.
    pub fn apply(&self) {
        if let Some(level) = self.global {
            set_log_level(level);
        }
        for (module, level) in &self.modules {
            set_module_filter(module, *level);
        }
    }
}

/// Model inputs given on the command line. Either the first five are all given or none is.
#[derive(Args, Debug, Default)]
pub struct ModelArgs {
    /// Name of the pathogen
    pub pathogen_name: Option<String>,

    /// Probability that one contact infects a susceptible person
    pub transmission_probability: Option<f64>,

    /// Probability that an infected person dies
    pub mortality_probability: Option<f64>,

    /// Number of people in the population
    pub population_size: Option<usize>,

    /// Fraction of the population vaccinated at the start
    pub vaccination_fraction: Option<f64>,

    /// Number of people infected at the start [default: 1]
    pub initial_infected: Option<usize>,
}

/// What a completed command line run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub parameters: Parameters,
    pub outcome: SimulationOutcome,
    pub log_path: PathBuf,
    pub csv_directory: Option<PathBuf>,
    pub elapsed: Duration,
}

fn create_herd_cli() -> Command {
    let cli = Command::new("herd")
        .about("Simulates the spread of a pathogen through a partially vaccinated population");
    let cli = BaseArgs::augment_args(cli);
    ModelArgs::augment_args(cli)
}

/// Parses the command line and runs a simulation.
///
/// # Errors
/// Returns an error if argument parsing fails, the parameters are invalid, the output files
/// cannot be written, or the simulation hits an invariant violation.
pub fn run_with_args() -> Result<RunSummary, Box<dyn std::error::Error>> {
    let matches = create_herd_cli().get_matches();

    let base_args = BaseArgs::from_arg_matches(&matches)?;
    let model_args = ModelArgs::from_arg_matches(&matches)?;
    base_args.log_level.parse::<LogLevels>()?.apply();
    Ok(run_with_args_internal(&base_args, &model_args)?)
}

/// Picks the parameters for a run: model arguments if given, otherwise the parameter file,
/// otherwise the defaults. A random seed argument overrides all of them.
///
/// # Errors
/// Returns `HerdError::InvalidConfiguration` if only some of the model arguments are given,
/// or the parameter file's error if it cannot be loaded.
pub fn resolve_parameters(args: &BaseArgs, model: &ModelArgs) -> Result<Parameters, HerdError> {
    let mut parameters = match (
        &model.pathogen_name,
        model.transmission_probability,
        model.mortality_probability,
        model.population_size,
        model.vaccination_fraction,
    ) {
        (
            Some(pathogen_name),
            Some(transmission_probability),
            Some(mortality_probability),
            Some(population_size),
            Some(vaccination_fraction),
        ) => Parameters {
            pathogen_name: pathogen_name.clone(),
            transmission_probability,
            mortality_probability,
            population_size,
            vaccination_fraction,
            initial_infected: model.initial_infected.unwrap_or(1),
            ..Parameters::default()
        },
        (None, None, None, None, None) => {
            if model.initial_infected.is_some() {
                return Err("initial infected count given without the other model arguments".into());
            }
            match &args.config {
                Some(path) => {
                    info!("loading parameters from {}", path.display());
                    Parameters::from_json_file(path)?
                }
                None => Parameters::default(),
            }
        }
        _ => {
            return Err("expected PATHOGEN TRANSMISSION MORTALITY POPULATION VACCINATION \
                        [INITIAL_INFECTED]"
                .into())
        }
    };

    if let Some(seed) = args.random_seed {
        parameters.random_seed = seed;
    }
    Ok(parameters)
}

fn execute<W: Recorder>(
    parameters: &Parameters,
    recorder: W,
) -> Result<(SimulationOutcome, W), HerdError> {
    let mut simulation = Simulation::from_parameters(parameters, recorder)?;
    let outcome = simulation.run()?;
    Ok((outcome, simulation.into_recorder()))
}

fn run_with_args_internal(args: &BaseArgs, model: &ModelArgs) -> Result<RunSummary, HerdError> {
    let parameters = resolve_parameters(args, model)?;
    // Nothing is written for a run that cannot start.
    parameters.validate()?;

    let log_path = args.output_dir.join(log_file_name(
        &parameters.pathogen_name,
        parameters.population_size,
        parameters.vaccination_fraction,
        parameters.initial_infected,
    ));
    let text_recorder = TextRecorder::create(&log_path)?;

    let start = Instant::now();
    let (outcome, csv_directory) = if args.csv {
        let csv_recorder = CsvRecorder::create(&args.output_dir)?;
        let (outcome, (text_recorder, csv_recorder)) =
            execute(&parameters, (text_recorder, csv_recorder))?;
        text_recorder.finish()?;
        (outcome, Some(csv_recorder.finish()?))
    } else {
        let (outcome, text_recorder) = execute(&parameters, text_recorder)?;
        text_recorder.finish()?;
        (outcome, None)
    };
    let elapsed = start.elapsed();
    info!(
        "simulation of {} finished in {}",
        parameters.pathogen_name,
        format_duration(elapsed)
    );

    Ok(RunSummary {
        parameters,
        outcome,
        log_path,
        csv_directory,
        elapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn base_args(output_dir: PathBuf) -> BaseArgs {
        BaseArgs {
            random_seed: None,
            config: None,
            output_dir,
            csv: false,
            log_level: "off".to_string(),
        }
    }

    fn measles() -> ModelArgs {
        ModelArgs {
            pathogen_name: Some("Measles".to_string()),
            transmission_probability: Some(0.2),
            mortality_probability: Some(0.1),
            population_size: Some(200),
            vaccination_fraction: Some(0.5),
            initial_infected: None,
        }
    }

    #[test]
    fn log_levels_global_and_modules() {
        let log_levels: LogLevels = "warn, herd::simulation=trace,herd::people=Debug"
            .parse()
            .unwrap();
        assert_eq!(
            log_levels,
            LogLevels {
                global: Some(LevelFilter::Warn),
                modules: vec![
                    ("herd::simulation".to_string(), LevelFilter::Trace),
                    ("herd::people".to_string(), LevelFilter::Debug),
                ],
            }
        );
        assert_eq!("".parse::<LogLevels>().unwrap(), LogLevels::default());
    }

    #[test]
    fn bad_log_levels() {
        for value in ["loud", "herd::simulation=loud", "=info"] {
            assert!(
                matches!(
                    value.parse::<LogLevels>(),
                    Err(HerdError::InvalidConfiguration(_))
                ),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn defaults_without_arguments() {
        let args = base_args(PathBuf::from("."));
        let parameters = resolve_parameters(&args, &ModelArgs::default()).unwrap();
        assert_eq!(parameters, Parameters::default());
    }

    #[test]
    fn model_arguments_default_to_one_infected() {
        let args = base_args(PathBuf::from("."));
        let parameters = resolve_parameters(&args, &measles()).unwrap();
        assert_eq!(parameters.pathogen_name, "Measles");
        assert_eq!(parameters.population_size, 200);
        assert_eq!(parameters.initial_infected, 1);
    }

    #[test]
    fn incomplete_model_arguments() {
        let args = base_args(PathBuf::from("."));
        let model = ModelArgs {
            population_size: None,
            ..measles()
        };
        let result = resolve_parameters(&args, &model);
        assert!(matches!(result, Err(HerdError::InvalidConfiguration(_))));
    }

    #[test]
    fn config_file_and_seed_override() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "pathogen_name": "Flu",
                "transmission_probability": 0.1,
                "mortality_probability": 0.01,
                "population_size": 50,
                "vaccination_fraction": 0.2,
                "random_seed": 3
            }}"#
        )
        .unwrap();
        let mut args = base_args(PathBuf::from("."));
        args.config = Some(file.path().to_path_buf());
        args.random_seed = Some(99);

        let parameters = resolve_parameters(&args, &ModelArgs::default()).unwrap();
        assert_eq!(parameters.pathogen_name, "Flu");
        assert_eq!(parameters.random_seed, 99);
    }

    #[test]
    fn run_writes_text_log() {
        let temp_dir = tempdir().unwrap();
        let args = base_args(temp_dir.path().to_path_buf());
        let run = run_with_args_internal(&args, &measles()).unwrap();

        assert_eq!(
            run.log_path,
            temp_dir
                .path()
                .join("Measles_simulation_pop_200_vp_0.5_infected_1.txt")
        );
        let log = fs::read_to_string(&run.log_path).unwrap();
        assert!(log.starts_with("population_size: 200\t"));
        let expected_last_line = format!(
            "Simulation ended with {} people remaining after {} turns.",
            run.outcome.remaining_alive, run.outcome.steps_executed
        );
        assert_eq!(log.lines().last(), Some(expected_last_line.as_str()));
        assert!(run.csv_directory.is_none());
    }

    #[test]
    fn run_writes_csv_reports() {
        let temp_dir = tempdir().unwrap();
        let mut args = base_args(temp_dir.path().to_path_buf());
        args.csv = true;
        let run = run_with_args_internal(&args, &measles()).unwrap();

        let directory = run.csv_directory.unwrap();
        let mut reader = csv::Reader::from_path(directory.join("steps.csv")).unwrap();
        assert_eq!(reader.records().count(), run.outcome.steps_executed);
        assert!(directory.join("run.json").exists());
    }

    #[test]
    fn invalid_run_writes_nothing() {
        let temp_dir = tempdir().unwrap();
        let output_dir = temp_dir.path().join("out");
        let args = base_args(output_dir.clone());
        let model = ModelArgs {
            vaccination_fraction: Some(1.5),
            ..measles()
        };
        let result = run_with_args_internal(&args, &model);
        assert!(matches!(result, Err(HerdError::InvalidConfiguration(_))));
        assert!(!output_dir.exists());
    }

    #[test]
    fn same_seed_same_log() {
        let first_dir = tempdir().unwrap();
        let second_dir = tempdir().unwrap();
        let mut first_args = base_args(first_dir.path().to_path_buf());
        first_args.random_seed = Some(7);
        let mut second_args = base_args(second_dir.path().to_path_buf());
        second_args.random_seed = Some(7);

        let first = run_with_args_internal(&first_args, &measles()).unwrap();
        let second = run_with_args_internal(&second_args, &measles()).unwrap();
        assert_eq!(
            fs::read_to_string(first.log_path).unwrap(),
            fs::read_to_string(second.log_path).unwrap()
        );
    }
}
