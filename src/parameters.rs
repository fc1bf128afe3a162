//! Model inputs.
//!
//! `Parameters` holds everything needed to start a run. Values come from the command line,
//! from a JSON file, or from the defaults, which reproduce the demonstration scenario:
//!
//! ```json
//! {
//!     "pathogen_name": "Ebola",
//!     "transmission_probability": 0.25,
//!     "mortality_probability": 0.7,
//!     "population_size": 20,
//!     "vaccination_fraction": 0.1,
//!     "initial_infected": 5
//! }
//! ```
//!
//! `initial_infected`, `random_seed` and `max_interactions` may be omitted from a file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::HerdError;
use crate::pathogen::Pathogen;

pub const DEFAULT_RANDOM_SEED: u64 = 42;
pub const DEFAULT_MAX_INTERACTIONS: usize = 100;

fn default_initial_infected() -> usize {
    1
}

fn default_random_seed() -> u64 {
    DEFAULT_RANDOM_SEED
}

fn default_max_interactions() -> usize {
    DEFAULT_MAX_INTERACTIONS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub pathogen_name: String,
    pub transmission_probability: f64,
    pub mortality_probability: f64,
    pub population_size: usize,
    pub vaccination_fraction: f64,
    #[serde(default = "default_initial_infected")]
    pub initial_infected: usize,
    #[serde(default = "default_random_seed")]
    pub random_seed: u64,
    /// Upper bound on the partners one infected person meets in a step.
    #[serde(default = "default_max_interactions")]
    pub max_interactions: usize,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            pathogen_name: "Ebola".to_string(),
            transmission_probability: 0.25,
            mortality_probability: 0.7,
            population_size: 20,
            vaccination_fraction: 0.10,
            initial_infected: 5,
            random_seed: DEFAULT_RANDOM_SEED,
            max_interactions: DEFAULT_MAX_INTERACTIONS,
        }
    }
}

impl Parameters {
    /// Loads parameters from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `HerdError::IoError` if the file cannot be read and `HerdError::JsonError` if it
    /// is not a valid parameter document.
    pub fn from_json_file(path: &Path) -> Result<Self, HerdError> {
        let content = fs::read_to_string(path)?;
        let parameters = serde_json::from_str(&content)?;
        Ok(parameters)
    }

    /// Checks every input against its valid domain and returns the pathogen they describe.
    ///
    /// # Errors
    ///
    /// Returns `HerdError::InvalidConfiguration` describing the first invalid input.
    pub fn validate(&self) -> Result<Pathogen, HerdError> {
        if !(0.0..=1.0).contains(&self.vaccination_fraction) {
            return Err(HerdError::InvalidConfiguration(format!(
                "vaccination fraction must be in [0, 1], got {}",
                self.vaccination_fraction
            )));
        }
        if self.initial_infected > self.population_size {
            return Err(HerdError::InvalidConfiguration(format!(
                "initial infected count {} exceeds population size {}",
                self.initial_infected, self.population_size
            )));
        }
        if self.max_interactions == 0 {
            return Err("max interactions must be at least 1".into());
        }
        Pathogen::new(
            self.pathogen_name.clone(),
            self.transmission_probability,
            self.mortality_probability,
        )
    }
}
