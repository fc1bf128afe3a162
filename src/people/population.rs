use log::{trace, warn};

use crate::error::HerdError;
use crate::people::{Individual, InfectionStatus, PersonId};

/// How many people of each kind `create_population` produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulationComposition {
    pub infected: usize,
    pub vaccinated: usize,
    pub susceptible: usize,
}

/// Builds the initial population of `population_size` people with ids `0..population_size`.
///
/// The layout is fixed so that runs are reproducible for a given seed:
/// * ids `[0, initial_infected)` are unvaccinated and infected,
/// * the next `floor(population_size * vaccination_fraction)` ids are vaccinated,
/// * everyone else is unvaccinated and susceptible.
///
/// If the infected and vaccinated blocks together would exceed the population, the vaccinated
/// block is clamped so that it ends at `population_size`.
///
/// # Errors
///
/// Returns `HerdError::InvalidConfiguration` if `vaccination_fraction` is not in `[0, 1]` or
/// if `initial_infected > population_size`.
pub fn create_population(
    population_size: usize,
    vaccination_fraction: f64,
    initial_infected: usize,
) -> Result<(Vec<Individual>, PopulationComposition), HerdError> {
    if !(0.0..=1.0).contains(&vaccination_fraction) {
        return Err(HerdError::InvalidConfiguration(format!(
            "vaccination fraction must be in [0, 1], got {vaccination_fraction}"
        )));
    }
    if initial_infected > population_size {
        return Err(HerdError::InvalidConfiguration(format!(
            "initial infected count {initial_infected} exceeds population size {population_size}"
        )));
    }

    // Truncation toward zero is the intended rounding.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let requested_vaccinated = (population_size as f64 * vaccination_fraction).floor() as usize;
    let vaccinated = requested_vaccinated.min(population_size - initial_infected);
    if vaccinated < requested_vaccinated {
        warn!(
            "clamping vaccinated count from {requested_vaccinated} to {vaccinated}: \
             {initial_infected} of {population_size} people start infected"
        );
    }

    let population = (0..population_size)
        .map(|index| {
            let id = PersonId(index);
            if index < initial_infected {
                Individual::new(id, false, InfectionStatus::Infected)
            } else if index < initial_infected + vaccinated {
                Individual::new(id, true, InfectionStatus::NotInfected)
            } else {
                Individual::new(id, false, InfectionStatus::NotInfected)
            }
        })
        .collect();

    let composition = PopulationComposition {
        infected: initial_infected,
        vaccinated,
        susceptible: population_size - initial_infected - vaccinated,
    };
    trace!("created population {composition:?}");
    Ok((population, composition))
}
