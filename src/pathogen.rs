//! The pathogen being simulated. A `Pathogen` is an immutable bundle of the parameters that
//! drive transmission and mortality; it is validated once at construction and never changes
//! for the lifetime of a simulation.

use serde::{Deserialize, Serialize};

use crate::error::HerdError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pathogen {
    name: String,
    transmission_probability: f64,
    mortality_probability: f64,
}

fn check_probability(label: &str, value: f64) -> Result<(), HerdError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(HerdError::InvalidConfiguration(format!(
            "{label} must be in [0, 1], got {value}"
        )))
    }
}

impl Pathogen {
    /// Creates a new pathogen.
    ///
    /// # Errors
    ///
    /// Returns `HerdError::InvalidConfiguration` if either probability is outside of `[0, 1]`
    /// or is NaN.
    pub fn new(
        name: impl Into<String>,
        transmission_probability: f64,
        mortality_probability: f64,
    ) -> Result<Self, HerdError> {
        check_probability("transmission probability", transmission_probability)?;
        check_probability("mortality probability", mortality_probability)?;
        Ok(Pathogen {
            name: name.into(),
            transmission_probability,
            mortality_probability,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Probability that one interaction with a susceptible person infects them.
    #[must_use]
    pub fn transmission_probability(&self) -> f64 {
        self.transmission_probability
    }

    /// Probability that an infected person dies when their infection is resolved.
    #[must_use]
    pub fn mortality_probability(&self) -> f64 {
        self.mortality_probability
    }
}
