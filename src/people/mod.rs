//! The simulated population.
//!
//! Every person is an [`Individual`] indexed by a dense, zero-based [`PersonId`]. The
//! population is built once by [`create_population()`] and its membership never changes
//! afterwards: people who die stay in the population as inert records so that their ids
//! keep resolving for bookkeeping and event logs.
//!
//! A person's health is described by two fields:
//!
//! * whether they were vaccinated at creation, which is fixed, and
//! * their [`InfectionStatus`], which the engine moves from `NotInfected` to `Infected`
//!   and then, if the person survives, to `Recovered`.
//!
//! Vaccinated people are never infected. Recovered people are immune for the rest of the
//! run. Only unvaccinated, never-infected people are susceptible.
mod individual;
mod population;

use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

pub use individual::Individual;
pub use population::{create_population, PopulationComposition};

/// Represents a unique person.
//  the id refers to that person's index in the range 0 to population
// - 1 in the population vector.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonId(pub(crate) usize);

impl PersonId {
    #[must_use]
    pub fn new(id: usize) -> Self {
        PersonId(id)
    }

    /// The person's index in the population.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for PersonId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Debug for PersonId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Person {}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InfectionStatus {
    NotInfected,
    Infected,
    /// Cleared an infection. Immune for the rest of the run.
    Recovered,
}

impl Display for InfectionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            InfectionStatus::NotInfected => "not infected",
            InfectionStatus::Infected => "infected",
            InfectionStatus::Recovered => "recovered",
        };
        f.write_str(label)
    }
}
