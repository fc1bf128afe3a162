use rand::Rng;

use crate::people::{InfectionStatus, PersonId};

/// One simulated person.
///
/// Fields are private so that the two invariants hold for the whole run: a vaccinated person
/// is never infected, and a dead person never changes again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Individual {
    id: PersonId,
    is_vaccinated: bool,
    infection: InfectionStatus,
    is_alive: bool,
}

impl Individual {
    /// Creates a living person. A vaccinated person is always created not infected.
    ///
    /// # Panics
    ///
    /// Panics if asked to create a person who is both vaccinated and infected.
    #[must_use]
    pub fn new(id: PersonId, is_vaccinated: bool, infection: InfectionStatus) -> Self {
        assert!(
            !(is_vaccinated && infection != InfectionStatus::NotInfected),
            "{id:?} cannot be vaccinated and {infection}"
        );
        Individual {
            id,
            is_vaccinated,
            infection,
            is_alive: true,
        }
    }

    #[must_use]
    pub fn id(&self) -> PersonId {
        self.id
    }

    #[must_use]
    pub fn is_vaccinated(&self) -> bool {
        self.is_vaccinated
    }

    #[must_use]
    pub fn infection(&self) -> InfectionStatus {
        self.infection
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.is_alive
    }

    #[must_use]
    pub fn is_infected(&self) -> bool {
        self.infection == InfectionStatus::Infected
    }

    /// Whether an interaction with an infected person can infect this person.
    #[must_use]
    pub fn is_susceptible(&self) -> bool {
        self.is_alive && !self.is_vaccinated && self.infection == InfectionStatus::NotInfected
    }

    /// Resolves this person's infection. One uniform draw is compared against
    /// `mortality_probability`: below it the person dies, otherwise they clear the infection
    /// and become permanently immune. Returns whether the person survived.
    pub fn did_survive_infection<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        mortality_probability: f64,
    ) -> bool {
        debug_assert!(self.is_alive, "{:?} is already dead", self.id);
        let survived = rng.random::<f64>() >= mortality_probability;
        if survived {
            self.infection = InfectionStatus::Recovered;
        } else {
            self.is_alive = false;
        }
        survived
    }

    /// Applies a pending exposure. Only the engine calls this, at the end of a step.
    pub(crate) fn infect(&mut self) {
        debug_assert!(self.is_susceptible(), "{:?} is not susceptible", self.id);
        self.infection = InfectionStatus::Infected;
    }
}
