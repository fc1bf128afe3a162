//! The simulation engine.
//!
//! A [`Simulation`] owns the population, the pathogen, the random stream and a [`Recorder`].
//! It advances in discrete steps. In each step every person who is infected and alive at
//! the start of the step, taken in id order:
//!
//! 1. meets `min(max_interactions, living people - 1)` partners drawn uniformly, with
//!    replacement, from the other living people. Each contact with a susceptible partner
//!    runs one transmission trial; a success queues the partner as a pending infection.
//! 2. resolves their own infection with one mortality trial: they either die or recover and
//!    become immune.
//!
//! Pending infections are applied only once every infected person has acted, so someone
//! infected during a step never infects anyone during that same step.
//!
//! The run continues while someone is infected. Every infection is resolved before the run
//! ends, including those that start after the last susceptible person was reached.
//!
//! Every random draw comes from the one stream handed to the engine, in a fixed order: for
//! each actor, a partner draw followed by its transmission trial (when the partner is
//! susceptible), repeated, then the mortality trial. The same seed and parameters always
//! yield the same sequence of events.

use log::{debug, info, trace};
use rand::Rng;
use rustc_hash::FxHashSet;

use crate::error::HerdError;
use crate::parameters::{Parameters, DEFAULT_MAX_INTERACTIONS};
use crate::pathogen::Pathogen;
use crate::people::{create_population, Individual, PersonId, PopulationComposition};
use crate::random::{sample_index_excluding, seeded_rng, SimulationRng};
use crate::report::{InteractionEvent, Metadata, Recorder, StepSummary, Summary, SurvivalEvent};

/// The ids of living people, kept sorted so that a person's position can be found by binary
/// search and partners can be drawn by index.
#[derive(Debug)]
struct LivingPeople {
    ids: Vec<PersonId>,
}

impl LivingPeople {
    fn new(population: &[Individual]) -> Self {
        LivingPeople {
            ids: population
                .iter()
                .filter(|person| person.is_alive())
                .map(Individual::id)
                .collect(),
        }
    }

    fn len(&self) -> usize {
        self.ids.len()
    }

    fn position(&self, person_id: PersonId) -> Option<usize> {
        self.ids.binary_search(&person_id).ok()
    }

    fn get(&self, index: usize) -> PersonId {
        self.ids[index]
    }

    fn remove(&mut self, person_id: PersonId) {
        if let Some(index) = self.position(person_id) {
            self.ids.remove(index);
        }
    }
}

/// What a finished run looked like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationOutcome {
    pub steps_executed: usize,
    pub remaining_alive: usize,
    pub current_infected: usize,
    pub total_infected: usize,
    pub total_dead: usize,
}

pub struct Simulation<R: Rng, W: Recorder> {
    population: Vec<Individual>,
    pathogen: Pathogen,
    rng: R,
    recorder: W,
    max_interactions: usize,
    living: LivingPeople,
    current_infected: usize,
    total_infected: usize,
    total_dead: usize,
    susceptible: usize,
    pending_infections: FxHashSet<PersonId>,
    steps_executed: usize,
}

impl<W: Recorder> Simulation<SimulationRng, W> {
    /// Validates `parameters` and builds a simulation whose random stream is seeded with
    /// `parameters.random_seed`.
    ///
    /// # Errors
    ///
    /// Returns `HerdError::InvalidConfiguration` if any parameter is out of its domain.
    pub fn from_parameters(parameters: &Parameters, recorder: W) -> Result<Self, HerdError> {
        let pathogen = parameters.validate()?;
        let simulation = Simulation::new(
            pathogen,
            parameters.population_size,
            parameters.vaccination_fraction,
            parameters.initial_infected,
            seeded_rng(parameters.random_seed),
            recorder,
        )?;
        simulation.with_max_interactions(parameters.max_interactions)
    }
}

impl<R: Rng, W: Recorder> Simulation<R, W> {
    /// Builds the initial population and records the run's metadata.
    ///
    /// # Errors
    ///
    /// Returns `HerdError::InvalidConfiguration` if the population inputs are out of their
    /// domain (see [`create_population`]).
    pub fn new(
        pathogen: Pathogen,
        population_size: usize,
        vaccination_fraction: f64,
        initial_infected: usize,
        rng: R,
        mut recorder: W,
    ) -> Result<Self, HerdError> {
        let (population, composition) =
            create_population(population_size, vaccination_fraction, initial_infected)?;
        let PopulationComposition {
            infected,
            susceptible,
            ..
        } = composition;

        recorder.record_metadata(&Metadata {
            population_size,
            vaccination_fraction,
            initial_infected,
            pathogen_name: pathogen.name().to_string(),
            mortality_probability: pathogen.mortality_probability(),
            transmission_probability: pathogen.transmission_probability(),
        });

        let living = LivingPeople::new(&population);
        Ok(Simulation {
            population,
            pathogen,
            rng,
            recorder,
            max_interactions: DEFAULT_MAX_INTERACTIONS,
            living,
            current_infected: infected,
            total_infected: infected,
            total_dead: 0,
            susceptible,
            pending_infections: FxHashSet::default(),
            steps_executed: 0,
        })
    }

    /// Sets the most partners one infected person meets in a step.
    ///
    /// # Errors
    ///
    /// Returns `HerdError::InvalidConfiguration` if `max_interactions` is zero.
    pub fn with_max_interactions(mut self, max_interactions: usize) -> Result<Self, HerdError> {
        if max_interactions == 0 {
            return Err("max interactions must be at least 1".into());
        }
        self.max_interactions = max_interactions;
        Ok(self)
    }

    #[must_use]
    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    #[must_use]
    pub fn pathogen(&self) -> &Pathogen {
        &self.pathogen
    }

    #[must_use]
    pub fn recorder(&self) -> &W {
        &self.recorder
    }

    /// Consumes the simulation, handing back the recorder so it can be finished.
    pub fn into_recorder(self) -> W {
        self.recorder
    }

    #[must_use]
    pub fn current_infected(&self) -> usize {
        self.current_infected
    }

    #[must_use]
    pub fn total_infected(&self) -> usize {
        self.total_infected
    }

    #[must_use]
    pub fn total_dead(&self) -> usize {
        self.total_dead
    }

    #[must_use]
    pub fn steps_executed(&self) -> usize {
        self.steps_executed
    }

    #[must_use]
    pub fn alive(&self) -> usize {
        self.population.len() - self.total_dead
    }

    /// Whether another step should run: someone is infected and either a susceptible person
    /// remains or a living infected person still awaits their survival trial.
    ///
    /// Everyone counted in `current_infected` is alive and unresolved, so this reduces to
    /// `current_infected > 0`. Once nobody is susceptible the run takes exactly one more step,
    /// which resolves the remaining infections without starting new ones.
    #[must_use]
    pub fn should_continue(&self) -> bool {
        self.current_infected > 0
    }

    /// Runs steps until [`Simulation::should_continue`] is false, then records the summary.
    ///
    /// # Errors
    ///
    /// Returns `HerdError::InvariantViolation` if partner sampling ever pairs a person with
    /// themselves or with someone dead. The run stops at that point.
    pub fn run(&mut self) -> Result<SimulationOutcome, HerdError> {
        info!(
            "starting simulation of {} in a population of {} ({} infected, {} susceptible)",
            self.pathogen.name(),
            self.population.len(),
            self.current_infected,
            self.susceptible
        );
        while self.should_continue() {
            self.step()?;
        }

        let summary = Summary {
            remaining_alive: self.alive(),
            steps_executed: self.steps_executed,
        };
        self.recorder.record_summary(&summary);
        info!(
            "simulation ended with {} people remaining after {} steps",
            summary.remaining_alive, summary.steps_executed
        );
        Ok(self.outcome())
    }

    #[must_use]
    pub fn outcome(&self) -> SimulationOutcome {
        SimulationOutcome {
            steps_executed: self.steps_executed,
            remaining_alive: self.alive(),
            current_infected: self.current_infected,
            total_infected: self.total_infected,
            total_dead: self.total_dead,
        }
    }

    /// Executes one step.
    ///
    /// # Errors
    ///
    /// Returns `HerdError::InvariantViolation` if partner sampling produces an invalid pair.
    pub fn step(&mut self) -> Result<StepSummary, HerdError> {
        self.steps_executed += 1;
        let step = self.steps_executed;

        for index in 0..self.population.len() {
            let person = &self.population[index];
            if person.is_infected() && person.is_alive() {
                let actor = person.id();
                self.interact_with_partners(step, actor)?;
                self.resolve_infection(step, actor);
            }
        }

        let newly_infected = self.apply_pending_infections();
        debug_assert!(self.total_infected >= self.current_infected);
        debug_assert!(self.total_infected >= self.total_dead);

        let summary = StepSummary {
            step,
            newly_infected,
            current_infected: self.current_infected,
            total_infected: self.total_infected,
            total_dead: self.total_dead,
            alive: self.alive(),
        };
        debug!("{summary:?}");
        self.recorder.record_step(&summary);
        Ok(summary)
    }

    fn interact_with_partners(&mut self, step: usize, actor: PersonId) -> Result<(), HerdError> {
        let budget = self
            .max_interactions
            .min(self.living.len().saturating_sub(1));
        for _ in 0..budget {
            let partner = self.sample_partner(step, actor)?;
            self.interact(step, actor, partner);
        }
        Ok(())
    }

    fn sample_partner(&mut self, step: usize, actor: PersonId) -> Result<PersonId, HerdError> {
        let violation = |partner: PersonId, reason: &'static str| {
            HerdError::InvariantViolation {
                step,
                actor,
                partner,
                reason,
            }
        };
        let position = self
            .living
            .position(actor)
            .ok_or_else(|| violation(actor, "actor is not alive"))?;
        let index = sample_index_excluding(&mut self.rng, self.living.len(), position)
            .ok_or_else(|| violation(actor, "no living partner available"))?;
        let partner = self.living.get(index);

        if partner == actor {
            return Err(violation(partner, "partner is the actor"));
        }
        if !self.population[partner.0].is_alive() {
            return Err(violation(partner, "partner is dead"));
        }
        Ok(partner)
    }

    fn interact(&mut self, step: usize, actor: PersonId, partner: PersonId) {
        let partner_person = &self.population[partner.0];
        let partner_status = partner_person.infection();
        let partner_vaccinated = partner_person.is_vaccinated();

        let mut infected = false;
        if partner_person.is_susceptible()
            && self.rng.random::<f64>() < self.pathogen.transmission_probability()
        {
            infected = true;
            self.expose(partner);
        }
        trace!("step {step}: {actor:?} met {partner:?} ({partner_status}), infected: {infected}");

        self.recorder.record_interaction(&InteractionEvent {
            step,
            actor,
            partner,
            partner_status,
            partner_vaccinated,
            infected,
        });
    }

    /// Queues `person_id` to be infected at the end of the step. Returns false if they were
    /// already queued.
    fn expose(&mut self, person_id: PersonId) -> bool {
        self.pending_infections.insert(person_id)
    }

    fn resolve_infection(&mut self, step: usize, person_id: PersonId) {
        let mortality = self.pathogen.mortality_probability();
        let survived = self.population[person_id.0].did_survive_infection(&mut self.rng, mortality);
        if !survived {
            self.total_dead += 1;
            self.living.remove(person_id);
        }
        self.current_infected -= 1;
        trace!("step {step}: {person_id:?} survived: {survived}");

        self.recorder.record_survival_outcome(&SurvivalEvent {
            step,
            person: person_id,
            survived,
        });
    }

    fn apply_pending_infections(&mut self) -> usize {
        let mut newly_infected: Vec<PersonId> = self.pending_infections.drain().collect();
        newly_infected.sort_unstable();
        for person_id in &newly_infected {
            self.population[person_id.0].infect();
        }
        let count = newly_infected.len();
        self.current_infected += count;
        self.total_infected += count;
        self.susceptible -= count;
        count
    }
}
