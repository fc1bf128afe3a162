//! A stochastic simulation of herd immunity
//!
//! Herd models a closed population of people, some vaccinated and some initially infected, and
//! a single pathogen. Time advances in discrete steps. In each step every living infected person
//! meets a bounded number of randomly chosen living partners and may infect the susceptible ones,
//! then either recovers with lasting immunity or dies. People infected during a step start
//! spreading the pathogen in the next one. The run ends once every infection has been
//! resolved.
//!
//! The main pieces are:
//! * [`Pathogen`](pathogen::Pathogen), the immutable transmission and mortality probabilities.
//! * [`Individual`](people::Individual), the per-person state and its survival trial.
//! * [`create_population`](people::create_population), which lays out the initial population.
//! * [`Simulation`](simulation::Simulation), the step engine.
//! * [`Recorder`](report::Recorder), the observer that receives every event. Text and CSV
//!   recorders ship with the crate.
//!
//! Every random decision is drawn from one seeded generator, so a run is reproducible from its
//! [`Parameters`](parameters::Parameters).
pub mod error;
pub mod log;
pub mod parameters;
pub mod pathogen;
pub mod people;
pub mod prelude;
pub mod random;
pub mod report;
pub mod runner;
pub mod simulation;

pub use crate::error::HerdError;
pub use crate::log::{debug, error, info, trace, warn};
pub use crate::parameters::Parameters;
pub use crate::pathogen::Pathogen;
pub use crate::people::{InfectionStatus, Individual, PersonId};
pub use crate::report::Recorder;
pub use crate::runner::run_with_args;
pub use crate::simulation::{Simulation, SimulationOutcome};
