pub use crate::error::HerdError;
pub use crate::log::{debug, error, info, trace, warn};
pub use crate::parameters::Parameters;
pub use crate::pathogen::Pathogen;
pub use crate::people::{create_population, InfectionStatus, Individual, PersonId};
pub use crate::random::{seeded_rng, SimulationRng};
pub use crate::report::{
    CsvRecorder, MemoryRecorder, NullRecorder, RecordedEvent, Recorder, TextRecorder,
};
pub use crate::runner::run_with_args;
pub use crate::simulation::{Simulation, SimulationOutcome};
