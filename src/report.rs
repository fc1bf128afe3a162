//! Recording simulation events.
//!
//! The engine reports what happens during a run through the [`Recorder`] trait: a metadata
//! record at construction, one record per sampled interaction, one record per resolved
//! infection, an optional per-step summary, and a final summary. The engine treats recorders
//! as write-only sinks and never fails because of them: recorders that write to files latch
//! the first I/O error and surface it from their `finish()` method once the run is over.
//!
//! Provided recorders:
//! * [`TextRecorder`] writes the human-readable event log.
//! * [`CsvRecorder`] writes one CSV file per event kind plus a JSON run record.
//! * [`MemoryRecorder`] keeps every event in memory, which is what tests inspect.
//! * [`NullRecorder`] discards everything.
//!
//! A pair `(A, B)` of recorders is itself a recorder that forwards every event to both.
mod csv_report;
mod text;

use serde::{Deserialize, Serialize};

use crate::people::{InfectionStatus, PersonId};

pub use csv_report::CsvRecorder;
pub use text::{log_file_name, TextRecorder};

/// Describes a run. Recorded once, when the simulation is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub population_size: usize,
    pub vaccination_fraction: f64,
    pub initial_infected: usize,
    pub pathogen_name: String,
    pub mortality_probability: f64,
    pub transmission_probability: f64,
}

/// One contact between an infected actor and a sampled partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub step: usize,
    pub actor: PersonId,
    pub partner: PersonId,
    /// The partner's infection status before this interaction.
    pub partner_status: InfectionStatus,
    pub partner_vaccinated: bool,
    /// Whether the transmission trial succeeded.
    pub infected: bool,
}

/// The resolution of one infected person's infection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurvivalEvent {
    pub step: usize,
    pub person: PersonId,
    pub survived: bool,
}

/// Counters at the end of a step, after pending infections were applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSummary {
    pub step: usize,
    pub newly_infected: usize,
    pub current_infected: usize,
    pub total_infected: usize,
    pub total_dead: usize,
    pub alive: usize,
}

/// Recorded once, when the run ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub remaining_alive: usize,
    pub steps_executed: usize,
}

pub trait Recorder {
    fn record_metadata(&mut self, metadata: &Metadata);

    fn record_interaction(&mut self, event: &InteractionEvent);

    fn record_survival_outcome(&mut self, event: &SurvivalEvent);

    /// Called after every step. Recorders that only need the core events can ignore it.
    fn record_step(&mut self, _summary: &StepSummary) {}

    fn record_summary(&mut self, summary: &Summary);
}

impl<R: Recorder + ?Sized> Recorder for &mut R {
    fn record_metadata(&mut self, metadata: &Metadata) {
        (**self).record_metadata(metadata);
    }

    fn record_interaction(&mut self, event: &InteractionEvent) {
        (**self).record_interaction(event);
    }

    fn record_survival_outcome(&mut self, event: &SurvivalEvent) {
        (**self).record_survival_outcome(event);
    }

    fn record_step(&mut self, summary: &StepSummary) {
        (**self).record_step(summary);
    }

    fn record_summary(&mut self, summary: &Summary) {
        (**self).record_summary(summary);
    }
}

impl<A: Recorder, B: Recorder> Recorder for (A, B) {
    fn record_metadata(&mut self, metadata: &Metadata) {
        self.0.record_metadata(metadata);
        self.1.record_metadata(metadata);
    }

    fn record_interaction(&mut self, event: &InteractionEvent) {
        self.0.record_interaction(event);
        self.1.record_interaction(event);
    }

    fn record_survival_outcome(&mut self, event: &SurvivalEvent) {
        self.0.record_survival_outcome(event);
        self.1.record_survival_outcome(event);
    }

    fn record_step(&mut self, summary: &StepSummary) {
        self.0.record_step(summary);
        self.1.record_step(summary);
    }

    fn record_summary(&mut self, summary: &Summary) {
        self.0.record_summary(summary);
        self.1.record_summary(summary);
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRecorder;

impl Recorder for NullRecorder {
    fn record_metadata(&mut self, _metadata: &Metadata) {}

    fn record_interaction(&mut self, _event: &InteractionEvent) {}

    fn record_survival_outcome(&mut self, _event: &SurvivalEvent) {}

    fn record_summary(&mut self, _summary: &Summary) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedEvent {
    Metadata(Metadata),
    Interaction(InteractionEvent),
    Survival(SurvivalEvent),
    Step(StepSummary),
    Summary(Summary),
}

/// Keeps every event, in order.
#[derive(Debug, Default, Clone)]
pub struct MemoryRecorder {
    pub events: Vec<RecordedEvent>,
}

impl MemoryRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interactions(&self) -> impl Iterator<Item = &InteractionEvent> {
        self.events.iter().filter_map(|event| match event {
            RecordedEvent::Interaction(interaction) => Some(interaction),
            _ => None,
        })
    }

    pub fn survival_outcomes(&self) -> impl Iterator<Item = &SurvivalEvent> {
        self.events.iter().filter_map(|event| match event {
            RecordedEvent::Survival(survival) => Some(survival),
            _ => None,
        })
    }

    pub fn steps(&self) -> impl Iterator<Item = &StepSummary> {
        self.events.iter().filter_map(|event| match event {
            RecordedEvent::Step(step) => Some(step),
            _ => None,
        })
    }

    #[must_use]
    pub fn summary(&self) -> Option<&Summary> {
        self.events.iter().rev().find_map(|event| match event {
            RecordedEvent::Summary(summary) => Some(summary),
            _ => None,
        })
    }
}

impl Recorder for MemoryRecorder {
    fn record_metadata(&mut self, metadata: &Metadata) {
        self.events.push(RecordedEvent::Metadata(metadata.clone()));
    }

    fn record_interaction(&mut self, event: &InteractionEvent) {
        self.events.push(RecordedEvent::Interaction(*event));
    }

    fn record_survival_outcome(&mut self, event: &SurvivalEvent) {
        self.events.push(RecordedEvent::Survival(*event));
    }

    fn record_step(&mut self, summary: &StepSummary) {
        self.events.push(RecordedEvent::Step(*summary));
    }

    fn record_summary(&mut self, summary: &Summary) {
        self.events.push(RecordedEvent::Summary(*summary));
    }
}
