use std::fs::{create_dir_all, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::HerdError;
use crate::people::InfectionStatus;
use crate::report::{InteractionEvent, Metadata, Recorder, StepSummary, Summary, SurvivalEvent};

/// The conventional name of the text event log for a run.
#[must_use]
pub fn log_file_name(
    pathogen_name: &str,
    population_size: usize,
    vaccination_fraction: f64,
    initial_infected: usize,
) -> String {
    format!(
        "{pathogen_name}_simulation_pop_{population_size}_vp_{vaccination_fraction}_infected_{initial_infected}.txt"
    )
}

/// Writes the human-readable event log, one line per event.
pub struct TextRecorder<W: Write> {
    writer: W,
    error: Option<io::Error>,
}

impl TextRecorder<BufWriter<File>> {
    /// Creates the log file at `path`, creating any missing parent directories.
    ///
    /// # Errors
    ///
    /// Returns `HerdError::IoError` if the directories or the file cannot be created.
    pub fn create(path: &Path) -> Result<Self, HerdError> {
        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(TextRecorder::new(BufWriter::new(file)))
    }
}

impl<W: Write> TextRecorder<W> {
    pub fn new(writer: W) -> Self {
        TextRecorder {
            writer,
            error: None,
        }
    }

    fn write_line(&mut self, line: std::fmt::Arguments) {
        if self.error.is_some() {
            return;
        }
        if let Err(error) = writeln!(self.writer, "{line}") {
            self.error = Some(error);
        }
    }

    /// Flushes the log and returns the writer.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error hit while writing, if any.
    pub fn finish(mut self) -> Result<W, HerdError> {
        if let Some(error) = self.error.take() {
            return Err(error.into());
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> Recorder for TextRecorder<W> {
    fn record_metadata(&mut self, metadata: &Metadata) {
        self.write_line(format_args!(
            "population_size: {}\tvaccination_fraction: {}\tpathogen: {}\tmortality_probability: {}\ttransmission_probability: {}",
            metadata.population_size,
            metadata.vaccination_fraction,
            metadata.pathogen_name,
            metadata.mortality_probability,
            metadata.transmission_probability,
        ));
    }

    fn record_interaction(&mut self, event: &InteractionEvent) {
        if event.infected {
            self.write_line(format_args!("{} infects {}", event.actor, event.partner));
            return;
        }
        let reason = if event.partner_vaccinated {
            "vaccinated"
        } else {
            match event.partner_status {
                InfectionStatus::Infected => "already sick",
                InfectionStatus::Recovered => "already immune",
                InfectionStatus::NotInfected => "unlucky",
            }
        };
        self.write_line(format_args!(
            "{} didn't infect {} because {reason}",
            event.actor, event.partner
        ));
    }

    fn record_survival_outcome(&mut self, event: &SurvivalEvent) {
        if event.survived {
            self.write_line(format_args!("{} survived infection.", event.person));
        } else {
            self.write_line(format_args!("{} died from infection.", event.person));
        }
    }

    fn record_step(&mut self, summary: &StepSummary) {
        self.write_line(format_args!(
            "Time step {} ended: {} newly infected, {} infected, {} total infected, {} dead, {} alive",
            summary.step,
            summary.newly_infected,
            summary.current_infected,
            summary.total_infected,
            summary.total_dead,
            summary.alive,
        ));
    }

    fn record_summary(&mut self, summary: &Summary) {
        self.write_line(format_args!(
            "Simulation ended with {} people remaining after {} turns.",
            summary.remaining_alive, summary.steps_executed
        ));
    }
}
