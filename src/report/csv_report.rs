use std::fs::{create_dir_all, File};
use std::path::{Path, PathBuf};

use csv::Writer;
use serde::Serialize;

use crate::error::HerdError;
use crate::report::{InteractionEvent, Metadata, Recorder, StepSummary, Summary, SurvivalEvent};

const INTERACTIONS_FILE: &str = "interactions.csv";
const SURVIVAL_FILE: &str = "survival.csv";
const STEPS_FILE: &str = "steps.csv";
const RUN_FILE: &str = "run.json";

#[derive(Serialize)]
struct RunRecord<'a> {
    metadata: Option<&'a Metadata>,
    summary: Option<&'a Summary>,
}

/// Writes `interactions.csv`, `survival.csv` and `steps.csv` into a directory, one row per
/// event, and `run.json` with the run's metadata and summary when finished.
pub struct CsvRecorder {
    directory: PathBuf,
    interactions: Writer<File>,
    survival: Writer<File>,
    steps: Writer<File>,
    metadata: Option<Metadata>,
    summary: Option<Summary>,
    error: Option<HerdError>,
}

fn create_writer(directory: &Path, file_name: &str) -> Result<Writer<File>, HerdError> {
    let file = File::create(directory.join(file_name))?;
    Ok(Writer::from_writer(file))
}

impl CsvRecorder {
    /// Creates the report files in `directory`, creating it if needed. Existing reports are
    /// overwritten.
    ///
    /// # Errors
    ///
    /// Returns `HerdError::IoError` if the directory or files cannot be created.
    pub fn create(directory: &Path) -> Result<Self, HerdError> {
        create_dir_all(directory)?;
        Ok(CsvRecorder {
            directory: directory.to_path_buf(),
            interactions: create_writer(directory, INTERACTIONS_FILE)?,
            survival: create_writer(directory, SURVIVAL_FILE)?,
            steps: create_writer(directory, STEPS_FILE)?,
            metadata: None,
            summary: None,
            error: None,
        })
    }

    // Keeps the first error; later rows are dropped.
    fn latch(&mut self, result: Result<(), csv::Error>) {
        if let Err(error) = result {
            self.error.get_or_insert(error.into());
        }
    }

    /// Flushes every report and writes `run.json`.
    ///
    /// # Errors
    ///
    /// Returns the first error hit while writing rows, or any error flushing the files.
    pub fn finish(mut self) -> Result<PathBuf, HerdError> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        self.interactions.flush()?;
        self.survival.flush()?;
        self.steps.flush()?;

        let run = RunRecord {
            metadata: self.metadata.as_ref(),
            summary: self.summary.as_ref(),
        };
        let file = File::create(self.directory.join(RUN_FILE))?;
        serde_json::to_writer_pretty(file, &run)?;
        Ok(self.directory)
    }
}

impl Recorder for CsvRecorder {
    fn record_metadata(&mut self, metadata: &Metadata) {
        self.metadata = Some(metadata.clone());
    }

    fn record_interaction(&mut self, event: &InteractionEvent) {
        if self.error.is_none() {
            let result = self.interactions.serialize(event);
            self.latch(result);
        }
    }

    fn record_survival_outcome(&mut self, event: &SurvivalEvent) {
        if self.error.is_none() {
            let result = self.survival.serialize(event);
            self.latch(result);
        }
    }

    fn record_step(&mut self, summary: &StepSummary) {
        if self.error.is_none() {
            let result = self.steps.serialize(summary);
            self.latch(result);
        }
    }

    fn record_summary(&mut self, summary: &Summary) {
        self.summary = Some(*summary);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::people::{InfectionStatus, PersonId};
    use tempfile::tempdir;

    #[test]
    fn writes_rows_and_run_record() {
        let temp_dir = tempdir().unwrap();
        let directory = temp_dir.path().join("reports");
        let mut recorder = CsvRecorder::create(&directory).unwrap();

        recorder.record_metadata(&Metadata {
            population_size: 10,
            vaccination_fraction: 0.2,
            initial_infected: 1,
            pathogen_name: "Flu".to_string(),
            mortality_probability: 0.1,
            transmission_probability: 0.5,
        });
        let interaction = InteractionEvent {
            step: 1,
            actor: PersonId::new(0),
            partner: PersonId::new(4),
            partner_status: InfectionStatus::NotInfected,
            partner_vaccinated: false,
            infected: true,
        };
        recorder.record_interaction(&interaction);
        recorder.record_survival_outcome(&SurvivalEvent {
            step: 1,
            person: PersonId::new(0),
            survived: true,
        });
        let step = StepSummary {
            step: 1,
            newly_infected: 1,
            current_infected: 1,
            total_infected: 2,
            total_dead: 0,
            alive: 10,
        };
        recorder.record_step(&step);
        recorder.record_summary(&Summary {
            remaining_alive: 10,
            steps_executed: 1,
        });
        let directory = recorder.finish().unwrap();

        let mut reader = csv::Reader::from_path(directory.join(INTERACTIONS_FILE)).unwrap();
        let rows: Vec<InteractionEvent> = reader.deserialize().map(Result::unwrap).collect();
        assert_eq!(rows, vec![interaction]);

        let mut reader = csv::Reader::from_path(directory.join(STEPS_FILE)).unwrap();
        let rows: Vec<StepSummary> = reader.deserialize().map(Result::unwrap).collect();
        assert_eq!(rows, vec![step]);

        let mut reader = csv::Reader::from_path(directory.join(SURVIVAL_FILE)).unwrap();
        assert_eq!(reader.records().count(), 1);

        let run: serde_json::Value =
            serde_json::from_reader(File::open(directory.join(RUN_FILE)).unwrap()).unwrap();
        assert_eq!(run["metadata"]["pathogen_name"], "Flu");
        assert_eq!(run["summary"]["steps_executed"], 1);
    }
}
