use super::options::{PostProcessingOption, PostProcessingOptions};
use super::stage::{
    MissingPrerequisiteError, Stage, StageContext, StageError, StageOutcome, StageOutput, StageStatus,
};
use super::stages::default_stages;
use crate::config::{ConcurrencyMode, PostProcessingConfig};
use crate::core::components::parameters::SimulationParameters;
use crate::core::execution::series::SimulationResults;
use crate::logging::{LogFacade, SimulationLogger};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

pub const MANIFEST_FILE: &str = "manifest.json";

/// Errors that abort a dispatch
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("result directory {path} is not writable: {source}")]
    ResultDirectoryUnwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("post-processing aborted by {stage}: {reason}")]
    Aborted {
        stage: PostProcessingOption,
        reason: String,
        report: DispatchReport,
    },

    #[error("failed to write manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Per-option outcomes of a dispatch, in ascending option id order
#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub run_id: Uuid,
    pub outcomes: Vec<StageOutcome>,
    pub manifest: Option<PathBuf>,
}

impl DispatchReport {
    pub fn outcome(&self, option: PostProcessingOption) -> Option<&StageOutcome> {
        self.outcomes.iter().find(|outcome| outcome.option == option)
    }

    pub fn status(&self, option: PostProcessingOption) -> Option<&StageStatus> {
        self.outcome(option).map(|outcome| &outcome.status)
    }

    /// Options that did not do what they were enabled for
    pub fn failures(&self) -> Vec<&StageOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| !outcome.status.is_success())
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.status.is_success())
    }
}

#[derive(Serialize)]
struct Manifest<'a> {
    run_id: String,
    options: Vec<u8>,
    parameters: &'a SimulationParameters,
    stages: &'a [StageOutcome],
}

/// Runs the enabled post-processing stages over frozen simulation results.
///
/// Stages run in waves: a stage waits for the stages it requires or consumes.
/// Within a wave, stages run one after another or on a Rayon pool depending on
/// the configured [`ConcurrencyMode`]. A stage failure is recorded and its
/// siblings keep running; a fatal error stops the dispatch at once, so no
/// stage starts after it.
pub struct PostProcessor {
    config: PostProcessingConfig,
    stages: HashMap<PostProcessingOption, Box<dyn Stage>>,
    logger: Arc<dyn SimulationLogger>,
}

impl PostProcessor {
    /// Dispatcher with every built-in stage registered
    pub fn new(config: PostProcessingConfig) -> Self {
        let mut processor = Self {
            config,
            stages: HashMap::new(),
            logger: LogFacade::shared(),
        };
        for stage in default_stages() {
            processor.register_stage(stage);
        }
        processor
    }

    pub fn with_logger(mut self, logger: Arc<dyn SimulationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Register a stage, replacing any stage bound to the same option
    pub fn register_stage(&mut self, stage: Box<dyn Stage>) {
        self.stages.insert(stage.option(), stage);
    }

    pub fn config(&self) -> &PostProcessingConfig {
        &self.config
    }

    pub fn has_handler(&self, option: PostProcessingOption) -> bool {
        self.stages.contains_key(&option)
    }

    pub fn dispatch(&self, results: &SimulationResults) -> Result<DispatchReport, DispatchError> {
        let run_id = Uuid::new_v4();
        let directory = self.config.result_directory.as_path();
        let options = &self.config.options;

        self.logger.info(
            "postprocessing_started",
            &[
                ("run_id", &run_id),
                ("options", &options.len()),
                ("result_directory", &directory.display()),
            ],
        );
        if let Err(source) = ensure_writable(directory) {
            self.logger.error(
                "result_directory_unwritable",
                &[("path", &directory.display()), ("error", &source)],
            );
            return Err(DispatchError::ResultDirectoryUnwritable {
                path: directory.to_path_buf(),
                source,
            });
        }

        let mut outcomes: BTreeMap<PostProcessingOption, StageOutcome> = BTreeMap::new();
        let mut runnable = Vec::new();
        for option in options.iter() {
            let missing = options.missing_prerequisites(option);
            if !missing.is_empty() {
                let error = MissingPrerequisiteError { stage: option, missing };
                self.logger.warn("missing_prerequisite", &[("error", &error)]);
                outcomes.insert(option, StageOutcome::new(option, StageStatus::MissingPrerequisite(error)));
            } else if option.applied_by().is_none() {
                if self.stages.contains_key(&option) {
                    runnable.push(option);
                } else {
                    self.logger.debug("no_stage_handler", &[("option", &option)]);
                    outcomes.insert(option, StageOutcome::new(option, StageStatus::NoHandler));
                }
            }
        }

        let mut artifacts: BTreeMap<PostProcessingOption, Vec<PathBuf>> = BTreeMap::new();
        for wave in dependency_waves(&runnable) {
            let mut ready = Vec::with_capacity(wave.len());
            for option in wave {
                match unavailable_prerequisite(option, &outcomes) {
                    Some(prerequisite) => {
                        outcomes.insert(
                            option,
                            StageOutcome::new(option, StageStatus::PrerequisiteUnavailable { prerequisite }),
                        );
                    }
                    None => ready.push(option),
                }
            }

            let context = StageContext {
                results,
                options,
                result_directory: directory,
                artifacts: &artifacts,
                logger: self.logger.as_ref(),
            };
            let finished = self.run_wave(&ready, &context);

            let mut fatal = None;
            for (option, result) in finished {
                let outcome = match result {
                    Ok(output) => {
                        self.logger.info(
                            "stage_completed",
                            &[("stage", &option), ("artifacts", &output.artifacts.len())],
                        );
                        artifacts.insert(option, output.artifacts.clone());
                        StageOutcome::completed(option, output)
                    }
                    Err(error) => {
                        self.logger.error("stage_failed", &[("stage", &option), ("error", &error)]);
                        if error.is_fatal() && fatal.is_none() {
                            fatal = Some((option, error.to_string()));
                        }
                        StageOutcome::new(option, StageStatus::Failed { reason: error.to_string() })
                    }
                };
                outcomes.insert(option, outcome);
            }

            if let Some((stage, reason)) = fatal {
                self.logger.error("postprocessing_aborted", &[("stage", &stage), ("reason", &reason)]);
                let report = DispatchReport {
                    run_id,
                    outcomes: outcomes.into_values().collect(),
                    manifest: None,
                };
                return Err(DispatchError::Aborted { stage, reason, report });
            }
        }

        for option in options.iter() {
            if outcomes.contains_key(&option) {
                continue;
            }
            if let Some(host) = option.applied_by() {
                let status = match outcomes.get(&host).map(|outcome| &outcome.status) {
                    Some(StageStatus::Completed) => StageStatus::Applied { by: host },
                    _ => StageStatus::PrerequisiteUnavailable { prerequisite: host },
                };
                outcomes.insert(option, StageOutcome::new(option, status));
            }
        }

        let outcomes: Vec<StageOutcome> = outcomes.into_values().collect();
        let manifest = write_manifest(directory, run_id, options, results.parameters(), &outcomes)?;

        let report = DispatchReport {
            run_id,
            outcomes,
            manifest: Some(manifest),
        };
        self.logger.info(
            "postprocessing_finished",
            &[("run_id", &run_id), ("failures", &report.failures().len())],
        );
        Ok(report)
    }

    /// Run one wave. Once a stage fails fatally no further stage of the wave
    /// starts; stages that never started are absent from the result.
    fn run_wave(
        &self,
        wave: &[PostProcessingOption],
        context: &StageContext<'_>,
    ) -> Vec<(PostProcessingOption, Result<StageOutput, StageError>)> {
        let aborted = AtomicBool::new(false);
        let run = |option: &PostProcessingOption| {
            if aborted.load(AtomicOrdering::SeqCst) {
                return None;
            }
            let result = match self.stages.get(option) {
                Some(stage) => stage.run(context),
                None => Err(StageError::Failed(format!("no stage registered for {option}"))),
            };
            if matches!(&result, Err(error) if error.is_fatal()) {
                aborted.store(true, AtomicOrdering::SeqCst);
            }
            Some((*option, result))
        };

        match self.config.concurrency_mode {
            ConcurrencyMode::Sequential => wave.iter().map_while(run).collect(),
            ConcurrencyMode::Rayon => match self.config.thread_pool_size {
                Some(threads) => match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                    Ok(pool) => pool.install(|| wave.par_iter().filter_map(run).collect()),
                    Err(error) => {
                        self.logger.warn("thread_pool_unavailable", &[("error", &error)]);
                        wave.par_iter().filter_map(run).collect()
                    }
                },
                None => wave.par_iter().filter_map(run).collect(),
            },
        }
    }
}

/// Create the directory and prove that files can be written into it
fn ensure_writable(directory: &Path) -> io::Result<()> {
    fs::create_dir_all(directory)?;
    let marker = directory.join(format!(".write-check-{}", Uuid::new_v4()));
    File::create(&marker)?;
    fs::remove_file(&marker)
}

/// Group options into waves; each option lands one wave after the latest
/// runnable option it requires or consumes.
fn dependency_waves(runnable: &[PostProcessingOption]) -> Vec<Vec<PostProcessingOption>> {
    let mut level: BTreeMap<PostProcessingOption, usize> = BTreeMap::new();
    let mut pending: Vec<PostProcessingOption> = runnable.to_vec();

    while !pending.is_empty() {
        let before = pending.len();
        pending.retain(|&option| {
            let dependencies: Vec<PostProcessingOption> = option
                .prerequisites()
                .iter()
                .chain(option.consumes())
                .copied()
                .filter(|dependency| runnable.contains(dependency))
                .collect();
            if dependencies.iter().all(|dependency| level.contains_key(dependency)) {
                let wave = dependencies.iter().map(|dependency| level[dependency] + 1).max().unwrap_or(0);
                level.insert(option, wave);
                false
            } else {
                true
            }
        });
        if pending.len() == before {
            // Unreachable with the built-in option table, which is acyclic
            for option in pending.drain(..) {
                level.insert(option, 0);
            }
        }
    }

    let mut waves: Vec<Vec<PostProcessingOption>> = Vec::new();
    for (option, wave) in level {
        if waves.len() <= wave {
            waves.resize_with(wave + 1, Vec::new);
        }
        waves[wave].push(option);
    }
    waves
}

/// First enabled prerequisite that did not complete
fn unavailable_prerequisite(
    option: PostProcessingOption,
    outcomes: &BTreeMap<PostProcessingOption, StageOutcome>,
) -> Option<PostProcessingOption> {
    option.prerequisites().iter().copied().find(|prerequisite| {
        !matches!(
            outcomes.get(prerequisite).map(|outcome| &outcome.status),
            Some(StageStatus::Completed)
        )
    })
}

fn write_manifest(
    directory: &Path,
    run_id: Uuid,
    options: &PostProcessingOptions,
    parameters: &SimulationParameters,
    outcomes: &[StageOutcome],
) -> Result<PathBuf, DispatchError> {
    let path = directory.join(MANIFEST_FILE);
    let manifest = Manifest {
        run_id: run_id.to_string(),
        options: options.ids(),
        parameters,
        stages: outcomes,
    };
    let result = File::create(&path)
        .map_err(serde_json::Error::io)
        .and_then(|file| serde_json::to_writer_pretty(BufWriter::new(file), &manifest));
    match result {
        Ok(()) => Ok(path),
        Err(source) => Err(DispatchError::Manifest { path, source }),
    }
}
