use hsim::household::{setup_household_with_heat_pump, HouseholdConfig};
use hsim::postprocessing::stages::csv_export::ALL_OUTPUTS_FILE;
use hsim::postprocessing::stages::json_export::COMPONENT_CONFIGS_FILE;
use hsim::postprocessing::stages::kpi::{ALL_KPIS_FILE, BUILDING_SIZER_FILE, KPI_FILE};
use hsim::postprocessing::stages::report::REPORT_FILE;
use hsim::postprocessing::{MissingPrerequisiteError, StageContext, StageError, StageOutput, MANIFEST_FILE};
use hsim::{
    ConcurrencyMode, DispatchError, MemoryLogger, PostProcessingConfig, PostProcessingOption, PostProcessingOptions,
    PostProcessor, SimulationEngine, SimulationParameters, SimulationResults, Stage, StageStatus,
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use PostProcessingOption::*;

fn household_results() -> SimulationResults {
    let sim = setup_household_with_heat_pump(
        &HouseholdConfig::get_default(),
        Some(SimulationParameters::new(2021, 900, 0, 1)),
        Arc::new(MemoryLogger::new()),
    )
    .unwrap();
    SimulationEngine::new(sim.build().unwrap()).run().unwrap()
}

fn result_directory() -> PathBuf {
    std::env::temp_dir().join(format!("hsim-results-{}", uuid::Uuid::new_v4()))
}

fn options(selected: &[PostProcessingOption]) -> PostProcessingOptions {
    selected.iter().copied().collect()
}

struct FailingStage {
    option: PostProcessingOption,
    fatal: bool,
}

impl Stage for FailingStage {
    fn option(&self) -> PostProcessingOption {
        self.option
    }

    fn run(&self, _context: &StageContext<'_>) -> Result<StageOutput, StageError> {
        if self.fatal {
            Err(StageError::Fatal("disk full".to_string()))
        } else {
            Err(StageError::Failed("nothing to export".to_string()))
        }
    }
}

#[test]
fn test_csv_and_report_complete_together() {
    let results = household_results();
    let directory = result_directory();
    let processor = PostProcessor::new(
        PostProcessingConfig::new(&directory).with_options(options(&[ExportToCsv, GeneratePdfReport])),
    )
    .with_logger(Arc::new(MemoryLogger::new()));

    let report = processor.dispatch(&results).unwrap();
    assert!(report.is_success());
    assert_eq!(report.status(ExportToCsv), Some(&StageStatus::Completed));
    assert_eq!(report.status(GeneratePdfReport), Some(&StageStatus::Completed));

    let csv = fs::read_to_string(directory.join(ALL_OUTPUTS_FILE)).unwrap();
    assert_eq!(csv.lines().count(), 1 + results.timesteps());
    assert!(csv.lines().next().unwrap().contains("ElectricityMeter - ElectricityFromGrid"));

    let markdown = fs::read_to_string(directory.join(REPORT_FILE)).unwrap();
    assert!(markdown.contains(ALL_OUTPUTS_FILE), "report should list the exported data");

    fs::remove_dir_all(&directory).unwrap();
}

#[test]
fn test_report_without_csv_export_is_missing_prerequisite() {
    let results = household_results();
    let directory = result_directory();
    let logger = Arc::new(MemoryLogger::new());
    let processor = PostProcessor::new(
        PostProcessingConfig::new(&directory).with_options(options(&[GeneratePdfReport, WriteKpisToJson])),
    )
    .with_logger(logger.clone());

    let report = processor.dispatch(&results).unwrap();
    assert_eq!(
        report.status(GeneratePdfReport),
        Some(&StageStatus::MissingPrerequisite(MissingPrerequisiteError {
            stage: GeneratePdfReport,
            missing: vec![ExportToCsv],
        }))
    );
    assert_eq!(report.status(WriteKpisToJson), Some(&StageStatus::Completed));
    assert!(report.status(ExportToCsv).is_none(), "prerequisites are never enabled implicitly");
    assert!(!directory.join(ALL_OUTPUTS_FILE).exists());
    assert!(!directory.join(REPORT_FILE).exists());
    assert!(directory.join(KPI_FILE).exists());
    assert_eq!(logger.events_named("missing_prerequisite").len(), 1);

    fs::remove_dir_all(&directory).unwrap();
}

#[test]
fn test_unwritable_result_directory_fails_before_any_stage() {
    let results = household_results();
    let blocker = std::env::temp_dir().join(format!("hsim-blocker-{}", uuid::Uuid::new_v4()));
    fs::write(&blocker, "not a directory").unwrap();

    let processor = PostProcessor::new(
        PostProcessingConfig::new(blocker.join("results")).with_options(options(&[ExportToCsv])),
    )
    .with_logger(Arc::new(MemoryLogger::new()));

    let error = processor.dispatch(&results).unwrap_err();
    assert!(matches!(error, DispatchError::ResultDirectoryUnwritable { .. }));
    fs::remove_file(&blocker).unwrap();
}

#[test]
fn test_rayon_dispatch_writes_manifest_with_option_ids() {
    let results = household_results();
    let directory = result_directory();
    let processor = PostProcessor::new(
        PostProcessingConfig::new(&directory)
            .with_options(options(&[
                WriteKpisToJson,
                ExportToCsv,
                WriteAllKpisToJson,
                WriteComponentConfigsToJson,
                WriteKpisToJsonForBuildingSizer,
            ]))
            .with_concurrency(ConcurrencyMode::Rayon)
            .with_thread_pool_size(2),
    )
    .with_logger(Arc::new(MemoryLogger::new()));

    let report = processor.dispatch(&results).unwrap();
    assert!(report.is_success(), "failures: {:?}", report.failures());
    assert_eq!(report.manifest, Some(directory.join(MANIFEST_FILE)));

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(directory.join(MANIFEST_FILE)).unwrap()).unwrap();
    assert_eq!(manifest["run_id"], report.run_id.to_string());
    assert_eq!(manifest["options"], serde_json::json!([7, 23, 24, 25, 26]));
    assert_eq!(manifest["stages"][0]["option"], 7);
    assert_eq!(manifest["stages"][0]["status"], "completed");
    assert_eq!(manifest["parameters"]["seconds_per_timestep"], 900);

    let sizer: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(directory.join(BUILDING_SIZER_FILE)).unwrap()).unwrap();
    assert!(sizer["ElectricalPower_integrated"].as_f64().unwrap() > 0.0);

    fs::remove_dir_all(&directory).unwrap();
}

#[test]
fn test_stage_failure_keeps_siblings_running() {
    let results = household_results();
    let directory = result_directory();
    let mut processor = PostProcessor::new(
        PostProcessingConfig::new(&directory).with_options(options(&[ExportToCsv, GeneratePdfReport, WriteKpisToJson])),
    )
    .with_logger(Arc::new(MemoryLogger::new()));
    processor.register_stage(Box::new(FailingStage {
        option: ExportToCsv,
        fatal: false,
    }));

    let report = processor.dispatch(&results).unwrap();
    assert_eq!(
        report.status(ExportToCsv),
        Some(&StageStatus::Failed {
            reason: "nothing to export".to_string()
        })
    );
    assert_eq!(
        report.status(GeneratePdfReport),
        Some(&StageStatus::PrerequisiteUnavailable {
            prerequisite: ExportToCsv
        })
    );
    assert_eq!(report.status(WriteKpisToJson), Some(&StageStatus::Completed));
    assert_eq!(report.failures().len(), 2);

    fs::remove_dir_all(&directory).unwrap();
}

#[test]
fn test_fatal_stage_aborts_dispatch() {
    let results = household_results();
    let directory = result_directory();
    let logger = Arc::new(MemoryLogger::new());
    let mut processor = PostProcessor::new(PostProcessingConfig::new(&directory).with_options(options(&[
        ExportToCsv,
        GeneratePdfReport,
        WriteComponentConfigsToJson,
        WriteKpisToJson,
        WriteAllKpisToJson,
    ])))
    .with_logger(logger.clone());
    processor.register_stage(Box::new(FailingStage {
        option: ExportToCsv,
        fatal: true,
    }));

    match processor.dispatch(&results) {
        Err(DispatchError::Aborted { stage, report, .. }) => {
            assert_eq!(stage, ExportToCsv);
            assert_eq!(report.outcomes.len(), 1, "no stage may start after a fatal error");
            assert!(matches!(report.status(ExportToCsv), Some(StageStatus::Failed { .. })));
            assert!(report.manifest.is_none());
        }
        other => panic!("expected an aborted dispatch, got {other:?}"),
    }
    for artifact in [MANIFEST_FILE, KPI_FILE, ALL_KPIS_FILE, COMPONENT_CONFIGS_FILE] {
        assert!(!directory.join(artifact).exists(), "{artifact} was written after the abort");
    }
    assert_eq!(logger.events_named("stage_completed").len(), 0);
    assert_eq!(logger.events_named("postprocessing_aborted").len(), 1);

    fs::remove_dir_all(&directory).unwrap();
}

#[test]
fn test_fatal_stage_stops_parallel_dispatch() {
    let results = household_results();
    let directory = result_directory();
    let mut processor = PostProcessor::new(
        PostProcessingConfig::new(&directory)
            .with_options(options(&[ExportToCsv, GeneratePdfReport, WriteKpisToJson]))
            .with_concurrency(ConcurrencyMode::Rayon)
            .with_thread_pool_size(1),
    )
    .with_logger(Arc::new(MemoryLogger::new()));
    processor.register_stage(Box::new(FailingStage {
        option: ExportToCsv,
        fatal: true,
    }));

    match processor.dispatch(&results) {
        Err(DispatchError::Aborted { stage, report, .. }) => {
            assert_eq!(stage, ExportToCsv);
            assert!(report.status(GeneratePdfReport).is_none(), "later waves never start");
            assert!(report.manifest.is_none());
        }
        other => panic!("expected an aborted dispatch, got {other:?}"),
    }
    assert!(!directory.join(MANIFEST_FILE).exists());

    fs::remove_dir_all(&directory).unwrap();
}

#[test]
fn test_report_modifiers_and_unhandled_options() {
    let results = household_results();
    let directory = result_directory();
    let processor = PostProcessor::new(PostProcessingConfig::new(&directory).with_options(options(&[
        ExportToCsv,
        GeneratePdfReport,
        WriteComponentsToReport,
        ComputeKpisAndWriteToReport,
        PlotLine,
    ])))
    .with_logger(Arc::new(MemoryLogger::new()));
    assert!(!processor.has_handler(PlotLine));

    let report = processor.dispatch(&results).unwrap();
    assert_eq!(
        report.status(WriteComponentsToReport),
        Some(&StageStatus::Applied { by: GeneratePdfReport })
    );
    assert_eq!(
        report.status(ComputeKpisAndWriteToReport),
        Some(&StageStatus::Applied { by: GeneratePdfReport })
    );
    assert_eq!(report.status(PlotLine), Some(&StageStatus::NoHandler));
    assert_eq!(report.failures().len(), 1);

    let markdown = fs::read_to_string(directory.join(REPORT_FILE)).unwrap();
    assert!(markdown.contains("HeatPumpController"));

    fs::remove_dir_all(&directory).unwrap();
}
