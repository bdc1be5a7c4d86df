//! Built-in post-processing stages.

pub mod csv_export;
pub mod json_export;
pub mod kpi;
pub mod report;

pub use csv_export::{write_series_csv, CsvExportStage, HousingDatabaseStage, ScenarioEvaluationStage};
pub use json_export::{ComponentConfigsStage, OperationResultsStage, WebtoolResultsStage};
pub use kpi::{AllKpisJsonStage, BuildingSizerKpiStage, KpiJsonStage, KpiSummary, SeriesKpi};
pub use report::ReportStage;

use super::stage::{Stage, StageError};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Every stage shipped with the crate
pub fn default_stages() -> Vec<Box<dyn Stage>> {
    vec![
        Box::new(CsvExportStage),
        Box::new(ReportStage),
        Box::new(HousingDatabaseStage),
        Box::new(ScenarioEvaluationStage),
        Box::new(ComponentConfigsStage),
        Box::new(WebtoolResultsStage),
        Box::new(OperationResultsStage),
        Box::new(KpiJsonStage),
        Box::new(AllKpisJsonStage),
        Box::new(BuildingSizerKpiStage),
    ]
}

pub(crate) fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), StageError> {
    let file = File::create(path).map_err(|source| StageError::io(path, source))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)?;
    Ok(())
}
