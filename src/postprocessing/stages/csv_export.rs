//! CSV exports of recorded output series.

use super::kpi::SeriesKpi;
use crate::core::components::parameters::SimulationParameters;
use crate::core::execution::series::OutputSeries;
use crate::postprocessing::options::PostProcessingOption;
use crate::postprocessing::stage::{Stage, StageContext, StageError, StageOutput};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

/// Writes every output series into one CSV file, one row per timestep
pub struct CsvExportStage;

/// Per-series yearly aggregates in the layout of the housing database import
pub struct HousingDatabaseStage;

/// One CSV per output series for scenario comparison tools
pub struct ScenarioEvaluationStage;

pub const ALL_OUTPUTS_FILE: &str = "all_outputs.csv";
pub const HOUSING_DATABASE_FILE: &str = "housing_database.csv";
pub const SCENARIO_EVALUATION_DIR: &str = "scenario_evaluation";

/// Writes the given series as CSV to any writer.
///
/// Columns are `timestep`, `day_of_year`, `hour_of_day` followed by one column
/// per series labelled `Component - Port [TypeTag]`.
pub fn write_series_csv(
    series: &[OutputSeries],
    parameters: &SimulationParameters,
    writer: impl Write,
) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    let mut header = vec!["timestep".to_string(), "day_of_year".to_string(), "hour_of_day".to_string()];
    header.extend(series.iter().map(OutputSeries::label));
    wtr.write_record(&header)?;

    let rows = series.iter().map(OutputSeries::len).max().unwrap_or(0);
    for timestep in 0..rows {
        let mut record = vec![
            timestep.to_string(),
            parameters.day_of_year(timestep).to_string(),
            format!("{:.4}", parameters.hour_of_day(timestep)),
        ];
        record.extend(
            series
                .iter()
                .map(|s| s.values().get(timestep).map_or_else(String::new, |v| format!("{v:.6}"))),
        );
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

fn create(path: &Path) -> Result<io::BufWriter<File>, StageError> {
    File::create(path)
        .map(io::BufWriter::new)
        .map_err(|source| StageError::io(path, source))
}

impl Stage for CsvExportStage {
    fn option(&self) -> PostProcessingOption {
        PostProcessingOption::ExportToCsv
    }

    fn run(&self, context: &StageContext<'_>) -> Result<StageOutput, StageError> {
        let path = context.path(ALL_OUTPUTS_FILE);
        write_series_csv(
            context.results.all_series(),
            context.results.parameters(),
            create(&path)?,
        )?;
        context
            .logger
            .debug("csv_exported", &[("path", &path.display()), ("columns", &context.results.all_series().len())]);
        Ok(StageOutput::new(vec![path]))
    }
}

impl Stage for HousingDatabaseStage {
    fn option(&self) -> PostProcessingOption {
        PostProcessingOption::GenerateCsvForHousingDataBase
    }

    fn run(&self, context: &StageContext<'_>) -> Result<StageOutput, StageError> {
        let path = context.path(HOUSING_DATABASE_FILE);
        let mut wtr = csv::WriterBuilder::new().from_writer(create(&path)?);
        wtr.write_record(["component", "port", "type_tag", "sum", "integrated_over_hours", "mean", "min", "max"])?;

        let hours = context.results.parameters().timestep_hours();
        for series in context.results.all_series() {
            let kpi = SeriesKpi::compute(series, hours);
            wtr.write_record(&[
                kpi.source.component.clone(),
                kpi.source.port.clone(),
                kpi.type_tag.to_string(),
                format!("{:.6}", kpi.sum),
                format!("{:.6}", kpi.integrated),
                format!("{:.6}", kpi.mean),
                format!("{:.6}", kpi.min),
                format!("{:.6}", kpi.max),
            ])?;
        }
        wtr.flush().map_err(|source| StageError::io(&path, source))?;
        Ok(StageOutput::new(vec![path]))
    }
}

impl Stage for ScenarioEvaluationStage {
    fn option(&self) -> PostProcessingOption {
        PostProcessingOption::PrepareOutputsForScenarioEvaluation
    }

    fn run(&self, context: &StageContext<'_>) -> Result<StageOutput, StageError> {
        let directory = context.path(SCENARIO_EVALUATION_DIR);
        fs::create_dir_all(&directory).map_err(|source| StageError::io(&directory, source))?;

        let parameters = context.results.parameters();
        let mut artifacts = Vec::with_capacity(context.results.all_series().len());
        for series in context.results.all_series() {
            let file_name = format!("{}_{}.csv", series.source().component, series.source().port);
            let path = directory.join(file_name);
            write_series_csv(std::slice::from_ref(series), parameters, create(&path)?)?;
            artifacts.push(path);
        }
        Ok(StageOutput::new(artifacts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PortRef;

    fn series(component: &str, port: &str, values: Vec<f64>) -> OutputSeries {
        OutputSeries::new(PortRef::new(component, port), "ElectricalPower".into(), values)
    }

    #[test]
    fn test_header_uses_series_labels() {
        let parameters = SimulationParameters::one_day_only(2021);
        let mut buf = Vec::new();
        write_series_csv(&[series("Meter", "ElectricityOutput", vec![1.0, 2.0])], &parameters, &mut buf).unwrap();

        let output = String::from_utf8(buf).unwrap();
        let mut lines = output.lines();
        assert_eq!(
            lines.next(),
            Some("timestep,day_of_year,hour_of_day,Meter - ElectricityOutput [ElectricalPower]")
        );
        assert_eq!(lines.next(), Some("0,0,0.0000,1.000000"));
        assert_eq!(lines.count(), 1);
    }

    #[test]
    fn test_row_count_matches_longest_series() {
        let parameters = SimulationParameters::one_day_only(2021);
        let mut buf = Vec::new();
        write_series_csv(
            &[series("A", "x", vec![1.0; 3]), series("B", "y", vec![0.5; 5])],
            &parameters,
            &mut buf,
        )
        .unwrap();

        let output = String::from_utf8(buf).unwrap();
        assert_eq!(output.lines().count(), 6);
        assert!(output.lines().last().unwrap().ends_with(",,0.500000"));
    }
}
