//! Run report.
//!
//! The report is written as a markdown document. Rendering it to PDF is left
//! to external tooling. Report modifier options select the optional sections.

use super::kpi::{all_series_kpis, KpiSummary};
use crate::core::execution::series::SimulationResults;
use crate::postprocessing::options::PostProcessingOption;
use crate::postprocessing::stage::{Stage, StageContext, StageError, StageOutput};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

pub const REPORT_FILE: &str = "report.md";

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "svg", "jpg", "jpeg"];

pub struct ReportStage;

impl Stage for ReportStage {
    fn option(&self) -> PostProcessingOption {
        PostProcessingOption::GeneratePdfReport
    }

    fn run(&self, context: &StageContext<'_>) -> Result<StageOutput, StageError> {
        let document = render(context).map_err(|error| StageError::Failed(error.to_string()))?;
        let path = context.path(REPORT_FILE);
        fs::write(&path, document).map_err(|source| StageError::io(&path, source))?;
        Ok(StageOutput::new(vec![path]))
    }
}

fn render(context: &StageContext<'_>) -> Result<String, std::fmt::Error> {
    use PostProcessingOption::*;

    let results = context.results;
    let parameters = results.parameters();
    let mut out = String::new();

    writeln!(out, "# Simulation report\n")?;
    writeln!(out, "- Year: {}", parameters.year)?;
    writeln!(out, "- Start day of year: {}", parameters.start_day_of_year)?;
    writeln!(out, "- Duration: {} days", parameters.duration_days)?;
    writeln!(out, "- Seconds per timestep: {}", parameters.seconds_per_timestep)?;
    writeln!(out, "- Timesteps: {}\n", results.timesteps())?;

    writeln!(out, "## Data files\n")?;
    for artifact in context.artifacts_of(ExportToCsv) {
        writeln!(out, "- {}", file_name(artifact))?;
    }
    writeln!(out)?;

    if context.is_enabled(WriteComponentsToReport) {
        write_components(&mut out, results)?;
    }
    if context.is_enabled(IncludeConfigsInPdfReport) {
        write_configs(&mut out, results)?;
    }
    if context.is_enabled(WriteNetworkChartsToReport) {
        write_network(&mut out, context)?;
    }
    if context.is_enabled(WriteAllOutputsToReport) {
        write_outputs(&mut out, results)?;
    }
    if context.is_enabled(ComputeKpisAndWriteToReport) {
        write_kpis(&mut out, results)?;
    }
    if context.is_enabled(IncludeImagesInPdfReport) {
        write_images(&mut out, context)?;
    }
    Ok(out)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}

fn write_components(out: &mut String, results: &SimulationResults) -> std::fmt::Result {
    writeln!(out, "## Components\n")?;
    writeln!(out, "| Component | Type | Inputs | Outputs |")?;
    writeln!(out, "|---|---|---|---|")?;
    for component in &results.summary().components {
        let inputs: Vec<String> = component
            .inputs
            .iter()
            .map(|spec| format!("{} [{}]", spec.name, spec.type_tag))
            .collect();
        let outputs: Vec<String> = component
            .outputs
            .iter()
            .map(|spec| format!("{} [{}]", spec.name, spec.type_tag))
            .collect();
        writeln!(
            out,
            "| {} | {} | {} | {} |",
            component.name,
            component.component_type,
            inputs.join(", "),
            outputs.join(", ")
        )?;
    }
    writeln!(out)
}

fn write_configs(out: &mut String, results: &SimulationResults) -> std::fmt::Result {
    writeln!(out, "## Component configurations\n")?;
    for component in &results.summary().components {
        if let Some(config) = &component.config {
            writeln!(out, "### {}\n", component.name)?;
            writeln!(out, "```json\n{config:#}\n```\n")?;
        }
    }
    Ok(())
}

fn write_network(out: &mut String, context: &StageContext<'_>) -> std::fmt::Result {
    writeln!(out, "## Component network\n")?;
    for chart in context.artifacts_of(PostProcessingOption::MakeNetworkCharts) {
        writeln!(out, "![network]({})\n", file_name(chart))?;
    }
    writeln!(out, "| Source | Target | Type | Wiring |")?;
    writeln!(out, "|---|---|---|---|")?;
    for connection in &context.results.summary().connections {
        writeln!(
            out,
            "| {} | {} | {} | {:?} |",
            connection.source, connection.target, connection.type_tag, connection.origin
        )?;
    }
    writeln!(out)
}

fn write_outputs(out: &mut String, results: &SimulationResults) -> std::fmt::Result {
    writeln!(out, "## Outputs\n")?;
    writeln!(out, "| Output | Mean | Min | Max |")?;
    writeln!(out, "|---|---|---|---|")?;
    for (series, kpi) in results.all_series().iter().zip(all_series_kpis(results)) {
        writeln!(out, "| {} | {:.3} | {:.3} | {:.3} |", series.label(), kpi.mean, kpi.min, kpi.max)?;
    }
    writeln!(out)
}

fn write_kpis(out: &mut String, results: &SimulationResults) -> std::fmt::Result {
    let summary = KpiSummary::compute(results);
    writeln!(out, "## Key performance indicators\n")?;
    writeln!(out, "| Type | Series | Integrated over hours | Peak |")?;
    writeln!(out, "|---|---|---|---|")?;
    for (tag, kpi) in &summary.by_type_tag {
        writeln!(out, "| {} | {} | {:.3} | {:.3} |", tag, kpi.series, kpi.integrated, kpi.peak)?;
    }
    writeln!(out)
}

fn write_images(out: &mut String, context: &StageContext<'_>) -> std::fmt::Result {
    writeln!(out, "## Figures\n")?;
    for option in PostProcessingOption::GeneratePdfReport.consumes() {
        for image in context.artifacts_of(*option).iter().filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map_or(false, |ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        }) {
            writeln!(out, "![{}]({})\n", option, file_name(image))?;
        }
    }
    Ok(())
}
