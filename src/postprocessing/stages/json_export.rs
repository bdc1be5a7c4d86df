//! JSON exports for configuration archives and the web tool.

use super::kpi::KpiSummary;
use super::write_json;
use crate::core::components::parameters::SimulationParameters;
use crate::core::connections::manager::Connection;
use crate::postprocessing::options::PostProcessingOption;
use crate::postprocessing::stage::{Stage, StageContext, StageError, StageOutput};
use serde::Serialize;
use std::collections::BTreeMap;

pub const COMPONENT_CONFIGS_FILE: &str = "component_configs.json";
pub const WEBTOOL_RESULTS_FILE: &str = "webtool_results.json";
pub const WEBTOOL_OPERATION_FILE: &str = "webtool_operation_results.json";

#[derive(Serialize)]
struct ComponentConfigEntry<'a> {
    component_type: &'a str,
    config: Option<&'a serde_json::Value>,
}

/// Configuration of every component, keyed by component name
pub struct ComponentConfigsStage;

impl Stage for ComponentConfigsStage {
    fn option(&self) -> PostProcessingOption {
        PostProcessingOption::WriteComponentConfigsToJson
    }

    fn run(&self, context: &StageContext<'_>) -> Result<StageOutput, StageError> {
        let entries: BTreeMap<&str, ComponentConfigEntry<'_>> = context
            .results
            .summary()
            .components
            .iter()
            .map(|component| {
                (
                    component.name.as_str(),
                    ComponentConfigEntry {
                        component_type: &component.component_type,
                        config: component.config.as_ref(),
                    },
                )
            })
            .collect();

        let path = context.path(COMPONENT_CONFIGS_FILE);
        write_json(&entries, &path)?;
        Ok(StageOutput::new(vec![path]))
    }
}

#[derive(Serialize)]
struct WebtoolResults<'a> {
    parameters: &'a SimulationParameters,
    components: Vec<&'a str>,
    connections: &'a [Connection],
    kpis: KpiSummary,
}

/// Run overview consumed by the web tool
pub struct WebtoolResultsStage;

impl Stage for WebtoolResultsStage {
    fn option(&self) -> PostProcessingOption {
        PostProcessingOption::MakeResultJsonForWebtool
    }

    fn run(&self, context: &StageContext<'_>) -> Result<StageOutput, StageError> {
        let summary = context.results.summary();
        let document = WebtoolResults {
            parameters: &summary.parameters,
            components: summary.components.iter().map(|c| c.name.as_str()).collect(),
            connections: &summary.connections,
            kpis: KpiSummary::compute(context.results),
        };

        let path = context.path(WEBTOOL_RESULTS_FILE);
        write_json(&document, &path)?;
        Ok(StageOutput::new(vec![path]))
    }
}

#[derive(Serialize)]
struct OperationResults<'a> {
    seconds_per_timestep: u32,
    start_day_of_year: u32,
    series: BTreeMap<String, &'a [f64]>,
}

/// Full time series keyed by column label, for the web tool's operation view
pub struct OperationResultsStage;

impl Stage for OperationResultsStage {
    fn option(&self) -> PostProcessingOption {
        PostProcessingOption::MakeOperationResultsForWebtool
    }

    fn run(&self, context: &StageContext<'_>) -> Result<StageOutput, StageError> {
        let parameters = context.results.parameters();
        let document = OperationResults {
            seconds_per_timestep: parameters.seconds_per_timestep,
            start_day_of_year: parameters.start_day_of_year,
            series: context
                .results
                .all_series()
                .iter()
                .map(|series| (series.label(), series.values()))
                .collect(),
        };

        let path = context.path(WEBTOOL_OPERATION_FILE);
        write_json(&document, &path)?;
        Ok(StageOutput::new(vec![path]))
    }
}
