//! Key performance indicators derived from recorded output series.

use super::write_json;
use crate::core::components::types::TypeTag;
use crate::core::execution::series::{OutputSeries, SimulationResults};
use crate::core::types::PortRef;
use crate::postprocessing::options::PostProcessingOption;
use crate::postprocessing::stage::{Stage, StageContext, StageError, StageOutput};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;

pub const KPI_FILE: &str = "kpis.json";
pub const ALL_KPIS_FILE: &str = "all_kpis.json";
pub const BUILDING_SIZER_FILE: &str = "kpis_for_building_sizer.json";

/// Aggregates of one output series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesKpi {
    pub source: PortRef,
    pub type_tag: TypeTag,
    pub sum: f64,
    /// Sum of samples times the timestep length in hours
    pub integrated: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl SeriesKpi {
    pub fn compute(series: &OutputSeries, timestep_hours: f64) -> Self {
        let values = series.values();
        let sum: f64 = values.iter().sum();
        let (min, max) = if values.is_empty() {
            (0.0, 0.0)
        } else {
            values
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
        };
        Self {
            source: series.source().clone(),
            type_tag: series.type_tag().clone(),
            sum,
            integrated: sum * timestep_hours,
            mean: if values.is_empty() { 0.0 } else { sum / values.len() as f64 },
            min,
            max,
        }
    }
}

/// Aggregates over every result series of one type tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagKpi {
    pub series: usize,
    pub integrated: f64,
    pub peak: f64,
}

/// Headline indicators of a run.
///
/// Only terminal outputs, those no component consumes, count towards the
/// per-tag totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub timesteps: usize,
    pub timestep_hours: f64,
    pub by_type_tag: BTreeMap<String, TagKpi>,
}

impl KpiSummary {
    pub fn compute(results: &SimulationResults) -> Self {
        let hours = results.parameters().timestep_hours();
        let consumed: HashSet<&PortRef> = results
            .summary()
            .connections
            .iter()
            .map(|connection| &connection.source)
            .collect();

        let mut by_type_tag: BTreeMap<String, TagKpi> = BTreeMap::new();
        for series in results.all_series().iter().filter(|s| !consumed.contains(s.source())) {
            let kpi = SeriesKpi::compute(series, hours);
            let entry = by_type_tag.entry(kpi.type_tag.to_string()).or_insert(TagKpi {
                series: 0,
                integrated: 0.0,
                peak: f64::NEG_INFINITY,
            });
            entry.series += 1;
            entry.integrated += kpi.integrated;
            entry.peak = entry.peak.max(kpi.max);
        }

        Self {
            timesteps: results.timesteps(),
            timestep_hours: hours,
            by_type_tag,
        }
    }
}

/// Per-series aggregates for every output
pub fn all_series_kpis(results: &SimulationResults) -> Vec<SeriesKpi> {
    let hours = results.parameters().timestep_hours();
    results
        .all_series()
        .iter()
        .map(|series| SeriesKpi::compute(series, hours))
        .collect()
}

/// `kpis.json`: the headline summary
pub struct KpiJsonStage;

/// `all_kpis.json`: aggregates of every output series
pub struct AllKpisJsonStage;

/// `kpis_for_building_sizer.json`: flat name/value pairs derived from `kpis.json`
pub struct BuildingSizerKpiStage;

impl Stage for KpiJsonStage {
    fn option(&self) -> PostProcessingOption {
        PostProcessingOption::WriteKpisToJson
    }

    fn run(&self, context: &StageContext<'_>) -> Result<StageOutput, StageError> {
        let path = context.path(KPI_FILE);
        write_json(&KpiSummary::compute(context.results), &path)?;
        Ok(StageOutput::new(vec![path]))
    }
}

impl Stage for AllKpisJsonStage {
    fn option(&self) -> PostProcessingOption {
        PostProcessingOption::WriteAllKpisToJson
    }

    fn run(&self, context: &StageContext<'_>) -> Result<StageOutput, StageError> {
        let path = context.path(ALL_KPIS_FILE);
        write_json(&all_series_kpis(context.results), &path)?;
        Ok(StageOutput::new(vec![path]))
    }
}

impl Stage for BuildingSizerKpiStage {
    fn option(&self) -> PostProcessingOption {
        PostProcessingOption::WriteKpisToJsonForBuildingSizer
    }

    fn run(&self, context: &StageContext<'_>) -> Result<StageOutput, StageError> {
        let source = context
            .artifacts_of(PostProcessingOption::WriteKpisToJson)
            .first()
            .ok_or_else(|| StageError::Failed("kpis.json was not written".to_string()))?;
        let text = fs::read_to_string(source).map_err(|error| StageError::io(source, error))?;
        let summary: KpiSummary = serde_json::from_str(&text)?;

        let mut flat = BTreeMap::new();
        for (tag, kpi) in &summary.by_type_tag {
            flat.insert(format!("{tag}_integrated"), kpi.integrated);
            flat.insert(format!("{tag}_peak"), kpi.peak);
        }

        let path = context.path(BUILDING_SIZER_FILE);
        write_json(&flat, &path)?;
        Ok(StageOutput::new(vec![path]))
    }
}
