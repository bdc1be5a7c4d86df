use crate::core::components::parameters::SimulationParameters;
use crate::core::components::types::TypeTag;
use crate::core::graph::GraphSummary;
use crate::core::types::PortRef;
use std::collections::HashMap;

/// Recorded samples of one output port, aligned to the timestep index.
///
/// Only the engine appends; once handed out inside [`SimulationResults`] the
/// series is read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSeries {
    source: PortRef,
    type_tag: TypeTag,
    values: Vec<f64>,
}

impl OutputSeries {
    pub fn new(source: PortRef, type_tag: TypeTag, values: Vec<f64>) -> Self {
        Self {
            source,
            type_tag,
            values,
        }
    }

    pub(crate) fn with_capacity(source: PortRef, type_tag: TypeTag, capacity: usize) -> Self {
        Self::new(source, type_tag, Vec::with_capacity(capacity))
    }

    pub(crate) fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn source(&self) -> &PortRef {
        &self.source
    }

    pub fn type_tag(&self) -> &TypeTag {
        &self.type_tag
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Column label used by exports: "Component - Port [TypeTag]"
    pub fn label(&self) -> String {
        format!("{} - {} [{}]", self.source.component, self.source.port, self.type_tag)
    }
}

/// Frozen output of a completed run.
///
/// Post-processing reads everything through this type. It is produced only
/// after the last timestep was recorded.
#[derive(Debug, Clone)]
pub struct SimulationResults {
    summary: GraphSummary,
    series: Vec<OutputSeries>,
    index: HashMap<PortRef, usize>,
}

impl SimulationResults {
    pub fn new(summary: GraphSummary, series: Vec<OutputSeries>) -> Self {
        let index = series
            .iter()
            .enumerate()
            .map(|(position, series)| (series.source().clone(), position))
            .collect();
        Self { summary, series, index }
    }

    /// Look up the series of an output port
    pub fn series(&self, component: &str, port: &str) -> Option<&OutputSeries> {
        self.index
            .get(&PortRef::new(component, port))
            .map(|&position| &self.series[position])
    }

    /// All series, in component registration and port declaration order
    pub fn all_series(&self) -> &[OutputSeries] {
        &self.series
    }

    pub fn summary(&self) -> &GraphSummary {
        &self.summary
    }

    pub fn parameters(&self) -> &SimulationParameters {
        &self.summary.parameters
    }

    /// Number of recorded timesteps
    pub fn timesteps(&self) -> usize {
        self.series.first().map_or(0, OutputSeries::len)
    }
}
