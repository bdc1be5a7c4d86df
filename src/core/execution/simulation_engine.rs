use super::series::{OutputSeries, SimulationResults};
use crate::core::components::parameters::SimulationParameters;
use crate::core::components::registry::ComponentInstance;
use crate::core::components::step::{StepInputs, StepOutputs};
use crate::core::errors::ExecutionError;
use crate::core::graph::{GraphSummary, SimulationGraph};
use crate::core::types::PortRef;
use crate::logging::{LogFacade, SimulationLogger};
use std::collections::HashMap;
use std::sync::Arc;

/// Source of one input: (component position, output position)
type Source = (usize, usize);

/// Minimal time-stepped runner for a validated graph.
///
/// Each timestep evaluates every component once, in topological order. An
/// input reads the latest value of its source: a producer earlier in the order
/// has already written this step's value, a producer later in the order (only
/// possible through an optional input) still holds the previous step's value.
pub struct SimulationEngine {
    parameters: SimulationParameters,
    components: Vec<ComponentInstance>,
    order: Vec<usize>,
    summary: GraphSummary,
    /// Per component, per input port: where the value comes from
    input_sources: Vec<Vec<Option<Source>>>,
    /// Per component: latest output values
    latest: Vec<StepOutputs>,
    /// Per component: index of its first series in `recorded`
    series_offset: Vec<usize>,
    recorded: Vec<OutputSeries>,
    current_step: usize,
    total_steps: usize,
    logger: Arc<dyn SimulationLogger>,
}

impl SimulationEngine {
    pub fn new(graph: SimulationGraph) -> Self {
        let parts = graph.into_parts();
        let total_steps = parts.parameters.total_timesteps();

        let positions: HashMap<&str, usize> = parts
            .components
            .iter()
            .enumerate()
            .map(|(position, instance)| (instance.name(), position))
            .collect();

        // Pre-compute input sources for O(1) lookup during stepping
        let input_sources = parts
            .components
            .iter()
            .map(|instance| {
                instance
                    .input_ports()
                    .iter()
                    .map(|spec| {
                        let connection = parts.connections.get(&PortRef::new(instance.name(), &spec.name))?;
                        let producer = *positions.get(connection.source.component.as_str())?;
                        let output = parts.components[producer]
                            .output_ports()
                            .iter()
                            .position(|output| output.name == connection.source.port)?;
                        Some((producer, output))
                    })
                    .collect()
            })
            .collect();

        let latest = parts
            .components
            .iter()
            .map(|instance| StepOutputs::for_ports(instance.output_ports().iter().map(|spec| spec.name.as_str())))
            .collect();

        let mut series_offset = Vec::with_capacity(parts.components.len());
        let mut recorded = Vec::new();
        for instance in &parts.components {
            series_offset.push(recorded.len());
            for spec in instance.output_ports() {
                recorded.push(OutputSeries::with_capacity(
                    PortRef::new(instance.name(), &spec.name),
                    spec.type_tag.clone(),
                    total_steps,
                ));
            }
        }

        Self {
            parameters: parts.parameters,
            components: parts.components,
            order: parts.order,
            summary: parts.summary,
            input_sources,
            latest,
            series_offset,
            recorded,
            current_step: 0,
            total_steps,
            logger: LogFacade::shared(),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn SimulationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn parameters(&self) -> &SimulationParameters {
        &self.parameters
    }

    /// Index of the next timestep to evaluate
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Evaluate one timestep
    pub fn step(&mut self) -> Result<(), ExecutionError> {
        if self.current_step >= self.total_steps {
            return Err(ExecutionError::HorizonReached(self.total_steps));
        }
        let timestep = self.current_step;

        for &position in &self.order {
            let inputs = self.collect_inputs(position);
            let instance = &mut self.components[position];
            let mut outputs = self.latest[position].clone();

            instance
                .component_mut()
                .simulate_step(timestep, &inputs, &mut outputs)
                .map_err(|source| ExecutionError::Component {
                    component: instance.name().to_string(),
                    timestep,
                    source,
                })?;

            let offset = self.series_offset[position];
            for (index, value) in outputs.values().enumerate() {
                self.recorded[offset + index].push(value);
            }
            self.latest[position] = outputs;
        }

        self.current_step += 1;
        Ok(())
    }

    /// Run the remaining timesteps and hand out the frozen results
    pub fn run(mut self) -> Result<SimulationResults, ExecutionError> {
        self.logger.info(
            "simulation_started",
            &[("components", &self.components.len()), ("timesteps", &self.total_steps)],
        );
        while self.current_step < self.total_steps {
            if let Err(error) = self.step() {
                self.logger.error("simulation_failed", &[("error", &error)]);
                return Err(error);
            }
        }
        self.logger.info("simulation_finished", &[("timesteps", &self.current_step)]);
        Ok(SimulationResults::new(self.summary, self.recorded))
    }

    /// Collect inputs for a component from the latest source values
    fn collect_inputs(&self, position: usize) -> StepInputs {
        let mut inputs = StepInputs::new();
        let instance = &self.components[position];
        for (spec, source) in instance.input_ports().iter().zip(&self.input_sources[position]) {
            let value = source.map(|(producer, output)| {
                self.latest[producer].values().nth(output).unwrap_or_default()
            });
            inputs.insert(&spec.name, value);
        }
        inputs
    }
}
