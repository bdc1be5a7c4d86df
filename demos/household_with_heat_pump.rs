//! Household heated by a heat pump, without PV.
//!
//! Reads `hp_config.json` from the working directory when present, runs the
//! simulation and writes the selected post-processing artifacts to the
//! configured result path.

use hsim::config::{ConcurrencyMode, PostProcessingConfig};
use hsim::household::{setup_household_with_heat_pump, HouseholdConfig, CONFIG_FILE_NAME};
use hsim::postprocessing::StageStatus;
use hsim::{LogFacade, PostProcessingOption, PostProcessingOptions, PostProcessor, SimulationEngine};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    let config_path = Path::new(CONFIG_FILE_NAME);
    let config = HouseholdConfig::load_or_default(config_path)?;
    if config_path.is_file() {
        log::info!("Read system config from {}", config_path.display());
    }

    println!("Household with heat pump");
    println!("  Household type: {}", config.household_type);
    println!("  Energy intensity: {:?}", config.energy_intensity);
    println!("  Base area: {:.1} m²", config.total_base_area_in_m2);
    println!("  Result path: {}", config.result_path.display());
    println!();

    let logger = LogFacade::shared();
    let sim = setup_household_with_heat_pump(&config, None, logger.clone())?;
    let graph = sim.build()?;

    println!("Execution order:");
    for (index, stage) in graph.stages().iter().enumerate() {
        let names: Vec<&str> = stage.iter().map(|id| id.name()).collect();
        println!("  {}: {}", index, names.join(", "));
    }
    println!();

    let results = SimulationEngine::new(graph).with_logger(logger.clone()).run()?;

    let options: PostProcessingOptions = [
        PostProcessingOption::ExportToCsv,
        PostProcessingOption::GeneratePdfReport,
        PostProcessingOption::WriteComponentsToReport,
        PostProcessingOption::ComputeKpisAndWriteToReport,
        PostProcessingOption::WriteKpisToJson,
        PostProcessingOption::WriteComponentConfigsToJson,
        PostProcessingOption::PlotLine,
    ]
    .into_iter()
    .collect();

    let processor = PostProcessor::new(
        PostProcessingConfig::new(&config.result_path)
            .with_options(options)
            .with_concurrency(ConcurrencyMode::Rayon),
    )
    .with_logger(logger);
    let report = processor.dispatch(&results)?;

    println!("Post-processing run {}:", report.run_id);
    for outcome in &report.outcomes {
        match &outcome.status {
            StageStatus::Completed => {
                println!("  {:<32} completed ({} files)", outcome.option.to_string(), outcome.artifacts.len())
            }
            status => println!("  {:<32} {:?}", outcome.option.to_string(), status),
        }
    }

    if let Some(series) = results.series("ElectricityMeter", "CumulativeConsumption") {
        let total_kwh = series.values().last().copied().unwrap_or_default() / 1000.0;
        println!();
        println!("Electricity drawn from the grid: {total_kwh:.1} kWh");
    }

    Ok(())
}
