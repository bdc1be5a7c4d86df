use crate::core::errors::SetupError;
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: u32 = 86_400;

/// Simulation parameters shared by every component of a graph.
///
/// Immutable once handed to the builder. Components read the timestep length
/// and calendar position from here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Calendar year being simulated
    pub year: i32,
    /// Length of one timestep in seconds; must divide a day evenly
    pub seconds_per_timestep: u32,
    /// First simulated day, zero-based (0 = January 1st)
    #[serde(default)]
    pub start_day_of_year: u32,
    /// Number of simulated days
    pub duration_days: u32,
}

impl SimulationParameters {
    pub fn new(year: i32, seconds_per_timestep: u32, start_day_of_year: u32, duration_days: u32) -> Self {
        Self {
            year,
            seconds_per_timestep,
            start_day_of_year,
            duration_days,
        }
    }

    /// A whole calendar year
    pub fn full_year(year: i32, seconds_per_timestep: u32) -> Self {
        Self::new(year, seconds_per_timestep, 0, days_in_year(year))
    }

    /// January 1st only, at one-minute resolution
    pub fn one_day_only(year: i32) -> Self {
        Self::new(year, 60, 0, 1)
    }

    /// The month of January at one-minute resolution
    pub fn january_only(year: i32) -> Self {
        Self::january_only_with_customized_options(year, 60)
    }

    /// The month of January at a caller-chosen resolution
    pub fn january_only_with_customized_options(year: i32, seconds_per_timestep: u32) -> Self {
        Self::new(year, seconds_per_timestep, 0, 31)
    }

    /// Check that the parameters describe a usable horizon
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.seconds_per_timestep == 0 {
            return Err(SetupError::InvalidParameters(
                "seconds_per_timestep must be positive".to_string(),
            ));
        }
        if SECONDS_PER_DAY % self.seconds_per_timestep != 0 {
            return Err(SetupError::InvalidParameters(format!(
                "seconds_per_timestep {} does not divide a day evenly",
                self.seconds_per_timestep
            )));
        }
        if self.duration_days == 0 {
            return Err(SetupError::InvalidParameters(
                "duration_days must be positive".to_string(),
            ));
        }
        let year_length = days_in_year(self.year);
        if self.start_day_of_year >= year_length || self.duration_days > year_length - self.start_day_of_year {
            return Err(SetupError::InvalidParameters(format!(
                "horizon of {} days starting at day {} exceeds the {} days of {}",
                self.duration_days, self.start_day_of_year, year_length, self.year
            )));
        }
        Ok(())
    }

    pub fn timesteps_per_day(&self) -> usize {
        (SECONDS_PER_DAY / self.seconds_per_timestep.max(1)) as usize
    }

    /// Total number of timesteps in the horizon
    pub fn total_timesteps(&self) -> usize {
        self.timesteps_per_day() * self.duration_days as usize
    }

    /// Timestep length in hours
    pub fn timestep_hours(&self) -> f64 {
        f64::from(self.seconds_per_timestep) / 3600.0
    }

    /// Zero-based day of year for a timestep index
    pub fn day_of_year(&self, timestep: usize) -> u32 {
        self.start_day_of_year + (timestep / self.timesteps_per_day()) as u32
    }

    /// Hour of day (fractional) for a timestep index
    pub fn hour_of_day(&self, timestep: usize) -> f64 {
        let step_of_day = timestep % self.timesteps_per_day();
        step_of_day as f64 * self.timestep_hours()
    }
}

fn days_in_year(year: i32) -> u32 {
    let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
    if leap {
        366
    } else {
        365
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_day_at_minute_resolution() {
        let params = SimulationParameters::one_day_only(2022);
        assert!(params.validate().is_ok());
        assert_eq!(params.total_timesteps(), 1440);
    }

    #[test]
    fn test_full_year_respects_leap_years() {
        assert_eq!(SimulationParameters::full_year(2020, 3600).total_timesteps(), 366 * 24);
        assert_eq!(SimulationParameters::full_year(2021, 3600).total_timesteps(), 365 * 24);
    }

    #[test]
    fn test_calendar_position() {
        let params = SimulationParameters::january_only_with_customized_options(2021, 900);
        assert_eq!(params.timesteps_per_day(), 96);
        assert_eq!(params.day_of_year(96), 1);
        assert!((params.hour_of_day(97) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        assert!(SimulationParameters::new(2021, 0, 0, 1).validate().is_err());
        assert!(SimulationParameters::new(2021, 7, 0, 1).validate().is_err());
        assert!(SimulationParameters::new(2021, 60, 0, 0).validate().is_err());
        assert!(SimulationParameters::new(2021, 60, 360, 10).validate().is_err());
    }
}
