use log::debug;
use std::path::Path;

use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::libs::channel_codec::crc::{Polynomial, DEFAULT_POLYNOMIAL};
use crate::libs::channel_noise::burst_error::{BurstPolicy, InteriorFlips, TrailingEdge};
use crate::libs::error::error::{Error, Result};

pub const DEFAULT_TRIAL_COUNT: usize = 1000;
// Far more draws than any burst has interior positions.
pub const MAX_FIXED_INTERIOR_FLIPS: usize = 65536;

/// Experiment settings, as held in a TOML file. Absent keys take their defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ExperimentConfig {
    pub divisor: String,
    pub len_crc: usize,
    pub trial_count: usize,
    pub workers: usize,
    pub trailing_edge: TrailingEdge,
    // None draws the interior flip count at random for each burst.
    pub fixed_interior_flips: Option<usize>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            divisor: DEFAULT_POLYNOMIAL.to_string(),
            len_crc: DEFAULT_POLYNOMIAL.len() - 1,
            trial_count: DEFAULT_TRIAL_COUNT,
            workers: 1,
            trailing_edge: TrailingEdge::LastBurstBit,
            fixed_interior_flips: None,
        }
    }
}

impl ExperimentConfig {
    pub fn polynomial(&self) -> Result<Polynomial> {
        self.divisor.parse()
    }

    pub fn burst_policy(&self) -> BurstPolicy {
        BurstPolicy {
            trailing_edge: self.trailing_edge,
            interior_flips: match self.fixed_interior_flips {
                Some(count) => InteriorFlips::Fixed(count),
                None => InteriorFlips::Uniform,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        let polynomial = self.polynomial()?;
        if self.len_crc != polynomial.degree() {
            return Err(Error::Config(format!("len_crc is {} but divisor {} implies {} redundant bits",
                                             self.len_crc, polynomial, polynomial.degree())));
        }
        if self.trial_count == 0 {
            return Err(Error::Config("trial_count must be at least 1".to_string()));
        }
        if let Some(count) = self.fixed_interior_flips {
            if count > MAX_FIXED_INTERIOR_FLIPS {
                return Err(Error::Config(format!("fixed_interior_flips is {} but may be at most {}",
                                                 count, MAX_FIXED_INTERIOR_FLIPS)));
            }
        }
        if self.workers == 0 {
            return Err(Error::Config("workers must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::Config(format!("Could not serialise configuration: {}", e)))
    }
}

pub fn save_configuration(config_file_path: &Path, config: &ExperimentConfig) -> Result<()> {
    let toml = config.to_toml()?;
    debug!("Saving configuration to {:?}", config_file_path);
    std::fs::write(config_file_path, toml)
        .map_err(|e| Error::Config(format!("Could not write config file {:?}: {}", config_file_path, e)))
}

pub fn load_configuration(config_file_path: &Path) -> Result<ExperimentConfig> {
    debug!("Config file is {:?}", config_file_path);
    let toml = std::fs::read_to_string(config_file_path)
        .map_err(|e| Error::Config(format!("Could not read config file {:?}: {}", config_file_path, e)))?;
    toml::from_str(&toml)
        .map_err(|e| Error::Config(format!("Could not parse config file {:?}: {}", config_file_path, e)))
}

#[cfg(test)]
#[path = "./config_file_spec.rs"]
mod config_file_spec;
