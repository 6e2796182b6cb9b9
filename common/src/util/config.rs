use crate::error::AssignError;
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub assignment: AssignmentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Geometry shared by every gap. All algorithms take this fully populated.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ChannelConfig {
    #[serde(default = "default_gap_width")]
    pub gap_width: Decimal,
    #[serde(default = "default_gap_interval")]
    pub gap_interval: Decimal,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            gap_width: default_gap_width(),
            gap_interval: default_gap_interval(),
        }
    }
}

impl ChannelConfig {
    pub fn new(gap_width: Decimal, gap_interval: Decimal) -> Self {
        Self {
            gap_width,
            gap_interval,
        }
    }

    pub fn validate(&self) -> Result<(), AssignError> {
        if self.gap_width <= Decimal::ZERO {
            return Err(AssignError::NonPositiveChannel {
                field: "gap_width",
                value: self.gap_width,
            });
        }
        if self.gap_interval <= Decimal::ZERO {
            return Err(AssignError::NonPositiveChannel {
                field: "gap_interval",
                value: self.gap_interval,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_n_nets")]
    pub n_nets: usize,
    #[serde(default = "default_max_n_pins")]
    pub max_n_pins: usize,
    #[serde(default = "default_scenario")]
    pub scenario: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            n_nets: default_n_nets(),
            max_n_pins: default_max_n_pins(),
            scenario: default_scenario(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssignmentConfig {
    #[serde(default = "default_gap_order")]
    pub gap_order: String,
    #[serde(default)]
    pub shuffle_seed: u64,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            gap_order: default_gap_order(),
            shuffle_seed: 0,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub figure: Option<String>,
}

fn default_gap_width() -> Decimal {
    Decimal::TEN
}

fn default_gap_interval() -> Decimal {
    Decimal::TEN
}

fn default_n_nets() -> usize {
    100
}

fn default_max_n_pins() -> usize {
    8
}

fn default_scenario() -> u32 {
    1
}

fn default_gap_order() -> String {
    "ca-unitnet".to_string()
}
