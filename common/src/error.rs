use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AssignError {
    #[error("invalid gap order '{0}' (expected one of: cf-allnet, ca-allnet, cf-unitnet, ca-unitnet, random, bottom-up, top-down)")]
    InvalidGapOrder(String),

    #[error("channel {field} must be positive, got {value}")]
    NonPositiveChannel { field: &'static str, value: Decimal },

    #[error("net '{net}' needs {width} tracks but a gap only has {gap_width}")]
    NetTooWide {
        net: String,
        width: Decimal,
        gap_width: Decimal,
    },

    #[error("{0} needs a fixed gap budget")]
    MissingGapBudget(&'static str),

    #[error("invalid net '{name}': {reason}")]
    InvalidNet { name: String, reason: String },

    #[error("unknown net-width scenario {0} (expected 1 or 2)")]
    UnknownScenario(u32),

    #[error("coordinate {0} cannot be represented exactly")]
    GeneratorRange(f64),
}
