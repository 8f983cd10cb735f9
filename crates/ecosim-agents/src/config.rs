//! Sampling ranges for initial agent attributes.
//!
//! These values correspond to the `agents` key of `ecosim-config.yaml`.
//! The [`AgentConfig`] struct bundles every range so that callers (economy
//! construction, tests) can override defaults.

use serde::Deserialize;

use crate::error::AgentError;

/// Number of decimal places a sampled price carries.
pub const PRICE_SCALE: u32 = 2;

/// Ranges from which initial agent attributes are drawn.
///
/// Wealth and goods ranges are inclusive on both ends. The price range is
/// half-open: `[producer_price_min, producer_price_max)`, sampled uniformly
/// over whole cents.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgentConfig {
    /// Lowest starting consumer wealth (default: 10).
    #[serde(default = "default_consumer_wealth_min")]
    pub consumer_wealth_min: u32,

    /// Highest starting consumer wealth (default: 50).
    #[serde(default = "default_consumer_wealth_max")]
    pub consumer_wealth_max: u32,

    /// Lowest starting producer inventory (default: 5).
    #[serde(default = "default_producer_goods_min")]
    pub producer_goods_min: u32,

    /// Highest starting producer inventory (default: 20).
    #[serde(default = "default_producer_goods_max")]
    pub producer_goods_max: u32,

    /// Inclusive lower bound of producer prices (default: 1).
    #[serde(default = "default_producer_price_min")]
    pub producer_price_min: u32,

    /// Exclusive upper bound of producer prices (default: 10).
    #[serde(default = "default_producer_price_max")]
    pub producer_price_max: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            consumer_wealth_min: default_consumer_wealth_min(),
            consumer_wealth_max: default_consumer_wealth_max(),
            producer_goods_min: default_producer_goods_min(),
            producer_goods_max: default_producer_goods_max(),
            producer_price_min: default_producer_price_min(),
            producer_price_max: default_producer_price_max(),
        }
    }
}

impl AgentConfig {
    /// Check that every range is non-empty and prices are positive.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> Result<(), AgentError> {
        if self.consumer_wealth_min > self.consumer_wealth_max {
            return Err(invalid(format!(
                "consumer wealth range [{}, {}] is empty",
                self.consumer_wealth_min, self.consumer_wealth_max
            )));
        }
        if self.producer_goods_min > self.producer_goods_max {
            return Err(invalid(format!(
                "producer goods range [{}, {}] is empty",
                self.producer_goods_min, self.producer_goods_max
            )));
        }
        if self.producer_price_min == 0 {
            return Err(invalid("producer_price_min must be at least 1".to_owned()));
        }
        if self.producer_price_min >= self.producer_price_max {
            return Err(invalid(format!(
                "producer price range [{}, {}) is empty",
                self.producer_price_min, self.producer_price_max
            )));
        }
        Ok(())
    }

    /// Price bounds expressed in the smallest price unit, as a half-open
    /// range `[low, high)`.
    pub(crate) fn price_bounds_minor(&self) -> (i64, i64) {
        let unit = 10_i64.pow(PRICE_SCALE);
        let low = i64::from(self.producer_price_min).saturating_mul(unit);
        let high = i64::from(self.producer_price_max).saturating_mul(unit);
        (low, high)
    }
}

fn invalid(reason: String) -> AgentError {
    AgentError::InvalidConfig { reason }
}

const fn default_consumer_wealth_min() -> u32 {
    10
}
const fn default_consumer_wealth_max() -> u32 {
    50
}
const fn default_producer_goods_min() -> u32 {
    5
}
const fn default_producer_goods_max() -> u32 {
    20
}
const fn default_producer_price_min() -> u32 {
    1
}
const fn default_producer_price_max() -> u32 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(AgentConfig::default().validate().is_ok());
    }

    #[test]
    fn inverted_wealth_range_rejected() {
        let cfg = AgentConfig {
            consumer_wealth_min: 60,
            ..AgentConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(AgentError::InvalidConfig { .. })));
    }

    #[test]
    fn empty_price_range_rejected() {
        let cfg = AgentConfig {
            producer_price_min: 5,
            producer_price_max: 5,
            ..AgentConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_price_rejected() {
        let cfg = AgentConfig {
            producer_price_min: 0,
            ..AgentConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn price_bounds_are_in_cents() {
        assert_eq!(AgentConfig::default().price_bounds_minor(), (100, 1000));
    }
}
