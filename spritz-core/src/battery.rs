//! Battery level classification

use crate::config::BatteryThresholds;

/// Coarse battery level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BatteryLevel {
    Critical,
    Low,
    #[default]
    Good,
    Full,
}

impl BatteryLevel {
    /// Classify a voltage reading
    pub fn from_millivolts(mv: u16, thresholds: &BatteryThresholds) -> Self {
        if mv >= thresholds.full_mv {
            BatteryLevel::Full
        } else if mv >= thresholds.low_mv {
            BatteryLevel::Good
        } else if mv >= thresholds.critical_mv {
            BatteryLevel::Low
        } else {
            BatteryLevel::Critical
        }
    }

    /// Check if the user should be told to replace the battery
    pub fn needs_attention(&self) -> bool {
        matches!(self, BatteryLevel::Low | BatteryLevel::Critical)
    }
}
