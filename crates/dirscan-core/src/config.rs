//! Scan configuration types.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// How the start device is chosen when several roots share one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceBaseline {
    /// The first successfully inspected root sets the device for the whole scan.
    #[default]
    FirstRoot,
    /// Each root sets its own device.
    PerRoot,
}

/// Configuration for a traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), default)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScanConfig {
    /// Descend into symbolic links that point to directories.
    pub follow_symlinks: bool,

    /// List the roots and their direct children only.
    pub flatten: bool,

    /// Report directories on other devices but do not descend into them.
    pub same_device: bool,

    /// Start device policy for multi-root scans.
    pub device_baseline: DeviceBaseline,
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Default configuration: no link following, full depth, any device.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ScanConfig::builder()
            .follow_symlinks(true)
            .device_baseline(DeviceBaseline::PerRoot)
            .build()
            .unwrap();

        assert!(config.follow_symlinks);
        assert!(!config.flatten);
        assert!(!config.same_device);
        assert_eq!(config.device_baseline, DeviceBaseline::PerRoot);
    }

    #[test]
    fn test_config_defaults() {
        let config = ScanConfig::new();
        assert!(!config.follow_symlinks);
        assert!(!config.flatten);
        assert!(!config.same_device);
        assert_eq!(config.device_baseline, DeviceBaseline::FirstRoot);
    }

    #[test]
    fn test_config_deserialize_partial() {
        let config: ScanConfig =
            serde_json::from_str(r#"{"same-device": true, "device-baseline": "per-root"}"#)
                .unwrap();
        assert!(config.same_device);
        assert!(!config.follow_symlinks);
        assert_eq!(config.device_baseline, DeviceBaseline::PerRoot);
    }
}
