//! Clusterer configuration.
//!
//! Only plain data lives here so a configuration can be loaded from JSON or
//! TOML. Behavioural hooks (eligibility predicate, icon renderer) are attached
//! through [`ClustererBuilder`](crate::builder::ClustererBuilder).

use crate::error::{ClusterError, Result};
use markercluster_types::anchor::Anchor;
use serde::{Deserialize, Serialize};

/// Engine configuration.
///
/// # Example
///
/// ```rust
/// use markercluster::ClustererConfig;
///
/// let json = r#"{
///     "grid_size": 80,
///     "max_zoom": 15,
///     "minimum_cluster_size": 3
/// }"#;
/// let config = ClustererConfig::from_json(json).unwrap();
/// assert_eq!(config.grid_size, 80);
/// assert!(config.zoom_on_click);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClustererConfig {
    /// Catchment half-size in pixels around a cluster center
    #[serde(default = "ClustererConfig::default_grid_size")]
    pub grid_size: u32,

    /// Zoom level above which clustering is switched off (None means no cap)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_zoom: Option<f64>,

    /// Fit the map to a cluster's markers when its icon is clicked
    #[serde(default = "ClustererConfig::default_zoom_on_click")]
    pub zoom_on_click: bool,

    /// Place cluster centers at the mean member position instead of the seed
    #[serde(default)]
    pub average_center: bool,

    /// Members needed before a cluster icon replaces its markers
    #[serde(default = "ClustererConfig::default_minimum_cluster_size")]
    pub minimum_cluster_size: usize,

    #[serde(default)]
    pub icon: IconStyle,
}

/// Cluster icon geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IconStyle {
    #[serde(default = "IconStyle::default_width")]
    pub width: u32,

    #[serde(default = "IconStyle::default_height")]
    pub height: u32,

    /// Which point of the icon sits on the cluster center
    #[serde(default)]
    pub anchor: Anchor,
}

impl IconStyle {
    const fn default_width() -> u32 {
        53
    }

    const fn default_height() -> u32 {
        52
    }
}

impl Default for IconStyle {
    fn default() -> Self {
        Self {
            width: Self::default_width(),
            height: Self::default_height(),
            anchor: Anchor::default(),
        }
    }
}

impl ClustererConfig {
    const fn default_grid_size() -> u32 {
        60
    }

    const fn default_zoom_on_click() -> bool {
        true
    }

    const fn default_minimum_cluster_size() -> usize {
        2
    }

    pub fn with_grid_size(mut self, grid_size: u32) -> Self {
        assert!(grid_size > 0, "Grid size must be greater than zero");
        self.grid_size = grid_size;
        self
    }

    pub fn with_max_zoom(mut self, max_zoom: Option<f64>) -> Self {
        self.max_zoom = max_zoom;
        self
    }

    pub fn with_zoom_on_click(mut self, enabled: bool) -> Self {
        self.zoom_on_click = enabled;
        self
    }

    pub fn with_average_center(mut self, enabled: bool) -> Self {
        self.average_center = enabled;
        self
    }

    pub fn with_minimum_cluster_size(mut self, size: usize) -> Self {
        assert!(size > 0, "Minimum cluster size must be greater than zero");
        self.minimum_cluster_size = size;
        self
    }

    pub fn with_icon(mut self, icon: IconStyle) -> Self {
        self.icon = icon;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            return Err(ClusterError::InvalidConfig(
                "Grid size must be greater than zero".to_string(),
            ));
        }

        if self.minimum_cluster_size == 0 {
            return Err(ClusterError::InvalidConfig(
                "Minimum cluster size must be greater than zero".to_string(),
            ));
        }

        if let Some(max_zoom) = self.max_zoom {
            if !max_zoom.is_finite() {
                return Err(ClusterError::InvalidConfig(
                    "Max zoom must be finite (not NaN or infinity)".to_string(),
                ));
            }
            if max_zoom < 0.0 {
                return Err(ClusterError::InvalidConfig(
                    "Max zoom must not be negative".to_string(),
                ));
            }
        }

        if self.icon.width == 0 || self.icon.height == 0 {
            return Err(ClusterError::InvalidConfig(
                "Icon dimensions must be greater than zero".to_string(),
            ));
        }

        if self.grid_size > 10_000 {
            log::warn!(
                "Grid size of {} pixels is very large; most markers will share one cluster",
                self.grid_size
            );
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: ClustererConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: ClustererConfig =
            toml::from_str(toml_str).map_err(|e| ClusterError::Toml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ClusterError::Toml(e.to_string()))
    }
}

impl Default for ClustererConfig {
    fn default() -> Self {
        Self {
            grid_size: Self::default_grid_size(),
            max_zoom: None,
            zoom_on_click: Self::default_zoom_on_click(),
            average_center: false,
            minimum_cluster_size: Self::default_minimum_cluster_size(),
            icon: IconStyle::default(),
        }
    }
}
