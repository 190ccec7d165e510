use std::ops::RangeInclusive;

use glam::DVec3;
use serde::{Deserialize, Deserializer, Serialize};

pub const EXTENSION_NAME: &str = "WEBGI_materials_diamond";

pub const DISPERSION_RANGE: RangeInclusive<f64> = 0.0..=5.0;
pub const REFRACTIVE_INDEX_RANGE: RangeInclusive<f64> = 0.0..=5.0;
pub const ENV_MAP_INTENSITY_RANGE: RangeInclusive<f64> = 0.0..=10.0;
pub const BOOST_FACTOR_RANGE: RangeInclusive<f64> = 0.0..=5.0;

/// Diamond settings attached to a single material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiamondMaterialProperties {
    #[serde(deserialize_with = "bool_or_int")]
    pub is_diamond: bool,
    pub dispersion: f64,
    pub refractive_index: f64,
    pub env_map_intensity: f64,
    /// Per-channel (RGB) boost multipliers.
    pub boost_factors: DVec3,
}

impl Default for DiamondMaterialProperties {
    fn default() -> Self {
        Self {
            is_diamond: false,
            dispersion: 0.0,
            refractive_index: 0.0,
            env_map_intensity: 1.0,
            boost_factors: DVec3::ONE,
        }
    }
}

impl DiamondMaterialProperties {
    /// Limits every value to the range the material panel allows.
    pub fn clamped(&self) -> Self {
        Self {
            is_diamond: self.is_diamond,
            dispersion: clamp(self.dispersion, DISPERSION_RANGE),
            refractive_index: clamp(self.refractive_index, REFRACTIVE_INDEX_RANGE),
            env_map_intensity: clamp(self.env_map_intensity, ENV_MAP_INTENSITY_RANGE),
            boost_factors: self.boost_factors.clamp(
                DVec3::splat(*BOOST_FACTOR_RANGE.start()),
                DVec3::splat(*BOOST_FACTOR_RANGE.end()),
            ),
        }
    }

    /// Like [`Self::clamped`], but warns about the material when anything changed.
    pub(crate) fn clamped_for(&self, material: &str) -> Self {
        let clamped = self.clamped();
        if clamped != *self {
            tracing::warn!(material, "diamond properties out of range, clamping");
        }
        clamped
    }
}

fn clamp(value: f64, range: RangeInclusive<f64>) -> f64 {
    value.clamp(*range.start(), *range.end())
}

// Older Blender releases store boolean custom properties as 0/1.
fn bool_or_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Int(value) => value != 0,
    })
}

/// Scene-wide switch for the extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtensionConfig {
    pub enabled: bool,
    pub extension_name: String,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            extension_name: EXTENSION_NAME.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults_match_material_panel() {
        let props = DiamondMaterialProperties::default();
        assert!(!props.is_diamond);
        assert_eq!(props.dispersion, 0.0);
        assert_eq!(props.refractive_index, 0.0);
        assert_eq!(props.env_map_intensity, 1.0);
        assert_eq!(props.boost_factors, DVec3::ONE);

        let config = ExtensionConfig::default();
        assert!(config.enabled);
        assert_eq!(config.extension_name, "WEBGI_materials_diamond");
    }

    #[test]
    fn missing_fields_take_defaults() {
        let props: DiamondMaterialProperties =
            serde_json::from_value(json!({ "isDiamond": true, "dispersion": 0.25 })).unwrap();
        assert_eq!(
            props,
            DiamondMaterialProperties {
                is_diamond: true,
                dispersion: 0.25,
                ..Default::default()
            }
        );

        let config: ExtensionConfig = serde_json::from_value(json!({ "enabled": false })).unwrap();
        assert!(!config.enabled);
        assert_eq!(config.extension_name, EXTENSION_NAME);
    }

    #[test]
    fn integer_flags_are_accepted() {
        let props: DiamondMaterialProperties =
            serde_json::from_value(json!({ "isDiamond": 1 })).unwrap();
        assert!(props.is_diamond);

        let props: DiamondMaterialProperties =
            serde_json::from_value(json!({ "isDiamond": 0 })).unwrap();
        assert!(!props.is_diamond);
    }

    #[test]
    fn boost_factors_read_as_array() {
        let props: DiamondMaterialProperties =
            serde_json::from_value(json!({ "boostFactors": [0.5, 2.0, 3.0] })).unwrap();
        assert_eq!(props.boost_factors, DVec3::new(0.5, 2.0, 3.0));
    }

    #[test]
    fn clamps_to_panel_ranges() {
        let props = DiamondMaterialProperties {
            is_diamond: true,
            dispersion: 7.0,
            refractive_index: -1.0,
            env_map_intensity: 12.5,
            boost_factors: DVec3::new(-2.0, 2.5, 9.0),
        };
        assert_eq!(
            props.clamped(),
            DiamondMaterialProperties {
                is_diamond: true,
                dispersion: 5.0,
                refractive_index: 0.0,
                env_map_intensity: 10.0,
                boost_factors: DVec3::new(0.0, 2.5, 5.0),
            }
        );
    }

    #[test]
    fn in_range_values_are_untouched() {
        let props = DiamondMaterialProperties {
            is_diamond: true,
            dispersion: 0.5,
            refractive_index: 2.4,
            env_map_intensity: 10.0,
            boost_factors: DVec3::new(0.0, 1.0, 5.0),
        };
        assert_eq!(props.clamped(), props);
    }
}
