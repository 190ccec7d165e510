use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::material::DiamondMaterialProperties;

/// Body of the `WEBGI_materials_diamond` material extension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiamondExtensionJson {
    pub is_diamond: bool,
    pub dispersion: f64,
    pub refractive_index: f64,
    pub boost_factors: DVec3,
    pub env_map_intensity: f64,
}

impl From<&DiamondMaterialProperties> for DiamondExtensionJson {
    fn from(props: &DiamondMaterialProperties) -> Self {
        Self {
            is_diamond: true,
            dispersion: props.dispersion,
            refractive_index: props.refractive_index,
            boost_factors: props.boost_factors,
            env_map_intensity: props.env_map_intensity,
        }
    }
}
