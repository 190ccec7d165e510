use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::material::DiamondMaterialProperties;

pub mod diamond;

/// Key of the property group Blender writes into a material's `extras`.
pub const CUSTOM_PROPERTY_KEY: &str = "ijewel_diamond";

/// The parts of a glTF material that aren't covered by `gltf::Material`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ExtendedMaterial {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub extras: Option<Value>,
}

impl ExtendedMaterial {
    /// Diamond settings exported as custom properties, if there are any.
    pub fn diamond_properties(&self) -> Option<DiamondMaterialProperties> {
        let value = self.extras.as_ref()?.get(CUSTOM_PROPERTY_KEY)?;
        match DiamondMaterialProperties::deserialize(value) {
            Ok(props) => Some(props),
            Err(err) => {
                tracing::warn!(
                    material = self.name.as_deref().unwrap_or_default(),
                    "ignoring malformed {} extras: {}",
                    CUSTOM_PROPERTY_KEY,
                    err
                );
                None
            }
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ExtendedRoot {
    #[serde(default)]
    pub materials: Vec<ExtendedMaterial>,
}
