use serde_json::{Map, Value};

use crate::extensions::diamond::DiamondExtensionJson;
use crate::material::{DiamondMaterialProperties, ExtensionConfig};

// Viewers that don't know the extension can still render the material.
const EXTENSION_IS_REQUIRED: bool = false;

/// A material extension ready to be attached under `name`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionPayload {
    pub name: String,
    pub extension: DiamondExtensionJson,
    pub required: bool,
}

impl ExtensionPayload {
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self.extension)
    }

    /// Inserts the payload into a material's `extensions` object, replacing
    /// and returning whatever was stored under the same name.
    pub fn attach(&self, extensions: &mut Map<String, Value>) -> serde_json::Result<Option<Value>> {
        let value = self.to_value()?;
        Ok(extensions.insert(self.name.clone(), value))
    }
}

/// Builds the extension for a material, or `None` when the extension is
/// disabled or the material isn't a diamond.
pub fn emit(config: &ExtensionConfig, props: &DiamondMaterialProperties) -> Option<ExtensionPayload> {
    if !config.enabled || !props.is_diamond {
        return None;
    }

    Some(ExtensionPayload {
        name: config.extension_name.clone(),
        extension: DiamondExtensionJson::from(props),
        required: EXTENSION_IS_REQUIRED,
    })
}

/// [`emit`] for a material that may not have diamond settings at all.
pub fn emit_for(
    config: &ExtensionConfig,
    props: Option<&DiamondMaterialProperties>,
) -> Option<ExtensionPayload> {
    props.and_then(|props| emit(config, props))
}
