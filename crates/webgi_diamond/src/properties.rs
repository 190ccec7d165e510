use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::material::{DiamondMaterialProperties, ExtensionConfig};

#[derive(Error, Debug)]
pub enum PropertiesError {
    #[error("failed to read properties: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid properties file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Sidecar file with the extension switch and diamond settings keyed by
/// material name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertiesFile {
    pub extension: ExtensionConfig,
    pub materials: BTreeMap<String, DiamondMaterialProperties>,
}

impl PropertiesFile {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PropertiesError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PropertiesError> {
        let bytes = std::fs::read(path)?;
        Self::from_slice(&bytes)
    }

    pub fn material(&self, name: &str) -> Option<&DiamondMaterialProperties> {
        self.materials.get(name)
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;

    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let file = PropertiesFile::from_slice(b"{}").unwrap();
        assert_eq!(file, PropertiesFile::default());
        assert!(file.extension.enabled);
    }

    #[test]
    fn reads_materials_by_name() {
        let file = PropertiesFile::from_slice(
            br#"{
                "extension": { "extensionName": "CUSTOM_diamond" },
                "materials": {
                    "Stone": { "isDiamond": true, "refractiveIndex": 2.42, "boostFactors": [1.0, 1.2, 1.4] }
                }
            }"#,
        )
        .unwrap();

        assert!(file.extension.enabled);
        assert_eq!(file.extension.extension_name, "CUSTOM_diamond");

        let stone = file.material("Stone").unwrap();
        assert!(stone.is_diamond);
        assert_eq!(stone.refractive_index, 2.42);
        assert_eq!(stone.env_map_intensity, 1.0);
        assert_eq!(stone.boost_factors, DVec3::new(1.0, 1.2, 1.4));
        assert!(file.material("Gold").is_none());
    }

    #[test]
    fn rejects_invalid_json() {
        let err = PropertiesFile::from_slice(b"{ \"materials\": [] }").unwrap_err();
        assert!(matches!(err, PropertiesError::Json(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join("webgi_diamond_missing_properties.json");
        let err = PropertiesFile::load(path).unwrap_err();
        assert!(matches!(err, PropertiesError::Io(_)));
    }
}
