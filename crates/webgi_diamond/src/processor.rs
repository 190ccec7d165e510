use std::borrow::Cow;
use std::collections::BTreeSet;

use gltf::json::validation::{Error as ValidationError, Validate};
use gltf::json::Path;
use gltf::Glb;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::emitter::emit_for;
use crate::extensions::{ExtendedMaterial, ExtendedRoot};
use crate::material::{DiamondMaterialProperties, ExtensionConfig};
use crate::properties::PropertiesFile;

const GLB_MAGIC: [u8; 4] = *b"glTF";
const GLB_VERSION: u32 = 2;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("invalid glTF file: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("failed to encode glTF JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("glTF root is not an object")]
    RootNotObject,
    #[error("material {0} is not an object")]
    MaterialNotObject(usize),
    #[error("extensions of material {0} are not an object")]
    ExtensionsNotObject(usize),
    #[error("extensionsUsed is not an array")]
    ExtensionsUsedNotArray,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// Plain `.gltf` JSON.
    Json,
    /// Binary `.glb`.
    Glb,
}

impl Container {
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.starts_with(&GLB_MAGIC) {
            Container::Glb
        } else {
            Container::Json
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialReport {
    pub index: usize,
    pub name: Option<String>,
    pub emitted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub container: Container,
    pub materials: Vec<MaterialReport>,
}

impl Report {
    pub fn emitted(&self) -> usize {
        self.materials.iter().filter(|m| m.emitted).count()
    }
}

#[derive(Debug, Clone)]
pub struct Processed {
    pub bytes: Vec<u8>,
    pub report: Report,
}

/// Attaches the diamond extension to every material of a glTF document.
///
/// Settings from the processor take precedence over the ones a material
/// carries in its `extras`.
#[derive(Debug, Clone, Default)]
pub struct Processor {
    properties: PropertiesFile,
    pretty: bool,
}

impl Processor {
    pub fn new(config: ExtensionConfig) -> Self {
        Self::from_properties(PropertiesFile {
            extension: config,
            ..Default::default()
        })
    }

    pub fn from_properties(properties: PropertiesFile) -> Self {
        Self {
            properties,
            pretty: false,
        }
    }

    pub fn with_material(mut self, name: impl Into<String>, props: DiamondMaterialProperties) -> Self {
        self.properties.materials.insert(name.into(), props);
        self
    }

    /// Pretty-print JSON output. Has no effect on `.glb` files.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn config(&self) -> &ExtensionConfig {
        &self.properties.extension
    }

    pub fn process(&self, bytes: &[u8]) -> Result<Processed, ProcessError> {
        let container = Container::detect(bytes);
        let (json, bin) = match container {
            Container::Glb => {
                let glb = Glb::from_slice(bytes)?;
                (glb.json, glb.bin)
            }
            Container::Json => (Cow::Borrowed(bytes), None),
        };

        let root: gltf::json::Root = gltf::json::deserialize::from_slice(&json)
            .map_err(gltf::Error::from)?;
        validate(&root)?;
        let extended_root = serde_json::from_slice::<ExtendedRoot>(&json)?;
        let mut document = serde_json::from_slice::<Value>(&json)?;
        self.warn_unused_materials(&extended_root);

        let root = document.as_object_mut().ok_or(ProcessError::RootNotObject)?;
        let mut materials = Vec::new();
        if let Some(Value::Array(entries)) = root.get_mut("materials") {
            for (index, entry) in entries.iter_mut().enumerate() {
                let extended = extended_root.materials.get(index);
                let emitted = self.process_material(index, entry, extended)?;
                materials.push(MaterialReport {
                    index,
                    name: extended.and_then(|m| m.name.clone()),
                    emitted,
                });
            }
        }

        let report = Report {
            container,
            materials,
        };
        if report.emitted() > 0 {
            register_extension_used(root, &self.config().extension_name)?;
        }

        let bytes = match container {
            Container::Json if self.pretty => serde_json::to_vec_pretty(&document)?,
            Container::Json => serde_json::to_vec(&document)?,
            Container::Glb => Glb {
                header: gltf::binary::Header {
                    magic: GLB_MAGIC,
                    version: GLB_VERSION,
                    length: 0,
                },
                json: serde_json::to_vec(&document)?.into(),
                bin,
            }
            .to_vec()?,
        };

        tracing::debug!(
            emitted = report.emitted(),
            materials = report.materials.len(),
            "processed glTF document"
        );
        Ok(Processed { bytes, report })
    }

    fn resolve(&self, index: usize, material: Option<&ExtendedMaterial>) -> Option<DiamondMaterialProperties> {
        let name = material.and_then(|m| m.name.as_deref());
        let label = name.map(str::to_owned).unwrap_or_else(|| format!("#{index}"));

        name.and_then(|name| self.properties.material(name).copied())
            .or_else(|| material.and_then(ExtendedMaterial::diamond_properties))
            .map(|props| props.clamped_for(&label))
    }

    /// Names configured on the processor that no material in `root` uses.
    fn unused_materials<'a>(&'a self, root: &ExtendedRoot) -> Vec<&'a str> {
        let names: BTreeSet<&str> = root
            .materials
            .iter()
            .filter_map(|m| m.name.as_deref())
            .collect();
        self.properties
            .materials
            .keys()
            .map(String::as_str)
            .filter(|name| !names.contains(name))
            .collect()
    }

    fn warn_unused_materials(&self, root: &ExtendedRoot) {
        for name in self.unused_materials(root) {
            tracing::warn!(material = name, "no material with this name in the document");
        }
    }

    fn process_material(
        &self,
        index: usize,
        entry: &mut Value,
        material: Option<&ExtendedMaterial>,
    ) -> Result<bool, ProcessError> {
        let props = self.resolve(index, material);
        let Some(payload) = emit_for(self.config(), props.as_ref()) else {
            return Ok(false);
        };

        let extensions = entry
            .as_object_mut()
            .ok_or(ProcessError::MaterialNotObject(index))?
            .entry("extensions")
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .ok_or(ProcessError::ExtensionsNotObject(index))?;
        let replaced = payload.attach(extensions)?.is_some();
        tracing::debug!(index, replaced, "attached {} extension", payload.name);
        Ok(true)
    }
}

/// Structural validation of the document. Required extensions the `gltf`
/// crate can't decode are accepted.
fn validate(root: &gltf::json::Root) -> Result<(), gltf::Error> {
    let mut errors = Vec::new();
    root.validate(root, Path::new, &mut |path: &dyn Fn() -> Path, error: ValidationError| {
        let path = path();
        if matches!(error, ValidationError::Unsupported)
            && path.as_str().starts_with("extensionsRequired")
        {
            return;
        }
        errors.push((path, error));
    });

    if errors.is_empty() {
        Ok(())
    } else {
        Err(gltf::Error::Validation(errors))
    }
}

fn register_extension_used(root: &mut Map<String, Value>, name: &str) -> Result<(), ProcessError> {
    let used = root
        .entry("extensionsUsed")
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
        .ok_or(ProcessError::ExtensionsUsedNotArray)?;
    if !used.iter().any(|used| used.as_str() == Some(name)) {
        used.push(Value::String(name.to_owned()));
    }
    Ok(())
}
