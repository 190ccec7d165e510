//! Support for the `WEBGI_materials_diamond` glTF material extension.
//!
//! [`emit`] turns a material's [`DiamondMaterialProperties`] into an
//! [`ExtensionPayload`]. [`Processor`] applies that to every material of a
//! `.gltf` or `.glb` document.

pub use crate::emitter::{emit, emit_for, ExtensionPayload};
pub use crate::material::{DiamondMaterialProperties, ExtensionConfig, EXTENSION_NAME};
pub use crate::processor::{Container, MaterialReport, ProcessError, Processed, Processor, Report};
pub use crate::properties::{PropertiesError, PropertiesFile};

pub mod extensions;

mod emitter;
mod material;
mod processor;
mod properties;
