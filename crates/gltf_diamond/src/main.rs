use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use webgi_diamond::{Processor, PropertiesFile};

/// Tag diamond materials in a glTF file with the WEBGI_materials_diamond extension.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Options {
    /// Input `.gltf` or `.glb` file.
    pub input: PathBuf,
    /// Where to write the result. Defaults to overwriting the input.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
    /// JSON file with the extension settings and per-material diamond properties.
    #[arg(long, short = 'p')]
    pub properties: Option<PathBuf>,
    #[arg(long)]
    pub extension_name: Option<String>,
    /// Don't attach the extension to any material.
    #[arg(long)]
    pub disable: bool,
    #[arg(long)]
    pub pretty: bool,
}

impl Options {
    fn load_properties(&self) -> anyhow::Result<PropertiesFile> {
        let mut properties = match &self.properties {
            Some(path) => PropertiesFile::load(path)
                .with_context(|| format!("failed to load properties from {}", path.display()))?,
            None => PropertiesFile::default(),
        };
        if let Some(name) = &self.extension_name {
            properties.extension.extension_name = name.clone();
        }
        if self.disable {
            properties.extension.enabled = false;
        }
        Ok(properties)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let options = Options::parse();

    let processor = Processor::from_properties(options.load_properties()?)
        .pretty(options.pretty);
    let input = std::fs::read(&options.input)
        .with_context(|| format!("failed to read {}", options.input.display()))?;
    let processed = processor.process(&input)
        .with_context(|| format!("failed to process {}", options.input.display()))?;

    let report = &processed.report;
    for material in &report.materials {
        if material.emitted {
            tracing::info!(
                index = material.index,
                name = material.name.as_deref().unwrap_or_default(),
                "tagged as diamond"
            );
        }
    }

    let output = options.output.as_ref().unwrap_or(&options.input);
    std::fs::write(output, &processed.bytes)
        .with_context(|| format!("failed to write {}", output.display()))?;
    tracing::info!(
        "wrote {} ({} of {} materials use {})",
        output.display(),
        report.emitted(),
        report.materials.len(),
        processor.config().extension_name
    );
    Ok(())
}
