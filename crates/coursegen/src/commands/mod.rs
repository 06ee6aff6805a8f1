//! CLI subcommands.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use coursegen_config::{CliSettings, Config};
use coursegen_generator::Generator;
use coursegen_markdown::InMemoryGlossary;

use crate::error::CliError;
use crate::output::Output;

/// Arguments shared by every subcommand that builds a generator.
#[derive(Args)]
struct ConfigArgs {
    /// Config file path (default: discover `coursegen.toml` upwards).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory (overrides config).
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Glossary YAML file (overrides config).
    #[arg(long)]
    glossary: Option<PathBuf>,
}

impl ConfigArgs {
    fn load(&self) -> Result<Config, CliError> {
        let cli = CliSettings {
            output_dir: self.output_dir.clone(),
            glossary: self.glossary.clone(),
        };
        let config = match &self.config {
            Some(path) => Config::load(path, &cli)?,
            None => Config::discover(&std::env::current_dir()?, &cli)?,
        };
        Ok(config)
    }

    fn build_generator(&self) -> Result<Generator, CliError> {
        let config = self.load()?;
        let mut generator = Generator::new(config.output.dir.clone());
        if let Some(path) = &config.glossary.path {
            let glossary = InMemoryGlossary::from_file(path)?;
            generator = generator.with_glossary(Arc::new(glossary));
        }
        for (engine, defaults) in &config.defaults {
            generator = generator.with_engine_defaults(engine, defaults.clone());
        }
        Ok(generator)
    }
}

/// Render a spec file or a directory of specs.
#[derive(Args)]
pub(crate) struct GenerateArgs {
    /// Spec file, or directory of spec files.
    path: PathBuf,

    /// Glob pattern for directory input.
    #[arg(long, default_value = "*.yaml")]
    pattern: String,

    /// Recurse into subdirectories.
    #[arg(long)]
    recursive: bool,

    /// Abort on the first failing spec instead of continuing.
    #[arg(long)]
    fail_fast: bool,

    #[command(flatten)]
    config: ConfigArgs,
}

impl GenerateArgs {
    pub(crate) fn execute(&self, output: &Output) -> Result<(), CliError> {
        let generator = self.config.build_generator()?;

        if self.path.is_dir() {
            let sources =
                coursegen_generator::discover_sources(&self.path, &self.pattern, self.recursive)?;
            let results = generator.generate_from_directory(
                &self.path,
                &self.pattern,
                self.recursive,
                !self.fail_fast,
            )?;
            let mut failed = 0usize;
            // Result order matches discovery order.
            for (source, result) in sources.iter().zip(&results) {
                match result {
                    Some(path) => output.success(&format!("wrote {}", path.display())),
                    None => {
                        output.warning(&format!("failed: {}", source.display()));
                        failed += 1;
                    }
                }
            }
            if failed > 0 {
                return Err(CliError::Validation(format!(
                    "{failed} of {} specs failed",
                    results.len()
                )));
            }
            output.info(&format!("{} documents generated", results.len()));
        } else {
            let path = generator.generate_from_file(&self.path)?;
            output.success(&format!("wrote {}", path.display()));
        }
        Ok(())
    }
}

/// Validate a directory of specs without rendering.
#[derive(Args)]
pub(crate) struct ValidateArgs {
    /// Directory of spec files.
    dir: PathBuf,

    /// Glob pattern for spec files.
    #[arg(long, default_value = "*.yaml")]
    pattern: String,

    /// Recurse into subdirectories.
    #[arg(long)]
    recursive: bool,

    #[command(flatten)]
    config: ConfigArgs,
}

impl ValidateArgs {
    pub(crate) fn execute(&self, output: &Output) -> Result<(), CliError> {
        let generator = self.config.build_generator()?;
        let report = generator.validate_directory(&self.dir, &self.pattern, self.recursive)?;

        for (path, message) in &report.errors {
            output.error(&format!("{}: {message}", path.display()));
        }
        output.info(&format!(
            "{} specs checked: {} valid, {} invalid",
            report.total, report.valid, report.invalid
        ));

        if report.invalid > 0 {
            return Err(CliError::Validation(format!(
                "{} invalid specs",
                report.invalid
            )));
        }
        Ok(())
    }
}

/// List registered engines.
#[derive(Args)]
pub(crate) struct EnginesArgs {
    /// Also list every component tag per engine.
    #[arg(long)]
    components: bool,

    #[command(flatten)]
    config: ConfigArgs,
}

impl EnginesArgs {
    pub(crate) fn execute(&self, output: &Output) -> Result<(), CliError> {
        let generator = self.config.build_generator()?;
        for name in generator.engines().engine_names() {
            let Some(info) = generator.engines().engine_info(&name) else {
                continue;
            };
            output.highlight(&format!("{name} (.{})", info.file_extension));
            if self.components {
                output.info(&format!("  {}", info.supported_components.join(", ")));
            }
        }
        Ok(())
    }
}
