//! `layergen generate` and `layergen inspect`.
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use layergen_codegen::{Config, DEFAULT_EXTENSION, DEFAULT_TAG_KEY};

/// generate repository, service and handler layers from Go model structs
#[derive(Parser, Debug)]
#[command(name = "layergen", version)]
pub struct CommandLineInterface {
    /// more log output (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// generate layer files for every struct in the model directory
    Generate(GenerateArgs),
    /// print the extracted model as JSON
    Inspect(InspectArgs),
}

#[derive(Args, Debug, Clone)]
struct ModelSettings {
    /// directory containing the model .go files
    #[arg(short, long)]
    model: PathBuf,

    /// struct tag key the serialization name is read from
    #[arg(long, default_value = DEFAULT_TAG_KEY)]
    tag_key: String,

    /// extension of the model source files, without the dot
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    extension: String,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    model_settings: ModelSettings,

    /// output root; layer directories are created under it
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// directory of <layer>.tmpl files overriding the bundled templates
    #[arg(short, long)]
    templates: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    #[command(flatten)]
    model_settings: ModelSettings,
}

impl ModelSettings {
    fn config(&self, output: PathBuf) -> Config {
        let mut config = Config::new(&self.model, output);
        config.tag_key = self.tag_key.clone();
        config.extension = self.extension.clone();
        config
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(self) -> anyhow::Result<()> {
        match self.cmd {
            Command::Generate(args) => args.execute(),
            Command::Inspect(args) => args.execute(),
        }
    }
}

impl GenerateArgs {
    fn execute(self) -> anyhow::Result<()> {
        let mut config = self.model_settings.config(self.output);
        config.templates_dir = self.templates;

        let written = layergen_codegen::run(&config).with_context(|| {
            format!(
                "failed to generate layers from {}",
                config.model_path.display()
            )
        })?;
        for path in &written {
            println!("{}", path.display());
        }
        Ok(())
    }
}

impl InspectArgs {
    fn execute(self) -> anyhow::Result<()> {
        let config = self.model_settings.config(PathBuf::new());
        let structs = config
            .extractor()
            .extract_dir(&config.model_path)
            .with_context(|| format!("failed to read model from {}", config.model_path.display()))?;
        let json = serde_json::to_string_pretty(&structs).context("failed to serialize model")?;
        println!("{json}");
        Ok(())
    }
}
