use clap::{Parser, Subcommand};
use cli::AnalysisConfig;
use color_eyre::eyre::{eyre, Result};
use contouring::ShapeMatchMethod;
use preprocessing::ThresholdMode;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the dominant beam contour of an image and report its features
    Analyze {
        /// Path to the beam image
        #[arg(short, long)]
        image: PathBuf,
        /// Path to a .toml or .json analysis configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Thresholding mode (mean, top, bottom, adaptive, otsu)
        #[arg(short, long)]
        mode: Option<String>,
        /// Standard-deviation multiplier for mean, top and bottom
        #[arg(long)]
        factor: Option<f64>,
        /// Template to compare against (repeatable)
        #[arg(short, long = "template")]
        templates: Vec<String>,
        /// Directory of additional template images
        #[arg(long)]
        templates_dir: Option<PathBuf>,
        /// Shape match method index: 0 = I1, 1 = I2, 2 = I3
        #[arg(long)]
        method: Option<usize>,
        /// Write the JSON report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the available template names
    Templates {
        /// Directory of additional template images
        #[arg(long)]
        templates_dir: Option<PathBuf>,
    },
    /// Print the JSON schema of the analysis configuration file
    Schema,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            image,
            config,
            mode,
            factor,
            templates,
            templates_dir,
            method,
            output,
        } => {
            let mut analysis = match &config {
                Some(path) => AnalysisConfig::from_file(path)?,
                None => AnalysisConfig::default(),
            };

            // Flags override the file
            if let Some(mode) = mode {
                analysis.threshold.mode = ThresholdMode::parse(&mode)?;
            }
            if let Some(factor) = factor {
                analysis.threshold.factor = factor;
            }
            if !templates.is_empty() {
                analysis.templates = templates;
            }
            if templates_dir.is_some() {
                analysis.templates_dir = templates_dir;
            }
            if let Some(index) = method {
                analysis.method = ShapeMatchMethod::from_index(index)?;
            }

            analyze(&image, &analysis, output.as_deref())?;
        }
        Commands::Templates { templates_dir } => {
            let analysis = AnalysisConfig {
                templates_dir,
                ..AnalysisConfig::default()
            };
            for name in analysis.catalogue()?.names() {
                println!("{name}");
            }
        }
        Commands::Schema => {
            println!("{}", AnalysisConfig::schema()?);
        }
    }

    Ok(())
}

fn analyze(image_path: &Path, analysis: &AnalysisConfig, output: Option<&Path>) -> Result<()> {
    let analyzer = analysis.analyzer()?;
    info!("{}", analyzer.info());

    let image = image::open(image_path)
        .map_err(|err| eyre!("Failed to open {}: {}", image_path.display(), err))?;
    info!("Loaded {} ({}x{})", image_path.display(), image.width(), image.height());

    let features = analyzer.analyze_dynamic(&image)?;
    let report = features.to_json()?;

    match output {
        Some(path) => {
            std::fs::write(path, report)?;
            info!("Report written to {}", path.display());
        }
        None => println!("{report}"),
    }
    Ok(())
}
