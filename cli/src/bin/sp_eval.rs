use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::Result;
use sp_eval::{Evaluation, EvaluationConfig, SearchStrategy};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about = "Superpixel boundary recall and distance evaluation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate every image and grid step, then render the charts (default)
    Run(RunArgs),
    /// Write the default configuration to a .toml or .json file
    InitConfig {
        /// Destination file, format chosen by extension
        #[arg(short, long, default_value = "sp_eval.toml")]
        output: PathBuf,
    },
    /// Print the JSON schema of the configuration file
    Schema,
}

#[derive(Args, Default)]
struct RunArgs {
    /// Path to a .toml or .json configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Directory that imgs/, build/ and graphs/ are resolved against
    #[arg(short, long)]
    root: Option<PathBuf>,
    /// Use the exact nearest-pixel search instead of the first-ring search
    #[arg(long)]
    exact: bool,
    /// TrueType font used for chart text
    #[arg(long)]
    font: Option<PathBuf>,
    /// Also write every metric record to this JSON file
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or_else(|| Commands::Run(RunArgs::default())) {
        Commands::Run(args) => run(args)?,
        Commands::InitConfig { output } => {
            EvaluationConfig::default().to_file(&output)?;
            info!("Default configuration written to {:?}", output);
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&EvaluationConfig::schema())?);
        }
    }

    Ok(())
}

fn run(args: RunArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => EvaluationConfig::from_file(path)?,
        None => EvaluationConfig::default(),
    };
    if args.exact {
        config.search = SearchStrategy::Exact;
    }
    if args.font.is_some() {
        config.font_path = args.font;
    }
    if args.summary.is_some() {
        config.summary_path = args.summary;
    }
    if let Some(root) = &args.root {
        config = config.with_root(root);
    }

    let evaluation = Evaluation::builder().config(config).build()?;
    info!("{}", evaluation.info());

    let report = evaluation.run()?;
    for (label, record) in report.results.iter() {
        info!(
            "{}: recall {:.3} ({} of {} pixels), mean {:.3}, median {:.3}",
            label,
            record.boundary_recall,
            record.hits,
            record.boundary_pixels,
            record.mean_distance,
            record.median_distance
        );
    }
    for chart in &report.charts {
        info!("Chart written: {:?}", chart.path);
    }

    Ok(())
}
