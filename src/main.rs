use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vision_utils::config::Config;
use vision_utils::logging::init_logging;
use vision_utils::*;

#[derive(Parser)]
#[command(name = "imutil")]
#[command(about = "Base64-encode images, read their dimensions and lay them out in labelled grids")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Base64-encode image files
    Encode {
        /// Image files, encoded in the given order
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Write the encoded strings to a JSON array instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print width and height of image files
    Dims {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Arrange images in a titled grid and save the figure
    Show {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Titles, one per image (comma-separated); defaults to file names
        #[arg(short, long, value_delimiter = ',')]
        labels: Option<Vec<String>>,

        /// Cell size in inches
        #[arg(short, long)]
        size: Option<f32>,

        /// Number of grid rows
        #[arg(short, long)]
        rows: Option<usize>,

        /// Pixels per inch of the saved figure
        #[arg(long)]
        dpi: Option<f32>,

        /// Output file; `.svg` writes vector output, other extensions pick a raster format
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    if let Err(errors) = config.validate() {
        return Err(anyhow::anyhow!("Invalid configuration: {}", errors.join("; ")));
    }

    let logging = if cli.verbose > 0 {
        config.logging.clone().with_verbosity(cli.verbose)
    } else {
        config.logging.clone()
    };
    let _guard = init_logging(&logging)?;

    match cli.command {
        Commands::Encode { paths, output } => handle_encode(paths, output),
        Commands::Dims { paths } => handle_dims(paths),
        Commands::Show { paths, labels, size, rows, dpi, output } => {
            let mut options = ShowOptions::from_config(&config.grid);
            if let Some(labels) = labels {
                options = options.with_labels(labels);
            }
            if let Some(size) = size {
                options = options.with_size(size);
            }
            if let Some(rows) = rows {
                options = options.with_rows(rows);
            }
            handle_show(paths, options, dpi.unwrap_or(config.grid.dpi), output)
        }
    }
}

fn handle_encode(paths: Vec<PathBuf>, output: Option<PathBuf>) -> anyhow::Result<()> {
    let encoded = encode_images(paths.as_slice())?;

    match output {
        Some(output_path) => {
            let json = serde_json::to_string_pretty(&encoded)?;
            std::fs::write(&output_path, json)?;
            tracing::info!(path = %output_path.display(), count = encoded.len(), "Encoded images saved");
        }
        None => {
            for line in encoded {
                println!("{}", line);
            }
        }
    }

    Ok(())
}

fn handle_dims(paths: Vec<PathBuf>) -> anyhow::Result<()> {
    for path in &paths {
        let (width, height) = width_height(path)?;
        println!("{}\t{}\t{}", path.display(), width, height);
    }
    Ok(())
}

fn handle_show(
    paths: Vec<PathBuf>,
    options: ShowOptions,
    dpi: f32,
    output: PathBuf,
) -> anyhow::Result<()> {
    let figure = show_images(OneOrMany::Many(paths), &options)?;
    figure.save(&output, dpi)?;

    let (rows, cols) = figure.shape();
    println!("Saved {}x{} grid to {}", rows, cols, output.display());
    Ok(())
}
