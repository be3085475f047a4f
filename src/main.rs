use clap::Parser;
use instamax::imaging::{CssColors, Rotation, RustBackend, maximize_file};
use instamax::request::{RequestFields, validate_request};
use instamax::{config, output};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "instamax")]
#[command(version)]
#[command(about = "Maximize an image to Instagram's resolution limits")]
#[command(long_about = "\
Maximize an image to Instagram's resolution limits

The input image is scaled to fit a 1080x1350 canvas without cropping and
centered on it. The space around the image is filled with the background
color. Rotating a landscape image first gets you the most pixels Instagram
will allow. Output is always JPEG; ICC profile and EXIF are kept.

Settings resolve in order (last wins):
  stock defaults → --config file → command-line flags

Run 'instamax --gen-config' to print a documented config file.")]
struct Cli {
    /// Image file to process
    #[arg(required_unless_present = "gen_config")]
    input: Option<PathBuf>,

    /// Where the output JPEG is written
    #[arg(required_unless_present = "gen_config")]
    output: Option<PathBuf>,

    /// Rotate 90 degrees first: "clockwise" or "counter-clockwise" (default: no rotation)
    #[arg(short, long)]
    rotate: Option<String>,

    /// CSS color name for the background (default: white)
    #[arg(short, long)]
    color: Option<String>,

    /// JPEG quality, clamped to 1-100 (default: 75)
    #[arg(short, long, allow_negative_numbers = true)]
    quality: Option<i64>,

    /// TOML config file with canvas and output settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reject unknown rotations, unknown colors and out-of-range quality
    /// instead of falling back to defaults
    #[arg(long)]
    strict: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Log each processing step to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Print a stock config file with all options documented and exit
    #[arg(long)]
    gen_config: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let (Some(input), Some(output_path)) = (cli.input, cli.output) else {
        return Err("input and output paths are required".into());
    };

    let mut settings = config::load_config(cli.config.as_deref())?;
    if let Some(color) = cli.color {
        settings.canvas.background = color;
    }
    if let Some(quality) = cli.quality {
        settings.output.quality = quality;
    }
    let options = if cli.strict {
        let quality = settings.output.quality.to_string();
        let fields = RequestFields {
            rotate: cli.rotate.as_deref(),
            color: Some(settings.canvas.background.as_str()),
            quality: Some(quality.as_str()),
        };
        validate_request(fields, &CssColors, settings.target())?
    } else {
        settings.options(Rotation::parse(cli.rotate.as_deref()))
    };

    let params = maximize_file(&RustBackend::new(), &CssColors, &input, &output_path, &options)?;

    if cli.json {
        println!("{}", output::summary_json(&params, &input, &output_path)?);
    } else {
        output::print_summary(&params, &input, &output_path);
    }
    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
