//! konstelacio: draws a QAM constellation and its I/Q waveform without a screen.
//!
//! The frame handed to the rendering surface and the chart handed to the
//! charting backend are written to an output directory.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use konstelacio::{
    chart::{ChartData, I_LABEL, Q_LABEL, RetainedCharts},
    config::{Overrides, VisualizerConfig, load_config},
    render::{ConstellationFrame, MarkerBuffer},
    visualizer::Visualizer,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "konstelacio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to a TOML (or .json) configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Modulation order (4, 16, 32, 64, 256, ...)
    #[arg(short = 'm', long)]
    order: Option<usize>,

    /// Noise level in percent (0-100)
    #[arg(short, long)]
    noise: Option<f64>,

    /// Samples per symbol in the I/Q waveform
    #[arg(long)]
    samples_per_symbol: Option<usize>,

    /// Seed for reproducible noise
    #[arg(long)]
    seed: Option<u64>,

    /// Output format for the marker and waveform tables
    #[arg(short, long, default_value = "csv")]
    format: OutputFormat,

    /// Output directory
    #[arg(short, long, default_value = "output")]
    output: PathBuf,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Csv,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let config = resolve_config(&cli)?;
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    tracing::info!(
        "Drawing {} with {}% noise",
        config.order,
        config.noise_percent
    );
    let visualizer =
        Visualizer::with_config(&config, MarkerBuffer::new(), RetainedCharts::new(), rng)?;

    let frame = visualizer
        .surface()
        .frame()
        .context("rendering surface received no frame")?;
    let chart = visualizer
        .chart()
        .handle()
        .and_then(|&id| visualizer.chart().backend().get(id))
        .context("no live chart after redraw")?;

    std::fs::create_dir_all(&cli.output)
        .with_context(|| format!("Failed to create output directory {:?}", cli.output))?;

    let written = [
        write_constellation(frame, &cli.output, cli.format)?,
        write_waveform(chart, &cli.output, cli.format)?,
        write_chart_config(chart, &cli.output)?,
    ];

    print_summary(&config, frame, chart);
    for path in &written {
        println!("  wrote {}", path.display());
    }

    Ok(())
}

/// File settings first, then command-line overrides.
fn resolve_config(cli: &Cli) -> Result<VisualizerConfig> {
    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load configuration {:?}", path))?,
        None => VisualizerConfig::default(),
    };

    let overrides = Overrides {
        order: cli.order,
        noise_percent: cli.noise,
        samples_per_symbol: cli.samples_per_symbol,
        seed: cli.seed,
    };
    Ok(config.with_overrides(&overrides)?)
}

fn write_constellation(
    frame: &ConstellationFrame,
    dir: &Path,
    format: OutputFormat,
) -> Result<PathBuf> {
    let path = match format {
        OutputFormat::Csv => {
            let path = dir.join("constellation.csv");
            let mut w = csv::Writer::from_path(&path)?;
            w.write_record(["ideal_x (px)", "ideal_y (px)", "noisy_x (px)", "noisy_y (px)"])?;
            for pair in &frame.markers {
                w.write_record(&[
                    pair.ideal.x.to_string(),
                    pair.ideal.y.to_string(),
                    pair.noisy.x.to_string(),
                    pair.noisy.y.to_string(),
                ])?;
            }
            w.flush()?;
            path
        }
        OutputFormat::Json => {
            let path = dir.join("constellation.json");
            let mut f = std::fs::File::create(&path)?;
            writeln!(f, "{}", serde_json::to_string_pretty(frame)?)?;
            path
        }
    };

    tracing::info!("Wrote {} markers to {:?}", frame.markers.len(), path);
    Ok(path)
}

fn write_waveform(chart: &ChartData, dir: &Path, format: OutputFormat) -> Result<PathBuf> {
    let i = &chart.dataset(I_LABEL).context("chart has no I series")?.data;
    let q = &chart.dataset(Q_LABEL).context("chart has no Q series")?.data;

    let path = match format {
        OutputFormat::Csv => {
            let path = dir.join("waveform.csv");
            let mut w = csv::Writer::from_path(&path)?;
            w.write_record(["t (symbols)", "I", "Q"])?;
            for ((t_i, i_i), q_i) in chart.labels.iter().zip(i.iter()).zip(q.iter()) {
                w.write_record(&[t_i.to_string(), i_i.to_string(), q_i.to_string()])?;
            }
            w.flush()?;
            path
        }
        OutputFormat::Json => {
            let path = dir.join("waveform.json");
            let json = serde_json::json!({
                "time": chart.labels,
                "i": i,
                "q": q,
            });
            let mut f = std::fs::File::create(&path)?;
            writeln!(f, "{}", serde_json::to_string_pretty(&json)?)?;
            path
        }
    };

    tracing::info!("Wrote {} waveform samples to {:?}", chart.labels.len(), path);
    Ok(path)
}

fn write_chart_config(chart: &ChartData, dir: &Path) -> Result<PathBuf> {
    let path = dir.join("chart.json");
    let mut f = std::fs::File::create(&path)?;
    writeln!(f, "{}", serde_json::to_string_pretty(&chart.to_config())?)?;

    tracing::info!("Wrote chart configuration to {:?}", path);
    Ok(path)
}

fn print_summary(config: &VisualizerConfig, frame: &ConstellationFrame, chart: &ChartData) {
    println!("\n=== {} ===\n", config.order);
    println!("  Points:             {}", frame.markers.len());
    println!("  Bits per symbol:    {:.2}", config.order.bits_per_symbol());
    println!("  Noise:              {}%", config.noise_percent);
    println!("  Samples per symbol: {}", config.samples_per_symbol);
    println!("  Waveform samples:   {}", chart.labels.len());
    println!("  Canvas:             {} px", frame.canvas.size());
    println!();
}
