//! Spectral command-line interface.
//!
//! Thin file-in/file-out wrapper around the rendering core: reads a WAV
//! file, writes a spectrogram image, prints progress along the way.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use spectral_core::{render_spectrogram, ImageFileSink, SpectrogramConfig, WavFileSource};

#[derive(Parser)]
#[command(name = "spectral")]
#[command(version)]
#[command(about = "Render an audio file into a spectrogram image", long_about = None)]
struct Cli {
    /// Input audio file (WAV)
    input: PathBuf,

    /// Output image file; format follows the extension
    #[arg(default_value = "spectrogram.png")]
    output: PathBuf,

    /// FFT window length in samples
    #[arg(long, default_value_t = 1024)]
    fft_size: usize,

    /// Samples shared between consecutive FFT windows
    #[arg(long, default_value_t = 0)]
    fft_overlap: usize,

    /// Output image height in pixels
    #[arg(long, default_value_t = 500)]
    height: usize,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if !cli.quiet {
        println!("{} {}", "Input  :".bold(), cli.input.display());
        println!("{} {}", "Output :".bold(), cli.output.display());
    }

    let config = SpectrogramConfig {
        fft_block_size: cli.fft_size,
        fft_overlap: cli.fft_overlap,
        image_height: cli.height,
        ..SpectrogramConfig::default()
    };

    let source = match WavFileSource::open(&cli.input) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            return ExitCode::FAILURE;
        }
    };
    let mut sink = ImageFileSink::new(&cli.output);

    let quiet = cli.quiet;
    let mut print_progress = |percent: u8| {
        if !quiet {
            print!("\rProgress: {:>3}%", percent);
            std::io::stdout().flush().ok();
        }
    };

    info!("rendering {} -> {}", cli.input.display(), cli.output.display());
    match render_spectrogram(source, &mut sink, &config, Some(&mut print_progress)) {
        Ok(size) => {
            if !cli.quiet {
                println!(
                    "\n{} {}x{} image",
                    "Done!".green().bold(),
                    size.width,
                    size.height
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            if !cli.quiet {
                println!();
            }
            eprintln!("{} {}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
