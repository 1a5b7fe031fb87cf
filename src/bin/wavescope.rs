//! Wavescope CLI - analyze an audio file, render its waveform, play it back.
//!
//! Usage: wavescope <audio-file> [--svg <output.svg>] [--play] [--gain <g>]

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wavescope::AudioAnalyzer;

struct Args {
    input: PathBuf,
    svg_output: Option<PathBuf>,
    play: bool,
    gain: Option<f32>,
}

fn parse_args() -> Result<Args> {
    let mut args = std::env::args().skip(1);
    let mut input = None;
    let mut svg_output = None;
    let mut play = false;
    let mut gain = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--svg" => {
                let path = args.next().context("--svg requires an output path")?;
                svg_output = Some(PathBuf::from(path));
            }
            "--play" => play = true,
            "--gain" => {
                let value = args.next().context("--gain requires a multiplier")?;
                gain = Some(value.parse::<f32>().context("invalid gain multiplier")?);
            }
            other if input.is_none() => input = Some(PathBuf::from(other)),
            other => bail!("unexpected argument: {}", other),
        }
    }

    Ok(Args {
        input: input.context("usage: wavescope <audio-file> [--svg <out.svg>] [--play] [--gain <g>]")?,
        svg_output,
        play,
        gain,
    })
}

fn main() -> Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wavescope=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = parse_args()?;

    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let mut analyzer = if args.play {
        AudioAnalyzer::with_default_output().context("no audio output available")?
    } else {
        AudioAnalyzer::headless()
    };

    analyzer
        .load_audio(bytes)
        .with_context(|| format!("failed to decode {}", args.input.display()))?;

    let summary = analyzer.summary().expect("clip was just loaded");
    println!("{}", summary);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if let Some(svg_path) = &args.svg_output {
        std::fs::write(svg_path, analyzer.svg())
            .with_context(|| format!("failed to write {}", svg_path.display()))?;
        println!("Waveform written to {}", svg_path.display());
    }

    if args.play {
        if let Some(gain) = args.gain {
            analyzer.set_gain(gain);
        }
        analyzer.play()?;
        // The stream runs on the audio thread; sleep for the clip length
        std::thread::sleep(Duration::from_secs(summary.duration_secs));
        analyzer.stop();
    }

    Ok(())
}
