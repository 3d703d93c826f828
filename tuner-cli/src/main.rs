//! # Tuner Console Front End
//!
//! Drives the headless analysis engine from the command line. Tones are
//! synthesized rather than captured, which makes every run reproducible:
//! the `tone` command analyzes a single frame, `stream` feeds a tone
//! through the packet chunking pipeline the way a capture callback would,
//! and `pitches` prints the reference table for the configured anchor.

use std::fs::File;
use std::io::{Read, Write};
use std::process::ExitCode;
use std::thread;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossbeam_channel::Receiver;
use tuner_core::audio::SampleChunker;
use tuner_core::{AnalysisSession, TunerConfig, TuningResult, signal};

#[derive(Parser, Debug)]
#[command(name = "tuner-cli", about = "Spectral pitch detection over synthesized tones")]
struct Cli {
    /// Load analysis settings from a JSON file
    #[arg(long)]
    config: Option<String>,

    /// Write the effective settings to a JSON file before running
    #[arg(long)]
    write_config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze one synthesized tone and print the tuning verdict
    Tone {
        /// Tone frequency in Hz
        #[arg(long, default_value_t = 440.0)]
        frequency: f64,

        /// Sample rate in Hz
        #[arg(long, default_value_t = 44100)]
        sample_rate: u32,

        /// Samples to synthesize (defaults to the configured FFT length)
        #[arg(long)]
        length: Option<usize>,
    },
    /// Stream a tone in small packets through the chunking pipeline
    Stream {
        /// Tone frequency in Hz
        #[arg(long, default_value_t = 440.0)]
        frequency: f64,

        /// Sample rate in Hz
        #[arg(long, default_value_t = 44100)]
        sample_rate: u32,

        /// Total stream duration in milliseconds
        #[arg(long, default_value_t = 2000)]
        duration_ms: u64,

        /// Samples per packet sent by the producer thread
        #[arg(long, default_value_t = 600)]
        packet: usize,
    },
    /// Print the reference pitch table for the configured concert pitch
    Pitches,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            load_config(path).with_context(|| format!("loading settings from {path}"))?
        }
        None => TunerConfig::default(),
    };
    if let Some(path) = &cli.write_config {
        save_config(&config, path).with_context(|| format!("writing settings to {path}"))?;
        eprintln!("[MAIN] Settings written to {path}");
    }

    let session = AnalysisSession::new(config).context("configuration rejected")?;

    match cli.command {
        Commands::Tone { frequency, sample_rate, length } => {
            run_tone(&session, frequency, sample_rate, length)
        }
        Commands::Stream { frequency, sample_rate, duration_ms, packet } => {
            run_stream(&session, frequency, sample_rate, duration_ms, packet)
        }
        Commands::Pitches => run_pitches(&session),
    }
}

/// Synthesizes a single frame and analyzes it in one shot.
fn run_tone(
    session: &AnalysisSession,
    frequency: f64,
    sample_rate: u32,
    length: Option<usize>,
) -> Result<()> {
    let length = length.unwrap_or(session.config().fft_length);
    eprintln!("[MAIN] Synthesizing {frequency} Hz at {sample_rate} Hz, {length} samples");

    let samples = signal::sine_wave(frequency, sample_rate, length);
    match session.analyze(&samples, sample_rate)? {
        Some(result) => println!("{}", format_result(&result)),
        None => println!("no tone detected"),
    }
    Ok(())
}

/// Feeds a synthesized tone through the packet pipeline.
///
/// A producer thread plays the role of an audio callback: it cuts the tone
/// into packets and sends them over a channel. The main thread gathers the
/// packets into analysis-sized chunks and prints one line per frame.
fn run_stream(
    session: &AnalysisSession,
    frequency: f64,
    sample_rate: u32,
    duration_ms: u64,
    packet: usize,
) -> Result<()> {
    anyhow::ensure!(packet > 0, "packet size must be positive");

    let total = (u64::from(sample_rate) * duration_ms / 1000) as usize;
    let (sample_tx, sample_rx) = crossbeam_channel::bounded::<Vec<f32>>(8);

    eprintln!("[MAIN] Streaming {frequency} Hz for {duration_ms} ms ({total} samples)");
    let producer = thread::spawn(move || {
        eprintln!("[TONE-THREAD] Starting tone producer...");
        let samples = signal::sine_wave(frequency, sample_rate, total);
        for chunk in samples.chunks(packet) {
            if sample_tx.send(chunk.to_vec()).is_err() {
                eprintln!("[TONE-THREAD] Consumer hung up");
                return;
            }
        }
        eprintln!("[TONE-THREAD] Stream complete");
        // Dropping the sender closes the channel and ends the consumer loop.
    });

    let frames = consume_stream(session, &sample_rx, sample_rate)?;
    producer
        .join()
        .map_err(|_| anyhow::anyhow!("tone producer thread panicked"))?;
    eprintln!("[MAIN] {frames} frames analyzed");
    Ok(())
}

/// Drains the packet channel into analysis frames until the producer hangs up.
fn consume_stream(
    session: &AnalysisSession,
    packets: &Receiver<Vec<f32>>,
    sample_rate: u32,
) -> Result<usize> {
    let mut chunker = SampleChunker::new(session.config().fft_length)?;
    let mut frames = 0usize;

    for packet in packets.iter() {
        chunker.push(&packet);
        while let Some(chunk) = chunker.next_chunk() {
            frames += 1;
            print_frame(session, &chunk, sample_rate, frames)?;
        }
    }
    // The producer is done; analyze whatever full power of two is left over.
    if let Some(tail) = chunker.flush() {
        frames += 1;
        print_frame(session, &tail, sample_rate, frames)?;
    }
    Ok(frames)
}

fn print_frame(
    session: &AnalysisSession,
    chunk: &[f32],
    sample_rate: u32,
    frame: usize,
) -> Result<()> {
    match session.analyze(chunk, sample_rate)? {
        Some(result) => println!("frame {frame:>3}: {}", format_result(&result)),
        None => println!("frame {frame:>3}: no tone detected"),
    }
    Ok(())
}

/// Prints all sixty reference pitches for the configured concert pitch.
fn run_pitches(session: &AnalysisSession) -> Result<()> {
    let table = session.pitch_table();
    println!("concert pitch {:.2} Hz", table.concert_pitch());
    for pitch in table.entries() {
        println!("{:<3} {:>9.3} Hz", pitch.to_string(), pitch.frequency);
    }
    Ok(())
}

fn format_result(result: &TuningResult) -> String {
    format!(
        "{:>8.2} Hz -> {}{} {:+} cents",
        result.frequency, result.note, result.accidental, result.cents
    )
}

/// Loads analysis settings from a JSON file.
fn load_config(path: &str) -> Result<TunerConfig> {
    let mut file = File::open(path)?;
    let mut data = String::new();
    file.read_to_string(&mut data)?;
    let config: TunerConfig = serde_json::from_str(&data)?;
    Ok(config)
}

/// Writes the effective settings to a JSON file, pretty printed.
fn save_config(config: &TunerConfig, path: &str) -> Result<()> {
    let json_string = serde_json::to_string_pretty(config)?;
    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;
    Ok(())
}
