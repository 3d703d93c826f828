// tuner-core/src/lib.rs

//! The core logic for the spectral instrument tuner.
//! This crate estimates the fundamental frequency of sample chunks and
//! maps it to the nearest equal-tempered pitch with a cents deviation.
//! It is completely headless: no audio devices, no files, no UI.
//!
//! ## Quick start
//!
//! ```
//! use tuner_core::{AnalysisSession, TunerConfig, signal};
//!
//! let session = AnalysisSession::new(TunerConfig::default())?;
//! let samples = signal::sine_wave(440.0, 44100, 8192);
//! if let Some(result) = session.analyze(&samples, 44100)? {
//!     println!(
//!         "{}{} {:+} cents at {:.2} Hz",
//!         result.note, result.accidental, result.cents, result.frequency
//!     );
//! }
//! # Ok::<(), tuner_core::TunerError>(())
//! ```

pub mod audio;
pub mod complex;
pub mod config;
pub mod error;
pub mod fft;
pub mod pitch;
pub mod session;
pub mod signal;
pub mod spectrum;
pub mod tuning;

pub use config::TunerConfig;
pub use error::TunerError;
pub use session::AnalysisSession;
pub use tuning::TuningResult;
