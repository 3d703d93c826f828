//! # Audio Buffering Module
//!
//! The boundary between a sample source and the transform engine. A
//! capture collaborator (sound card callback, file reader, synthesizer)
//! pushes samples in whatever packet sizes it produces; the chunker
//! re-frames them into exact transform-sized buffers and, at end of
//! stream, trims the leftover to the largest valid transform length.
//!
//! ## Features
//! - Accumulate-and-drain framing independent of packet size
//! - End-of-stream trim to the nearest power of two
//! - Transform length contract enforced at construction

use crate::error::TunerError;
use crate::fft;

/// Re-frames arbitrarily sized sample packets into transform-ready
/// chunks.
#[derive(Debug, Clone)]
pub struct SampleChunker {
    chunk_len: usize,
    buffer: Vec<f32>,
}

impl SampleChunker {
    /// Creates a chunker producing buffers of exactly `chunk_len`
    /// samples.
    ///
    /// # Errors
    /// [`TunerError::InvalidTransformLength`] when `chunk_len` is not a
    /// power of two in [2, 16384].
    pub fn new(chunk_len: usize) -> Result<Self, TunerError> {
        fft::validate_length(chunk_len)?;
        Ok(SampleChunker {
            chunk_len,
            buffer: Vec::with_capacity(chunk_len * 2),
        })
    }

    /// The configured chunk size.
    pub fn chunk_len(&self) -> usize {
        self.chunk_len
    }

    /// Number of samples queued but not yet emitted.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Appends a packet of samples to the queue.
    pub fn push(&mut self, samples: &[f32]) {
        self.buffer.extend_from_slice(samples);
    }

    /// Takes the next full chunk off the front of the queue, if one is
    /// ready.
    pub fn next_chunk(&mut self) -> Option<Vec<f32>> {
        if self.buffer.len() < self.chunk_len {
            return None;
        }
        let chunk = self.buffer[..self.chunk_len].to_vec();
        self.buffer.drain(..self.chunk_len);
        Some(chunk)
    }

    /// Drains the remainder at end of stream, trimmed to the largest
    /// power of two that still satisfies the transform contract.
    ///
    /// Samples beyond the trimmed length are discarded; fewer than two
    /// queued samples cannot form a transform and yield `None`. The
    /// queue is empty afterwards either way.
    pub fn flush(&mut self) -> Option<Vec<f32>> {
        let available = self.buffer.len().min(fft::MAX_LENGTH);
        let trimmed = if available >= fft::MIN_LENGTH {
            let mut length = fft::MIN_LENGTH;
            while length * 2 <= available {
                length *= 2;
            }
            Some(self.buffer[..length].to_vec())
        } else {
            None
        };
        self.buffer.clear();
        trimmed
    }
}
