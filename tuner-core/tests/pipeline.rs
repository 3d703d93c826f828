//! End-to-end checks: synthesized tones run through chunking, the
//! forward transform, peak search, and pitch matching.

use tuner_core::audio::SampleChunker;
use tuner_core::pitch::{Accidental, NoteName};
use tuner_core::{AnalysisSession, TunerConfig, signal};

fn default_session() -> AnalysisSession {
    AnalysisSession::new(TunerConfig::default()).unwrap()
}

#[test]
fn recognizes_notes_across_the_band() {
    let session = default_session();
    let cases = [
        (123.47, NoteName::B, Accidental::Natural),
        (261.63, NoteName::C, Accidental::Natural),
        (349.23, NoteName::F, Accidental::Natural),
        (440.00, NoteName::A, Accidental::Natural),
        (466.16, NoteName::A, Accidental::Sharp),
        (784.00, NoteName::G, Accidental::Natural),
    ];

    for (frequency, note, accidental) in cases {
        let samples = signal::sine_wave(frequency, 44100, 8192);
        let result = session.analyze(&samples, 44100).unwrap().unwrap();
        assert_eq!(
            (result.note, result.accidental),
            (note, accidental),
            "{frequency} Hz"
        );
        assert!(
            result.cents.abs() <= 15,
            "{frequency} Hz drifted {} cents",
            result.cents
        );
    }
}

#[test]
fn sample_rate_variations_keep_the_anchor_note() {
    let session = default_session();
    for (rate, length) in [(44100u32, 8192usize), (48000, 8192), (22050, 4096)] {
        let samples = signal::sine_wave(440.0, rate, length);
        let result = session.analyze(&samples, rate).unwrap().unwrap();
        assert_eq!(
            (result.note, result.accidental),
            (NoteName::A, Accidental::Natural),
            "at {rate} Hz"
        );
    }
}

#[test]
fn a_quiet_tone_is_still_a_tone() {
    // The engine has no amplitude gate; only an empty band reads as
    // silence.
    let session = default_session();
    let samples: Vec<f32> = signal::sine_wave(440.0, 44100, 8192)
        .into_iter()
        .map(|sample| sample * 0.01)
        .collect();

    let result = session.analyze(&samples, 44100).unwrap().unwrap();
    assert_eq!(result.note, NoteName::A);
    assert_eq!(result.accidental, Accidental::Natural);
}

#[test]
fn streamed_packets_chunk_into_consistent_frames() {
    let config = TunerConfig {
        fft_length: 2048,
        ..TunerConfig::default()
    };
    let session = AnalysisSession::new(config).unwrap();
    let mut chunker = SampleChunker::new(session.config().fft_length).unwrap();

    let tone = signal::sine_wave(466.16, 44100, 6000);
    let mut results = Vec::new();
    for packet in tone.chunks(600) {
        chunker.push(packet);
        while let Some(chunk) = chunker.next_chunk() {
            if let Some(result) = session.analyze(&chunk, 44100).unwrap() {
                results.push(result);
            }
        }
    }
    if let Some(tail) = chunker.flush() {
        if let Some(result) = session.analyze(&tail, 44100).unwrap() {
            results.push(result);
        }
    }

    // Two full frames plus the trimmed 1024-sample tail.
    assert_eq!(results.len(), 3);
    for result in results {
        assert_eq!(
            (result.note, result.accidental),
            (NoteName::A, Accidental::Sharp)
        );
    }
}

#[test]
fn re_anchoring_shifts_the_deviation_not_the_note() {
    let mut session = default_session();
    let samples = signal::sine_wave(433.9, 44100, 8192);

    let at_440 = session.analyze(&samples, 44100).unwrap().unwrap();
    assert_eq!(at_440.note, NoteName::A);
    assert!(
        at_440.cents <= -20,
        "expected well flat of A at 440, got {}",
        at_440.cents
    );

    session.set_concert_pitch(432.0).unwrap();
    let at_432 = session.analyze(&samples, 44100).unwrap().unwrap();
    assert_eq!(at_432.note, NoteName::A);
    assert!(
        at_432.cents.abs() <= 12,
        "expected close to A at 432, got {}",
        at_432.cents
    );
}
