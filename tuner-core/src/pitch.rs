//! # Pitch Table Module
//!
//! Equal-tempered reference pitches generated around a tunable concert
//! anchor (A = 440 Hz by default). The table spans 60 consecutive
//! semitones, from two and three-quarter octaves below the anchor to a
//! little over two above it, and supports nearest-neighbor lookup by
//! frequency.
//!
//! ## Features
//! - Equal temperament generation, `anchor * 2^(offset/12)`
//! - Chromatic note naming matching a piano keyboard (B and E carry no
//!   sharp)
//! - Nearest lookup with first-match-wins tie breaking

use std::fmt;

/// Note letters of the diatonic cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteName {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

/// Accidental applied to a note letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accidental {
    Natural,
    Sharp,
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            NoteName::A => "A",
            NoteName::B => "B",
            NoteName::C => "C",
            NoteName::D => "D",
            NoteName::E => "E",
            NoteName::F => "F",
            NoteName::G => "G",
        };
        f.write_str(letter)
    }
}

impl fmt::Display for Accidental {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accidental::Natural => Ok(()),
            Accidental::Sharp => f.write_str("#"),
        }
    }
}

/// One equal-tempered reference pitch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pitch {
    /// Note letter.
    pub note: NoteName,
    /// Natural or sharp.
    pub accidental: Accidental,
    /// Fundamental frequency in Hz.
    pub frequency: f64,
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.note, self.accidental)
    }
}

/// Number of reference pitches in a table.
pub const PITCH_COUNT: usize = 60;

/// Semitone offset of the first table entry relative to the anchor.
const LOW_OFFSET: i32 = -33;

/// One octave of note names starting at the lowest generated entry (a C).
/// B and E take no sharp, matching the black-key layout of a keyboard.
const CHROMATIC: [(NoteName, Accidental); 12] = [
    (NoteName::C, Accidental::Natural),
    (NoteName::C, Accidental::Sharp),
    (NoteName::D, Accidental::Natural),
    (NoteName::D, Accidental::Sharp),
    (NoteName::E, Accidental::Natural),
    (NoteName::F, Accidental::Natural),
    (NoteName::F, Accidental::Sharp),
    (NoteName::G, Accidental::Natural),
    (NoteName::G, Accidental::Sharp),
    (NoteName::A, Accidental::Natural),
    (NoteName::A, Accidental::Sharp),
    (NoteName::B, Accidental::Natural),
];

/// Ordered, immutable table of [`PITCH_COUNT`] equal-tempered pitches.
///
/// Owned by the analysis session and regenerated only when the anchor
/// frequency changes.
#[derive(Debug, Clone, PartialEq)]
pub struct PitchTable {
    concert_pitch: f64,
    entries: Vec<Pitch>,
}

impl PitchTable {
    /// Generates the table for a concert-pitch anchor.
    ///
    /// Entries run from semitone offset -33 to +26 relative to the
    /// anchor, each at `anchor * 2^(offset/12)`; offset 0 is the anchor
    /// itself, an A natural.
    ///
    /// # Arguments
    /// * `concert_pitch` - Anchor frequency in Hz (440.0 for standard
    ///   concert pitch)
    pub fn new(concert_pitch: f64) -> Self {
        let entries = (LOW_OFFSET..LOW_OFFSET + PITCH_COUNT as i32)
            .map(|offset| {
                let (note, accidental) =
                    CHROMATIC[(offset - LOW_OFFSET) as usize % CHROMATIC.len()];
                Pitch {
                    note,
                    accidental,
                    frequency: concert_pitch * 2.0_f64.powf(f64::from(offset) / 12.0),
                }
            })
            .collect();

        PitchTable {
            concert_pitch,
            entries,
        }
    }

    /// The anchor frequency this table was generated from.
    pub fn concert_pitch(&self) -> f64 {
        self.concert_pitch
    }

    /// The generated entries, ordered low to high.
    pub fn entries(&self) -> &[Pitch] {
        &self.entries
    }

    /// Entry whose frequency is closest to `frequency`.
    ///
    /// Ties keep the earlier (lower) entry, so a candidate only wins on a
    /// strictly smaller distance.
    pub fn nearest(&self, frequency: f64) -> &Pitch {
        let mut best = &self.entries[0];
        for candidate in &self.entries[1..] {
            if (candidate.frequency - frequency).abs() < (best.frequency - frequency).abs() {
                best = candidate;
            }
        }
        best
    }
}
