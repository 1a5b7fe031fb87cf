//! Peak envelope extraction
//!
//! Downsamples a decoded audio buffer into per-column (max, min) amplitude
//! pairs for vector rendering. The number of columns is fixed to the numeric
//! sample-rate value, so the window width in samples equals the clip duration
//! in seconds.

use serde::{Deserialize, Serialize};

use crate::decoder::AudioBuffer;

/// One display column: the widest amplitude excursion seen in its window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakPair {
    pub max: f32,
    pub min: f32,
}

/// Downsampled min/max envelope of a waveform.
///
/// An ordered, indexable sequence of [`PeakPair`]s, one per display column.
/// Renderers iterate it read-only; it stays intact for re-rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakEnvelope {
    peaks: Vec<PeakPair>,
}

impl PeakEnvelope {
    /// Number of columns (pairs).
    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    /// Whether the envelope holds no columns.
    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    /// Number of individual peak values (2 per column, alternating max, min).
    pub fn flat_len(&self) -> usize {
        self.peaks.len() * 2
    }

    /// The pair for one column.
    pub fn get(&self, column: usize) -> Option<PeakPair> {
        self.peaks.get(column).copied()
    }

    /// Read-only pass over the columns.
    pub fn iter(&self) -> impl Iterator<Item = &PeakPair> {
        self.peaks.iter()
    }

    /// Flat alternating `max, min, max, min, ...` view of length `2 * len()`.
    pub fn flattened(&self) -> Vec<f32> {
        self.peaks
            .iter()
            .flat_map(|pair| [pair.max, pair.min])
            .collect()
    }
}

/// Extract the merged peak envelope from a decoded buffer.
///
/// For each of the `sample_rate` output columns, a window of
/// `len / sample_rate` samples is scanned with stride
/// `max(1, floor(window / 10))` — wide windows are subsampled rather than
/// scanned exhaustively, trading accuracy for speed. Channels are merged per
/// column by keeping the largest max and smallest min across channels;
/// channel 0 seeds the pair, later channels update only on a strictly wider
/// excursion.
///
/// An empty buffer yields all-zero pairs.
pub fn extract_peaks(buffer: &AudioBuffer) -> PeakEnvelope {
    let columns = buffer.sample_rate() as usize;
    let len = buffer.len();

    if len == 0 || buffer.channel_count() == 0 {
        return PeakEnvelope {
            peaks: vec![PeakPair { max: 0.0, min: 0.0 }; columns],
        };
    }

    // Window width in samples equals the clip duration in seconds
    let window = len as f64 / columns as f64;
    let step = ((window / 10.0).floor() as usize).max(1);

    let mut peaks: Vec<PeakPair> = Vec::with_capacity(columns);

    for channel_index in 0..buffer.channel_count() {
        let samples = buffer.channel(channel_index);

        for column in 0..columns {
            let start = (column as f64 * window).floor() as usize;
            // The window may round past the end of the buffer, or collapse to
            // nothing for sub-second clips; always inspect at least one sample
            let end = ((start as f64 + window).floor() as usize)
                .max(start + 1)
                .min(len);

            let mut max = samples[start];
            let mut min = samples[start];
            let mut index = start;
            while index < end {
                let value = samples[index];
                if value > max {
                    max = value;
                } else if value < min {
                    min = value;
                }
                index += step;
            }

            if channel_index == 0 {
                peaks.push(PeakPair { max, min });
            } else {
                let merged = &mut peaks[column];
                if max > merged.max {
                    merged.max = max;
                }
                if min < merged.min {
                    merged.min = min;
                }
            }
        }
    }

    PeakEnvelope { peaks }
}
