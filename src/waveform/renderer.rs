//! Envelope rendering
//!
//! Turns a peak envelope into vector path commands (and their SVG text
//! forms) plus a textual summary of the analyzed clip. Rendering is a
//! read-only pass; the envelope stays intact for re-rendering.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::decoder::AudioBuffer;
use crate::waveform::extractor::PeakEnvelope;

/// One vector path command in envelope coordinates.
///
/// `x` is the display column, `y` the amplitude in [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum PathCommand {
    MoveTo { x: u32, y: f32 },
    LineTo { x: u32, y: f32 },
}

/// Build the zig-zag outline tracing the envelope.
///
/// Column `i` contributes a move-to at its max followed by a line-to at its
/// min, both at horizontal position `i`.
pub fn path_commands(envelope: &PeakEnvelope) -> Vec<PathCommand> {
    let mut commands = Vec::with_capacity(envelope.flat_len());
    for (column, pair) in envelope.iter().enumerate() {
        let x = column as u32;
        commands.push(PathCommand::MoveTo { x, y: pair.max });
        commands.push(PathCommand::LineTo { x, y: pair.min });
    }
    commands
}

/// The envelope outline as an SVG path `d` attribute string.
pub fn path_data(envelope: &PeakEnvelope) -> String {
    let mut d = String::new();
    for command in path_commands(envelope) {
        if !d.is_empty() {
            d.push(' ');
        }
        match command {
            PathCommand::MoveTo { x, y } => d.push_str(&format!("M{},{}", x, y)),
            PathCommand::LineTo { x, y } => d.push_str(&format!("L{},{}", x, y)),
        }
    }
    d
}

/// Display coordinate frame: `sample_rate` columns wide, amplitudes in
/// [-1, 1]. Collapses to zero width when nothing is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewBox {
    pub min_x: f32,
    pub min_y: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewBox {
    /// Frame sized for a given sample rate (0 for the unloaded baseline).
    pub fn for_sample_rate(sample_rate: u32) -> Self {
        Self {
            min_x: 0.0,
            min_y: -1.0,
            width: sample_rate as f32,
            height: 2.0,
        }
    }
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.min_x, self.min_y, self.width, self.height
        )
    }
}

/// Textual summary of an analyzed clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioSummary {
    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Raw sample count per channel
    pub total_samples: usize,

    /// Number of peak values after downsampling (2 per column)
    pub compressed_peaks: usize,

    /// Duration rounded up to the next whole second
    pub duration_secs: u64,
}

impl AudioSummary {
    pub fn new(buffer: &AudioBuffer, envelope: &PeakEnvelope) -> Self {
        Self {
            sample_rate: buffer.sample_rate(),
            total_samples: buffer.len(),
            compressed_peaks: envelope.flat_len(),
            duration_secs: buffer.duration_secs().ceil() as u64,
        }
    }
}

impl fmt::Display for AudioSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sample rate: {}hz", self.sample_rate)?;
        writeln!(f, "Total peaks: {} peaks", self.total_samples)?;
        writeln!(f, "Compressed peaks: {} peaks", self.compressed_peaks)?;
        write!(f, "Duration: {} seconds", self.duration_secs)
    }
}

/// Render the envelope as a standalone SVG document.
pub fn svg_document(envelope: &PeakEnvelope, view_box: ViewBox) -> String {
    format!(
        concat!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" ",
            "viewBox=\"{}\" preserveAspectRatio=\"none\">\n",
            "  <path d=\"{}\" fill=\"none\" stroke=\"currentColor\" ",
            "stroke-width=\"1\" vector-effect=\"non-scaling-stroke\"/>\n",
            "</svg>\n"
        ),
        view_box,
        path_data(envelope),
    )
}
