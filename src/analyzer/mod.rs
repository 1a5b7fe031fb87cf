//! Audio analyzer controller
//!
//! Owns the decoded buffer, its peak envelope, and the playback route, and
//! exposes the control surface the UI layer calls: load, play, stop, reset,
//! set-gain, plus read-only accessors for rendering. One owned instance is
//! passed explicitly to whichever handlers need it.

use std::sync::Arc;

use crate::decoder::{decode_audio, AudioBuffer};
use crate::player::{CpalSink, NullSink, PlaybackSink, PlaybackState, SharedGain};
use crate::utils::error::AppResult;
use crate::waveform::{
    extract_peaks, path_commands, svg_document, AudioSummary, PathCommand, PeakEnvelope, ViewBox,
};

/// Decoder, state holder and playback controller.
pub struct AudioAnalyzer {
    /// Current playback state
    state: PlaybackState,

    /// Decoded audio, replaced wholesale on each load
    buffer: Option<Arc<AudioBuffer>>,

    /// Peak envelope derived from the buffer
    envelope: PeakEnvelope,

    /// Gain cell for the current buffer; created at load, neutral 1.0
    gain: Option<Arc<SharedGain>>,

    /// Output route; a fresh stream is started on every play
    sink: Box<dyn PlaybackSink>,
}

impl AudioAnalyzer {
    /// Controller with an explicit output sink.
    pub fn new(sink: Box<dyn PlaybackSink>) -> Self {
        Self {
            state: PlaybackState::default(),
            buffer: None,
            envelope: PeakEnvelope::default(),
            gain: None,
            sink,
        }
    }

    /// Controller bound to the default audio output device.
    ///
    /// Fails when the host has no audio output capability at all.
    pub fn with_default_output() -> AppResult<Self> {
        Ok(Self::new(Box::new(CpalSink::new()?)))
    }

    /// Headless controller that analyzes but never emits audio.
    pub fn headless() -> Self {
        Self::new(Box::new(NullSink))
    }

    /// Decode `bytes` and make the result the current clip.
    ///
    /// On success any prior playback is stopped, the buffer is replaced, the
    /// envelope is recomputed and a fresh neutral gain cell is created. On
    /// decode failure nothing changes: the previously loaded clip stays
    /// loaded and playable.
    pub fn load_audio(&mut self, bytes: Vec<u8>) -> AppResult<()> {
        let buffer = decode_audio(bytes)?;

        // Discard the prior playback graph, implicitly stopping playback
        self.sink.stop();
        self.state = PlaybackState::Idle;

        self.envelope = extract_peaks(&buffer);
        self.gain = Some(SharedGain::new(1.0));
        tracing::info!(
            "loaded clip: {} Hz, {} channels, {} samples, {} envelope columns",
            buffer.sample_rate(),
            buffer.channel_count(),
            buffer.len(),
            self.envelope.len(),
        );
        self.buffer = Some(Arc::new(buffer));

        Ok(())
    }

    /// Start playback from the beginning of the loaded clip.
    ///
    /// No-op when nothing is loaded or when already playing.
    pub fn play(&mut self) -> AppResult<()> {
        if self.state.is_playing() {
            tracing::debug!("play ignored: already playing");
            return Ok(());
        }

        let (Some(buffer), Some(gain)) = (&self.buffer, &self.gain) else {
            tracing::debug!("play ignored: no clip loaded");
            return Ok(());
        };

        self.sink.start(Arc::clone(buffer), Arc::clone(gain))?;
        self.state = PlaybackState::Playing;
        tracing::info!("playback started");
        Ok(())
    }

    /// Stop playback. No-op when idle.
    pub fn stop(&mut self) {
        if !self.state.is_playing() {
            tracing::debug!("stop ignored: not playing");
            return;
        }

        self.sink.stop();
        self.state = PlaybackState::Idle;
        tracing::info!("playback stopped");
    }

    /// Return to the initial unloaded state.
    ///
    /// Discards the buffer, envelope and gain cell; the view box collapses
    /// to the zero-column baseline.
    pub fn reset(&mut self) {
        self.sink.stop();
        self.state = PlaybackState::Idle;
        self.buffer = None;
        self.envelope = PeakEnvelope::default();
        self.gain = None;
        tracing::info!("analyzer reset");
    }

    /// Set the gain multiplier, effective immediately. Last write wins.
    ///
    /// No-op when nothing is loaded (no gain cell exists yet).
    pub fn set_gain(&mut self, multiplier: f32) {
        match &self.gain {
            Some(gain) => {
                gain.set(multiplier);
                tracing::debug!("gain set to {}", multiplier);
            }
            None => {
                tracing::warn!("set_gain ignored: no clip loaded");
            }
        }
    }

    /// Current playback state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Whether audio is currently playing.
    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    /// Sample rate of the loaded clip, 0 when nothing is loaded.
    pub fn sample_rate(&self) -> u32 {
        self.buffer.as_ref().map_or(0, |b| b.sample_rate())
    }

    /// Current gain multiplier, if a clip is loaded.
    pub fn gain(&self) -> Option<f32> {
        self.gain.as_ref().map(|g| g.get())
    }

    /// Peak envelope of the loaded clip (empty when nothing is loaded).
    pub fn envelope(&self) -> &PeakEnvelope {
        &self.envelope
    }

    /// Vector path outline of the envelope.
    pub fn path_commands(&self) -> Vec<PathCommand> {
        path_commands(&self.envelope)
    }

    /// Display coordinate frame for the current clip.
    pub fn view_box(&self) -> ViewBox {
        ViewBox::for_sample_rate(self.sample_rate())
    }

    /// Standalone SVG rendering of the envelope.
    pub fn svg(&self) -> String {
        svg_document(&self.envelope, self.view_box())
    }

    /// Textual summary of the loaded clip.
    pub fn summary(&self) -> Option<AudioSummary> {
        self.buffer
            .as_ref()
            .map(|buffer| AudioSummary::new(buffer, &self.envelope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::tests::wav_fixture;
    use crate::utils::error::AppError;
    use parking_lot::Mutex;

    /// Sink that records every start/stop and the gain cell it was handed.
    #[derive(Default)]
    struct MockSink {
        log: Arc<Mutex<MockLog>>,
    }

    #[derive(Default)]
    struct MockLog {
        starts: usize,
        stops: usize,
        gain: Option<Arc<SharedGain>>,
    }

    impl PlaybackSink for MockSink {
        fn start(&mut self, _buffer: Arc<AudioBuffer>, gain: Arc<SharedGain>) -> AppResult<()> {
            let mut log = self.log.lock();
            log.starts += 1;
            log.gain = Some(gain);
            Ok(())
        }

        fn stop(&mut self) {
            self.log.lock().stops += 1;
        }
    }

    fn analyzer_with_mock() -> (AudioAnalyzer, Arc<Mutex<MockLog>>) {
        let sink = MockSink::default();
        let log = Arc::clone(&sink.log);
        (AudioAnalyzer::new(Box::new(sink)), log)
    }

    fn silent_clip() -> Vec<u8> {
        // Mono 8000 Hz, 2 seconds of silence
        wav_fixture(8000, &[vec![0.0; 16_000]])
    }

    #[test]
    fn test_load_derives_envelope_and_summary() {
        let (mut analyzer, _) = analyzer_with_mock();
        analyzer.load_audio(silent_clip()).unwrap();

        assert_eq!(analyzer.sample_rate(), 8000);
        assert_eq!(analyzer.envelope().len(), 8000);
        assert_eq!(analyzer.envelope().flat_len(), 16_000);
        assert!(analyzer
            .envelope()
            .iter()
            .all(|pair| pair.max == 0.0 && pair.min == 0.0));

        let summary = analyzer.summary().unwrap();
        assert_eq!(summary.total_samples, 16_000);
        assert_eq!(summary.compressed_peaks, 16_000);
        assert_eq!(summary.duration_secs, 2);
        assert_eq!(analyzer.view_box().to_string(), "0 -1 8000 2");
    }

    #[test]
    fn test_reset_returns_to_unloaded_baseline() {
        let (mut analyzer, _) = analyzer_with_mock();
        analyzer.load_audio(silent_clip()).unwrap();
        analyzer.play().unwrap();

        analyzer.reset();

        assert_eq!(analyzer.sample_rate(), 0);
        assert!(analyzer.envelope().is_empty());
        assert!(!analyzer.is_playing());
        assert!(analyzer.summary().is_none());
        assert_eq!(analyzer.view_box().to_string(), "0 -1 0 2");
        assert_eq!(analyzer.gain(), None);
    }

    #[test]
    fn test_play_is_idempotent_while_playing() {
        let (mut analyzer, log) = analyzer_with_mock();
        analyzer.load_audio(silent_clip()).unwrap();

        analyzer.play().unwrap();
        analyzer.play().unwrap();

        assert!(analyzer.is_playing());
        assert_eq!(log.lock().starts, 1);
    }

    #[test]
    fn test_play_without_clip_is_a_noop() {
        let (mut analyzer, log) = analyzer_with_mock();
        analyzer.play().unwrap();

        assert!(!analyzer.is_playing());
        assert_eq!(log.lock().starts, 0);
    }

    #[test]
    fn test_stop_while_idle_is_a_noop() {
        let (mut analyzer, log) = analyzer_with_mock();
        analyzer.load_audio(silent_clip()).unwrap();
        let stops_after_load = log.lock().stops;

        analyzer.stop();

        assert!(!analyzer.is_playing());
        assert_eq!(log.lock().stops, stops_after_load);
    }

    #[test]
    fn test_play_works_again_after_stop() {
        // The output route is recreated on every idle-to-playing transition
        let (mut analyzer, log) = analyzer_with_mock();
        analyzer.load_audio(silent_clip()).unwrap();

        analyzer.play().unwrap();
        analyzer.stop();
        analyzer.play().unwrap();

        assert!(analyzer.is_playing());
        assert_eq!(log.lock().starts, 2);
    }

    #[test]
    fn test_set_gain_last_write_wins() {
        let (mut analyzer, log) = analyzer_with_mock();
        analyzer.load_audio(silent_clip()).unwrap();
        analyzer.play().unwrap();

        analyzer.set_gain(0.5);
        analyzer.set_gain(1.7);

        assert_eq!(analyzer.gain(), Some(1.7));
        // The cell handed to the sink sees the same value live
        let live = log.lock().gain.as_ref().unwrap().get();
        assert_eq!(live, 1.7);
    }

    #[test]
    fn test_set_gain_without_clip_is_a_noop() {
        let (mut analyzer, _) = analyzer_with_mock();
        analyzer.set_gain(0.5);
        assert_eq!(analyzer.gain(), None);
    }

    #[test]
    fn test_gain_resets_to_neutral_on_load() {
        let (mut analyzer, _) = analyzer_with_mock();
        analyzer.load_audio(silent_clip()).unwrap();
        analyzer.set_gain(0.25);

        analyzer.load_audio(silent_clip()).unwrap();
        assert_eq!(analyzer.gain(), Some(1.0));
    }

    #[test]
    fn test_failed_decode_keeps_prior_clip_playable() {
        let (mut analyzer, log) = analyzer_with_mock();
        analyzer.load_audio(silent_clip()).unwrap();

        let err = analyzer
            .load_audio(b"definitely not audio".to_vec())
            .unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));

        // Prior clip is untouched and still playable
        assert_eq!(analyzer.sample_rate(), 8000);
        assert_eq!(analyzer.envelope().len(), 8000);
        analyzer.play().unwrap();
        assert!(analyzer.is_playing());
        assert_eq!(log.lock().starts, 1);
    }

    #[test]
    fn test_new_load_stops_active_playback() {
        let (mut analyzer, log) = analyzer_with_mock();
        analyzer.load_audio(silent_clip()).unwrap();
        analyzer.play().unwrap();

        analyzer.load_audio(silent_clip()).unwrap();

        assert!(!analyzer.is_playing());
        assert!(log.lock().stops >= 1);
    }
}
