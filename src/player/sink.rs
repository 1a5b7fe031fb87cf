//! Playback output sinks
//!
//! The [`PlaybackSink`] trait is the seam between the controller and the
//! audio backend: start playback of a decoded buffer from the beginning,
//! stop it, nothing else. The cpal-backed sink owns the live output stream
//! and is recreated fresh on every idle-to-playing transition.

use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use parking_lot::Mutex;

use crate::decoder::AudioBuffer;
use crate::utils::error::{AppError, AppResult};

/// Scalar gain multiplier shared between the controller and the audio
/// callback. Effective immediately at the current playback position.
#[derive(Debug)]
pub struct SharedGain {
    value: Mutex<f32>,
}

impl SharedGain {
    /// New gain cell, typically with the neutral 1.0 multiplier.
    pub fn new(value: f32) -> Arc<Self> {
        Arc::new(Self {
            value: Mutex::new(value),
        })
    }

    /// Replace the multiplier. Last write wins.
    pub fn set(&self, value: f32) {
        *self.value.lock() = value;
    }

    /// Current multiplier.
    pub fn get(&self) -> f32 {
        *self.value.lock()
    }
}

/// A destination for decoded audio.
pub trait PlaybackSink {
    /// Begin playback of `buffer` from its first sample, applying `gain`
    /// live. Any previously active output of this sink is discarded.
    fn start(&mut self, buffer: Arc<AudioBuffer>, gain: Arc<SharedGain>) -> AppResult<()>;

    /// Stop playback and discard the active output route. No-op when
    /// nothing is playing.
    fn stop(&mut self);
}

/// Sink backed by the system's default audio output device.
pub struct CpalSink {
    device: cpal::Device,
    stream: Option<cpal::Stream>,
}

impl CpalSink {
    /// Bind to the default output device.
    ///
    /// Fails with [`AppError::NoOutputDevice`] when the host provides no
    /// audio output at all.
    pub fn new() -> AppResult<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AppError::NoOutputDevice)?;

        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        tracing::info!("Using audio output device: {}", device_name);

        Ok(Self {
            device,
            stream: None,
        })
    }
}

impl PlaybackSink for CpalSink {
    fn start(&mut self, buffer: Arc<AudioBuffer>, gain: Arc<SharedGain>) -> AppResult<()> {
        if buffer.channel_count() == 0 {
            return Err(AppError::Stream("buffer has no channels".to_string()));
        }

        let supported = self
            .device
            .default_output_config()
            .map_err(|e| AppError::Stream(e.to_string()))?;

        let config = cpal::StreamConfig {
            channels: supported.channels(),
            sample_rate: cpal::SampleRate(buffer.sample_rate()),
            buffer_size: cpal::BufferSize::Default,
        };

        let out_channels = config.channels as usize;
        let src_channels = buffer.channel_count();
        let mut position = 0usize;

        let callback_buffer = Arc::clone(&buffer);
        let stream = self
            .device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
                    let gain_value = gain.get();
                    for frame in data.chunks_mut(out_channels) {
                        if position < callback_buffer.len() {
                            for (channel, out) in frame.iter_mut().enumerate() {
                                // Mono fans out to every output channel;
                                // extra outputs wrap around the source
                                let sample =
                                    callback_buffer.channel(channel % src_channels)[position];
                                *out = sample * gain_value;
                            }
                            position += 1;
                        } else {
                            // Past the end of the buffer, fill with silence
                            for out in frame.iter_mut() {
                                *out = 0.0;
                            }
                        }
                    }
                },
                move |err| {
                    tracing::error!("audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| AppError::Stream(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AppError::Stream(e.to_string()))?;

        tracing::debug!(
            "output stream started: {} Hz, {} channels",
            buffer.sample_rate(),
            out_channels
        );
        self.stream = Some(stream);
        Ok(())
    }

    fn stop(&mut self) {
        // Dropping the stream tears down the output route
        self.stream = None;
    }
}

/// Sink that discards audio; used for headless analysis.
#[derive(Debug, Default)]
pub struct NullSink;

impl PlaybackSink for NullSink {
    fn start(&mut self, _buffer: Arc<AudioBuffer>, _gain: Arc<SharedGain>) -> AppResult<()> {
        Ok(())
    }

    fn stop(&mut self) {}
}
