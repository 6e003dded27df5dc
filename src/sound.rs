use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};

use crate::error::RunError;

const TONE_HZ: f32 = 440.0;
const AMPLITUDE: f32 = 0.2;

/// A 440 Hz tone that plays while the sound timer is non-zero.
///
/// The output stream runs for the whole session; `set_active` only flips the
/// gate the audio callback reads.
pub struct Sound {
    _stream: cpal::Stream,
    gate: Arc<AtomicBool>,
}

impl Sound {
    pub fn new() -> Result<Self, RunError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(RunError::NoOutputDevice)?;
        let mut supported_configs_range = device.supported_output_configs()?;
        let supported_config = supported_configs_range
            .next()
            .ok_or(RunError::NoOutputDevice)?
            .with_max_sample_rate();
        let sample_format = supported_config.sample_format();
        let config: cpal::StreamConfig = supported_config.into();
        let gate = Arc::new(AtomicBool::new(false));

        let stream = match sample_format {
            cpal::SampleFormat::I8 => run::<i8>(&device, &config, gate.clone()),
            cpal::SampleFormat::I16 => run::<i16>(&device, &config, gate.clone()),
            cpal::SampleFormat::I32 => run::<i32>(&device, &config, gate.clone()),
            cpal::SampleFormat::I64 => run::<i64>(&device, &config, gate.clone()),
            cpal::SampleFormat::U8 => run::<u8>(&device, &config, gate.clone()),
            cpal::SampleFormat::U16 => run::<u16>(&device, &config, gate.clone()),
            cpal::SampleFormat::U32 => run::<u32>(&device, &config, gate.clone()),
            cpal::SampleFormat::U64 => run::<u64>(&device, &config, gate.clone()),
            cpal::SampleFormat::F32 => run::<f32>(&device, &config, gate.clone()),
            cpal::SampleFormat::F64 => run::<f64>(&device, &config, gate.clone()),
            sample_format => {
                return Err(RunError::UnsupportedSampleFormat(sample_format.to_string()))
            }
        }?;
        stream.play()?;

        Ok(Self {
            _stream: stream,
            gate,
        })
    }

    pub fn set_active(&self, active: bool) {
        self.gate.store(active, Ordering::Relaxed);
    }
}

fn run<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    gate: Arc<AtomicBool>,
) -> Result<cpal::Stream, RunError>
where
    T: SizedSample + FromSample<f32>,
{
    let sample_rate = config.sample_rate.0 as f32;
    let channels = config.channels as usize;

    let mut oscillator = Oscillator::new(sample_rate);
    let err_fn = |err| log::error!("an error occurred on stream: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let on = gate.load(Ordering::Relaxed);
            write_data(data, channels, &mut || oscillator.next(on))
        },
        err_fn,
        None,
    )?;
    Ok(stream)
}

fn write_data<T>(output: &mut [T], channels: usize, next_sample: &mut dyn FnMut() -> f32)
where
    T: Sample + FromSample<f32>,
{
    for frame in output.chunks_mut(channels) {
        let value: T = T::from_sample(next_sample());
        for sample in frame.iter_mut() {
            *sample = value;
        }
    }
}

/// Sine source that keeps its phase while gated off, so the tone does not
/// click when it resumes mid-cycle.
struct Oscillator {
    sample_clock: f32,
    sample_rate: f32,
}

impl Oscillator {
    fn new(sample_rate: f32) -> Self {
        Self {
            sample_clock: 0.0,
            sample_rate,
        }
    }

    fn next(&mut self, on: bool) -> f32 {
        self.sample_clock = (self.sample_clock + 1.0) % self.sample_rate;
        if !on {
            return 0.0;
        }
        AMPLITUDE * (self.sample_clock * TONE_HZ * 2.0 * std::f32::consts::PI / self.sample_rate).sin()
    }
}
