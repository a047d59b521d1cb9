//! CPAL-based audio output backend.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Stream, StreamConfig};
use pg_engine::Voice;
use pg_ir::RawSample;
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::traits::{AudioBackend, AudioError, AudioOutput};

/// Commands from the control side to the stream callback.
const COMMAND_CAPACITY: usize = 16;

/// Voices handed back by the callback: one per queued command plus one that
/// ran out on its own.
const RETIRED_CAPACITY: usize = COMMAND_CAPACITY + 1;

enum Command {
    Play(Voice),
    SetRate(u32),
    Stop,
}

/// Playback state shared with the stream callback.
#[derive(Default)]
struct SharedState {
    /// Play commands pushed but not yet picked up by the callback.
    pending: AtomicUsize,
    /// The callback is rendering a voice.
    active: AtomicBool,
}

impl SharedState {
    fn is_playing(&self) -> bool {
        self.pending.load(Ordering::Acquire) > 0 || self.active.load(Ordering::Acquire)
    }
}

/// Opens outputs on the host's default sound card.
#[derive(Clone, Copy, Debug, Default)]
pub struct CpalBackend;

impl CpalBackend {
    pub fn new() -> Self {
        Self
    }
}

impl AudioBackend for CpalBackend {
    type Output = CpalOutput;

    fn open(&self) -> Result<CpalOutput, AudioError> {
        CpalOutput::new()
    }
}

/// CPAL-based audio output.
///
/// The stream callback owns the voice; the control side talks to it through
/// a lock-free command ring so the callback never blocks or allocates.
/// Voices the callback is done with come back on a second ring, so their
/// sample data is freed on the control thread.
pub struct CpalOutput {
    _stream: Stream,
    commands: HeapProd<Command>,
    retired: HeapCons<Voice>,
    state: Arc<SharedState>,
    device_rate: u32,
}

impl CpalOutput {
    /// Open the default output device and start a silent stream.
    pub fn new() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoDevice)?;

        let config = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceInit(e.to_string()))?;
        let config: StreamConfig = config.into();
        let device_rate = config.sample_rate.0;
        let channels = config.channels as usize;

        let rb = HeapRb::<Command>::new(COMMAND_CAPACITY);
        let (commands, mut consumer) = rb.split();
        let (mut retire, retired) = HeapRb::<Voice>::new(RETIRED_CAPACITY).split();
        let state = Arc::new(SharedState::default());
        let shared = state.clone();
        let mut voice: Option<Voice> = None;

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    drain_commands(&mut consumer, &mut retire, &mut voice, &shared);

                    for chunk in data.chunks_mut(channels) {
                        let frame = match voice.as_mut() {
                            Some(v) => v.render_frame(),
                            None => pg_engine::Frame::silence(),
                        };
                        for (i, sample) in chunk.iter_mut().enumerate() {
                            *sample = match i {
                                0 => frame.left_f32(),
                                1 => frame.right_f32(),
                                _ => 0.0,
                            };
                        }
                    }

                    if voice.as_ref().is_some_and(|v| !v.is_playing()) {
                        retire_voice(&mut retire, voice.take());
                        shared.active.store(false, Ordering::Release);
                    }
                },
                |err| log::error!("audio stream error: {}", err),
                None,
            )
            .map_err(|e| AudioError::StreamCreate(e.to_string()))?;

        stream.play().map_err(|e| AudioError::Playback(e.to_string()))?;
        log::debug!("opened cpal output at {} Hz, {} channels", device_rate, channels);

        Ok(Self {
            _stream: stream,
            commands,
            retired,
            state,
            device_rate,
        })
    }

    /// Device frame rate.
    pub fn device_rate(&self) -> u32 {
        self.device_rate
    }

    /// Drop the voices the callback has finished with.
    fn collect_retired(&mut self) {
        while self.retired.try_pop().is_some() {}
    }
}

/// Hand a voice back to the control side. Only a full ring drops it here.
fn retire_voice(retire: &mut HeapProd<Voice>, voice: Option<Voice>) {
    if let Some(v) = voice {
        let _ = retire.try_push(v);
    }
}

fn drain_commands(
    consumer: &mut HeapCons<Command>,
    retire: &mut HeapProd<Voice>,
    voice: &mut Option<Voice>,
    shared: &SharedState,
) {
    while let Some(cmd) = consumer.try_pop() {
        match cmd {
            Command::Play(v) => {
                retire_voice(retire, voice.replace(v));
                shared.active.store(true, Ordering::Release);
                shared.pending.fetch_sub(1, Ordering::AcqRel);
            }
            Command::SetRate(rate) => {
                if let Some(v) = voice.as_mut() {
                    v.set_sample_rate(rate);
                }
            }
            Command::Stop => {
                retire_voice(retire, voice.take());
                shared.active.store(false, Ordering::Release);
            }
        }
    }
}

impl AudioOutput for CpalOutput {
    fn play(&mut self, sample: &RawSample, looping: bool) -> Result<(), AudioError> {
        self.collect_retired();
        let voice = Voice::new(sample.clone(), self.device_rate, looping);
        self.state.pending.fetch_add(1, Ordering::AcqRel);
        if self.commands.try_push(Command::Play(voice)).is_err() {
            self.state.pending.fetch_sub(1, Ordering::AcqRel);
            return Err(AudioError::Playback("command queue full".into()));
        }
        Ok(())
    }

    fn set_sample_rate(&mut self, sample_rate: u32) {
        self.collect_retired();
        if self.commands.try_push(Command::SetRate(sample_rate)).is_err() {
            log::warn!("dropped rate change to {} Hz: command queue full", sample_rate);
        }
    }

    fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    fn stop(&mut self) {
        self.collect_retired();
        if self.commands.try_push(Command::Stop).is_err() {
            log::warn!("dropped stop: command queue full");
        }
        self.state.active.store(false, Ordering::Release);
    }
}

impl Drop for CpalOutput {
    fn drop(&mut self) {
        self.collect_retired();
        log::debug!("released cpal output");
    }
}
