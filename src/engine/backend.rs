use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, Sample, SampleFormat, SizedSample, StreamConfig};
use tracing::{debug, info, warn};

use crate::{
    engine::bus::OutputBus,
    error::{EngineError, Result},
    MAX_BLOCK_SIZE,
};

/// Builds the output bus once the sample rate is known.
pub type BusFactory = Box<dyn FnOnce(f32) -> OutputBus + Send>;

/// Where the output bus gets pulled from.
pub trait AudioBackend: Send {
    /// Acquire the output, build the bus at its sample rate and start
    /// pulling audio from it. Returns the sample rate.
    fn start(&mut self, make_bus: BusFactory) -> Result<f32>;
}

/// The system's default output device, via cpal.
///
/// cpal streams are not `Send` on every platform, so the stream is opened,
/// played and finally dropped on a dedicated thread.
#[derive(Default)]
pub struct CpalBackend {
    thread: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl CpalBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioBackend for CpalBackend {
    fn start(&mut self, make_bus: BusFactory) -> Result<f32> {
        let (ready_tx, ready_rx) = mpsc::channel::<Result<f32>>();
        let shutdown = Arc::clone(&self.shutdown);

        let handle = thread::Builder::new()
            .name("chordwise-audio".into())
            .spawn(move || {
                let stream = match open_stream(make_bus) {
                    Ok((stream, sample_rate)) => {
                        let _ = ready_tx.send(Ok(sample_rate));
                        stream
                    }
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };

                while !shutdown.load(Ordering::Acquire) {
                    thread::park();
                }
                drop(stream);
                debug!("audio output closed");
            })
            .map_err(|e| EngineError::Unavailable(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(sample_rate)) => {
                self.thread = Some(handle);
                Ok(sample_rate)
            }
            Ok(Err(err)) => {
                let _ = handle.join();
                Err(err)
            }
            Err(_) => {
                let _ = handle.join();
                Err(EngineError::OutputThread)
            }
        }
    }
}

impl Drop for CpalBackend {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.thread.take() {
            handle.thread().unpark();
            let _ = handle.join();
        }
    }
}

fn open_stream(make_bus: BusFactory) -> Result<(cpal::Stream, f32)> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or(EngineError::NoOutputDevice)?;
    let supported = device.default_output_config()?;

    let sample_rate = checked_sample_rate(supported.sample_rate().0 as f32)?;
    let channels = supported.channels() as usize;
    let format = supported.sample_format();
    let config: StreamConfig = supported.into();

    info!(
        device = %device.name().unwrap_or_default(),
        sample_rate,
        channels,
        ?format,
        "opening audio output"
    );

    let bus = make_bus(sample_rate);
    let stream = match format {
        SampleFormat::F32 => build_stream::<f32>(&device, &config, channels, bus)?,
        SampleFormat::I16 => build_stream::<i16>(&device, &config, channels, bus)?,
        SampleFormat::U16 => build_stream::<u16>(&device, &config, channels, bus)?,
        other => return Err(EngineError::UnsupportedFormat(format!("{other:?}"))),
    };
    stream.play()?;

    Ok((stream, sample_rate))
}

/// Reject a rate no bus can run at, before anything is built for it.
fn checked_sample_rate(sample_rate: f32) -> Result<f32> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(sample_rate)
    } else {
        Err(EngineError::Unavailable(format!(
            "invalid sample rate {sample_rate}"
        )))
    }
}

fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    channels: usize,
    mut bus: OutputBus,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32> + Send + 'static,
{
    let channels = channels.max(1);
    let mut mono = vec![0.0f32; MAX_BLOCK_SIZE];

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            for chunk in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
                let frames = chunk.len() / channels;
                let block = &mut mono[..frames];
                bus.render(block);

                for (frame, sample) in chunk.chunks_mut(channels).zip(block.iter()) {
                    let value = T::from_sample(*sample);
                    frame.fill(value);
                }
            }
        },
        |err| warn!(%err, "audio output stream error"),
        None,
    )?;

    Ok(stream)
}

/// Renders on demand instead of from a device callback.
///
/// Clones share the same bus, so a test can hand one clone to the engine
/// and pull audio through another.
#[derive(Clone)]
pub struct OfflineBackend {
    sample_rate: f32,
    bus: Arc<Mutex<Option<OutputBus>>>,
    starts: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
}

impl OfflineBackend {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            bus: Arc::new(Mutex::new(None)),
            starts: Arc::new(AtomicUsize::new(0)),
            fail: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make the next `start` calls fail, as if no device were present.
    pub fn fail_next_start(&self, fail: bool) {
        self.fail.store(fail, Ordering::Release);
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Successful `start` calls so far.
    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::Acquire)
    }

    pub fn is_running(&self) -> bool {
        self.bus
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Render `frames` mono frames. Silence if the bus was never started.
    pub fn render(&self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0; frames];
        if let Some(bus) = self
            .bus
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_mut()
        {
            for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
                bus.render(chunk);
            }
        }
        out
    }

    pub fn render_seconds(&self, seconds: f32) -> Vec<f32> {
        self.render((seconds * self.sample_rate).round().max(0.0) as usize)
    }
}

impl AudioBackend for OfflineBackend {
    fn start(&mut self, make_bus: BusFactory) -> Result<f32> {
        if self.fail.load(Ordering::Acquire) {
            return Err(EngineError::NoOutputDevice);
        }

        let sample_rate = checked_sample_rate(self.sample_rate)?;
        let bus = make_bus(sample_rate);
        *self.bus.lock().unwrap_or_else(PoisonError::into_inner) = Some(bus);
        self.starts.fetch_add(1, Ordering::AcqRel);
        Ok(sample_rate)
    }
}
