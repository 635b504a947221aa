use crate::theory::note::index_to_frequency;

/// Context passed to graph nodes during rendering.
///
/// - sample_rate: output sample rate (e.g. 48000.0)
/// - frequency: pitch of the voice in Hz
/// - velocity: intensity, 0.0 to 1.0
/// - time: seconds since the voice started sounding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub frequency: f32,
    pub velocity: f32,
    pub time: f64,
}

impl RenderCtx {
    /// Context for a note index (A4 = 69 = 440 Hz).
    pub fn from_note(sample_rate: f32, note: i32, velocity: f32) -> Self {
        Self::from_freq(sample_rate, index_to_frequency(note), velocity)
    }

    /// Context for a fixed frequency (metronome clicks, LFOs).
    pub fn from_freq(sample_rate: f32, frequency: f32, velocity: f32) -> Self {
        Self {
            sample_rate,
            frequency,
            velocity,
            time: 0.0,
        }
    }
}

/// Nodes whose parameters can be driven by a modulation source.
pub trait Modulatable: Send {
    type Param: Copy + Send;

    fn get_param(&self, param: Self::Param) -> f32;

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32);
}

/// Core trait for audio processing graph nodes.
///
/// Nodes render blocks of samples and respond to the voice's gate.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Gate high. Passthrough nodes ignore it.
    fn note_on(&mut self, _ctx: &RenderCtx) {}

    /// Gate low. Passthrough nodes ignore it.
    fn note_off(&mut self, _ctx: &RenderCtx) {}

    fn get_envelope_level(&self) -> Option<f32> {
        None
    }

    /// Whether this node can still make sound.
    ///
    /// The output bus drops released voices once this turns false.
    fn is_active(&self) -> bool {
        true
    }
}

impl GraphNode for Box<dyn GraphNode> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render_block(out, ctx)
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        (**self).note_on(ctx)
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        (**self).note_off(ctx)
    }

    fn get_envelope_level(&self) -> Option<f32> {
        (**self).get_envelope_level()
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}
