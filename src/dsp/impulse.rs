/// Reverb tail length in seconds.
pub const ROOM_SECONDS: f32 = 2.0;

const DAMPING_HZ: f32 = 6_000.0;

/// Synthesize a room impulse response: white noise through a one-pole
/// lowpass, faded out exponentially (-60 dB at the end) and normalized to
/// unit energy.
pub fn room_impulse(sample_rate: f32, seconds: f32, rng: &mut fastrand::Rng) -> Vec<f32> {
    let len = (sample_rate * seconds).max(1.0) as usize;
    let alpha = 1.0 - (-std::f32::consts::TAU * DAMPING_HZ / sample_rate).exp();
    let decay = 0.001f32.ln() / len as f32;

    let mut smoothed = 0.0f32;
    let mut impulse: Vec<f32> = (0..len)
        .map(|i| {
            let noise = rng.f32() * 2.0 - 1.0;
            smoothed += alpha * (noise - smoothed);
            smoothed * (decay * i as f32).exp()
        })
        .collect();

    let energy = impulse.iter().map(|s| s * s).sum::<f32>().sqrt();
    if energy > 0.0 {
        for sample in &mut impulse {
            *sample /= energy;
        }
    }

    impulse
}
