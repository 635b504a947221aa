use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

/*
Partitioned Convolution
=======================

Convolving a 2 second impulse response directly costs ~96k multiplies per
output sample. Splitting it into equal partitions of B samples and working in
the frequency domain brings that down to a handful of FFTs per block.

    impulse response h:  [ h0 | h1 | h2 | ... | hP-1 ]   each B samples

Each partition's spectrum H_k is computed once (zero padded to 2B). Then for
every block of B input samples:

  1. window = [previous B inputs | new B inputs]      (overlap-save)
  2. X_0 = FFT(window), pushed onto a ring of recent input spectra
  3. Y   = Σ_k X_k · H_k            X_k is the spectrum from k blocks ago
  4. y   = IFFT(Y), keep the last B samples

The first half of the IFFT output is wrapped-around garbage and is thrown
away; the second half is exactly the linear convolution for the new block.

Latency is one block: samples go in, and the matching output comes out B
samples later. For a reverb tail that is inaudible.
*/

pub const DEFAULT_PARTITION: usize = 512;

pub struct Convolver {
    block: usize,
    fft: Arc<dyn Fft<f32>>,
    ifft: Arc<dyn Fft<f32>>,

    /// Spectra of the impulse-response partitions.
    partitions: Vec<Vec<Complex<f32>>>,
    /// Ring of recent input spectra, newest at `history_pos`.
    history: Vec<Vec<Complex<f32>>>,
    history_pos: usize,

    window: Vec<f32>,
    output: Vec<f32>,
    fill: usize,

    spectrum: Vec<Complex<f32>>,
    accum: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl Convolver {
    /// Build a convolver for `impulse` with partitions of `block` samples.
    pub fn new(impulse: &[f32], block: usize) -> Self {
        let block = block.max(1);
        let size = block * 2;

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(size);
        let ifft = planner.plan_fft_inverse(size);

        let scratch_len = fft
            .get_inplace_scratch_len()
            .max(ifft.get_inplace_scratch_len());
        let mut scratch = vec![Complex::default(); scratch_len];

        let count = impulse.len().div_ceil(block).max(1);
        let partitions = (0..count)
            .map(|k| {
                let mut bins = vec![Complex::default(); size];
                let start = (k * block).min(impulse.len());
                let end = ((k + 1) * block).min(impulse.len());
                for (bin, &tap) in bins.iter_mut().zip(&impulse[start..end]) {
                    bin.re = tap;
                }
                fft.process_with_scratch(&mut bins, &mut scratch);
                bins
            })
            .collect();

        Self {
            block,
            fft,
            ifft,
            partitions,
            history: vec![vec![Complex::default(); size]; count],
            history_pos: 0,
            window: vec![0.0; size],
            output: vec![0.0; block],
            fill: 0,
            spectrum: vec![Complex::default(); size],
            accum: vec![Complex::default(); size],
            scratch,
        }
    }

    /// Samples of delay between input and output.
    pub fn latency(&self) -> usize {
        self.block
    }

    /// Convolve `buffer` in place. Any length is accepted.
    pub fn process(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            self.window[self.block + self.fill] = *sample;
            *sample = self.output[self.fill];
            self.fill += 1;

            if self.fill == self.block {
                self.process_block();
                self.fill = 0;
            }
        }
    }

    pub fn reset(&mut self) {
        self.window.fill(0.0);
        self.output.fill(0.0);
        for spectrum in &mut self.history {
            spectrum.fill(Complex::default());
        }
        self.fill = 0;
        self.history_pos = 0;
    }

    fn process_block(&mut self) {
        let size = self.block * 2;
        let count = self.partitions.len();

        for (bin, &s) in self.spectrum.iter_mut().zip(&self.window) {
            *bin = Complex::new(s, 0.0);
        }
        self.fft
            .process_with_scratch(&mut self.spectrum, &mut self.scratch);
        self.history[self.history_pos].copy_from_slice(&self.spectrum);

        self.accum.fill(Complex::default());
        for (k, partition) in self.partitions.iter().enumerate() {
            let input = &self.history[(self.history_pos + count - k) % count];
            for ((acc, x), h) in self.accum.iter_mut().zip(input).zip(partition) {
                *acc += x * h;
            }
        }

        self.ifft.process_with_scratch(&mut self.accum, &mut self.scratch);
        let norm = 1.0 / size as f32;
        for (out, bin) in self.output.iter_mut().zip(&self.accum[self.block..]) {
            *out = bin.re * norm;
        }

        self.window.copy_within(self.block.., 0);
        self.history_pos = (self.history_pos + 1) % count;
    }
}
