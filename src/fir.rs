/*! Finite impulse response filtering and polyphase interpolation.

The interpolator upsamples complex baseband by an integer factor L
using a windowed sinc low pass. Conceptually: stuff L-1 zeros between
input samples, then filter. Doing that literally wastes L-1 out of
every L multiplies on zeros, so the tap vector is split into L
sub-filters that each run at the input rate, one output sample per
sub-filter per input sample.
*/
use crate::block::{Block, BlockRet};
use crate::stream::{new_streamp, Streamp};
use crate::window::WindowType;
use crate::{Complex, Float, Result};

/// Max input samples consumed per work call, to bound chunk sizes
/// through the rest of the pipeline.
const CHUNK: usize = 4096;

/// Finite impulse response filter kernel.
///
/// Taps are real; the sample type is anything that can be scaled by
/// a tap and accumulated, i.e. floats and complex samples.
pub struct Fir {
    taps: Vec<Float>,
}

impl Fir {
    /// Create new FIR. Taps are stored reversed so `filter` is a
    /// plain forward dot product.
    pub fn new(taps: &[Float]) -> Self {
        Self {
            taps: taps.iter().copied().rev().collect(),
        }
    }

    /// Number of taps.
    pub fn ntaps(&self) -> usize {
        self.taps.len()
    }

    /// Run the filter once against a window of `ntaps` input samples.
    pub fn filter<T>(&self, input: &[T]) -> T
    where
        T: Copy + Default + std::ops::Add<T, Output = T> + std::ops::Mul<Float, Output = T>,
    {
        input
            .iter()
            .take(self.taps.len())
            .enumerate()
            .fold(T::default(), |acc, (i, x)| acc + *x * self.taps[i])
    }
}

fn compute_ntaps(samp_rate: Float, twidth: Float, window_type: &WindowType) -> usize {
    let a = window_type.max_attenuation();
    let t = (a * samp_rate / (22.0 * twidth)) as usize;
    if (t & 1) == 0 {
        t + 1
    } else {
        t
    }
}

/// Create taps for a low pass filter, unity gain at DC.
pub fn low_pass(
    samp_rate: Float,
    cutoff: Float,
    twidth: Float,
    window_type: &WindowType,
) -> Vec<Float> {
    let pi = std::f64::consts::PI as Float;
    let ntaps = compute_ntaps(samp_rate, twidth, window_type);
    let window = window_type.make_window(ntaps);
    let m = (ntaps - 1) / 2;
    let fwt0 = 2.0 * pi * cutoff / samp_rate;
    let taps: Vec<Float> = window
        .0
        .iter()
        .enumerate()
        .map(|(nm, win)| {
            let n = nm as i64 - m as i64;
            let nf = n as Float;
            if n == 0 {
                fwt0 / pi * win
            } else {
                ((nf * fwt0).sin() / (nf * pi)) * win
            }
        })
        .collect();
    let gain = {
        let mut fmax = taps[m];
        for n in 1..=m {
            fmax += 2.0 * taps[n + m];
        }
        1.0 / fmax
    };
    taps.into_iter().map(|t| t * gain).collect()
}

/// Design the anti-imaging filter for an ×`l` interpolator running at
/// `input_rate`.
///
/// The transition band is centered at 0.45× the input Nyquist image
/// spacing: passband out to 0.4, stopband from 0.5, in units of the
/// input rate. Gain is `l` to make up for the energy the conceptual
/// zero stuffing removes.
pub fn interpolation_taps(l: usize, input_rate: Float) -> Vec<Float> {
    let out_rate = input_rate * l as Float;
    let cutoff = 0.45 * input_rate;
    let twidth = 0.1 * input_rate;
    low_pass(out_rate, cutoff, twidth, &WindowType::Hamming)
        .into_iter()
        .map(|t| t * l as Float)
        .collect()
}

/// Polyphase FIR interpolator block, complex in, complex out, ×L.
///
/// The delay line is primed with zeros, so every consumed input
/// sample yields exactly L output samples and the total output length
/// is exactly L times the input length.
pub struct Interpolator {
    src: Streamp<Complex>,
    dst: Streamp<Complex>,

    l: usize,
    branches: Vec<Fir>,
    history: Vec<Complex>,
}

impl Interpolator {
    /// Create an interpolator from an explicit tap vector.
    ///
    /// Taps are zero padded to a multiple of `l` and decomposed into
    /// `l` sub-filters of `taps.len()/l` taps each.
    pub fn new(src: Streamp<Complex>, l: usize, mut taps: Vec<Float>) -> Self {
        if taps.len() % l != 0 {
            taps.resize(taps.len() + l - taps.len() % l, 0.0);
        }
        let m = taps.len() / l;
        let branches = (0..l)
            .map(|j| {
                let branch: Vec<Float> = (0..m).map(|k| taps[k * l + j]).collect();
                Fir::new(&branch)
            })
            .collect();
        Self {
            src,
            dst: new_streamp(),
            l,
            branches,
            history: vec![Complex::default(); m - 1],
        }
    }

    /// Return the output stream.
    pub fn out(&self) -> Streamp<Complex> {
        self.dst.clone()
    }

    fn m(&self) -> usize {
        self.history.len() + 1
    }
}

impl Block for Interpolator {
    fn block_name(&self) -> &'static str {
        "Interpolator"
    }
    fn work(&mut self) -> Result<BlockRet> {
        let ibind = self.src.clone();
        let obind = self.dst.clone();
        let mut input = ibind.borrow_mut();
        let mut out = obind.borrow_mut();
        let n = [input.available(), out.capacity() / self.l, CHUNK]
            .into_iter()
            .min()
            .unwrap_or(0);
        if n == 0 {
            return if input.finished() {
                out.set_eof();
                Ok(BlockRet::EOF)
            } else {
                Ok(BlockRet::Noop)
            };
        }
        let m = self.m();
        let mut buf = Vec::with_capacity(m - 1 + n);
        buf.extend_from_slice(&self.history);
        buf.extend(input.iter().take(n).copied());
        for i in 0..n {
            let win = &buf[i..i + m];
            for branch in &self.branches {
                out.push(branch.filter(win));
            }
        }
        self.history.copy_from_slice(&buf[buf.len() - (m - 1)..]);
        input.consume(n);
        Ok(BlockRet::Ok)
    }
}
