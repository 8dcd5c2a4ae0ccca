/*! Window functions for FIR filter design.

<https://en.wikipedia.org/wiki/Window_function>
*/
use crate::Float;

const PI: Float = std::f64::consts::PI as Float;

// 0.54 is commonly used, but Hamming's paper sets it as 25/46.
const DEFAULT_HAMMING_PARM: Float = 25.0 / 46.0;

/// Window type.
pub enum WindowType {
    /// Hamming window.
    Hamming,

    /// Hamming window with a specific a0.
    HammingParm(Float),

    /// Blackman window.
    Blackman,
}

impl WindowType {
    /// Stopband attenuation in dB achievable with this window, used
    /// to size filters.
    #[must_use]
    pub fn max_attenuation(&self) -> Float {
        match self {
            WindowType::Hamming | WindowType::HammingParm(_) => 53.0,
            WindowType::Blackman => 74.0,
        }
    }

    /// Make a window of the given length.
    #[must_use]
    pub fn make_window(&self, ntaps: usize) -> Window {
        match self {
            WindowType::Hamming => hamming(ntaps, DEFAULT_HAMMING_PARM),
            WindowType::HammingParm(parm) => hamming(ntaps, *parm),
            WindowType::Blackman => blackman(ntaps),
        }
    }
}

/// Window weights.
pub struct Window(pub Vec<Float>);

/// <https://en.wikipedia.org/wiki/Window_function#Hann_and_Hamming_windows>
fn hamming(ntaps: usize, a0: Float) -> Window {
    let a1 = 1.0 - a0;
    let m = (ntaps - 1) as Float;
    Window(
        (0..ntaps)
            .map(|n| a0 - a1 * (2.0 * PI * (n as Float) / m).cos())
            .collect(),
    )
}

/// <https://en.wikipedia.org/wiki/Window_function#Blackman_window>
fn blackman(m: usize) -> Window {
    // Blackman's "not very serious proposal" magic value: 0.16.
    const A: Float = 0.16;
    let a0 = (1.0 - A) / 2.0;
    let a1 = 0.5;
    let a2 = A / 2.0;

    let mut b = Vec::with_capacity(m);
    for n in 0..m {
        let t1 = 2.0 * PI * (n as Float) / (m as Float);
        let t2 = 4.0 * PI * (n as Float) / (m as Float);
        b.push(a0 - a1 * t1.cos() + a2 * t2.cos());
    }
    Window(b)
}
