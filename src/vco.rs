/*! Voltage controlled oscillator.

IOW an FM modulator: audio in, complex baseband out.

Each input sample advances the oscillator phase by `sensitivity`
radians per unit of amplitude, and the output is the unit phasor at
the accumulated phase. The phase carries across calls, so a frame can
be streamed through in chunks without discontinuities at the seams.
*/
use crate::block::{Block, BlockRet};
use crate::stream::{new_streamp, Streamp};
use crate::{Complex, Float, Result};

const PI: f64 = std::f64::consts::PI;

/// Voltage controlled oscillator block.
pub struct Vco {
    src: Streamp<Float>,
    dst: Streamp<Complex>,

    k: f64,
    phase: f64,
}

impl Vco {
    /// Create a new VCO.
    ///
    /// `k` is the sensitivity in radians per sample per unit
    /// amplitude. For FM with deviation `dev` at sample rate `rate`,
    /// that's `2π·dev/rate`, see [`Vco::sensitivity`].
    pub fn new(src: Streamp<Float>, k: f64) -> Self {
        Self {
            src,
            dst: new_streamp(),
            k,
            phase: 0.0,
        }
    }

    /// Sensitivity for a peak deviation in Hz at a sample rate.
    pub fn sensitivity(deviation: f64, sample_rate: f64) -> f64 {
        2.0 * PI * deviation / sample_rate
    }

    /// Return the output stream.
    pub fn out(&self) -> Streamp<Complex> {
        self.dst.clone()
    }

    fn process_one(&mut self, a: Float) -> Complex {
        self.phase += self.k * f64::from(a);
        while self.phase > PI {
            self.phase -= 2.0 * PI;
        }
        while self.phase <= -PI {
            self.phase += 2.0 * PI;
        }
        Complex::new(self.phase.cos() as Float, self.phase.sin() as Float)
    }
}

impl Block for Vco {
    fn block_name(&self) -> &'static str {
        "Vco"
    }
    fn work(&mut self) -> Result<BlockRet> {
        let ibind = self.src.clone();
        let obind = self.dst.clone();
        let mut input = ibind.borrow_mut();
        let mut out = obind.borrow_mut();
        let n = std::cmp::min(input.available(), out.capacity());
        if n == 0 {
            return if input.finished() {
                out.set_eof();
                Ok(BlockRet::EOF)
            } else {
                Ok(BlockRet::Noop)
            };
        }
        let samples: Vec<Float> = input.iter().take(n).copied().collect();
        out.write(samples.into_iter().map(|s| self.process_one(s)));
        input.consume(n);
        Ok(BlockRet::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::new_streamp;
    use crate::tests::assert_almost_equal_complex;

    #[test]
    fn unit_magnitude_and_phase_step() {
        let mut vco = Vco::new(new_streamp(), Vco::sensitivity(5000.0, 48000.0));
        let mut prev = Complex::new(1.0, 0.0);
        let k = Vco::sensitivity(5000.0, 48000.0) as Float;
        for n in 0..1000 {
            let x = ((n as Float) * 0.1).sin();
            let s = vco.process_one(x);
            assert!((s.norm() - 1.0).abs() < 1e-5);
            let step = (s * prev.conj()).arg().abs();
            assert!(step <= k * x.abs() + 1e-5, "step {step} at sample {n}");
            prev = s;
        }
    }

    #[test]
    fn zero_input_holds_phase() {
        let mut vco = Vco::new(new_streamp(), 1.0);
        let got: Vec<Complex> = (0..3).map(|_| vco.process_one(0.0)).collect();
        assert_almost_equal_complex(
            &got,
            &[
                Complex::new(1.0, 0.0),
                Complex::new(1.0, 0.0),
                Complex::new(1.0, 0.0),
            ],
        );
    }

    #[test]
    fn phase_carries_across_chunks() {
        // One long run must equal the same input split in two.
        let input: Vec<Float> = (0..100).map(|n| ((n as Float) * 0.3).cos()).collect();
        let k = Vco::sensitivity(5000.0, 48000.0);

        let mut one = Vco::new(new_streamp(), k);
        let whole: Vec<Complex> = input.iter().map(|x| one.process_one(*x)).collect();

        let mut two = Vco::new(new_streamp(), k);
        let mut split: Vec<Complex> = input[..37].iter().map(|x| two.process_one(*x)).collect();
        split.extend(input[37..].iter().map(|x| two.process_one(*x)));

        assert_almost_equal_complex(&whole, &split);
    }
}
