/*! Bell 202 AFSK tone synthesis.

Turns a stream of line bits into audio: 1200Hz for mark, 2200Hz for
space, 1200 baud. At 48kHz that's 40 samples per bit.

The oscillator phase runs continuously across bit boundaries. A phase
jump at a tone switch would splatter energy far outside the channel,
so the only thing that changes per bit is the per sample increment.
*/
use crate::block::{Block, BlockRet};
use crate::stream::{new_streamp, Streamp};
use crate::{Error, Float, Result};

const TAU: f64 = 2.0 * std::f64::consts::PI;

/// AFSK synthesizer block: bits in, audio samples out.
pub struct AfskSynth {
    src: Streamp<u8>,
    dst: Streamp<Float>,

    samples_per_bit: usize,
    mark_inc: f64,
    space_inc: f64,
    amplitude: Float,
    /// Which line level gets the mark tone. The Bell 202 convention
    /// for AX.25 is level high = mark.
    mark_on_high: bool,

    phase: f64,
}

impl AfskSynth {
    /// Create an AFSK synthesizer.
    ///
    /// `sample_rate` must be a multiple of `baud`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        src: Streamp<u8>,
        sample_rate: u32,
        baud: u32,
        mark_hz: Float,
        space_hz: Float,
        amplitude: Float,
        mark_on_high: bool,
    ) -> Result<Self> {
        if baud == 0 || sample_rate % baud != 0 {
            return Err(Error::InternalInvariant(format!(
                "sample rate {sample_rate} not a multiple of baud rate {baud}"
            )));
        }
        Ok(Self {
            src,
            dst: new_streamp(),
            samples_per_bit: (sample_rate / baud) as usize,
            mark_inc: TAU * f64::from(mark_hz) / f64::from(sample_rate),
            space_inc: TAU * f64::from(space_hz) / f64::from(sample_rate),
            amplitude,
            mark_on_high,
            phase: 0.0,
        })
    }

    /// Return the output stream.
    pub fn out(&self) -> Streamp<Float> {
        self.dst.clone()
    }
}

impl Block for AfskSynth {
    fn block_name(&self) -> &'static str {
        "AfskSynth"
    }
    fn work(&mut self) -> Result<BlockRet> {
        // Bindings, since the borrow checker won't let us touch
        // `self.phase` while borrowing `self.src` and `self.dst`.
        let ibind = self.src.clone();
        let obind = self.dst.clone();
        let mut input = ibind.borrow_mut();
        let mut out = obind.borrow_mut();
        let nbits = std::cmp::min(input.available(), out.capacity() / self.samples_per_bit);
        if nbits == 0 {
            return if input.finished() {
                out.set_eof();
                Ok(BlockRet::EOF)
            } else {
                Ok(BlockRet::Noop)
            };
        }
        for bit in input.iter().take(nbits) {
            let inc = if (*bit != 0) == self.mark_on_high {
                self.mark_inc
            } else {
                self.space_inc
            };
            for _ in 0..self.samples_per_bit {
                self.phase += inc;
                if self.phase > TAU {
                    self.phase -= TAU;
                }
                out.push(self.phase.sin() as Float * self.amplitude);
            }
        }
        input.consume(nbits);
        Ok(BlockRet::Ok)
    }
}
