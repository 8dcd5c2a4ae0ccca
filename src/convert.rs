//! Sample format conversion.
use crate::block::{Block, BlockRet};
use crate::stream::{new_streamp, Streamp};
use crate::{Complex, Float, Result};

type ComplexS8 = num_complex::Complex<i8>;

/// Quantize unit range complex floats to interleaved-ready signed
/// 8 bit, the native TX format of e.g. a HackRF.
///
/// Each component is scaled by 127 and truncated toward zero; values
/// outside the representable range saturate instead of wrapping.
pub struct ComplexToS8 {
    src: Streamp<Complex>,
    dst: Streamp<ComplexS8>,
    scale: Float,
}

impl ComplexToS8 {
    /// Create a new quantizer block.
    pub fn new(src: Streamp<Complex>) -> Self {
        Self {
            src,
            dst: new_streamp(),
            scale: Float::from(i8::MAX),
        }
    }

    /// Return the output stream.
    pub fn out(&self) -> Streamp<ComplexS8> {
        self.dst.clone()
    }

    fn process_one(&self, s: &Complex) -> ComplexS8 {
        // `as` saturates and truncates toward zero.
        ComplexS8::new((s.re * self.scale) as i8, (s.im * self.scale) as i8)
    }
}

impl Block for ComplexToS8 {
    fn block_name(&self) -> &'static str {
        "ComplexToS8"
    }
    fn work(&mut self) -> Result<BlockRet> {
        let mut input = self.src.borrow_mut();
        let mut out = self.dst.borrow_mut();
        let n = std::cmp::min(input.available(), out.capacity());
        if n == 0 {
            return if input.finished() {
                out.set_eof();
                Ok(BlockRet::EOF)
            } else {
                Ok(BlockRet::Noop)
            };
        }
        let converted: Vec<ComplexS8> = input.iter().take(n).map(|s| self.process_one(s)).collect();
        out.write(converted);
        input.consume(n);
        Ok(BlockRet::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::new_streamp;

    #[test]
    fn scale_truncate_saturate() {
        let c = ComplexToS8::new(new_streamp());
        assert_eq!(
            c.process_one(&Complex::new(1.0, -1.0)),
            ComplexS8::new(127, -127)
        );
        assert_eq!(
            c.process_one(&Complex::new(0.5, -0.999)),
            ComplexS8::new(63, -126)
        );
        assert_eq!(c.process_one(&Complex::new(0.0, 0.0)), ComplexS8::new(0, 0));
        // Out of range saturates, no wraparound.
        assert_eq!(
            c.process_one(&Complex::new(4.0, -4.0)),
            ComplexS8::new(127, -128)
        );
    }
}
