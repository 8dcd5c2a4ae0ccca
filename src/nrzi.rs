/*! NRZI — Non return to zero, inverted.

<https://en.wikipedia.org/wiki/Non-return-to-zero>

"NRZI" is actually ambiguous as to which is zero and which is one.
This code is going with NRZI-S, meaning a toggle is zero, and constant
is one, because that's what's done by AX.25 Bell 202.
*/
use crate::block::{Block, BlockRet};
use crate::stream::{new_streamp, Streamp};
use crate::Result;

/// NRZI encoder.
///
/// Input and output are bits as `u8` 0/1. The output symbol is the
/// line level after applying the input bit. Initial level is high.
pub struct NrziEncode {
    level: u8,
    src: Streamp<u8>,
    dst: Streamp<u8>,
}

impl NrziEncode {
    /// Create a new NRZI encoder block.
    pub fn new(src: Streamp<u8>) -> Self {
        Self {
            src,
            dst: new_streamp(),
            level: 1,
        }
    }

    /// Return the output stream.
    pub fn out(&self) -> Streamp<u8> {
        self.dst.clone()
    }

    fn process_one(&mut self, bit: u8) -> u8 {
        if bit == 0 {
            self.level ^= 1;
        }
        self.level
    }
}

impl Block for NrziEncode {
    fn block_name(&self) -> &'static str {
        "NrziEncode"
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
        let symbols: Vec<u8> = input.iter().take(n).copied().collect();
        out.write(symbols.into_iter().map(|b| self.process_one(b)));
        input.consume(n);
        Ok(BlockRet::Ok)
    }
}
