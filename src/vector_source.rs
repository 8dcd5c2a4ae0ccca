//! Generate values from a fixed vector.
use crate::block::{Block, BlockRet};
use crate::stream::{new_streamp, Streamp};
use crate::Result;

/// Generate values from a fixed vector, then EOF.
pub struct VectorSource<T> {
    data: Vec<T>,
    pos: usize,
    dst: Streamp<T>,
}

impl<T: Copy> VectorSource<T> {
    /// Create new Vector Source block.
    pub fn new(data: Vec<T>) -> Self {
        Self {
            data,
            pos: 0,
            dst: new_streamp(),
        }
    }

    /// Return the output stream.
    pub fn out(&self) -> Streamp<T> {
        self.dst.clone()
    }
}

impl<T: Copy> Block for VectorSource<T> {
    fn block_name(&self) -> &'static str {
        "VectorSource"
    }
    fn work(&mut self) -> Result<BlockRet> {
        let obind = self.dst.clone();
        let mut out = obind.borrow_mut();
        let n = std::cmp::min(out.capacity(), self.data.len() - self.pos);
        if n == 0 && self.pos < self.data.len() {
            return Ok(BlockRet::Noop);
        }
        out.write_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        if self.pos == self.data.len() {
            out.set_eof();
            return Ok(BlockRet::EOF);
        }
        Ok(BlockRet::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_all_then_eof() -> Result<()> {
        let mut src = VectorSource::new(vec![1u32, 2, 3]);
        let out = src.out();
        assert!(matches!(src.work()?, BlockRet::EOF));
        let got: Vec<u32> = out.borrow().iter().copied().collect();
        assert_eq!(got, vec![1, 2, 3]);
        assert!(out.borrow().eof());
        Ok(())
    }
}
