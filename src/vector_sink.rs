//! Collect a stream into a vector.
//!
//! Mostly useful for tests and debugging.
use std::cell::RefCell;
use std::rc::Rc;

use crate::block::{Block, BlockRet};
use crate::stream::Streamp;
use crate::Result;

/// Collect everything from the input stream into a shared vector.
pub struct VectorSink<T> {
    src: Streamp<T>,
    data: Rc<RefCell<Vec<T>>>,
}

impl<T: Copy> VectorSink<T> {
    /// Create a new Vector Sink block.
    pub fn new(src: Streamp<T>) -> Self {
        Self {
            src,
            data: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Shared handle to the collected samples.
    ///
    /// Valid to read after the graph has run.
    pub fn data(&self) -> Rc<RefCell<Vec<T>>> {
        self.data.clone()
    }
}

impl<T: Copy> Block for VectorSink<T> {
    fn block_name(&self) -> &'static str {
        "VectorSink"
    }
    fn work(&mut self) -> Result<BlockRet> {
        let mut input = self.src.borrow_mut();
        if input.is_empty() {
            return if input.eof() {
                Ok(BlockRet::EOF)
            } else {
                Ok(BlockRet::Noop)
            };
        }
        let n = input.available();
        self.data.borrow_mut().extend(input.iter().copied());
        input.consume(n);
        Ok(BlockRet::Ok)
    }
}
