//! Arbitrary writer sink.
use std::cell::Cell;
use std::io::Write;
use std::rc::Rc;

use crate::block::{Block, BlockRet};
use crate::stream::Streamp;
use crate::{Result, Sample};

/// Serialize at most this many samples per work call.
const MAX_BATCH: usize = 16384;

/// Sink writing serialized samples to anything `Write`.
///
/// Samples are serialized in stream order; the byte stream is the
/// plain concatenation of `Sample::serialize` outputs.
pub struct WriterSink<T> {
    src: Streamp<T>,
    writer: Box<dyn Write>,
    written: Rc<Cell<u64>>,
}

impl<T: Sample + Copy> WriterSink<T> {
    /// Create a new writer sink.
    pub fn new<W: Write + 'static>(src: Streamp<T>, writer: W) -> Self {
        Self {
            src,
            writer: Box::new(writer),
            written: Rc::new(Cell::new(0)),
        }
    }

    /// Shared byte counter, readable after the graph has run.
    pub fn written(&self) -> Rc<Cell<u64>> {
        self.written.clone()
    }
}

impl<T: Sample + Copy> Block for WriterSink<T> {
    fn block_name(&self) -> &'static str {
        "WriterSink"
    }
    fn work(&mut self) -> Result<BlockRet> {
        let ibind = self.src.clone();
        let mut input = ibind.borrow_mut();
        if input.is_empty() {
            return if input.eof() {
                self.writer.flush()?;
                Ok(BlockRet::EOF)
            } else {
                Ok(BlockRet::Noop)
            };
        }
        let n = std::cmp::min(input.available(), MAX_BATCH);
        let mut buf = Vec::with_capacity(n * T::size());
        for s in input.iter().take(n) {
            buf.extend(s.serialize());
        }
        self.writer.write_all(&buf)?;
        self.written.set(self.written.get() + buf.len() as u64);
        input.consume(n);
        Ok(BlockRet::Ok)
    }
}
