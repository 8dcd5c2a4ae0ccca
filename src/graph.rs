/*! Graph of blocks, and the scheduler running them.

The scheduler is deliberately simple: run every block round robin
until all of them report EOF. Correct for a linear, finite, single
threaded pipeline, which is the only kind this crate builds.
*/
use log::debug;

use crate::block::{Block, BlockRet};
use crate::{Error, Result};

/// A graph of blocks.
pub struct Graph {
    blocks: Vec<Box<dyn Block>>,
}

impl Graph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Add a block to the graph, in data flow order.
    pub fn add(&mut self, b: Box<dyn Block>) {
        self.blocks.push(b);
    }

    /// Run the graph until all blocks are done.
    ///
    /// A full pass over the graph in which no block makes progress,
    /// while not all blocks have finished, means the pipeline is
    /// wedged. That cannot happen with correctly implemented blocks,
    /// so it surfaces as an internal error instead of a hang.
    pub fn run(&mut self) -> Result<()> {
        let mut done = vec![false; self.blocks.len()];
        loop {
            let mut progress = false;
            for (n, b) in self.blocks.iter_mut().enumerate() {
                if done[n] {
                    continue;
                }
                match b.work()? {
                    BlockRet::Ok => progress = true,
                    BlockRet::Noop => {}
                    BlockRet::EOF => {
                        debug!("{} done", b.block_name());
                        done[n] = true;
                        progress = true;
                    }
                }
            }
            if done.iter().all(|d| *d) {
                debug!("graph done");
                return Ok(());
            }
            if !progress {
                let stuck: Vec<&str> = self
                    .blocks
                    .iter()
                    .enumerate()
                    .filter(|(n, _)| !done[*n])
                    .map(|(_, b)| b.block_name())
                    .collect();
                return Err(Error::InternalInvariant(format!(
                    "graph stalled with blocks still running: {stuck:?}"
                )));
            }
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{new_streamp, Streamp};

    struct NullSink {
        src: Streamp<u8>,
    }
    impl Block for NullSink {
        fn block_name(&self) -> &'static str {
            "NullSink"
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
            input.consume(n);
            Ok(BlockRet::Ok)
        }
    }

    #[test]
    fn runs_to_completion() -> Result<()> {
        let src = crate::vector_source::VectorSource::new(vec![1u8, 2, 3]);
        let sink = NullSink { src: src.out() };
        let mut g = Graph::new();
        g.add(Box::new(src));
        g.add(Box::new(sink));
        g.run()
    }

    #[test]
    fn stall_is_an_error() {
        struct Stuck {
            src: Streamp<u8>,
        }
        impl Block for Stuck {
            fn block_name(&self) -> &'static str {
                "Stuck"
            }
            fn work(&mut self) -> Result<BlockRet> {
                // Never consumes, never finishes.
                let _ = &self.src;
                Ok(BlockRet::Noop)
            }
        }
        let mut g = Graph::new();
        g.add(Box::new(Stuck { src: new_streamp() }));
        assert!(matches!(g.run(), Err(Error::InternalInvariant(_))));
    }
}
