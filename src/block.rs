/*! Block trait.

Blocks are the main building blocks of the pipeline. They each do one
thing, and are connected together with streams to process the data.
*/
use crate::Result;

/// Return type for all blocks.
///
/// This lets the scheduler know whether the block made progress, and
/// whether it will ever make progress again.
pub enum BlockRet {
    /// The block consumed and/or produced samples.
    Ok,

    /// The block did nothing this time. Not enough input, or no room
    /// in the output stream.
    Noop,

    /// The block will never produce anything again. Its output stream
    /// (if any) has been marked EOF.
    EOF,
}

/// Block trait, that must be implemented for all blocks.
///
/// Consuming data involves reading from the input stream, and then
/// calling `consume()` on it for the samples actually used. Samples
/// not consumed will be seen again on the next call to `work()`.
pub trait Block {
    /// Name of block.
    ///
    /// Not name of *instance* of block.
    fn block_name(&self) -> &'static str;

    /// Process samples from input stream(s) to output stream(s).
    ///
    /// Must return `Ok`/`Noop`/`EOF` truthfully: an implementation
    /// returning `Ok` without having moved any samples can spin the
    /// scheduler forever.
    fn work(&mut self) -> Result<BlockRet>;
}
