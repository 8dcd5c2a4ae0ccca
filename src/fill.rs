/*! TX buffer fill adapter for SDR drivers.

SDR TX drivers call a user callback from their own thread whenever the
hardware needs more samples, and the callback must fill the whole
buffer every time. The pipeline never runs inside that callback: it
renders the complete byte stream in advance, and the callback just
copies from it.

This adapter is that copy loop, separated from any particular driver
so it can be tested against plain readers.
*/
use std::io::Read;

/// What the driver should do after a fill.
#[derive(Debug, PartialEq, Eq)]
pub enum FillStatus {
    /// Buffer filled, keep streaming.
    More,

    /// Source exhausted. The remainder of the buffer was zeroed, and
    /// the driver should stop streaming after this buffer.
    Done,
}

/// Fills driver buffers from any `Read`.
pub struct FillAdapter<R> {
    inner: R,
    done: bool,
}

impl<R: Read> FillAdapter<R> {
    /// Create an adapter over a byte source.
    pub fn new(inner: R) -> Self {
        Self { inner, done: false }
    }

    /// Fill `buf` completely.
    ///
    /// Short reads are retried until the buffer is full or the source
    /// hits EOF. At EOF the rest of the buffer is zeroed, so a driver
    /// that keys the transmitter on buffer content sends silence, not
    /// stale samples.
    pub fn fill(&mut self, buf: &mut [u8]) -> std::io::Result<FillStatus> {
        if self.done {
            buf.fill(0);
            return Ok(FillStatus::Done);
        }
        let mut pos = 0;
        while pos < buf.len() {
            let rc = self.inner.read(&mut buf[pos..])?;
            if rc == 0 {
                buf[pos..].fill(0);
                self.done = true;
                return Ok(FillStatus::Done);
            }
            pos += rc;
        }
        Ok(FillStatus::More)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn fills_then_zero_pads() -> std::io::Result<()> {
        let data: Vec<u8> = (1..=10).collect();
        let mut f = FillAdapter::new(Cursor::new(data));
        let mut buf = [0xau8; 4];
        assert_eq!(f.fill(&mut buf)?, FillStatus::More);
        assert_eq!(buf, [1, 2, 3, 4]);
        assert_eq!(f.fill(&mut buf)?, FillStatus::More);
        assert_eq!(buf, [5, 6, 7, 8]);
        // Partial last buffer: rest zeroed, stop requested.
        assert_eq!(f.fill(&mut buf)?, FillStatus::Done);
        assert_eq!(buf, [9, 10, 0, 0]);
        // And it stays stopped.
        let mut buf = [0xffu8; 2];
        assert_eq!(f.fill(&mut buf)?, FillStatus::Done);
        assert_eq!(buf, [0, 0]);
        Ok(())
    }

    #[test]
    fn short_reads_are_retried() -> std::io::Result<()> {
        /// Reader doling out one byte at a time.
        struct Dribble(Vec<u8>, usize);
        impl Read for Dribble {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                if self.1 == self.0.len() || buf.is_empty() {
                    return Ok(0);
                }
                buf[0] = self.0[self.1];
                self.1 += 1;
                Ok(1)
            }
        }
        let mut f = FillAdapter::new(Dribble(vec![7, 8, 9], 0));
        let mut buf = [0u8; 3];
        assert_eq!(f.fill(&mut buf)?, FillStatus::More);
        assert_eq!(buf, [7, 8, 9]);
        Ok(())
    }
}
