/*! APRS transmitter pipeline.

This crate turns an APRS message plus amateur radio addressing into
complex baseband samples ready for a transmitting SDR, e.g. a HackRF
fed 2.4Msps interleaved signed 8bit I/Q on 144.390MHz.

The signal chain is a set of blocks connected by streams, running
single threaded to completion for one frame at a time:

```text
 [ AX.25 UI frame bytes ]
           ↓
 [ HDLC bit stuffing and flags ]
           ↓
      [ NRZI encode ]
           ↓
 [ Bell 202 AFSK tone synthesis, 48kHz ]
           ↓
 [ FM modulator (VCO), 5kHz deviation ]
           ↓
 [ ×50 polyphase FIR interpolator, 2.4Msps ]
           ↓
 [ Sample sink: s8 / f32 I/Q, or f32 PCM audio ]
```

The whole chain is wired up by [`pipeline::generate`]:

```
use aprstx::ax25::Callsign;
use aprstx::pipeline::{generate, SampleFormat, TxConfig};

let mut cfg = TxConfig::new("M0THC-1".parse::<Callsign>()?);
cfg.format = SampleFormat::PcmF32;
let n = generate(&cfg, b"Hello", std::io::sink())?;
assert!(n > 0);
# Ok::<(), aprstx::Error>(())
```
*/

// Blocks.
pub mod afsk;
pub mod convert;
pub mod nrzi;
pub mod vco;
pub mod vector_sink;
pub mod vector_source;
pub mod writer_sink;

// Framing.
pub mod ax25;
pub mod hdlc_framer;

// Filters.
pub mod fir;
pub mod window;

// Infrastructure.
pub mod block;
pub mod fill;
pub mod graph;
pub mod pipeline;
pub mod stream;

/// Float type used. Usually f32, but not guaranteed.
pub type Float = f32;

/// Complex (I/Q) data.
pub type Complex = num_complex::Complex<Float>;

/// Errors surfaced by the pipeline. None of them are retried internally.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Callsign failed validation: bad character, too long, or SSID out
    /// of range.
    #[error("invalid callsign: {0}")]
    InvalidCallsign(String),

    /// A digipeater path entry failed validation.
    #[error("invalid digipeater path: {0}")]
    InvalidPath(String),

    /// Information payload longer than the configured maximum.
    #[error("information field too long: {len} > {max}")]
    OversizedInfo { len: usize, max: usize },

    /// Write to the output sink failed. Anything already written stays
    /// written.
    #[error("sink write failed: {0}")]
    SinkWrite(#[from] std::io::Error),

    /// A post-condition that cannot fail, failed. This is a bug.
    #[error("internal invariant failure: {0}")]
    InternalInvariant(String),
}

/// Crate result type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A trait for sample types that can be serialized onto the output sink.
///
/// All multibyte formats are little endian.
pub trait Sample {
    /// The serialized size of one sample.
    fn size() -> usize;

    /// Serialize one sample.
    fn serialize(&self) -> Vec<u8>;
}

impl Sample for Float {
    fn size() -> usize {
        std::mem::size_of::<Self>()
    }
    fn serialize(&self) -> Vec<u8> {
        Float::to_le_bytes(*self).to_vec()
    }
}

impl Sample for Complex {
    fn size() -> usize {
        std::mem::size_of::<Self>()
    }
    fn serialize(&self) -> Vec<u8> {
        let mut ret = Vec::with_capacity(Self::size());
        ret.extend(Float::to_le_bytes(self.re));
        ret.extend(Float::to_le_bytes(self.im));
        ret
    }
}

impl Sample for num_complex::Complex<i8> {
    fn size() -> usize {
        2
    }
    fn serialize(&self) -> Vec<u8> {
        vec![self.re as u8, self.im as u8]
    }
}
