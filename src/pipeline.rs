/*! Transmit pipeline assembly.

This is where the chain from frame bytes to sink bytes is wired up
and run. One call, one frame, one complete byte stream; nothing is
kept between calls.
*/
use std::io::Write;

use log::debug;

use crate::afsk::AfskSynth;
use crate::ax25::{Callsign, Frame};
use crate::convert::ComplexToS8;
use crate::fir::{interpolation_taps, Interpolator};
use crate::graph::Graph;
use crate::hdlc_framer::HdlcFramer;
use crate::nrzi::NrziEncode;
use crate::vco::Vco;
use crate::vector_source::VectorSource;
use crate::writer_sink::WriterSink;
use crate::{Error, Float, Result};

/// Output sample format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleFormat {
    /// Interleaved signed 8 bit I/Q at the interpolated rate.
    IqS8,

    /// Interleaved little endian float32 I/Q at the interpolated rate.
    IqF32,

    /// Little endian float32 mono audio at the audio rate. Skips FM
    /// and interpolation; useful for soundcard rigs and for
    /// inspecting the AFSK stage.
    PcmF32,
}

impl std::str::FromStr for SampleFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "s8" => Ok(SampleFormat::IqS8),
            "f32" => Ok(SampleFormat::IqF32),
            "pcm" => Ok(SampleFormat::PcmF32),
            other => Err(format!("unknown sample format {other}, want s8/f32/pcm")),
        }
    }
}

/// Transmission parameters.
///
/// The defaults are a standard North American APRS setup: Bell 202
/// at 1200 baud, destination `APRS`, 5kHz deviation, 48kHz audio
/// interpolated ×50 to 2.4Msps.
#[derive(Clone, Debug)]
pub struct TxConfig {
    /// Source callsign.
    pub src: Callsign,

    /// Destination address.
    pub dest: Callsign,

    /// Digipeater path, at most 8 entries.
    pub path: Vec<Callsign>,

    /// Output sample format.
    pub format: SampleFormat,

    /// Audio sample rate in Hz. Must be a multiple of the baud rate.
    pub audio_rate: u32,

    /// Symbol rate.
    pub baud: u32,

    /// Mark tone frequency in Hz.
    pub mark_hz: Float,

    /// Space tone frequency in Hz.
    pub space_hz: Float,

    /// Audio amplitude, 0.0 to 1.0.
    pub amplitude: Float,

    /// Tone polarity: true sends mark for a high NRZI level.
    /// TODO: confirm the inverted setting against a hardware TNC;
    /// only the default mapping has been exercised end to end.
    pub mark_on_high: bool,

    /// FM peak deviation in Hz.
    pub deviation: Float,

    /// Interpolation factor from audio rate to output rate.
    pub interpolation: usize,

    /// Opening flag count. More helps marginal receivers sync.
    pub preamble_flags: usize,

    /// Closing flag count.
    pub tail_flags: usize,

    /// Zero bits sent before the first flag, for clock recovery.
    pub run_in_zeros: usize,

    /// Max information field size in bytes.
    pub max_info: usize,
}

impl TxConfig {
    /// Standard config for a given source callsign.
    pub fn new(src: Callsign) -> Self {
        Self {
            src,
            dest: Callsign::builtin("APRS"),
            path: Vec::new(),
            format: SampleFormat::IqS8,
            audio_rate: 48000,
            baud: 1200,
            mark_hz: 1200.0,
            space_hz: 2200.0,
            amplitude: 0.5,
            mark_on_high: true,
            deviation: 5000.0,
            interpolation: 50,
            preamble_flags: 4,
            tail_flags: 1,
            run_in_zeros: 0,
            max_info: 256,
        }
    }
}

/// Generate one transmission.
///
/// Builds the AX.25 frame for `info`, renders it as samples in the
/// configured format, and writes the byte stream to `w`. Returns the
/// number of bytes written. On error nothing already written is
/// rolled back.
pub fn generate<W: Write + 'static>(cfg: &TxConfig, info: &[u8], w: W) -> Result<u64> {
    if info.len() > cfg.max_info {
        return Err(Error::OversizedInfo {
            len: info.len(),
            max: cfg.max_info,
        });
    }
    let frame = Frame::new(cfg.dest.clone(), cfg.src.clone(), cfg.path.clone(), info)?;
    let bytes = frame.encode();
    let framer = HdlcFramer::new(cfg.preamble_flags, cfg.tail_flags, cfg.run_in_zeros);
    let bits = framer.frame(&bytes)?;
    debug!(
        "frame {} -> {}: {} bytes, {} bits on air",
        cfg.src,
        cfg.dest,
        bytes.len(),
        bits.len()
    );

    let mut g = Graph::new();
    let src = VectorSource::new(bits);
    let nrzi = NrziEncode::new(src.out());
    let afsk = AfskSynth::new(
        nrzi.out(),
        cfg.audio_rate,
        cfg.baud,
        cfg.mark_hz,
        cfg.space_hz,
        cfg.amplitude,
        cfg.mark_on_high,
    )?;
    let audio = afsk.out();
    g.add(Box::new(src));
    g.add(Box::new(nrzi));
    g.add(Box::new(afsk));

    let written = match cfg.format {
        SampleFormat::PcmF32 => {
            let sink = WriterSink::new(audio, w);
            let written = sink.written();
            g.add(Box::new(sink));
            written
        }
        SampleFormat::IqF32 | SampleFormat::IqS8 => {
            let vco = Vco::new(
                audio,
                Vco::sensitivity(f64::from(cfg.deviation), f64::from(cfg.audio_rate)),
            );
            let interp = Interpolator::new(
                vco.out(),
                cfg.interpolation,
                interpolation_taps(cfg.interpolation, cfg.audio_rate as Float),
            );
            let baseband = interp.out();
            g.add(Box::new(vco));
            g.add(Box::new(interp));
            if cfg.format == SampleFormat::IqS8 {
                let quant = ComplexToS8::new(baseband);
                let sink = WriterSink::new(quant.out(), w);
                let written = sink.written();
                g.add(Box::new(quant));
                g.add(Box::new(sink));
                written
            } else {
                let sink = WriterSink::new(baseband, w);
                let written = sink.written();
                g.add(Box::new(sink));
                written
            }
        }
    };
    g.run()?;
    debug!("transmission rendered: {} bytes", written.get());
    Ok(written.get())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::SharedBuf;

    fn test_config() -> TxConfig {
        let mut cfg = TxConfig::new(Callsign::builtin("N0CALL"));
        cfg.preamble_flags = 1;
        cfg.tail_flags = 1;
        cfg
    }

    fn bit_count(cfg: &TxConfig, info: &[u8]) -> usize {
        let frame = Frame::new(cfg.dest.clone(), cfg.src.clone(), cfg.path.clone(), info)
            .unwrap()
            .encode();
        HdlcFramer::new(cfg.preamble_flags, cfg.tail_flags, cfg.run_in_zeros)
            .frame(&frame)
            .unwrap()
            .len()
    }

    #[test]
    fn pcm_length_is_exact() -> Result<()> {
        let mut cfg = test_config();
        cfg.format = SampleFormat::PcmF32;
        let buf = SharedBuf::default();
        let n = generate(&cfg, b"Hello", buf.clone())?;
        let bits = bit_count(&cfg, b"Hello");
        assert_eq!(n, (bits * 40 * 4) as u64);
        assert_eq!(buf.data().len() as u64, n);
        Ok(())
    }

    #[test]
    fn iq_s8_length_is_exact() -> Result<()> {
        let cfg = test_config();
        let buf = SharedBuf::default();
        let n = generate(&cfg, b"Hello", buf.clone())?;
        let bits = bit_count(&cfg, b"Hello");
        // 40 audio samples per bit, ×50 interpolation, 2 bytes per
        // complex sample.
        assert_eq!(n, (bits * 40 * 50 * 2) as u64);
        assert_eq!(buf.data().len() as u64, n);
        Ok(())
    }

    #[test]
    fn iq_f32_length_is_exact() -> Result<()> {
        let mut cfg = test_config();
        cfg.format = SampleFormat::IqF32;
        let buf = SharedBuf::default();
        let n = generate(&cfg, b"x", buf.clone())?;
        let bits = bit_count(&cfg, b"x");
        assert_eq!(n, (bits * 40 * 50 * 8) as u64);
        Ok(())
    }

    #[test]
    fn oversized_info_rejected() {
        let cfg = test_config();
        let info = vec![b'a'; 257];
        assert!(matches!(
            generate(&cfg, &info, std::io::sink()),
            Err(Error::OversizedInfo { len: 257, max: 256 })
        ));
    }

    #[test]
    fn s8_samples_in_range_at_full_amplitude() -> Result<()> {
        let mut cfg = test_config();
        cfg.amplitude = 1.0;
        let buf = SharedBuf::default();
        generate(&cfg, b"quantization", buf.clone())?;
        // All bytes are valid i8 by construction; check there is
        // signal and that the extremes stay inside the rails.
        let samples: Vec<i8> = buf.data().iter().map(|b| *b as i8).collect();
        assert!(samples.iter().any(|s| *s > 100));
        assert!(samples.iter().any(|s| *s < -100));
        Ok(())
    }

    #[test]
    fn format_parse() {
        assert_eq!("s8".parse::<SampleFormat>(), Ok(SampleFormat::IqS8));
        assert_eq!("f32".parse::<SampleFormat>(), Ok(SampleFormat::IqF32));
        assert_eq!("pcm".parse::<SampleFormat>(), Ok(SampleFormat::PcmF32));
        assert!("wav".parse::<SampleFormat>().is_err());
    }
}
