/*! AX.25 UI frame construction.

[AX.25][ax25] is the link layer used by amateur packet radio, and
therefore by [APRS][aprs]. APRS rides in UI (unnumbered information)
frames: address field, control 0x03, PID 0xF0, information field, FCS.

Addresses are encoded per section 3.12 of the AX.25 spec: six
characters of callsign, space padded, each shifted left one bit,
followed by an SSID byte. The low bit of the SSID byte is set on the
last address of the field, and nowhere else.

[ax25]: https://en.wikipedia.org/wiki/AX.25
[aprs]: https://en.wikipedia.org/wiki/Automatic_Packet_Reporting_System
*/
use crate::{Error, Result};

/// Control byte for UI frames.
pub const CONTROL_UI: u8 = 0x03;

/// PID for "no layer 3 protocol", used by APRS.
pub const PID_NO_L3: u8 = 0xf0;

/// Max number of digipeater path entries in the address field.
pub const MAX_PATH: usize = 8;

/// A callsign with SSID, e.g. `M0THC-1`.
///
/// The callsign is stored uppercased, unpadded, 1 to 6 characters.
/// Alphanumerics and spaces are accepted; anything else is rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Callsign {
    call: String,
    ssid: u8,
}

impl Callsign {
    /// Create a callsign from its parts, validating both.
    pub fn new(call: &str, ssid: u8) -> Result<Self> {
        if call.is_empty() || call.len() > 6 {
            return Err(Error::InvalidCallsign(call.to_string()));
        }
        if !call
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ' ')
        {
            return Err(Error::InvalidCallsign(call.to_string()));
        }
        if ssid > 15 {
            return Err(Error::InvalidCallsign(format!("{call}-{ssid}")));
        }
        Ok(Self {
            call: call.to_ascii_uppercase(),
            ssid,
        })
    }

    // For built-in addresses known to be valid, e.g. the APRS
    // destination. Caller guarantees validity.
    pub(crate) fn builtin(call: &str) -> Self {
        Self {
            call: call.to_string(),
            ssid: 0,
        }
    }

    /// The callsign without SSID.
    pub fn call(&self) -> &str {
        &self.call
    }

    /// The SSID, 0 to 15.
    pub fn ssid(&self) -> u8 {
        self.ssid
    }

    /// Encode as the 7 byte on-air address field entry.
    ///
    /// `last` sets the address extension bit, marking the end of the
    /// address field.
    pub fn encode(&self, last: bool) -> [u8; 7] {
        let mut out = [b' ' << 1; 7];
        for (o, ch) in out.iter_mut().zip(self.call.bytes()) {
            *o = ch << 1;
        }
        // SSID byte: bit 0 extension, bits 1-4 SSID, bits 5-6
        // reserved (set), bit 7 has-been-repeated (clear on TX).
        out[6] = 0x60 | (self.ssid << 1) | u8::from(last);
        out
    }
}

impl std::str::FromStr for Callsign {
    type Err = Error;

    /// Parse `CALL` or `CALL-SSID`.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('-') {
            None => Callsign::new(s, 0),
            Some((call, ssid)) => {
                let ssid: u8 = ssid
                    .parse()
                    .map_err(|_| Error::InvalidCallsign(s.to_string()))?;
                Callsign::new(call, ssid)
            }
        }
    }
}

impl std::fmt::Display for Callsign {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.ssid == 0 {
            write!(f, "{}", self.call)
        } else {
            write!(f, "{}-{}", self.call, self.ssid)
        }
    }
}

/// Parse a comma separated digipeater path, e.g. `WIDE1-1,WIDE2-1`.
///
/// The empty string means no digipeaters.
pub fn parse_path(path: &str) -> Result<Vec<Callsign>> {
    if path.is_empty() {
        return Ok(Vec::new());
    }
    let entries: Vec<Callsign> = path
        .split(',')
        .map(|e| e.parse().map_err(|_| Error::InvalidPath(e.to_string())))
        .collect::<Result<_>>()?;
    if entries.len() > MAX_PATH {
        return Err(Error::InvalidPath(path.to_string()));
    }
    Ok(entries)
}

/// An AX.25 UI frame, ready to encode.
#[derive(Clone, Debug)]
pub struct Frame {
    dest: Callsign,
    src: Callsign,
    path: Vec<Callsign>,
    info: Vec<u8>,
}

impl Frame {
    /// Create a UI frame.
    pub fn new(dest: Callsign, src: Callsign, path: Vec<Callsign>, info: &[u8]) -> Result<Self> {
        if path.len() > MAX_PATH {
            return Err(Error::InvalidPath(format!("{} entries", path.len())));
        }
        Ok(Self {
            dest,
            src,
            path,
            info: info.to_vec(),
        })
    }

    /// Encode to frame bytes, FCS included.
    ///
    /// Layout: dest, src, digipeaters, control, PID, info, FCS low
    /// byte, FCS high byte.
    pub fn encode(&self) -> Vec<u8> {
        let mut frame = Vec::with_capacity(7 * (2 + self.path.len()) + 2 + self.info.len() + 2);
        frame.extend_from_slice(&self.dest.encode(false));
        frame.extend_from_slice(&self.src.encode(self.path.is_empty()));
        for (n, digi) in self.path.iter().enumerate() {
            frame.extend_from_slice(&digi.encode(n + 1 == self.path.len()));
        }
        frame.push(CONTROL_UI);
        frame.push(PID_NO_L3);
        frame.extend_from_slice(&self.info);
        let crc = fcs(&frame);
        frame.extend_from_slice(&crc.to_le_bytes());
        frame
    }
}

/// Calculate the frame check sequence. Code ported from RFC1662.
///
/// ITU-T CRC-16: polynomial 0x1021 reflected, init 0xffff, final
/// complement. The returned value goes on air low byte first.
pub fn fcs(data: &[u8]) -> u16 {
    let mut fcs = 0xffffu16;
    for byte in data {
        let ofs = ((fcs ^ u16::from(*byte)) & 0xff) as usize;
        fcs = (fcs >> 8) ^ FCS_TABLE[ofs];
    }
    fcs ^ 0xffff
}

const FCS_TABLE: [u16; 256] = [
    0x0000, 0x1189, 0x2312, 0x329b, 0x4624, 0x57ad, 0x6536, 0x74bf, 0x8c48, 0x9dc1, 0xaf5a, 0xbed3,
    0xca6c, 0xdbe5, 0xe97e, 0xf8f7, 0x1081, 0x0108, 0x3393, 0x221a, 0x56a5, 0x472c, 0x75b7, 0x643e,
    0x9cc9, 0x8d40, 0xbfdb, 0xae52, 0xdaed, 0xcb64, 0xf9ff, 0xe876, 0x2102, 0x308b, 0x0210, 0x1399,
    0x6726, 0x76af, 0x4434, 0x55bd, 0xad4a, 0xbcc3, 0x8e58, 0x9fd1, 0xeb6e, 0xfae7, 0xc87c, 0xd9f5,
    0x3183, 0x200a, 0x1291, 0x0318, 0x77a7, 0x662e, 0x54b5, 0x453c, 0xbdcb, 0xac42, 0x9ed9, 0x8f50,
    0xfbef, 0xea66, 0xd8fd, 0xc974, 0x4204, 0x538d, 0x6116, 0x709f, 0x0420, 0x15a9, 0x2732, 0x36bb,
    0xce4c, 0xdfc5, 0xed5e, 0xfcd7, 0x8868, 0x99e1, 0xab7a, 0xbaf3, 0x5285, 0x430c, 0x7197, 0x601e,
    0x14a1, 0x0528, 0x37b3, 0x263a, 0xdecd, 0xcf44, 0xfddf, 0xec56, 0x98e9, 0x8960, 0xbbfb, 0xaa72,
    0x6306, 0x728f, 0x4014, 0x519d, 0x2522, 0x34ab, 0x0630, 0x17b9, 0xef4e, 0xfec7, 0xcc5c, 0xddd5,
    0xa96a, 0xb8e3, 0x8a78, 0x9bf1, 0x7387, 0x620e, 0x5095, 0x411c, 0x35a3, 0x242a, 0x16b1, 0x0738,
    0xffcf, 0xee46, 0xdcdd, 0xcd54, 0xb9eb, 0xa862, 0x9af9, 0x8b70, 0x8408, 0x9581, 0xa71a, 0xb693,
    0xc22c, 0xd3a5, 0xe13e, 0xf0b7, 0x0840, 0x19c9, 0x2b52, 0x3adb, 0x4e64, 0x5fed, 0x6d76, 0x7cff,
    0x9489, 0x8500, 0xb79b, 0xa612, 0xd2ad, 0xc324, 0xf1bf, 0xe036, 0x18c1, 0x0948, 0x3bd3, 0x2a5a,
    0x5ee5, 0x4f6c, 0x7df7, 0x6c7e, 0xa50a, 0xb483, 0x8618, 0x9791, 0xe32e, 0xf2a7, 0xc03c, 0xd1b5,
    0x2942, 0x38cb, 0x0a50, 0x1bd9, 0x6f66, 0x7eef, 0x4c74, 0x5dfd, 0xb58b, 0xa402, 0x9699, 0x8710,
    0xf3af, 0xe226, 0xd0bd, 0xc134, 0x39c3, 0x284a, 0x1ad1, 0x0b58, 0x7fe7, 0x6e6e, 0x5cf5, 0x4d7c,
    0xc60c, 0xd785, 0xe51e, 0xf497, 0x8028, 0x91a1, 0xa33a, 0xb2b3, 0x4a44, 0x5bcd, 0x6956, 0x78df,
    0x0c60, 0x1de9, 0x2f72, 0x3efb, 0xd68d, 0xc704, 0xf59f, 0xe416, 0x90a9, 0x8120, 0xb3bb, 0xa232,
    0x5ac5, 0x4b4c, 0x79d7, 0x685e, 0x1ce1, 0x0d68, 0x3ff3, 0x2e7a, 0xe70e, 0xf687, 0xc41c, 0xd595,
    0xa12a, 0xb0a3, 0x8238, 0x93b1, 0x6b46, 0x7acf, 0x4854, 0x59dd, 0x2d62, 0x3ceb, 0x0e70, 0x1ff9,
    0xf78f, 0xe606, 0xd49d, 0xc514, 0xb1ab, 0xa022, 0x92b9, 0x8330, 0x7bc7, 0x6a4e, 0x58d5, 0x495c,
    0x3de3, 0x2c6a, 0x1ef1, 0x0f78,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fcs_check_value() {
        assert_eq!(fcs(b"123456789"), 0x906e);
    }

    #[test]
    fn fcs_sent_low_byte_first() {
        let want = fcs(b"123456789").to_le_bytes();
        assert_eq!(want, [0x6e, 0x90]);
    }

    #[test]
    fn callsign_parse() -> Result<()> {
        let c: Callsign = "m0thc-1".parse()?;
        assert_eq!(c.call(), "M0THC");
        assert_eq!(c.ssid(), 1);
        assert_eq!(c.to_string(), "M0THC-1");
        let c: Callsign = "APRS".parse()?;
        assert_eq!(c.ssid(), 0);
        assert_eq!(c.to_string(), "APRS");
        // Spaces are legal callsign characters.
        let c: Callsign = "AB 1".parse()?;
        assert_eq!(c.call(), "AB 1");
        Ok(())
    }

    #[test]
    fn callsign_invalid() {
        assert!(matches!(
            "".parse::<Callsign>(),
            Err(Error::InvalidCallsign(_))
        ));
        assert!(matches!(
            "TOOLONG1".parse::<Callsign>(),
            Err(Error::InvalidCallsign(_))
        ));
        assert!(matches!(
            "N0*ALL".parse::<Callsign>(),
            Err(Error::InvalidCallsign(_))
        ));
        assert!(matches!(
            "N0CALL-16".parse::<Callsign>(),
            Err(Error::InvalidCallsign(_))
        ));
        assert!(matches!(
            "N0CALL-x".parse::<Callsign>(),
            Err(Error::InvalidCallsign(_))
        ));
    }

    #[test]
    fn address_encoding() -> Result<()> {
        let c = Callsign::new("APRS", 0)?;
        assert_eq!(c.encode(false), [0x82, 0xa0, 0xa4, 0xa6, 0x40, 0x40, 0x60]);
        let c = Callsign::new("WIDE1", 1)?;
        let e = c.encode(true);
        assert_eq!(e[6], 0x60 | (1 << 1) | 1);
        Ok(())
    }

    #[test]
    fn path_parse() -> Result<()> {
        assert!(parse_path("")?.is_empty());
        let p = parse_path("WIDE1-1,WIDE2-1")?;
        assert_eq!(p.len(), 2);
        assert_eq!(p[1].to_string(), "WIDE2-1");
        assert!(matches!(
            parse_path("WIDE1-1,,WIDE2-1"),
            Err(Error::InvalidPath(_))
        ));
        assert!(matches!(
            parse_path("W1,W2,W3,W4,W5,W6,W7,W8,W9"),
            Err(Error::InvalidPath(_))
        ));
        Ok(())
    }

    #[test]
    fn smoke_frame() -> Result<()> {
        let frame = Frame::new(
            Callsign::new("APRS", 0)?,
            Callsign::new("N0CALL", 0)?,
            vec![],
            b"Hello",
        )?;
        let bytes = frame.encode();
        assert_eq!(bytes.len(), 22);
        // Dest APRS-0, not last.
        assert_eq!(&bytes[..7], &[0x82, 0xa0, 0xa4, 0xa6, 0x40, 0x40, 0x60]);
        // Source N0CALL-0, last address.
        assert_eq!(&bytes[7..14], &[0x9c, 0x60, 0x86, 0x82, 0x98, 0x98, 0x61]);
        assert_eq!(bytes[14], CONTROL_UI);
        assert_eq!(bytes[15], PID_NO_L3);
        assert_eq!(&bytes[16..21], b"Hello");
        let want = fcs(&bytes[..20]).to_le_bytes();
        assert_eq!(&bytes[20..], &want);
        Ok(())
    }

    #[test]
    fn digi_path_frame() -> Result<()> {
        let frame = Frame::new(
            Callsign::new("APRS", 0)?,
            Callsign::new("N0CALL", 0)?,
            parse_path("WIDE1-1,WIDE2-1")?,
            b"x",
        )?;
        let bytes = frame.encode();
        // Source no longer carries the extension bit.
        assert_eq!(bytes[13] & 1, 0);
        // WIDE1-1 not last, WIDE2-1 last, both with SSID 1.
        assert_eq!(bytes[20], 0x60 | (1 << 1));
        assert_eq!(bytes[27], 0x60 | (1 << 1) | 1);
        assert_eq!(bytes[28], CONTROL_UI);
        Ok(())
    }
}
