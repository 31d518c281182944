//! Primitive wire codec: bytes, shorts, VInt/VLong, length-prefixed arrays.
//!
//! VInt and VLong are little-endian base-128: each byte carries seven value
//! bits, least significant group first, and the most significant bit is a
//! continuation flag (clear on the final byte). Fixed-width integers (the
//! port short) are big-endian.

use crate::error::{HotRodError, Result};
use crate::io::{ByteSink, ByteSource};

/// Longest legal VInt encoding.
pub const VINT_MAX_BYTES: usize = 5;

/// Longest legal VLong encoding.
pub const VLONG_MAX_BYTES: usize = 10;

/// Reads a single byte.
pub fn read_u8<S: ByteSource>(source: &mut S) -> Result<u8> {
    let mut buf = [0u8; 1];
    source.fill(&mut buf)?;
    Ok(buf[0])
}

/// Writes a single byte.
pub fn write_u8<S: ByteSink>(sink: &mut S, value: u8) -> Result<()> {
    sink.emit(&[value])
}

/// Reads a big-endian 16-bit unsigned integer.
pub fn read_u16_be<S: ByteSource>(source: &mut S) -> Result<u16> {
    let mut buf = [0u8; 2];
    source.fill(&mut buf)?;
    Ok(u16::from_be_bytes(buf))
}

/// Writes a big-endian 16-bit unsigned integer.
pub fn write_u16_be<S: ByteSink>(sink: &mut S, value: u16) -> Result<()> {
    sink.emit(&value.to_be_bytes())
}

/// Reads a variable-length unsigned 32-bit integer.
///
/// Rejects encodings longer than [`VINT_MAX_BYTES`] so a corrupt stream
/// cannot drive an unbounded read.
pub fn read_vint<S: ByteSource>(source: &mut S) -> Result<u32> {
    let mut value: u32 = 0;
    let mut shift = 0u32;
    for _ in 0..VINT_MAX_BYTES {
        let b = read_u8(source)?;
        value |= u32::from(b & 0x7F) << shift;
        if b & 0x80 == 0 {
            return Ok(value);
        }
        shift += 7;
    }
    Err(HotRodError::Protocol(format!(
        "VInt longer than {} bytes",
        VINT_MAX_BYTES
    )))
}

/// Writes a variable-length unsigned 32-bit integer.
pub fn write_vint<S: ByteSink>(sink: &mut S, mut value: u32) -> Result<()> {
    while value > 0x7F {
        write_u8(sink, (value as u8 & 0x7F) | 0x80)?;
        value >>= 7;
    }
    write_u8(sink, value as u8)
}

/// Reads a variable-length unsigned 64-bit integer.
///
/// Rejects encodings longer than [`VLONG_MAX_BYTES`].
pub fn read_vlong<S: ByteSource>(source: &mut S) -> Result<u64> {
    let mut value: u64 = 0;
    let mut shift = 0u32;
    for _ in 0..VLONG_MAX_BYTES {
        let b = read_u8(source)?;
        value |= u64::from(b & 0x7F) << shift;
        if b & 0x80 == 0 {
            return Ok(value);
        }
        shift += 7;
    }
    Err(HotRodError::Protocol(format!(
        "VLong longer than {} bytes",
        VLONG_MAX_BYTES
    )))
}

/// Writes a variable-length unsigned 64-bit integer.
pub fn write_vlong<S: ByteSink>(sink: &mut S, mut value: u64) -> Result<()> {
    while value > 0x7F {
        write_u8(sink, (value as u8 & 0x7F) | 0x80)?;
        value >>= 7;
    }
    write_u8(sink, value as u8)
}

/// Reads a VInt-length-prefixed byte array.
///
/// A zero length is legal and yields an empty vector. The content is
/// requested from the source as one fill.
pub fn read_byte_array<S: ByteSource>(source: &mut S) -> Result<Vec<u8>> {
    let len = read_vint(source)? as usize;
    let mut buf = vec![0u8; len];
    source.fill(&mut buf)?;
    Ok(buf)
}

/// Writes a VInt-length-prefixed byte array.
pub fn write_byte_array<S: ByteSink>(sink: &mut S, bytes: &[u8]) -> Result<()> {
    write_vint(sink, bytes.len() as u32)?;
    sink.emit(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{BufSink, SliceSource};

    fn encode_vint(value: u32) -> Vec<u8> {
        let mut sink = BufSink::new();
        write_vint(&mut sink, value).unwrap();
        sink.into_bytes()
    }

    fn encode_vlong(value: u64) -> Vec<u8> {
        let mut sink = BufSink::new();
        write_vlong(&mut sink, value).unwrap();
        sink.into_bytes()
    }

    #[test]
    fn test_vint_known_encodings() {
        assert_eq!(encode_vint(0), vec![0x00]);
        assert_eq!(encode_vint(127), vec![0x7F]);
        assert_eq!(encode_vint(128), vec![0x80, 0x01]);
        assert_eq!(encode_vint(300), vec![0xAC, 0x02]);
    }

    #[test]
    fn test_vint_decode_consumes_exactly_the_encoding() {
        let bytes = [0xACu8, 0x02, 0x99];
        let mut source = SliceSource::new(&bytes);
        assert_eq!(read_vint(&mut source).unwrap(), 300);
        assert_eq!(source.remaining(), 1);
    }

    #[test]
    fn test_vint_round_trip() {
        let values = [
            0u32,
            1,
            0x7F,
            0x80,
            300,
            0x3FFF,
            0x4000,
            0x1F_FFFF,
            0x20_0000,
            0xFFF_FFFF,
            0x1000_0000,
            u32::MAX,
        ];
        for v in values {
            let encoded = encode_vint(v);
            assert!(encoded.len() <= VINT_MAX_BYTES, "{v} encoded too long");
            let mut source = SliceSource::new(&encoded);
            assert_eq!(read_vint(&mut source).unwrap(), v);
            assert!(source.is_exhausted());
        }
    }

    #[test]
    fn test_vlong_round_trip() {
        let values = [
            0u64,
            0x7F,
            0x80,
            1u64 << 31,
            1u64 << 32,
            1u64 << 55,
            1u64 << 56,
            u64::MAX,
        ];
        for v in values {
            let encoded = encode_vlong(v);
            assert!(encoded.len() <= VLONG_MAX_BYTES, "{v} encoded too long");
            let mut source = SliceSource::new(&encoded);
            assert_eq!(read_vlong(&mut source).unwrap(), v);
            assert!(source.is_exhausted());
        }
    }

    #[test]
    fn test_vint_overlong_rejected() {
        // six continuation bytes
        let bytes = [0x80u8, 0x80, 0x80, 0x80, 0x80, 0x00];
        let mut source = SliceSource::new(&bytes);
        let err = read_vint(&mut source).unwrap_err();
        assert!(matches!(err, HotRodError::Protocol(_)));
    }

    #[test]
    fn test_vlong_overlong_rejected() {
        let bytes = [0x80u8; 11];
        let mut source = SliceSource::new(&bytes);
        let err = read_vlong(&mut source).unwrap_err();
        assert!(matches!(err, HotRodError::Protocol(_)));
    }

    #[test]
    fn test_vint_truncated_stream() {
        let bytes = [0x80u8];
        let mut source = SliceSource::new(&bytes);
        assert!(read_vint(&mut source).is_err());
    }

    #[test]
    fn test_short_round_trip() {
        let mut sink = BufSink::new();
        write_u16_be(&mut sink, 11222).unwrap();
        assert_eq!(sink.as_bytes(), &[0x2B, 0xD6]);

        let bytes = sink.into_bytes();
        let mut source = SliceSource::new(&bytes);
        assert_eq!(read_u16_be(&mut source).unwrap(), 11222);
    }

    #[test]
    fn test_byte_array_known_encoding() {
        let mut sink = BufSink::new();
        write_byte_array(&mut sink, b"key\0").unwrap();
        assert_eq!(sink.as_bytes(), &[0x04, 0x6B, 0x65, 0x79, 0x00]);
    }

    #[test]
    fn test_byte_array_round_trip() {
        let inputs: [&[u8]; 4] = [b"", b"a", b"key\0", &[0u8; 300]];
        for input in inputs {
            let mut sink = BufSink::new();
            write_byte_array(&mut sink, input).unwrap();
            let bytes = sink.into_bytes();

            let mut source = SliceSource::new(&bytes);
            assert_eq!(read_byte_array(&mut source).unwrap(), input.to_vec());
            assert!(source.is_exhausted());
        }
    }

    #[test]
    fn test_byte_array_empty_length() {
        let bytes = [0x00u8];
        let mut source = SliceSource::new(&bytes);
        assert_eq!(read_byte_array(&mut source).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_byte_array_truncated_content() {
        let bytes = [0x05u8, 0x01, 0x02];
        let mut source = SliceSource::new(&bytes);
        assert!(read_byte_array(&mut source).is_err());
    }
}
