use std::io::{self, Read, Write};

use bytes::{BufMut, BytesMut};

use crate::core::{Error, Result, MAX_FRAME_LEN};

/// Width of the length header in bytes
pub const HEADER_LEN: usize = 4;

/// Writes one frame: a 4-byte big-endian total length followed by the payload
///
/// The header counts itself, so the value on the wire is `4 + payload.len()`
/// (RFC 5734). Header and payload are flushed as a single buffer.
pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> Result<()> {
    let total = payload.len() as u64 + HEADER_LEN as u64;
    if total > u64::from(MAX_FRAME_LEN) {
        return Err(Error::frame(format!(
            "payload of {} bytes exceeds the {} byte frame cap",
            payload.len(),
            MAX_FRAME_LEN
        )));
    }

    let mut frame = BytesMut::with_capacity(total as usize);
    frame.put_u32(total as u32);
    frame.extend_from_slice(payload);

    writer.write_all(&frame).map_err(classify_io)?;
    writer.flush().map_err(classify_io)?;
    Ok(())
}

/// Reads one frame and returns its payload
///
/// Short socket reads are absorbed internally; a peer that closes the
/// connection mid-frame produces a transport error, never a truncated payload.
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut header = [0u8; HEADER_LEN];
    reader.read_exact(&mut header).map_err(classify_io)?;

    let total = u32::from_be_bytes(header);
    if (total as usize) < HEADER_LEN {
        return Err(Error::frame(format!(
            "declared frame length {} is shorter than the header itself",
            total
        )));
    }
    if total > MAX_FRAME_LEN {
        return Err(Error::frame(format!(
            "declared frame length {} exceeds the {} byte cap",
            total, MAX_FRAME_LEN
        )));
    }

    let mut payload = vec![0u8; total as usize - HEADER_LEN];
    reader.read_exact(&mut payload).map_err(classify_io)?;
    Ok(payload)
}

fn classify_io(error: io::Error) -> Error {
    match error.kind() {
        io::ErrorKind::UnexpectedEof => Error::transport("connection closed mid-frame"),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => {
            Error::transport("I/O timeout expired")
        }
        _ => Error::transport(format!("socket failure: {}", error)),
    }
}
