//! Test fixture utilities.
//!
//! Canonical wire captures of the link, shared by tests across the
//! workspace.

use bytes::{Bytes, BytesMut};
use mcu_protocol::ResponseFrame;

/// Request to target `0x01`, op `0x01`, payload `01..05`, CRC `0x00`.
pub const PING_REQUEST: [u8; 9] = [0x01, 0x01, 0x05, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05];

/// Response with code `0x0A` and payload `FF EE`.
pub const SAMPLE_RESPONSE: [u8; 5] = [0x0A, 0x02, 0x00, 0xFF, 0xEE];

/// Response with code `0x05` and no payload.
pub const EMPTY_RESPONSE: [u8; 3] = [0x05, 0x00, 0x00];

/// Concatenate responses into one wire stream.
pub fn response_stream(frames: &[ResponseFrame]) -> Bytes {
    let mut buf = BytesMut::with_capacity(frames.iter().map(ResponseFrame::encoded_len).sum());
    for frame in frames {
        frame.encode(&mut buf);
    }
    buf.freeze()
}

/// Split `data` into consecutive pieces of the given sizes.
///
/// Sizes cycle when exhausted; a zero size yields an empty piece. Any
/// remainder forms the last piece.
pub fn split_by<'a>(data: &'a [u8], sizes: &[usize]) -> Vec<&'a [u8]> {
    let mut pieces = Vec::new();
    if sizes.iter().all(|&s| s == 0) {
        pieces.push(data);
        return pieces;
    }

    let mut rest = data;
    for &size in sizes.iter().cycle() {
        if rest.is_empty() {
            break;
        }
        let (piece, tail) = rest.split_at(size.min(rest.len()));
        pieces.push(piece);
        rest = tail;
    }
    pieces
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_split_by() {
        let data = [1, 2, 3, 4, 5, 6, 7];
        let pieces = split_by(&data, &[2, 3]);
        assert_eq!(pieces, vec![&[1, 2][..], &[3, 4, 5][..], &[6, 7][..]]);

        assert_eq!(split_by(&data, &[0]), vec![&data[..]]);
        assert_eq!(split_by(&data, &[]), vec![&data[..]]);
    }

    #[test]
    fn test_response_stream() {
        let frames = [
            ResponseFrame::decode(&SAMPLE_RESPONSE).unwrap(),
            ResponseFrame::decode(&EMPTY_RESPONSE).unwrap(),
        ];
        let stream = response_stream(&frames);
        assert_eq!(&stream[..5], &SAMPLE_RESPONSE);
        assert_eq!(&stream[5..], &EMPTY_RESPONSE);
    }
}
