// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! SFL frames and the byte-wise frame decoder.

use kernel::ErrorCode;

use super::crc::Crc16;
use super::MAX_PAYLOAD_LEN;

/// Bytes in front of the payload: length, CRC (2), command.
pub const HEADER_LEN: usize = 4;

/// A received or to-be-sent frame.
///
/// A decoded frame carries the CRC as transmitted; it is only meaningful
/// after checking [`Frame::crc_valid`].
#[derive(Clone, Copy, Debug)]
pub struct Frame {
    length: u8,
    crc: u16,
    cmd: u8,
    payload: [u8; MAX_PAYLOAD_LEN],
}

impl Frame {
    const fn empty() -> Frame {
        Frame {
            length: 0,
            crc: 0,
            cmd: 0,
            payload: [0; MAX_PAYLOAD_LEN],
        }
    }

    /// Build a frame with a correct CRC.
    ///
    /// Returns `SIZE` if `payload` is longer than [`MAX_PAYLOAD_LEN`].
    pub fn new(cmd: u8, payload: &[u8]) -> Result<Frame, ErrorCode> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(ErrorCode::SIZE);
        }
        let mut frame = Frame::empty();
        frame.length = payload.len() as u8;
        frame.cmd = cmd;
        frame.payload[..payload.len()].copy_from_slice(payload);
        frame.crc = frame.compute_crc();
        Ok(frame)
    }

    pub fn length(&self) -> usize {
        self.length as usize
    }

    pub fn crc(&self) -> u16 {
        self.crc
    }

    pub fn cmd(&self) -> u8 {
        self.cmd
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload[..self.length()]
    }

    /// CRC over the command byte and the payload.
    pub fn compute_crc(&self) -> u16 {
        let mut crc = Crc16::new();
        crc.update(&[self.cmd]);
        crc.update(self.payload());
        crc.finish()
    }

    pub fn crc_valid(&self) -> bool {
        self.crc == self.compute_crc()
    }

    /// Length of the frame on the wire.
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.length()
    }

    /// Write the wire form of the frame into `buf`, returning the number of
    /// bytes written, or `SIZE` if `buf` is too short.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, ErrorCode> {
        let len = self.encoded_len();
        let out = buf.get_mut(..len).ok_or(ErrorCode::SIZE)?;
        out[0] = self.length;
        out[1..3].copy_from_slice(&self.crc.to_be_bytes());
        out[3] = self.cmd;
        out[HEADER_LEN..].copy_from_slice(self.payload());
        Ok(len)
    }
}

// Bytes past `length` are leftovers of earlier frames and do not count.
impl PartialEq for Frame {
    fn eq(&self, other: &Frame) -> bool {
        self.length == other.length
            && self.crc == other.crc
            && self.cmd == other.cmd
            && self.payload() == other.payload()
    }
}

impl Eq for Frame {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    AwaitLength,
    AwaitCrcHigh,
    AwaitCrcLow,
    AwaitCmd,
    AwaitPayload,
}

/// Assembles frames from a byte stream.
///
/// The decoder does not validate frames; every frame whose announced
/// payload arrived is handed out as is.
pub struct FrameDecoder {
    state: State,
    frame: Frame,
    received: usize,
}

impl FrameDecoder {
    pub const fn new() -> FrameDecoder {
        FrameDecoder {
            state: State::AwaitLength,
            frame: Frame::empty(),
            received: 0,
        }
    }

    /// Feed the next byte. Returns the frame it completes, if any, after
    /// which the decoder waits for the next frame.
    pub fn push(&mut self, byte: u8) -> Option<Frame> {
        match self.state {
            State::AwaitLength => {
                self.frame.length = byte;
                self.received = 0;
                self.state = State::AwaitCrcHigh;
            }
            State::AwaitCrcHigh => {
                self.frame.crc = (byte as u16) << 8;
                self.state = State::AwaitCrcLow;
            }
            State::AwaitCrcLow => {
                self.frame.crc |= byte as u16;
                self.state = State::AwaitCmd;
            }
            State::AwaitCmd => {
                self.frame.cmd = byte;
                if self.frame.length == 0 {
                    return Some(self.complete());
                }
                self.state = State::AwaitPayload;
            }
            State::AwaitPayload => {
                self.frame.payload[self.received] = byte;
                self.received += 1;
                if self.received == self.frame.length() {
                    return Some(self.complete());
                }
            }
        }
        None
    }

    /// Whether part of a frame has been received.
    pub fn in_progress(&self) -> bool {
        self.state != State::AwaitLength
    }

    /// Discard a partially received frame.
    pub fn reset(&mut self) {
        self.state = State::AwaitLength;
        self.received = 0;
    }

    fn complete(&mut self) -> Frame {
        self.reset();
        self.frame
    }
}

#[cfg(test)]
mod test {
    use super::{Frame, FrameDecoder, HEADER_LEN};
    use kernel::ErrorCode;

    fn decode_all(decoder: &mut FrameDecoder, bytes: &[u8]) -> Option<Frame> {
        let mut out = None;
        for (i, &b) in bytes.iter().enumerate() {
            let frame = decoder.push(b);
            if i + 1 < bytes.len() {
                assert_eq!(frame, None);
            } else {
                out = frame;
            }
        }
        out
    }

    #[test]
    fn encode_layout() {
        let frame = Frame::new(0x01, &[0, 0, 0x10, 0, 0xAA]).unwrap();
        let mut buf = [0u8; 16];
        let len = frame.encode(&mut buf).unwrap();
        let crc = frame.crc().to_be_bytes();
        assert_eq!(
            &buf[..len],
            &[5, crc[0], crc[1], 0x01, 0, 0, 0x10, 0, 0xAA]
        );

        let mut short = [0u8; HEADER_LEN + 4];
        assert_eq!(frame.encode(&mut short), Err(ErrorCode::SIZE));
        assert_eq!(Frame::new(0x01, &[0u8; 256]), Err(ErrorCode::SIZE));
    }

    #[test]
    fn decodes_valid_frames() {
        let mut decoder = FrameDecoder::new();
        let mut buf = [0u8; 260];

        let payloads: [&[u8]; 4] = [b"", b"\x01", b"console=ttyS0", &[0xA5; 255]];
        for payload in payloads {
            let frame = Frame::new(0x03, payload).unwrap();
            let len = frame.encode(&mut buf).unwrap();
            let decoded = decode_all(&mut decoder, &buf[..len]).unwrap();
            assert!(decoded.crc_valid());
            assert_eq!(decoded.cmd(), 0x03);
            assert_eq!(decoded.payload(), payload);
            assert!(!decoder.in_progress());
        }
    }

    #[test]
    fn every_command_and_length_decodes() {
        let mut decoder = FrameDecoder::new();
        let mut payload = [0u8; 255];
        let mut wire = [0u8; HEADER_LEN + 255];

        for cmd in 0..=255u8 {
            for len in 0..=255usize {
                for (i, b) in payload[..len].iter_mut().enumerate() {
                    *b = (i as u8).wrapping_mul(31) ^ cmd;
                }
                let frame = Frame::new(cmd, &payload[..len]).unwrap();
                let n = frame.encode(&mut wire).unwrap();
                assert_eq!(n, HEADER_LEN + len);

                let decoded = decode_all(&mut decoder, &wire[..n]).unwrap();
                assert!(decoded.crc_valid(), "cmd {} len {}", cmd, len);
                assert_eq!(decoded, frame);
            }
        }
    }

    #[test]
    fn flipped_bits_fail_crc_for_any_shape() {
        let shapes: [(u8, usize); 5] = [(0x00, 0), (0x02, 4), (0x05, 17), (0x80, 128), (0xFF, 255)];
        let mut payload = [0u8; 255];
        for (i, b) in payload.iter_mut().enumerate() {
            *b = i as u8;
        }
        let mut wire = [0u8; HEADER_LEN + 255];

        for (cmd, len) in shapes {
            let frame = Frame::new(cmd, &payload[..len]).unwrap();
            let n = frame.encode(&mut wire).unwrap();

            // The length byte only changes framing, so start at the CRC
            for byte in 1..n {
                for bit in 0..8 {
                    let mut corrupted = wire;
                    corrupted[byte] ^= 1 << bit;
                    let mut decoder = FrameDecoder::new();
                    let decoded = decode_all(&mut decoder, &corrupted[..n]).unwrap();
                    assert!(!decoded.crc_valid(), "cmd {} len {} byte {}", cmd, len, byte);
                }
            }
        }
    }

    #[test]
    fn any_flipped_bit_fails_crc() {
        let frame = Frame::new(0x01, &[0, 0, 0x10, 0, 0xAA, 0xBB, 0xCC, 0xDD]).unwrap();
        let mut wire = [0u8; 12];
        let len = frame.encode(&mut wire).unwrap();

        // Every bit of the CRC, the command and the payload
        for byte in 1..len {
            for bit in 0..8 {
                let mut corrupted = wire;
                corrupted[byte] ^= 1 << bit;
                let mut decoder = FrameDecoder::new();
                let decoded = decode_all(&mut decoder, &corrupted[..len]).unwrap();
                assert!(!decoded.crc_valid(), "byte {} bit {}", byte, bit);
            }
        }
    }

    #[test]
    fn reset_drops_partial_frame() {
        let frame = Frame::new(0x00, &[]).unwrap();
        let mut wire = [0u8; HEADER_LEN];
        frame.encode(&mut wire).unwrap();

        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.push(9), None);
        assert_eq!(decoder.push(0x12), None);
        assert!(decoder.in_progress());
        decoder.reset();
        assert!(!decoder.in_progress());

        assert_eq!(decode_all(&mut decoder, &wire), Some(frame));
    }
}
