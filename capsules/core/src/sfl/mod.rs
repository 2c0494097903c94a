// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Serial Flash Loader (SFL) protocol.
//!
//! SFL is the protocol LiteX BIOSes use to receive an image over a serial
//! line. After a handshake of two magic strings the host sends frames
//!
//! ```text
//! +--------+-----------+-----+-------------------+
//! | length | crc (BE)  | cmd | payload (length)  |
//! +--------+-----------+-----+-------------------+
//!     1         2         1       0..=255 bytes
//! ```
//!
//! where `crc` is the CRC-16/XMODEM of `cmd` followed by the payload. The
//! target answers each frame with a single [`Ack`] byte.

pub mod crc;
pub mod frame;
pub mod handshake;
pub mod serialboot;

/// Sent by the target to announce it is waiting for an image.
pub const MAGIC_REQ: &[u8; 14] = b"sL5DdSMmkekro\n";

/// Sent by the host in response to [`MAGIC_REQ`].
pub const MAGIC_ACK: &[u8; 14] = b"z6IHG7cYDID6o\n";

/// Largest payload a frame can carry.
pub const MAX_PAYLOAD_LEN: usize = 255;

/// Frame commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    /// End the session without booting.
    Abort = 0x00,
    /// Copy data to memory. Payload: 4-byte big-endian address, data.
    Load = 0x01,
    /// Start the loaded image. Payload: 4-byte big-endian entry point.
    Jump = 0x02,
    /// Set the kernel command line. Payload: command line bytes.
    Cmdline = 0x03,
    /// Payload: 4-byte big-endian start address of the initial ramdisk.
    InitrdStart = 0x04,
    /// Payload: 4-byte big-endian end address of the initial ramdisk.
    InitrdEnd = 0x05,
}

impl TryFrom<u8> for Command {
    type Error = u8;

    fn try_from(code: u8) -> Result<Command, u8> {
        match code {
            0x00 => Ok(Command::Abort),
            0x01 => Ok(Command::Load),
            0x02 => Ok(Command::Jump),
            0x03 => Ok(Command::Cmdline),
            0x04 => Ok(Command::InitrdStart),
            0x05 => Ok(Command::InitrdEnd),
            _ => Err(code),
        }
    }
}

/// Single-byte frame acknowledgements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Ack {
    Success = b'K',
    CrcError = b'C',
    Unknown = b'U',
    Error = b'E',
}

impl From<Ack> for u8 {
    fn from(ack: Ack) -> u8 {
        ack as u8
    }
}

#[cfg(test)]
mod test {
    use super::{Ack, Command};

    #[test]
    fn command_codes() {
        for code in 0u8..=5 {
            let cmd = Command::try_from(code).unwrap();
            assert_eq!(cmd as u8, code);
        }
        assert_eq!(Command::try_from(6), Err(6));
        assert_eq!(Command::try_from(0xFF), Err(0xFF));
    }

    #[test]
    fn ack_bytes() {
        assert_eq!(u8::from(Ack::Success), b'K');
        assert_eq!(u8::from(Ack::CrcError), b'C');
        assert_eq!(u8::from(Ack::Unknown), b'U');
        assert_eq!(u8::from(Ack::Error), b'E');
    }
}
