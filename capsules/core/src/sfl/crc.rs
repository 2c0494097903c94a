// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! CRC-16/XMODEM: polynomial 0x1021, initial value 0, no reflection and no
//! final XOR.

const POLYNOMIAL: u16 = 0x1021;

const fn make_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u16) << 8;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ POLYNOMIAL
            } else {
                crc << 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

static CRC16_TABLE: [u16; 256] = make_table();

/// Incremental CRC computation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Crc16 {
    crc: u16,
}

impl Crc16 {
    pub const fn new() -> Crc16 {
        Crc16 { crc: 0 }
    }

    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            let index = ((self.crc >> 8) as u8 ^ byte) as usize;
            self.crc = (self.crc << 8) ^ CRC16_TABLE[index];
        }
    }

    pub fn finish(&self) -> u16 {
        self.crc
    }
}

#[cfg(test)]
mod test {
    use super::Crc16;

    #[test]
    fn check_value() {
        let mut crc = Crc16::new();
        assert_eq!(crc.finish(), 0);
        crc.update(b"123456789");
        assert_eq!(crc.finish(), 0x31C3);
    }

    #[test]
    fn split_updates() {
        let mut crc = Crc16::new();
        crc.update(b"1234");
        crc.update(b"");
        crc.update(b"56789");
        assert_eq!(crc.finish(), 0x31C3);
    }
}
