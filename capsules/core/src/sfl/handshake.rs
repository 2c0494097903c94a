// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Magic string handshake preceding an SFL session.

use kernel::hil::uart::ByteTransport;

use super::{MAGIC_ACK, MAGIC_REQ};

/// Recognizes a magic string in a byte stream.
///
/// On a mismatch the match restarts at the current byte if it equals the
/// first magic byte, so `"ssL5D..."` still matches `"sL5D..."`. Beyond that
/// no backtracking takes place, which is sufficient for the SFL magics as
/// their first byte does not reappear in them.
pub struct MagicMatcher {
    magic: &'static [u8],
    matched: usize,
}

impl MagicMatcher {
    pub const fn new(magic: &'static [u8]) -> MagicMatcher {
        MagicMatcher { magic, matched: 0 }
    }

    /// Feed the next byte. Returns `true` when it completes the magic, after
    /// which matching starts over.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.magic.get(self.matched) == Some(&byte) {
            self.matched += 1;
        } else if self.magic.first() == Some(&byte) {
            self.matched = 1;
        } else {
            self.matched = 0;
        }

        if !self.magic.is_empty() && self.matched == self.magic.len() {
            self.matched = 0;
            true
        } else {
            false
        }
    }

    /// Number of magic bytes matched so far.
    pub fn matched(&self) -> usize {
        self.matched
    }
}

/// Host side of the handshake: answers every request magic with the ack
/// magic.
pub struct HandshakeResponder<'a, T: ByteTransport> {
    transport: &'a T,
    matcher: MagicMatcher,
}

impl<'a, T: ByteTransport> HandshakeResponder<'a, T> {
    pub const fn new(transport: &'a T) -> HandshakeResponder<'a, T> {
        HandshakeResponder {
            transport,
            matcher: MagicMatcher::new(MAGIC_REQ),
        }
    }

    /// Feed one received byte. Returns `true` if it completed a request and
    /// the ack was sent.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.matcher.push(byte) {
            self.transport.write_all(MAGIC_ACK);
            true
        } else {
            false
        }
    }

    /// Process every byte available without blocking and return the number
    /// of acks sent.
    pub fn poll(&mut self) -> usize {
        let mut acks = 0;
        while self.transport.read_nonblock() {
            let byte = self.transport.read();
            if self.push(byte) {
                acks += 1;
            }
        }
        acks
    }
}

#[cfg(test)]
mod test {
    use super::{HandshakeResponder, MagicMatcher};
    use crate::sfl::{MAGIC_ACK, MAGIC_REQ};
    use crate::test::transport::ScriptedTransport;
    use std::vec::Vec;

    fn count_matches(magic: &'static [u8], stream: &[u8]) -> usize {
        let mut matcher = MagicMatcher::new(magic);
        stream.iter().filter(|&&b| matcher.push(b)).count()
    }

    #[test]
    fn matches_exact_magic() {
        assert_eq!(count_matches(MAGIC_ACK, MAGIC_ACK), 1);
        assert_eq!(count_matches(MAGIC_ACK, &MAGIC_ACK[..13]), 0);
        assert_eq!(count_matches(MAGIC_ACK, MAGIC_REQ), 0);
    }

    #[test]
    fn restarts_on_first_magic_byte() {
        let mut stream = Vec::new();
        stream.extend_from_slice(b"zz6IH");
        stream.extend_from_slice(MAGIC_ACK);
        assert_eq!(count_matches(MAGIC_ACK, &stream), 1);

        let mut matcher = MagicMatcher::new(MAGIC_ACK);
        for &b in b"z6IHG" {
            matcher.push(b);
        }
        assert_eq!(matcher.matched(), 5);
        matcher.push(b'z');
        assert_eq!(matcher.matched(), 1);
        matcher.push(b'!');
        assert_eq!(matcher.matched(), 0);
    }

    #[test]
    fn empty_magic_never_matches() {
        assert_eq!(count_matches(b"", b"anything"), 0);
    }

    #[test]
    fn one_ack_per_request() {
        let transport = ScriptedTransport::new();
        let mut responder = HandshakeResponder::new(&transport);

        let mut stream = Vec::new();
        stream.extend_from_slice(b"noise");
        stream.extend_from_slice(MAGIC_REQ);
        stream.extend_from_slice(MAGIC_REQ);
        stream.extend_from_slice(&MAGIC_REQ[..7]);
        stream.extend_from_slice(b"\r\n");
        stream.extend_from_slice(MAGIC_REQ);
        transport.feed(&stream);

        assert_eq!(responder.poll(), 3);
        assert_eq!(transport.pending_input(), 0);

        let mut expected = Vec::new();
        for _ in 0..3 {
            expected.extend_from_slice(MAGIC_ACK);
        }
        assert_eq!(transport.take_output(), expected);

        // No state carried over: a later request is answered the same way
        transport.feed(MAGIC_REQ);
        assert_eq!(responder.poll(), 1);
        assert_eq!(transport.take_output(), MAGIC_ACK);
    }
}
