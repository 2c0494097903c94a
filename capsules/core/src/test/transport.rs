// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Byte transport replaying a prepared input stream.

use core::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::vec::Vec;

use kernel::hil::uart::ByteTransport;

pub struct ScriptedTransport {
    input: RefCell<VecDeque<u8>>,
    output: RefCell<Vec<u8>>,
    syncs: Cell<usize>,
}

impl ScriptedTransport {
    pub fn new() -> ScriptedTransport {
        ScriptedTransport {
            input: RefCell::new(VecDeque::new()),
            output: RefCell::new(Vec::new()),
            syncs: Cell::new(0),
        }
    }

    pub fn feed(&self, bytes: &[u8]) {
        self.input.borrow_mut().extend(bytes.iter().copied());
    }

    pub fn take_output(&self) -> Vec<u8> {
        core::mem::take(&mut *self.output.borrow_mut())
    }

    /// Input bytes not consumed yet.
    pub fn pending_input(&self) -> usize {
        self.input.borrow().len()
    }

    pub fn syncs(&self) -> usize {
        self.syncs.get()
    }
}

impl ByteTransport for ScriptedTransport {
    fn write(&self, byte: u8) {
        self.output.borrow_mut().push(byte);
    }

    fn read(&self) -> u8 {
        self.input.borrow_mut().pop_front().unwrap_or(0)
    }

    fn read_nonblock(&self) -> bool {
        !self.input.borrow().is_empty()
    }

    fn sync(&self) {
        self.syncs.set(self.syncs.get() + 1);
    }
}
