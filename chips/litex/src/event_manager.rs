// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! LiteX Event Manager
//!
//! Documentation on the different LiteX event sources, which all behave
//! differently, can be found in the LiteX repository under
//! [`litex/soc/interconnect/csr_eventmanager.py`](https://github.com/enjoy-digital/litex/blob/master/litex/soc/interconnect/csr_eventmanager.py).

use kernel::utilities::registers::interfaces::{Readable, Writeable};
use kernel::utilities::registers::{ReadOnly, ReadWrite};

/// LiteX event manager abstraction
///
/// A LiteX event manager combines the event sources of a peripheral and
/// drives one CPU interrupt line. It is exposed as three CSRs in the
/// peripheral's register bank:
///
/// - `status`: current input of every event source,
/// - `pending`: latched events; writing a `1` clears (acknowledges) the
///   event, which may have side effects in the peripheral,
/// - `enable`: which pending events assert the interrupt line.
///
/// Event sources are addressed by their bit index, starting at 0.
pub struct LiteXEventManager<'a> {
    status: &'a ReadOnly<u32>,
    pending: &'a ReadWrite<u32>,
    enable: &'a ReadWrite<u32>,
}

impl<'a> LiteXEventManager<'a> {
    pub const fn new(
        status: &'a ReadOnly<u32>,
        pending: &'a ReadWrite<u32>,
        enable: &'a ReadWrite<u32>,
    ) -> Self {
        LiteXEventManager {
            status,
            pending,
            enable,
        }
    }

    /// Suppress all event sources, so none can assert the CPU interrupt.
    pub fn disable_all(&self) {
        self.enable.set(0);
    }

    /// Enable every event source set in `events`, leaving the others as they
    /// are.
    pub fn enable_events(&self, events: u32) {
        self.enable.set(self.enable.get() | events);
    }

    pub fn enable_event(&self, index: usize) {
        self.enable_events(1 << index);
    }

    pub fn disable_event(&self, index: usize) {
        self.enable.set(self.enable.get() & !(1 << index));
    }

    pub fn event_enabled(&self, index: usize) -> bool {
        self.enable.get() & (1 << index) != 0
    }

    /// Current input signal of an event source, independent of whether it is
    /// enabled or pending.
    pub fn event_source_input(&self, index: usize) -> bool {
        self.status.get() & (1 << index) != 0
    }

    /// Whether an event source is latched as pending, irrespective of its
    /// enable state.
    pub fn event_pending(&self, index: usize) -> bool {
        self.pending.get() & (1 << index) != 0
    }

    /// Whether an event source is asserting the CPU interrupt (enabled and
    /// pending).
    pub fn event_asserted(&self, index: usize) -> bool {
        self.event_enabled(index) && self.event_pending(index)
    }

    /// Acknowledge a pending event.
    ///
    /// The event may stay pending afterwards, e.g. for level sources or a
    /// FIFO which still holds data.
    pub fn clear_event(&self, index: usize) {
        self.pending.set(1 << index);
    }

    /// Acknowledge every event that is currently pending.
    pub fn clear_pending(&self) {
        self.pending.set(self.pending.get());
    }
}
