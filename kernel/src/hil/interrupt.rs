// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Interfaces to the CPU interrupt controller.

/// Global interrupt enable and per-line interrupt mask.
///
/// Line `n` corresponds to bit `n` of the mask; a set bit means the line is
/// unmasked (may interrupt the CPU).
pub trait InterruptControl {
    /// Whether interrupts are globally enabled on the CPU.
    fn interrupts_enabled(&self) -> bool;

    /// The current interrupt mask.
    fn mask(&self) -> usize;

    /// Replace the interrupt mask.
    fn set_mask(&self, mask: usize);

    /// Called on every iteration of a busy-wait loop.
    fn relax(&self) {
        core::hint::spin_loop();
    }
}

/// Handler for hardware interrupts, called by the chip's interrupt dispatch.
pub trait InterruptService {
    /// Service an interrupt on line `interrupt`.
    ///
    /// Returns `false` if the interrupt does not belong to this service.
    /// Must not block and is never re-entered.
    fn service_interrupt(&self, interrupt: usize) -> bool;
}
