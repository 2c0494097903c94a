// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Hardware agnostic interfaces for timeouts.

/// One-shot down counter.
///
/// Polled rather than interrupt driven, for use in boot code that spins
/// anyway.
pub trait Countdown {
    /// (Re)start the countdown with `ticks` hardware clock ticks.
    fn start(&self, ticks: u32);

    /// Whether the countdown reached zero. A stopped countdown is expired.
    fn expired(&self) -> bool;

    /// Stop the countdown.
    fn stop(&self);
}
