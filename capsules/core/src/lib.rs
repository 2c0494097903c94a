// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Hardware-independent drivers of the serial boot firmware.

#![forbid(unsafe_code)]
#![no_std]

#[cfg(test)]
extern crate std;

#[cfg(test)]
mod test;

pub mod buffered_uart;
pub mod sfl;
