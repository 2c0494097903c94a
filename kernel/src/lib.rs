// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Core kernel crate for the LiteX serial boot firmware.
//!
//! The kernel crate holds the code shared between chips and capsules: the
//! error type, compile-time configuration, the debug console, lock-free
//! collections and the Hardware Interface Layer (HIL) traits that separate
//! hardware-independent capsules from chip drivers.
//!
//! Most `unsafe` code is in this crate and the chip crates.

#![no_std]

pub mod collections;
pub mod config;
#[macro_use]
pub mod debug;
pub mod errorcode;
pub mod hil;
pub mod utilities;

pub use crate::errorcode::ErrorCode;
