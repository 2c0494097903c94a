// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Drivers and support modules for LiteX SoCs
//!
//! Register layouts assume the default LiteX CSR configuration of a 32 bit
//! CSR data width, i.e. every CSR occupies one 32 bit word.

#![no_std]

pub mod event_manager;
pub mod timer;
pub mod uart;
