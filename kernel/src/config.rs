// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Data structure for storing compile-time configuration options.
//!
//! Configuration is a typed `const` object rather than scattered `#[cfg]`
//! attributes. All code paths stay type-checked by the compiler, even those
//! disabled by the current configuration, and the constant folds away so a
//! disabled option costs nothing in the resulting binary.
//!
//! Cargo features of the kernel crate only ever set values in [`CONFIG`].
//! This is the only location in the tree where `#[cfg(feature = ..)]` style
//! configuration is permitted.

/// Data structure holding compile-time configuration options.
///
/// To change the configuration, enable the relevant kernel crate features
/// from the board crate.
pub struct Config {
    /// Whether the serial boot session should trace every frame to the debug
    /// output.
    ///
    /// If enabled, each received frame is logged with its command, payload
    /// length and the acknowledgement sent back. Only useful when the debug
    /// console is not the same UART the loader talks to.
    pub trace_serialboot: bool,

    /// Whether `debug!` output is emitted at all.
    ///
    /// Disabling this removes all formatting code from the binary. The
    /// serial boot protocol itself does not depend on the debug output.
    pub debug_output: bool,
}

/// The unique instance of `Config` where compile-time configuration options
/// are defined.
pub const CONFIG: Config = Config {
    trace_serialboot: cfg!(feature = "trace_serialboot"),
    debug_output: !cfg!(feature = "no_debug_output"),
};
