// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Support for in-kernel debugging.
//!
//! For printing, this module provides the `debug!` macro, which works like
//! `println!` and writes to the debug console registered by the board, and
//! `debug_verbose!`, which additionally prefixes the message with the source
//! file and line.
//!
//! ```rust,ignore
//! debug!("Booting from serial...");
//! debug!("Executing booted program at {:#010x}", entry);
//! ```
//!
//! The console is anything implementing [`IoWrite`], typically the buffered
//! UART the boot loader also talks through. Before a console is registered
//! (and when the `no_debug_output` kernel feature is enabled) messages are
//! dropped.
//!
//! Board setup:
//!
//! ```rust,ignore
//! let uart = static_init!(BufferedUart<..>, BufferedUart::new(..));
//! uart.init();
//! unsafe { kernel::debug::set_debug_writer(uart) };
//! ```

use core::cell::Cell;
use core::fmt::{self, Arguments, Write};

use crate::config::CONFIG;

/// Byte sink for debug output.
///
/// Returns the number of bytes consumed; `0` signals that the sink cannot
/// accept anything right now.
pub trait IoWrite {
    fn write(&self, buf: &[u8]) -> usize;
}

struct DebugWriterSlot {
    writer: Cell<Option<&'static dyn IoWrite>>,
}

// The firmware runs on a single core and the slot is written once during
// board setup, before interrupts are enabled.
unsafe impl Sync for DebugWriterSlot {}

static DEBUG_WRITER: DebugWriterSlot = DebugWriterSlot {
    writer: Cell::new(None),
};

/// Register the debug console.
///
/// # Safety
///
/// Must be called from the foreground during board setup, never concurrently
/// with a `debug!` invocation (e.g. from an interrupt handler).
pub unsafe fn set_debug_writer(writer: &'static dyn IoWrite) {
    DEBUG_WRITER.writer.set(Some(writer));
}

/// Whether a debug console has been registered.
pub fn debug_writer_registered() -> bool {
    DEBUG_WRITER.writer.get().is_some()
}

struct DebugWriterWrapper {
    dw: &'static dyn IoWrite,
}

impl Write for DebugWriterWrapper {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut bytes = s.as_bytes();
        while !bytes.is_empty() {
            let written = self.dw.write(bytes);
            if written == 0 {
                return Err(fmt::Error);
            }
            bytes = &bytes[written.min(bytes.len())..];
        }
        Ok(())
    }
}

fn with_debug_writer<F: FnOnce(&mut DebugWriterWrapper) -> fmt::Result>(f: F) {
    if !CONFIG.debug_output {
        return;
    }
    if let Some(dw) = DEBUG_WRITER.writer.get() {
        let mut wrapper = DebugWriterWrapper { dw };
        // Debug output is best effort, a full console just truncates.
        let _ = f(&mut wrapper);
    }
}

pub fn begin_debug_fmt(args: Arguments) {
    with_debug_writer(|writer| {
        writer.write_fmt(args)?;
        writer.write_str("\r\n")
    });
}

pub fn begin_debug_verbose_fmt(args: Arguments, file_line: &(&'static str, u32)) {
    let (file, line) = *file_line;
    with_debug_writer(|writer| {
        writer.write_fmt(format_args!("{}:{}: ", file, line))?;
        writer.write_fmt(args)?;
        writer.write_str("\r\n")
    });
}

/// In-kernel `println()` debugging.
#[macro_export]
macro_rules! debug {
    () => ({
        // Allow an empty debug!() to print the location when hit
        $crate::debug!("")
    });
    ($msg:expr $(,)?) => ({
        $crate::debug::begin_debug_fmt(format_args!($msg))
    });
    ($fmt:expr, $($arg:tt)+) => ({
        $crate::debug::begin_debug_fmt(format_args!($fmt, $($arg)+))
    });
}

/// In-kernel `println()` debugging with filename and line numbers.
#[macro_export]
macro_rules! debug_verbose {
    () => ({
        $crate::debug_verbose!("")
    });
    ($msg:expr $(,)?) => ({
        $crate::debug::begin_debug_verbose_fmt(format_args!($msg), {
            static _FILE_LINE: (&'static str, u32) = (file!(), line!());
            &_FILE_LINE
        })
    });
    ($fmt:expr, $($arg:tt)+) => ({
        $crate::debug::begin_debug_verbose_fmt(format_args!($fmt, $($arg)+), {
            static _FILE_LINE: (&'static str, u32) = (file!(), line!());
            &_FILE_LINE
        })
    });
}
