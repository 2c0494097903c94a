// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Interrupt-driven, ring-buffered serial transport.
//!
//! Sits on top of a chip's [`UartHardware`] and provides the blocking byte
//! stream ([`ByteTransport`]) the serial boot loader and the debug console
//! use. Two ring buffers decouple foreground code from the hardware FIFOs:
//!
//! - RX: filled by the interrupt handler, drained by `read`.
//! - TX: filled by `write`, drained by the interrupt handler (or by `sync`
//!   while interrupts are disabled).
//!
//! Each buffer has a single producer and a single consumer, so no lock is
//! needed. `write` masks the UART interrupt line while it decides between
//! writing to the hardware directly and enqueueing, as the interrupt handler
//! makes the same decision from the other side.
//!
//! Usage
//! -----
//!
//! ```rust,ignore
//! let uart = static_init!(
//!     BufferedUart<'static, litex::uart::LiteXUart, VexRiscvInterruptController>,
//!     BufferedUart::new(&peripherals.uart0, &interrupt_controller, UART_INTERRUPT)
//! );
//! uart.init();
//! kernel::debug::set_debug_writer(uart);
//! ```
//!
//! With interrupts globally disabled the driver degrades to polling: `read`
//! returns `0` instead of waiting, `write` drops bytes once the TX buffer is
//! full and `sync` moves buffered bytes to the hardware itself.

use core::cell::Cell;
use core::sync::atomic::{AtomicUsize, Ordering};

use kernel::collections::ring_buffer::RingBuffer;
use kernel::debug::IoWrite;
use kernel::hil::interrupt::{InterruptControl, InterruptService};
use kernel::hil::uart::{ByteTransport, UartHardware};

/// Size of each ring buffer unless specified otherwise.
pub const DEFAULT_BUFFER_SIZE: usize = 128;

pub struct BufferedUart<
    'a,
    H: UartHardware,
    I: InterruptControl,
    const N: usize = DEFAULT_BUFFER_SIZE,
> {
    hw: &'a H,
    irq: &'a I,
    irq_line: usize,
    rx: RingBuffer<u8, N>,
    tx: RingBuffer<u8, N>,
    spin_limit: Cell<Option<usize>>,
    // Only written by the interrupt handler
    rx_dropped: AtomicUsize,
    // Only written by foreground code
    tx_dropped: AtomicUsize,
}

impl<'a, H: UartHardware, I: InterruptControl, const N: usize> BufferedUart<'a, H, I, N> {
    /// `irq_line` is the bit of the UART interrupt in the interrupt mask.
    pub const fn new(hw: &'a H, irq: &'a I, irq_line: usize) -> Self {
        BufferedUart {
            hw,
            irq,
            irq_line,
            rx: RingBuffer::new(0),
            tx: RingBuffer::new(0),
            spin_limit: Cell::new(None),
            rx_dropped: AtomicUsize::new(0),
            tx_dropped: AtomicUsize::new(0),
        }
    }

    /// Reset both buffers, arm the UART events and unmask the UART line.
    ///
    /// The line stays masked while the buffers are reset, so calling it again
    /// later is safe but discards buffered data.
    pub fn init(&self) {
        let mask = self.irq.mask() & !self.line_bit();
        self.irq.set_mask(mask);

        self.rx.empty();
        self.tx.empty();

        self.hw.clear_pending_events();
        self.hw.enable_events();
        self.irq.set_mask(mask | self.line_bit());
    }

    /// Interrupt handler body. Never blocks.
    pub fn handle_interrupt(&self) {
        if self.hw.rx_event_pending() {
            while self.hw.rx_ready() {
                let byte = self.hw.rx_get();
                if !self.rx.enqueue(byte) {
                    increment(&self.rx_dropped);
                }
                // Releases the byte in the hardware FIFO, even when dropped
                self.hw.ack_rx_event();
            }
        }

        if self.hw.tx_event_pending() {
            self.hw.ack_tx_event();
            self.drain_tx();
        }
    }

    /// Bytes received while the RX buffer was full.
    pub fn rx_dropped(&self) -> usize {
        self.rx_dropped.load(Ordering::Relaxed)
    }

    /// Bytes passed to `write` that were discarded because the TX buffer was
    /// full and could not drain.
    pub fn tx_dropped(&self) -> usize {
        self.tx_dropped.load(Ordering::Relaxed)
    }

    /// Bound every busy-wait to `limit` iterations of
    /// [`InterruptControl::relax`]; `None` waits forever.
    ///
    /// When the bound is hit `write` drops its byte, `read` returns `0` and
    /// `sync` returns with data still buffered.
    pub fn set_spin_limit(&self, limit: Option<usize>) {
        self.spin_limit.set(limit);
    }

    fn line_bit(&self) -> usize {
        1 << self.irq_line
    }

    /// Hand buffered bytes to the hardware until either runs out.
    fn drain_tx(&self) {
        while self.tx.has_elements() && self.hw.tx_ready() {
            if let Some(byte) = self.tx.dequeue() {
                self.hw.tx_put(byte);
            }
        }
    }

    /// Busy-wait until `done` holds. Returns `false` if the spin limit ran
    /// out first.
    fn spin_until<F: Fn() -> bool>(&self, done: F) -> bool {
        let mut spins = 0;
        while !done() {
            if let Some(limit) = self.spin_limit.get() {
                if spins >= limit {
                    return false;
                }
            }
            spins += 1;
            self.irq.relax();
        }
        true
    }
}

impl<H: UartHardware, I: InterruptControl, const N: usize> ByteTransport
    for BufferedUart<'_, H, I, N>
{
    fn write(&self, byte: u8) {
        if self.irq.interrupts_enabled() {
            if !self.spin_until(|| !self.tx.is_full()) {
                increment(&self.tx_dropped);
                return;
            }
        } else if self.tx.is_full() {
            increment(&self.tx_dropped);
            return;
        }

        let old_mask = self.irq.mask();
        self.irq.set_mask(old_mask & !self.line_bit());
        if self.tx.has_elements() || !self.hw.tx_ready() {
            if !self.tx.enqueue(byte) {
                increment(&self.tx_dropped);
            }
        } else {
            self.hw.tx_put(byte);
        }
        self.irq.set_mask(old_mask);
    }

    fn read(&self) -> u8 {
        if self.irq.interrupts_enabled() && !self.spin_until(|| self.rx.has_elements()) {
            return 0;
        }
        self.rx.dequeue().unwrap_or(0)
    }

    fn read_nonblock(&self) -> bool {
        self.rx.has_elements()
    }

    fn sync(&self) {
        if self.irq.interrupts_enabled() {
            self.spin_until(|| !self.tx.has_elements() && self.hw.tx_idle());
        } else {
            // Nobody else consumes the TX buffer
            self.spin_until(|| {
                self.drain_tx();
                !self.tx.has_elements() && self.hw.tx_idle()
            });
        }
    }
}

impl<H: UartHardware, I: InterruptControl, const N: usize> InterruptService
    for BufferedUart<'_, H, I, N>
{
    fn service_interrupt(&self, interrupt: usize) -> bool {
        if interrupt == self.irq_line {
            self.handle_interrupt();
            true
        } else {
            false
        }
    }
}

/// Debug console. Foreground code only: interrupt handlers must not log.
impl<H: UartHardware, I: InterruptControl, const N: usize> IoWrite for BufferedUart<'_, H, I, N> {
    fn write(&self, buf: &[u8]) -> usize {
        for &b in buf {
            ByteTransport::write(self, b);
        }
        buf.len()
    }
}

// Single writer per counter, so a load/store pair suffices.
fn increment(counter: &AtomicUsize) {
    counter.store(
        counter.load(Ordering::Relaxed).wrapping_add(1),
        Ordering::Relaxed,
    );
}
