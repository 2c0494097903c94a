// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Interfaces for UART communications.
//!
//! Two layers meet here:
//!
//! - [`UartHardware`] is the single-byte register interface a chip exposes
//!   for its UART peripheral, including the receive / transmit event flags
//!   that drive the UART interrupt line.
//! - [`ByteTransport`] is the byte stream a capsule (e.g. the serial boot
//!   loader) consumes, typically provided by a ring-buffered driver on top of
//!   a `UartHardware`.

/// Single-byte UART peripheral interface.
///
/// All methods are plain register accesses and never block. The receive
/// path is split in two steps: [`UartHardware::rx_get`] returns the oldest
/// received byte without removing it, and [`UartHardware::ack_rx_event`]
/// acknowledges the receive event and releases that byte. Drivers always
/// call them in this order, once per byte.
pub trait UartHardware {
    /// The transmitter can accept another byte (transmit FIFO not full).
    fn tx_ready(&self) -> bool;

    /// Hand a byte to the transmitter. Only valid if `tx_ready()`.
    fn tx_put(&self, byte: u8);

    /// Every byte handed to the transmitter has left it (transmit FIFO
    /// empty).
    fn tx_idle(&self) -> bool;

    /// At least one received byte is waiting (receive FIFO not empty).
    fn rx_ready(&self) -> bool;

    /// The oldest received byte. Only valid if `rx_ready()`.
    fn rx_get(&self) -> u8;

    /// A receive event is pending.
    fn rx_event_pending(&self) -> bool;

    /// A transmit event is pending (the transmitter made room).
    fn tx_event_pending(&self) -> bool;

    /// Acknowledge the receive event, releasing the byte returned by the
    /// last `rx_get()`.
    fn ack_rx_event(&self);

    /// Acknowledge the transmit event.
    fn ack_tx_event(&self);

    /// Acknowledge all pending events without touching the enable state.
    fn clear_pending_events(&self);

    /// Enable both the receive and the transmit event source, so they can
    /// assert the UART interrupt line.
    fn enable_events(&self);
}

/// Byte-oriented serial stream.
///
/// The blocking behaviour of `write` / `read` depends on the
/// implementation; callers that must not block check
/// [`ByteTransport::read_nonblock`] before calling `read`.
pub trait ByteTransport {
    /// Send one byte.
    fn write(&self, byte: u8);

    /// Receive one byte.
    fn read(&self) -> u8;

    /// Whether at least one byte can be read right now. Never blocks and
    /// never consumes data.
    fn read_nonblock(&self) -> bool;

    /// Wait until every byte passed to `write` has been sent on the wire.
    fn sync(&self);

    /// Send a sequence of bytes in order.
    fn write_all(&self, bytes: &[u8]) {
        for &b in bytes {
            self.write(b);
        }
    }
}
