// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Implementation of a single-producer, single-consumer ring buffer.
//!
//! The buffer is shared between two execution contexts, typically an
//! interrupt handler and foreground code. Exactly one context may call
//! [`RingBuffer::enqueue`] (the producer) and exactly one context may call
//! [`RingBuffer::dequeue`] (the consumer). Under that contract no lock is
//! needed: the producer only ever stores `produce`, the consumer only ever
//! stores `consume`, and a slot is published by the release-store of the
//! index that makes it visible to the other side.
//!
//! Only atomic loads and stores are used, which are available on every
//! target the firmware runs on (including RV32I without the `A` extension).

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicUsize, Ordering};

/// Fixed-capacity circular FIFO.
///
/// `N` must be a power of two. One slot is kept free to tell a full buffer
/// apart from an empty one, so at most `N - 1` elements are stored. A full
/// buffer rejects new elements, it never overwrites.
pub struct RingBuffer<T: Copy, const N: usize> {
    ring: UnsafeCell<[T; N]>,
    /// Next slot the producer writes.
    produce: AtomicUsize,
    /// Next slot the consumer reads.
    consume: AtomicUsize,
}

// The SPSC contract above guarantees that a slot is never accessed by both
// sides at the same time.
unsafe impl<T: Copy + Send, const N: usize> Sync for RingBuffer<T, N> {}

impl<T: Copy, const N: usize> RingBuffer<T, N> {
    const MASK: usize = {
        assert!(
            N >= 2 && N.is_power_of_two(),
            "ring buffer capacity must be a power of two"
        );
        N - 1
    };

    pub const fn new(init: T) -> RingBuffer<T, N> {
        let _ = Self::MASK;
        RingBuffer {
            ring: UnsafeCell::new([init; N]),
            produce: AtomicUsize::new(0),
            consume: AtomicUsize::new(0),
        }
    }

    /// Maximum number of elements the buffer holds at once.
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    pub fn has_elements(&self) -> bool {
        self.produce.load(Ordering::Acquire) != self.consume.load(Ordering::Acquire)
    }

    pub fn is_full(&self) -> bool {
        let produce = self.produce.load(Ordering::Acquire);
        ((produce + 1) & Self::MASK) == self.consume.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        let produce = self.produce.load(Ordering::Acquire);
        let consume = self.consume.load(Ordering::Acquire);
        produce.wrapping_sub(consume) & Self::MASK
    }

    /// Number of elements that can be enqueued until the buffer is full.
    pub fn available_len(&self) -> usize {
        self.capacity() - self.len()
    }

    /// Append an element. Producer side only.
    ///
    /// Returns `false` and leaves the buffer untouched if it is full.
    pub fn enqueue(&self, val: T) -> bool {
        let produce = self.produce.load(Ordering::Relaxed);
        let next = (produce + 1) & Self::MASK;
        if next == self.consume.load(Ordering::Acquire) {
            return false;
        }
        // The slot at `produce` is not visible to the consumer until the
        // store to `produce` below.
        unsafe {
            (*self.ring.get())[produce] = val;
        }
        self.produce.store(next, Ordering::Release);
        true
    }

    /// Remove the oldest element. Consumer side only.
    pub fn dequeue(&self) -> Option<T> {
        let consume = self.consume.load(Ordering::Relaxed);
        if consume == self.produce.load(Ordering::Acquire) {
            return None;
        }
        // The producer does not touch the slot at `consume` until the store
        // to `consume` below hands it back.
        let val = unsafe { (*self.ring.get())[consume] };
        self.consume.store((consume + 1) & Self::MASK, Ordering::Release);
        Some(val)
    }

    /// Reset the buffer to empty.
    ///
    /// Only valid while neither the producer nor the consumer is active, e.g.
    /// during driver initialization with the interrupt source masked.
    pub fn empty(&self) {
        self.produce.store(0, Ordering::Release);
        self.consume.store(0, Ordering::Release);
    }
}
