// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Bounded window into RAM that serially loaded images are copied into.

use core::cell::Cell;

use crate::hil::memory::LoadTarget;
use crate::ErrorCode;

/// A writable memory region, addressed by bus address.
///
/// Every load is checked against the window, so a peer can never make the
/// loader overwrite memory outside of it (e.g. the loader's own stack).
pub struct RamWindow {
    bus_base: u32,
    ptr: *mut u8,
    len: usize,
    /// Highest bus address written so far (exclusive), `bus_base` if none.
    /// Wider than the bus, as a window may end at the top of the address
    /// space.
    high_water: Cell<u64>,
}

impl RamWindow {
    /// Create a window of `len` bytes at bus address `bus_base`, accessible
    /// to the CPU through `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writes of `len` bytes for the lifetime of the
    /// window and nothing else may access that memory while loads happen.
    pub const unsafe fn new(bus_base: u32, ptr: *mut u8, len: usize) -> RamWindow {
        RamWindow {
            bus_base,
            ptr,
            len,
            high_water: Cell::new(bus_base as u64),
        }
    }

    pub fn bus_base(&self) -> u32 {
        self.bus_base
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether `[address, address + len)` lies within the window.
    pub fn contains(&self, address: u32, len: usize) -> bool {
        self.offset_of(address, len).is_some()
    }

    /// End (exclusive) of the highest load so far.
    pub fn high_water(&self) -> u64 {
        self.high_water.get()
    }

    fn offset_of(&self, address: u32, len: usize) -> Option<usize> {
        let offset = address.checked_sub(self.bus_base)? as usize;
        let end = offset.checked_add(len)?;
        if end <= self.len {
            Some(offset)
        } else {
            None
        }
    }
}

impl LoadTarget for RamWindow {
    fn load(&self, address: u32, data: &[u8]) -> Result<(), ErrorCode> {
        if data.is_empty() {
            return Ok(());
        }
        let offset = self.offset_of(address, data.len()).ok_or(ErrorCode::INVAL)?;
        unsafe {
            core::ptr::copy_nonoverlapping(data.as_ptr(), self.ptr.add(offset), data.len());
        }
        let end = address as u64 + data.len() as u64;
        if end > self.high_water.get() {
            self.high_water.set(end);
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::RamWindow;
    use crate::hil::memory::LoadTarget;
    use crate::ErrorCode;

    #[test]
    fn load_within_window() {
        let mut mem = [0u8; 32];
        let window = unsafe { RamWindow::new(0x1000, mem.as_mut_ptr(), mem.len()) };

        assert_eq!(window.load(0x1000, &[0xAA, 0xBB, 0xCC, 0xDD]), Ok(()));
        assert_eq!(window.load(0x101E, &[1, 2]), Ok(()));
        assert_eq!(window.high_water(), 0x1020);
        assert_eq!(&mem[..4], &[0xAA, 0xBB, 0xCC, 0xDD]);
        assert_eq!(&mem[30..], &[1, 2]);
    }

    #[test]
    fn load_outside_window_writes_nothing() {
        let mut mem = [0u8; 16];
        let window = unsafe { RamWindow::new(0x1000, mem.as_mut_ptr(), mem.len()) };

        assert_eq!(window.load(0x0FFF, &[1]), Err(ErrorCode::INVAL));
        assert_eq!(window.load(0x100F, &[1, 2]), Err(ErrorCode::INVAL));
        assert_eq!(window.load(u32::MAX, &[1]), Err(ErrorCode::INVAL));
        assert!(!window.contains(0x1010, 1));
        assert!(window.contains(0x1010, 0));
        assert_eq!(window.high_water(), 0x1000);
        assert_eq!(mem, [0u8; 16]);
    }

    #[test]
    fn load_ending_at_top_of_bus() {
        let mut mem = [0u8; 16];
        let window = unsafe { RamWindow::new(0xFFFF_FFF0, mem.as_mut_ptr(), mem.len()) };

        assert_eq!(window.load(0xFFFF_FFF0, &[1, 2]), Ok(()));
        assert_eq!(window.high_water(), 0xFFFF_FFF2);
        assert_eq!(window.load(0xFFFF_FFFC, &[3, 4, 5, 6]), Ok(()));
        assert_eq!(window.high_water(), 0x1_0000_0000);
        assert_eq!(&mem[12..], &[3, 4, 5, 6]);
    }

    #[test]
    fn empty_load_is_noop() {
        let mut mem = [0u8; 4];
        let window = unsafe { RamWindow::new(0x1000, mem.as_mut_ptr(), mem.len()) };

        // Even outside of the window
        assert_eq!(window.load(0x8000_0000, &[]), Ok(()));
        assert_eq!(window.high_water(), 0x1000);
    }
}
