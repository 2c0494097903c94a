// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Interrupt controller of the VexRiscv CPU

use core::cell::Cell;

use kernel::hil::interrupt::{InterruptControl, InterruptService};

/// The VexRiscv interrupt controller: one global enable bit (`mstatus.MIE`)
/// plus two custom CSRs holding the per-line mask and pending bits.
///
/// Trap handlers latch the pending lines once and then dispatch them in
/// priority order (lowest line first), so lines raised during dispatch are
/// handled on the next trap.
pub struct VexRiscvInterruptController {
    latched: Cell<usize>,
}

impl VexRiscvInterruptController {
    pub const fn new() -> Self {
        VexRiscvInterruptController {
            latched: Cell::new(0),
        }
    }

    /// Latch every line that is both pending and unmasked. Returns whether
    /// there was any.
    ///
    /// Only call this with interrupts disabled, i.e. from the trap handler.
    pub unsafe fn latch_pending(&self) -> bool {
        let lines = csr::pending() & csr::mask();
        self.latched.set(lines);
        lines != 0
    }

    /// Highest priority latched line.
    pub fn next_latched(&self) -> Option<usize> {
        match self.latched.get() {
            0 => None,
            lines => Some(lines.trailing_zeros() as usize),
        }
    }

    /// Remove `line` from the latched set.
    pub fn complete(&self, line: usize) {
        self.latched.set(self.latched.get() & !(1 << line));
    }

    /// Hand every latched line to `service` and return the set of lines it
    /// did not claim.
    ///
    /// This runs in interrupt context, so it never logs: the debug console
    /// has a single foreground producer. Report the returned lines from the
    /// main loop instead.
    pub fn dispatch_latched(&self, service: &dyn InterruptService) -> usize {
        let mut unclaimed = 0;
        while let Some(line) = self.next_latched() {
            if !service.service_interrupt(line) {
                unclaimed |= 1 << line;
            }
            self.complete(line);
        }
        unclaimed
    }

    pub unsafe fn enable_interrupts(&self) {
        csr::set_global_enable(true);
    }

    pub unsafe fn disable_interrupts(&self) {
        csr::set_global_enable(false);
    }
}

impl InterruptControl for VexRiscvInterruptController {
    fn interrupts_enabled(&self) -> bool {
        unsafe { csr::global_enable() }
    }

    fn mask(&self) -> usize {
        unsafe { csr::mask() }
    }

    fn set_mask(&self, mask: usize) {
        unsafe { csr::set_mask(mask) }
    }
}

/// Raw CSR accessors, matching `litex/soc/cores/cpu/vexriscv/irq.h`.
///
/// Builds for other targets (e.g. host unit tests) see a controller with
/// everything masked and disabled.
mod csr {
    #[cfg(all(target_arch = "riscv32", target_os = "none"))]
    pub use self::vexriscv::*;

    #[cfg(not(all(target_arch = "riscv32", target_os = "none")))]
    pub use self::host::*;

    #[cfg(all(target_arch = "riscv32", target_os = "none"))]
    mod vexriscv {
        use core::arch::asm;

        /// VexRiscv-specific, see `litex/soc/cores/cpu/vexriscv/csr-defs.h`
        const IRQ_MASK: usize = 0xBC0;
        const IRQ_PENDING: usize = 0xFC0;
        const MSTATUS_MIE: usize = 1 << 3;

        pub unsafe fn global_enable() -> bool {
            let mstatus: usize;
            asm!("csrr {0}, mstatus", out(reg) mstatus);
            mstatus & MSTATUS_MIE != 0
        }

        pub unsafe fn set_global_enable(enable: bool) {
            if enable {
                asm!("csrs mstatus, {0}", in(reg) MSTATUS_MIE);
            } else {
                asm!("csrc mstatus, {0}", in(reg) MSTATUS_MIE);
            }
        }

        pub unsafe fn mask() -> usize {
            let value: usize;
            asm!("csrr {0}, {csr}", out(reg) value, csr = const IRQ_MASK);
            value
        }

        pub unsafe fn set_mask(value: usize) {
            asm!("csrw {csr}, {0}", in(reg) value, csr = const IRQ_MASK);
        }

        pub unsafe fn pending() -> usize {
            let value: usize;
            asm!("csrr {0}, {csr}", out(reg) value, csr = const IRQ_PENDING);
            value
        }
    }

    #[cfg(not(all(target_arch = "riscv32", target_os = "none")))]
    mod host {
        pub unsafe fn global_enable() -> bool {
            false
        }

        pub unsafe fn set_global_enable(_enable: bool) {}

        pub unsafe fn mask() -> usize {
            0
        }

        pub unsafe fn set_mask(_value: usize) {}

        pub unsafe fn pending() -> usize {
            0
        }
    }
}

#[cfg(test)]
mod test {
    extern crate std;

    use super::VexRiscvInterruptController;
    use core::cell::RefCell;
    use kernel::hil::interrupt::InterruptService;
    use std::vec::Vec;

    struct Recorder {
        handled: RefCell<Vec<usize>>,
    }

    impl InterruptService for Recorder {
        fn service_interrupt(&self, interrupt: usize) -> bool {
            self.handled.borrow_mut().push(interrupt);
            interrupt != 5
        }
    }

    #[test]
    fn latched_lines_in_priority_order() {
        let ic = VexRiscvInterruptController::new();
        assert_eq!(ic.next_latched(), None);

        ic.latched.set(0b10_0101);
        assert_eq!(ic.next_latched(), Some(0));
        ic.complete(0);
        assert_eq!(ic.next_latched(), Some(2));
        ic.complete(2);
        assert_eq!(ic.next_latched(), Some(5));
        ic.complete(5);
        assert_eq!(ic.next_latched(), None);

        ic.latched.set(1 << (usize::BITS - 1));
        assert_eq!(ic.next_latched(), Some(usize::BITS as usize - 1));
    }

    #[test]
    fn host_build_reports_disabled() {
        use kernel::hil::interrupt::InterruptControl;

        let ic = VexRiscvInterruptController::new();
        assert!(!ic.interrupts_enabled());
        assert!(!unsafe { ic.latch_pending() });
    }

    #[test]
    fn dispatch_drains_latched_lines() {
        let ic = VexRiscvInterruptController::new();
        let recorder = Recorder {
            handled: RefCell::new(Vec::new()),
        };

        // Line 5 is not claimed by the service
        ic.latched.set((1 << 0) | (1 << 2) | (1 << 5));
        assert_eq!(ic.dispatch_latched(&recorder), 1 << 5);

        assert_eq!(recorder.handled.borrow().as_slice(), &[0, 2, 5]);
        assert_eq!(ic.next_latched(), None);
        assert_eq!(ic.dispatch_latched(&recorder), 0);
    }
}
