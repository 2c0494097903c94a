// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Transfer of control to a serially loaded image.

#[cfg(all(target_arch = "riscv32", target_os = "none"))]
use core::arch::asm;

use crate::interrupt_controller::VexRiscvInterruptController;

/// Jump to `entry` with `r1`, `r2` and `r3` in the first argument registers
/// (`a0`..`a2`) and `0` in `a3`.
///
/// Interrupts are disabled and the instruction cache is flushed before the
/// jump, as the image was just written through the data bus.
///
/// # Safety
///
/// `entry` must be the address of valid code for this CPU. Nothing of the
/// current program survives the call.
#[cfg(all(target_arch = "riscv32", target_os = "none"))]
pub unsafe fn jump(
    interrupt_controller: &VexRiscvInterruptController,
    entry: u32,
    r1: u32,
    r2: u32,
    r3: u32,
) -> ! {
    interrupt_controller.disable_interrupts();
    asm!("fence.i", "fence");
    let entry: extern "C" fn(usize, usize, usize, usize) -> ! =
        core::mem::transmute(entry as usize);
    entry(r1 as usize, r2 as usize, r3 as usize, 0)
}

/// Host builds cannot transfer control to a loaded image.
#[cfg(not(all(target_arch = "riscv32", target_os = "none")))]
pub unsafe fn jump(
    interrupt_controller: &VexRiscvInterruptController,
    entry: u32,
    _r1: u32,
    _r2: u32,
    _r3: u32,
) -> ! {
    interrupt_controller.disable_interrupts();
    panic!("jump to {:#010x} is only supported on VexRiscv", entry)
}
