// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! LiteX timer core
//!
//! Documentation in `litex/soc/cores/timer.py`.

use kernel::hil::time::Countdown;
use kernel::utilities::registers::interfaces::{Readable, Writeable};
use kernel::utilities::registers::{register_bitfields, register_structs, ReadOnly, ReadWrite};
use kernel::utilities::StaticRef;

use crate::event_manager::LiteXEventManager;

register_structs! {
    pub LiteXTimerRegisters {
        /// Load value when Timer is (re-)enabled. In One-Shot mode, the
        /// value written to this register specifies the Timer's duration
        /// in clock cycles.
        (0x00 => load: ReadWrite<u32>),
        /// Reload value when Timer reaches `0`. In Periodic mode, the
        /// value written to this register specify the Timer's period in
        /// clock cycles.
        (0x04 => reload: ReadWrite<u32>),
        /// Enable flag of the Timer. Set this flag to `1` to enable/start
        /// the Timer. Set to `0` to disable the Timer.
        (0x08 => en: ReadWrite<u32, en::Register>),
        /// Update trigger for the current countdown value. A write to
        /// this register latches the current countdown value to `value`
        /// register.
        (0x0C => update_value: ReadWrite<u32, update_value::Register>),
        /// Latched countdown value. This value is updated by writing to
        /// `update_value`.
        (0x10 => value: ReadOnly<u32>),
        /// LiteX EventManager status register
        (0x14 => ev_status: ReadOnly<u32>),
        /// LiteX EventManager pending register
        (0x18 => ev_pending: ReadWrite<u32>),
        /// LiteX EventManager enable register
        (0x1C => ev_enable: ReadWrite<u32>),
        (0x20 => @END),
    }
}

register_bitfields![u32,
    en [
        enable OFFSET(0) NUMBITS(1) []
    ],
    update_value [
        latch_value OFFSET(0) NUMBITS(1) []
    ]
];

impl LiteXTimerRegisters {
    fn ev(&self) -> LiteXEventManager<'_> {
        LiteXEventManager::new(&self.ev_status, &self.ev_pending, &self.ev_enable)
    }
}

/// Hardware timer peripheral found on LiteX SoCs, used as a polled one-shot
/// countdown.
///
/// The BIOS keeps interrupts of this timer disabled; it only starts a
/// countdown and samples the latched value.
pub struct LiteXTimer {
    registers: StaticRef<LiteXTimerRegisters>,
}

impl LiteXTimer {
    pub const fn new(base: StaticRef<LiteXTimerRegisters>) -> LiteXTimer {
        LiteXTimer { registers: base }
    }

    /// Stop the timer and suppress its events.
    pub fn initialize(&self) {
        self.registers.ev().disable_all();
        self.registers.en.write(en::enable::CLEAR);
    }

    /// Latch and return the current countdown value.
    pub fn value(&self) -> u32 {
        self.registers
            .update_value
            .write(update_value::latch_value::SET);
        self.registers.value.get()
    }
}

impl Countdown for LiteXTimer {
    fn start(&self, ticks: u32) {
        let regs = self.registers;
        regs.en.write(en::enable::CLEAR);
        regs.reload.set(0);
        regs.load.set(ticks);
        regs.en.write(en::enable::SET);
    }

    fn expired(&self) -> bool {
        self.value() == 0
    }

    fn stop(&self) {
        self.registers.en.write(en::enable::CLEAR);
    }
}

#[cfg(test)]
mod test {
    use super::{LiteXTimer, LiteXTimerRegisters};
    use core::cell::Cell;
    use kernel::hil::time::Countdown;
    use kernel::utilities::StaticRef;

    const LOAD: usize = 0;
    const RELOAD: usize = 1;
    const EN: usize = 2;
    const UPDATE_VALUE: usize = 3;
    const VALUE: usize = 4;
    const EV_ENABLE: usize = 7;

    fn timer_over(mem: &[Cell<u32>; 8]) -> LiteXTimer {
        unsafe { LiteXTimer::new(StaticRef::new(mem.as_ptr() as *const LiteXTimerRegisters)) }
    }

    #[test]
    fn start_programs_one_shot() {
        let mem: [Cell<u32>; 8] = Default::default();
        mem[RELOAD].set(0xdead);
        let timer = timer_over(&mem);

        timer.start(25_000_000);
        assert_eq!(mem[LOAD].get(), 25_000_000);
        assert_eq!(mem[RELOAD].get(), 0);
        assert_eq!(mem[EN].get(), 1);

        timer.stop();
        assert_eq!(mem[EN].get(), 0);
    }

    #[test]
    fn expired_latches_value() {
        let mem: [Cell<u32>; 8] = Default::default();
        let timer = timer_over(&mem);

        mem[VALUE].set(17);
        assert!(!timer.expired());
        assert_eq!(mem[UPDATE_VALUE].get(), 1);

        mem[VALUE].set(0);
        assert!(timer.expired());
    }

    #[test]
    fn initialize_disables_events() {
        let mem: [Cell<u32>; 8] = Default::default();
        mem[EV_ENABLE].set(1);
        mem[EN].set(1);
        let timer = timer_over(&mem);

        timer.initialize();
        assert_eq!(mem[EV_ENABLE].get(), 0);
        assert_eq!(mem[EN].get(), 0);
    }
}
