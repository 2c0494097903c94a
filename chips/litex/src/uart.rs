// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! LiteX UART core
//!
//! Documentation in `litex/soc/cores/uart.py`.
//!
//! This driver only exposes the single-byte register interface
//! ([`UartHardware`]); buffering and interrupt handling live in the
//! hardware-independent `BufferedUart` capsule.

use kernel::hil::uart::UartHardware;
use kernel::utilities::registers::interfaces::{Readable, Writeable};
use kernel::utilities::registers::{register_bitfields, register_structs, ReadOnly, ReadWrite};
use kernel::utilities::StaticRef;
use kernel::ErrorCode;

use crate::event_manager::LiteXEventManager;

const EVENT_MANAGER_INDEX_TX: usize = 0;
const EVENT_MANAGER_INDEX_RX: usize = 1;

register_structs! {
    /// LiteX UART registers
    pub LiteXUartRegisters {
        /// receive & transmit register
        (0x00 => rxtx: ReadWrite<u32, rxtx::Register>),
        /// transmit buffer full
        (0x04 => txfull: ReadOnly<u32, txfull::Register>),
        /// receive buffer empty
        (0x08 => rxempty: ReadOnly<u32, rxempty::Register>),
        /// LiteX EventManager status register
        (0x0C => ev_status: ReadOnly<u32>),
        /// LiteX EventManager pending register
        (0x10 => ev_pending: ReadWrite<u32>),
        /// LiteX EventManager enable register
        (0x14 => ev_enable: ReadWrite<u32>),
        /// transmit buffer empty
        (0x18 => txempty: ReadOnly<u32, txempty::Register>),
        /// receive buffer full, unused
        (0x1C => _rxfull),
        (0x20 => @END),
    }
}

register_structs! {
    /// LiteX UART PHY registers
    ///
    /// This is a separate register set, as it is not present on every LiteX
    /// SoC with a UART (e.g. a verilated simulation)
    pub LiteXUartPhyRegisters {
        /// Tuning word (UART baudrate)
        (0x00 => tuning_word: ReadWrite<u32>),
        (0x04 => @END),
    }
}

register_bitfields![u32,
    rxtx [
        data OFFSET(0) NUMBITS(8) []
    ],
    txfull [
        full OFFSET(0) NUMBITS(1) []
    ],
    rxempty [
        empty OFFSET(0) NUMBITS(1) []
    ],
    txempty [
        empty OFFSET(0) NUMBITS(1) []
    ]
];

impl LiteXUartRegisters {
    /// Create an event manager instance for the UART events
    fn ev(&self) -> LiteXEventManager<'_> {
        LiteXEventManager::new(&self.ev_status, &self.ev_pending, &self.ev_enable)
    }
}

/// Compute the PHY tuning word for `baud_rate` at `system_clock` Hz.
///
/// The PHY adds the tuning word to a 32 bit phase accumulator every system
/// clock cycle and samples a bit on overflow.
pub fn tuning_word(baud_rate: u32, system_clock: u32) -> Result<u32, ErrorCode> {
    if baud_rate == 0 || baud_rate > system_clock {
        Err(ErrorCode::INVAL)
    } else if baud_rate == system_clock {
        Ok(u32::MAX)
    } else {
        Ok((((baud_rate as u64) << 32) / (system_clock as u64)) as u32)
    }
}

pub struct LiteXUart {
    uart_regs: StaticRef<LiteXUartRegisters>,
    phy: Option<(StaticRef<LiteXUartPhyRegisters>, u32)>,
}

impl LiteXUart {
    /// `phy_args` carries the PHY registers and the system clock frequency
    /// in Hz, if the SoC has a configurable PHY.
    pub const fn new(
        uart_base: StaticRef<LiteXUartRegisters>,
        phy_args: Option<(StaticRef<LiteXUartPhyRegisters>, u32)>,
    ) -> LiteXUart {
        LiteXUart {
            uart_regs: uart_base,
            phy: phy_args,
        }
    }

    /// Set the baud rate.
    ///
    /// The LiteX UART only supports 8N1 without flow control, the baud rate
    /// is the only parameter.
    pub fn configure_baud(&self, baud_rate: u32) -> Result<(), ErrorCode> {
        match self.phy {
            Some((ref phy_regs, system_clock)) => {
                let word = tuning_word(baud_rate, system_clock)?;
                phy_regs.tuning_word.set(word);
                Ok(())
            }
            None => Err(ErrorCode::NOSUPPORT),
        }
    }
}

impl UartHardware for LiteXUart {
    fn tx_ready(&self) -> bool {
        !self.uart_regs.txfull.is_set(txfull::full)
    }

    fn tx_put(&self, byte: u8) {
        self.uart_regs.rxtx.write(rxtx::data.val(byte as u32));
    }

    fn tx_idle(&self) -> bool {
        self.uart_regs.txempty.is_set(txempty::empty)
    }

    fn rx_ready(&self) -> bool {
        !self.uart_regs.rxempty.is_set(rxempty::empty)
    }

    fn rx_get(&self) -> u8 {
        self.uart_regs.rxtx.read(rxtx::data) as u8
    }

    fn rx_event_pending(&self) -> bool {
        self.uart_regs.ev().event_pending(EVENT_MANAGER_INDEX_RX)
    }

    fn tx_event_pending(&self) -> bool {
        self.uart_regs.ev().event_pending(EVENT_MANAGER_INDEX_TX)
    }

    fn ack_rx_event(&self) {
        // Clearing the RX event pops the byte from the receive FIFO
        self.uart_regs.ev().clear_event(EVENT_MANAGER_INDEX_RX);
    }

    fn ack_tx_event(&self) {
        self.uart_regs.ev().clear_event(EVENT_MANAGER_INDEX_TX);
    }

    fn clear_pending_events(&self) {
        self.uart_regs.ev().clear_pending();
    }

    fn enable_events(&self) {
        self.uart_regs
            .ev()
            .enable_events((1 << EVENT_MANAGER_INDEX_TX) | (1 << EVENT_MANAGER_INDEX_RX));
    }
}

#[cfg(test)]
mod test {
    use super::{tuning_word, LiteXUart, LiteXUartPhyRegisters, LiteXUartRegisters};
    use core::cell::Cell;
    use kernel::hil::uart::UartHardware;
    use kernel::utilities::StaticRef;
    use kernel::ErrorCode;

    const RXTX: usize = 0;
    const TXFULL: usize = 1;
    const RXEMPTY: usize = 2;
    const EV_PENDING: usize = 4;
    const EV_ENABLE: usize = 5;
    const TXEMPTY: usize = 6;

    fn uart_over(mem: &[Cell<u32>; 8], phy: Option<(&Cell<u32>, u32)>) -> LiteXUart {
        unsafe {
            LiteXUart::new(
                StaticRef::new(mem.as_ptr() as *const LiteXUartRegisters),
                phy.map(|(word, clk)| {
                    (
                        StaticRef::new(word as *const Cell<u32> as *const LiteXUartPhyRegisters),
                        clk,
                    )
                }),
            )
        }
    }

    #[test]
    fn tuning_word_matches_litex_formula() {
        // 115200 baud at 100 MHz, as computed by litex/soc/cores/uart.py
        assert_eq!(tuning_word(115200, 100_000_000), Ok(4947802));
        assert_eq!(tuning_word(1_000_000, 1_000_000), Ok(u32::MAX));
        assert_eq!(tuning_word(0, 100_000_000), Err(ErrorCode::INVAL));
        assert_eq!(tuning_word(2_000_000, 1_000_000), Err(ErrorCode::INVAL));
    }

    #[test]
    fn configure_baud_requires_phy() {
        let mem: [Cell<u32>; 8] = Default::default();
        let word = Cell::new(0);

        let uart = uart_over(&mem, None);
        assert_eq!(uart.configure_baud(115200), Err(ErrorCode::NOSUPPORT));

        let uart = uart_over(&mem, Some((&word, 100_000_000)));
        assert_eq!(uart.configure_baud(115200), Ok(()));
        assert_eq!(word.get(), 4947802);
    }

    #[test]
    fn register_level_byte_access() {
        let mem: [Cell<u32>; 8] = Default::default();
        let uart = uart_over(&mem, None);

        mem[TXFULL].set(1);
        assert!(!uart.tx_ready());
        mem[TXFULL].set(0);
        assert!(uart.tx_ready());
        uart.tx_put(0xA5);
        assert_eq!(mem[RXTX].get(), 0xA5);

        mem[RXEMPTY].set(1);
        assert!(!uart.rx_ready());
        mem[RXEMPTY].set(0);
        mem[RXTX].set(0x1_42);
        assert!(uart.rx_ready());
        assert_eq!(uart.rx_get(), 0x42);

        assert!(!uart.tx_idle());
        mem[TXEMPTY].set(1);
        assert!(uart.tx_idle());
    }

    #[test]
    fn event_bits() {
        let mem: [Cell<u32>; 8] = Default::default();
        let uart = uart_over(&mem, None);

        uart.enable_events();
        assert_eq!(mem[EV_ENABLE].get(), 0b11);

        mem[EV_PENDING].set(0b10);
        assert!(uart.rx_event_pending());
        assert!(!uart.tx_event_pending());

        uart.ack_tx_event();
        assert_eq!(mem[EV_PENDING].get(), 0b01);
        uart.ack_rx_event();
        assert_eq!(mem[EV_PENDING].get(), 0b10);
    }
}
