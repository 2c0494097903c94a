// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Target side of an SFL session.
//!
//! A session announces itself with the request magic, waits for the host's
//! ack magic and then processes frames until the host aborts or jumps to the
//! loaded image:
//!
//! ```rust,ignore
//! let mut boot = SerialBoot::new(uart, ram, timer, SerialBootConfig::litex_bios(SYSTEM_CLOCK));
//! match boot.run() {
//!     Outcome::Jump(params) => unsafe {
//!         let cmdline = place_cmdline(params.cmdline());
//!         litex_vexriscv::boot::jump(
//!             &interrupt_controller,
//!             params.entry,
//!             cmdline,
//!             params.initrd_start,
//!             params.initrd_end,
//!         )
//!     },
//!     _ => { /* next boot method */ }
//! }
//! ```
//!
//! Every completed frame is answered with exactly one [`Ack`] byte. Errors
//! are reported to the host and never end the session on their own, unless a
//! limit of consecutive failures is configured.

use kernel::config::CONFIG;
use kernel::debug;
use kernel::hil::memory::LoadTarget;
use kernel::hil::time::Countdown;
use kernel::hil::uart::ByteTransport;

use super::frame::{Frame, FrameDecoder};
use super::handshake::MagicMatcher;
use super::{Ack, Command, MAGIC_ACK, MAGIC_REQ, MAX_PAYLOAD_LEN};

/// Runtime parameters of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SerialBootConfig {
    /// Countdown ticks to wait for the ack magic.
    pub handshake_timeout: u32,
    /// End the session after this many failed frames in a row.
    pub max_consecutive_failures: Option<usize>,
    /// Drop a partially received frame after this many countdown ticks
    /// without a new byte. No ack is sent for the dropped frame.
    pub stall_timeout: Option<u32>,
}

impl SerialBootConfig {
    pub const fn new(handshake_timeout: u32) -> SerialBootConfig {
        SerialBootConfig {
            handshake_timeout,
            max_consecutive_failures: None,
            stall_timeout: None,
        }
    }

    /// Parameters of the LiteX BIOS: a quarter second handshake and at most
    /// five failed frames in a row.
    pub const fn litex_bios(system_clock: u32) -> SerialBootConfig {
        SerialBootConfig {
            handshake_timeout: system_clock / 4,
            max_consecutive_failures: Some(5),
            stall_timeout: None,
        }
    }
}

/// Parameters collected during a session, passed to the loaded image.
#[derive(Clone, Copy, Debug)]
pub struct BootParams {
    pub entry: u32,
    pub initrd_start: u32,
    pub initrd_end: u32,
    cmdline: [u8; MAX_PAYLOAD_LEN],
    cmdline_len: usize,
}

impl BootParams {
    const fn new() -> BootParams {
        BootParams {
            entry: 0,
            initrd_start: 0,
            initrd_end: 0,
            cmdline: [0; MAX_PAYLOAD_LEN],
            cmdline_len: 0,
        }
    }

    /// The kernel command line, empty if none was sent.
    pub fn cmdline(&self) -> &[u8] {
        &self.cmdline[..self.cmdline_len]
    }

    fn set_cmdline(&mut self, cmdline: &[u8]) {
        let len = cmdline.len().min(MAX_PAYLOAD_LEN);
        self.cmdline[..len].copy_from_slice(&cmdline[..len]);
        self.cmdline_len = len;
    }
}

impl PartialEq for BootParams {
    fn eq(&self, other: &BootParams) -> bool {
        self.entry == other.entry
            && self.initrd_start == other.initrd_start
            && self.initrd_end == other.initrd_end
            && self.cmdline() == other.cmdline()
    }
}

impl Eq for BootParams {}

/// How a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The host did not answer the handshake in time.
    Timeout,
    /// The host sent an abort command.
    Aborted,
    /// The host asked to start the loaded image. The ack has been flushed,
    /// the caller transfers control.
    Jump(BootParams),
    /// Too many failed frames in a row.
    TooManyErrors,
}

/// What to do after a successful command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Continue,
    Abort,
    Jump,
}

struct CommandEntry<S> {
    command: Command,
    handler: fn(&mut S, &[u8]) -> Result<Action, Ack>,
}

pub struct SerialBoot<'a, T: ByteTransport, L: LoadTarget, C: Countdown> {
    transport: &'a T,
    target: &'a L,
    countdown: &'a C,
    config: SerialBootConfig,
    decoder: FrameDecoder,
    params: BootParams,
    failures: usize,
    stall_armed: bool,
}

impl<'a, T: ByteTransport, L: LoadTarget, C: Countdown> SerialBoot<'a, T, L, C> {
    const COMMANDS: [CommandEntry<Self>; 6] = [
        CommandEntry {
            command: Command::Abort,
            handler: Self::cmd_abort,
        },
        CommandEntry {
            command: Command::Load,
            handler: Self::cmd_load,
        },
        CommandEntry {
            command: Command::Jump,
            handler: Self::cmd_jump,
        },
        CommandEntry {
            command: Command::Cmdline,
            handler: Self::cmd_cmdline,
        },
        CommandEntry {
            command: Command::InitrdStart,
            handler: Self::cmd_initrd_start,
        },
        CommandEntry {
            command: Command::InitrdEnd,
            handler: Self::cmd_initrd_end,
        },
    ];

    /// `countdown` times the handshake and, if configured, stalled frames.
    pub fn new(
        transport: &'a T,
        target: &'a L,
        countdown: &'a C,
        config: SerialBootConfig,
    ) -> SerialBoot<'a, T, L, C> {
        SerialBoot {
            transport,
            target,
            countdown,
            config,
            decoder: FrameDecoder::new(),
            params: BootParams::new(),
            failures: 0,
            stall_armed: false,
        }
    }

    /// Run a complete session: handshake, then frames until an outcome.
    pub fn run(&mut self) -> Outcome {
        debug!("Booting from serial...");
        self.reset();

        if !self.handshake() {
            debug!("Timeout");
            return Outcome::Timeout;
        }

        loop {
            if let Some(outcome) = self.poll() {
                return outcome;
            }
        }
    }

    /// Send the request magic and wait for the ack magic.
    ///
    /// Returns `false` if the countdown expired first.
    pub fn handshake(&mut self) -> bool {
        self.transport.write_all(MAGIC_REQ);

        let mut matcher = MagicMatcher::new(MAGIC_ACK);
        self.countdown.start(self.config.handshake_timeout);
        let recognized = loop {
            if self.countdown.expired() {
                break false;
            }
            if self.transport.read_nonblock() && matcher.push(self.transport.read()) {
                break true;
            }
        };
        self.countdown.stop();
        recognized
    }

    /// Process every byte the transport has buffered. Never waits for more.
    ///
    /// Returns the outcome once a frame ends the session. Bytes after that
    /// frame are left unread.
    pub fn poll(&mut self) -> Option<Outcome> {
        while self.transport.read_nonblock() {
            let byte = self.transport.read();
            match self.decoder.push(byte) {
                Some(frame) => {
                    self.disarm_stall();
                    if let Some(outcome) = self.process(&frame) {
                        return Some(outcome);
                    }
                }
                None => self.arm_stall(),
            }
        }

        if self.stall_armed && self.countdown.expired() {
            debug!("Serial boot: dropping stalled frame");
            self.decoder.reset();
            self.disarm_stall();
        }
        None
    }

    /// Parameters received so far.
    pub fn params(&self) -> &BootParams {
        &self.params
    }

    /// Forget any session state, including a partially received frame.
    pub fn reset(&mut self) {
        self.decoder.reset();
        self.params = BootParams::new();
        self.failures = 0;
        self.disarm_stall();
    }

    fn arm_stall(&mut self) {
        if let Some(ticks) = self.config.stall_timeout {
            self.countdown.start(ticks);
            self.stall_armed = true;
        }
    }

    fn disarm_stall(&mut self) {
        if self.stall_armed {
            self.countdown.stop();
            self.stall_armed = false;
        }
    }

    /// Validate, dispatch and acknowledge a complete frame.
    fn process(&mut self, frame: &Frame) -> Option<Outcome> {
        let (ack, action) = if !frame.crc_valid() {
            (Ack::CrcError, Action::Continue)
        } else {
            match self.dispatch(frame) {
                Ok(action) => (Ack::Success, action),
                Err(ack) => (ack, Action::Continue),
            }
        };

        if CONFIG.trace_serialboot {
            debug!(
                "sfl: cmd {:#04x} len {} -> {}",
                frame.cmd(),
                frame.length(),
                u8::from(ack) as char
            );
        }
        self.transport.write(ack.into());

        if ack == Ack::Success {
            self.failures = 0;
        } else {
            self.failures += 1;
            if let Some(max) = self.config.max_consecutive_failures {
                if self.failures >= max {
                    debug!("Too many consecutive errors, aborting");
                    return Some(Outcome::TooManyErrors);
                }
            }
        }

        match action {
            Action::Continue => None,
            Action::Abort => Some(Outcome::Aborted),
            Action::Jump => {
                debug!("Executing booted program at {:#010x}", self.params.entry);
                self.transport.sync();
                Some(Outcome::Jump(self.params))
            }
        }
    }

    fn dispatch(&mut self, frame: &Frame) -> Result<Action, Ack> {
        let command = Command::try_from(frame.cmd()).map_err(|_| Ack::Unknown)?;
        let handler = Self::COMMANDS
            .iter()
            .find(|entry| entry.command == command)
            .map(|entry| entry.handler)
            .ok_or(Ack::Unknown)?;
        handler(self, frame.payload())
    }

    fn cmd_abort(&mut self, _payload: &[u8]) -> Result<Action, Ack> {
        Ok(Action::Abort)
    }

    fn cmd_load(&mut self, payload: &[u8]) -> Result<Action, Ack> {
        let address = be_address(payload)?;
        self.target
            .load(address, &payload[4..])
            .map_err(|_| Ack::Error)?;
        Ok(Action::Continue)
    }

    fn cmd_jump(&mut self, payload: &[u8]) -> Result<Action, Ack> {
        self.params.entry = be_address(payload)?;
        Ok(Action::Jump)
    }

    fn cmd_cmdline(&mut self, payload: &[u8]) -> Result<Action, Ack> {
        self.params.set_cmdline(payload);
        Ok(Action::Continue)
    }

    fn cmd_initrd_start(&mut self, payload: &[u8]) -> Result<Action, Ack> {
        self.params.initrd_start = be_address(payload)?;
        Ok(Action::Continue)
    }

    fn cmd_initrd_end(&mut self, payload: &[u8]) -> Result<Action, Ack> {
        self.params.initrd_end = be_address(payload)?;
        Ok(Action::Continue)
    }
}

/// The big-endian address in the first four payload bytes.
fn be_address(payload: &[u8]) -> Result<u32, Ack> {
    payload
        .get(..4)
        .and_then(|bytes| <[u8; 4]>::try_from(bytes).ok())
        .map(u32::from_be_bytes)
        .ok_or(Ack::Error)
}
