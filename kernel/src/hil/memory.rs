// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Interface for writing loaded images into memory.

use crate::ErrorCode;

/// Destination for images received by a boot loader.
pub trait LoadTarget {
    /// Copy `data` verbatim to the bus address `address`.
    ///
    /// Returns `INVAL` if the range is not writable by the loader. Nothing is
    /// written in that case.
    fn load(&self, address: u32, data: &[u8]) -> Result<(), ErrorCode>;
}
