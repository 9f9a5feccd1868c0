// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Interface for secondary interrupt controllers chained behind a primary
//! controller.
//!
//! Some SoCs put a second masking stage (for example a power controller that
//! decides which lines may wake the system) in front of the primary interrupt
//! controller. The host calls into the secondary stage every time it masks,
//! unmasks or changes the wake configuration of a line, so both stages stay
//! in agreement.
//!
//! Lines `0..32` are private per-core interrupts on the platforms this is
//! used with; implementations ignore them in `mask`/`unmask` and reject them
//! in `set_wake`.

use crate::ErrorCode;

/// Number of private per-core lines that are never routed through a chained
/// controller.
pub const PRIVATE_LINES: u32 = 32;

/// Mask, unmask and wake hooks a chained controller offers its host.
pub trait InterruptChain {
    /// Mask `line` in the chained controller. Private lines are ignored.
    fn mask(&self, line: u32);

    /// Unmask `line` in the chained controller. Private lines are ignored.
    fn unmask(&self, line: u32);

    /// Allow (`enable == true`) or forbid `line` to wake the system from a
    /// low power state.
    ///
    /// Returns `Err(ErrorCode::INVAL)` for private lines.
    fn set_wake(&self, line: u32, enable: bool) -> Result<(), ErrorCode>;
}
