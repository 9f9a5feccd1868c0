// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! System low power mode selection.

use kernel::utilities::registers::interfaces::{Readable, Writeable};
use kernel::ErrorCode;

use super::registers::{LPCR_A7_BSC, SLPCR};
use super::{Gpc, Locked};

/// Line that must be masked in the GPC whenever the A7 clock is gated in low
/// power mode, and unmasked otherwise. Without it the GPC can miss a wakeup
/// that races with low power entry.
const WORKAROUND_LINE: u32 = 32;

/// System-wide sleep depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LowPowerMode {
    /// WAIT with the A7 clock left running
    WaitClocked,
    /// WAIT with the A7 clock gated
    WaitUnclocked,
    /// STOP (deep sleep) with the oscillator and supply left on
    StopPowerOn,
    /// STOP with the oscillator off and the supply in standby
    StopPowerOff,
}

impl TryFrom<u32> for LowPowerMode {
    type Error = ErrorCode;

    /// Decode the platform's numeric CPU power mode. 2 (WAIT with power
    /// off) is not handled by this controller.
    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(LowPowerMode::WaitClocked),
            1 => Ok(LowPowerMode::WaitUnclocked),
            3 => Ok(LowPowerMode::StopPowerOn),
            4 => Ok(LowPowerMode::StopPowerOff),
            _ => Err(ErrorCode::NOSUPPORT),
        }
    }
}

impl Locked<'_> {
    pub(crate) fn set_lpm_mode(&mut self, mode: LowPowerMode) {
        let mut bsc = self.regs.lpcr_a7_bsc.extract();
        let mut slpcr = self.regs.slpcr.extract();

        bsc.modify(LPCR_A7_BSC::LPM::Run + LPCR_A7_BSC::CPU_CLK_ON_LPM::SET);
        slpcr.modify(
            SLPCR::EN_DSM::CLEAR
                + SLPCR::VSTBY::CLEAR
                + SLPCR::RBC_EN::CLEAR
                + SLPCR::SBYOS::CLEAR
                + SLPCR::BYPASS_PMIC_READY::CLEAR,
        );

        match mode {
            LowPowerMode::WaitClocked => {
                self.unmask_line(WORKAROUND_LINE);
            }
            LowPowerMode::WaitUnclocked => {
                bsc.modify(LPCR_A7_BSC::LPM::Wait + LPCR_A7_BSC::CPU_CLK_ON_LPM::CLEAR);
                self.mask_line(WORKAROUND_LINE);
            }
            LowPowerMode::StopPowerOn | LowPowerMode::StopPowerOff => {
                bsc.modify(LPCR_A7_BSC::LPM::Stop + LPCR_A7_BSC::CPU_CLK_ON_LPM::CLEAR);
                slpcr.modify(
                    SLPCR::EN_DSM::SET + SLPCR::RBC_EN::SET + SLPCR::BYPASS_PMIC_READY::SET,
                );
                if mode == LowPowerMode::StopPowerOff {
                    slpcr.modify(SLPCR::SBYOS::SET + SLPCR::VSTBY::SET);
                }
                self.mask_line(WORKAROUND_LINE);
            }
        }

        self.regs.lpcr_a7_bsc.set(bsc.get());
        self.regs.slpcr.set(slpcr.get());
    }
}

impl Gpc {
    /// Program the low power mode entered on the next WFI.
    ///
    /// The previous mode is not tracked; every call rewrites the mode and
    /// sleep fields from scratch.
    pub fn set_lpm_mode(&self, mode: LowPowerMode) {
        self.lock().set_lpm_mode(mode);
    }

    /// Like [`Gpc::set_lpm_mode`], for hosts that pass the numeric CPU power
    /// mode. Values that do not name a supported mode are ignored.
    pub fn set_lpm_mode_raw(&self, raw: u32) {
        if let Ok(mode) = LowPowerMode::try_from(raw) {
            self.set_lpm_mode(mode);
        }
    }

    /// The mode currently programmed, or `None` if the registers hold a
    /// combination this driver never writes.
    pub fn lpm_mode(&self) -> Option<LowPowerMode> {
        let bsc = self.registers.lpcr_a7_bsc.extract();
        let clocked = bsc.is_set(LPCR_A7_BSC::CPU_CLK_ON_LPM);
        match bsc.read_as_enum(LPCR_A7_BSC::LPM) {
            Some(LPCR_A7_BSC::LPM::Value::Run) if clocked => Some(LowPowerMode::WaitClocked),
            Some(LPCR_A7_BSC::LPM::Value::Wait) if !clocked => Some(LowPowerMode::WaitUnclocked),
            Some(LPCR_A7_BSC::LPM::Value::Stop) if !clocked => {
                if self.registers.slpcr.is_set(SLPCR::SBYOS) {
                    Some(LowPowerMode::StopPowerOff)
                } else {
                    Some(LowPowerMode::StopPowerOn)
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::registers::{LPCR_A7_BSC, SLPCR};
    use super::super::testing::default_gpc;
    use super::LowPowerMode;
    use kernel::utilities::registers::interfaces::{Readable, Writeable};
    use kernel::ErrorCode;

    #[test]
    fn stop_power_off_programs_deep_sleep() {
        let gpc = default_gpc();
        gpc.set_lpm_mode(LowPowerMode::StopPowerOff);

        let regs = &*gpc.registers;
        assert_eq!(regs.lpcr_a7_bsc.read(LPCR_A7_BSC::LPM), 0xA);
        assert!(!regs.lpcr_a7_bsc.is_set(LPCR_A7_BSC::CPU_CLK_ON_LPM));
        assert!(regs.slpcr.is_set(SLPCR::EN_DSM));
        assert!(regs.slpcr.is_set(SLPCR::SBYOS));
        assert!(regs.slpcr.is_set(SLPCR::VSTBY));
        assert!(regs.slpcr.is_set(SLPCR::BYPASS_PMIC_READY));
        assert!(regs.slpcr.is_set(SLPCR::RBC_EN));
        assert_eq!(regs.imr_core0[0].get() & 1, 1);
        assert_eq!(gpc.lpm_mode(), Some(LowPowerMode::StopPowerOff));
    }

    #[test]
    fn stop_power_on_leaves_oscillator_and_supply() {
        let gpc = default_gpc();
        gpc.set_lpm_mode(LowPowerMode::StopPowerOff);
        gpc.set_lpm_mode(LowPowerMode::StopPowerOn);

        let regs = &*gpc.registers;
        assert_eq!(regs.lpcr_a7_bsc.read(LPCR_A7_BSC::LPM), 0xA);
        assert!(regs.slpcr.is_set(SLPCR::EN_DSM));
        assert!(!regs.slpcr.is_set(SLPCR::SBYOS));
        assert!(!regs.slpcr.is_set(SLPCR::VSTBY));
        assert_eq!(gpc.lpm_mode(), Some(LowPowerMode::StopPowerOn));
    }

    #[test]
    fn wait_modes_toggle_workaround_line() {
        let gpc = default_gpc();
        let regs = &*gpc.registers;

        gpc.set_lpm_mode(LowPowerMode::WaitUnclocked);
        assert_eq!(regs.lpcr_a7_bsc.read(LPCR_A7_BSC::LPM), 0x5);
        assert!(!regs.lpcr_a7_bsc.is_set(LPCR_A7_BSC::CPU_CLK_ON_LPM));
        assert_eq!(regs.imr_core0[0].get() & 1, 1);
        assert_eq!(gpc.lpm_mode(), Some(LowPowerMode::WaitUnclocked));

        gpc.set_lpm_mode(LowPowerMode::WaitClocked);
        assert_eq!(regs.lpcr_a7_bsc.read(LPCR_A7_BSC::LPM), 0);
        assert!(regs.lpcr_a7_bsc.is_set(LPCR_A7_BSC::CPU_CLK_ON_LPM));
        assert_eq!(regs.imr_core0[0].get() & 1, 0);
        assert_eq!(regs.slpcr.get(), 0);
        assert_eq!(gpc.lpm_mode(), Some(LowPowerMode::WaitClocked));
    }

    #[test]
    fn mode_change_keeps_unrelated_bits() {
        let gpc = default_gpc();
        let regs = &*gpc.registers;
        regs.lpcr_a7_bsc.write(LPCR_A7_BSC::IRQ_SRC::ExternalOnly);
        regs.slpcr.write(SLPCR::EN_A7_FASTWUP_WAIT_MODE::SET);

        gpc.set_lpm_mode(LowPowerMode::StopPowerOff);
        gpc.set_lpm_mode(LowPowerMode::WaitClocked);

        assert_eq!(regs.lpcr_a7_bsc.read(LPCR_A7_BSC::IRQ_SRC), 0b111);
        assert_eq!(regs.slpcr.get(), SLPCR::EN_A7_FASTWUP_WAIT_MODE::SET.value);
    }

    #[test]
    fn raw_modes_decode() {
        assert_eq!(LowPowerMode::try_from(0), Ok(LowPowerMode::WaitClocked));
        assert_eq!(LowPowerMode::try_from(1), Ok(LowPowerMode::WaitUnclocked));
        assert_eq!(LowPowerMode::try_from(2), Err(ErrorCode::NOSUPPORT));
        assert_eq!(LowPowerMode::try_from(3), Ok(LowPowerMode::StopPowerOn));
        assert_eq!(LowPowerMode::try_from(4), Ok(LowPowerMode::StopPowerOff));
        assert_eq!(LowPowerMode::try_from(5), Err(ErrorCode::NOSUPPORT));
    }

    #[test]
    fn unknown_raw_mode_writes_nothing() {
        let gpc = default_gpc();
        let regs = &*gpc.registers;
        regs.lpcr_a7_bsc.set(0x1234_0005);
        regs.slpcr.set(0x8000_0007);
        regs.imr_core0[0].set(0xFFFF_FFFE);

        gpc.set_lpm_mode_raw(2);
        gpc.set_lpm_mode_raw(17);

        assert_eq!(regs.lpcr_a7_bsc.get(), 0x1234_0005);
        assert_eq!(regs.slpcr.get(), 0x8000_0007);
        assert_eq!(regs.imr_core0[0].get(), 0xFFFF_FFFE);

        gpc.set_lpm_mode_raw(4);
        assert_eq!(gpc.lpm_mode(), Some(LowPowerMode::StopPowerOff));
    }
}
