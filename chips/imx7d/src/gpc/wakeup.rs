// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Wakeup source masking and the sleep entry and exit sequences.
//!
//! While running, the core 0 IMR words follow the host's mask state line by
//! line. Before sleeping they are saved and replaced by the complement of
//! the wake bitmap, so only wake-capable lines can bring the system back.

use kernel::hil::irq::InterruptChain;
use kernel::utilities::registers::interfaces::{Readable, Writeable};
use kernel::ErrorCode;
use log::warn;

use super::bitmap::{line_position, IrqBitmap};
use super::cpu::A7Core;
use super::domain::{PowerDomain, SlotDirection};
use super::lpm::LowPowerMode;
use super::registers::IMR_NUM;
use super::{arm_cell, Gpc, Locked};

impl Locked<'_> {
    pub(crate) fn mask_line(&mut self, line: u32) {
        if let Some((index, bit)) = line_position(line) {
            let imr = &self.regs.imr_core0[index];
            imr.set(imr.get() | bit);
        }
    }

    pub(crate) fn unmask_line(&mut self, line: u32) {
        if let Some((index, bit)) = line_position(line) {
            let imr = &self.regs.imr_core0[index];
            imr.set(imr.get() & !bit);
        }
    }

    fn save_and_write_imrs(&mut self, words: [u32; IMR_NUM]) {
        for (i, imr) in self.regs.imr_core0.iter().enumerate() {
            self.state.saved_imrs[i] = imr.get();
            imr.set(words[i]);
        }
    }

    fn restore_imrs(&mut self) {
        for (imr, &saved) in self.regs.imr_core0.iter().zip(self.state.saved_imrs.iter()) {
            imr.set(saved);
        }
    }

    fn enter_sleep(&mut self, power_off: bool) {
        if power_off {
            self.set_lpm_mode(LowPowerMode::StopPowerOff);
            self.set_cpu_power_gate_by_lpm(A7Core::Core0, true);
            self.set_plat_power_gate_by_lpm(true);

            // Down: core 0, then the SCU once core 0 is off. Up: the SCU,
            // then core 0. Slots 1 and 5 are left for the mix.
            let _ = self.set_slot_ack(0, PowerDomain::Core0A7, SlotDirection::PowerDown, false);
            let _ = self.set_slot_ack(2, PowerDomain::ScuA7, SlotDirection::PowerDown, true);
            self.mix_off();
            let _ = self.set_slot_ack(6, PowerDomain::ScuA7, SlotDirection::PowerUp, false);
            let _ = self.set_slot_ack(7, PowerDomain::Core0A7, SlotDirection::PowerUp, true);

            arm_cell(&self.regs.pgc_c0, true);
            arm_cell(&self.regs.pgc_scu, true);
        } else {
            self.set_lpm_mode(LowPowerMode::StopPowerOn);
        }

        let wake = self.state.wake_irqs.words();
        self.save_and_write_imrs(wake.map(|word| !word));
    }

    fn exit_sleep(&mut self) {
        self.restore_imrs();
        self.set_lpm_mode(LowPowerMode::WaitClocked);
        self.set_cpu_power_gate_by_lpm(A7Core::Core0, false);
        self.set_plat_power_gate_by_lpm(false);

        arm_cell(&self.regs.pgc_c0, false);
        arm_cell(&self.regs.pgc_scu, false);
        arm_cell(&self.regs.pgc_fm, false);
        self.disable_slots();
    }
}

impl InterruptChain for Gpc {
    fn mask(&self, line: u32) {
        self.lock().mask_line(line);
    }

    fn unmask(&self, line: u32) {
        self.lock().unmask_line(line);
    }

    fn set_wake(&self, line: u32, enable: bool) -> Result<(), ErrorCode> {
        self.lock().state.wake_irqs.update(line, enable).map_err(|err| {
            warn!("gpc: line {} cannot wake the system", line);
            err
        })
    }
}

impl Gpc {
    /// Prepare the GPC for system sleep.
    ///
    /// With `power_off` the system enters STOP with the oscillator and
    /// supply off, core 0, the SCU/L2 and the platform are gated in slot
    /// order and the mix is gated too if nothing needs it. Otherwise only the
    /// STOP mode is selected. In both cases the core 0 IMR words are saved
    /// and replaced so that only wake-capable lines are unmasked.
    ///
    /// Must be followed by exactly one [`Gpc::exit_sleep`].
    pub fn enter_sleep(&self, power_off: bool) {
        self.lock().enter_sleep(power_off);
    }

    /// Undo [`Gpc::enter_sleep`]: restore the IMR words saved on entry,
    /// return to WAIT with the clock running and disable all sleep gating.
    ///
    /// Line 32 is the one exception to the restore: the STOP mode selected
    /// on entry masks it before the words are saved, and returning to WAIT
    /// unmasks it after they are written back, so it always ends unmasked.
    pub fn exit_sleep(&self) {
        self.lock().exit_sleep();
    }

    /// Mask every line in the core 0 bank, saving the current mask words.
    /// Must be followed by exactly one [`Gpc::restore_all`].
    pub fn mask_all(&self) {
        self.lock().save_and_write_imrs([!0; IMR_NUM]);
    }

    /// Write back the mask words saved by [`Gpc::mask_all`].
    pub fn restore_all(&self) {
        self.lock().restore_imrs();
    }

    /// Snapshot of the lines currently allowed to wake the system.
    pub fn wake_sources(&self) -> IrqBitmap {
        self.lock().state.wake_irqs
    }

    /// Snapshot of the lines currently holding the mix on.
    pub fn forced_on_sources(&self) -> IrqBitmap {
        self.lock().state.mf_request_on
    }
}
