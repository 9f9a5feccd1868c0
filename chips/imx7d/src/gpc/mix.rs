// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Fast/mega mix gating.
//!
//! The mix can only be switched off during sleep if none of the lines whose
//! wakeup path goes through it may wake the system or are held on by a
//! driver.

use kernel::utilities::registers::interfaces::Readable;
use kernel::ErrorCode;
use log::info;

use super::domain::{PowerDomain, SlotDirection};
use super::registers::PGC_CTRL;
use super::{arm_cell, Gpc, Locked};

impl Locked<'_> {
    /// Schedule the mix to be switched off with the rest of the platform if
    /// nothing needs it. Returns whether it was scheduled.
    pub(crate) fn mix_off(&mut self) -> bool {
        if !self.config.variant.has_mix_and_phys() || !self.state.mix_may_power_off() {
            return false;
        }
        // Slots 1 and 5 are always inside the table.
        let _ = self.assign_slot(1, PowerDomain::FastMegaMix, SlotDirection::PowerDown);
        let _ = self.assign_slot(5, PowerDomain::FastMegaMix, SlotDirection::PowerUp);
        arm_cell(&self.regs.pgc_fm, true);
        info!("gpc: fast/mega mix will be powered off");
        true
    }
}

impl Gpc {
    /// Whether the mix may be switched off in the next power off sleep.
    pub fn may_power_off(&self) -> bool {
        self.lock().state.mix_may_power_off()
    }

    /// Keep the mix powered for `irq` (`on == true`) regardless of its wake
    /// setting, or release it. The wake bitmap is not touched.
    ///
    /// Returns `Err(ErrorCode::INVAL)` for lines the GPC does not route.
    pub fn set_forced_on(&self, irq: u32, on: bool) -> Result<(), ErrorCode> {
        self.lock().state.mf_request_on.update(irq, on)
    }

    /// Whether the mix gating cell is armed.
    pub fn is_mix_off(&self) -> bool {
        self.registers.pgc_fm.ctrl.is_set(PGC_CTRL::PCR)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::fake_gpc;
    use super::super::{GpcConfig, IrqBitmap, IMR_NUM, LINE_LIMIT};
    use kernel::hil::irq::InterruptChain;
    use kernel::utilities::registers::interfaces::Readable;
    use kernel::ErrorCode;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn random_words(rng: &mut SmallRng) -> [u32; IMR_NUM] {
        // Sparse words so both outcomes of the rule show up.
        let mut words = [0; IMR_NUM];
        for word in words.iter_mut() {
            *word = rng.gen::<u32>() & rng.gen::<u32>() & rng.gen::<u32>();
        }
        words
    }

    #[test]
    fn may_power_off_matches_rule() {
        let mut rng = SmallRng::seed_from_u64(0x7d_0c);
        for _ in 0..256 {
            let mf = random_words(&mut rng);
            let wake = random_words(&mut rng);
            let forced = random_words(&mut rng);

            let gpc = fake_gpc(GpcConfig {
                mf_mix_wakeup_irqs: mf,
                ..GpcConfig::IMX7D
            });
            let wake_bitmap = IrqBitmap::from_words(wake);
            let forced_bitmap = IrqBitmap::from_words(forced);
            for line in 32..LINE_LIMIT {
                if wake_bitmap.contains(line) {
                    gpc.set_wake(line, true).unwrap();
                }
                if forced_bitmap.contains(line) {
                    gpc.set_forced_on(line, true).unwrap();
                }
            }

            let expected = (0..IMR_NUM).all(|i| (wake[i] | forced[i]) & mf[i] == 0);
            assert_eq!(gpc.may_power_off(), expected);
        }
    }

    #[test]
    fn forced_on_and_wake_are_independent() {
        let gpc = fake_gpc(GpcConfig {
            mf_mix_wakeup_irqs: [0xFFFF_FFFF; IMR_NUM],
            ..GpcConfig::IMX7D
        });

        gpc.set_forced_on(40, true).unwrap();
        assert!(gpc.wake_sources().is_empty());
        assert!(!gpc.may_power_off());

        gpc.set_wake(40, true).unwrap();
        gpc.set_forced_on(40, false).unwrap();
        assert!(gpc.wake_sources().contains(40));
        assert!(gpc.forced_on_sources().is_empty());
        assert!(!gpc.may_power_off());

        gpc.set_wake(40, false).unwrap();
        assert!(gpc.may_power_off());
    }

    #[test]
    fn forced_on_rejects_private_lines() {
        let gpc = fake_gpc(GpcConfig::IMX7D);
        assert_eq!(gpc.set_forced_on(5, true), Err(ErrorCode::INVAL));
        assert!(gpc.forced_on_sources().is_empty());
    }

    #[test]
    fn power_off_sleep_gates_idle_mix() {
        let gpc = fake_gpc(GpcConfig {
            mf_mix_wakeup_irqs: [0, 0, 0, 0x1],
            ..GpcConfig::IMX7D
        });
        let regs = &*gpc.registers;

        gpc.enter_sleep(true);
        assert!(gpc.is_mix_off());
        assert_eq!(regs.slot_cfg[1].get(), 1 << 6);
        assert_eq!(regs.slot_cfg[5].get(), 2 << 6);
        gpc.exit_sleep();
        assert!(!gpc.is_mix_off());

        // Line 128 is word 3, bit 0.
        gpc.set_wake(128, true).unwrap();
        gpc.enter_sleep(true);
        assert!(!gpc.is_mix_off());
        assert_eq!(regs.slot_cfg[1].get(), 0);
        assert_eq!(regs.slot_cfg[5].get(), 0);
        gpc.exit_sleep();
    }

    #[test]
    fn mix_is_never_gated_without_it() {
        let gpc = fake_gpc(GpcConfig::IMX7S);
        gpc.enter_sleep(true);
        assert!(!gpc.is_mix_off());
        gpc.exit_sleep();
    }
}
