// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! A7 core and platform power gating.
//!
//! Each core can be gated on two independent triggers: executing WFI, or the
//! system entering low power mode. Core 1 can also be powered up or down on
//! demand with a software request that the GPC acknowledges by clearing the
//! request bit.

use kernel::utilities::registers::interfaces::{ReadWriteable, Readable};
use kernel::utilities::registers::FieldValue;
use kernel::ErrorCode;
use log::error;

use super::domain::{PowerDomain, SlotDirection};
use super::registers::{GpcRegisters, PgcRegisters, CPU_PGC_SW_REQ, LPCR_A7_AD};
use super::{arm_cell, Gpc, Locked};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum A7Core {
    Core0,
    Core1,
}

impl A7Core {
    fn wfi_gate(self, on: bool) -> FieldValue<u32, LPCR_A7_AD::Register> {
        match (self, on) {
            (A7Core::Core0, true) => LPCR_A7_AD::EN_C0_WFI_PDN::SET + LPCR_A7_AD::EN_C0_IRQ_PUP::SET,
            (A7Core::Core0, false) => {
                LPCR_A7_AD::EN_C0_WFI_PDN::CLEAR + LPCR_A7_AD::EN_C0_IRQ_PUP::CLEAR
            }
            (A7Core::Core1, true) => LPCR_A7_AD::EN_C1_WFI_PDN::SET + LPCR_A7_AD::EN_C1_IRQ_PUP::SET,
            (A7Core::Core1, false) => {
                LPCR_A7_AD::EN_C1_WFI_PDN::CLEAR + LPCR_A7_AD::EN_C1_IRQ_PUP::CLEAR
            }
        }
    }

    fn lpm_gate(self, on: bool) -> FieldValue<u32, LPCR_A7_AD::Register> {
        match (self, on) {
            (A7Core::Core0, true) => LPCR_A7_AD::EN_C0_PDN::SET + LPCR_A7_AD::EN_C0_PUP::SET,
            (A7Core::Core0, false) => LPCR_A7_AD::EN_C0_PDN::CLEAR + LPCR_A7_AD::EN_C0_PUP::CLEAR,
            (A7Core::Core1, true) => LPCR_A7_AD::EN_C1_PDN::SET + LPCR_A7_AD::EN_C1_PUP::SET,
            (A7Core::Core1, false) => LPCR_A7_AD::EN_C1_PDN::CLEAR + LPCR_A7_AD::EN_C1_PUP::CLEAR,
        }
    }

    fn pgc(self, regs: &GpcRegisters) -> &PgcRegisters {
        match self {
            A7Core::Core0 => &regs.pgc_c0,
            A7Core::Core1 => &regs.pgc_c1,
        }
    }
}

/// Slots walked when both cores and the SCU are gated in idle: cores then
/// SCU going down, SCU then cores coming back up. The last entry in each
/// direction waits for its own ack.
const IDLE_SLOTS: [(usize, PowerDomain, SlotDirection, bool); 6] = [
    (0, PowerDomain::Core0A7, SlotDirection::PowerDown, false),
    (1, PowerDomain::Core1A7, SlotDirection::PowerDown, false),
    (2, PowerDomain::ScuA7, SlotDirection::PowerDown, true),
    (6, PowerDomain::ScuA7, SlotDirection::PowerUp, false),
    (7, PowerDomain::Core0A7, SlotDirection::PowerUp, false),
    (8, PowerDomain::Core1A7, SlotDirection::PowerUp, true),
];

/// Read `pending` until it reports false, retrying at most `limit` times
/// after the first read. Returns whether the request completed.
fn wait_for_ack(limit: usize, mut pending: impl FnMut() -> bool) -> bool {
    let mut retries = 0;
    while pending() {
        if retries == limit {
            return false;
        }
        retries += 1;
        core::hint::spin_loop();
    }
    true
}

impl Locked<'_> {
    pub(crate) fn set_cpu_power_gate_by_wfi(&mut self, core: A7Core, pdn: bool) {
        arm_cell(core.pgc(self.regs), pdn);
        self.regs.lpcr_a7_ad.modify(core.wfi_gate(pdn));
    }

    pub(crate) fn set_cpu_power_gate_by_lpm(&mut self, core: A7Core, pdn: bool) {
        self.regs.lpcr_a7_ad.modify(core.lpm_gate(pdn));
    }

    pub(crate) fn set_plat_power_gate_by_lpm(&mut self, pdn: bool) {
        self.regs.lpcr_a7_ad.modify(if pdn {
            LPCR_A7_AD::EN_PLAT_PDN::SET + LPCR_A7_AD::L2PGE::SET
        } else {
            LPCR_A7_AD::EN_PLAT_PDN::CLEAR + LPCR_A7_AD::L2PGE::CLEAR
        });
    }

    pub(crate) fn set_cpu_power_gate_in_idle(&mut self, pdn: bool) {
        self.set_cpu_power_gate_by_lpm(A7Core::Core0, pdn);
        self.set_cpu_power_gate_by_lpm(A7Core::Core1, pdn);
        self.set_plat_power_gate_by_lpm(pdn);

        if pdn {
            for (index, domain, direction, ack) in IDLE_SLOTS {
                // Every index in the table is inside the slot range.
                let _ = self.set_slot_ack(index, domain, direction, ack);
            }
        } else {
            let indices = IDLE_SLOTS.map(|(index, ..)| index);
            self.clear_slots(&indices);
            self.restore_dummy_acks();
        }

        arm_cell(&self.regs.pgc_c0, pdn);
        arm_cell(&self.regs.pgc_c1, pdn);
        arm_cell(&self.regs.pgc_scu, pdn);
    }
}

impl Gpc {
    /// Gate `core` whenever it executes WFI (`pdn == true`), or stop doing
    /// so. The core is powered back up by its next interrupt.
    pub fn set_cpu_power_gate_by_wfi(&self, core: A7Core, pdn: bool) {
        self.lock().set_cpu_power_gate_by_wfi(core, pdn);
    }

    /// Gate `core` when the system enters low power mode.
    pub fn set_cpu_power_gate_by_lpm(&self, core: A7Core, pdn: bool) {
        self.lock().set_cpu_power_gate_by_lpm(core, pdn);
    }

    /// Gate the A7 platform and L2 when the system enters low power mode.
    pub fn set_plat_power_gate_by_lpm(&self, pdn: bool) {
        self.lock().set_plat_power_gate_by_lpm(pdn);
    }

    /// Enable or disable gating of both cores, the SCU and the platform
    /// while idle in low power mode, including the slot ordering.
    pub fn set_cpu_power_gate_in_idle(&self, pdn: bool) {
        self.lock().set_cpu_power_gate_in_idle(pdn);
    }

    /// Request core 1 to be powered up or down and wait for the GPC to
    /// complete it.
    ///
    /// The lock is released while polling. Returns `Err(ErrorCode::NOACK)`
    /// if the request is still pending after
    /// [`GpcConfig::handshake_poll_limit`](super::GpcConfig) retries; the
    /// gating cell is disarmed in both cases.
    pub fn core1_power_request(&self, direction: SlotDirection) -> Result<(), ErrorCode> {
        let request = match direction {
            SlotDirection::PowerUp => &self.registers.cpu_pgc_sw_pup_req,
            SlotDirection::PowerDown => &self.registers.cpu_pgc_sw_pdn_req,
        };

        {
            let _locked = self.lock();
            arm_cell(&self.registers.pgc_c1, true);
            request.modify(CPU_PGC_SW_REQ::CORE1_A7::SET);
        }

        let acknowledged = wait_for_ack(self.config.handshake_poll_limit, || {
            request.is_set(CPU_PGC_SW_REQ::CORE1_A7)
        });

        {
            let _locked = self.lock();
            arm_cell(&self.registers.pgc_c1, false);
        }

        if acknowledged {
            Ok(())
        } else {
            error!("gpc: core1 {:?} request not acknowledged", direction);
            Err(ErrorCode::NOACK)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::registers::{CPU_PGC_SW_REQ, LPCR_A7_AD, PGC_CTRL};
    use super::super::testing::{default_gpc, fake_gpc};
    use super::super::GpcConfig;
    use super::{wait_for_ack, A7Core, SlotDirection};
    use kernel::utilities::registers::interfaces::{ReadWriteable, Readable, Writeable};
    use kernel::ErrorCode;

    #[test]
    fn wfi_gating_arms_cell() {
        let gpc = default_gpc();
        let regs = &*gpc.registers;

        gpc.set_cpu_power_gate_by_wfi(A7Core::Core1, true);
        assert!(regs.pgc_c1.ctrl.is_set(PGC_CTRL::PCR));
        assert!(!regs.pgc_c0.ctrl.is_set(PGC_CTRL::PCR));
        assert_eq!(regs.lpcr_a7_ad.get(), (1 << 2) | (1 << 10));

        gpc.set_cpu_power_gate_by_wfi(A7Core::Core0, true);
        assert_eq!(regs.lpcr_a7_ad.get(), (1 << 0) | (1 << 2) | (1 << 8) | (1 << 10));

        gpc.set_cpu_power_gate_by_wfi(A7Core::Core1, false);
        assert!(!regs.pgc_c1.ctrl.is_set(PGC_CTRL::PCR));
        assert_eq!(regs.lpcr_a7_ad.get(), (1 << 0) | (1 << 8));
    }

    #[test]
    fn lpm_and_platform_gating() {
        let gpc = default_gpc();
        let regs = &*gpc.registers;

        gpc.set_cpu_power_gate_by_lpm(A7Core::Core0, true);
        assert!(regs.lpcr_a7_ad.is_set(LPCR_A7_AD::EN_C0_PDN));
        assert!(regs.lpcr_a7_ad.is_set(LPCR_A7_AD::EN_C0_PUP));
        assert!(!regs.pgc_c0.ctrl.is_set(PGC_CTRL::PCR));

        gpc.set_plat_power_gate_by_lpm(true);
        assert!(regs.lpcr_a7_ad.is_set(LPCR_A7_AD::EN_PLAT_PDN));
        assert!(regs.lpcr_a7_ad.is_set(LPCR_A7_AD::L2PGE));

        gpc.set_cpu_power_gate_by_lpm(A7Core::Core0, false);
        gpc.set_plat_power_gate_by_lpm(false);
        assert_eq!(regs.lpcr_a7_ad.get(), 0);
    }

    #[test]
    fn idle_gating_programs_and_clears_slots() {
        let gpc = default_gpc();
        let regs = &*gpc.registers;
        gpc.disable_slots();

        gpc.set_cpu_power_gate_in_idle(true);
        assert_eq!(regs.slot_cfg[0].get(), 1);
        assert_eq!(regs.slot_cfg[1].get(), 1 << 2);
        assert_eq!(regs.slot_cfg[2].get(), 1 << 4);
        assert_eq!(regs.slot_cfg[6].get(), 2 << 4);
        assert_eq!(regs.slot_cfg[7].get(), 2);
        assert_eq!(regs.slot_cfg[8].get(), 2 << 2);
        // SCU power down ack and core 1 power up ack, no dummies.
        assert_eq!(regs.pgc_ack_sel_a7.get(), (1 << 2) | (1 << 17));
        assert!(regs.pgc_c0.ctrl.is_set(PGC_CTRL::PCR));
        assert!(regs.pgc_c1.ctrl.is_set(PGC_CTRL::PCR));
        assert!(regs.pgc_scu.ctrl.is_set(PGC_CTRL::PCR));
        assert_eq!(
            regs.lpcr_a7_ad.get(),
            (1 << 1) | (1 << 3) | (1 << 4) | (1 << 9) | (1 << 11) | (1 << 16)
        );

        gpc.set_cpu_power_gate_in_idle(false);
        for i in 0..super::super::MAX_SLOT_NUMBER {
            assert_eq!(regs.slot_cfg[i].get(), 0);
        }
        assert_eq!(regs.pgc_ack_sel_a7.get(), 0x8000_8000);
        assert!(!regs.pgc_scu.ctrl.is_set(PGC_CTRL::PCR));
        assert_eq!(regs.lpcr_a7_ad.get(), 0);
    }

    #[test]
    fn stuck_request_times_out() {
        let gpc = fake_gpc(GpcConfig {
            handshake_poll_limit: 64,
            ..GpcConfig::IMX7D
        });
        let regs = &*gpc.registers;

        assert_eq!(
            gpc.core1_power_request(SlotDirection::PowerUp),
            Err(ErrorCode::NOACK)
        );
        assert!(regs.cpu_pgc_sw_pup_req.is_set(CPU_PGC_SW_REQ::CORE1_A7));
        assert!(!regs.pgc_c1.ctrl.is_set(PGC_CTRL::PCR));

        // The request bit stays pending, so a second request is also not
        // acknowledged.
        assert_eq!(
            gpc.core1_power_request(SlotDirection::PowerUp),
            Err(ErrorCode::NOACK)
        );
    }

    #[test]
    fn ack_is_read_before_giving_up() {
        let mut reads = 0;
        assert!(wait_for_ack(0, || {
            reads += 1;
            false
        }));
        assert_eq!(reads, 1);

        let mut reads = 0;
        assert!(!wait_for_ack(0, || {
            reads += 1;
            true
        }));
        assert_eq!(reads, 1);

        let mut reads = 0;
        assert!(!wait_for_ack(3, || {
            reads += 1;
            true
        }));
        assert_eq!(reads, 4);

        let mut reads = 0;
        assert!(wait_for_ack(3, || {
            reads += 1;
            reads < 3
        }));
        assert_eq!(reads, 3);
    }

    #[test]
    fn zero_poll_limit_still_checks_request() {
        let gpc = fake_gpc(GpcConfig {
            handshake_poll_limit: 0,
            ..GpcConfig::IMX7D
        });
        assert_eq!(
            gpc.core1_power_request(SlotDirection::PowerDown),
            Err(ErrorCode::NOACK)
        );
        assert!(!gpc.registers.pgc_c1.ctrl.is_set(PGC_CTRL::PCR));
    }

    // The helper thread stands in for the GPC clearing the request bit. It
    // and the polling caller access the same cell with plain volatile
    // loads and stores, which is a data race in the Rust memory model, so
    // the test is skipped under Miri.
    #[test]
    #[cfg_attr(miri, ignore)]
    fn acknowledged_request_disarms_cell() {
        let gpc = fake_gpc(GpcConfig {
            handshake_poll_limit: usize::MAX,
            ..GpcConfig::IMX7D
        });
        let regs = &*gpc.registers;
        regs.cpu_pgc_sw_pdn_req.set(0);

        let hardware = std::thread::spawn(move || {
            let regs = &*gpc.registers;
            while !regs.cpu_pgc_sw_pdn_req.is_set(CPU_PGC_SW_REQ::CORE1_A7) {
                std::thread::yield_now();
            }
            assert!(regs.pgc_c1.ctrl.is_set(PGC_CTRL::PCR));
            regs.cpu_pgc_sw_pdn_req.modify(CPU_PGC_SW_REQ::CORE1_A7::CLEAR);
        });

        assert_eq!(gpc.core1_power_request(SlotDirection::PowerDown), Ok(()));
        hardware.join().unwrap();
        assert!(!regs.cpu_pgc_sw_pdn_req.is_set(CPU_PGC_SW_REQ::CORE1_A7));
        assert!(!regs.pgc_c1.ctrl.is_set(PGC_CTRL::PCR));
        assert!(!regs.cpu_pgc_sw_pup_req.is_set(CPU_PGC_SW_REQ::CORE1_A7));
    }
}
