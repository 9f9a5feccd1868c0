// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! General Power Controller (GPC) driver for the i.MX 7D/7S.
//!
//! The GPC sequences power up and power down of the A7 cores, the SCU/L2
//! complex, the shared fast/mega mix and the PHY domains, selects the system
//! low power mode and decides which interrupt lines may wake the system.
//!
//! All register read-modify-write sequences and the driver's bitmaps are
//! serialized by a single lock. Operations that consist of several steps
//! (entering and leaving sleep, idle gating) take the lock once and run
//! every step through a lock-held handle.
//!
//! Usage
//! -----
//!
//! ```rust,ignore
//! use imx7d::gpc::{self, Gpc, GpcConfig};
//!
//! let gpc = unsafe { Gpc::new(gpc::GPC_BASE as *const _, GpcConfig::IMX7D) }?;
//! gpc.init();
//! gpc.set_wake(72, true)?;
//! gpc.enter_sleep(true);
//! // ... wait for interrupt ...
//! gpc.exit_sleep();
//! ```

mod bitmap;
mod config;
mod cpu;
mod domain;
mod lpm;
mod mix;
mod phy;
mod registers;
mod slot;
mod wakeup;

pub use self::bitmap::{IrqBitmap, LINE_LIMIT};
pub use self::config::{GpcConfig, SocVariant, DEFAULT_HANDSHAKE_POLL_LIMIT};
pub use self::cpu::A7Core;
pub use self::domain::{PowerDomain, SlotDirection};
pub use self::lpm::LowPowerMode;
pub use self::phy::{PhyDomain, PhyPowerSequencer};
pub use self::registers::{GpcRegisters, GPC_BASE, IMR_NUM, MAX_SLOT_NUMBER};

use kernel::utilities::registers::interfaces::{ReadWriteable, Writeable};
use kernel::utilities::StaticRef;
use kernel::ErrorCode;
use log::info;

use self::registers::{
    PgcRegisters, LPCR_A7_BSC, LPCR_M4, MLPCR, PGC_ACK_SEL_A7, PGC_CPU_MAPPING, PGC_CTRL,
    SCU_TIMING, SLPCR,
};

/// Software state owned by the controller and protected by its lock.
#[derive(Debug, Default)]
struct GpcState {
    /// Lines allowed to wake the system
    wake_irqs: IrqBitmap,
    /// Lines that keep the mix powered regardless of their wake setting
    mf_request_on: IrqBitmap,
    /// Lines whose wakeup path lives in the mix
    mf_irqs: IrqBitmap,
    /// Core 0 IMR words saved by `mask_all` or `enter_sleep`
    saved_imrs: [u32; IMR_NUM],
}

impl GpcState {
    /// Whether no line that needs the mix is enabled for wakeup or forced
    /// on, in which case the mix may be switched off during sleep.
    fn mix_may_power_off(&self) -> bool {
        !self
            .wake_irqs
            .union(&self.mf_request_on)
            .intersects(&self.mf_irqs)
    }
}

pub struct Gpc {
    registers: StaticRef<GpcRegisters>,
    config: GpcConfig,
    state: spin::Mutex<GpcState>,
}

// SAFETY: every read-modify-write of the register block goes through
// `Gpc::lock`, so sharing the controller between execution contexts cannot
// interleave two updates of the same register.
unsafe impl Sync for Gpc {}

/// Access to the registers and software state while the controller lock is
/// held.
pub(crate) struct Locked<'a> {
    base: StaticRef<GpcRegisters>,
    regs: &'a GpcRegisters,
    config: &'a GpcConfig,
    state: spin::MutexGuard<'a, GpcState>,
}

/// Set or clear the power control bit of a gating cell. While set, the
/// domain is switched off on its next power down request.
fn arm_cell(pgc: &PgcRegisters, armed: bool) {
    pgc.ctrl
        .write(if armed { PGC_CTRL::PCR::SET } else { PGC_CTRL::PCR::CLEAR });
}

impl Gpc {
    /// Create a controller for the register block at `base`.
    ///
    /// Returns `Err(ErrorCode::NODEVICE)` if `base` is null or not aligned
    /// for the register block. There is no degraded mode without registers.
    ///
    /// ## Safety
    ///
    /// A non-null aligned `base` must point to the GPC register block (or
    /// memory laid out like it) that stays valid for the life of the
    /// controller, and no other `Gpc` may be created for the same block.
    pub unsafe fn new(base: *const GpcRegisters, config: GpcConfig) -> Result<Gpc, ErrorCode> {
        let registers = unsafe { StaticRef::try_new(base) }.ok_or(ErrorCode::NODEVICE)?;
        Ok(Gpc {
            registers,
            config,
            state: spin::Mutex::new(GpcState {
                mf_irqs: config.mf_capable(),
                ..GpcState::default()
            }),
        })
    }

    pub fn config(&self) -> &GpcConfig {
        &self.config
    }

    /// One-time register setup after reset.
    ///
    /// Masks every line in both core banks except line 32, which must stay
    /// unmasked while running, routes the A7 wakeup to external interrupts
    /// only and puts the sleep registers in a known state.
    pub fn init(&self) {
        let locked = self.lock();
        let regs = locked.regs;

        for i in 0..IMR_NUM {
            regs.imr_core0[i].set(!0);
            regs.imr_core1[i].set(!0);
        }
        regs.imr_core0[0].set(!0x1);

        if self.config.variant.has_mix_and_phys() && locked.state.mf_irqs.is_empty() {
            info!("gpc: no wakeup source in fast/mega mix");
        }

        regs.lpcr_a7_bsc.modify(LPCR_A7_BSC::IRQ_SRC::ExternalOnly);
        regs.lpcr_m4.modify(LPCR_M4::MASK_DSM_TRIGGER::SET);
        regs.pgc_cpu_mapping.write(PGC_CPU_MAPPING::MF_A7_DOMAIN::SET);
        regs.pgc_scu.timing.set(SCU_TIMING);
        regs.pgc_ack_sel_a7
            .write(PGC_ACK_SEL_A7::DUMMY_PDN_ACK::SET + PGC_ACK_SEL_A7::DUMMY_PUP_ACK::SET);
        regs.slpcr.modify(
            SLPCR::EN_DSM::CLEAR
                + SLPCR::RBC_EN::CLEAR
                + SLPCR::VSTBY::CLEAR
                + SLPCR::SBYOS::CLEAR
                + SLPCR::BYPASS_PMIC_READY::CLEAR
                + SLPCR::EN_A7_FASTWUP_WAIT_MODE::SET,
        );
        regs.mlpcr.modify(MLPCR::MEMLP_CTL_DIS::SET);
    }

    pub(crate) fn lock(&self) -> Locked<'_> {
        Locked {
            base: self.registers,
            regs: &self.registers,
            config: &self.config,
            state: self.state.lock(),
        }
    }
}
