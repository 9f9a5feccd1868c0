// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! PHY power domains, sequenced from their supply regulator's events.
//!
//! Before the regulator turns on, the PHY domain is mapped to the A7 and a
//! software power up is requested. Before it turns off, a power down is
//! requested and the domain's gating cell armed. Requests are not waited on.

use kernel::hil::regulator::{Regulator, RegulatorClient, RegulatorEvent};
use kernel::utilities::registers::interfaces::ReadWriteable;
use kernel::utilities::registers::Field;
use kernel::ErrorCode;
use log::error;

use super::domain::PowerDomain;
use super::registers::{GpcRegisters, PgcRegisters, PGC_CPU_MAPPING, PGC_CTRL, PU_PGC_SW_REQ};
use super::{Gpc, Locked};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhyDomain {
    Mipi,
    Pcie,
    UsbOtg1,
    UsbOtg2,
    UsbHsic,
}

impl PhyDomain {
    pub const ALL: [PhyDomain; 5] = [
        PhyDomain::Mipi,
        PhyDomain::Pcie,
        PhyDomain::UsbOtg1,
        PhyDomain::UsbOtg2,
        PhyDomain::UsbHsic,
    ];

    pub const fn power_domain(self) -> PowerDomain {
        match self {
            PhyDomain::Mipi => PowerDomain::MipiPhy,
            PhyDomain::Pcie => PowerDomain::PciePhy,
            PhyDomain::UsbOtg1 => PowerDomain::UsbOtg1Phy,
            PhyDomain::UsbOtg2 => PowerDomain::UsbOtg2Phy,
            PhyDomain::UsbHsic => PowerDomain::UsbHsicPhy,
        }
    }

    fn mapping(self) -> Field<u32, PGC_CPU_MAPPING::Register> {
        match self {
            PhyDomain::Mipi => PGC_CPU_MAPPING::MIPI_PHY_A7_DOMAIN,
            PhyDomain::Pcie => PGC_CPU_MAPPING::PCIE_PHY_A7_DOMAIN,
            PhyDomain::UsbOtg1 => PGC_CPU_MAPPING::USB_OTG1_PHY_A7_DOMAIN,
            PhyDomain::UsbOtg2 => PGC_CPU_MAPPING::USB_OTG2_PHY_A7_DOMAIN,
            PhyDomain::UsbHsic => PGC_CPU_MAPPING::USB_HSIC_PHY_A7_DOMAIN,
        }
    }

    fn request(self) -> Field<u32, PU_PGC_SW_REQ::Register> {
        match self {
            PhyDomain::Mipi => PU_PGC_SW_REQ::MIPI_PHY,
            PhyDomain::Pcie => PU_PGC_SW_REQ::PCIE_PHY,
            PhyDomain::UsbOtg1 => PU_PGC_SW_REQ::USB_OTG1_PHY,
            PhyDomain::UsbOtg2 => PU_PGC_SW_REQ::USB_OTG2_PHY,
            PhyDomain::UsbHsic => PU_PGC_SW_REQ::USB_HSIC_PHY,
        }
    }

    fn pgc(self, regs: &GpcRegisters) -> &PgcRegisters {
        match self {
            PhyDomain::Mipi => &regs.pgc_mipi_phy,
            PhyDomain::Pcie => &regs.pgc_pcie_phy,
            PhyDomain::UsbOtg1 => &regs.pgc_usb_otg1_phy,
            PhyDomain::UsbOtg2 => &regs.pgc_usb_otg2_phy,
            PhyDomain::UsbHsic => &regs.pgc_usb_hsic_phy,
        }
    }
}

impl Locked<'_> {
    fn phy_pre_enable(&mut self, phy: PhyDomain) {
        self.regs.pgc_cpu_mapping.modify(phy.mapping().val(1));
        self.regs.pu_pgc_sw_pup_req.modify(phy.request().val(1));
    }

    fn phy_pre_disable(&mut self, phy: PhyDomain) {
        self.regs.pu_pgc_sw_pdn_req.modify(phy.request().val(1));
        phy.pgc(self.regs).ctrl.modify(PGC_CTRL::PCR::SET);
        self.regs.pgc_cpu_mapping.modify(phy.mapping().val(0));
    }
}

impl Gpc {
    /// Map `phy` to the A7 and request it to be powered up.
    pub fn phy_pre_enable(&self, phy: PhyDomain) {
        self.lock().phy_pre_enable(phy);
    }

    /// Request `phy` to be powered down and release it from the A7.
    pub fn phy_pre_disable(&self, phy: PhyDomain) {
        self.lock().phy_pre_disable(phy);
    }
}

/// Regulator client that sequences one PHY domain.
pub struct PhyPowerSequencer<'a> {
    gpc: &'a Gpc,
    phy: PhyDomain,
}

impl<'a> PhyPowerSequencer<'a> {
    pub const fn new(gpc: &'a Gpc, phy: PhyDomain) -> Self {
        Self { gpc, phy }
    }

    /// Subscribe to `regulator`'s events.
    ///
    /// A failure only concerns this PHY; it is logged and returned, and the
    /// controller keeps working. Returns `Err(ErrorCode::NOSUPPORT)` on parts
    /// without PHY domains.
    pub fn register(&'a self, regulator: &dyn Regulator<'a>) -> Result<(), ErrorCode> {
        if !self.gpc.config().variant.has_mix_and_phys() {
            return Err(ErrorCode::NOSUPPORT);
        }
        regulator.set_client(self).map_err(|err| {
            error!("gpc: cannot register {:?} regulator: {}", self.phy, err);
            err
        })
    }
}

impl RegulatorClient for PhyPowerSequencer<'_> {
    fn regulator_event(&self, event: RegulatorEvent) {
        match event {
            RegulatorEvent::PreEnable => self.gpc.phy_pre_enable(self.phy),
            RegulatorEvent::PreDisable => self.gpc.phy_pre_disable(self.phy),
            RegulatorEvent::Enabled | RegulatorEvent::Disabled => {}
        }
    }
}
