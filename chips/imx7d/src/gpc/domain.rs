// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Power domains known to the GPC and the direction of a slot transition.

use kernel::utilities::registers::Field;

use super::registers::{PGC_ACK_SEL_A7, SLOT_CFG};

/// A power-gateable region. The discriminant is the domain's position in the
/// slot table and in each half of the ack selection register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PowerDomain {
    Core0A7 = 0,
    Core1A7 = 1,
    ScuA7 = 2,
    /// The shared fast/mega clock and memory mix
    FastMegaMix = 3,
    MipiPhy = 4,
    PciePhy = 5,
    UsbOtg1Phy = 6,
    UsbOtg2Phy = 7,
    UsbHsicPhy = 8,
    Core0M4 = 9,
}

impl PowerDomain {
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The 2-bit field this domain occupies in every slot configuration word.
    pub(crate) fn slot_field(self) -> Field<u32, SLOT_CFG::Register> {
        match self {
            PowerDomain::Core0A7 => SLOT_CFG::CORE0_A7,
            PowerDomain::Core1A7 => SLOT_CFG::CORE1_A7,
            PowerDomain::ScuA7 => SLOT_CFG::SCU_A7,
            PowerDomain::FastMegaMix => SLOT_CFG::FAST_MEGA_MIX,
            PowerDomain::MipiPhy => SLOT_CFG::MIPI_PHY,
            PowerDomain::PciePhy => SLOT_CFG::PCIE_PHY,
            PowerDomain::UsbOtg1Phy => SLOT_CFG::USB_OTG1_PHY,
            PowerDomain::UsbOtg2Phy => SLOT_CFG::USB_OTG2_PHY,
            PowerDomain::UsbHsicPhy => SLOT_CFG::USB_HSIC_PHY,
            PowerDomain::Core0M4 => SLOT_CFG::CORE0_M4,
        }
    }

    /// The ack selection bit for this domain in the half of the register
    /// that belongs to `direction`.
    pub(crate) fn ack_field(self, direction: SlotDirection) -> Field<u32, PGC_ACK_SEL_A7::Register> {
        Field::<u32, PGC_ACK_SEL_A7::Register>::new(1, direction.ack_shift() + self.index())
    }
}

/// Which transition a slot entry requests for its domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotDirection {
    PowerDown,
    PowerUp,
}

impl SlotDirection {
    /// Code written into the domain's slot field.
    pub const fn code(self) -> u32 {
        match self {
            SlotDirection::PowerDown => 1,
            SlotDirection::PowerUp => 2,
        }
    }

    const fn ack_shift(self) -> usize {
        match self {
            SlotDirection::PowerDown => 0,
            SlotDirection::PowerUp => 16,
        }
    }

    /// The always-ready ack used while no real domain is selected.
    pub(crate) fn dummy_ack(self) -> Field<u32, PGC_ACK_SEL_A7::Register> {
        match self {
            SlotDirection::PowerDown => PGC_ACK_SEL_A7::DUMMY_PDN_ACK,
            SlotDirection::PowerUp => PGC_ACK_SEL_A7::DUMMY_PUP_ACK,
        }
    }
}
