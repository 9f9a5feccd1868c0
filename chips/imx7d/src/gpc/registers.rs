// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Register map of the General Power Controller (GPC).
//!
//! Offsets and bit positions follow chapter 7 ("General Power Controller") of
//! the i.MX 7D reference manual.

use kernel::utilities::registers::{register_bitfields, register_structs, ReadWrite};

/// Number of interrupt mask words per core bank, covering lines 32..160.
pub const IMR_NUM: usize = 4;

/// Number of entries in the power sequencing slot table.
pub const MAX_SLOT_NUMBER: usize = 10;

/// Physical address of the GPC register block.
pub const GPC_BASE: usize = 0x303A_0000;

/// Reset value programmed into the SCU power gating timing register.
pub const SCU_TIMING: u32 = (0x51 << 20) | (0x59 << 10) | 0x5B;

register_structs! {
    pub GpcRegisters {
        /// Basic low power control register of A7 platform
        (0x000 => pub lpcr_a7_bsc: ReadWrite<u32, LPCR_A7_BSC::Register>),
        /// Advanced low power control register of A7 platform
        (0x004 => pub lpcr_a7_ad: ReadWrite<u32, LPCR_A7_AD::Register>),
        /// Low power control register of CPU1 (M4)
        (0x008 => pub lpcr_m4: ReadWrite<u32, LPCR_M4::Register>),
        (0x00C => _reserved0),
        /// System low power control register
        (0x014 => pub slpcr: ReadWrite<u32, SLPCR::Register>),
        (0x018 => _reserved1),
        /// Memory low power control register
        (0x020 => pub mlpcr: ReadWrite<u32, MLPCR::Register>),
        /// PGC acknowledge signal selection of A7 platform
        (0x024 => pub pgc_ack_sel_a7: ReadWrite<u32, PGC_ACK_SEL_A7::Register>),
        (0x028 => _reserved2),
        /// IRQ masking registers 1-4 of A7 core0
        (0x030 => pub imr_core0: [ReadWrite<u32>; IMR_NUM]),
        /// IRQ masking registers 1-4 of A7 core1
        (0x040 => pub imr_core1: [ReadWrite<u32>; IMR_NUM]),
        (0x050 => _reserved3),
        /// Slot configure registers 0-9
        (0x0B0 => pub slot_cfg: [ReadWrite<u32, SLOT_CFG::Register>; MAX_SLOT_NUMBER]),
        (0x0D8 => _reserved4),
        /// Power domain to CPU mapping
        (0x0EC => pub pgc_cpu_mapping: ReadWrite<u32, PGC_CPU_MAPPING::Register>),
        /// CPU PGC software power up trigger
        (0x0F0 => pub cpu_pgc_sw_pup_req: ReadWrite<u32, CPU_PGC_SW_REQ::Register>),
        (0x0F4 => _reserved5),
        /// PU PGC software power up trigger
        (0x0F8 => pub pu_pgc_sw_pup_req: ReadWrite<u32, PU_PGC_SW_REQ::Register>),
        /// CPU PGC software power down trigger
        (0x0FC => pub cpu_pgc_sw_pdn_req: ReadWrite<u32, CPU_PGC_SW_REQ::Register>),
        (0x100 => _reserved6),
        /// PU PGC software power down trigger
        (0x104 => pub pu_pgc_sw_pdn_req: ReadWrite<u32, PU_PGC_SW_REQ::Register>),
        (0x108 => _reserved7),
        /// PGC of A7 core0
        (0x800 => pub pgc_c0: PgcRegisters),
        /// PGC of A7 core1
        (0x840 => pub pgc_c1: PgcRegisters),
        /// PGC of A7 SCU/L2
        (0x880 => pub pgc_scu: PgcRegisters),
        (0x8C0 => _reserved8),
        /// PGC of the fast/mega mix
        (0xA00 => pub pgc_fm: PgcRegisters),
        (0xA40 => _reserved9),
        (0xC00 => pub pgc_mipi_phy: PgcRegisters),
        (0xC40 => pub pgc_pcie_phy: PgcRegisters),
        (0xC80 => pub pgc_usb_otg1_phy: PgcRegisters),
        (0xCC0 => pub pgc_usb_otg2_phy: PgcRegisters),
        (0xD00 => pub pgc_usb_hsic_phy: PgcRegisters),
        (0xD40 => @END),
    },

    /// Per-domain power gating controller block
    pub PgcRegisters {
        /// Power control; PCR arms the domain for gating
        (0x00 => pub ctrl: ReadWrite<u32, PGC_CTRL::Register>),
        /// Power up sequence control
        (0x04 => pub pupscr: ReadWrite<u32>),
        /// Power down sequence control
        (0x08 => pub pdnscr: ReadWrite<u32>),
        /// Power gating status
        (0x0C => pub sr: ReadWrite<u32>),
        /// Auxiliary switch timing; only meaningful for the SCU block
        (0x10 => pub timing: ReadWrite<u32>),
        (0x14 => _reserved0),
        (0x40 => @END),
    }
}

register_bitfields![u32,
    pub LPCR_A7_BSC [
        /// Low power mode of both A7 cores; all cores share one setting
        LPM OFFSET(0) NUMBITS(4) [
            Run = 0x0,
            Wait = 0x5,
            Stop = 0xA
        ],
        /// Keep the A7 clock running while in low power mode
        CPU_CLK_ON_LPM OFFSET(14) NUMBITS(1) [],
        /// Interrupt sources allowed to wake the A7 platform
        IRQ_SRC OFFSET(28) NUMBITS(3) [
            ExternalOnly = 0b111
        ]
    ],

    pub LPCR_A7_AD [
        EN_C0_WFI_PDN OFFSET(0) NUMBITS(1) [],
        EN_C0_PDN OFFSET(1) NUMBITS(1) [],
        EN_C1_WFI_PDN OFFSET(2) NUMBITS(1) [],
        EN_C1_PDN OFFSET(3) NUMBITS(1) [],
        /// Power down the A7 platform in low power mode
        EN_PLAT_PDN OFFSET(4) NUMBITS(1) [],
        EN_C0_IRQ_PUP OFFSET(8) NUMBITS(1) [],
        EN_C0_PUP OFFSET(9) NUMBITS(1) [],
        EN_C1_IRQ_PUP OFFSET(10) NUMBITS(1) [],
        EN_C1_PUP OFFSET(11) NUMBITS(1) [],
        /// L2 cache power gate enable
        L2PGE OFFSET(16) NUMBITS(1) []
    ],

    pub LPCR_M4 [
        MASK_DSM_TRIGGER OFFSET(31) NUMBITS(1) []
    ],

    pub SLPCR [
        BYPASS_PMIC_READY OFFSET(0) NUMBITS(1) [],
        /// Power off the oscillator in standby
        SBYOS OFFSET(1) NUMBITS(1) [],
        /// Voltage standby request
        VSTBY OFFSET(2) NUMBITS(1) [],
        EN_A7_FASTWUP_WAIT_MODE OFFSET(16) NUMBITS(1) [],
        /// Retention bypass counter enable
        RBC_EN OFFSET(30) NUMBITS(1) [],
        /// Deep sleep mode enable
        EN_DSM OFFSET(31) NUMBITS(1) []
    ],

    pub MLPCR [
        MEMLP_CTL_DIS OFFSET(0) NUMBITS(1) []
    ],

    // Bits 0..10 select power down acks and bits 16..26 power up acks, one
    // per domain in slot order. The dummy bits are acks that are always
    // ready.
    pub PGC_ACK_SEL_A7 [
        DUMMY_PDN_ACK OFFSET(15) NUMBITS(1) [],
        DUMMY_PUP_ACK OFFSET(31) NUMBITS(1) []
    ],

    // One 2-bit code per domain: 1 powers the domain down, 2 powers it up.
    pub SLOT_CFG [
        CORE0_A7 OFFSET(0) NUMBITS(2) [],
        CORE1_A7 OFFSET(2) NUMBITS(2) [],
        SCU_A7 OFFSET(4) NUMBITS(2) [],
        FAST_MEGA_MIX OFFSET(6) NUMBITS(2) [],
        MIPI_PHY OFFSET(8) NUMBITS(2) [],
        PCIE_PHY OFFSET(10) NUMBITS(2) [],
        USB_OTG1_PHY OFFSET(12) NUMBITS(2) [],
        USB_OTG2_PHY OFFSET(14) NUMBITS(2) [],
        USB_HSIC_PHY OFFSET(16) NUMBITS(2) [],
        CORE0_M4 OFFSET(18) NUMBITS(2) []
    ],

    pub PGC_CPU_MAPPING [
        /// Fast/mega mix belongs to the A7 domain
        MF_A7_DOMAIN OFFSET(0) NUMBITS(1) [],
        MIPI_PHY_A7_DOMAIN OFFSET(2) NUMBITS(1) [],
        PCIE_PHY_A7_DOMAIN OFFSET(3) NUMBITS(1) [],
        USB_OTG1_PHY_A7_DOMAIN OFFSET(4) NUMBITS(1) [],
        USB_OTG2_PHY_A7_DOMAIN OFFSET(5) NUMBITS(1) [],
        USB_HSIC_PHY_A7_DOMAIN OFFSET(6) NUMBITS(1) []
    ],

    // Shared by the software power up and power down triggers. Hardware
    // clears a bit once the requested transition has completed.
    pub CPU_PGC_SW_REQ [
        CORE0_A7 OFFSET(0) NUMBITS(1) [],
        CORE1_A7 OFFSET(1) NUMBITS(1) []
    ],

    pub PU_PGC_SW_REQ [
        MIPI_PHY OFFSET(0) NUMBITS(1) [],
        PCIE_PHY OFFSET(1) NUMBITS(1) [],
        USB_OTG1_PHY OFFSET(2) NUMBITS(1) [],
        USB_OTG2_PHY OFFSET(3) NUMBITS(1) [],
        USB_HSIC_PHY OFFSET(4) NUMBITS(1) []
    ],

    pub PGC_CTRL [
        /// Power control: the domain is switched off on the next power
        /// down request while set
        PCR OFFSET(0) NUMBITS(1) []
    ]
];
