// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Slot table sequencing.
//!
//! On a low power transition the GPC walks the slot configuration words in
//! order. Each word holds a 2-bit power down or power up request per domain,
//! and the walk only advances past a slot once the acknowledgment selected
//! in `PGC_ACK_SEL_A7` arrives. Slots 0 to 4 conventionally hold the power
//! down order and slots 5 to 9 the power up order.

use core::mem::{offset_of, size_of};

use kernel::utilities::registers::interfaces::{ReadWriteable, Writeable};
use kernel::utilities::registers::ReadWrite;
use kernel::ErrorCode;
use log::error;

use super::domain::{PowerDomain, SlotDirection};
use super::registers::{GpcRegisters, PgcRegisters, MAX_SLOT_NUMBER, PGC_ACK_SEL_A7};
use super::{Gpc, Locked};

const WORD: usize = size_of::<u32>();

const PGC_WORDS: usize = (offset_of!(PgcRegisters, timing) + WORD) / WORD;

/// Registers following the slot table, as byte offset and number of words.
const TRAILING_REGISTERS: [(usize, usize); 14] = [
    (offset_of!(GpcRegisters, pgc_cpu_mapping), 1),
    (offset_of!(GpcRegisters, cpu_pgc_sw_pup_req), 1),
    (offset_of!(GpcRegisters, pu_pgc_sw_pup_req), 1),
    (offset_of!(GpcRegisters, cpu_pgc_sw_pdn_req), 1),
    (offset_of!(GpcRegisters, pu_pgc_sw_pdn_req), 1),
    (offset_of!(GpcRegisters, pgc_c0), PGC_WORDS),
    (offset_of!(GpcRegisters, pgc_c1), PGC_WORDS),
    (offset_of!(GpcRegisters, pgc_scu), PGC_WORDS),
    (offset_of!(GpcRegisters, pgc_fm), PGC_WORDS),
    (offset_of!(GpcRegisters, pgc_mipi_phy), PGC_WORDS),
    (offset_of!(GpcRegisters, pgc_pcie_phy), PGC_WORDS),
    (offset_of!(GpcRegisters, pgc_usb_otg1_phy), PGC_WORDS),
    (offset_of!(GpcRegisters, pgc_usb_otg2_phy), PGC_WORDS),
    (offset_of!(GpcRegisters, pgc_usb_hsic_phy), PGC_WORDS),
];

/// Byte offset of slot `index` past the table, if a register lives there.
/// Reserved gaps and offsets past the block give `None`.
fn trailing_register_offset(index: usize) -> Option<usize> {
    let offset = index
        .checked_mul(WORD)?
        .checked_add(offset_of!(GpcRegisters, slot_cfg))?;
    TRAILING_REGISTERS
        .iter()
        .any(|&(start, words)| offset >= start && offset < start + words * WORD)
        .then_some(offset)
}

impl Locked<'_> {
    pub(crate) fn assign_slot(
        &mut self,
        index: usize,
        domain: PowerDomain,
        direction: SlotDirection,
    ) -> Result<(), ErrorCode> {
        let value = domain.slot_field().val(direction.code());
        if index < MAX_SLOT_NUMBER {
            self.regs.slot_cfg[index].write(value);
            return Ok(());
        }

        error!("gpc: invalid slot index {}", index);
        // Past the table the word is still written, landing on whatever
        // register follows. Reserved gaps are skipped.
        if let Some(offset) = trailing_register_offset(index) {
            let word = self
                .base
                .as_ptr()
                .cast::<u8>()
                .wrapping_add(offset)
                .cast::<ReadWrite<u32>>();
            // SAFETY: `offset` is the offset of a 32-bit register inside the
            // block `base` points to.
            unsafe { (*word).set(value.value) };
        }
        Err(ErrorCode::SIZE)
    }

    pub(crate) fn select_ack(&mut self, domain: PowerDomain, direction: SlotDirection, enable: bool) {
        if enable {
            self.regs
                .pgc_ack_sel_a7
                .modify(direction.dummy_ack().val(0) + domain.ack_field(direction).val(1));
        }
    }

    pub(crate) fn set_slot_ack(
        &mut self,
        index: usize,
        domain: PowerDomain,
        direction: SlotDirection,
        ack: bool,
    ) -> Result<(), ErrorCode> {
        self.assign_slot(index, domain, direction)?;
        self.select_ack(domain, direction, ack);
        Ok(())
    }

    pub(crate) fn restore_dummy_acks(&mut self) {
        self.regs
            .pgc_ack_sel_a7
            .write(PGC_ACK_SEL_A7::DUMMY_PDN_ACK::SET + PGC_ACK_SEL_A7::DUMMY_PUP_ACK::SET);
    }

    pub(crate) fn clear_slots(&mut self, indices: &[usize]) {
        for &index in indices {
            if let Some(slot) = self.regs.slot_cfg.get(index) {
                slot.set(0);
            }
        }
    }

    pub(crate) fn disable_slots(&mut self) {
        for slot in self.regs.slot_cfg.iter() {
            slot.set(0);
        }
        self.restore_dummy_acks();
    }
}

impl Gpc {
    /// Place a power `direction` request for `domain` in slot `index`.
    ///
    /// The slot word is overwritten, so any other domain previously placed
    /// in the same slot is dropped. An index past the slot table is logged
    /// and returns `Err(ErrorCode::SIZE)`, but the word at that position is
    /// still written if it lies inside the register block.
    pub fn assign_slot(
        &self,
        index: usize,
        domain: PowerDomain,
        direction: SlotDirection,
    ) -> Result<(), ErrorCode> {
        self.lock().assign_slot(index, domain, direction)
    }

    /// Make the sequencer wait for `domain`'s acknowledgment in the given
    /// direction instead of the dummy ack. Does nothing if `enable` is
    /// false.
    pub fn select_ack(&self, domain: PowerDomain, direction: SlotDirection, enable: bool) {
        self.lock().select_ack(domain, direction, enable);
    }

    /// Zero the whole slot table and fall back to the dummy acks.
    pub fn disable_slots(&self) {
        self.lock().disable_slots();
    }
}
