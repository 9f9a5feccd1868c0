// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Fixed-size bitmap over the interrupt lines routed through the GPC.
//!
//! Line `L` lives in word `L / 32 - 1`, bit `L % 32`, the same layout as the
//! IMR registers, so a bitmap word can be written to or compared against a
//! mask register directly.

use kernel::hil::irq::PRIVATE_LINES;
use kernel::ErrorCode;

use super::registers::IMR_NUM;

const BITS_PER_WORD: u32 = u32::BITS;

/// One past the highest line the GPC can mask.
pub const LINE_LIMIT: u32 = PRIVATE_LINES + IMR_NUM as u32 * BITS_PER_WORD;

/// Word index and bit mask of `line`, or `None` if the GPC does not cover it.
pub(crate) const fn line_position(line: u32) -> Option<(usize, u32)> {
    if line < PRIVATE_LINES || line >= LINE_LIMIT {
        return None;
    }
    Some((
        (line / BITS_PER_WORD - 1) as usize,
        1 << (line % BITS_PER_WORD),
    ))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IrqBitmap {
    words: [u32; IMR_NUM],
}

impl IrqBitmap {
    pub const fn new() -> Self {
        Self { words: [0; IMR_NUM] }
    }

    pub const fn from_words(words: [u32; IMR_NUM]) -> Self {
        Self { words }
    }

    pub const fn words(&self) -> [u32; IMR_NUM] {
        self.words
    }

    /// Set or clear the bit of `line`.
    pub fn update(&mut self, line: u32, on: bool) -> Result<(), ErrorCode> {
        let (index, mask) = line_position(line).ok_or(ErrorCode::INVAL)?;
        if on {
            self.words[index] |= mask;
        } else {
            self.words[index] &= !mask;
        }
        Ok(())
    }

    pub fn contains(&self, line: u32) -> bool {
        match line_position(line) {
            Some((index, mask)) => self.words[index] & mask != 0,
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    /// Whether any line set here is also set in `other`.
    pub fn intersects(&self, other: &IrqBitmap) -> bool {
        self.words
            .iter()
            .zip(other.words.iter())
            .any(|(a, b)| a & b != 0)
    }

    /// Bitwise union of two bitmaps.
    pub fn union(&self, other: &IrqBitmap) -> IrqBitmap {
        let mut words = self.words;
        for (word, extra) in words.iter_mut().zip(other.words.iter()) {
            *word |= extra;
        }
        IrqBitmap { words }
    }
}
