// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Board-supplied configuration of the GPC.
//!
//! Configuration is a plain `const`-constructible value rather than a set of
//! Cargo features, so every option is type-checked in every build and boards
//! can start from [`GpcConfig::IMX7D`] and override single fields.

use super::bitmap::IrqBitmap;
use super::registers::IMR_NUM;

/// Number of extra polls of a software power request, after the first one,
/// before the hardware is considered unresponsive.
pub const DEFAULT_HANDSHAKE_POLL_LIMIT: usize = 100_000;

/// Members of the i.MX 7 family that share this GPC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SocVariant {
    /// Dual core part with the fast/mega mix and the PCIe/MIPI PHY domains
    Imx7d,
    /// Single core part
    Imx7s,
}

impl SocVariant {
    /// Whether wakeup sources in the fast/mega mix and the PHY regulator
    /// hooks apply to this part.
    pub const fn has_mix_and_phys(self) -> bool {
        match self {
            SocVariant::Imx7d => true,
            SocVariant::Imx7s => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GpcConfig {
    pub variant: SocVariant,
    /// Lines whose wakeup path needs the fast/mega mix powered, as four
    /// bitmap words in IMR layout (line `L` is word `L / 32 - 1`, bit
    /// `L % 32`).
    pub mf_mix_wakeup_irqs: [u32; IMR_NUM],
    /// Upper bound on retries when polling a software power request. The
    /// request is always read at least once.
    pub handshake_poll_limit: usize,
}

impl GpcConfig {
    pub const IMX7D: GpcConfig = GpcConfig {
        variant: SocVariant::Imx7d,
        mf_mix_wakeup_irqs: [0; IMR_NUM],
        handshake_poll_limit: DEFAULT_HANDSHAKE_POLL_LIMIT,
    };

    pub const IMX7S: GpcConfig = GpcConfig {
        variant: SocVariant::Imx7s,
        ..GpcConfig::IMX7D
    };

    /// The mf-capable bitmap this configuration loads at construction. Parts
    /// without the mix ignore the configured words.
    pub const fn mf_capable(&self) -> IrqBitmap {
        if self.variant.has_mix_and_phys() {
            IrqBitmap::from_words(self.mf_mix_wakeup_irqs)
        } else {
            IrqBitmap::new()
        }
    }
}
