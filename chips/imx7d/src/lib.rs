// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Peripheral implementations for the i.MX 7Dual/7Solo application
//! processors.
//!
//! i.MX 7D reference manual:
//! <https://www.nxp.com/docs/en/reference-manual/IMX7DRM.pdf>

#![crate_name = "imx7d"]
#![crate_type = "rlib"]
#![cfg_attr(not(test), no_std)]

pub mod gpc;
