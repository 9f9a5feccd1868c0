// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Shared kernel types for chip drivers.
//!
//! The kernel crate holds the Hardware Interface Layer (HIL) definitions that
//! chip drivers implement or consume, the standard [`ErrorCode`], and the
//! small set of utilities (register interface, static references) that every
//! chip crate uses to talk to memory-mapped peripherals.

#![no_std]

pub mod errorcode;
pub mod hil;
pub mod utilities;

pub use crate::errorcode::ErrorCode;
