// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Standard error enum for invoking operations

use core::fmt;

/// Standard errors in Tock.
///
/// This does not feature any success cases; drivers return
/// `Result<(), ErrorCode>` and callers use `?` to propagate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum ErrorCode {
    /// Generic failure condition
    FAIL = 0,
    /// Underlying system is busy; retry
    BUSY = 1,
    /// The state requested is already set
    ALREADY = 2,
    /// The component is powered down
    OFF = 3,
    /// Reservation required before use
    RESERVE = 4,
    /// An invalid parameter was passed
    INVAL = 5,
    /// Parameter passed was too large
    SIZE = 6,
    /// Operation canceled by a call
    CANCEL = 7,
    /// Memory required not available
    NOMEM = 8,
    /// Operation or command is unsupported
    NOSUPPORT = 9,
    /// Device does not exist
    NODEVICE = 10,
    /// Device is not physically installed
    UNINSTALLED = 11,
    /// Request not acknowledged
    NOACK = 12,
}

impl From<ErrorCode> for usize {
    fn from(err: ErrorCode) -> usize {
        err as usize
    }
}

impl From<ErrorCode> for Result<(), ErrorCode> {
    fn from(ec: ErrorCode) -> Self {
        Err(ec)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let description = match self {
            ErrorCode::FAIL => "generic failure",
            ErrorCode::BUSY => "busy",
            ErrorCode::ALREADY => "already set",
            ErrorCode::OFF => "powered down",
            ErrorCode::RESERVE => "reservation required",
            ErrorCode::INVAL => "invalid parameter",
            ErrorCode::SIZE => "parameter too large",
            ErrorCode::CANCEL => "canceled",
            ErrorCode::NOMEM => "out of memory",
            ErrorCode::NOSUPPORT => "not supported",
            ErrorCode::NODEVICE => "no such device",
            ErrorCode::UNINSTALLED => "not installed",
            ErrorCode::NOACK => "not acknowledged",
        };
        f.write_str(description)
    }
}
