// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Interface for voltage regulator event notifications.
//!
//! A regulator delivers events to a single registered client just before and
//! after its output changes, so that consumers can sequence dependent power
//! domains. Events carry no payload.

use crate::ErrorCode;

/// Events a regulator reports to its client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegulatorEvent {
    /// The regulator is about to be enabled.
    PreEnable,
    /// The regulator output has been enabled.
    Enabled,
    /// The regulator is about to be disabled.
    PreDisable,
    /// The regulator output has been disabled.
    Disabled,
}

/// Interface for users of regulator events. In order to receive events, the
/// user must implement this `RegulatorClient` interface and register with
/// [`Regulator::set_client`].
pub trait RegulatorClient {
    /// Called when the regulator reports `event`.
    fn regulator_event(&self, event: RegulatorEvent);
}

/// A regulator that can notify one client of its events.
pub trait Regulator<'a> {
    /// Register `client` for this regulator's events.
    ///
    /// Returns an error if the regulator is not available or cannot accept
    /// another client.
    fn set_client(&self, client: &'a dyn RegulatorClient) -> Result<(), ErrorCode>;
}
