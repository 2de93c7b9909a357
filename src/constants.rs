// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Polling configuration shared by all wait helpers
pub mod poll {
    /// Fixed delay between successive status checks, in seconds
    pub const INTERVAL_SECS: u64 = 1;
}

/// BareMetalHost defaults and accepted values
pub mod bmh {
    /// Boot modes accepted by the metal3 baremetal-operator
    pub const ACCEPTED_BOOT_MODES: [&str; 3] = ["UEFI", "UEFISecureBoot", "legacy"];
}

/// NodePool defaults
pub mod nodepool {
    /// Platform type set on every NodePool built by this crate
    pub const PLATFORM_AGENT: &str = "Agent";
}
