// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Custom resource types for the kinds managed by the builders.

pub mod bmh;
pub mod nodepool;

pub use bmh::{BareMetalHost, ProvisioningState};
pub use nodepool::NodePool;
