// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! BareMetalHost builder

use super::{BuildableResource, ResourceBuilder};
use crate::constants::bmh::ACCEPTED_BOOT_MODES;
use crate::error::Result;
use crate::types::bmh::{BareMetalHost, BareMetalHostSpec, BmcDetails, RootDeviceHints};
use crate::types::ProvisioningState;
use kube::api::ObjectMeta;
use kube::Client;
use std::time::Duration;
use tracing::{debug, instrument};

impl BuildableResource for BareMetalHost {
    const SHORT_NAME: &'static str = "bmh";
    const NAME: &'static str = "baremetalhost";

    fn from_metadata(metadata: ObjectMeta) -> Self {
        BareMetalHost {
            metadata,
            spec: BareMetalHostSpec::default(),
            status: None,
        }
    }
}

pub type BareMetalHostBuilder = ResourceBuilder<BareMetalHost>;

impl ResourceBuilder<BareMetalHost> {
    /// Compose a BareMetalHost definition; invalid arguments are recorded and
    /// reported by the first operation (or by [`ResourceBuilder::validate`]).
    pub fn new(
        client: Client,
        name: &str,
        namespace: &str,
        bmc_address: &str,
        bmc_secret_name: &str,
        boot_mac_address: &str,
        boot_mode: &str,
    ) -> Self {
        debug!(
            "Initializing new bmh {} in namespace {} with bmc address {}",
            name, namespace, bmc_address
        );

        let definition = BareMetalHost {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            spec: BareMetalHostSpec {
                bmc: BmcDetails {
                    address: bmc_address.to_string(),
                    credentials_name: bmc_secret_name.to_string(),
                    disable_certificate_verification: true,
                },
                boot_mode: boot_mode.to_string(),
                boot_mac_address: boot_mac_address.to_string(),
                online: true,
                externally_provisioned: false,
                root_device_hints: None,
            },
            status: None,
        };

        let mut builder = Self::from_definition(client, definition);

        let required = [
            ("name", name),
            ("nsname", namespace),
            ("bmcAddress", bmc_address),
            ("bmcSecretName", bmc_secret_name),
            ("bootMacAddress", boot_mac_address),
        ];
        for (field, value) in required {
            if value.is_empty() {
                builder.record_error(format!("BMH '{}' cannot be empty", field));
            }
        }

        if !ACCEPTED_BOOT_MODES.contains(&boot_mode) {
            builder.record_error("Not acceptable 'bootMode' value");
        }

        builder
    }

    fn with_root_device_hint(
        mut self,
        field: &str,
        value: &str,
        set: impl FnOnce(&mut RootDeviceHints, String),
    ) -> Self {
        if self.errors().is_empty() && value.is_empty() {
            self.record_error(format!(
                "the baremetalhost rootDeviceHint {} cannot be empty",
                field
            ));
        }

        self.mutate(|bmh| {
            set(
                bmh.spec.root_device_hints.get_or_insert_with(Default::default),
                value.to_string(),
            )
        });
        self
    }

    pub fn with_root_device_device_name(self, device_name: &str) -> Self {
        self.with_root_device_hint("deviceName", device_name, |h, v| h.device_name = Some(v))
    }

    pub fn with_root_device_hctl(self, hctl: &str) -> Self {
        self.with_root_device_hint("hctl", hctl, |h, v| h.hctl = Some(v))
    }

    pub fn with_root_device_model(self, model: &str) -> Self {
        self.with_root_device_hint("model", model, |h, v| h.model = Some(v))
    }

    pub fn with_root_device_vendor(self, vendor: &str) -> Self {
        self.with_root_device_hint("vendor", vendor, |h, v| h.vendor = Some(v))
    }

    pub fn with_root_device_serial_number(self, serial_number: &str) -> Self {
        self.with_root_device_hint("serialNumber", serial_number, |h, v| {
            h.serial_number = Some(v)
        })
    }

    pub fn with_root_device_wwn(self, wwn: &str) -> Self {
        self.with_root_device_hint("wwn", wwn, |h, v| h.wwn = Some(v))
    }

    pub fn with_root_device_wwn_with_extension(self, wwn_with_extension: &str) -> Self {
        self.with_root_device_hint("wwnWithExtension", wwn_with_extension, |h, v| {
            h.wwn_with_extension = Some(v)
        })
    }

    pub fn with_root_device_wwn_vendor_extension(self, wwn_vendor_extension: &str) -> Self {
        self.with_root_device_hint("wwnVendorExtension", wwn_vendor_extension, |h, v| {
            h.wwn_vendor_extension = Some(v)
        })
    }

    pub fn with_root_device_min_size_gigabytes(mut self, size: i32) -> Self {
        if self.errors().is_empty() && size < 0 {
            self.record_error("the baremetalhost rootDeviceHint size cannot be less than 0");
        }

        self.mutate(|bmh| {
            bmh.spec
                .root_device_hints
                .get_or_insert_with(Default::default)
                .min_size_gigabytes = Some(size)
        });
        self
    }

    pub fn with_root_device_rotational_disk(mut self, rotational: bool) -> Self {
        self.mutate(|bmh| {
            bmh.spec
                .root_device_hints
                .get_or_insert_with(Default::default)
                .rotational = Some(rotational)
        });
        self
    }

    /// Create the host and wait until it reports `provisioned`.
    pub async fn create_and_wait_until_provisioned(&mut self, timeout: Duration) -> Result<&mut Self> {
        self.create().await?;
        self.wait_until_provisioned(timeout).await?;
        Ok(self)
    }

    pub async fn wait_until_provisioned(&mut self, timeout: Duration) -> Result<()> {
        self.wait_until_in_status(ProvisioningState::Provisioned, timeout)
            .await
    }

    pub async fn wait_until_provisioning(&mut self, timeout: Duration) -> Result<()> {
        self.wait_until_in_status(ProvisioningState::Provisioning, timeout)
            .await
    }

    pub async fn wait_until_ready(&mut self, timeout: Duration) -> Result<()> {
        self.wait_until_in_status(ProvisioningState::Ready, timeout)
            .await
    }

    pub async fn wait_until_available(&mut self, timeout: Duration) -> Result<()> {
        self.wait_until_in_status(ProvisioningState::Available, timeout)
            .await
    }

    /// Poll every second until the host's provisioning state equals `state`.
    #[instrument(skip(self), fields(name = %self.name(), namespace = %self.namespace()))]
    pub async fn wait_until_in_status(
        &mut self,
        state: ProvisioningState,
        timeout: Duration,
    ) -> Result<()> {
        self.wait_for(
            |bmh: &BareMetalHost| {
                let current = bmh.provisioning_state();
                debug!("bmh is in state '{}', waiting for '{}'", current, state);
                current == state
            },
            timeout,
        )
        .await
    }
}
