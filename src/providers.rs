//! Cloud provider configuration and registration.
//!
//! Each provider's settings are resolved once (flag, then environment
//! variable, then default) into an immutable value, and the composition root
//! registers provider managers into a [`ProviderRegistry`] it owns.

use clap::Args;
use serde::Serialize;
use std::collections::BTreeMap;

/// Settings of the libvirt provider.
#[derive(Args, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibvirtConfig {
    /// libvirt URI
    #[arg(long = "uri", env = "LIBVIRT_URI", default_value = "qemu:///system")]
    pub uri: String,

    /// libvirt storage pool
    #[arg(long = "pool-name", env = "LIBVIRT_POOL", default_value = "default")]
    pub pool_name: String,

    /// libvirt network pool
    #[arg(long = "network-name", env = "LIBVIRT_NET", default_value = "default")]
    pub network_name: String,

    /// libvirt storage dir
    #[arg(long = "data-dir", default_value = "/var/lib/libvirt/images")]
    pub data_dir: String,

    /// Base volume of the pod VM image
    #[arg(long = "vol-name", env = "LIBVIRT_VOL_NAME", default_value = "podvm-base.qcow2")]
    pub vol_name: String,

    /// Use non-CVMs for peer pods
    #[arg(long = "disable-cvm")]
    pub disable_cvm: bool,

    /// Libvirt's LaunchSecurity element for Confidential VMs. SEV or s390-pv.
    /// If omitted, will automatically determine.
    #[arg(long = "launch-security", env = "LIBVIRT_LAUNCH_SECURITY", default_value = "")]
    pub launch_security: String,

    /// Path to OVMF
    #[arg(
        long = "firmware",
        env = "LIBVIRT_FIRMWARE",
        default_value = "/usr/share/edk2/ovmf/OVMF_CODE.fd"
    )]
    pub firmware: String,
}

/// A registered cloud provider.
pub trait CloudManager: Send + Sync {
    fn name(&self) -> &'static str;

    /// Resolved provider settings rendered as YAML.
    fn render_config(&self) -> Result<String, serde_yaml::Error>;
}

pub struct LibvirtManager {
    config: LibvirtConfig,
}

impl LibvirtManager {
    pub fn new(config: LibvirtConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LibvirtConfig {
        &self.config
    }
}

impl CloudManager for LibvirtManager {
    fn name(&self) -> &'static str {
        "libvirt"
    }

    fn render_config(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.config)
    }
}

/// Provider managers keyed by name.
#[derive(Default)]
pub struct ProviderRegistry {
    managers: BTreeMap<&'static str, Box<dyn CloudManager>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a manager, replacing any earlier one with the same name.
    pub fn register(&mut self, manager: Box<dyn CloudManager>) {
        self.managers.insert(manager.name(), manager);
    }

    pub fn get(&self, name: &str) -> Option<&dyn CloudManager> {
        self.managers.get(name).map(|m| m.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.managers.keys().copied()
    }
}
