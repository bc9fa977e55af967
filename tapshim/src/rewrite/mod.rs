pub mod error;

use std::sync::Arc;

use log::{debug, info, trace, warn};

use crate::{
    config::Config,
    domain::{DomainDescriptor, InterfaceDevice},
    namescheme::{NameScheme, NetworkNames},
    vmi::{MacMap, VirtualMachineInstance},
};

use self::error::Error;

const TAP_PREFIX: &str = "tap";
const HASHED_PREFIX_LEN: usize = 3;

/// What happens to a single interface device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The device has no hardware address or no target device name.
    Ineligible,
    /// No reported interface status carries the device's hardware address.
    UnknownMac(String),
    /// The network has no entry in the naming scheme.
    UnknownNetwork(String),
    /// The hashed name is too short to derive a tap name from.
    InvalidHashedName(String),
    /// The device's target gets this name.
    Rewrite(String),
}

/// `"tap" + hashed[3..]`, or `None` when `hashed` has no character boundary
/// at byte three.
pub fn tap_name(hashed: &str) -> Option<String> {
    hashed
        .get(HASHED_PREFIX_LEN..)
        .map(|suffix| format!("{}{}", TAP_PREFIX, suffix))
}

/// Walks the MAC -> network -> hashed name chain for one device.
pub fn resolve(interface: &InterfaceDevice, macs: &MacMap, names: &NetworkNames) -> Resolution {
    let mac = match (interface.mac(), interface.target_device()) {
        (Some(mac), Some(_)) => mac,
        _ => return Resolution::Ineligible,
    };
    let network = match macs.get(mac) {
        Some(network) => network,
        None => return Resolution::UnknownMac(mac.into()),
    };
    let hashed = match names.get(network) {
        Some(hashed) => hashed,
        None => return Resolution::UnknownNetwork(network.clone()),
    };
    match tap_name(hashed) {
        Some(name) => Resolution::Rewrite(name),
        None => Resolution::InvalidHashedName(hashed.clone()),
    }
}

/// Points every resolvable interface at its hashed tap device. Devices that
/// can't be resolved are left as they are. Returns the number of rewritten
/// devices.
pub fn rewrite(domain: &mut DomainDescriptor, macs: &MacMap, names: &NetworkNames) -> usize {
    let mut rewritten = 0;
    for interface in domain.interfaces_mut() {
        match resolve(interface, macs, names) {
            Resolution::Rewrite(name) => {
                info!(
                    "updating tap interface name {} to {}",
                    interface.target_device().unwrap_or_default(),
                    name
                );
                interface.set_target_device(name);
                rewritten += 1;
            }
            Resolution::InvalidHashedName(hashed) => warn!(
                "hashed interface name `{}` is too short, leaving {} unchanged",
                hashed,
                interface.target_device().unwrap_or_default()
            ),
            Resolution::Ineligible => {
                debug!("skipping interface without mac or target: {:?}", interface)
            }
            Resolution::UnknownMac(mac) => debug!("no interface status for mac {}", mac),
            Resolution::UnknownNetwork(network) => {
                debug!("network {} has no hashed name", network)
            }
        }
    }
    rewritten
}

/// The OnDefineDomain transform, shared by every callback version.
pub struct DomainHook {
    config: Arc<Config>,
    scheme: Box<dyn NameScheme>,
}

impl DomainHook {
    pub fn new(config: Arc<Config>, scheme: Box<dyn NameScheme>) -> Self {
        DomainHook { config, scheme }
    }

    pub fn on_define_domain(&self, vmi_json: &[u8], domain_xml: &[u8]) -> Result<Vec<u8>, Error> {
        debug!(
            "{} {} OnDefineDomain called",
            self.config.name, self.config.version
        );
        trace!("domain xml: {}", String::from_utf8_lossy(domain_xml));

        let mut domain = DomainDescriptor::decode(domain_xml).map_err(Error::DecodeDomain)?;
        let vmi = VirtualMachineInstance::decode_or_default(vmi_json);

        let names = self.scheme.network_names(&vmi.spec.networks);
        let macs = vmi.mac_map();
        let rewritten = rewrite(&mut domain, &macs, &names);

        let xml = domain.encode().map_err(Error::EncodeDomain)?;
        info!(
            "successfully updated original domain spec, {} of {} interfaces rewritten",
            rewritten,
            domain.interfaces().len()
        );

        Ok(xml)
    }
}
