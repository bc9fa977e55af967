use std::collections::HashMap;

use data_encoding::HEXLOWER;
use log::debug;
use ring::digest::{Context, SHA256};

use crate::vmi::NetworkDefinition;

/// Logical network name to the interface name derived for it.
pub type NetworkNames = HashMap<String, String>;

/// Derives pod interface names for the networks of an instance.
pub trait NameScheme: Send + Sync {
    fn network_names(&self, networks: &[NetworkDefinition]) -> NetworkNames;
}

/// Interface name of the primary pod network.
pub const PRIMARY_POD_INTERFACE_NAME: &str = "eth0";

const HASHED_PREFIX: &str = "pod";
const HASH_LENGTH: usize = 11;

/// The hashed scheme virt-handler uses to name pod interfaces: secondary
/// multus networks get `pod` followed by a truncated sha256 of the network
/// name, everything else is the primary interface.
#[derive(Debug, Default, Clone, Copy)]
pub struct HashedNameScheme;

impl HashedNameScheme {
    pub fn hashed_interface_name(network_name: &str) -> String {
        let mut context = Context::new(&SHA256);
        context.update(network_name.as_bytes());
        let digest = context.finish();
        let hash = HEXLOWER.encode(digest.as_ref());

        // 01234567890123
        // pod
        //    DIGESTDIGES
        format!("{}{}", HASHED_PREFIX, &hash[..HASH_LENGTH])
    }

    fn pod_interface_name(network: &NetworkDefinition) -> String {
        match &network.source.multus {
            Some(multus) if network.is_secondary_multus() => {
                debug!(
                    "network {} is attached through {}",
                    network.name, multus.network_name
                );
                Self::hashed_interface_name(&network.name)
            }
            _ => PRIMARY_POD_INTERFACE_NAME.into(),
        }
    }
}

impl NameScheme for HashedNameScheme {
    fn network_names(&self, networks: &[NetworkDefinition]) -> NetworkNames {
        networks
            .iter()
            .map(|network| (network.name.clone(), Self::pod_interface_name(network)))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::{HashedNameScheme, NameScheme};
    use crate::vmi::{MultusNetwork, NetworkDefinition, NetworkSource, PodNetwork};

    fn multus(name: &str, default: bool) -> NetworkDefinition {
        NetworkDefinition {
            name: name.into(),
            source: NetworkSource {
                pod: None,
                multus: Some(MultusNetwork {
                    network_name: format!("{name}-net"),
                    default,
                }),
            },
        }
    }

    #[test]
    fn hashes_network_names() {
        assert_eq!(
            HashedNameScheme::hashed_interface_name("blue"),
            "pod16477688c0e"
        );
        assert_eq!(
            HashedNameScheme::hashed_interface_name("red"),
            "podb1f51a511f1"
        );
    }

    #[test]
    fn names_primary_and_secondary_networks() {
        let networks = vec![
            NetworkDefinition {
                name: "default".into(),
                source: NetworkSource {
                    pod: Some(PodNetwork::default()),
                    multus: None,
                },
            },
            multus("blue", false),
            multus("red", true),
        ];

        let names = HashedNameScheme.network_names(&networks);
        assert_eq!(names.len(), 3);
        assert_eq!(names["default"], "eth0");
        assert_eq!(names["blue"], "pod16477688c0e");
        assert_eq!(names["red"], "eth0");
    }

    #[test]
    fn no_networks_no_names() {
        assert!(HashedNameScheme.network_names(&[]).is_empty());
    }
}
