pub mod error;

use std::collections::HashMap;

use log::{debug, warn};
use serde::Deserialize;

use self::error::Error;

/// The subset of a KubeVirt VirtualMachineInstance the hook consumes.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct VirtualMachineInstance {
    pub spec: VirtualMachineInstanceSpec,
    pub status: VirtualMachineInstanceStatus,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct VirtualMachineInstanceSpec {
    pub networks: Vec<NetworkDefinition>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct VirtualMachineInstanceStatus {
    pub interfaces: Vec<InterfaceStatus>,
}

/// A network declared on the instance and where it comes from.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub source: NetworkSource,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSource {
    pub pod: Option<PodNetwork>,
    pub multus: Option<MultusNetwork>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct PodNetwork {}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MultusNetwork {
    pub network_name: String,
    pub default: bool,
}

impl NetworkDefinition {
    /// Multus attachments other than the default one are secondary networks.
    pub fn is_secondary_multus(&self) -> bool {
        matches!(&self.source.multus, Some(multus) if !multus.default)
    }
}

/// An interface as reported by the guest agent or the launcher.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct InterfaceStatus {
    pub mac: Option<String>,
    pub name: Option<String>,
}

/// Hardware address to logical network name.
pub type MacMap = HashMap<String, String>;

impl VirtualMachineInstance {
    pub fn decode(json: &[u8]) -> Result<Self, Error> {
        Ok(serde_json::from_slice(json)?)
    }

    /// Decodes the instance, falling back to an empty one when the payload
    /// can't be parsed. A broken VMI only costs us the rewrite, not the call.
    pub fn decode_or_default(json: &[u8]) -> Self {
        match Self::decode(json) {
            Ok(vmi) => vmi,
            Err(e) => {
                warn!("{}; continuing with an empty instance", e);
                Self::default()
            }
        }
    }

    /// Maps every reported hardware address to its network. Later statuses
    /// win for a duplicated address.
    pub fn mac_map(&self) -> MacMap {
        let mut macs = MacMap::new();
        for status in &self.status.interfaces {
            match (&status.mac, &status.name) {
                (Some(mac), Some(name)) => {
                    macs.insert(mac.clone(), name.clone());
                }
                _ => debug!(
                    "ignoring interface status without mac or network name: {:?}",
                    status
                ),
            }
        }
        macs
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::{MultusNetwork, NetworkDefinition, NetworkSource, VirtualMachineInstance};

    fn vmi() -> serde_json::Value {
        json!({
            "apiVersion": "kubevirt.io/v1",
            "kind": "VirtualMachineInstance",
            "metadata": {"name": "testvmi", "namespace": "default"},
            "spec": {
                "domain": {"devices": {"interfaces": [{"name": "default", "masquerade": {}}]}},
                "networks": [
                    {"name": "default", "pod": {}},
                    {"name": "blue", "multus": {"networkName": "blue-net"}},
                    {"name": "red", "multus": {"networkName": "red-net", "default": true}}
                ]
            },
            "status": {
                "interfaces": [
                    {"name": "default", "mac": "52:54:00:00:00:01", "interfaceName": "eth0"},
                    {"name": "blue", "mac": "52:54:00:00:00:02", "ipAddress": "10.1.1.2"}
                ]
            }
        })
    }

    #[test]
    fn decodes_networks_and_statuses() {
        let vmi = VirtualMachineInstance::decode(vmi().to_string().as_bytes()).unwrap();

        let names: Vec<_> = vmi.spec.networks.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["default", "blue", "red"]);
        assert!(vmi.spec.networks[0].source.pod.is_some());
        assert_eq!(
            vmi.spec.networks[1].source.multus,
            Some(MultusNetwork {
                network_name: "blue-net".into(),
                default: false,
            })
        );
        assert!(!vmi.spec.networks[0].is_secondary_multus());
        assert!(vmi.spec.networks[1].is_secondary_multus());
        assert!(!vmi.spec.networks[2].is_secondary_multus());

        assert_eq!(vmi.status.interfaces.len(), 2);
        assert_eq!(vmi.status.interfaces[0].mac.as_deref(), Some("52:54:00:00:00:01"));
    }

    #[test]
    fn missing_sections_decode_to_empty() {
        let vmi = VirtualMachineInstance::decode(br#"{"metadata": {"name": "x"}}"#).unwrap();
        assert_eq!(vmi, VirtualMachineInstance::default());
    }

    #[test]
    fn malformed_json_falls_back_to_empty_instance() {
        assert!(VirtualMachineInstance::decode(b"{not json").is_err());
        assert_eq!(
            VirtualMachineInstance::decode_or_default(b"{not json"),
            VirtualMachineInstance::default()
        );
        assert!(VirtualMachineInstance::decode_or_default(b"")
            .mac_map()
            .is_empty());
    }

    #[test]
    fn mac_map_correlates_statuses() {
        let vmi = VirtualMachineInstance::decode(vmi().to_string().as_bytes()).unwrap();
        let macs = vmi.mac_map();

        assert_eq!(macs.len(), 2);
        assert_eq!(macs["52:54:00:00:00:01"], "default");
        assert_eq!(macs["52:54:00:00:00:02"], "blue");
    }

    #[test]
    fn mac_map_last_status_wins() {
        let vmi = VirtualMachineInstance::decode(
            json!({
                "status": {"interfaces": [
                    {"name": "first", "mac": "52:54:00:00:00:01"},
                    {"name": "second", "mac": "52:54:00:00:00:01"}
                ]}
            })
            .to_string()
            .as_bytes(),
        )
        .unwrap();

        let macs = vmi.mac_map();
        assert_eq!(macs.len(), 1);
        assert_eq!(macs["52:54:00:00:00:01"], "second");
    }

    #[test]
    fn mac_map_skips_incomplete_statuses() {
        let vmi = VirtualMachineInstance::decode(
            json!({
                "status": {"interfaces": [
                    {"name": "nomac"},
                    {"mac": "52:54:00:00:00:09"},
                    {"name": "ok", "mac": "52:54:00:00:00:0a"}
                ]}
            })
            .to_string()
            .as_bytes(),
        )
        .unwrap();

        let macs = vmi.mac_map();
        assert_eq!(macs.len(), 1);
        assert_eq!(macs["52:54:00:00:00:0a"], "ok");
    }

    #[test]
    fn pod_network_is_not_secondary() {
        let network = NetworkDefinition {
            name: "default".into(),
            source: NetworkSource::default(),
        };
        assert!(!network.is_secondary_multus());
    }
}
