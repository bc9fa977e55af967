pub mod error;

use std::{borrow::Cow, collections::HashMap};

use log::trace;
use quick_xml::{
    events::{BytesStart, Event},
    Reader, Writer,
};

use self::error::Error;

const DOMAIN: &[u8] = b"domain";
const DEVICES: &[u8] = b"devices";
const INTERFACE: &[u8] = b"interface";
const MAC: &[u8] = b"mac";
const MAC_ADDRESS: &[u8] = b"address";
const TARGET: &[u8] = b"target";
const TARGET_DEV: &str = "dev";

/// A libvirt domain document.
///
/// The document is kept as the event stream it was read from, so everything
/// but the interface target names is written back the way it came in.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainDescriptor {
    events: Vec<Event<'static>>,
    interfaces: Vec<InterfaceDevice>,
}

/// A `<devices><interface>` element of the domain.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InterfaceDevice {
    mac: Option<String>,
    target: Option<TargetDevice>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TargetDevice {
    // index of the `<target>` start event
    event: usize,
    device: String,
    rewritten: bool,
}

impl InterfaceDevice {
    /// Hardware address from `<mac address=...>`.
    pub fn mac(&self) -> Option<&str> {
        self.mac.as_deref()
    }

    /// Device name from `<target dev=...>`.
    pub fn target_device(&self) -> Option<&str> {
        self.target.as_ref().map(|t| t.device.as_str())
    }

    /// Replaces the target device name. Interfaces without a target device
    /// are left alone; nothing is added to the document.
    pub fn set_target_device(&mut self, device: impl Into<String>) {
        if let Some(target) = self.target.as_mut() {
            target.device = device.into();
            target.rewritten = true;
        }
    }
}

fn at(path: &[Vec<u8>], expected: &[&[u8]]) -> bool {
    path.len() == expected.len() && path.iter().zip(expected).all(|(a, b)| a.as_slice() == *b)
}

fn attribute(start: &BytesStart, key: &[u8]) -> Result<Option<String>, quick_xml::Error> {
    for attr in start.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn retarget(start: &BytesStart, device: &str) -> Result<BytesStart<'static>, quick_xml::Error> {
    let mut retargeted = start.clone().into_owned();
    retargeted.clear_attributes();
    for attr in start.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == TARGET_DEV.as_bytes() {
            retargeted.push_attribute((TARGET_DEV, device));
        } else {
            let key = String::from_utf8_lossy(attr.key.as_ref());
            let value: Cow<str> = attr.unescape_value()?;
            retargeted.push_attribute((&*key, &*value));
        }
    }
    Ok(retargeted)
}

impl DomainDescriptor {
    pub fn decode(xml: &[u8]) -> Result<Self, Error> {
        let mut reader = Reader::from_reader(xml);
        let mut buf = Vec::new();

        let mut events = Vec::new();
        let mut interfaces: Vec<InterfaceDevice> = Vec::new();
        let mut path: Vec<Vec<u8>> = Vec::new();
        let mut current: Option<usize> = None;
        let mut root_seen = false;
        let mut root_closed = false;

        loop {
            buf.clear();
            let event = match reader.read_event_into(&mut buf) {
                Ok(event) => event.into_owned(),
                Err(source) => {
                    return Err(Error::Parse {
                        position: reader.buffer_position(),
                        source,
                    })
                }
            };
            let index = events.len();

            match &event {
                Event::Start(start) | Event::Empty(start) => {
                    let name = start.name().as_ref().to_vec();
                    if path.is_empty() && !root_seen {
                        if name != DOMAIN {
                            return Err(Error::UnexpectedRoot(
                                String::from_utf8_lossy(&name).into_owned(),
                            ));
                        }
                        root_seen = true;
                    }

                    if !root_closed {
                        if at(&path, &[DOMAIN, DEVICES]) && name == INTERFACE {
                            interfaces.push(InterfaceDevice::default());
                            current = Some(interfaces.len() - 1);
                        } else if at(&path, &[DOMAIN, DEVICES, INTERFACE]) {
                            if let Some(interface) = current.map(|i| &mut interfaces[i]) {
                                let position = reader.buffer_position();
                                let parse = |source| Error::Parse { position, source };
                                if name == MAC {
                                    interface.mac = attribute(start, MAC_ADDRESS).map_err(parse)?;
                                } else if name == TARGET {
                                    interface.target = attribute(start, TARGET_DEV.as_bytes())
                                        .map_err(parse)?
                                        .map(|device| TargetDevice {
                                            event: index,
                                            device,
                                            rewritten: false,
                                        });
                                }
                            }
                        }
                    }

                    if let Event::Start(_) = event {
                        path.push(name);
                    } else if path.len() == 2 && name == INTERFACE {
                        current = None;
                    }
                }
                Event::End(end) => {
                    let popped = path.pop().ok_or_else(|| {
                        Error::UnbalancedEnd(String::from_utf8_lossy(end.name().as_ref()).into_owned())
                    })?;
                    if path.len() == 2 && popped == INTERFACE {
                        current = None;
                    }
                    if path.is_empty() {
                        root_closed = true;
                    }
                }
                Event::Eof => break,
                _ => {}
            }

            events.push(event);
        }

        if let Some(open) = path.last() {
            return Err(Error::Unterminated(String::from_utf8_lossy(open).into_owned()));
        }
        if !root_seen {
            return Err(Error::MissingRoot);
        }

        trace!(
            "decoded domain with {} events and {} interfaces",
            events.len(),
            interfaces.len()
        );

        Ok(DomainDescriptor { events, interfaces })
    }

    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        let rewritten: HashMap<usize, &str> = self
            .interfaces
            .iter()
            .filter_map(|i| i.target.as_ref())
            .filter(|t| t.rewritten)
            .map(|t| (t.event, t.device.as_str()))
            .collect();

        let mut writer = Writer::new(Vec::new());
        for (index, event) in self.events.iter().enumerate() {
            let result = match (rewritten.get(&index), event) {
                (Some(device), Event::Start(start)) => retarget(start, device)
                    .and_then(|start| writer.write_event(Event::Start(start))),
                (Some(device), Event::Empty(start)) => retarget(start, device)
                    .and_then(|start| writer.write_event(Event::Empty(start))),
                _ => writer.write_event(event),
            };
            result.map_err(Error::Encode)?;
        }

        Ok(writer.into_inner())
    }

    pub fn interfaces(&self) -> &[InterfaceDevice] {
        &self.interfaces
    }

    /// Interfaces in declaration order. Only their target device names can
    /// be changed.
    pub fn interfaces_mut(&mut self) -> &mut [InterfaceDevice] {
        &mut self.interfaces
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::{error::Error, DomainDescriptor};

    pub(crate) const DOMAIN_XML: &str = r#"<domain type="kvm" xmlns:qemu="http://libvirt.org/schemas/domain/qemu/1.0">
  <name>default_testvmi</name>
  <memory unit="b">134217728</memory>
  <devices>
    <interface type="ethernet">
      <source></source>
      <target dev="vnet0" managed="no"></target>
      <model type="virtio-non-transitional"></model>
      <mac address="52:54:00:00:00:01"></mac>
      <alias name="ua-default"></alias>
    </interface>
    <interface type='ethernet'>
      <mac address='52:54:00:00:00:02'/>
      <target dev='vnet1'/>
    </interface>
    <interface type="ethernet">
      <target dev="vnet2"/>
    </interface>
    <interface type="ethernet">
      <mac address="52:54:00:00:00:04"/>
    </interface>
    <disk device="disk" type="file">
      <target bus="virtio" dev="vda"></target>
    </disk>
    <!-- console -->
    <serial type="unix">
      <target port="0"></target>
    </serial>
  </devices>
  <qemu:commandline>
    <qemu:arg value="-fw_cfg"></qemu:arg>
  </qemu:commandline>
</domain>"#;

    #[test]
    fn decodes_interfaces_in_order() {
        let domain = DomainDescriptor::decode(DOMAIN_XML.as_bytes()).unwrap();
        let interfaces = domain.interfaces();

        assert_eq!(interfaces.len(), 4);
        assert_eq!(interfaces[0].mac(), Some("52:54:00:00:00:01"));
        assert_eq!(interfaces[0].target_device(), Some("vnet0"));
        assert_eq!(interfaces[1].mac(), Some("52:54:00:00:00:02"));
        assert_eq!(interfaces[1].target_device(), Some("vnet1"));
        assert_eq!(interfaces[2].mac(), None);
        assert_eq!(interfaces[2].target_device(), Some("vnet2"));
        assert_eq!(interfaces[3].mac(), Some("52:54:00:00:00:04"));
        assert_eq!(interfaces[3].target_device(), None);
    }

    #[test]
    fn round_trips_untouched_documents() {
        let domain = DomainDescriptor::decode(DOMAIN_XML.as_bytes()).unwrap();
        let encoded = domain.encode().unwrap();
        assert_eq!(String::from_utf8(encoded).unwrap(), DOMAIN_XML);
    }

    #[test]
    fn rewrites_only_the_target_device() {
        let mut domain = DomainDescriptor::decode(DOMAIN_XML.as_bytes()).unwrap();
        domain.interfaces_mut()[0].set_target_device("tap0");
        domain.interfaces_mut()[1].set_target_device("tap16477688c0e");
        domain.interfaces_mut()[3].set_target_device("ignored");

        let encoded = String::from_utf8(domain.encode().unwrap()).unwrap();
        let expected = DOMAIN_XML
            .replace(
                r#"<target dev="vnet0" managed="no">"#,
                r#"<target dev="tap0" managed="no">"#,
            )
            .replace("<target dev='vnet1'/>", r#"<target dev="tap16477688c0e"/>"#);
        assert_eq!(encoded, expected);
        assert!(!encoded.contains("ignored"));

        let decoded = DomainDescriptor::decode(encoded.as_bytes()).unwrap();
        assert_eq!(decoded.interfaces()[0].target_device(), Some("tap0"));
        assert_eq!(decoded.interfaces()[1].target_device(), Some("tap16477688c0e"));
        assert_eq!(decoded.interfaces()[2].target_device(), Some("vnet2"));
        assert_eq!(decoded.interfaces()[3].target_device(), None);
    }

    #[test]
    fn escapes_rewritten_names() {
        let mut domain =
            DomainDescriptor::decode(br#"<domain><devices><interface><target dev="a"/></interface></devices></domain>"#)
                .unwrap();
        domain.interfaces_mut()[0].set_target_device("a&b");

        let encoded = String::from_utf8(domain.encode().unwrap()).unwrap();
        assert_eq!(
            encoded,
            r#"<domain><devices><interface><target dev="a&amp;b"/></interface></devices></domain>"#
        );
        let decoded = DomainDescriptor::decode(encoded.as_bytes()).unwrap();
        assert_eq!(decoded.interfaces()[0].target_device(), Some("a&b"));
    }

    #[test]
    fn ignores_interfaces_outside_devices() {
        let domain = DomainDescriptor::decode(
            br#"<domain><interface><mac address="52:54:00:00:00:01"/><target dev="x"/></interface><devices/></domain>"#,
        )
        .unwrap();
        assert!(domain.interfaces().is_empty());
    }

    #[test]
    fn domain_without_interfaces() {
        let xml = r#"<?xml version="1.0"?>
<domain type="kvm"><name>empty</name><devices></devices></domain>"#;
        let domain = DomainDescriptor::decode(xml.as_bytes()).unwrap();
        assert!(domain.interfaces().is_empty());
        assert_eq!(String::from_utf8(domain.encode().unwrap()).unwrap(), xml);
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(matches!(
            DomainDescriptor::decode(b""),
            Err(Error::MissingRoot)
        ));
        assert!(matches!(
            DomainDescriptor::decode(b"not xml at all"),
            Err(Error::MissingRoot)
        ));
        assert!(matches!(
            DomainDescriptor::decode(b"<network><name>x</name></network>"),
            Err(Error::UnexpectedRoot(name)) if name == "network"
        ));
        assert!(matches!(
            DomainDescriptor::decode(b"<domain><devices></domain>"),
            Err(Error::Parse { .. })
        ));
        assert!(matches!(
            DomainDescriptor::decode(b"<domain><devices>"),
            Err(Error::Unterminated(name)) if name == "devices"
        ));
        assert!(matches!(
            DomainDescriptor::decode(br#"<domain><devices><interface><mac address="x/></interface></devices></domain>"#),
            Err(Error::Parse { .. })
        ));
    }
}
