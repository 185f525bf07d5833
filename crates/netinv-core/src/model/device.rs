// ── Device record domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::validate::{self, ValidationError};

/// Role of a device in the network.
///
/// Stored lowercase and hyphenated (`access-point`). Parsing goes through
/// [`Catalog::device_type`](crate::Catalog::device_type), which normalizes
/// case and separators first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DeviceType {
    Switch,
    Router,
    #[strum(to_string = "access-point", serialize = "ap")]
    AccessPoint,
    #[strum(to_string = "end-device", serialize = "endpoint", serialize = "host")]
    EndDevice,
    Server,
    Cloud,
}

/// Topological tier a device sits in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum NetworkLayer {
    #[strum(to_string = "access", serialize = "acceso")]
    Access,
    #[strum(
        to_string = "distribution",
        serialize = "distribucion",
        serialize = "distribución"
    )]
    Distribution,
    #[strum(to_string = "core", serialize = "nucleo", serialize = "núcleo")]
    Core,
}

/// Protocol or feature enabled on a device.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum NetworkService {
    #[serde(rename = "OSPF")]
    #[strum(to_string = "OSPF")]
    Ospf,
    #[serde(rename = "VLANs")]
    #[strum(to_string = "VLANs", serialize = "vlan")]
    Vlans,
    #[serde(rename = "DHCP")]
    #[strum(to_string = "DHCP")]
    Dhcp,
    #[serde(rename = "DNS")]
    #[strum(to_string = "DNS")]
    Dns,
    #[serde(rename = "NTP")]
    #[strum(to_string = "NTP")]
    Ntp,
    #[serde(rename = "SSH")]
    #[strum(to_string = "SSH")]
    Ssh,
    #[serde(rename = "SNMP")]
    #[strum(to_string = "SNMP")]
    Snmp,
    #[serde(rename = "Syslog")]
    #[strum(to_string = "Syslog")]
    Syslog,
}

/// Names of the eight record fields, used to attribute validation results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
pub enum RecordField {
    Name,
    Type,
    #[strum(to_string = "IP")]
    #[serde(rename = "IP")]
    Ip,
    Location,
    #[strum(to_string = "VLANs")]
    #[serde(rename = "VLANs")]
    Vlans,
    #[strum(to_string = "Network Services")]
    #[serde(rename = "Network Services")]
    Services,
    #[strum(to_string = "Network Layer")]
    #[serde(rename = "Network Layer")]
    Layer,
}

/// One inventoried device, exactly as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub device_type: DeviceType,
    /// Address text as entered; always parses as IPv4 or IPv6.
    #[serde(rename = "IP")]
    pub ip: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "VLANs")]
    pub vlans: String,
    #[serde(rename = "Network Services")]
    pub services: Vec<NetworkService>,
    #[serde(rename = "Network Layer")]
    pub layer: NetworkLayer,
    #[serde(rename = "Registered-At")]
    pub registered_at: DateTime<Utc>,
}

impl DeviceRecord {
    /// Case-insensitive substring match over Name, IP, Type and Location.
    ///
    /// `needle` must already be lowercased.
    pub(crate) fn matches_search(&self, needle: &str) -> bool {
        self.matches_identity(needle)
            || self.device_type.to_string().contains(needle)
            || self.location.to_lowercase().contains(needle)
    }

    /// Case-insensitive substring match over Name and IP only.
    ///
    /// `needle` must already be lowercased.
    pub(crate) fn matches_identity(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.ip.to_lowercase().contains(needle)
    }

    /// Shape checks serde cannot express: non-empty text, a parseable IP
    /// and a duplicate-free service list.
    pub(crate) fn check(&self) -> Result<(), ValidationError> {
        validate::ip_address(&self.ip)?;
        if self.name.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: RecordField::Name,
            });
        }
        if self.location.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: RecordField::Location,
            });
        }
        for (i, service) in self.services.iter().enumerate() {
            if self.services[..i].contains(service) {
                return Err(ValidationError::DuplicateService { service: *service });
            }
        }
        Ok(())
    }
}

/// A fully validated device awaiting registration.
///
/// The timestamp is assigned by the engine on create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDevice {
    pub name: String,
    pub device_type: DeviceType,
    pub ip: String,
    pub location: String,
    pub vlans: String,
    pub services: Vec<NetworkService>,
    pub layer: NetworkLayer,
}

impl NewDevice {
    pub(crate) fn into_record(self, registered_at: DateTime<Utc>) -> DeviceRecord {
        DeviceRecord {
            name: self.name,
            device_type: self.device_type,
            ip: self.ip,
            location: self.location,
            vlans: self.vlans,
            services: self.services,
            layer: self.layer,
            registered_at,
        }
    }
}

/// Field-level edit payload.
///
/// Text fields carry raw operator input: `None` or a blank string keeps the
/// current value. `services` replaces the whole list when present, so
/// `Some(vec![])` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlans: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<NetworkService>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
}

impl DeviceUpdate {
    /// True when no field carries a change.
    pub fn is_blank(&self) -> bool {
        let blank = |v: &Option<String>| v.as_deref().is_none_or(|s| s.trim().is_empty());
        blank(&self.name)
            && blank(&self.device_type)
            && blank(&self.ip)
            && blank(&self.location)
            && blank(&self.vlans)
            && blank(&self.layer)
            && self.services.is_none()
    }
}
