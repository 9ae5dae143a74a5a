// ── Scanner domain type ──

use serde::{Deserialize, Serialize};

use scanctl_api::elements::ScannerElement;

use super::entity::EntityInfo;
use super::entity_id::EntityId;
use super::parse::parse_int;

/// Scanner kind, keyed by the numeric wire code.
///
/// Codes outside the allow-list leave the field unset — unknown scanner
/// types from newer daemons degrade silently instead of failing the
/// parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScannerType {
    Osp,
    OpenVas,
    Cve,
    Gmp,
    GreenboneSensor,
}

impl ScannerType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(Self::Osp),
            "2" => Some(Self::OpenVas),
            "3" => Some(Self::Cve),
            "4" => Some(Self::Gmp),
            "5" => Some(Self::GreenboneSensor),
            _ => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Osp => "OSP Scanner",
            Self::OpenVas => "OpenVAS Scanner",
            Self::Cve => "CVE Scanner",
            Self::Gmp => "GMP Scanner",
            Self::GreenboneSensor => "Greenbone Sensor",
        }
    }
}

/// A scanner's reference to its client certificate credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRef {
    pub id: EntityId,
    pub name: Option<String>,
}

/// The canonical scanner type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scanner {
    pub info: EntityInfo,
    pub scanner_type: Option<ScannerType>,
    pub host: Option<String>,
    pub port: Option<u16>,
    /// CA certificate (PEM) the scanner presents, when configured.
    pub ca_pub: Option<String>,
    pub credential: Option<CredentialRef>,
}

impl Scanner {
    /// Build a scanner from a raw element. Absent input yields a fully
    /// defaulted instance.
    pub fn from_element(element: Option<ScannerElement>) -> Self {
        let Some(element) = element else {
            return Self::default();
        };

        Self {
            info: EntityInfo::from_element(&element.base),
            scanner_type: element
                .scanner_type
                .as_deref()
                .and_then(ScannerType::from_code),
            host: element.host.clone().filter(|h| !h.is_empty()),
            port: parse_int(element.port.as_deref()).and_then(|p| u16::try_from(p).ok()),
            ca_pub: element.ca_pub.clone().filter(|c| !c.is_empty()),
            credential: element.credential.as_ref().and_then(|c| {
                let id = c.id.as_deref().filter(|s| !s.is_empty())?;
                Some(CredentialRef {
                    id: EntityId::from(id),
                    name: c.name.clone(),
                })
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scanner_from(value: serde_json::Value) -> Scanner {
        let element: ScannerElement = serde_json::from_value(value).expect("scanner element");
        Scanner::from_element(Some(element))
    }

    #[test]
    fn type_codes_from_allow_list() {
        assert_eq!(ScannerType::from_code("1"), Some(ScannerType::Osp));
        assert_eq!(ScannerType::from_code("2"), Some(ScannerType::OpenVas));
        assert_eq!(ScannerType::from_code("5"), Some(ScannerType::GreenboneSensor));
        assert_eq!(ScannerType::from_code("9"), None);
        assert_eq!(ScannerType::from_code("openvas"), None);
    }

    #[test]
    fn unknown_type_leaves_field_unset() {
        let scanner = scanner_from(json!({ "_id": "s1", "type": "42" }));
        assert!(scanner.scanner_type.is_none());
    }

    #[test]
    fn full_scanner_parses() {
        let scanner = scanner_from(json!({
            "_id": "s1",
            "name": "Lab sensor",
            "type": "5",
            "host": "sensor.lab",
            "port": "9390",
            "credential": { "_id": "c1", "name": "sensor cert" },
        }));
        assert_eq!(scanner.scanner_type, Some(ScannerType::GreenboneSensor));
        assert_eq!(scanner.host.as_deref(), Some("sensor.lab"));
        assert_eq!(scanner.port, Some(9390));
        assert_eq!(
            scanner.credential.unwrap().name.as_deref(),
            Some("sensor cert")
        );
    }

    #[test]
    fn unparseable_port_is_absent() {
        let scanner = scanner_from(json!({ "_id": "s1", "port": "no-port" }));
        assert!(scanner.port.is_none());
    }
}
