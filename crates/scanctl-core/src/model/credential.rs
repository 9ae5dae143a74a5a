// ── Credential domain type ──

use serde::{Deserialize, Serialize};

use scanctl_api::elements::CredentialElement;

use super::entity::EntityInfo;
use super::parse::{parse_yes_no, YesNo};

/// Credential kind, keyed by the short wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CredentialType {
    UsernamePassword,
    UsernameSshKey,
    ClientCertificate,
    Snmp,
    PgpKey,
    SmimeCertificate,
    Password,
}

impl CredentialType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "up" => Some(Self::UsernamePassword),
            "usk" => Some(Self::UsernameSshKey),
            "cc" => Some(Self::ClientCertificate),
            "snmp" => Some(Self::Snmp),
            "pgp" => Some(Self::PgpKey),
            "smime" => Some(Self::SmimeCertificate),
            "pw" => Some(Self::Password),
            _ => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::UsernamePassword => "Username + Password",
            Self::UsernameSshKey => "Username + SSH Key",
            Self::ClientCertificate => "Client Certificate",
            Self::Snmp => "SNMP",
            Self::PgpKey => "PGP Encryption Key",
            Self::SmimeCertificate => "S/MIME Certificate",
            Self::Password => "Password only",
        }
    }
}

/// SNMP authentication algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthAlgorithm {
    Md5,
    Sha1,
}

impl AuthAlgorithm {
    fn from_code(code: &str) -> Option<Self> {
        match code {
            "md5" => Some(Self::Md5),
            "sha1" => Some(Self::Sha1),
            _ => None,
        }
    }
}

/// The canonical credential type. Secret material never leaves the
/// daemon; this models the metadata only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credential {
    pub info: EntityInfo,
    pub credential_type: Option<CredentialType>,
    pub login: Option<String>,
    pub auth_algorithm: Option<AuthAlgorithm>,
    pub allow_insecure: Option<YesNo>,
}

impl Credential {
    /// Build a credential from a raw element. Absent input yields a
    /// fully defaulted instance.
    pub fn from_element(element: Option<CredentialElement>) -> Self {
        let Some(element) = element else {
            return Self::default();
        };

        Self {
            info: EntityInfo::from_element(&element.base),
            credential_type: element
                .credential_type
                .as_deref()
                .and_then(CredentialType::from_code),
            login: element.login.clone().filter(|l| !l.is_empty()),
            auth_algorithm: element
                .auth_algorithm
                .as_deref()
                .and_then(AuthAlgorithm::from_code),
            allow_insecure: parse_yes_no(element.allow_insecure.as_deref()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn credential_from(value: serde_json::Value) -> Credential {
        let element: CredentialElement =
            serde_json::from_value(value).expect("credential element");
        Credential::from_element(Some(element))
    }

    #[test]
    fn type_codes_from_allow_list() {
        assert_eq!(
            CredentialType::from_code("up"),
            Some(CredentialType::UsernamePassword)
        );
        assert_eq!(
            CredentialType::from_code("usk"),
            Some(CredentialType::UsernameSshKey)
        );
        assert_eq!(CredentialType::from_code("pw"), Some(CredentialType::Password));
        assert_eq!(CredentialType::from_code("krb5"), None);
    }

    #[test]
    fn unknown_type_leaves_field_unset() {
        let credential = credential_from(json!({ "_id": "c1", "type": "krb5" }));
        assert!(credential.credential_type.is_none());
    }

    #[test]
    fn snmp_credential_parses_algorithm_and_insecure_flag() {
        let credential = credential_from(json!({
            "_id": "c1",
            "type": "snmp",
            "login": "probe",
            "auth_algorithm": "sha1",
            "allow_insecure": "1",
        }));
        assert_eq!(credential.credential_type, Some(CredentialType::Snmp));
        assert_eq!(credential.auth_algorithm, Some(AuthAlgorithm::Sha1));
        assert_eq!(credential.allow_insecure, Some(YesNo::Yes));
    }

    #[test]
    fn absent_flags_stay_absent() {
        let credential = credential_from(json!({ "_id": "c1", "type": "up" }));
        assert!(credential.allow_insecure.is_none());
        assert!(credential.auth_algorithm.is_none());
    }
}
