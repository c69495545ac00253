use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{DEFAULT_PORT, NAMESPACE_EPP, NAMESPACE_XSI};

/// Configuration for one EPP server endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server hostname
    pub host: String,
    /// Server port
    pub port: u16,
    /// I/O timeout applied to connect, read and write
    #[serde(serialize_with = "super::serde::serialize_duration")]
    #[serde(deserialize_with = "super::serde::deserialize_duration")]
    pub timeout: Duration,
    /// TLS client settings
    pub tls: TlsOptions,
}

impl ClientConfig {
    /// Creates a configuration with default port and timeout
    pub fn new(host: impl Into<String>, tls: TlsOptions) -> Self {
        ClientConfig {
            host: host.into(),
            port: DEFAULT_PORT,
            timeout: Duration::from_secs(30),
            tls,
        }
    }
}

/// TLS settings for the mutually-authenticated connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TlsOptions {
    /// Path to the client certificate chain (PEM)
    pub cert_file: PathBuf,
    /// Path to the client private key (PEM)
    pub key_file: PathBuf,
    /// Path to a CA bundle (PEM); built-in web anchors are used when absent
    pub ca_file: Option<PathBuf>,
    /// Whether the server certificate and hostname are verified
    pub verify_server: bool,
}

impl TlsOptions {
    /// Creates TLS options with server verification enabled
    pub fn new(cert_file: impl Into<PathBuf>, key_file: impl Into<PathBuf>) -> Self {
        TlsOptions {
            cert_file: cert_file.into(),
            key_file: key_file.into(),
            ca_file: None,
            verify_server: true,
        }
    }
}

/// One object or extension schema family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceSpec {
    /// Namespace URI
    pub uri: String,
    /// Value of the xsi:schemaLocation attribute on payloads of this family
    pub schema_location: String,
}

impl NamespaceSpec {
    /// Creates a namespace spec
    pub fn new(uri: impl Into<String>, schema_location: impl Into<String>) -> Self {
        NamespaceSpec {
            uri: uri.into(),
            schema_location: schema_location.into(),
        }
    }
}

/// Active namespace/schema-location table
///
/// The table is passed to the client and the model layer at construction time;
/// swapping registries means supplying a different table, never mutating a global.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceConfig {
    /// Domain object mapping
    pub domain: NamespaceSpec,
    /// Contact object mapping
    pub contact: NamespaceSpec,
    /// Nsset object mapping
    pub nsset: NamespaceSpec,
    /// Keyset object mapping
    pub keyset: NamespaceSpec,
    /// Registry extension commands (fred)
    pub fred: NamespaceSpec,
    /// ENUM validation extension
    pub enumval: NamespaceSpec,
}

impl NamespaceConfig {
    /// Returns the table for the FRED registry schema set
    pub fn fred() -> Self {
        NamespaceConfig {
            domain: NamespaceSpec::new(
                "http://www.nic.cz/xml/epp/domain-1.4",
                "http://www.nic.cz/xml/epp/domain-1.4 domain-1.4.2.xsd",
            ),
            contact: NamespaceSpec::new(
                "http://www.nic.cz/xml/epp/contact-1.6",
                "http://www.nic.cz/xml/epp/contact-1.6 contact-1.6.2.xsd",
            ),
            nsset: NamespaceSpec::new(
                "http://www.nic.cz/xml/epp/nsset-1.2",
                "http://www.nic.cz/xml/epp/nsset-1.2 nsset-1.2.2.xsd",
            ),
            keyset: NamespaceSpec::new(
                "http://www.nic.cz/xml/epp/keyset-1.3",
                "http://www.nic.cz/xml/epp/keyset-1.3 keyset-1.3.2.xsd",
            ),
            fred: NamespaceSpec::new(
                "http://www.nic.cz/xml/epp/fred-1.5",
                "http://www.nic.cz/xml/epp/fred-1.5 fred-1.5.0.xsd",
            ),
            enumval: NamespaceSpec::new(
                "http://www.nic.cz/xml/epp/enumval-1.2",
                "http://www.nic.cz/xml/epp/enumval-1.2 enumval-1.2.0.xsd",
            ),
        }
    }

    /// Object namespace URIs announced during login
    pub fn obj_uris(&self) -> Vec<String> {
        vec![
            self.contact.uri.clone(),
            self.domain.uri.clone(),
            self.nsset.uri.clone(),
            self.keyset.uri.clone(),
        ]
    }

    /// Extension namespace URIs announced during login
    pub fn ext_uris(&self) -> Vec<String> {
        vec![self.enumval.uri.clone()]
    }

    /// Preferred serializer prefix for a namespace URI
    pub fn prefix_for(&self, uri: &str) -> Option<&'static str> {
        if uri == NAMESPACE_EPP {
            Some("epp")
        } else if uri == NAMESPACE_XSI {
            Some("xsi")
        } else if uri == self.domain.uri {
            Some("domain")
        } else if uri == self.contact.uri {
            Some("contact")
        } else if uri == self.nsset.uri {
            Some("nsset")
        } else if uri == self.keyset.uri {
            Some("keyset")
        } else if uri == self.fred.uri {
            Some("fred")
        } else if uri == self.enumval.uri {
            Some("enumval")
        } else {
            None
        }
    }
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        NamespaceConfig::fred()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_defaults() {
        let tls = TlsOptions::new("/tmp/cert.pem", "/tmp/key.pem");
        let config = ClientConfig::new("epp.example.net", tls);

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.tls.verify_server);
        assert!(config.tls.ca_file.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let tls = TlsOptions::new("/tmp/cert.pem", "/tmp/key.pem");
        let original = ClientConfig::new("epp.example.net", tls);

        let serialized = serde_json::to_string(&original).unwrap();
        let deserialized: ClientConfig = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized.host, original.host);
        assert_eq!(deserialized.timeout, original.timeout);
        assert_eq!(deserialized.tls.cert_file, original.tls.cert_file);
    }

    #[test]
    fn test_namespace_prefixes() {
        let ns = NamespaceConfig::fred();

        assert_eq!(ns.prefix_for(NAMESPACE_EPP), Some("epp"));
        assert_eq!(ns.prefix_for(&ns.domain.uri), Some("domain"));
        assert_eq!(ns.prefix_for(&ns.fred.uri), Some("fred"));
        assert_eq!(ns.prefix_for("urn:example:unknown"), None);
    }

    #[test]
    fn test_login_uris() {
        let ns = NamespaceConfig::fred();

        assert_eq!(ns.obj_uris().len(), 4);
        assert!(ns.obj_uris().contains(&ns.domain.uri));
        assert_eq!(ns.ext_uris(), vec![ns.enumval.uri.clone()]);
    }
}
