use std::fmt;

use serde::{Deserialize, Serialize};

/// Transport a node address is reachable over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    #[default]
    Tcp,
    Unix,
}

impl AddressType {
    fn scheme(self) -> &'static str {
        match self {
            AddressType::Tcp => "tcp",
            AddressType::Unix => "unix",
        }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

/// Unresolved address a node advertises in its descriptor.
///
/// TCP addresses carry a host and port; unix addresses carry a socket path in
/// `host` and a zero port.
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Address {
    pub addr_type: AddressType,
    pub host: String,
    pub port: u16,
}

impl Address {
    pub fn tcp(host: impl Into<String>, port: u16) -> Self {
        Self {
            addr_type: AddressType::Tcp,
            host: host.into(),
            port,
        }
    }

    pub fn unix(path: impl Into<String>) -> Self {
        Self {
            addr_type: AddressType::Unix,
            host: path.into(),
            port: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.host.is_empty()
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.addr_type {
            AddressType::Tcp => write!(f, "tcp://{}:{}", self.host, self.port),
            AddressType::Unix => write!(f, "unix://{}", self.host),
        }
    }
}
