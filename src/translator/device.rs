//! Device identifiers and WRP destination addresses.

use std::fmt;
use std::str::FromStr;

use crate::translator::error::TranslateError;

/// Length of a MAC address written without separators.
const DEVICE_ID_LEN: usize = 12;

/// A validated device identifier: 12 hex digits, any case, no separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceId(String);

impl DeviceId {
    /// Validate a raw path segment.
    pub fn parse(raw: &str) -> Result<Self, TranslateError> {
        if raw.len() == DEVICE_ID_LEN && raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Self(raw.to_owned()))
        } else {
            Err(TranslateError::InvalidDeviceId)
        }
    }
}

impl FromStr for DeviceId {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// WRP destination of the form `mac:<device>/<service>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceAddress(String);

impl DeviceAddress {
    /// Build the destination for a device's service. The service segment is
    /// used verbatim.
    pub fn new(device: &DeviceId, service: &str) -> Self {
        Self(format!("mac:{}/{}", device, service))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_twelve_hex_digits_any_case() {
        for id in ["001122334455", "AABBCCDDEEFF", "aAbBcCdDeEfF", "0123456789ab"] {
            assert!(DeviceId::parse(id).is_ok(), "{id} should be valid");
        }
    }

    #[test]
    fn rejects_everything_else() {
        for id in [
            "",
            "00112233445",
            "0011223344556",
            "00:11:22:33:44:55",
            "00-11-22-33-44",
            "00112233445g",
            " 01122334455",
            "0011223344５5",
        ] {
            assert!(
                matches!(DeviceId::parse(id), Err(TranslateError::InvalidDeviceId)),
                "{id:?} should be rejected"
            );
        }
    }

    #[test]
    fn address_copies_service_verbatim() {
        let device: DeviceId = "AABBCCDDEEFF".parse().unwrap();
        let addr = DeviceAddress::new(&device, "config");
        assert_eq!(addr.as_str(), "mac:AABBCCDDEEFF/config");

        let addr = DeviceAddress::new(&device, "ubus.call");
        assert_eq!(addr.to_string(), "mac:AABBCCDDEEFF/ubus.call");
    }
}
