use ciborium::value::Value;

use crate::cbor::text_map;

pub const FLAG_UP: u8 = 0x01;
pub const FLAG_RFU1: u8 = 0x02;
pub const FLAG_UV: u8 = 0x04;
pub const FLAG_RFU2_MASK: u8 = 0x38;
pub const FLAG_AT: u8 = 0x40;
pub const FLAG_ED: u8 = 0x80;

/// The authenticator-data flags byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatorFlags(pub u8);

impl AuthenticatorFlags {
    pub fn user_present(self) -> bool           { self.0 & FLAG_UP != 0 }
    pub fn reserved1(self) -> bool              { self.0 & FLAG_RFU1 != 0 }
    pub fn user_verified(self) -> bool          { self.0 & FLAG_UV != 0 }
    /// Bits 3-5, shifted down to a nibble.
    pub fn reserved2(self) -> u8                { (self.0 & FLAG_RFU2_MASK) >> 3 }
    pub fn attested_credential_data(self) -> bool { self.0 & FLAG_AT != 0 }
    pub fn extension_data_included(self) -> bool  { self.0 & FLAG_ED != 0 }

    pub fn to_value(self) -> Value {
        text_map([
            ("userPresent",            Value::Bool(self.user_present())),
            ("reserved1",              Value::Bool(self.reserved1())),
            ("userVerified",           Value::Bool(self.user_verified())),
            ("reserved2",              Value::Text(format!("{:x}", self.reserved2()))),
            ("attestedCredentialData", Value::Bool(self.attested_credential_data())),
            ("extensionDataIncluded",  Value::Bool(self.extension_data_included())),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_up_and_at() {
        let f = AuthenticatorFlags(0x41);
        assert!(f.user_present());
        assert!(!f.user_verified());
        assert!(f.attested_credential_data());
        assert!(!f.extension_data_included());
        assert_eq!(f.reserved2(), 0);
    }

    #[test]
    fn test_reserved_bits() {
        let f = AuthenticatorFlags(0x3A);
        assert!(f.reserved1());
        assert_eq!(f.reserved2(), 0x7);
        assert!(!f.user_present());
    }

    #[test]
    fn test_value_keeps_reserved_nibble_as_hex() {
        let v = AuthenticatorFlags(0x28).to_value();
        let json = crate::cbor::to_json(&v);
        assert_eq!(json["reserved2"], "5");
        assert_eq!(json["userVerified"], false);
    }
}
