//! PII type catalog

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Categories of personally identifiable information the engine knows how to mask.
///
/// Serialized with the symbolic labels (`"EMAIL"`, `"TC_KIMLIK_NO"`, ...), which are
/// also the names used in placeholders and response envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PiiType {
    /// Email address
    Email,

    /// Phone number
    Phone,

    /// Turkish national identification number (11 digits)
    TcKimlikNo,

    /// Credit card number
    CreditCard,

    /// Social Security Number
    Ssn,

    /// Postal address
    Address,

    /// Full name
    FullName,

    /// Given name
    FirstName,

    /// Family name
    LastName,

    /// Date of birth
    DateOfBirth,

    /// IP address
    IpAddress,

    /// Bank account number / IBAN
    BankAccount,

    /// Passport number
    Passport,

    /// Driver's license number
    DriversLicense,

    /// Free text
    Text,

    /// Generic numeric value
    Numeric,
}

impl PiiType {
    /// Every PII type, in catalog order
    pub const ALL: [PiiType; 16] = [
        PiiType::Email,
        PiiType::Phone,
        PiiType::TcKimlikNo,
        PiiType::CreditCard,
        PiiType::Ssn,
        PiiType::Address,
        PiiType::FullName,
        PiiType::FirstName,
        PiiType::LastName,
        PiiType::DateOfBirth,
        PiiType::IpAddress,
        PiiType::BankAccount,
        PiiType::Passport,
        PiiType::DriversLicense,
        PiiType::Text,
        PiiType::Numeric,
    ];

    /// Symbolic label
    pub fn as_str(&self) -> &'static str {
        match self {
            PiiType::Email => "EMAIL",
            PiiType::Phone => "PHONE",
            PiiType::TcKimlikNo => "TC_KIMLIK_NO",
            PiiType::CreditCard => "CREDIT_CARD",
            PiiType::Ssn => "SSN",
            PiiType::Address => "ADDRESS",
            PiiType::FullName => "FULL_NAME",
            PiiType::FirstName => "FIRST_NAME",
            PiiType::LastName => "LAST_NAME",
            PiiType::DateOfBirth => "DATE_OF_BIRTH",
            PiiType::IpAddress => "IP_ADDRESS",
            PiiType::BankAccount => "BANK_ACCOUNT",
            PiiType::Passport => "PASSPORT",
            PiiType::DriversLicense => "DRIVERS_LICENSE",
            PiiType::Text => "TEXT",
            PiiType::Numeric => "NUMERIC",
        }
    }

    /// Whether this is one of the personal-name types
    pub fn is_name(&self) -> bool {
        matches!(
            self,
            PiiType::FullName | PiiType::FirstName | PiiType::LastName
        )
    }
}

impl fmt::Display for PiiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PiiType {
    type Err = Error;

    /// Case-insensitive; `-` and spaces are accepted in place of `_`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_label(s);
        PiiType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| Error::UnknownPiiType(s.to_string()))
    }
}

/// Normalize a user-supplied label to the canonical SCREAMING_SNAKE_CASE form
pub(crate) fn normalize_label(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}
