//! Calendars and their colors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of account that owns a calendar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Local,
    Exchange,
    CalDav,
    MobileMe,
    Subscribed,
    Birthdays,
    #[default]
    Unknown,
}

impl AccountType {
    /// Normalizes a backend account type, case-insensitively.
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "local" => Self::Local,
            "exchange" => Self::Exchange,
            "caldav" => Self::CalDav,
            "mobileme" => Self::MobileMe,
            "subscribed" => Self::Subscribed,
            "birthdays" | "birthday" => Self::Birthdays,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Exchange => "exchange",
            Self::CalDav => "caldav",
            Self::MobileMe => "mobileme",
            Self::Subscribed => "subscribed",
            Self::Birthdays => "birthdays",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("invalid color '{0}': expected #RRGGBB")]
    Invalid(String),
}

/// A 24-bit RGB color, written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorHex(u32);

impl ColorHex {
    /// Keeps the low 24 bits of an ARGB or RGB integer.
    pub fn from_argb(argb: u32) -> Self {
        Self(argb & 0x00FF_FFFF)
    }

    pub fn rgb(&self) -> u32 {
        self.0
    }

    /// Opaque ARGB, as native stores expect when writing.
    pub fn to_argb(&self) -> u32 {
        0xFF00_0000 | self.0
    }
}

impl FromStr for ColorHex {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::Invalid(s.to_string()));
        }
        u32::from_str_radix(hex, 16)
            .map(Self)
            .map_err(|_| ColorError::Invalid(s.to_string()))
    }
}

impl fmt::Display for ColorHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

/// A calendar as seen by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calendar {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_hex: Option<String>,
    pub read_only: bool,
    pub is_primary: bool,
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        assert_eq!("#ff8800".parse::<ColorHex>().unwrap().rgb(), 0xFF8800);
        assert_eq!("00aaFF".parse::<ColorHex>().unwrap().rgb(), 0x00AAFF);
        assert_eq!(" #123456 ".parse::<ColorHex>().unwrap().rgb(), 0x123456);
    }

    #[test]
    fn rejects_bad_colors() {
        for bad in ["", "#", "#12345", "#1234567", "#GGGGGG", "red", "+12345"] {
            assert_eq!(
                bad.parse::<ColorHex>(),
                Err(ColorError::Invalid(bad.to_string())),
                "{bad}"
            );
        }
    }

    #[test]
    fn renders_upper_case() {
        assert_eq!("#abcdef".parse::<ColorHex>().unwrap().to_string(), "#ABCDEF");
        assert_eq!(ColorHex::from_argb(0x0000_000F).to_string(), "#00000F");
    }

    #[test]
    fn masks_alpha_channel() {
        let color = ColorHex::from_argb(0xFF12_3456);
        assert_eq!(color.to_string(), "#123456");
        assert_eq!(color.to_argb(), 0xFF12_3456);
    }

    #[test]
    fn account_types_normalize() {
        assert_eq!(AccountType::from_raw("LOCAL"), AccountType::Local);
        assert_eq!(AccountType::from_raw("calDAV"), AccountType::CalDav);
        assert_eq!(AccountType::from_raw("mobileMe"), AccountType::MobileMe);
        assert_eq!(AccountType::from_raw("com.google"), AccountType::Unknown);
        assert_eq!(
            serde_json::to_string(&AccountType::CalDav).unwrap(),
            "\"caldav\""
        );
    }

    #[test]
    fn calendar_wire_form() {
        let calendar = Calendar {
            id: "3".to_string(),
            name: "Work".to_string(),
            color_hex: Some("#00FF00".to_string()),
            read_only: false,
            is_primary: true,
            hidden: false,
            account_name: None,
            account_type: Some(AccountType::Exchange),
        };
        let json = serde_json::to_value(&calendar).unwrap();
        assert_eq!(json["colorHex"], "#00FF00");
        assert_eq!(json["accountType"], "exchange");
        assert!(json.get("accountName").is_none());
    }
}
