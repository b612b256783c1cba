//! Wire-level behaviour switches shared by the transport and the normaliser.
//!
//! Both settings exist for compatibility with the existing server and its
//! older clients: the defaults reproduce the historical behaviour while the
//! alternatives can be selected per invocation or per configuration file.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Strategy used to decide when a server reply has been fully received.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FramingMode {
    /// Stop reading as soon as a read returns fewer bytes than the buffer
    /// holds.
    #[default]
    ShortRead,
    /// Read until the server closes the connection.
    UntilClose,
    /// Read until the server sends a newline.
    Newline,
}

/// Rendering used when the transport fails before a reply arrives.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ErrorStyle {
    /// `{"status":"error","message":"..."}`, matching server error replies.
    #[default]
    Structured,
    /// `Error: ...`, as printed by the older clients.
    Plain,
}

/// Errors encountered while parsing wire settings from text.
pub type WireSettingParseError = strum::ParseError;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("short_read", FramingMode::ShortRead)]
    #[case("until_close", FramingMode::UntilClose)]
    #[case("NEWLINE", FramingMode::Newline)]
    fn parses_framing_modes(#[case] input: &str, #[case] expected: FramingMode) {
        assert_eq!(input.parse::<FramingMode>().expect("framing mode"), expected);
    }

    #[test]
    fn rejects_unknown_framing_mode() {
        assert!("length_prefixed".parse::<FramingMode>().is_err());
    }

    #[test]
    fn error_style_round_trips_through_display() {
        assert_eq!(ErrorStyle::Plain.to_string(), "plain");
        assert_eq!(
            "structured".parse::<ErrorStyle>().expect("error style"),
            ErrorStyle::Structured
        );
    }
}
