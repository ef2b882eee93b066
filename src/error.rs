//! Crate-level error types.

use std::fmt;

/// Errors produced by the viewkit crate.
#[derive(Debug)]
pub enum ViewError {
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// TOML animation preset parsing/serialization failure.
    PresetParse(String),
    /// A raw value did not map to any variant of an enum. This is a broken
    /// invariant on the caller's side, not a runtime condition.
    InvalidEnum {
        /// Name of the enum being decoded.
        kind: &'static str,
        /// The offending raw value.
        value: u8,
    },
    /// A non-instant transition was requested but its animation has no
    /// enabled axis.
    NoAnimationEnabled {
        /// `category/name` of the container.
        identity: String,
        /// `"show"` or `"hide"`.
        direction: &'static str,
    },
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::PresetParse(msg) => {
                write!(f, "preset parse error: {msg}")
            }
            Self::InvalidEnum { kind, value } => {
                write!(f, "invalid {kind} value: {value}")
            }
            Self::NoAnimationEnabled {
                identity,
                direction,
            } => write!(
                f,
                "view '{identity}' was asked to {direction} but no \
                 {direction} animation is enabled (enable an axis or call it \
                 with instant = true)"
            ),
        }
    }
}

impl std::error::Error for ViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ViewError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_animation_message_names_view_and_direction() {
        let err = ViewError::NoAnimationEnabled {
            identity: "General/Panel".to_owned(),
            direction: "show",
        };
        let msg = err.to_string();
        assert!(msg.contains("General/Panel"));
        assert!(msg.contains("no show animation"));
    }

    #[test]
    fn io_error_has_source() {
        let err: ViewError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
