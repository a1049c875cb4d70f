//! Macro for implementing Display and FromStr for wire-level enums
//!
//! Several small enums travel to the backend as fixed strings (approval
//! responses, lookup fields). This macro gives them a single mapping for
//! both directions, with case-insensitive and whitespace-tolerant parsing.
//!
//! # Example
//!
//! ```rust
//! use actasti_domain::impl_wire_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Decision {
//!     Approved,
//!     Rejected,
//! }
//!
//! impl_wire_enum_conversions!(Decision {
//!     Approved => "aprobado",
//!     Rejected => "rechazado",
//! });
//!
//! assert_eq!(" APROBADO ".parse::<Decision>(), Ok(Decision::Approved));
//! ```

/// Implements Display, FromStr and `as_str` for wire-level enums
///
/// This macro generates:
/// - `as_str()`: the exact wire representation
/// - Display trait: writes the wire representation
/// - FromStr trait: trims and compares ASCII case-insensitively
#[macro_export]
macro_rules! impl_wire_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Wire representation sent to the backend
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                let candidate = s.trim();
                $(
                    if candidate.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestField {
        Serial,
        PlacaAx,
    }

    impl_wire_enum_conversions!(TestField {
        Serial => "serial",
        PlacaAx => "placaAx",
    });

    #[test]
    fn display_uses_wire_form() {
        assert_eq!(TestField::Serial.to_string(), "serial");
        assert_eq!(TestField::PlacaAx.to_string(), "placaAx");
    }

    #[test]
    fn parses_mixed_case_identifiers() {
        assert_eq!(TestField::from_str("placaax").unwrap(), TestField::PlacaAx);
        assert_eq!(TestField::from_str("PLACAAX").unwrap(), TestField::PlacaAx);
        assert_eq!(TestField::from_str(" Serial ").unwrap(), TestField::Serial);
    }

    #[test]
    fn rejects_unknown_values() {
        let result = TestField::from_str("placa");
        assert!(result.unwrap_err().contains("Invalid TestField: placa"));
        assert!(TestField::from_str("").is_err());
    }
}
