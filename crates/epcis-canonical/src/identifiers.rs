use crate::validation::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! newtype {
    ($name:ident, $doc:expr, $pattern:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new instance without validation; callers are responsible for conformity.
            pub fn new(value: String) -> Self {
                Self(value)
            }

            /// Parses a validated value from a string.
            pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
                let s = value.into();
                if !Regex::new($pattern).expect("invalid regex").is_match(&s) {
                    return Err(ValidationError::PatternMismatch {
                        field: stringify!($name),
                        value: s,
                    });
                }
                Ok(Self(s))
            }

            /// Re-checks a value that bypassed [`Self::parse`] (e.g. via serde).
            pub fn validate(&self) -> Result<(), ValidationError> {
                Self::parse(self.0.clone()).map(|_| ())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

newtype!(
    CbvVersion,
    "Core Business Vocabulary version token carried in hash identifiers (e.g. `CBV2.0`).",
    r"^CBV[0-9]+(\.[0-9]+){0,2}$"
);
newtype!(
    TimeZoneOffset,
    "Event time zone offset in `+hh:mm` / `-hh:mm` form.",
    r"^[+-]([01][0-9]|2[0-3]):[0-5][0-9]$"
);

impl CbvVersion {
    /// Version used when none is configured.
    pub const DEFAULT: &'static str = "CBV2.0";
}

impl Default for CbvVersion {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}
