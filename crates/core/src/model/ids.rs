use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error type for parsing an identifier from a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

// Backend identifiers are numeric; the wrappers keep quiz, question and
// answer ids from being mixed up at call sites.
macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(u64);

        impl $name {
            #[must_use]
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the underlying u64 value
            #[must_use]
            pub fn value(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<u64>()
                    .map(Self::new)
                    .map_err(|_| ParseIdError {
                        kind: stringify!($name),
                    })
            }
        }
    };
}

numeric_id!(
    /// Identifier of a quiz as assigned by the backend
    QuizId
);
numeric_id!(
    /// Identifier of a question, unique within its quiz
    QuestionId
);
numeric_id!(
    /// Identifier of an answer option, unique within its question
    AnswerId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_id_display_and_parse() {
        let id: QuizId = "42".parse().unwrap();
        assert_eq!(id, QuizId::new(42));
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn parse_rejects_non_numeric() {
        let err = "abc".parse::<QuestionId>().unwrap_err();
        assert_eq!(err.to_string(), "failed to parse QuestionId from string");
    }

    #[test]
    fn debug_names_the_kind() {
        assert_eq!(format!("{:?}", AnswerId::new(3)), "AnswerId(3)");
    }

    #[test]
    fn ids_serialize_as_plain_numbers() {
        let json = serde_json::to_string(&QuestionId::new(9)).unwrap();
        assert_eq!(json, "9");
        let back: QuestionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, QuestionId::new(9));
    }
}
