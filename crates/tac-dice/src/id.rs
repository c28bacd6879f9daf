//! String-backed identifiers.
//!
//! Fresh identifiers are UUID v4 strings, but any string read back from a
//! snapshot is accepted as-is so older records keep their ids.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// The identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

string_id!(
    /// Identifier of a user-defined custom die.
    CustomDieId
);
string_id!(
    /// Identifier of a single face on a custom die.
    FaceId
);
string_id!(
    /// Identifier of a dice entry within a pool.
    EntryId
);
string_id!(
    /// Identifier of a dice pool.
    PoolId
);
string_id!(
    /// Identifier of a recorded roll event.
    RollEventId
);
