//! Typed controller identifiers.
//!
//! The controller hands out every ID as an opaque string. Wrapping them keeps
//! a site ID from being passed where an element ID is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create an ID from any string-like value.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw ID.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

string_id!(
    /// Site identifier.
    SiteId
);
string_id!(
    /// Element (appliance) identifier.
    ElementId
);
string_id!(
    /// Application definition identifier.
    AppId
);
string_id!(
    /// VPN path identifier, as reported by topology links.
    PathId
);
string_id!(
    /// Identifier of an extension already stored on an element.
    ExtensionId
);

impl SiteId {
    /// ID the controller reserves for "no site" (unassigned inventory).
    pub const UNASSIGNED: &'static str = "1";

    /// Whether this is the reserved unassigned pseudo-site.
    pub fn is_unassigned(&self) -> bool {
        self.0 == Self::UNASSIGNED
    }
}
