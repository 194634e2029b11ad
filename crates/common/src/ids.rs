use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[derive(Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// The "nothing selected" value used by line inputs.
            pub const UNSET: Self = Self(0);

            /// Creates an identifier from its raw database value.
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw database value.
            pub const fn as_i64(&self) -> i64 {
                self.0
            }

            /// Returns true if this is the reserved zero value.
            pub const fn is_unset(&self) -> bool {
                self.0 == 0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

record_id!(
    /// Identifier of a resource (material) record.
    ResourceId
);

record_id!(
    /// Identifier of a unit of measure record.
    UnitId
);

record_id!(
    /// Identifier of a receipt document.
    ///
    /// Assigned by the store; never zero for a persisted document.
    DocumentId
);

record_id!(
    /// Identifier of a single receipt line item.
    ItemId
);
