//! Newtype IDs for type-safe entity references.
//!
//! Every identifier in the quote engine is opaque text: line item ids are
//! minted locally, quote ids are assigned by remote storage, and owner ids
//! come from the identity provider. Use the `define_id!` macro to create
//! wrappers that prevent accidentally mixing them.

/// Macro to define a type-safe, string-backed ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `Display`, `AsRef<str>`, `From<String>` and `From<&str>`
///
/// # Example
///
/// ```rust
/// # use cotizapro_core::define_id;
/// define_id!(InvoiceId);
/// define_id!(ClientId);
///
/// let invoice = InvoiceId::new("42");
/// let client = ClientId::new("42");
///
/// // These are different types, so this won't compile:
/// // let _: InvoiceId = client;
/// assert_eq!(invoice.as_str(), client.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying identifier text.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(LineItemId);
define_id!(QuoteId);
define_id!(OwnerId);

impl LineItemId {
    /// Mint a fresh identifier for a new line item.
    ///
    /// Identifiers are random UUIDs, so they are never reused within a
    /// session even when rows are removed and re-added.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}
