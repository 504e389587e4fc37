//! Newtype IDs for Shopify global identifiers.
//!
//! Shopify addresses every entity with an opaque global ID string such as
//! `gid://shopify/ProductVariant/4461`. Use the `define_gid!` macro to create
//! type-safe wrappers that prevent passing a product ID where a cart line ID
//! is expected.

/// Prefix shared by all Shopify global IDs.
pub const GID_PREFIX: &str = "gid://shopify/";

/// Macro to define a type-safe Shopify global ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`, `resource_id()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use vitrina_core::define_gid;
/// define_gid!(ProductId);
/// define_gid!(CartId);
///
/// let product_id = ProductId::new("gid://shopify/Product/1");
/// let cart_id = CartId::new("gid://shopify/Cart/abc");
///
/// assert_eq!(product_id.resource_id(), Some("1"));
/// // These are different types, so this won't compile:
/// // let _: ProductId = cart_id;
/// ```
#[macro_export]
macro_rules! define_gid {
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
            /// Create a new ID from its string form.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }

            /// The trailing resource segment of a `gid://shopify/<Type>/<id>`
            /// identifier, without any query string.
            ///
            /// Returns `None` if the ID is not a Shopify global ID.
            #[must_use]
            pub fn resource_id(&self) -> Option<&str> {
                let rest = self.0.strip_prefix($crate::types::id::GID_PREFIX)?;
                let (_, tail) = rest.split_once('/')?;
                let id = tail.split('?').next().unwrap_or(tail);
                if id.is_empty() { None } else { Some(id) }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
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

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_gid!(ProductId);
define_gid!(MerchandiseId);
define_gid!(CartId);
define_gid!(CartLineId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_id_extracts_trailing_segment() {
        let id = ProductId::new("gid://shopify/Product/7982853619955");
        assert_eq!(id.resource_id(), Some("7982853619955"));
    }

    #[test]
    fn test_resource_id_strips_query_string() {
        let id = CartId::new("gid://shopify/Cart/Z2NwLXVzLWVhc3Q?key=9f1c");
        assert_eq!(id.resource_id(), Some("Z2NwLXVzLWVhc3Q"));
    }

    #[test]
    fn test_resource_id_rejects_non_gid() {
        assert_eq!(MerchandiseId::new("4461").resource_id(), None);
        assert_eq!(MerchandiseId::new("gid://shopify/ProductVariant/").resource_id(), None);
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = CartLineId::new("gid://shopify/CartLine/1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"gid://shopify/CartLine/1\"");

        let back: CartLineId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_display_matches_inner() {
        let id = CartId::from("gid://shopify/Cart/abc");
        assert_eq!(id.to_string(), "gid://shopify/Cart/abc");
        assert_eq!(String::from(id), "gid://shopify/Cart/abc");
    }
}
