//! Typed record keys.
//!
//! Every key is a string on disk, but each table gets its own newtype so an
//! order id can never be passed where a product id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

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
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Key of the `users` table.
    UserId
);
string_id!(
    /// Key of the `products` table.
    ProductId
);
string_id!(
    /// Key of the `orders` table, e.g. `ORD-0192F3A4B5C6`.
    OrderId
);

impl UserId {
    pub fn generate() -> Self {
        Self(format!("u_{}", Uuid::now_v7().simple()))
    }
}

impl ProductId {
    pub fn generate() -> Self {
        Self(format!("p_{}", Uuid::now_v7().simple()))
    }
}

impl OrderId {
    /// Time-ordered, so ids sort roughly by creation.
    pub fn generate() -> Self {
        let raw = Uuid::now_v7().simple().to_string().to_uppercase();
        Self(format!("ORD-{raw}"))
    }
}

/// An unguessable token identifying a guest checkout.
///
/// Handed back inside the created order; the guest needs it to list their orders.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuestToken(String);

impl GuestToken {
    /// 122 random bits from a v4 uuid.
    pub fn generate() -> Self {
        Self(format!("guest_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GuestToken {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// Tokens are bearer credentials; keep them out of logs.
impl fmt::Debug for GuestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GuestToken(..)")
    }
}

/// Who placed an order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "id")]
pub enum Buyer {
    User(UserId),
    Guest(GuestToken),
}

impl Buyer {
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Buyer::User(id) => Some(id),
            Buyer::Guest(_) => None,
        }
    }

    pub fn guest_token(&self) -> Option<&GuestToken> {
        match self {
            Buyer::Guest(token) => Some(token),
            Buyer::User(_) => None,
        }
    }
}

impl From<UserId> for Buyer {
    fn from(id: UserId) -> Self {
        Buyer::User(id)
    }
}

impl From<GuestToken> for Buyer {
    fn from(token: GuestToken) -> Self {
        Buyer::Guest(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_ids_are_prefixed_and_unique() {
        let a = OrderId::generate();
        let b = OrderId::generate();
        assert!(a.as_str().starts_with("ORD-"));
        assert_ne!(a, b);
    }

    #[test]
    fn guest_tokens_do_not_leak_through_debug() {
        let token = GuestToken::generate();
        assert_eq!(format!("{token:?}"), "GuestToken(..)");
        assert!(token.as_str().starts_with("guest_"));
    }

    #[test]
    fn buyer_serializes_with_its_kind() {
        let buyer = Buyer::User(UserId::from("u1"));
        let json = serde_json::to_value(&buyer).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "user", "id": "u1"}));
    }
}
