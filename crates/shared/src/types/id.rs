//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `JournalId` where a
//! `PeriodId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(TenantId, "Unique identifier for a tenant.");
typed_id!(CompanyId, "Unique identifier for a company within a tenant.");
typed_id!(UserId, "Unique identifier for a user.");
typed_id!(AccountId, "Unique identifier for a chart of accounts entry.");
typed_id!(JournalId, "Unique identifier for a journal.");
typed_id!(JournalLineId, "Unique identifier for a journal line.");
typed_id!(PeriodId, "Unique identifier for a fiscal period.");
typed_id!(InvoiceId, "Unique identifier for a sales invoice.");
typed_id!(BillId, "Unique identifier for a vendor bill.");
typed_id!(PaymentId, "Unique identifier for a payment.");
typed_id!(FxRateId, "Unique identifier for an exchange rate record.");

/// Tenant + company scope every ledger row lives in.
///
/// All store operations are scoped; no query crosses tenant or company
/// boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    /// The owning tenant.
    pub tenant_id: TenantId,
    /// The company within the tenant.
    pub company_id: CompanyId,
}

impl Scope {
    /// Creates a new scope.
    #[must_use]
    pub const fn new(tenant_id: TenantId, company_id: CompanyId) -> Self {
        Self {
            tenant_id,
            company_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_typed_id_roundtrip() {
        let id = JournalId::new();
        let parsed = JournalId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_typed_id_from_uuid() {
        let uuid = Uuid::now_v7();
        let id = AccountId::from_uuid(uuid);
        assert_eq!(id.into_inner(), uuid);
    }

    #[test]
    fn test_typed_ids_are_time_ordered() {
        let a = JournalId::new();
        let b = JournalId::new();
        // UUID v7 embeds a timestamp prefix, so later IDs sort after earlier ones.
        assert!(a.0.as_bytes() <= b.0.as_bytes());
    }

    #[test]
    fn test_scope_equality() {
        let tenant = TenantId::new();
        let company = CompanyId::new();
        assert_eq!(Scope::new(tenant, company), Scope::new(tenant, company));
        assert_ne!(
            Scope::new(tenant, company),
            Scope::new(tenant, CompanyId::new())
        );
    }
}
