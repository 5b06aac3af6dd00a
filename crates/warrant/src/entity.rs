//! Built-in domain entities.
//!
//! These mirror the records the service keeps for tenants, users, roles,
//! permissions, features and pricing tiers. Only their identity reaches a
//! warrant; names, descriptions and timestamps stay on the entity.

use crate::{AsSubject, ObjectIdentity, SubjectRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Object types with built-in meaning.
pub mod object_type {
    pub const TENANT: &str = "tenant";
    pub const USER: &str = "user";
    pub const ROLE: &str = "role";
    pub const PERMISSION: &str = "permission";
    pub const FEATURE: &str = "feature";
    pub const PRICING_TIER: &str = "pricing-tier";
}

/// Relation used for all membership warrants (role, feature, permission).
pub const MEMBER: &str = "member";

macro_rules! entity_identity {
    ($ty:ty, $object_type:expr, $id:ident) => {
        impl ObjectIdentity for $ty {
            fn object_type(&self) -> &str {
                $object_type
            }

            fn object_id(&self) -> &str {
                &self.$id
            }
        }

        impl AsSubject for $ty {
            fn as_subject(&self) -> SubjectRef {
                SubjectRef::new($object_type, self.$id.as_str())
            }
        }
    };
}

/// A customer organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub tenant_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Tenant {
    /// Reference by id only; descriptive fields are left unset.
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            name: None,
            created_at: None,
        }
    }
}

/// An end user of the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Reference by id only; descriptive fields are left unset.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
            created_at: None,
        }
    }
}

/// A named set of permissions users can be members of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub role_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Role {
    /// Reference by id only; descriptive fields are left unset.
    pub fn new(role_id: impl Into<String>) -> Self {
        Self {
            role_id: role_id.into(),
            name: None,
            description: None,
            created_at: None,
        }
    }
}

/// A single capability granted through roles or directly to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub permission_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Permission {
    /// Reference by id only; descriptive fields are left unset.
    pub fn new(permission_id: impl Into<String>) -> Self {
        Self {
            permission_id: permission_id.into(),
            name: None,
            description: None,
            created_at: None,
        }
    }
}

/// A product feature granted to tenants, users or pricing tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub feature_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Feature {
    /// Reference by id only; descriptive fields are left unset.
    pub fn new(feature_id: impl Into<String>) -> Self {
        Self {
            feature_id: feature_id.into(),
            name: None,
            description: None,
            created_at: None,
        }
    }
}

/// A plan that bundles features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    pub pricing_tier_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl PricingTier {
    /// Reference by id only; descriptive fields are left unset.
    pub fn new(pricing_tier_id: impl Into<String>) -> Self {
        Self {
            pricing_tier_id: pricing_tier_id.into(),
            name: None,
            description: None,
            created_at: None,
        }
    }
}

entity_identity!(Tenant, object_type::TENANT, tenant_id);
entity_identity!(User, object_type::USER, user_id);
entity_identity!(Role, object_type::ROLE, role_id);
entity_identity!(Permission, object_type::PERMISSION, permission_id);
entity_identity!(Feature, object_type::FEATURE, feature_id);
entity_identity!(PricingTier, object_type::PRICING_TIER, pricing_tier_id);
