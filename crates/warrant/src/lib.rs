//! Warrant model for relationship-based access checks.
//!
//! Core principle: **every check is a list of warrant tuples.** Single,
//! batch, feature and permission checks all reduce to one
//! [`AccessCheckRequest`].

mod check;
pub mod entity;
mod error;
mod identity;
mod warrant;

pub use check::{Check, CheckMany, FeatureCheck, PermissionCheck};
pub use entity::{Feature, Permission, PricingTier, Role, Tenant, User};
pub use error::{Error, Result};
pub use identity::{AsSubject, ObjectIdentity, ObjectRef, SubjectRef};
pub use warrant::{AccessCheckRequest, CheckOp, Context, ListWarrantOptions, Query, WarrantTuple};
