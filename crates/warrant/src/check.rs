//! Check request builders.
//!
//! Every public check shape reduces to one [`AccessCheckRequest`]:
//!
//! - [`Check`]: one object, relation and subject.
//! - [`CheckMany`]: an ordered batch combined with [`CheckOp`].
//! - [`FeatureCheck`]: `member` of a feature.
//! - [`PermissionCheck`]: `member` of a permission.

use crate::entity::{MEMBER, object_type};
use crate::{
    AccessCheckRequest, AsSubject, CheckOp, Context, ObjectIdentity, ObjectRef, Result,
    SubjectRef, WarrantTuple,
};

/// Read-consistency and tracing flags shared by all check shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Flags {
    consistent_read: Option<bool>,
    debug: Option<bool>,
}

/// A single-warrant check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    warrant: WarrantTuple,
    flags: Flags,
}

impl Check {
    /// Does `subject` have `relation` on `object`?
    pub fn new<O, S>(object: &O, relation: impl Into<String>, subject: &S) -> Self
    where
        O: ObjectIdentity + ?Sized,
        S: AsSubject + ?Sized,
    {
        Self {
            warrant: WarrantTuple::new(object, relation, subject),
            flags: Flags::default(),
        }
    }

    /// Attributes for conditional relations.
    pub fn context(mut self, context: Context) -> Self {
        self.warrant = self.warrant.with_context(context);
        self
    }

    /// Ask the evaluator to skip any cached snapshot.
    pub fn consistent_read(mut self, consistent_read: bool) -> Self {
        self.flags.consistent_read = Some(consistent_read);
        self
    }

    /// Ask the evaluator to return a decision trace.
    pub fn debug(mut self, debug: bool) -> Self {
        self.flags.debug = Some(debug);
        self
    }

    /// The warrant being checked.
    pub fn warrant(&self) -> &WarrantTuple {
        &self.warrant
    }

    /// Build the canonical request. Single checks never carry an operator.
    pub fn build(self) -> Result<AccessCheckRequest> {
        self.warrant.validate()?;
        Ok(AccessCheckRequest {
            op: None,
            warrants: vec![self.warrant],
            consistent_read: self.flags.consistent_read,
            debug: self.flags.debug,
        })
    }
}

/// A batch check. Warrant order is preserved on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckMany {
    op: CheckOp,
    warrants: Vec<WarrantTuple>,
    flags: Flags,
}

impl CheckMany {
    pub fn new(op: CheckOp) -> Self {
        Self {
            op,
            warrants: Vec::new(),
            flags: Flags::default(),
        }
    }

    /// Batch that holds when any warrant holds.
    pub fn any_of() -> Self {
        Self::new(CheckOp::AnyOf)
    }

    /// Batch that holds only when every warrant holds.
    pub fn all_of() -> Self {
        Self::new(CheckOp::AllOf)
    }

    /// Append one warrant to the batch.
    pub fn warrant<O, S>(self, object: &O, relation: impl Into<String>, subject: &S) -> Self
    where
        O: ObjectIdentity + ?Sized,
        S: AsSubject + ?Sized,
    {
        self.push(WarrantTuple::new(object, relation, subject))
    }

    /// Append an already-built warrant (context included).
    pub fn push(mut self, warrant: WarrantTuple) -> Self {
        self.warrants.push(warrant);
        self
    }

    pub fn consistent_read(mut self, consistent_read: bool) -> Self {
        self.flags.consistent_read = Some(consistent_read);
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.flags.debug = Some(debug);
        self
    }

    pub fn op(&self) -> CheckOp {
        self.op
    }

    pub fn warrants(&self) -> &[WarrantTuple] {
        &self.warrants
    }

    pub fn build(self) -> Result<AccessCheckRequest> {
        let request = AccessCheckRequest {
            op: Some(self.op),
            warrants: self.warrants,
            consistent_read: self.flags.consistent_read,
            debug: self.flags.debug,
        };
        request.validate()?;
        Ok(request)
    }
}

impl<I> From<(CheckOp, I)> for CheckMany
where
    I: IntoIterator<Item = WarrantTuple>,
{
    fn from((op, warrants): (CheckOp, I)) -> Self {
        warrants.into_iter().fold(Self::new(op), Self::push)
    }
}

/// Does the subject have the feature?
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureCheck {
    pub feature_id: String,
    pub subject: SubjectRef,
    pub context: Option<Context>,
    pub consistent_read: Option<bool>,
    pub debug: Option<bool>,
}

impl FeatureCheck {
    pub fn new<S: AsSubject + ?Sized>(feature_id: impl Into<String>, subject: &S) -> Self {
        Self {
            feature_id: feature_id.into(),
            subject: subject.as_subject(),
            context: None,
            consistent_read: None,
            debug: None,
        }
    }

    pub fn context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }
}

impl From<FeatureCheck> for Check {
    fn from(check: FeatureCheck) -> Self {
        let object = ObjectRef::new(object_type::FEATURE, check.feature_id);
        membership_check(object, check.subject, check.context, check.consistent_read, check.debug)
    }
}

/// Does the subject have the permission?
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionCheck {
    pub permission_id: String,
    pub subject: SubjectRef,
    pub context: Option<Context>,
    pub consistent_read: Option<bool>,
    pub debug: Option<bool>,
}

impl PermissionCheck {
    pub fn new<S: AsSubject + ?Sized>(permission_id: impl Into<String>, subject: &S) -> Self {
        Self {
            permission_id: permission_id.into(),
            subject: subject.as_subject(),
            context: None,
            consistent_read: None,
            debug: None,
        }
    }

    pub fn context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }
}

impl From<PermissionCheck> for Check {
    fn from(check: PermissionCheck) -> Self {
        let object = ObjectRef::new(object_type::PERMISSION, check.permission_id);
        membership_check(object, check.subject, check.context, check.consistent_read, check.debug)
    }
}

fn membership_check(
    object: ObjectRef,
    subject: SubjectRef,
    context: Option<Context>,
    consistent_read: Option<bool>,
    debug: Option<bool>,
) -> Check {
    let mut check = Check::new(&object, MEMBER, &subject);
    if let Some(context) = context {
        check = check.context(context);
    }
    check.flags = Flags {
        consistent_read,
        debug,
    };
    check
}
