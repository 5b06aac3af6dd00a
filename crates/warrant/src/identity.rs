//! Object and subject references.
//!
//! Anything that can appear on either side of a warrant reports its identity
//! through [`ObjectIdentity`]. Subjects are produced through [`AsSubject`],
//! which keeps an explicit [`SubjectRef`] intact (relation included) and
//! adapts everything else from its identity.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Capability of reporting an object type and id.
pub trait ObjectIdentity {
    /// Object type, e.g. `document` or `role`.
    fn object_type(&self) -> &str;

    /// Id of the object within its type.
    fn object_id(&self) -> &str;

    /// Plain reference to this object.
    fn object_ref(&self) -> ObjectRef {
        ObjectRef::new(self.object_type(), self.object_id())
    }
}

/// Conversion of a check or warrant subject into its wire form.
pub trait AsSubject {
    /// The subject to place on a warrant. Converting an existing subject
    /// returns it unchanged.
    fn as_subject(&self) -> SubjectRef;
}

/// A reference to any addressable object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    pub object_type: String,
    pub object_id: String,
}

impl ObjectRef {
    /// Reference to `object_type:object_id`.
    pub fn new(object_type: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            object_id: object_id.into(),
        }
    }

    pub(crate) fn validate(&self, what: &str) -> Result<()> {
        if self.object_type.is_empty() {
            return Err(Error::Invalid(format!("{what} object type is empty")));
        }
        if self.object_id.is_empty() {
            return Err(Error::Invalid(format!("{what} object id is empty")));
        }
        Ok(())
    }
}

impl ObjectIdentity for ObjectRef {
    fn object_type(&self) -> &str {
        &self.object_type
    }

    fn object_id(&self) -> &str {
        &self.object_id
    }

    fn object_ref(&self) -> ObjectRef {
        self.clone()
    }
}

impl AsSubject for ObjectRef {
    fn as_subject(&self) -> SubjectRef {
        SubjectRef::from(self.clone())
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object_type, self.object_id)
    }
}

/// Parses `type:id`.
impl FromStr for ObjectRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some((object_type, object_id)) = s.split_once(':') else {
            return Err(Error::parse(s, "expected 'type:id'"));
        };
        if object_type.is_empty() || object_id.is_empty() {
            return Err(Error::parse(s, "type and id must be non-empty"));
        }
        Ok(Self::new(object_type, object_id))
    }
}

/// The actor side of a warrant, optionally scoped to one of its relations
/// (e.g. "member of role admin").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRef {
    pub object_type: String,
    pub object_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
}

impl SubjectRef {
    /// Subject for the object itself, with no relation.
    pub fn new(object_type: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            object_id: object_id.into(),
            relation: None,
        }
    }

    /// Subject scoped to a relation on the given object (a userset).
    pub fn with_relation(
        object_type: impl Into<String>,
        object_id: impl Into<String>,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            relation: Some(relation.into()),
            ..Self::new(object_type, object_id)
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.object_type.is_empty() {
            return Err(Error::Invalid("subject object type is empty".into()));
        }
        if self.object_id.is_empty() {
            return Err(Error::Invalid("subject object id is empty".into()));
        }
        if self.relation.as_deref() == Some("") {
            return Err(Error::Invalid("subject relation is empty".into()));
        }
        Ok(())
    }
}

impl From<ObjectRef> for SubjectRef {
    fn from(object: ObjectRef) -> Self {
        Self {
            object_type: object.object_type,
            object_id: object.object_id,
            relation: None,
        }
    }
}

impl AsSubject for SubjectRef {
    fn as_subject(&self) -> SubjectRef {
        self.clone()
    }
}

impl fmt::Display for SubjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object_type, self.object_id)?;
        if let Some(relation) = &self.relation {
            write!(f, "#{relation}")?;
        }
        Ok(())
    }
}

/// Parses `type:id` or `type:id#relation`.
impl FromStr for SubjectRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (object, relation) = match s.split_once('#') {
            Some((_, "")) => return Err(Error::parse(s, "relation after '#' is empty")),
            Some((object, relation)) => (object, Some(relation.to_string())),
            None => (s, None),
        };
        let object: ObjectRef = object
            .parse()
            .map_err(|_| Error::parse(s, "expected 'type:id[#relation]'"))?;
        Ok(Self {
            relation,
            ..object.into()
        })
    }
}
