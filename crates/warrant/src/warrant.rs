//! Warrant tuples and the canonical access-check request.

use crate::{AsSubject, Error, ObjectIdentity, ObjectRef, Result, SubjectRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Attribute bag handed to the evaluator for conditional relation rules.
pub type Context = BTreeMap<String, String>;

/// A single relationship assertion: `subject` has `relation` on the object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarrantTuple {
    pub object_type: String,
    pub object_id: String,
    pub relation: String,
    pub subject: SubjectRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
}

impl WarrantTuple {
    pub fn new<O, S>(object: &O, relation: impl Into<String>, subject: &S) -> Self
    where
        O: ObjectIdentity + ?Sized,
        S: AsSubject + ?Sized,
    {
        Self {
            object_type: object.object_type().to_string(),
            object_id: object.object_id().to_string(),
            relation: relation.into(),
            subject: subject.as_subject(),
            context: None,
        }
    }

    /// Attach a context. An empty context is dropped.
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = (!context.is_empty()).then_some(context);
        self
    }

    pub fn object(&self) -> ObjectRef {
        ObjectRef::new(&self.object_type, &self.object_id)
    }

    /// Check that every required field is present.
    pub fn validate(&self) -> Result<()> {
        self.object().validate("warrant")?;
        if self.relation.is_empty() {
            return Err(Error::Invalid(format!(
                "warrant on {} has an empty relation",
                self.object()
            )));
        }
        self.subject.validate()
    }
}

impl fmt::Display for WarrantTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}#{}@{}",
            self.object_type, self.object_id, self.relation, self.subject
        )
    }
}

/// Parses `type:id#relation@subject_type:subject_id[#subject_relation]`.
impl FromStr for WarrantTuple {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        const EXPECTED: &str = "expected 'type:id#relation@type:id[#relation]'";

        let (object, rest) = s
            .split_once('#')
            .ok_or_else(|| Error::parse(s, EXPECTED))?;
        let (relation, subject) = rest
            .split_once('@')
            .ok_or_else(|| Error::parse(s, EXPECTED))?;
        if relation.is_empty() {
            return Err(Error::parse(s, "relation is empty"));
        }

        let object: ObjectRef = object.parse().map_err(|_| Error::parse(s, EXPECTED))?;
        let subject: SubjectRef = subject.parse().map_err(|_| Error::parse(s, EXPECTED))?;
        Ok(Self::new(&object, relation, &subject))
    }
}

/// Operator combining the warrants of a batch check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckOp {
    /// At least one warrant must hold.
    AnyOf,
    /// Every warrant must hold.
    AllOf,
}

impl fmt::Display for CheckOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AnyOf => write!(f, "anyOf"),
            Self::AllOf => write!(f, "allOf"),
        }
    }
}

impl FromStr for CheckOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "anyOf" | "any-of" | "any" => Ok(Self::AnyOf),
            "allOf" | "all-of" | "all" => Ok(Self::AllOf),
            _ => Err(Error::parse(s, "expected 'anyOf' or 'allOf'")),
        }
    }
}

/// The wire body of `POST /v2/authorize`.
///
/// `op` is only set for batch checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessCheckRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op: Option<CheckOp>,
    pub warrants: Vec<WarrantTuple>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consistent_read: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
}

impl AccessCheckRequest {
    pub fn validate(&self) -> Result<()> {
        if self.warrants.is_empty() {
            return Err(Error::Invalid("access check has no warrants".into()));
        }
        self.warrants.iter().try_for_each(WarrantTuple::validate)
    }
}

/// A warrant query in the service's query language,
/// e.g. `select role where user:u1 is member`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(pub String);

impl Query {
    pub fn new(query: impl Into<String>) -> Self {
        Self(query.into())
    }
}

/// Filters and paging for warrant listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListWarrantOptions {
    pub object_type: Option<String>,
    pub object_id: Option<String>,
    pub relation: Option<String>,
    pub user_id: Option<String>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

impl ListWarrantOptions {
    /// Query-string pairs for the options that are set.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let strings = [
            ("objectType", &self.object_type),
            ("objectId", &self.object_id),
            ("relation", &self.relation),
            ("userId", &self.user_id),
        ];
        let numbers = [("limit", self.limit), ("page", self.page)];

        strings
            .into_iter()
            .filter_map(|(key, value)| value.clone().map(|v| (key, v)))
            .chain(
                numbers
                    .into_iter()
                    .filter_map(|(key, value)| value.map(|v| (key, v.to_string()))),
            )
            .collect()
    }
}
