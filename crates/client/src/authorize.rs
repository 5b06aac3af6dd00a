//! Access-check dispatch.
//!
//! A check goes to the edge authorizer when one is configured and to the
//! central service otherwise. An edge that reports `cache_not_ready` gets
//! exactly one central retry; every other failure is returned as-is.

use crate::transport::Request;
use crate::{Client, ClientConfig, Error, Result, Transport};
use serde_json::Value;
use tracing::{debug, warn};
use warrant::{AccessCheckRequest, Check, CheckMany, FeatureCheck, PermissionCheck};

const AUTHORIZE_PATH: &str = "/v2/authorize";

/// Status that means "authorized". Any other answer is a denial.
const AUTHORIZED: u16 = 200;

/// Where a check is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    /// Edge authorizer at the given base URL.
    Edge(&'a str),
    /// Central service.
    Central,
}

impl ClientConfig {
    /// Target for the first attempt of a check.
    pub fn target(&self) -> Target<'_> {
        match self.authorize_endpoint.as_deref() {
            Some(endpoint) => Target::Edge(endpoint),
            None => Target::Central,
        }
    }
}

impl<T: Transport> Client<T> {
    /// Single check.
    pub async fn check(&self, check: Check) -> Result<bool> {
        self.authorize(&check.build()?).await
    }

    /// Batch check combined with `anyOf` / `allOf`.
    pub async fn check_many(&self, check: CheckMany) -> Result<bool> {
        self.authorize(&check.build()?).await
    }

    /// Is the subject a member of the feature?
    pub async fn has_feature(&self, check: FeatureCheck) -> Result<bool> {
        self.check(check.into()).await
    }

    /// Is the subject a member of the permission?
    pub async fn has_permission(&self, check: PermissionCheck) -> Result<bool> {
        self.check(check.into()).await
    }

    /// Evaluate a canonical access-check request.
    pub async fn authorize(&self, request: &AccessCheckRequest) -> Result<bool> {
        let body = serde_json::to_value(request)?;

        match self.config.target() {
            Target::Central => self.authorize_at(Target::Central, &body).await,
            Target::Edge(endpoint) => {
                match self.authorize_at(Target::Edge(endpoint), &body).await {
                    Err(Error::CacheNotReady { message }) => {
                        warn!(%endpoint, %message, "edge authorizer not ready, checking centrally");
                        self.authorize_at(Target::Central, &body).await
                    }
                    result => result,
                }
            }
        }
    }

    async fn authorize_at(&self, target: Target<'_>, body: &Value) -> Result<bool> {
        let mut request = Request::post(AUTHORIZE_PATH, body);
        if let Target::Edge(endpoint) = target {
            request = request.with_base_url(endpoint);
        }

        let response = self.transport.send(request).await?;
        debug!(?target, status = response.status, "access check answered");
        Ok(response.status == AUTHORIZED)
    }
}
