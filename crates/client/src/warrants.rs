//! Warrant writes and queries against the central service.

use crate::transport::{Request, Response};
use crate::{Client, Error, Result, Transport};
use serde::de::DeserializeOwned;
use tracing::debug;
use warrant::entity::{MEMBER, object_type};
use warrant::{ListWarrantOptions, ObjectRef, Query, SubjectRef, WarrantTuple};

const WARRANTS_PATH: &str = "/v1/warrants";
const QUERY_PATH: &str = "/v1/query";

/// A `member` warrant between two built-in object types.
fn membership(
    object_type: &str,
    object_id: &str,
    subject_type: &str,
    subject_id: &str,
) -> WarrantTuple {
    WarrantTuple::new(
        &ObjectRef::new(object_type, object_id),
        MEMBER,
        &SubjectRef::new(subject_type, subject_id),
    )
}

/// Writes only accept 2xx; a 403 here is a refusal, not an answer.
fn expect_success(response: Response) -> Result<Response> {
    if (200..300).contains(&response.status) {
        return Ok(response);
    }
    Err(Error::Api {
        status: response.status,
        code: None,
        message: format!("request refused with status {}", response.status),
    })
}

fn decode<D: DeserializeOwned>(response: Response) -> Result<D> {
    serde_json::from_value(response.body).map_err(|e| Error::Decode(e.to_string()))
}

impl<T: Transport> Client<T> {
    /// Create a warrant and return it as stored.
    pub async fn create_warrant(&self, warrant: &WarrantTuple) -> Result<WarrantTuple> {
        warrant.validate()?;
        let body = serde_json::to_value(warrant)?;
        debug!(%warrant, "creating warrant");

        let response = self.transport.send(Request::post(WARRANTS_PATH, &body)).await?;
        decode(expect_success(response)?)
    }

    pub async fn delete_warrant(&self, warrant: &WarrantTuple) -> Result<()> {
        warrant.validate()?;
        let body = serde_json::to_value(warrant)?;
        debug!(%warrant, "deleting warrant");

        let response = self.transport.send(Request::delete(WARRANTS_PATH, &body)).await?;
        expect_success(response).map(|_| ())
    }

    /// Run a warrant query, e.g. `select role where user:u1 is member`.
    pub async fn query_warrants(
        &self,
        query: &Query,
        options: &ListWarrantOptions,
    ) -> Result<Vec<WarrantTuple>> {
        let mut params = vec![("q", query.0.clone())];
        params.extend(options.to_params());

        let response = self.transport.send(Request::get(QUERY_PATH, &params)).await?;
        decode(expect_success(response)?)
    }

    pub async fn assign_role_to_user(&self, user_id: &str, role_id: &str) -> Result<WarrantTuple> {
        self.create_warrant(&membership(object_type::ROLE, role_id, object_type::USER, user_id))
            .await
    }

    pub async fn remove_role_from_user(&self, user_id: &str, role_id: &str) -> Result<()> {
        self.delete_warrant(&membership(object_type::ROLE, role_id, object_type::USER, user_id))
            .await
    }

    pub async fn assign_permission_to_role(
        &self,
        role_id: &str,
        permission_id: &str,
    ) -> Result<WarrantTuple> {
        self.create_warrant(&membership(
            object_type::PERMISSION,
            permission_id,
            object_type::ROLE,
            role_id,
        ))
        .await
    }

    pub async fn remove_permission_from_role(
        &self,
        role_id: &str,
        permission_id: &str,
    ) -> Result<()> {
        self.delete_warrant(&membership(
            object_type::PERMISSION,
            permission_id,
            object_type::ROLE,
            role_id,
        ))
        .await
    }

    pub async fn assign_permission_to_user(
        &self,
        user_id: &str,
        permission_id: &str,
    ) -> Result<WarrantTuple> {
        self.create_warrant(&membership(
            object_type::PERMISSION,
            permission_id,
            object_type::USER,
            user_id,
        ))
        .await
    }

    pub async fn remove_permission_from_user(
        &self,
        user_id: &str,
        permission_id: &str,
    ) -> Result<()> {
        self.delete_warrant(&membership(
            object_type::PERMISSION,
            permission_id,
            object_type::USER,
            user_id,
        ))
        .await
    }

    pub async fn assign_feature_to_tenant(
        &self,
        tenant_id: &str,
        feature_id: &str,
    ) -> Result<WarrantTuple> {
        self.create_warrant(&membership(
            object_type::FEATURE,
            feature_id,
            object_type::TENANT,
            tenant_id,
        ))
        .await
    }

    pub async fn remove_feature_from_tenant(&self, tenant_id: &str, feature_id: &str) -> Result<()> {
        self.delete_warrant(&membership(
            object_type::FEATURE,
            feature_id,
            object_type::TENANT,
            tenant_id,
        ))
        .await
    }

    pub async fn assign_feature_to_user(
        &self,
        user_id: &str,
        feature_id: &str,
    ) -> Result<WarrantTuple> {
        self.create_warrant(&membership(
            object_type::FEATURE,
            feature_id,
            object_type::USER,
            user_id,
        ))
        .await
    }

    pub async fn remove_feature_from_user(&self, user_id: &str, feature_id: &str) -> Result<()> {
        self.delete_warrant(&membership(
            object_type::FEATURE,
            feature_id,
            object_type::USER,
            user_id,
        ))
        .await
    }

    pub async fn assign_feature_to_pricing_tier(
        &self,
        pricing_tier_id: &str,
        feature_id: &str,
    ) -> Result<WarrantTuple> {
        self.create_warrant(&membership(
            object_type::FEATURE,
            feature_id,
            object_type::PRICING_TIER,
            pricing_tier_id,
        ))
        .await
    }

    pub async fn remove_feature_from_pricing_tier(
        &self,
        pricing_tier_id: &str,
        feature_id: &str,
    ) -> Result<()> {
        self.delete_warrant(&membership(
            object_type::FEATURE,
            feature_id,
            object_type::PRICING_TIER,
            pricing_tier_id,
        ))
        .await
    }
}
