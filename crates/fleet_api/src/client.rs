//! The authenticated HTTP client.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Response, StatusCode};
use serde::Deserialize;

use forms::{FieldDefinition, WireValue};

use crate::error::ApiError;
use crate::models::{CarDetail, CarPage, SearchParams, TableHeader};

/// Most endpoints wrap their payload in this envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<T> {
    data_source: T,
}

/// Body of the update call.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateBody<'a> {
    #[serde(rename = "objectUUID")]
    object_uuid: &'a str,
    values: &'a [WireValue],
}

/// Typed client for the inventory service. Cheap to clone; the bearer token
/// is injected into every request as a default header.
#[derive(Debug, Clone)]
pub struct FleetClient {
    http: reqwest::Client,
    base_url: String,
}

impl FleetClient {
    /// Build a client for `base_url`, attaching `token` (with or without the
    /// `Bearer ` prefix) to every request. An empty token sends no
    /// Authorization header, which the server answers with 401s.
    pub fn new(base_url: impl Into<String>, token: &str) -> Result<Self, ApiError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::BaseUrl("empty base url".into()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if !token.is_empty() {
            let bearer = if token.starts_with("Bearer ") {
                token.to_string()
            } else {
                format!("Bearer {token}")
            };
            let mut value = HeaderValue::from_str(&bearer)
                .map_err(|_| ApiError::BaseUrl("token contains invalid header bytes".into()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        Ok(Self { http, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Display schema of the list view.
    pub async fn table_headers(&self) -> Result<Vec<TableHeader>, ApiError> {
        let resp = self.http.get(self.url("/car-define/table-headers")).send().await?;
        let env: Envelope<Vec<TableHeader>> = check(resp)?.json().await?;
        Ok(env.data_source)
    }

    /// Creation schema: field definitions without values.
    pub async fn create_headers(&self) -> Result<Vec<FieldDefinition>, ApiError> {
        let resp = self.http.get(self.url("/car-define/create-headers")).send().await?;
        let env: Envelope<Vec<FieldDefinition>> = check(resp)?.json().await?;
        Ok(env.data_source)
    }

    /// One record's detail: field definitions with current values.
    pub async fn car_detail(&self, object_uuid: &str) -> Result<CarDetail, ApiError> {
        let resp = self
            .http
            .get(self.url("/car-value"))
            .query(&[("objectUUID", object_uuid)])
            .send()
            .await?;
        let env: Envelope<CarDetail> = check(resp)?.json().await?;
        Ok(env.data_source)
    }

    /// Search, filter, sort, and paginate records.
    pub async fn list_cars(&self, params: &SearchParams) -> Result<CarPage, ApiError> {
        tracing::debug!(page = params.page, size = params.size, "listing cars");
        let resp = self
            .http
            .post(self.url("/car-value/all"))
            .json(params)
            .send()
            .await?;
        let env: Envelope<CarPage> = check(resp)?.json().await?;
        Ok(env.data_source)
    }

    /// Create a record from an encoded value list.
    pub async fn create_car(&self, values: &[WireValue]) -> Result<(), ApiError> {
        tracing::debug!(fields = values.len(), "creating car");
        let resp = self.http.post(self.url("/car-value")).json(&values).send().await?;
        check(resp)?;
        Ok(())
    }

    /// Update a record; the full field set is resubmitted every time.
    pub async fn update_car(&self, object_uuid: &str, values: &[WireValue]) -> Result<(), ApiError> {
        tracing::debug!(object_uuid, fields = values.len(), "updating car");
        let body = UpdateBody {
            object_uuid,
            values,
        };
        let resp = self.http.put(self.url("/car-value")).json(&body).send().await?;
        check(resp)?;
        Ok(())
    }

    /// Mark a record removed without destroying it.
    pub async fn soft_delete(&self, object_uuid: &str) -> Result<(), ApiError> {
        tracing::debug!(object_uuid, "soft-deleting car");
        let resp = self
            .http
            .put(self.url("/car-value/state"))
            .query(&[("objectUUID", object_uuid), ("type", "SOFT_DELETE")])
            .send()
            .await?;
        check(resp)?;
        Ok(())
    }
}

fn check(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status == StatusCode::UNAUTHORIZED {
        tracing::warn!("authentication error: token may be invalid or expired");
        return Err(ApiError::Unauthorized);
    }
    if !status.is_success() {
        tracing::error!(%status, url = %resp.url(), "request rejected");
        return Err(ApiError::Status { status });
    }
    Ok(resp)
}
