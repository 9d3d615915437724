//! HTTP client for the rental platform's gateway.
//!
//! # Responsibilities
//! - Exchange credentials for bearer tokens
//! - Carry `Authorization: Bearer` on every authenticated call
//! - Map non-accepted statuses to `ApiError::UnexpectedStatus` with the body text
//!
//! No call here retries; polling lives in `booking`.

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::api::types::{
    ApiError, ApiResult, Booking, BookingRequest, LoginRequest, LoginResponse, Property,
    WalletUpdate,
};
use crate::auth::BearerToken;
use crate::config::ApiConfig;
use crate::observability::metrics;

const LOGIN: &str = "login";
const UPDATE_PROFILE: &str = "update_profile";
const LIST_PROPERTIES: &str = "list_properties";
const REQUEST_BOOKING: &str = "request_booking";
const LIST_BOOKINGS: &str = "list_bookings";
const GET_BOOKING: &str = "get_booking";

/// Statuses the booking-request endpoint answers with on success.
pub const BOOKING_ACCEPTED: [u16; 3] = [200, 201, 202];

/// Client for the platform API.
#[derive(Clone)]
pub struct PlatformClient {
    http: Client,
    base_url: String,
}

impl PlatformClient {
    /// Build a client with the configured timeouts.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|source| ApiError::Transport {
                endpoint: "client",
                source,
            })?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        url::Url::parse(&base_url).map_err(|source| ApiError::Url {
            url: base_url.clone(),
            source,
        })?;

        Ok(Self { http, base_url })
    }

    /// Gateway base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchange credentials for a bearer token.
    ///
    /// Only HTTP 200 with a non-empty `token` field counts as success.
    pub async fn acquire_token(&self, email: &str, password: &str) -> ApiResult<BearerToken> {
        let req = self
            .http
            .post(self.url("/api/v1/auth/login"))
            .json(&LoginRequest { email, password });
        let resp = self.send(LOGIN, req).await?;

        let body: LoginResponse = read_json(LOGIN, resp, &[200]).await?;
        match body.token {
            Some(token) if !token.is_empty() => Ok(BearerToken::new(token)),
            _ => Err(ApiError::MissingToken),
        }
    }

    /// Attach a wallet address to the token owner's profile.
    pub async fn update_wallet(&self, token: &BearerToken, wallet_address: &str) -> ApiResult<()> {
        let req = self
            .http
            .put(self.url("/api/v1/users/me"))
            .header(AUTHORIZATION, token.header_value())
            .json(&WalletUpdate { wallet_address });
        let resp = self.send(UPDATE_PROFILE, req).await?;

        expect_status(UPDATE_PROFILE, resp, &[200]).await.map(|_| ())
    }

    /// Fetch the property listing.
    pub async fn list_properties(&self, token: &BearerToken) -> ApiResult<Vec<Property>> {
        let req = self
            .http
            .get(self.url("/api/v1/properties"))
            .header(AUTHORIZATION, token.header_value());
        let resp = self.send(LIST_PROPERTIES, req).await?;

        read_json(LIST_PROPERTIES, resp, &[200]).await
    }

    /// Submit a booking request. Returns the accepted status code.
    ///
    /// The response body is not used: the resulting booking is discovered by
    /// polling the tenant's list.
    pub async fn request_booking(
        &self,
        token: &BearerToken,
        request: &BookingRequest,
    ) -> ApiResult<u16> {
        let req = self
            .http
            .post(self.url("/api/bookings/request"))
            .header(AUTHORIZATION, token.header_value())
            .json(request);
        let resp = self.send(REQUEST_BOOKING, req).await?;

        expect_status(REQUEST_BOOKING, resp, &BOOKING_ACCEPTED).await
    }

    /// List a tenant's bookings.
    pub async fn list_bookings(
        &self,
        token: &BearerToken,
        tenant_id: &str,
    ) -> ApiResult<Vec<Booking>> {
        let req = self
            .http
            .get(self.url("/api/bookings"))
            .query(&[("tenantId", tenant_id)])
            .header(AUTHORIZATION, token.header_value());
        let resp = self.send(LIST_BOOKINGS, req).await?;

        read_json(LIST_BOOKINGS, resp, &[200]).await
    }

    /// Fetch one booking.
    pub async fn get_booking(&self, token: &BearerToken, booking_id: u64) -> ApiResult<Booking> {
        let req = self
            .http
            .get(self.url(&format!("/api/bookings/{}", booking_id)))
            .header(AUTHORIZATION, token.header_value());
        let resp = self.send(GET_BOOKING, req).await?;

        read_json(GET_BOOKING, resp, &[200]).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, endpoint: &'static str, req: RequestBuilder) -> ApiResult<Response> {
        match req.send().await {
            Ok(resp) => {
                metrics::record_api_request(endpoint, resp.status().as_u16());
                tracing::debug!(endpoint, status = resp.status().as_u16(), "API response");
                Ok(resp)
            }
            Err(source) => {
                metrics::record_api_request(endpoint, 0);
                Err(ApiError::Transport { endpoint, source })
            }
        }
    }
}

impl std::fmt::Debug for PlatformClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Check the status against `accepted`, consuming the body on rejection.
async fn expect_status(
    endpoint: &'static str,
    resp: Response,
    accepted: &[u16],
) -> ApiResult<u16> {
    let status = resp.status();
    if accepted.contains(&status.as_u16()) {
        return Ok(status.as_u16());
    }
    Err(rejected(endpoint, status, resp).await)
}

async fn read_json<T: DeserializeOwned>(
    endpoint: &'static str,
    resp: Response,
    accepted: &[u16],
) -> ApiResult<T> {
    let status = resp.status();
    if !accepted.contains(&status.as_u16()) {
        return Err(rejected(endpoint, status, resp).await);
    }

    let text = resp
        .text()
        .await
        .map_err(|source| ApiError::Transport { endpoint, source })?;
    serde_json::from_str(&text).map_err(|e| ApiError::Decode {
        endpoint,
        message: e.to_string(),
    })
}

async fn rejected(endpoint: &'static str, status: StatusCode, resp: Response) -> ApiError {
    let body = resp.text().await.unwrap_or_default();
    ApiError::UnexpectedStatus {
        endpoint,
        status: status.as_u16(),
        body,
    }
}
