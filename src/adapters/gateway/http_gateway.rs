//! HTTP Clinic Gateway - reqwest implementation of the ClinicGateway port.
//!
//! Talks to three services (appointments, queue, billing), each with its own
//! base URL. Every call is bounded by one timeout that covers both sending the
//! request and reading the body; there are no retries.
//!
//! # Response shapes
//!
//! The queue service wraps payloads as `{ "success": true, "data": ... }` and
//! reports failures as `{ "success": false, "error": { "message", "code" } }`.
//! The appointment and billing services answer with the bare payload and a
//! top-level `message` on failure. Both shapes are accepted from every service.
//!
//! # Example
//!
//! ```ignore
//! let config = HttpGatewayConfig::new(appointments, queue, billing)
//!     .with_timeout(Duration::from_secs(10));
//! let gateway = HttpClinicGateway::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};

use crate::domain::records::{
    Appointment, AppointmentRequest, AppointmentStatus, Bill, CheckInRequest, QueueType, Ticket,
};
use crate::ports::{AccessToken, ClinicGateway, GatewayError};

/// Connection settings for the clinic services.
#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    pub appointment_base_url: String,
    pub queue_base_url: String,
    pub billing_base_url: String,
    /// Bound on each call, from send to the last body byte.
    pub timeout: Duration,
}

impl HttpGatewayConfig {
    pub fn new(
        appointment_base_url: impl Into<String>,
        queue_base_url: impl Into<String>,
        billing_base_url: impl Into<String>,
    ) -> Self {
        Self {
            appointment_base_url: appointment_base_url.into(),
            queue_base_url: queue_base_url.into(),
            billing_base_url: billing_base_url.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// reqwest-backed clinic gateway.
pub struct HttpClinicGateway {
    config: HttpGatewayConfig,
    client: Client,
}

impl HttpClinicGateway {
    pub fn new(config: HttpGatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .build()
            .map_err(|e| GatewayError::connectivity(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn url(base: &str, path: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), path)
    }

    fn timeout_secs(&self) -> u64 {
        self.config.timeout.as_secs().max(1)
    }

    /// Sends the request and decodes the payload, bounded by the configured timeout.
    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
        token: Option<&AccessToken>,
    ) -> Result<T, GatewayError> {
        let request = match token {
            Some(token) => request.bearer_auth(token.expose()),
            None => request,
        };

        let started = Instant::now();
        let exchanged = match tokio::time::timeout(self.config.timeout, self.exchange(request)).await
        {
            Ok(result) => result,
            Err(_) => Err(GatewayError::timeout(self.timeout_secs())),
        };

        let result = exchanged
            .and_then(|(status, body)| interpret(status, &body))
            .and_then(|payload| {
                serde_json::from_value(payload).map_err(|e| {
                    GatewayError::decode(format!("Failed to parse {} response: {}", operation, e))
                })
            });

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => tracing::debug!(operation, elapsed_ms, "Gateway call succeeded"),
            Err(e) => tracing::warn!(
                operation,
                elapsed_ms,
                kind = e.kind(),
                error = %e,
                "Gateway call failed"
            ),
        }
        result
    }

    async fn exchange(&self, request: RequestBuilder) -> Result<(StatusCode, String), GatewayError> {
        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        Ok((status, body))
    }

    fn transport_error(&self, e: reqwest::Error) -> GatewayError {
        if e.is_timeout() {
            GatewayError::timeout(self.timeout_secs())
        } else if e.is_connect() {
            GatewayError::connectivity(format!("Connection failed: {}", e))
        } else {
            GatewayError::connectivity(e.to_string())
        }
    }
}

/// Turns a status and raw body into the payload or a typed failure.
fn interpret(status: StatusCode, body: &str) -> Result<Value, GatewayError> {
    let json = serde_json::from_str::<Value>(body).ok();

    if !status.is_success() {
        let (message, code) = json
            .as_ref()
            .map(error_details)
            .unwrap_or((None, None));
        let message = message.unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));

        return Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Unauthorized,
            StatusCode::NOT_FOUND => GatewayError::not_found(message),
            _ => GatewayError::rejected(status.as_u16(), message, code),
        });
    }

    let json = json.ok_or_else(|| GatewayError::decode("Response body is not JSON"))?;

    match json.get("success").and_then(Value::as_bool) {
        Some(false) => {
            let (message, code) = error_details(&json);
            Err(GatewayError::rejected(
                status.as_u16(),
                message.unwrap_or_else(|| "API request failed".to_string()),
                code,
            ))
        }
        Some(true) => Ok(json.get("data").cloned().unwrap_or(Value::Null)),
        None => Ok(json),
    }
}

/// Message and code from `{error: {message, code}}`, `{error: "..."}` or `{message}`.
fn error_details(json: &Value) -> (Option<String>, Option<String>) {
    let text = |v: Option<&Value>| v.and_then(Value::as_str).map(str::to_string);

    match json.get("error") {
        Some(error @ Value::Object(_)) => (text(error.get("message")), text(error.get("code"))),
        Some(Value::String(message)) => (Some(message.clone()), text(json.get("code"))),
        _ => (text(json.get("message")), text(json.get("code"))),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Wire types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedAppointment {
    #[serde(alias = "id")]
    appointment_id: String,
    #[serde(default)]
    status: Option<AppointmentStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AppointmentListBody {
    Bare(Vec<Appointment>),
    Wrapped { appointments: Vec<Appointment> },
}

impl AppointmentListBody {
    fn into_inner(self) -> Vec<Appointment> {
        match self {
            AppointmentListBody::Bare(list) => list,
            AppointmentListBody::Wrapped { appointments } => appointments,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueueTypeBody {
    queue_type: QueueType,
}

#[async_trait]
impl ClinicGateway for HttpClinicGateway {
    async fn create_appointment(
        &self,
        request: &AppointmentRequest,
        token: Option<&AccessToken>,
    ) -> Result<Appointment, GatewayError> {
        let url = Self::url(&self.config.appointment_base_url, "/appointment");
        let created: CreatedAppointment = self
            .execute("create_appointment", self.client.post(url).json(request), token)
            .await?;

        Ok(Appointment::from_request(
            request,
            created.appointment_id,
            created.status.unwrap_or_default(),
        ))
    }

    async fn list_appointments(
        &self,
        token: Option<&AccessToken>,
    ) -> Result<Vec<Appointment>, GatewayError> {
        let url = Self::url(&self.config.appointment_base_url, "/appointments");
        let body: AppointmentListBody = self
            .execute("list_appointments", self.client.get(url), token)
            .await?;
        Ok(body.into_inner())
    }

    async fn queue_check_in(
        &self,
        request: &CheckInRequest,
        token: Option<&AccessToken>,
    ) -> Result<Ticket, GatewayError> {
        let url = Self::url(&self.config.queue_base_url, "/queue/checkin");
        self.execute("queue_check_in", self.client.post(url).json(request), token)
            .await
    }

    async fn queue_status(
        &self,
        queue_type: QueueType,
        token: Option<&AccessToken>,
    ) -> Result<Ticket, GatewayError> {
        let url = Self::url(&self.config.queue_base_url, "/queue/status");
        let request = self
            .client
            .get(url)
            .query(&[("queueType", queue_type.code())]);
        self.execute("queue_status", request, token).await
    }

    async fn queue_reissue(
        &self,
        queue_type: QueueType,
        token: Option<&AccessToken>,
    ) -> Result<Ticket, GatewayError> {
        let url = Self::url(&self.config.queue_base_url, "/queue/reissue");
        let request = self.client.post(url).json(&QueueTypeBody { queue_type });
        self.execute("queue_reissue", request, token).await
    }

    async fn latest_bill(&self, token: Option<&AccessToken>) -> Result<Bill, GatewayError> {
        let url = Self::url(&self.config.billing_base_url, "/billing/latest");
        self.execute("latest_bill", self.client.get(url), token)
            .await
    }
}
