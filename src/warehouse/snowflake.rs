//! Snowflake warehouse client.
//!
//! Talks to the account's session endpoints over HTTPS: a login request
//! yields a session token, statements are posted to the query endpoint and
//! the session is deleted on close.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::config::ConnectionConfig;
use crate::error::{ChartError, Result};
use crate::warehouse::{ColumnInfo, QueryResult, Row, Value, WarehouseClient};

/// Client identification sent with the login request. The service reads
/// `RESULT_FORMAT_PARAMETER` only for sessions opened under this client id;
/// any other id gets Arrow row sets, which this client does not decode.
const CLIENT_APP_ID: &str = "Go";
const CLIENT_APP_VERSION: &str = "1.6.22";

/// Session parameter asking the service for JSON row sets instead of Arrow.
const RESULT_FORMAT_PARAMETER: &str = "GO_QUERY_RESULT_FORMAT";

/// Response codes for a query that is still executing when the request returns.
const QUERY_IN_PROGRESS_CODES: [&str; 2] = ["333333", "333334"];

/// Accept header value for the query endpoint.
const SNOWFLAKE_MEDIA_TYPE: &str = "application/snowflake";

/// Snowflake session client.
#[derive(Debug)]
pub struct SnowflakeClient {
    client: Client,
    base_url: Url,
    token: String,
    sequence: AtomicU64,
}

impl SnowflakeClient {
    /// Logs in and opens a session.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        config.validate()?;

        let base_url = config.base_url()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("shopsphere-charts/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ChartError::connection(format!("Failed to create HTTP client: {e}")))?;

        let login_url = endpoint(&base_url, "session/v1/login-request")?;
        let query = login_query(config);

        let request = login_request(config)?;

        debug!("Logging in to {}", base_url);
        let response = client
            .post(login_url)
            .query(&query)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ChartError::connection(describe_transport_error(&e, &base_url)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ChartError::connection(format!("Failed to read login response: {e}")))?;

        if !status.is_success() {
            return Err(ChartError::connection(http_failure("Login", status, &body)));
        }

        let token = parse_login_response(&body)?;
        info!("Opened warehouse session for {}", config.display_string());

        Ok(Self {
            client,
            base_url,
            token,
            sequence: AtomicU64::new(0),
        })
    }

    fn authorization(&self) -> String {
        format!("Snowflake Token=\"{}\"", self.token)
    }
}

#[async_trait]
impl WarehouseClient for SnowflakeClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        let start = Instant::now();
        let url = endpoint(&self.base_url, "queries/v1/query-request")?;
        let request_id = Uuid::new_v4().to_string();
        let request = QueryRequest {
            sql_text: sql,
            async_exec: false,
            sequence_id: self.sequence.fetch_add(1, Ordering::SeqCst) + 1,
            query_submission_time: epoch_millis(),
        };

        debug!("Executing query {}: {}", request_id, sql.trim());
        let response = self
            .client
            .post(url)
            .query(&[("requestId", request_id.as_str())])
            .header(ACCEPT, SNOWFLAKE_MEDIA_TYPE)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, self.authorization())
            .json(&request)
            .send()
            .await
            .map_err(|e| ChartError::query(describe_transport_error(&e, &self.base_url)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ChartError::query(format!("Failed to read query response: {e}")))?;

        if !status.is_success() {
            return Err(ChartError::query(http_failure("Query", status, &body)));
        }

        let result = parse_query_response(&body)?.with_execution_time(start.elapsed());
        debug!(
            "Query {} returned {} rows in {:?}",
            request_id, result.row_count, result.execution_time
        );
        Ok(result)
    }

    async fn close(&self) -> Result<()> {
        let url = endpoint(&self.base_url, "session")?;
        let response = self
            .client
            .post(url)
            .query(&[("delete", "true")])
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, self.authorization())
            .send()
            .await
            .map_err(|e| ChartError::connection(describe_transport_error(&e, &self.base_url)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChartError::connection(http_failure(
                "Session close",
                status,
                &body,
            )));
        }

        info!("Closed warehouse session");
        Ok(())
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    data: LoginData<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct LoginData<'a> {
    client_app_id: &'a str,
    client_app_version: &'a str,
    account_name: &'a str,
    login_name: &'a str,
    password: &'a str,
    session_parameters: HashMap<&'a str, &'a str>,
}

/// Login body for a session that returns JSON row sets.
fn login_request(config: &ConnectionConfig) -> Result<LoginRequest<'_>> {
    let account_name = config
        .account_name()
        .ok_or_else(|| ChartError::config("Account identifier is required"))?;
    Ok(LoginRequest {
        data: LoginData {
            client_app_id: CLIENT_APP_ID,
            client_app_version: CLIENT_APP_VERSION,
            account_name,
            login_name: config.user.as_deref().unwrap_or_default(),
            password: config.password.as_deref().unwrap_or_default(),
            session_parameters: HashMap::from([(RESULT_FORMAT_PARAMETER, "json")]),
        },
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    sql_text: &'a str,
    async_exec: bool,
    sequence_id: u64,
    query_submission_time: u128,
}

/// Common wrapper of every session API response.
#[derive(Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    message: Option<String>,
    code: Option<serde_json::Value>,
    data: Option<T>,
}

impl<T> Envelope<T> {
    /// Response code as text; the service sends it as a string or a number.
    fn code(&self) -> Option<String> {
        match &self.code {
            Some(serde_json::Value::String(code)) => Some(code.clone()),
            Some(serde_json::Value::Null) | None => None,
            Some(code) => Some(code.to_string()),
        }
    }

    fn failure_message(&self) -> String {
        let message = self.message.as_deref().unwrap_or("request was not successful");
        match self.code() {
            Some(code) => format!("{message} (code {code})"),
            None => message.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct LoginResponseData {
    token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponseData {
    #[serde(default)]
    rowtype: Vec<RowType>,
    #[serde(default)]
    rowset: Vec<Vec<serde_json::Value>>,
    query_result_format: Option<String>,
    #[serde(default)]
    chunks: Vec<serde_json::Value>,
    query_id: Option<String>,
}

#[derive(Deserialize)]
struct RowType {
    name: String,
    #[serde(rename = "type")]
    data_type: String,
    scale: Option<i64>,
}

/// Extracts the session token from a login response body.
pub(crate) fn parse_login_response(body: &str) -> Result<String> {
    let envelope: Envelope<LoginResponseData> = serde_json::from_str(body)
        .map_err(|e| ChartError::connection(format!("Failed to parse login response: {e}")))?;

    if !envelope.success {
        return Err(ChartError::connection(envelope.failure_message()));
    }

    envelope
        .data
        .and_then(|d| d.token)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ChartError::connection("Login response did not contain a session token"))
}

/// Decodes a JSON-format query response into a `QueryResult`.
pub(crate) fn parse_query_response(body: &str) -> Result<QueryResult> {
    let envelope: Envelope<QueryResponseData> = serde_json::from_str(body)
        .map_err(|e| ChartError::query(format!("Failed to parse query response: {e}")))?;

    if !envelope.success {
        return Err(ChartError::query(envelope.failure_message()));
    }

    if let Some(code) = envelope
        .code()
        .filter(|c| QUERY_IN_PROGRESS_CODES.contains(&c.as_str()))
    {
        let query_id = envelope
            .data
            .as_ref()
            .and_then(|d| d.query_id.as_deref())
            .unwrap_or("<unknown>");
        return Err(ChartError::query(format!(
            "Query {query_id} is still running (code {code}); it did not finish within the request timeout"
        )));
    }

    let data = envelope
        .data
        .ok_or_else(|| ChartError::query("Query response did not contain data"))?;

    if let Some(format) = &data.query_result_format {
        if !format.eq_ignore_ascii_case("json") {
            return Err(ChartError::query(format!(
                "Unsupported result format '{format}'; the session must return JSON row sets"
            )));
        }
    }

    if !data.chunks.is_empty() {
        return Err(ChartError::query(format!(
            "Result of query {} spans {} additional chunks; MART tables are expected to fit in one response",
            data.query_id.as_deref().unwrap_or("<unknown>"),
            data.chunks.len()
        )));
    }

    let columns: Vec<ColumnInfo> = data
        .rowtype
        .iter()
        .map(|t| ColumnInfo::new(&t.name, &t.data_type))
        .collect();

    let rows = data
        .rowset
        .iter()
        .map(|raw| {
            if raw.len() != data.rowtype.len() {
                return Err(ChartError::query(format!(
                    "Row has {} values but the result declares {} columns",
                    raw.len(),
                    data.rowtype.len()
                )));
            }
            Ok(raw
                .iter()
                .zip(&data.rowtype)
                .map(|(cell, column)| convert_cell(cell, column))
                .collect::<Row>())
        })
        .collect::<Result<Vec<Row>>>()?;

    Ok(QueryResult::with_data(columns, rows))
}

/// Converts one JSON cell using the column's declared type.
fn convert_cell(cell: &serde_json::Value, column: &RowType) -> Value {
    let text = match cell {
        serde_json::Value::Null => return Value::Null,
        serde_json::Value::Bool(b) => return Value::Bool(*b),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    match column.data_type.to_ascii_lowercase().as_str() {
        "fixed" if column.scale.unwrap_or(0) == 0 => match text.parse::<i64>() {
            Ok(i) => Value::Int(i),
            Err(_) => parse_float_or_text(text),
        },
        "fixed" | "real" => parse_float_or_text(text),
        "boolean" => match text.as_str() {
            "1" | "true" | "TRUE" => Value::Bool(true),
            "0" | "false" | "FALSE" => Value::Bool(false),
            _ => Value::String(text),
        },
        _ => Value::String(text),
    }
}

fn parse_float_or_text(text: String) -> Value {
    match text.parse::<f64>() {
        Ok(f) => Value::Float(f),
        Err(_) => {
            warn!("Numeric column contained non-numeric text '{}'", text);
            Value::String(text)
        }
    }
}

fn login_query(config: &ConnectionConfig) -> Vec<(&'static str, String)> {
    let mut query = vec![("request_id", Uuid::new_v4().to_string())];
    for (key, value) in [
        ("warehouse", &config.warehouse),
        ("databaseName", &config.database),
        ("schemaName", &config.schema),
        ("roleName", &config.role),
    ] {
        if let Some(value) = value {
            query.push((key, value.clone()));
        }
    }
    query
}

fn endpoint(base: &Url, path: &str) -> Result<Url> {
    base.join(path)
        .map_err(|e| ChartError::internal(format!("Invalid endpoint path '{path}': {e}")))
}

fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

fn describe_transport_error(e: &reqwest::Error, base_url: &Url) -> String {
    if e.is_timeout() {
        format!("Request to {base_url} timed out")
    } else if e.is_connect() {
        format!("Failed to connect to {base_url}. Check the account identifier and your network.")
    } else {
        format!("Request failed: {e}")
    }
}

fn http_failure(what: &str, status: StatusCode, body: &str) -> String {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return format!("{what} was rejected ({status}). Check the user name and password.");
    }

    if let Ok(envelope) = serde_json::from_str::<Envelope<serde_json::Value>>(body) {
        if envelope.message.is_some() {
            return format!("{what} failed ({status}): {}", envelope.failure_message());
        }
    }

    format!("{what} failed ({status}): {}", body.trim())
}
