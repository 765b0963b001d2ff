//! NS1 REST API implementation of [`RecordStore`].

use http::header::{HeaderName, HeaderValue};
use http::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use super::{Lookup, Record, RecordStore, RecordType, StoreError, ZoneInfo};
use crate::transport::{HttpClient, HttpRequest, HttpResponse};

/// Header carrying the NS1 API key.
const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-nsone-key");

/// Message NS1 uses for a missing record.
const RECORD_MISSING: &str = "record not found";

/// Message NS1 uses for a missing zone.
const ZONE_MISSING: &str = "zone not found";

/// Record store backed by the NS1 REST API.
///
/// Records live at `zones/{zone}/{name}/{type}` below the API endpoint:
/// `GET` reads, `PUT` creates, `POST` updates and `DELETE` removes.
///
/// # Example
///
/// ```no_run
/// use ns1_ddns::store::{Ns1Store, RecordStore, RecordType};
/// use ns1_ddns::transport::ReqwestClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Ns1Store::new(ReqwestClient::new()?, "my-api-key")?;
/// let record = store.get_record("example.com", "home.example.com", RecordType::A).await;
/// println!("{record:?}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Ns1Store<H> {
    client: H,
    endpoint: Url,
    api_key: HeaderValue,
}

impl<H> Ns1Store<H> {
    /// Public NS1 API endpoint.
    pub const DEFAULT_ENDPOINT: &'static str = "https://api.nsone.net/v1/";

    /// Creates a store talking to the public NS1 endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidApiKey`] if the key is not a valid
    /// header value.
    pub fn new(client: H, api_key: &str) -> Result<Self, StoreError> {
        let mut api_key = HeaderValue::from_str(api_key).map_err(|_| StoreError::InvalidApiKey)?;
        api_key.set_sensitive(true);

        let endpoint = Url::parse(Self::DEFAULT_ENDPOINT)
            .map_err(|_| StoreError::InvalidEndpoint(Self::DEFAULT_ENDPOINT.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    /// Overrides the API endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Returns the configured API endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn url(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::InvalidEndpoint(self.endpoint.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn record_url(
        &self,
        zone: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<Url, StoreError> {
        self.url(&["zones", zone, name, record_type.as_str()])
    }
}

impl<H: HttpClient> Ns1Store<H> {
    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> Result<HttpResponse, StoreError> {
        let mut request =
            HttpRequest::new(method, url).with_header(API_KEY_HEADER, self.api_key.clone());
        if let Some(body) = body {
            request = request.with_json_body(body);
        }

        tracing::debug!("{} {}", request.method, request.url);
        Ok(self.client.request(request).await?)
    }

    /// Sends a request whose 404 answer means "absent".
    async fn lookup(
        &self,
        method: Method,
        url: Result<Url, StoreError>,
        missing: &str,
    ) -> Lookup<HttpResponse> {
        let url = match url {
            Ok(url) => url,
            Err(e) => return Lookup::Failed(e),
        };

        match self.send(method, url, None).await {
            Ok(response) if response.is_success() => Lookup::Found(response),
            Ok(response) if is_missing(&response, missing) => Lookup::NotFound,
            Ok(response) => Lookup::Failed(api_error(&response)),
            Err(e) => Lookup::Failed(e),
        }
    }

    /// Sends a record body and decodes the stored record from the reply.
    async fn write(&self, method: Method, record: &Record) -> Result<Record, StoreError> {
        let url = self.record_url(&record.zone, &record.name, record.record_type)?;
        let body = serde_json::to_vec(&WireRecord::from(record)).map_err(StoreError::Encode)?;

        let response = self.send(method, url, Some(body)).await?;
        if !response.is_success() {
            return Err(api_error(&response));
        }

        decode::<WireRecord>(&response)?.into_record()
    }
}

impl<H: HttpClient> RecordStore for Ns1Store<H> {
    async fn get_zone(&self, zone: &str) -> Lookup<ZoneInfo> {
        match self.lookup(Method::GET, self.url(&["zones", zone]), ZONE_MISSING).await {
            Lookup::Found(response) => match decode::<WireZone>(&response) {
                Ok(wire) => Lookup::Found(ZoneInfo {
                    id: wire.id,
                    zone: wire.zone,
                }),
                Err(e) => Lookup::Failed(e),
            },
            Lookup::NotFound => Lookup::NotFound,
            Lookup::Failed(e) => Lookup::Failed(e),
        }
    }

    async fn get_record(&self, zone: &str, name: &str, record_type: RecordType) -> Lookup<Record> {
        let url = self.record_url(zone, name, record_type);
        match self.lookup(Method::GET, url, RECORD_MISSING).await {
            Lookup::Found(response) => {
                match decode::<WireRecord>(&response).and_then(WireRecord::into_record) {
                    Ok(record) => Lookup::Found(record),
                    Err(e) => Lookup::Failed(e),
                }
            }
            Lookup::NotFound => Lookup::NotFound,
            Lookup::Failed(e) => Lookup::Failed(e),
        }
    }

    async fn create_record(&self, record: &Record) -> Result<Record, StoreError> {
        self.write(Method::PUT, record).await
    }

    async fn update_record(&self, record: &Record) -> Result<Record, StoreError> {
        self.write(Method::POST, record).await
    }

    async fn delete_record(&self, zone: &str, name: &str, record_type: RecordType) -> Lookup<()> {
        let url = self.record_url(zone, name, record_type);
        self.lookup(Method::DELETE, url, RECORD_MISSING)
            .await
            .map(|_| ())
    }
}

/// Error body returned by NS1.
#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

/// Zone as returned by `GET zones/{zone}`.
#[derive(Debug, Deserialize)]
struct WireZone {
    #[serde(default)]
    id: Option<String>,
    zone: String,
}

/// Record payload as exchanged with NS1.
#[derive(Debug, Serialize, Deserialize)]
struct WireRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default)]
    zone: String,
    domain: String,
    #[serde(rename = "type")]
    record_type: String,
    #[serde(default)]
    ttl: u32,
    #[serde(default)]
    answers: Vec<WireAnswer>,
}

/// One answer; its rdata fields may be strings or numbers.
#[derive(Debug, Serialize, Deserialize)]
struct WireAnswer {
    answer: Vec<serde_json::Value>,
}

impl WireAnswer {
    /// Textual form: rdata fields joined by a single space.
    fn text(&self) -> String {
        self.answer
            .iter()
            .map(|value| match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<&Record> for WireRecord {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            zone: record.zone.clone(),
            domain: record.name.clone(),
            record_type: record.record_type.as_str().to_string(),
            ttl: record.ttl,
            answers: record
                .answers
                .iter()
                .map(|answer| WireAnswer {
                    answer: vec![serde_json::Value::String(answer.clone())],
                })
                .collect(),
        }
    }
}

impl WireRecord {
    fn into_record(self) -> Result<Record, StoreError> {
        let record_type = RecordType::from_mnemonic(&self.record_type)
            .ok_or_else(|| StoreError::UnexpectedType(self.record_type.clone()))?;

        Ok(Record {
            id: self.id,
            zone: self.zone,
            name: self.domain,
            record_type,
            ttl: self.ttl,
            answers: self.answers.iter().map(WireAnswer::text).collect(),
        })
    }
}

fn decode<T: serde::de::DeserializeOwned>(response: &HttpResponse) -> Result<T, StoreError> {
    serde_json::from_slice(&response.body).map_err(StoreError::Decode)
}

/// A 404 is "absent" when NS1 says so, or when the body carries no message.
fn is_missing(response: &HttpResponse, missing: &str) -> bool {
    if response.status != StatusCode::NOT_FOUND {
        return false;
    }

    match serde_json::from_slice::<ApiMessage>(&response.body) {
        Ok(body) => body.message.eq_ignore_ascii_case(missing),
        Err(_) => true,
    }
}

fn api_error(response: &HttpResponse) -> StoreError {
    let message = serde_json::from_slice::<ApiMessage>(&response.body).map_or_else(
        |_| response.body_text().unwrap_or_default().trim().to_string(),
        |body| body.message,
    );

    StoreError::Api {
        status: response.status,
        message,
    }
}
