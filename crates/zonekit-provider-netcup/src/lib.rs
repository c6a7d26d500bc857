// # netcup DNS Provider
//
// `ZoneApi` implementation for the netcup customer control panel (CCP) JSON
// API.
//
// ## Session Model
//
// Every `ZoneApi` call opens its own session:
//
// 1. `login` with customer number, API key and API password
// 2. one or more zone actions with the returned `apisessionid`
// 3. `logout` (failures are logged and dropped)
//
// No session is cached between calls.
//
// ## Record Model
//
// netcup has no per-record TTL. Listed records carry `ttl: None` and a TTL
// on a written record is ignored with a warning. The zone-wide TTL is
// available through `NetcupProvider::zone_ttl`.
//
// MX and SRV priorities travel in a separate `priority` field on the wire and
// are joined onto `data` in the core model (`"10 mail.example.com"`).
//
// ## Security Requirements
//
// - API key and password NEVER appear in logs or `Debug` output
// - Credentials come from configuration only
//
// ## API Reference
//
// - Endpoint: POST `https://ccp.netcup.net/run/webservice/servers/endpoint.php?JSON`
// - Actions: `login`, `logout`, `infoDnsZone`, `infoDnsRecords`,
//   `updateDnsRecords`

pub mod wire;

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;
use zonekit_core::config::ProviderConfig;
use zonekit_core::traits::{ZoneApi, ZoneApiFactory};
use zonekit_core::{CancelSignal, Error, RecordId, ResourceRecord, Result};

use wire::{
    LoginData, LoginParam, RecordSet, Request, Response, SessionParam, UpdateRecordsParam,
    WireError, WireRecord, ZoneInfo, ZoneParam,
};

/// Public netcup CCP API endpoint
pub const NETCUP_API_ENDPOINT: &str =
    "https://ccp.netcup.net/run/webservice/servers/endpoint.php?JSON";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const PROVIDER: &str = "netcup";

/// Status code netcup answers `infoDnsRecords` with when a zone has no records
const NO_RECORDS_STATUS: u32 = 5029;

impl From<WireError> for Error {
    fn from(e: WireError) -> Self {
        Error::provider(PROVIDER, e.to_string())
    }
}

/// An authenticated API session
struct Session {
    id: String,
}

/// netcup DNS provider
///
/// Stateless between calls: every operation logs in, acts and logs out.
pub struct NetcupProvider {
    /// netcup customer number
    customer_number: String,

    /// API key
    /// ⚠️ NEVER log this value
    api_key: String,

    /// API password
    /// ⚠️ NEVER log this value
    api_password: String,

    /// JSON API endpoint
    endpoint: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the credentials
impl std::fmt::Debug for NetcupProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetcupProvider")
            .field("customer_number", &self.customer_number)
            .field("api_key", &"<REDACTED>")
            .field("api_password", &"<REDACTED>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl NetcupProvider {
    /// Create a provider against the public endpoint
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if any credential is empty or the HTTP client cannot
    /// be built.
    pub fn new(
        customer_number: impl Into<String>,
        api_key: impl Into<String>,
        api_password: impl Into<String>,
    ) -> Result<Self> {
        Self::with_timeout(customer_number, api_key, api_password, DEFAULT_HTTP_TIMEOUT)
    }

    fn with_timeout(
        customer_number: impl Into<String>,
        api_key: impl Into<String>,
        api_password: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let customer_number = customer_number.into();
        let api_key = api_key.into();
        let api_password = api_password.into();

        if customer_number.is_empty() || api_key.is_empty() || api_password.is_empty() {
            return Err(Error::config(
                "netcup customer number, API key and API password are required",
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            customer_number,
            api_key,
            api_password,
            endpoint: NETCUP_API_ENDPOINT.to_string(),
            client,
        })
    }

    /// Point the provider at a different endpoint (mock servers, proxies)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Build a provider from a validated [`ProviderConfig::Netcup`]
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        match config {
            ProviderConfig::Netcup {
                customer_number,
                api_key,
                api_password,
                endpoint,
                timeout_secs,
            } => {
                let provider = Self::with_timeout(
                    customer_number.clone(),
                    api_key.clone(),
                    api_password.clone(),
                    Duration::from_secs(*timeout_secs),
                )?;
                Ok(match endpoint {
                    Some(endpoint) => provider.with_endpoint(endpoint.clone()),
                    None => provider,
                })
            }
            _ => Err(Error::config("Invalid config for netcup provider")),
        }
    }

    /// The endpoint requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// TTL netcup applies to every record of `zone`
    pub async fn zone_ttl(&self, zone: &str, cancel: &CancelSignal) -> Result<Duration> {
        let domain = domain_name(zone);
        let session = self.login(cancel).await?;
        let info = self.info_zone(&session, domain, cancel).await;
        self.logout(&session).await;

        let ttl = info?.ttl;
        ttl.parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| Error::provider(PROVIDER, format!("Invalid zone TTL for {}: {:?}", domain, ttl)))
    }

    /// POST one action and decode the status envelope
    ///
    /// Transport and HTTP status failures become errors here; the envelope
    /// status is left to the caller, which knows what a failure means for
    /// its action.
    async fn call<P: Serialize + Send + Sync>(
        &self,
        action: &str,
        param: P,
        cancel: &CancelSignal,
    ) -> Result<Response> {
        tracing::debug!("netcup request: {}", action);

        let exchange = async {
            let response = self
                .client
                .post(&self.endpoint)
                .json(&Request { action, param })
                .send()
                .await
                .map_err(|e| Error::provider(PROVIDER, format!("HTTP request failed: {}", e)))?;

            if !response.status().is_success() {
                let status = response.status();
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unable to read error response".to_string());

                return Err(match status.as_u16() {
                    401 | 403 => Error::auth(format!(
                        "netcup rejected the request. Status: {}",
                        status
                    )),
                    429 => Error::provider(
                        PROVIDER,
                        format!("Rate limit exceeded. Please retry later. Status: {}", status),
                    ),
                    500..=599 => Error::provider(
                        PROVIDER,
                        format!("netcup server error (transient): {} - {}", status, error_text),
                    ),
                    _ => Error::provider(
                        PROVIDER,
                        format!("{} failed: {} - {}", action, status, error_text),
                    ),
                });
            }

            response
                .json::<Response>()
                .await
                .map_err(|e| Error::provider(PROVIDER, format!("Failed to parse response: {}", e)))
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Cancelled),
            result = exchange => {
                let response = result?;
                tracing::debug!(
                    "netcup response: {} -> {} ({})",
                    action,
                    response.status,
                    response.statuscode
                );
                Ok(response)
            }
        }
    }

    async fn login(&self, cancel: &CancelSignal) -> Result<Session> {
        let response = self
            .call(
                "login",
                LoginParam {
                    customernumber: &self.customer_number,
                    apikey: &self.api_key,
                    apipassword: &self.api_password,
                },
                cancel,
            )
            .await?;

        if !response.is_success() {
            return Err(Error::auth(response.describe()));
        }

        let data: LoginData = response
            .data()
            .map_err(|e| Error::provider(PROVIDER, format!("Invalid login response: {}", e)))?;
        Ok(Session {
            id: data.apisessionid,
        })
    }

    /// Close `session`; runs even after cancellation so sessions never leak
    async fn logout(&self, session: &Session) {
        let result = self
            .call(
                "logout",
                SessionParam {
                    customernumber: &self.customer_number,
                    apikey: &self.api_key,
                    apisessionid: &session.id,
                },
                &CancelSignal::never(),
            )
            .await;

        match result {
            Ok(response) if response.is_success() => {}
            Ok(response) => tracing::warn!("netcup logout failed: {}", response.describe()),
            Err(e) => tracing::warn!("netcup logout failed: {}", e),
        }
    }

    fn zone_param<'a>(&'a self, session: &'a Session, domain: &'a str) -> ZoneParam<'a> {
        ZoneParam {
            domainname: domain,
            customernumber: &self.customer_number,
            apikey: &self.api_key,
            apisessionid: &session.id,
        }
    }

    async fn info_zone(&self, session: &Session, domain: &str, cancel: &CancelSignal) -> Result<ZoneInfo> {
        let response = self
            .call("infoDnsZone", self.zone_param(session, domain), cancel)
            .await?;

        if !response.is_success() {
            return Err(Error::zone_not_found(format!(
                "{}: {}",
                domain,
                response.describe()
            )));
        }

        response
            .data()
            .map_err(|e| Error::provider(PROVIDER, format!("Invalid zone info: {}", e)))
    }

    async fn info_records(
        &self,
        session: &Session,
        domain: &str,
        cancel: &CancelSignal,
    ) -> Result<Vec<WireRecord>> {
        let response = self
            .call("infoDnsRecords", self.zone_param(session, domain), cancel)
            .await?;

        if !response.is_success() {
            if response.statuscode == NO_RECORDS_STATUS {
                return Ok(Vec::new());
            }
            return Err(Error::provider(
                PROVIDER,
                format!("infoDnsRecords failed for {}: {}", domain, response.describe()),
            ));
        }

        let set: RecordSet = response
            .data()
            .map_err(|e| Error::provider(PROVIDER, format!("Invalid record list: {}", e)))?;
        Ok(set.dnsrecords)
    }

    /// Submit `records` and return the zone's full record list afterwards
    async fn update_records(
        &self,
        session: &Session,
        domain: &str,
        records: Vec<WireRecord>,
        cancel: &CancelSignal,
    ) -> Result<Vec<WireRecord>> {
        let response = self
            .call(
                "updateDnsRecords",
                UpdateRecordsParam {
                    domainname: domain,
                    customernumber: &self.customer_number,
                    apikey: &self.api_key,
                    apisessionid: &session.id,
                    dnsrecordset: RecordSet {
                        dnsrecords: records,
                    },
                },
                cancel,
            )
            .await?;

        if !response.is_success() {
            return Err(Error::provider(
                PROVIDER,
                format!("updateDnsRecords failed for {}: {}", domain, response.describe()),
            ));
        }

        let set: RecordSet = response
            .data()
            .map_err(|e| Error::provider(PROVIDER, format!("Invalid update response: {}", e)))?;
        Ok(set.dnsrecords)
    }

    async fn list_in_session(
        &self,
        session: &Session,
        domain: &str,
        cancel: &CancelSignal,
    ) -> Result<Vec<ResourceRecord>> {
        self.info_zone(session, domain, cancel).await?;
        let listed = self.info_records(session, domain, cancel).await?;
        listed
            .iter()
            .map(|r| r.to_record().map_err(Error::from))
            .collect()
    }

    async fn create_in_session(
        &self,
        session: &Session,
        domain: &str,
        record: &ResourceRecord,
        cancel: &CancelSignal,
    ) -> Result<RecordId> {
        let wire = WireRecord::from_record(record, None)?;
        let before: HashSet<String> = self
            .info_records(session, domain, cancel)
            .await?
            .into_iter()
            .filter_map(|r| r.id)
            .collect();

        let after = self.update_records(session, domain, vec![wire], cancel).await?;

        after
            .iter()
            .filter(|r| r.id.as_ref().is_some_and(|id| !before.contains(id)))
            .find(|r| r.describes(record))
            .and_then(|r| r.id.clone())
            .map(RecordId::new)
            .ok_or_else(|| {
                Error::provider(
                    PROVIDER,
                    format!("Created record {} missing from update response", record),
                )
            })
    }

    /// Fetch the listed record with `id`, or fail with `RecordNotFound`
    async fn find_in_session(
        &self,
        session: &Session,
        domain: &str,
        id: &RecordId,
        cancel: &CancelSignal,
    ) -> Result<WireRecord> {
        self.info_records(session, domain, cancel)
            .await?
            .into_iter()
            .find(|r| r.id.as_deref() == Some(id.as_str()))
            .ok_or_else(|| Error::record_not_found(format!("{} in {}", id, domain)))
    }

    async fn update_in_session(
        &self,
        session: &Session,
        domain: &str,
        id: &RecordId,
        record: &ResourceRecord,
        cancel: &CancelSignal,
    ) -> Result<()> {
        let wire = WireRecord::from_record(record, Some(id))?;
        self.find_in_session(session, domain, id, cancel).await?;
        self.update_records(session, domain, vec![wire], cancel).await?;
        Ok(())
    }

    async fn delete_in_session(
        &self,
        session: &Session,
        domain: &str,
        id: &RecordId,
        cancel: &CancelSignal,
    ) -> Result<()> {
        let mut existing = self.find_in_session(session, domain, id, cancel).await?;
        existing.deleterecord = true;
        self.update_records(session, domain, vec![existing], cancel).await?;
        Ok(())
    }
}

/// netcup expects the zone without its trailing dot
fn domain_name(zone: &str) -> &str {
    zone.trim_end_matches('.')
}

fn warn_ignored_ttl(record: &ResourceRecord) {
    if let Some(ttl) = record.ttl {
        tracing::warn!(
            "netcup has no per-record TTL; ignoring ttl={}s for {}",
            ttl.as_secs(),
            record
        );
    }
}

#[async_trait]
impl ZoneApi for NetcupProvider {
    async fn list_records(&self, zone: &str, cancel: &CancelSignal) -> Result<Vec<ResourceRecord>> {
        let domain = domain_name(zone);
        tracing::debug!("Listing netcup records for {}", domain);

        let session = self.login(cancel).await?;
        let result = self.list_in_session(&session, domain, cancel).await;
        self.logout(&session).await;
        result
    }

    async fn create_record(
        &self,
        zone: &str,
        record: &ResourceRecord,
        cancel: &CancelSignal,
    ) -> Result<RecordId> {
        let domain = domain_name(zone);
        warn_ignored_ttl(record);
        tracing::info!("Creating netcup record in {}: {}", domain, record);

        let session = self.login(cancel).await?;
        let result = self.create_in_session(&session, domain, record, cancel).await;
        self.logout(&session).await;

        if let Ok(id) = &result {
            tracing::debug!("netcup assigned id {}", id);
        }
        result
    }

    async fn update_record(
        &self,
        zone: &str,
        id: &RecordId,
        record: &ResourceRecord,
        cancel: &CancelSignal,
    ) -> Result<()> {
        let domain = domain_name(zone);
        warn_ignored_ttl(record);
        tracing::info!("Updating netcup record {} in {}: {}", id, domain, record);

        let session = self.login(cancel).await?;
        let result = self
            .update_in_session(&session, domain, id, record, cancel)
            .await;
        self.logout(&session).await;
        result
    }

    async fn delete_record(&self, zone: &str, id: &RecordId, cancel: &CancelSignal) -> Result<()> {
        let domain = domain_name(zone);
        tracing::info!("Deleting netcup record {} in {}", id, domain);

        let session = self.login(cancel).await?;
        let result = self.delete_in_session(&session, domain, id, cancel).await;
        self.logout(&session).await;
        result
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

/// Factory for creating netcup providers
pub struct NetcupFactory;

impl ZoneApiFactory for NetcupFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn ZoneApi>> {
        Ok(Box::new(NetcupProvider::from_config(config)?))
    }
}

/// Register the netcup provider with a registry
///
/// # Example
///
/// ```rust
/// use zonekit_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// zonekit_provider_netcup::register(&registry);
/// assert!(registry.has_provider("netcup"));
/// ```
pub fn register(registry: &zonekit_core::ProviderRegistry) {
    registry.register_provider(PROVIDER, Box::new(NetcupFactory));
}
