//! HTTP-based public address lookup.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use url::Url;

use super::{AddressResolver, IpFamily, ObservedAddresses, QueryEndpoints, ResolveError};
use crate::transport::{HttpClient, HttpRequest};

/// Resolves public addresses by asking "what is my IP" endpoints.
///
/// Each enabled endpoint is fetched with a GET; the response body must be
/// a bare IP literal of the matching family. IPv4 is looked up first and
/// the first failure aborts resolution.
///
/// # Example
///
/// ```no_run
/// use ns1_ddns::resolver::{AddressResolver, HttpResolver, QueryEndpoints};
/// use ns1_ddns::transport::ReqwestClient;
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let endpoints = QueryEndpoints {
///     ipv4: Some(Url::parse("https://ipv4bot.whatismyipaddress.com/")?),
///     ipv6: None,
/// };
/// let resolver = HttpResolver::new(ReqwestClient::new()?, endpoints);
/// let observed = resolver.resolve().await?;
/// println!("{observed}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HttpResolver<H> {
    client: H,
    endpoints: QueryEndpoints,
}

impl<H> HttpResolver<H> {
    /// Creates a resolver for the given endpoints.
    #[must_use]
    pub const fn new(client: H, endpoints: QueryEndpoints) -> Self {
        Self { client, endpoints }
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn client(&self) -> &H {
        &self.client
    }

    /// Returns the configured endpoints.
    #[must_use]
    pub const fn endpoints(&self) -> &QueryEndpoints {
        &self.endpoints
    }
}

impl<H: HttpClient> HttpResolver<H> {
    /// Fetches the body of a lookup endpoint as trimmed text.
    async fn fetch(&self, family: IpFamily, url: &Url) -> Result<String, ResolveError> {
        let response = self
            .client
            .request(HttpRequest::get(url.clone()))
            .await
            .map_err(|source| ResolveError::Network { family, source })?;

        if !response.is_success() {
            return Err(ResolveError::Status {
                family,
                status: response.status,
            });
        }

        Ok(String::from_utf8_lossy(&response.body).trim().to_string())
    }

    async fn lookup_v4(&self) -> Result<Option<Ipv4Addr>, ResolveError> {
        let Some(url) = self.endpoints.ipv4.as_ref() else {
            return Ok(None);
        };
        let body = self.fetch(IpFamily::V4, url).await?;
        parse_ipv4(&body).map(Some)
    }

    async fn lookup_v6(&self) -> Result<Option<Ipv6Addr>, ResolveError> {
        let Some(url) = self.endpoints.ipv6.as_ref() else {
            return Ok(None);
        };
        let body = self.fetch(IpFamily::V6, url).await?;
        parse_ipv6(&body).map(Some)
    }
}

impl<H: HttpClient> AddressResolver for HttpResolver<H> {
    async fn resolve(&self) -> Result<ObservedAddresses, ResolveError> {
        let ipv4 = self.lookup_v4().await?;
        let ipv6 = self.lookup_v6().await?;
        Ok(ObservedAddresses { ipv4, ipv6 })
    }
}

/// Parses an IPv4 literal; an IPv4-mapped IPv6 literal is unwrapped.
pub(crate) fn parse_ipv4(body: &str) -> Result<Ipv4Addr, ResolveError> {
    match parse_ip(IpFamily::V4, body)? {
        IpAddr::V4(ip) => Ok(ip),
        IpAddr::V6(ip) => ip.to_ipv4_mapped().ok_or_else(|| ResolveError::AddressFormat {
            family: IpFamily::V4,
            body: body.to_string(),
            reason: "not an IPv4 address",
        }),
    }
}

/// Parses a genuine IPv6 literal; anything expressible as IPv4 is rejected.
pub(crate) fn parse_ipv6(body: &str) -> Result<Ipv6Addr, ResolveError> {
    let wrong_family = || ResolveError::AddressFormat {
        family: IpFamily::V6,
        body: body.to_string(),
        reason: "not an IPv6 address",
    };

    match parse_ip(IpFamily::V6, body)? {
        IpAddr::V6(ip) if ip.to_ipv4_mapped().is_none() => Ok(ip),
        IpAddr::V6(_) | IpAddr::V4(_) => Err(wrong_family()),
    }
}

fn parse_ip(family: IpFamily, body: &str) -> Result<IpAddr, ResolveError> {
    body.parse::<IpAddr>()
        .map_err(|_| ResolveError::AddressFormat {
            family,
            body: body.to_string(),
            reason: "not an IP address",
        })
}
