use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts, Query};
use axum::http::request::Parts;

use crate::config::AppConfig;
use crate::search::pagination::PageRequest;

/// Query string accepted by the search endpoints.
///
/// Values are kept as raw strings so malformed paging input is clamped to a
/// default instead of rejecting the request. When a key is repeated, the
/// first occurrence wins; `perPage` and `per_page` count as the same key.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub q: Option<String>,
    pub per_page: Option<String>,
    pub page: Option<String>,
}

impl SearchParams {
    /// Collect the known keys from decoded query pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "q" => &mut params.q,
                "perPage" | "per_page" => &mut params.per_page,
                "page" => &mut params.page,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }

    pub fn query(&self) -> &str {
        self.q.as_deref().unwrap_or_default()
    }

    pub fn page_request(&self, config: &AppConfig) -> PageRequest {
        PageRequest::clamped(
            parse_number(self.per_page.as_deref()),
            parse_number(self.page.as_deref()),
            config.default_per_page,
        )
    }
}

impl<S> FromRequestParts<S> for SearchParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // An undecodable query string reads as empty
        let pairs = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map(|Query(pairs)| pairs)
            .unwrap_or_default();

        Ok(Self::from_pairs(pairs))
    }
}

fn parse_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse().ok())
}

/// Best-effort address of the calling client.
///
/// Uses the first `X-Forwarded-For` hop when present, otherwise the peer
/// address from the connection. Never rejects a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddress(pub Option<String>);

impl<S> FromRequestParts<S> for ClientAddress
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        if forwarded.is_some() {
            return Ok(Self(forwarded));
        }

        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        Ok(Self(peer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn params(per_page: Option<&str>, page: Option<&str>) -> SearchParams {
        SearchParams {
            q: Some("hello".to_string()),
            per_page: per_page.map(str::to_string),
            page: page.map(str::to_string),
        }
    }

    #[test]
    fn test_page_request_from_params() {
        let config = AppConfig::default();

        assert_eq!(
            params(Some("5"), Some("3")).page_request(&config),
            PageRequest { per_page: 5, page: 3 }
        );
        assert_eq!(
            params(None, None).page_request(&config),
            PageRequest { per_page: 10, page: 1 }
        );
        assert_eq!(
            params(Some("abc"), Some("-2")).page_request(&config),
            PageRequest { per_page: 10, page: 1 }
        );
        assert_eq!(
            params(Some("0"), Some("0")).page_request(&config),
            PageRequest { per_page: 1, page: 1 }
        );
    }

    async fn extract(uri: &str) -> SearchParams {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        SearchParams::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_params_from_query_string() {
        let parsed = extract("/search?q=shoes&perPage=25&page=2").await;
        assert_eq!(parsed.query(), "shoes");
        assert_eq!(parsed.per_page.as_deref(), Some("25"));
        assert_eq!(parsed.page.as_deref(), Some("2"));

        let parsed = extract("/search?per_page=7&page=x").await;
        assert_eq!(
            parsed.page_request(&AppConfig::default()),
            PageRequest { per_page: 7, page: 1 }
        );
    }

    #[tokio::test]
    async fn test_repeated_keys_keep_first_value() {
        let parsed = extract("/search?q=a&perPage=5&per_page=7").await;
        assert_eq!(parsed.query(), "a");
        assert_eq!(
            parsed.page_request(&AppConfig::default()),
            PageRequest { per_page: 5, page: 1 }
        );

        let parsed = extract("/search?q=a&q=b&page=1&page=2&unknown=x").await;
        assert_eq!(parsed.query(), "a");
        assert_eq!(parsed.page.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_large_per_page_is_kept() {
        let parsed = extract("/search/logs?perPage=150").await;
        assert_eq!(
            parsed.page_request(&AppConfig::default()),
            PageRequest { per_page: 150, page: 1 }
        );
    }

    #[test]
    fn test_missing_query_is_empty() {
        assert_eq!(SearchParams::default().query(), "");
    }

    #[tokio::test]
    async fn test_client_address_prefers_forwarded_header() {
        let request = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();
        parts
            .extensions
            .insert(ConnectInfo(SocketAddr::from(([10, 0, 0, 2], 4000))));

        let ClientAddress(addr) = ClientAddress::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(addr.as_deref(), Some("203.0.113.7"));
    }

    #[tokio::test]
    async fn test_client_address_falls_back_to_peer() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        parts
            .extensions
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 1], 4000))));

        let ClientAddress(addr) = ClientAddress::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(addr.as_deref(), Some("192.0.2.1"));

        let (mut bare, _) = Request::builder().body(()).unwrap().into_parts();
        let ClientAddress(addr) = ClientAddress::from_request_parts(&mut bare, &())
            .await
            .unwrap();
        assert!(addr.is_none());
    }
}
