//! Plumbing shared by the server adapters: client construction, origin
//! handling, and mapping HTTP outcomes onto `ApiError`.

use domains::{ApiError, Result};
use reqwest::header::{HeaderMap, LINK};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("rediscover/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

pub(crate) fn build_client(options: &ClientOptions) -> Result<Client> {
    Client::builder()
        .timeout(options.timeout)
        .user_agent(options.user_agent.as_str())
        .build()
        .map_err(|e| ApiError::Transport(e.to_string()))
}

pub(crate) fn parse_origin(origin: &str) -> Result<Url> {
    let url = Url::parse(origin).map_err(|e| ApiError::InvalidOrigin(format!("{origin}: {e}")))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(ApiError::InvalidOrigin(origin.to_owned())),
    }
}

/// Resolves `path` against the server origin. Absolute paths ignore any path
/// component of the origin.
pub(crate) fn endpoint(origin: &Url, path: &str) -> Result<Url> {
    origin
        .join(path)
        .map_err(|e| ApiError::InvalidOrigin(format!("{origin} + {path}: {e}")))
}

pub(crate) fn transport(endpoint: &str) -> impl FnOnce(reqwest::Error) -> ApiError + '_ {
    move |e| ApiError::Transport(format!("{endpoint}: {e}"))
}

/// Checks the status and decodes the JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ApiError::Unauthorized(format!("{endpoint} returned HTTP {}", status.as_u16())));
    }
    if !status.is_success() {
        return Err(ApiError::Status {
            endpoint: endpoint.to_owned(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await.map_err(transport(endpoint))?;
    serde_json::from_slice(&body).map_err(|e| ApiError::Decode {
        endpoint: endpoint.to_owned(),
        message: e.to_string(),
    })
}

/// The `rel="next"` target of an RFC 8288 `Link` header, if any.
pub(crate) fn next_link(headers: &HeaderMap) -> Option<Url> {
    let value = headers.get(LINK)?.to_str().ok()?;
    value.split(',').find_map(|link| {
        let (target, params) = link.split_once(';')?;
        let is_next = params.split(';').any(|param| {
            let param = param.trim();
            param == r#"rel="next""# || param == "rel=next"
        });
        if !is_next {
            return None;
        }
        let target = target.trim().strip_prefix('<')?.strip_suffix('>')?;
        Url::parse(target).ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn link_headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(LINK, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn finds_next_link_among_several() {
        let headers = link_headers(
            r#"<https://mastodon.example/api/v1/accounts/1/following?limit=80&max_id=7>; rel="next", <https://mastodon.example/api/v1/accounts/1/following?limit=80&since_id=9>; rel="prev""#,
        );
        let next = next_link(&headers).expect("next link");
        assert_eq!(next.query(), Some("limit=80&max_id=7"));
    }

    #[test]
    fn no_next_link_on_last_page() {
        let headers = link_headers(r#"<https://mastodon.example/api/v1/x?since_id=9>; rel="prev""#);
        assert!(next_link(&headers).is_none());
        assert!(next_link(&HeaderMap::new()).is_none());
    }

    #[test]
    fn origin_must_be_http() {
        assert!(parse_origin("https://misskey.example").is_ok());
        assert!(matches!(parse_origin("misskey.example"), Err(ApiError::InvalidOrigin(_))));
        assert!(matches!(parse_origin("ftp://misskey.example"), Err(ApiError::InvalidOrigin(_))));
    }

    #[test]
    fn endpoints_are_rooted_at_the_host() {
        let origin = parse_origin("https://social.example/some/path").unwrap();
        let url = endpoint(&origin, "/api/v1/accounts/verify_credentials").unwrap();
        assert_eq!(url.as_str(), "https://social.example/api/v1/accounts/verify_credentials");
    }
}
