//! # Mastodon adapter
//!
//! Covers the three REST calls Rediscover needs:
//! 1. `GET /api/v1/accounts/verify_credentials`
//! 2. `GET /api/v1/accounts/:id/following` (paged through `Link` headers)
//! 3. `GET /api/v1/accounts/:id/statuses`

pub(crate) mod entities;

use crate::http::{build_client, endpoint, next_link, parse_origin, read_json, transport, ClientOptions};
use async_trait::async_trait;
use domains::{Account, Post, Result, ServerApi};
use entities::{MastodonAccount, Status};
use reqwest::{Client, Response, Url};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

/// Page size for the following listing; the server maximum.
const FOLLOWING_PAGE_LIMIT: u32 = 80;

pub struct MastodonApi {
    client: Client,
    origin: Url,
    access_token: SecretString,
    me: Account,
}

impl MastodonApi {
    /// Verifies the token and remembers the authenticated account.
    pub async fn login(origin: &str, access_token: SecretString, options: &ClientOptions) -> Result<Self> {
        let origin = parse_origin(origin)?;
        let client = build_client(options)?;
        let response = Self::send(&client, &access_token, endpoint(&origin, "/api/v1/accounts/verify_credentials")?).await?;
        let me: MastodonAccount = read_json("v1/accounts/verify_credentials", response).await?;
        debug!(origin = %origin, account = %me.acct, "signed in to mastodon");

        Ok(Self {
            client,
            origin,
            access_token,
            me: me.into(),
        })
    }

    async fn send(client: &Client, access_token: &SecretString, url: Url) -> Result<Response> {
        let label = url.path().to_owned();
        client
            .get(url)
            .bearer_auth(access_token.expose_secret())
            .send()
            .await
            .map_err(transport(&label))
    }

    async fn get(&self, url: Url) -> Result<Response> {
        Self::send(&self.client, &self.access_token, url).await
    }
}

#[async_trait]
impl ServerApi for MastodonApi {
    async fn me(&self) -> Result<Account> {
        Ok(self.me.clone())
    }

    async fn followings(&self) -> Result<Vec<Account>> {
        let mut url = endpoint(&self.origin, &format!("/api/v1/accounts/{}/following", self.me.id))?;
        url.query_pairs_mut()
            .append_pair("limit", &FOLLOWING_PAGE_LIMIT.to_string());

        let mut followings = Vec::new();
        let mut next = Some(url);
        while let Some(url) = next.take() {
            let response = self.get(url).await?;
            next = next_link(response.headers());
            let page: Vec<MastodonAccount> = read_json("v1/accounts/:id/following", response).await?;
            if page.is_empty() {
                break;
            }
            debug!(page = page.len(), "following page");
            followings.extend(page.into_iter().map(Account::from));
        }
        Ok(followings)
    }

    async fn posts(&self, account_id: &str) -> Result<Vec<Post>> {
        let mut url = endpoint(&self.origin, &format!("/api/v1/accounts/{account_id}/statuses"))?;
        url.query_pairs_mut().append_pair("exclude_replies", "true");

        let response = self.get(url).await?;
        let statuses: Vec<Status> = read_json("v1/accounts/:id/statuses", response).await?;
        statuses
            .into_iter()
            .map(|status| status.into_post(&self.origin))
            .collect()
    }
}
