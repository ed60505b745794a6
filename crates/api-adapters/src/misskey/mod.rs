//! # Misskey adapter
//!
//! Every Misskey endpoint is a `POST /api/<name>` with a JSON body. Covers:
//! 1. `i` (who am I)
//! 2. `users/following` (paged with `untilId`)
//! 3. `users/notes`

pub(crate) mod entities;

use crate::http::{build_client, endpoint, parse_origin, read_json, transport, ClientOptions};
use async_trait::async_trait;
use domains::{Account, Post, Result, ServerApi};
use entities::{Following, Note, User};
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

const FOLLOWING_PAGE_LIMIT: u32 = 100;

pub struct MisskeyApi {
    client: Client,
    origin: Url,
    access_token: SecretString,
    me: Account,
}

impl MisskeyApi {
    pub async fn login(origin: &str, access_token: SecretString, options: &ClientOptions) -> Result<Self> {
        let origin = parse_origin(origin)?;
        let client = build_client(options)?;
        let me: User = Self::call(&client, &origin, &access_token, "i", json!({})).await?;
        debug!(origin = %origin, user = %me.username, "signed in to misskey");

        Ok(Self {
            client,
            origin,
            access_token,
            me: me.into(),
        })
    }

    async fn call<T: DeserializeOwned>(
        client: &Client,
        origin: &Url,
        access_token: &SecretString,
        name: &str,
        body: Value,
    ) -> Result<T> {
        let url = endpoint(origin, &format!("/api/{name}"))?;
        let response = client
            .post(url)
            .bearer_auth(access_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(transport(name))?;
        read_json(name, response).await
    }

    async fn api<T: DeserializeOwned>(&self, name: &str, body: Value) -> Result<T> {
        Self::call(&self.client, &self.origin, &self.access_token, name, body).await
    }

    async fn following_page(&self, until_id: Option<&str>) -> Result<Vec<Following>> {
        let mut body = json!({
            "userId": self.me.id,
            "limit": FOLLOWING_PAGE_LIMIT,
        });
        if let Some(until_id) = until_id {
            body["untilId"] = json!(until_id);
        }
        self.api("users/following", body).await
    }
}

#[async_trait]
impl ServerApi for MisskeyApi {
    async fn me(&self) -> Result<Account> {
        Ok(self.me.clone())
    }

    async fn followings(&self) -> Result<Vec<Account>> {
        let mut followings = Vec::new();
        let mut until_id: Option<String> = None;
        loop {
            let page = self.following_page(until_id.as_deref()).await?;
            let Some(last) = page.last() else {
                break;
            };
            until_id = Some(last.id.clone());
            debug!(page = page.len(), "following page");
            followings.extend(page.into_iter().filter_map(|f| f.followee).map(Account::from));
        }
        Ok(followings)
    }

    async fn posts(&self, account_id: &str) -> Result<Vec<Post>> {
        let body = json!({
            "userId": account_id,
            "withRenotes": true,
            "withReplies": false,
        });
        let notes: Vec<Note> = self.api("users/notes", body).await?;
        notes
            .into_iter()
            .map(|note| note.into_post(&self.origin))
            .collect()
    }
}
