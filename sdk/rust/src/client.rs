use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    #[error("relay returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type SdkResult<T> = Result<T, SdkError>;

/// A link as sent in `socialLinks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkInput {
    pub title: String,
    pub url: String,
}

/// Unsigned transaction returned by the build routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuiltTransaction {
    pub success: bool,
    pub transaction_bytes: String,
}

/// Outcome of `/execute`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutedTransaction {
    pub success: bool,
    pub digest: String,
    #[serde(default)]
    pub effects: Value,
    #[serde(default)]
    pub object_changes: Value,
    #[serde(default)]
    pub events: Value,
}

pub struct RelayClient {
    client: Client,
    relay_url: String,
}

impl RelayClient {
    /// `relay_url` includes any base path, e.g. `http://localhost:3000/api/sponsor`.
    pub fn new(relay_url: &str) -> Self {
        Self {
            client: Client::new(),
            relay_url: relay_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn health(&self) -> SdkResult<Value> {
        let resp = self
            .client
            .get(format!("{}/health", self.relay_url))
            .send()
            .await?;
        Self::parse(resp).await
    }

    pub async fn create_profile(
        &self,
        user_address: &str,
        name: &str,
        surname: &str,
        description: &str,
        social_links: &[LinkInput],
    ) -> SdkResult<BuiltTransaction> {
        self.post(
            "/create-profile",
            json!({
                "userAddress": user_address,
                "name": name,
                "surname": surname,
                "description": description,
                "socialLinks": social_links,
            }),
        )
        .await
    }

    pub async fn add_link(
        &self,
        user_address: &str,
        nft_id: &str,
        title: &str,
        url: &str,
    ) -> SdkResult<BuiltTransaction> {
        self.post(
            "/add-link",
            json!({
                "userAddress": user_address,
                "nftId": nft_id,
                "title": title,
                "url": url,
            }),
        )
        .await
    }

    pub async fn update_link(
        &self,
        user_address: &str,
        nft_id: &str,
        link_index: u64,
        new_title: &str,
        new_url: &str,
    ) -> SdkResult<BuiltTransaction> {
        self.post(
            "/update-link",
            json!({
                "userAddress": user_address,
                "nftId": nft_id,
                "linkIndex": link_index,
                "newTitle": new_title,
                "newUrl": new_url,
            }),
        )
        .await
    }

    pub async fn remove_link(
        &self,
        user_address: &str,
        nft_id: &str,
        link_index: u64,
    ) -> SdkResult<BuiltTransaction> {
        self.post(
            "/remove-link",
            json!({
                "userAddress": user_address,
                "nftId": nft_id,
                "linkIndex": link_index,
            }),
        )
        .await
    }

    pub async fn update_profile(
        &self,
        user_address: &str,
        nft_id: &str,
        name: &str,
        surname: &str,
        description: &str,
    ) -> SdkResult<BuiltTransaction> {
        self.post(
            "/update-profile",
            json!({
                "userAddress": user_address,
                "nftId": nft_id,
                "name": name,
                "surname": surname,
                "description": description,
            }),
        )
        .await
    }

    /// Submit bytes from a build route together with the user's zkLogin signature.
    pub async fn execute(
        &self,
        transaction_bytes: &str,
        user_signature: &str,
    ) -> SdkResult<ExecutedTransaction> {
        self.post(
            "/execute",
            json!({
                "transactionBytes": transaction_bytes,
                "userSignature": user_signature,
            }),
        )
        .await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: Value) -> SdkResult<T> {
        let resp = self
            .client
            .post(format!("{}{}", self.relay_url, path))
            .json(&body)
            .send()
            .await?;
        Self::parse(resp).await
    }

    async fn parse<T: DeserializeOwned>(resp: reqwest::Response) -> SdkResult<T> {
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            // The relay reports failures as {"error": "..."}.
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|body| body.get("error").and_then(Value::as_str).map(String::from))
                .unwrap_or(text);
            return Err(SdkError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}
