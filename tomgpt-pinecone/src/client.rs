use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::PineconeStoreError;

/// One Pinecone endpoint: the control plane or an index's data-plane host.
///
/// Every call carries the `Api-Key` header and decodes a JSON body.
#[derive(Clone, Debug)]
pub struct PineconeEndpoint {
    http: Client,
    root: String,
    api_key: String,
}

impl PineconeEndpoint {
    pub fn new(host: &str, api_key: &str) -> Result<Self, PineconeStoreError> {
        if api_key.trim().is_empty() {
            return Err(PineconeStoreError::Config(
                "pinecone api key is blank".to_string(),
            ));
        }
        let root = normalize_host(host);
        if let Err(err) = reqwest::Url::parse(&root) {
            return Err(PineconeStoreError::Config(format!(
                "'{host}' is not a usable pinecone host: {err}"
            )));
        }
        Ok(Self {
            http: Client::new(),
            root: root.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, PineconeStoreError> {
        self.call::<(), T>(Method::GET, path, None, None).await
    }

    /// POSTs `body`; `namespace` is only attached to errors for context.
    pub async fn post<B, T>(
        &self,
        path: &str,
        body: &B,
        namespace: Option<&str>,
    ) -> Result<T, PineconeStoreError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        self.call(Method::POST, path, Some(body), namespace).await
    }

    async fn call<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        namespace: Option<&str>,
    ) -> Result<T, PineconeStoreError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let mut request = self
            .http
            .request(method, format!("{}{path}", self.root))
            .header("Api-Key", &self.api_key);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|err| PineconeStoreError::Transport(err.to_string()))?;
        if !response.status().is_success() {
            return Err(into_api_error(response, namespace).await);
        }
        response
            .json::<T>()
            .await
            .map_err(|err| PineconeStoreError::Malformed(err.to_string()))
    }
}

/// Pinecone reports failures either as `{"message": ..}`, `{"error": ".."}`
/// or `{"error": {"message": ..}}` depending on the endpoint.
#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Flat { message: String },
    Nested { error: NestedError },
    Plain { error: String },
}

#[derive(Deserialize)]
struct NestedError {
    message: String,
}

impl ErrorBody {
    fn into_message(self) -> String {
        match self {
            ErrorBody::Flat { message } => message,
            ErrorBody::Nested { error } => error.message,
            ErrorBody::Plain { error } => error,
        }
    }
}

async fn into_api_error(response: Response, namespace: Option<&str>) -> PineconeStoreError {
    let status = response.status().as_u16();
    let retry_after_seconds = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok()?.parse().ok());
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.into_message(),
        Err(_) => "no error details in response".to_string(),
    };
    PineconeStoreError::Api {
        status,
        message,
        retry_after_seconds,
        namespace: namespace.map(str::to_string),
    }
}

/// The control plane reports index hosts without a scheme.
pub(crate) fn normalize_host(host: &str) -> String {
    let host = host.trim();
    if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}
