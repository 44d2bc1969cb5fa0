use tomgpt_core::Embedding;

use crate::client::PineconeEndpoint;
use crate::store::PineconeVectorStore;
use crate::types::IndexDescription;
use crate::PineconeStoreError;

pub const PINECONE_CONTROLLER_URL: &str = "https://api.pinecone.io";

const DEFAULT_TEXT_KEY: &str = "text";

/// Where the data plane lives.
enum Target {
    Host(String),
    IndexName(String),
}

/// Configures a [`PineconeVectorStore`].
///
/// Either [`base_url`](Self::base_url) or [`index_name`](Self::index_name)
/// is required. With only a name, `build` asks the control plane for the
/// index host once.
pub struct PineconeStoreBuilder<E> {
    embedder: E,
    target: Option<Target>,
    index_name: Option<String>,
    controller_url: String,
    api_key: Option<String>,
    namespace: Option<String>,
    text_key: String,
    verify_dimension: bool,
}

impl<E> PineconeStoreBuilder<E>
where
    E: Embedding + Send + Sync,
{
    pub fn new(embedder: E) -> Self {
        Self {
            embedder,
            target: None,
            index_name: None,
            controller_url: PINECONE_CONTROLLER_URL.to_string(),
            api_key: None,
            namespace: None,
            text_key: DEFAULT_TEXT_KEY.to_string(),
            verify_dimension: false,
        }
    }

    /// Index host. Takes precedence over name resolution.
    pub fn base_url(mut self, host: impl Into<String>) -> Self {
        self.target = Some(Target::Host(host.into()));
        self
    }

    pub fn index_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !matches!(self.target, Some(Target::Host(_))) {
            self.target = Some(Target::IndexName(name.clone()));
        }
        self.index_name = Some(name);
        self
    }

    pub fn controller_url(mut self, url: impl Into<String>) -> Self {
        self.controller_url = url.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Metadata field holding the chunk text. Defaults to `text`.
    pub fn text_key(mut self, key: impl Into<String>) -> Self {
        self.text_key = key.into();
        self
    }

    /// Compare the index dimension with the embedder's after connecting.
    pub fn verify_dimension(mut self, enabled: bool) -> Self {
        self.verify_dimension = enabled;
        self
    }

    pub async fn build(self) -> Result<PineconeVectorStore<E>, PineconeStoreError> {
        let Some(api_key) = self.api_key else {
            return Err(PineconeStoreError::Config("an api key is required".to_string()));
        };
        let host = match self.target {
            Some(Target::Host(host)) => host,
            Some(Target::IndexName(name)) => {
                resolve_index_host(&self.controller_url, &api_key, &name).await?
            }
            None => {
                return Err(PineconeStoreError::Config(
                    "set either an index host or an index name".to_string(),
                ))
            }
        };

        let endpoint = PineconeEndpoint::new(&host, &api_key)?;
        let store = PineconeVectorStore::new(
            self.embedder,
            endpoint,
            self.namespace,
            self.text_key,
            self.index_name,
        );
        if self.verify_dimension {
            store.check_dimension().await;
        }
        Ok(store)
    }
}

async fn resolve_index_host(
    controller_url: &str,
    api_key: &str,
    name: &str,
) -> Result<String, PineconeStoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PineconeStoreError::Config("index name is blank".to_string()));
    }
    let controller = PineconeEndpoint::new(controller_url, api_key)?;
    let IndexDescription { host, .. } = controller.get(&format!("/indexes/{name}")).await?;
    if host.trim().is_empty() {
        return Err(PineconeStoreError::Malformed(format!(
            "control plane returned no host for index '{name}'"
        )));
    }
    tracing::debug!(index_name = name, %host, "resolved pinecone index host");
    Ok(host)
}
