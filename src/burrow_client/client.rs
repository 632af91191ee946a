use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};

use super::api_version::ApiVersion;
use super::errors::{ClientError, ClientResult};
use super::wire::{ClusterList, ConsumerList, ResponseHeader, TopicDetail, TopicList};
use super::LagServiceClient;
use crate::burrow_types::{ConsumerGroup, Topic};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// [`LagServiceClient`] talking to Burrow over HTTP.
///
/// The underlying [`reqwest::Client`] pools connections: they are released when
/// the last clone of this client is dropped.
#[derive(Debug, Clone)]
pub struct BurrowClient {
    http: reqwest::Client,
    base: Url,
    api_version: ApiVersion,
}

impl BurrowClient {
    /// Create a new [`BurrowClient`].
    ///
    /// # Arguments
    ///
    /// * `base` - Base URL of Burrow: API paths are appended to it
    /// * `api_version` - Burrow API version, selecting paths and response decoder
    /// * `request_timeout` - Timeout applied to each request, connection included
    pub fn new(base: Url, api_version: ApiVersion, request_timeout: Duration) -> ClientResult<Self> {
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base.to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ClientError::Init)?;

        Ok(Self {
            http,
            base,
            api_version,
        })
    }

    /// Build the URL `<base>/<version>/kafka/<segments...>`, percent-encoding each segment.
    fn url_for(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .push(self.api_version.path_segment())
            .push("kafka")
            .extend(segments);

        Ok(url)
    }

    /// Issue a GET to `url`, and decode the body with `decode` if the response is successful.
    async fn fetch<T, F>(&self, url: Url, decode: F) -> ClientResult<T>
    where
        F: FnOnce(&[u8]) -> serde_json::Result<T>,
    {
        trace!("GET {url}");

        let res = self.http.get(url.clone()).send().await.map_err(|e| {
            ClientError::Unreachable {
                url: url.to_string(),
                source: Box::new(e),
            }
        })?;

        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ClientError::BadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = res.bytes().await.map_err(|e| ClientError::Unreachable {
            url: url.to_string(),
            source: Box::new(e),
        })?;

        let decode_err = |source| ClientError::Decode {
            url: url.to_string(),
            source,
        };

        let header: ResponseHeader = serde_json::from_slice(&body).map_err(decode_err)?;
        if header.error {
            // Some Burrow versions report missing entities with a 200 and an error message
            if header.message.to_lowercase().contains("not found") {
                return Err(ClientError::NotFound {
                    url: url.to_string(),
                });
            }

            return Err(ClientError::Upstream {
                url: url.to_string(),
                message: header.message,
            });
        }

        decode(&body).map_err(decode_err)
    }
}

#[async_trait]
impl LagServiceClient for BurrowClient {
    async fn list_clusters(&self) -> ClientResult<Vec<String>> {
        let url = self.url_for(&[])?;
        self.fetch(url, |b| serde_json::from_slice::<ClusterList>(b).map(|l| l.clusters)).await
    }

    async fn list_consumer_groups(&self, cluster: &str) -> ClientResult<Vec<String>> {
        let url = self.url_for(&[cluster, "consumer"])?;
        self.fetch(url, |b| serde_json::from_slice::<ConsumerList>(b).map(|l| l.consumers)).await
    }

    async fn get_consumer_group(&self, cluster: &str, group: &str) -> ClientResult<ConsumerGroup> {
        let url = self.url_for(&[cluster, "consumer", group, "lag"])?;
        self.fetch(url, |b| self.api_version.decode_consumer_group(cluster, group, b)).await
    }

    async fn list_topics(&self, cluster: &str) -> ClientResult<Vec<String>> {
        let url = self.url_for(&[cluster, "topic"])?;
        self.fetch(url, |b| serde_json::from_slice::<TopicList>(b).map(|l| l.topics)).await
    }

    async fn get_topic(&self, cluster: &str, topic: &str) -> ClientResult<Topic> {
        let url = self.url_for(&[cluster, "topic", topic])?;
        self.fetch(url, |b| {
            serde_json::from_slice::<TopicDetail>(b).map(|d| Topic {
                name: topic.to_string(),
                partition_max_offsets: d.offsets,
            })
        })
        .await
    }
}
