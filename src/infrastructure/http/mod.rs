// HTTP module - reqwest-backed resource clients
pub mod client;

pub use client::ApiClient;

use crate::core::client::{ClientResult, ResourceClient};
use crate::domain::error::ClientError;
use crate::domain::project::ProjectInfo;
use crate::domain::record::{Record, ResourceFields};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Map, Value};
use std::marker::PhantomData;

/// Naming contract for a resource served under `/v3/{COLLECTION}`.
///
/// List responses wrap records in a `COLLECTION` field, single-record
/// responses in a `SINGULAR` field, and the identifier is sent as the
/// `SINGULAR` parameter.
pub trait RemoteResource: Send + Sync + 'static {
    type Record: Record;
    const COLLECTION: &'static str;
    const SINGULAR: &'static str;
}

/// The projects resource
pub struct Projects;

impl RemoteResource for Projects {
    type Record = ProjectInfo;
    const COLLECTION: &'static str = "projects";
    const SINGULAR: &'static str = "project";
}

/// `ResourceClient` over the HTTP API for any `RemoteResource`
pub struct HttpResourceClient<R: RemoteResource> {
    api: ApiClient,
    _resource: PhantomData<R>,
}

impl<R: RemoteResource> HttpResourceClient<R> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            _resource: PhantomData,
        }
    }

    fn collection_path() -> String {
        format!("v3/{}", R::COLLECTION)
    }

    fn record_path() -> String {
        format!("v3/{}/{}", R::COLLECTION, R::SINGULAR)
    }
}

#[async_trait]
impl<R: RemoteResource> ResourceClient for HttpResourceClient<R> {
    type Record = R::Record;

    fn resource_name(&self) -> &'static str {
        R::SINGULAR
    }

    async fn list(&self) -> ClientResult<Vec<R::Record>> {
        let response = self
            .api
            .request(Method::GET, &Self::collection_path(), &[], None)
            .await?;
        client::extract(response, R::COLLECTION)
    }

    async fn get(&self, id: &str) -> ClientResult<R::Record> {
        let response = self
            .api
            .request(Method::GET, &Self::record_path(), &[(R::SINGULAR, id)], None)
            .await?;
        client::extract(response, R::SINGULAR)
    }

    async fn create(&self, fields: &ResourceFields) -> ClientResult<R::Record> {
        let body = serde_json::to_value(fields).map_err(|e| ClientError::Decode(e.to_string()))?;
        let response = self
            .api
            .request(Method::POST, &Self::collection_path(), &[], Some(&body))
            .await?;
        client::extract(response, R::SINGULAR)
    }

    async fn update(&self, id: &str, fields: &ResourceFields) -> ClientResult<R::Record> {
        let mut body = identifier_body::<R>(id);
        body.insert("name".to_string(), Value::from(fields.name.as_str()));
        body.insert("description".to_string(), Value::from(fields.description.as_str()));
        let body = Value::Object(body);

        let response = self
            .api
            .request(Method::POST, &Self::record_path(), &[], Some(&body))
            .await?;
        client::extract(response, R::SINGULAR)
    }

    async fn delete(&self, id: &str) -> ClientResult<()> {
        let body = Value::Object(identifier_body::<R>(id));
        self.api
            .request(Method::DELETE, &Self::record_path(), &[], Some(&body))
            .await?;
        Ok(())
    }
}

fn identifier_body<R: RemoteResource>(id: &str) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(R::SINGULAR.to_string(), Value::from(id));
    map
}
