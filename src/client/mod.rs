use crate::{
    api::{
        alias::{AliasesRequest, GetAliasesResponse},
        format_multi,
        mapping::PutMappingRequest,
        refresh::RefreshResponse,
        settings::{GetSettingsResponse, Settings, UpdateSettingsRequest},
        Acknowledged, ActionFuture, IndicesAdmin,
    },
    error::*,
    BatchOperations, BlockingBatchOperations, Error,
};
use bytes::Bytes;
use futures::FutureExt;
use reqwest::{Client as Reqwest, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{fmt, sync::Arc};
use tracing::instrument;

pub mod builder;
pub use builder::ClientBuilder;

type QueryPair<'a, const N: usize> = [(&'static str, &'a str); N];

/// REST client for the index administration API.
#[derive(Debug, Clone)]
pub struct Client {
    pub reqwest: Reqwest,
    url: Arc<str>,
}

impl Client {
    pub fn new(url: &str) -> Self {
        Self::builder()
            .url(url)
            .build()
            .expect("Default Reqwest Client should build successfully")
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn batch(&self) -> BatchOperations<Client> {
        BatchOperations::new(self.clone())
    }

    pub fn blocking(&self) -> Result<BlockingBatchOperations<Client>, Error> {
        BlockingBatchOperations::new(self.clone())
    }
}

impl Client {
    #[instrument(skip(self))]
    pub async fn get<'a, P, const N: usize, R>(
        &self,
        path: P,
        query: QueryPair<'a, N>,
    ) -> Result<R, Error>
    where
        P: IntoIterator<Item = &'a str> + fmt::Debug,
        R: DeserializeOwned,
    {
        let req = self.reqwest.get(self.endpoint(path)).query(query.as_ref());
        self.action(req).await
    }

    #[instrument(skip(self, body))]
    pub async fn post<'a, B, P, R>(&self, path: P, body: Option<&B>) -> Result<R, Error>
    where
        B: Serialize,
        P: IntoIterator<Item = &'a str> + fmt::Debug,
        R: DeserializeOwned,
    {
        let req = self.reqwest.post(self.endpoint(path));

        let req = if let Some(body) = body {
            req.json(body)
        } else {
            req
        };

        self.action(req).await
    }

    #[instrument(skip(self, body))]
    pub async fn put<'a, B, P, R>(&self, path: P, body: &B) -> Result<R, Error>
    where
        B: Serialize,
        P: IntoIterator<Item = &'a str> + fmt::Debug,
        R: DeserializeOwned,
    {
        let req = self.reqwest.put(self.endpoint(path)).json(body);
        self.action(req).await
    }

    #[instrument(skip(self, body))]
    pub(crate) async fn put_raw<'a, P, R>(&self, path: P, body: impl Into<Bytes>) -> Result<R, Error>
    where
        P: IntoIterator<Item = &'a str> + fmt::Debug,
        R: DeserializeOwned,
    {
        let req = self.reqwest.put(self.endpoint(path)).body(body.into());

        self.action(req).await
    }

    async fn action<R: DeserializeOwned>(&self, req: RequestBuilder) -> Result<R, Error> {
        let res = req.send().await.map_err(Error::ActionFailed)?;
        let status = res.status();
        let body = res.bytes().await.map_err(Error::ReadBody)?;

        if !status.is_success() {
            return Err(error_response(status, &body));
        }

        serde_json::from_slice(&body)
            .toss_deserialize_text_with(|| String::from_utf8_lossy(&body).into_owned())
    }

    fn endpoint<'a>(&self, path: impl IntoIterator<Item = &'a str>) -> String {
        let path = path.into_iter();

        let mut url = String::with_capacity(self.url.len() + 1 + path.size_hint().0);
        url.push_str(&self.url);
        path.for_each(|p| {
            url.push('/');
            url.push_str(p);
        });

        url
    }
}

impl IndicesAdmin for Client {
    fn refresh(&self, indices: &[&str]) -> ActionFuture<RefreshResponse> {
        let client = self.clone();
        let target = format_multi(indices);

        async move {
            client
                .post([target.as_str(), "_refresh"], None::<&()>)
                .await
        }
        .boxed()
    }

    fn get_settings(&self, indices: &[&str]) -> ActionFuture<GetSettingsResponse> {
        let client = self.clone();
        let target = format_multi(indices);

        async move {
            client
                .get([target.as_str(), "_settings"], [("flat_settings", "true")])
                .await
        }
        .boxed()
    }

    fn update_settings(&self, request: UpdateSettingsRequest) -> ActionFuture<Acknowledged> {
        let client = self.clone();

        async move {
            let target = format_multi(request.indices.as_slice());
            let path = [target.as_str(), "_settings"];

            match request.settings {
                Settings::Map(settings) => client.put(path, &settings).await,
                Settings::Source(source) => client.put_raw(path, source).await,
            }
        }
        .boxed()
    }

    fn put_mapping(&self, request: PutMappingRequest) -> ActionFuture<Acknowledged> {
        let client = self.clone();

        async move {
            let target = format_multi(request.indices.as_slice());

            // typeless mapping endpoint when no type is given
            if request.doc_type.is_empty() {
                client
                    .put_raw([target.as_str(), "_mapping"], request.source)
                    .await
            } else {
                client
                    .put_raw(
                        [target.as_str(), "_mapping", request.doc_type.as_str()],
                        request.source,
                    )
                    .await
            }
        }
        .boxed()
    }

    fn update_aliases(&self, request: AliasesRequest) -> ActionFuture<Acknowledged> {
        let client = self.clone();

        async move { client.post(["_aliases"], Some(&request)).await }.boxed()
    }

    fn get_aliases(&self, alias: &str) -> ActionFuture<GetAliasesResponse> {
        let client = self.clone();
        let alias = alias.to_owned();

        async move { client.get(["_alias", alias.as_str()], []).await }.boxed()
    }
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Cause {
        #[serde(rename = "type")]
        kind: String,
        reason: Option<String>,
    },
    Message(String),
}

fn error_response(status: StatusCode, body: &[u8]) -> Error {
    let (kind, reason) = match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(ErrorResponse {
            error: ErrorBody::Cause { kind, reason },
        }) => (kind, reason.unwrap_or_default()),
        Ok(ErrorResponse {
            error: ErrorBody::Message(reason),
        }) => ("error".to_owned(), reason),
        Err(_) => (
            status.canonical_reason().unwrap_or("unknown").to_owned(),
            String::from_utf8_lossy(body).into_owned(),
        ),
    };

    Error::Elasticsearch {
        status: status.as_u16(),
        kind,
        reason,
    }
}
