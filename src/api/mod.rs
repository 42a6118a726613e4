use crate::Error;
use futures::future::BoxFuture;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub mod alias;
pub mod mapping;
pub mod refresh;
pub mod settings;

use alias::{AliasesRequest, GetAliasesResponse};
use mapping::PutMappingRequest;
use refresh::RefreshResponse;
use settings::{GetSettingsResponse, UpdateSettingsRequest};

/// Handle to an in-flight administrative request.
pub type ActionFuture<T> = BoxFuture<'static, Result<T, Error>>;

/// Index administration calls a cluster client has to provide.
///
/// Every method dispatches exactly one request and returns its handle without
/// waiting. Implementations decide how the request travels; [`crate::Client`]
/// sends it over the REST API.
pub trait IndicesAdmin: Send + Sync {
    fn refresh(&self, indices: &[&str]) -> ActionFuture<RefreshResponse>;

    fn get_settings(&self, indices: &[&str]) -> ActionFuture<GetSettingsResponse>;

    fn update_settings(&self, request: UpdateSettingsRequest) -> ActionFuture<Acknowledged>;

    fn put_mapping(&self, request: PutMappingRequest) -> ActionFuture<Acknowledged>;

    fn update_aliases(&self, request: AliasesRequest) -> ActionFuture<Acknowledged>;

    fn get_aliases(&self, alias: &str) -> ActionFuture<GetAliasesResponse>;
}

impl<T: IndicesAdmin + ?Sized> IndicesAdmin for std::sync::Arc<T> {
    fn refresh(&self, indices: &[&str]) -> ActionFuture<RefreshResponse> {
        (**self).refresh(indices)
    }

    fn get_settings(&self, indices: &[&str]) -> ActionFuture<GetSettingsResponse> {
        (**self).get_settings(indices)
    }

    fn update_settings(&self, request: UpdateSettingsRequest) -> ActionFuture<Acknowledged> {
        (**self).update_settings(request)
    }

    fn put_mapping(&self, request: PutMappingRequest) -> ActionFuture<Acknowledged> {
        (**self).put_mapping(request)
    }

    fn update_aliases(&self, request: AliasesRequest) -> ActionFuture<Acknowledged> {
        (**self).update_aliases(request)
    }

    fn get_aliases(&self, alias: &str) -> ActionFuture<GetAliasesResponse> {
        (**self).get_aliases(alias)
    }
}

/// Multi-index path parameter: comma separated, `_all` when empty.
pub fn format_multi<S: AsRef<str>>(indices: &[S]) -> String {
    if indices.is_empty() {
        "_all".to_owned()
    } else {
        indices.iter().map(AsRef::as_ref).join(",")
    }
}

pub(crate) fn owned(indices: &[&str]) -> Vec<String> {
    indices.iter().map(|&i| i.to_owned()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledged {
    pub acknowledged: bool,
}

/// Shard counts reported by broadcast operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardCount {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
}
