use crate::{
    api::{
        alias::{AliasesRequest, GetAliasesResponse},
        mapping::PutMappingRequest,
        refresh::RefreshResponse,
        settings::{
            UpdateSettingsRequest, INDEX_NUMBER_OF_REPLICAS, INDEX_REFRESH_INTERVAL,
            NUMBER_OF_REPLICAS, REFRESH_DISABLED, REFRESH_INTERVAL,
        },
        Acknowledged,
    },
    log::{Operation, OperationLog, TracingLog},
    ActionFuture, Client, Error, IndicesAdmin,
};
use bytes::Bytes;
use futures::FutureExt;
use std::{collections::BTreeMap, fmt, sync::Arc};

pub mod blocking;

/// Index administration helpers returning in-flight handles.
///
/// Each method records the operation through the [`OperationLog`] and then
/// dispatches exactly one request through the client. Errors from the client
/// come back on the handle as they are.
pub struct BatchOperations<A = Client> {
    client: A,
    log: Arc<dyn OperationLog>,
}

impl<A: fmt::Debug> fmt::Debug for BatchOperations<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchOperations")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl<A: Clone> Clone for BatchOperations<A> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            log: self.log.clone(),
        }
    }
}

impl<A: IndicesAdmin> BatchOperations<A> {
    pub fn new(client: A) -> Self {
        Self::with_log(client, Arc::new(TracingLog))
    }

    pub fn with_log(client: A, log: Arc<dyn OperationLog>) -> Self {
        Self { client, log }
    }

    pub fn client(&self) -> &A {
        &self.client
    }

    /// Makes recently indexed documents of `indices` visible to search.
    pub fn refresh(&self, indices: &[&str]) -> ActionFuture<RefreshResponse> {
        self.log.record(&Operation::Refresh { indices });
        self.client.refresh(indices)
    }

    pub fn disable_refresh(&self, indices: &[&str]) -> ActionFuture<Acknowledged> {
        self.set_refresh_interval(REFRESH_DISABLED, indices)
    }

    /// `interval` goes to the cluster as is, e.g. `"30s"` or `"-1"`.
    pub fn set_refresh_interval(
        &self,
        interval: &str,
        indices: &[&str],
    ) -> ActionFuture<Acknowledged> {
        self.log
            .record(&Operation::SetRefreshInterval { interval, indices });
        self.client
            .update_settings(UpdateSettingsRequest::single(REFRESH_INTERVAL, interval, indices))
    }

    /// Resolves to `None` when the index has no explicit refresh interval.
    pub fn get_refresh_interval(&self, index: &str) -> ActionFuture<Option<String>> {
        self.get_setting(index, INDEX_REFRESH_INTERVAL)
    }

    pub fn disable_replicas(&self, indices: &[&str]) -> ActionFuture<Acknowledged> {
        self.set_replicas(0, indices)
    }

    pub fn set_replicas(&self, replicas: u32, indices: &[&str]) -> ActionFuture<Acknowledged> {
        self.log.record(&Operation::SetReplicas { replicas, indices });
        self.client
            .update_settings(UpdateSettingsRequest::single(NUMBER_OF_REPLICAS, replicas, indices))
    }

    pub fn get_replicas(&self, index: &str) -> ActionFuture<Option<u32>> {
        self.log.record(&Operation::GetSetting {
            index,
            key: INDEX_NUMBER_OF_REPLICAS,
        });

        let name = index.to_owned();
        self.read_setting(index, INDEX_NUMBER_OF_REPLICAS)
            .map(move |res| {
                res?.map(|value| {
                    value.parse::<u32>().map_err(|_| Error::InvalidSetting {
                        index: name,
                        key: INDEX_NUMBER_OF_REPLICAS.to_owned(),
                        value,
                    })
                })
                .transpose()
            })
            .boxed()
    }

    /// Reads one setting of `index` by its full key, e.g. `index.number_of_replicas`.
    pub fn get_setting(&self, index: &str, key: &str) -> ActionFuture<Option<String>> {
        self.log.record(&Operation::GetSetting { index, key });
        self.read_setting(index, key)
    }

    pub fn update_settings(
        &self,
        settings: BTreeMap<String, String>,
        indices: &[&str],
    ) -> ActionFuture<Acknowledged> {
        self.log.record(&Operation::UpdateSettings {
            settings: &settings,
            indices,
        });
        self.client
            .update_settings(UpdateSettingsRequest::new(indices, settings))
    }

    /// `settings_source` is a serialized settings document for `index`.
    pub fn put_settings(
        &self,
        settings_source: impl Into<Bytes>,
        index: &str,
    ) -> ActionFuture<Acknowledged> {
        let source = settings_source.into();

        self.log.record(&Operation::PutSettings {
            index,
            source: &source,
        });
        self.client
            .update_settings(UpdateSettingsRequest::source(index, source))
    }

    /// `mapping_source` is a serialized mapping for `doc_type`. An empty type
    /// targets the typeless mapping endpoint.
    pub fn put_mapping(
        &self,
        mapping_source: impl Into<Bytes>,
        doc_type: &str,
        indices: &[&str],
    ) -> ActionFuture<Acknowledged> {
        let source = mapping_source.into();

        self.log.record(&Operation::PutMapping {
            doc_type,
            source: &source,
            indices,
        });
        self.client
            .put_mapping(PutMappingRequest::new(source, doc_type, indices))
    }

    /// Moves `alias` from `from_index` to `to_index` in one aliases request.
    pub fn switch_alias(
        &self,
        alias: &str,
        from_index: &str,
        to_index: &str,
    ) -> ActionFuture<Acknowledged> {
        self.log.record(&Operation::SwitchAlias {
            alias,
            from: from_index,
            to: to_index,
        });

        let request = AliasesRequest::new()
            .remove(from_index, alias)
            .add(alias, to_index);

        self.client.update_aliases(request)
    }

    pub fn get_alias(&self, alias: &str) -> ActionFuture<GetAliasesResponse> {
        self.log.record(&Operation::GetAlias { alias });
        self.client.get_aliases(alias)
    }

    fn read_setting(&self, index: &str, key: &str) -> ActionFuture<Option<String>> {
        let handle = self.client.get_settings(&[index]);

        let index = index.to_owned();
        let key = key.to_owned();

        handle
            .map(move |res| res.map(|settings| settings.setting(&index, &key).map(str::to_owned)))
            .boxed()
    }
}
