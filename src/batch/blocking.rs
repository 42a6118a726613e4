use super::BatchOperations;
use crate::{
    api::alias::GetAliasesResponse, log::OperationLog, ActionFuture, Client, Error, IndicesAdmin,
};
use bytes::Bytes;
use std::{collections::BTreeMap, sync::Arc};
use tokio::runtime::{Builder, Runtime};

/// Blocking counterpart of [`BatchOperations`].
///
/// Every method dispatches through the wrapped [`BatchOperations`] and waits
/// on the handle with no timeout. Calling these from inside an async runtime
/// panics, the same way `reqwest::blocking` does.
///
/// The runtime keeps one worker thread alive between calls. Connections opened
/// here are driven by that worker, so a [`Client`] shared with async callers
/// keeps working after blocking calls.
#[derive(Debug)]
pub struct BlockingBatchOperations<A = Client> {
    inner: BatchOperations<A>,
    runtime: Runtime,
}

impl<A: IndicesAdmin> BlockingBatchOperations<A> {
    pub fn new(client: A) -> Result<Self, Error> {
        Self::from_async(BatchOperations::new(client))
    }

    pub fn with_log(client: A, log: Arc<dyn OperationLog>) -> Result<Self, Error> {
        Self::from_async(BatchOperations::with_log(client, log))
    }

    pub fn from_async(inner: BatchOperations<A>) -> Result<Self, Error> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("esbatch-blocking")
            .enable_all()
            .build()
            .map_err(Error::RuntimeFailed)?;

        Ok(Self { inner, runtime })
    }

    pub fn as_async(&self) -> &BatchOperations<A> {
        &self.inner
    }

    fn wait<T>(&self, handle: ActionFuture<T>) -> Result<T, Error> {
        self.runtime.block_on(handle)
    }

    pub fn refresh(&self, indices: &[&str]) -> Result<(), Error> {
        self.wait(self.inner.refresh(indices)).map(drop)
    }

    pub fn disable_refresh(&self, indices: &[&str]) -> Result<(), Error> {
        self.wait(self.inner.disable_refresh(indices)).map(drop)
    }

    pub fn set_refresh_interval(&self, interval: &str, indices: &[&str]) -> Result<(), Error> {
        self.wait(self.inner.set_refresh_interval(interval, indices))
            .map(drop)
    }

    pub fn get_refresh_interval(&self, index: &str) -> Result<Option<String>, Error> {
        self.wait(self.inner.get_refresh_interval(index))
    }

    pub fn disable_replicas(&self, indices: &[&str]) -> Result<(), Error> {
        self.wait(self.inner.disable_replicas(indices)).map(drop)
    }

    pub fn set_replicas(&self, replicas: u32, indices: &[&str]) -> Result<(), Error> {
        self.wait(self.inner.set_replicas(replicas, indices))
            .map(drop)
    }

    pub fn get_replicas(&self, index: &str) -> Result<Option<u32>, Error> {
        self.wait(self.inner.get_replicas(index))
    }

    pub fn get_setting(&self, index: &str, key: &str) -> Result<Option<String>, Error> {
        self.wait(self.inner.get_setting(index, key))
    }

    pub fn update_settings(
        &self,
        settings: BTreeMap<String, String>,
        indices: &[&str],
    ) -> Result<(), Error> {
        self.wait(self.inner.update_settings(settings, indices))
            .map(drop)
    }

    pub fn put_settings(&self, settings_source: impl Into<Bytes>, index: &str) -> Result<(), Error> {
        self.wait(self.inner.put_settings(settings_source, index))
            .map(drop)
    }

    pub fn put_mapping(
        &self,
        mapping_source: impl Into<Bytes>,
        doc_type: &str,
        indices: &[&str],
    ) -> Result<(), Error> {
        self.wait(self.inner.put_mapping(mapping_source, doc_type, indices))
            .map(drop)
    }

    pub fn switch_alias(&self, alias: &str, from_index: &str, to_index: &str) -> Result<(), Error> {
        self.wait(self.inner.switch_alias(alias, from_index, to_index))
            .map(drop)
    }

    pub fn get_alias(&self, alias: &str) -> Result<GetAliasesResponse, Error> {
        self.wait(self.inner.get_alias(alias))
    }
}
