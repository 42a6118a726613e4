#![allow(dead_code)]

use esbatch::{
    api::{
        alias::{AliasAction, AliasesRequest, GetAliasesResponse, IndexAliases},
        mapping::PutMappingRequest,
        refresh::RefreshResponse,
        settings::{GetSettingsResponse, IndexSettings, Settings, UpdateSettingsRequest},
        Acknowledged, ShardCount,
    },
    ActionFuture, Error, IndicesAdmin, Operation, OperationLog,
};
use futures::{future, FutureExt};
use serde_json::Value;
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Arc, Mutex},
};
use tracing_subscriber::EnvFilter;

pub type Events = Arc<Mutex<Vec<String>>>;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Default)]
struct Index {
    settings: BTreeMap<String, String>,
    aliases: BTreeSet<String>,
    mappings: BTreeMap<String, String>,
}

/// In-memory cluster applying requests the way the REST API does: settings
/// keys get the `index.` prefix, alias actions apply all together or not at all.
#[derive(Debug, Clone, Default)]
pub struct FakeCluster {
    indices: Arc<Mutex<BTreeMap<String, Index>>>,
    events: Events,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Events) -> Self {
        Self {
            indices: Default::default(),
            events,
        }
    }

    pub fn create_index(&self, name: &str) {
        let settings = BTreeMap::from([
            ("index.number_of_replicas".to_owned(), "1".to_owned()),
            ("index.number_of_shards".to_owned(), "1".to_owned()),
        ]);

        self.indices.lock().unwrap().insert(
            name.to_owned(),
            Index {
                settings,
                ..Default::default()
            },
        );
    }

    pub fn add_alias(&self, alias: &str, index: &str) {
        let mut indices = self.indices.lock().unwrap();
        indices
            .get_mut(index)
            .expect("index exists")
            .aliases
            .insert(alias.to_owned());
    }

    pub fn setting(&self, index: &str, key: &str) -> Option<String> {
        self.indices.lock().unwrap().get(index)?.settings.get(key).cloned()
    }

    pub fn mapping(&self, index: &str, doc_type: &str) -> Option<String> {
        self.indices
            .lock()
            .unwrap()
            .get(index)?
            .mappings
            .get(doc_type)
            .cloned()
    }

    pub fn aliases_of(&self, index: &str) -> Vec<String> {
        self.indices
            .lock()
            .unwrap()
            .get(index)
            .map(|i| i.aliases.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn dispatched(&self, call: &str) {
        self.events.lock().unwrap().push(format!("dispatch {call}"));
    }
}

pub fn not_found(index: &str) -> Error {
    Error::Elasticsearch {
        status: 404,
        kind: "index_not_found_exception".to_owned(),
        reason: format!("no such index [{index}]"),
    }
}

fn resolve<S: AsRef<str>>(
    indices: &BTreeMap<String, Index>,
    names: &[S],
) -> Result<Vec<String>, Error> {
    if names.is_empty() {
        return Ok(indices.keys().cloned().collect());
    }

    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            if indices.contains_key(name) {
                Ok(name.to_owned())
            } else {
                Err(not_found(name))
            }
        })
        .collect()
}

fn flatten(prefix: &str, value: &Value, out: &mut BTreeMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                let key = if prefix.is_empty() {
                    key.to_owned()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&key, value, out);
            }
        }
        Value::String(s) => {
            out.insert(prefix.to_owned(), s.to_owned());
        }
        other => {
            out.insert(prefix.to_owned(), other.to_string());
        }
    }
}

fn normalize(settings: BTreeMap<String, String>) -> BTreeMap<String, String> {
    settings
        .into_iter()
        .map(|(key, value)| {
            if key.starts_with("index.") {
                (key, value)
            } else {
                (format!("index.{key}"), value)
            }
        })
        .collect()
}

fn parse_source(source: &[u8]) -> Result<BTreeMap<String, String>, Error> {
    let value: Value = serde_json::from_slice(source).map_err(|e| Error::Elasticsearch {
        status: 400,
        kind: "parse_exception".to_owned(),
        reason: e.to_string(),
    })?;

    let mut out = BTreeMap::new();
    flatten("", &value, &mut out);
    Ok(out)
}

impl IndicesAdmin for FakeCluster {
    fn refresh(&self, indices: &[&str]) -> ActionFuture<RefreshResponse> {
        self.dispatched("refresh");

        let all = self.indices.lock().unwrap();
        let res = resolve(&all, indices).map(|resolved| {
            let total = resolved.len() as u64 * 2;
            RefreshResponse {
                shards: ShardCount {
                    total,
                    successful: total / 2,
                    failed: 0,
                },
            }
        });

        future::ready(res).boxed()
    }

    fn get_settings(&self, indices: &[&str]) -> ActionFuture<GetSettingsResponse> {
        self.dispatched("get_settings");

        let all = self.indices.lock().unwrap();
        let res = resolve(&all, indices).map(|resolved| {
            GetSettingsResponse(
                resolved
                    .into_iter()
                    .map(|name| {
                        let settings = all[&name]
                            .settings
                            .iter()
                            .map(|(k, v)| (k.to_owned(), Value::String(v.to_owned())))
                            .collect();
                        (name, IndexSettings { settings })
                    })
                    .collect(),
            )
        });

        future::ready(res).boxed()
    }

    fn update_settings(&self, request: UpdateSettingsRequest) -> ActionFuture<Acknowledged> {
        self.dispatched("update_settings");

        let res = (|| -> Result<Acknowledged, Error> {
            let settings = match request.settings {
                Settings::Map(map) => map,
                Settings::Source(source) => parse_source(&source)?,
            };
            let settings = normalize(settings);

            let mut all = self.indices.lock().unwrap();
            for name in resolve(&all, request.indices.as_slice())? {
                if let Some(index) = all.get_mut(&name) {
                    index.settings.extend(settings.clone());
                }
            }

            Ok(Acknowledged { acknowledged: true })
        })();

        future::ready(res).boxed()
    }

    fn put_mapping(&self, request: PutMappingRequest) -> ActionFuture<Acknowledged> {
        self.dispatched("put_mapping");

        let res = (|| -> Result<Acknowledged, Error> {
            let source = String::from_utf8(request.source.to_vec()).map_err(|e| {
                Error::Elasticsearch {
                    status: 400,
                    kind: "parse_exception".to_owned(),
                    reason: e.to_string(),
                }
            })?;
            parse_source(source.as_bytes())?;

            let mut all = self.indices.lock().unwrap();
            for name in resolve(&all, request.indices.as_slice())? {
                if let Some(index) = all.get_mut(&name) {
                    index
                        .mappings
                        .insert(request.doc_type.clone(), source.clone());
                }
            }

            Ok(Acknowledged { acknowledged: true })
        })();

        future::ready(res).boxed()
    }

    fn update_aliases(&self, request: AliasesRequest) -> ActionFuture<Acknowledged> {
        self.dispatched("update_aliases");

        let res = (|| -> Result<Acknowledged, Error> {
            let mut all = self.indices.lock().unwrap();

            // validate every action before touching anything
            for action in &request.actions {
                match action {
                    AliasAction::Add(target) => {
                        resolve(&all, std::slice::from_ref(&target.index))?;
                    }
                    AliasAction::Remove(target) => {
                        resolve(&all, std::slice::from_ref(&target.index))?;
                        if !all[&target.index].aliases.contains(&target.alias) {
                            return Err(Error::Elasticsearch {
                                status: 404,
                                kind: "aliases_not_found_exception".to_owned(),
                                reason: format!("aliases [{}] missing", target.alias),
                            });
                        }
                    }
                }
            }

            for action in request.actions {
                match action {
                    AliasAction::Add(target) => {
                        if let Some(index) = all.get_mut(&target.index) {
                            index.aliases.insert(target.alias);
                        }
                    }
                    AliasAction::Remove(target) => {
                        if let Some(index) = all.get_mut(&target.index) {
                            index.aliases.remove(&target.alias);
                        }
                    }
                }
            }

            Ok(Acknowledged { acknowledged: true })
        })();

        future::ready(res).boxed()
    }

    fn get_aliases(&self, alias: &str) -> ActionFuture<GetAliasesResponse> {
        self.dispatched("get_aliases");

        let all = self.indices.lock().unwrap();
        let found: BTreeMap<String, IndexAliases> = all
            .iter()
            .filter(|(_, index)| index.aliases.contains(alias))
            .map(|(name, _)| {
                let aliases = BTreeMap::from([(alias.to_owned(), Value::Object(Default::default()))]);
                (name.to_owned(), IndexAliases { aliases })
            })
            .collect();

        let res = if found.is_empty() {
            Err(Error::Elasticsearch {
                status: 404,
                kind: "error".to_owned(),
                reason: format!("alias [{alias}] missing"),
            })
        } else {
            Ok(GetAliasesResponse(found))
        };

        future::ready(res).boxed()
    }
}

/// Log that writes into the same event list as [`FakeCluster`].
#[derive(Debug, Clone, Default)]
pub struct RecordingLog {
    events: Events,
}

impl RecordingLog {
    pub fn new(events: Events) -> Self {
        Self { events }
    }
}

impl OperationLog for RecordingLog {
    fn record(&self, operation: &Operation<'_>) {
        self.events
            .lock()
            .unwrap()
            .push(format!("log {}: {operation}", operation.name()));
    }
}
