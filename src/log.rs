//! Diagnostic log of dispatched operations.
//!
//! [`BatchOperations`](crate::BatchOperations) records every operation through
//! an [`OperationLog`] right before the request leaves. Recording cannot fail
//! and never holds up dispatch.

use bytes::Bytes;
use itertools::Itertools;
use std::{collections::BTreeMap, fmt};

/// An operation about to be dispatched, with its arguments.
#[derive(Debug, Clone, Copy)]
pub enum Operation<'a> {
    Refresh {
        indices: &'a [&'a str],
    },
    SetRefreshInterval {
        interval: &'a str,
        indices: &'a [&'a str],
    },
    SetReplicas {
        replicas: u32,
        indices: &'a [&'a str],
    },
    GetSetting {
        index: &'a str,
        key: &'a str,
    },
    UpdateSettings {
        settings: &'a BTreeMap<String, String>,
        indices: &'a [&'a str],
    },
    PutSettings {
        index: &'a str,
        source: &'a Bytes,
    },
    PutMapping {
        doc_type: &'a str,
        source: &'a Bytes,
        indices: &'a [&'a str],
    },
    SwitchAlias {
        alias: &'a str,
        from: &'a str,
        to: &'a str,
    },
    GetAlias {
        alias: &'a str,
    },
}

impl Operation<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Refresh { .. } => "refresh",
            Operation::SetRefreshInterval { .. } => "set_refresh_interval",
            Operation::SetReplicas { .. } => "set_replicas",
            Operation::GetSetting { .. } => "get_setting",
            Operation::UpdateSettings { .. } => "update_settings",
            Operation::PutSettings { .. } => "put_settings",
            Operation::PutMapping { .. } => "put_mapping",
            Operation::SwitchAlias { .. } => "switch_alias",
            Operation::GetAlias { .. } => "get_alias",
        }
    }
}

struct Indices<'a>(&'a [&'a str]);

impl fmt::Display for Indices<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("all indices")
        } else {
            write!(f, "[{}]", self.0.iter().join(", "))
        }
    }
}

impl fmt::Display for Operation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Operation::Refresh { indices } => write!(f, "refresh {}", Indices(indices)),
            Operation::SetRefreshInterval { interval, indices } => {
                write!(f, "set refresh interval to {interval} on {}", Indices(indices))
            }
            Operation::SetReplicas { replicas, indices } => {
                write!(f, "set replicas to {replicas} on {}", Indices(indices))
            }
            Operation::GetSetting { index, key } => write!(f, "read `{key}` of {index}"),
            Operation::UpdateSettings { settings, indices } => write!(
                f,
                "update settings {{{}}} on {}",
                settings.iter().map(|(k, v)| format!("{k}: {v}")).join(", "),
                Indices(indices)
            ),
            Operation::PutSettings { index, source } => {
                write!(f, "put {} bytes of settings on {index}", source.len())
            }
            Operation::PutMapping {
                doc_type,
                source,
                indices,
            } => write!(
                f,
                "put {} bytes of mapping for type `{doc_type}` on {}",
                source.len(),
                Indices(indices)
            ),
            Operation::SwitchAlias { alias, from, to } => {
                write!(f, "switch alias {alias} from {from} to {to}")
            }
            Operation::GetAlias { alias } => write!(f, "resolve alias {alias}"),
        }
    }
}

pub trait OperationLog: Send + Sync {
    fn record(&self, operation: &Operation<'_>);
}

/// Emits each operation as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl OperationLog for TracingLog {
    fn record(&self, operation: &Operation<'_>) {
        tracing::info!(operation = operation.name(), "{operation}");
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLog;

impl OperationLog for NoopLog {
    fn record(&self, _: &Operation<'_>) {}
}
