use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Alias actions applied by the cluster as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasesRequest {
    pub actions: Vec<AliasAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasAction {
    Add(AliasTarget),
    Remove(AliasTarget),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasTarget {
    pub index: String,
    pub alias: String,
}

impl AliasesRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, alias: impl ToString, index: impl ToString) -> Self {
        self.actions.push(AliasAction::Add(AliasTarget {
            index: index.to_string(),
            alias: alias.to_string(),
        }));
        self
    }

    pub fn remove(mut self, index: impl ToString, alias: impl ToString) -> Self {
        self.actions.push(AliasAction::Remove(AliasTarget {
            index: index.to_string(),
            alias: alias.to_string(),
        }));
        self
    }
}

/// Aliases per index, as returned by `GET /_alias/{alias}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GetAliasesResponse(pub BTreeMap<String, IndexAliases>);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexAliases {
    #[serde(default)]
    pub aliases: BTreeMap<String, Value>,
}

impl GetAliasesResponse {
    /// Indices carrying at least one alias in this response.
    pub fn indices(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, a)| !a.aliases.is_empty())
            .map(|(index, _)| index.as_str())
    }

    pub fn contains(&self, index: &str, alias: &str) -> bool {
        self.0
            .get(index)
            .is_some_and(|a| a.aliases.contains_key(alias))
    }
}
