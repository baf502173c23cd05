//! Partial-failure aggregation over independent resource fetches
//!
//! The dashboard needs N collections at once; any of them may fail without
//! taking the others down. [`settle`] joins the fetches with all-settled
//! semantics: every task runs to completion, a rejection is swallowed into
//! an empty list, and a per-resource success flag lets the caller tell
//! "empty because no data" from "empty because the fetch failed".

use std::future::Future;

use futures::future::join_all;
use indexmap::IndexMap;
use serde_json::Value;

use crate::{client::ApiClient, error::ClientResult};

/// Normalize a collection payload to a plain ordered list.
///
/// Three shapes are accepted: a bare array (itself), an object with an
/// array-valued `results` key (the pagination envelope), and any other
/// non-null object (its values, in key order). Anything else is an empty
/// list — never an error.
pub fn normalize(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(results)) => results,
            // `results` holding a non-array is malformed; fall through to
            // treating the remaining object values as the list.
            _ => map.into_iter().map(|(_, v)| v).collect(),
        },
        _ => Vec::new(),
    }
}

/// Result of one aggregation pass: normalized lists plus per-resource
/// success flags, both in the caller's declaration order.
#[derive(Debug, Clone, Default)]
pub struct ResourceSet {
    raw: IndexMap<String, Value>,
    lists: IndexMap<String, Vec<Value>>,
    succeeded: IndexMap<String, bool>,
}

impl ResourceSet {
    /// The normalized list for a resource; empty when the resource was not
    /// requested or its fetch failed.
    pub fn list(&self, name: &str) -> &[Value] {
        self.lists.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Take the list out, avoiding a clone. Empty for unknown names.
    pub fn take_list(&mut self, name: &str) -> Vec<Value> {
        self.lists.shift_remove(name).unwrap_or_default()
    }

    /// The payload before list normalization, for single-object endpoints
    /// (the stats resources). Absent for failed fetches.
    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.raw.get(name)
    }

    pub fn succeeded(&self, name: &str) -> bool {
        self.succeeded.get(name).copied().unwrap_or(false)
    }

    /// Names of the resources whose fetch failed, for the stale-data banner.
    pub fn failed_resources(&self) -> Vec<String> {
        self.succeeded
            .iter()
            .filter(|(_, ok)| !**ok)
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.succeeded.keys().map(String::as_str)
    }
}

/// Join named fetch tasks with all-settled semantics. No rejection
/// propagates past this point and no sibling is cancelled.
pub async fn settle<F>(tasks: Vec<(String, F)>) -> ResourceSet
where
    F: Future<Output = ClientResult<Value>>,
{
    let (names, futures): (Vec<_>, Vec<_>) = tasks.into_iter().unzip();
    let outcomes = join_all(futures).await;

    let mut set = ResourceSet::default();
    for (name, outcome) in names.into_iter().zip(outcomes) {
        match outcome {
            Ok(value) => {
                set.raw.insert(name.clone(), value.clone());
                set.lists.insert(name.clone(), normalize(value));
                set.succeeded.insert(name, true);
            }
            Err(e) => {
                tracing::warn!(resource = %name, "Resource fetch failed, substituting empty list: {}", e);
                set.lists.insert(name.clone(), Vec::new());
                set.succeeded.insert(name, false);
            }
        }
    }
    set
}

/// Fetch every named path concurrently through the client.
pub async fn fetch_all(client: &ApiClient, resources: &[(&str, &str)]) -> ResourceSet {
    let tasks = resources
        .iter()
        .map(|(name, path)| (name.to_string(), client.fetch(path)))
        .collect();
    settle(tasks).await
}
