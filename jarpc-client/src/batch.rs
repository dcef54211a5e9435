//! Batch call building and batch response access
//!
//! A [`BatchCall`] collects method calls and notifications in order and
//! renders them as one JSON-RPC 2.0 array. Ids are assigned per batch,
//! starting at 1, and [`add_call`](BatchCall::add_call) hands the
//! assigned id back so the caller can find its answer later.
//!
//! A [`BatchResponse`] is the decoded counterpart: a map from id to
//! result-or-error. Notifications never appear in it, and a server that
//! answered entries out of order is handled transparently; the map is
//! keyed, not positional.
//!
//! # Examples
//!
//! ```rust
//! use jarpc_client::BatchCall;
//! use serde_json::json;
//!
//! let mut batch = BatchCall::new();
//! let first = batch.add_call("add", json!([1, 2]));
//! batch.add_notification("initCounter", json!({"value": 9}));
//! let second = batch.add_call("add", json!([3, 4]));
//!
//! assert_eq!((first, second), (1, 2));
//! assert_eq!(batch.len(), 3);
//! ```

use jarpc_core::{ErrorObject, Id, V2Request};
use serde_json::Value;
use std::collections::HashMap;

/// Ordered builder for a JSON-RPC 2.0 batch message.
#[derive(Debug, Default)]
pub struct BatchCall {
    entries: Vec<V2Request>,
    next_id: i64,
}

impl BatchCall {
    /// Empty batch; the first call will get id 1.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Append a method call and return its assigned id.
    pub fn add_call(&mut self, method: impl Into<String>, params: Value) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries
            .push(V2Request::call(method, params, Id::Number(id)));
        id
    }

    /// Append a notification (carries no id, gets no response).
    pub fn add_notification(&mut self, method: impl Into<String>, params: Value) {
        self.entries.push(V2Request::notification(method, params));
    }

    /// Ids assigned so far, in entry order.
    pub fn call_ids(&self) -> Vec<i64> {
        self.entries
            .iter()
            .filter_map(|entry| match entry.id {
                Some(Id::Number(id)) => Some(id),
                _ => None,
            })
            .collect()
    }

    /// Number of entries, notifications included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the batch as its wire string (a JSON array).
    pub fn to_json(&self) -> Result<String, jarpc_core::Error> {
        serde_json::to_string(&self.entries)
            .map_err(|e| jarpc_core::Error::Serialization(e.to_string()))
    }
}

/// Decoded batch response: id → result or error.
#[derive(Debug, Default)]
pub struct BatchResponse {
    responses: HashMap<Id, Result<Value, ErrorObject>>,
}

impl BatchResponse {
    pub(crate) fn insert(&mut self, id: Id, outcome: Result<Value, ErrorObject>) {
        self.responses.insert(id, outcome);
    }

    /// The outcome recorded for an id, if any.
    pub fn get(&self, id: &Id) -> Option<&Result<Value, ErrorObject>> {
        self.responses.get(id)
    }

    /// The result for an id, when it succeeded.
    pub fn result_for(&self, id: &Id) -> Option<&Value> {
        match self.responses.get(id) {
            Some(Ok(result)) => Some(result),
            _ => None,
        }
    }

    /// The error for an id, when it failed.
    pub fn error_for(&self, id: &Id) -> Option<&ErrorObject> {
        match self.responses.get(id) {
            Some(Err(error)) => Some(error),
            _ => None,
        }
    }

    /// True when any entry failed.
    pub fn has_errors(&self) -> bool {
        self.responses.values().any(|outcome| outcome.is_err())
    }

    /// Iterate all recorded outcomes.
    pub fn iter(&self) -> impl Iterator<Item = (&Id, &Result<Value, ErrorObject>)> {
        self.responses.iter()
    }

    /// Number of recorded outcomes (notifications never appear).
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    /// True when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_are_assigned_in_order_and_skip_notifications() {
        let mut batch = BatchCall::new();
        assert_eq!(batch.add_call("abc", Value::Null), 1);
        batch.add_notification("def", Value::Null);
        assert_eq!(batch.add_call("abc", Value::Null), 2);
        assert_eq!(batch.call_ids(), vec![1, 2]);
        assert_eq!(batch.len(), 3);
    }

    #[test]
    fn wire_form_preserves_entry_order() {
        let mut batch = BatchCall::new();
        batch.add_call("abc", Value::Null);
        batch.add_notification("def", Value::Null);
        batch.add_call("ghi", Value::Null);

        let value: Value = serde_json::from_str(&batch.to_json().unwrap()).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["method"], json!("abc"));
        assert_eq!(entries[0]["id"], json!(1));
        assert!(entries[1].get("id").is_none());
        assert_eq!(entries[2]["method"], json!("ghi"));
        assert_eq!(entries[2]["id"], json!(2));
    }

    #[test]
    fn response_map_distinguishes_results_and_errors() {
        let mut responses = BatchResponse::default();
        responses.insert(Id::Number(1), Ok(json!(23)));
        responses.insert(Id::Number(2), Err(ErrorObject::new(-32000, "boom")));

        assert_eq!(responses.result_for(&Id::Number(1)), Some(&json!(23)));
        assert!(responses.result_for(&Id::Number(2)).is_none());
        assert_eq!(responses.error_for(&Id::Number(2)).unwrap().code, -32000);
        assert!(responses.has_errors());
        assert_eq!(responses.len(), 2);
    }
}
