#![allow(dead_code)]

use polydoc::{
    core::{
        error::InternalError,
        model::TypeRegistry,
        serialize::JsonObject,
        stream::{PageRequest, PageSource, ResultPage, StreamError},
    },
    schema,
};
use serde_json::{Value as JsonValue, json};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Route library logs to the test writer; `RUST_LOG` picks the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn schema_registry() -> Arc<TypeRegistry> {
    Arc::new(schema::registry().expect("schema registers"))
}

/// Page as the remote API lists it in a database query.
pub fn task_page(n: usize) -> JsonValue {
    json!({
        "object": "page",
        "id": format!("00000000-0000-4000-8000-{n:012}"),
        "parent": {"type": "database_id", "database_id": "0123abcd-0123-4abc-8def-0123456789ab"},
        "properties": {
            "Name": {
                "id": "title",
                "type": "title",
                "title": [{
                    "type": "text",
                    "plain_text": format!("Task {n}"),
                    "text": {"content": format!("Task {n}")}
                }]
            },
            "Done": {"id": "done", "type": "checkbox", "checkbox": n % 2 == 0}
        }
    })
}

///
/// MockApi
///
/// Stand-in for a remote list endpoint. Cursors are opaque strings, pages
/// are capped at 100, and every request body is kept.
///

#[derive(Debug, Default)]
pub struct MockApi {
    items: Vec<JsonValue>,
    pub bodies: Vec<JsonObject>,
    pub fail_on_call: Option<usize>,
}

impl MockApi {
    pub fn new(items: Vec<JsonValue>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn tasks(count: usize) -> Self {
        Self::new((0..count).map(task_page).collect())
    }

    pub fn calls(&self) -> usize {
        self.bodies.len()
    }
}

impl PageSource for MockApi {
    fn fetch(&mut self, request: PageRequest) -> Result<ResultPage, InternalError> {
        self.bodies.push(request.to_wire());
        if self.fail_on_call == Some(self.bodies.len()) {
            return Err(StreamError::Fetch {
                message: "503 service unavailable".to_string(),
            }
            .into());
        }

        let offset = match request.start_cursor.as_deref() {
            None => 0,
            Some(cursor) => cursor
                .strip_prefix("cursor-")
                .and_then(|offset| offset.parse::<usize>().ok())
                .ok_or_else(|| StreamError::Fetch {
                    message: format!("bad cursor '{cursor}'"),
                })?,
        };
        let size = request.page_size.min(100) as usize;
        let end = (offset + size).min(self.items.len());
        let results = self.items[offset..end].to_vec();

        Ok(if end < self.items.len() {
            ResultPage::more(results, format!("cursor-{end}"))
        } else {
            ResultPage::last(results)
        })
    }
}
