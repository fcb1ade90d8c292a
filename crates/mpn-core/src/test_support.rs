//! Scripted transport and recording observer for engine tests.

use async_trait::async_trait;
use mpn_types::{ApiError, RateLimitConfig};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use crate::engine::RequestExecutor;
use crate::graphql::{GraphqlErrorEntry, GraphqlRequest, GraphqlResponse, GraphqlTransport};
use crate::observer::{MigrationEvent, MigrationObserver};

type Scripted = Result<GraphqlResponse, ApiError>;

/// Replays a fixed sequence of responses and records every request.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<GraphqlRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new(responses: Vec<Scripted>) -> Arc<Self> {
        Arc::new(Self { responses: Mutex::new(responses.into()), requests: Mutex::new(Vec::new()) })
    }

    pub(crate) fn requests(&self) -> Vec<GraphqlRequest> {
        self.requests.lock().clone()
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl GraphqlTransport for ScriptedTransport {
    async fn execute(&self, request: &GraphqlRequest) -> Result<GraphqlResponse, ApiError> {
        self.requests.lock().push(request.clone());
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport { message: "script exhausted".to_string() }))
    }
}

#[derive(Default)]
pub(crate) struct RecordingObserver {
    events: Mutex<Vec<MigrationEvent>>,
}

impl RecordingObserver {
    pub(crate) fn events(&self) -> Vec<MigrationEvent> {
        self.events.lock().clone()
    }

    pub(crate) fn retry_delays(&self) -> Vec<Duration> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                MigrationEvent::RetryScheduled { delay, .. } => Some(delay),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn cooldowns(&self) -> Vec<Duration> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                MigrationEvent::RateLimitLow { wait, .. } => Some(wait),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn pacing_delays(&self) -> Vec<Duration> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                MigrationEvent::BatchPacing { delay, .. } => Some(delay),
                _ => None,
            })
            .collect()
    }
}

impl MigrationObserver for RecordingObserver {
    fn on_event(&self, event: &MigrationEvent) {
        self.events.lock().push(event.clone());
    }
}

type Harness =
    (RequestExecutor<Arc<ScriptedTransport>>, Arc<ScriptedTransport>, Arc<RecordingObserver>);

pub(crate) fn executor(responses: Vec<Scripted>) -> Harness {
    executor_with_config(responses, RateLimitConfig::default())
}

/// Like [`executor`] but with limits that skip validation.
pub(crate) fn executor_with_config(responses: Vec<Scripted>, config: RateLimitConfig) -> Harness {
    let transport = ScriptedTransport::new(responses);
    let observer = Arc::new(RecordingObserver::default());
    let executor = RequestExecutor::new(Arc::clone(&transport), config, observer.clone());
    (executor, transport, observer)
}

pub(crate) fn cost(available: f64, restore_rate: f64) -> Value {
    json!({
        "cost": {
            "requestedQueryCost": 10,
            "actualQueryCost": 10,
            "throttleStatus": {
                "maximumAvailable": 1000.0,
                "currentlyAvailable": available,
                "restoreRate": restore_rate
            }
        }
    })
}

pub(crate) fn ok(data: Value) -> Scripted {
    Ok(GraphqlResponse { data: Some(data), errors: vec![], extensions: Some(cost(980.0, 50.0)) })
}

pub(crate) fn ok_with_budget(data: Value, available: f64, restore_rate: f64) -> Scripted {
    Ok(GraphqlResponse {
        data: Some(data),
        errors: vec![],
        extensions: Some(cost(available, restore_rate)),
    })
}

/// Shopify's in-band throttle rejection: HTTP 200, no data, `THROTTLED` error.
pub(crate) fn throttled() -> Scripted {
    Ok(GraphqlResponse {
        data: None,
        errors: vec![GraphqlErrorEntry {
            message: "Throttled".to_string(),
            extensions: Some(json!({"code": "THROTTLED"})),
        }],
        extensions: None,
    })
}

pub(crate) fn product(n: usize, source: Option<&str>, target: Option<&str>) -> Value {
    json!({
        "id": format!("gid://shopify/Product/{}", n),
        "title": format!("Product {}", n),
        "legacyResourceId": n.to_string(),
        "sourceMpn": source.map(|v| json!({"id": format!("gid://shopify/Metafield/{}", n), "value": v})),
        "targetMpn": target.map(|v| json!({"id": format!("gid://shopify/Metafield/{}", n + 10_000), "value": v})),
    })
}

pub(crate) fn products_page(nodes: Vec<Value>, has_next_page: bool, end_cursor: Option<&str>) -> Value {
    json!({
        "products": {
            "pageInfo": {"hasNextPage": has_next_page, "endCursor": end_cursor},
            "edges": nodes.into_iter().map(|node| json!({"node": node})).collect::<Vec<_>>()
        }
    })
}

pub(crate) fn set_metafields(user_errors: Vec<(usize, &str)>) -> Value {
    json!({
        "metafieldsSet": {
            "metafields": [],
            "userErrors": user_errors
                .into_iter()
                .map(|(i, msg)| json!({"field": ["metafields", i.to_string(), "value"], "message": msg}))
                .collect::<Vec<_>>()
        }
    })
}
