use mpn_types::{ApiError, RateLimitConfig, ThrottleState};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::graphql::{GraphqlRequest, GraphqlTransport};
use crate::observer::{MigrationEvent, MigrationObserver};
use crate::throttle::{cooldown_for, ThrottleTracker};

/// Issues GraphQL operations with throttle bookkeeping and bounded retries.
///
/// The executor owns the run's [`ThrottleTracker`]. After each response that
/// reports a throttle status it may wait pre-emptively so the *next* call
/// does not trip the remote limiter. Throttled failures are retried up to
/// `max_retries` times with `min_batch_delay * retry_backoff ^ n` between
/// attempts; anything else is returned immediately.
pub struct RequestExecutor<T> {
    transport: T,
    throttle: ThrottleTracker,
    config: RateLimitConfig,
    observer: Arc<dyn MigrationObserver>,
}

impl<T: GraphqlTransport> RequestExecutor<T> {
    pub fn new(transport: T, config: RateLimitConfig, observer: Arc<dyn MigrationObserver>) -> Self {
        Self { transport, throttle: ThrottleTracker::new(), config, observer }
    }

    pub fn throttle(&self) -> ThrottleState {
        self.throttle.current_state()
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    pub(crate) fn emit(&self, event: MigrationEvent) {
        self.observer.on_event(&event);
    }

    /// Run one logical operation, returning its `data` payload.
    pub async fn execute(&mut self, request: &GraphqlRequest) -> Result<Value, ApiError> {
        let mut retry: u32 = 0;

        loop {
            match self.attempt(request).await {
                Ok(data) => return Ok(data),
                Err(err) if err.is_throttled() && retry < self.config.max_retries => {
                    let delay = self.config.backoff_delay(retry);
                    retry += 1;
                    self.emit(MigrationEvent::RetryScheduled {
                        retry,
                        max_retries: self.config.max_retries,
                        delay,
                        reason: err.to_string(),
                    });
                    sleep(delay).await;
                },
                Err(err) => {
                    if err.is_throttled() {
                        warn!("Giving up after {} retries: {}", retry, err);
                    }
                    return Err(err);
                },
            }
        }
    }

    /// [`Self::execute`] and decode `data` into `D`.
    pub async fn execute_as<D: DeserializeOwned>(
        &mut self,
        request: &GraphqlRequest,
    ) -> Result<D, ApiError> {
        let data = self.execute(request).await?;
        serde_json::from_value(data).map_err(|e| ApiError::from_json_error(&e))
    }

    async fn attempt(&mut self, request: &GraphqlRequest) -> Result<Value, ApiError> {
        let response = self.transport.execute(request).await?;

        if let Some(state) = self.throttle.observe(response.extensions.as_ref()) {
            debug!("Throttle status: {}/{} points", state.available, state.maximum_available);
            if let Some(wait) = cooldown_for(&state, self.config.throttle_threshold) {
                self.emit(MigrationEvent::RateLimitLow { state, wait });
                sleep(wait).await;
            }
        }

        match response.data {
            Some(data) if !data.is_null() => {
                for e in &response.errors {
                    warn!("GraphQL error alongside data: {}", e.message);
                }
                Ok(data)
            },
            _ if !response.errors.is_empty() => Err(ApiError::GraphQl {
                messages: response.errors.into_iter().map(|e| e.message).collect(),
            }),
            _ => Err(ApiError::NoData),
        }
    }
}
