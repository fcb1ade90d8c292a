use mpn_types::{
    ApiError, BatchResult, MetafieldSpec, MigrationResult, ProductCandidate,
    MAX_METAFIELDS_PER_MUTATION,
};
use tokio::time::sleep;
use tracing::{debug, error};

use super::RequestExecutor;
use crate::graphql::operations::{
    set_metafields_request, MetafieldsSetInput, SetMetafieldsData, UserError,
};
use crate::graphql::GraphqlTransport;
use crate::observer::MigrationEvent;
use crate::throttle::pacing_delay;

const UNKNOWN_PRODUCT: &str = "Unknown product";

/// Writes the target metafield for a worklist, one `metafieldsSet` mutation
/// per chunk of at most `metafields_per_mutation` items. The chunk size is
/// clamped to the API's hard cap whatever the config says.
///
/// Chunks run strictly one after another. A failed chunk never aborts the
/// run: its items are tallied as failed and the next chunk proceeds.
#[derive(Debug, Clone)]
pub struct BatchUpdater {
    target: MetafieldSpec,
}

impl Default for BatchUpdater {
    fn default() -> Self {
        Self { target: MetafieldSpec::TARGET_MPN }
    }
}

impl BatchUpdater {
    pub async fn run<T: GraphqlTransport>(
        &self,
        executor: &mut RequestExecutor<T>,
        candidates: &[ProductCandidate],
    ) -> MigrationResult {
        let mut result = MigrationResult::default();
        let batch_size =
            executor.config().metafields_per_mutation.clamp(1, MAX_METAFIELDS_PER_MUTATION);
        let total_items = candidates.len();
        let total_batches = total_items.div_ceil(batch_size);

        for (idx, chunk) in candidates.chunks(batch_size).enumerate() {
            let batch = idx + 1;
            let first_item = idx * batch_size + 1;
            executor.emit(MigrationEvent::BatchStarted {
                batch,
                total_batches,
                first_item,
                last_item: first_item + chunk.len() - 1,
                total_items,
            });

            match self.update_batch(executor, chunk).await {
                Ok(outcome) => {
                    executor.emit(MigrationEvent::BatchCompleted {
                        batch,
                        succeeded: outcome.success_count,
                        failed: outcome.failed_items.len(),
                        state: executor.throttle(),
                    });
                    result.absorb(outcome);
                },
                Err(e) => {
                    let message = e.to_string();
                    error!("Batch {} failed: {}", batch, message);
                    executor.emit(MigrationEvent::BatchFailed {
                        batch,
                        items: chunk.len(),
                        message: message.clone(),
                        state: executor.throttle(),
                    });
                    result.record_batch_failure(batch, chunk.len(), &message);
                },
            }

            if batch < total_batches {
                let state = executor.throttle();
                let delay = pacing_delay(&state, executor.config());
                executor.emit(MigrationEvent::BatchPacing { delay, state });
                sleep(delay).await;
            }
        }

        result
    }

    async fn update_batch<T: GraphqlTransport>(
        &self,
        executor: &mut RequestExecutor<T>,
        chunk: &[ProductCandidate],
    ) -> Result<BatchResult, ApiError> {
        let inputs = self.build_inputs(chunk);
        debug!("Submitting {} metafields", inputs.len());
        let data: SetMetafieldsData = executor.execute_as(&set_metafields_request(&inputs)).await?;
        let user_errors = data.metafields_set.map(|p| p.user_errors).unwrap_or_default();
        Ok(interpret_user_errors(chunk, &user_errors))
    }

    pub fn build_inputs(&self, chunk: &[ProductCandidate]) -> Vec<MetafieldsSetInput> {
        chunk.iter().map(|c| MetafieldsSetInput::copy_to(&self.target, c)).collect()
    }
}

/// Tally a chunk's outcome from the mutation's user errors.
///
/// Each error costs one success and is reported as `"<title>: <message>"`,
/// where the title is looked up by the error's input index.
pub fn interpret_user_errors(chunk: &[ProductCandidate], user_errors: &[UserError]) -> BatchResult {
    let failed_items = user_errors
        .iter()
        .map(|err| {
            let title = err
                .input_index()
                .and_then(|i| chunk.get(i))
                .map_or(UNKNOWN_PRODUCT, |c| c.title.as_str());
            format!("{}: {}", title, err.message)
        })
        .collect::<Vec<_>>();

    BatchResult { success_count: chunk.len().saturating_sub(failed_items.len()), failed_items }
}
