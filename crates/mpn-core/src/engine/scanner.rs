use mpn_types::{ApiError, ProductCandidate};
use tracing::info;

use super::RequestExecutor;
use crate::graphql::operations::{products_page_request, ProductsPage, PRODUCTS_PAGE_SIZE};
use crate::graphql::GraphqlTransport;
use crate::observer::MigrationEvent;

/// Walks the whole product catalog once, collecting every product that
/// carries a source MPN.
///
/// Pagination is cursor-based in server order. The full candidate list is
/// materialized because planning and reporting need the total up front.
#[derive(Debug, Clone)]
pub struct CatalogScanner {
    page_size: usize,
}

impl Default for CatalogScanner {
    fn default() -> Self {
        Self { page_size: PRODUCTS_PAGE_SIZE }
    }
}

impl CatalogScanner {
    pub async fn scan<T: GraphqlTransport>(
        &self,
        executor: &mut RequestExecutor<T>,
    ) -> Result<Vec<ProductCandidate>, ApiError> {
        let mut candidates: Vec<ProductCandidate> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut has_next_page = true;
        let mut page = 0usize;

        info!("Fetching all products...");

        while has_next_page {
            page += 1;
            let request = products_page_request(self.page_size, cursor.as_deref());
            let data: ProductsPage = executor.execute_as(&request).await?;
            let connection = data.products;

            let before = candidates.len();
            candidates.extend(connection.edges.into_iter().filter_map(|e| e.node.into_candidate()));

            executor.emit(MigrationEvent::PageFetched {
                page,
                qualifying: candidates.len() - before,
                total_candidates: candidates.len(),
            });

            has_next_page = connection.page_info.has_next_page;
            cursor = connection.page_info.end_cursor;

            if has_next_page && cursor.is_none() {
                return Err(ApiError::MalformedResponse {
                    message: format!("page {} reports hasNextPage without an endCursor", page),
                });
            }
        }

        info!("Total products found: {}", candidates.len());
        Ok(candidates)
    }
}
