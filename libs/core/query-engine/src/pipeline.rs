use tracing::instrument;

use crate::error::QueryError;
use crate::pagination::PageResult;
use crate::repository::{Document, Repository};
use crate::spec::QuerySpec;

/// Fetch one page and the total match count concurrently.
///
/// The count uses the same filter and search as the page query. If either
/// side fails the whole execution fails.
#[instrument(skip(repository, spec), fields(page = spec.pagination.page(), limit = spec.pagination.limit()))]
pub async fn execute<R>(repository: &R, spec: &QuerySpec) -> Result<PageResult<Document>, QueryError>
where
    R: Repository + ?Sized,
{
    let (items, total) = tokio::try_join!(repository.find(spec), repository.count(&spec.criteria))
        .map_err(|e| {
            tracing::warn!(error = %e, "Query execution failed");
            QueryError::execution(e)
        })?;

    Ok(spec.pagination.build_page(total, items))
}
