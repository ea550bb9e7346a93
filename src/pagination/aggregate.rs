//! Sequential page aggregation

use super::types::{NextPage, PageAccumulator, PageFetcher};
use crate::error::{Error, Result};
use crate::models::AggregatedResult;
use tracing::{debug, info};

/// Fetch every page of `query` and concatenate the results.
///
/// Pages are requested one at a time starting at 1; page n+1 is only
/// requested after page n came back non-empty. The first empty page ends the
/// aggregation. Any fetch error aborts immediately and is returned unchanged,
/// with partial results discarded.
pub async fn aggregate_all<Q, T, F>(query: &Q, fetcher: &F) -> Result<AggregatedResult<T>>
where
    Q: ?Sized + Sync,
    T: Send + 'static,
    F: PageFetcher<Q, T> + ?Sized,
{
    let mut acc = PageAccumulator::new();

    while let Some(page_number) = acc.state().page() {
        let page = match fetcher.fetch_page(query, page_number).await {
            Ok(page) => page,
            Err(e) => {
                debug!("Page {} failed, aborting aggregation: {}", page_number, e);
                acc.fail();
                return Err(e);
            }
        };

        debug!("Page {} returned {} results", page_number, page.results.len());

        if let NextPage::Done = acc.process_page(page) {
            break;
        }
    }

    let pages = acc.pages_fetched();
    let result = acc
        .finish()
        .ok_or_else(|| Error::Other("aggregation ended without an empty page".to_string()))?;

    info!(
        "Aggregated {} results from {} pages",
        result.result_count, pages
    );
    Ok(result)
}
