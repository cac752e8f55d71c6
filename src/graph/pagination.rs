//! Lazy iteration over paginated Graph result sets.
//!
//! Graph splits large collections across pages. Each page carries its items in
//! `value` and, unless it is the last one, an absolute `@odata.nextLink` URL.
//! [`paginate`] turns that chain into a single stream of items.

use futures::stream::{self, Stream, TryStreamExt};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::api::GraphApi;
use super::error::{GraphError, GraphResult};
use super::models::ResultPage;

/// Stream every item of a paginated collection, following `@odata.nextLink`.
///
/// No request is sent until the stream is first polled. The stream ends after
/// the first page without a next link, or right after yielding an error. It is
/// single-pass: calling `paginate` again issues fresh requests.
///
/// # Arguments
/// * `api` - Client used for each page request.
/// * `endpoint` - Endpoint of the first page.
///
/// # Returns
/// A stream of decoded items in server order.
pub fn paginate<'a, T>(api: &'a dyn GraphApi, endpoint: &str) -> impl Stream<Item = GraphResult<T>> + Send + use<'a, T>
where
  T: DeserializeOwned + Send + 'a,
{
  stream::try_unfold(Some(endpoint.to_string()), move |next| async move {
    let Some(endpoint) = next else {
      return Ok::<_, GraphError>(None);
    };

    debug!(endpoint = %endpoint, "Retrieving next page");
    let body = api.get_json(&endpoint).await?;
    let page: ResultPage<T> = serde_json::from_value(body).map_err(|e| GraphError::malformed(&endpoint, e))?;

    Ok::<_, GraphError>(Some((page.value, page.next_link)))
  })
  .map_ok(|items| stream::iter(items.into_iter().map(Ok::<T, GraphError>)))
  .try_flatten()
}

/// Drain [`paginate`] into a vector.
///
/// # Errors
/// Returns the first error any page request produced.
pub async fn collect_all<T>(api: &dyn GraphApi, endpoint: &str) -> GraphResult<Vec<T>>
where
  T: DeserializeOwned + Send,
{
  paginate(api, endpoint).try_collect().await
}
