/// Errors from one `/route` query.
///
/// These stay inside the provider layer and its tests; the refresh loop
/// degrades every variant to a zero [`RouteResult`](crate::routing::RouteResult)
/// before anything else sees it.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("http request failed: {0}")]
    Http(#[source] reqwest::Error),
    #[error("malformed response body: {0}")]
    Json(#[source] reqwest::Error),
    #[error("routing service rejected the request: {0}")]
    Api(String),
    #[error("routing service returned no route")]
    NoRoute,
}
