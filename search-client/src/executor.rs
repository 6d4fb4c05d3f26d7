//! Search request execution.
//!
//! This module sends a [`SearchRequest`] to a search node and classifies what
//! came back: a result (whatever the HTTP status), or one of the distinguished
//! failures in [`SearchError`].

use std::sync::Arc;

use search_client_shared::SearchRequest;
use tracing::{debug, error, instrument, warn};
use url::Url;

use crate::cancellation::CancellationSignal;
use crate::config::SearchClientConfig;
use crate::errors::{SearchError, SearchErrorContext, TransportError};
use crate::interfaces::{NodeLocator, ResultMapper, SearchTransport, TransportRequest};
use crate::mapper::JsonResultMapper;
use crate::node::ServiceType;
use crate::result::SearchResult;
use crate::transport::JSON_CONTENT_TYPE;

/// Executes search requests against dynamically selected nodes.
///
/// Collaborators are injected, so the executor holds no global state of its
/// own; concurrent calls share only the transport and the nodes' liveness
/// markers.
///
/// # Example
///
/// ```ignore
/// let locator = Arc::new(StaticNodeLocator::from_uris(["http://10.0.0.1:8094"])?);
/// let transport = Arc::new(ReqwestTransport::new(&SearchClientConfig::default())?);
/// let executor = SearchExecutor::new(locator, transport);
///
/// let request = SearchRequest::new("hotels", QueryClause::match_phrase("sea view")?)?;
/// let result = executor.execute(&request, &CancellationSignal::none()).await?;
/// if result.should_retry() {
///     // back off and resend
/// }
/// ```
pub struct SearchExecutor {
    locator: Arc<dyn NodeLocator>,
    transport: Arc<dyn SearchTransport>,
    mapper: Arc<dyn ResultMapper>,
    config: SearchClientConfig,
}

impl SearchExecutor {
    /// Create an executor with default configuration and JSON mapping.
    pub fn new(locator: Arc<dyn NodeLocator>, transport: Arc<dyn SearchTransport>) -> Self {
        Self::with_config(locator, transport, SearchClientConfig::default())
    }

    /// Create an executor with custom configuration.
    pub fn with_config(
        locator: Arc<dyn NodeLocator>,
        transport: Arc<dyn SearchTransport>,
        config: SearchClientConfig,
    ) -> Self {
        Self {
            locator,
            transport,
            mapper: Arc::new(JsonResultMapper),
            config,
        }
    }

    /// Replace the response mapper.
    pub fn with_mapper(mut self, mapper: Arc<dyn ResultMapper>) -> Self {
        self.mapper = mapper;
        self
    }

    /// The executor's configuration.
    pub fn config(&self) -> &SearchClientConfig {
        &self.config
    }

    /// Execute one search attempt.
    ///
    /// # Arguments
    ///
    /// * `request` - The search to run
    /// * `cancel` - Caller cancellation; tripping it aborts the in-flight send
    ///
    /// # Returns
    ///
    /// * `Ok(SearchResult)` - The service answered. Non-success and
    ///   retry-worthy statuses are results too; see
    ///   [`SearchResult::should_retry`]
    /// * `Err(SearchError::NodeUnavailable)` - No node offers the search service
    /// * `Err(SearchError::AmbiguousTimeout)` - Cancelled or timed out in flight
    /// * `Err(SearchError::RequestCanceled)` - Network failure, not applied
    /// * `Err(SearchError::MappingError)` - Success body could not be parsed
    #[instrument(
        skip(self, request, cancel),
        fields(index = %request.index(), client_context_id = %request.client_context_id())
    )]
    pub async fn execute(
        &self,
        request: &SearchRequest,
        cancel: &CancellationSignal,
    ) -> Result<SearchResult, SearchError> {
        let node = self.locator.pick_node(ServiceType::Search)?;
        let uri = node.query_uri(request.index())?;
        let body = request.to_body()?;
        let timeout = request.timeout().unwrap_or(self.config.default_timeout);

        debug!(uri = %uri, timeout_ms = timeout.as_millis() as u64, "Sending search request");

        let send = self.transport.send(TransportRequest {
            uri: uri.clone(),
            body,
            content_type: JSON_CONTENT_TYPE,
            timeout,
        });

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(uri = %uri, "Search cancelled in flight");
                return Err(SearchError::ambiguous_timeout(error_context(
                    request,
                    &uri,
                    "request cancelled before the response arrived",
                )));
            }
            outcome = tokio::time::timeout(timeout, send) => match outcome {
                Ok(Ok(response)) => response,
                Ok(Err(e)) => return Err(classify_transport_error(request, &uri, e)),
                Err(_) => {
                    warn!(uri = %uri, timeout_ms = timeout.as_millis() as u64, "Search deadline exceeded");
                    return Err(SearchError::ambiguous_timeout(error_context(
                        request,
                        &uri,
                        format!("no response within {}ms", timeout.as_millis()),
                    )));
                }
            },
        };

        let status = response.status;
        let mut result = if status.is_success() {
            SearchResult::from_payload(self.mapper.map(&response.body)?)
        } else {
            let diagnostic = String::from_utf8_lossy(&response.body).into_owned();
            warn!(status = %status, body = %diagnostic, "Search returned non-success status");
            SearchResult::from_diagnostic(diagnostic)
        };
        result.set_status(status);

        node.mark_used();

        if result.should_retry() {
            warn!(
                status = %status,
                reason = ?result.retry_reason(),
                "Search result is retry-worthy"
            );
        } else {
            debug!(status = %status, hits = result.hits().len(), "Search completed");
        }

        Ok(result)
    }
}

/// Translate a transport failure into the caller-facing classification.
///
/// A transport timeout or a truncated response leaves the server-side outcome
/// unknown; anything else failed on the wire before the service could answer.
fn classify_transport_error(
    request: &SearchRequest,
    uri: &Url,
    err: TransportError,
) -> SearchError {
    if err.is_ambiguous() {
        warn!(uri = %uri, error = %err, "Search outcome unknown");
        SearchError::ambiguous_timeout(error_context(request, uri, err.to_string()))
    } else {
        error!(uri = %uri, error = %err, "Search transport failed");
        SearchError::request_canceled(error_context(request, uri, err.to_string()))
    }
}

fn error_context(
    request: &SearchRequest,
    uri: &Url,
    reason: impl Into<String>,
) -> SearchErrorContext {
    SearchErrorContext {
        index: request.index().to_string(),
        uri: Some(uri.to_string()),
        client_context_id: request.client_context_id(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancellation::cancellation;
    use crate::interfaces::TransportResponse;
    use crate::node::SearchNode;
    use async_trait::async_trait;
    use http::StatusCode;
    use search_client_shared::QueryClause;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Mutex;

    /// Locator that always returns the same node, or none.
    struct MockLocator {
        node: Option<Arc<SearchNode>>,
    }

    impl MockLocator {
        fn with_node() -> (Arc<Self>, Arc<SearchNode>) {
            let node = Arc::new(SearchNode::search("http://10.0.0.1:8094").unwrap());
            (
                Arc::new(Self {
                    node: Some(node.clone()),
                }),
                node,
            )
        }
    }

    impl NodeLocator for MockLocator {
        fn pick_node(&self, _service: ServiceType) -> Result<Arc<SearchNode>, SearchError> {
            self.node
                .clone()
                .ok_or_else(|| SearchError::node_unavailable("mock has no nodes"))
        }
    }

    enum Behavior {
        Respond(StatusCode, &'static str),
        Fail(TransportError),
        Hang,
    }

    /// Transport that records requests and answers with a fixed behavior.
    struct MockTransport {
        behavior: Behavior,
        requests: Mutex<Vec<TransportRequest>>,
        calls: AtomicUsize,
    }

    impl MockTransport {
        fn new(behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                requests: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl SearchTransport for MockTransport {
        async fn send(
            &self,
            request: TransportRequest,
        ) -> Result<TransportResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().await.push(request);
            match &self.behavior {
                Behavior::Respond(status, body) => Ok(TransportResponse::new(*status, *body)),
                Behavior::Fail(err) => Err(err.clone()),
                Behavior::Hang => std::future::pending().await,
            }
        }
    }

    const OK_BODY: &str = r#"{"status":{"total":1,"failed":0,"successful":1},"hits":[{"index":"hotels_1","id":"hotel_1","score":0.9}],"total_hits":1,"max_score":0.9,"took":1000}"#;

    fn request() -> SearchRequest {
        SearchRequest::new("hotels", QueryClause::match_phrase("sea view").unwrap())
            .unwrap()
            .with_limit(10)
    }

    #[tokio::test]
    async fn test_execute_success() {
        let (locator, node) = MockLocator::with_node();
        let transport = MockTransport::new(Behavior::Respond(StatusCode::OK, OK_BODY));
        let executor = SearchExecutor::new(locator, transport.clone());
        let request = request();

        let result = executor
            .execute(&request, &CancellationSignal::none())
            .await
            .unwrap();

        assert_eq!(result.status(), Some(StatusCode::OK));
        assert!(!result.should_retry());
        assert_eq!(result.hits()[0].id, "hotel_1");
        assert_eq!(result.meta_data().total_hits, 1);
        assert!(node.last_used().is_some());

        let sent = transport.requests.lock().await;
        assert_eq!(
            sent[0].uri.as_str(),
            "http://10.0.0.1:8094/api/index/hotels/query"
        );
        assert_eq!(sent[0].content_type, "application/json; charset=utf-8");
        let body: Value = serde_json::from_slice(&sent[0].body).unwrap();
        assert_eq!(body, request.to_json());
        assert_eq!(body["query"], json!({"match_phrase": "sea view"}));
    }

    #[tokio::test]
    async fn test_execute_uses_default_timeout() {
        let (locator, _) = MockLocator::with_node();
        let transport = MockTransport::new(Behavior::Respond(StatusCode::OK, OK_BODY));
        let config = SearchClientConfig::default().with_default_timeout(Duration::from_secs(7));
        let executor = SearchExecutor::with_config(locator, transport.clone(), config);

        executor
            .execute(&request(), &CancellationSignal::none())
            .await
            .unwrap();
        executor
            .execute(
                &request().with_timeout(Duration::from_secs(2)),
                &CancellationSignal::none(),
            )
            .await
            .unwrap();

        let sent = transport.requests.lock().await;
        assert_eq!(sent[0].timeout, Duration::from_secs(7));
        assert_eq!(sent[1].timeout, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_execute_retry_worthy_is_not_an_error() {
        let (locator, node) = MockLocator::with_node();
        let transport = MockTransport::new(Behavior::Respond(
            StatusCode::TOO_MANY_REQUESTS,
            "rate limit exceeded",
        ));
        let executor = SearchExecutor::new(locator, transport);

        let result = executor
            .execute(&request(), &CancellationSignal::none())
            .await
            .unwrap();

        assert!(result.should_retry());
        assert_eq!(result.status(), Some(StatusCode::TOO_MANY_REQUESTS));
        assert_eq!(result.diagnostic(), Some("rate limit exceeded"));
        assert!(node.last_used().is_some());
    }

    #[tokio::test]
    async fn test_execute_error_status_keeps_status() {
        let (locator, node) = MockLocator::with_node();
        let transport = MockTransport::new(Behavior::Respond(
            StatusCode::BAD_REQUEST,
            "rest_index: Query, indexName: hotels, err: bleve: QueryBleve parsing",
        ));
        let executor = SearchExecutor::new(locator, transport);

        let result = executor
            .execute(&request(), &CancellationSignal::none())
            .await
            .unwrap();

        assert_eq!(result.status(), Some(StatusCode::BAD_REQUEST));
        assert!(!result.is_success());
        assert!(!result.should_retry());
        assert!(result.diagnostic().unwrap().contains("QueryBleve"));
        assert!(result.hits().is_empty());
        assert!(node.last_used().is_some());
    }

    #[tokio::test]
    async fn test_execute_cancelled_is_ambiguous_timeout() {
        let (locator, node) = MockLocator::with_node();
        let transport = MockTransport::new(Behavior::Hang);
        let executor = SearchExecutor::new(locator, transport.clone());
        let (handle, signal) = cancellation();

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            handle.cancel();
        });

        let err = executor.execute(&request(), &signal).await.unwrap_err();
        canceller.await.unwrap();

        assert!(matches!(err, SearchError::AmbiguousTimeout(_)));
        assert!(!err.is_retry_safe());
        assert_eq!(err.context().unwrap().index, "hotels");
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        assert!(node.last_used().is_none());
    }

    #[tokio::test]
    async fn test_execute_precancelled_is_ambiguous_timeout() {
        let (locator, _) = MockLocator::with_node();
        let transport = MockTransport::new(Behavior::Respond(StatusCode::OK, OK_BODY));
        let executor = SearchExecutor::new(locator, transport);
        let (handle, signal) = cancellation();
        handle.cancel();

        let err = executor.execute(&request(), &signal).await.unwrap_err();

        assert!(matches!(err, SearchError::AmbiguousTimeout(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_deadline_is_ambiguous_timeout() {
        let (locator, _) = MockLocator::with_node();
        let transport = MockTransport::new(Behavior::Hang);
        let executor = SearchExecutor::new(locator, transport);
        let request = request().with_timeout(Duration::from_secs(1));

        let err = executor
            .execute(&request, &CancellationSignal::none())
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::AmbiguousTimeout(_)));
        assert!(err.context().unwrap().reason.contains("1000ms"));
    }

    #[tokio::test]
    async fn test_execute_transport_timeout_is_ambiguous_timeout() {
        let (locator, _) = MockLocator::with_node();
        let transport =
            MockTransport::new(Behavior::Fail(TransportError::timeout("operation timed out")));
        let executor = SearchExecutor::new(locator, transport);

        let err = executor
            .execute(&request(), &CancellationSignal::none())
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::AmbiguousTimeout(_)));
    }

    #[tokio::test]
    async fn test_execute_truncated_response_is_ambiguous_timeout() {
        let (locator, node) = MockLocator::with_node();
        let transport = MockTransport::new(Behavior::Fail(TransportError::incomplete(
            "error decoding response body",
        )));
        let executor = SearchExecutor::new(locator, transport);

        let err = executor
            .execute(&request(), &CancellationSignal::none())
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::AmbiguousTimeout(_)));
        assert!(!err.is_retry_safe());
        assert!(node.last_used().is_none());
    }

    #[tokio::test]
    async fn test_execute_connection_failure_is_request_canceled() {
        for failure in [
            TransportError::connect("connection refused"),
            TransportError::network("connection reset by peer"),
        ] {
            let (locator, node) = MockLocator::with_node();
            let transport = MockTransport::new(Behavior::Fail(failure));
            let executor = SearchExecutor::new(locator, transport);

            let err = executor
                .execute(&request(), &CancellationSignal::none())
                .await
                .unwrap_err();

            assert!(matches!(err, SearchError::RequestCanceled(_)));
            assert!(err.is_retry_safe());
            assert_eq!(
                err.context().unwrap().uri.as_deref(),
                Some("http://10.0.0.1:8094/api/index/hotels/query")
            );
            assert!(node.last_used().is_none());
        }
    }

    #[tokio::test]
    async fn test_execute_unparseable_body_is_mapping_error() {
        let (locator, node) = MockLocator::with_node();
        let transport = MockTransport::new(Behavior::Respond(StatusCode::OK, "not json"));
        let executor = SearchExecutor::new(locator, transport);

        let err = executor
            .execute(&request(), &CancellationSignal::none())
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::MappingError(_)));
        assert!(node.last_used().is_none());
    }

    #[tokio::test]
    async fn test_execute_node_unavailable() {
        let locator = Arc::new(MockLocator { node: None });
        let transport = MockTransport::new(Behavior::Respond(StatusCode::OK, OK_BODY));
        let executor = SearchExecutor::new(locator, transport.clone());

        let err = executor
            .execute(&request(), &CancellationSignal::none())
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::NodeUnavailable(_)));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_execute_concurrent_requests() {
        let (locator, _) = MockLocator::with_node();
        let transport = MockTransport::new(Behavior::Respond(StatusCode::OK, OK_BODY));
        let executor = Arc::new(SearchExecutor::new(locator, transport.clone()));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let executor = executor.clone();
                tokio::spawn(async move {
                    executor
                        .execute(&request(), &CancellationSignal::none())
                        .await
                })
            })
            .collect();

        for task in tasks {
            assert!(task.await.unwrap().unwrap().is_success());
        }
        assert_eq!(transport.calls.load(Ordering::SeqCst), 8);
    }
}
