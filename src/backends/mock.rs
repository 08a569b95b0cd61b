//! Mock backend for testing
//!
//! Serves queued responses in order and records every request it receives,
//! so tests can assert on call counts and on what would have been sent.

use super::{ApiRequest, ApiResponse, HttpMethod, ImageApiBackend, TransportError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A request seen by the mock backend
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: HttpMethod,
    pub path: String,
    pub request: ApiRequest,
}

enum MockReply {
    Response(ApiResponse),
    ConnectionFailure(String),
}

/// Mock transport with queued replies
pub struct MockBackend {
    replies: Mutex<VecDeque<MockReply>>,
    default_response: Mutex<Option<ApiResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockBackend {
    /// Create a mock with no queued replies
    #[must_use]
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            default_response: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that answers every request with the given image bytes
    #[must_use]
    pub fn always_image(bytes: Vec<u8>) -> Self {
        let backend = Self::new();
        backend.set_default(Self::image_response(bytes));
        backend
    }

    /// Successful image response
    #[must_use]
    pub fn image_response(bytes: Vec<u8>) -> ApiResponse {
        ApiResponse {
            status: 200,
            content_type: Some("image/png".to_string()),
            body: bytes,
        }
    }

    /// Successful JSON response
    #[must_use]
    pub fn json_response(value: &serde_json::Value) -> ApiResponse {
        ApiResponse {
            status: 200,
            content_type: Some("application/json".to_string()),
            body: serde_json::to_vec(value).unwrap_or_default(),
        }
    }

    /// Error response in the API's JSON error shape
    #[must_use]
    pub fn error_response(status: u16, message: &str) -> ApiResponse {
        let body = serde_json::json!({ "error": { "message": message } });
        ApiResponse {
            status,
            content_type: Some("application/json".to_string()),
            body: serde_json::to_vec(&body).unwrap_or_default(),
        }
    }

    /// Queue a response
    pub fn queue(&self, response: ApiResponse) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(MockReply::Response(response));
        }
    }

    /// Queue a successful image response
    pub fn queue_image(&self, bytes: Vec<u8>) {
        self.queue(Self::image_response(bytes));
    }

    /// Queue an error response
    pub fn queue_error(&self, status: u16, message: &str) {
        self.queue(Self::error_response(status, message));
    }

    /// Queue a connection failure
    pub fn queue_connection_failure(&self, message: &str) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(MockReply::ConnectionFailure(message.to_string()));
        }
    }

    /// Response returned once the queue is empty
    pub fn set_default(&self, response: ApiResponse) {
        if let Ok(mut default) = self.default_response.lock() {
            *default = Some(response);
        }
    }

    /// Number of requests received so far
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// All requests received so far
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// The most recent request, if any
    #[must_use]
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().ok().and_then(|r| r.last().cloned())
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageApiBackend for MockBackend {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                method: request.method,
                path: request.path.clone(),
                request,
            });
        }

        let queued = self.replies.lock().ok().and_then(|mut r| r.pop_front());
        match queued {
            Some(MockReply::Response(response)) => Ok(response),
            Some(MockReply::ConnectionFailure(message)) => {
                Err(TransportError::Connection { message })
            },
            None => self
                .default_response
                .lock()
                .ok()
                .and_then(|d| d.clone())
                .ok_or_else(|| TransportError::Connection {
                    message: "mock backend has no queued response".to_string(),
                }),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
