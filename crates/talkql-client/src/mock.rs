//! Scripted query service for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use talkql_core::{TurnRequest, TurnResponse};

use crate::{ConnectionStatus, QueryService, ServiceError};

/// Mock query service with scripted replies.
///
/// Query replies are consumed in order; once the queue is empty every query
/// echoes the request text back as `query_result`. Call counters and the
/// last request are recorded so tests can assert on traffic.
#[derive(Debug)]
pub struct MockQueryService {
    status: Mutex<Result<ConnectionStatus, ServiceError>>,
    replies: Mutex<VecDeque<Result<TurnResponse, ServiceError>>>,
    disconnect_result: Mutex<Result<(), ServiceError>>,
    last_request: Mutex<Option<TurnRequest>>,
    status_calls: AtomicUsize,
    query_calls: AtomicUsize,
    disconnect_calls: AtomicUsize,
}

impl MockQueryService {
    /// A service that reports a connected `postgres` database named `shop`.
    pub fn new() -> Self {
        Self::with_status(Ok(ConnectionStatus::connected("postgres", Some("shop"))))
    }

    /// A service whose connection check returns `status`.
    pub fn with_status(status: Result<ConnectionStatus, ServiceError>) -> Self {
        Self {
            status: Mutex::new(status),
            replies: Mutex::new(VecDeque::new()),
            disconnect_result: Mutex::new(Ok(())),
            last_request: Mutex::new(None),
            status_calls: AtomicUsize::new(0),
            query_calls: AtomicUsize::new(0),
            disconnect_calls: AtomicUsize::new(0),
        }
    }

    /// Queue the reply for the next unanswered query.
    pub fn push_reply(&self, reply: Result<TurnResponse, ServiceError>) {
        self.replies
            .lock()
            .expect("replies mutex poisoned")
            .push_back(reply);
    }

    /// Set the result of every subsequent disconnect call.
    pub fn set_disconnect_result(&self, result: Result<(), ServiceError>) {
        *self
            .disconnect_result
            .lock()
            .expect("disconnect mutex poisoned") = result;
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    pub fn disconnect_calls(&self) -> usize {
        self.disconnect_calls.load(Ordering::SeqCst)
    }

    /// The most recent query request, if any.
    pub fn last_request(&self) -> Option<TurnRequest> {
        self.last_request
            .lock()
            .expect("request mutex poisoned")
            .clone()
    }
}

impl Default for MockQueryService {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryService for MockQueryService {
    async fn check_connection(&self) -> Result<ConnectionStatus, ServiceError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.status.lock().expect("status mutex poisoned").clone()
    }

    async fn query(&self, request: &TurnRequest) -> Result<TurnResponse, ServiceError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().expect("request mutex poisoned") = Some(request.clone());
        let scripted = self
            .replies
            .lock()
            .expect("replies mutex poisoned")
            .pop_front();
        scripted.unwrap_or_else(|| {
            Ok(TurnResponse {
                query_used: None,
                query_result: request.text.clone(),
                visualization_payload: None,
            })
        })
    }

    async fn disconnect(&self) -> Result<(), ServiceError> {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        self.disconnect_result
            .lock()
            .expect("disconnect mutex poisoned")
            .clone()
    }
}
