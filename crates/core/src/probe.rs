//! Endpoint probing
//!
//! The backend is not consistent about where a resource lives, so reads walk
//! an ordered list of candidate requests until one produces a valid record.
//! Recoverable failures (not found, wrong shape, client errors, transport
//! hiccups) advance to the next candidate; authentication and server
//! failures surface immediately because every other candidate would fail the
//! same way.

use std::future::Future;

use actasti_domain::{ActasError, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{debug, warn};

type CandidateRequest<'a, P> = Box<dyn FnOnce() -> BoxFuture<'a, Result<P>> + Send + 'a>;

struct Candidate<'a, P> {
    label: String,
    request: CandidateRequest<'a, P>,
}

/// Ordered chain of candidate requests for one logical read
///
/// `P` is the raw payload type: JSON for records, bytes for documents.
pub struct EndpointProber<'a, P> {
    entity: String,
    not_found_message: Option<String>,
    candidates: Vec<Candidate<'a, P>>,
}

impl<'a, P: Send + 'a> EndpointProber<'a, P> {
    pub fn new(entity: impl Into<String>) -> Self {
        Self { entity: entity.into(), not_found_message: None, candidates: Vec::new() }
    }

    /// Message of the `NotFound` error returned when every candidate fails.
    pub fn not_found_message(mut self, message: impl Into<String>) -> Self {
        self.not_found_message = Some(message.into());
        self
    }

    /// Append a candidate; it is only invoked if every earlier one failed.
    pub fn candidate<F, Fut>(mut self, label: impl Into<String>, request: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'a,
        Fut: Future<Output = Result<P>> + Send + 'a,
    {
        self.candidates.push(Candidate {
            label: label.into(),
            request: Box::new(move || request().boxed()),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Walk the candidates in order and return the first normalized success.
    ///
    /// # Errors
    ///
    /// Returns the first abort-class error encountered, or `NotFound` once
    /// every candidate has been tried.
    pub async fn resolve<T, N>(self, mut normalize: N) -> Result<T>
    where
        N: FnMut(P) -> Result<T> + Send,
        T: Send,
    {
        let total = self.candidates.len();
        let mut last_error: Option<ActasError> = None;

        for (index, candidate) in self.candidates.into_iter().enumerate() {
            let outcome = (candidate.request)().await.and_then(&mut normalize);
            match outcome {
                Ok(value) => {
                    debug!(
                        entity = %self.entity,
                        candidate = %candidate.label,
                        attempt = index + 1,
                        total,
                        "Candidate endpoint resolved"
                    );
                    return Ok(value);
                }
                Err(err) if err.aborts_probe_chain() => {
                    warn!(
                        entity = %self.entity,
                        candidate = %candidate.label,
                        error = %err,
                        "Aborting candidate chain"
                    );
                    return Err(err);
                }
                Err(err) => {
                    debug!(
                        entity = %self.entity,
                        candidate = %candidate.label,
                        error = %err,
                        "Candidate failed, advancing"
                    );
                    last_error = Some(err);
                }
            }
        }

        let message = self.not_found_message.unwrap_or_else(|| match last_error {
            Some(err) => format!("{} not found after {total} candidates (last: {err})", self.entity),
            None => format!("{} not found: no candidates", self.entity),
        });
        Err(ActasError::NotFound(message))
    }
}
