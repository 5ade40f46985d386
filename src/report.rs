//! The progress, cancellation and logging collaborator passed into every
//! codec call.
//!
//! Codecs never log through a global sink for anything the caller should see.
//! Instead, every `read`/`write` entry point takes a `&mut dyn Reporter` and
//! reports progress, polls for cancellation and emits warnings through it.
//! The default method implementations forward messages to `tracing`, so an
//! implementor only needs to override what it cares about.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};


/// Receives progress updates, warnings and errors from a codec and can ask
/// it to stop.
pub trait Reporter {
    /// Called when the total amount of work is unknown (`true`) or known
    /// again (`false`).
    fn set_indeterminate(&mut self, _indeterminate: bool) {}

    /// Called once the amount of work is known, usually with `min = 0` and
    /// `max` = number of records.
    fn set_bounds(&mut self, _min: u64, _max: u64) {}

    /// Called after each record with the number of records processed so far.
    fn update(&mut self, _position: u64) {}

    /// Polled between records. Returning `true` makes the codec abort with
    /// [`ErrorKind::Cancelled`][crate::io::ErrorKind::Cancelled].
    fn is_cancelled(&self) -> bool {
        false
    }

    fn warn(&mut self, msg: &str) {
        tracing::warn!("{}", msg);
    }

    fn error(&mut self, msg: &str) {
        tracing::error!("{}", msg);
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn set_indeterminate(&mut self, indeterminate: bool) {
        (**self).set_indeterminate(indeterminate)
    }
    fn set_bounds(&mut self, min: u64, max: u64) {
        (**self).set_bounds(min, max)
    }
    fn update(&mut self, position: u64) {
        (**self).update(position)
    }
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
    fn warn(&mut self, msg: &str) {
        (**self).warn(msg)
    }
    fn error(&mut self, msg: &str) {
        (**self).error(msg)
    }
}

/// Ignores progress, never cancels and forwards messages to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {}

/// A shared flag that can be set from another thread to cancel a running
/// codec call.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Wraps another reporter and additionally reports cancellation once the
/// given token is cancelled.
#[derive(Debug)]
pub struct Cancellable<R> {
    inner: R,
    token: CancelToken,
}

impl<R: Reporter> Cancellable<R> {
    pub fn new(inner: R, token: CancelToken) -> Self {
        Self { inner, token }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Reporter> Reporter for Cancellable<R> {
    fn set_indeterminate(&mut self, indeterminate: bool) {
        self.inner.set_indeterminate(indeterminate)
    }
    fn set_bounds(&mut self, min: u64, max: u64) {
        self.inner.set_bounds(min, max)
    }
    fn update(&mut self, position: u64) {
        self.inner.update(position)
    }
    fn is_cancelled(&self) -> bool {
        self.token.is_cancelled() || self.inner.is_cancelled()
    }
    fn warn(&mut self, msg: &str) {
        self.inner.warn(msg)
    }
    fn error(&mut self, msg: &str) {
        self.inner.error(msg)
    }
}
