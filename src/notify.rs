//! Transient notifications ("toasts") shared by the cart and the player.
//!
//! Both managers push into the same queue through a cloned `Notifier`; the UI
//! shows the most recent toast until it expires.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const MAX_TOASTS: usize = 16;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub raised_at: Instant,
}

#[derive(Debug)]
struct ToastQueue {
    toasts: VecDeque<Toast>,
    ttl: Duration,
}

/// Cloneable handle onto a shared toast queue.
#[derive(Debug, Clone)]
pub struct Notifier {
    queue: Arc<Mutex<ToastQueue>>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(Duration::from_millis(3000))
    }
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self {
            queue: Arc::new(Mutex::new(ToastQueue {
                toasts: VecDeque::new(),
                ttl,
            })),
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(ToastKind::Info, message.into());
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastKind::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastKind::Error, message.into());
    }

    fn push(&self, kind: ToastKind, message: String) {
        tracing::debug!(?kind, %message, "notification");
        if let Ok(mut q) = self.queue.lock() {
            if q.toasts.len() == MAX_TOASTS {
                q.toasts.pop_front();
            }
            q.toasts.push_back(Toast {
                message,
                kind,
                raised_at: Instant::now(),
            });
        }
    }

    /// Drop toasts older than the configured lifetime.
    pub fn expire(&self, now: Instant) {
        if let Ok(mut q) = self.queue.lock() {
            let ttl = q.ttl;
            q.toasts
                .retain(|t| now.saturating_duration_since(t.raised_at) < ttl);
        }
    }

    /// The most recent toast still on screen.
    pub fn latest(&self) -> Option<Toast> {
        self.queue.lock().ok().and_then(|q| q.toasts.back().cloned())
    }

    /// Messages currently queued, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.queue
            .lock()
            .map(|q| q.toasts.iter().map(|t| t.message.clone()).collect())
            .unwrap_or_default()
    }
}
