use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    #[default]
    Default,
    Destructive,
}

/// Transient message reporting the outcome of a user action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toast {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            description: description.into(),
            variant: ToastVariant::Default,
            created_at: Utc::now(),
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            variant: ToastVariant::Destructive,
            ..Self::new(title, description)
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == ToastVariant::Destructive
    }
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Shows `toast` and returns the id it was assigned.
    async fn notify(&self, toast: Toast) -> u64;
}

/// Bounded toast queue. When full, the oldest toast is dropped.
#[derive(Debug, Clone)]
pub struct Toaster {
    toasts: Arc<Mutex<VecDeque<Toast>>>,
    next_id: Arc<AtomicU64>,
    limit: usize,
}

impl Toaster {
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            toasts: Arc::new(Mutex::new(VecDeque::with_capacity(limit))),
            next_id: Arc::new(AtomicU64::new(1)),
            limit,
        }
    }

    pub async fn active(&self) -> Vec<Toast> {
        self.toasts.lock().await.iter().cloned().collect()
    }

    pub async fn dismiss(&self, id: u64) -> bool {
        let mut toasts = self.toasts.lock().await;
        let before = toasts.len();
        toasts.retain(|toast| toast.id != id);
        toasts.len() != before
    }

    /// Removes and returns everything queued, oldest first.
    pub async fn drain(&self) -> Vec<Toast> {
        self.toasts.lock().await.drain(..).collect()
    }
}

#[async_trait::async_trait]
impl Notifier for Toaster {
    async fn notify(&self, mut toast: Toast) -> u64 {
        toast.id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if toast.is_destructive() {
            warn!("{}: {}", toast.title, toast.description);
        } else {
            info!("{}: {}", toast.title, toast.description);
        }

        let mut toasts = self.toasts.lock().await;
        while toasts.len() >= self.limit {
            toasts.pop_front();
        }
        let id = toast.id;
        toasts.push_back(toast);
        id
    }
}

pub fn render_toast(toast: &Toast) -> String {
    let marker = match toast.variant {
        ToastVariant::Default => "✔",
        ToastVariant::Destructive => "✖",
    };
    format!("{} {}: {}", marker, toast.title, toast.description)
}
