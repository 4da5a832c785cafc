//! In-memory conversation threads, one per coaching session.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::CoachError;
use crate::intake::Profile;
use crate::llm::ChatMessage;

/// One session's conversation.
#[derive(Debug, Clone)]
pub struct Thread {
    pub id: String,
    pub profile: Profile,
    /// User answers and assistant questions, oldest first. System prompts
    /// are not stored.
    pub messages: Vec<ChatMessage>,
    pub last_active: DateTime<Utc>,
}

/// Thread store shared by all requests.
pub struct ThreadStore {
    threads: RwLock<HashMap<String, Thread>>,
}

impl ThreadStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            threads: RwLock::new(HashMap::new()),
        })
    }

    /// Open a thread seeded with `first` and return its id.
    pub async fn create(&self, profile: Profile, first: ChatMessage) -> String {
        let id = format!("thread_{}", Uuid::new_v4().simple());
        let now = Utc::now();
        let thread = Thread {
            id: id.clone(),
            profile,
            messages: vec![first],
            last_active: now,
        };
        self.threads.write().await.insert(id.clone(), thread);
        info!(thread_id = %id, "Thread created");
        id
    }

    /// Append a message, refreshing the thread's activity time.
    pub async fn append(&self, id: &str, message: ChatMessage) -> Result<(), CoachError> {
        let mut threads = self.threads.write().await;
        let thread = threads
            .get_mut(id)
            .ok_or_else(|| CoachError::ThreadNotFound(id.to_string()))?;
        thread.messages.push(message);
        thread.last_active = Utc::now();
        debug!(thread_id = %id, messages = thread.messages.len(), "Message appended");
        Ok(())
    }

    /// Snapshot of a thread.
    pub async fn get(&self, id: &str) -> Result<Thread, CoachError> {
        self.threads
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| CoachError::ThreadNotFound(id.to_string()))
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.threads.read().await.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.threads.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.threads.read().await.is_empty()
    }

    /// Drop threads idle for longer than `max_idle`. Returns how many were
    /// removed.
    pub async fn prune_idle(&self, max_idle: Duration) -> usize {
        let Some(cutoff) = chrono::Duration::from_std(max_idle)
            .ok()
            .and_then(|idle| Utc::now().checked_sub_signed(idle))
        else {
            return 0;
        };
        let mut threads = self.threads.write().await;
        let before = threads.len();
        threads.retain(|_, t| t.last_active >= cutoff);
        let pruned = before - threads.len();
        if pruned > 0 {
            info!(count = pruned, remaining = threads.len(), "Pruned idle threads");
        }
        pruned
    }
}

/// Prune idle threads once a minute.
pub fn spawn_prune_task(store: Arc<ThreadStore>, max_idle: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            store.prune_idle(max_idle).await;
        }
    })
}
