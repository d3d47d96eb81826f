//! Chat history: every answered exchange, oldest first.

use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use time::format_description::well_known::Rfc3339;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub user_message: String,
    pub bot_message: String,
    pub created_at: String,
}

pub trait HistoryStore: Send + Sync {
    fn append(&self, user_message: &str, bot_message: &str) -> Result<ChatMessage>;
    fn list(&self) -> Result<Vec<ChatMessage>>;
}

/// Opens the sled-backed store at `path`, or an in-memory one when no path is given.
pub fn open_history(path: Option<&Path>) -> Result<Arc<dyn HistoryStore>> {
    match path {
        Some(p) => Ok(Arc::new(SledHistory::open(p)?)),
        None => Ok(Arc::new(MemoryHistory::default())),
    }
}

fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_else(|_| "".into())
}

#[derive(Default)]
pub struct MemoryHistory {
    messages: RwLock<Vec<ChatMessage>>,
}

impl HistoryStore for MemoryHistory {
    fn append(&self, user_message: &str, bot_message: &str) -> Result<ChatMessage> {
        let mut messages = self.messages.write();
        let msg = ChatMessage {
            id: messages.len() as u64 + 1,
            user_message: user_message.to_string(),
            bot_message: bot_message.to_string(),
            created_at: now_rfc3339(),
        };
        messages.push(msg.clone());
        Ok(msg)
    }

    fn list(&self) -> Result<Vec<ChatMessage>> { Ok(self.messages.read().clone()) }
}

/// Messages keyed by big-endian id so tree order is insertion order.
pub struct SledHistory {
    db: sled::Db,
    messages: sled::Tree,
}

impl SledHistory {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let db = sled::open(path).with_context(|| format!("opening history db {}", path.display()))?;
        let messages = db.open_tree("chat_messages")?;
        Ok(Self { db, messages })
    }
}

impl HistoryStore for SledHistory {
    fn append(&self, user_message: &str, bot_message: &str) -> Result<ChatMessage> {
        // generate_id starts at 0
        let id = self.db.generate_id()? + 1;
        let msg = ChatMessage {
            id,
            user_message: user_message.to_string(),
            bot_message: bot_message.to_string(),
            created_at: now_rfc3339(),
        };
        self.messages.insert(id.to_be_bytes(), bincode::serialize(&msg)?)?;
        self.messages.flush()?;
        Ok(msg)
    }

    fn list(&self) -> Result<Vec<ChatMessage>> {
        let mut out = Vec::new();
        for item in self.messages.iter() {
            let (_key, value) = item?;
            out.push(bincode::deserialize(&value)?);
        }
        Ok(out)
    }
}
