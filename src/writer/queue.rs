//! Message-oriented output. Broker clients are out of this crate's reach, so frames go
//! to an in-process [`QueueHub`] whose subscribers forward them wherever they like.

use super::{Writer, WriterCore};
use crate::error::Result;
use crate::filter::Filter;
use crate::fmt::Formatter;
use crate::internal;
use crate::logger::LogEvent;
use crate::serialize::Serializer;
use std::collections::{BTreeMap, HashMap};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One serialized event plus the writer's free-form properties.
#[derive(Debug, Clone)]
pub struct QueueMessage {
    pub topic: String,
    pub payload: Vec<u8>,
    pub properties: Arc<BTreeMap<String, String>>,
}

/// Topic -> subscribers. Cloning shares the same hub.
#[derive(Debug, Clone, Default)]
pub struct QueueHub {
    topics: Arc<Mutex<HashMap<String, Vec<Sender<QueueMessage>>>>>,
}

impl QueueHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<Sender<QueueMessage>>>> {
        self.topics.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self, topic: &str) -> Receiver<QueueMessage> {
        let (tx, rx) = mpsc::channel();
        self.lock().entry(topic.to_string()).or_default().push(tx);
        rx
    }

    /// Returns how many subscribers received the message; dropped receivers are pruned.
    pub fn publish(&self, message: &QueueMessage) -> usize {
        let mut topics = self.lock();
        let Some(subscribers) = topics.get_mut(&message.topic) else {
            return 0;
        };
        subscribers.retain(|tx| tx.send(message.clone()).is_ok());
        subscribers.len()
    }
}

pub struct QueueWriter {
    core: WriterCore,
    topic: String,
    serializer: Box<dyn Serializer>,
    properties: Arc<BTreeMap<String, String>>,
    hub: QueueHub,
}

impl std::fmt::Debug for QueueWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueWriter")
            .field("core", &self.core)
            .field("topic", &self.topic)
            .field("serializer", &self.serializer.type_name())
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}

impl QueueWriter {
    #[must_use]
    pub fn new(
        core: WriterCore,
        topic: impl Into<String>,
        serializer: Box<dyn Serializer>,
        properties: BTreeMap<String, String>,
        hub: QueueHub,
    ) -> Self {
        Self {
            core,
            topic: topic.into(),
            serializer,
            properties: Arc::new(properties),
            hub,
        }
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }
}

impl Writer for QueueWriter {
    fn name(&self) -> &str {
        self.core.name()
    }

    fn formatter(&self) -> &dyn Formatter {
        self.core.formatter()
    }

    fn filters(&self) -> &[Box<dyn Filter>] {
        self.core.filters()
    }

    fn write_through(&self, event: &LogEvent) -> Result<()> {
        let formatted = self.core.format(event);
        let message = QueueMessage {
            topic: self.topic.clone(),
            payload: self.serializer.serialize(event, &formatted)?,
            properties: Arc::clone(&self.properties),
        };
        if self.hub.publish(&message) == 0 {
            internal::trace("QUEUE", &format!("No subscribers on {}", self.topic));
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
