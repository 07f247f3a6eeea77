use crate::format;
use crate::router::Router;
use crate::types::Message;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

/// Append-only message thread in front of the router.
///
/// Submissions are answered one at a time; a submission that arrives while
/// another is pending waits for it to finish.
pub struct ChatSession {
    router: Arc<Router>,
    messages: Mutex<Vec<Message>>,
    in_flight: tokio::sync::Mutex<()>,
}

impl ChatSession {
    pub fn new(router: Arc<Router>) -> Self {
        Self {
            router,
            messages: Mutex::new(vec![Message::bot(format::WELCOME)]),
            in_flight: tokio::sync::Mutex::new(()),
        }
    }

    /// Append `text` and the bot's answer. Blank input is ignored.
    pub async fn submit(&self, text: &str) -> Option<Message> {
        if text.trim().is_empty() {
            return None;
        }

        let _turn = self.in_flight.lock().await;

        self.push(Message::user(text));
        info!("Received chat message ({} chars)", text.len());

        let reply = Message::bot(self.router.respond(text).await);
        self.push(reply.clone());

        Some(reply)
    }

    /// Snapshot of the thread in insertion order
    pub fn messages(&self) -> Vec<Message> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn remaining_requests(&self) -> u32 {
        self.router.gateway().limiter().remaining()
    }

    pub fn max_requests(&self) -> u32 {
        self.router.gateway().limiter().max_requests()
    }

    fn push(&self, message: Message) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message);
    }
}
