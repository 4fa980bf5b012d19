//! Async task management for non-blocking API operations.
//!
//! Requests run in background tokio tasks while the UI keeps drawing. Each
//! task sends an `ApiMessage` through an unbounded channel, and the main
//! loop drains it with `try_recv()` between frames.
//!
//! To add a new async operation:
//! 1. Add a variant to `ApiMessage` for the result
//! 2. Add a spawn method to `TaskSpawner`
//! 3. Handle the message in `App::handle_api_message`

use tokio::sync::mpsc;
use tracing::trace;

use crate::api::{ApiError, Candidate, PokedexClient, PokemonPage};
use crate::suggest::{QueryTicket, RequestToken};

/// Messages sent from background tasks to the main event loop.
#[derive(Debug)]
pub enum ApiMessage {
    /// Autocomplete candidates for the request identified by `token`.
    SuggestionsFetched {
        token: RequestToken,
        result: Result<Vec<Candidate>, ApiError>,
    },

    /// Page document for `identifier`.
    PageFetched {
        identifier: String,
        result: Result<PokemonPage, ApiError>,
    },

    /// Identifier chosen by the server's random pick.
    RandomPicked { result: Result<String, ApiError> },
}

/// Spawns API tasks that report back through a channel.
#[derive(Clone)]
pub struct TaskSpawner {
    tx: mpsc::UnboundedSender<ApiMessage>,
}

impl TaskSpawner {
    /// Create a new task spawner with the given channel sender.
    pub fn new(tx: mpsc::UnboundedSender<ApiMessage>) -> Self {
        Self { tx }
    }

    /// Spawn a suggestion request for a ticket issued by the controller.
    ///
    /// The ticket's cancellation token aborts the request when a newer
    /// query supersedes it; the cancelled outcome is still reported.
    pub fn spawn_suggest(&self, client: &PokedexClient, ticket: QueryTicket) {
        let tx = self.tx.clone();
        let client = client.clone();
        tokio::spawn(async move {
            let QueryTicket {
                token,
                query,
                cancel,
            } = ticket;
            let result = client.suggest(&query, &cancel).await;
            trace!(%token, ok = result.is_ok(), "Suggestion task finished");
            let _ = tx.send(ApiMessage::SuggestionsFetched { token, result });
        });
    }

    /// Spawn a task to fetch a Pokémon page.
    pub fn spawn_fetch_page(&self, client: &PokedexClient, identifier: String) {
        let tx = self.tx.clone();
        let client = client.clone();
        tokio::spawn(async move {
            let result = client.get_page(&identifier).await;
            let _ = tx.send(ApiMessage::PageFetched { identifier, result });
        });
    }

    /// Spawn a task asking the server for a random Pokémon.
    pub fn spawn_random(&self, client: &PokedexClient) {
        let tx = self.tx.clone();
        let client = client.clone();
        tokio::spawn(async move {
            let result = client.random_identifier().await;
            let _ = tx.send(ApiMessage::RandomPicked { result });
        });
    }
}

/// Create a new task channel and spawner.
///
/// Returns a tuple of (receiver, spawner). The receiver should be polled
/// in the main event loop, and the spawner should be used to spawn tasks.
pub fn create_task_channel() -> (mpsc::UnboundedReceiver<ApiMessage>, TaskSpawner) {
    let (tx, rx) = mpsc::unbounded_channel();
    (rx, TaskSpawner::new(tx))
}
