//! Runs one request cycle off the UI thread and reports back as an `Action`.
//!
//! Every spawned turn reports exactly one outcome. If the task dies before
//! reporting (panic, runtime shutdown), `TurnGuard` sends `RequestFailed` on
//! drop so the waiting flag can never stick.

use std::sync::Arc;
use std::sync::mpsc;

use log::{info, warn};

use crate::core::action::{Action, TurnRequest};
use crate::recommend::RecommendationService;

/// Performs the request for `request` and maps the result to an action.
pub async fn resolve_turn(service: &dyn RecommendationService, request: &TurnRequest) -> Action {
    match service.recommend(&request.query).await {
        Ok(recommendation) => Action::ResponseReceived {
            turn: request.turn,
            recommendation,
        },
        Err(e) => Action::RequestFailed {
            turn: request.turn,
            error: e.to_string(),
        },
    }
}

struct TurnGuard {
    turn: u64,
    tx: mpsc::Sender<Action>,
    reported: bool,
}

impl TurnGuard {
    fn report(&mut self, action: Action) {
        self.reported = true;
        if self.tx.send(action).is_err() {
            warn!("Failed to report turn {}: receiver dropped", self.turn);
        }
    }
}

impl Drop for TurnGuard {
    fn drop(&mut self) {
        if !self.reported {
            warn!("Turn {} ended without a result", self.turn);
            let _ = self.tx.send(Action::RequestFailed {
                turn: self.turn,
                error: "request task ended without a result".to_string(),
            });
        }
    }
}

/// Spawns the request for `request` on the tokio runtime.
pub fn spawn_turn(
    service: Arc<dyn RecommendationService>,
    request: TurnRequest,
    tx: mpsc::Sender<Action>,
) -> tokio::task::JoinHandle<()> {
    info!("Spawning request for turn {} via {}", request.turn, service.name());
    tokio::spawn(async move {
        let mut guard = TurnGuard {
            turn: request.turn,
            tx,
            reported: false,
        };
        let action = resolve_turn(service.as_ref(), &request).await;
        guard.report(action);
    })
}
