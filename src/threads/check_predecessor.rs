use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, info};
use tokio::sync::watch;
use tokio::time::interval;

use crate::node::NodeState;

/// Periodically ping the predecessor. Clearing the pointer on failure makes
/// room for a live node's notify to re-establish it.
pub async fn check_predecessor_periodically(
    node: Arc<Mutex<NodeState>>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    info!("Starting up periodic predecessor health check thread");
    let mut ticker = interval(period);
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.changed() => break,
        }

        let predecessor = { node.lock().unwrap().predecessor.clone() };
        if let Some(predecessor) = predecessor {
            match predecessor.health().await {
                Ok(()) => debug!("Predecessor node healthy"),
                Err(_) => {
                    debug!("Predecessor {:?} unavailable, clearing predecessor", predecessor);
                    node.lock().unwrap().predecessor = None;
                }
            }
        }
    }
}
