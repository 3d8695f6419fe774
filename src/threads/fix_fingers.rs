use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{info, warn};
use tokio::sync::watch;
use tokio::time::interval;
use tonic::Status;

use crate::node::NodeState;

pub async fn fix_fingers_periodically(
    node: Arc<Mutex<NodeState>>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    info!("Starting up periodic fix fingers thread");
    let mut ticker = interval(period);
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.changed() => break,
        }
        if let Err(err) = fix_fingers(&node).await {
            warn!("An error occurred while fixing fingers: {}", err);
        }
    }
}

/// Re-resolve every finger through the regular lookup path. The lookup goes
/// through our own RPC server, so it takes the same route any peer would.
async fn fix_fingers(node: &Arc<Mutex<NodeState>>) -> Result<(), Status> {
    let (self_ref, starts) = {
        let node = node.lock().unwrap();
        (node.self_ref(), node.finger_table.starts.clone())
    };

    for (i, start) in starts.iter().enumerate() {
        let successor = self_ref.find_successor(start).await?;
        node.lock().unwrap().finger_table.fingers[i] = Some(successor);
    }
    Ok(())
}
