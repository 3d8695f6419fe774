use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::watch;
use tokio::time::interval;
use tonic::Status;

use crate::node::node_ref::NodeRef;
use crate::node::NodeState;

pub async fn stabilize_periodically(
    node: Arc<Mutex<NodeState>>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    info!("Starting up periodic stabilization thread");
    let mut ticker = interval(period);
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.changed() => break,
        }
        if let Err(err) = stabilize(&node).await {
            warn!("An error occurred during stabilization: {}", err);
        }
    }
}

/// One stabilization round: probe the successor's predecessor, adopt it if
/// it slotted in between, announce ourselves, and refresh the failover list
/// from the (possibly new) successor.
async fn stabilize(node: &Arc<Mutex<NodeState>>) -> Result<(), Status> {
    let (self_ref, successor) = {
        let node = node.lock().unwrap();
        (node.self_ref(), node.successor.clone())
    };

    let predecessor_of_successor = match successor.get_predecessor().await {
        Ok(x) => x,
        Err(err) => {
            fail_over(node, &successor);
            return Err(err);
        }
    };

    if let Some(x) = predecessor_of_successor {
        let mut node = node.lock().unwrap();
        if node.adopt_successor(x) {
            debug!("Updated successor to {:?} due to stabilization", node.successor);
        }
    }

    let successor = { node.lock().unwrap().successor.clone() };
    if successor.id != self_ref.id {
        successor.notify(&self_ref).await?;

        let successors_own = successor.get_successor_list().await?;
        let mut node = node.lock().unwrap();
        node.successor_list
            .update_from_successor(&successor, &successors_own);
    }
    Ok(())
}

/// The successor is unreachable: promote the next live successor-list entry,
/// or fall back to a single-node ring when the list is exhausted.
fn fail_over(node: &Arc<Mutex<NodeState>>, dead: &NodeRef) {
    let mut node = node.lock().unwrap();
    match node.successor_list.next_after(&dead.id) {
        Some(next) => {
            warn!("Successor {:?} unreachable, falling back to {:?}", dead, next);
            node.set_successor(next);
        }
        None => {
            warn!(
                "Successor {:?} unreachable and successor list exhausted, reverting to a single-node ring",
                dead
            );
            let self_ref = node.self_ref();
            node.set_successor(self_ref);
        }
    }
}
