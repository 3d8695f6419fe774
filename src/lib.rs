//! A Chord distributed hash table node.
//!
//! Each process keeps a partial view of a logical identifier ring
//! (successor, predecessor, finger table) and converges toward a consistent
//! ring through three periodic maintenance loops, while storing key/value
//! pairs at the successor of each key's SHA-1 identifier.

pub mod kv;
pub mod node;
pub mod threads;
pub mod utils;

use std::error::Error;
use std::sync::{Arc, Mutex};

use log::error;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;

use crate::node::NodeState;
use crate::threads::check_predecessor::check_predecessor_periodically;
use crate::threads::chord::chord_proto::chord_server::ChordServer;
use crate::threads::chord::ChordService;
use crate::threads::fix_fingers::fix_fingers_periodically;
use crate::threads::join::process_node_join;
use crate::threads::stabilize::stabilize_periodically;
use crate::utils::config::Config;
use crate::utils::types::Address;

/// A running node: the shared state plus the tasks operating on it.
pub struct NodeHandle {
    node: Arc<Mutex<NodeState>>,
    address: Address,
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl NodeHandle {
    pub fn node(&self) -> Arc<Mutex<NodeState>> {
        self.node.clone()
    }

    /// The address the node actually bound to (relevant when the
    /// configuration asked for port 0).
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Signal every task to stop at its next iteration boundary and wait
    /// for all of them to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        for task in self.tasks {
            let _ = task.await;
        }
    }
}

/// Bind the RPC server, create or join a ring, and start the maintenance
/// loops.
pub async fn start_node(config: Config) -> Result<NodeHandle, Box<dyn Error>> {
    let listener = TcpListener::bind(&config.bind_address).await?;
    // the node's identity is derived from the address it is actually
    // reachable at
    let address = listener.local_addr()?.to_string();
    let node = Arc::new(Mutex::new(NodeState::new(&address)));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let service = ChordService::new(node.clone());
    let mut server_shutdown = shutdown_rx.clone();
    let server = tokio::spawn(async move {
        let result = Server::builder()
            .add_service(ChordServer::new(service))
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), async move {
                let _ = server_shutdown.changed().await;
            })
            .await;
        if let Err(err) = result {
            error!("RPC server terminated: {}", err);
        }
    });

    if let Err(err) = process_node_join(&node, config.join_address.clone()).await {
        let _ = shutdown_tx.send(true);
        let _ = server.await;
        return Err(err);
    }

    let tasks = vec![
        server,
        tokio::spawn(stabilize_periodically(
            node.clone(),
            config.stabilize_interval,
            shutdown_rx.clone(),
        )),
        tokio::spawn(fix_fingers_periodically(
            node.clone(),
            config.fix_fingers_interval,
            shutdown_rx.clone(),
        )),
        tokio::spawn(check_predecessor_periodically(
            node.clone(),
            config.check_predecessor_interval,
            shutdown_rx,
        )),
    ];

    Ok(NodeHandle {
        node,
        address,
        shutdown: shutdown_tx,
        tasks,
    })
}
