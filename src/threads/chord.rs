use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, info};
use tokio::time::sleep;
use tonic::transport::{Channel, Endpoint};
use tonic::{Request, Response, Status};

use crate::node::node_ref::NodeRef;
use crate::node::NodeState;
use crate::threads::chord::chord_proto::chord_client::ChordClient;
use crate::threads::chord::chord_proto::chord_server::Chord;
use crate::threads::chord::chord_proto::{
    Ack, Empty, FileMsg, FingerMsg, HashPosMsg, NodeRefMsg, NodeSummaryMsg, PredecessorMsg,
    SuccessorListMsg,
};
use crate::utils::constants::{
    CONNECTION_RETRY_ATTEMPTS, CONNECTION_RETRY_UPON_FAILURE_MILLIS, CONNECT_TIMEOUT_MILLIS,
    RPC_TIMEOUT_MILLIS,
};
use crate::utils::crypto::HashPos;
use crate::utils::types::Address;

pub mod chord_proto {
    tonic::include_proto!("chord");
}

/// Dial a peer with bounded connect and per-call timeouts.
pub async fn connect(address: &Address) -> Result<ChordClient<Channel>, tonic::transport::Error> {
    let channel = Endpoint::from_shared(format!("http://{}", address))?
        .connect_timeout(Duration::from_millis(CONNECT_TIMEOUT_MILLIS))
        .timeout(Duration::from_millis(RPC_TIMEOUT_MILLIS))
        .connect()
        .await?;
    Ok(ChordClient::new(channel))
}

pub async fn connect_with_retry(
    address: &Address,
) -> Result<ChordClient<Channel>, tonic::transport::Error> {
    let mut attempts = 0;
    loop {
        match connect(address).await {
            Ok(client) => return Ok(client),
            Err(err) => {
                attempts += 1;
                if attempts >= CONNECTION_RETRY_ATTEMPTS {
                    return Err(err);
                }
                debug!("Connection to {} failed, retrying...", address);
                sleep(Duration::from_millis(CONNECTION_RETRY_UPON_FAILURE_MILLIS)).await;
            }
        }
    }
}

pub struct ChordService {
    node: Arc<Mutex<NodeState>>,
}

impl ChordService {
    pub fn new(node: Arc<Mutex<NodeState>>) -> ChordService {
        ChordService { node }
    }
}

#[tonic::async_trait]
impl Chord for ChordService {
    async fn find_successor(
        &self,
        request: Request<HashPosMsg>,
    ) -> Result<Response<NodeRefMsg>, Status> {
        let id: HashPos = request.into_inner().into();

        let next_hop = {
            let node = self.node.lock().unwrap();
            if node.successor_covers(&id) {
                debug!(
                    "Received find_successor call for {:x}, successor is {:?}",
                    id, node.successor
                );
                return Ok(Response::new((&node.successor).into()));
            }
            node.closest_preceding_node(&id)
        };

        // forward the lookup with the lock released
        let successor = next_hop.find_successor(&id).await?;
        Ok(Response::new(successor.into()))
    }

    async fn get_predecessor(
        &self,
        _request: Request<Empty>,
    ) -> Result<Response<PredecessorMsg>, Status> {
        let predecessor = self.node.lock().unwrap().predecessor.clone();
        Ok(Response::new(predecessor.into()))
    }

    async fn notify(&self, request: Request<NodeRefMsg>) -> Result<Response<Empty>, Status> {
        let candidate: NodeRef = request.into_inner().into();
        if candidate.address.is_empty() {
            return Err(Status::invalid_argument("candidate address must not be empty"));
        }
        let updated = self.node.lock().unwrap().consider_predecessor(candidate);
        if updated {
            debug!("Updated predecessor due to notify call");
        }
        Ok(Response::new(Empty {}))
    }

    async fn receive_file(&self, request: Request<FileMsg>) -> Result<Response<Ack>, Status> {
        let FileMsg { key, content } = request.into_inner();
        if key.is_empty() {
            return Err(Status::invalid_argument("file key must not be empty"));
        }
        info!("Storing key '{}' ({} bytes)", key, content.len());
        self.node.lock().unwrap().files.put(&key, content);
        Ok(Response::new(Ack { ok: true }))
    }

    async fn get_successor_list(
        &self,
        _request: Request<Empty>,
    ) -> Result<Response<SuccessorListMsg>, Status> {
        let node = self.node.lock().unwrap();
        Ok(Response::new((&node.successor_list).into()))
    }

    async fn health(&self, _request: Request<Empty>) -> Result<Response<Empty>, Status> {
        Ok(Response::new(Empty {}))
    }

    async fn get_node_summary(
        &self,
        _request: Request<Empty>,
    ) -> Result<Response<NodeSummaryMsg>, Status> {
        let node = self.node.lock().unwrap();
        let fingers = node
            .finger_table
            .starts
            .iter()
            .zip(node.finger_table.fingers.iter())
            .map(|(start, finger)| FingerMsg {
                start: start.to_bytes_be(),
                node: finger.as_ref().map(|entry| entry.into()),
            })
            .collect();
        Ok(Response::new(NodeSummaryMsg {
            node: Some(node.self_ref().into()),
            successor: Some((&node.successor).into()),
            predecessor: Some(node.predecessor.clone().into()),
            successor_list: node
                .successor_list
                .successors
                .iter()
                .map(|entry| entry.into())
                .collect(),
            fingers,
            stored_keys: node.files.len() as u32,
        }))
    }
}
