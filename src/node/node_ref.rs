use std::fmt;
use std::fmt::Debug;

use tonic::transport::Channel;
use tonic::{Request, Status};

use crate::threads::chord::chord_proto::chord_client::ChordClient;
use crate::threads::chord::chord_proto::{Empty, FileMsg, HashPosMsg};
use crate::threads::chord::connect;
use crate::utils::crypto::{hash, HashPos};
use crate::utils::types::{Address, Value};

/// A reference to a peer on the ring: its identifier plus the address it can
/// be dialed at. NodeRefs are plain values; they never own the remote node.
#[derive(Clone, PartialEq, Eq)]
pub struct NodeRef {
    pub id: HashPos,
    pub address: Address,
}

impl Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x} ({})", self.id, self.address)
    }
}

impl NodeRef {
    pub fn new(address: &Address) -> Self {
        NodeRef {
            id: hash(address.as_bytes()),
            address: address.clone(),
        }
    }

    pub fn with_id(id: HashPos, address: Address) -> Self {
        NodeRef { id, address }
    }

    /// Ask this peer for the node responsible for `id`.
    pub async fn find_successor(&self, id: &HashPos) -> Result<NodeRef, Status> {
        let mut client = self.dial().await?;
        let response = client
            .find_successor(Request::new(HashPosMsg { id: id.to_bytes_be() }))
            .await?;
        Ok(response.into_inner().into())
    }

    /// Ask this peer for its predecessor, if it knows one.
    pub async fn get_predecessor(&self) -> Result<Option<NodeRef>, Status> {
        let mut client = self.dial().await?;
        let response = client.get_predecessor(Request::new(Empty {})).await?;
        Ok(response.into_inner().into())
    }

    /// Offer `candidate` to this peer as its possible new predecessor.
    pub async fn notify(&self, candidate: &NodeRef) -> Result<(), Status> {
        let mut client = self.dial().await?;
        client.notify(Request::new(candidate.into())).await?;
        Ok(())
    }

    /// Deposit one key/value pair on this peer.
    pub async fn receive_file(&self, key: &str, content: Value) -> Result<(), Status> {
        let mut client = self.dial().await?;
        let response = client
            .receive_file(Request::new(FileMsg {
                key: key.to_string(),
                content,
            }))
            .await?;
        if !response.into_inner().ok {
            return Err(Status::internal(format!(
                "node {} did not acknowledge the file",
                self.address
            )));
        }
        Ok(())
    }

    /// Fetch this peer's successor list.
    pub async fn get_successor_list(&self) -> Result<Vec<NodeRef>, Status> {
        let mut client = self.dial().await?;
        let response = client.get_successor_list(Request::new(Empty {})).await?;
        Ok(response.into_inner().into())
    }

    /// Liveness ping.
    pub async fn health(&self) -> Result<(), Status> {
        let mut client = self.dial().await?;
        client.health(Request::new(Empty {})).await?;
        Ok(())
    }

    async fn dial(&self) -> Result<ChordClient<Channel>, Status> {
        connect(&self.address).await.map_err(|err| {
            Status::unavailable(format!("failed to connect to {}: {}", self.address, err))
        })
    }
}
