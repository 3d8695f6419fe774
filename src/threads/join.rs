use std::error::Error;
use std::sync::{Arc, Mutex};

use log::info;
use tonic::Request;

use crate::node::node_ref::NodeRef;
use crate::node::NodeState;
use crate::threads::chord::connect_with_retry;
use crate::utils::types::Address;

/// Bootstrap path: either create a new ring, or ask a running peer for our
/// successor and announce ourselves to it. No keys move at join time;
/// ownership converges through stabilization.
pub async fn process_node_join(
    node: &Arc<Mutex<NodeState>>,
    join_address: Option<Address>,
) -> Result<(), Box<dyn Error>> {
    let self_ref = { node.lock().unwrap().self_ref() };

    match join_address {
        Some(peer_address) => {
            info!("Joining existing ring via {}", peer_address);
            let mut peer_client = connect_with_retry(&peer_address).await?;
            let response = peer_client
                .find_successor(Request::new((&self_ref.id).into()))
                .await?;
            let successor: NodeRef = response.into_inner().into();
            info!("Our successor is {:?}", successor);

            {
                node.lock().unwrap().set_successor(successor.clone());
            }
            successor.notify(&self_ref).await?;
        }
        None => {
            info!("Creating a new ring");
        }
    }
    Ok(())
}
