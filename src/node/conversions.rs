use num_bigint::BigUint;

use crate::node::node_ref::NodeRef;
use crate::node::successor_list::SuccessorList;
use crate::threads::chord::chord_proto::{
    HashPosMsg, NodeRefMsg, PredecessorMsg, SuccessorListMsg,
};
use crate::utils::crypto::{ring_size, HashPos};

impl Into<NodeRefMsg> for NodeRef {
    fn into(self) -> NodeRefMsg {
        NodeRefMsg {
            id: self.id.to_bytes_be(),
            address: self.address,
        }
    }
}

impl Into<NodeRefMsg> for &NodeRef {
    fn into(self) -> NodeRefMsg {
        self.clone().into()
    }
}

impl Into<NodeRef> for NodeRefMsg {
    fn into(self) -> NodeRef {
        NodeRef {
            // reduce whatever a peer sent back onto the ring
            id: BigUint::from_bytes_be(&self.id) % ring_size(),
            address: self.address,
        }
    }
}

impl Into<NodeRef> for &NodeRefMsg {
    fn into(self) -> NodeRef {
        self.clone().into()
    }
}

impl Into<HashPosMsg> for HashPos {
    fn into(self) -> HashPosMsg {
        HashPosMsg {
            id: self.to_bytes_be(),
        }
    }
}

impl Into<HashPosMsg> for &HashPos {
    fn into(self) -> HashPosMsg {
        self.clone().into()
    }
}

impl Into<HashPos> for HashPosMsg {
    fn into(self) -> HashPos {
        BigUint::from_bytes_be(&self.id) % ring_size()
    }
}

impl Into<PredecessorMsg> for Option<NodeRef> {
    fn into(self) -> PredecessorMsg {
        PredecessorMsg {
            node: self.map(|node| node.into()),
        }
    }
}

impl Into<Option<NodeRef>> for PredecessorMsg {
    fn into(self) -> Option<NodeRef> {
        self.node.map(|node| node.into())
    }
}

impl Into<SuccessorListMsg> for &SuccessorList {
    fn into(self) -> SuccessorListMsg {
        SuccessorListMsg {
            successors: self.successors.iter().map(|entry| entry.into()).collect(),
        }
    }
}

impl Into<Vec<NodeRef>> for SuccessorListMsg {
    fn into(self) -> Vec<NodeRef> {
        self.successors.into_iter().map(|entry| entry.into()).collect()
    }
}
