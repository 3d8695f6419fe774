pub mod conversions;
pub mod finger_table;
pub mod node_ref;
pub mod successor_list;

use crate::kv::hash_map_store::HashMapStore;
use crate::kv::kv_store::KVStore;
use crate::node::finger_table::FingerTable;
use crate::node::node_ref::NodeRef;
use crate::node::successor_list::SuccessorList;
use crate::utils::crypto::{hash, is_between, is_between_open, HashPos};
use crate::utils::types::Address;

/// The mutable per-process record. One mutex guards the whole struct;
/// callers snapshot what they need, drop the guard, and only then dial out.
/// The lock must never be held across a network call.
#[derive(Debug)]
pub struct NodeState {
    pub id: HashPos,
    pub address: Address,
    pub successor: NodeRef,
    pub successor_list: SuccessorList,
    pub predecessor: Option<NodeRef>,
    pub finger_table: FingerTable,
    pub files: Box<dyn KVStore + Send>,
}

impl NodeState {
    /// A fresh node is a ring of one: its own successor, no predecessor.
    pub fn new(address: &Address) -> NodeState {
        let id = hash(address.as_bytes());
        let self_ref = NodeRef::with_id(id.clone(), address.clone());
        NodeState {
            id: id.clone(),
            address: address.clone(),
            successor: self_ref.clone(),
            successor_list: SuccessorList::new(&id, &self_ref),
            predecessor: None,
            finger_table: FingerTable::new(&id),
            files: Box::new(HashMapStore::default()),
        }
    }

    pub fn self_ref(&self) -> NodeRef {
        NodeRef::with_id(self.id.clone(), self.address.clone())
    }

    /// Replace the successor and reseed the failover list with it.
    pub fn set_successor(&mut self, successor: NodeRef) {
        self.successor_list = SuccessorList::new(&self.id, &successor);
        self.successor = successor;
    }

    /// The terminating test of a lookup: a lone node owns the whole ring,
    /// and any id on (self, successor] belongs to the successor.
    pub fn successor_covers(&self, id: &HashPos) -> bool {
        self.successor.id == self.id || is_between(&self.id, id, &self.successor.id)
    }

    /// Notify acceptance: adopt the candidate iff no predecessor is known,
    /// or it lies on (predecessor, self]. Re-announcing the current
    /// predecessor changes nothing.
    pub fn consider_predecessor(&mut self, candidate: NodeRef) -> bool {
        let accept = match &self.predecessor {
            None => true,
            Some(predecessor) => is_between(&predecessor.id, &candidate.id, &self.id),
        };
        if accept {
            self.predecessor = Some(candidate);
        }
        accept
    }

    /// Stabilize adoption: x (the successor's predecessor) supersedes the
    /// current successor iff it sits between us and it.
    pub fn adopt_successor(&mut self, x: NodeRef) -> bool {
        if x.id != self.successor.id && is_between(&self.id, &x.id, &self.successor.id) {
            self.set_successor(x);
            return true;
        }
        false
    }

    /// The finger closest before the target, for forwarding a lookup past
    /// as much of the ring as possible. Falls back to the successor, so the
    /// plain hop-by-hop route always remains available.
    pub fn closest_preceding_node(&self, id: &HashPos) -> NodeRef {
        for finger in self.finger_table.fingers.iter().rev() {
            if let Some(node) = finger {
                if node.id != self.id && is_between_open(&self.id, &node.id, id) {
                    return node.clone();
                }
            }
        }
        self.successor.clone()
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;

    use super::*;

    fn node(id: u32) -> NodeRef {
        NodeRef::with_id(BigUint::from(id), format!("127.0.0.1:{}", 9000 + id))
    }

    fn state(id: u32) -> NodeState {
        let address = format!("127.0.0.1:{}", 9000 + id);
        let id = BigUint::from(id);
        let self_ref = NodeRef::with_id(id.clone(), address.clone());
        NodeState {
            id: id.clone(),
            address,
            successor: self_ref.clone(),
            successor_list: SuccessorList::new(&id, &self_ref),
            predecessor: None,
            finger_table: FingerTable::new(&id),
            files: Box::new(crate::kv::hash_map_store::HashMapStore::default()),
        }
    }

    #[test]
    fn a_lone_node_covers_every_id() {
        let state = state(3);
        assert!(state.successor_covers(&BigUint::from(99u32)));
        assert!(state.successor_covers(&BigUint::from(3u32)));
    }

    #[test]
    fn coverage_follows_the_successor_arc() {
        let mut state = state(3);
        state.set_successor(node(7));
        assert!(state.successor_covers(&BigUint::from(5u32)));
        assert!(state.successor_covers(&BigUint::from(7u32)));
        assert!(!state.successor_covers(&BigUint::from(8u32)));
        assert!(!state.successor_covers(&BigUint::from(3u32)));
    }

    #[test]
    fn notify_is_idempotent() {
        let mut state = state(7);
        assert!(state.consider_predecessor(node(3)));
        // the same announcement again is a no-op
        assert!(!state.consider_predecessor(node(3)));
        assert_eq!(state.predecessor, Some(node(3)));
    }

    #[test]
    fn notify_only_moves_the_predecessor_forward() {
        let mut state = state(7);
        assert!(state.consider_predecessor(node(3)));
        // 5 is closer to 7 than 3 is, so it wins
        assert!(state.consider_predecessor(node(5)));
        // 3 no longer qualifies
        assert!(!state.consider_predecessor(node(3)));
        assert_eq!(state.predecessor, Some(node(5)));
    }

    #[test]
    fn stabilize_adopts_a_node_that_slotted_in() {
        let mut state = state(3);
        state.set_successor(node(7));
        assert!(state.adopt_successor(node(5)));
        assert_eq!(state.successor, node(5));
        // re-announcing the current successor changes nothing
        assert!(!state.adopt_successor(node(5)));
        // a node beyond the successor is ignored
        assert!(!state.adopt_successor(node(9)));
    }

    #[test]
    fn a_lone_node_adopts_any_probed_predecessor() {
        let mut state = state(3);
        assert!(state.adopt_successor(node(7)));
        assert_eq!(state.successor, node(7));
    }

    #[test]
    fn closest_preceding_node_picks_the_highest_qualifying_finger() {
        let mut state = state(0);
        state.set_successor(node(10));
        state.finger_table.fingers[0] = Some(node(10));
        state.finger_table.fingers[5] = Some(node(60));
        state.finger_table.fingers[7] = Some(node(200));

        // target 100: finger 60 precedes it, 200 does not
        assert_eq!(state.closest_preceding_node(&BigUint::from(100u32)), node(60));
        // target 5: no finger on (0, 5), fall back to the successor
        assert_eq!(state.closest_preceding_node(&BigUint::from(5u32)), node(10));
    }
}
