use crate::node::node_ref::NodeRef;
use crate::utils::crypto::HashPos;

pub const SUCCESSOR_LIST_SIZE: usize = 2;

/// The immediate successors of a node, first entry the direct successor.
/// Entries past the first exist for failover when the successor dies.
#[derive(Debug, Clone)]
pub struct SuccessorList {
    own_id: HashPos,
    pub successors: Vec<NodeRef>,
}

impl SuccessorList {
    pub fn new(own_id: &HashPos, direct_successor: &NodeRef) -> Self {
        SuccessorList {
            own_id: own_id.clone(),
            successors: vec![direct_successor.clone()],
        }
    }

    /// Rebuild the list as [successor] followed by the successor's own
    /// entries, truncated to SUCCESSOR_LIST_SIZE and at ourselves.
    pub fn update_from_successor(&mut self, successor: &NodeRef, successors_own: &[NodeRef]) {
        self.successors = vec![successor.clone()];
        for entry in successors_own {
            if self.successors.len() >= SUCCESSOR_LIST_SIZE {
                break;
            }
            if entry.id == self.own_id {
                break;
            }
            self.successors.push(entry.clone());
        }
    }

    /// First entry that could replace an unreachable successor.
    pub fn next_after(&self, dead: &HashPos) -> Option<NodeRef> {
        self.successors
            .iter()
            .find(|entry| entry.id != *dead && entry.id != self.own_id)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;

    use super::*;

    fn node(id: u32) -> NodeRef {
        NodeRef::with_id(BigUint::from(id), format!("127.0.0.1:{}", 9000 + id))
    }

    #[test]
    fn refresh_keeps_the_successor_first_and_truncates() {
        let mut list = SuccessorList::new(&BigUint::from(3u32), &node(5));
        list.update_from_successor(&node(5), &[node(7), node(9), node(11)]);
        assert_eq!(list.successors, vec![node(5), node(7)]);
    }

    #[test]
    fn refresh_stops_at_ourselves() {
        // a two-node ring: the successor's list leads straight back to us
        let mut list = SuccessorList::new(&BigUint::from(3u32), &node(5));
        list.update_from_successor(&node(5), &[node(3), node(5)]);
        assert_eq!(list.successors, vec![node(5)]);
    }

    #[test]
    fn next_after_skips_the_dead_successor_and_ourselves() {
        let mut list = SuccessorList::new(&BigUint::from(3u32), &node(5));
        list.update_from_successor(&node(5), &[node(7)]);
        assert_eq!(list.next_after(&BigUint::from(5u32)), Some(node(7)));
        assert_eq!(list.next_after(&BigUint::from(7u32)), Some(node(5)));

        let lone = SuccessorList::new(&BigUint::from(3u32), &node(5));
        assert_eq!(lone.next_after(&BigUint::from(5u32)), None);
    }
}
