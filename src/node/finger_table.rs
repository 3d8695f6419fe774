use crate::node::node_ref::NodeRef;
use crate::utils::crypto::{finger_start, HashPos, M};

/// Routing shortcuts at doubling distances: entry i should point at the
/// successor of (id + 2^i) mod 2^M. Entries are unset until fix-fingers has
/// resolved them.
#[derive(Debug, Clone)]
pub struct FingerTable {
    pub starts: Vec<HashPos>,
    pub fingers: Vec<Option<NodeRef>>,
}

impl FingerTable {
    pub fn new(id: &HashPos) -> FingerTable {
        let starts = (0..M as usize).map(|i| finger_start(id, i)).collect();
        FingerTable {
            starts,
            fingers: vec![None; M as usize],
        }
    }
}
