//! Boots a local cluster of node processes, waits for the ring to settle,
//! and checks that the successor/predecessor pointers form a single cycle
//! and that every finger points at the node responsible for its start.

use std::process::Stdio;

use num_bigint::BigUint;
use tokio::process::{Child, Command};
use tokio::time::{sleep, Duration};
use tonic::Request;

use chord::threads::chord::chord_proto::chord_client::ChordClient;
use chord::threads::chord::chord_proto::{Empty, NodeSummaryMsg};
use chord::utils::crypto::HashPos;

const NODE_COUNT: usize = 8;
const BASE_PORT: u16 = 5600;
const STARTUP_GRACE: Duration = Duration::from_secs(1);
const CONVERGENCE_WAIT: Duration = Duration::from_secs(20);

#[tokio::main]
async fn main() {
    let (addresses, _children) = start_up_nodes(NODE_COUNT).await;

    println!("Waiting for the ring to converge...");
    sleep(CONVERGENCE_WAIT).await;

    let mut summaries: Vec<NodeSummaryMsg> = Vec::new();
    for address in &addresses {
        let mut client = ChordClient::connect(format!("http://{}", address))
            .await
            .expect("node unreachable");
        let summary = client
            .get_node_summary(Request::new(Empty {}))
            .await
            .expect("summary call failed")
            .into_inner();
        summaries.push(summary);
    }

    summaries.sort_by_key(node_id);
    let ids: Vec<HashPos> = summaries.iter().map(node_id).collect();

    let mut is_valid = true;

    // every node's successor must be the next node in id order, and that
    // node must point back at it as its predecessor
    for i in 0..summaries.len() {
        let expected_successor = &ids[(i + 1) % ids.len()];
        let successor_id =
            BigUint::from_bytes_be(&summaries[i].successor.as_ref().expect("no successor").id);
        if successor_id != *expected_successor {
            eprintln!(
                "Node {:x} has wrong successor: {:x} (expected {:x})",
                ids[i], successor_id, expected_successor
            );
            is_valid = false;
        }

        let next = &summaries[(i + 1) % summaries.len()];
        let predecessor = next.predecessor.as_ref().and_then(|p| p.node.as_ref());
        match predecessor {
            Some(p) if BigUint::from_bytes_be(&p.id) == ids[i] => {}
            _ => {
                eprintln!("Node {:x} is not the predecessor of its successor", ids[i]);
                is_valid = false;
            }
        }
    }

    // finger correctness
    for summary in &summaries {
        for (index, finger) in summary.fingers.iter().enumerate() {
            let start = BigUint::from_bytes_be(&finger.start);
            let expected = responsible_node(&start, &ids);
            match finger.node.as_ref() {
                Some(node) if BigUint::from_bytes_be(&node.id) == *expected => {}
                Some(node) => {
                    eprintln!(
                        "Node {:x}: finger {} (start {:x}) points at {:x}, but {:x} is responsible",
                        node_id(summary),
                        index,
                        start,
                        BigUint::from_bytes_be(&node.id),
                        expected
                    );
                    is_valid = false;
                }
                None => {
                    eprintln!("Node {:x}: finger {} is unset", node_id(summary), index);
                    is_valid = false;
                }
            }
        }
    }

    if is_valid {
        println!("Looks good!");
    } else {
        eprintln!("Cluster is invalid!");
        std::process::exit(1);
    }
}

fn node_id(summary: &NodeSummaryMsg) -> HashPos {
    BigUint::from_bytes_be(&summary.node.as_ref().expect("summary without node").id)
}

/// With ids sorted ascending, the responsible node for a key is the first
/// node at or after it, wrapping to the lowest id.
fn responsible_node<'a>(key: &HashPos, ids: &'a [HashPos]) -> &'a HashPos {
    ids.iter().find(|id| *id >= key).unwrap_or(&ids[0])
}

async fn start_up_nodes(count: usize) -> (Vec<String>, Vec<Child>) {
    let mut children = Vec::new();
    let mut addresses = Vec::new();

    children.push(spawn_node(BASE_PORT, None));
    addresses.push(format!("127.0.0.1:{}", BASE_PORT));
    sleep(Duration::from_secs(2)).await;

    for i in 1..count {
        let port = BASE_PORT + i as u16;
        children.push(spawn_node(port, Some(BASE_PORT)));
        addresses.push(format!("127.0.0.1:{}", port));
        println!("Started up node on port {}", port);
        sleep(STARTUP_GRACE).await;
    }
    (addresses, children)
}

fn spawn_node(port: u16, join_port: Option<u16>) -> Child {
    let mut command = Command::new("cargo");
    command
        .arg("run")
        .args(["--package", "chord"])
        .args(["--bin", "chord"])
        .arg("--")
        .args(["-a", "127.0.0.1"])
        .args(["-p", &port.to_string()])
        .args(["--ts", "500"])
        .args(["--tff", "250"])
        .args(["--tcp", "500"]);
    if let Some(join_port) = join_port {
        command
            .args(["--ja", "127.0.0.1"])
            .args(["--jp", &join_port.to_string()]);
    }
    command
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .expect("failed to start node process")
}
