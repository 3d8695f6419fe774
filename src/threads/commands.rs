use std::error::Error;
use std::io::Write;
use std::sync::{Arc, Mutex};

use tokio::io::{stdin, AsyncBufReadExt, BufReader};
use tokio::signal;
use tonic::Status;

use crate::node::node_ref::NodeRef;
use crate::node::NodeState;
use crate::utils::crypto::hash;

/// Interactive operator surface on stdin. Returns on ctrl-c; a closed stdin
/// leaves the node running headless until ctrl-c arrives.
pub async fn command_loop(node: Arc<Mutex<NodeState>>) {
    let mut lines = BufReader::new(stdin()).lines();
    println!("Chord node is operational. Use commands: 'Lookup <key>', 'StoreFile <path>', 'PrintState'.");
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();
        tokio::select! {
            _ = signal::ctrl_c() => break,
            line = lines.next_line() => match line {
                Ok(Some(line)) => handle_command(&node, line.trim()).await,
                _ => {
                    let _ = signal::ctrl_c().await;
                    break;
                }
            },
        }
    }
}

async fn handle_command(node: &Arc<Mutex<NodeState>>, line: &str) {
    if line.is_empty() {
        return;
    }
    let (command, param) = match line.split_once(char::is_whitespace) {
        Some((command, param)) => (command, param.trim()),
        None => (line, ""),
    };
    match command {
        "Lookup" => handle_lookup(node, param).await,
        "StoreFile" => handle_store_file(node, param).await,
        "PrintState" => print_state(node),
        _ => println!(
            "Unknown command. Available commands: 'Lookup <key>', 'StoreFile <path>', 'PrintState'."
        ),
    }
}

async fn handle_lookup(node: &Arc<Mutex<NodeState>>, key: &str) {
    if key.is_empty() {
        println!("Error: A key is required.");
        return;
    }
    match lookup(node, key).await {
        Ok(owner) => println!("Key '{}' is managed by node {:x} ({})", key, owner.id, owner.address),
        Err(err) => println!("Lookup failed: {}", err),
    }
}

async fn handle_store_file(node: &Arc<Mutex<NodeState>>, path: &str) {
    if path.is_empty() {
        println!("Error: A file path is required.");
        return;
    }
    match store_file(node, path).await {
        Ok(owner) => println!("File '{}' stored on node {:x} ({})", path, owner.id, owner.address),
        Err(err) => println!("StoreFile failed: {}", err),
    }
}

/// Resolve the node responsible for a key.
pub async fn lookup(node: &Arc<Mutex<NodeState>>, key: &str) -> Result<NodeRef, Status> {
    let self_ref = { node.lock().unwrap().self_ref() };
    self_ref.find_successor(&hash(key.as_bytes())).await
}

/// Read a file and deposit its content, keyed by path, on the responsible
/// node.
pub async fn store_file(
    node: &Arc<Mutex<NodeState>>,
    path: &str,
) -> Result<NodeRef, Box<dyn Error>> {
    let content = tokio::fs::read(path).await?;
    let owner = lookup(node, path).await?;
    owner.receive_file(path, content).await?;
    Ok(owner)
}

fn print_state(node: &Arc<Mutex<NodeState>>) {
    let node = node.lock().unwrap();
    println!("Node ID: {:x}", node.id);
    println!("Address: {}", node.address);
    println!("Successor: {:?}", node.successor);
    let entries = node
        .successor_list
        .successors
        .iter()
        .map(|entry| format!("{:x}", entry.id))
        .collect::<Vec<_>>()
        .join(", ");
    println!("Successor list: [{}]", entries);
    match &node.predecessor {
        Some(predecessor) => println!("Predecessor: {:?}", predecessor),
        None => println!("Predecessor: nil"),
    }
    println!("Finger table:");
    for (start, finger) in node
        .finger_table
        .starts
        .iter()
        .zip(node.finger_table.fingers.iter())
    {
        if let Some(entry) = finger {
            println!("{:x}: {:?}", start, entry);
        }
    }
    println!("Stored keys: {}", node.files.len());
    let mut keys = node.files.keys();
    keys.sort();
    for key in keys {
        println!("  {}", key);
    }
}
