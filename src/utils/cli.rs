use clap::Parser;

use crate::utils::constants::{
    CHECK_PREDECESSOR_INTERVAL_MILLIS_DEFAULT, FIX_FINGERS_INTERVAL_MILLIS_DEFAULT,
    STABILIZE_INTERVAL_MILLIS_DEFAULT,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The IP address that the node will bind to and advertise to other nodes
    #[arg(short = 'a', long = "address")]
    pub address: Option<String>,

    /// The port that the node will bind to and listen on
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// The IP address of a running node whose ring to join
    #[arg(long = "ja")]
    pub join_address: Option<String>,

    /// The port of the node to join
    #[arg(long = "jp")]
    pub join_port: Option<u16>,

    /// Milliseconds between invocations of 'stabilize'
    #[arg(long = "ts", default_value_t = STABILIZE_INTERVAL_MILLIS_DEFAULT)]
    pub stabilize_interval: u64,

    /// Milliseconds between invocations of 'fix fingers'
    #[arg(long = "tff", default_value_t = FIX_FINGERS_INTERVAL_MILLIS_DEFAULT)]
    pub fix_fingers_interval: u64,

    /// Milliseconds between invocations of 'check predecessor'
    #[arg(long = "tcp", default_value_t = CHECK_PREDECESSOR_INTERVAL_MILLIS_DEFAULT)]
    pub check_predecessor_interval: u64,
}
