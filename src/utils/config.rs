use std::time::Duration;

use crate::utils::cli::Cli;
use crate::utils::types::Address;

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: Address,
    pub join_address: Option<Address>,
    pub stabilize_interval: Duration,
    pub fix_fingers_interval: Duration,
    pub check_predecessor_interval: Duration,
}

impl Config {
    /// Both -a and -p are required; the join flags are honored only as a
    /// pair, otherwise the node creates a new ring.
    pub fn from_cli(cli: Cli) -> Result<Config, String> {
        let (address, port) = match (cli.address, cli.port) {
            (Some(address), Some(port)) => (address, port),
            _ => return Err("Both -a and -p must be specified.".to_string()),
        };

        let join_address = match (cli.join_address, cli.join_port) {
            (Some(join_address), Some(join_port)) => {
                Some(format!("{}:{}", join_address, join_port))
            }
            _ => None,
        };

        Ok(Config {
            bind_address: format!("{}:{}", address, port),
            join_address,
            stabilize_interval: Duration::from_millis(cli.stabilize_interval),
            fix_fingers_interval: Duration::from_millis(cli.fix_fingers_interval),
            check_predecessor_interval: Duration::from_millis(cli.check_predecessor_interval),
        })
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn parses_a_full_flag_set() {
        let cli = Cli::parse_from([
            "chord", "-a", "127.0.0.1", "-p", "4711", "--ja", "127.0.0.1", "--jp", "4710",
            "--ts", "500", "--tff", "250", "--tcp", "500",
        ]);
        let config = Config::from_cli(cli).unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:4711");
        assert_eq!(config.join_address.as_deref(), Some("127.0.0.1:4710"));
        assert_eq!(config.stabilize_interval, Duration::from_millis(500));
        assert_eq!(config.fix_fingers_interval, Duration::from_millis(250));
        assert_eq!(config.check_predecessor_interval, Duration::from_millis(500));
    }

    #[test]
    fn missing_bind_flags_are_an_error() {
        let cli = Cli::parse_from(["chord", "-a", "127.0.0.1"]);
        assert!(Config::from_cli(cli).is_err());
    }

    #[test]
    fn a_lone_join_flag_means_a_new_ring() {
        let cli = Cli::parse_from(["chord", "-a", "127.0.0.1", "-p", "4711", "--ja", "10.0.0.1"]);
        let config = Config::from_cli(cli).unwrap();
        assert!(config.join_address.is_none());
        assert_eq!(
            config.stabilize_interval,
            Duration::from_millis(crate::utils::constants::STABILIZE_INTERVAL_MILLIS_DEFAULT)
        );
    }
}
