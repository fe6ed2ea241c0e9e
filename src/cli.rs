use clap::{Parser, Subcommand};

use crate::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "inventory-api")]
#[command(about = "Inventory management REST API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Port to listen on (overrides PORT)")]
    pub port: Option<u16>,

    #[arg(long, global = true, help = "Address to bind (overrides BIND_ADDRESS)")]
    pub bind: Option<String>,

    #[arg(long, global = true, help = "Use the in-memory store even if DATABASE_URL is set")]
    pub memory: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Print a bcrypt hash for seeding users by hand")]
    HashPassword {
        #[arg(help = "Plain-text password")]
        password: String,
    },
}

impl Cli {
    /// Apply command-line overrides on top of the environment.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(bind) = &self.bind {
            config.server.bind_address = bind.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serving() {
        let cli = Cli::try_parse_from(["inventory-api"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.memory);
    }

    #[test]
    fn overrides_port_and_bind() {
        let cli = Cli::try_parse_from(["inventory-api", "--port", "9000", "--bind", "127.0.0.1", "serve"]).unwrap();
        let mut config = AppConfig::development();
        cli.apply(&mut config);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind_address, "127.0.0.1");
        assert!(matches!(cli.command, Some(Commands::Serve)));
    }

    #[test]
    fn parses_hash_password() {
        let cli = Cli::try_parse_from(["inventory-api", "hash-password", "secret"]).unwrap();
        match cli.command {
            Some(Commands::HashPassword { password }) => assert_eq!(password, "secret"),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
