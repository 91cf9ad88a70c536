//! Command-line interface.

use clap::{Parser, Subcommand};

use crate::auth::MAX_TOKEN_LIFETIME_MINUTES;

/// WatchAll - media tracking API
#[derive(Parser)]
#[command(name = "watchall")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API (default)
    #[command(alias = "daemon")]
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Create default config file
    Init,

    /// Print a bearer token for SUBJECT signed with the configured key
    Token {
        subject: String,

        /// Token lifetime in minutes (defaults to auth.token_lifetime_minutes)
        #[arg(long, value_parser = clap::value_parser!(i64).range(1..=MAX_TOKEN_LIFETIME_MINUTES))]
        minutes: Option<i64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["watchall"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_token_subject() {
        let cli = Cli::try_parse_from(["watchall", "token", "alice", "--minutes", "5"]).unwrap();
        match cli.command {
            Some(Commands::Token { subject, minutes }) => {
                assert_eq!(subject, "alice");
                assert_eq!(minutes, Some(5));
            }
            _ => panic!("expected token command"),
        }
    }

    #[test]
    fn rejects_out_of_range_token_minutes() {
        let huge = (i64::MAX / 2).to_string();
        assert!(Cli::try_parse_from(["watchall", "token", "alice", "--minutes", &huge]).is_err());
        assert!(Cli::try_parse_from(["watchall", "token", "alice", "--minutes", "0"]).is_err());
    }

    #[test]
    fn parses_serve_port() {
        let cli = Cli::try_parse_from(["watchall", "serve", "--port", "8081"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve { port: Some(8081) })));
    }
}
