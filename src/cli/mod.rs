// CLI module for darija-translate
// Author: kelexine (https://github.com/kelexine)

use crate::config::AppConfig;
use clap::Parser;
use std::path::PathBuf;

/// darija-translate - Gemini-backed Darija translation service
#[derive(Parser, Debug, Default)]
#[command(name = "darija-translate", version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML config file (default: ~/.darija-translate/config.toml)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Address to bind the HTTP server to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
}

impl Args {
    /// Apply CLI flags on top of the loaded configuration.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from(["darija-translate", "--port", "9000", "--host", "127.0.0.1"]);
        let mut config = AppConfig::default();
        args.apply(&mut config);

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_no_flags_keep_config() {
        let args = Args::parse_from(["darija-translate"]);
        let mut config = AppConfig::default();
        config.server.port = 1234;
        args.apply(&mut config);

        assert_eq!(config.server.port, 1234);
        assert!(args.config.is_none());
    }
}
