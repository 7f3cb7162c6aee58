use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

use clap::Parser;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Captures every inbound HTTP request to its own directory under --logdir.
#[derive(Debug, Clone, Parser)]
#[command(name = "httplog", version, about)]
pub struct Cli {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "HTTPLOG_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Directory that receives one sub-directory per captured request
    #[arg(long = "logdir", env = "HTTPLOG_LOGDIR", default_value = DEFAULT_LOG_DIR)]
    pub log_dir: PathBuf,

    /// Tracing filter, e.g. `info` or `server=debug`
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "HTTPLOG_LOG_JSON")]
    pub log_json: bool,
}

impl Cli {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
