use std::env;
use std::net::{IpAddr, Ipv4Addr};

use crate::error::{Result, SignalingError};

pub const DEFAULT_PORT: u16 = 3001;

pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

pub struct LoggingConfig {
    pub format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let port = match env::var("PORT") {
            Ok(raw) => parse_port(&raw)?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port,
            },
            logging: LoggingConfig {
                format: env::var("LOG_FORMAT")
                    .map(|raw| parse_log_format(&raw))
                    .unwrap_or(LogFormat::Pretty),
            },
        })
    }

    pub fn bind_address(&self) -> ([u8; 4], u16) {
        let ip_addr = self.parse_host_to_ipv4();
        (ip_addr.octets(), self.server.port)
    }

    fn parse_host_to_ipv4(&self) -> Ipv4Addr {
        if let Ok(addr) = self.server.host.parse::<IpAddr>() {
            match addr {
                IpAddr::V4(ipv4) => return ipv4,
                IpAddr::V6(_) => {
                    tracing::warn!(
                        host = %self.server.host,
                        "IPv6 address provided but only IPv4 supported, using 0.0.0.0"
                    );
                    return Ipv4Addr::UNSPECIFIED;
                }
            }
        }

        match self.server.host.as_str() {
            "localhost" => Ipv4Addr::LOCALHOST,
            "" | "0.0.0.0" => Ipv4Addr::UNSPECIFIED,
            _ => {
                tracing::warn!(
                    host = %self.server.host,
                    "Unable to parse host as IPv4, using 0.0.0.0"
                );
                Ipv4Addr::UNSPECIFIED
            }
        }
    }
}

fn parse_port(raw: &str) -> Result<u16> {
    raw.trim()
        .parse()
        .map_err(|_| SignalingError::configuration(format!("PORT must be a port number, got {:?}", raw)))
}

fn parse_log_format(raw: &str) -> LogFormat {
    if raw.eq_ignore_ascii_case("json") {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    }
}
