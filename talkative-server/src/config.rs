use clap::Parser;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_OUTBOUND_BUFFER: usize = 64;
pub const DEFAULT_COMMAND_BUFFER: usize = 1024;

/// Relay server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Per-connection outbound queue; a full queue evicts the session
    pub outbound_buffer: usize,
    /// Capacity of the matchmaker hub's inbox
    pub command_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
            command_buffer: DEFAULT_COMMAND_BUFFER,
        }
    }
}

impl ServerConfig {
    /// Loopback on an OS-assigned port (for tests)
    pub fn local() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            ..Default::default()
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_outbound_buffer(mut self, capacity: usize) -> Self {
        self.outbound_buffer = capacity.max(1);
        self
    }

    pub fn with_command_buffer(mut self, capacity: usize) -> Self {
        self.command_buffer = capacity.max(1);
        self
    }

    /// `host:port` as accepted by `TcpListener::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Parser)]
#[command(name = "talkative-server")]
#[command(version, about = "Talkative relay - anonymous 1:1 matching and WebRTC signaling")]
pub struct Args {
    /// Interface to listen on
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(short = 'p', long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Outbound frames buffered per connection before it is evicted
    #[arg(long, env = "OUTBOUND_BUFFER", default_value_t = DEFAULT_OUTBOUND_BUFFER)]
    pub outbound_buffer: usize,

    /// Commands buffered for the matchmaker hub
    #[arg(long, env = "COMMAND_BUFFER", default_value_t = DEFAULT_COMMAND_BUFFER)]
    pub command_buffer: usize,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,

    /// Verbose (debug) logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl From<&Args> for ServerConfig {
    fn from(args: &Args) -> Self {
        ServerConfig::default()
            .with_host(args.host.clone())
            .with_port(args.port)
            .with_outbound_buffer(args.outbound_buffer)
            .with_command_buffer(args.command_buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 3001);
        assert_eq!(config.bind_address(), "0.0.0.0:3001");
        assert_eq!(config.outbound_buffer, 64);
    }

    #[test]
    fn test_builder_clamps_buffers() {
        let config = ServerConfig::local()
            .with_outbound_buffer(0)
            .with_command_buffer(0);

        assert_eq!(config.outbound_buffer, 1);
        assert_eq!(config.command_buffer, 1);
        assert_eq!(config.bind_address(), "127.0.0.1:0");
    }

    #[test]
    fn test_args_into_config() {
        let args = Args::try_parse_from([
            "talkative-server",
            "--host",
            "127.0.0.1",
            "--port",
            "4000",
            "--outbound-buffer",
            "8",
        ])
        .unwrap();

        let config = ServerConfig::from(&args);

        assert_eq!(config.bind_address(), "127.0.0.1:4000");
        assert_eq!(config.outbound_buffer, 8);
        assert_eq!(config.command_buffer, DEFAULT_COMMAND_BUFFER);
    }
}
