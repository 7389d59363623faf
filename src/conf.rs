use crate::{
    server, transport::UdpTransport, PlayerList, Rules, ServerInfo, ServerStatus, SspErr,
};
use std::{
    net::{Ipv4Addr, SocketAddrV4},
    time::Duration,
};

/// Default query port of SA-MP and Open.MP servers.
pub const DEFAULT_PORT: u16 = 7777;

/// Main struct used for configuring the query.
#[derive(Debug, Clone)]
pub struct Conf {
    /// Server IPv4 address in dotted-quad form.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// See [SocketConf].
    pub socket_conf: SocketConf,
    /// Take the online count in [Conf::get_server_status] from the player list.
    /// The default value is false.
    pub roster_player_count: bool,
}

/// Additional socket configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketConf {
    /// Read timeout applied to each attempt.
    /// The default value is 3 seconds.
    pub read_time_out: Duration,
    /// Set the write timeout for socket.
    pub write_timeout: Option<Duration>,
    /// Number of attempts before giving up.
    /// The default value is 3.
    pub max_attempts: u32,
    /// Specify the local address for creating a UDP socket.
    /// The default value is [Ipv4Addr::UNSPECIFIED].
    pub rep_udp_ipv4: Ipv4Addr,
    /// Specify the local port for creating a UDP socket.
    /// The default value is 0, letting the OS pick one.
    pub rep_udp_port: u16,
}

impl Default for SocketConf {
    fn default() -> Self {
        Self {
            read_time_out: Duration::from_secs(3),
            write_timeout: None,
            max_attempts: 3,
            rep_udp_ipv4: Ipv4Addr::UNSPECIFIED,
            rep_udp_port: 0,
        }
    }
}

impl std::fmt::Display for Conf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl Conf {
    /// Create a query configuration using the default port(7777).
    ///
    /// # Examples
    ///
    /// ```
    /// # use ssp::{Conf, SocketConf};
    /// #
    /// let conf = Conf::create("127.0.0.1");
    /// #
    /// # assert_eq!(conf.host, "127.0.0.1");
    /// # assert_eq!(conf.port, 7777);
    /// # assert_eq!(conf.socket_conf, SocketConf::default());
    /// ```
    pub fn create(host: &str) -> Self {
        Self::create_with_port(host, DEFAULT_PORT)
    }

    /// Create a query configuration using the specified port.
    ///
    /// # Example
    ///
    /// ```
    /// # use ssp::Conf;
    /// #
    /// let conf = Conf::create_with_port("127.0.0.1", 7778);
    /// #
    /// # assert_eq!(conf.port, 7778);
    /// ```
    pub fn create_with_port(host: &str, port: u16) -> Self {
        Self {
            host: host.trim().into(),
            port,
            socket_conf: SocketConf::default(),
            roster_player_count: false,
        }
    }

    /// Create a query configuration from a `host:port` string.
    ///
    /// If the port cannot be converted to [u16], it will return a [SspErr::DataErr].
    ///
    /// # Example
    ///
    /// ```
    /// # use ssp::{Conf, SspErr};
    /// #
    /// # fn main() -> Result<(), SspErr> {
    ///     let conf = Conf::create_from_str("127.0.0.1:7777")?;
    /// #
    /// #   assert_eq!(conf.host, "127.0.0.1");
    /// #   assert_eq!(conf.port, 7777);
    /// #
    /// #   assert!(Conf::create_from_str("7777").is_err());
    /// #   assert!(Conf::create_from_str("127.0.0.1:-1").is_err());
    /// #   Ok(())
    /// # }
    /// ```
    pub fn create_from_str(addr: &str) -> Result<Self, SspErr> {
        let addr_split = addr.split(':').map(|x| x.trim()).collect::<Vec<_>>();

        if addr_split.len() != 2 {
            return Err(SspErr::DataErr(format!(
                "Invalid IPv4 socket address syntax: {}",
                addr
            )));
        }

        match addr_split[1].parse::<u16>() {
            Ok(port) => Ok(Self::create_with_port(addr_split[0], port)),
            Err(_) => Err(SspErr::DataErr(format!("Invalid port: {}", addr_split[1]))),
        }
    }

    /// Validate the host and build the target address.
    ///
    /// ```
    /// # use ssp::Conf;
    /// #
    /// assert!(Conf::create("192.168.1.1").endpoint().is_ok());
    /// assert!(Conf::create("256.1.1.1").endpoint().is_err());
    /// assert!(Conf::create("example.com").endpoint().is_err());
    /// ```
    pub fn endpoint(&self) -> Result<SocketAddrV4, SspErr> {
        match self.host.parse::<Ipv4Addr>() {
            Ok(ip) => Ok(SocketAddrV4::new(ip, self.port)),
            Err(_) => Err(SspErr::DataErr(format!(
                "Invalid IPv4 address: {}",
                self.host
            ))),
        }
    }

    fn transport(&self) -> UdpTransport {
        UdpTransport::create(&self.socket_conf)
    }

    /// Get hostname, gamemode, map and player counts.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ssp::{Conf, SspErr};
    ///
    /// fn main() -> Result<(), SspErr> {
    ///     let server = Conf::create_with_port("127.0.0.1", 7777);
    ///     let info = server.get_server_info()?;
    ///
    ///     Ok(())
    /// }
    /// ```
    pub fn get_server_info(&self) -> Result<ServerInfo, SspErr> {
        server::get_server_info(self, &self.transport())
    }

    /// Get the connected players and their scores.
    ///
    /// Servers usually stop answering this query above 100 players.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ssp::{Conf, SspErr};
    ///
    /// fn main() -> Result<(), SspErr> {
    ///     let server = Conf::create_with_port("127.0.0.1", 7777);
    ///
    ///     for player in server.get_players()?.iter() {
    ///         println!("{}: {}", player.name, player.score);
    ///     }
    ///
    ///     Ok(())
    /// }
    /// ```
    pub fn get_players(&self) -> Result<PlayerList, SspErr> {
        server::get_players(self, &self.transport())
    }

    /// Get the server rules (version, weather, world time...).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ssp::{Conf, SspErr};
    ///
    /// fn main() -> Result<(), SspErr> {
    ///     let server = Conf::create_with_port("127.0.0.1", 7777);
    ///     let rules = server.get_rules()?;
    ///
    ///     println!("{:?}", rules.get("version"));
    ///
    ///     Ok(())
    /// }
    /// ```
    pub fn get_rules(&self) -> Result<Rules, SspErr> {
        server::get_rules(self, &self.transport())
    }

    /// Get server info together with rules. Return type is [ServerStatus].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ssp::{Conf, SspErr};
    ///
    /// fn main() -> Result<(), SspErr> {
    ///     let mut server = Conf::create_with_port("127.0.0.1", 7777);
    ///     server.roster_player_count = true;
    ///
    ///     let status = server.get_server_status()?;
    ///     println!("open.mp: {}", status.is_omp);
    ///
    ///     Ok(())
    /// }
    /// ```
    pub fn get_server_status(&self) -> Result<ServerStatus, SspErr> {
        server::get_server_status(self, &self.transport())
    }

    /// Check whether the server answers at all.
    ///
    /// A silent server is `Ok(false)`; an invalid host is still an error.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ssp::{Conf, SspErr};
    ///
    /// fn main() -> Result<(), SspErr> {
    ///     let server = Conf::create_from_str("127.0.0.1:7777")?;
    ///
    ///     if !server.is_online()? {
    ///         println!("{} is offline", server);
    ///     }
    ///
    ///     Ok(())
    /// }
    /// ```
    pub fn is_online(&self) -> Result<bool, SspErr> {
        server::is_online(self, &self.transport())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_trims_parts() {
        let conf = Conf::create_from_str(" 10.0.0.2 : 7778 ").unwrap();

        assert_eq!(conf.host, "10.0.0.2");
        assert_eq!(conf.port, 7778);
        assert_eq!(conf.to_string(), "10.0.0.2:7778");
        assert!(!conf.roster_player_count);
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(Conf::create_from_str("10.0.0.2").is_err());
        assert!(Conf::create_from_str("10.0.0.2:70000").is_err());
        assert!(Conf::create_from_str("10.0.0.2:1:2").is_err());
        assert!(Conf::create("1.2.3").endpoint().is_err());
        assert!(Conf::create("").endpoint().is_err());
    }

    #[test]
    fn endpoint_uses_configured_port() {
        let endpoint = Conf::create_with_port("192.168.1.1", 7777).endpoint().unwrap();

        assert_eq!(endpoint.ip().octets(), [192, 168, 1, 1]);
        assert_eq!(endpoint.port(), 7777);
    }
}
