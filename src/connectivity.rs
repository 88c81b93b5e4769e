//! Best-effort reachability check consulted once at startup.

use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Reports whether the movie feed looks reachable right now.
pub trait Connectivity: Send + Sync {
  fn is_reachable(&self) -> bool;
}

/// Probes the feed host with a plain TCP connect.
pub struct TcpProbe {
  target: Option<(String, u16)>,
  timeout: Duration,
}

impl TcpProbe {
  pub fn for_url(url: &Url, timeout: Duration) -> Self {
    let target = url
      .host_str()
      .zip(url.port_or_known_default())
      .map(|(host, port)| (host.to_string(), port));

    Self { target, timeout }
  }

  fn addrs(&self) -> Vec<SocketAddr> {
    match &self.target {
      Some((host, port)) => (host.as_str(), *port)
        .to_socket_addrs()
        .map(|addrs| addrs.collect())
        .unwrap_or_default(),
      None => Vec::new(),
    }
  }
}

impl Connectivity for TcpProbe {
  fn is_reachable(&self) -> bool {
    let reachable = self
      .addrs()
      .iter()
      .any(|addr| TcpStream::connect_timeout(addr, self.timeout).is_ok());
    debug!(target = ?self.target, reachable, "connectivity probe");
    reachable
  }
}

/// Fixed answer, used for `--offline` and in tests.
pub struct Fixed(pub bool);

impl Connectivity for Fixed {
  fn is_reachable(&self) -> bool {
    self.0
  }
}
