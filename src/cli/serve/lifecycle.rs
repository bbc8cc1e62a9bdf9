//! Server binding.

use crate::log;
use anyhow::{Result, anyhow};
use std::net::{IpAddr, SocketAddr};
use tiny_http::Server;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Bind to the specified interface and port, with automatic port retry.
pub fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;

    for offset in 0..MAX_PORT_RETRIES {
        let Some(port) = base_port.checked_add(offset) else {
            break;
        };
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                // Port 0 asks the OS to choose.
                let addr = server.server_addr().to_ip().unwrap_or(addr);
                return Ok((server, addr));
            }
            Err(e) => last_error = Some((port, e)),
        }
    }

    match last_error {
        Some((port, e)) => Err(anyhow!(
            "Failed to bind after {} attempts (ports {}-{}): {}",
            MAX_PORT_RETRIES,
            base_port,
            port,
            e
        )),
        None => Err(anyhow!("no port available from {}", base_port)),
    }
}
