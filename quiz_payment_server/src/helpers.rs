use std::{net::IpAddr, str::FromStr};

use actix_web::HttpRequest;
use log::{debug, trace};
use regex::Regex;

use crate::config::ProxyConfig;

/// Get the remote IP address from the request. It uses 3 sources to determine the IP address, in decreasing order
/// of preference:
/// 1. The `X-Forwarded-For` header, iif `use_x_forwarded_for` is set in the proxy configuration.
/// 2. The `Forwarded` header, iif `use_forwarded` is set in the proxy configuration.
/// 3. The peer address from the connection info.
///
/// The address is only used for logging. Nothing is authorised on the strength of it.
pub fn get_remote_ip(req: &HttpRequest, proxy: &ProxyConfig) -> Option<IpAddr> {
    let mut result = None;
    if proxy.use_x_forwarded_for {
        trace!("Checking X-Forwarded-For header");
        result = req.headers().get("X-Forwarded-For").and_then(|v| v.to_str().ok()).and_then(x_forwarded_for);
        if let Some(ip) = result {
            debug!("Using X-Forwarded-For header for remote address: {ip}");
        }
    }
    if proxy.use_forwarded && result.is_none() {
        trace!("Checking Forwarded header");
        result = req.headers().get("Forwarded").and_then(|v| v.to_str().ok()).and_then(forwarded_for);
        if let Some(ip) = result {
            debug!("Using Forwarded header for remote address: {ip}");
        }
    }
    result.or_else(|| {
        let peer_addr = req.peer_addr().map(|a| a.ip());
        trace!("Using Peer address for remote address: {:?}", peer_addr);
        peer_addr
    })
}

/// The left-most entry in `X-Forwarded-For` is the original client.
fn x_forwarded_for(value: &str) -> Option<IpAddr> {
    value.split(',').next().and_then(|s| IpAddr::from_str(s.trim()).ok())
}

/// Extracts the first `for=` node from a `Forwarded` header (RFC 7239). IPv6 nodes are quoted and bracketed.
fn forwarded_for(value: &str) -> Option<IpAddr> {
    let re = Regex::new(r#"(?i)for=(?P<ip>[^;,]+)"#).ok()?;
    let node = re.captures(value)?.name("ip")?.as_str();
    let node = node.trim().trim_matches('"').trim_start_matches('[');
    let node = node.split(']').next().unwrap_or(node);
    IpAddr::from_str(node).ok()
}

#[cfg(test)]
mod test {
    use std::net::SocketAddr;

    use actix_web::test::TestRequest;

    use super::*;

    const PEER: &str = "10.0.0.1:54321";

    fn request() -> TestRequest {
        TestRequest::default().peer_addr(SocketAddr::from_str(PEER).unwrap())
    }

    #[test]
    fn peer_address_is_the_fallback() {
        let req = request().insert_header(("X-Forwarded-For", "203.0.113.7")).to_http_request();
        let ip = get_remote_ip(&req, &ProxyConfig::default());
        assert_eq!(ip, Some("10.0.0.1".parse().unwrap()));
    }

    #[test]
    fn x_forwarded_for_is_used_when_trusted() {
        let proxy = ProxyConfig { use_x_forwarded_for: true, use_forwarded: false };
        let req = request().insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.2")).to_http_request();
        assert_eq!(get_remote_ip(&req, &proxy), Some("203.0.113.7".parse().unwrap()));

        let req = request().insert_header(("X-Forwarded-For", "not-an-ip")).to_http_request();
        assert_eq!(get_remote_ip(&req, &proxy), Some("10.0.0.1".parse().unwrap()));
    }

    #[test]
    fn forwarded_is_used_when_trusted() {
        let proxy = ProxyConfig { use_x_forwarded_for: true, use_forwarded: true };
        let req = request().insert_header(("Forwarded", "for=192.0.2.60;proto=http;by=203.0.113.43")).to_http_request();
        assert_eq!(get_remote_ip(&req, &proxy), Some("192.0.2.60".parse().unwrap()));
    }

    #[test]
    fn forwarded_header_formats() {
        assert_eq!(forwarded_for("for=192.0.2.43, for=198.51.100.17"), Some("192.0.2.43".parse().unwrap()));
        assert_eq!(forwarded_for(r#"For="[2001:db8:cafe::17]:4711""#), Some("2001:db8:cafe::17".parse().unwrap()));
        assert_eq!(forwarded_for("for=_hidden"), None);
        assert_eq!(forwarded_for("proto=https"), None);
    }
}
