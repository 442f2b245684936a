//! Client IP extraction.
//!
//! X-Forwarded-For is attacker-writable up to the first trusted proxy, so the
//! chain is walked from the right using the configured trusted proxy count.
//! The extracted IP feeds the access log and the IP allow-list check; a
//! spoofable IP would make both worthless.

use axum::http::HeaderMap;
use std::net::IpAddr;

/// Extract the client IP for a request.
///
/// Order of preference: X-Forwarded-For (validated against the trusted proxy
/// count), X-Real-IP, then the direct socket address. Returns `None` when no
/// candidate parses as an IP.
pub fn extract_client_ip(
    headers: &HeaderMap,
    socket_addr: Option<&std::net::SocketAddr>,
    trusted_proxy_count: usize,
) -> Option<String> {
    if let Some(forwarded_for) = headers.get("x-forwarded-for") {
        if let Ok(header_value) = forwarded_for.to_str() {
            if let Some(ip) = extract_from_forwarded_for(header_value, trusted_proxy_count) {
                return Some(ip);
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip") {
        if let Ok(header_value) = real_ip.to_str() {
            let trimmed = header_value.trim();
            if is_valid_ip(trimmed) {
                return Some(trimmed.to_string());
            }
        }
    }

    socket_addr.map(|addr| addr.ip().to_string())
}

/// Walk the X-Forwarded-For chain (`client, proxy1, proxy2, ...`).
///
/// The last `trusted_proxy_count` entries were appended by infrastructure we
/// control; the entry just before them is the client. With zero trusted
/// proxies the whole header is untrustworthy and only the last entry (set by
/// whoever connected to us) is usable.
fn extract_from_forwarded_for(header_value: &str, trusted_proxy_count: usize) -> Option<String> {
    let ips: Vec<&str> = header_value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    if ips.is_empty() {
        return None;
    }

    let candidate = if trusted_proxy_count == 0 || ips.len() <= trusted_proxy_count {
        ips.last().copied()?
    } else {
        let client_pos = ips.len().saturating_sub(trusted_proxy_count + 1);
        ips.get(client_pos).copied()?
    };

    if is_valid_ip(candidate) {
        Some(candidate.to_string())
    } else {
        None
    }
}

fn is_valid_ip(ip_str: &str) -> bool {
    ip_str.parse::<IpAddr>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use std::net::SocketAddr;

    fn headers_with_xff(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_single_trusted_proxy_takes_client_ip() {
        let headers = headers_with_xff("203.0.113.7, 10.0.0.2");
        assert_eq!(
            extract_client_ip(&headers, None, 1),
            Some("203.0.113.7".to_string())
        );
    }

    #[test]
    fn test_spoofed_prefix_is_ignored() {
        // Attacker sends a fake client entry; proxy appends the real peer IP.
        let headers = headers_with_xff("1.2.3.4, 203.0.113.7, 10.0.0.2");
        assert_eq!(
            extract_client_ip(&headers, None, 1),
            Some("203.0.113.7".to_string())
        );
    }

    #[test]
    fn test_zero_trusted_proxies_uses_last_entry() {
        let headers = headers_with_xff("1.2.3.4, 5.6.7.8");
        assert_eq!(
            extract_client_ip(&headers, None, 0),
            Some("5.6.7.8".to_string())
        );
    }

    #[test]
    fn test_invalid_ip_rejected() {
        let headers = headers_with_xff("not-an-ip");
        assert_eq!(extract_client_ip(&headers, None, 0), None);
    }

    #[test]
    fn test_x_real_ip_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.9"));
        assert_eq!(
            extract_client_ip(&headers, None, 1),
            Some("198.51.100.9".to_string())
        );
    }

    #[test]
    fn test_socket_addr_fallback() {
        let addr: SocketAddr = "192.0.2.4:44180".parse().unwrap();
        assert_eq!(
            extract_client_ip(&HeaderMap::new(), Some(&addr), 1),
            Some("192.0.2.4".to_string())
        );
    }

    #[test]
    fn test_ipv6_accepted() {
        let headers = headers_with_xff("2001:db8::1, 10.0.0.2");
        assert_eq!(
            extract_client_ip(&headers, None, 1),
            Some("2001:db8::1".to_string())
        );
    }
}
