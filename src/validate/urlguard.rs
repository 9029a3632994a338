//! Remote-source screening before any request is issued
//!
//! Literal protocol and hostname checks that keep the fetcher from being
//! pointed at loopback or RFC1918 targets. No DNS resolution happens
//! here, so a public hostname that resolves to a private address at
//! request time is not caught; that is a documented limitation of the
//! literal check, not something this module tries to solve.

use url::Url;

use crate::error::ValidationError;

/// Protocols a remote candidate may use
const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Validate a remote image URL. Returns the parsed URL on pass so the
/// fetcher never re-parses (and can never disagree with the check).
pub fn check(raw: &str) -> Result<Url, ValidationError> {
    let parsed = Url::parse(raw).map_err(|_| ValidationError::BadUrlProtocol)?;

    if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
        return Err(ValidationError::BadUrlProtocol);
    }

    let host = parsed.host_str().ok_or(ValidationError::BadUrlProtocol)?;
    if is_private_host(host) {
        return Err(ValidationError::PrivateNetworkBlocked);
    }

    Ok(parsed)
}

/// Literal loopback and private-range hostname patterns:
/// localhost, 127.0.0.1, 192.168.*, 10.*, 172.(16-31).*
fn is_private_host(host: &str) -> bool {
    if host == "localhost" || host == "127.0.0.1" {
        return true;
    }
    if host.starts_with("192.168.") || host.starts_with("10.") {
        return true;
    }
    if let Some(rest) = host.strip_prefix("172.") {
        if let Some((second_octet, _)) = rest.split_once('.') {
            if let Ok(n) = second_octet.parse::<u8>() {
                return (16..=31).contains(&n);
            }
        }
    }
    false
}
