//! Instance address normalization.
//!
//! Users hand us anything from `misskey.io` to `https://misskey.io/`. Every
//! handle stores the canonical `scheme://host[:port]` form.

use url::Url;

use crate::error::{Error, Result};

/// Canonicalize a host or URL into `scheme://host[:port]`.
///
/// Bare hosts default to `https`. Only `http` and `https` are accepted; any
/// path, query or fragment is dropped. Addresses carrying credentials
/// (`user@host`) are rejected.
pub fn normalize_address(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidAddress("address is empty".to_string()));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        reject_opaque_scheme(trimmed, input)?;
        format!("https://{trimmed}")
    };

    let url = Url::parse(&candidate)
        .map_err(|e| Error::InvalidAddress(format!("{input}: {e}")))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(Error::InvalidAddress(format!(
                "unsupported scheme '{other}' in {input}"
            )));
        }
    }

    if !url.username().is_empty() || url.password().is_some() {
        return Err(Error::InvalidAddress(format!(
            "{input}: credentials in the address are not supported"
        )));
    }

    let host = url
        .host_str()
        .ok_or_else(|| Error::InvalidAddress(format!("{input}: missing host")))?;

    let normalized = match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    };
    Ok(normalized)
}

/// A colon in a bare host must introduce a numeric port; anything else is a
/// scheme such as `mailto:`.
fn reject_opaque_scheme(trimmed: &str, input: &str) -> Result<()> {
    if trimmed.starts_with('[') {
        return Ok(());
    }
    if let Some((prefix, rest)) = trimmed.split_once(':') {
        let port = rest.split(['/', '?', '#']).next().unwrap_or_default();
        if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddress(format!(
                "unsupported scheme '{prefix}' in {input}"
            )));
        }
    }
    Ok(())
}
