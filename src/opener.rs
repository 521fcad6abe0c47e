//! Opening contact links outside the terminal.
//!
//! Hands `mailto:` and LinkedIn URLs to the system's default handler.

use anyhow::{Context, Result};

/// Open a URL with the system's default handler.
///
/// # Arguments
/// * `url` - URL to open (e.g., "mailto:jane@example.org")
///
/// # Returns
/// * `Result<()>` - Success or error
///
/// # Details
/// Only `mailto:`, `http:` and `https:` URLs are accepted; anything else is
/// rejected before reaching the system handler.
pub fn open_url(url: &str) -> Result<()> {
    if !is_openable(url) {
        return Err(anyhow::anyhow!("Refusing to open unsupported link: {}", url));
    }

    webbrowser::open(url).with_context(|| format!("Failed to open link: {}", url))?;
    tracing::info!(%url, "opened link");
    Ok(())
}

fn is_openable(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    ["mailto:", "http://", "https://"]
        .iter()
        .any(|scheme| lower.starts_with(scheme) && lower.len() > scheme.len())
}
