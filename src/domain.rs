/// Site caption shown under each saved link
use url::Url;

/// Host of a URL without a leading `www.`
///
/// Examples:
/// - https://www.google.com/search → google.com
/// - https://news.bbc.co.uk/article → news.bbc.co.uk
/// - http://localhost:3000 → localhost
///
/// Returns `None` for empty input, unparseable URLs and URLs without a host
/// (`about:blank`, `data:` ...).
pub fn site_label(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);

    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}
