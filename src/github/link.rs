// Link header parsing.
// Extracts the rel="next" page URL from GitHub pagination headers.

/// Find the URL annotated `rel="next"` in a `Link` header value.
///
/// The header is a comma-separated list of `<url>; rel="a b"` entries.
/// Malformed entries are skipped.
pub fn next_page_url(header: &str) -> Option<String> {
    header.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let url = target.strip_prefix('<')?.strip_suffix('>')?;

        let is_next = parts.any(|param| {
            let Some((key, value)) = param.split_once('=') else {
                return false;
            };
            key.trim().eq_ignore_ascii_case("rel")
                && value
                    .trim()
                    .trim_matches('"')
                    .split_whitespace()
                    .any(|rel| rel.eq_ignore_ascii_case("next"))
        });

        is_next.then(|| url.to_string())
    })
}
