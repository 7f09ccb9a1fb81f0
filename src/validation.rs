use reqwest::Url;

/// True iff `input` parses as an absolute URL with a scheme and a host.
/// Purely syntactic, nothing is fetched.
pub fn is_valid_url(input: &str) -> bool {
    match Url::parse(input) {
        Ok(url) => url.has_host(),
        Err(_) => false,
    }
}
