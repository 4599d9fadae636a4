use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host, it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitemap_sift::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the network location of a URL: the lowercase host, followed by
/// `:port` when the URL names a non-default port
///
/// This is the name of the report sheet for a sitemap.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitemap_sift::url::network_location;
///
/// let url = Url::parse("https://www.example.fr/sitemap.xml").unwrap();
/// assert_eq!(network_location(&url), Some("www.example.fr".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/sitemap.xml").unwrap();
/// assert_eq!(network_location(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn network_location(url: &Url) -> Option<String> {
    let domain = extract_domain(url)?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", domain, port),
        None => domain,
    })
}
