/// Grouping key extraction and URL filtering for Tab Grouper
use std::fmt;
use url::Url;

/// Hostname labels that say nothing about the site itself
const GENERIC_LABELS: [&str; 8] = ["com", "net", "org", "cn", "io", "co", "edu", "gov"];

/// New-tab pages get their own group instead of being skipped
const NEW_TAB_URLS: [&str; 2] = ["chrome://newtab/", "edge://newtab/"];

/// Internal browser pages, extension pages and local files
const SKIPPED_PREFIXES: [&str; 14] = [
    "about:",
    "chrome://",
    "chrome-extension://",
    "chrome-search://",
    "chrome-untrusted://",
    "edge://",
    "extension://",
    "moz-extension://",
    "brave://",
    "opera://",
    "vivaldi://",
    "devtools://",
    "view-source:",
    "file://",
];

/// The value a group's title must equal for a tab to belong to it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey(String);

impl GroupKey {
    pub fn new(key: impl Into<String>) -> GroupKey {
        GroupKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the grouping key from a URL
///
/// Algorithm:
/// 1. Parse the URL and take its hostname
/// 2. Split the hostname by ".", lower-case, drop "www" labels
/// 3. Scan left to right, skipping generic labels (com, net, org, ...)
/// 4. Return the first remaining label, upper-cased
///
/// Examples:
/// - https://www.github.com → GITHUB
/// - https://mail.google.co.jp → MAIL
/// - https://docs.python.org → DOCS
/// - https://co.com → no key
pub fn extract_key(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let hostname = parsed.host_str()?.to_lowercase();

    hostname
        .split('.')
        .filter(|label| !label.is_empty() && *label != "www")
        .find(|label| !GENERIC_LABELS.contains(label))
        .map(|label| label.to_uppercase())
}

/// Whether a URL is one of the browser's new-tab pages
pub fn is_new_tab(url: &str) -> bool {
    NEW_TAB_URLS.contains(&url)
}

/// Decide whether a URL should be left alone entirely
pub fn should_skip(url: Option<&str>) -> bool {
    let Some(url) = url.map(str::trim).filter(|url| !url.is_empty()) else {
        return true;
    };

    if is_new_tab(url) {
        return false;
    }

    let lowered = url.to_lowercase();
    SKIPPED_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
}

/// Skip filter and key extractor combined: the key a tab at `url` groups under
pub fn grouping_key(url: Option<&str>, new_tab_title: &str) -> Option<GroupKey> {
    if should_skip(url) {
        return None;
    }

    let url = url?.trim();
    if is_new_tab(url) {
        return Some(GroupKey::new(new_tab_title));
    }

    extract_key(url).map(GroupKey)
}
