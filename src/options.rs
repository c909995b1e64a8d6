//! Per-call request options: query parameters, headers and pagination.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, RANGE};
use url::Url;

use crate::error::{Error, Result};

/// Page size the API uses when no `Range` header is sent.
pub const PAGE_SIZE: u32 = 1000;

/// Options of a single request.
///
/// An instance is consumed by exactly one call. Once the client has locked it
/// for dispatch, every mutator fails with [`Error::OptionsLocked`]. Use
/// [`Clone`] to derive a fresh, unlocked copy for another call.
///
/// ```
/// use koios_client::RequestOptions;
///
/// # fn main() -> koios_client::Result<()> {
/// let mut opts = RequestOptions::new();
/// opts.query_set("select", "tx_hash,block_height")?
///     .set_page_size(10)?
///     .set_current_page(2)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RequestOptions {
    query: Vec<(String, String)>,
    headers: HeaderMap,
    page: u32,
    page_size: u32,
    locked: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            query: Vec::new(),
            headers: HeaderMap::new(),
            page: 1,
            page_size: PAGE_SIZE,
            locked: false,
        }
    }
}

impl Clone for RequestOptions {
    fn clone(&self) -> Self {
        Self {
            query: self.query.clone(),
            headers: self.headers.clone(),
            page: self.page,
            page_size: self.page_size,
            locked: false,
        }
    }
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_unlocked(&self) -> Result<()> {
        if self.locked {
            Err(Error::OptionsLocked)
        } else {
            Ok(())
        }
    }

    /// Set a query parameter, replacing any existing values for `key`.
    pub fn query_set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<&mut Self> {
        self.ensure_unlocked()?;
        let key = key.into();
        self.query.retain(|(k, _)| *k != key);
        self.query.push((key, value.into()));
        Ok(self)
    }

    /// Append a query parameter, keeping existing values for `key`.
    pub fn query_add(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<&mut Self> {
        self.ensure_unlocked()?;
        self.query.push((key.into(), value.into()));
        Ok(self)
    }

    /// Remove all values of a query parameter.
    pub fn query_delete(&mut self, key: &str) -> Result<&mut Self> {
        self.ensure_unlocked()?;
        self.query.retain(|(k, _)| k != key);
        Ok(self)
    }

    /// First value of a query parameter.
    pub fn query_get(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn query_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.query.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Set a header, replacing any existing values for `name`.
    pub fn header_set(&mut self, name: &str, value: &str) -> Result<&mut Self> {
        self.ensure_unlocked()?;
        let (name, value) = parse_header(name, value)?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Append a header value, keeping existing values for `name`.
    pub fn header_add(&mut self, name: &str, value: &str) -> Result<&mut Self> {
        self.ensure_unlocked()?;
        let (name, value) = parse_header(name, value)?;
        self.headers.append(name, value);
        Ok(self)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Number of rows per page.
    pub fn set_page_size(&mut self, size: u32) -> Result<&mut Self> {
        self.ensure_unlocked()?;
        if size == 0 {
            return Err(Error::config("page size must be greater than zero"));
        }
        self.page_size = size;
        Ok(self)
    }

    /// 1-based page to fetch.
    pub fn set_current_page(&mut self, page: u32) -> Result<&mut Self> {
        self.ensure_unlocked()?;
        if page == 0 {
            return Err(Error::config("pages are numbered from 1"));
        }
        self.page = page;
        Ok(self)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Mark the options as used and materialize the pagination header.
    ///
    /// Fails if the options were already locked.
    pub(crate) fn lock(&mut self) -> Result<()> {
        self.ensure_unlocked()?;
        self.locked = true;

        if self.page_size != PAGE_SIZE || self.page != 1 {
            let size = u64::from(self.page_size);
            let start = size * u64::from(self.page) - size;
            let end = start + size - 1;
            let range = HeaderValue::from_str(&format!("{start}-{end}"))
                .map_err(|e| Error::config(format!("invalid range header: {e}")))?;
            self.headers.insert(RANGE, range);
        }
        Ok(())
    }

    /// Merge the options into an outgoing request's URL and headers.
    ///
    /// Option headers replace common headers of the same name.
    pub(crate) fn apply(&self, url: &mut Url, headers: &mut HeaderMap) {
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }
        for name in self.headers.keys() {
            headers.remove(name);
            for value in self.headers.get_all(name) {
                headers.append(name.clone(), value.clone());
            }
        }
    }
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let name = HeaderName::try_from(name)
        .map_err(|e| Error::config(format!("invalid header name {name:?}: {e}")))?;
    let value = HeaderValue::try_from(value)
        .map_err(|e| Error::config(format!("invalid header value: {e}")))?;
    Ok((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn range_of(opts: &RequestOptions) -> Option<&str> {
        opts.headers().get(RANGE).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn default_page_sends_no_range() {
        let mut opts = RequestOptions::new();
        opts.set_page_size(PAGE_SIZE).unwrap();
        opts.lock().unwrap();
        assert_eq!(range_of(&opts), None);
    }

    #[test]
    fn second_page_of_ten() {
        let mut opts = RequestOptions::new();
        opts.set_page_size(10).unwrap().set_current_page(2).unwrap();
        opts.lock().unwrap();
        assert_eq!(range_of(&opts), Some("10-19"));
    }

    #[test]
    fn later_page_of_default_size() {
        let mut opts = RequestOptions::new();
        opts.set_current_page(3).unwrap();
        opts.lock().unwrap();
        assert_eq!(range_of(&opts), Some("2000-2999"));
    }

    #[test]
    fn first_page_of_custom_size() {
        let mut opts = RequestOptions::new();
        opts.set_page_size(50).unwrap();
        opts.lock().unwrap();
        assert_eq!(range_of(&opts), Some("0-49"));
    }

    #[test]
    fn lock_twice_fails() {
        let mut opts = RequestOptions::new();
        opts.lock().unwrap();
        let err = opts.lock().unwrap_err();
        assert!(err.is(ErrorKind::OptionsLocked));
    }

    #[test]
    fn clone_is_unlocked_and_independent() {
        let mut opts = RequestOptions::new();
        opts.query_set("_epoch_no", "320").unwrap();
        opts.lock().unwrap();

        let mut copy = opts.clone();
        assert!(!copy.is_locked());
        copy.query_set("_epoch_no", "321").unwrap();
        copy.lock().unwrap();

        assert_eq!(opts.query_get("_epoch_no"), Some("320"));
        assert_eq!(copy.query_get("_epoch_no"), Some("321"));
    }

    #[test]
    fn mutation_after_lock_fails() {
        let mut opts = RequestOptions::new();
        opts.lock().unwrap();
        assert!(opts.query_set("a", "b").is_err());
        assert!(opts.query_add("a", "b").is_err());
        assert!(opts.header_set("x-a", "b").is_err());
        assert!(opts.set_page_size(5).is_err());
        assert!(opts.set_current_page(5).is_err());
    }

    #[test]
    fn query_set_replaces_and_add_appends() {
        let mut opts = RequestOptions::new();
        opts.query_add("order", "block_height.desc").unwrap();
        opts.query_add("order", "tx_hash.asc").unwrap();
        assert_eq!(opts.query_pairs().filter(|(k, _)| *k == "order").count(), 2);

        opts.query_set("order", "epoch_no.asc").unwrap();
        let orders: Vec<_> = opts.query_pairs().filter(|(k, _)| *k == "order").collect();
        assert_eq!(orders, vec![("order", "epoch_no.asc")]);

        opts.query_delete("order").unwrap();
        assert_eq!(opts.query_get("order"), None);
    }

    #[test]
    fn header_set_replaces_and_add_appends() {
        let mut opts = RequestOptions::new();
        opts.header_add("x-trace", "a").unwrap();
        opts.header_add("x-trace", "b").unwrap();
        assert_eq!(opts.headers().get_all("x-trace").iter().count(), 2);

        opts.header_set("x-trace", "c").unwrap();
        let values: Vec<_> = opts.headers().get_all("x-trace").iter().collect();
        assert_eq!(values, vec!["c"]);

        assert!(opts.header_set("bad header", "v").unwrap_err().is(ErrorKind::Config));
    }

    #[test]
    fn zero_page_values_rejected() {
        let mut opts = RequestOptions::new();
        assert!(opts.set_page_size(0).is_err());
        assert!(opts.set_current_page(0).is_err());
    }

    #[test]
    fn apply_merges_query_and_overrides_headers() {
        let mut opts = RequestOptions::new();
        opts.query_set("_epoch_no", "320").unwrap();
        opts.header_set("accept", "application/json; charset=utf-8").unwrap();

        let mut url = Url::parse("https://api.koios.rest/api/v1/totals").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("application/json"));
        headers.insert("origin", HeaderValue::from_static("https://example.com"));

        opts.apply(&mut url, &mut headers);
        assert_eq!(url.as_str(), "https://api.koios.rest/api/v1/totals?_epoch_no=320");
        assert_eq!(headers["accept"], "application/json; charset=utf-8");
        assert_eq!(headers["origin"], "https://example.com");
    }

    #[test]
    fn apply_without_query_leaves_url_untouched() {
        let opts = RequestOptions::new();
        let mut url = Url::parse("https://api.koios.rest/api/v1/tip").unwrap();
        opts.apply(&mut url, &mut HeaderMap::new());
        assert_eq!(url.as_str(), "https://api.koios.rest/api/v1/tip");
    }
}
