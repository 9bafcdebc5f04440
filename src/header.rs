use std::collections::BTreeMap;

/// HTTP header collection keyed by the canonical form of the name, e.g. `content-type` and
/// `CONTENT-TYPE` are both stored as `Content-Type`. Each name holds a list of values.
///
/// Names and values are not validated. Anything API GW or a handler supplies is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header(BTreeMap<String, Vec<String>>);

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` to any values already stored under `name`.
    pub fn add(&mut self, name: &str, value: impl Into<String>) {
        self.0.entry(canonical_header_key(name)).or_default().push(value.into());
    }

    /// Replaces all values stored under `name` with `value`.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(canonical_header_key(name), vec![value.into()]);
    }

    /// Returns the first value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }

    /// Returns all values stored under `name`, possibly none.
    pub fn get_all(&self, name: &str) -> &[String] {
        self.0.get(&canonical_header_key(name)).map(Vec::as_slice).unwrap_or_default()
    }

    /// Removes `name` and all its values. Returns the removed values.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.0.remove(&canonical_header_key(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(&canonical_header_key(name))
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over canonical names and their values in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Header {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut header = Header::new();
        for (name, value) in iter {
            header.add(name, value);
        }
        header
    }
}

/// Returns the canonical form of a header name: the first letter and any letter following a hyphen
/// are upper-cased, the rest are lower-cased, e.g. `x-forwarded-for` becomes `X-Forwarded-For`.
/// A name with a space or any other character not allowed in an HTTP token is returned unchanged.
pub fn canonical_header_key(name: &str) -> String {
    if !name.bytes().all(is_token_byte) {
        return name.to_owned();
    }

    let mut upper = true;
    name.chars()
        .map(|c| {
            let c_out = if upper { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() };
            upper = c == '-';
            c_out
        })
        .collect()
}

/// See https://www.rfc-editor.org/rfc/rfc9110#name-tokens
fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_keys() {
        let vals = vec![
            ("content-type", "Content-Type"),
            ("CONTENT-TYPE", "Content-Type"),
            ("x-forwarded-for", "X-Forwarded-For"),
            ("host", "Host"),
            ("X-Test", "X-Test"),
            ("x--a", "X--A"),
            ("-x", "-X"),
            ("www-authenticate", "Www-Authenticate"),
            ("x_amz_id", "X_amz_id"),
            // not a token - kept as is
            ("bad header", "bad header"),
            ("bad:header", "bad:header"),
            ("ünicode", "ünicode"),
            ("", ""),
        ];

        for (name, expected) in vals {
            assert_eq!(canonical_header_key(name), expected, "for `{}`", name);
        }
    }

    #[test]
    fn case_insensitive_access() {
        let mut header = Header::new();
        header.add("content-type", "text/plain");

        assert_eq!(header.get("Content-Type"), Some("text/plain"));
        assert_eq!(header.get("CONTENT-TYPE"), Some("text/plain"));
        assert!(header.contains("content-TYPE"));
        assert_eq!(header.iter().next().map(|(k, _)| k), Some("Content-Type"));

        assert_eq!(header.remove("CONTENT-type"), Some(vec!["text/plain".to_owned()]));
        assert!(header.is_empty());
        assert_eq!(header.get("Content-Type"), None);
        assert!(header.get_all("Content-Type").is_empty());
    }

    #[test]
    fn add_and_set() {
        let mut header = Header::new();
        header.add("Set-Cookie", "a=1");
        header.add("set-cookie", "b=2");
        assert_eq!(header.get("Set-Cookie"), Some("a=1"));
        assert_eq!(header.get_all("Set-Cookie"), &["a=1".to_owned(), "b=2".to_owned()]);
        assert_eq!(header.len(), 1);

        header.set("SET-COOKIE", "c=3");
        assert_eq!(header.get_all("Set-Cookie"), &["c=3".to_owned()]);
    }

    #[test]
    fn values_are_not_validated() {
        let header: Header = vec![("x-bin", "line\r\nbreak"), ("bad name", "")].into_iter().collect();

        assert_eq!(header.get("X-Bin"), Some("line\r\nbreak"));
        assert_eq!(header.get("bad name"), Some(""));
        assert_eq!(header.get("Bad Name"), None);
    }
}
