//! Version parsing and comparison for Go module versions

use semver::Version;
use std::cmp::Ordering;

/// A Go module version such as `v1.2.3`, `v0.0.0-20230101120000-abcdef123456`
/// or the shorthand `v1.2`.
///
/// Go versions always carry a leading `v`. The shorthands `vMAJOR` and
/// `vMAJOR.MINOR` are valid only when nothing follows them and expand with
/// zeros. Build metadata (`+incompatible`) is accepted but never affects
/// ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoVersion {
    inner: Version,
}

impl GoVersion {
    /// Parse a Go version, returning `None` when it is not valid semver
    pub fn parse(raw: &str) -> Option<Self> {
        let rest = raw.strip_prefix('v')?;
        let core_end = rest.find(['-', '+']).unwrap_or(rest.len());
        let dots = rest[..core_end].matches('.').count();

        let normalized = match dots {
            2 => rest.to_string(),
            0 if core_end == rest.len() => format!("{}.0.0", rest),
            1 if core_end == rest.len() => format!("{}.0", rest),
            _ => return None,
        };

        Version::parse(&normalized).ok().map(|inner| Self { inner })
    }

    /// Whether this is a pseudo-version generated for an untagged revision
    pub fn is_pseudo(&self) -> bool {
        let pre = self.inner.pre.as_str();
        if pre.is_empty() {
            return false;
        }

        let idents: Vec<&str> = pre.split('.').collect();
        let Some((last, before)) = idents.split_last() else {
            return false;
        };

        let stamped = match last.split_once('-') {
            Some((timestamp, rev)) => {
                timestamp.len() == 14
                    && timestamp.bytes().all(|b| b.is_ascii_digit())
                    && !rev.is_empty()
                    && rev.bytes().all(|b| b.is_ascii_alphanumeric())
            }
            None => false,
        };
        if !stamped {
            return false;
        }

        match before.last() {
            // vX.0.0-yyyymmddhhmmss-abcdef
            None => self.inner.minor == 0 && self.inner.patch == 0,
            // vX.Y.Z-pre.0.yyyymmddhhmmss-abcdef or vX.Y.Z-0.yyyymmddhhmmss-abcdef
            Some(&zero) => zero == "0",
        }
    }
}

impl PartialOrd for GoVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GoVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let a = &self.inner;
        let b = &other.inner;
        (a.major, a.minor, a.patch, &a.pre).cmp(&(b.major, b.minor, b.patch, &b.pre))
    }
}

/// Whether `raw` is a valid Go semantic version
pub fn is_valid(raw: &str) -> bool {
    GoVersion::parse(raw).is_some()
}

/// Compare two Go versions.
///
/// An invalid version sorts below every valid one, and two invalid versions
/// compare equal.
pub fn compare(a: &str, b: &str) -> Ordering {
    match (GoVersion::parse(a), GoVersion::parse(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Whether `raw` is a pseudo-version
pub fn is_pseudo_version(raw: &str) -> bool {
    GoVersion::parse(raw).is_some_and(|v| v.is_pseudo())
}
