//! Semantic version parsing tolerant of common prefixes.
//!
//! Upstream sites and git tags decorate versions with prefixes like
//! `v1.2.3` or `release-1.2.3`. Comparison must still be semantic, never
//! lexicographic: "2.10.0" is newer than "2.9.0".

use anyhow::Result;
use semver::Version;

/// Parse a version string, stripping common prefixes first.
///
/// Supported forms: `1.2.3`, `v1.2.3`, `version-1.2.3`, `release-1.2.3`.
///
/// # Errors
///
/// Returns an error if the string, after prefix removal, is not a valid
/// semantic version.
pub fn parse_lenient(version_str: &str) -> Result<Version> {
    let clean = if let Some(stripped) = version_str.strip_prefix("version-") {
        stripped
    } else if let Some(stripped) = version_str.strip_prefix("release-") {
        stripped
    } else if let Some(stripped) = version_str.strip_prefix('v') {
        stripped
    } else {
        version_str
    };

    Ok(Version::parse(clean)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_prefixes() {
        for input in ["1.0.0", "v1.0.0", "version-1.0.0", "release-1.0.0"] {
            assert_eq!(parse_lenient(input).unwrap(), Version::new(1, 0, 0));
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_lenient("stable").is_err());
        assert!(parse_lenient("").is_err());
        assert!(parse_lenient("1.2").is_err());
    }

    #[test]
    fn test_ordering_is_semantic_not_lexicographic() {
        let newer = parse_lenient("2.10.0").unwrap();
        let older = parse_lenient("2.9.0").unwrap();
        assert!(newer > older);
        // String comparison would get this backwards
        assert!("2.10.0" < "2.9.0");
    }

    #[test]
    fn test_ordering_table() {
        let v = |s: &str| parse_lenient(s).unwrap();
        assert_eq!(v("2.0.0"), v("2.0.0"));
        assert!(v("1.0.0") < v("1.0.1"));
        assert!(v("2.21.2") > v("2.21.1"));
    }
}
