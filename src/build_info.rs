//! Compile-time build information, shown by `hummingbird --version`.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_is_short_hash_or_unknown() {
        assert!(BUILD_COMMIT == "unknown" || BUILD_COMMIT.len() == 7);
    }

    #[test]
    fn test_version_mentions_package_and_commit() {
        assert!(BUILD_VERSION.starts_with(env!("CARGO_PKG_VERSION")));
        assert!(BUILD_VERSION.contains(BUILD_COMMIT));
        assert!(BUILD_VERSION.contains(BUILD_DATE));
    }
}
