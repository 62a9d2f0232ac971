pub(crate) mod error;

/// Returns `"[name] "` for a named map and an empty string otherwise, to be
/// prepended to log messages.
#[cfg(feature = "logging")]
pub(crate) fn name_prefix(name: Option<&str>) -> String {
    name.map(|name| format!("[{name}] ")).unwrap_or_default()
}

#[cfg(all(test, feature = "logging"))]
mod tests {
    use super::name_prefix;

    #[test]
    fn prefix() {
        assert_eq!(name_prefix(Some("users")), "[users] ");
        assert_eq!(name_prefix(None), "");
    }
}
