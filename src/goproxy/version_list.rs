//! Version list maintenance for the `<module>/@v/list` artifact.

/// Append `v<version>` as a new line to the existing list content.
///
/// No de-duplication happens here: a retried publish appends the same line
/// again, and readers see it twice. Empty content yields a one-line result.
pub fn append_version(existing: &[u8], version: &str) -> Vec<u8> {
    let existing = String::from_utf8_lossy(existing);
    let mut lines: Vec<&str> = existing.split('\n').filter(|l| !l.is_empty()).collect();
    let tagged = format!("v{}", version);
    lines.push(&tagged);
    lines.join("\n").into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_yields_one_line() {
        assert_eq!(append_version(b"", "0.0.1"), b"v0.0.1");
    }

    #[test]
    fn appends_in_call_order() {
        let once = append_version(b"", "0.0.1");
        let twice = append_version(&once, "0.0.2");
        assert_eq!(twice, b"v0.0.1\nv0.0.2");
    }

    #[test]
    fn duplicate_versions_are_kept() {
        let once = append_version(b"", "0.0.1");
        let twice = append_version(&once, "0.0.1");
        assert_eq!(twice, b"v0.0.1\nv0.0.1");
    }
}
