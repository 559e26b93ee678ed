// Table-name configuration shared by the SQLite stores.
//
// Table names end up interpolated into SQL (bind parameters cannot name a
// table), so overrides are restricted to plain identifiers. An invalid
// override keeps the store's default name.

pub(crate) fn resolve_table_name(requested: &str, default: &str) -> String {
    let requested = requested.trim();
    let valid = !requested.is_empty()
        && requested
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        requested.to_string()
    } else {
        tracing::warn!(requested = %requested, default = %default, "invalid table name override ignored");
        default.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_valid_identifiers() {
        assert_eq!(resolve_table_name("blocked_table", "blocked_ips"), "blocked_table");
        assert_eq!(resolve_table_name(" words2 ", "blocked_words"), "words2");
    }

    #[test]
    fn falls_back_on_invalid_identifiers() {
        assert_eq!(resolve_table_name("", "blocked_ips"), "blocked_ips");
        assert_eq!(resolve_table_name("drop table;--", "blocked_ips"), "blocked_ips");
        assert_eq!(resolve_table_name("a b", "blocked_ips"), "blocked_ips");
    }
}
