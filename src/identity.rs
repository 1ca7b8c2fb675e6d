use crate::types::{EntryIdentity, RawEntry};

/// Returns the first candidate that is present and non-empty after trimming.
fn first_non_empty<'a>(candidates: [Option<&'a str>; 2]) -> Option<&'a str> {
    candidates
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
}

/// Derives the dedup key and display title for an entry.
///
/// Key falls back from `id` to `link`; title falls back from `title` to
/// `link`. If either chain is exhausted the entry has no usable identity
/// and must be skipped by the caller.
pub fn resolve(entry: &RawEntry) -> Option<EntryIdentity> {
    let key = first_non_empty([entry.id.as_deref(), entry.link.as_deref()])?;
    let title = first_non_empty([entry.title.as_deref(), entry.link.as_deref()])?;

    Some(EntryIdentity {
        key: key.to_string(),
        title: title.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: Option<&str>, link: Option<&str>, title: Option<&str>) -> RawEntry {
        RawEntry {
            id: id.map(String::from),
            link: link.map(String::from),
            title: title.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn prefers_id_over_link() {
        let identity = resolve(&entry(Some("a"), Some("http://x"), Some("T"))).unwrap();
        assert_eq!(identity.key, "a");
        assert_eq!(identity.title, "T");
    }

    #[test]
    fn falls_back_to_link_for_key_and_title() {
        let identity = resolve(&entry(None, Some("http://x"), None)).unwrap();
        assert_eq!(identity.key, "http://x");
        assert_eq!(identity.title, "http://x");
    }

    #[test]
    fn empty_id_counts_as_missing() {
        let identity = resolve(&entry(Some("  "), Some("http://x"), Some("T"))).unwrap();
        assert_eq!(identity.key, "http://x");
    }

    #[test]
    fn unresolvable_without_id_and_link() {
        assert!(resolve(&entry(None, None, Some("T"))).is_none());
    }

    #[test]
    fn unresolvable_without_title_and_link() {
        assert!(resolve(&entry(Some("a"), None, None)).is_none());
    }
}
