//! Pagination of missing entries into fixed-size page files.

use super::{EntryMap, to_pretty_json};
use crate::error::Result;
use crate::fs;
use std::path::Path;

/// Write `missing` into `dir` as `missing_00001.json`, `missing_00002.json`, …
///
/// Pages hold at most `per_page` entries in the iteration order of `missing`;
/// the final page may be partial and is still written. An empty map writes no
/// files. Returns the number of page files written.
pub fn write_missing_pages(missing: &EntryMap, dir: &Path, per_page: usize) -> Result<usize> {
    let pages = pages(missing, per_page);

    for (index, page) in pages.iter().enumerate() {
        let path = dir.join(format!("missing_{:05}.json", index + 1));
        fs::atomic_write_file(&path, &to_pretty_json(page)?)?;
    }

    Ok(pages.len())
}

/// Split `missing` into pages of at most `per_page` entries.
fn pages(missing: &EntryMap, per_page: usize) -> Vec<EntryMap> {
    let mut pages = Vec::new();
    let mut current = EntryMap::new();

    for (key, value) in missing {
        current.insert(key.clone(), value.clone());
        if current.len() == per_page {
            pages.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        pages.push(current);
    }

    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn missing_of(count: usize) -> EntryMap {
        (0..count)
            .map(|i| (format!("key_{:04}", i), json!(format!("value {}", i))))
            .collect()
    }

    #[test]
    fn exact_multiple_fills_every_page() {
        let result = pages(&missing_of(530), 265);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].len(), 265);
        assert_eq!(result[1].len(), 265);
    }

    #[test]
    fn remainder_becomes_a_partial_last_page() {
        let result = pages(&missing_of(531), 265);
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].len(), 265);
        assert_eq!(result[1].len(), 265);
        assert_eq!(result[2].len(), 1);
    }

    #[test]
    fn fewer_entries_than_page_size_yields_one_page() {
        let result = pages(&missing_of(3), 265);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].len(), 3);
    }

    #[test]
    fn empty_map_yields_no_pages() {
        assert!(pages(&EntryMap::new(), 265).is_empty());
    }

    #[test]
    fn pages_preserve_iteration_order() {
        let result = pages(&missing_of(5), 2);
        let keys: Vec<_> = result
            .iter()
            .flat_map(|page| page.keys().cloned())
            .collect();
        assert_eq!(keys, vec!["key_0000", "key_0001", "key_0002", "key_0003", "key_0004"]);
    }

    #[test]
    fn write_missing_pages_numbers_files_from_one() {
        let dir = tempfile::TempDir::new().unwrap();
        let written = write_missing_pages(&missing_of(5), dir.path(), 2).unwrap();

        assert_eq!(written, 3);
        assert!(dir.path().join("missing_00001.json").exists());
        assert!(dir.path().join("missing_00002.json").exists());
        assert!(dir.path().join("missing_00003.json").exists());
        assert!(!dir.path().join("missing_00004.json").exists());

        let last: EntryMap = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("missing_00003.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(last.len(), 1);
        assert!(last.contains_key("key_0004"));
    }

    #[test]
    fn write_missing_pages_writes_nothing_for_empty_map() {
        let dir = tempfile::TempDir::new().unwrap();
        let written = write_missing_pages(&EntryMap::new(), dir.path(), 265).unwrap();

        assert_eq!(written, 0);
        assert!(!dir.path().join("missing_00001.json").exists());
    }
}
