use indexmap::IndexMap;

use crate::constants::{LEGACY_VIDEO_ID, VIDEO_ID_COLUMN};
use crate::table::Table;

/// Header names and fallback choices taken from the example-labels sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExampleColumns {
    pub columns: Vec<String>,
    pub fallback_choices: IndexMap<String, Vec<String>>,
}

/// Normalizes the example sheet header and collects distinct values per column.
///
/// `video_name` (any case) is dropped, `Video ID` becomes `video_id`, and
/// blank header cells are skipped along with their data. A repeated name gets
/// a `.1`, `.2`, ... suffix so every column stays distinct. Column order is
/// preserved; moving `video_id` to the front is left to the caller.
#[must_use]
pub fn normalize_example_table(table: &Table) -> ExampleColumns {
    let mut rows = table.rows();
    let Some(header) = rows.next() else {
        return ExampleColumns::default();
    };

    let mut kept: Vec<(usize, String)> = Vec::with_capacity(header.len());
    for (idx, raw) in header.iter().enumerate() {
        let name = raw.trim();
        if name.is_empty() || name.eq_ignore_ascii_case("video_name") {
            continue;
        }
        let name = if name == LEGACY_VIDEO_ID { VIDEO_ID_COLUMN } else { name };
        let name = if name == VIDEO_ID_COLUMN { name.to_owned() } else { distinct_name(&kept, name) };
        kept.push((idx, name));
    }

    let mut fallback_choices: IndexMap<String, Vec<String>> = IndexMap::new();
    let data: Vec<&[String]> = rows.collect();
    for (idx, name) in kept.iter().filter(|(_, name)| name != VIDEO_ID_COLUMN) {
        let mut values: Vec<String> = Vec::new();
        for row in &data {
            let value = row.get(*idx).map_or("", |v| v.trim());
            if !value.is_empty() && !values.iter().any(|v| v == value) {
                values.push(value.to_owned());
            }
        }
        if !values.is_empty() {
            fallback_choices.entry(name.clone()).or_insert(values);
        }
    }

    ExampleColumns { columns: kept.into_iter().map(|(_, name)| name).collect(), fallback_choices }
}

fn distinct_name(kept: &[(usize, String)], name: &str) -> String {
    let taken = |candidate: &str| kept.iter().any(|(_, k)| k == candidate);
    if !taken(name) {
        return name.to_owned();
    }
    (1_usize..)
        .map(|n| format!("{name}.{n}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| name.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_normalization() {
        let table = Table::from_rows([vec![" VIDEO_NAME ", "Video ID", "", "Emotion"]]);
        let result = normalize_example_table(&table);
        assert_eq!(result.columns, vec!["video_id", "Emotion"]);
        assert!(result.fallback_choices.is_empty());
    }

    #[test]
    fn test_repeated_headers_get_suffixes() {
        let table = Table::from_rows([
            vec!["Video ID", "Emotion", "Emotion", "Emotion"],
            vec!["a", "Sad", "Calm", "Angry"],
        ]);
        let result = normalize_example_table(&table);
        assert_eq!(result.columns, vec!["video_id", "Emotion", "Emotion.1", "Emotion.2"]);
        assert_eq!(result.fallback_choices["Emotion"], vec!["Sad"]);
        assert_eq!(result.fallback_choices["Emotion.1"], vec!["Calm"]);
        assert_eq!(result.fallback_choices["Emotion.2"], vec!["Angry"]);
    }

    #[test]
    fn test_rename_is_case_sensitive() {
        let table = Table::from_rows([vec!["video ID", "Emotion"]]);
        let result = normalize_example_table(&table);
        assert_eq!(result.columns, vec!["video ID", "Emotion"]);
    }

    #[test]
    fn test_distinct_values_first_seen_order() {
        let table = Table::from_rows([
            vec!["Video ID", "Emotion"],
            vec!["a", "Sad"],
            vec!["b", ""],
            vec!["c", "Happy"],
            vec!["d", "Sad"],
        ]);
        let result = normalize_example_table(&table);
        assert_eq!(result.fallback_choices.get("Emotion").unwrap(), &vec!["Sad", "Happy"]);
        assert!(!result.fallback_choices.contains_key("video_id"));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(normalize_example_table(&Table::default()), ExampleColumns::default());
    }
}
