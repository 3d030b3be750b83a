use indexmap::IndexMap;

use crate::table::Table;

const FIELD_COL: usize = 1;
const VALUE_COL: usize = 2;

/// Parses the hand-laid-out features sheet into per-field choice lists.
///
/// Column B names a field, column C holds one allowed value. A row with an
/// empty B carries the previous field forward, so a field spans several rows.
/// Rows before the first field are dropped, `video_name` fields are ignored,
/// and each list is cleaned of blanks and `nan` and deduplicated in
/// first-seen order.
#[must_use]
pub fn parse_features_table(table: &Table) -> IndexMap<String, Vec<String>> {
    let mut choices: IndexMap<String, Vec<String>> = IndexMap::new();
    if table.width() < 2 {
        return choices;
    }

    let mut current: Option<String> = None;
    for row in table.rows() {
        let field = row.get(FIELD_COL).map_or("", |v| v.trim());
        let value = row.get(VALUE_COL).map_or("", |v| v.trim());

        if !field.is_empty() && !field.eq_ignore_ascii_case("nan") {
            choices.entry(field.to_owned()).or_default();
            current = Some(field.to_owned());
        }
        if value.is_empty() {
            continue;
        }
        if let Some(list) = current.as_ref().and_then(|f| choices.get_mut(f)) {
            list.push(value.to_owned());
        }
    }

    choices.retain(|field, _| !field.eq_ignore_ascii_case("video_name"));
    for values in choices.values_mut() {
        dedup_clean(values);
    }
    choices
}

fn dedup_clean(values: &mut Vec<String>) {
    let mut clean: Vec<String> = Vec::with_capacity(values.len());
    for v in values.drain(..) {
        if v.is_empty() || v.eq_ignore_ascii_case("nan") || clean.contains(&v) {
            continue;
        }
        clean.push(v);
    }
    *values = clean;
}
