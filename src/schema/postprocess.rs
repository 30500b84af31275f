//! Reduction of a path registry into output field descriptors

use super::discovery::{next_bracket, parse_range};
use super::types::{FieldDescriptor, PathRegistry};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// `[min:max]` range inside a name
static RANGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+):\d+\]").unwrap());

/// Reduce a registry into the final, name-sorted field list.
///
/// Every nested array level collapses to the lower bound of the index range
/// seen across the sample.
pub fn post_process(registry: PathRegistry, sample_count: usize) -> Vec<FieldDescriptor> {
    let mut fields = Vec::with_capacity(registry.len());
    let mut next_suffix: HashMap<String, usize> = HashMap::new();
    let mut taken: HashSet<String> = HashSet::new();

    for acc in registry.into_accumulators() {
        let path = minimize_path(&acc.path, &acc.name);
        let array_index_info = (acc.name.contains('[') && acc.name.contains(':'))
            .then(|| acc.name.clone());

        let base = display_name(&acc.name);
        let count = next_suffix.entry(base.clone()).or_insert(0);
        let mut name = if *count == 0 {
            base.clone()
        } else {
            format!("{base}_{count}")
        };
        *count += 1;
        while taken.contains(&name) {
            name = format!("{base}_{count}");
            *count += 1;
        }
        taken.insert(name.clone());

        fields.push(FieldDescriptor::discovered(
            &acc,
            name,
            path,
            sample_count,
            array_index_info,
        ));
    }

    fields.sort_by(|a, b| a.name().cmp(b.name()));
    fields
}

/// Replace each `[-]` of the canonical path with the lower bound of the
/// matching range in `name`.
///
/// Everything from the first exact index onwards is kept as is.
pub fn minimize_path(path: &str, name: &str) -> String {
    if !name.contains('[') {
        return path.to_string();
    }

    let mut minimized = String::with_capacity(path.len());
    let mut rest = path;
    let mut rest_name = name;

    while let Some((open, close)) = next_bracket(rest) {
        if &rest[open + 1..close] != "-" {
            break;
        }
        let Some((n_open, n_close)) = next_bracket(rest_name) else {
            break;
        };
        let lower = parse_range(&rest_name[n_open + 1..n_close]).map_or(0, |(min, _)| min);

        minimized.push_str(&rest[..open]);
        minimized.push_str(&format!("[{lower}]"));

        rest = &rest[close + 1..];
        rest_name = &rest_name[n_close + 1..];
    }
    minimized.push_str(rest);

    minimized
}

/// Final `.` segment of a name with ranges compacted to their lower bound
pub fn display_name(name: &str) -> String {
    let leaf = name.rsplit_once('.').map_or(name, |(_, leaf)| leaf);
    RANGE_REGEX.replace_all(leaf, "[$1]").into_owned()
}
