//! Merging of dependency records found by several sources.

use std::collections::HashMap;

use super::{Dependency, HOST_IDS};

/// Reduce extracted records to one [`Dependency`] per id.
///
/// Ids match exactly and case-sensitively. A later record replaces the
/// incumbent only when it carries strictly more catalog aliases, so on a tie
/// the first-seen record is kept. Host ids are dropped. The result is sorted
/// by id.
pub fn normalize(deps: Vec<Dependency>) -> Vec<Dependency> {
    let mut merged: Vec<Dependency> = Vec::with_capacity(deps.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for dep in deps {
        if HOST_IDS.contains(&dep.id.as_str()) {
            continue;
        }
        match index.get(&dep.id) {
            Some(&slot) => {
                if dep.aliases.count() > merged[slot].aliases.count() {
                    tracing::debug!("Preferring {} record with more aliases", dep.id);
                    merged[slot] = dep;
                }
            }
            None => {
                index.insert(dep.id.clone(), merged.len());
                merged.push(dep);
            }
        }
    }

    merged.sort_by(|a, b| a.id.cmp(&b.id));
    merged
}
