use std::collections::{BTreeMap, BTreeSet};

use crate::models::QuestionRecord;

/// Categories present in `pool`, each with its sorted subcategories.
pub fn categories(pool: &[QuestionRecord]) -> BTreeMap<String, Vec<String>> {
    let mut map: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for question in pool {
        map.entry(question.category().to_string())
            .or_default()
            .insert(question.subcategory().to_string());
    }

    map.into_iter()
        .map(|(category, subcategories)| (category, subcategories.into_iter().collect()))
        .collect()
}

/// Number of questions filed under `category` / `subcategory`.
pub fn count_in(pool: &[QuestionRecord], category: &str, subcategory: &str) -> usize {
    pool.iter()
        .filter(|q| q.category() == category && q.subcategory() == subcategory)
        .count()
}
