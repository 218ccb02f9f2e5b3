//! Maximal-set reduction

use crate::recipe_set::RecipeSet;

/// Keep only the sets that are not a proper subset of another input set.
///
/// Candidates are visited largest first, so any strict superset of a
/// candidate has already been seen and is either kept or itself contained in
/// a kept set; comparing against the kept sets is therefore enough. The result
/// is an antichain, largest sets first, ties in ascending bit order.
pub fn maximal_sets(feasible: &[RecipeSet]) -> Vec<RecipeSet> {
    let mut candidates = feasible.to_vec();
    candidates.sort_unstable_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    candidates.dedup();

    let mut maximal: Vec<RecipeSet> = Vec::new();
    for candidate in candidates {
        if candidate.is_empty() {
            continue;
        }
        if !maximal
            .iter()
            .any(|kept| candidate.is_proper_subset_of(*kept))
        {
            maximal.push(candidate);
        }
    }
    maximal
}
