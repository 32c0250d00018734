// src/levenshtein.rs

//! Edit distance for "did you mean" suggestions

/// Levenshtein distance between two strings, counted in chars
pub fn distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Order candidates by ascending distance of `key(candidate)` to `target`
///
/// The sort is stable: candidates at equal distance keep their input order.
pub fn closest<T, F>(candidates: impl IntoIterator<Item = T>, target: &str, key: F) -> Vec<T>
where
    F: Fn(&T) -> String,
{
    let mut scored: Vec<(usize, T)> = candidates
        .into_iter()
        .map(|candidate| (distance(&key(&candidate), target), candidate))
        .collect();
    scored.sort_by_key(|(score, _)| *score);
    scored.into_iter().map(|(_, candidate)| candidate).collect()
}
