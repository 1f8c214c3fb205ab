//! Name suggestions for unknown identifiers

/// Edit distance (insert, delete, substitute) between two names, by chars
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let target: Vec<char> = b.chars().collect();
    // row[j] = distance between the prefix of `a` seen so far and target[..j]
    let mut row: Vec<usize> = (0..=target.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in target.iter().enumerate() {
            let substitute = diagonal + usize::from(ca != cb);
            diagonal = row[j + 1];
            row[j + 1] = substitute.min(row[j] + 1).min(diagonal + 1);
        }
    }

    row[target.len()]
}

/// Closest candidate within `max_distance`; the earliest one wins ties
pub fn closest_name<'a, I>(name: &str, candidates: I, max_distance: usize) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    candidates
        .into_iter()
        .filter(|candidate| *candidate != name)
        .map(|candidate| (levenshtein_distance(name, candidate), candidate))
        .filter(|(distance, _)| *distance <= max_distance)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate)
}

/// Help note for an unknown name, if something visible is spelled close to it
pub fn suggest(name: &str, visible: &[String]) -> Option<String> {
    let max_distance = name.chars().count().div_ceil(3).clamp(1, 3);
    closest_name(name, visible.iter().map(String::as_str), max_distance)
        .map(|found| format!("did you mean `{found}`?"))
}
