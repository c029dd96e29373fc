//! District lookup from a free-text city, town or landmark name.

/// Well-known localities and the district they belong to.
const LANDMARKS: &[(&str, &str)] = &[
    ("gomti", "Lucknow"),
    ("hazratganj", "Lucknow"),
    ("alambagh", "Lucknow"),
    ("assi", "Varanasi"),
    ("godowlia", "Varanasi"),
    ("bhu", "Varanasi"),
    ("iit kanpur", "Kanpur"),
    ("kanpur central", "Kanpur"),
    ("taj mahal", "Agra"),
    ("agra fort", "Agra"),
];

/// Districts from `candidates` that plausibly match `query`.
///
/// A candidate matches when either name contains the other
/// (case-insensitive), or when the query mentions a known landmark of that
/// district. Results keep candidate order, landmark hits last, without
/// duplicates.
pub fn suggest_sub_regions(query: &str, candidates: &[String]) -> Vec<String> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut suggestions: Vec<String> = candidates
        .iter()
        .filter(|district| {
            let lower = district.to_lowercase();
            lower.contains(&query) || query.contains(&lower)
        })
        .cloned()
        .collect();

    for (landmark, district) in LANDMARKS {
        if query.contains(landmark)
            && candidates.iter().any(|c| c == district)
            && !suggestions.iter().any(|s| s == district)
        {
            suggestions.push(district.to_string());
        }
    }

    suggestions
}
