/// Marker MovieLens uses for movies with no genre assignment.
const NO_GENRES: &str = "(no genres listed)";

/// Split a pipe-delimited genre field into labels, preserving source order.
/// The `(no genres listed)` sentinel maps to an empty list. Labels are not
/// de-duplicated.
pub fn parse_genres(raw: &str) -> Vec<String> {
    if raw.is_empty() || raw == NO_GENRES {
        return Vec::new();
    }
    raw.split('|')
        .filter(|g| !g.is_empty())
        .map(|g| g.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_preserves_order() {
        assert_eq!(
            parse_genres("Adventure|Animation|Children"),
            vec!["Adventure", "Animation", "Children"]
        );
    }

    #[test]
    fn test_no_genres_sentinel() {
        assert!(parse_genres("(no genres listed)").is_empty());
    }

    #[test]
    fn test_empty_field() {
        assert!(parse_genres("").is_empty());
    }

    #[test]
    fn test_single_genre() {
        assert_eq!(parse_genres("Drama"), vec!["Drama"]);
    }

    #[test]
    fn test_duplicates_kept() {
        assert_eq!(parse_genres("Drama|Drama"), vec!["Drama", "Drama"]);
    }
}
