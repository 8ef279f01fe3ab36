use crate::route::{RouteDecision, RouteKind};

pub fn slug_of(normalized: &str) -> String {
    normalized.replace(' ', "-")
}

pub fn phrase_of(slug: &str) -> String {
    slug.replace('-', " ")
}

/// The one address that keys generation for this route.
pub fn canonical_path(route: &RouteDecision) -> String {
    match route.kind {
        RouteKind::Word => format!("/word/{}", route.normalized),
        RouteKind::LexicalUnit => format!("/lexical-unit/{}", slug_of(&route.normalized)),
    }
}

pub fn should_redirect(addressed: &str, canonical: &str) -> bool {
    slug_of(addressed) != slug_of(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::classify_route;

    #[test]
    fn slug_and_phrase_are_inverse_for_spaced_input() {
        assert_eq!(slug_of("take over"), "take-over");
        assert_eq!(phrase_of("take-over"), "take over");
    }

    #[test]
    fn word_route_maps_to_the_word_page() {
        assert_eq!(canonical_path(&classify_route("run")), "/word/run");
    }

    #[test]
    fn lexical_route_maps_to_a_hyphenated_slug() {
        assert_eq!(
            canonical_path(&classify_route("kick the bucket")),
            "/lexical-unit/kick-the-bucket"
        );
    }

    #[test]
    fn redirect_fires_only_on_slug_mismatch() {
        assert!(should_redirect("running", "run"));
        assert!(should_redirect("run-s", "run"));
        assert!(!should_redirect("take-over", "take over"));
        assert!(!should_redirect("run", "run"));
    }

    #[test]
    fn full_paths_compare_across_kinds() {
        assert!(should_redirect("/lexical-unit/apple", "/word/apple"));
        let canonical = canonical_path(&classify_route("take over"));
        assert!(!should_redirect("/lexical-unit/take-over", &canonical));
    }
}
