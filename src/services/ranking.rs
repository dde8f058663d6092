/// Budget/radius filtering and popularity-distance ranking
///
/// The score is a weighted blend of a popularity signal and proximity. The
/// popularity signal is `p * ln(1 + p)`, max-normalized over the surviving
/// candidate set so the weights stay meaningful regardless of the scale the
/// source reports popularity in; proximity is `1 - distance/radius`. Places
/// without a popularity value contribute the minimum signal.
use crate::{
    geo,
    models::{Coordinates, Place, PriceLevel, RankedPlace, RankedResult, RecommendationRequest},
};

/// Weight of the normalized popularity signal in the final score
pub const POPULARITY_WEIGHT: f64 = 0.7;
/// Weight of the proximity signal in the final score; the two weights sum to 1
pub const DISTANCE_WEIGHT: f64 = 0.3;

/// Estimated per-person spend for each known price level, in the same
/// currency units as the request budget. A place is excluded when its
/// estimate exceeds the per-person budget; unknown price is never excluded.
pub const MODERATE_MIN_SPEND: f64 = 200.0;
pub const EXPENSIVE_MIN_SPEND: f64 = 500.0;
pub const LUXURY_MIN_SPEND: f64 = 1200.0;

fn estimated_spend(level: PriceLevel) -> f64 {
    match level {
        PriceLevel::Budget => 0.0,
        PriceLevel::Moderate => MODERATE_MIN_SPEND,
        PriceLevel::Expensive => EXPENSIVE_MIN_SPEND,
        PriceLevel::Luxury => LUXURY_MIN_SPEND,
    }
}

fn popularity_signal(popularity: Option<f64>) -> f64 {
    match popularity {
        Some(p) if p > 0.0 && p.is_finite() => p * p.ln_1p(),
        _ => 0.0,
    }
}

/// Filters and orders candidates for a request
///
/// An empty survivor set is a valid outcome, not an error. The ordering is
/// total and deterministic: score descending, then distance ascending, then
/// identifier.
pub fn rank(
    places: Vec<Place>,
    center: Coordinates,
    request: &RecommendationRequest,
    limit: usize,
) -> RankedResult {
    let budget_pp = request.budget_per_person();

    let survivors: Vec<(Place, f64)> = places
        .into_iter()
        .map(|place| {
            let distance = geo::haversine_m(center, place.coords);
            (place, distance)
        })
        .filter(|(_, distance)| *distance <= request.radius)
        .filter(|(place, _)| match place.price {
            Some(level) => estimated_spend(level) <= budget_pp,
            None => true,
        })
        .collect();

    let max_signal = survivors
        .iter()
        .map(|(place, _)| popularity_signal(place.popularity))
        .fold(0.0_f64, f64::max);

    let mut ranked: Vec<RankedPlace> = survivors
        .into_iter()
        .map(|(place, distance_m)| {
            let pop_norm = if max_signal > 0.0 {
                popularity_signal(place.popularity) / max_signal
            } else {
                0.0
            };
            let proximity = (1.0 - distance_m / request.radius).clamp(0.0, 1.0);
            let score = POPULARITY_WEIGHT * pop_norm + DISTANCE_WEIGHT * proximity;

            RankedPlace {
                place,
                distance_m,
                score,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.distance_m.total_cmp(&b.distance_m))
            .then_with(|| a.place.id.cmp(&b.place.id))
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Source;

    fn place(id: &str, lat: f64, lon: f64, popularity: Option<f64>, price: Option<PriceLevel>) -> Place {
        Place {
            id: id.to_string(),
            name: id.to_string(),
            coords: Coordinates::new(lat, lon).unwrap(),
            address: None,
            popularity,
            price,
            photo: None,
            source: Source::Offline,
        }
    }

    fn request(budget: f64, people: u32, radius: f64) -> RecommendationRequest {
        RecommendationRequest {
            start: "Kothrud, Pune".to_string(),
            budget,
            people,
            radius,
        }
    }

    fn center() -> Coordinates {
        Coordinates::new(18.5204, 73.8567).unwrap()
    }

    #[test]
    fn test_radius_filter_excludes_far_places() {
        let places = vec![
            place("near", 18.5210, 73.8570, Some(5.0), None),
            // ~15 km out
            place("far", 18.6500, 73.9900, Some(9.0), None),
        ];

        let ranked = rank(places, center(), &request(1000.0, 1, 5000.0), 12);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].place.id, "near");
        assert!(ranked[0].distance_m <= 5000.0);
    }

    #[test]
    fn test_budget_filter_excludes_expensive_known_price() {
        // budget 2000 for 2 people -> 1000 per person: Luxury (1200) is out,
        // Expensive (500) stays
        let places = vec![
            place("affordable", 18.5210, 73.8570, Some(5.0), Some(PriceLevel::Expensive)),
            place("too_pricey", 18.5212, 73.8572, Some(9.0), Some(PriceLevel::Luxury)),
        ];

        let ranked = rank(places, center(), &request(2000.0, 2, 8000.0), 12);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].place.id, "affordable");
    }

    #[test]
    fn test_unknown_price_is_never_excluded_by_budget() {
        let places = vec![
            place("unknown_price", 18.5210, 73.8570, Some(5.0), None),
            place("luxury", 18.5212, 73.8572, Some(5.0), Some(PriceLevel::Luxury)),
        ];

        // Tiny budget: the luxury place goes, the unpriced one stays
        let ranked = rank(places, center(), &request(50.0, 1, 8000.0), 12);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].place.id, "unknown_price");
    }

    #[test]
    fn test_higher_popularity_wins_at_equal_distance() {
        let places = vec![
            place("quiet", 18.5210, 73.8570, Some(1.0), None),
            place("popular", 18.5210, 73.8570, Some(50.0), None),
        ];

        let ranked = rank(places, center(), &request(1000.0, 1, 8000.0), 12);
        assert_eq!(ranked[0].place.id, "popular");
        assert_eq!(ranked[1].place.id, "quiet");
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn test_closer_place_wins_at_equal_popularity() {
        let places = vec![
            place("farther", 18.5600, 73.9000, Some(5.0), None),
            place("closer", 18.5210, 73.8570, Some(5.0), None),
        ];

        let ranked = rank(places, center(), &request(1000.0, 1, 10_000.0), 12);
        assert_eq!(ranked[0].place.id, "closer");
    }

    #[test]
    fn test_missing_popularity_ranks_below_any_known_popularity() {
        let places = vec![
            place("no_pop", 18.5210, 73.8570, None, None),
            place("some_pop", 18.5600, 73.9000, Some(2.0), None),
        ];

        let ranked = rank(places, center(), &request(1000.0, 1, 10_000.0), 12);
        // Popularity carries 0.7 of the score, so a known-popular place beats
        // a closer unknown one
        assert_eq!(ranked[0].place.id, "some_pop");
    }

    #[test]
    fn test_tie_broken_by_identifier_for_determinism() {
        let places = vec![
            place("b_spot", 18.5210, 73.8570, Some(5.0), None),
            place("a_spot", 18.5210, 73.8570, Some(5.0), None),
        ];

        let ranked = rank(places.clone(), center(), &request(1000.0, 1, 8000.0), 12);
        assert_eq!(ranked[0].place.id, "a_spot");
        assert_eq!(ranked[1].place.id, "b_spot");

        // Same input, same order
        let again = rank(places, center(), &request(1000.0, 1, 8000.0), 12);
        let ids: Vec<&str> = again.iter().map(|r| r.place.id.as_str()).collect();
        assert_eq!(ids, vec!["a_spot", "b_spot"]);
    }

    #[test]
    fn test_limit_truncates() {
        let places: Vec<Place> = (0..20)
            .map(|i| place(&format!("p{:02}", i), 18.5210, 73.8570, Some(i as f64), None))
            .collect();

        let ranked = rank(places, center(), &request(1000.0, 1, 8000.0), 5);
        assert_eq!(ranked.len(), 5);
    }

    #[test]
    fn test_empty_input_is_empty_output() {
        let ranked = rank(vec![], center(), &request(1000.0, 1, 8000.0), 12);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_all_filtered_out_is_empty_not_error() {
        let places = vec![place("far", 18.9, 74.2, Some(5.0), None)];
        let ranked = rank(places, center(), &request(1000.0, 1, 1000.0), 12);
        assert!(ranked.is_empty());
    }
}
