use crate::domain::Coordinate;
use regex::Regex;
use std::sync::LazyLock;

static COORDINATE_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+\.\d+,-?\d+\.\d+").expect("pattern is a literal"));

/// First `lat,lng`-shaped decimal pair in the body, in document order. Later
/// pairs are discarded; anything that fails to parse yields `None`.
pub fn first_coordinate(body: &str) -> Option<Coordinate> {
    let matched = COORDINATE_PAIR.find(body)?;
    let (latitude, longitude) = matched.as_str().split_once(',')?;

    Some(Coordinate {
        latitude: latitude.parse().ok()?,
        longitude: longitude.parse().ok()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("...42.3601,-71.0589...", 42.3601, -71.0589)]
    #[case("[[51.8615899,4.3580323],[48.858093,2.294694]]", 51.8615899, 4.3580323)]
    #[case("-33.856784,-151.215297", -33.856784, -151.215297)]
    #[case("noise 0.5,0.25 more", 0.5, 0.25)]
    fn takes_the_first_pair_in_document_order(#[case] body: &str, #[case] latitude: f64, #[case] longitude: f64) {
        assert_eq!(first_coordinate(body), Some(Coordinate { latitude, longitude }));
    }

    #[rstest]
    #[case("")]
    #[case("no coordinates here")]
    #[case("42,71")]
    #[case("42.,-71.")]
    #[case("lat: 42.3601 lng: -71.0589")]
    fn bodies_without_a_pair_yield_nothing(#[case] body: &str) {
        assert_eq!(first_coordinate(body), None);
    }

    #[test]
    fn scans_a_full_panorama_response() {
        let body = include_str!("../../tests/resources/image_search_response.txt");

        assert_eq!(
            first_coordinate(body),
            Some(Coordinate {
                latitude: 48.858093,
                longitude: 2.294694
            })
        );
    }
}
