use rand::Rng;
use shared::{BoundingBox, Feature, FeatureCollection, PopulationProperties};

pub const CLUSTER_COUNT: usize = 5;
pub const MIN_POINTS_PER_CLUSTER: usize = 60;
pub const MAX_POINTS_PER_CLUSTER: usize = 179;
/// Scatter radius around a cluster center, degrees either way per axis.
const POINT_JITTER_DEG: f64 = 0.005;
const MIN_WEIGHT: f64 = 1.0;
const MAX_WEIGHT: f64 = 3.0;

/// One weighted density point. Ephemeral: the whole sample is regenerated
/// every tick and never referenced across ticks.
#[derive(Debug, Clone, Copy)]
pub struct PopulationPoint {
    pub lng: f64,
    pub lat: f64,
    pub weight: f64,
}

/// Fresh density sample: hotspot centers are re-rolled from scratch on
/// every call, then scattered into weighted points. Pure function of the
/// region and randomness; vehicle state plays no part.
pub fn sample_population<R: Rng>(bounds: &BoundingBox, rng: &mut R) -> Vec<PopulationPoint> {
    let mut points = Vec::new();
    for _ in 0..CLUSTER_COUNT {
        let (center_lng, center_lat) = bounds.random_point(rng);
        let count = rng.gen_range(MIN_POINTS_PER_CLUSTER..=MAX_POINTS_PER_CLUSTER);
        for _ in 0..count {
            points.push(PopulationPoint {
                lng: center_lng + rng.gen_range(-POINT_JITTER_DEG..POINT_JITTER_DEG),
                lat: center_lat + rng.gen_range(-POINT_JITTER_DEG..POINT_JITTER_DEG),
                weight: rng.gen_range(MIN_WEIGHT..MAX_WEIGHT),
            });
        }
    }
    points
}

pub fn to_feature_collection(points: &[PopulationPoint]) -> FeatureCollection<PopulationProperties> {
    FeatureCollection::new(
        points
            .iter()
            .map(|point| {
                Feature::point(
                    point.lng,
                    point.lat,
                    PopulationProperties {
                        weight: point.weight,
                    },
                )
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use shared::DEFAULT_BOUNDS;

    #[test]
    fn test_sample_size_bounds() {
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..50 {
            let sample = sample_population(&DEFAULT_BOUNDS, &mut rng);
            assert!(
                (CLUSTER_COUNT * MIN_POINTS_PER_CLUSTER..=CLUSTER_COUNT * MAX_POINTS_PER_CLUSTER)
                    .contains(&sample.len()),
                "sample of {} points outside expected range",
                sample.len()
            );
        }
    }

    #[test]
    fn test_weights_in_range() {
        let mut rng = StdRng::seed_from_u64(2);
        let sample = sample_population(&DEFAULT_BOUNDS, &mut rng);

        for point in &sample {
            assert!((MIN_WEIGHT..MAX_WEIGHT).contains(&point.weight));
        }
    }

    #[test]
    fn test_points_near_region() {
        let mut rng = StdRng::seed_from_u64(3);
        let bounds = DEFAULT_BOUNDS;
        let sample = sample_population(&bounds, &mut rng);

        // Centers are inside the region; points may jitter past the edge
        // by at most the scatter radius.
        for point in &sample {
            assert!(point.lng >= bounds.min_lng - POINT_JITTER_DEG);
            assert!(point.lng <= bounds.max_lng + POINT_JITTER_DEG);
            assert!(point.lat >= bounds.min_lat - POINT_JITTER_DEG);
            assert!(point.lat <= bounds.max_lat + POINT_JITTER_DEG);
        }
    }

    #[test]
    fn test_samples_are_regenerated() {
        let mut rng = StdRng::seed_from_u64(4);
        let first = sample_population(&DEFAULT_BOUNDS, &mut rng);
        let second = sample_population(&DEFAULT_BOUNDS, &mut rng);

        // Two consecutive samples share nothing; identical output would
        // mean the centers were not re-rolled.
        let moved = first
            .iter()
            .zip(&second)
            .any(|(a, b)| a.lng != b.lng || a.lat != b.lat);
        assert!(moved);
    }

    #[test]
    fn test_feature_collection_shape() {
        let points = vec![
            PopulationPoint {
                lng: 100.6,
                lat: 13.75,
                weight: 2.5,
            },
            PopulationPoint {
                lng: 100.61,
                lat: 13.76,
                weight: 1.0,
            },
        ];

        let collection = to_feature_collection(&points);
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.features[0].properties.weight, 2.5);
        assert_eq!(collection.features[1].coordinates(), [100.61, 13.76]);
    }
}
