use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_VEHICLE_COUNT: usize = 25;
pub const DEFAULT_TICK_MILLIS: u64 = 1000;
/// Central Bangkok, the default sampling and clamping region.
pub const DEFAULT_BOUNDS: BoundingBox = BoundingBox::new(100.55, 13.70, 100.68, 13.78);

/// Fixed longitude/latitude rectangle used for random sampling and for
/// clamping vehicle motion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub const fn new(min_lng: f64, min_lat: f64, max_lng: f64, max_lat: f64) -> Self {
        Self {
            min_lng,
            min_lat,
            max_lng,
            max_lat,
        }
    }

    /// An inverted or degenerate box is a configuration error, not a
    /// runtime condition; callers validate once at startup.
    pub fn is_valid(&self) -> bool {
        self.min_lng < self.max_lng && self.min_lat < self.max_lat
    }

    pub fn contains(&self, lng: f64, lat: f64) -> bool {
        lng >= self.min_lng && lng <= self.max_lng && lat >= self.min_lat && lat <= self.max_lat
    }

    pub fn clamp_lng(&self, lng: f64) -> f64 {
        lng.clamp(self.min_lng, self.max_lng)
    }

    pub fn clamp_lat(&self, lat: f64) -> f64 {
        lat.clamp(self.min_lat, self.max_lat)
    }

    /// Uniform random point inside the box. Requires a valid box.
    pub fn random_point<R: Rng>(&self, rng: &mut R) -> (f64, f64) {
        (
            rng.gen_range(self.min_lng..self.max_lng),
            rng.gen_range(self.min_lat..self.max_lat),
        )
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_lng, self.min_lat, self.max_lng, self.max_lat
        )
    }
}

impl FromStr for BoundingBox {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(format!(
                "expected minLng,minLat,maxLng,maxLat but got {} value(s)",
                parts.len()
            ));
        }
        let mut coords = [0.0; 4];
        for (i, part) in parts.iter().enumerate() {
            coords[i] = part
                .parse::<f64>()
                .map_err(|e| format!("invalid coordinate '{}': {}", part, e))?;
        }
        Ok(BoundingBox::new(coords[0], coords[1], coords[2], coords[3]))
    }
}

/// GeoJSON point geometry. Coordinates are [longitude, latitude].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: [f64; 2] },
}

/// GeoJSON feature carrying typed properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature<P> {
    pub properties: P,
    pub geometry: Geometry,
}

impl<P> Feature<P> {
    pub fn point(lng: f64, lat: f64, properties: P) -> Self {
        Self {
            properties,
            geometry: Geometry::Point {
                coordinates: [lng, lat],
            },
        }
    }

    pub fn coordinates(&self) -> [f64; 2] {
        match self.geometry {
            Geometry::Point { coordinates } => coordinates,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection<P> {
    pub features: Vec<Feature<P>>,
}

impl<P> FeatureCollection<P> {
    pub fn new(features: Vec<Feature<P>>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Properties attached to each vehicle feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleProperties {
    pub id: String,
    pub bearing: f64,
    pub speed: f64,
}

/// Properties attached to each population sample feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationProperties {
    pub weight: f64,
}

/// Subscriber-bound message envelope. Serializes to the wire format
/// `{"type":"hello","ok":true}`, `{"type":"vehicles","data":{...}}`,
/// `{"type":"population","data":{...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    Hello {
        ok: bool,
    },
    Vehicles {
        data: FeatureCollection<VehicleProperties>,
    },
    Population {
        data: FeatureCollection<PopulationProperties>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_bounds_valid() {
        assert!(DEFAULT_BOUNDS.is_valid());
    }

    #[test]
    fn test_inverted_bounds_invalid() {
        let inverted = BoundingBox::new(100.68, 13.70, 100.55, 13.78);
        assert!(!inverted.is_valid());

        let flat = BoundingBox::new(100.55, 13.70, 100.55, 13.78);
        assert!(!flat.is_valid());
    }

    #[test]
    fn test_bounds_clamping() {
        let bounds = BoundingBox::new(100.55, 13.70, 100.68, 13.78);

        assert_eq!(bounds.clamp_lng(100.70), 100.68);
        assert_eq!(bounds.clamp_lng(100.50), 100.55);
        assert_eq!(bounds.clamp_lat(13.80), 13.78);
        assert_eq!(bounds.clamp_lat(13.60), 13.70);

        // In-range values pass through untouched
        assert_eq!(bounds.clamp_lng(100.60), 100.60);
        assert_eq!(bounds.clamp_lat(13.75), 13.75);
    }

    #[test]
    fn test_random_point_within_bounds() {
        let bounds = DEFAULT_BOUNDS;
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..1000 {
            let (lng, lat) = bounds.random_point(&mut rng);
            assert!(bounds.contains(lng, lat));
        }
    }

    #[test]
    fn test_bounds_from_str() {
        let bounds: BoundingBox = "100.55,13.70,100.68,13.78".parse().unwrap();
        assert_eq!(bounds, DEFAULT_BOUNDS);

        let spaced: BoundingBox = " 100.55, 13.70, 100.68, 13.78 ".parse().unwrap();
        assert_eq!(spaced, DEFAULT_BOUNDS);

        assert!("100.55,13.70,100.68".parse::<BoundingBox>().is_err());
        assert!("a,b,c,d".parse::<BoundingBox>().is_err());
    }

    #[test]
    fn test_bounds_display_roundtrip() {
        let bounds = BoundingBox::new(100.55, 13.7, 100.68, 13.78);
        let parsed: BoundingBox = bounds.to_string().parse().unwrap();
        assert_eq!(parsed, bounds);
    }

    #[test]
    fn test_hello_wire_format() {
        let message = ServerMessage::Hello { ok: true };
        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(json, r#"{"type":"hello","ok":true}"#);
    }

    #[test]
    fn test_vehicles_wire_format() {
        let feature = Feature::point(
            100.6,
            13.75,
            VehicleProperties {
                id: "abc123xyz".to_string(),
                bearing: 270.0,
                speed: 9.5,
            },
        );
        let message = ServerMessage::Vehicles {
            data: FeatureCollection::new(vec![feature]),
        };

        let value: serde_json::Value = serde_json::to_value(&message).unwrap();

        assert_eq!(value["type"], "vehicles");
        assert_eq!(value["data"]["type"], "FeatureCollection");

        let feature = &value["data"]["features"][0];
        assert_eq!(feature["type"], "Feature");
        assert_eq!(feature["geometry"]["type"], "Point");
        assert_eq!(feature["geometry"]["coordinates"][0], 100.6);
        assert_eq!(feature["geometry"]["coordinates"][1], 13.75);
        assert_eq!(feature["properties"]["id"], "abc123xyz");
        assert_eq!(feature["properties"]["bearing"], 270.0);
        assert_eq!(feature["properties"]["speed"], 9.5);
    }

    #[test]
    fn test_population_wire_format() {
        let message = ServerMessage::Population {
            data: FeatureCollection::new(vec![Feature::point(
                100.57,
                13.71,
                PopulationProperties { weight: 1.5 },
            )]),
        };

        let value: serde_json::Value = serde_json::to_value(&message).unwrap();

        assert_eq!(value["type"], "population");
        assert_eq!(value["data"]["features"][0]["properties"]["weight"], 1.5);
    }

    #[test]
    fn test_envelope_roundtrip() {
        let message = ServerMessage::Vehicles {
            data: FeatureCollection::new(vec![Feature::point(
                100.6,
                13.75,
                VehicleProperties {
                    id: "v1".to_string(),
                    bearing: 15.0,
                    speed: 4.0,
                },
            )]),
        };

        let json = serde_json::to_string(&message).unwrap();
        let decoded: ServerMessage = serde_json::from_str(&json).unwrap();

        match decoded {
            ServerMessage::Vehicles { data } => {
                assert_eq!(data.len(), 1);
                assert_eq!(data.features[0].properties.id, "v1");
                assert_eq!(data.features[0].coordinates(), [100.6, 13.75]);
            }
            other => panic!("expected vehicles envelope, got {:?}", other),
        }
    }

    #[test]
    fn test_hello_decodes_from_client_side() {
        let decoded: ServerMessage =
            serde_json::from_str(r#"{"type":"hello","ok":true}"#).unwrap();
        match decoded {
            ServerMessage::Hello { ok } => assert!(ok),
            other => panic!("expected hello, got {:?}", other),
        }
    }
}
