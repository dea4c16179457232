use log::info;
use rand::distributions::{Alphanumeric, DistString};
use rand::Rng;
use shared::{BoundingBox, Feature, FeatureCollection, VehicleProperties};

/// Flat-earth approximation: one degree is roughly 111 km at the equator.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

const VEHICLE_ID_LEN: usize = 9;
const MIN_SPEED_MPS: f64 = 4.0;
const MAX_SPEED_MPS: f64 = 14.0;
/// Per-tick bearing perturbation, degrees either way, independent of dt.
const BEARING_JITTER_DEG: f64 = 5.0;

/// A simulated mobile entity. Identity and speed are fixed at creation;
/// position and bearing mutate every tick.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: String,
    pub lng: f64,
    pub lat: f64,
    /// Degrees. Accumulates jitter without wraparound; normalized to
    /// [0, 360) when presented.
    pub bearing: f64,
    /// Meters per second.
    pub speed: f64,
}

impl Vehicle {
    fn spawn<R: Rng>(bounds: &BoundingBox, rng: &mut R) -> Self {
        let (lng, lat) = bounds.random_point(rng);
        Self {
            id: Alphanumeric.sample_string(rng, VEHICLE_ID_LEN),
            lng,
            lat,
            bearing: rng.gen_range(0.0..360.0),
            speed: rng.gen_range(MIN_SPEED_MPS..MAX_SPEED_MPS),
        }
    }
}

/// Displacement in degrees for one movement step.
pub fn displacement(bearing_deg: f64, speed: f64, dt: f64) -> (f64, f64) {
    let rad = bearing_deg.to_radians();
    (
        rad.cos() * speed * dt / METERS_PER_DEGREE,
        rad.sin() * speed * dt / METERS_PER_DEGREE,
    )
}

/// The vehicle fleet and the region it is confined to. Owned by the
/// broadcast loop; there is exactly one mutator.
pub struct SimulationState {
    vehicles: Vec<Vehicle>,
    bounds: BoundingBox,
}

impl SimulationState {
    pub fn new<R: Rng>(bounds: BoundingBox, vehicle_count: usize, rng: &mut R) -> Self {
        let vehicles = (0..vehicle_count)
            .map(|_| Vehicle::spawn(&bounds, rng))
            .collect();
        info!("Spawned {} vehicles inside {}", vehicle_count, bounds);
        Self { vehicles, bounds }
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Advances every vehicle by the measured elapsed time. Each vehicle is
    /// updated independently: perturb bearing, displace, clamp each axis to
    /// the region. A vehicle that would leave the region is pinned at the
    /// boundary, not reflected.
    pub fn advance<R: Rng>(&mut self, dt: f64, rng: &mut R) {
        for vehicle in &mut self.vehicles {
            vehicle.bearing += rng.gen_range(-BEARING_JITTER_DEG..BEARING_JITTER_DEG);

            let (dx, dy) = displacement(vehicle.bearing, vehicle.speed, dt);
            vehicle.lng = self.bounds.clamp_lng(vehicle.lng + dx);
            vehicle.lat = self.bounds.clamp_lat(vehicle.lat + dy);
        }
    }

    /// Snapshot of the fleet as a GeoJSON feature collection.
    pub fn to_feature_collection(&self) -> FeatureCollection<VehicleProperties> {
        FeatureCollection::new(
            self.vehicles
                .iter()
                .map(|vehicle| {
                    Feature::point(
                        vehicle.lng,
                        vehicle.lat,
                        VehicleProperties {
                            id: vehicle.id.clone(),
                            bearing: vehicle.bearing.rem_euclid(360.0),
                            speed: vehicle.speed,
                        },
                    )
                })
                .collect(),
        )
    }
}
