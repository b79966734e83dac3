//! Serde helpers encoding a [`Coord`] as `{"lat": …, "lng": …}`.

use geo::Coord;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Serialize, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

pub(crate) fn serialize<S>(coord: &Coord<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    LatLng {
        lat: coord.y,
        lng: coord.x,
    }
    .serialize(serializer)
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Coord<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let LatLng { lat, lng } = LatLng::deserialize(deserializer)?;
    Ok(Coord { x: lng, y: lat })
}
