//! Nominatim `jsonv2` response types.
//!
//! See: <https://nominatim.org/release-docs/latest/api/Output/>

use geo::Coord;
use serde::Deserialize;
use wohnlage_core::{AddressParts, Place, UpstreamError};

/// One search or reverse result.
#[derive(Debug, Deserialize)]
pub struct NominatimPlace {
    /// Latitude as a decimal string.
    pub lat: String,
    /// Longitude as a decimal string.
    pub lon: String,
    /// Full label.
    pub display_name: String,
    /// Feature name, often empty for plain addresses.
    #[serde(default)]
    pub name: Option<String>,
    /// Address breakdown, present with `addressdetails=1`.
    #[serde(default)]
    pub address: NominatimAddress,
}

/// Address breakdown. Settlements appear under one of several keys
/// depending on their size.
#[derive(Debug, Default, Deserialize)]
pub struct NominatimAddress {
    /// City name.
    pub city: Option<String>,
    /// Town name, used when no city is given.
    pub town: Option<String>,
    /// Village name.
    pub village: Option<String>,
    /// Municipality name.
    pub municipality: Option<String>,
    /// Street.
    pub road: Option<String>,
    /// House number.
    pub house_number: Option<String>,
    /// Postal code.
    pub postcode: Option<String>,
    /// Country name.
    pub country: Option<String>,
    /// ISO 3166-1 alpha-2 code, lower case.
    pub country_code: Option<String>,
    /// State or federal state.
    pub state: Option<String>,
}

/// Reverse lookups answer either with a place or with an error object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ReverseResponse {
    /// Nothing found at the coordinate.
    Error {
        /// Reason given by the server, usually `"Unable to geocode"`.
        error: String,
    },
    /// The place found.
    Found(NominatimPlace),
}

fn parse_degrees(raw: &str, field: &str) -> Result<f64, UpstreamError> {
    raw.trim().parse().map_err(|_| UpstreamError::Parse {
        message: format!("invalid {field} '{raw}' in Nominatim response"),
    })
}

impl NominatimPlace {
    /// Convert into a [`Place`].
    ///
    /// # Errors
    /// Returns [`UpstreamError::Parse`] when the coordinates are not numbers.
    pub fn into_place(self) -> Result<Place, UpstreamError> {
        let lat = parse_degrees(&self.lat, "lat")?;
        let lng = parse_degrees(&self.lon, "lon")?;
        let address = self.address;
        Ok(Place {
            location: Coord { x: lng, y: lat },
            display_name: self.display_name,
            name: self.name.filter(|name| !name.trim().is_empty()),
            address: AddressParts {
                city: address
                    .city
                    .or(address.town)
                    .or(address.village)
                    .or(address.municipality),
                road: address.road,
                house_number: address.house_number,
                postcode: address.postcode,
                country: address.country,
                country_code: address.country_code,
                state: address.state,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn converts_search_result() {
        let json = r#"{
            "place_id": 1, "lat": "48.1371079", "lon": "11.5753822",
            "display_name": "Marienplatz, Altstadt, München, Bayern, 80331, Deutschland",
            "name": "Marienplatz",
            "address": {"road": "Marienplatz", "city": "München", "state": "Bayern",
                        "postcode": "80331", "country": "Deutschland", "country_code": "de"}
        }"#;
        let place = serde_json::from_str::<NominatimPlace>(json)
            .expect("deserialise")
            .into_place()
            .expect("convert");
        assert_eq!(place.location, Coord { x: 11.575_382_2, y: 48.137_107_9 });
        assert_eq!(place.name.as_deref(), Some("Marienplatz"));
        assert_eq!(place.city(), Some("München"));
        assert_eq!(place.address.country_code.as_deref(), Some("de"));
    }

    #[rstest]
    #[case(r#"{"town": "Starnberg", "village": "Percha"}"#, Some("Starnberg"))]
    #[case(r#"{"village": "Percha", "municipality": "Starnberg"}"#, Some("Percha"))]
    #[case(r#"{"municipality": "Gemeinde X"}"#, Some("Gemeinde X"))]
    #[case(r#"{"state": "Bayern"}"#, None)]
    fn city_falls_back_through_settlement_keys(#[case] address: &str, #[case] expected: Option<&str>) {
        let json = format!(
            r#"{{"lat": "1", "lon": "2", "display_name": "x", "name": "", "address": {address}}}"#
        );
        let place = serde_json::from_str::<NominatimPlace>(&json)
            .expect("deserialise")
            .into_place()
            .expect("convert");
        assert_eq!(place.city(), expected);
        assert!(place.name.is_none());
    }

    #[rstest]
    fn rejects_non_numeric_coordinates() {
        let place = NominatimPlace {
            lat: "north".into(),
            lon: "0".into(),
            display_name: String::new(),
            name: None,
            address: NominatimAddress::default(),
        };
        assert!(matches!(place.into_place(), Err(UpstreamError::Parse { .. })));
    }

    #[rstest]
    fn reverse_error_object_is_recognised() {
        let response: ReverseResponse =
            serde_json::from_str(r#"{"error": "Unable to geocode"}"#).expect("deserialise");
        assert!(matches!(response, ReverseResponse::Error { .. }));
    }
}
