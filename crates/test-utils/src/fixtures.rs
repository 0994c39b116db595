//! Common test fixtures for overlay tests.
//!
//! This module provides pre-defined subdivision documents that represent
//! the shapes the backend actually delivers, including the awkward ones.

/// Reference coordinates used across fixtures.
pub mod coords {
    /// Subdivision origin `(lat, lng)`.
    pub const ORIGIN: (f64, f64) = (-25.70, -56.24);

    /// The "Club" interest point `(lat, lng)`.
    pub const CLUB: (f64, f64) = (-25.71, -56.20);

    /// The single waypoint on the way to the club `(lat, lng)`.
    pub const CLUB_WAYPOINT: (f64, f64) = (-25.705, -56.22);

    /// A school north of the origin `(lat, lng)`.
    pub const SCHOOL: (f64, f64) = (-25.69, -56.25);
}

/// Subdivision documents as `serde_json::Value`.
pub mod subdivision {
    use super::coords;
    use serde_json::{json, Value};

    /// The club point with one explicit waypoint.
    pub fn club_point() -> Value {
        json!({
            "id": 1,
            "name": "Club",
            "latitude": coords::CLUB.0,
            "longitude": coords::CLUB.1,
            "routePoints": [
                { "latitude": coords::CLUB_WAYPOINT.0, "longitude": coords::CLUB_WAYPOINT.1, "order": 1 }
            ]
        })
    }

    /// A school point without any route points.
    pub fn school_point() -> Value {
        json!({
            "id": "escuela-2",
            "name": "Escuela Básica",
            "latitude": coords::SCHOOL.0,
            "longitude": coords::SCHOOL.1
        })
    }

    /// A subdivision record carrying `lat`/`long` and the given
    /// `interest_points` value verbatim.
    pub fn with_points(interest_points: Value) -> Value {
        json!({
            "id": 7,
            "nombre": "Loteamiento San Miguel",
            "lat": coords::ORIGIN.0,
            "long": coords::ORIGIN.1,
            "interest_points": interest_points
        })
    }

    /// Origin plus the club point, as a plain array.
    pub fn end_to_end() -> Value {
        with_points(json!([club_point()]))
    }

    /// Club and school points, as a plain array.
    pub fn two_points() -> Value {
        with_points(json!([club_point(), school_point()]))
    }

    /// Points encoded as a JSON string, as some rows store them.
    pub fn string_encoded() -> Value {
        let encoded = json!([club_point(), school_point()]).to_string();
        with_points(Value::String(encoded))
    }

    /// Points wrapped in an object with an inner `interest_points` array.
    pub fn nested() -> Value {
        with_points(json!({ "interest_points": [club_point(), school_point()] }))
    }

    /// A record with no `interest_points` member at all.
    pub fn without_points() -> Value {
        json!({
            "id": 8,
            "nombre": "Loteamiento Vacío",
            "lat": coords::ORIGIN.0,
            "long": coords::ORIGIN.1
        })
    }

    /// A record whose origin only exists under the centroid synonyms.
    pub fn centroid_only() -> Value {
        json!({
            "id": 9,
            "nombre": "Loteamiento Centroide",
            "centroide_lat": coords::ORIGIN.0,
            "centroide_lng": coords::ORIGIN.1,
            "interest_points": [club_point()]
        })
    }

    /// A record with no origin coordinate under any synonym.
    pub fn without_origin() -> Value {
        json!({
            "id": 10,
            "nombre": "Loteamiento Sin Ubicación",
            "interest_points": [club_point()]
        })
    }

    /// Valid points interleaved with every kind of broken element.
    pub fn mixed_validity() -> Value {
        with_points(json!([
            club_point(),
            { "name": "Sin id", "latitude": -25.7, "longitude": -56.2 },
            { "id": 3, "latitude": -25.7, "longitude": -56.2 },
            { "id": 4, "name": "", "latitude": -25.7, "longitude": -56.2 },
            { "id": 5, "name": "Texto", "latitude": "-25.7", "longitude": -56.2 },
            { "id": 6, "name": "Sin longitud", "latitude": -25.7 },
            "not an object",
            null,
            { "id": 7, "name": "Ruta rota", "latitude": -25.72, "longitude": -56.21, "routePoints": "oops" },
            school_point()
        ]))
    }
}
