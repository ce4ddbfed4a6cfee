use geo::{coord, GeodesicArea, MultiPolygon, Rect};

pub const SQ_METERS_PER_ACRE: f64 = 4046.856_422_4;
const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// Expand an extent by a ground distance, converted to degrees at the
/// extent's mid latitude. Planar approximation; fine at county scale.
pub fn expand_rect(rect: Rect<f64>, meters: f64) -> Rect<f64> {
    let mid_lat = (rect.min().y + rect.max().y) / 2.0;
    let dy = meters / METERS_PER_DEGREE_LAT;
    let dx = meters / (METERS_PER_DEGREE_LAT * mid_lat.to_radians().cos().max(0.01));
    Rect::new(
        coord! { x: rect.min().x - dx, y: rect.min().y - dy },
        coord! { x: rect.max().x + dx, y: rect.max().y + dy },
    )
}

/// Extent size in ground meters, (width, height).
pub fn rect_size_meters(rect: &Rect<f64>) -> (f64, f64) {
    let mid_lat = (rect.min().y + rect.max().y) / 2.0;
    let width = rect.width() * METERS_PER_DEGREE_LAT * mid_lat.to_radians().cos().max(0.01);
    let height = rect.height() * METERS_PER_DEGREE_LAT;
    (width, height)
}

/// Area on the ellipsoid, in acres.
pub fn geodesic_acres(geometry: &MultiPolygon<f64>) -> f64 {
    geometry.geodesic_area_unsigned() / SQ_METERS_PER_ACRE
}
