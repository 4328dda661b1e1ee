use foundation::math::GeoPoint;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Winding {
    Clockwise,
    CounterClockwise,
}

/// Approximate winding of a ring in a north-up view.
///
/// Takes the northmost vertex as reference and compares how far (circularly,
/// walking forward) the westmost and the eastmost vertex lie from it. A ring
/// that reaches its east extreme first turns clockwise.
///
/// This is a single-pass heuristic, not a signed-area test; some concave rings
/// are misclassified. Extremes keep their first occurrence, and the first vertex
/// seeds all three.
pub fn winding_of(ring: &[GeoPoint]) -> Winding {
    let Some(first) = ring.first() else {
        return Winding::Clockwise;
    };

    let (mut north, mut west, mut east) = (first.lat_deg, first.lon_deg, first.lon_deg);
    let (mut ni, mut wi, mut ei) = (0usize, 0usize, 0usize);

    for (i, p) in ring.iter().enumerate() {
        if p.lon_deg < west {
            west = p.lon_deg;
            wi = i;
        } else if p.lon_deg > east {
            east = p.lon_deg;
            ei = i;
        }

        if p.lat_deg > north {
            north = p.lat_deg;
            ni = i;
        }
    }

    let n = ring.len();
    let west_offset = (wi + n - ni) % n;
    let east_offset = (ei + n - ni) % n;

    if west_offset > east_offset {
        Winding::Clockwise
    } else {
        Winding::CounterClockwise
    }
}

/// Returns the ring in clockwise order, reversing it if needed.
pub fn make_clockwise(mut ring: Vec<GeoPoint>) -> Vec<GeoPoint> {
    if winding_of(&ring) == Winding::CounterClockwise {
        ring.reverse();
    }
    ring
}
