//! Decoder for the encoded polyline format at 1e-5 precision.

use crate::geo::Coordinate;

const PRECISION: f64 = 1e-5;

/// Decodes an encoded polyline string into ordered (lat, lng) coordinates.
///
/// The format stores zigzag-encoded integer deltas in 5-bit chunks offset
/// by 63, latitude delta first. Truncated or corrupt input stops the scan at
/// the last complete point; decoded points outside the valid coordinate
/// range are dropped rather than failing the whole fragment.
pub fn decode_polyline(encoded: &str) -> Vec<Coordinate> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut cursor = 0usize;
    let mut lat = 0i64;
    let mut lng = 0i64;

    while cursor < bytes.len() {
        let Some((dlat, next)) = decode_value(bytes, cursor) else {
            break;
        };
        let Some((dlng, next)) = decode_value(bytes, next) else {
            break;
        };
        cursor = next;
        lat += dlat;
        lng += dlng;
        if let Ok(point) = Coordinate::new(lat as f64 * PRECISION, lng as f64 * PRECISION) {
            points.push(point);
        }
    }

    points
}

/// Reads one varint-style value starting at `cursor`, returning the decoded
/// delta and the cursor after it. `None` on truncation or bytes outside the
/// printable range the format uses.
fn decode_value(bytes: &[u8], mut cursor: usize) -> Option<(i64, usize)> {
    let mut accumulated: u64 = 0;
    let mut shift = 0u32;
    loop {
        let byte = *bytes.get(cursor)?;
        if !(63..=126).contains(&byte) {
            return None;
        }
        let chunk = u64::from(byte - 63);
        cursor += 1;
        accumulated |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk & 0x20 == 0 {
            break;
        }
        if shift > 60 {
            return None;
        }
    }
    Some((decode_zigzag(accumulated), cursor))
}

fn decode_zigzag(value: u64) -> i64 {
    ((value >> 1) as i64) ^ (-((value & 1) as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn decodes_the_canonical_example() {
        let points = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@");
        let expected = [(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)];
        assert_eq!(points.len(), expected.len());
        for (point, (lat, lng)) in points.iter().zip(expected) {
            assert!(close(point.lat(), lat), "lat {} vs {lat}", point.lat());
            assert!(close(point.lng(), lng), "lng {} vs {lng}", point.lng());
        }
    }

    #[test]
    fn empty_input_decodes_to_nothing() {
        assert!(decode_polyline("").is_empty());
    }

    #[test]
    fn truncated_input_keeps_complete_points() {
        // Drop the last byte of the canonical example: the third point's
        // longitude is incomplete, so only two points survive.
        let truncated = "_p~iF~ps|U_ulLnnqC_mqNvxq`";
        let points = decode_polyline(truncated);
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn bytes_outside_the_alphabet_stop_the_scan() {
        let points = decode_polyline("_p~iF~ps|U\n_ulLnnqC");
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn zigzag_roundtrips_signs() {
        assert_eq!(decode_zigzag(0), 0);
        assert_eq!(decode_zigzag(1), -1);
        assert_eq!(decode_zigzag(2), 1);
        assert_eq!(decode_zigzag(3), -2);
    }
}
