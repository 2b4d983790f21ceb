//! Numeric plane export
//!
//! Writes raw 10-bit plane values as JSON (all four channels in one document) or as CSV (one
//! file per channel, one line per plane row).

use std::fmt::Write as _;
use std::io::Write;

use serde::Serialize;
use tracing::debug;

use crate::image_pipeline::common::error::{CaptureError, Result};
use crate::image_pipeline::planes::{BayerPlanes, Plane};

#[derive(Serialize)]
struct PlaneRows<'a>(#[serde(serialize_with = "serialize_rows")] &'a Plane);

fn serialize_rows<S: serde::Serializer>(plane: &&Plane, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(plane.rows())
}

#[derive(Serialize)]
struct BayerDocument<'a> {
    red: PlaneRows<'a>,
    green1: PlaneRows<'a>,
    green2: PlaneRows<'a>,
    blue: PlaneRows<'a>,
}

/// Writes `{"red": [[..], ..], "green1": .., "green2": .., "blue": ..}`.
pub fn write_json(planes: &BayerPlanes, output: &mut dyn Write) -> Result<()> {
    let document = BayerDocument {
        red: PlaneRows(&planes.red),
        green1: PlaneRows(&planes.green1),
        green2: PlaneRows(&planes.green2),
        blue: PlaneRows(&planes.blue),
    };
    serde_json::to_writer_pretty(&mut *output, &document)
        .map_err(|e| CaptureError::EncodeError(e.to_string()))?;
    debug!("JSON export complete");
    Ok(())
}

/// Writes one comma separated line per plane row.
pub fn write_csv(plane: &Plane, output: &mut dyn Write) -> Result<()> {
    let mut line = String::with_capacity(plane.width * 5);
    for row in plane.rows() {
        line.clear();
        for (i, value) in row.iter().enumerate() {
            if i > 0 {
                line.push(',');
            }
            write!(line, "{value}").map_err(|e| CaptureError::EncodeError(e.to_string()))?;
        }
        line.push('\n');
        output.write_all(line.as_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::planes::{Channel, Orientation};
    use crate::image_pipeline::raw::types::RawSampleGrid;

    fn planes() -> BayerPlanes {
        let grid = RawSampleGrid::from_samples(4, 4, (0..16).collect()).unwrap();
        BayerPlanes::split(&grid, Orientation::None)
    }

    #[test]
    fn test_json_layout() {
        let mut out = Vec::new();
        write_json(&planes(), &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["red"], serde_json::json!([[4, 6], [12, 14]]));
        assert_eq!(value["green1"], serde_json::json!([[0, 2], [8, 10]]));
        assert_eq!(value["green2"], serde_json::json!([[5, 7], [13, 15]]));
        assert_eq!(value["blue"], serde_json::json!([[1, 3], [9, 11]]));
    }

    #[test]
    fn test_json_key_order() {
        let mut out = Vec::new();
        write_json(&planes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let positions: Vec<usize> = ["\"red\"", "\"green1\"", "\"green2\"", "\"blue\""]
            .iter()
            .map(|key| text.find(key).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_csv_rows() {
        let mut out = Vec::new();
        write_csv(&planes().blue, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1,3\n9,11\n");
    }

    #[test]
    fn test_csv_full_sample_range() {
        let plane = Plane {
            channel: Channel::Green1,
            width: 3,
            height: 2,
            data: vec![0, 7, 1023, 1000, 99, 10],
        };
        let mut out = Vec::new();
        write_csv(&plane, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0,7,1023\n1000,99,10\n");
    }
}
