use std::io::Cursor;

use bayer_capture_rs::image_pipeline::raw::BRCM_MAGIC;
use bayer_capture_rs::image_pipeline::unpack::{MAX_SAMPLE, pack_row};
use bayer_capture_rs::image_pipeline::{
    BayerCapturePipeline, BrcmReader, CaptureConfig, CaptureError, Channel, Orientation,
    RawImageReader, SensorGeometry, SensorModel, ToneCurve,
};

/// Deterministic 10-bit test pattern.
fn sample(row: usize, col: usize) -> u16 {
    ((row * 7919 + col * 104_729) % 1024) as u16
}

fn synthetic_capture(geometry: &SensorGeometry) -> Vec<u8> {
    let mut blob = b"\xFF\xD8\xFF\xE1 fake jpeg body \xFF\xD9".to_vec();
    blob.extend_from_slice(&BRCM_MAGIC);
    blob.resize(blob.len() + geometry.header_skip_bytes - BRCM_MAGIC.len(), 0x5A);

    let width = geometry.valid_pixel_width;
    for row in 0..geometry.packed_row_count {
        let samples: Vec<u16> = (0..width).map(|col| sample(row, col)).collect();
        let mut packed = pack_row(&samples);
        packed.resize(geometry.packed_row_stride_bytes, 0xFF);
        blob.extend_from_slice(&packed);
    }
    blob
}

#[test]
fn decodes_every_sample_of_an_imx219_capture() {
    let geometry = SensorModel::Imx219.geometry();
    let blob = synthetic_capture(&geometry);

    let grid = BrcmReader::new(geometry).unwrap().read_raw(&blob).unwrap();

    assert_eq!((grid.height(), grid.width()), (2464, 3280));
    assert!(grid.data().iter().all(|&v| v <= MAX_SAMPLE));
    for row in [0, 1, 1000, 2463] {
        for col in [0, 1, 2, 3, 4, 1639, 3279] {
            assert_eq!(grid.get(row, col), sample(row, col), "row {row} col {col}");
        }
    }
}

#[test]
fn plane_shapes_follow_geometry() {
    for sensor in SensorModel::ALL {
        let geometry = sensor.geometry();
        let blob = synthetic_capture(&geometry);
        let config = CaptureConfig::builder().sensor(sensor).build();

        let planes = BayerCapturePipeline::new(config).unwrap().decode(&blob).unwrap();

        let expected = (geometry.valid_pixel_height / 2, geometry.valid_pixel_width / 2);
        for plane in planes.planes() {
            assert_eq!(plane.shape(), expected, "{sensor} {}", plane.channel);
        }
        assert_eq!(planes.red.get(3, 7), sample(7, 14));
        assert_eq!(planes.blue.get(3, 7), sample(6, 15));
    }
}

#[test]
fn flipped_capture_swaps_channels() {
    let geometry = SensorModel::Ov5647.geometry();
    let blob = synthetic_capture(&geometry);
    let decode = |orientation| {
        let config = CaptureConfig::builder()
            .sensor(SensorModel::Ov5647)
            .orientation(orientation)
            .build();
        BayerCapturePipeline::new(config).unwrap().decode(&blob).unwrap()
    };

    let plain = decode(Orientation::None);
    let flipped = decode(Orientation::Both);

    assert_eq!(flipped.red.data, plain.blue.data);
    assert_eq!(flipped.green1.data, plain.green2.data);
    assert_eq!(flipped.green2.data, plain.green1.data);
    assert_eq!(flipped.blue.data, plain.red.data);
    assert_eq!(flipped.red.channel, Channel::Red);
}

#[test]
fn truncated_capture_is_rejected() {
    let geometry = SensorModel::Ov5647.geometry();
    let blob = synthetic_capture(&geometry);
    let tail = &blob[blob.len() - geometry.payload_size_bytes + 1..];

    let err = BrcmReader::new(geometry).unwrap().read_raw(tail).unwrap_err();

    assert!(matches!(
        err,
        CaptureError::TruncatedPayload { sensor: SensorModel::Ov5647, expected: 6_404_096, .. }
    ));
}

#[test]
fn wrong_geometry_fails_magic_check() {
    let blob = synthetic_capture(&SensorModel::Ov5647.geometry());
    let mut padded = vec![0u8; 4_000_000];
    padded.extend_from_slice(&blob);

    let err = BrcmReader::new(SensorModel::Imx219.geometry())
        .unwrap()
        .read_raw(&padded)
        .unwrap_err();

    assert!(matches!(err, CaptureError::BadMagic { sensor: SensorModel::Imx219, .. }));
}

#[test]
fn convert_file_writes_requested_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let geometry = SensorModel::Ov5647.geometry();
    let input = dir.path().join("plant.jpg");
    std::fs::write(&input, synthetic_capture(&geometry)).unwrap();

    let config = CaptureConfig::builder()
        .sensor(SensorModel::Ov5647)
        .channels([Channel::Red, Channel::Blue])
        .build();
    let pipeline = BayerCapturePipeline::new(config).unwrap();
    let out_dir = dir.path().join("out");

    let paths = pipeline.convert_file(&input, &out_dir).unwrap();

    assert_eq!(paths, vec![out_dir.join("plant_red.tiff"), out_dir.join("plant_blue.tiff")]);
    let bytes = std::fs::read(&paths[0]).unwrap();
    let mut decoder = tiff::decoder::Decoder::new(Cursor::new(bytes)).unwrap();
    assert_eq!(decoder.dimensions().unwrap(), (1296, 972));
    match decoder.read_image().unwrap() {
        tiff::decoder::DecodingResult::U16(data) => {
            let expected = u32::from(sample(1, 0)) * 65536 / 1023;
            assert_eq!(u32::from(data[0]), expected.min(65535));
        }
        _ => panic!("expected a 16-bit plane"),
    }
}

#[test]
fn preview_is_written_alongside_linear_plane() {
    let dir = tempfile::tempdir().unwrap();
    let geometry = SensorModel::Ov5647.geometry();
    let input = dir.path().join("plant.jpg");
    std::fs::write(&input, synthetic_capture(&geometry)).unwrap();

    let config = CaptureConfig::builder()
        .sensor(SensorModel::Ov5647)
        .channels([Channel::Red])
        .tone_curve(ToneCurve::Linear)
        .write_preview(true)
        .build();
    let pipeline = BayerCapturePipeline::new(config).unwrap();

    let paths = pipeline.convert_file(&input, dir.path()).unwrap();

    assert_eq!(
        paths,
        vec![dir.path().join("plant_red.tiff"), dir.path().join("plant_red_thumb.tiff")]
    );
    let read = |path: &std::path::Path| {
        let bytes = std::fs::read(path).unwrap();
        let mut decoder = tiff::decoder::Decoder::new(Cursor::new(bytes)).unwrap();
        assert_eq!(decoder.dimensions().unwrap(), (1296, 972));
        decoder.read_image().unwrap()
    };
    assert!(matches!(read(&paths[0]), tiff::decoder::DecodingResult::U16(_)));
    match read(&paths[1]) {
        tiff::decoder::DecodingResult::U8(data) => {
            let expected = (f32::from(sample(1, 0)) / 1023.0 * 255.0).round() as u8;
            assert_eq!(data[0], expected);
        }
        _ => panic!("expected an 8-bit preview"),
    }
}

#[test]
fn failed_decode_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.jpg");
    std::fs::write(&input, b"\xFF\xD8 only a jpeg \xFF\xD9").unwrap();
    let out_dir = dir.path().join("out");

    let pipeline = BayerCapturePipeline::new(CaptureConfig::default()).unwrap();
    let result = pipeline.convert_file(&input, &out_dir);

    assert!(matches!(result, Err(CaptureError::TruncatedPayload { .. })));
    assert!(!out_dir.exists());
}
