use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use bayer_capture_rs::image_pipeline::raw::{extract, BRCM_MAGIC};
use bayer_capture_rs::image_pipeline::unpack::{pack_row, unpack};
use bayer_capture_rs::image_pipeline::{
    BayerCapturePipeline, BayerPlanes, CaptureConfig, Orientation, SensorModel,
};

fn generate_mock_capture(sensor: SensorModel) -> Vec<u8> {
    let geometry = sensor.geometry();
    let mut data = BRCM_MAGIC.to_vec();
    data.resize(geometry.header_skip_bytes, 0);
    for y in 0..geometry.packed_row_count {
        let samples: Vec<u16> = (0..geometry.valid_pixel_width)
            .map(|x| ((x + y) % 1024) as u16)
            .collect();
        let mut row = pack_row(&samples);
        row.resize(geometry.packed_row_stride_bytes, 0);
        data.extend_from_slice(&row);
    }
    data
}

fn benchmark_unpack_by_sensor(c: &mut Criterion) {
    let mut group = c.benchmark_group("unpack_by_sensor");

    for sensor in SensorModel::ALL {
        let geometry = sensor.geometry();
        let capture = generate_mock_capture(sensor);

        group.bench_with_input(
            BenchmarkId::from_parameter(sensor),
            &capture,
            |b, data| {
                b.iter(|| {
                    let packed = extract(black_box(data), &geometry).unwrap();
                    unpack(&packed, &geometry).unwrap()
                });
            },
        );
    }

    group.finish();
}

fn benchmark_split_planes(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_planes");
    let geometry = SensorModel::Imx219.geometry();
    let capture = generate_mock_capture(SensorModel::Imx219);
    let packed = extract(&capture, &geometry).unwrap();
    let grid = unpack(&packed, &geometry).unwrap();

    for orientation in [Orientation::None, Orientation::Both] {
        group.bench_with_input(
            BenchmarkId::from_parameter(orientation),
            &grid,
            |b, grid| {
                b.iter(|| BayerPlanes::split(black_box(grid), orientation));
            },
        );
    }

    group.finish();
}

fn benchmark_full_decode(c: &mut Criterion) {
    let capture = generate_mock_capture(SensorModel::Imx219);
    let pipeline = BayerCapturePipeline::new(CaptureConfig::default()).unwrap();

    c.bench_function("decode_imx219", |b| {
        b.iter(|| pipeline.decode(black_box(&capture)).unwrap());
    });
}

criterion_group!(
    benches,
    benchmark_unpack_by_sensor,
    benchmark_split_planes,
    benchmark_full_decode
);
criterion_main!(benches);
