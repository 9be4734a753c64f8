//! Measures PLY IO read (parse) and write speeds.

use criterion::{
    criterion_group, criterion_main, black_box, BenchmarkId, Criterion, Throughput,
};

use plyio::{
    Error, Format, PropBinding, PropertyDef, Reader, ScalarType, Writer,
};


// ===============================================================================================
// ===== Helper utilities
// ===============================================================================================

const ENCODINGS: [(&str, Format); 3] = [
    ("ble", Format::BinaryLittleEndian),
    ("bbe", Format::BinaryBigEndian),
    ("ascii", Format::Ascii),
];

#[derive(Debug, Default)]
struct Vertex {
    pos: [f32; 3],
    normal: [f32; 3],
}

#[derive(Debug, Default)]
struct Face {
    vertex_indices: Vec<u32>,
}

/// A `n` x `n` grid of vertices on a wavy surface, triangulated.
fn grid(n: u32) -> (Vec<Vertex>, Vec<Face>) {
    let mut vertices = Vec::new();
    for y in 0..n {
        for x in 0..n {
            let (fx, fy) = (x as f32 / n as f32, y as f32 / n as f32);
            vertices.push(Vertex {
                pos: [fx, fy, (fx * 10.0).sin() * (fy * 10.0).cos()],
                normal: [0.0, 0.0, 1.0],
            });
        }
    }

    let mut faces = Vec::new();
    for y in 0..n - 1 {
        for x in 0..n - 1 {
            let i = y * n + x;
            faces.push(Face { vertex_indices: vec![i, i + 1, i + n] });
            faces.push(Face { vertex_indices: vec![i + 1, i + n + 1, i + n] });
        }
    }

    (vertices, faces)
}

fn vertex_bindings() -> Vec<PropBinding<Vertex>> {
    let mut out = Vec::new();
    for (i, name) in ["x", "y", "z"].iter().enumerate() {
        out.push(PropBinding::scalar(*name, move |v: &Vertex| v.pos[i], move |v, c| v.pos[i] = c));
    }
    for (i, name) in ["nx", "ny", "nz"].iter().enumerate() {
        out.push(PropBinding::scalar(*name, move |v: &Vertex| v.normal[i], move |v, c| v.normal[i] = c));
    }
    out
}

fn face_binding() -> PropBinding<Face> {
    PropBinding::list(
        "vertex_indices",
        |f: &Face| &f.vertex_indices[..],
        |f, vi| f.vertex_indices = vi,
    )
}

fn write_grid(format: Format, vertices: &[Vertex], faces: &[Face]) -> Result<Vec<u8>, Error> {
    let mut writer = Writer::new(Vec::new(), format);
    writer.declare_element("vertex", vertices.len() as u64)?;
    for name in &["x", "y", "z", "nx", "ny", "nz"] {
        writer.declare_property("vertex", PropertyDef::scalar(*name, ScalarType::Float32))?;
    }
    writer.declare_element("face", faces.len() as u64)?;
    writer.declare_property(
        "face",
        PropertyDef::list("vertex_indices", ScalarType::Uint8, ScalarType::Int32),
    )?;
    writer.finish_header()?;

    {
        let mut elem = writer.element::<Vertex>("vertex")?;
        for b in vertex_bindings() {
            elem.bind(b)?;
        }
        elem.write_all(vertices)?;
    }
    writer.element::<Face>("face")?.bind(face_binding())?.write_all(faces)?;

    writer.close()
}

fn read_grid(data: &[u8]) -> Result<(Vec<Vertex>, Vec<Face>), Error> {
    let mut reader = Reader::new(data)?;
    let vertices = {
        let mut elem = reader.element::<Vertex>("vertex")?;
        for b in vertex_bindings() {
            elem.request(b)?;
        }
        elem.read_all()?
    };
    let faces = {
        let mut elem = reader.element::<Face>("face")?;
        elem.request(face_binding())?;
        elem.read_all()?
    };

    reader.close()?;
    Ok((vertices, faces))
}


// ===============================================================================================
// ===== Benchmarks
// ===============================================================================================

fn write(c: &mut Criterion) {
    let (vertices, faces) = grid(200);
    let mut group = c.benchmark_group("ply_write_grid");

    for &(name, format) in &ENCODINGS {
        group.bench_with_input(BenchmarkId::from_parameter(name), &format, |b, &format| {
            b.iter(|| write_grid(format, &vertices, &faces).unwrap())
        });
    }
    group.finish();
}

/// Reading into typed records via bindings.
fn read_typed(c: &mut Criterion) {
    let (vertices, faces) = grid(200);
    let mut group = c.benchmark_group("ply_read_grid");

    for &(name, format) in &ENCODINGS {
        let data = write_grid(format, &vertices, &faces).unwrap();
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &data, |b, data| {
            b.iter(|| black_box(read_grid(data).unwrap()))
        });
    }
    group.finish();
}

/// Reading everything as opaque data, like a converter does.
fn read_other(c: &mut Criterion) {
    let (vertices, faces) = grid(200);
    let mut group = c.benchmark_group("ply_read_grid_other");

    for &(name, format) in &ENCODINGS {
        let data = write_grid(format, &vertices, &faces).unwrap();
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &data, |b, data| {
            b.iter(|| {
                let mut reader = Reader::new(&data[..]).unwrap();
                reader.read_other_element("vertex").unwrap();
                reader.read_other_element("face").unwrap();
                black_box(reader.close().unwrap())
            })
        });
    }
    group.finish();
}


criterion_group!(benches, write, read_typed, read_other);
criterion_main!(benches);
