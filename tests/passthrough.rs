use failure::Error;

use plyio::{
    Format, OtherData, PropBinding, PropertyDef, Reader, ScalarType, Scalar, Value, Writer,
};


/// A file with an unknown vertex property in the middle and an unknown
/// element at the end.
fn source_file(format: Format) -> Result<Vec<u8>, plyio::Error> {
    #[derive(Default)]
    struct V {
        x: f32,
        quality: f64,
        y: f32,
        tags: Vec<u16>,
    }

    #[derive(Default)]
    struct E {
        a: i32,
        b: i32,
    }

    let vertices = vec![
        V { x: 1.0, quality: 0.5, y: -1.0, tags: vec![7, 8] },
        V { x: 2.5, quality: 1e-3, y: 4.0, tags: vec![] },
        V { x: -0.125, quality: 99.0, y: 0.0, tags: vec![65535] },
    ];
    let edges = vec![E { a: 0, b: 1 }, E { a: 1, b: 2 }];

    let mut w = Writer::new(Vec::new(), format);
    w.add_comment("source")?;
    w.declare_element("vertex", vertices.len() as u64)?;
    w.declare_property("vertex", PropertyDef::scalar("x", ScalarType::Float32))?;
    w.declare_property("vertex", PropertyDef::scalar("quality", ScalarType::Float64))?;
    w.declare_property("vertex", PropertyDef::scalar("y", ScalarType::Float32))?;
    w.declare_property("vertex", PropertyDef::list("tags", ScalarType::Uint8, ScalarType::Uint16))?;
    w.declare_element("edge", edges.len() as u64)?;
    w.declare_property("edge", PropertyDef::scalar("vertex1", ScalarType::Int32))?;
    w.declare_property("edge", PropertyDef::scalar("vertex2", ScalarType::Int32))?;
    w.finish_header()?;

    w.element::<V>("vertex")?
        .bind(PropBinding::scalar("x", |v: &V| v.x, |v, x| v.x = x))?
        .bind(PropBinding::scalar("quality", |v: &V| v.quality, |v, q| v.quality = q))?
        .bind(PropBinding::scalar("y", |v: &V| v.y, |v, y| v.y = y))?
        .bind(PropBinding::list("tags", |v: &V| &v.tags[..], |v, t| v.tags = t))?
        .write_all(&vertices)?;
    w.element::<E>("edge")?
        .bind(PropBinding::scalar("vertex1", |e: &E| e.a, |e, a| e.a = a))?
        .bind(PropBinding::scalar("vertex2", |e: &E| e.b, |e, b| e.b = b))?
        .write_all(&edges)?;

    w.close()
}

/// The program only knows about vertex positions.
#[derive(Debug, Default, Clone, PartialEq)]
struct Vertex {
    x: f32,
    y: f32,
    other: OtherData,
}

fn position_bindings() -> Vec<PropBinding<Vertex>> {
    vec![
        PropBinding::scalar("x", |v: &Vertex| v.x, |v, x| v.x = x),
        PropBinding::scalar("y", |v: &Vertex| v.y, |v, y| v.y = y),
    ]
}


#[test]
fn file_is_reproduced_exactly() -> Result<(), Error> {
    for &format in &[Format::Ascii, Format::BinaryBigEndian, Format::BinaryLittleEndian] {
        let original = source_file(format)?;

        // ----- Read only what we know ----------------------------------
        let mut reader = Reader::new(&original[..])?;
        let header = reader.header().clone();
        let vertices = {
            let mut elem = reader.element::<Vertex>("vertex")?;
            for b in position_bindings() {
                elem.request(b)?;
            }
            let props = elem.keep_other_properties(|v, data| v.other = data)?;
            assert_eq!(props.element, "vertex");
            assert_eq!(props.property_defs, vec![
                PropertyDef::scalar("quality", ScalarType::Float64),
                PropertyDef::list("tags", ScalarType::Uint8, ScalarType::Uint16),
            ]);

            elem.read_all()?
        };
        reader.read_other_element("edge")?;
        let other_elements = reader.close()?;

        assert_eq!(vertices[1].x, 2.5);
        assert_eq!(vertices[1].y, 4.0);
        assert_eq!(other_elements.len(), 1);
        assert_eq!(other_elements[0].instances.len(), 2);

        // ----- Write it again with the original schema ----------------
        let mut header = header;
        header.elements.retain(|e| e.name != "edge");

        let mut writer = Writer::with_header(Vec::new(), header);
        writer.declare_other_elements(&other_elements)?;
        writer.finish_header()?;
        {
            let mut elem = writer.element::<Vertex>("vertex")?;
            for b in position_bindings() {
                elem.bind(b)?;
            }
            elem.with_other_properties(|v| &v.other);
            elem.write_all(&vertices)?;
        }
        writer.write_other_elements(&other_elements)?;
        let copy = writer.close()?;

        assert_eq!(copy, original, "copy differs for {}", format);
    }

    Ok(())
}

#[test]
fn other_properties_are_appended() -> Result<(), Error> {
    let original = source_file(Format::BinaryLittleEndian)?;

    let mut reader = Reader::new(&original[..])?;
    let (vertices, props) = {
        let mut elem = reader.element::<Vertex>("vertex")?;
        for b in position_bindings() {
            elem.request(b)?;
        }
        let props = elem.keep_other_properties(|v, data| v.other = data)?;
        (elem.read_all()?, props)
    };

    // Re-interpreting the kept data.
    assert_eq!(vertices[0].other.decode(&props.property_defs)?, vec![
        Value::Scalar(Scalar::Float64(0.5)),
        Value::list_of(&[7u16, 8]),
    ]);

    // Write positions as doubles, followed by the other properties.
    let mut writer = Writer::new(Vec::new(), Format::Ascii);
    writer.declare_element("vertex", vertices.len() as u64)?;
    writer.declare_property("vertex", PropertyDef::scalar("x", ScalarType::Float64))?;
    writer.declare_property("vertex", PropertyDef::scalar("y", ScalarType::Float64))?;
    writer.declare_other_properties(&props)?;
    writer.finish_header()?;
    {
        let mut elem = writer.element::<Vertex>("vertex")?;
        for b in position_bindings() {
            elem.bind(b)?;
        }
        elem.with_other_properties(|v| &v.other).write_all(&vertices)?;
    }
    let out = String::from_utf8(writer.close()?)?;

    assert!(out.contains("\
        element vertex 3\n\
        property double x\n\
        property double y\n\
        property double quality\n\
        property list uchar ushort tags\n\
        end_header\n\
        1 -1 0.5 2 7 8\n\
        2.5 4 0.001 0\n\
        -0.125 0 99 1 65535\n\
    "), "{}", out);

    Ok(())
}

#[test]
fn unrequested_properties_are_skipped() -> Result<(), Error> {
    for &format in &[Format::Ascii, Format::BinaryBigEndian] {
        let original = source_file(format)?;

        let mut reader = Reader::new(&original[..])?;
        let vertices = {
            let mut elem = reader.element::<Vertex>("vertex")?;
            elem.request(position_bindings().remove(1))?;
            elem.read_all()?
        };

        let ys: Vec<_> = vertices.iter().map(|v| v.y).collect();
        assert_eq!(ys, [-1.0, 4.0, 0.0]);
        assert!(vertices.iter().all(|v| v.other.is_empty() && v.x == 0.0));

        let edge = reader.read_other_element("edge")?;
        assert_eq!(edge.name(), "edge");
        let second = edge.decode_instance(1).expect("no second edge")?;
        assert_eq!(second, [Value::Scalar(Scalar::Int32(1)), Value::Scalar(Scalar::Int32(2))]);
        assert!(edge.decode_instance(2).is_none());

        assert_eq!(reader.other_elements().len(), 1);
        reader.close()?;
    }

    Ok(())
}

#[test]
fn missing_other_data_is_rejected() -> Result<(), Error> {
    let mut writer = Writer::new(Vec::new(), Format::Ascii);
    writer.declare_element("vertex", 1)?;
    writer.declare_property("vertex", PropertyDef::scalar("x", ScalarType::Float32))?;
    writer.declare_property("vertex", PropertyDef::scalar("w", ScalarType::Float32))?;
    writer.finish_header()?;

    let mut elem = writer.element::<Vertex>("vertex")?;
    elem.bind(position_bindings().remove(0))?;

    // Neither bound nor provided as other data.
    match elem.write(&Vertex::default()) {
        Err(plyio::Error::SchemaViolation(_)) => {}
        other => panic!("unexpected result: {:?}", other),
    }

    // Other data that doesn't match the unbound properties.
    elem.with_other_properties(|v| &v.other);
    let v = Vertex { other: OtherData::from(vec![0, 0]), ..Vertex::default() };
    match elem.write(&v) {
        Err(plyio::Error::TruncatedData(_)) => {}
        other => panic!("unexpected result: {:?}", other),
    }

    // Nothing was written, so the writer is still usable.
    let v = Vertex { other: OtherData::from(vec![0; 4]), ..Vertex::default() };
    elem.write(&v)?;

    Ok(())
}
