use std::io::Write;

use log::debug;

use crate::{
    error::Error,
    schema::{Annotation, ElementDef, Header, PropertyKind},
};


/// Writes the complete header including the `end_header` line.
///
/// `other_elements` are the definitions of elements carried along from
/// another file. They are always written after all elements of `header`,
/// because their data can only be written after the data of all declared
/// elements.
pub(crate) fn write_header<W: Write>(
    w: &mut W,
    header: &Header,
    other_elements: &[ElementDef],
) -> Result<(), Error> {
    // Magic signature
    w.write_all(b"ply\n")?;

    writeln!(w, "format {} {}", header.format.keyword(), header.version)?;

    for annotation in &header.annotations {
        match annotation {
            Annotation::Comment(text) => writeln!(w, "comment {}", text)?,
            Annotation::ObjInfo(text) => writeln!(w, "obj_info {}", text)?,
        }
    }

    for def in header.elements.iter().chain(other_elements) {
        write_element_def(w, def)?;
    }

    w.write_all(b"end_header\n")?;

    debug!(
        "wrote PLY header: format {} {}, {} element(s) + {} other element(s)",
        header.format,
        header.version,
        header.elements.len(),
        other_elements.len(),
    );

    Ok(())
}

fn write_element_def<W: Write>(w: &mut W, def: &ElementDef) -> Result<(), Error> {
    writeln!(w, "element {} {}", def.name, def.count)?;
    for prop in &def.property_defs {
        match prop.kind {
            PropertyKind::Scalar(ty) => {
                writeln!(w, "property {} {}", ty.ply_type_name(), prop.name)?;
            }
            PropertyKind::List { len_type, scalar_type } => {
                writeln!(
                    w,
                    "property list {} {} {}",
                    len_type.ply_type_name(),
                    scalar_type.ply_type_name(),
                    prop.name,
                )?;
            }
        }
    }

    Ok(())
}
