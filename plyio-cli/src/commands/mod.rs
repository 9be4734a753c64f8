use std::{
    fs::File,
    path::Path,
};

use failure::{Error, ResultExt};
use plyio::{Header, Reader};
use term_painter::{Color, ToStyle};

use crate::ui;


pub mod convert;
pub mod info;


/// Opens the given file and parses its header.
fn open_reader(path: &Path) -> Result<Reader<File>, Error> {
    let reader = Reader::open(path)
        .context(format!("failed to read PLY header of '{}'", path.display()))?;

    Ok(reader)
}

/// Pretty prints the header: format, annotations and the element tree.
fn print_header(header: &Header) {
    println!(
        "Format: {} (version {})",
        Color::BrightWhite.bold().paint(header.format),
        Color::BrightWhite.paint(&header.version),
    );

    for c in header.comments() {
        println!("{} {}", Color::White.dim().paint("comment"), c);
    }
    for o in header.obj_info() {
        println!("{} {}", Color::White.dim().paint("obj_info"), o);
    }

    let label_style = Color::White.bold();
    let count_style = Color::Green.bold();
    let kind_style = Color::BrightBlue.bold();

    for elem in &header.elements {
        println!();
        println!(
            " {}  {} instance(s)",
            label_style.paint(&elem.name),
            count_style.paint(ui::fmt_with_thousand_sep(elem.count)),
        );

        let num_props = elem.property_defs.len();
        for (i, prop) in elem.property_defs.iter().enumerate() {
            let branch = if i == num_props - 1 { "└" } else { "├" };
            println!("   {} {} {}", branch, kind_style.paint(prop.kind), prop.name);
        }
    }
}
