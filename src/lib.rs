//! Streaming reader and writer for PLY polygon files.
//!
//! A PLY file describes one object as a list of *elements* (e.g. `vertex`
//! and `face`), each with a number of instances that share the same ordered
//! *properties*. Properties are single numbers or lists of numbers of one of
//! eight [scalar types][ScalarType]. The textual header describes this
//! schema; the element data follows in ASCII or in binary with either byte
//! order.
//!
//! This crate does not attach any meaning to element or property names. You
//! tell the [`Reader`] which properties to read into your own types via
//! [`PropBinding`]s, and the [`Writer`] which properties to write from them.
//! Values are converted between the type stored in the file and the type of
//! your fields automatically.
//!
//! Data you did not ask for is not lost: unrequested properties can be kept
//! as [`OtherData`] and whole elements can be read as [`OtherElement`]s.
//! Both can be written to another file unchanged.
//!
//! # Example
//!
//! Copying a file while reading its vertex positions and carrying along
//! everything else:
//!
//! ```
//! use plyio::{Error, Format, OtherData, PropBinding, Reader, Writer};
//!
//! #[derive(Default)]
//! struct Vertex {
//!     x: f32,
//!     other: OtherData,
//! }
//!
//! # fn main() -> Result<(), Error> {
//! let input = b"ply\nformat ascii 1.0\nelement vertex 2\nproperty float x\n\
//!     property uchar red\nelement edge 1\nproperty int vertex1\n\
//!     property int vertex2\nend_header\n1.5 255\n-2 0\n0 1\n";
//!
//! let mut reader = Reader::new(&input[..])?;
//! let (vertices, other_props) = {
//!     let mut elem = reader.element::<Vertex>("vertex")?;
//!     elem.request(PropBinding::scalar("x", |v: &Vertex| v.x, |v, x| v.x = x))?;
//!     let other_props = elem.keep_other_properties(|v, data| v.other = data)?;
//!     (elem.read_all()?, other_props)
//! };
//! reader.read_other_element("edge")?;
//! let other_elements = reader.close()?;
//!
//! let mut writer = Writer::new(Vec::new(), Format::BinaryLittleEndian);
//! writer.declare_element("vertex", vertices.len() as u64)?;
//! writer.declare_property("vertex", plyio::PropertyDef::scalar("x", plyio::ScalarType::Float64))?;
//! writer.declare_other_properties(&other_props)?;
//! writer.declare_other_elements(&other_elements)?;
//! writer.finish_header()?;
//!
//! writer.element::<Vertex>("vertex")?
//!     .bind(PropBinding::scalar("x", |v: &Vertex| v.x, |v, x| v.x = x))?
//!     .with_other_properties(|v| &v.other)
//!     .write_all(&vertices)?;
//! writer.write_other_elements(&other_elements)?;
//! let bytes = writer.close()?;
//! # assert!(bytes.len() > 0);
//! # Ok(())
//! # }
//! ```

#[macro_use]
mod error;

mod binding;
mod codec;
mod cursor;
mod header;
mod input;
mod other;
mod read;
pub mod scalar;
pub mod schema;
pub mod value;
mod write;

pub use self::{
    binding::PropBinding,
    error::Error,
    other::{OtherData, OtherElement, OtherProps},
    read::{ElementReader, Reader},
    scalar::{PlyScalar, Scalar, ScalarType},
    schema::{Annotation, ElementDef, Format, Header, PropertyDef, PropertyKind},
    value::Value,
    write::{ElementWriter, Writer},
};
