//! Writing PLY files element by element.
//!
//! # Notes on the format
//!
//! - For ASCII encoding we simply use the `fmt::Display` impl of all
//!   primitive types. Floats are thus written with the shortest
//!   representation that reads back as the same value.
//! - Elements carried along from another file ("other elements") are always
//!   declared and written after all regular elements.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use log::trace;

use crate::{
    binding::PropBinding,
    codec,
    cursor::Cursor,
    error::Error,
    header::write_header,
    other::{OtherData, OtherElement, OtherProps},
    schema::{ElementDef, Format, Header, PropertyDef},
    value::Value,
};


// ===========================================================================
// ===== `Writer`
// ===========================================================================

/// A writer for PLY files.
///
/// Writing happens in three phases:
///
/// 1. Describe the file: declare elements and their properties, add
///    comments and obj_info lines.
/// 2. Call [`Writer::finish_header`], which writes the header. The schema
///    can't be changed afterwards.
/// 3. Write the instances of every element, in the order the elements were
///    declared, with [`Writer::element`]. Finally, write the other elements
///    (if any were declared) and [close][Writer::close] the writer.
///
/// Once writing fails because of an IO error or because elements were
/// written out of order, the writer is unusable.
///
/// # Example
///
/// ```
/// use plyio::{Error, Format, PropBinding, PropertyDef, ScalarType, Writer};
///
/// struct Face {
///     vertex_indices: Vec<u32>,
/// }
///
/// # fn main() -> Result<(), Error> {
/// let faces = vec![
///     Face { vertex_indices: vec![0, 1, 2] },
///     Face { vertex_indices: vec![0, 2, 3] },
/// ];
///
/// let mut writer = Writer::new(Vec::new(), Format::Ascii);
/// writer.add_comment("two triangles")?;
/// writer.declare_element("face", faces.len() as u64)?;
/// writer.declare_property(
///     "face",
///     PropertyDef::list("vertex_indices", ScalarType::Uint8, ScalarType::Int32),
/// )?;
/// writer.finish_header()?;
///
/// writer.element::<Face>("face")?
///     .bind(PropBinding::list("vertex_indices", |f: &Face| &f.vertex_indices[..], |f, v| f.vertex_indices = v))?
///     .write_all(&faces)?;
///
/// let bytes = writer.close()?;
/// assert!(bytes.ends_with(b"end_header\n3 0 1 2\n3 0 2 3\n"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Writer<W: Write> {
    writer: W,
    header: Header,

    /// Elements declared via `declare_other_elements`.
    other_elements: Vec<ElementDef>,
    others_written: usize,

    header_written: bool,
    cursor: Cursor,

    /// Set after an error that leaves the output in an unknown state.
    poisoned: bool,
}

impl Writer<BufWriter<File>> {
    /// Creates the file at the given path and a writer with the given header.
    pub fn create(path: impl AsRef<Path>, header: Header) -> Result<Self, Error> {
        let file = File::create(path)?;
        Ok(Self::with_header(BufWriter::new(file), header))
    }
}

impl<W: Write> Writer<W> {
    /// Creates a writer for a file with the given format and no elements.
    pub fn new(writer: W, format: Format) -> Self {
        Self::with_header(writer, Header::new(format))
    }

    /// Creates a writer with an already complete schema, e.g. the header of
    /// a file that was read before. More elements, properties and comments
    /// can still be added.
    pub fn with_header(writer: W, header: Header) -> Self {
        Self {
            writer,
            header,
            other_elements: Vec::new(),
            others_written: 0,
            header_written: false,
            cursor: Cursor::default(),
            poisoned: false,
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn format(&self) -> Format {
        self.header.format
    }

    fn check_header_open(&self, what: &str) -> Result<(), Error> {
        if self.header_written {
            return Err(sequencing_error!("{} after the header was written", what));
        }

        Ok(())
    }

    fn check_usable(&self) -> Result<(), Error> {
        if self.poisoned {
            return Err(sequencing_error!("writer is unusable after a previous error"));
        }

        Ok(())
    }

    fn poison_on_err<O>(&mut self, res: Result<O, Error>) -> Result<O, Error> {
        if res.is_err() {
            self.poisoned = true;
        }
        res
    }

    // ----- Header ----------------------------------------------------------

    pub fn add_comment(&mut self, comment: impl Into<String>) -> Result<(), Error> {
        self.check_header_open("comment added")?;
        self.header.add_comment(comment)
    }

    pub fn add_obj_info(&mut self, info: impl Into<String>) -> Result<(), Error> {
        self.check_header_open("obj_info added")?;
        self.header.add_obj_info(info)
    }

    /// Declares an element with `count` instances. Elements have to be
    /// written in the order they are declared.
    pub fn declare_element(&mut self, name: impl Into<String>, count: u64) -> Result<(), Error> {
        self.check_header_open("element declared")?;
        let name = name.into();
        if self.other_elements.iter().any(|e| e.name == name) {
            return Err(schema_violation!("duplicate element '{}'", name));
        }

        self.header.add_element(ElementDef::new(name, count))
    }

    /// Appends a property to the declared element `element`.
    pub fn declare_property(&mut self, element: &str, def: PropertyDef) -> Result<(), Error> {
        self.check_header_open("property declared")?;
        let index = self.element_index(element)?;

        self.header.elements[index].add_property(def)
    }

    /// Appends the properties kept by
    /// [`ElementReader::keep_other_properties`][crate::ElementReader::keep_other_properties]
    /// to the declared element of the same name. Their values are taken from
    /// the records' [`OtherData`], see [`ElementWriter::with_other_properties`].
    pub fn declare_other_properties(&mut self, props: &OtherProps) -> Result<(), Error> {
        self.check_header_open("other properties declared")?;
        let index = self.element_index(&props.element)?;

        for def in &props.property_defs {
            self.header.elements[index].add_property(def.clone())?;
        }

        Ok(())
    }

    /// Declares elements carried along from another file. They are placed
    /// after all other elements and have to be written with
    /// [`Writer::write_other_elements`].
    pub fn declare_other_elements(&mut self, elements: &[OtherElement]) -> Result<(), Error> {
        self.check_header_open("other elements declared")?;

        for elem in elements {
            let def = &elem.def;
            def.validate()?;
            if def.count != elem.instances.len() as u64 {
                return Err(schema_violation!(
                    "other element '{}' declares {} instance(s), but holds {}",
                    def.name,
                    def.count,
                    elem.instances.len(),
                ));
            }

            let exists = self.header.element_pos(&def.name).is_some()
                || self.other_elements.iter().any(|e| e.name == def.name);
            if exists {
                return Err(schema_violation!("duplicate element '{}'", def.name));
            }

            self.other_elements.push(def.clone());
        }

        Ok(())
    }

    /// Writes the header. Afterwards, the schema can't be changed anymore
    /// and element data can be written.
    pub fn finish_header(&mut self) -> Result<(), Error> {
        self.check_usable()?;
        self.check_header_open("header finished")?;
        self.header.validate()?;

        let res = write_header(&mut self.writer, &self.header, &self.other_elements);
        self.poison_on_err(res)?;
        self.header_written = true;

        Ok(())
    }

    fn element_index(&self, name: &str) -> Result<usize, Error> {
        self.header.element_pos(name).ok_or_else(|| {
            schema_violation!("no element '{}' declared", name)
        })
    }

    // ----- Data ------------------------------------------------------------

    /// Starts writing the instances of element `name` from records of type
    /// `T`.
    ///
    /// The element has to be the next declared one, and the previous one has
    /// to be written completely. Elements without instances can be skipped.
    pub fn element<T: 'static>(&mut self, name: &str) -> Result<ElementWriter<'_, W, T>, Error> {
        self.check_usable()?;
        if !self.header_written {
            return Err(sequencing_error!("element '{}' written before the header", name));
        }

        let index = self.element_index(name)?;
        let res = self.cursor.begin(&self.header.elements, index);
        self.poison_on_err(res)?;

        let def = &self.header.elements[index];
        trace!("writing element '{}' ({} instance(s))", def.name, def.count);

        let num_props = def.property_defs.len();
        Ok(ElementWriter {
            writer: self,
            index,
            bindings: (0..num_props).map(|_| None).collect(),
            other: None,
        })
    }

    /// Writes the instances of the elements declared with
    /// [`Writer::declare_other_elements`], in the same order. Can be called
    /// several times, with the remaining elements each.
    pub fn write_other_elements(&mut self, elements: &[OtherElement]) -> Result<(), Error> {
        self.check_usable()?;
        if !self.header_written {
            return Err(sequencing_error!("other elements written before the header"));
        }

        let res = self.cursor.check_finished(&self.header.elements);
        self.poison_on_err(res)?;

        for elem in elements {
            let expected = match self.other_elements.get(self.others_written) {
                Some(def) => def,
                None => {
                    self.poisoned = true;
                    return Err(sequencing_error!(
                        "other element '{}' was not declared or was already written",
                        elem.name(),
                    ));
                }
            };

            if expected != &elem.def {
                let msg = sequencing_error!(
                    "other element '{}' expected, but got '{}'",
                    expected.name,
                    elem.name(),
                );
                self.poisoned = true;
                return Err(msg);
            }

            trace!("writing other element '{}' ({} instance(s))", elem.name(), elem.def.count);
            // Decode everything first so broken data leaves no partial element.
            let decoded = elem.instances.iter()
                .map(|data| data.decode(&elem.def.property_defs))
                .collect::<Result<Vec<_>, _>>();
            let decoded = self.poison_on_err(decoded)?;

            for values in &decoded {
                let res = write_instance(
                    &mut self.writer,
                    self.header.format,
                    &elem.def.property_defs,
                    values,
                );
                self.poison_on_err(res)?;
            }

            self.others_written += 1;
        }

        Ok(())
    }

    /// Checks that everything declared was written, flushes and returns the
    /// underlying writer.
    pub fn close(mut self) -> Result<W, Error> {
        self.check_usable()?;
        if !self.header_written {
            return Err(sequencing_error!("writer closed before the header was written"));
        }

        self.cursor.check_finished(&self.header.elements)?;
        if let Some(missing) = self.other_elements.get(self.others_written) {
            return Err(sequencing_error!(
                "writer closed before other element '{}' was written",
                missing.name,
            ));
        }

        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Encodes one instance. `values` holds one value per property.
fn write_instance<W: Write>(
    w: &mut W,
    format: Format,
    props: &[PropertyDef],
    values: &[Value],
) -> Result<(), Error> {
    codec::with_encoder(w, format, |enc| {
        for (prop, value) in props.iter().zip(values) {
            codec::write_property(enc, &prop.name, prop.kind, value)?;
        }
        enc.end_element()
    })
}


// ===========================================================================
// ===== `ElementWriter`
// ===========================================================================

/// Writes the instances of one element from records of type `T`. Created by
/// [`Writer::element`].
///
/// Every declared property of the element needs a value: bind properties
/// with [`ElementWriter::bind`]. The values of all properties that are not
/// bound are taken from the records' [`OtherData`], if
/// [`ElementWriter::with_other_properties`] was called.
pub struct ElementWriter<'a, W: Write, T> {
    writer: &'a mut Writer<W>,
    index: usize,

    /// One entry per property, in declaration order.
    bindings: Vec<Option<PropBinding<T>>>,
    other: Option<fn(&T) -> &OtherData>,
}

impl<'a, W: Write, T: 'static> ElementWriter<'a, W, T> {
    pub fn def(&self) -> &ElementDef {
        &self.writer.header.elements[self.index]
    }

    /// Number of instances that still have to be written.
    pub fn remaining(&self) -> u64 {
        self.writer.cursor.remaining(&self.writer.header.elements, self.index)
    }

    fn check_not_started(&self, what: &str) -> Result<(), Error> {
        if self.remaining() < self.def().count {
            return Err(sequencing_error!(
                "{} after instances of element '{}' were written",
                what,
                self.def().name,
            ));
        }

        Ok(())
    }

    /// Provides the values for the declared property named like the binding.
    /// The values are converted into the declared type when written.
    pub fn bind(&mut self, binding: PropBinding<T>) -> Result<&mut Self, Error> {
        self.check_not_started("property bound")?;

        let def = self.def();
        let pos = def.prop_pos(binding.name()).ok_or_else(|| {
            schema_violation!("element '{}' has no property '{}'", def.name, binding.name())
        })?;

        let prop = &def.property_defs[pos];
        if prop.kind.is_list() != binding.kind().is_list() {
            return Err(schema_violation!(
                "property '{}' of element '{}' has kind '{}', but was bound as '{}'",
                prop.name,
                def.name,
                prop.kind,
                binding.kind(),
            ));
        }
        if self.bindings[pos].is_some() {
            return Err(schema_violation!(
                "property '{}' of element '{}' bound twice",
                prop.name,
                def.name,
            ));
        }

        self.bindings[pos] = Some(binding);
        Ok(self)
    }

    /// Sets the function returning the [`OtherData`] of a record. The data
    /// has to hold the values of all properties that are not bound, in
    /// declaration order. Usually, these are the properties declared with
    /// [`Writer::declare_other_properties`].
    pub fn with_other_properties(&mut self, get: fn(&T) -> &OtherData) -> &mut Self {
        self.other = Some(get);
        self
    }

    /// Collects the values of all properties of `record` and checks them.
    fn values_of(&self, record: &T) -> Result<Vec<Value>, Error> {
        let def = self.def();

        let unbound: Vec<_> = def.property_defs.iter()
            .zip(&self.bindings)
            .filter(|(_, b)| b.is_none())
            .map(|(p, _)| p.clone())
            .collect();

        let mut other_values = match (unbound.first(), self.other) {
            (None, _) => Vec::new().into_iter(),
            (Some(_), Some(get)) => get(record).decode(&unbound)?.into_iter(),
            (Some(prop), None) => {
                return Err(schema_violation!(
                    "property '{}' of element '{}' was not bound and no other data was provided",
                    prop.name,
                    def.name,
                ));
            }
        };

        let mut values = Vec::with_capacity(def.property_defs.len());
        for (prop, binding) in def.property_defs.iter().zip(&self.bindings) {
            let value = match binding {
                Some(binding) => binding.get(record),
                None => match other_values.next() {
                    Some(v) => v,
                    None => unreachable!("`decode` returns one value per property"),
                },
            };

            codec::check_value(&prop.name, prop.kind, &value)?;
            values.push(value);
        }

        Ok(values)
    }

    /// Writes one instance.
    ///
    /// Fails without writing anything if a property is not bound or a value
    /// doesn't fit its declaration (e.g. a list that is too long for its
    /// count type).
    pub fn write(&mut self, record: &T) -> Result<(), Error> {
        self.writer.check_usable()?;
        let values = self.values_of(record)?;

        let writer = &mut *self.writer;
        let res = writer.cursor.advance(&writer.header.elements, self.index);
        writer.poison_on_err(res)?;

        let props = &writer.header.elements[self.index].property_defs;
        let res = write_instance(&mut writer.writer, writer.header.format, props, &values);
        writer.poison_on_err(res)
    }

    /// Writes all given records.
    pub fn write_all<'r>(&mut self, records: impl IntoIterator<Item = &'r T>) -> Result<(), Error>
    where
        T: 'r,
    {
        for record in records {
            self.write(record)?;
        }

        Ok(())
    }
}
