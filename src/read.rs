//! Reading PLY files element by element.

use std::{
    cmp,
    fs::File,
    io::Read,
    path::Path,
};

use log::{trace, warn};

use crate::{
    binding::PropBinding,
    codec,
    cursor::Cursor,
    error::Error,
    header::read_header,
    input::Input,
    other::{OtherData, OtherElement, OtherProps},
    schema::{ElementDef, Format, Header},
    value::Value,
};


/// Instances are never preallocated in larger numbers than this by
/// [`ElementReader::read_all`].
const MAX_PREALLOC: u64 = 1024;


// ===========================================================================
// ===== `Reader`
// ===========================================================================

/// A reader for PLY files.
///
/// Creating the reader parses the header. Afterwards, the element sections
/// have to be read in the order they appear in the file, each one
/// completely: either with [`Reader::element`] into your own types or with
/// [`Reader::read_other_element`] as opaque data.
///
/// Once reading fails because of broken data or an IO error, the reader is
/// unusable and all further reads fail.
///
/// # Example
///
/// ```
/// use plyio::{Error, PropBinding, Reader};
///
/// #[derive(Default)]
/// struct Vertex {
///     pos: [f32; 3],
/// }
///
/// # fn main() -> Result<(), Error> {
/// let file = b"ply\nformat ascii 1.0\nelement vertex 2\n\
///     property float x\nproperty float y\nproperty float z\nend_header\n\
///     1.5 2.5 3.5\n0 0 1\n";
///
/// let mut reader = Reader::new(&file[..])?;
/// let vertices = {
///     let mut elem = reader.element::<Vertex>("vertex")?;
///     elem.request(PropBinding::scalar("x", |v: &Vertex| v.pos[0], |v, x| v.pos[0] = x))?
///         .request(PropBinding::scalar("y", |v: &Vertex| v.pos[1], |v, y| v.pos[1] = y))?
///         .request(PropBinding::scalar("z", |v: &Vertex| v.pos[2], |v, z| v.pos[2] = z))?;
///     elem.read_all()?
/// };
///
/// assert_eq!(vertices[0].pos, [1.5, 2.5, 3.5]);
/// reader.close()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Reader<R: Read> {
    input: Input<R>,
    header: Header,
    cursor: Cursor,
    other_elements: Vec<OtherElement>,

    /// Set after an error that leaves the input at an unknown position.
    poisoned: bool,
}

impl Reader<File> {
    /// Opens the file at the given path and parses its header.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        // No `BufReader` needed, `Input` buffers anyway.
        Self::new(File::open(path)?)
    }
}

impl<R: Read> Reader<R> {
    /// Creates a reader and parses the header from the given input.
    pub fn new(reader: R) -> Result<Self, Error> {
        let mut input = Input::new(reader);
        let header = read_header(&mut input)?;

        Ok(Self {
            input,
            header,
            cursor: Cursor::default(),
            other_elements: Vec::new(),
            poisoned: false,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn format(&self) -> Format {
        self.header.format
    }

    pub fn comments(&self) -> impl Iterator<Item = &str> + '_ {
        self.header.comments()
    }

    pub fn obj_info(&self) -> impl Iterator<Item = &str> + '_ {
        self.header.obj_info()
    }

    /// Elements read with [`Reader::read_other_element`] so far.
    pub fn other_elements(&self) -> &[OtherElement] {
        &self.other_elements
    }

    /// Starts reading the element with the given name into records of type
    /// `T`.
    ///
    /// The element has to be the next one in the file, and the previous one
    /// has to be read completely. Elements without instances can be skipped.
    pub fn element<T: 'static>(&mut self, name: &str) -> Result<ElementReader<'_, R, T>, Error> {
        let index = self.begin_element(name)?;
        let num_props = self.header.elements[index].property_defs.len();

        Ok(ElementReader {
            reader: self,
            index,
            slots: (0..num_props).map(|_| Slot::Skip).collect(),
            store_other: None,
        })
    }

    /// Reads all instances of the element with the given name as opaque
    /// data. The same ordering rules as for [`Reader::element`] apply.
    pub fn read_other_element(&mut self, name: &str) -> Result<&OtherElement, Error> {
        let index = self.begin_element(name)?;
        let def = self.header.elements[index].clone();

        let mut instances = Vec::with_capacity(cmp::min(def.count, MAX_PREALLOC) as usize);
        for _ in 0..def.count {
            let values = self.read_instance(index)?;

            let mut data = OtherData::new();
            for (prop, value) in def.property_defs.iter().zip(&values) {
                data.push(prop, value)?;
            }
            instances.push(data);
        }

        self.other_elements.push(OtherElement { def, instances });
        Ok(&self.other_elements[self.other_elements.len() - 1])
    }

    /// Ends the reading session and returns all elements read with
    /// [`Reader::read_other_element`].
    ///
    /// Elements that were never started are ignored. Fails if an element was
    /// only read partially.
    pub fn close(self) -> Result<Vec<OtherElement>, Error> {
        let elements = &self.header.elements;
        if !self.poisoned && self.cursor.is_partial(elements) {
            return Err(sequencing_error!("reader closed in the middle of an element"));
        }

        let unread: Vec<_> = self.cursor.untouched(elements)
            .iter()
            .filter(|e| e.count > 0)
            .map(|e| e.name.as_str())
            .collect();
        if !unread.is_empty() && !self.poisoned {
            warn!("closing PLY reader with unread element(s): {}", unread.join(", "));
        }

        Ok(self.other_elements)
    }

    fn check_usable(&self) -> Result<(), Error> {
        if self.poisoned {
            return Err(sequencing_error!("reader is unusable after a previous error"));
        }

        Ok(())
    }

    fn poison_on_err<O>(&mut self, res: Result<O, Error>) -> Result<O, Error> {
        if res.is_err() {
            self.poisoned = true;
        }
        res
    }

    fn begin_element(&mut self, name: &str) -> Result<usize, Error> {
        self.check_usable()?;

        let index = self.header.element_pos(name).ok_or_else(|| {
            schema_violation!("file has no element '{}'", name)
        })?;

        let res = self.cursor.begin(&self.header.elements, index);
        self.poison_on_err(res)?;

        let def = &self.header.elements[index];
        trace!("reading element '{}' ({} instance(s))", def.name, def.count);

        Ok(index)
    }

    /// Reads all property values of the next instance of element `index`, in
    /// file types.
    fn read_instance(&mut self, index: usize) -> Result<Vec<Value>, Error> {
        self.check_usable()?;

        let res = self.cursor.advance(&self.header.elements, index);
        self.poison_on_err(res)?;

        let format = self.header.format;
        let input = &mut self.input;
        let res: Result<Vec<_>, _> = self.header.elements[index].property_defs.iter()
            .map(|prop| codec::read_property(input, format, prop.kind))
            .collect();

        self.poison_on_err(res)
    }
}


// ===========================================================================
// ===== `ElementReader`
// ===========================================================================

/// What to do with one property of the element.
enum Slot<T> {
    /// Read and discard.
    Skip,

    /// Read into the `OtherData` of the instance.
    Other,

    /// Read and pass to the binding.
    Bound(PropBinding<T>),
}

/// Reads the instances of one element into records of type `T`. Created by
/// [`Reader::element`].
///
/// Before reading instances, request the properties you are interested in
/// with [`ElementReader::request`]. All other properties are skipped or, with
/// [`ElementReader::keep_other_properties`], stored as opaque data.
pub struct ElementReader<'a, R: Read, T> {
    reader: &'a mut Reader<R>,
    index: usize,

    /// One slot per property, in file order.
    slots: Vec<Slot<T>>,
    store_other: Option<Box<dyn Fn(&mut T, OtherData)>>,
}

impl<'a, R: Read, T: 'static> ElementReader<'a, R, T> {
    /// The definition of the element as found in the header.
    pub fn def(&self) -> &ElementDef {
        &self.reader.header.elements[self.index]
    }

    /// Number of instances not yet read.
    pub fn remaining(&self) -> u64 {
        self.reader.cursor.remaining(&self.reader.header.elements, self.index)
    }

    fn check_not_started(&self, what: &str) -> Result<(), Error> {
        if self.remaining() < self.def().count {
            return Err(sequencing_error!(
                "{} after instances of element '{}' were read",
                what,
                self.def().name,
            ));
        }

        Ok(())
    }

    /// Requests the property named like the binding. Its values are
    /// converted into the binding's kind and passed to its setter.
    ///
    /// Fails if the element has no such property, the property was already
    /// requested or one of them is a list while the other isn't.
    pub fn request(&mut self, binding: PropBinding<T>) -> Result<&mut Self, Error> {
        self.reader.check_usable()?;
        self.check_not_started("property requested")?;
        if self.store_other.is_some() {
            return Err(sequencing_error!(
                "property '{}' requested after `keep_other_properties`",
                binding.name(),
            ));
        }

        let def = self.def();
        let pos = def.prop_pos(binding.name()).ok_or_else(|| {
            schema_violation!("element '{}' has no property '{}'", def.name, binding.name())
        })?;

        let prop = &def.property_defs[pos];
        if prop.kind.is_list() != binding.kind().is_list() {
            return Err(schema_violation!(
                "property '{}' of element '{}' has kind '{}', but was requested as '{}'",
                prop.name,
                def.name,
                prop.kind,
                binding.kind(),
            ));
        }
        if let Slot::Bound(_) = self.slots[pos] {
            return Err(schema_violation!(
                "property '{}' of element '{}' requested twice",
                prop.name,
                def.name,
            ));
        }

        self.slots[pos] = Slot::Bound(binding);
        Ok(self)
    }

    /// Keeps all properties that were not requested. For every instance,
    /// their values are passed to `store` as one [`OtherData`].
    ///
    /// Returns the definitions of those properties. No properties can be
    /// requested afterwards.
    pub fn keep_other_properties(
        &mut self,
        store: impl Fn(&mut T, OtherData) + 'static,
    ) -> Result<OtherProps, Error> {
        self.reader.check_usable()?;
        self.check_not_started("`keep_other_properties` called")?;
        if self.store_other.is_some() {
            return Err(sequencing_error!("`keep_other_properties` called twice"));
        }

        let mut property_defs = Vec::new();
        for (slot, prop) in self.slots.iter_mut().zip(&self.reader.header.elements[self.index].property_defs) {
            if let Slot::Skip = slot {
                *slot = Slot::Other;
                property_defs.push(prop.clone());
            }
        }

        self.store_other = Some(Box::new(store));
        Ok(OtherProps {
            element: self.def().name.clone(),
            property_defs,
        })
    }

    /// Reads the next instance into `record`. Only requested properties (and
    /// the other data, if kept) are touched.
    pub fn read_into(&mut self, record: &mut T) -> Result<(), Error> {
        let values = self.reader.read_instance(self.index)?;

        let mut other = OtherData::new();
        let props = &self.reader.header.elements[self.index].property_defs;
        for ((slot, prop), value) in self.slots.iter().zip(props).zip(values) {
            match slot {
                Slot::Skip => {}
                Slot::Other => other.push(prop, &value)?,
                Slot::Bound(binding) => binding.set(record, value),
            }
        }

        if let Some(store) = &self.store_other {
            store(record, other);
        }

        Ok(())
    }

    /// Reads the next instance into a new record.
    pub fn read_next(&mut self) -> Result<T, Error>
    where
        T: Default,
    {
        let mut record = T::default();
        self.read_into(&mut record)?;
        Ok(record)
    }

    /// Reads all remaining instances.
    pub fn read_all(&mut self) -> Result<Vec<T>, Error>
    where
        T: Default,
    {
        let remaining = self.remaining();
        let mut out = Vec::with_capacity(cmp::min(remaining, MAX_PREALLOC) as usize);
        for _ in 0..remaining {
            out.push(self.read_next()?);
        }

        Ok(out)
    }
}
