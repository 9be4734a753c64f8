//! In-memory description of a PLY file: its format, elements and their
//! properties, plus comments and object information.
//!
//! The header does not assign any meaning to element or property names. A
//! file with elements `vertex` and `face` is described exactly like a file
//! with user-defined elements.

use std::fmt;

use crate::{
    error::Error,
    scalar::ScalarType,
};


/// The version written to headers unless something else is specified.
pub const DEFAULT_VERSION: &str = "1.0";

/// Only major version 1 exists. We accept `1`, `1.0` and any other `1.x`.
pub(crate) fn is_supported_version(version: &str) -> bool {
    let mut parts = version.splitn(2, '.');
    let major = parts.next();
    let minor_ok = match parts.next() {
        None => true,
        Some(minor) => !minor.is_empty() && minor.bytes().all(|b| b.is_ascii_digit()),
    };

    major == Some("1") && minor_ok
}

/// The encoding of the element data of a PLY file. The header is always
/// ASCII.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ascii,
    BinaryBigEndian,
    BinaryLittleEndian,
}

impl Format {
    /// Returns the binary format with the byte order of the machine we are
    /// running on.
    pub fn binary_native() -> Self {
        #[cfg(target_endian = "big")]
        { Format::BinaryBigEndian }

        #[cfg(target_endian = "little")]
        { Format::BinaryLittleEndian }
    }

    /// The keyword used in the `format` header line.
    pub fn keyword(&self) -> &'static str {
        match self {
            Format::Ascii => "ascii",
            Format::BinaryBigEndian => "binary_big_endian",
            Format::BinaryLittleEndian => "binary_little_endian",
        }
    }

    /// Parses the keyword of a `format` header line.
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "ascii" => Some(Format::Ascii),
            "binary_big_endian" => Some(Format::BinaryBigEndian),
            "binary_little_endian" => Some(Format::BinaryLittleEndian),
            _ => None,
        }
    }

    pub fn is_binary(&self) -> bool {
        *self != Format::Ascii
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.keyword().fmt(f)
    }
}


// ===========================================================================
// ===== Properties and elements
// ===========================================================================

/// The type of a property: a single scalar or a list of scalars prefixed by
/// its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Scalar(ScalarType),
    List {
        /// The type the list length is stored as. Always an integer type.
        len_type: ScalarType,
        scalar_type: ScalarType,
    },
}

impl PropertyKind {
    pub fn list(len_type: ScalarType, scalar_type: ScalarType) -> Self {
        PropertyKind::List { len_type, scalar_type }
    }

    pub fn len_type(&self) -> Option<ScalarType> {
        match self {
            PropertyKind::Scalar(_) => None,
            PropertyKind::List { len_type, .. } => Some(*len_type),
        }
    }

    /// The type of the value, or of each list entry.
    pub fn scalar_type(&self) -> ScalarType {
        match *self {
            PropertyKind::Scalar(scalar_type) => scalar_type,
            PropertyKind::List { scalar_type, .. } => scalar_type,
        }
    }

    pub fn is_list(&self) -> bool {
        self.len_type().is_some()
    }
}

impl fmt::Display for PropertyKind {
    /// Formats the kind as it appears in a `property` header line, e.g.
    /// `float` or `list uchar int`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PropertyKind::Scalar(ty) => ty.fmt(f),
            PropertyKind::List { len_type, scalar_type } => {
                write!(f, "list {} {}", len_type, scalar_type)
            }
        }
    }
}

/// The header definition of one property of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDef {
    pub name: String,
    pub kind: PropertyKind,
}

impl PropertyDef {
    pub fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self { name: name.into(), kind }
    }

    pub fn scalar(name: impl Into<String>, ty: ScalarType) -> Self {
        Self::new(name, PropertyKind::Scalar(ty))
    }

    pub fn list(name: impl Into<String>, len_type: ScalarType, scalar_type: ScalarType) -> Self {
        Self::new(name, PropertyKind::list(len_type, scalar_type))
    }

    /// Checks that the name can be written to a header and that a list
    /// length is stored as integer.
    pub fn validate(&self) -> Result<(), Error> {
        check_name(&self.name, "property")?;
        if let Some(len_type) = self.kind.len_type() {
            if len_type.is_floating_point() {
                return Err(schema_violation!(
                    "list property '{}' uses floating point type '{}' as count type",
                    self.name,
                    len_type,
                ));
            }
        }

        Ok(())
    }
}

/// The header definition of one element: its name, the number of instances
/// in the file and the ordered properties of each instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementDef {
    pub name: String,

    /// Number of instances of this element.
    pub count: u64,

    /// Definitions of all properties, in the order they are stored.
    pub property_defs: Vec<PropertyDef>,
}

impl ElementDef {
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
            property_defs: Vec::new(),
        }
    }

    /// Returns the position of the property with the given name.
    pub fn prop_pos(&self, prop_name: &str) -> Option<usize> {
        self.property_defs.iter().position(|p| p.name == prop_name)
    }

    pub fn property(&self, prop_name: &str) -> Option<&PropertyDef> {
        self.property_defs.iter().find(|p| p.name == prop_name)
    }

    /// Appends a property. Fails if the property is invalid or an equally
    /// named property already exists.
    pub fn add_property(&mut self, def: PropertyDef) -> Result<(), Error> {
        def.validate()?;
        if self.prop_pos(&def.name).is_some() {
            return Err(schema_violation!(
                "duplicate property '{}' in element '{}'",
                def.name,
                self.name,
            ));
        }

        self.property_defs.push(def);
        Ok(())
    }

    /// Builder-style variant of [`ElementDef::add_property`].
    pub fn with_property(mut self, def: PropertyDef) -> Result<Self, Error> {
        self.add_property(def)?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), Error> {
        check_name(&self.name, "element")?;
        for (i, prop) in self.property_defs.iter().enumerate() {
            prop.validate()?;
            if self.property_defs[..i].iter().any(|p| p.name == prop.name) {
                return Err(schema_violation!(
                    "duplicate property '{}' in element '{}'",
                    prop.name,
                    self.name,
                ));
            }
        }

        Ok(())
    }
}

/// Names are written as single whitespace-delimited words.
fn check_name(name: &str, what: &str) -> Result<(), Error> {
    if name.is_empty() || name.chars().any(|c| c.is_whitespace()) {
        return Err(schema_violation!("invalid {} name {:?}", what, name));
    }

    Ok(())
}


// ===========================================================================
// ===== Header
// ===========================================================================

/// A free-text line of the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// A `comment` line.
    Comment(String),
    /// An `obj_info` line.
    ObjInfo(String),
}

/// The complete header of a PLY file.
///
/// The order of `elements` is the order of the element sections in the file.
/// `annotations` keeps comments and obj_info lines in the order they were
/// added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub format: Format,
    pub version: String,
    pub elements: Vec<ElementDef>,
    pub annotations: Vec<Annotation>,
}

impl Header {
    /// Creates an empty header with the given format and version `1.0`.
    pub fn new(format: Format) -> Self {
        Self {
            format,
            version: DEFAULT_VERSION.into(),
            elements: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Returns all comments in order.
    pub fn comments(&self) -> impl Iterator<Item = &str> + '_ {
        self.annotations.iter().filter_map(|a| match a {
            Annotation::Comment(c) => Some(c.as_str()),
            _ => None,
        })
    }

    /// Returns all obj_info lines in order.
    pub fn obj_info(&self) -> impl Iterator<Item = &str> + '_ {
        self.annotations.iter().filter_map(|a| match a {
            Annotation::ObjInfo(o) => Some(o.as_str()),
            _ => None,
        })
    }

    /// Adds a `comment` line. Fails if the text contains a line break.
    pub fn add_comment(&mut self, comment: impl Into<String>) -> Result<(), Error> {
        let comment = check_text(comment.into())?;
        self.annotations.push(Annotation::Comment(comment));
        Ok(())
    }

    /// Adds an `obj_info` line. Fails if the text contains a line break.
    pub fn add_obj_info(&mut self, info: impl Into<String>) -> Result<(), Error> {
        let info = check_text(info.into())?;
        self.annotations.push(Annotation::ObjInfo(info));
        Ok(())
    }

    pub fn element_pos(&self, name: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.name == name)
    }

    pub fn element(&self, name: &str) -> Option<&ElementDef> {
        self.elements.iter().find(|e| e.name == name)
    }

    pub fn element_mut(&mut self, name: &str) -> Option<&mut ElementDef> {
        self.elements.iter_mut().find(|e| e.name == name)
    }

    /// Appends an element. Fails if the element is invalid or an element
    /// with the same name already exists.
    pub fn add_element(&mut self, def: ElementDef) -> Result<(), Error> {
        def.validate()?;
        if self.element_pos(&def.name).is_some() {
            return Err(schema_violation!("duplicate element '{}'", def.name));
        }

        self.elements.push(def);
        Ok(())
    }

    /// Checks the whole header: valid names, unique element names, unique
    /// property names per element, integer list count types and line-free
    /// annotations.
    pub fn validate(&self) -> Result<(), Error> {
        if !is_supported_version(&self.version) {
            return Err(schema_violation!("unsupported format version {:?}", self.version));
        }

        for (i, elem) in self.elements.iter().enumerate() {
            elem.validate()?;
            if self.elements[..i].iter().any(|e| e.name == elem.name) {
                return Err(schema_violation!("duplicate element '{}'", elem.name));
            }
        }

        for a in &self.annotations {
            let (Annotation::Comment(text) | Annotation::ObjInfo(text)) = a;
            if text.contains('\n') || text.contains('\r') {
                return Err(schema_violation!("header text {:?} contains a line break", text));
            }
        }

        Ok(())
    }
}

fn check_text(text: String) -> Result<String, Error> {
    if text.contains('\n') || text.contains('\r') {
        return Err(schema_violation!("header text {:?} contains a line break", text));
    }

    Ok(text)
}
