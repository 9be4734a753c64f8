use std::io::Read;

use log::debug;

use crate::{
    error::Error,
    input::Input,
    scalar::ScalarType,
    schema::{is_supported_version, Annotation, ElementDef, Format, Header, PropertyDef, PropertyKind},
};


/// Parses the header, i.e. everything up to and including the `end_header`
/// line. Afterwards, `input` is positioned at the first byte of element data.
pub(crate) fn read_header<R: Read>(input: &mut Input<R>) -> Result<Header, Error> {
    let mut parser = HeaderParser {
        line: 0,
        format: None,
        elements: Vec::new(),
        annotations: Vec::new(),
    };

    // ===== Magic number ====================================================
    parser.line += 1;
    let is_ply = input.read_line(|line| Ok(trim_end(line) == b"ply"))?;
    match is_ply {
        Some(true) => {}
        Some(false) => {
            return Err(Error::MalformedHeader {
                line: 1,
                msg: "not a PLY file (does not start with \"ply\")".into(),
            });
        }
        None => return Err(Error::TruncatedData("reading the PLY header".into())),
    }

    // ===== All other lines =================================================
    loop {
        parser.line += 1;
        let done = input.read_line(|line| parser.parse_line(line))?;
        match done {
            Some(true) => break,
            Some(false) => {}
            None => return Err(Error::TruncatedData("reading the PLY header".into())),
        }
    }

    let (format, version) = match parser.format {
        Some(f) => f,
        None => {
            return Err(Error::MalformedHeader {
                line: parser.line,
                msg: "missing \"format\" line".into(),
            });
        }
    };

    debug!(
        "parsed PLY header: format {} {}, {} element(s), {} comment/obj_info line(s)",
        format,
        version,
        parser.elements.len(),
        parser.annotations.len(),
    );

    Ok(Header {
        format,
        version,
        elements: parser.elements,
        annotations: parser.annotations,
    })
}

struct HeaderParser {
    /// Number of the current line (1-based).
    line: usize,
    format: Option<(Format, String)>,
    elements: Vec<ElementDef>,
    annotations: Vec<Annotation>,
}

impl HeaderParser {
    fn error(&self, msg: impl Into<String>) -> Error {
        Error::MalformedHeader {
            line: self.line,
            msg: msg.into(),
        }
    }

    /// Parses one line. Returns `true` if it was the `end_header` line.
    fn parse_line(&mut self, raw: &[u8]) -> Result<bool, Error> {
        let line = std::str::from_utf8(raw).map_err(|_| self.error("line is not valid UTF-8"))?;
        let words: Vec<&str> = line.split_whitespace().collect();

        let keyword = match words.first() {
            Some(k) => *k,

            // Blank lines are not allowed by the format, but cost nothing to
            // accept.
            None => return Ok(false),
        };

        match keyword {
            "end_header" => return Ok(true),
            "comment" => {
                let text = rest_of_line(line, keyword);
                self.annotations.push(Annotation::Comment(text));
            }
            "obj_info" => {
                let text = rest_of_line(line, keyword);
                self.annotations.push(Annotation::ObjInfo(text));
            }
            "format" => self.parse_format(&words)?,
            "element" => self.parse_element(&words)?,
            "property" => self.parse_property(&words)?,
            other => {
                return Err(self.error(format!(
                    "expected line starting with \"format\", \"comment\", \"obj_info\", \
                        \"element\", \"property\" or \"end_header\", found {:?}",
                    other,
                )));
            }
        }

        Ok(false)
    }

    /// `format <ascii|binary_big_endian|binary_little_endian> <version>`
    fn parse_format(&mut self, words: &[&str]) -> Result<(), Error> {
        if self.format.is_some() {
            return Err(self.error("duplicate \"format\" line"));
        }
        if words.len() != 3 {
            return Err(self.error("expected \"format <encoding> <version>\""));
        }

        let format = Format::from_keyword(words[1]).ok_or_else(|| {
            self.error(format!(
                "expected \"ascii\", \"binary_little_endian\" or \"binary_big_endian\", \
                    found {:?}",
                words[1],
            ))
        })?;

        if !is_supported_version(words[2]) {
            return Err(Error::UnsupportedFormatVersion {
                version: words[2].to_string(),
                line: self.line,
            });
        }

        self.format = Some((format, words[2].to_string()));
        Ok(())
    }

    /// `element <name> <count>`
    fn parse_element(&mut self, words: &[&str]) -> Result<(), Error> {
        if self.format.is_none() {
            return Err(self.error("element definition before \"format\" line"));
        }
        if words.len() != 3 {
            return Err(self.error("expected \"element <name> <count>\""));
        }

        let count = words[2].parse::<u64>().map_err(|e| {
            self.error(format!("invalid integer {:?} as element count ({})", words[2], e))
        })?;

        let def = ElementDef::new(words[1], count);
        if self.elements.iter().any(|e| e.name == def.name) {
            return Err(schema_violation!("duplicate element '{}' (line {})", def.name, self.line));
        }

        self.elements.push(def);
        Ok(())
    }

    /// `property <type> <name>` or `property list <count-type> <type> <name>`
    fn parse_property(&mut self, words: &[&str]) -> Result<(), Error> {
        let def = match words.get(1) {
            Some(&"list") => {
                if words.len() != 5 {
                    return Err(self.error(
                        "expected \"property list <count-type> <value-type> <name>\""
                    ));
                }

                let len_type = self.scalar_type(words[2])?;
                let scalar_type = self.scalar_type(words[3])?;
                PropertyDef::new(words[4], PropertyKind::List { len_type, scalar_type })
            }
            _ => {
                if words.len() != 3 {
                    return Err(self.error("expected \"property <type> <name>\""));
                }

                PropertyDef::new(words[2], PropertyKind::Scalar(self.scalar_type(words[1])?))
            }
        };

        let line = self.line;
        let elem = self.elements.last_mut().ok_or_else(|| Error::MalformedHeader {
            line,
            msg: "property definition without preceding element definition".into(),
        })?;

        elem.add_property(def).map_err(|e| match e {
            Error::SchemaViolation(msg) => Error::SchemaViolation(format!("{} (line {})", msg, line)),
            other => other,
        })
    }

    fn scalar_type(&self, word: &str) -> Result<ScalarType, Error> {
        word.parse().map_err(|_| Error::UnknownScalarTypeName {
            name: word.to_string(),
            line: self.line,
        })
    }
}

/// Everything after the keyword, without leading whitespace.
fn rest_of_line(line: &str, keyword: &str) -> String {
    let line = line.trim_start();
    line[keyword.len()..].trim_start().to_string()
}

fn trim_end(line: &[u8]) -> &[u8] {
    let end = line.iter().rposition(|b| !b.is_ascii_whitespace()).map_or(0, |p| p + 1);
    &line[..end]
}
