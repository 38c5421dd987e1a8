//! Adapter from `quick_xml` events to the flat entity sequence the map
//! builder consumes.

use std::io::BufRead;
use std::str;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::errors::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Start,
    End,
    CharData,
}

/// One start marker, end marker or run of character data.
///
/// For `CharData` the raw, still escaped text is carried in `name`. Only start
/// markers carry attributes, in document order, duplicates included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlEntity {
    pub kind: EntityKind,
    pub name: String,
    pub attributes: Vec<(String, String)>,
}

impl XmlEntity {
    pub fn start(name: &str, attributes: &[(&str, &str)]) -> XmlEntity {
        XmlEntity {
            kind: EntityKind::Start,
            name: name.to_owned(),
            attributes: attributes
                .iter()
                .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
                .collect(),
        }
    }

    pub fn end(name: &str) -> XmlEntity {
        XmlEntity {
            kind: EntityKind::End,
            name: name.to_owned(),
            attributes: Vec::new(),
        }
    }

    pub fn char_data(text: &str) -> XmlEntity {
        XmlEntity {
            kind: EntityKind::CharData,
            name: text.to_owned(),
            attributes: Vec::new(),
        }
    }

    /// Value of the last attribute named `key`.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .rev()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

/// Pulls [`XmlEntity`] values out of an XML document.
///
/// Self-closing elements come out as a start immediately followed by an end.
/// End names are not matched against their start. Attribute values are
/// unescaped; character data is not. Declarations, comments, processing
/// instructions and doctypes are skipped. Iteration stops after the first
/// error.
pub struct XmlEntityReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    done: bool,
}

impl<R: BufRead> XmlEntityReader<R> {
    pub fn new(source: R) -> XmlEntityReader<R> {
        let mut reader = Reader::from_reader(source);
        reader.trim_text(true);
        reader.expand_empty_elements(true);
        // Stray end markers are left for the builder to ignore.
        reader.check_end_names(false);

        XmlEntityReader {
            reader,
            buf: Vec::new(),
            done: false,
        }
    }

    fn start_entity(el: &BytesStart) -> Result<XmlEntity> {
        let name = str::from_utf8(el.name().as_ref())?.to_owned();
        let mut attributes = Vec::new();
        for attribute_res in el.attributes().with_checks(false) {
            let attribute = attribute_res?;
            let key = str::from_utf8(attribute.key.as_ref())?.to_owned();
            let value = attribute.unescape_value()?.into_owned();
            attributes.push((key, value));
        }

        Ok(XmlEntity {
            kind: EntityKind::Start,
            name,
            attributes,
        })
    }

    fn next_entity(&mut self) -> Result<Option<XmlEntity>> {
        loop {
            self.buf.clear();
            let entity = match self.reader.read_event_into(&mut self.buf)? {
                Event::Eof => return Ok(None),
                Event::Start(e) => Self::start_entity(&e)?,
                Event::End(e) => XmlEntity::end(str::from_utf8(e.name().as_ref())?),
                Event::Text(e) => XmlEntity::char_data(str::from_utf8(&e)?),
                Event::CData(e) => XmlEntity::char_data(str::from_utf8(&e)?),
                // Never produced with expand_empty_elements set.
                Event::Empty(_) => continue,
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => continue,
            };
            return Ok(Some(entity));
        }
    }
}

impl<R: BufRead> Iterator for XmlEntityReader<R> {
    type Item = Result<XmlEntity>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_entity() {
            Ok(Some(entity)) => Some(Ok(entity)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
