//! Corpus parsing: `<id>`, `<title>` and `<text>` elements.
//!
//! Each document starts at the first `<id>` after the previous document
//! ended, takes the next `<title>`, and ends with the following `<text>`.
//! Later `<id>` elements inside the same page (revision ids) are skipped.
//! Entity and character references are decoded; other markup is ignored.

use crate::error::{ClusterError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::io::BufRead;

/// Raw document text keyed by page id.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Page id → title, newline, body text.
    pub documents: BTreeMap<u32, String>,
}

impl Collection {
    /// Largest page id, if any.
    pub fn max_id(&self) -> Option<u32> {
        self.documents.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Id,
    Title,
    Text,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"id" => Some(Field::Id),
            b"title" => Some(Field::Title),
            b"text" => Some(Field::Text),
            _ => None,
        }
    }
}

/// A page whose `<id>` has been read but whose `<text>` has not closed yet.
struct OpenPage {
    id: u32,
    /// Byte offset of the `<id>` element.
    start: u64,
    title: Option<String>,
}

fn corpus_error(position: u64, message: impl Display) -> ClusterError {
    ClusterError::Corpus {
        position,
        message: message.to_string(),
    }
}

/// Parse a corpus stream.
///
/// A page whose `<text>` element is missing or never closed is an error.
pub fn parse_collection<R: BufRead>(reader: R) -> Result<Collection> {
    let mut reader = Reader::from_reader(reader);
    let mut buf = Vec::new();
    let mut collection = Collection::default();

    let mut page: Option<OpenPage> = None;
    let mut field: Option<Field> = None;
    let mut content = String::new();

    loop {
        let position = reader.buffer_position() as u64;
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| corpus_error(position, e))?;

        match event {
            Event::Start(ref e) => {
                let opened = Field::from_name(e.local_name().as_ref());
                let accepted = match (opened, &page) {
                    (Some(Field::Id), None) => true,
                    (Some(Field::Title), Some(p)) => p.title.is_none(),
                    (Some(Field::Text), Some(p)) => p.title.is_some(),
                    _ => false,
                };
                if accepted && field.is_none() {
                    field = opened;
                    content.clear();
                }
            }
            Event::Empty(ref e) => {
                let is_text = Field::from_name(e.local_name().as_ref()) == Some(Field::Text);
                if is_text && page.as_ref().is_some_and(|p| p.title.is_some()) {
                    if let Some(OpenPage {
                        id,
                        title: Some(title),
                        ..
                    }) = page.take()
                    {
                        collection.documents.insert(id, format!("{title}\n"));
                    }
                }
            }
            Event::Text(ref e) => {
                if field.is_some() {
                    let text = e.unescape().map_err(|err| corpus_error(position, err))?;
                    content.push_str(&text);
                }
            }
            Event::CData(e) => {
                if field.is_some() {
                    content.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(ref e) => {
                let closed = Field::from_name(e.local_name().as_ref());
                if closed.is_some() && closed == field {
                    field = None;
                    let body = std::mem::take(&mut content);
                    match closed {
                        Some(Field::Id) => {
                            let raw = body.trim();
                            let id = raw.parse().map_err(|_| {
                                corpus_error(position, format!("invalid page id '{raw}'"))
                            })?;
                            page = Some(OpenPage {
                                id,
                                start: position,
                                title: None,
                            });
                        }
                        Some(Field::Title) => {
                            if let Some(p) = page.as_mut() {
                                p.title = Some(body);
                            }
                        }
                        Some(Field::Text) => {
                            if let Some(OpenPage {
                                id,
                                title: Some(title),
                                ..
                            }) = page.take()
                            {
                                collection.documents.insert(id, format!("{title}\n{body}"));
                            }
                        }
                        None => {}
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    match page {
        None => Ok(collection),
        Some(OpenPage { id, start, .. }) => Err(corpus_error(
            start,
            format!("page {id} ends before its text element is closed"),
        )),
    }
}
