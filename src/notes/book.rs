use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Notes keyed by node label, plus whether they changed since the last sync.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Notebook {
    notes: BTreeMap<String, String>,
    dirty: bool,
}

impl Notebook {
    /// Reads a wire record. Anything that is not a string-valued object
    /// entry is skipped.
    pub fn from_record(record: &Value) -> Self {
        let notes = record
            .as_object()
            .map(|object| {
                object
                    .iter()
                    .filter_map(|(label, note)| {
                        note.as_str()
                            .filter(|note| !note.is_empty())
                            .map(|note| (label.clone(), note.to_owned()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            notes,
            dirty: false,
        }
    }

    pub fn to_record(&self) -> Value {
        Value::Object(
            self.notes
                .iter()
                .map(|(label, note)| (label.clone(), Value::String(note.clone())))
                .collect::<Map<_, _>>(),
        )
    }

    pub fn note(&self, label: &str) -> Option<&str> {
        self.notes.get(label).map(String::as_str)
    }

    /// Empty text removes the note.
    pub fn set_note(&mut self, label: &str, text: &str) {
        let changed = if text.is_empty() {
            self.notes.remove(label).is_some()
        } else if self.note(label) == Some(text) {
            false
        } else {
            self.notes.insert(label.to_owned(), text.to_owned());
            true
        };
        self.dirty |= changed;
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}
