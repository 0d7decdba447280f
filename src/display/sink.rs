use std::collections::{HashMap, HashSet};

/// Where rendered values go: named text targets, one width-styled target and
/// page-wide attributes.
///
/// `set_text` and `set_width` return `false` when the sink has no such target;
/// callers treat that as a silent skip.
pub trait RenderSink {
    fn set_text(&mut self, id: &str, value: &str) -> bool;
    fn set_width(&mut self, id: &str, width: &str) -> bool;
    fn set_attribute(&mut self, name: &str, value: &str);
}

/// Records every write. Restrict it to a set of known target ids to mimic a
/// page that only defines some of them.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    known: Option<HashSet<String>>,
    texts: HashMap<String, String>,
    widths: HashMap<String, String>,
    attributes: HashMap<String, String>,
}

impl MemorySink {
    pub fn new() -> Self {
        MemorySink::default()
    }

    pub fn with_targets<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        MemorySink {
            known: Some(ids.into_iter().map(str::to_string).collect()),
            ..MemorySink::default()
        }
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.texts.get(id).map(String::as_str)
    }

    pub fn width(&self, id: &str) -> Option<&str> {
        self.widths.get(id).map(String::as_str)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn text_count(&self) -> usize {
        self.texts.len()
    }

    fn knows(&self, id: &str) -> bool {
        self.known.as_ref().map_or(true, |known| known.contains(id))
    }
}

impl RenderSink for MemorySink {
    fn set_text(&mut self, id: &str, value: &str) -> bool {
        if !self.knows(id) {
            return false;
        }
        self.texts.insert(id.to_string(), value.to_string());
        true
    }

    fn set_width(&mut self, id: &str, width: &str) -> bool {
        if !self.knows(id) {
            return false;
        }
        self.widths.insert(id.to_string(), width.to_string());
        true
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }
}
