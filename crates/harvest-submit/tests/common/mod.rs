//! Scripted browser used by the session tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::time::Duration;

use harvest_submit::{
    DriverError, ElementHandle, FormDriver, SiteCredentials, SiteProfile, WaitPolicy, keys,
};

/// Everything the harvester asked the browser to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Open(String),
    Click(String),
    Type(String, String),
    Read(String),
    Close,
}

/// Fake browser whose pages contain every selector except the missing ones.
///
/// Element handles are the selectors themselves. Typing into a field
/// accumulates text; select-all followed by delete empties it.
#[derive(Debug, Default)]
pub struct ScriptedDriver {
    pub events: Vec<Event>,
    pub missing: BTreeSet<String>,
    pub fail_open: bool,
    pub messages: VecDeque<String>,
    pub default_message: String,
    pub fields: BTreeMap<String, String>,
    selected: BTreeSet<String>,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self {
            default_message: "Invalid code".to_string(),
            ..Self::default()
        }
    }

    pub fn missing(mut self, selector: &str) -> Self {
        self.missing.insert(selector.to_string());
        self
    }

    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn with_messages(mut self, messages: &[&str]) -> Self {
        self.messages = messages.iter().map(|m| (*m).to_string()).collect();
        self
    }

    pub fn close_count(&self) -> usize {
        self.events.iter().filter(|e| **e == Event::Close).count()
    }

    pub fn field(&self, selector: &str) -> &str {
        self.fields.get(selector).map_or("", String::as_str)
    }

    pub fn typed_into(&self, selector: &str) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Type(s, text) if s == selector => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

impl FormDriver for ScriptedDriver {
    fn open(&mut self, url: &str) -> Result<(), DriverError> {
        self.events.push(Event::Open(url.to_string()));
        if self.fail_open {
            return Err(DriverError::Http("connection refused".to_string()));
        }
        Ok(())
    }

    fn find(&mut self, selector: &str) -> Result<Option<ElementHandle>, DriverError> {
        if self.missing.contains(selector) {
            Ok(None)
        } else {
            Ok(Some(ElementHandle::new(selector)))
        }
    }

    fn click(&mut self, element: &ElementHandle) -> Result<(), DriverError> {
        self.events.push(Event::Click(element.id().to_string()));
        Ok(())
    }

    fn type_text(&mut self, element: &ElementHandle, text: &str) -> Result<(), DriverError> {
        self.events
            .push(Event::Type(element.id().to_string(), text.to_string()));
        let id = element.id().to_string();
        if text == keys::SELECT_ALL {
            self.selected.insert(id);
        } else if text == keys::DELETE_KEY {
            if self.selected.remove(&id) {
                self.fields.insert(id, String::new());
            }
        } else {
            self.selected.remove(&id);
            self.fields.entry(id).or_default().push_str(text);
        }
        Ok(())
    }

    fn read_text(&mut self, element: &ElementHandle) -> Result<String, DriverError> {
        self.events.push(Event::Read(element.id().to_string()));
        Ok(self
            .messages
            .pop_front()
            .unwrap_or_else(|| self.default_message.clone()))
    }

    fn close(&mut self) -> Result<(), DriverError> {
        self.events.push(Event::Close);
        Ok(())
    }
}

pub fn credentials() -> SiteCredentials {
    SiteCredentials {
        user: "fan@example.com".to_string(),
        password: "secret".to_string(),
    }
}

/// Short bounds so timeouts resolve quickly.
pub fn quick_waits() -> WaitPolicy {
    WaitPolicy::uniform(Duration::from_millis(20), Duration::from_millis(5))
}

pub fn profile() -> SiteProfile {
    SiteProfile::default()
}
