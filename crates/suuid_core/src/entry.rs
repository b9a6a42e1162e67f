//! In-memory log records and their serialized form.

use crate::error::{Result, SuuidError};
use crate::sanitize::{check_field, escape_for_log, well_formed_str};
use crate::uuid_codec::{is_valid_uuid, timestamp_of};
use tracing::warn;

/// Default upper bound on tags per entry.
pub const MAX_TAGS: usize = 1000;

/// Where an identifier was created.
///
/// Every field is optional; unset fields are left out of the record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryContext {
    /// Host name.
    pub host: Option<String>,
    /// Working directory.
    pub cwd: Option<String>,
    /// User name.
    pub user: Option<String>,
    /// Terminal device.
    pub tty: Option<String>,
}

/// Link from an entry to another UUID in the same session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLink {
    /// UUID of the session.
    pub uuid: String,
    /// Optional description (e.g. "screen", "xterm").
    pub desc: Option<String>,
}

/// One record in the log.
///
/// The timestamp is always derived from the UUID and cannot be set on its
/// own. An entry can only be serialized once a valid UUID is set.
///
/// # Examples
///
/// ```
/// use suuid_core::Entry;
///
/// let mut entry = Entry::new();
/// entry.set_uuid("d3de2000-4695-11e6-8000-000000000000").unwrap();
/// entry.add_tag(b"demo").unwrap();
/// entry.set_text("hello <world>");
///
/// assert_eq!(
///     entry.serialize(false).unwrap(),
///     "<suuid t=\"2016-07-10T12:00:00.0000000Z\" u=\"d3de2000-4695-11e6-8000-000000000000\"> \
///      <tag>demo</tag> <txt>hello &lt;world&gt;</txt> </suuid>"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    uuid: Option<String>,
    timestamp: Option<String>,
    tags: Vec<String>,
    tag_limit: usize,
    text: Option<String>,
    context: EntryContext,
    sessions: Vec<SessionLink>,
}

impl Default for Entry {
    fn default() -> Self {
        Self::new()
    }
}

impl Entry {
    /// Creates an empty entry with every optional field unset.
    pub fn new() -> Self {
        Self {
            uuid: None,
            timestamp: None,
            tags: Vec::new(),
            tag_limit: MAX_TAGS,
            text: None,
            context: EntryContext::default(),
            sessions: Vec::new(),
        }
    }

    /// Sets the maximum number of tags `add_tag` will accept.
    pub fn with_tag_limit(mut self, limit: usize) -> Self {
        self.tag_limit = limit;
        self
    }

    /// Sets the UUID and derives the timestamp from it.
    ///
    /// # Errors
    ///
    /// Returns `SuuidError::InvalidUuid` if `uuid` is not exactly a v1 UUID.
    /// The entry is left unchanged in that case.
    pub fn set_uuid(&mut self, uuid: &str) -> Result<()> {
        if !is_valid_uuid(uuid, true) {
            return Err(SuuidError::InvalidUuid(uuid.to_string()));
        }
        let timestamp = timestamp_of(uuid)?;
        self.uuid = Some(uuid.to_string());
        self.timestamp = Some(timestamp);
        Ok(())
    }

    /// Appends a tag, keeping insertion order.
    ///
    /// A tag already present is not added twice.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUtf8` for malformed input and `TooManyTags` once the
    /// tag limit is reached.
    pub fn add_tag(&mut self, tag: &[u8]) -> Result<()> {
        let tag = well_formed_str(tag).ok_or(SuuidError::InvalidUtf8 { field: "tag" })?;
        if self.tags.iter().any(|t| t == tag) {
            return Ok(());
        }
        if self.tags.len() >= self.tag_limit {
            return Err(SuuidError::TooManyTags {
                limit: self.tag_limit,
            });
        }
        self.tags.push(tag.to_string());
        Ok(())
    }

    /// Links the entry to a session UUID.
    ///
    /// Invalid UUIDs and descriptions with control characters are logged
    /// and dropped; returns whether the link was stored.
    pub fn add_session(&mut self, uuid: &str, desc: Option<&str>) -> bool {
        if !is_valid_uuid(uuid, true) {
            warn!(uuid = uuid, "ignoring session with invalid UUID");
            return false;
        }
        if let Some(Err(e)) = desc.map(|d| check_field("session description", d.as_bytes())) {
            warn!(uuid = uuid, error = %e, "ignoring session");
            return false;
        }
        self.sessions.push(SessionLink {
            uuid: uuid.to_string(),
            desc: desc.filter(|d| !d.is_empty()).map(str::to_string),
        });
        true
    }

    /// Sets the free-text comment.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Sets the environment context.
    ///
    /// A field holding control characters is logged and left unset.
    pub fn set_context(&mut self, context: EntryContext) {
        self.context = EntryContext {
            host: loggable_or_none("host", context.host),
            cwd: loggable_or_none("cwd", context.cwd),
            user: loggable_or_none("user", context.user),
            tty: loggable_or_none("tty", context.tty),
        };
    }

    /// Returns the UUID, if set.
    pub fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    /// Returns the timestamp derived from the UUID, if set.
    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    /// Returns the tags in insertion order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the comment, if set.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the environment context.
    pub fn context(&self) -> &EntryContext {
        &self.context
    }

    /// Returns the session links in insertion order.
    pub fn sessions(&self) -> &[SessionLink] {
        &self.sessions
    }

    /// Serializes the entry as a single-line `<suuid>` element.
    ///
    /// Absent fields, and an empty comment, are omitted entirely. With
    /// `raw` the comment is embedded verbatim. No trailing newline.
    ///
    /// # Errors
    ///
    /// Returns `SuuidError::InvalidUuid` if no valid UUID is set.
    pub fn serialize(&self, raw: bool) -> Result<String> {
        let (uuid, timestamp) = match (&self.uuid, &self.timestamp) {
            (Some(u), Some(t)) if is_valid_uuid(u, true) => (u, t),
            (u, _) => {
                return Err(SuuidError::InvalidUuid(
                    u.clone().unwrap_or_else(|| "(unset)".to_string()),
                ))
            }
        };

        let mut out = format!("<suuid t=\"{}\" u=\"{}\">", timestamp, uuid);

        for tag in &self.tags {
            push_element(&mut out, "tag", &escape_for_log(tag));
        }

        if let Some(text) = self.text.as_deref().filter(|t| !t.is_empty()) {
            if raw {
                push_element(&mut out, "txt", text);
            } else {
                push_element(&mut out, "txt", &escape_for_log(text));
            }
        }

        let ctx = &self.context;
        for (name, value) in [
            ("host", &ctx.host),
            ("cwd", &ctx.cwd),
            ("user", &ctx.user),
            ("tty", &ctx.tty),
        ] {
            if let Some(value) = value {
                push_element(&mut out, name, &escape_for_log(value));
            }
        }

        for session in &self.sessions {
            match session.desc {
                Some(ref desc) => out.push_str(&format!(
                    " <sess desc=\"{}\">{}</sess>",
                    escape_attribute(desc),
                    session.uuid
                )),
                None => push_element(&mut out, "sess", &session.uuid),
            }
        }

        out.push_str(" </suuid>");
        Ok(out)
    }
}

fn loggable_or_none(field: &'static str, value: Option<String>) -> Option<String> {
    let value = value?;
    match check_field(field, value.as_bytes()) {
        Ok(_) => Some(value),
        Err(e) => {
            warn!(error = %e, "leaving {} out of the entry", field);
            None
        }
    }
}

fn push_element(out: &mut String, name: &str, content: &str) {
    out.push(' ');
    out.push('<');
    out.push_str(name);
    out.push('>');
    out.push_str(content);
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

/// Element escaping plus `"` so the value fits in a quoted attribute.
fn escape_attribute(value: &str) -> String {
    escape_for_log(value).replace('"', "&quot;")
}
