//! Session links read from the `SESS` environment variable.
//!
//! The variable holds comma-separated items, each either a bare UUID or
//! `desc/uuid`, e.g. `screen/3b1f2c20-46b4-11e6-9c3a-0021cc6d6f3b,xterm/...`.

use crate::entry::SessionLink;
use crate::uuid_codec::{find_uuid_index, UUID_LEN};
use tracing::warn;

/// Name of the environment variable holding session links.
pub const SESSION_ENV: &str = "SESS";

/// Parses session links from the value of `SESS`.
///
/// Parsing is best-effort: items without a v1 UUID are warned about and
/// skipped, they never fail the caller.
///
/// # Examples
///
/// ```
/// use suuid_core::parse_sessions;
///
/// let links = parse_sessions("xterm/3b1f2c20-46b4-11e6-9c3a-0021cc6d6f3b,junk");
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].desc.as_deref(), Some("xterm"));
/// ```
pub fn parse_sessions(value: &str) -> Vec<SessionLink> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .filter_map(parse_item)
        .collect()
}

fn parse_item(item: &str) -> Option<SessionLink> {
    let Some(start) = find_uuid_index(item) else {
        warn!(item = item, "no valid UUID in session item, skipping");
        return None;
    };
    if item.len() - start > UUID_LEN {
        warn!(item = item, "trailing text after session UUID ignored");
    }

    let desc = item[..start]
        .strip_suffix('/')
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    Some(SessionLink {
        uuid: item[start..start + UUID_LEN].to_string(),
        desc,
    })
}
