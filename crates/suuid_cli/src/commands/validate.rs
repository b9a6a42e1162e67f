//! Check strings for v1 UUID syntax.

use anyhow::{bail, Result};
use console::style;
use suuid_core::is_valid_uuid;

/// Reports each argument; fails if any is not a v1 UUID.
pub fn run(uuids: &[String]) -> Result<()> {
    let mut invalid = 0;
    for uuid in uuids {
        if is_valid_uuid(uuid, true) {
            println!("{}: {}", uuid, style("ok").green());
        } else {
            println!("{}: {}", uuid, style("not a v1 UUID").red());
            invalid += 1;
        }
    }
    if invalid > 0 {
        bail!("{} of {} arguments are not v1 UUIDs", invalid, uuids.len());
    }
    Ok(())
}
