//! Print the creation time of UUIDs.

use anyhow::{Context, Result};
use suuid_core::timestamp_of;

/// Prints one timestamp per UUID, in argument order.
pub fn run(uuids: &[String]) -> Result<()> {
    for uuid in uuids {
        let ts = timestamp_of(uuid).with_context(|| format!("Can't read timestamp of '{}'", uuid))?;
        if uuids.len() == 1 {
            println!("{}", ts);
        } else {
            println!("{} {}", uuid, ts);
        }
    }
    Ok(())
}
