//! Queued Command Serialization
//!
//! Renders the `App\Jobs\ProcessTelegramUpdate` command exactly as PHP's
//! `serialize()` would, so the Laravel worker can `unserialize()` it into the
//! job instance.
//!
//! Format: `O:<len>:"<class>":<count>:{<name><value>...}` where strings are
//! `s:<byte length>:"<raw bytes>";`, integers `i:<n>;` and null `N;`.
//! String contents are never escaped; the byte length delimits them.

use std::fmt::Write as _;

use super::COMMAND_CLASS;

/// Number of properties declared on the command object.
const PROPERTY_COUNT: usize = 3;

/// Serialize the update command for the queue worker.
///
/// Empty `bot_id` or `update` values are encoded as `N;` rather than a
/// zero-length string, mirroring an unset property on the PHP side.
pub fn serialize_command(bot_id: &str, update: &str, timestamp: i64) -> String {
    let mut out = String::with_capacity(update.len() + bot_id.len() + 128);

    let _ = write!(
        out,
        "O:{}:\"{COMMAND_CLASS}\":{PROPERTY_COUNT}:{{",
        COMMAND_CLASS.len()
    );

    write_string(&mut out, "bot_id");
    write_nullable_string(&mut out, bot_id);

    write_string(&mut out, "update");
    write_nullable_string(&mut out, update);

    write_string(&mut out, "timestamp");
    let _ = write!(out, "i:{timestamp};");

    out.push('}');
    out
}

fn write_string(out: &mut String, value: &str) {
    // str::len is the UTF-8 byte length, which is what PHP counts
    let _ = write!(out, "s:{}:\"{value}\";", value.len());
}

fn write_nullable_string(out: &mut String, value: &str) {
    if value.is_empty() {
        out.push_str("N;");
    } else {
        write_string(out, value);
    }
}
