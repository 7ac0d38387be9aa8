use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

/// Object key for a freshly generated image, `{unix_millis}-{uuid}.png`
pub fn object_key() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis());

    format_key(millis, Uuid::new_v4())
}

fn format_key(millis: u128, id: Uuid) -> String {
    format!("{millis}-{}.png", id.simple())
}
