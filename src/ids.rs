use chrono::Utc;
use clap::ValueEnum;
use serde::Deserialize;
use uuid::Uuid;

/// How fresh item ids are produced. Neither strategy checks the new id
/// against ids already in the list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Random v4 UUID.
    #[default]
    Uuid,
    /// Base-36 millisecond timestamp plus a random base-36 suffix.
    Timestamp,
}

pub fn generate_id(strategy: IdStrategy) -> String {
    match strategy {
        IdStrategy::Uuid => Uuid::new_v4().to_string(),
        IdStrategy::Timestamp => timestamp_id(),
    }
}

fn timestamp_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u128;
    let random = Uuid::new_v4().as_u128() % 1_000_000_000;
    format!("{}-{}", to_base36(millis), to_base36(random))
}

fn to_base36(mut value: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
