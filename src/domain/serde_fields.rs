//! Field codecs shared by the stored documents.

use serde::{de, Deserialize, Deserializer};

/// Layout of competition dates in the stored documents
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A count stored either as a JSON integer or as a numeric string
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Number(i64),
    Text(String),
}

pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match RawCount::deserialize(deserializer)? {
        RawCount::Number(n) => u32::try_from(n)
            .map_err(|_| de::Error::custom(format!("count out of range: {n}"))),
        RawCount::Text(text) => text
            .trim()
            .parse::<u32>()
            .map_err(|_| de::Error::custom(format!("not a count: {text:?}"))),
    }
}

pub mod timestamp {
    use super::DATE_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&text, DATE_FORMAT).map_err(de::Error::custom)
    }
}

