//models.rs
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Key the whole list is persisted under.
pub const LOCAL_STORAGE_KEY: &str = "gymlist:v1";

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseItem {
    pub id: String,
    pub exercise: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest_sec: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SectionItem {
    pub id: String,
    pub title: String,
}

/// One row of the workout list. Encoded with a `type` tag of
/// `"exercise"` or `"section"`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Item {
    Exercise(ExerciseItem),
    Section(SectionItem),
}

impl Item {
    pub fn id(&self) -> &str {
        match self {
            Item::Exercise(exercise) => &exercise.id,
            Item::Section(section) => &section.id,
        }
    }

    /// Same variant and field values under a different id.
    pub fn with_id(&self, id: String) -> Item {
        match self {
            Item::Exercise(exercise) => Item::Exercise(ExerciseItem {
                id,
                ..exercise.clone()
            }),
            Item::Section(section) => Item::Section(SectionItem {
                id,
                title: section.title.clone(),
            }),
        }
    }
}

/// Fields collected by the composer for a new exercise.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewExercise {
    pub exercise: String,
    pub series: Option<u32>,
    pub reps: Option<String>,
    pub weight: Option<f64>,
    pub rest_sec: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NewItem {
    Exercise(NewExercise),
    Section { title: String },
}

/// Field-level patch for an exercise.
///
/// The outer `Option` says whether the field is touched at all; for the
/// optional fields `Some(None)` clears the value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExercisePatch {
    pub exercise: Option<String>,
    pub series: Option<Option<u32>>,
    pub reps: Option<Option<String>>,
    pub weight: Option<Option<f64>>,
    pub rest_sec: Option<Option<f64>>,
}

impl ExercisePatch {
    pub fn exercise(text: impl Into<String>) -> Self {
        Self {
            exercise: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn series(value: Option<u32>) -> Self {
        Self {
            series: Some(value),
            ..Default::default()
        }
    }

    pub fn reps(value: Option<String>) -> Self {
        Self {
            reps: Some(value),
            ..Default::default()
        }
    }

    pub fn weight(value: Option<f64>) -> Self {
        Self {
            weight: Some(value),
            ..Default::default()
        }
    }

    pub fn rest_sec(value: Option<f64>) -> Self {
        Self {
            rest_sec: Some(value),
            ..Default::default()
        }
    }
}

pub fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|n| n.is_finite())
}

pub fn non_negative(value: Option<f64>) -> Option<f64> {
    finite(value).filter(|n| *n >= 0.0)
}

pub fn positive(value: Option<u32>) -> Option<u32> {
    value.filter(|n| *n > 0)
}

/// Empty or whitespace-only text counts as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

pub fn encode_items(items: &[Item]) -> serde_json::Result<String> {
    serde_json::to_string(items)
}

/// Decodes a persisted list. Anything that is not a JSON array yields an
/// empty list; unreadable entries are dropped one by one.
pub fn decode_items(raw: &str) -> Vec<Item> {
    let parsed: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            debug!("stored list is not valid JSON: {}", e);
            return Vec::new();
        }
    };
    let Some(entries) = parsed.as_array() else {
        debug!("stored list is not an array");
        return Vec::new();
    };

    let items: Vec<Item> = entries.iter().filter_map(item_from_value).collect();
    if items.len() != entries.len() {
        debug!(
            "dropped {} unreadable stored entries",
            entries.len() - items.len()
        );
    }
    items
}

/// Older data has exercises without a `type` tag, so anything with an
/// `exercise` string that is not a section reads as an exercise.
pub fn item_from_value(raw: &Value) -> Option<Item> {
    let entry = raw.as_object()?;
    let id = entry.get("id")?.as_str()?.to_string();

    if raw["type"].as_str() == Some("section") {
        if let Some(title) = raw["title"].as_str() {
            return Some(Item::Section(SectionItem {
                id,
                title: title.to_string(),
            }));
        }
    }

    let exercise = raw["exercise"].as_str()?.to_string();
    Some(Item::Exercise(ExerciseItem {
        id,
        exercise,
        series: positive(raw["series"].as_u64().and_then(|n| u32::try_from(n).ok())),
        reps: raw["reps"].as_str().map(|r| r.to_string()),
        weight: finite(raw["weight"].as_f64()),
        rest_sec: non_negative(raw["restSec"].as_f64()),
    }))
}
