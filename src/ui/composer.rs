use crate::models::{NewExercise, NewItem};
use crate::ui::fields::{optional_text, parse_number, parse_rest, parse_series};

/// Raw text of the floating composer panel.
#[derive(Debug, Default, Clone)]
pub struct Composer {
    pub open: bool,
    pub exercise: String,
    pub series: String,
    pub reps: String,
    pub weight: String,
    pub rest_sec: String,
    pub section_title: String,
    pub focus_exercise: bool,
}

impl Composer {
    pub fn toggle(&mut self) {
        self.open = !self.open;
        if self.open {
            self.focus_exercise = true;
        }
    }

    /// `None` when the name, reps and rest fields are all empty.
    pub fn exercise_payload(&self) -> Option<NewItem> {
        let payload = NewExercise {
            exercise: self.exercise.trim().to_string(),
            series: parse_series(&self.series),
            reps: optional_text(&self.reps),
            weight: parse_number(&self.weight),
            rest_sec: parse_rest(&self.rest_sec),
        };
        if payload.exercise.is_empty() && payload.reps.is_none() && payload.rest_sec.is_none() {
            return None;
        }
        Some(NewItem::Exercise(payload))
    }

    pub fn section_payload(&self) -> Option<NewItem> {
        optional_text(&self.section_title).map(|title| NewItem::Section { title })
    }

    /// Clears the exercise fields and puts the cursor back on the name.
    pub fn reset_exercise(&mut self) {
        self.exercise.clear();
        self.series.clear();
        self.reps.clear();
        self.weight.clear();
        self.rest_sec.clear();
        self.focus_exercise = true;
    }

    pub fn reset_section(&mut self) {
        self.section_title.clear();
    }
}
