use std::collections::{HashMap, HashSet};

use eframe::egui::{
    self, Align, Id, Layout, Pos2, Response, RichText, Sense, Stroke, TextEdit, Ui,
};
use egui_extras::{Size, StripBuilder};

use crate::models::{ExerciseItem, ExercisePatch, Item, SectionItem};
use crate::ui::fields::{format_number, parse_number, parse_rest, parse_series};
use crate::ui::gestures::LongPress;

const FIELD_ROW_HEIGHT: f32 = 24.0;

/// What the user did to the list during one frame; applied after drawing.
#[derive(Debug, Clone, PartialEq)]
pub enum ListAction {
    Toggle(String),
    Update(String, ExercisePatch),
    Remove(String),
    OpenMenu { item_id: String, at: Pos2 },
    Reorder { from: usize, to: usize },
}

/// Edit buffers of an expanded row, so half-typed numbers like `62.`
/// survive between frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowDraft {
    pub exercise: String,
    pub series: String,
    pub reps: String,
    pub weight: String,
    pub rest_sec: String,
}

impl RowDraft {
    pub fn from_item(item: &ExerciseItem) -> Self {
        Self {
            exercise: item.exercise.clone(),
            series: item.series.map(|s| s.to_string()).unwrap_or_default(),
            reps: item.reps.clone().unwrap_or_default(),
            weight: format_number(item.weight),
            rest_sec: format_number(item.rest_sec),
        }
    }
}

#[derive(Debug, Default)]
pub struct ListViewState {
    pub expanded: HashSet<String>,
    pub drafts: HashMap<String, RowDraft>,
    pub long_press: LongPress,
}

impl ListViewState {
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn toggle(&mut self, item: &ExerciseItem) {
        if self.expanded.remove(&item.id) {
            self.drafts.remove(&item.id);
        } else {
            self.expanded.insert(item.id.clone());
            self.drafts
                .insert(item.id.clone(), RowDraft::from_item(item));
        }
    }

    pub fn forget(&mut self, id: &str) {
        self.expanded.remove(id);
        self.drafts.remove(id);
    }

    /// Drops state for rows that no longer exist.
    pub fn retain(&mut self, items: &[Item]) {
        let live: HashSet<&str> = items.iter().map(|item| item.id()).collect();
        self.expanded.retain(|id| live.contains(id.as_str()));
        self.drafts.retain(|id, _| live.contains(id.as_str()));
    }
}

/// `items` with the entry at `from` moved to index `to`.
pub fn moved(items: &[Item], from: usize, to: usize) -> Vec<Item> {
    let mut next = items.to_vec();
    if from >= next.len() || from == to {
        return next;
    }
    let item = next.remove(from);
    let to = to.min(next.len());
    next.insert(to, item);
    next
}

/// A row dragged down lands below the row it is dropped on, a row dragged
/// up lands above it.
pub fn lands_below(from: usize, to: usize) -> bool {
    from < to
}

pub fn show_list(ui: &mut Ui, items: &[Item], state: &mut ListViewState) -> Vec<ListAction> {
    let mut actions = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let row = match item {
            Item::Section(section) => show_section(ui, index, section, state, &mut actions),
            Item::Exercise(exercise) => show_exercise(ui, index, exercise, state, &mut actions),
        };

        if let Some(from) = row.dnd_hover_payload::<usize>() {
            let accent = ui.visuals().selection.stroke.color;
            let y = if lands_below(*from, index) {
                row.rect.bottom()
            } else {
                row.rect.top()
            };
            ui.painter()
                .hline(row.rect.x_range(), y, Stroke::new(2.0, accent));
        }
        if let Some(from) = row.dnd_release_payload::<usize>() {
            actions.push(ListAction::Reorder {
                from: *from,
                to: index,
            });
        }
        ui.add_space(4.0);
    }
    actions
}

fn drag_handle(ui: &mut Ui, index: usize, id: &str) {
    ui.dnd_drag_source(Id::new(("drag", id)), index, |ui| {
        ui.label(RichText::new("☰").weak());
    })
    .response
    .on_hover_text("Drag to reorder");
}

/// Secondary click opens the menu straight away, a primary press arms the
/// long-press timer.
fn watch_gestures(
    ui: &Ui,
    header: &Response,
    id: &str,
    state: &mut ListViewState,
    actions: &mut Vec<ListAction>,
) {
    if header.secondary_clicked() && !state.long_press.fired_on(id) {
        let at = header
            .interact_pointer_pos()
            .unwrap_or(header.rect.left_bottom());
        actions.push(ListAction::OpenMenu {
            item_id: id.to_string(),
            at,
        });
        return;
    }
    let (pressed, now, at) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.time,
            i.pointer.interact_pos(),
        )
    });
    if pressed && header.is_pointer_button_down_on() {
        if let Some(at) = at {
            state.long_press.press(id, now, at);
        }
    }
}

fn show_section(
    ui: &mut Ui,
    index: usize,
    section: &SectionItem,
    state: &mut ListViewState,
    actions: &mut Vec<ListAction>,
) -> Response {
    ui.add_space(8.0);
    let row = ui.horizontal(|ui| {
        drag_handle(ui, index, &section.id);
        ui.label(
            RichText::new(section.title.to_uppercase())
                .small()
                .weak()
                .strong(),
        );
    });
    let header = row.response.interact(Sense::click());
    watch_gestures(ui, &header, &section.id, state, actions);
    header
}

fn show_exercise(
    ui: &mut Ui,
    index: usize,
    exercise: &ExerciseItem,
    state: &mut ListViewState,
    actions: &mut Vec<ListAction>,
) -> Response {
    let expanded = state.is_expanded(&exercise.id);
    let frame = egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        let header = ui
            .horizontal(|ui| {
                drag_handle(ui, index, &exercise.id);
                let name = if exercise.exercise.is_empty() {
                    "Unnamed"
                } else {
                    exercise.exercise.as_str()
                };
                ui.add(egui::Label::new(RichText::new(name).strong()).truncate());
                if !expanded {
                    if let Some(reps) = &exercise.reps {
                        badge(ui, reps);
                    }
                    if let Some(rest) = exercise.rest_sec {
                        badge(ui, &format!("{}s", format_number(Some(rest))));
                    }
                }
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ui.label(if expanded { "▲" } else { "▼" });
                });
            })
            .response
            .interact(Sense::click());

        if header.clicked() && !state.long_press.fired_on(&exercise.id) {
            actions.push(ListAction::Toggle(exercise.id.clone()));
        }
        watch_gestures(ui, &header, &exercise.id, state, actions);

        if expanded {
            let draft = state
                .drafts
                .entry(exercise.id.clone())
                .or_insert_with(|| RowDraft::from_item(exercise));
            show_editors(ui, &exercise.id, draft, actions);
        }
    });
    frame.response
}

fn badge(ui: &mut Ui, text: &str) {
    let fill = ui.visuals().faint_bg_color;
    ui.label(RichText::new(text).small().background_color(fill));
}

fn show_editors(ui: &mut Ui, id: &str, draft: &mut RowDraft, actions: &mut Vec<ListAction>) {
    let name = ui.add(
        TextEdit::singleline(&mut draft.exercise)
            .hint_text("Exercise")
            .desired_width(f32::INFINITY),
    );
    if name.changed() {
        actions.push(ListAction::Update(
            id.to_string(),
            ExercisePatch::exercise(draft.exercise.clone()),
        ));
    }

    let width = ui.available_width();
    ui.allocate_ui(egui::vec2(width, FIELD_ROW_HEIGHT), |ui| {
        StripBuilder::new(ui)
            .sizes(Size::remainder(), 4)
            .size(Size::exact(28.0))
            .horizontal(|mut strip| {
                strip.cell(|ui| {
                    if field(ui, &mut draft.series, "Series").changed() {
                        let series = parse_series(&draft.series);
                        let patch = ExercisePatch::series(series);
                        actions.push(ListAction::Update(id.to_string(), patch));
                    }
                });
                strip.cell(|ui| {
                    if field(ui, &mut draft.reps, "Reps").changed() {
                        let reps = Some(draft.reps.clone());
                        let patch = ExercisePatch::reps(reps);
                        actions.push(ListAction::Update(id.to_string(), patch));
                    }
                });
                strip.cell(|ui| {
                    if field(ui, &mut draft.weight, "Weight").changed() {
                        let weight = parse_number(&draft.weight);
                        let patch = ExercisePatch::weight(weight);
                        actions.push(ListAction::Update(id.to_string(), patch));
                    }
                });
                strip.cell(|ui| {
                    if field(ui, &mut draft.rest_sec, "Rest (s)").changed() {
                        let rest = parse_rest(&draft.rest_sec);
                        let patch = ExercisePatch::rest_sec(rest);
                        actions.push(ListAction::Update(id.to_string(), patch));
                    }
                });
                strip.cell(|ui| {
                    if ui.button("✖").on_hover_text("Delete").clicked() {
                        actions.push(ListAction::Remove(id.to_string()));
                    }
                });
            });
    });
}

pub fn field(ui: &mut Ui, text: &mut String, hint: &str) -> Response {
    ui.add(
        TextEdit::singleline(text)
            .hint_text(hint)
            .desired_width(f32::INFINITY),
    )
}
