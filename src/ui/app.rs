use std::time::Duration;

use eframe::egui::{
    self, Align, Align2, FontFamily, FontId, Id, Key, Layout, Pos2, RichText, TextStyle, Ui,
};
use eframe::{App, CreationContext, Frame};
use egui_extras::{Size, StripBuilder};
use tracing::debug;

use crate::models::Item;
use crate::storage::KeyValueStore;
use crate::store::ListStore;
use crate::ui::composer::Composer;
use crate::ui::gestures::HeaderVisibility;
use crate::ui::list_view::{self, field, ListAction, ListViewState};
use crate::ui::menu::{ItemMenu, MenuAction};

pub const APP_TITLE: &str = "Gym TODO";

/// Window state around the list store. Nothing here is persisted apart
/// from what goes through the store.
pub struct GymListApp<S> {
    store: ListStore<S>,
    composer: Composer,
    list: ListViewState,
    menu: Option<ItemMenu>,
    header: HeaderVisibility,
    confirm_clear: bool,
}

impl<S: KeyValueStore> GymListApp<S> {
    pub fn new(cc: &CreationContext<'_>, store: ListStore<S>) -> Self {
        apply_style(&cc.egui_ctx);
        Self::with_store(store)
    }

    pub fn with_store(store: ListStore<S>) -> Self {
        Self {
            store,
            composer: Composer::default(),
            list: ListViewState::default(),
            menu: None,
            header: HeaderVisibility::default(),
            confirm_clear: false,
        }
    }

    fn submit_exercise(&mut self) {
        let Some(payload) = self.composer.exercise_payload() else {
            return;
        };
        if self.store.add(payload) {
            self.composer.reset_exercise();
        }
    }

    fn submit_section(&mut self) {
        let Some(payload) = self.composer.section_payload() else {
            return;
        };
        if self.store.add(payload) {
            self.composer.reset_section();
        }
    }

    fn open_menu(&mut self, item_id: String, at: Pos2) {
        let is_exercise = match self.store.get(&item_id) {
            Some(Item::Exercise(_)) => true,
            Some(Item::Section(_)) => false,
            None => return,
        };
        debug!("menu opened for {}", item_id);
        self.list.long_press.release();
        self.menu = Some(ItemMenu::new(item_id, at, is_exercise));
    }

    fn apply_list_actions(&mut self, actions: Vec<ListAction>) {
        for action in actions {
            match action {
                ListAction::Toggle(id) => {
                    if let Some(Item::Exercise(exercise)) = self.store.get(&id) {
                        self.list.toggle(exercise);
                    }
                }
                ListAction::Update(id, patch) => {
                    self.store.update(&id, patch);
                }
                ListAction::Remove(id) => {
                    self.store.remove(&id);
                    self.list.forget(&id);
                }
                ListAction::OpenMenu { item_id, at } => self.open_menu(item_id, at),
                ListAction::Reorder { from, to } => {
                    let next = list_view::moved(self.store.items(), from, to);
                    self.store.reorder(next);
                }
            }
        }
    }

    fn apply_menu_action(&mut self, item_id: &str, action: MenuAction) {
        match action {
            MenuAction::Move(direction) => {
                self.store.move_item(item_id, direction);
            }
            MenuAction::InsertSection(title) => {
                self.store.insert_section_above(item_id, &title);
            }
            MenuAction::Delete => {
                self.store.remove(item_id);
                self.list.forget(item_id);
            }
            MenuAction::Close => {}
        }
        self.menu = None;
    }

    fn confirm_clear_all(&mut self) {
        self.store.clear_all();
        self.list.retain(self.store.items());
        self.confirm_clear = false;
    }

    /// Long-press bookkeeping for pointer movement and release since the
    /// last frame.
    fn track_pointer(&mut self, ctx: &egui::Context) {
        let (now, latest, pressed, released) = ctx.input(|i| {
            (
                i.time,
                i.pointer.latest_pos(),
                i.pointer.any_pressed(),
                i.pointer.any_released(),
            )
        });
        if pressed {
            self.list.long_press.clear_fired();
        }
        if let Some(pos) = latest {
            self.list.long_press.pointer_moved(pos);
        }
        if released {
            self.list.long_press.release();
        }
        if let Some((item_id, at)) = self.list.long_press.poll(now) {
            self.open_menu(item_id, at);
        }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        let visible = !self.header.is_hidden();
        egui::TopBottomPanel::top("header").show_animated(ctx, visible, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading(APP_TITLE);
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let clear = RichText::new("Clear all").color(ui.visuals().error_fg_color);
                    if ui.button(clear).clicked() {
                        self.confirm_clear = true;
                    }
                    if ui.button("Duplicate last").clicked() {
                        self.store.duplicate_last();
                    }
                });
            });
            ui.add_space(6.0);
        });
    }

    fn show_composer(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("composer").show_animated(ctx, self.composer.open, |ui| {
            ui.add_space(6.0);
            ui.label(RichText::new("Composer").weak());
            self.composer_fields(ui);
            ui.add_space(6.0);
        });
    }

    fn composer_fields(&mut self, ui: &mut Ui) {
        let mut submit_exercise = false;
        let mut submit_section = false;
        let width = ui.available_width();

        ui.allocate_ui(egui::vec2(width, 28.0), |ui| {
            let composer = &mut self.composer;
            StripBuilder::new(ui)
                .size(Size::remainder().at_least(120.0))
                .sizes(Size::exact(72.0), 4)
                .size(Size::exact(56.0))
                .horizontal(|mut strip| {
                    strip.cell(|ui| {
                        let name = field(ui, &mut composer.exercise, "Exercise");
                        if composer.focus_exercise {
                            name.request_focus();
                            composer.focus_exercise = false;
                        }
                        submit_exercise |= entered(ui, &name);
                    });
                    strip.cell(|ui| {
                        let series = field(ui, &mut composer.series, "Series");
                        submit_exercise |= entered(ui, &series);
                    });
                    strip.cell(|ui| {
                        let reps = field(ui, &mut composer.reps, "Reps");
                        submit_exercise |= entered(ui, &reps);
                    });
                    strip.cell(|ui| {
                        let weight = field(ui, &mut composer.weight, "Weight");
                        submit_exercise |= entered(ui, &weight);
                    });
                    strip.cell(|ui| {
                        let rest = field(ui, &mut composer.rest_sec, "Rest (s)");
                        submit_exercise |= entered(ui, &rest);
                    });
                    strip.cell(|ui| {
                        submit_exercise |= ui.button("Add").clicked();
                    });
                });
        });

        ui.add_space(4.0);
        ui.allocate_ui(egui::vec2(width, 28.0), |ui| {
            let composer = &mut self.composer;
            StripBuilder::new(ui)
                .size(Size::remainder())
                .size(Size::exact(120.0))
                .horizontal(|mut strip| {
                    strip.cell(|ui| {
                        let title = field(
                            ui,
                            &mut composer.section_title,
                            "Section title (e.g., Warm-up)",
                        );
                        submit_section |= entered(ui, &title);
                    });
                    strip.cell(|ui| {
                        submit_section |= ui.button("Add section").clicked();
                    });
                });
        });

        if submit_exercise {
            self.submit_exercise();
        }
        if submit_section {
            self.submit_section();
        }
    }

    fn show_list(&mut self, ctx: &egui::Context) {
        let actions = egui::CentralPanel::default()
            .show(ctx, |ui| {
                let output = egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        if self.store.is_empty() {
                            let hint = RichText::new("Nothing here yet. Tap + to add an exercise.");
                            ui.label(hint.weak());
                        }
                        list_view::show_list(ui, self.store.items(), &mut self.list)
                    });
                self.header.on_scroll(output.state.offset.y);
                output.inner
            })
            .inner;
        self.apply_list_actions(actions);
    }

    fn show_add_button(&mut self, ctx: &egui::Context) {
        egui::Area::new(Id::new("add_button"))
            .anchor(Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
            .show(ctx, |ui| {
                let label = if self.composer.open { "✖" } else { "+" };
                let button = egui::Button::new(RichText::new(label).size(28.0))
                    .min_size(egui::vec2(56.0, 56.0));
                if ui.add(button).on_hover_text("Add").clicked() {
                    self.composer.toggle();
                }
            });
    }

    fn show_menu(&mut self, ctx: &egui::Context) {
        let Some(menu) = self.menu.as_mut() else {
            return;
        };
        let Some(action) = menu.show(ctx) else {
            return;
        };
        let item_id = menu.item_id.clone();
        self.apply_menu_action(&item_id, action);
    }

    fn show_confirm_clear(&mut self, ctx: &egui::Context) {
        if !self.confirm_clear {
            return;
        }
        let mut decision = None;
        egui::Window::new("Clear all items?")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label("This action cannot be undone.");
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        decision = Some(false);
                    }
                    let clear = RichText::new("Clear").color(ui.visuals().error_fg_color);
                    if ui.button(clear).clicked() {
                        decision = Some(true);
                    }
                });
            });
        if ctx.input(|i| i.key_pressed(Key::Escape)) {
            decision.get_or_insert(false);
        }
        match decision {
            Some(true) => self.confirm_clear_all(),
            Some(false) => self.confirm_clear = false,
            None => {}
        }
    }
}

impl<S: KeyValueStore> App for GymListApp<S> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.draw(ctx);
    }
}

impl<S: KeyValueStore> GymListApp<S> {
    fn draw(&mut self, ctx: &egui::Context) {
        self.track_pointer(ctx);

        self.show_header(ctx);
        self.show_composer(ctx);
        self.show_list(ctx);
        self.show_add_button(ctx);
        self.show_menu(ctx);
        self.show_confirm_clear(ctx);

        let now = ctx.input(|i| i.time);
        if let Some(wait) = self.list.long_press.remaining(now) {
            ctx.request_repaint_after(Duration::from_secs_f64(wait));
        }
    }
}

fn entered(ui: &Ui, response: &egui::Response) -> bool {
    response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter))
}

fn apply_style(ctx: &egui::Context) {
    ctx.set_visuals(egui::Visuals::dark());
    let mut style = (*ctx.style()).clone();
    style.text_styles.insert(
        TextStyle::Body,
        FontId::new(18.0, FontFamily::Proportional),
    );
    style.text_styles.insert(
        TextStyle::Button,
        FontId::new(18.0, FontFamily::Proportional),
    );
    style.text_styles.insert(
        TextStyle::Heading,
        FontId::new(24.0, FontFamily::Proportional),
    );
    ctx.set_style(style);
}
