use eframe::egui::{self, Id, Key, Order, Pos2, RichText, TextEdit};

use crate::store::Direction;

#[derive(Debug, Clone, PartialEq)]
pub enum MenuAction {
    Move(Direction),
    InsertSection(String),
    Delete,
    Close,
}

/// Pop-up of move/insert/delete actions for one row.
#[derive(Debug, Clone)]
pub struct ItemMenu {
    pub item_id: String,
    pub at: Pos2,
    pub is_exercise: bool,
    pub section_title: String,
}

impl ItemMenu {
    pub fn new(item_id: String, at: Pos2, is_exercise: bool) -> Self {
        Self {
            item_id,
            at,
            is_exercise,
            section_title: String::new(),
        }
    }

    /// Draws the menu; a press outside it or Escape yields `Close`.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<MenuAction> {
        let area = egui::Area::new(Id::new("item_menu"))
            .order(Order::Foreground)
            .fixed_pos(self.at)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .show(ui, |ui| self.contents(ui))
                    .inner
            });

        if area.inner.is_some() {
            return area.inner;
        }
        let rect = area.response.rect;
        let dismissed = ctx.input(|i| {
            i.key_pressed(Key::Escape)
                || (i.pointer.any_pressed()
                    && i.pointer.interact_pos().is_some_and(|p| !rect.contains(p)))
        });
        dismissed.then_some(MenuAction::Close)
    }

    fn contents(&mut self, ui: &mut egui::Ui) -> Option<MenuAction> {
        ui.set_min_width(180.0);
        let mut action = None;
        for (label, direction) in [
            ("Move to top", Direction::Top),
            ("Move up", Direction::Up),
            ("Move down", Direction::Down),
            ("Move to bottom", Direction::Bottom),
        ] {
            if ui.button(label).clicked() {
                action = Some(MenuAction::Move(direction));
            }
        }

        if self.is_exercise {
            ui.separator();
            ui.horizontal(|ui| {
                let title = ui.add(
                    TextEdit::singleline(&mut self.section_title)
                        .hint_text("Section title")
                        .desired_width(120.0),
                );
                let entered = title.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
                if ui.button("Insert above").clicked() || entered {
                    action = Some(MenuAction::InsertSection(self.section_title.clone()));
                }
            });
        }

        ui.separator();
        let delete = RichText::new("Delete").color(ui.visuals().error_fg_color);
        if ui.button(delete).clicked() {
            action = Some(MenuAction::Delete);
        }
        action
    }
}
