use three_d::egui::{
    self, Align2, Area, Button, CentralPanel, Color32, Context as EguiContext, Frame, Id, Key,
    Label, Order, RichText, Sense, Stroke, TextEdit, Ui, Vec2, Window,
};

use crate::{
    app::{ErrorNotice, Message},
    editor::EditableField,
    modal::ClickTarget,
    render::{ButtonAction, EditDialogView, ModalView, PageView},
};

const CHANGE_BACKGROUND_LABEL: &str = "换一张背景";
const ERROR_RED: Color32 = Color32::from_rgb(239, 68, 68);

fn alpha(opacity: f64) -> u8 {
    (opacity.clamp(0.0, 1.0) * 255.0).round() as u8
}

pub(super) fn draw(ctx: &EguiContext, view: &PageView, out: &mut Vec<Message>) {
    CentralPanel::default()
        .frame(Frame::default())
        .show(ctx, |ui| draw_body(ui, view, out));

    if view.modal.visible {
        draw_modal(ctx, &view.modal, out);
    }
    if let Some(dialog) = &view.edit_dialog {
        draw_edit_dialog(ctx, dialog, out);
    }
}

fn draw_body(ui: &mut Ui, view: &PageView, out: &mut Vec<Message>) {
    let rect = ui.max_rect();
    let bg = &view.background;
    if let Some(url) = &bg.image_url {
        egui::Image::new(url.as_str())
            .tint(Color32::from_white_alpha(alpha(bg.opacity)))
            .paint_at(ui, rect);
    }
    ui.painter().rect_filled(
        rect,
        0.0,
        Color32::from_black_alpha(alpha(view.overlay_opacity)),
    );

    let text_color = Color32::from_white_alpha(alpha(view.text_opacity));
    let clickable = |ui: &mut Ui, text: RichText| ui.add(Label::new(text).sense(Sense::click()));

    ui.label(RichText::new(&view.document_title).weak().small());
    ui.vertical_centered(|ui| {
        ui.add_space(48.0);
        if clickable(ui, RichText::new(&view.title).size(40.0).strong().color(text_color))
            .clicked()
        {
            out.push(Message::EditRequested(EditableField::Title));
        }
        if clickable(ui, RichText::new(&view.subtitle).size(22.0).color(text_color)).clicked() {
            out.push(Message::EditRequested(EditableField::Subtitle));
        }
        ui.add_space(16.0);
        ui.label(RichText::new(&view.name).size(20.0).color(text_color));
        ui.label(RichText::new(&view.username).color(text_color));
        ui.add_space(8.0);
        if clickable(ui, RichText::new(&view.description).color(text_color)).clicked() {
            out.push(Message::EditRequested(EditableField::Description));
        }

        ui.add_space(24.0);
        ui.horizontal_wrapped(|ui| {
            for (index, button) in view.buttons.iter().enumerate() {
                let border = Color32::from_white_alpha(alpha(button.border_opacity));
                let widget = Button::new(RichText::new(&button.text).size(18.0).color(Color32::WHITE))
                    .stroke(Stroke::new(2.0, border));
                if ui.add(widget).clicked() {
                    match &button.action {
                        ButtonAction::Navigate { url, .. } => open_url(url),
                        ButtonAction::OpenModal { .. } => out.push(Message::ButtonPressed(index)),
                    }
                }
            }
        });

        ui.add_space(16.0);
        ui.horizontal_wrapped(|ui| {
            for link in &view.social_links {
                if ui.link(&link.url).clicked() {
                    open_url(&link.url);
                }
            }
        });

        ui.add_space(24.0);
        ui.label(RichText::new(&bg.info_text).small().color(text_color));
        let change = ui.add_enabled(bg.retry_enabled, Button::new(CHANGE_BACKGROUND_LABEL));
        if change.clicked() {
            out.push(Message::BackgroundRequested);
        }
    });
}

fn draw_modal(ctx: &EguiContext, modal: &ModalView, out: &mut Vec<Message>) {
    Area::new(Id::new("modal-scrim"))
        .order(Order::Foreground)
        .fixed_pos(egui::Pos2::ZERO)
        .show(ctx, |ui| {
            let screen = ctx.screen_rect();
            let response = ui.allocate_rect(screen, Sense::click());
            ui.painter()
                .rect_filled(screen, 0.0, Color32::from_black_alpha(160));
            if response.clicked() {
                out.push(Message::ModalClicked(ClickTarget::Scrim));
            }
        });

    // Drawn on a higher layer so clicks on the panel never reach the scrim.
    Area::new(Id::new("modal-panel"))
        .order(Order::Tooltip)
        .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
        .show(ctx, |ui| {
            Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_max_width(480.0);
                ui.horizontal(|ui| {
                    ui.heading(&modal.title);
                    if ui.button("✕").clicked() {
                        out.push(Message::ModalClicked(ClickTarget::CloseButton));
                    }
                });
                ui.separator();
                ui.label(&modal.content);
            });
        });
}

fn draw_edit_dialog(ctx: &EguiContext, dialog: &EditDialogView, out: &mut Vec<Message>) {
    let mut draft = dialog.draft.clone();
    Window::new(dialog.field.to_string())
        .id(Id::new("edit-dialog"))
        .title_bar(false)
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label(&dialog.prompt);
            let response = if dialog.multiline {
                ui.add(TextEdit::multiline(&mut draft).desired_rows(5))
            } else {
                ui.add(TextEdit::singleline(&mut draft))
            };
            if ui.memory(|m| m.focused().is_none()) {
                response.request_focus();
            }
            if response.changed() {
                out.push(Message::EditDraftChanged(draft.clone()));
            }
            let submitted = !dialog.multiline
                && response.lost_focus()
                && ui.input(|i| i.key_pressed(Key::Enter));

            ui.horizontal(|ui| {
                if ui.button("取消").clicked() {
                    out.push(Message::EditCancelled);
                }
                if ui.button("确定").clicked() || submitted {
                    out.push(Message::EditConfirmed);
                }
            });
        });
}

pub(super) fn draw_error_banner(ctx: &EguiContext, notice: &ErrorNotice) {
    Area::new(Id::new("error-banner"))
        .order(Order::Tooltip)
        .anchor(Align2::RIGHT_TOP, Vec2::new(-16.0, 16.0))
        .show(ctx, |ui| {
            Frame::default()
                .fill(ERROR_RED)
                .inner_margin(16.0)
                .show(ui, |ui| {
                    ui.label(RichText::new(&notice.message).color(Color32::WHITE));
                });
        });
}

fn open_url(url: &str) {
    if let Err(e) = open::that_detached(url) {
        tracing::error!("Failed to open URL '{url}': {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_clamps() {
        assert_eq!(alpha(0.0), 0);
        assert_eq!(alpha(1.0), 255);
        assert_eq!(alpha(2.0), 255);
        assert_eq!(alpha(-1.0), 0);
    }
}
