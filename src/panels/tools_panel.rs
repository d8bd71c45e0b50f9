use egui::{Button, Sense};

use crate::app::{BuilderApp, PropertyDraft, SaveStatus};
use crate::element::{Element, ElementKind, Position};
use crate::toast::ToastLevel;
use crate::util::time;

// Where a clicked (not dragged) palette item lands
const CLICK_ADD_POSITION: Position = Position { top: 50.0, left: 50.0 };

pub fn tools_panel(app: &mut BuilderApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(240.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                palette_section(app, ui);
                ui.separator();
                history_section(app, ui);
                ui.separator();
                selection_section(app, ui);
                ui.separator();
                page_section(app, ui);
            });
        });
}

fn palette_section(app: &mut BuilderApp, ui: &mut egui::Ui) {
    ui.heading("Elements");
    ui.label("Drag onto the canvas, or click to add");

    for kind in ElementKind::ALL {
        let response = ui.add(
            Button::new(kind.label())
                .min_size(egui::vec2(ui.available_width(), 0.0))
                .sense(Sense::click_and_drag()),
        );
        if response.drag_started() {
            app.session_mut().begin_palette_drag(kind);
        } else if response.clicked() {
            app.session_mut().add_element(kind, CLICK_ADD_POSITION);
        }
    }
}

fn history_section(app: &mut BuilderApp, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        let can_undo = app.session().history().can_undo();
        let can_redo = app.session().history().can_redo();

        if ui.add_enabled(can_undo, Button::new("Undo")).clicked() {
            app.undo();
        }
        if ui.add_enabled(can_redo, Button::new("Redo")).clicked() {
            app.redo();
        }
    });

    let history = app.session().history();
    ui.label(format!(
        "History: {} / {}",
        history.undo_entries().len(),
        history.len()
    ));

    egui::CollapsingHeader::new("Commands")
        .default_open(false)
        .show(ui, |ui| {
            let applied = history.undo_entries().len();
            for (i, command) in history.entries().iter().enumerate().rev() {
                if i < applied {
                    ui.label(command.label());
                } else {
                    ui.weak(command.label());
                }
            }
        });
}

/// Text property edited from the side panel for each kind
fn editable_key(kind: ElementKind) -> Option<&'static str> {
    match kind {
        ElementKind::Text | ElementKind::Heading => Some("content"),
        ElementKind::Button => Some("text"),
        ElementKind::Image | ElementKind::Video => Some("src"),
        ElementKind::Divider | ElementKind::Grid => None,
    }
}

fn fresh_draft(element: &Element) -> Option<PropertyDraft> {
    let key = editable_key(element.kind)?;
    let value = element
        .property(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_owned();
    Some(PropertyDraft {
        element_id: element.id.clone(),
        key,
        value,
    })
}

fn selection_section(app: &mut BuilderApp, ui: &mut egui::Ui) {
    ui.heading("Selected");

    let Some(element) = app.session().store().selected_element().cloned() else {
        *app.draft_mut() = None;
        ui.weak("Nothing selected");
        return;
    };

    ui.label(format!("{} ({})", element.kind.label(), element.id));
    ui.label(format!(
        "Top {:.0}, left {:.0}, z {}",
        element.position.top, element.position.left, element.z_index
    ));

    let stale = app
        .draft_mut()
        .as_ref()
        .is_none_or(|draft| draft.element_id != element.id);
    if stale {
        *app.draft_mut() = fresh_draft(&element);
    }

    let mut apply = None;
    if let Some(draft) = app.draft_mut() {
        ui.label(draft.key);
        ui.text_edit_multiline(&mut draft.value);
        if ui.button("Apply").clicked() {
            apply = Some((format!("properties.{}", draft.key), draft.value.clone()));
        }
    }
    if let Some((path, value)) = apply {
        if let Err(err) = app
            .session_mut()
            .set_property(&element.id, &path, serde_json::Value::String(value))
        {
            app.session_mut().notify(err.to_string(), ToastLevel::Error);
        }
    }

    ui.horizontal_wrapped(|ui| {
        if ui.button("Duplicate").clicked() {
            app.session_mut().duplicate_element(&element.id);
        }
        if ui.button("Front").clicked() {
            app.session_mut().bring_to_front(&element.id);
        }
        if ui.button("Back").clicked() {
            app.session_mut().send_to_back(&element.id);
        }
        if ui.button("Delete").clicked() && app.session_mut().delete_element(&element.id) {
            *app.draft_mut() = None;
        }
    });
}

fn page_section(app: &mut BuilderApp, ui: &mut egui::Ui) {
    ui.heading("Page");

    ui.horizontal(|ui| {
        ui.label("Title");
        ui.text_edit_singleline(app.title_draft_mut());
    });
    if ui.button("Set title").clicked() {
        let mut metadata = app.session().metadata();
        let title = app.title_draft_mut().trim().to_owned();
        metadata.title = (!title.is_empty()).then_some(title);
        metadata.slug = None;
        app.session_mut().set_metadata(metadata);
    }
    if let Some(slug) = app.session().metadata().slug {
        ui.weak(format!("/{}", slug));
    }

    ui.horizontal_wrapped(|ui| {
        if ui.button("Save now").clicked() {
            app.session_mut().force_save();
        }
        if ui.button("Clear saved").clicked() {
            app.session_mut().clear_saved();
        }
    });

    ui.horizontal_wrapped(|ui| {
        if ui.button("Copy HTML").clicked() {
            let html = app.session().export_html();
            ui.ctx().copy_text(html);
            app.session_mut().notify("HTML copied", ToastLevel::Success);
        }
        if ui.button("Copy page").clicked() {
            let page = app.session().export_document_html();
            ui.ctx().copy_text(page);
            app.session_mut().notify("Page HTML copied", ToastLevel::Success);
        }
        if ui.button("Copy JSON").clicked() {
            match serde_json::to_string_pretty(&app.session().export_json()) {
                Ok(json) => {
                    ui.ctx().copy_text(json);
                    app.session_mut().notify("JSON copied", ToastLevel::Success);
                }
                Err(err) => {
                    log::error!("Export failed: {}", err);
                    app.session_mut().notify("Export failed", ToastLevel::Error);
                }
            }
        }
    });

    let autosave = app.session().autosave();
    let status = match app.save_status() {
        _ if autosave.has_unsaved_changes() => "Unsaved changes".to_owned(),
        SaveStatus::Saved { timestamp } => {
            let ago = time::timestamp_millis().saturating_sub(timestamp) / 1000;
            format!("Saved {}s ago", ago)
        }
        SaveStatus::Failed(error) => format!("Save failed: {}", error),
        SaveStatus::Cleared => "Saved state cleared".to_owned(),
        SaveStatus::Idle => "All changes saved".to_owned(),
    };
    ui.weak(status);
}
