use egui::{CursorIcon, Id, LayerId, Order, Rect, Sense};

use crate::app::BuilderApp;
use crate::element::ElementId;
use crate::tools::DragOperation;

pub fn central_panel(app: &mut BuilderApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click());
        let canvas = response.rect;

        let renderer = app.renderer().clone();
        let session = app.session();
        renderer.draw_canvas(&painter, canvas, session.drag_drop().drag_over_effect());

        // Lowest z-index first so later interactions sit on top
        let selected = session.store().selected_id().cloned();
        let placed: Vec<(ElementId, Rect)> = session
            .store()
            .sorted_by_z_index()
            .into_iter()
            .map(|element| {
                let rect = renderer.element_rect(element, canvas);
                renderer.draw_element(&painter, element, rect, selected.as_ref() == Some(&element.id));
                (element.id.clone(), rect)
            })
            .collect();

        let mut drag_started = None;
        let mut clicked = None;
        for (id, rect) in &placed {
            let element_response = ui.interact(*rect, ui.id().with(id.as_str()), Sense::click_and_drag());
            if element_response.drag_started() {
                drag_started = Some(id.clone());
            } else if element_response.clicked() {
                clicked = Some(id.clone());
            }
        }

        if let Some(id) = drag_started {
            app.session_mut().begin_element_drag(&id);
        } else if let Some(id) = clicked {
            app.session_mut().select(&id);
        } else if response.clicked() {
            app.session_mut().deselect();
        }

        finish_drag(app, ctx, canvas);
    });
}

/// Preview the drag under the pointer and resolve it once the button is
/// released: a drop inside the canvas, a cancel anywhere else.
fn finish_drag(app: &mut BuilderApp, ctx: &egui::Context, canvas: Rect) {
    let label = match app.session().drag_drop().current() {
        Some(DragOperation::Copy { kind }) => kind.label().to_owned(),
        Some(DragOperation::Move { .. }) => "Move".to_owned(),
        None => return,
    };

    let (pointer, released) = ctx.input(|i| (i.pointer.interact_pos(), i.pointer.any_released()));
    ctx.set_cursor_icon(CursorIcon::Grabbing);
    if let Some(pointer) = pointer {
        let painter = ctx.layer_painter(LayerId::new(Order::Tooltip, Id::new("drag_preview")));
        app.renderer().draw_drag_preview(&painter, pointer, &label);
    }

    if released {
        match pointer.filter(|p| canvas.contains(*p)) {
            Some(pointer) => {
                app.session_mut().drop_at(pointer, canvas);
            }
            None => app.session_mut().cancel_drag(),
        }
    }
}
