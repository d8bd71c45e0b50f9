use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::config::EditorConfig;
use crate::element::ElementId;
use crate::event::EditorEvent;
use crate::panels::{central_panel, tools_panel};
use crate::renderer::Renderer;
use crate::session::{EditorSession, SystemClock};
use crate::state::StorageBackend;
use crate::toast::ToastLevel;

pub const APP_NAME: &str = "Blog Builder";

// Repaint cadence while toasts are on screen
const TOAST_REPAINT: Duration = Duration::from_millis(250);

/// Outcome of the most recent auto-save, as reported by its events
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saved {
        timestamp: u64,
    },
    Failed(String),
    Cleared,
}

/// Text being edited for the selected element before it is applied
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDraft {
    pub element_id: ElementId,
    pub key: &'static str,
    pub value: String,
}

pub struct BuilderApp {
    session: EditorSession,
    renderer: Renderer,
    save_status: Arc<Mutex<SaveStatus>>,
    reported_status: SaveStatus,
    draft: Option<PropertyDraft>,
    title_draft: String,
}

impl BuilderApp {
    /// Called once before the first frame.
    pub fn new(_cc: &eframe::CreationContext<'_>, config: EditorConfig) -> Self {
        let storage = default_storage(&config);
        let session = EditorSession::new(&config, storage, Box::new(SystemClock));
        Self::with_session(session)
    }

    /// Wrap an existing session and restore whatever it has saved
    pub fn with_session(mut session: EditorSession) -> Self {
        let save_status = Arc::new(Mutex::new(SaveStatus::default()));
        let sink = Arc::clone(&save_status);
        session.autosave_mut().subscribe(Box::new(move |event: &EditorEvent| {
            let mut status = sink.lock();
            match event {
                EditorEvent::Saved { timestamp } => {
                    *status = SaveStatus::Saved {
                        timestamp: *timestamp,
                    }
                }
                EditorEvent::SaveFailed { error } => *status = SaveStatus::Failed(error.clone()),
                EditorEvent::SaveCleared => *status = SaveStatus::Cleared,
                _ => {}
            }
        }));

        if let Some(snapshot) = session.restore() {
            log::info!("Restored {} elements from auto-save", snapshot.elements.len());
        }
        let title_draft = session.metadata().title.unwrap_or_default();

        Self {
            session,
            renderer: Renderer::new(),
            save_status,
            reported_status: SaveStatus::default(),
            draft: None,
            title_draft,
        }
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut EditorSession {
        &mut self.session
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn save_status(&self) -> SaveStatus {
        self.save_status.lock().clone()
    }

    pub fn draft_mut(&mut self) -> &mut Option<PropertyDraft> {
        &mut self.draft
    }

    pub fn title_draft_mut(&mut self) -> &mut String {
        &mut self.title_draft
    }

    pub fn undo(&mut self) {
        if self.session.undo() {
            self.draft = None;
        }
    }

    pub fn redo(&mut self) {
        if self.session.redo() {
            self.draft = None;
        }
    }

    /// Keyboard shortcuts, skipped while a text field has focus
    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let (undo, redo, delete, escape) = ctx.input(|i| {
            let command = i.modifiers.command;
            let shift = i.modifiers.shift;
            let z = i.key_pressed(egui::Key::Z);
            (
                command && !shift && z,
                command && ((shift && z) || i.key_pressed(egui::Key::Y)),
                i.key_pressed(egui::Key::Delete),
                i.key_pressed(egui::Key::Escape),
            )
        });

        if undo {
            self.undo();
        } else if redo {
            self.redo();
        }
        if delete && self.session.delete_selected() {
            self.draft = None;
        }
        if escape {
            self.session.cancel_drag();
        }
    }

    /// Turn a new save failure into a toast once
    fn report_save_status(&mut self) {
        let status = self.save_status();
        if status == self.reported_status {
            return;
        }
        if let SaveStatus::Failed(error) = &status {
            self.session
                .notify(format!("Auto-save failed: {}", error), ToastLevel::Error);
        }
        self.reported_status = status;
    }

    fn show_toasts(&self, ctx: &egui::Context) {
        if self.session.toasts().is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -12.0))
            .show(ctx, |ui| {
                for toast in self.session.toasts().active() {
                    let color = match toast.level {
                        ToastLevel::Info => egui::Color32::from_rgb(0x3b, 0x82, 0xf6),
                        ToastLevel::Success => egui::Color32::from_rgb(0x10, 0xb9, 0x81),
                        ToastLevel::Warning => egui::Color32::from_rgb(0xf5, 0x9e, 0x0b),
                        ToastLevel::Error => egui::Color32::from_rgb(0xef, 0x44, 0x44),
                    };
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.colored_label(color, &toast.message);
                    });
                }
            });
    }

    fn schedule_repaint(&self, ctx: &egui::Context) {
        let now = self.session.now();
        let mut wait = self
            .session
            .autosave()
            .next_save_at()
            .map(|due| Duration::from_secs_f64((due - now).max(0.0)));
        if !self.session.toasts().is_empty() {
            wait = Some(wait.map_or(TOAST_REPAINT, |w| w.min(TOAST_REPAINT)));
        }
        if let Some(wait) = wait {
            ctx.request_repaint_after(wait);
        }
    }
}

impl eframe::App for BuilderApp {
    /// Called by the framework before shutdown; flushes unsaved edits.
    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        self.session.force_save();
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.session.tick();
        self.report_save_status();
        self.handle_shortcuts(ctx);

        tools_panel(self, ctx);
        central_panel(self, ctx);

        self.show_toasts(ctx);
        self.schedule_repaint(ctx);
    }
}

/// File storage under the configured or platform data directory, browser
/// storage on the web
#[cfg(not(target_arch = "wasm32"))]
pub fn default_storage(config: &EditorConfig) -> Box<dyn StorageBackend> {
    let dir = config
        .storage_dir
        .clone()
        .or_else(|| eframe::storage_dir(APP_NAME));
    match dir {
        Some(dir) => {
            log::info!("Auto-saving to {}", dir.display());
            Box::new(crate::state::FileStorage::new(dir))
        }
        None => {
            log::warn!("No storage directory available; edits will not outlive this session");
            Box::new(crate::state::MemoryStorage::new())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn default_storage(_config: &EditorConfig) -> Box<dyn StorageBackend> {
    Box::new(crate::state::LocalStorage::new())
}
