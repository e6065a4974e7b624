use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate};
use tracing::{info, warn};

use gantt_timeline::config::{AppConfig, TimelineConfig};
use gantt_timeline::interaction::{CommitRequest, DragEngine, PointerCapture, RangeController, ScrollSync, Shift};
use gantt_timeline::layout::{compute_layout, LayoutOptions, TimelineGeometry, ViewMode};
use gantt_timeline::model::{
    format_iso_date, parse_snapshot, InMemoryStore, ItemId, ItemRecord, ParsedSnapshot, Priority, Status, TaskStore,
    ZoomLevel,
};

use crate::ui;

/// Window-level pointer polling for the chart, switched on only while a
/// drag is in progress.
#[derive(Debug, Default)]
pub struct FrameCapture {
    active: bool,
}

impl FrameCapture {
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl PointerCapture for FrameCapture {
    fn acquire(&mut self) {
        self.active = true;
    }

    fn release(&mut self) {
        self.active = false;
    }
}

/// Main application state.
pub struct TimelineApp {
    pub store: InMemoryStore,
    pub config: AppConfig,
    config_path: PathBuf,
    pub snapshot_path: Option<PathBuf>,

    // Parsed once per store revision.
    pub snapshot: ParsedSnapshot,
    snapshot_revision: Option<u64>,

    pub range: RangeController,
    pub drag: DragEngine<FrameCapture>,
    pub scroll: ScrollSync,
    pub collapsed: HashSet<ItemId>,
    pub selected: Option<ItemId>,

    pub status_message: String,
}

impl TimelineApp {
    pub fn new(cc: &eframe::CreationContext<'_>, snapshot: Option<PathBuf>) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        ui::theme::apply_theme(&cc.egui_ctx);

        let config_path = AppConfig::default_path();
        let config = AppConfig::load(&config_path);
        let today = today();

        let mut app = Self {
            store: InMemoryStore::new("Sample Timeline", sample_records(today), sample_labels()),
            range: RangeController::new(&[], config.zoom, today),
            config,
            config_path,
            snapshot_path: None,
            snapshot: ParsedSnapshot::default(),
            snapshot_revision: None,
            drag: DragEngine::new(FrameCapture::default()),
            scroll: ScrollSync::new(),
            collapsed: HashSet::new(),
            selected: None,
            status_message: "Ready".to_string(),
        };

        if let Some(path) = snapshot.or_else(|| app.config.last_snapshot.clone()) {
            app.load_snapshot(&path);
        }
        app.refresh_snapshot();
        app
    }

    /// Re-parse the store's records if they changed since the last frame.
    pub fn refresh_snapshot(&mut self) {
        if self.snapshot_revision == Some(self.store.revision()) {
            return;
        }
        self.snapshot = parse_snapshot(&self.store.items());
        self.snapshot_revision = Some(self.store.revision());
        if self.range.sync_items(&self.snapshot.items, today()) {
            self.scroll.reset();
        }
        if !self.snapshot.excluded.is_empty() {
            self.status_message = format!("{} item(s) with invalid dates hidden", self.snapshot.excluded.len());
        }
    }

    pub fn timeline_config(&self) -> TimelineConfig {
        TimelineConfig::from_app(&self.config, self.store.labels.clone())
    }

    pub fn layout(&self) -> TimelineGeometry {
        let options = LayoutOptions {
            mode: self.config.view_mode,
            show_dependencies: self.config.show_dependencies,
            row_height: ui::theme::ROW_HEIGHT,
            collapsed: self.collapsed.clone(),
        };
        compute_layout(&self.snapshot.items, &self.range.viewport(), self.drag.draft(), &options)
    }

    // --- File operations ---

    pub fn open_snapshot(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Timeline Snapshot", &["json"])
            .pick_file()
        {
            self.load_snapshot(&path);
        }
    }

    pub fn reload_snapshot(&mut self) {
        match self.snapshot_path.clone() {
            Some(path) => self.load_snapshot(&path),
            None => self.status_message = "Nothing to reload: no snapshot file open".to_string(),
        }
    }

    fn load_snapshot(&mut self, path: &Path) {
        match gantt_timeline::io::load_snapshot(path) {
            Ok(file) => {
                let name = file.name.clone().unwrap_or_else(|| file_stem(path, "Timeline"));
                let count = file.items.len();
                self.store.replace(name, file.items, file.labels);
                self.snapshot_path = Some(path.to_path_buf());
                self.selected = None;
                self.collapsed.clear();
                self.config.last_snapshot = Some(path.to_path_buf());
                self.config.save(&self.config_path);
                self.status_message = format!("Loaded {} items", count);
            }
            Err(e) => {
                warn!(error = %e, "snapshot load failed");
                self.status_message = format!("Error loading: {}", e);
            }
        }
    }

    pub fn import_csv(&mut self) {
        // Guard: confirm before replacing a loaded timeline
        if !self.snapshot.items.is_empty() {
            let confirm = rfd::MessageDialog::new()
                .set_title("Import CSV")
                .set_description("This will replace the current timeline. Continue?")
                .set_buttons(rfd::MessageButtons::YesNo)
                .show();
            if confirm != rfd::MessageDialogResult::Yes {
                return;
            }
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        {
            match gantt_timeline::io::import_csv(&path) {
                Ok(import) => {
                    let count = import.records.len();
                    self.store
                        .replace(file_stem(&path, "Imported Timeline"), import.records, HashMap::new());
                    self.snapshot_path = None;
                    self.selected = None;
                    self.collapsed.clear();
                    self.status_message = if import.skipped > 0 {
                        format!("Imported {} items ({} rows skipped)", count, import.skipped)
                    } else {
                        format!("Imported {} items", count)
                    };
                }
                Err(e) => {
                    self.status_message = format!("CSV import failed: {}", e);
                }
            }
        }
    }

    // --- View operations ---

    pub fn set_zoom(&mut self, zoom: ZoomLevel) {
        self.range.set_zoom(zoom);
        self.config.zoom = zoom;
        self.config.save(&self.config_path);
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.config.view_mode = mode;
        self.config.save(&self.config_path);
    }

    pub fn toggle_dependencies(&mut self) {
        self.config.show_dependencies = !self.config.show_dependencies;
        self.config.save(&self.config_path);
    }

    pub fn shift(&mut self, direction: Shift) {
        self.range.shift(direction);
        self.scroll.reset();
    }

    pub fn center_today(&mut self) {
        self.range.center_on(today());
        self.scroll.reset();
    }

    pub fn reset_range(&mut self) {
        self.range.reset_range();
        self.scroll.reset();
    }

    pub fn jump_to(&mut self, start: NaiveDate) {
        self.range.jump_to(start);
        self.scroll.reset();
    }

    pub fn toggle_collapse(&mut self, id: ItemId) {
        if !self.collapsed.remove(&id) {
            self.collapsed.insert(id);
        }
    }

    // --- Item operations ---

    pub fn open_item(&mut self, id: ItemId) {
        self.store.on_open_item(&id);
        self.selected = Some(id);
    }

    pub fn scroll_to_item(&mut self, id: &ItemId, geometry: &TimelineGeometry) {
        if let Some(bar) = geometry.bar(id) {
            self.scroll.scroll_to_item(bar.x_start);
            self.selected = Some(id.clone());
        }
    }

    fn apply_commit(&mut self, commit: CommitRequest) {
        commit.send(&mut self.store);
        let name = self
            .store
            .record(&commit.item_id)
            .map(|r| r.name.clone())
            .unwrap_or_else(|| commit.item_id.to_string());
        info!(id = %commit.item_id, start = %commit.start, end = %commit.end, "commit sent");
        self.status_message = format!(
            "Updated '{}' ({} → {})",
            name,
            format_iso_date(commit.start),
            format_iso_date(commit.end)
        );
    }
}

impl eframe::App for TimelineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.refresh_snapshot();

        let geometry = self.layout();
        let timeline_config = self.timeline_config();

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.0)
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let vp = self.range.viewport();
                        ui.label(
                            egui::RichText::new(format!(
                                "Items: {} · Zoom: {} · {} → {}",
                                self.snapshot.items.len(),
                                vp.zoom.label(),
                                format_iso_date(vp.start),
                                format_iso_date(vp.end),
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        // Left panel: item list
        let mut list_action = ui::item_list::ItemListAction::None;
        egui::SidePanel::left("item_panel")
            .default_width(ui::theme::SIDE_PANEL_WIDTH)
            .min_width(200.0)
            .resizable(true)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_PANEL)
                    .inner_margin(egui::Margin::same(8.0))
                    .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                list_action = ui::item_list::show_item_list(
                    &geometry,
                    &self.snapshot.items,
                    &self.collapsed,
                    self.selected.as_ref(),
                    ui,
                );
            });

        match list_action {
            ui::item_list::ItemListAction::Open(id) => self.open_item(id),
            ui::item_list::ItemListAction::ScrollTo(id) => self.scroll_to_item(&id, &geometry),
            ui::item_list::ItemListAction::ToggleCollapse(id) => self.toggle_collapse(id),
            ui::item_list::ItemListAction::None => {}
        }

        // Central panel: timeline chart
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        let mut interaction = ui::timeline_chart::ChartInteraction::default();
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            interaction = ui::timeline_chart::show_timeline_chart(
                &geometry,
                &self.snapshot.items,
                &self.range.viewport(),
                &mut self.drag,
                &mut self.scroll,
                self.selected.as_ref(),
                &timeline_config,
                ui,
            );
        });

        if let Some(id) = interaction.select {
            self.selected = Some(id);
        }
        if let Some(id) = interaction.open {
            self.open_item(id);
        }
        if let Some(commit) = interaction.commit {
            self.apply_commit(commit);
        }
        if self.drag.is_dragging() {
            ctx.request_repaint();
        }

        // Read-only details for the opened item
        if let Some(id) = self.store.opened.clone() {
            let mut open = true;
            ui::details::show_details_window(&id, &self.snapshot.items, &timeline_config, &mut open, ctx);
            if !open {
                self.store.opened = None;
            }
        }
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn file_stem(path: &Path, fallback: &str) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(fallback)
        .to_string()
}

fn sample_labels() -> HashMap<String, String> {
    HashMap::from([
        ("u-ada".to_string(), "Ada Lovelace".to_string()),
        ("u-grace".to_string(), "Grace Hopper".to_string()),
        ("u-linus".to_string(), "Linus Pauling".to_string()),
    ])
}

/// A small timeline for demonstration.
fn sample_records(today: NaiveDate) -> Vec<ItemRecord> {
    let day = |offset: i64| format_iso_date(today + Duration::days(offset));
    let record = |id: &str, code: &str, name: &str, start: i64, end: i64| ItemRecord {
        id: id.to_string(),
        code: code.to_string(),
        name: name.to_string(),
        start: day(start),
        end: day(end),
        owner: None,
        status: Status::Todo,
        priority: Priority::Medium,
        progress: None,
        parent: None,
        predecessors: Vec::new(),
    };

    // ── Phase 1: Planning ───────────────────────────────────────
    let phase1 = ItemRecord {
        owner: Some("u-ada".to_string()),
        status: Status::Doing,
        ..record("plan", "P-1", "Planning", -5, 8)
    };
    let kickoff = ItemRecord {
        owner: Some("u-ada".to_string()),
        status: Status::Done,
        progress: Some(100.0),
        parent: Some("plan".to_string()),
        ..record("kickoff", "P-2", "Project Kickoff", -5, -3)
    };
    let requirements = ItemRecord {
        owner: Some("u-grace".to_string()),
        status: Status::Doing,
        priority: Priority::High,
        progress: Some(60.0),
        parent: Some("plan".to_string()),
        predecessors: vec!["kickoff".to_string()],
        ..record("reqs", "P-3", "Requirements Gathering", -2, 5)
    };
    let signoff = ItemRecord {
        status: Status::Review,
        parent: Some("plan".to_string()),
        predecessors: vec!["reqs".to_string()],
        ..record("signoff", "P-4", "Planning Sign-off", 8, 8)
    };

    // ── Phase 2: Execution ──────────────────────────────────────
    let phase2 = ItemRecord {
        owner: Some("u-linus".to_string()),
        ..record("exec", "E-1", "Execution", 6, 30)
    };
    let design = ItemRecord {
        owner: Some("u-grace".to_string()),
        parent: Some("exec".to_string()),
        predecessors: vec!["reqs".to_string()],
        ..record("design", "E-2", "UI Design", 6, 18)
    };
    let backend = ItemRecord {
        owner: Some("u-linus".to_string()),
        priority: Priority::High,
        parent: Some("exec".to_string()),
        predecessors: vec!["reqs".to_string()],
        ..record("backend", "E-3", "Backend Development", 6, 28)
    };
    let qa = ItemRecord {
        priority: Priority::Critical,
        parent: Some("exec".to_string()),
        predecessors: vec!["design".to_string(), "backend".to_string()],
        ..record("qa", "E-4", "Testing & QA", 22, 30)
    };
    let launch = ItemRecord {
        priority: Priority::Critical,
        predecessors: vec!["qa".to_string()],
        ..record("launch", "L-1", "Launch", 32, 32)
    };

    vec![phase1, kickoff, requirements, signoff, phase2, design, backend, qa, launch]
}
