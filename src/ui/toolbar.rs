use crate::app::TimelineApp;
use egui::{menu, RichText, Ui};
use egui_phosphor::regular as icons;
use gantt_timeline::interaction::Shift;
use gantt_timeline::layout::ViewMode;
use gantt_timeline::model::ZoomLevel;

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut TimelineApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button("  File  ", |ui| {
            if ui.button(format!("{}  Open Snapshot...", icons::FOLDER_OPEN)).clicked() {
                app.open_snapshot();
                ui.close_menu();
            }
            if ui.button(format!("{}  Reload", icons::ARROWS_CLOCKWISE)).clicked() {
                app.reload_snapshot();
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Import CSV...", icons::FILE_CSV)).clicked() {
                app.import_csv();
                ui.close_menu();
            }
        });

        ui.menu_button("  View  ", |ui| {
            ui.label(RichText::new("Zoom").small().weak());
            for zoom in ZoomLevel::ALL {
                if ui.radio(app.range.zoom() == zoom, zoom.label()).clicked() {
                    app.set_zoom(zoom);
                    ui.close_menu();
                }
            }
            ui.separator();
            ui.label(RichText::new("Rows").small().weak());
            if ui.radio(app.config.view_mode == ViewMode::Tree, "Hierarchy").clicked() {
                app.set_view_mode(ViewMode::Tree);
                ui.close_menu();
            }
            if ui.radio(app.config.view_mode == ViewMode::Lanes, "Dense lanes").clicked() {
                app.set_view_mode(ViewMode::Lanes);
                ui.close_menu();
            }
            ui.separator();
            let mut show = app.config.show_dependencies;
            if ui.checkbox(&mut show, "Dependency lines").changed() {
                app.toggle_dependencies();
            }
        });

        ui.separator();

        // Window navigation
        if ui.button(icons::CARET_LEFT).on_hover_text("Previous window").clicked() {
            app.shift(Shift::Back);
        }
        if ui.button(icons::CROSSHAIR).on_hover_text("Center today").clicked() {
            app.center_today();
        }
        if ui.button(icons::CARET_RIGHT).on_hover_text("Next window").clicked() {
            app.shift(Shift::Forward);
        }
        if ui
            .button(icons::ARROW_COUNTER_CLOCKWISE)
            .on_hover_text("Reset range")
            .clicked()
        {
            app.reset_range();
        }

        let mut start = app.range.viewport().start;
        if ui
            .add(egui_extras::DatePickerButton::new(&mut start).id_salt("window_start"))
            .changed()
        {
            app.jump_to(start);
        }

        ui.separator();
        for zoom in ZoomLevel::ALL {
            if ui.selectable_label(app.range.zoom() == zoom, zoom.label()).clicked() {
                app.set_zoom(zoom);
            }
        }

        // Right-aligned timeline name
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let source = if app.snapshot_path.is_some() { "" } else { " (in memory)" };
            ui.label(
                RichText::new(format!("{}{}", app.store.name, source))
                    .size(11.0)
                    .weak(),
            );
        });
    });
}
