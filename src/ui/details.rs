use crate::ui::theme;
use egui::{Context, RichText, Window};
use gantt_timeline::config::TimelineConfig;
use gantt_timeline::model::{format_iso_date, ItemId, ScheduledItem};

/// Read-only details for an opened item.
pub fn show_details_window(
    id: &ItemId,
    items: &[ScheduledItem],
    config: &TimelineConfig,
    open: &mut bool,
    ctx: &Context,
) {
    let Some(item) = items.iter().find(|i| &i.id == id) else {
        *open = false;
        return;
    };

    let name_of = |id: &ItemId| -> String {
        items
            .iter()
            .find(|i| &i.id == id)
            .map(|i| i.name.clone())
            .unwrap_or_else(|| config.label(id.as_str()).to_string())
    };

    Window::new(RichText::new(&item.name).strong().size(14.0))
        .id(egui::Id::new("item_details"))
        .open(open)
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            egui::Grid::new("details_grid")
                .num_columns(2)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    let row = |ui: &mut egui::Ui, key: &str, value: String| {
                        ui.label(RichText::new(key).color(theme::TEXT_SECONDARY));
                        ui.label(value);
                        ui.end_row();
                    };
                    if !item.code.is_empty() {
                        row(ui, "Code", item.code.clone());
                    }
                    row(
                        ui,
                        "Dates",
                        format!(
                            "{} → {} ({} d)",
                            format_iso_date(item.start),
                            format_iso_date(item.end),
                            item.duration_days()
                        ),
                    );
                    row(ui, "Status", item.status.label().to_string());
                    row(ui, "Priority", item.priority.label().to_string());
                    if let Some(progress) = item.progress {
                        row(ui, "Progress", format!("{:.0}%", progress));
                    }
                    if let Some(owner) = &item.owner {
                        row(ui, "Owner", config.label(owner.as_str()).to_string());
                    }
                    if let Some(parent) = &item.parent {
                        row(ui, "Parent", name_of(parent));
                    }
                    if !item.predecessors.is_empty() {
                        let names: Vec<String> = item.predecessors.iter().map(|p| name_of(p)).collect();
                        row(ui, "After", names.join(", "));
                    }
                });
        });
}
