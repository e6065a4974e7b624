use std::collections::HashSet;

use crate::ui::theme;
use egui::{Color32, RichText, Ui};
use egui_phosphor::regular as icons;
use gantt_timeline::layout::TimelineGeometry;
use gantt_timeline::model::{ItemId, ScheduledItem};

/// Actions that the item list can request.
pub enum ItemListAction {
    None,
    Open(ItemId),
    ScrollTo(ItemId),
    ToggleCollapse(ItemId),
}

/// Render the left-side item list, one row per laid-out bar.
pub fn show_item_list(
    geometry: &TimelineGeometry,
    items: &[ScheduledItem],
    collapsed: &HashSet<ItemId>,
    selected: Option<&ItemId>,
    ui: &mut Ui,
) -> ItemListAction {
    let mut action = ItemListAction::None;

    ui.add_space(2.0);
    ui.horizontal(|ui| {
        ui.label(RichText::new("Items").strong().size(15.0).color(theme::TEXT_PRIMARY));
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!("({})", geometry.bars.len()))
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
    });
    ui.add_space(4.0);
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for (i, bar) in geometry.bars.iter().enumerate() {
                let item = &items[bar.index];
                let is_selected = selected == Some(&item.id);

                let row_bg = if is_selected {
                    theme::BG_SELECTED
                } else if i % 2 == 0 {
                    theme::BG_PANEL
                } else {
                    theme::BG_DARK
                };

                egui::Frame::none()
                    .fill(row_bg)
                    .rounding(egui::Rounding::same(4.0))
                    .inner_margin(egui::Margin::symmetric(6.0, 3.0))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.spacing_mut().item_spacing.x = 6.0;
                            ui.add_space(bar.depth as f32 * theme::INDENT);

                            if bar.has_children {
                                let caret = if collapsed.contains(&item.id) {
                                    icons::CARET_RIGHT
                                } else {
                                    icons::CARET_DOWN
                                };
                                let toggle = ui.add(
                                    egui::Button::new(RichText::new(caret).size(11.0).color(theme::TEXT_DIM))
                                        .frame(false),
                                );
                                if toggle.clicked() {
                                    action = ItemListAction::ToggleCollapse(item.id.clone());
                                }
                            }

                            // Status dot
                            let (dot_rect, _) = ui.allocate_exact_size(egui::vec2(6.0, 6.0), egui::Sense::hover());
                            ui.painter()
                                .circle_filled(dot_rect.center(), 3.0, theme::status_color(item.status));

                            let name_text = RichText::new(&item.name).size(12.0).color(if is_selected {
                                Color32::WHITE
                            } else {
                                theme::TEXT_PRIMARY
                            });
                            let label = ui.add(egui::Label::new(name_text).truncate().sense(egui::Sense::click()));
                            if label.clicked() {
                                action = ItemListAction::Open(item.id.clone());
                            }

                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                ui.spacing_mut().item_spacing.x = 4.0;
                                let locate = ui.add(
                                    egui::Button::new(RichText::new(icons::CROSSHAIR).size(10.0).color(theme::TEXT_DIM))
                                        .frame(false),
                                );
                                if locate.on_hover_text("Scroll to item").clicked() {
                                    action = ItemListAction::ScrollTo(item.id.clone());
                                }
                                if !item.code.is_empty() {
                                    ui.label(RichText::new(&item.code).size(10.0).color(theme::TEXT_SECONDARY));
                                }
                            });
                        });
                    });

                ui.add_space(1.0);
            }
        });

    action
}
