use crate::app::FrameCapture;
use crate::ui::theme;
use chrono::{Datelike, NaiveDate};
use egui::{Color32, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use gantt_timeline::config::TimelineConfig;
use gantt_timeline::interaction::{CommitRequest, DragEngine, DragTarget, ScrollSync};
use gantt_timeline::layout::{BarGeometry, TimelineGeometry};
use gantt_timeline::model::{format_iso_date, ItemId, ScheduledItem, TickKind, TimelineViewport, ZoomLevel};

const ROW_HEIGHT: f32 = theme::ROW_HEIGHT;
const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;
const HANDLE_WIDTH: f32 = theme::HANDLE_WIDTH;

/// Result details from interactions in the timeline chart.
#[derive(Debug, Clone, Default)]
pub struct ChartInteraction {
    pub select: Option<ItemId>,
    pub open: Option<ItemId>,
    pub commit: Option<CommitRequest>,
}

/// Render the header ruler and the scrollable body.
#[allow(clippy::too_many_arguments)]
pub fn show_timeline_chart(
    geometry: &TimelineGeometry,
    items: &[ScheduledItem],
    viewport: &TimelineViewport,
    drag: &mut DragEngine<FrameCapture>,
    scroll: &mut ScrollSync,
    selected: Option<&ItemId>,
    config: &TimelineConfig,
    ui: &mut Ui,
) -> ChartInteraction {
    let mut interaction = ChartInteraction::default();
    let available = ui.available_size();
    let chart_width = geometry.content_width.max(available.x);

    // The header is painted after the body so it uses this frame's offset.
    let (header_rect, _) = ui.allocate_exact_size(Vec2::new(available.x, HEADER_HEIGHT), Sense::hover());

    let body_height = (geometry.content_height() + 40.0).max(available.y - HEADER_HEIGHT);
    let mut body = egui::ScrollArea::both()
        .id_salt("timeline_body")
        .auto_shrink([false, false]);
    if let Some(x) = scroll.take_pending() {
        body = body.horizontal_scroll_offset(x);
    }

    let output = body.show(ui, |ui| {
        let (response, painter) = ui.allocate_painter(Vec2::new(chart_width, body_height), Sense::click());
        let origin = response.rect.min;

        painter.rect_filled(response.rect, 0.0, theme::BG_DARK);
        draw_rows(&painter, origin, geometry, chart_width);
        draw_grid(&painter, origin, viewport, body_height);
        draw_today_line(&painter, origin, viewport, body_height);
        draw_connectors(&painter, origin, geometry);

        let mut consumed_click = false;
        for bar in &geometry.bars {
            let item = &items[bar.index];
            let is_selected = selected == Some(&bar.id);
            let bar_rect = draw_bar(&painter, origin, viewport, item, bar, is_selected);

            let bar_response = ui.interact(bar_rect, ui.make_persistent_id(("bar", &bar.id)), Sense::click_and_drag());
            let left_handle_rect = Rect::from_min_max(
                Pos2::new(bar_rect.left() - HANDLE_WIDTH * 0.5, bar_rect.top()),
                Pos2::new(bar_rect.left() + HANDLE_WIDTH * 0.5, bar_rect.bottom()),
            );
            let right_handle_rect = Rect::from_min_max(
                Pos2::new(bar_rect.right() - HANDLE_WIDTH * 0.5, bar_rect.top()),
                Pos2::new(bar_rect.right() + HANDLE_WIDTH * 0.5, bar_rect.bottom()),
            );
            let left_response = ui.interact(
                left_handle_rect.expand(2.0),
                ui.make_persistent_id(("resize-start", &bar.id)),
                Sense::drag(),
            );
            let right_response = ui.interact(
                right_handle_rect.expand(2.0),
                ui.make_persistent_id(("resize-end", &bar.id)),
                Sense::drag(),
            );

            if bar_response.double_clicked() {
                interaction.open = Some(bar.id.clone());
                consumed_click = true;
            } else if bar_response.clicked() {
                interaction.select = Some(bar.id.clone());
                consumed_click = true;
            }

            // Pointer-down on a bar or handle enters the drag state; from then
            // on the pointer is followed window-wide until release.
            let started = [
                (&left_response, DragTarget::StartHandle),
                (&right_response, DragTarget::EndHandle),
                (&bar_response, DragTarget::Body),
            ]
            .into_iter()
            .find(|(r, _)| r.drag_started());
            if let Some((response, target)) = started {
                let ptr_x = response.interact_pointer_pos().map(|p| p.x).unwrap_or(0.0);
                if drag.pointer_down(item, target, ptr_x, viewport.pixels_per_day()) {
                    interaction.select = Some(bar.id.clone());
                    consumed_click = true;
                }
            }

            // Handle affordances
            if is_selected || left_response.hovered() || right_response.hovered() {
                if left_response.hovered() || right_response.hovered() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
                } else if bar_response.hovered() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                }
                let handle_h = bar_rect.height() * 0.55;
                let handle_y = bar_rect.center().y - handle_h / 2.0;
                let lh = Rect::from_min_size(Pos2::new(bar_rect.left() - 1.5, handle_y), Vec2::new(4.0, handle_h));
                let rh = Rect::from_min_size(Pos2::new(bar_rect.right() - 2.5, handle_y), Vec2::new(4.0, handle_h));
                painter.rect_filled(lh, Rounding::same(2.0), theme::HANDLE_COLOR);
                painter.rect_filled(rh, Rounding::same(2.0), theme::HANDLE_COLOR);
            }

            if !drag.is_dragging() && (bar_response.hovered() || left_response.hovered() || right_response.hovered()) {
                egui::show_tooltip_at_pointer(ui.ctx(), ui.layer_id(), egui::Id::new(("bar-tip", &bar.id)), |ui| {
                    ui.strong(&item.name);
                    ui.label(format!("{} → {}", format_iso_date(item.start), format_iso_date(item.end)));
                    ui.label(format!("{} · {}", item.status.label(), item.priority.label()));
                    if let Some(owner) = &item.owner {
                        ui.label(config.label(owner.as_str()));
                    }
                    if let Some(progress) = item.progress {
                        ui.label(format!("Progress: {:.0}%", progress));
                    }
                });
            }
        }

        // Window-level pointer tracking while a drag is active.
        if drag.capture().is_active() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
            let (pos, released) = ui.input(|i| (i.pointer.latest_pos(), i.pointer.primary_released()));
            if let Some(pos) = pos {
                drag.pointer_move(pos.x);
            }
            if released || !ui.input(|i| i.pointer.primary_down()) {
                let x = pos.or_else(|| ui.input(|i| i.pointer.interact_pos())).map(|p| p.x);
                interaction.commit = match x {
                    Some(x) => drag.pointer_up(x),
                    None => {
                        drag.teardown();
                        None
                    }
                };
            }
        }

        if response.clicked() && !consumed_click {
            interaction.select = None;
        }
    });

    scroll.on_body_scroll(output.state.offset.x);

    ui.allocate_new_ui(egui::UiBuilder::new().max_rect(header_rect), |ui| {
        egui::ScrollArea::horizontal()
            .id_salt("timeline_header")
            .horizontal_scroll_offset(scroll.header_offset())
            .enable_scrolling(false)
            .scroll_bar_visibility(egui::scroll_area::ScrollBarVisibility::AlwaysHidden)
            .show(ui, |ui| {
                let (response, painter) =
                    ui.allocate_painter(Vec2::new(chart_width, HEADER_HEIGHT), Sense::hover());
                draw_timeline_header(&painter, response.rect.min, viewport, chart_width);
            });
    });

    interaction
}

fn row_y(origin: Pos2, geometry: &TimelineGeometry, row: usize) -> f32 {
    origin.y + geometry.row_top(row)
}

fn draw_rows(painter: &egui::Painter, origin: Pos2, geometry: &TimelineGeometry, width: f32) {
    for row in 0..geometry.row_count {
        let y = row_y(origin, geometry, row);
        let row_bg = if row % 2 == 0 { theme::BG_PANEL } else { theme::BG_DARK };
        painter.rect_filled(
            Rect::from_min_size(Pos2::new(origin.x, y), Vec2::new(width, ROW_HEIGHT)),
            0.0,
            row_bg,
        );
        painter.line_segment(
            [
                Pos2::new(origin.x, y + ROW_HEIGHT),
                Pos2::new(origin.x + width, y + ROW_HEIGHT),
            ],
            Stroke::new(0.5, theme::BORDER_SUBTLE),
        );
    }
}

fn draw_grid(painter: &egui::Painter, origin: Pos2, viewport: &TimelineViewport, height: f32) {
    for tick in viewport.ruler_ticks() {
        let x = origin.x + tick.x;
        painter.line_segment(
            [Pos2::new(x, origin.y), Pos2::new(x, origin.y + height)],
            Stroke::new(0.5, theme::GRID_LINE),
        );
    }
}

fn draw_timeline_header(painter: &egui::Painter, origin: Pos2, viewport: &TimelineViewport, width: f32) {
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );
    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
            Pos2::new(origin.x + width, origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    for tick in viewport.ruler_ticks() {
        let x = origin.x + tick.x;
        painter.line_segment(
            [Pos2::new(x, origin.y + 22.0), Pos2::new(x, origin.y + HEADER_HEIGHT)],
            Stroke::new(0.5, theme::GRID_LINE),
        );

        match tick.kind {
            TickKind::Day => {
                let is_weekend = tick.date.weekday().num_days_from_monday() >= 5;
                let day_color = if is_weekend { theme::TEXT_DIM } else { theme::TEXT_SECONDARY };
                painter.text(
                    Pos2::new(x + 3.0, origin.y + 32.0),
                    egui::Align2::LEFT_CENTER,
                    tick.date.format("%d").to_string(),
                    theme::font_sub(),
                    day_color,
                );
            }
            TickKind::Week => {
                painter.text(
                    Pos2::new(x + 3.0, origin.y + 32.0),
                    egui::Align2::LEFT_CENTER,
                    tick.date.format("W%V").to_string(),
                    theme::font_sub(),
                    theme::TEXT_SECONDARY,
                );
            }
            TickKind::Month => {}
        }

        if tick.month_caption {
            let y = if viewport.zoom == ZoomLevel::Month { 22.0 } else { 12.0 };
            painter.text(
                Pos2::new(x + 4.0, origin.y + y),
                egui::Align2::LEFT_CENTER,
                tick.date.format("%b %Y").to_string(),
                theme::font_header(),
                theme::TEXT_PRIMARY,
            );
        }
    }
}

fn draw_today_line(painter: &egui::Painter, origin: Pos2, viewport: &TimelineViewport, height: f32) {
    let today: NaiveDate = chrono::Local::now().date_naive();
    if today < viewport.start || today > viewport.end {
        return;
    }
    let x = origin.x + viewport.date_to_x(today) + viewport.pixels_per_day() / 2.0;
    painter.line_segment(
        [Pos2::new(x, origin.y), Pos2::new(x, origin.y + height)],
        Stroke::new(1.5, theme::TODAY_LINE),
    );

    let badge_w = 42.0;
    let badge_rect = Rect::from_min_size(Pos2::new(x - badge_w / 2.0, origin.y), Vec2::new(badge_w, 14.0));
    painter.rect_filled(badge_rect, Rounding::same(3.0), theme::TODAY_LINE);
    painter.text(
        badge_rect.center(),
        egui::Align2::CENTER_CENTER,
        "Today",
        theme::font_small(),
        Color32::WHITE,
    );
}

fn draw_connectors(painter: &egui::Painter, origin: Pos2, geometry: &TimelineGeometry) {
    let stroke = Stroke::new(1.2, theme::CONNECTOR);
    for connector in &geometry.connectors {
        let points: Vec<Pos2> = connector
            .points
            .iter()
            .map(|p| Pos2::new(origin.x + p.x, origin.y + p.y))
            .collect();
        painter.add(egui::Shape::line(points.clone(), stroke));

        // Arrow head into the successor's left edge
        if let [.., from, tip] = points.as_slice() {
            let dir = if tip.x >= from.x { 1.0 } else { -1.0 };
            let head = vec![
                *tip,
                Pos2::new(tip.x - 5.0 * dir, tip.y - 3.5),
                Pos2::new(tip.x - 5.0 * dir, tip.y + 3.5),
            ];
            painter.add(egui::Shape::convex_polygon(head, theme::CONNECTOR, Stroke::NONE));
        }
    }
}

fn draw_bar(
    painter: &egui::Painter,
    origin: Pos2,
    viewport: &TimelineViewport,
    item: &ScheduledItem,
    bar: &BarGeometry,
    is_selected: bool,
) -> Rect {
    let y = origin.y + bar.row as f32 * ROW_HEIGHT;
    let inset = theme::BAR_INSET;
    let bar_width = bar.width();
    let bar_rect = Rect::from_min_size(
        Pos2::new(origin.x + bar.x_start, y + inset),
        Vec2::new(bar_width, ROW_HEIGHT - inset * 2.0),
    );
    let rounding = Rounding::same(theme::BAR_ROUNDING);
    let color = theme::status_color(item.status);

    // Soft shadow
    painter.rect_filled(bar_rect.translate(Vec2::new(1.0, 2.0)), rounding, Color32::from_black_alpha(35));

    painter.rect_filled(bar_rect, rounding, color);
    let highlight_rect = Rect::from_min_size(bar_rect.min, Vec2::new(bar_width, (bar_rect.height() * 0.45).max(4.0)));
    painter.rect_filled(
        highlight_rect,
        Rounding {
            nw: theme::BAR_ROUNDING,
            ne: theme::BAR_ROUNDING,
            sw: 0.0,
            se: 0.0,
        },
        Color32::from_white_alpha(25),
    );

    // Progress fill (darkened overlay)
    if let Some(progress) = item.progress.filter(|p| *p > 0.0) {
        let progress_width = bar_width * (progress / 100.0).clamp(0.0, 1.0);
        let progress_rect = Rect::from_min_size(bar_rect.min, Vec2::new(progress_width, bar_rect.height()));
        painter.rect_filled(progress_rect, rounding, theme::PROGRESS_OVERLAY);
    }

    // Priority marker on the leading edge
    let marker = Rect::from_min_size(bar_rect.min, Vec2::new(3.0, bar_rect.height()));
    painter.rect_filled(
        marker,
        Rounding {
            nw: theme::BAR_ROUNDING,
            sw: theme::BAR_ROUNDING,
            ne: 0.0,
            se: 0.0,
        },
        theme::priority_color(item.priority),
    );

    // Clipped ends fade out at the window border
    if bar.clipped_start || bar.clipped_end {
        let fade = Color32::from_black_alpha(60);
        if bar.clipped_start {
            painter.rect_filled(Rect::from_min_size(bar_rect.min, Vec2::new(6.0, bar_rect.height())), 0.0, fade);
        }
        if bar.clipped_end {
            painter.rect_filled(
                Rect::from_min_size(Pos2::new(bar_rect.right() - 6.0, bar_rect.top()), Vec2::new(6.0, bar_rect.height())),
                0.0,
                fade,
            );
        }
    }

    if bar.is_draft {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(1.5, theme::DRAFT_OUTLINE),
        );
        painter.text(
            Pos2::new(bar_rect.left(), bar_rect.top() - 1.0),
            egui::Align2::LEFT_BOTTOM,
            format!("{} → {}", bar.start.format("%d %b"), bar.end.format("%d %b")),
            theme::font_small(),
            theme::DRAFT_OUTLINE,
        );
    } else if is_selected {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    // Item name on bar (single line, clipped to bar bounds); only when the
    // zoom leaves room for text
    if bar_width > 30.0 && viewport.pixels_per_day() >= 10.0 {
        let galley = painter.layout_no_wrap(item.name.clone(), theme::font_bar(), theme::TEXT_ON_BAR);
        let clipped = painter.with_clip_rect(bar_rect.shrink2(Vec2::new(4.0, 0.0)));
        let text_y = bar_rect.top() + (bar_rect.height() - galley.size().y) / 2.0;
        clipped.galley(Pos2::new(bar_rect.left() + 7.0, text_y), galley, Color32::TRANSPARENT);
    }

    bar_rect
}
