//! The drag-reorder table view.
//!
//! Renders a header row, one line per record with a drag handle, and an
//! expandable inner group under each record that has one. Pointer events go
//! to [`TableModel`], which owns every surface's drag state; this view only
//! measures, forwards, and paints what the model reports.
//!
//! ## Pointer Listeners
//!
//! Handles always listen for pointer-down. Move and release listeners are
//! attached to the root only while the dragging surface asks for them.

use std::path::PathBuf;

use gpui::{
    canvas, div, img, point, prelude::*, px, size, AnyElement, Bounds, ClickEvent, Context,
    CursorStyle, Div, ElementId, EventEmitter, FocusHandle, Focusable, MouseButton,
    MouseDownEvent, MouseMoveEvent, MouseUpEvent, Pixels, Render, ScrollHandle, SharedString,
    Window,
};

use dnd_table_core::{
    ContainerGeometry, Edge, GridTrack, RowKey, RowStripes, ScrollDirection, Stripe, TableConfig,
    TableData, TableRow,
};

use crate::actions::{CancelDrag, CollapseAll, ExpandAll};
use crate::keymap::KEY_CONTEXT;
use crate::model::{SurfaceId, SurfaceModel, TableModel};
use crate::theme::{Theme, ThemeExt};

/// Left padding of the first value cell of an inner row.
const INNER_INDENT: f32 = 30.0;

/// Width of the frame around the scroll area (`border_1`).
const FRAME_BORDER: f32 = 1.0;

// =============================================================================
// Events
// =============================================================================

#[derive(Debug, Clone)]
pub enum SimpleDndTableEvent {
    /// A drag reordered the records. Carries the records after the move.
    OrderUpdated(TableData),
}

// =============================================================================
// View
// =============================================================================

pub struct SimpleDndTable {
    model: TableModel,
    headers: Vec<SharedString>,
    tracks: Vec<GridTrack>,
    max_height: Option<f32>,
    drag_handle_icon: Option<PathBuf>,
    expand_arrow_icon: Option<PathBuf>,
    focus_handle: FocusHandle,
    scroll_handle: ScrollHandle,
    /// Window bounds of the frame around the scroll area from the last paint.
    container_bounds: Option<Bounds<Pixels>>,
}

impl SimpleDndTable {
    pub fn new(
        data: TableData,
        config: &TableConfig,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let theme = cx.theme();
        let row_height: f32 = theme.row_height.into();
        let header_height: f32 = theme.header_height.into();

        let focus_handle = cx.focus_handle();
        window.focus(&focus_handle);

        // Losing the window mid-drag would strand the session
        cx.observe_window_activation(window, |this, window, cx| {
            if !window.is_window_active() && this.model.cancel() {
                tracing::debug!("Window deactivated, drag cancelled");
                cx.notify();
            }
        })
        .detach();

        tracing::debug!(
            "Table created: {} rows, columns '{}'",
            data.len(),
            config.grid_columns()
        );

        Self {
            model: TableModel::new(data, row_height, header_height),
            headers: config.headers.iter().cloned().map(Into::into).collect(),
            tracks: config.grid_tracks(),
            max_height: config.max_height_px(),
            drag_handle_icon: icon_path(&config.drag_handle_icon),
            expand_arrow_icon: icon_path(&config.expand_arrow_icon),
            focus_handle,
            scroll_handle: ScrollHandle::new(),
            container_bounds: None,
        }
    }

    /// Snapshot of the current records.
    pub fn data(&self) -> TableData {
        self.model.data()
    }

    /// Replace the records, e.g. after the owner changed them.
    pub fn set_data(&mut self, data: TableData, cx: &mut Context<Self>) {
        self.model.set_data(data);
        cx.notify();
    }

    pub fn model(&self) -> &TableModel {
        &self.model
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Bring the model's container and scroll offset up to date.
    fn sync_geometry(&mut self, window: &Window) {
        if let Some(bounds) = self.container_bounds {
            self.model
                .set_container(scroll_area_geometry(bounds, window.viewport_size().height.into()));
        }

        // The handle reports a negative offset once scrolled down
        let offset: f32 = self.scroll_handle.offset().y.into();
        self.model.sync_scroll(-offset);
    }

    fn apply_scroll(&self) {
        let offset = self.model.scroll_offset();
        self.scroll_handle.set_offset(point(px(0.0), px(-offset)));
    }

    // =========================================================================
    // Pointer Handlers
    // =========================================================================

    fn on_handle_down(
        &mut self,
        surface: SurfaceId,
        row: usize,
        event: &MouseDownEvent,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.sync_geometry(window);

        let target = self.model.handle_target(&surface, row);
        if self.model.pointer_down(surface, target, event.position.y.into()) {
            window.focus(&self.focus_handle);
            cx.stop_propagation();
            cx.notify();
        }
    }

    fn on_pointer_move(
        &mut self,
        event: &MouseMoveEvent,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if !self.model.is_dragging() {
            return;
        }

        self.sync_geometry(window);
        let state = self.model.pointer_move(event.position.y.into());
        if state.scroll != ScrollDirection::None {
            self.apply_scroll();
        }
        cx.notify();
    }

    fn on_pointer_up(&mut self, event: &MouseUpEvent, window: &mut Window, cx: &mut Context<Self>) {
        if !self.model.is_dragging() {
            return;
        }

        self.sync_geometry(window);
        if let Some(update) = self.model.pointer_up(event.position.y.into()) {
            cx.emit(SimpleDndTableEvent::OrderUpdated(update.data));
        }
        cx.notify();
    }

    fn on_toggle_expanded(&mut self, key: &RowKey, cx: &mut Context<Self>) {
        let expanded = self.model.toggle_expanded(key);
        tracing::debug!("Row {} expanded: {}", key, expanded);
        cx.notify();
    }

    // =========================================================================
    // Action Handlers
    // =========================================================================

    fn on_cancel_drag(&mut self, _: &CancelDrag, _window: &mut Window, cx: &mut Context<Self>) {
        if self.model.cancel() {
            cx.notify();
        }
    }

    fn on_expand_all(&mut self, _: &ExpandAll, _window: &mut Window, cx: &mut Context<Self>) {
        self.model.expand_all();
        cx.notify();
    }

    fn on_collapse_all(&mut self, _: &CollapseAll, _window: &mut Window, cx: &mut Context<Self>) {
        self.model.collapse_all();
        cx.notify();
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    fn track(&self, column: usize) -> GridTrack {
        self.tracks
            .get(column)
            .copied()
            .unwrap_or(GridTrack::Fraction(1.0))
    }

    fn render_header(&self, theme: &Theme) -> Div {
        div()
            .w_full()
            .h(theme.header_height)
            .flex()
            .flex_row()
            .items_center()
            .bg(theme.header)
            .border_b_1()
            .border_color(theme.border)
            .text_color(theme.text_muted)
            .text_size(theme.font_size_small)
            .child(track_cell(self.track(0)))
            .children(self.headers.iter().enumerate().map(|(i, header)| {
                track_cell(self.track(i + 1)).px_2().child(header.clone())
            }))
    }

    /// One line of cells: the handle followed by the record's values.
    fn render_line(
        &self,
        surface: &SurfaceId,
        index: usize,
        row: &TableRow,
        theme: &Theme,
        cx: &mut Context<Self>,
    ) -> gpui::Stateful<Div> {
        let nested = matches!(surface, SurfaceId::Inner(_));
        let line_id = match surface {
            SurfaceId::Outer => format!("line-{}", row.key),
            SurfaceId::Inner(base) => format!("line-{}-{}", base, row.key),
        };

        let handle_surface = surface.clone();
        let handle = track_cell(self.track(0))
            .id(ElementId::Name(SharedString::from(format!("{}-handle", line_id))))
            .h_full()
            .flex()
            .items_center()
            .justify_center()
            .cursor(if row.disabled {
                CursorStyle::OperationNotAllowed
            } else {
                CursorStyle::OpenHand
            })
            .when(row.disabled, |this| this.opacity(0.3))
            .child(render_icon(self.drag_handle_icon.as_ref(), "⠿", theme))
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(move |this, event: &MouseDownEvent, window, cx| {
                    this.on_handle_down(handle_surface.clone(), index, event, window, cx);
                }),
            );

        let mut expander = (!nested && row.inner.is_some()).then(|| {
            let key = row.key.clone();
            let expanded = self.model.is_expanded(&row.key);
            div()
                .id(ElementId::Name(SharedString::from(format!("{}-expand", line_id))))
                .flex_none()
                .cursor_pointer()
                .child(match &self.expand_arrow_icon {
                    Some(path) => img(path.clone())
                        .size(theme.icon_size)
                        .opacity(if expanded { 1.0 } else { 0.6 })
                        .into_any_element(),
                    None => div()
                        .text_color(theme.text_muted)
                        .child(if expanded { "▾" } else { "▸" })
                        .into_any_element(),
                })
                .on_click(cx.listener(move |this, _: &ClickEvent, _window, cx| {
                    this.on_toggle_expanded(&key, cx);
                }))
        });

        // The expand arrow sits in the first value cell
        let cells: Vec<Div> = row
            .values
            .iter()
            .enumerate()
            .map(|(j, value)| {
                let arrow = if j == 0 { expander.take() } else { None };
                track_cell(self.track(j + 1))
                    .h_full()
                    .px_2()
                    .flex()
                    .items_center()
                    .gap_1()
                    .overflow_hidden()
                    .when(nested && j == 0, |this| this.pl(px(INNER_INDENT)))
                    .children(arrow)
                    .child(value.clone())
            })
            .collect();

        div()
            .id(ElementId::Name(SharedString::from(line_id)))
            .w_full()
            .h(theme.row_height)
            .flex()
            .flex_row()
            .items_center()
            .border_b_1()
            .border_color(theme.border)
            .child(handle)
            .children(cells)
    }

    fn render_row(
        &self,
        index: usize,
        row: &TableRow,
        theme: &Theme,
        cx: &mut Context<Self>,
    ) -> AnyElement {
        let surface = self.model.outer();
        let stripes = surface.stripe(index);
        let background = stripes.map_or(theme.row_even, |s| theme.stripe(s.row));

        let line = self.render_line(&SurfaceId::Outer, index, row, theme, cx).bg(background);

        let inner = row
            .inner
            .as_ref()
            .filter(|_| self.model.is_expanded(&row.key))
            .map(|inner| self.render_inner(&row.key, inner, stripes, theme, cx));

        div()
            .relative()
            .w_full()
            .flex()
            .flex_col()
            .when(surface.is_hidden(index), |this| this.opacity(0.0))
            .child(line)
            .children(inner)
            .children(edge_marker(surface, index, theme))
            .into_any_element()
    }

    fn render_inner(
        &self,
        base: &RowKey,
        rows: &[TableRow],
        stripes: Option<&RowStripes>,
        theme: &Theme,
        cx: &mut Context<Self>,
    ) -> Div {
        let id = SurfaceId::Inner(base.clone());
        let Some(surface) = self.model.inner(base) else {
            return div();
        };

        let lines: Vec<AnyElement> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let background = stripes
                    .and_then(|s| s.inner.get(i).copied())
                    .map_or(theme.inner_background, |s| theme.stripe(s));

                div()
                    .relative()
                    .w_full()
                    .when(surface.is_hidden(i), |this| this.opacity(0.0))
                    .child(self.render_line(&id, i, row, theme, cx).bg(background))
                    .children(edge_marker(surface, i, theme))
                    .into_any_element()
            })
            .collect();

        div()
            .w_full()
            .flex()
            .flex_col()
            .bg(theme.inner_background)
            .children(lines)
    }

    /// The floating copy of the dragged row, positioned in the container.
    ///
    /// A top-level row carries its expanded inner group along.
    fn render_shadow(&self, theme: &Theme, cx: &mut Context<Self>) -> Option<AnyElement> {
        let (id, index, row) = self.model.dragged_record()?;
        self.container_bounds?;
        let container_top = self.model.container().top;

        let surface = match &id {
            SurfaceId::Outer => self.model.outer(),
            SurfaceId::Inner(base) => self.model.inner(base)?,
        };
        let shadow = surface.shadow()?;
        let height = surface.geometry().row_height(index);

        let inner = match &id {
            SurfaceId::Outer => row
                .inner
                .as_ref()
                .filter(|_| self.model.is_expanded(&row.key))
                .map(|inner| self.render_inner(&row.key, inner, surface.stripe(index), theme, cx)),
            SurfaceId::Inner(_) => None,
        };

        Some(
            div()
                .absolute()
                .left_0()
                .right_0()
                .top(px(shadow.top - container_top))
                .h(px(height))
                .flex()
                .flex_col()
                .overflow_hidden()
                .opacity(theme.shadow_opacity)
                .bg(theme.stripe(Stripe::Odd))
                .child(self.render_line(&id, index, &row, theme, cx))
                .children(inner)
                .into_any_element(),
        )
    }
}

/// The scroll area's extent, inside the frame around it.
fn scroll_area_geometry(frame: Bounds<Pixels>, viewport_height: f32) -> ContainerGeometry {
    let top: f32 = frame.origin.y.into();
    let height: f32 = frame.size.height.into();
    ContainerGeometry::new(
        top + FRAME_BORDER,
        (height - 2.0 * FRAME_BORDER).max(0.0),
        viewport_height,
    )
}

/// A cell sized by one column track.
fn track_cell(track: GridTrack) -> Div {
    match track {
        GridTrack::Fixed(width) => div().flex_none().w(px(width)),
        GridTrack::Fraction(share) => {
            let mut cell = div().flex_basis(px(0.0)).min_w(px(0.0));
            cell.style().flex_grow = Some(share);
            cell.style().flex_shrink = Some(1.0);
            cell
        }
    }
}

fn render_icon(icon: Option<&PathBuf>, fallback: &'static str, theme: &Theme) -> AnyElement {
    match icon {
        Some(path) => img(path.clone()).size(theme.icon_size).into_any_element(),
        None => div()
            .text_color(theme.text_muted)
            .child(fallback)
            .into_any_element(),
    }
}

/// Drop indicator drawn over the highlighted edge of a row.
fn edge_marker(surface: &SurfaceModel, row: usize, theme: &Theme) -> Option<Div> {
    let edge = surface.highlight(row)?;
    let marker = div()
        .absolute()
        .left_0()
        .right_0()
        .h(theme.highlight_width)
        .bg(theme.accent);

    Some(match edge {
        Edge::Top => marker.top_0(),
        Edge::Bottom => marker.bottom_0(),
    })
}

fn icon_path(raw: &str) -> Option<PathBuf> {
    let raw = raw.trim();
    (!raw.is_empty()).then(|| PathBuf::from(raw))
}

impl EventEmitter<SimpleDndTableEvent> for SimpleDndTable {}

impl Focusable for SimpleDndTable {
    fn focus_handle(&self, _cx: &gpui::App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

// =============================================================================
// Render Implementation
// =============================================================================

impl Render for SimpleDndTable {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme().clone();
        let rows = self.model.rows();
        let listening = self.model.pointer_attached();

        let header = self.render_header(&theme);
        let body: Vec<AnyElement> = rows
            .iter()
            .enumerate()
            .map(|(index, row)| self.render_row(index, row, &theme, cx))
            .collect();
        let shadow = self.render_shadow(&theme, cx);

        let scroll_area = div()
            .id("dnd-table-scroll")
            .w_full()
            .when_some(self.max_height, |this, height| this.max_h(px(height)))
            .overflow_y_scroll()
            .track_scroll(&self.scroll_handle)
            .child(header)
            .children(body);

        let view = cx.entity();
        let measure = canvas(
            move |bounds, _window, cx| {
                view.update(cx, |this, _| this.container_bounds = Some(bounds));
            },
            |_, _, _, _| {},
        )
        .absolute()
        .size_full();

        div()
            .id("dnd-table")
            .key_context(KEY_CONTEXT)
            .track_focus(&self.focus_handle)
            .on_action(cx.listener(Self::on_cancel_drag))
            .on_action(cx.listener(Self::on_expand_all))
            .on_action(cx.listener(Self::on_collapse_all))
            .when(listening, |this| {
                this.cursor(CursorStyle::ClosedHand)
                    .on_mouse_move(cx.listener(Self::on_pointer_move))
                    .on_mouse_up(MouseButton::Left, cx.listener(Self::on_pointer_up))
                    .on_mouse_up_out(MouseButton::Left, cx.listener(Self::on_pointer_up))
            })
            .size_full()
            .p_4()
            .bg(theme.background)
            .text_color(theme.text)
            .font_family(theme.font_family.clone())
            .text_size(theme.font_size)
            .child(
                div()
                    .relative()
                    .w_full()
                    .border_1()
                    .border_color(theme.border)
                    .child(scroll_area)
                    .child(measure)
                    .children(shadow),
            )
    }
}

// =============================================================================
// Tests
// =============================================================================
