// Core document and geometry types shared by the gridboard crates.
// The layout engine and the command-line front end both speak these types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod kinds;

pub use kinds::{kind_defaults, KindDefaults, ROW_KIND};

// ──────────────────────────────────────────────
// Grid constants
// ──────────────────────────────────────────────

/// Number of columns on the dashboard canvas. Fixed for every dashboard.
pub const COLUMNS: i32 = 24;

/// Pixel height of one grid row. Only used at the pixel/grid boundary.
pub const ROW_HEIGHT_PX: f32 = 30.0;

/// Options key carrying an explicit band height for a row header.
pub const ROW_BAND_HEIGHT_KEY: &str = "rowBandHeight";

// ──────────────────────────────────────────────
// Pixel geometry
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

// ──────────────────────────────────────────────
// Grid geometry
// ──────────────────────────────────────────────

/// Integer grid-unit rectangle of a panel.
///
/// A valid position has `w > 0`, `h > 0`, `x >= 0`, `y >= 0` and
/// `x + w <= COLUMNS`. `y` grows downward without bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }

    pub fn size(&self) -> GridSize {
        GridSize::new(self.w, self.h)
    }

    pub fn with_origin(self, x: i32, y: i32) -> Self {
        Self { x, y, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub w: i32,
    pub h: i32,
}

impl GridSize {
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }
}

/// A requested panel origin in grid units. Fractional values come from
/// pointer positions and are rounded by the move pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridTarget {
    pub x: f32,
    pub y: f32,
}

impl GridTarget {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

// ──────────────────────────────────────────────
// Identity
// ──────────────────────────────────────────────

pub type PanelId = u64;

// ──────────────────────────────────────────────
// Document
// ──────────────────────────────────────────────

/// One panel of the dashboard document. Rows are panels with `type = "row"`.
///
/// Fields the engine does not interpret are kept in `extra` so a document
/// survives a load/save cycle untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub id: PanelId,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    pub grid_pos: GridPos,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_config: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
    /// Children of a collapsed row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panels: Option<Vec<Panel>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Panel {
    pub fn new(id: PanelId, kind: impl Into<String>, grid_pos: GridPos) -> Self {
        Self {
            id,
            kind: kind.into(),
            title: String::new(),
            grid_pos,
            options: Map::new(),
            field_config: None,
            collapsed: None,
            panels: None,
            extra: Map::new(),
        }
    }

    /// Build an expanded row header at `y`.
    pub fn row(id: PanelId, y: i32) -> Self {
        let mut row = Self::new(id, ROW_KIND, GridPos::new(0, y, COLUMNS, 1));
        row.collapsed = Some(false);
        row
    }

    pub fn is_row(&self) -> bool {
        self.kind == ROW_KIND
    }

    pub fn is_collapsed(&self) -> bool {
        self.is_row() && self.collapsed == Some(true)
    }

    /// Explicit band height override of a row header, if any.
    pub fn row_band_height(&self) -> Option<i32> {
        let value = self.options.get(ROW_BAND_HEIGHT_KEY)?.as_i64()?;
        Some(value.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
    }

    /// First line under a row header.
    pub fn content_top(&self) -> i32 {
        self.grid_pos.y.saturating_add(1)
    }

    /// Move the panel vertically by `dy`. Children embedded in a collapsed
    /// row keep their offset to the header.
    pub fn shift_y(&mut self, dy: i32) {
        self.grid_pos.y = self.grid_pos.y.saturating_add(dy);
        for child in self.panels.iter_mut().flatten() {
            child.grid_pos.y = child.grid_pos.y.saturating_add(dy);
        }
    }

    /// Embedded children of a row (empty for expanded rows and plain panels).
    pub fn children(&self) -> &[Panel] {
        self.panels.as_deref().unwrap_or(&[])
    }
}

/// The dashboard document exchanged with the persistence layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub panels: Vec<Panel>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Dashboard {
    pub fn new(title: impl Into<String>, panels: Vec<Panel>) -> Self {
        Self {
            title: title.into(),
            panels,
            extra: Map::new(),
        }
    }

    /// Find a top-level panel.
    pub fn panel(&self, id: PanelId) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id == id)
    }

    /// Find a panel anywhere, including inside collapsed rows.
    pub fn find_panel(&self, id: PanelId) -> Option<&Panel> {
        self.all_panels().find(|p| p.id == id)
    }

    /// Iterate every panel: top-level panels followed by their embedded children.
    pub fn all_panels(&self) -> impl Iterator<Item = &Panel> {
        self.panels
            .iter()
            .flat_map(|p| std::iter::once(p).chain(p.children().iter()))
    }

    /// Top-level row headers.
    pub fn rows(&self) -> impl Iterator<Item = &Panel> {
        self.panels.iter().filter(|p| p.is_row())
    }
}

// ──────────────────────────────────────────────
// Scopes and bands
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowState {
    Collapsed,
    Expanded,
}

/// The subset of panels an operation must consider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Every top-level panel. Children of collapsed rows are excluded.
    TopLevel,
    /// One row's children: the embedded array when collapsed, the band
    /// members when expanded.
    Row { row_id: PanelId, state: RowState },
}

/// Vertical `[top, bottom)` range owned by a row header.
/// `bottom == None` means the band runs to the end of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub row_id: PanelId,
    pub state: RowState,
    pub top: i32,
    pub bottom: Option<i32>,
}

impl Band {
    pub fn contains(&self, y: i32) -> bool {
        y >= self.top && self.bottom.map_or(true, |bottom| y < bottom)
    }
}

// ──────────────────────────────────────────────
// Operation parameters
// ──────────────────────────────────────────────

/// One of the eight compass-point resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    Ne,
    Nw,
    Se,
    Sw,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::N,
        ResizeHandle::S,
        ResizeHandle::E,
        ResizeHandle::W,
        ResizeHandle::Ne,
        ResizeHandle::Nw,
        ResizeHandle::Se,
        ResizeHandle::Sw,
    ];

    pub fn moves_top(self) -> bool {
        matches!(self, ResizeHandle::N | ResizeHandle::Ne | ResizeHandle::Nw)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, ResizeHandle::S | ResizeHandle::Se | ResizeHandle::Sw)
    }

    pub fn moves_left(self) -> bool {
        matches!(self, ResizeHandle::W | ResizeHandle::Nw | ResizeHandle::Sw)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, ResizeHandle::E | ResizeHandle::Ne | ResizeHandle::Se)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let handle = match name.to_ascii_lowercase().as_str() {
            "n" => ResizeHandle::N,
            "s" => ResizeHandle::S,
            "e" => ResizeHandle::E,
            "w" => ResizeHandle::W,
            "ne" => ResizeHandle::Ne,
            "nw" => ResizeHandle::Nw,
            "se" => ResizeHandle::Se,
            "sw" => ResizeHandle::Sw,
            _ => return None,
        };
        Some(handle)
    }
}

/// Where a new panel should live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PanelTarget {
    #[default]
    TopLevel,
    Row(PanelId),
}

/// Initial position strategy for a new panel. Without a hint the panel
/// goes to the first free slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlacementHint {
    At { x: i32, y: i32 },
    Near(PanelId),
}

/// Request to add a panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub size: Option<GridSize>,
    #[serde(default)]
    pub target: PanelTarget,
    #[serde(default)]
    pub hint: Option<PlacementHint>,
}

impl PanelSpec {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            title: None,
            size: None,
            target: PanelTarget::TopLevel,
            hint: None,
        }
    }
}

// ──────────────────────────────────────────────
// Trait: LayoutEngine
// ──────────────────────────────────────────────

/// The layout engine turns one dashboard snapshot into the next.
/// Every method is pure: the input is never mutated, and an unknown
/// panel or row id returns the input unchanged.
pub trait LayoutEngine {
    fn move_panel(
        &self,
        dashboard: &Dashboard,
        id: PanelId,
        to: GridTarget,
        skip_auto_pack: bool,
    ) -> Dashboard;
    fn resize(
        &self,
        dashboard: &Dashboard,
        id: PanelId,
        handle: ResizeHandle,
        delta: Vec2,
        container_width: f32,
    ) -> Dashboard;
    fn add_panel(&self, dashboard: &Dashboard, spec: &PanelSpec) -> Dashboard;
    fn duplicate_panel(&self, dashboard: &Dashboard, id: PanelId) -> Dashboard;
    fn delete_panel(&self, dashboard: &Dashboard, id: PanelId) -> Dashboard;
    fn toggle_row_collapsed(&self, dashboard: &Dashboard, row_id: PanelId, collapsed: bool)
        -> Dashboard;
    fn reorder_rows(&self, dashboard: &Dashboard, new_order: &[PanelId]) -> Dashboard;
    fn move_row(&self, dashboard: &Dashboard, row_id: PanelId, new_y: i32) -> Dashboard;
    fn delete_row(&self, dashboard: &Dashboard, row_id: PanelId) -> Dashboard;
    fn pack_row(&self, dashboard: &Dashboard, row_id: PanelId) -> Dashboard;
    fn tidy_up(&self, dashboard: &Dashboard) -> Dashboard;
    fn canonicalize_rows(&self, dashboard: &Dashboard) -> Dashboard;
}
