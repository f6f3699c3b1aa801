//! Presentation adapter: lays out and paints a container for an inspector.
//!
//! The drawer reads the raw list and the advisory flags and never mutates
//! the container. A host typically asks for the height first and paints
//! afterwards, possibly several times per frame; both calls go through one
//! layout computation so they always agree.
//!
//! Painting is delegated to the host through [`Canvas`]. Row editing is not
//! the drawer's business: the host applies edits with `edit_raw`, which
//! reconciles once.

use crate::dictionary::SerializableDictionary;
use crate::set::SerializableHashSet;
use core::fmt;
use core::hash::{BuildHasher, Hash};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A banner shown under the list while its condition holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Advisory {
    pub severity: Severity,
    pub message: &'static str,
}

pub const NULL_KEYS: Advisory = Advisory {
    severity: Severity::Error,
    message: "Dictionary contains null keys. These entries are inaccessible.",
};

pub const DUPLICATE_KEYS: Advisory = Advisory {
    severity: Severity::Warning,
    message: "Dictionary contains duplicate keys. Only the first entry for each key is accessible.",
};

pub const DUPLICATE_VALUES: Advisory = Advisory {
    severity: Severity::Warning,
    message: "Set contains duplicate values. Only the first occurrence of each value is accessible.",
};

/// One raw entry as the host should display it.
#[derive(Copy, Clone)]
pub enum Row<'a> {
    Pair {
        key: Option<&'a dyn fmt::Debug>,
        value: &'a dyn fmt::Debug,
    },
    Item(&'a dyn fmt::Debug),
}

impl fmt::Debug for Row<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Row::Pair { key: Some(k), value } => write!(f, "{k:?}: {value:?}"),
            Row::Pair { key: None, value } => write!(f, "null: {value:?}"),
            Row::Item(v) => write!(f, "{v:?}"),
        }
    }
}

/// What a drawer needs from a container.
pub trait Inspect {
    /// Every raw entry in persisted order, including inaccessible ones.
    fn rows(&self) -> Vec<Row<'_>>;

    /// Number of rows `rows` would yield. Layout calls this on every pass.
    fn row_count(&self) -> usize {
        self.rows().len()
    }

    /// Banners for the advisory flags currently raised, most severe first.
    fn advisories(&self) -> Vec<Advisory>;
}

impl<K, V, S> Inspect for SerializableDictionary<K, V, S>
where
    K: fmt::Debug + Eq + Hash,
    V: fmt::Debug,
    S: BuildHasher + Clone + Default,
{
    fn rows(&self) -> Vec<Row<'_>> {
        self.entries()
            .iter()
            .map(|e| Row::Pair {
                key: e.key().as_ref().map(|k| k as &dyn fmt::Debug),
                value: e.value(),
            })
            .collect()
    }

    fn row_count(&self) -> usize {
        self.raw_len()
    }

    fn advisories(&self) -> Vec<Advisory> {
        let mut out = Vec::new();
        if self.has_null_keys() {
            out.push(NULL_KEYS);
        }
        if self.has_duplicate_keys() {
            out.push(DUPLICATE_KEYS);
        }
        out
    }
}

impl<T, S> Inspect for SerializableHashSet<T, S>
where
    T: fmt::Debug + Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    fn rows(&self) -> Vec<Row<'_>> {
        self.entries()
            .iter()
            .map(|v| Row::Item(v as &dyn fmt::Debug))
            .collect()
    }

    fn row_count(&self) -> usize {
        self.raw_len()
    }

    fn advisories(&self) -> Vec<Advisory> {
        if self.has_duplicate_values() {
            vec![DUPLICATE_VALUES]
        } else {
            Vec::new()
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Layout constants, in host units (usually pixels).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DrawerStyle {
    /// Height of a single line of text, used for the label and banner text.
    pub line_height: f32,
    /// Vertical gap between stacked blocks.
    pub spacing: f32,
    pub row_height: f32,
    /// Chrome above and below the list rows, split evenly.
    pub list_padding: f32,
    pub banner_min_height: f32,
    /// Inner padding of a banner on every side.
    pub banner_padding: f32,
    /// Horizontal space a banner reserves for its severity icon.
    pub banner_icon_width: f32,
    /// Average glyph advance, used to estimate how banner text wraps.
    pub glyph_width: f32,
}

impl Default for DrawerStyle {
    fn default() -> Self {
        Self {
            line_height: 18.0,
            spacing: 2.0,
            row_height: 20.0,
            list_padding: 6.0,
            banner_min_height: 38.0,
            banner_padding: 4.0,
            banner_icon_width: 32.0,
            glyph_width: 7.0,
        }
    }
}

impl DrawerStyle {
    /// Height of a banner holding `message` at `width`.
    pub fn banner_height(&self, message: &str, width: f32) -> f32 {
        let text_width = width - 2.0 * self.banner_padding - self.banner_icon_width;
        let per_line = if self.glyph_width > 0.0 {
            (text_width / self.glyph_width).floor().max(1.0) as usize
        } else {
            usize::MAX
        };
        let glyphs = message.chars().count().max(1);
        let lines = glyphs.div_ceil(per_line);
        let text = lines as f32 * self.line_height + 2.0 * self.banner_padding;
        text.max(self.banner_min_height)
    }
}

/// Where each piece of a drawer goes inside a region.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    pub label: Option<Rect>,
    pub rows: Vec<Rect>,
    /// Placeholder row shown when the raw list is empty.
    pub empty: Option<Rect>,
    pub banners: Vec<(Rect, Advisory)>,
    pub height: f32,
}

/// Host surface the drawer paints onto.
pub trait Canvas {
    fn label(&mut self, rect: Rect, text: &str, bold: bool);
    fn row(&mut self, rect: Rect, ordinal: usize, row: &Row<'_>);
    fn empty_list(&mut self, rect: Rect);
    fn help_box(&mut self, rect: Rect, message: &str, severity: Severity);
}

/// The two calls an inspector's layout pass makes on a property.
pub trait PropertyDrawer {
    fn measure_height(&self, label: &str, available_width: f32) -> f32;
    fn paint(&self, canvas: &mut dyn Canvas, region: Rect, label: &str);
}

/// Drawer for any [`Inspect`] container.
pub struct CollectionDrawer<'a, C: ?Sized> {
    target: &'a C,
    style: DrawerStyle,
}

impl<'a, C: Inspect + ?Sized> CollectionDrawer<'a, C> {
    pub fn new(target: &'a C) -> Self {
        Self::with_style(target, DrawerStyle::default())
    }

    pub fn with_style(target: &'a C, style: DrawerStyle) -> Self {
        Self { target, style }
    }

    pub fn style(&self) -> &DrawerStyle {
        &self.style
    }

    /// Place the label, rows, and banners top to bottom inside `region`.
    /// An empty label takes no space.
    pub fn layout(&self, region: Rect, label: &str, row_count: usize) -> Layout {
        let s = &self.style;
        let mut y = region.y;
        let line = |y: f32, height: f32| Rect::new(region.x, y, region.width, height);

        let label_rect = if label.is_empty() {
            None
        } else {
            let r = line(y, s.line_height);
            y = r.bottom() + s.spacing;
            Some(r)
        };

        y += s.list_padding / 2.0;
        let mut rows = Vec::with_capacity(row_count);
        for _ in 0..row_count {
            let r = line(y, s.row_height);
            y = r.bottom();
            rows.push(r);
        }
        let empty = if row_count == 0 {
            let r = line(y, s.row_height);
            y = r.bottom();
            Some(r)
        } else {
            None
        };
        y += s.list_padding / 2.0;

        let mut banners = Vec::new();
        for advisory in self.target.advisories() {
            y += s.spacing;
            let r = line(y, s.banner_height(advisory.message, region.width));
            y = r.bottom();
            banners.push((r, advisory));
        }

        Layout {
            label: label_rect,
            rows,
            empty,
            banners,
            height: y - region.y,
        }
    }
}

impl<C: Inspect + ?Sized> PropertyDrawer for CollectionDrawer<'_, C> {
    fn measure_height(&self, label: &str, available_width: f32) -> f32 {
        let region = Rect::new(0.0, 0.0, available_width, 0.0);
        self.layout(region, label, self.target.row_count()).height
    }

    fn paint(&self, canvas: &mut dyn Canvas, region: Rect, label: &str) {
        let rows = self.target.rows();
        let layout = self.layout(region, label, rows.len());
        log::trace!(
            "painting {} rows and {} banners",
            rows.len(),
            layout.banners.len()
        );

        if let Some(rect) = layout.label {
            canvas.label(rect, label, true);
        }
        for (ordinal, (rect, row)) in layout.rows.iter().zip(&rows).enumerate() {
            canvas.row(*rect, ordinal, row);
        }
        if let Some(rect) = layout.empty {
            canvas.empty_list(rect);
        }
        for (rect, advisory) in &layout.banners {
            canvas.help_box(*rect, advisory.message, advisory.severity);
        }
    }
}
