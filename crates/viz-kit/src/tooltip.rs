//! Tooltip hit-testing and placement
//!
//! The controller is a small state machine: `Hidden` until a pointer move
//! inside the plot area resolves to a data point, back to `Hidden` on pointer
//! leave, when nothing is close enough, or when the series becomes empty.

use serde::{Deserialize, Serialize};
use viz_core::{
    ColorResolver, ContainerSize, DataPoint, HiddenSeries, SeriesEntry, ValueFormatter,
};

/// One series row inside the tooltip
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipEntry {
    pub key: String,
    pub label: String,
    pub color: String,
    pub value: String,
}

/// Series list plus the visibility and colour state the tooltip rows depend on
#[derive(Debug, Clone, Copy)]
pub struct SeriesStyle<'a> {
    pub series: &'a [SeriesEntry],
    pub hidden: &'a HiddenSeries,
    pub colors: &'a ColorResolver,
}

impl<'a> SeriesStyle<'a> {
    pub fn new(series: &'a [SeriesEntry], hidden: &'a HiddenSeries, colors: &'a ColorResolver) -> Self {
        Self { series, hidden, colors }
    }
}

/// What the tooltip shows for a hovered point
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    pub title: String,
    pub entries: Vec<TooltipEntry>,
    /// Index of the hovered point in the data
    pub index: usize,
}

impl TooltipContent {
    /// Title plus one row per visible series with a numeric value at `point`
    pub fn from_point(
        point: &DataPoint,
        index: usize,
        x_key: &str,
        style: SeriesStyle<'_>,
        title_formatter: Option<&dyn ValueFormatter>,
        value_formatter: &dyn ValueFormatter,
    ) -> Self {
        let title = match (point.get(x_key), title_formatter) {
            (Some(value), Some(formatter)) => value
                .as_coordinate()
                .map(|v| formatter.format(v))
                .unwrap_or_else(|| value.to_string()),
            (Some(value), None) => value.to_string(),
            (None, _) => String::new(),
        };

        let entries = style
            .series
            .iter()
            .filter(|entry| !style.hidden.is_hidden(&entry.key))
            .filter_map(|entry| {
                let value = point.number(&entry.key)?;
                Some(TooltipEntry {
                    key: entry.key.clone(),
                    label: entry.config.label.clone(),
                    color: style.colors.resolve(entry).to_string(),
                    value: value_formatter.format(value),
                })
            })
            .collect();

        Self { title, entries, index }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Top-left corner of the tooltip box in container pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TooltipPosition {
    pub x: f64,
    pub y: f64,
    pub flipped_x: bool,
    pub flipped_y: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum TooltipState {
    #[default]
    Hidden,
    Visible {
        content: TooltipContent,
        position: TooltipPosition,
    },
}

impl TooltipState {
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible { .. })
    }

    pub fn content(&self) -> Option<&TooltipContent> {
        match self {
            Self::Visible { content, .. } => Some(content),
            Self::Hidden => None,
        }
    }

    pub fn position(&self) -> Option<TooltipPosition> {
        match self {
            Self::Visible { position, .. } => Some(*position),
            Self::Hidden => None,
        }
    }
}

/// Tooltip box metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipConfig {
    pub enabled: bool,
    /// Distance between pointer and tooltip box
    pub offset: f64,
    pub width: f64,
    pub row_height: f64,
    pub padding: f64,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            offset: 12.0,
            width: 160.0,
            row_height: 18.0,
            padding: 8.0,
        }
    }
}

impl TooltipConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Narrow box for small charts
    pub fn compact() -> Self {
        Self {
            width: 120.0,
            row_height: 16.0,
            padding: 6.0,
            ..Self::default()
        }
    }

    /// Estimated box size: title row plus one row per entry
    pub fn size_for(&self, content: &TooltipContent) -> ContainerSize {
        let rows = content.entries.len() as f64 + 1.0;
        ContainerSize::new(self.width, rows * self.row_height + self.padding * 2.0)
    }
}

/// Place a box of `size` next to `pointer` inside `container`.
///
/// The box sits below-right of the pointer; it flips to the left or above when
/// it would overflow, then is clamped into the container.
pub fn position_tooltip(
    pointer: (f64, f64),
    size: ContainerSize,
    container: ContainerSize,
    offset: f64,
) -> TooltipPosition {
    let (px, py) = pointer;

    let mut x = px + offset;
    let mut flipped_x = false;
    if x + size.width > container.width {
        x = px - offset - size.width;
        flipped_x = true;
    }

    let mut y = py + offset;
    let mut flipped_y = false;
    if y + size.height > container.height {
        y = py - offset - size.height;
        flipped_y = true;
    }

    TooltipPosition {
        x: clamp_into(x, size.width, container.width),
        y: clamp_into(y, size.height, container.height),
        flipped_x,
        flipped_y,
    }
}

/// Clamp a box start so `[start, start + len]` stays inside `[0, bound]`;
/// boxes larger than the bound pin to 0
fn clamp_into(start: f64, len: f64, bound: f64) -> f64 {
    start.min(bound - len).max(0.0)
}

/// Pure transition: the tooltip state for a pointer sample
pub fn resolve_tooltip(
    content: Option<TooltipContent>,
    pointer: (f64, f64),
    container: ContainerSize,
    config: &TooltipConfig,
) -> TooltipState {
    match content {
        Some(content) if config.enabled && !content.is_empty() => {
            let size = config.size_for(&content);
            let position = position_tooltip(pointer, size, container, config.offset);
            TooltipState::Visible { content, position }
        }
        _ => TooltipState::Hidden,
    }
}

/// Stateful tooltip controller for one chart
#[derive(Debug, Clone, Default)]
pub struct TooltipController {
    config: TooltipConfig,
    state: TooltipState,
}

impl TooltipController {
    pub fn new(config: TooltipConfig) -> Self {
        Self {
            config,
            state: TooltipState::Hidden,
        }
    }

    pub fn state(&self) -> &TooltipState {
        &self.state
    }

    pub fn config(&self) -> &TooltipConfig {
        &self.config
    }

    /// Pointer moved. `inside` is whether the pointer is within the plot area;
    /// `content` is the resolved closest point, if any.
    pub fn pointer_move(
        &mut self,
        pointer: (f64, f64),
        inside: bool,
        content: Option<TooltipContent>,
        container: ContainerSize,
    ) -> &TooltipState {
        self.state = if inside {
            resolve_tooltip(content, pointer, container, &self.config)
        } else {
            TooltipState::Hidden
        };
        &self.state
    }

    pub fn pointer_leave(&mut self) -> &TooltipState {
        self.state = TooltipState::Hidden;
        &self.state
    }

    /// Series data replaced; an empty series always hides the tooltip
    pub fn series_changed(&mut self, data: &[DataPoint]) -> &TooltipState {
        let stale = match &self.state {
            TooltipState::Visible { content, .. } => content.index >= data.len(),
            TooltipState::Hidden => false,
        };
        if data.is_empty() || stale {
            self.state = TooltipState::Hidden;
        }
        &self.state
    }
}
