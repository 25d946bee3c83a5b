//! # scale
//!
//! Scale factory: linear, time and band scales mapping a data domain to a
//! pixel range. Scales are value objects; every builder call returns a new
//! scale and nothing is patched in place once a chart holds it.

use chrono::{DateTime, Datelike, Months, TimeZone, Utc};
use viz_core::DataValue;

// ============================================================================
// STRATEGY PATTERN: Scale Trait
// ============================================================================

/// Strategy trait for continuous scales (maps domain values to range values)
pub trait Scale: Send + Sync {
    /// Scale a value from domain to range
    fn scale(&self, value: f64) -> f64;

    /// Inverse scale (range to domain)
    fn invert(&self, value: f64) -> f64;

    /// Generate tick values
    fn ticks(&self, count: usize) -> Vec<f64>;
}

// ============================================================================
// TICK MATH
// ============================================================================

/// Tick layout `(first, last, increment)`.
///
/// A negative increment means "divide by |inc|"; this keeps ticks such as 0.1
/// and 0.3 exact instead of accumulating floating point error.
fn tick_range(start: f64, stop: f64, count: f64) -> Option<(i64, i64, f64)> {
    if !(start.is_finite() && stop.is_finite()) || count <= 0.0 || stop <= start {
        return None;
    }

    let step = (stop - start) / count.max(1.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let divisor = 10f64.powf(-power) / factor;
        i1 = (start * divisor).round() as i64;
        i2 = (stop * divisor).round() as i64;
        if (i1 as f64) / divisor < start {
            i1 += 1;
        }
        if (i2 as f64) / divisor > stop {
            i2 -= 1;
        }
        inc = -divisor;
    } else {
        let multiplier = 10f64.powf(power) * factor;
        i1 = (start / multiplier).round() as i64;
        i2 = (stop / multiplier).round() as i64;
        if (i1 as f64) * multiplier < start {
            i1 += 1;
        }
        if (i2 as f64) * multiplier > stop {
            i2 -= 1;
        }
        inc = multiplier;
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_range(start, stop, count * 2.0);
    }
    Some((i1, i2, inc))
}

fn tick_value(i: i64, inc: f64) -> f64 {
    if inc < 0.0 { i as f64 / -inc } else { i as f64 * inc }
}

/// Round tick values covering `[min, max]` (either order)
pub fn nice_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !(min.is_finite() && max.is_finite()) {
        return Vec::new();
    }
    if min == max {
        return vec![min];
    }

    let (lo, hi, reverse) = if max < min { (max, min, true) } else { (min, max, false) };
    let Some((i1, i2, inc)) = tick_range(lo, hi, count as f64) else {
        return Vec::new();
    };
    if i2 < i1 {
        return Vec::new();
    }

    let mut ticks: Vec<f64> = (i1..=i2).map(|i| tick_value(i, inc)).collect();
    if reverse {
        ticks.reverse();
    }
    ticks
}

/// Signed tick increment (see [`tick_range`]) for `[start, stop]`
fn tick_increment(start: f64, stop: f64, count: usize) -> Option<f64> {
    tick_range(start, stop, count as f64).map(|(_, _, inc)| inc)
}

/// Expand `[min, max]` outward to round values
pub fn nice_domain(min: f64, max: f64, count: usize) -> (f64, f64) {
    let (mut lo, mut hi, reverse) = if max < min { (max, min, true) } else { (min, max, false) };
    let mut previous: Option<f64> = None;

    for _ in 0..10 {
        let Some(step) = tick_increment(lo, hi, count) else {
            break;
        };
        if previous == Some(step) {
            break;
        }
        if step > 0.0 {
            lo = (lo / step).floor() * step;
            hi = (hi / step).ceil() * step;
        } else {
            lo = (lo * -step).floor() / -step;
            hi = (hi * -step).ceil() / -step;
        }
        previous = Some(step);
    }

    if reverse { (hi, lo) } else { (lo, hi) }
}

/// Degenerate and non-finite domains become usable ones:
/// `min == max` widens to `[min - 1, max + 1]`, non-finite becomes `[0, 1]`.
pub fn sanitize_domain(min: f64, max: f64) -> (f64, f64) {
    if !(min.is_finite() && max.is_finite()) {
        (0.0, 1.0)
    } else if min == max {
        (min - 1.0, max + 1.0)
    } else {
        (min, max)
    }
}

// ============================================================================
// LINEAR SCALE
// ============================================================================

/// Linear scale (D3-style continuous scale)
#[derive(Debug, Clone, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
    clamp: bool,
}

impl LinearScale {
    pub fn new() -> Self {
        Self {
            domain: (0.0, 1.0),
            range: (0.0, 1.0),
            clamp: false,
        }
    }

    /// Set the domain; degenerate domains are widened (see [`sanitize_domain`])
    pub fn domain(mut self, min: f64, max: f64) -> Self {
        self.domain = sanitize_domain(min, max);
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = (min, max);
        self
    }

    pub fn clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    /// Expand the domain outward to round values
    pub fn nice(mut self, count: usize) -> Self {
        self.domain = nice_domain(self.domain.0, self.domain.1, count);
        self
    }

    /// Get domain bounds
    pub fn domain_bounds(&self) -> (f64, f64) {
        self.domain
    }

    /// Get range bounds
    pub fn range_bounds(&self) -> (f64, f64) {
        self.range
    }

    pub fn is_clamped(&self) -> bool {
        self.clamp
    }
}

impl Default for LinearScale {
    fn default() -> Self {
        Self::new()
    }
}

impl Scale for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;

        let mut normalized = (value - d_min) / (d_max - d_min);

        if self.clamp {
            normalized = normalized.clamp(0.0, 1.0);
        }

        r_min + normalized * (r_max - r_min)
    }

    fn invert(&self, value: f64) -> f64 {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;

        if (r_max - r_min).abs() < f64::EPSILON {
            return (d_min + d_max) / 2.0;
        }

        let mut normalized = (value - r_min) / (r_max - r_min);
        if self.clamp {
            normalized = normalized.clamp(0.0, 1.0);
        }
        d_min + normalized * (d_max - d_min)
    }

    fn ticks(&self, count: usize) -> Vec<f64> {
        nice_ticks(self.domain.0, self.domain.1, count)
    }
}

// ============================================================================
// TIME SCALE
// ============================================================================

const SECOND: i64 = 1_000;
const MINUTE: i64 = 60 * SECOND;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH_APPROX: i64 = 30 * DAY;
const YEAR_APPROX: i64 = 365 * DAY;

/// Calendar-friendly tick interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeInterval {
    /// Fixed length in milliseconds, aligned to the Unix epoch
    Fixed(i64),
    /// Whole months, aligned to January
    Months(u32),
    /// Whole years, aligned to multiples of the step
    Years(i32),
}

const FIXED_INTERVALS: &[i64] = &[
    SECOND,
    5 * SECOND,
    15 * SECOND,
    30 * SECOND,
    MINUTE,
    5 * MINUTE,
    15 * MINUTE,
    30 * MINUTE,
    HOUR,
    3 * HOUR,
    6 * HOUR,
    12 * HOUR,
    DAY,
    2 * DAY,
    WEEK,
];

impl TimeInterval {
    /// Pick the interval closest to `span / count`
    pub fn for_span(span_ms: i64, count: usize) -> Self {
        let target = span_ms.max(1) / count.max(1) as i64;

        if let Some(&fixed) = FIXED_INTERVALS.iter().find(|&&iv| iv >= target) {
            return Self::Fixed(fixed);
        }
        if target <= MONTH_APPROX {
            return Self::Months(1);
        }
        if target <= 3 * MONTH_APPROX {
            return Self::Months(3);
        }
        if target <= 6 * MONTH_APPROX {
            return Self::Months(6);
        }

        let years = target as f64 / YEAR_APPROX as f64;
        let step = tick_increment(0.0, years * count as f64, count)
            .map(|inc| if inc > 0.0 { inc } else { 1.0 })
            .unwrap_or(1.0);
        Self::Years((step.round() as i32).max(1))
    }

    /// Approximate length, used for label granularity
    pub fn approx_ms(&self) -> i64 {
        match *self {
            Self::Fixed(ms) => ms,
            Self::Months(n) => n as i64 * MONTH_APPROX,
            Self::Years(n) => n as i64 * YEAR_APPROX,
        }
    }

    /// Latest interval boundary at or before `ts`
    pub fn floor(&self, ts: i64) -> i64 {
        match *self {
            Self::Fixed(ms) => ts.div_euclid(ms) * ms,
            Self::Months(n) => {
                let Some(dt) = Utc.timestamp_millis_opt(ts).single() else {
                    return ts;
                };
                let month0 = dt.month0() / n * n;
                Utc.with_ymd_and_hms(dt.year(), month0 + 1, 1, 0, 0, 0)
                    .single()
                    .map_or(ts, |d| d.timestamp_millis())
            }
            Self::Years(n) => {
                let Some(dt) = Utc.timestamp_millis_opt(ts).single() else {
                    return ts;
                };
                let year = dt.year().div_euclid(n) * n;
                Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0)
                    .single()
                    .map_or(ts, |d| d.timestamp_millis())
            }
        }
    }

    /// Earliest interval boundary at or after `ts`
    pub fn ceil(&self, ts: i64) -> i64 {
        let floor = self.floor(ts);
        if floor == ts { ts } else { self.offset(floor) }
    }

    /// Next boundary after the boundary `ts`
    pub fn offset(&self, ts: i64) -> i64 {
        let Some(dt) = Utc.timestamp_millis_opt(ts).single() else {
            return ts + self.approx_ms();
        };
        match *self {
            Self::Fixed(ms) => ts + ms,
            Self::Months(n) => dt
                .checked_add_months(Months::new(n))
                .map_or(ts + self.approx_ms(), |d| d.timestamp_millis()),
            Self::Years(n) => dt
                .checked_add_months(Months::new(12 * n as u32))
                .map_or(ts + self.approx_ms(), |d| d.timestamp_millis()),
        }
    }
}

/// Time scale (maps millisecond timestamps to pixel positions)
#[derive(Debug, Clone, PartialEq)]
pub struct TimeScale {
    domain: (i64, i64), // Unix timestamps in milliseconds
    range: (f64, f64),
    clamp: bool,
}

impl TimeScale {
    pub fn new() -> Self {
        Self {
            domain: (0, DAY),
            range: (0.0, 1.0),
            clamp: false,
        }
    }

    /// Set the domain; a single instant widens to one day either side
    pub fn domain(mut self, min: i64, max: i64) -> Self {
        self.domain = if min == max { (min - DAY, max + DAY) } else { (min, max) };
        self
    }

    pub fn domain_dates(self, min: DateTime<Utc>, max: DateTime<Utc>) -> Self {
        self.domain(min.timestamp_millis(), max.timestamp_millis())
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = (min, max);
        self
    }

    pub fn clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    /// Round the domain outward to calendar boundaries
    pub fn nice(mut self, count: usize) -> Self {
        let (lo, hi) = self.ordered();
        let interval = TimeInterval::for_span(hi - lo, count);
        let (nlo, nhi) = (interval.floor(lo), interval.ceil(hi));
        self.domain = if self.domain.0 <= self.domain.1 { (nlo, nhi) } else { (nhi, nlo) };
        self
    }

    pub fn domain_bounds(&self) -> (i64, i64) {
        self.domain
    }

    pub fn range_bounds(&self) -> (f64, f64) {
        self.range
    }

    /// Interval used for `count` ticks over this domain
    pub fn tick_interval(&self, count: usize) -> TimeInterval {
        let (lo, hi) = self.ordered();
        TimeInterval::for_span(hi - lo, count)
    }

    /// Scale a date to pixel position
    pub fn scale_date(&self, date: DateTime<Utc>) -> f64 {
        self.scale(date.timestamp_millis() as f64)
    }

    /// Inverse scale (pixel to timestamp)
    pub fn invert_date(&self, px: f64) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.invert(px).round() as i64).single()
    }

    fn ordered(&self) -> (i64, i64) {
        (self.domain.0.min(self.domain.1), self.domain.0.max(self.domain.1))
    }
}

impl Default for TimeScale {
    fn default() -> Self {
        Self::new()
    }
}

impl Scale for TimeScale {
    fn scale(&self, value: f64) -> f64 {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;

        let mut normalized = (value - d_min as f64) / (d_max - d_min) as f64;
        if self.clamp {
            normalized = normalized.clamp(0.0, 1.0);
        }
        r_min + normalized * (r_max - r_min)
    }

    fn invert(&self, value: f64) -> f64 {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;

        if (r_max - r_min).abs() < f64::EPSILON {
            return (d_min as f64 + d_max as f64) / 2.0;
        }

        let mut normalized = (value - r_min) / (r_max - r_min);
        if self.clamp {
            normalized = normalized.clamp(0.0, 1.0);
        }
        d_min as f64 + normalized * (d_max - d_min) as f64
    }

    fn ticks(&self, count: usize) -> Vec<f64> {
        if count == 0 {
            return Vec::new();
        }
        let (lo, hi) = self.ordered();
        let interval = self.tick_interval(count);

        let mut ticks = Vec::new();
        let mut t = interval.ceil(lo);
        while t <= hi && ticks.len() < 1_000 {
            ticks.push(t as f64);
            let next = interval.offset(t);
            if next <= t {
                break;
            }
            t = next;
        }
        ticks
    }
}

// ============================================================================
// BAND SCALE (for categorical/ordinal data)
// ============================================================================

/// Band scale for categorical data: one equal-width slot per category
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: Vec<String>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
}

impl BandScale {
    /// Unique categories, first occurrence wins
    pub fn new<S: AsRef<str>>(categories: &[S]) -> Self {
        let mut domain: Vec<String> = Vec::with_capacity(categories.len());
        for c in categories {
            let c = c.as_ref();
            if !domain.iter().any(|d| d == c) {
                domain.push(c.to_string());
            }
        }
        Self {
            domain,
            range: (0.0, 1.0),
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
        }
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = (min, max);
        self
    }

    pub fn padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.clamp(0.0, 1.0);
        self.padding_outer = outer.clamp(0.0, 1.0);
        self
    }

    pub fn padding_uniform(self, padding: f64) -> Self {
        self.padding(padding, padding)
    }

    pub fn align(mut self, align: f64) -> Self {
        self.align = align.clamp(0.0, 1.0);
        self
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn range_bounds(&self) -> (f64, f64) {
        self.range
    }

    pub fn len(&self) -> usize {
        self.domain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }

    fn reversed(&self) -> bool {
        self.range.1 < self.range.0
    }

    fn extent(&self) -> (f64, f64) {
        (self.range.0.min(self.range.1), self.range.0.max(self.range.1))
    }

    /// Get step size (band + gap)
    pub fn step(&self) -> f64 {
        let (start, stop) = self.extent();
        let n = self.domain.len() as f64;
        (stop - start) / (n - self.padding_inner + self.padding_outer * 2.0).max(1.0)
    }

    /// Get band width (width of each bar)
    pub fn bandwidth(&self) -> f64 {
        if self.domain.is_empty() {
            return 0.0;
        }
        self.step() * (1.0 - self.padding_inner)
    }

    /// Offset of the first band from the range start
    fn first_offset(&self) -> f64 {
        let (start, stop) = self.extent();
        let n = self.domain.len() as f64;
        let step = self.step();
        start + (stop - start - step * (n - self.padding_inner)) * self.align
    }

    /// Band start for a slot index
    pub fn scale_index(&self, index: usize) -> f64 {
        if self.domain.is_empty() {
            return self.range.0;
        }
        let slot = if self.reversed() {
            self.domain.len().saturating_sub(1).saturating_sub(index)
        } else {
            index
        };
        self.first_offset() + slot as f64 * self.step()
    }

    /// Get center position for index
    pub fn scale_center(&self, index: usize) -> f64 {
        self.scale_index(index) + self.bandwidth() / 2.0
    }

    pub fn index_of(&self, category: &str) -> Option<usize> {
        self.domain.iter().position(|d| d == category)
    }

    /// Band start for a category
    pub fn scale(&self, category: &str) -> Option<f64> {
        self.index_of(category).map(|i| self.scale_index(i))
    }

    /// Bucket lookup: `floor((px - range_start) / step)`, clamped to a valid slot
    pub fn index_at(&self, px: f64) -> Option<usize> {
        let n = self.domain.len();
        if n == 0 {
            return None;
        }
        let step = self.step();
        if step <= 0.0 || !px.is_finite() {
            return Some(0);
        }
        let (start, _) = self.extent();
        let slot = ((px - start) / step).floor().clamp(0.0, (n - 1) as f64) as usize;
        Some(if self.reversed() { n - 1 - slot } else { slot })
    }
}

// ============================================================================
// FACTORY
// ============================================================================

/// Options for [`linear`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinearOptions {
    pub nice: bool,
    pub clamp: bool,
}

/// Options for [`temporal`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TemporalOptions {
    pub nice: bool,
}

/// Options for [`band`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandOptions {
    pub padding_inner: f64,
    pub padding_outer: f64,
    pub align: f64,
}

impl BandOptions {
    /// Same padding inside and outside
    pub fn padding(padding: f64) -> Self {
        Self {
            padding_inner: padding,
            padding_outer: padding,
            ..Default::default()
        }
    }
}

impl Default for BandOptions {
    fn default() -> Self {
        Self {
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
        }
    }
}

/// Default tick count used when rounding domains
pub const DEFAULT_TICK_COUNT: usize = 10;

/// Affine scale over a numeric domain
pub fn linear(domain: (f64, f64), range: (f64, f64), options: LinearOptions) -> LinearScale {
    let scale = LinearScale::new()
        .domain(domain.0, domain.1)
        .range(range.0, range.1)
        .clamp(options.clamp);
    if options.nice { scale.nice(DEFAULT_TICK_COUNT) } else { scale }
}

/// Affine scale over a date domain
pub fn temporal(
    domain: (DateTime<Utc>, DateTime<Utc>),
    range: (f64, f64),
    options: TemporalOptions,
) -> TimeScale {
    let scale = TimeScale::new()
        .domain_dates(domain.0, domain.1)
        .range(range.0, range.1);
    if options.nice { scale.nice(DEFAULT_TICK_COUNT) } else { scale }
}

/// Categorical scale, one band per unique category in insertion order
pub fn band<S: AsRef<str>>(domain: &[S], range: (f64, f64), options: BandOptions) -> BandScale {
    BandScale::new(domain)
        .range(range.0, range.1)
        .padding(options.padding_inner, options.padding_outer)
        .align(options.align)
}

// ============================================================================
// TAGGED SCALE
// ============================================================================

/// Scale kind discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleKind {
    Linear,
    Time,
    Band,
}

/// A chart axis scale: one of the three kinds with its own payload
#[derive(Debug, Clone, PartialEq)]
pub enum ChartScale {
    Linear(LinearScale),
    Time(TimeScale),
    Band(BandScale),
}

impl ChartScale {
    pub fn kind(&self) -> ScaleKind {
        match self {
            Self::Linear(_) => ScaleKind::Linear,
            Self::Time(_) => ScaleKind::Time,
            Self::Band(_) => ScaleKind::Band,
        }
    }

    pub fn is_continuous(&self) -> bool {
        !matches!(self, Self::Band(_))
    }

    /// Pixel position of a data value; band scales return the band center
    pub fn position(&self, value: &DataValue) -> Option<f64> {
        match self {
            Self::Linear(s) => value.as_number().map(|v| s.scale(v)),
            Self::Time(s) => value.as_coordinate().map(|v| s.scale(v)),
            Self::Band(s) => s
                .index_of(&value.as_category())
                .map(|i| s.scale_center(i)),
        }
    }

    /// Pixel position of a raw number on a continuous scale
    pub fn scale_number(&self, value: f64) -> Option<f64> {
        match self {
            Self::Linear(s) => Some(s.scale(value)),
            Self::Time(s) => Some(s.scale(value)),
            Self::Band(_) => None,
        }
    }

    /// Domain value at a pixel; band scales have no inverse
    pub fn invert(&self, px: f64) -> Option<f64> {
        match self {
            Self::Linear(s) => Some(s.invert(px)),
            Self::Time(s) => Some(s.invert(px)),
            Self::Band(_) => None,
        }
    }

    pub fn range_bounds(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.range_bounds(),
            Self::Time(s) => s.range_bounds(),
            Self::Band(s) => s.range_bounds(),
        }
    }

    /// Band width, zero for continuous scales
    pub fn bandwidth(&self) -> f64 {
        match self {
            Self::Band(s) => s.bandwidth(),
            _ => 0.0,
        }
    }

    pub fn as_band(&self) -> Option<&BandScale> {
        match self {
            Self::Band(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_linear(&self) -> Option<&LinearScale> {
        match self {
            Self::Linear(s) => Some(s),
            _ => None,
        }
    }
}

impl Default for ChartScale {
    fn default() -> Self {
        Self::Linear(LinearScale::new())
    }
}

impl From<LinearScale> for ChartScale {
    fn from(s: LinearScale) -> Self {
        Self::Linear(s)
    }
}

impl From<TimeScale> for ChartScale {
    fn from(s: TimeScale) -> Self {
        Self::Time(s)
    }
}

impl From<BandScale> for ChartScale {
    fn from(s: BandScale) -> Self {
        Self::Band(s)
    }
}

// ============================================================================
// TESTS
// ============================================================================
