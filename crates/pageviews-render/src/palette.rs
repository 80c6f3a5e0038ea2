use plotters::style::RGBColor;

/// Trend line colour.
pub const LINE: RGBColor = RGBColor(214, 39, 40);

/// Box fill for the year panel.
pub const YEAR_BOX: RGBColor = RGBColor(76, 114, 176);

/// Outline of boxes, whiskers and medians.
pub const OUTLINE: RGBColor = RGBColor(63, 63, 63);

/// Outlier marker colour.
pub const OUTLIER: RGBColor = RGBColor(90, 90, 90);

/// One colour per calendar month, January first.
///
/// Shared by the bar clusters and the month panel so a month keeps the same
/// colour in both charts.
pub const MONTHS: [RGBColor; 12] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
    RGBColor(174, 199, 232),
    RGBColor(255, 187, 120),
];

/// Colour for a zero-based month index; wraps past December.
pub fn month_color(month0: usize) -> RGBColor {
    MONTHS[month0 % MONTHS.len()]
}
