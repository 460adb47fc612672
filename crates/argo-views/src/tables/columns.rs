//! Column layouts and plain-text rendering of a table page

use std::fmt::Write as _;

use argo_core::quality::{BadgeVariant, Quality};
use argo_core::records::{Measurement, MeasurementField, Profile, ProfileField};
use argo_core::table::TableRecord;
use argo_core::view_state::{SortDirection, SortState};

use super::{TableConfig, TablePage};

const MISSING: &str = "-";

/// One displayed column: header, optional sort binding and cell formatter
pub struct ColumnSpec<R: TableRecord> {
    pub header: &'static str,
    /// Clicking the header sorts by this field; `None` for display-only columns
    pub sort_field: Option<R::Field>,
    pub cell: fn(&R) -> String,
}

impl<R: TableRecord> ColumnSpec<R> {
    pub fn new(header: &'static str, sort_field: Option<R::Field>, cell: fn(&R) -> String) -> Self {
        Self {
            header,
            sort_field,
            cell,
        }
    }

    /// Header text with the active sort direction marker
    pub fn header_label(&self, sort: SortState<R::Field>) -> String {
        match self.sort_field {
            Some(field) if field == sort.field => {
                let arrow = match sort.direction {
                    SortDirection::Asc => '▲',
                    SortDirection::Desc => '▼',
                };
                format!("{} {}", self.header, arrow)
            }
            _ => self.header.to_string(),
        }
    }
}

/// Quality cell with a marker for its badge style
pub fn quality_label(quality: &Quality) -> String {
    let marker = match quality.badge() {
        BadgeVariant::Primary => '●',
        BadgeVariant::Secondary => '◐',
        BadgeVariant::Outline => '○',
    };
    format!("{} {}", marker, quality)
}

fn optional(value: Option<f64>, render: impl Fn(f64) -> String) -> String {
    value.map(render).unwrap_or_else(|| MISSING.to_string())
}

pub fn profile_columns() -> Vec<ColumnSpec<Profile>> {
    vec![
        ColumnSpec::new("Profile ID", Some(ProfileField::Id), |p| p.id.to_string()),
        ColumnSpec::new("Data File", Some(ProfileField::File), |p| p.file.clone()),
        ColumnSpec::new("Location", Some(ProfileField::Lat), |p| {
            format!("{}, {}", p.lat_label(), p.lon_label())
        }),
        ColumnSpec::new("Date", Some(ProfileField::Date), |p| {
            p.date.format("%Y-%m-%d").to_string()
        }),
        ColumnSpec::new("Surface T°", Some(ProfileField::SurfaceTemp), |p| {
            optional(p.surfacetemp, |t| format!("{}°C", t))
        }),
        ColumnSpec::new("Surface Sal", Some(ProfileField::SurfaceSal), |p| {
            optional(p.surfacesal, |s| format!("{} PSU", s))
        }),
        ColumnSpec::new("MLD (m)", Some(ProfileField::Mld), |p| {
            optional(p.mld, |d| format!("{:.1}m", d))
        }),
        ColumnSpec::new("Thermocline", Some(ProfileField::ThermoclineDepth), |p| {
            optional(p.thermoclinedepth, |d| format!("{:.1}m", d))
        }),
        ColumnSpec::new("OHC (0-200m)", Some(ProfileField::Ohc0To200m), |p| {
            optional(p.ohc_gj_per_m2(), |ohc| format!("{:.1} GJ/m²", ohc))
        }),
        ColumnSpec::new("Quality", Some(ProfileField::Quality), |p| quality_label(&p.quality)),
    ]
}

pub fn measurement_columns() -> Vec<ColumnSpec<Measurement>> {
    vec![
        ColumnSpec::new("ID", Some(MeasurementField::Id), |m| m.id.to_string()),
        ColumnSpec::new("Profile", Some(MeasurementField::ProfileId), |m| m.profile_id.clone()),
        ColumnSpec::new("Depth (m)", Some(MeasurementField::Depth), |m| format!("{:.1}", m.depth)),
        ColumnSpec::new("Temperature (°C)", Some(MeasurementField::Temperature), |m| {
            format!("{:.2}", m.temperature)
        }),
        ColumnSpec::new("Salinity (PSU)", Some(MeasurementField::Salinity), |m| {
            format!("{:.2}", m.salinity)
        }),
        ColumnSpec::new("Pressure (dbar)", Some(MeasurementField::Pressure), |m| {
            format!("{:.1}", m.pressure)
        }),
        ColumnSpec::new("Oxygen (μmol/kg)", Some(MeasurementField::Oxygen), |m| {
            format!("{:.1}", m.oxygen)
        }),
        ColumnSpec::new("pH", Some(MeasurementField::Ph), |m| format!("{:.2}", m.ph)),
        ColumnSpec::new("Quality", Some(MeasurementField::Quality), |m| quality_label(&m.quality)),
        ColumnSpec::new("Timestamp", Some(MeasurementField::Timestamp), |m| {
            m.timestamp.format("%Y-%m-%d %H:%M").to_string()
        }),
    ]
}

fn truncate(text: String, max_width: usize) -> String {
    if max_width == 0 || text.chars().count() <= max_width {
        return text;
    }
    let mut cut: String = text.chars().take(max_width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.chars().count());
    format!("{}{}", text, " ".repeat(fill))
}

/// Render a page as an aligned text table followed by the pager line
pub fn render_text_table<R: TableRecord>(
    page: &TablePage<'_, R>,
    columns: &[ColumnSpec<R>],
    sort: SortState<R::Field>,
    config: &TableConfig,
) -> String {
    let mut header = Vec::new();
    if config.show_selection {
        let mark = if page.page_fully_selected { "[x]" } else { "[ ]" };
        header.push(mark.to_string());
    }
    if config.show_row_numbers {
        header.push("#".to_string());
    }
    header.extend(columns.iter().map(|column| column.header_label(sort)));

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(page.rows.len());
    for (offset, record) in page.rows.iter().enumerate() {
        let mut cells = Vec::with_capacity(header.len());
        if config.show_selection {
            let mark = if page.is_selected(record) { "[x]" } else { "[ ]" };
            cells.push(mark.to_string());
        }
        if config.show_row_numbers {
            cells.push((page.info.page_start + offset).to_string());
        }
        for column in columns {
            cells.push(truncate((column.cell)(record), config.max_cell_width));
        }
        rows.push(cells);
    }

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", join_cells(&header, &widths));
    let rule: Vec<String> = widths.iter().map(|&w| "─".repeat(w)).collect();
    let _ = writeln!(out, "{}", rule.join("─┼─"));
    if rows.is_empty() {
        let _ = writeln!(out, "No records match the current filters");
    }
    for cells in &rows {
        let _ = writeln!(out, "{}", join_cells(cells, &widths));
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", pager_line(page, config));
    out
}

fn join_cells(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| pad(cell, width))
        .collect::<Vec<_>>()
        .join(" │ ")
        .trim_end()
        .to_string()
}

fn pager_line<R>(page: &TablePage<'_, R>, config: &TableConfig) -> String {
    let info = &page.info;
    let mut line = format!(
        "Showing {} to {} of {} results",
        info.page_start, info.page_end, info.total_count
    );
    if info.total_pages > 0 {
        let mut nav = Vec::new();
        if info.has_previous() {
            nav.push("‹ Previous".to_string());
        }
        nav.extend(info.page_buttons(config.max_page_buttons).map(|n| {
            if n == info.current_page {
                format!("[{}]", n)
            } else {
                n.to_string()
            }
        }));
        if info.has_next() {
            nav.push("Next ›".to_string());
        }
        let _ = write!(line, " | {}", nav.join(" "));
    }
    if !page.selection.is_empty() {
        let _ = write!(line, " | {} selected", page.selection.len());
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::TableView;
    use argo_core::settings::TableSettings;
    use argo_core::view_state::ViewState;
    use argo_data::MockSource;

    #[test]
    fn test_profile_cells() {
        let profiles = MockSource::sample_profiles();
        let columns = profile_columns();
        let cells: Vec<String> = columns.iter().map(|c| (c.cell)(&profiles[0])).collect();

        assert_eq!(cells[0], "1");
        assert_eq!(cells[1], "D1901393_001.nc");
        assert_eq!(cells[2], "5.20°S, 67.80°E");
        assert_eq!(cells[3], "2023-06-15");
        assert_eq!(cells[4], "28.5°C");
        assert_eq!(cells[5], "35.2 PSU");
        assert_eq!(cells[6], "45.5m");
        assert_eq!(cells[8], "2.8 GJ/m²");
        assert_eq!(cells[9], "● excellent");
    }

    #[test]
    fn test_missing_values_render_placeholder() {
        let mut profile = MockSource::sample_profiles().remove(1);
        profile.mld = None;
        profile.quality = Quality::Other("unchecked".into());
        let columns = profile_columns();

        assert_eq!((columns[6].cell)(&profile), MISSING);
        assert_eq!((columns[9].cell)(&profile), "○ unchecked");
    }

    #[test]
    fn test_header_marks_active_sort() {
        let columns = profile_columns();
        let sort = SortState::new(ProfileField::Date, SortDirection::Desc);
        assert_eq!(columns[3].header_label(sort), "Date ▼");
        assert_eq!(columns[0].header_label(sort), "Profile ID");
    }

    #[test]
    fn test_text_table() {
        let view = TableView::new("profiles", MockSource::sample_profiles().into());
        let state: ViewState<ProfileField> = TableSettings::default().profile_view().with_page_size(5);
        let state = view.toggle_row(&state, 6);
        let page = view.render(&state);

        let text = render_text_table(&page, &profile_columns(), state.sort, &view.config);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].contains("Date ▼"));
        // Newest profile first and selected
        assert!(lines[2].starts_with("[x] │ 1 "));
        assert!(lines[2].contains("D1901398_006.nc"));
        assert_eq!(
            lines.last().copied(),
            Some("Showing 1 to 5 of 6 results | [1] 2 Next › | 1 selected")
        );
    }

    #[test]
    fn test_empty_text_table() {
        let view = TableView::new("measurements", MockSource::sample_measurements(7).into());
        let state = TableSettings::default().measurement_view().with_query("nothing-here");
        let page = view.render(&state);

        let text = render_text_table(&page, &measurement_columns(), state.sort, &view.config);
        assert!(text.contains("No records match the current filters"));
        assert!(text.ends_with("Showing 0 to 0 of 0 results\n"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abcdef".into(), 4), "abc…");
        assert_eq!(truncate("abc".into(), 4), "abc");
        assert_eq!(truncate("abcdef".into(), 0), "abcdef");
    }
}
