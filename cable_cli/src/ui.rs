//! Rendering.
//!
//! Layout mirrors the two-tab screen: a System tab with the input form and
//! the grouped output panel, and a Cable Data tab with the full parameter
//! table. All widgets are rebuilt from [`App`] state every frame.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{
    Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, Tabs,
};
use ratatui::Frame;

use cable_core::calculations::system::Arrangement;
use cable_core::CableRecord;

use crate::app::{App, Focus, Tab};

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_title_bar(frame, chunks[0]);
    draw_tabs(frame, chunks[1], app);
    match app.tab {
        Tab::System => draw_system_tab(frame, chunks[2], app),
        Tab::CableData => draw_cable_table(frame, chunks[2], app),
    }
    draw_status_bar(frame, chunks[3], app);
}

fn draw_title_bar(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            " Cable Design Tool ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            "Tab: switch tabs   Up/Down: move   Left/Right: select   q: quit ",
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(title).style(Style::default().bg(Color::Blue)),
        area,
    );
}

fn draw_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let tabs = Tabs::new(vec!["  System  ", "  Cable Data  "])
        .select(app.tab.index())
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn draw_system_tab(frame: &mut Frame, area: Rect, app: &App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(46), Constraint::Min(0)])
        .split(area);

    draw_input_pane(frame, cols[0], app);
    draw_output_pane(frame, cols[1], app);
}

fn draw_input_pane(frame: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(5),
            Constraint::Min(4),
            Constraint::Length(2),
        ])
        .split(area);

    let fields = vec![
        field_line("Voltage (L-L) [kV]", &app.voltage_input, app.focus == Focus::Voltage),
        field_line("Apparent Power [MVA]", &app.power_input, app.focus == Focus::Power),
        field_line("Power Factor", &app.pf_input, app.focus == Focus::PowerFactor),
        field_line("Cable Length [km]", &app.length_input, app.focus == Focus::Length),
    ];
    let editing = matches!(
        app.focus,
        Focus::Voltage | Focus::Power | Focus::PowerFactor | Focus::Length
    );
    frame.render_widget(
        Paragraph::new(fields).block(section_block(" System Parameters ", editing)),
        rows[0],
    );

    let arrangement_lines: Vec<Line> = Arrangement::ALL
        .iter()
        .enumerate()
        .map(|(i, arrangement)| {
            let marker = if i == app.arrangement_idx { "(x) " } else { "( ) " };
            let mut style = Style::default();
            if i == app.arrangement_idx {
                style = style.add_modifier(Modifier::BOLD);
                if app.focus == Focus::Arrangement {
                    style = style.add_modifier(Modifier::REVERSED);
                }
            }
            Line::from(Span::styled(
                format!(" {marker}{}", arrangement.display_name()),
                style,
            ))
        })
        .collect();
    frame.render_widget(
        Paragraph::new(arrangement_lines).block(section_block(
            " Arrangement ",
            app.focus == Focus::Arrangement,
        )),
        rows[1],
    );

    let items: Vec<ListItem> = app
        .sizes
        .iter()
        .map(|size| ListItem::new(format!("{size} mm2")))
        .collect();
    let highlight = if app.focus == Focus::Size {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let list = List::new(items)
        .block(section_block(" Conductor Size ", app.focus == Focus::Size))
        .highlight_style(highlight)
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(app.size_idx));
    frame.render_stateful_widget(list, rows[2], &mut state);

    let footer = match &app.error {
        Some(message) => Line::from(Span::styled(
            format!(" [!] {message}"),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(Span::styled(
            " Press [Enter] or [F5] to calculate",
            Style::default().add_modifier(Modifier::DIM),
        )),
    };
    frame.render_widget(Paragraph::new(footer), rows[3]);
}

fn draw_output_pane(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Calculated Outputs ");

    let Some((input, r)) = &app.results else {
        let hint = Paragraph::new(Line::from(Span::styled(
            "  Press [Enter] or [F5] to calculate...",
            Style::default().add_modifier(Modifier::DIM),
        )))
        .block(block);
        frame.render_widget(hint, area);
        return;
    };

    let lines = vec![
        Line::from(Span::styled(
            format!(
                "  {} mm2  -  {}",
                input.size_mm2,
                input.arrangement.display_name()
            ),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("  Length: ", Style::default().add_modifier(Modifier::DIM)),
            Span::styled(
                format!("{} km", fmt(input.length_km, 3)),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        section("Impedance"),
        output_row("R  (total)", fmt(r.resistance_ohm, 4), "Ohm"),
        output_row("X  (total)", fmt(r.reactance_ohm, 4), "Ohm"),
        output_row("Z  (total)", fmt(r.impedance_ohm, 4), "Ohm"),
        section("Load"),
        output_row("Apparent power", fmt(input.power_mva, 3), "MVA"),
        output_row("Active power", fmt(r.active_power_mw, 3), "MW"),
        output_row("Reactive power", fmt(r.reactive_power_mvar, 3), "Mvar"),
        output_row("Full-load current", fmt(r.current_a, 1), "A"),
        section("Voltage Drop"),
        output_row("dV (L-L)", fmt(r.voltage_drop_v, 1), "V"),
        output_row("dV", fmt(r.voltage_drop_pct, 2), "%"),
        section("Losses"),
        output_row("Resistive", fmt(r.resistive_loss_kw, 2), "kW"),
        output_row("Dielectric", fmt(r.dielectric_loss_kw, 2), "kW  (3-phase)"),
        output_row("Total Power Loss", fmt(r.loss_pct, 2), "%"),
        section("Capacitive"),
        output_row("Charging current", fmt(r.charging_current_a, 3), "A/phase"),
        Line::from(""),
        Line::from(Span::styled(
            "  NOTE: indicative results only.",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_cable_table(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let heading = vec![
        Line::from(Span::styled(
            " 33 kV XLPE Cable Electrical Data",
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .centered(),
        Line::from(Span::styled(
            format!(" Source: {}", app.source.describe()),
            Style::default().add_modifier(Modifier::DIM),
        ))
        .centered(),
    ];
    frame.render_widget(Paragraph::new(heading), chunks[0]);

    const HEADERS: [(&str, &str); 16] = [
        ("Size", "mm2"),
        ("DC Res", "20C"),
        ("AC Res", "Trefoil"),
        ("AC Res", "FlatTch"),
        ("AC Res", "FlatSpc"),
        ("X", "Trefoil"),
        ("X", "FlatTch"),
        ("X Flat", "Spaced"),
        ("Ins Res", "MOhm-km"),
        ("Cap", "uF/km"),
        ("Ic", "A/km"),
        ("Diel", "W/km"),
        ("Stress", "kV/mm"),
        ("Scr Res", "Ohm/km"),
        ("Z0 R", "Ohm/km"),
        ("Z0 X", "Ohm/km"),
    ];
    let header_cells: Vec<Cell> = HEADERS
        .iter()
        .map(|(top, bottom)| {
            Cell::from(Text::from(vec![
                Line::from(Span::styled(
                    *top,
                    Style::default().add_modifier(Modifier::BOLD),
                ))
                .centered(),
                Line::from(Span::styled(
                    *bottom,
                    Style::default().add_modifier(Modifier::DIM),
                ))
                .centered(),
            ]))
        })
        .collect();

    let rows: Vec<Row> = app
        .records
        .iter()
        .skip(app.table_offset)
        .map(record_row)
        .collect();

    let widths = [Constraint::Length(8); 16];
    let table = Table::new(rows, widths)
        .header(Row::new(header_cells).height(2))
        .column_spacing(1)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(table, chunks[1]);
}

fn record_row(cable: &CableRecord) -> Row<'static> {
    Row::new(vec![
        number_cell(cable.size_mm2.to_string()),
        number_cell(fmt(cable.max_dc_resistance_20c, 4)),
        number_cell(fmt(cable.ac_resistance_trefoil_touching, 4)),
        number_cell(fmt(cable.ac_resistance_flat_touching, 4)),
        number_cell(fmt_opt(cable.ac_resistance_flat_spaced, 4)),
        number_cell(fmt(cable.inductive_reactance_trefoil_touching, 4)),
        number_cell(fmt(cable.inductive_reactance_flat_touching, 4)),
        number_cell(fmt(cable.inductive_reactance_flat_spaced, 4)),
        number_cell(fmt(cable.insulation_resistance_20c, 0)),
        number_cell(fmt(cable.conductor_to_screen_capacitance, 3)),
        number_cell(fmt(cable.charging_current_per_phase, 3)),
        number_cell(fmt(cable.dielectric_loss_per_phase, 1)),
        number_cell(fmt(cable.max_dielectric_stress, 2)),
        number_cell(fmt(cable.screen_dc_resistance_20c, 4)),
        number_cell(fmt(cable.zero_sequence_resistance_20c, 4)),
        number_cell(fmt(cable.zero_sequence_reactance_50hz, 4)),
    ])
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let db_status = if app.source.is_persistent() {
        Span::styled(
            format!("{}  OK", app.source.describe()),
            Style::default().fg(Color::Green),
        )
    } else {
        Span::styled("unavailable", Style::default().fg(Color::Red))
    };
    let line = Line::from(vec![
        Span::styled(
            " F5/Enter = Calculate  |  DB: ",
            Style::default().add_modifier(Modifier::DIM),
        ),
        db_status,
        Span::raw("   "),
        Span::styled(
            format!(" CableDesign v{} ", env!("CARGO_PKG_VERSION")),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(Color::DarkGray)),
        area,
    );
}

fn section_block(title: &str, focused: bool) -> Block<'_> {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title)
}

fn field_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let value_style = if focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    Line::from(vec![
        Span::styled(
            format!(" {label:<21}: "),
            Style::default().add_modifier(Modifier::DIM),
        ),
        Span::styled(value.to_string(), value_style),
    ])
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  --- {title} "),
        Style::default().fg(Color::Cyan),
    ))
}

fn output_row(label: &str, value: String, unit: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {label:<18}"),
            Style::default().add_modifier(Modifier::DIM),
        ),
        Span::styled(
            format!("{value:>12}"),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {unit}"), Style::default().add_modifier(Modifier::DIM)),
    ])
}

fn fmt(value: f64, dp: usize) -> String {
    format!("{value:.dp$}")
}

fn fmt_opt(value: Option<f64>, dp: usize) -> String {
    match value {
        Some(v) => fmt(v, dp),
        None => "-".to_string(),
    }
}

fn number_cell(value: String) -> Cell<'static> {
    Cell::from(Line::from(value).right_aligned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_precision() {
        assert_eq!(fmt(0.0976, 4), "0.0976");
        assert_eq!(fmt(11000.0, 0), "11000");
        assert_eq!(fmt(1.35, 3), "1.350");
    }

    #[test]
    fn test_fmt_opt_absent_renders_dash() {
        assert_eq!(fmt_opt(None, 4), "-");
        assert_eq!(fmt_opt(Some(0.0972), 4), "0.0972");
    }
}
