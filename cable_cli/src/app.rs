//! Application state and key handling.
//!
//! The app owns the active catalog source, the editable form fields and the
//! last calculation. A failed parse or range check leaves the previous
//! results on screen; only a successful calculation replaces them.

use cable_core::calculations::system::{self, Arrangement, SystemInput, SystemResult};
use crossterm::event::{KeyCode, KeyEvent};

use crate::source::CatalogSource;
use cable_core::CableRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    System,
    CableData,
}

impl Tab {
    pub fn index(&self) -> usize {
        match self {
            Tab::System => 0,
            Tab::CableData => 1,
        }
    }

    pub fn toggle(&self) -> Tab {
        match self {
            Tab::System => Tab::CableData,
            Tab::CableData => Tab::System,
        }
    }
}

/// Which input row of the System form has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Voltage,
    Power,
    PowerFactor,
    Length,
    Arrangement,
    Size,
}

impl Focus {
    const ORDER: [Focus; 6] = [
        Focus::Voltage,
        Focus::Power,
        Focus::PowerFactor,
        Focus::Length,
        Focus::Arrangement,
        Focus::Size,
    ];

    fn next(&self) -> Focus {
        let i = Self::ORDER.iter().position(|f| f == self).unwrap_or(0);
        Self::ORDER[(i + 1) % Self::ORDER.len()]
    }

    fn previous(&self) -> Focus {
        let i = Self::ORDER.iter().position(|f| f == self).unwrap_or(0);
        Self::ORDER[(i + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

pub struct App {
    pub source: CatalogSource,
    pub records: Vec<CableRecord>,
    pub sizes: Vec<u32>,

    pub tab: Tab,
    pub focus: Focus,

    pub voltage_input: String,
    pub power_input: String,
    pub pf_input: String,
    pub length_input: String,
    pub arrangement_idx: usize,
    pub size_idx: usize,
    pub table_offset: usize,

    /// Last successful calculation: the parsed input and its results
    pub results: Option<(SystemInput, SystemResult)>,
    pub error: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(source: CatalogSource) -> Self {
        let records = source.records();
        let sizes = source.sizes();
        let defaults = SystemInput::default();
        let size_idx = sizes
            .iter()
            .position(|&s| s == defaults.size_mm2)
            .unwrap_or(0);

        App {
            source,
            records,
            sizes,
            tab: Tab::System,
            focus: Focus::Voltage,
            voltage_input: "33.0".to_string(),
            power_input: "10.0".to_string(),
            pf_input: "0.95".to_string(),
            length_input: "1.0".to_string(),
            arrangement_idx: 0,
            size_idx,
            table_offset: 0,
            results: None,
            error: None,
            should_quit: false,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.tab = self.tab.toggle();
                return;
            }
            KeyCode::Enter | KeyCode::F(5) => {
                self.calculate();
                return;
            }
            _ => {}
        }
        match self.tab {
            Tab::System => self.on_system_key(key),
            Tab::CableData => self.on_table_key(key),
        }
    }

    fn on_system_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.focus = self.focus.previous(),
            KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::Left => self.cycle_selection(-1),
            KeyCode::Right => self.cycle_selection(1),
            KeyCode::Backspace => {
                if let Some(field) = self.focused_field_mut() {
                    field.pop();
                }
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                if let Some(field) = self.focused_field_mut() {
                    field.push(c);
                }
            }
            _ => {}
        }
    }

    fn on_table_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.table_offset = self.table_offset.saturating_sub(1),
            KeyCode::Down => {
                if self.table_offset + 1 < self.records.len() {
                    self.table_offset += 1;
                }
            }
            _ => {}
        }
    }

    fn cycle_selection(&mut self, step: isize) {
        match self.focus {
            Focus::Arrangement => {
                let len = Arrangement::ALL.len() as isize;
                self.arrangement_idx =
                    (self.arrangement_idx as isize + step).rem_euclid(len) as usize;
            }
            Focus::Size if !self.sizes.is_empty() => {
                let len = self.sizes.len() as isize;
                self.size_idx = (self.size_idx as isize + step).rem_euclid(len) as usize;
            }
            _ => {}
        }
    }

    fn focused_field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Voltage => Some(&mut self.voltage_input),
            Focus::Power => Some(&mut self.power_input),
            Focus::PowerFactor => Some(&mut self.pf_input),
            Focus::Length => Some(&mut self.length_input),
            _ => None,
        }
    }

    pub fn selected_arrangement(&self) -> Arrangement {
        Arrangement::ALL[self.arrangement_idx]
    }

    pub fn selected_size(&self) -> u32 {
        self.sizes.get(self.size_idx).copied().unwrap_or(0)
    }

    /// Parse the form fields into a calculation input.
    pub fn build_input(&self) -> Result<SystemInput, String> {
        Ok(SystemInput {
            voltage_kv: parse_field(&self.voltage_input, "Voltage")?,
            power_mva: parse_field(&self.power_input, "Apparent power")?,
            power_factor: parse_field(&self.pf_input, "Power factor")?,
            length_km: parse_field(&self.length_input, "Cable length")?,
            arrangement: self.selected_arrangement(),
            size_mm2: self.selected_size(),
        })
    }

    /// Run the engine on the current form state. Parse or range failures
    /// set the validation message and keep the previous results visible.
    pub fn calculate(&mut self) {
        let input = match self.build_input() {
            Ok(input) => input,
            Err(message) => {
                self.error = Some(message);
                return;
            }
        };
        // A missing size yields the placeholder record: the engine then
        // reports an all-zero result instead of failing.
        let cable = self
            .source
            .record_by_size(input.size_mm2)
            .unwrap_or_default();
        match system::calculate(&input, &cable) {
            Ok(result) => {
                self.results = Some((input, result));
                self.error = None;
            }
            Err(err) => self.error = Some(err.to_string()),
        }
    }
}

fn parse_field(value: &str, label: &str) -> Result<f64, String> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("{label} must be a valid number"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        App::new(CatalogSource::Builtin)
    }

    #[test]
    fn test_defaults_select_240() {
        let app = test_app();
        assert_eq!(app.selected_size(), 240);
        assert_eq!(app.selected_arrangement(), Arrangement::TrefoilTouching);
    }

    #[test]
    fn test_calculate_with_defaults() {
        let mut app = test_app();
        app.calculate();
        assert!(app.error.is_none());
        let (input, result) = app.results.expect("defaults should calculate");
        assert_eq!(input.size_mm2, 240);
        assert!((result.current_a - 174.95).abs() < 0.01);
    }

    #[test]
    fn test_parse_error_keeps_previous_results() {
        let mut app = test_app();
        app.calculate();
        let previous = app.results;

        app.voltage_input = "33..0".to_string();
        app.calculate();

        assert!(app.error.as_deref().unwrap().contains("Voltage"));
        assert_eq!(app.results, previous);
    }

    #[test]
    fn test_range_error_keeps_previous_results() {
        let mut app = test_app();
        app.calculate();
        let previous = app.results;

        app.pf_input = "1.5".to_string();
        app.calculate();

        assert!(app.error.is_some());
        assert_eq!(app.results, previous);
    }

    #[test]
    fn test_typing_edits_focused_field() {
        let mut app = test_app();
        app.focus = Focus::Length;
        app.length_input.clear();
        app.on_key(KeyEvent::from(KeyCode::Char('2')));
        app.on_key(KeyEvent::from(KeyCode::Char('.')));
        app.on_key(KeyEvent::from(KeyCode::Char('5')));
        assert_eq!(app.length_input, "2.5");
        app.on_key(KeyEvent::from(KeyCode::Backspace));
        assert_eq!(app.length_input, "2.");
    }

    #[test]
    fn test_tab_and_quit_keys() {
        let mut app = test_app();
        app.on_key(KeyEvent::from(KeyCode::Tab));
        assert_eq!(app.tab, Tab::CableData);
        app.on_key(KeyEvent::from(KeyCode::Char('q')));
        assert!(app.should_quit);
    }
}
