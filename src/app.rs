use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::action::Action;
use crate::config::{Config, KeybindsConfig, parse_key};
use crate::system::platform::{NativeProvider, ProcessInfoProvider};
use crate::system::process::{SortColumn, rank_processes};
use crate::system::sampler::ProcessSampler;
use crate::system::snapshot::MemorySnapshot;

pub type DynSampler = ProcessSampler<Box<dyn ProcessInfoProvider>>;

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub cycle_sort: KeyCode,
    pub reverse: KeyCode,
    pub refresh: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            cycle_sort: parse_key(&kb.cycle_sort).unwrap_or(KeyCode::Char('s')),
            reverse: parse_key(&kb.reverse).unwrap_or(KeyCode::Char('r')),
            refresh: parse_key(&kb.refresh).unwrap_or(KeyCode::Char(' ')),
        }
    }

    /// (key label, description) pairs for the status bar.
    pub fn hints(&self) -> Vec<(String, &'static str)> {
        vec![
            (key_label(self.quit), "Quit"),
            (key_label(self.cycle_sort), "Sort"),
            (key_label(self.reverse), "Reverse"),
            (key_label(self.refresh), "Refresh"),
            ("1-6".to_string(), "Column"),
        ]
    }
}

fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        _ => "?".to_string(),
    }
}

pub struct App {
    pub running: bool,
    sampler: DynSampler,
    pub snapshot: MemorySnapshot,
    pub sort_column: SortColumn,
    pub descending: bool,
    pub keybinds: ResolvedKeybinds,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self::with_provider(config, Box::new(NativeProvider::new()))
    }

    pub fn with_provider(config: &Config, provider: Box<dyn ProcessInfoProvider>) -> Self {
        let sort_column =
            SortColumn::from_str_config(&config.general.default_sort).unwrap_or_default();
        let descending = config.general.descending;
        let mut sampler = ProcessSampler::with_provider(provider);
        let snapshot = sampler.sample(sort_column, descending);

        App {
            running: true,
            sampler,
            snapshot,
            sort_column,
            descending,
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
        }
    }

    pub fn refresh_data(&mut self) {
        self.snapshot = self.sampler.sample(self.sort_column, self.descending);
    }

    /// Reorder the current snapshot without sampling again. Membership is
    /// fixed by memory, so reordering the held list matches what the next
    /// sample will show; an early sample would also zero every CPU figure.
    fn resort(&mut self) {
        let processes = std::mem::take(&mut self.snapshot.top_processes);
        self.snapshot.top_processes = rank_processes(processes, self.sort_column, self.descending);
        self.snapshot.sort_column = self.sort_column;
        self.snapshot.descending = self.descending;
        debug!(column = ?self.sort_column, descending = self.descending, "resorted");
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        let kb = &self.keybinds;
        let code = key.code;
        if code == kb.quit {
            return Action::Quit;
        }
        if code == kb.cycle_sort {
            return Action::CycleSort;
        }
        if code == kb.reverse {
            return Action::ReverseSort;
        }
        if code == kb.refresh {
            return Action::Refresh;
        }
        if let KeyCode::Char(c) = code
            && let Some(digit) = c.to_digit(10)
            && (1..=SortColumn::ALL.len() as u32).contains(&digit)
        {
            return Action::SortBy(SortColumn::ALL[digit as usize - 1]);
        }

        Action::None
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::CycleSort => {
                self.sort_column = self.sort_column.next();
                self.resort();
            }
            Action::ReverseSort => {
                self.descending = !self.descending;
                self.resort();
            }
            Action::SortBy(column) => {
                if column == self.sort_column {
                    self.descending = !self.descending;
                } else {
                    self.sort_column = column;
                }
                self.resort();
            }
            Action::Refresh => self.refresh_data(),
            Action::None => {}
        }
    }
}
