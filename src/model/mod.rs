mod table;

use serde::Deserialize;

pub use table::{
    aggregate_percent, derive_rows, format_thousands, round_tenths, sort_rows, CellValue, Column,
    SkillRow, SortDirection, SortState, COLUMNS, MAX_XP, OVERALL,
};

/// One skill as returned by the stats endpoint. `rank == -1` means the
/// player is not placed on the leaderboard for that skill.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SkillRecord {
    pub id: i64,
    pub name: String,
    pub rank: i64,
    pub level: i64,
    pub xp: i64,
}

/// Top-level payload of the stats endpoint. Typed deserialization is the
/// shape check; anything that does not decode is an invalid response.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct StatsResponse {
    pub skills: Vec<SkillRecord>,
}

/// Completion events sent back from lookup tasks. `seq` tags the submit
/// that started the task so stale completions can be discarded.
#[derive(Clone, Debug)]
pub enum AppEvent {
    LookupLoaded { seq: u64, stats: StatsResponse },
    LookupFailed { seq: u64, message: String },
}

/// Which control keyboard input is routed to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Search,
    Table,
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub username: String,
    pub fetching: bool,
    pub stats: Option<StatsResponse>,
    pub error: Option<String>,
    pub sort: SortState,
    pub focus: Focus,
    seq: u64,
}

impl AppState {
    /// Start a lookup: clear the previous result and error, raise the
    /// fetching flag, and hand out the sequence tag for this submit.
    pub fn begin_lookup(&mut self) -> u64 {
        self.fetching = true;
        self.stats = None;
        self.error = None;
        self.seq += 1;
        self.seq
    }

    /// Fold a completion event into the state. Only the most recent
    /// lookup's outcome may ever be displayed; older tags are dropped.
    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::LookupLoaded { seq, stats } => {
                if seq != self.seq {
                    return;
                }
                self.stats = Some(stats);
                self.error = None;
                self.fetching = false;
            }
            AppEvent::LookupFailed { seq, message } => {
                if seq != self.seq {
                    return;
                }
                self.stats = None;
                self.error = Some(message);
                self.fetching = false;
            }
        }
    }

    pub fn click_column(&mut self, column: Column) {
        self.sort.click(column);
    }
}
