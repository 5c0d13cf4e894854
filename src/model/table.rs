use std::cmp::Ordering;

use super::{SkillRecord, StatsResponse};

/// Experience required for level 99 in a single skill.
pub const MAX_XP: i64 = 13_034_431;

/// Name of the synthetic aggregate record the hiscores API prepends.
/// It is a pre-summed total, not a trainable skill, so it never appears
/// in the row set or the aggregate percent.
pub const OVERALL: &str = "Overall";

/// A skill record plus its derived progress values. `percent_raw` is the
/// uncapped-precision figure used for aggregation; `percent` is the
/// tenths-rounded figure shown per row.
#[derive(Clone, Debug, PartialEq)]
pub struct SkillRow {
    pub id: i64,
    pub name: String,
    pub rank: i64,
    pub level: i64,
    pub xp: i64,
    pub percent_raw: f64,
    pub percent: f64,
}

impl SkillRow {
    fn from_record(record: &SkillRecord) -> Self {
        let percent_raw = 100.0 * record.xp.min(MAX_XP) as f64 / MAX_XP as f64;
        Self {
            id: record.id,
            name: record.name.clone(),
            rank: record.rank,
            level: record.level,
            xp: record.xp,
            percent_raw,
            percent: round_tenths(percent_raw),
        }
    }
}

/// The displayed columns, in display order. `id` is identity only and is
/// deliberately absent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Column {
    Name,
    Level,
    Xp,
    Rank,
    Percent,
}

pub const COLUMNS: [Column; 5] = [
    Column::Name,
    Column::Level,
    Column::Xp,
    Column::Rank,
    Column::Percent,
];

/// Typed cell value returned by a column accessor. Each column yields
/// exactly one kind, which is what makes the comparator total.
#[derive(Debug, PartialEq)]
pub enum CellValue<'a> {
    Text(&'a str),
    Number(f64),
}

impl Column {
    pub fn title(self) -> &'static str {
        match self {
            Column::Name => "Name",
            Column::Level => "Level",
            Column::Xp => "XP",
            Column::Rank => "Rank",
            Column::Percent => "Percent to 99",
        }
    }

    pub fn value(self, row: &SkillRow) -> CellValue<'_> {
        match self {
            Column::Name => CellValue::Text(&row.name),
            Column::Level => CellValue::Number(row.level as f64),
            Column::Xp => CellValue::Number(row.xp as f64),
            Column::Rank => CellValue::Number(row.rank as f64),
            Column::Percent => CellValue::Number(row.percent_raw),
        }
    }

    /// Cell text, including the unranked sentinel which overrides the
    /// numeric formatter.
    pub fn display_text(self, row: &SkillRow) -> String {
        match self {
            Column::Name => row.name.clone(),
            Column::Level => row.level.to_string(),
            Column::Xp => format_thousands(row.xp),
            Column::Rank => {
                if row.rank == -1 {
                    "unranked".to_string()
                } else {
                    format_thousands(row.rank)
                }
            }
            Column::Percent => format!("{:.1}", row.percent),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Tri-state sort selection. `Default` is the unsorted state, which leaves
/// rows in API order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SortState {
    pub column: Option<Column>,
    pub direction: Option<SortDirection>,
}

impl SortState {
    /// Header-click cycle: unsorted → asc → desc → unsorted on the same
    /// column; a different column always restarts at ascending.
    pub fn click(&mut self, column: Column) {
        if self.column != Some(column) {
            self.column = Some(column);
            self.direction = Some(SortDirection::Asc);
            return;
        }
        match self.direction {
            None => self.direction = Some(SortDirection::Asc),
            Some(SortDirection::Asc) => self.direction = Some(SortDirection::Desc),
            Some(SortDirection::Desc) => {
                self.column = None;
                self.direction = None;
            }
        }
    }

    pub fn indicator(&self, column: Column) -> Option<&'static str> {
        if self.column != Some(column) {
            return None;
        }
        match self.direction? {
            SortDirection::Asc => Some("↑"),
            SortDirection::Desc => Some("↓"),
        }
    }
}

/// Round to one decimal, half away from zero at the tenths digit.
pub fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Derive display rows from a payload: drop the "Overall" aggregate and
/// compute both percent figures for every remaining skill.
pub fn derive_rows(stats: &StatsResponse) -> Vec<SkillRow> {
    stats
        .skills
        .iter()
        .filter(|record| record.name != OVERALL)
        .map(SkillRow::from_record)
        .collect()
}

/// Average the unrounded per-row percents, then round once. Averaging
/// already-rounded values would compound rounding error across skills.
/// An empty row set yields a defined 0.0 rather than NaN.
pub fn aggregate_percent(rows: &[SkillRow]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    let mean = rows.iter().map(|row| row.percent_raw).sum::<f64>() / rows.len() as f64;
    round_tenths(mean)
}

/// Sort in place per the current sort state. Unsorted is a no-op so API
/// order survives a full click cycle. `sort_by` is stable, so equal keys
/// retain their relative input order.
pub fn sort_rows(rows: &mut [SkillRow], sort: SortState) {
    let (Some(column), Some(direction)) = (sort.column, sort.direction) else {
        return;
    };
    rows.sort_by(|a, b| {
        let ordering = match (column.value(a), column.value(b)) {
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            (CellValue::Number(a), CellValue::Number(b)) => {
                a.partial_cmp(&b).unwrap_or(Ordering::Equal)
            }
            // Accessors yield one kind per column.
            _ => Ordering::Equal,
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, name: &str, rank: i64, level: i64, xp: i64) -> SkillRecord {
        SkillRecord {
            id,
            name: name.to_string(),
            rank,
            level,
            xp,
        }
    }

    fn stats(skills: Vec<SkillRecord>) -> StatsResponse {
        StatsResponse { skills }
    }

    #[test]
    fn percent_is_capped_at_the_ceiling() {
        let rows = derive_rows(&stats(vec![
            record(1, "Attack", 10, 99, MAX_XP),
            record(2, "Magic", 11, 99, 200_000_000),
        ]));
        assert_eq!(rows[0].percent_raw, 100.0);
        assert_eq!(rows[1].percent_raw, 100.0);
        assert_eq!(rows[1].percent, 100.0);
    }

    #[test]
    fn percent_below_the_ceiling_is_exact() {
        let rows = derive_rows(&stats(vec![record(1, "Mining", 5, 60, 273_742)]));
        assert_eq!(rows[0].percent_raw, 100.0 * 273_742.0 / MAX_XP as f64);
    }

    #[test]
    fn overall_is_excluded_from_rows_and_aggregate() {
        let rows = derive_rows(&stats(vec![
            record(1, "Attack", 100, 50, 100_000),
            record(2, "Overall", 1, 2000, 5_000_000),
            record(3, "Mining", -1, 1, 0),
        ]));
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.name != "Overall"));
        // Scenario from the original behavior: 0.767..% and 0% average
        // to 0.38..%, rounding to 0.4.
        assert_eq!(rows[0].percent, 0.8);
        assert_eq!(rows[1].percent, 0.0);
        assert_eq!(aggregate_percent(&rows), 0.4);
    }

    #[test]
    fn aggregate_averages_before_rounding() {
        // 5_214 xp → 0.04001..%, rounds down; 7_821 xp → 0.06000..%,
        // rounds up. Average-then-round gives 0.1; averaging the rounded
        // per-row values would give 0.05.
        let rows = derive_rows(&stats(vec![
            record(1, "Herblore", 9, 10, 5_214),
            record(2, "Slayer", 8, 12, 7_821),
        ]));
        assert_eq!(rows[0].percent, 0.0);
        assert_eq!(rows[1].percent, 0.1);
        let mean_of_rounded = (rows[0].percent + rows[1].percent) / 2.0;
        let aggregate = aggregate_percent(&rows);
        assert_eq!(aggregate, 0.1);
        assert_ne!(aggregate, mean_of_rounded);
    }

    #[test]
    fn aggregate_of_no_rows_is_zero() {
        let rows = derive_rows(&stats(vec![record(1, "Overall", 1, 2000, 5_000_000)]));
        assert!(rows.is_empty());
        assert_eq!(aggregate_percent(&rows), 0.0);
    }

    fn fixture_rows() -> Vec<SkillRow> {
        derive_rows(&stats(vec![
            record(1, "Mining", 40, 70, 800_000),
            record(2, "Attack", 10, 80, 2_000_000),
            record(3, "Cooking", 40, 60, 300_000),
        ]))
    }

    #[test]
    fn sorting_ascending_is_idempotent() {
        let sort = SortState {
            column: Some(Column::Xp),
            direction: Some(SortDirection::Asc),
        };
        let mut once = fixture_rows();
        sort_rows(&mut once, sort);
        let mut twice = once.clone();
        sort_rows(&mut twice, sort);
        assert_eq!(once, twice);
    }

    #[test]
    fn three_clicks_restore_api_order() {
        let original = fixture_rows();
        let mut sort = SortState::default();
        for _ in 0..3 {
            sort.click(Column::Level);
        }
        assert_eq!(sort, SortState::default());
        // Rows are derived fresh each render, so the unsorted state must
        // leave the API order untouched.
        let mut rows = original.clone();
        sort_rows(&mut rows, sort);
        assert_eq!(rows, original);
    }

    #[test]
    fn clicking_another_column_restarts_ascending() {
        let mut sort = SortState::default();
        sort.click(Column::Xp);
        sort.click(Column::Xp);
        assert_eq!(sort.direction, Some(SortDirection::Desc));
        sort.click(Column::Name);
        assert_eq!(sort.column, Some(Column::Name));
        assert_eq!(sort.direction, Some(SortDirection::Asc));
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let mut rows = fixture_rows();
        sort_rows(
            &mut rows,
            SortState {
                column: Some(Column::Rank),
                direction: Some(SortDirection::Asc),
            },
        );
        // Mining and Cooking share rank 40; Mining came first in the input.
        assert_eq!(rows[0].name, "Attack");
        assert_eq!(rows[1].name, "Mining");
        assert_eq!(rows[2].name, "Cooking");
    }

    #[test]
    fn textual_columns_compare_as_strings() {
        let mut rows = fixture_rows();
        sort_rows(
            &mut rows,
            SortState {
                column: Some(Column::Name),
                direction: Some(SortDirection::Desc),
            },
        );
        let names: Vec<&str> = rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, vec!["Mining", "Cooking", "Attack"]);
    }

    #[test]
    fn unranked_sentinel_overrides_the_rank_formatter() {
        let rows = derive_rows(&stats(vec![
            record(1, "Hunter", -1, 1, 0),
            record(2, "Farming", 0, 1, 0),
            record(3, "Fishing", 1_234_567, 50, 100_000),
        ]));
        assert_eq!(Column::Rank.display_text(&rows[0]), "unranked");
        assert_eq!(Column::Rank.display_text(&rows[1]), "0");
        assert_eq!(Column::Rank.display_text(&rows[2]), "1,234,567");
    }

    #[test]
    fn percent_displays_fixed_point_one_decimal() {
        let rows = derive_rows(&stats(vec![record(1, "Prayer", 2, 99, MAX_XP)]));
        assert_eq!(Column::Percent.display_text(&rows[0]), "100.0");
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(13_034_431), "13,034,431");
        assert_eq!(format_thousands(-5_000), "-5,000");
    }

    #[test]
    fn round_tenths_half_rounds_up() {
        assert_eq!(round_tenths(0.05), 0.1);
        assert_eq!(round_tenths(0.04), 0.0);
        assert_eq!(round_tenths(99.95), 100.0);
    }
}
