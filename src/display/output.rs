use super::sink::RenderSink;
use crate::analysis::rank::RankTable;
use crate::config::DisplayTargets;
use crate::hub::HubView;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct MetricRow {
    metric: String,
    value: String,
}

/// Collects rendered targets and prints them as a terminal report.
pub struct TerminalSink {
    targets: DisplayTargets,
    rank_table: RankTable,
    texts: HashMap<String, String>,
    width: Option<String>,
    rank_id: Option<String>,
}

impl TerminalSink {
    pub fn new(targets: &DisplayTargets, rank_table: &RankTable) -> Self {
        TerminalSink {
            targets: targets.clone(),
            rank_table: rank_table.clone(),
            texts: HashMap::new(),
            width: None,
            rank_id: None,
        }
    }

    fn text(&self, id: &str) -> &str {
        self.texts.get(id).map(String::as_str).unwrap_or("-")
    }

    pub fn print(&self, view: &HubView) {
        let season = view.season.as_deref().unwrap_or("all seasons");
        println!(
            "\n{}",
            format!("📊 HUB STATS ({})", season).bold().cyan()
        );
        println!("{}\n", "=".repeat(40).cyan());

        let labelled = [
            ("Win Rate", &self.targets.win_rate, "%"),
            ("Total Matches", &self.targets.total, ""),
            ("KDA", &self.targets.kda, ""),
            ("Avg Kills", &self.targets.avg_kills, ""),
            ("MVP", &self.targets.mvp, "%"),
        ];
        let rows: Vec<MetricRow> = labelled
            .iter()
            .map(|(label, id, suffix)| MetricRow {
                metric: label.to_string(),
                value: format!("{}{}", self.text(id), suffix),
            })
            .collect();

        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{}", table);

        match &self.rank_id {
            Some(rank_id) => self.print_rank(rank_id),
            None => println!("\n{}", "No matches recorded for this season yet".yellow()),
        }

        println!(
            "\n{}",
            format!("Updated {}", view.computed_at.format("%Y-%m-%d %H:%M:%S UTC")).dimmed()
        );
    }

    fn print_rank(&self, rank_id: &str) {
        let name = self.text(&self.targets.rank_name);
        let accent = self
            .rank_table
            .tier_by_id(rank_id)
            .and_then(|tier| hex_to_rgb(&tier.color));
        let name = match accent {
            Some((r, g, b)) => name.truecolor(r, g, b).bold(),
            None => name.bold(),
        };

        println!(
            "\n{} {}  {} / {} RP",
            "🏆 Rank:".bold(),
            name,
            self.text(&self.targets.current_rp),
            self.text(&self.targets.next_rp)
        );

        let pct = self
            .width
            .as_deref()
            .and_then(|w| w.trim_end_matches('%').parse::<u64>().ok())
            .unwrap_or(0);
        let bar = ProgressBar::new(100);
        if let Ok(style) = ProgressStyle::with_template("   {bar:40.cyan/blue} {pos:>3}%") {
            bar.set_style(style.progress_chars("█▓░"));
        }
        bar.set_position(pct);
        bar.abandon();
    }
}

impl RenderSink for TerminalSink {
    fn set_text(&mut self, id: &str, value: &str) -> bool {
        let known =
            self.targets.metric_ids().contains(&id) || self.targets.rank_ids().contains(&id);
        if known {
            self.texts.insert(id.to_string(), value.to_string());
        }
        known
    }

    fn set_width(&mut self, id: &str, width: &str) -> bool {
        if id != self.targets.progress_fill {
            return false;
        }
        self.width = Some(width.to_string());
        true
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        if name == self.targets.theme_attribute {
            self.rank_id = Some(value.to_string());
        }
    }
}

fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return None,
    };
    let channel = |i: usize| u8::from_str_radix(expanded.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "✗ hub-stats:".red().bold(), error);
    eprintln!("{}", "  Set RUST_LOG=debug for details on skipped data.".dimmed());
}

pub fn display_watching(dir: &Path, interval_ms: u64) {
    println!(
        "{} Watching {} every {}ms (Ctrl+C to stop)",
        "👀".cyan(),
        dir.display().to_string().bold(),
        interval_ms
    );
}

pub fn display_summary(total: usize, season: Option<&str>) {
    println!("{} {}", "✓".green(), summary_line(total, season));
}

fn summary_line(total: usize, season: Option<&str>) -> String {
    let noun = if total == 1 { "match" } else { "matches" };
    match season {
        Some(season) => format!("{} {} summarized in season {}", total, noun, season),
        None => format!("{} {} summarized across all seasons", total, noun),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tier_colors() {
        assert_eq!(hex_to_rgb("#ffb86b"), Some((0xff, 0xb8, 0x6b)));
        assert_eq!(hex_to_rgb("#fff"), Some((0xff, 0xff, 0xff)));
        assert_eq!(hex_to_rgb("ffb86b"), None);
        assert_eq!(hex_to_rgb("#zzzzzz"), None);
    }

    #[test]
    fn summary_names_the_season_scope() {
        assert_eq!(summary_line(2, Some("S1")), "2 matches summarized in season S1");
        assert_eq!(summary_line(1, None), "1 match summarized across all seasons");
    }

    #[test]
    fn only_known_targets_are_accepted() {
        let targets = DisplayTargets::default();
        let mut sink = TerminalSink::new(&targets, &RankTable::default());

        assert!(sink.set_text("mKDA", "3.1"));
        assert!(!sink.set_text("mUnknown", "1"));
        assert!(sink.set_width("uiProgFill", "50%"));
        assert!(!sink.set_width("uiOther", "50%"));
        sink.set_attribute("data-rank", "thrall");

        assert_eq!(sink.text("mKDA"), "3.1");
        assert_eq!(sink.text("mTotal"), "-");
        assert_eq!(sink.rank_id.as_deref(), Some("thrall"));
    }
}
