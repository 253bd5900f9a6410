//! Terminal summaries of scoring results

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;
use serde::Serialize;

use crate::pipeline::{DivergenceTable, IvTable, RocCurve};
use crate::utils::{format_metric, print_section_header};

/// Conventional reading of an information value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IvStrength {
    Useless,
    Weak,
    Medium,
    Strong,
    Suspicious,
}

impl IvStrength {
    pub fn from_iv(iv: f64) -> Self {
        if iv.is_nan() || iv > 0.5 {
            IvStrength::Suspicious
        } else if iv > 0.3 {
            IvStrength::Strong
        } else if iv > 0.1 {
            IvStrength::Medium
        } else if iv >= 0.02 {
            IvStrength::Weak
        } else {
            IvStrength::Useless
        }
    }

    fn color(&self) -> Color {
        match self {
            IvStrength::Useless => Color::DarkGrey,
            IvStrength::Weak => Color::Yellow,
            IvStrength::Medium => Color::Cyan,
            IvStrength::Strong => Color::Green,
            IvStrength::Suspicious => Color::Red,
        }
    }
}

impl std::fmt::Display for IvStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            IvStrength::Useless => "useless",
            IvStrength::Weak => "weak",
            IvStrength::Medium => "medium",
            IvStrength::Strong => "strong",
            IvStrength::Suspicious => "suspicious",
        };
        write!(f, "{}", label)
    }
}

fn header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|n| Cell::new(n).add_attribute(Attribute::Bold))
        .collect()
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

/// IV per feature, strongest first.
pub fn iv_summary_table(iv: &IvTable) -> Table {
    let mut rows: Vec<_> = iv.rows.iter().collect();
    rows.sort_by(|a, b| b.iv.total_cmp(&a.iv));

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Feature", "IV", "Strength"]));

    for row in rows {
        let strength = IvStrength::from_iv(row.iv);
        table.add_row(vec![
            Cell::new(&row.feature_name),
            Cell::new(format_metric(row.iv)).fg(strength.color()),
            Cell::new(strength).fg(strength.color()),
        ]);
    }
    table
}

pub fn display_iv_summary(iv: &IvTable) {
    print_section_header("INFORMATION VALUE");
    print_indented(&iv_summary_table(iv));
}

/// Divergence per feature, in column order.
pub fn divergence_summary_table(divergence: &DivergenceTable) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Feature", "Jeffrey Divergence"]));

    for row in &divergence.rows {
        let color = if row.divergence.is_finite() {
            Color::White
        } else {
            Color::Red
        };
        table.add_row(vec![
            Cell::new(&row.feature_name),
            Cell::new(format_metric(row.divergence)).fg(color),
        ]);
    }
    table
}

pub fn display_divergence_summary(divergence: &DivergenceTable) {
    print_section_header("JEFFREY DIVERGENCE");
    print_indented(&divergence_summary_table(divergence));
}

/// AUC, KS and Gini of one scored sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankingSummary {
    pub auc: f64,
    pub ks: f64,
    pub gini: f64,
}

impl RankingSummary {
    pub fn from_curve(curve: &RocCurve) -> Self {
        let auc = curve.auc();
        Self {
            auc,
            ks: curve.ks(),
            gini: 2.0 * auc - 1.0,
        }
    }

    pub fn table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(header(&["Metric", "Value"]));
        table.add_row(vec![Cell::new("ROC AUC"), Cell::new(format_metric(self.auc))]);
        table.add_row(vec![Cell::new("KS"), Cell::new(format_metric(self.ks))]);
        table.add_row(vec![
            Cell::new("Gini"),
            Cell::new(format_metric(self.gini))
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
        table
    }

    pub fn display(&self) {
        print_section_header("RANKING METRICS");
        print_indented(&self.table());
    }
}

/// Outcome of running the null-ratio and mode-ratio selectors
#[derive(Debug, Default)]
pub struct SelectionSummary {
    pub initial_features: usize,
    pub final_features: usize,
    pub dropped_null: Vec<String>,
    pub dropped_mode: Vec<String>,
}

impl SelectionSummary {
    pub fn new(initial_features: usize) -> Self {
        Self {
            initial_features,
            final_features: initial_features,
            ..Default::default()
        }
    }

    pub fn add_null_drops(&mut self, features: Vec<String>) {
        self.final_features = self.final_features.saturating_sub(features.len());
        self.dropped_null = features;
    }

    pub fn add_mode_drops(&mut self, features: Vec<String>) {
        self.final_features = self.final_features.saturating_sub(features.len());
        self.dropped_mode = features;
    }

    /// Share of features removed, in percent.
    pub fn reduction_pct(&self) -> f64 {
        if self.initial_features == 0 {
            return 0.0;
        }
        (self.initial_features - self.final_features) as f64 / self.initial_features as f64 * 100.0
    }

    pub fn table(&self) -> Table {
        let drop_color = |dropped: &[String]| {
            if dropped.is_empty() {
                Color::White
            } else {
                Color::Red
            }
        };

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(header(&["Metric", "Value"]));
        table.add_row(vec![
            Cell::new("Initial Features"),
            Cell::new(self.initial_features),
        ]);
        table.add_row(vec![
            Cell::new("Dropped (Null Ratio)"),
            Cell::new(self.dropped_null.len()).fg(drop_color(&self.dropped_null)),
        ]);
        table.add_row(vec![
            Cell::new("Dropped (Mode Ratio)"),
            Cell::new(self.dropped_mode.len()).fg(drop_color(&self.dropped_mode)),
        ]);
        table.add_row(vec![
            Cell::new("Final Features"),
            Cell::new(self.final_features)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("Reduction"),
            Cell::new(format!("{:.1}%", self.reduction_pct())).add_attribute(Attribute::Bold),
        ]);
        table
    }

    pub fn display(&self) {
        print_section_header("SELECTION SUMMARY");
        print_indented(&self.table());

        for (title, dropped) in [
            ("High Null Ratio", &self.dropped_null),
            ("Near-Constant", &self.dropped_mode),
        ] {
            if dropped.is_empty() {
                continue;
            }
            println!();
            println!(
                "      {} {}:",
                style(title).yellow(),
                style(format!("({})", dropped.len())).dim()
            );
            for feature in dropped {
                println!("        {} {}", style("•").dim(), feature);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::IvRow;

    #[test]
    fn test_iv_strength_buckets() {
        assert_eq!(IvStrength::from_iv(0.01), IvStrength::Useless);
        assert_eq!(IvStrength::from_iv(0.05), IvStrength::Weak);
        assert_eq!(IvStrength::from_iv(0.2), IvStrength::Medium);
        assert_eq!(IvStrength::from_iv(0.4), IvStrength::Strong);
        assert_eq!(IvStrength::from_iv(f64::INFINITY), IvStrength::Suspicious);
    }

    #[test]
    fn test_iv_table_sorted_descending() {
        let iv = IvTable {
            rows: vec![
                IvRow { feature_name: "low".into(), iv: 0.01 },
                IvRow { feature_name: "high".into(), iv: 0.4 },
            ],
        };
        let rendered = iv_summary_table(&iv).to_string();
        let high = rendered.find("high").unwrap();
        let low = rendered.find("low").unwrap();
        assert!(high < low);
    }

    #[test]
    fn test_ranking_summary_gini() {
        let curve = RocCurve {
            tpr: vec![0.5, 1.0, 1.0, 1.0],
            fpr: vec![0.0, 0.0, 0.5, 1.0],
        };
        let summary = RankingSummary::from_curve(&curve);
        assert!((summary.gini - 1.0).abs() < 1e-12);
        assert!(summary.table().to_string().contains("Gini"));
    }

    #[test]
    fn test_selection_summary_counts() {
        let mut summary = SelectionSummary::new(4);
        summary.add_null_drops(vec!["b".to_string()]);
        summary.add_mode_drops(vec!["c".to_string()]);
        assert_eq!(summary.final_features, 2);
        assert!((summary.reduction_pct() - 50.0).abs() < 1e-12);
    }
}
