//! Preparation summary report

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{PrepOutput, StageRecord};

/// Summary of a preparation run
#[derive(Debug, Default)]
pub struct PrepSummary {
    pub loaded_rows: usize,
    pub loaded_columns: usize,
    pub stages: Vec<StageRecord>,
    pub train_rows: usize,
    pub oos_rows: usize,
    pub unassigned_rows: usize,
    pub numeric_columns: usize,
    pub load_time: Duration,
    pub write_time: Duration,
}

impl PrepSummary {
    pub fn new(loaded_rows: usize, loaded_columns: usize) -> Self {
        Self {
            loaded_rows,
            loaded_columns,
            ..Default::default()
        }
    }

    pub fn set_load_time(&mut self, elapsed: Duration) {
        self.load_time = elapsed;
    }

    pub fn set_write_time(&mut self, elapsed: Duration) {
        self.write_time = elapsed;
    }

    /// Record stage effects and partition sizes from a finished run
    pub fn add_output(&mut self, output: &PrepOutput) {
        self.stages = output.records.clone();
        self.train_rows = output.train.height();
        self.oos_rows = output.oos.height();
        self.unassigned_rows = output.unassigned_rows;
        self.numeric_columns = output.numeric_columns.len();
    }

    /// Columns removed by any stage, in stage order
    pub fn dropped_columns(&self) -> Vec<(&'static str, &str)> {
        self.stages
            .iter()
            .flat_map(|r| r.dropped_columns.iter().map(move |c| (r.name, c.as_str())))
            .collect()
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("PREPARATION SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Stage").add_attribute(Attribute::Bold),
            Cell::new("Rows").add_attribute(Attribute::Bold),
            Cell::new("Columns").add_attribute(Attribute::Bold),
            Cell::new("Time").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📁 load"),
            Cell::new(self.loaded_rows),
            Cell::new(self.loaded_columns),
            Cell::new(format!("{:.2}s", self.load_time.as_secs_f64())),
        ]);

        for record in &self.stages {
            let rows = if record.rows_removed() > 0 {
                Cell::new(format!("{} (-{})", record.rows_out, record.rows_removed())).fg(Color::Red)
            } else {
                Cell::new(record.rows_out)
            };
            let columns = if record.dropped_columns.is_empty() {
                Cell::new(record.columns_out)
            } else {
                Cell::new(format!(
                    "{} (-{})",
                    record.columns_out,
                    record.dropped_columns.len()
                ))
                .fg(Color::Red)
            };
            table.add_row(vec![
                Cell::new(record.name),
                rows,
                columns,
                Cell::new(format!("{:.2}s", record.elapsed.as_secs_f64())),
            ]);
        }

        table.add_row(vec![
            Cell::new("✅ train"),
            Cell::new(self.train_rows).fg(Color::Green).add_attribute(Attribute::Bold),
            Cell::new(""),
            Cell::new(""),
        ]);
        table.add_row(vec![
            Cell::new("✅ test"),
            Cell::new(self.oos_rows).fg(Color::Green).add_attribute(Attribute::Bold),
            Cell::new(""),
            Cell::new(format!("{:.2}s", self.write_time.as_secs_f64())),
        ]);
        table.add_row(vec![
            Cell::new("🗓️  outside year lists"),
            Cell::new(self.unassigned_rows).fg(if self.unassigned_rows == 0 {
                Color::White
            } else {
                Color::Yellow
            }),
            Cell::new(""),
            Cell::new(""),
        ]);
        table.add_row(vec![
            Cell::new("🔢 Numeric features"),
            Cell::new(self.numeric_columns).fg(Color::Cyan),
            Cell::new(""),
            Cell::new(""),
        ]);

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        let dropped = self.dropped_columns();
        if !dropped.is_empty() {
            println!();
            println!(
                "    {} {}",
                style("📝").cyan(),
                style("DROPPED COLUMNS").white().bold()
            );
            println!("    {}", style("─".repeat(50)).dim());
            for (stage, column) in dropped {
                println!(
                    "        {} {} {}",
                    style("•").dim(),
                    column,
                    style(format!("({})", stage)).dim()
                );
            }
        }
    }
}
