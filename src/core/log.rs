use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use ansi_term::Colour;
use regex::Regex;

const MAX_OP_WIDTH: usize = 60;

fn strip_ansi(re: &Regex, s: &str) -> String {
    re.replace_all(s, "").into_owned()
}

/// ANSI color for each operation kind.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "add" => Colour::Green,
        "del" | "clear" => Colour::Red,
        "reset" => Colour::RGB(255, 80, 80),
        "settings" | "reminder" => Colour::Yellow,
        "import" | "export" => Colour::Cyan,
        "achievement" => Colour::RGB(255, 153, 51),
        "migration_applied" => Colour::Purple,
        "backup" => Colour::Blue,
        _ => Colour::White,
    }
}

pub struct LogLogic;

impl LogLogic {
    /// Prints the log, optionally restricted to one operation and to the
    /// `last` most recent matching rows.
    pub fn print_log(pool: &mut DbPool, operation: Option<&str>, last: Option<usize>) -> AppResult<()> {
        let mut entries = load_log(&pool.conn)?;
        if let Some(op) = operation {
            entries.retain(|e| e.operation.eq_ignore_ascii_case(op));
        }
        if let Some(n) = last {
            let skip = entries.len().saturating_sub(n);
            entries.drain(..skip);
        }
        if entries.is_empty() {
            println!("📜 No matching log rows.");
            return Ok(());
        }

        let ansi =
            Regex::new(r"\x1B\[[0-9;]*[mK]").map_err(|e| AppError::Other(e.to_string()))?;

        let rows: Vec<(i64, String, String, String, String)> = entries
            .into_iter()
            .map(|e| {
                let date = chrono::DateTime::parse_from_rfc3339(&e.date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or(e.date);
                let op_target = if e.target.is_empty() {
                    e.operation.clone()
                } else {
                    format!("{} ({})", e.operation, e.target)
                };
                (e.id, date, e.operation, op_target, e.message)
            })
            .collect();

        let op_w = rows
            .iter()
            .map(|r| r.3.chars().count())
            .max()
            .unwrap_or(10)
            .min(MAX_OP_WIDTH);
        let id_w = rows.iter().map(|r| r.0.to_string().len()).max().unwrap_or(1);
        let date_w = rows.iter().map(|r| r.1.len()).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for (id, date, operation, op_target, message) in rows {
            let color = color_for_operation(&operation);

            // Truncate on visible characters only.
            let visible = strip_ansi(&ansi, &op_target);
            let shown = if visible.chars().count() > MAX_OP_WIDTH {
                let mut s: String = visible.chars().take(MAX_OP_WIDTH - 3).collect();
                s.push_str("...");
                s
            } else {
                visible
            };

            // Only the operation word is colored.
            let recolored = match shown.split_once(' ') {
                Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
                None => color.paint(shown.as_str()).to_string(),
            };
            let padding = " ".repeat(op_w.saturating_sub(shown.chars().count()));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                id,
                date,
                recolored,
                padding,
                message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
