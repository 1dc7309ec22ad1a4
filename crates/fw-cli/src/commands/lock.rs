use std::path::Path;

use chrono::Utc;
use comfy_table::{ContentArrangement, Table};
use fw_core::{LockStatus, Lockout, LockoutPolicy, PracticeMode};

/// Terminals and their lockout namespaces.
const TERMINALS: [(&str, &str); 2] = [("EOD range", "eod"), ("Network intrusion", "net")];

pub fn run(state: &Path) -> Result<(), String> {
    let mut store = super::open_store(state)?;
    let now = Utc::now();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Terminal", "Game", "Status"]);

    for (name, namespace) in TERMINALS {
        let lockout = Lockout::new(namespace, LockoutPolicy::default());
        let status = lockout
            .status(&mut store, now)
            .map_err(|e| e.to_string())?;
        let shown = match status {
            LockStatus::Clear => "ready".to_string(),
            other => other.to_string(),
        };
        table.add_row(vec![name, namespace, shown.as_str()]);
    }

    println!("{table}");
    println!();
    let practice = if PracticeMode::is_enabled(&store) {
        "on"
    } else {
        "off"
    };
    println!("  practice mode: {practice}");

    Ok(())
}
