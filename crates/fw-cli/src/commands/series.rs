use comfy_table::{ContentArrangement, Table};
use fw_eod::SeriesDefinition;

pub fn run(json: bool) -> Result<(), String> {
    let catalog = SeriesDefinition::builtin();

    if json {
        let out = serde_json::to_string_pretty(&catalog).map_err(|e| e.to_string())?;
        println!("{out}");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Name", "Difficulty", "Timer", "Strikes", "Modules"]);

    for series in &catalog {
        let pool: Vec<String> = series.module_pool.iter().map(|k| k.to_string()).collect();
        table.add_row(vec![
            series.id.clone(),
            series.display_name.clone(),
            series.difficulty.to_string(),
            super::mmss(i64::from(series.base_time_secs)),
            series.base_strikes.to_string(),
            format!("{} of {}", series.module_count, pool.join(", ")),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} series", catalog.len());

    Ok(())
}
