use std::path::Path;

use fw_core::PracticeMode;

pub fn set(state: &Path, enabled: bool) -> Result<(), String> {
    let mut store = super::open_store(state)?;
    PracticeMode::set(&mut store, enabled).map_err(|e| e.to_string())?;
    if enabled {
        println!("  Practice mode on. Lockouts are cleared whenever a terminal starts.");
    } else {
        println!("  Practice mode off.");
    }
    Ok(())
}

pub fn status(state: &Path) -> Result<(), String> {
    let store = super::open_store(state)?;
    let shown = if PracticeMode::is_enabled(&store) {
        "on"
    } else {
        "off"
    };
    println!("  practice mode: {shown}");
    Ok(())
}
