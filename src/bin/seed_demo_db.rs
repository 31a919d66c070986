use chrono::Local;
use std::error::Error;
use std::fs;
use std::path::Path;

use indirect_costs::app::{get_default_db_path, seed_demo_data, AppState};
use indirect_costs::logging;

// 用法: seed_demo_db [db_path]
// 已存在的数据库先备份为 <db_path>.bak.<时间戳> 再重建
fn main() -> Result<(), Box<dyn Error>> {
    logging::init();

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(get_default_db_path);

    backup_and_reset_db(&db_path)?;

    let state = AppState::new(db_path.clone())?;
    let summary = seed_demo_data(&state)?;

    print_quick_counts(&state)?;
    eprintln!(
        "Seeded {} ({} plants, {} operations)",
        db_path, summary.plants_created, summary.operations_created
    );
    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    eprintln!("Backed up {} -> {}", db_path, backup_path);
    Ok(())
}

fn print_quick_counts(state: &AppState) -> Result<(), Box<dyn Error>> {
    for plant in state.plant_api.list_plants()? {
        let detail = state.plant_api.get_plant(&plant.id)?;
        let cost_rows: usize = detail.operations.iter().map(|op| op.costs.len()).sum();
        eprintln!(
            "  {:<4} {:<20} operations={} costs={}",
            plant.code,
            plant.name,
            detail.operations.len(),
            cost_rows
        );
    }
    Ok(())
}
