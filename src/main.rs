// ==========================================
// 间接成本配置系统 - 命令行入口
// ==========================================
// 职责: 薄表现层；变更类命令经编辑器 (选择 → 编辑 → 保存) 执行
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use indirect_costs::app::{get_default_db_path, seed_demo_data, AppState};
use indirect_costs::editor::{
    parse_cost_input, validate_new_operation_name, CostEditor, EditableOperation, OperationKey,
};
use indirect_costs::logging::{self, LogFormat};
use indirect_costs::VolumeRange;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Database file (defaults to the user data directory)
    #[clap(long, global = true, env = "INDIRECT_COSTS_DB")]
    db: Option<String>,

    /// Emit logs as JSON lines
    #[clap(long, global = true)]
    log_json: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert the demo plants and operations (skips existing plant codes)
    Seed,
    /// List plants
    Plants,
    /// Print the cost matrix of a plant
    Show {
        /// Plant code or id
        #[clap(short, long)]
        plant: String,
        #[clap(long)]
        json: bool,
    },
    /// Set one cost cell
    SetCost {
        #[clap(short, long)]
        plant: String,
        /// Operation name or id
        #[clap(short, long)]
        operation: String,
        /// Volume range, e.g. RANGE_1T or 1T
        #[clap(short, long)]
        range: String,
        /// Cost text as typed in the grid ("", "." and "0." mean 0)
        #[clap(short, long, allow_hyphen_values = true)]
        value: String,
    },
    /// Rename an operation
    Rename {
        #[clap(short, long)]
        plant: String,
        #[clap(short, long)]
        operation: String,
        #[clap(short, long)]
        name: String,
    },
    /// Add an operation, optionally with initial costs (RANGE=VALUE)
    Add {
        #[clap(short, long)]
        plant: String,
        #[clap(short, long)]
        name: String,
        #[clap(short, long = "cost")]
        costs: Vec<String>,
    },
    /// Remove an operation and its costs
    Remove {
        #[clap(short, long)]
        plant: String,
        #[clap(short, long)]
        operation: String,
    },
    /// Runtime configuration (config_kv)
    Config {
        #[clap(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    List,
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_with_format(LogFormat::from_flag(cli.log_json));

    let db_path = cli.db.unwrap_or_else(get_default_db_path);
    info!("{} v{}，数据库: {}", indirect_costs::APP_NAME, indirect_costs::VERSION, db_path);
    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;

    match cli.command {
        Commands::Seed => {
            let summary = seed_demo_data(&state)?;
            println!(
                "plants created: {}, skipped: {}, operations created: {}",
                summary.plants_created, summary.plants_skipped, summary.operations_created
            );
        }
        Commands::Plants => {
            for plant in state.plant_api.list_plants()? {
                println!(
                    "{:<6} {:<24} {}  {}",
                    plant.code,
                    plant.name,
                    plant.id,
                    plant.description.unwrap_or_default()
                );
            }
        }
        Commands::Show { plant, json } => {
            let plant_id = resolve_plant_id(&state, &plant)?;
            if json {
                let detail = state.plant_api.get_plant(&plant_id)?;
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else {
                let editor = open_editor(&state, &plant_id).await?;
                print_matrix(&editor);
            }
        }
        Commands::SetCost {
            plant,
            operation,
            range,
            value,
        } => {
            let range = VolumeRange::parse(&range)
                .ok_or_else(|| anyhow!("unknown volume range: {}", range))?;
            let cost = parse_cost_input(&value)
                .ok_or_else(|| anyhow!("invalid cost: {:?}", value))?;

            let plant_id = resolve_plant_id(&state, &plant)?;
            let mut editor = open_editor(&state, &plant_id).await?;
            let key = resolve_operation(&editor, &operation)?;
            editor.update_operation_cost(&key, range, cost)?;
            save(&mut editor).await?;
        }
        Commands::Rename {
            plant,
            operation,
            name,
        } => {
            let name = validate_new_operation_name(&name, &state.limits)?;
            let plant_id = resolve_plant_id(&state, &plant)?;
            let mut editor = open_editor(&state, &plant_id).await?;
            let key = resolve_operation(&editor, &operation)?;
            editor.rename_operation(&key, &name)?;
            save(&mut editor).await?;
        }
        Commands::Add { plant, name, costs } => {
            let name = validate_new_operation_name(&name, &state.limits)?;
            let initial = costs
                .iter()
                .map(|raw| parse_cost_assignment(raw))
                .collect::<Result<Vec<_>>>()?;

            let plant_id = resolve_plant_id(&state, &plant)?;
            let mut editor = open_editor(&state, &plant_id).await?;
            let key = editor
                .add_operation(&name)
                .ok_or_else(|| anyhow!("no plant selected"))?;
            for (range, cost) in initial {
                editor.update_operation_cost(&key, range, cost)?;
            }
            save(&mut editor).await?;
        }
        Commands::Remove { plant, operation } => {
            let plant_id = resolve_plant_id(&state, &plant)?;
            let mut editor = open_editor(&state, &plant_id).await?;
            let key = resolve_operation(&editor, &operation)?;
            editor.remove_operation(&key)?;
            save(&mut editor).await?;
        }
        Commands::Config { command } => match command {
            ConfigCommands::List => {
                for (key, value) in state
                    .config_manager
                    .list_configs()
                    .map_err(|e| anyhow!(e.to_string()))?
                {
                    println!("{} = {}", key, value);
                }
            }
            ConfigCommands::Set { key, value } => {
                state
                    .config_manager
                    .set_config_value(&key, &value)
                    .map_err(|e| anyhow!(e.to_string()))?;
                println!("{} = {}", key, value);
            }
        },
    }

    Ok(())
}

/// 工厂参数可以是简码或ID
fn resolve_plant_id(state: &AppState, plant: &str) -> Result<String> {
    if let Some(found) = state.plant_api.find_plant_by_code(plant)? {
        return Ok(found.id);
    }
    let detail = state
        .plant_api
        .get_plant(plant)
        .with_context(|| format!("plant not found: {}", plant))?;
    Ok(detail.plant.id)
}

async fn open_editor(state: &AppState, plant_id: &str) -> Result<CostEditor> {
    let mut editor = state.editor();
    editor.load_plants().await?;
    editor.select_plant(plant_id).await?;
    Ok(editor)
}

/// 工序参数可以是名称或ID
fn resolve_operation(editor: &CostEditor, operation: &str) -> Result<OperationKey> {
    editor
        .operations()
        .into_iter()
        .find(|op| op.name == operation || op.key.persisted_id() == Some(operation))
        .map(|op| op.key.clone())
        .ok_or_else(|| anyhow!("operation not found: {}", operation))
}

fn parse_cost_assignment(raw: &str) -> Result<(VolumeRange, f64)> {
    let (range, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected RANGE=VALUE, got {:?}", raw))?;
    let range = VolumeRange::parse(range.trim())
        .ok_or_else(|| anyhow!("unknown volume range: {}", range))?;
    let cost = parse_cost_input(value).ok_or_else(|| anyhow!("invalid cost: {:?}", value))?;
    Ok((range, cost))
}

async fn save(editor: &mut CostEditor) -> Result<()> {
    if !editor.has_changes() {
        println!("no changes");
        return Ok(());
    }
    if !editor.save_changes().await {
        let reason = editor
            .last_error()
            .map(ToString::to_string)
            .unwrap_or_else(|| "unknown error".to_string());
        bail!("save failed: {}", reason);
    }
    print_matrix(editor);
    Ok(())
}

fn print_matrix(editor: &CostEditor) {
    if let Some(plant) = editor.selected_plant() {
        println!("{} ({})", plant.name, plant.code);
    }

    print!("{:<24}", "operation");
    for range in VolumeRange::ALL {
        print!("{:>10}", range.label());
    }
    println!();

    for op in editor.operations() {
        print_row(op);
    }
}

fn print_row(op: &EditableOperation) {
    print!("{:<24}", op.name);
    for (_, cost) in op.costs_by_range().iter() {
        print!("{:>10.4}", cost);
    }
    println!();
}
