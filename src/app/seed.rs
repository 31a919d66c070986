// ==========================================
// 间接成本配置系统 - 演示数据
// ==========================================
// 内容: 两个工厂 (PLN / PAQ) 及其工序，8 个区间成本按区间递减
// 说明: 通过 API 层写入，重复执行时跳过已存在的工厂简码
// ==========================================

use crate::api::dto::{CostInput, CreateOperationInput, CreatePlantInput};
use crate::api::error::ApiResult;
use crate::app::state::AppState;
use crate::domain::VolumeRange;

struct SeedPlant {
    name: &'static str,
    code: &'static str,
    description: &'static str,
    operations: &'static [(&'static str, &'static str)],
    base_cost: f64,
    step: f64,
}

const SEED_PLANTS: [SeedPlant; 2] = [
    SeedPlant {
        name: "Planta Lima Norte",
        code: "PLN",
        description: "Sede principal de producción",
        operations: &[
            ("Impresión", "Impresión flexográfica"),
            ("Laminado", "Laminado en frío y caliente"),
            ("Embolsado", "Proceso de embolsado automático"),
            ("Corte", "Corte y rebobinado"),
        ],
        base_cost: 0.2,
        step: 0.02,
    },
    SeedPlant {
        name: "Planta Arequipa",
        code: "PAQ",
        description: "Sede de producción sur",
        operations: &[
            ("Impresión", "Impresión offset"),
            ("Sellado", "Sellado térmico"),
            ("Extrusión", "Extrusión de película"),
        ],
        base_cost: 0.25,
        step: 0.025,
    },
];

/// 写入结果统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub plants_created: usize,
    pub plants_skipped: usize,
    pub operations_created: usize,
}

/// 写入演示数据
pub fn seed_demo_data(state: &AppState) -> ApiResult<SeedSummary> {
    let mut summary = SeedSummary::default();

    for seed in &SEED_PLANTS {
        if state.plant_api.find_plant_by_code(seed.code)?.is_some() {
            tracing::info!(code = seed.code, "工厂已存在，跳过");
            summary.plants_skipped += 1;
            continue;
        }

        let plant = state.plant_api.create_plant(CreatePlantInput {
            name: seed.name.to_string(),
            code: seed.code.to_string(),
            description: Some(seed.description.to_string()),
        })?;
        summary.plants_created += 1;

        for (name, description) in seed.operations {
            state.operation_api.create_operation(CreateOperationInput {
                name: name.to_string(),
                description: Some(description.to_string()),
                plant_id: plant.id.clone(),
                costs: Some(descending_costs(seed.base_cost, seed.step)),
            })?;
            summary.operations_created += 1;
        }
    }

    tracing::info!(
        plants_created = summary.plants_created,
        plants_skipped = summary.plants_skipped,
        operations_created = summary.operations_created,
        "演示数据写入完成"
    );
    Ok(summary)
}

/// base - i * step，保留 4 位小数
fn descending_costs(base: f64, step: f64) -> Vec<CostInput> {
    VolumeRange::ALL
        .iter()
        .enumerate()
        .map(|(i, range)| CostInput {
            volume_range: *range,
            cost: ((base - i as f64 * step) * 10_000.0).round() / 10_000.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_idempotent() {
        let state = AppState::new(":memory:".to_string()).unwrap();

        let first = seed_demo_data(&state).unwrap();
        assert_eq!(first.plants_created, 2);
        assert_eq!(first.operations_created, 7);

        let second = seed_demo_data(&state).unwrap();
        assert_eq!(second.plants_created, 0);
        assert_eq!(second.plants_skipped, 2);
        assert_eq!(state.operation_api.list_operations().unwrap().len(), 7);
    }

    #[test]
    fn test_descending_costs() {
        let costs = descending_costs(0.2, 0.02);
        assert_eq!(costs.len(), 8);
        assert_eq!(costs[0].cost, 0.2);
        assert_eq!(costs[1].cost, 0.18);
        assert_eq!(costs[7].cost, 0.06);
    }
}
