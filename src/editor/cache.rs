// ==========================================
// 间接成本配置系统 - 客户端实体缓存
// ==========================================
// 策略: 写入总是整体替换 (不做部分合并)
// 键: 工厂列表单独一项；工序列表按 plant_id
// ==========================================

use std::collections::HashMap;

use crate::api::dto::{OperationDto, PlantDto};

#[derive(Debug, Default)]
pub struct EntityCache {
    plants: Option<Vec<PlantDto>>,
    operations_by_plant: HashMap<String, Vec<OperationDto>>,
}

impl EntityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plants(&self) -> Option<&[PlantDto]> {
        self.plants.as_deref()
    }

    pub fn put_plants(&mut self, plants: Vec<PlantDto>) {
        self.plants = Some(plants);
    }

    pub fn operations(&self, plant_id: &str) -> Option<&[OperationDto]> {
        self.operations_by_plant.get(plant_id).map(Vec::as_slice)
    }

    /// 以新结果整体替换该工厂的工序列表
    pub fn put_operations(&mut self, plant_id: &str, operations: Vec<OperationDto>) {
        self.operations_by_plant
            .insert(plant_id.to_string(), operations);
    }

    pub fn invalidate(&mut self, plant_id: &str) {
        self.operations_by_plant.remove(plant_id);
    }
}
