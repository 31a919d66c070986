// ==========================================
// Mock 网关实现 - 用于编辑器测试
// ==========================================
// 行为: 内存中的工厂/工序存储，记录每次调用，可按规则注入失败
// ==========================================

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use indirect_costs::api::{
    CostInput, CreateOperationInput, IndirectCostDto, OperationDto, PlantDto, RemovedDto,
    UpdateOperationInput,
};
use indirect_costs::domain::VolumeRange;
use indirect_costs::editor::{CostGateway, GatewayError, GatewayResult};

/// 记录的网关调用
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    ListPlants,
    OperationsByPlant(String),
    Create(CreateOperationInput),
    Update(UpdateOperationInput),
    Remove(String),
}

/// 失败注入规则
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailRule {
    CreateNamed(String),
    UpdateOf(String),
    RemoveOf(String),
    Fetch,
}

#[derive(Default)]
struct Inner {
    plants: Vec<PlantDto>,
    operations: HashMap<String, Vec<OperationDto>>,
    calls: Vec<GatewayCall>,
    fail_rules: Vec<FailRule>,
    next_id: u64,
}

#[derive(Default)]
pub struct MockGateway {
    inner: Mutex<Inner>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plant(self, id: &str, name: &str, code: &str) -> Self {
        self.inner.lock().unwrap().plants.push(PlantDto {
            id: id.to_string(),
            name: name.to_string(),
            code: code.to_string(),
            description: None,
            created_at: String::new(),
            updated_at: String::new(),
        });
        self
    }

    /// 预置工序（8 区间成本全部为 cost）
    pub fn with_operation(self, plant_id: &str, id: &str, name: &str, cost: f64) -> Self {
        let costs = VolumeRange::ALL
            .iter()
            .map(|range| CostInput {
                volume_range: *range,
                cost,
            })
            .collect::<Vec<_>>();
        let operation = build_operation(id, name, plant_id, &costs);
        self.inner
            .lock()
            .unwrap()
            .operations
            .entry(plant_id.to_string())
            .or_default()
            .push(operation);
        self
    }

    pub fn fail_on(&self, rule: FailRule) {
        self.inner.lock().unwrap().fail_rules.push(rule);
    }

    pub fn clear_failures(&self) {
        self.inner.lock().unwrap().fail_rules.clear();
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// 只保留变更类调用
    pub fn mutations(&self) -> Vec<GatewayCall> {
        self.calls()
            .into_iter()
            .filter(|c| {
                matches!(
                    c,
                    GatewayCall::Create(_) | GatewayCall::Update(_) | GatewayCall::Remove(_)
                )
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    pub fn server_operations(&self, plant_id: &str) -> Vec<OperationDto> {
        self.inner
            .lock()
            .unwrap()
            .operations
            .get(plant_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl CostGateway for MockGateway {
    async fn list_plants(&self) -> GatewayResult<Vec<PlantDto>> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(GatewayCall::ListPlants);
        Ok(inner.plants.clone())
    }

    async fn operations_by_plant(&self, plant_id: &str) -> GatewayResult<Vec<OperationDto>> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .calls
            .push(GatewayCall::OperationsByPlant(plant_id.to_string()));
        if inner.fail_rules.contains(&FailRule::Fetch) {
            return Err(GatewayError::Transport("network down".to_string()));
        }
        let mut operations = inner.operations.get(plant_id).cloned().unwrap_or_default();
        operations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(operations)
    }

    async fn create_operation(&self, input: CreateOperationInput) -> GatewayResult<OperationDto> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(GatewayCall::Create(input.clone()));
        if inner
            .fail_rules
            .contains(&FailRule::CreateNamed(input.name.clone()))
        {
            return Err(GatewayError::Rejected(format!("create {} rejected", input.name)));
        }

        inner.next_id += 1;
        let id = format!("srv-{}", inner.next_id);
        let operation = build_operation(
            &id,
            &input.name,
            &input.plant_id,
            input.costs.as_deref().unwrap_or_default(),
        );
        inner
            .operations
            .entry(input.plant_id.clone())
            .or_default()
            .push(operation.clone());
        Ok(operation)
    }

    async fn update_operation(&self, input: UpdateOperationInput) -> GatewayResult<OperationDto> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(GatewayCall::Update(input.clone()));
        if inner.fail_rules.contains(&FailRule::UpdateOf(input.id.clone())) {
            return Err(GatewayError::Transport(format!("update {} failed", input.id)));
        }

        let operation = inner
            .operations
            .values_mut()
            .flat_map(|ops| ops.iter_mut())
            .find(|op| op.id == input.id)
            .ok_or_else(|| GatewayError::NotFound(input.id.clone()))?;

        if let Some(name) = &input.name {
            operation.name = name.clone();
        }
        for cost in input.costs.as_deref().unwrap_or_default() {
            match operation
                .costs
                .iter_mut()
                .find(|c| c.volume_range == cost.volume_range)
            {
                Some(existing) => existing.cost = cost.cost.to_string(),
                None => operation.costs.push(build_cost(&input.id, cost)),
            }
        }
        Ok(operation.clone())
    }

    async fn remove_operation(&self, operation_id: &str) -> GatewayResult<RemovedDto> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(GatewayCall::Remove(operation_id.to_string()));
        if inner
            .fail_rules
            .contains(&FailRule::RemoveOf(operation_id.to_string()))
        {
            return Err(GatewayError::Transport(format!("remove {} failed", operation_id)));
        }

        let mut removed = false;
        for ops in inner.operations.values_mut() {
            let before = ops.len();
            ops.retain(|op| op.id != operation_id);
            removed |= ops.len() != before;
        }
        if !removed {
            return Err(GatewayError::NotFound(operation_id.to_string()));
        }
        Ok(RemovedDto {
            id: operation_id.to_string(),
        })
    }
}

fn build_operation(id: &str, name: &str, plant_id: &str, costs: &[CostInput]) -> OperationDto {
    OperationDto {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        plant_id: plant_id.to_string(),
        costs: costs.iter().map(|c| build_cost(id, c)).collect(),
        created_at: String::new(),
        updated_at: String::new(),
    }
}

fn build_cost(operation_id: &str, cost: &CostInput) -> IndirectCostDto {
    IndirectCostDto {
        id: format!("{}-{}", operation_id, cost.volume_range.as_str()),
        operation_id: operation_id.to_string(),
        volume_range: cost.volume_range,
        cost: cost.cost.to_string(),
        created_at: String::new(),
        updated_at: String::new(),
    }
}
