// ==========================================
// 间接成本配置系统 - 服务端输入校验器
// ==========================================
// 职责: 写入前的字段校验 (名称/简码/描述长度、成本取值)
// 上限来源: ValidationLimits (config_kv 可覆写)
// ==========================================

use std::collections::HashSet;

use crate::api::dto::CostInput;
use crate::api::error::{ApiError, ApiResult};
use crate::config::ValidationLimits;

// ==========================================
// InputValidator - 输入校验器
// ==========================================

/// 输入校验器
///
/// 职责：
/// 1. 名称类字段：trim 后非空，且不超过上限（按字符计）
/// 2. 描述：可选，不超过上限
/// 3. 成本：有限且非负，同一请求内区间不可重复
#[derive(Debug, Clone, Copy)]
pub struct InputValidator {
    limits: ValidationLimits,
}

impl InputValidator {
    pub fn new(limits: ValidationLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    /// 校验工序名称，返回 trim 后的名称
    pub fn validate_operation_name(&self, name: &str) -> ApiResult<String> {
        validate_required_text("工序名称", name, self.limits.operation_name_max_len)
    }

    /// 校验工厂名称，返回 trim 后的名称
    pub fn validate_plant_name(&self, name: &str) -> ApiResult<String> {
        validate_required_text("工厂名称", name, self.limits.plant_name_max_len)
    }

    /// 校验工厂简码，返回 trim 后的简码
    pub fn validate_plant_code(&self, code: &str) -> ApiResult<String> {
        validate_required_text("工厂简码", code, self.limits.plant_code_max_len)
    }

    /// 校验描述；空白描述视为未填写
    pub fn validate_description(&self, description: Option<&str>) -> ApiResult<Option<String>> {
        let Some(raw) = description else {
            return Ok(None);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.chars().count() > self.limits.description_max_len {
            return Err(ApiError::InvalidInput(format!(
                "描述长度不能超过{}个字符",
                self.limits.description_max_len
            )));
        }
        Ok(Some(trimmed.to_string()))
    }

    /// 校验成本输入集合
    ///
    /// # 规则
    /// - cost 必须为有限数且 >= 0
    /// - 同一请求内 volume_range 不可重复
    pub fn validate_costs(&self, costs: &[CostInput]) -> ApiResult<()> {
        let mut seen = HashSet::new();
        for input in costs {
            if !input.cost.is_finite() || input.cost < 0.0 {
                return Err(ApiError::InvalidInput(format!(
                    "区间{}的成本无效: {}（必须为非负数）",
                    input.volume_range, input.cost
                )));
            }
            if !seen.insert(input.volume_range) {
                return Err(ApiError::InvalidInput(format!(
                    "区间{}重复出现",
                    input.volume_range
                )));
            }
        }
        Ok(())
    }
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::new(ValidationLimits::default())
    }
}

fn validate_required_text(field: &str, value: &str, max_len: usize) -> ApiResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput(format!("{}不能为空", field)));
    }
    if trimmed.chars().count() > max_len {
        return Err(ApiError::InvalidInput(format!(
            "{}长度不能超过{}个字符",
            field, max_len
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VolumeRange;

    #[test]
    fn test_operation_name_limits() {
        let validator = InputValidator::default();
        assert_eq!(validator.validate_operation_name("  Corte ").unwrap(), "Corte");
        assert!(validator.validate_operation_name("   ").is_err());
        assert!(validator.validate_operation_name(&"x".repeat(100)).is_ok());
        assert!(validator.validate_operation_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_plant_code_and_description() {
        let validator = InputValidator::default();
        assert!(validator.validate_plant_code("PLN").is_ok());
        assert!(validator.validate_plant_code("ABCDEFGHIJK").is_err());
        assert_eq!(validator.validate_description(Some("  ")).unwrap(), None);
        assert!(validator.validate_description(Some(&"d".repeat(501))).is_err());
    }

    #[test]
    fn test_costs_rules() {
        let validator = InputValidator::default();
        let ok = [
            CostInput { volume_range: VolumeRange::Range1T, cost: 0.18 },
            CostInput { volume_range: VolumeRange::Range3T, cost: 0.0 },
        ];
        assert!(validator.validate_costs(&ok).is_ok());

        let negative = [CostInput { volume_range: VolumeRange::Range1T, cost: -0.1 }];
        assert!(validator.validate_costs(&negative).is_err());

        let nan = [CostInput { volume_range: VolumeRange::Range1T, cost: f64::NAN }];
        assert!(validator.validate_costs(&nan).is_err());

        let dup = [
            CostInput { volume_range: VolumeRange::Range1T, cost: 0.1 },
            CostInput { volume_range: VolumeRange::Range1T, cost: 0.2 },
        ];
        assert!(validator.validate_costs(&dup).is_err());
    }
}
