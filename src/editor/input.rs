// ==========================================
// 间接成本配置系统 - 表现层输入辅助
// ==========================================
// 职责: 单元格成本文本解析、新增工序名称校验
// 说明: 编辑器核心不做输入校验，调用方在调用前使用这里的函数
// ==========================================

use thiserror::Error;

use crate::config::ValidationLimits;

/// 解析单元格中的成本文本
///
/// # 规则
/// - `""`、`"."`、`"0."` 视为 0（编辑中的中间状态）
/// - 其余取最长数字前缀（`"1.5kg"` → 1.5）
/// - 无数字或以 `-` 开头返回 None（含 `"-0"`），调用方忽略本次输入
pub fn parse_cost_input(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if matches!(trimmed, "" | "." | "0.") {
        return Some(0.0);
    }

    let mut end = 0;
    let mut seen_dot = false;
    for (idx, ch) in trimmed.char_indices() {
        match ch {
            '0'..='9' => end = idx + 1,
            '.' if !seen_dot => {
                seen_dot = true;
                end = idx + 1;
            }
            '+' if idx == 0 => end = idx + 1,
            _ => break,
        }
    }

    let value = trimmed[..end].parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// 新增工序名称校验失败原因
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameValidationError {
    #[error("名称不能为空")]
    Empty,

    #[error("名称至少需要{min}个字符")]
    TooShort { min: usize },

    #[error("名称不能超过{max}个字符")]
    TooLong { max: usize },
}

/// 新增工序名称校验（前端规则），返回 trim 后的名称
///
/// 上限取 operation.name.client_max_len，与服务端上限分别配置
pub fn validate_new_operation_name(
    raw: &str,
    limits: &ValidationLimits,
) -> Result<String, NameValidationError> {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();

    if len == 0 {
        return Err(NameValidationError::Empty);
    }
    if len < limits.operation_name_client_min_len {
        return Err(NameValidationError::TooShort {
            min: limits.operation_name_client_min_len,
        });
    }
    if len > limits.operation_name_client_max_len {
        return Err(NameValidationError::TooLong {
            max: limits.operation_name_client_max_len,
        });
    }
    Ok(trimmed.to_string())
}
