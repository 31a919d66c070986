// ==========================================
// 间接成本配置系统 - 领域类型定义
// ==========================================
// 运量区间: 8 个固定档位 (300kg ~ 30t)
// 序列化格式: RANGE_xxx (与数据库、接口一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 运量区间 (Volume Range)
// ==========================================
// 红线: 只允许 8 个枚举值, 顺序即矩阵列顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VolumeRange {
    #[serde(rename = "RANGE_300KG")]
    Range300Kg, // 300kg
    #[serde(rename = "RANGE_500KG")]
    Range500Kg, // 500kg
    #[serde(rename = "RANGE_1T")]
    Range1T, // 1 吨
    #[serde(rename = "RANGE_3T")]
    Range3T, // 3 吨
    #[serde(rename = "RANGE_5T")]
    Range5T, // 5 吨
    #[serde(rename = "RANGE_10T")]
    Range10T, // 10 吨
    #[serde(rename = "RANGE_20T")]
    Range20T, // 20 吨
    #[serde(rename = "RANGE_30T")]
    Range30T, // 30 吨
}

impl VolumeRange {
    /// 全部区间（按矩阵列顺序）
    pub const ALL: [VolumeRange; 8] = [
        VolumeRange::Range300Kg,
        VolumeRange::Range500Kg,
        VolumeRange::Range1T,
        VolumeRange::Range3T,
        VolumeRange::Range5T,
        VolumeRange::Range10T,
        VolumeRange::Range20T,
        VolumeRange::Range30T,
    ];

    /// 存储/传输用编码
    pub fn as_str(&self) -> &'static str {
        match self {
            VolumeRange::Range300Kg => "RANGE_300KG",
            VolumeRange::Range500Kg => "RANGE_500KG",
            VolumeRange::Range1T => "RANGE_1T",
            VolumeRange::Range3T => "RANGE_3T",
            VolumeRange::Range5T => "RANGE_5T",
            VolumeRange::Range10T => "RANGE_10T",
            VolumeRange::Range20T => "RANGE_20T",
            VolumeRange::Range30T => "RANGE_30T",
        }
    }

    /// 界面显示用标签
    pub fn label(&self) -> &'static str {
        match self {
            VolumeRange::Range300Kg => "300kg",
            VolumeRange::Range500Kg => "500kg",
            VolumeRange::Range1T => "1T",
            VolumeRange::Range3T => "3T",
            VolumeRange::Range5T => "5T",
            VolumeRange::Range10T => "10T",
            VolumeRange::Range20T => "20T",
            VolumeRange::Range30T => "30T",
        }
    }

    /// 在 ALL 中的列下标
    pub fn index(&self) -> usize {
        match self {
            VolumeRange::Range300Kg => 0,
            VolumeRange::Range500Kg => 1,
            VolumeRange::Range1T => 2,
            VolumeRange::Range3T => 3,
            VolumeRange::Range5T => 4,
            VolumeRange::Range10T => 5,
            VolumeRange::Range20T => 6,
            VolumeRange::Range30T => 7,
        }
    }

    /// 从字符串解析
    ///
    /// 同时接受存储编码 (RANGE_1T) 与显示标签 (1T / 1t)，未知值返回 None
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_uppercase();
        VolumeRange::ALL.into_iter().find(|range| {
            range.as_str() == normalized || range.label().to_uppercase() == normalized
        })
    }
}

impl fmt::Display for VolumeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 按区间的成本行 (CostsByRange)
// ==========================================
// 缺失的区间按 0 处理
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostsByRange([f64; 8]);

impl CostsByRange {
    /// 全 0 成本行
    pub fn zeroed() -> Self {
        Self([0.0; 8])
    }

    /// 由 (区间, 成本) 序列构建；重复区间以后出现者为准
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (VolumeRange, f64)>,
    {
        let mut costs = Self::zeroed();
        for (range, cost) in entries {
            costs.set(range, cost);
        }
        costs
    }

    pub fn get(&self, range: VolumeRange) -> f64 {
        self.0[range.index()]
    }

    pub fn set(&mut self, range: VolumeRange, cost: f64) {
        self.0[range.index()] = cost;
    }

    /// 按列顺序迭代
    pub fn iter(&self) -> impl Iterator<Item = (VolumeRange, f64)> + '_ {
        VolumeRange::ALL.into_iter().map(move |range| (range, self.get(range)))
    }
}
