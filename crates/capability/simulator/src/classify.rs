//! 阈值分类器
//!
//! 纯函数：温度 + 设备阈值 -> 读数状态。所有派生状态的地方
//! （上报、场景引擎、统计）都必须走这里，分级规则只存在于此。
//!
//! 分级规则：越界读数距最近一侧阈值不超过 2°C 记 warning，
//! 超过记 critical。

use domain::ReadingStatus;

/// warning 与 critical 的分界带宽（°C）。
pub const WARNING_BAND_C: f64 = 2.0;

/// 按设备阈值对温度分类。
///
/// 任一阈值缺失表示设备未配置合规策略，一律返回 normal。
pub fn classify(temperature: f64, min_temp: Option<f64>, max_temp: Option<f64>) -> ReadingStatus {
    let (Some(min_temp), Some(max_temp)) = (min_temp, max_temp) else {
        return ReadingStatus::Normal;
    };
    if temperature >= min_temp && temperature <= max_temp {
        return ReadingStatus::Normal;
    }
    // 距最近一侧阈值的越界幅度
    let distance = if temperature < min_temp {
        min_temp - temperature
    } else {
        temperature - max_temp
    };
    if distance > WARNING_BAND_C {
        ReadingStatus::Critical
    } else {
        ReadingStatus::Warning
    }
}
