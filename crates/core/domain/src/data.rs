//! 领域枚举与规范字符串形式。
//!
//! 所有状态在存储层和 API 层都以小写下划线字符串传递，
//! 这里是唯一的映射点。

/// 设备运行状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceStatus {
    Online,
    Offline,
    Maintenance,
}

impl DeviceStatus {
    /// 规范字符串形式。
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Online => "online",
            DeviceStatus::Offline => "offline",
            DeviceStatus::Maintenance => "maintenance",
        }
    }

    /// 从规范字符串解析。
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "online" => Some(DeviceStatus::Online),
            "offline" => Some(DeviceStatus::Offline),
            "maintenance" => Some(DeviceStatus::Maintenance),
            _ => None,
        }
    }
}

/// 读数合规状态（由阈值分类器派生）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadingStatus {
    Normal,
    Warning,
    Critical,
}

impl ReadingStatus {
    /// 规范字符串形式。
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::Normal => "normal",
            ReadingStatus::Warning => "warning",
            ReadingStatus::Critical => "critical",
        }
    }

    /// 从规范字符串解析。
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "normal" => Some(ReadingStatus::Normal),
            "warning" => Some(ReadingStatus::Warning),
            "critical" => Some(ReadingStatus::Critical),
            _ => None,
        }
    }
}

/// 告警类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertType {
    TemperatureExcursion,
    DeviceOffline,
    LowBattery,
    ConnectionLost,
}

impl AlertType {
    /// 规范字符串形式。
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::TemperatureExcursion => "temperature_excursion",
            AlertType::DeviceOffline => "device_offline",
            AlertType::LowBattery => "low_battery",
            AlertType::ConnectionLost => "connection_lost",
        }
    }

    /// 从规范字符串解析。
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "temperature_excursion" => Some(AlertType::TemperatureExcursion),
            "device_offline" => Some(AlertType::DeviceOffline),
            "low_battery" => Some(AlertType::LowBattery),
            "connection_lost" => Some(AlertType::ConnectionLost),
            _ => None,
        }
    }
}

/// 告警严重级别（两级制）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertSeverity {
    Warning,
    Critical,
}

impl AlertSeverity {
    /// 规范字符串形式。
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Warning => "warning",
            AlertSeverity::Critical => "critical",
        }
    }

    /// 从规范字符串解析。
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "warning" => Some(AlertSeverity::Warning),
            "critical" => Some(AlertSeverity::Critical),
            _ => None,
        }
    }
}
