//! 规则数据模型定义
//! 仅存储规则数据和解析结果，无匹配逻辑，支持序列化/反序列化

use std::fmt;
use serde::{Deserialize, Serialize};

/// 未匹配到任何规则时使用的保留 family 名称
pub const FAMILY_UNKNOWN: &str = "Other";

/// 浏览器/客户端软件解析结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAgent {
    pub family: String,
    pub major: String,
    pub minor: String,
    pub patch: String,
}

impl UserAgent {
    /// 未知客户端
    pub fn unknown() -> Self {
        Self {
            family: FAMILY_UNKNOWN.to_string(),
            ..Default::default()
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.family == FAMILY_UNKNOWN
    }

    /// 版本号，仅拼接非空部分，如 "120.0.1"
    pub fn version_string(&self) -> String {
        join_version(&[&self.major, &self.minor, &self.patch])
    }
}

impl fmt::Display for UserAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_with_version(f, &self.family, &self.version_string())
    }
}

/// 操作系统解析结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Os {
    pub family: String,
    pub major: String,
    pub minor: String,
    pub patch: String,
    pub patch_minor: String,
}

impl Os {
    /// 未知操作系统
    pub fn unknown() -> Self {
        Self {
            family: FAMILY_UNKNOWN.to_string(),
            ..Default::default()
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.family == FAMILY_UNKNOWN
    }

    pub fn version_string(&self) -> String {
        join_version(&[&self.major, &self.minor, &self.patch, &self.patch_minor])
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_with_version(f, &self.family, &self.version_string())
    }
}

/// 设备解析结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub family: String,
    pub brand: String,
    pub model: String,
}

impl Device {
    /// 未知设备
    pub fn unknown() -> Self {
        Self {
            family: FAMILY_UNKNOWN.to_string(),
            ..Default::default()
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.family == FAMILY_UNKNOWN
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.family)
    }
}

/// 完整解析结果：三个维度 + 紧凑客户端ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// 可用于 `UaParser::resolve` 还原本结果的紧凑ID
    pub id: String,
    pub user_agent: UserAgent,
    pub os: Os,
    pub device: Device,
}

impl Client {
    /// 三个维度均未识别
    pub fn is_unknown(&self) -> bool {
        self.user_agent.is_unknown() && self.os.is_unknown() && self.device.is_unknown()
    }
}

// ======== 辅助函数：版本号拼接 ========
// 空的部分直接跳过
fn join_version(parts: &[&str]) -> String {
    let mut version = String::new();
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i > 0 && !version.is_empty() {
            version.push('.');
        }
        version.push_str(part);
    }
    version
}

fn write_with_version(f: &mut fmt::Formatter<'_>, family: &str, version: &str) -> fmt::Result {
    match (family.is_empty(), version.is_empty()) {
        (_, true) => write!(f, "{}", family),
        (true, false) => write!(f, "{}", version),
        (false, false) => write!(f, "{} {}", family, version),
    }
}

/// UA 规则（uap-core user_agent_parsers 条目）
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserAgentRule {
    pub regex: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_replacement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v1_replacement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v2_replacement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v3_replacement: Option<String>,
}

/// OS 规则（uap-core os_parsers 条目）
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct OsRule {
    pub regex: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_replacement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_v1_replacement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_v2_replacement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_v3_replacement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_v4_replacement: Option<String>,
}

/// 设备规则（uap-core device_parsers 条目）
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeviceRule {
    pub regex: String,
    // 目前只识别 "i"（忽略大小写）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex_flag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_replacement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_replacement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_replacement: Option<String>,
}

/// 完整规则库，列表顺序即匹配优先级
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleLibrary {
    #[serde(default)]
    pub user_agent_parsers: Vec<UserAgentRule>,
    #[serde(default)]
    pub os_parsers: Vec<OsRule>,
    #[serde(default)]
    pub device_parsers: Vec<DeviceRule>,
}

impl RuleLibrary {
    pub fn rule_count(&self) -> usize {
        self.user_agent_parsers.len() + self.os_parsers.len() + self.device_parsers.len()
    }
}
