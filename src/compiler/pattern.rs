//! 编译后模式模型
//! 每条规则编译后的正则及其字段提取逻辑

use regex::{Captures, Regex};

use crate::error::Facet;
use crate::rule::{Device, Os, UserAgent};
use crate::utils::Replacement;

/// 单条规则的匹配能力，三个维度共用同一套优先级扫描逻辑
pub trait FacetPattern {
    /// 匹配成功后产出的维度结果
    type Value;

    /// 规则所属维度
    const FACET: Facet;

    /// 对输入应用本规则，未匹配返回 None
    fn apply(&self, line: &str) -> Option<Self::Value>;

    /// 未匹配任何规则时的结果
    fn unknown() -> Self::Value;
}

/// 编译后的正则及原始规则文本
#[derive(Debug, Clone)]
pub struct CompiledRegex {
    regex: Regex,
    source: String,
}

impl CompiledRegex {
    pub fn new(regex: Regex, source: String) -> Self {
        Self { regex, source }
    }

    /// 规则文件中的原始正则文本（不含 regex_flag 前缀）
    pub fn source(&self) -> &str {
        &self.source
    }

    /// 分组数量（不含整体匹配）
    pub fn group_count(&self) -> usize {
        self.regex.captures_len() - 1
    }

    /// 匹配并展开为捕获数组：下标0为整体匹配，未参与匹配的可选分组为空串
    fn captures<'a>(&self, line: &'a str) -> Option<Vec<&'a str>> {
        self.regex.captures(line).map(|caps| capture_list(&caps))
    }
}

fn capture_list<'a>(caps: &Captures<'a>) -> Vec<&'a str> {
    caps.iter()
        .map(|m| m.map_or("", |m| m.as_str()))
        .collect()
}

/// 字段取值：有模板时按模板展开，否则按约定位置取原始分组，都没有则为空
/// 空模板视同未配置
fn field_value(
    template: Option<&str>,
    captures: &[&str],
    position: usize,
    expand: impl FnOnce(&str, &[&str]) -> String,
) -> String {
    match template.filter(|t| !t.is_empty()) {
        Some(template) => expand(template, captures),
        None => captures.get(position).copied().unwrap_or_default().to_string(),
    }
}

fn single(index: usize) -> impl FnOnce(&str, &[&str]) -> String {
    move |template: &str, captures: &[&str]| Replacement::expand_single(template, captures, index)
}

fn all(template: &str, captures: &[&str]) -> String {
    Replacement::expand_all(template, captures)
}

/// 编译后的UA规则
#[derive(Debug, Clone)]
pub struct UserAgentPattern {
    pub regex: CompiledRegex,
    pub family_replacement: Option<String>,
    pub v1_replacement: Option<String>,
    pub v2_replacement: Option<String>,
    pub v3_replacement: Option<String>,
}

impl FacetPattern for UserAgentPattern {
    type Value = UserAgent;
    const FACET: Facet = Facet::UserAgent;

    fn apply(&self, line: &str) -> Option<UserAgent> {
        let caps = self.regex.captures(line)?;
        Some(UserAgent {
            family: field_value(self.family_replacement.as_deref(), &caps, 1, single(1)),
            major: field_value(self.v1_replacement.as_deref(), &caps, 2, single(2)),
            minor: field_value(self.v2_replacement.as_deref(), &caps, 3, single(3)),
            patch: field_value(self.v3_replacement.as_deref(), &caps, 4, all),
        })
    }

    fn unknown() -> UserAgent {
        UserAgent::unknown()
    }
}

/// 编译后的OS规则
#[derive(Debug, Clone)]
pub struct OsPattern {
    pub regex: CompiledRegex,
    pub os_replacement: Option<String>,
    pub os_v1_replacement: Option<String>,
    pub os_v2_replacement: Option<String>,
    pub os_v3_replacement: Option<String>,
    pub os_v4_replacement: Option<String>,
}

impl FacetPattern for OsPattern {
    type Value = Os;
    const FACET: Facet = Facet::Os;

    fn apply(&self, line: &str) -> Option<Os> {
        let caps = self.regex.captures(line)?;
        Some(Os {
            family: field_value(self.os_replacement.as_deref(), &caps, 1, single(1)),
            major: field_value(self.os_v1_replacement.as_deref(), &caps, 2, single(2)),
            minor: field_value(self.os_v2_replacement.as_deref(), &caps, 3, single(3)),
            patch: field_value(self.os_v3_replacement.as_deref(), &caps, 4, all),
            patch_minor: field_value(self.os_v4_replacement.as_deref(), &caps, 5, all),
        })
    }

    fn unknown() -> Os {
        Os::unknown()
    }
}

/// 编译后的设备规则
#[derive(Debug, Clone)]
pub struct DevicePattern {
    pub regex: CompiledRegex,
    pub device_replacement: Option<String>,
    pub brand_replacement: Option<String>,
    pub model_replacement: Option<String>,
}

impl FacetPattern for DevicePattern {
    type Value = Device;
    const FACET: Facet = Facet::Device;

    fn apply(&self, line: &str) -> Option<Device> {
        let caps = self.regex.captures(line)?;
        let family = field_value(self.device_replacement.as_deref(), &caps, 1, all);
        // 只有设备 family 去除首尾空白，其他字段保持原样
        Some(Device {
            family: family.trim().to_string(),
            // brand 没有约定的来源分组
            brand: self
                .brand_replacement
                .as_deref()
                .filter(|t| !t.is_empty())
                .map(|template| all(template, &caps))
                .unwrap_or_default(),
            model: field_value(self.model_replacement.as_deref(), &caps, 1, all),
        })
    }

    fn unknown() -> Device {
        Device::unknown()
    }
}

/// 编译后的规则库，三个列表顺序与规则文件一致
#[derive(Debug, Clone, Default)]
pub struct CompiledRuleLibrary {
    pub user_agent_patterns: Vec<UserAgentPattern>,
    pub os_patterns: Vec<OsPattern>,
    pub device_patterns: Vec<DevicePattern>,
}
