//! 解析器核心：整合三个维度的规则匹配，输出解析结果和客户端ID
use std::sync::Arc;

use tracing::info;

use super::client_id::{ClientId, ID_SEPARATOR, RawClientId};
use super::matcher::{apply_at, first_match};
use crate::compiler::{CompiledRuleLibrary, RuleCompiler};
use crate::config::GlobalConfig;
use crate::error::{Facet, ResolveError, UaParserError, UaResult};
use crate::rule::{Client, Device, Os, RuleLibrary, RuleLoader, UserAgent};

/// 各维度规则数量
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleCounts {
    pub user_agent: usize,
    pub os: usize,
    pub device: usize,
}

/// User-Agent 解析器
/// 规则库构建完成后只读，可在线程间共享，克隆只增加引用计数
#[derive(Debug, Clone)]
pub struct UaParser {
    compiled_lib: Arc<CompiledRuleLibrary>,
    data_version: String,
}

impl UaParser {
    /// 按配置加载规则并并行编译
    pub async fn new(config: GlobalConfig) -> UaResult<Self> {
        validate_data_version(&config.data_version)?;

        // 1. 加载原始规则库
        let rule_lib = RuleLoader::load(&config).await?;

        // 2. 并行编译规则库
        let compiled_lib = RuleCompiler::compile_parallel(rule_lib).await?;

        let parser = Self {
            compiled_lib: Arc::new(compiled_lib),
            data_version: config.data_version,
        };
        info!(
            "UaParser 初始化完成，规则版本：'{}'，规则数：{:?}",
            parser.data_version,
            parser.rule_counts()
        );
        Ok(parser)
    }

    /// 使用已加载的规则库创建解析器（同步编译）
    pub fn with_rules(rule_lib: &RuleLibrary, data_version: impl Into<String>) -> UaResult<Self> {
        let data_version = data_version.into();
        validate_data_version(&data_version)?;

        let compiled_lib = RuleCompiler::compile(rule_lib)?;
        Ok(Self {
            compiled_lib: Arc::new(compiled_lib),
            data_version,
        })
    }

    /// 从 YAML 文本创建解析器
    pub fn from_yaml(yaml: &str, data_version: impl Into<String>) -> UaResult<Self> {
        let data_version = data_version.into();
        validate_data_version(&data_version)?;

        let rule_lib = RuleLoader::from_yaml_str(yaml)?;
        Self::with_rules(&rule_lib, data_version)
    }

    /// 规则版本号（写入客户端ID）
    pub fn data_version(&self) -> &str {
        &self.data_version
    }

    pub fn rule_counts(&self) -> RuleCounts {
        RuleCounts {
            user_agent: self.compiled_lib.user_agent_patterns.len(),
            os: self.compiled_lib.os_patterns.len(),
            device: self.compiled_lib.device_patterns.len(),
        }
    }

    pub fn parse_user_agent(&self, line: &str) -> UserAgent {
        first_match(&self.compiled_lib.user_agent_patterns, line).0
    }

    pub fn parse_os(&self, line: &str) -> Os {
        first_match(&self.compiled_lib.os_patterns, line).0
    }

    pub fn parse_device(&self, line: &str) -> Device {
        first_match(&self.compiled_lib.device_patterns, line).0
    }

    /// 解析三个维度并生成客户端ID，任何输入（包括空串）都不会失败
    pub fn classify(&self, line: &str) -> Client {
        let (user_agent, ua_index) = first_match(&self.compiled_lib.user_agent_patterns, line);
        let (os, os_index) = first_match(&self.compiled_lib.os_patterns, line);
        let (device, device_index) = first_match(&self.compiled_lib.device_patterns, line);

        let id = ClientId {
            data_version: self.data_version.clone(),
            user_agent: ua_index,
            os: os_index,
            device: device_index,
        };

        Client {
            id: id.to_string(),
            user_agent,
            os,
            device,
        }
    }

    /// 根据客户端ID和原始 UA 还原解析结果
    /// 每个维度只应用ID中记录的那一条规则，不扫描规则列表
    pub fn resolve(&self, id: &str, line: &str) -> Result<Client, ResolveError> {
        let raw = RawClientId::split(id)?;
        if raw.data_version != self.data_version {
            return Err(ResolveError::GenerationMismatch {
                expected: self.data_version.clone(),
                found: raw.data_version.to_string(),
            });
        }

        let counts = self.rule_counts();
        let user_agent = apply_at(
            &self.compiled_lib.user_agent_patterns,
            raw.index(Facet::UserAgent, Some(counts.user_agent))?,
            line,
        )?;
        let os = apply_at(
            &self.compiled_lib.os_patterns,
            raw.index(Facet::Os, Some(counts.os))?,
            line,
        )?;
        let device = apply_at(
            &self.compiled_lib.device_patterns,
            raw.index(Facet::Device, Some(counts.device))?,
            line,
        )?;

        Ok(Client {
            id: id.to_string(),
            user_agent,
            os,
            device,
        })
    }
}

fn validate_data_version(data_version: &str) -> UaResult<()> {
    if data_version.contains(ID_SEPARATOR) {
        return Err(UaParserError::InvalidDataVersion(data_version.to_string()));
    }
    Ok(())
}
