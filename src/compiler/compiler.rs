//! 规则编译器核心
//! 仅负责将原始规则编译为可执行的正则模式

use std::time::Instant;

use regex::Regex;
use tracing::debug;

use super::pattern::{CompiledRegex, CompiledRuleLibrary, DevicePattern, OsPattern, UserAgentPattern};
use crate::error::{Facet, UaParserError, UaResult};
use crate::rule::{DeviceRule, OsRule, RuleLibrary, UserAgentRule};

/// 规则编译器
pub struct RuleCompiler;

impl RuleCompiler {
    /// 顺序编译规则库，任意一条正则无效即整体失败
    pub fn compile(rule_lib: &RuleLibrary) -> UaResult<CompiledRuleLibrary> {
        let start = Instant::now();

        let compiled = CompiledRuleLibrary {
            user_agent_patterns: Self::compile_user_agent_rules(&rule_lib.user_agent_parsers)?,
            os_patterns: Self::compile_os_rules(&rule_lib.os_parsers)?,
            device_patterns: Self::compile_device_rules(&rule_lib.device_parsers)?,
        };

        Self::log_stats(&compiled, start);
        Ok(compiled)
    }

    /// 并行编译规则库
    /// 三个维度的规则互不依赖，各自在阻塞线程池中编译，全部完成后再组装
    pub async fn compile_parallel(rule_lib: RuleLibrary) -> UaResult<CompiledRuleLibrary> {
        let start = Instant::now();
        let RuleLibrary {
            user_agent_parsers,
            os_parsers,
            device_parsers,
        } = rule_lib;

        let ua_task =
            tokio::task::spawn_blocking(move || Self::compile_user_agent_rules(&user_agent_parsers));
        let os_task = tokio::task::spawn_blocking(move || Self::compile_os_rules(&os_parsers));
        let device_task =
            tokio::task::spawn_blocking(move || Self::compile_device_rules(&device_parsers));

        let (user_agent_patterns, os_patterns, device_patterns) =
            tokio::try_join!(ua_task, os_task, device_task)
                .map_err(|e| UaParserError::AsyncTaskError(format!("规则编译任务失败：{}", e)))?;

        let compiled = CompiledRuleLibrary {
            user_agent_patterns: user_agent_patterns?,
            os_patterns: os_patterns?,
            device_patterns: device_patterns?,
        };

        Self::log_stats(&compiled, start);
        Ok(compiled)
    }

    fn compile_user_agent_rules(rules: &[UserAgentRule]) -> UaResult<Vec<UserAgentPattern>> {
        rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                Ok(UserAgentPattern {
                    regex: Self::compile_regex(Facet::UserAgent, index, &rule.regex, false)?,
                    family_replacement: rule.family_replacement.clone(),
                    v1_replacement: rule.v1_replacement.clone(),
                    v2_replacement: rule.v2_replacement.clone(),
                    v3_replacement: rule.v3_replacement.clone(),
                })
            })
            .collect()
    }

    fn compile_os_rules(rules: &[OsRule]) -> UaResult<Vec<OsPattern>> {
        rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                Ok(OsPattern {
                    regex: Self::compile_regex(Facet::Os, index, &rule.regex, false)?,
                    os_replacement: rule.os_replacement.clone(),
                    os_v1_replacement: rule.os_v1_replacement.clone(),
                    os_v2_replacement: rule.os_v2_replacement.clone(),
                    os_v3_replacement: rule.os_v3_replacement.clone(),
                    os_v4_replacement: rule.os_v4_replacement.clone(),
                })
            })
            .collect()
    }

    fn compile_device_rules(rules: &[DeviceRule]) -> UaResult<Vec<DevicePattern>> {
        rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                let case_insensitive = rule
                    .regex_flag
                    .as_deref()
                    .is_some_and(|flag| flag.contains('i'));
                Ok(DevicePattern {
                    regex: Self::compile_regex(Facet::Device, index, &rule.regex, case_insensitive)?,
                    device_replacement: rule.device_replacement.clone(),
                    brand_replacement: rule.brand_replacement.clone(),
                    model_replacement: rule.model_replacement.clone(),
                })
            })
            .collect()
    }

    /// 编译单个正则，忽略大小写通过 (?i) 前缀实现
    fn compile_regex(
        facet: Facet,
        index: usize,
        source: &str,
        case_insensitive: bool,
    ) -> UaResult<CompiledRegex> {
        let regex = if case_insensitive {
            Regex::new(&format!("(?i){}", source))
        } else {
            Regex::new(source)
        }
        .map_err(|err| UaParserError::RegexCompileError {
            facet,
            index,
            source: err,
        })?;

        Ok(CompiledRegex::new(regex, source.to_string()))
    }

    fn log_stats(compiled: &CompiledRuleLibrary, start: Instant) {
        debug!("✅ 规则编译完成，总耗时{:?}", start.elapsed());
        debug!(
            "📊 编译统计：UA规则{}条、OS规则{}条、设备规则{}条",
            compiled.user_agent_patterns.len(),
            compiled.os_patterns.len(),
            compiled.device_patterns.len()
        );
    }
}
