//! 规则缓存管理
//! 仅处理规则库的本地序列化（MessagePack）和反序列化

use rmp_serde::{Serializer, from_slice};
use serde::Serialize;
use tracing::debug;

use super::model::RuleLibrary;
use crate::error::{UaResult, UaParserError};
use crate::config::GlobalConfig;

/// 规则缓存管理器
pub struct RuleCacheManager;

impl RuleCacheManager {
    /// 从本地缓存加载规则库
    pub async fn load_from_cache(config: &GlobalConfig) -> UaResult<RuleLibrary> {
        let cache_path = &config.rule_cache_path;
        let cache_data = tokio::fs::read(cache_path).await?;

        // MessagePack反序列化
        let rule_lib: RuleLibrary = from_slice(&cache_data)
            .map_err(|e| UaParserError::MsgPackError(format!("反序列化失败：{}", e)))?;

        debug!(
            "缓存文件反序列化成功，UA规则数：{}，OS规则数：{}，设备规则数：{}",
            rule_lib.user_agent_parsers.len(),
            rule_lib.os_parsers.len(),
            rule_lib.device_parsers.len()
        );

        Ok(rule_lib)
    }

    /// 将规则库缓存到本地
    pub async fn save_to_cache(config: &GlobalConfig, rule_lib: &RuleLibrary) -> UaResult<()> {
        let cache_path = &config.rule_cache_path;
        let mut cache_data = Vec::new();

        // 使用命名字段序列化，规则模板字段可选，按位置编码会错位
        rule_lib
            .serialize(&mut Serializer::new(&mut cache_data).with_struct_map())
            .map_err(|e| UaParserError::MsgPackError(format!("序列化失败：{}", e)))?;

        debug!("规则库序列化成功，序列化后数据大小：{} 字节", cache_data.len());

        tokio::fs::write(cache_path, cache_data)
            .await
            .map_err(|e| UaParserError::RuleCacheError(format!("写入缓存文件失败：{}", e)))?;
        Ok(())
    }

    /// 清除本地缓存
    pub async fn clear_cache(config: &GlobalConfig) -> UaResult<()> {
        let cache_path = &config.rule_cache_path;
        if tokio::fs::try_exists(cache_path).await? {
            tokio::fs::remove_file(cache_path).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigManager;
    use crate::rule::model::{DeviceRule, UserAgentRule};

    fn sample_library() -> RuleLibrary {
        RuleLibrary {
            user_agent_parsers: vec![UserAgentRule {
                regex: r"(Firefox)/(\d+)\.(\d+)".to_string(),
                v3_replacement: Some("x".to_string()),
                ..Default::default()
            }],
            os_parsers: Vec::new(),
            device_parsers: vec![DeviceRule {
                regex: "(iPhone)".to_string(),
                regex_flag: Some("i".to_string()),
                brand_replacement: Some("Apple".to_string()),
                ..Default::default()
            }],
        }
    }

    #[tokio::test]
    async fn test_cache_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigManager::custom()
            .rule_cache_path(dir.path().join("rules.mp"))
            .build();
        let rule_lib = sample_library();

        RuleCacheManager::save_to_cache(&config, &rule_lib).await.unwrap();
        let loaded = RuleCacheManager::load_from_cache(&config).await.unwrap();
        assert_eq!(loaded, rule_lib);

        RuleCacheManager::clear_cache(&config).await.unwrap();
        assert!(!config.rule_cache_path.exists());
        // 重复清除不报错
        RuleCacheManager::clear_cache(&config).await.unwrap();
    }

    #[tokio::test]
    async fn test_load_missing_cache_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigManager::custom()
            .rule_cache_path(dir.path().join("missing.mp"))
            .build();
        let err = RuleCacheManager::load_from_cache(&config).await.unwrap_err();
        assert!(matches!(err, UaParserError::IoError(_)));
    }
}
