//! 规则加载管理器
//! 负责从本地文件、本地缓存或远程拉取 regexes.yaml 规则库

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use super::cache::RuleCacheManager;
use super::model::RuleLibrary;
use crate::config::GlobalConfig;
use crate::error::{UaParserError, UaResult};

/// 规则加载管理器
pub struct RuleLoader;

impl RuleLoader {
    /// 加载规则库
    /// 优先级：配置的本地规则文件 > 本地缓存 > 远程拉取（拉取成功后写入缓存）
    pub async fn load(config: &GlobalConfig) -> UaResult<RuleLibrary> {
        // 1. 指定了本地规则文件时只读该文件，失败直接返回错误
        if let Some(rules_path) = &config.rules_path {
            return Self::from_path(rules_path).await;
        }

        // 2. 加载本地缓存
        match RuleCacheManager::load_from_cache(config).await {
            Ok(rule_lib) => {
                debug!("从本地缓存加载规则库成功");
                return Ok(rule_lib);
            }
            Err(e) => warn!("本地缓存不存在或损坏（{}），将拉取远程规则库", e),
        }

        // 3. 拉取远程规则库
        let rule_lib = Self::fetch_remote(config).await?;

        // 4. 缓存到本地，失败不影响本次加载
        if let Err(e) = RuleCacheManager::save_to_cache(config, &rule_lib).await {
            warn!("规则库缓存到本地失败：{}", e);
        } else {
            debug!("远程规则库已缓存到本地");
        }

        Ok(rule_lib)
    }

    /// 读取本地 YAML 规则文件
    pub async fn from_path(path: impl AsRef<Path>) -> UaResult<RuleLibrary> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await.map_err(|e| {
            UaParserError::RuleLoadError(format!("读取规则文件 {} 失败：{}", path.display(), e))
        })?;
        let rule_lib = Self::from_yaml_slice(&data)?;
        debug!("从本地文件 {} 加载规则库成功", path.display());
        Ok(rule_lib)
    }

    /// 解析 YAML 文本
    pub fn from_yaml_str(data: &str) -> UaResult<RuleLibrary> {
        let rule_lib: RuleLibrary = serde_yaml::from_str(data)?;
        Self::log_rule_counts(&rule_lib);
        Ok(rule_lib)
    }

    /// 解析 YAML 字节
    pub fn from_yaml_slice(data: &[u8]) -> UaResult<RuleLibrary> {
        let rule_lib: RuleLibrary = serde_yaml::from_slice(data)?;
        Self::log_rule_counts(&rule_lib);
        Ok(rule_lib)
    }

    /// 强制拉取远程规则库，原始URL失败时尝试GitHub代理
    pub async fn fetch_remote(config: &GlobalConfig) -> UaResult<RuleLibrary> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout))
            .build()?;

        let raw_url = Url::parse(&config.remote_rules_url)?;
        let proxy_path = config
            .remote_rules_url
            .trim_start_matches("https://")
            .trim_start_matches("http://");
        let fallback_url = Url::parse(&format!("{}{}", config.gh_proxy_url, proxy_path))?;

        debug!("开始拉取远程规则库，URL：{}", raw_url);
        match Self::fetch_rule_file(&client, &raw_url).await {
            Ok(rule_lib) => Ok(rule_lib),
            Err(e) => {
                warn!("拉取原始URL失败：{}，尝试代理URL：{}", e, fallback_url);
                Self::fetch_rule_file(&client, &fallback_url).await.map_err(|proxy_e| {
                    UaParserError::RuleLoadError(format!(
                        "远程规则库拉取失败，原始URL：{}；代理URL：{}",
                        e, proxy_e
                    ))
                })
            }
        }
    }

    async fn fetch_rule_file(client: &Client, url: &Url) -> UaResult<RuleLibrary> {
        let response = client
            .get(url.clone())
            .header("User-Agent", concat!("rsuaparser/", env!("CARGO_PKG_VERSION")))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UaParserError::RuleLoadError(format!(
                "URL {} 返回状态码 {}",
                url,
                response.status()
            )));
        }

        let body = response.bytes().await?;
        Self::from_yaml_slice(&body)
    }

    fn log_rule_counts(rule_lib: &RuleLibrary) {
        debug!(
            "规则库解析完成：UA规则{}条、OS规则{}条、设备规则{}条",
            rule_lib.user_agent_parsers.len(),
            rule_lib.os_parsers.len(),
            rule_lib.device_parsers.len()
        );
    }
}
