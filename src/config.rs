//! 全局配置管理,存储所有可配置项

use std::path::PathBuf;

/// uap-core 官方规则文件地址
pub const DEFAULT_REMOTE_RULES_URL: &str =
    "https://raw.githubusercontent.com/ua-parser/uap-core/master/regexes.yaml";

/// 全局配置
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    // 本地规则文件路径（设置后不再读取缓存和远程规则）
    pub rules_path: Option<PathBuf>,
    // 规则缓存路径
    pub rule_cache_path: PathBuf,
    // 远程规则文件URL
    pub remote_rules_url: String,
    // GitHub代理URL
    pub gh_proxy_url: String,
    // 超时配置（单位：秒）
    pub http_timeout: u64,
    // 规则版本号，写入客户端ID，不允许包含空格
    pub data_version: String,
    // 是否启用详细日志
    pub verbose: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            rules_path: None,
            rule_cache_path: PathBuf::from("uap_rules.mp"),
            remote_rules_url: DEFAULT_REMOTE_RULES_URL.to_string(),
            gh_proxy_url: "https://ghfast.top/".to_string(),
            http_timeout: 30,
            data_version: String::new(),
            verbose: false,
        }
    }
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置
    pub fn get_default() -> GlobalConfig {
        GlobalConfig::default()
    }

    /// 自定义配置
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }
}

/// 配置构建器（便于自定义配置）
#[derive(Debug, Clone, Default)]
pub struct CustomConfigBuilder {
    config: GlobalConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: GlobalConfig::default(),
        }
    }

    pub fn rules_path(mut self, path: PathBuf) -> Self {
        self.config.rules_path = Some(path);
        self
    }

    pub fn rule_cache_path(mut self, path: PathBuf) -> Self {
        self.config.rule_cache_path = path;
        self
    }

    pub fn remote_rules_url(mut self, url: String) -> Self {
        self.config.remote_rules_url = url;
        self
    }

    pub fn gh_proxy_url(mut self, url: String) -> Self {
        self.config.gh_proxy_url = url;
        self
    }

    pub fn http_timeout(mut self, timeout: u64) -> Self {
        self.config.http_timeout = timeout;
        self
    }

    pub fn data_version(mut self, version: String) -> Self {
        self.config.data_version = version;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    pub fn build(self) -> GlobalConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConfigManager::get_default();
        assert!(config.rules_path.is_none());
        assert_eq!(config.remote_rules_url, DEFAULT_REMOTE_RULES_URL);
        assert_eq!(config.http_timeout, 30);
        assert!(config.data_version.is_empty());
    }

    #[test]
    fn test_custom_builder_overrides_fields() {
        let config = ConfigManager::custom()
            .rules_path(PathBuf::from("regexes.yaml"))
            .data_version("2024.1".to_string())
            .http_timeout(5)
            .verbose(true)
            .build();
        assert_eq!(config.rules_path, Some(PathBuf::from("regexes.yaml")));
        assert_eq!(config.data_version, "2024.1");
        assert_eq!(config.http_timeout, 5);
        assert!(config.verbose);
        // 未设置的字段保持默认值
        assert_eq!(config.rule_cache_path, PathBuf::from("uap_rules.mp"));
    }
}
