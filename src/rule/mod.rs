//! 规则模块：负责规则的加载、缓存、数据模型定义
pub mod model;
pub mod cache;
pub mod loader;

// 导出核心接口
pub use self::model::{
    Client, Device, DeviceRule, FAMILY_UNKNOWN, Os, OsRule, RuleLibrary, UserAgent, UserAgentRule,
};
pub use self::loader::RuleLoader;
pub use self::cache::RuleCacheManager;
