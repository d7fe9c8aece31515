//! 紧凑客户端ID
//! 格式：`<规则版本号> <UA规则下标> <OS规则下标> <设备规则下标>`，单个空格分隔，-1 表示未命中
//! ID 不自描述：只有配合生成它的同一版本规则库和同一条原始 UA 才能还原

use std::fmt;
use std::str::FromStr;

use crate::error::{Facet, ResolveError};

/// 字段分隔符，规则版本号中不允许出现
pub const ID_SEPARATOR: char = ' ';

/// 未命中任何规则的下标
pub const NO_MATCH_INDEX: i64 = -1;

/// 解码后的客户端ID
///
/// `parse()` 是宽松解码：只校验字段数量、下标为整数且不小于 -1，
/// 不检查规则版本和规则数量，也不重新匹配 UA。
/// 需要还原解析结果时使用 `UaParser::resolve`，它按完整流程校验。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientId {
    pub data_version: String,
    pub user_agent: Option<usize>,
    pub os: Option<usize>,
    pub device: Option<usize>,
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}{sep}{}",
            self.data_version,
            encode_index(self.user_agent),
            encode_index(self.os),
            encode_index(self.device),
            sep = ID_SEPARATOR
        )
    }
}

/// 宽松解码，上界依赖具体规则库，由 `UaParser::resolve` 校验
impl FromStr for ClientId {
    type Err = ResolveError;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        let raw = RawClientId::split(id)?;
        Ok(Self {
            data_version: raw.data_version.to_string(),
            user_agent: raw.index(Facet::UserAgent, None)?,
            os: raw.index(Facet::Os, None)?,
            device: raw.index(Facet::Device, None)?,
        })
    }
}

fn encode_index(index: Option<usize>) -> i64 {
    index.map_or(NO_MATCH_INDEX, |i| i as i64)
}

/// 按分隔符切分但尚未解析下标的ID
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawClientId<'a> {
    id: &'a str,
    pub data_version: &'a str,
    indices: [&'a str; 3],
}

impl<'a> RawClientId<'a> {
    /// 必须恰好四个字段
    pub fn split(id: &'a str) -> Result<Self, ResolveError> {
        let mut fields = id.split(ID_SEPARATOR);
        match (fields.next(), fields.next(), fields.next(), fields.next(), fields.next()) {
            (Some(data_version), Some(ua), Some(os), Some(device), None) => Ok(Self {
                id,
                data_version,
                indices: [ua, os, device],
            }),
            _ => Err(ResolveError::InvalidIdentifier(id.to_string())),
        }
    }

    /// 解析某个维度的下标
    /// 非数字为格式错误；小于 -1 或不小于 `rule_count` 为越界
    pub fn index(&self, facet: Facet, rule_count: Option<usize>) -> Result<Option<usize>, ResolveError> {
        let raw = match facet {
            Facet::UserAgent => self.indices[0],
            Facet::Os => self.indices[1],
            Facet::Device => self.indices[2],
        };
        let index: i64 = raw
            .parse()
            .map_err(|_| ResolveError::InvalidIdentifier(self.id.to_string()))?;

        if index == NO_MATCH_INDEX {
            return Ok(None);
        }

        let out_of_range = || ResolveError::IndexOutOfRange {
            facet,
            index,
            rule_count: rule_count.unwrap_or(0),
        };
        let index = usize::try_from(index).map_err(|_| out_of_range())?;
        match rule_count {
            Some(count) if index >= count => Err(out_of_range()),
            _ => Ok(Some(index)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        let id = ClientId {
            data_version: "v1".to_string(),
            user_agent: Some(3),
            os: None,
            device: Some(0),
        };
        assert_eq!(id.to_string(), "v1 3 -1 0");
    }

    #[test]
    fn test_encode_empty_version() {
        let id = ClientId {
            data_version: String::new(),
            user_agent: None,
            os: None,
            device: None,
        };
        assert_eq!(id.to_string(), " -1 -1 -1");
        assert_eq!(id.to_string().parse::<ClientId>().unwrap(), id);
    }

    #[test]
    fn test_decode() {
        let id: ClientId = "2024.01 12 -1 7".parse().unwrap();
        assert_eq!(id.data_version, "2024.01");
        assert_eq!(id.user_agent, Some(12));
        assert_eq!(id.os, None);
        assert_eq!(id.device, Some(7));
    }

    #[test]
    fn test_decode_rejects_wrong_field_count() {
        for id in ["", "v1", "v1 1 2", "v1 1 2 3 4", "v1  1 2 3"] {
            assert_eq!(
                id.parse::<ClientId>().unwrap_err(),
                ResolveError::InvalidIdentifier(id.to_string()),
                "id = {:?}",
                id
            );
        }
    }

    #[test]
    fn test_decode_rejects_non_numeric_index() {
        for id in ["v1 a 0 0", "v1 0 1.5 0", "v1 0 0 ", "v1 0 0 99999999999999999999"] {
            assert!(matches!(
                id.parse::<ClientId>(),
                Err(ResolveError::InvalidIdentifier(_))
            ));
        }
    }

    #[test]
    fn test_decode_rejects_index_below_none_marker() {
        assert_eq!(
            "v1 0 -2 0".parse::<ClientId>().unwrap_err(),
            ResolveError::IndexOutOfRange {
                facet: Facet::Os,
                index: -2,
                rule_count: 0
            }
        );
    }

    #[test]
    fn test_raw_index_upper_bound() {
        let raw = RawClientId::split("v1 4 0 -1").unwrap();
        assert_eq!(raw.index(Facet::UserAgent, Some(5)).unwrap(), Some(4));
        assert!(matches!(
            raw.index(Facet::UserAgent, Some(4)),
            Err(ResolveError::IndexOutOfRange { index: 4, rule_count: 4, .. })
        ));
        assert_eq!(raw.index(Facet::Device, Some(0)).unwrap(), None);
    }
}
