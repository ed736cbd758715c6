//! 服务器配置，从环境变量读取，缺省值与单机默认一致。

use std::net::SocketAddr;
use std::str::FromStr;

use casino_eden_core::TableConfig;
use thiserror::Error;

pub const DEFAULT_BIND: &str = "0.0.0.0:25917";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("环境变量 {key} 的值无效: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// 监听地址 (CASINO_BIND)
    pub bind: SocketAddr,
    /// 每个房间牌桌的配置 (CASINO_STARTING_BALANCE, CASINO_MAX_PLAYERS)
    pub table: TableConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 用任意的键值来源构造配置，方便测试
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = TableConfig::default();
        let bind = match lookup("CASINO_BIND") {
            Some(value) => parse("CASINO_BIND", value)?,
            None => DEFAULT_BIND.parse().map_err(|_| ConfigError::Invalid {
                key: "CASINO_BIND",
                value: DEFAULT_BIND.to_string(),
            })?,
        };
        let starting_balance = match lookup("CASINO_STARTING_BALANCE") {
            Some(value) => parse("CASINO_STARTING_BALANCE", value)?,
            None => defaults.starting_balance,
        };
        let max_players = match lookup("CASINO_MAX_PLAYERS") {
            Some(value) => parse::<usize>("CASINO_MAX_PLAYERS", value)?,
            None => defaults.max_players,
        };
        if max_players == 0 {
            return Err(ConfigError::Invalid { key: "CASINO_MAX_PLAYERS", value: "0".into() });
        }

        Ok(ServerConfig {
            bind,
            table: TableConfig { starting_balance, max_players, ..defaults },
        })
    }
}

fn parse<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid { key, value })
}
