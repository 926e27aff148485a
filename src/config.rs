use crate::errors::{EngineError, EngineResult};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub default_min_legs: usize,
    pub default_max_legs: usize,
    pub default_ev_min: f64,
    pub default_stake_base: f64,
    pub default_top_n: usize,
    pub default_bankroll: f64,
}

impl AppConfig {
    pub fn from_env() -> EngineResult<Self> {
        dotenvy::dotenv().ok();

        let server_port = env_var_or("SERVER_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| EngineError::Config(format!("SERVER_PORT: {e}")))?;

        let default_min_legs = env_var_or("DEFAULT_MIN_LEGS", "2")
            .parse::<usize>()
            .map_err(|e| EngineError::Config(format!("DEFAULT_MIN_LEGS: {e}")))?;

        let default_max_legs = env_var_or("DEFAULT_MAX_LEGS", "3")
            .parse::<usize>()
            .map_err(|e| EngineError::Config(format!("DEFAULT_MAX_LEGS: {e}")))?;

        let default_ev_min = env_var_or("DEFAULT_EV_MIN", "0.0")
            .parse::<f64>()
            .map_err(|e| EngineError::Config(format!("DEFAULT_EV_MIN: {e}")))?;

        let default_stake_base = env_var_or("DEFAULT_STAKE_BASE", "100.0")
            .parse::<f64>()
            .map_err(|e| EngineError::Config(format!("DEFAULT_STAKE_BASE: {e}")))?;

        let default_top_n = env_var_or("DEFAULT_TOP_N", "20")
            .parse::<usize>()
            .map_err(|e| EngineError::Config(format!("DEFAULT_TOP_N: {e}")))?;

        let default_bankroll = env_var_or("DEFAULT_BANKROLL", "0.0")
            .parse::<f64>()
            .map_err(|e| EngineError::Config(format!("DEFAULT_BANKROLL: {e}")))?;

        Ok(Self {
            server_port,
            default_min_legs,
            default_max_legs,
            default_ev_min,
            default_stake_base,
            default_top_n,
            default_bankroll,
        })
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
