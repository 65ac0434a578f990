use solvent_select_core::{PathPolicy, RangeBounds, ScoreRounding};

pub const ENV_PATH_MIN_SCORE: &str = "SOLVENT_SELECT_PATH_MIN_SCORE";
pub const ENV_PATH_MAX_STEPS: &str = "SOLVENT_SELECT_PATH_MAX_STEPS";
pub const ENV_SCORE_DECIMALS: &str = "SOLVENT_SELECT_SCORE_DECIMALS";
pub const ENV_SCORE_ROUNDING: &str = "SOLVENT_SELECT_SCORE_ROUNDING";
pub const ENV_RANGE_BOUNDS: &str = "SOLVENT_SELECT_RANGE_BOUNDS";

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineConfig {
    pub rounding: ScoreRounding,
    pub path: PathPolicy,
    pub range_bounds: RangeBounds,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any key lookup; unparsable values fall back to
    /// defaults and numbers are clamped to sane bounds.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let min_score = lookup(ENV_PATH_MIN_SCORE)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(defaults.path.min_score)
            .clamp(0.0, 10.0);
        let max_steps = lookup(ENV_PATH_MAX_STEPS)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(defaults.path.max_steps)
            .clamp(1, 100_000);
        let decimals = lookup(ENV_SCORE_DECIMALS)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(1)
            .clamp(0, 6);
        let rounding = match lookup(ENV_SCORE_ROUNDING)
            .map(|v| v.trim().to_ascii_lowercase())
            .as_deref()
        {
            Some("per-group" | "per_group" | "group") => ScoreRounding::PerGroup { decimals },
            _ => ScoreRounding::FinalOnly { decimals },
        };
        let range_bounds = match lookup(ENV_RANGE_BOUNDS)
            .map(|v| v.trim().to_ascii_lowercase())
            .as_deref()
        {
            Some("inclusive") => RangeBounds::Inclusive,
            _ => RangeBounds::Exclusive,
        };

        Self {
            rounding,
            path: PathPolicy {
                min_score,
                max_steps,
            },
            range_bounds,
        }
    }
}
