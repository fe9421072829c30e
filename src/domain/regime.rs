//! Market regime classification from turnover trend and sector returns.

/// Coarse market state for one rebalance cycle. Not persisted across cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegimeLabel {
    Normal,
    Contracting,
    /// Insufficient history for the requested windows. Never vetoes.
    Unknown,
}

impl RegimeLabel {
    pub fn vetoes(self) -> bool {
        matches!(self, RegimeLabel::Contracting)
    }
}

impl std::fmt::Display for RegimeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegimeLabel::Normal => write!(f, "NORMAL"),
            RegimeLabel::Contracting => write!(f, "CONTRACTING"),
            RegimeLabel::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegimeConfig {
    /// Moving-average window over the turnover series.
    pub trend_window: usize,
    /// How many periods back the moving average is compared against.
    pub slope_window: usize,
    /// Turnover MA growth at or below this is contracting (0.1 = 10%).
    pub turnover_growth_threshold: f64,
    /// Sector index return (last/first) at or below this is contracting
    /// (0.9 = a 10% decline).
    pub sector_return_threshold: f64,
}

impl Default for RegimeConfig {
    fn default() -> Self {
        RegimeConfig {
            trend_window: 20,
            slope_window: 5,
            turnover_growth_threshold: 0.1,
            sector_return_threshold: 0.9,
        }
    }
}

/// Classify the market from aggregate turnover and a sector index.
///
/// The turnover series gets a moving average over `trend_window`; the last
/// MA value is compared against the MA value `slope_window` periods earlier.
/// Growth at or below `turnover_growth_threshold`, or a sector return
/// (`last level / first level`) at or below `sector_return_threshold`,
/// labels the market `Contracting`; otherwise `Normal`.
///
/// Returns `Unknown` when either series is too short for the requested
/// windows, or when a reference value is non-positive (the relative change
/// would be meaningless). Callers treat `Unknown` as non-vetoing.
pub fn classify(turnover: &[f64], sector_levels: &[f64], config: &RegimeConfig) -> RegimeLabel {
    if config.trend_window == 0 || config.slope_window == 0 {
        return RegimeLabel::Unknown;
    }
    if turnover.len() < config.trend_window + config.slope_window {
        return RegimeLabel::Unknown;
    }
    if sector_levels.len() < 2 {
        return RegimeLabel::Unknown;
    }

    let ma = moving_average(turnover, config.trend_window);
    // len >= slope_window + 1 follows from the length check above.
    let last = ma[ma.len() - 1];
    let reference = ma[ma.len() - 1 - config.slope_window];
    if reference <= 0.0 {
        return RegimeLabel::Unknown;
    }
    let turnover_growth = (last - reference) / reference;

    let first_level = sector_levels[0];
    if first_level <= 0.0 {
        return RegimeLabel::Unknown;
    }
    let sector_return = sector_levels[sector_levels.len() - 1] / first_level;

    if turnover_growth <= config.turnover_growth_threshold
        || sector_return <= config.sector_return_threshold
    {
        RegimeLabel::Contracting
    } else {
        RegimeLabel::Normal
    }
}

/// Simple moving average; output has `len - window + 1` points.
fn moving_average(series: &[f64], window: usize) -> Vec<f64> {
    let mut values = Vec::with_capacity(series.len() + 1 - window);
    let mut sum: f64 = series[..window].iter().sum();
    values.push(sum / window as f64);
    for i in window..series.len() {
        sum += series[i] - series[i - window];
        values.push(sum / window as f64);
    }
    values
}
