//! Market data snapshots supplied by the data provider and broker.

use chrono::NaiveDate;

/// A position currently held, valued at the last mark.
#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    pub ticker: String,
    pub market_value: f64,
}

/// Real-time quote for one ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub last_price: f64,
    pub limit_up: f64,
    pub limit_down: f64,
}

impl Snapshot {
    /// Price pinned at (or within rounding of) the limit-up band.
    pub fn is_limit_up(&self) -> bool {
        self.limit_up > 0.0 && self.last_price >= self.limit_up * 0.999
    }

    pub fn is_limit_down(&self) -> bool {
        self.limit_down > 0.0 && self.last_price <= self.limit_down * 1.001
    }
}

/// Previous session close and its limit-up price for one ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct PrevClose {
    pub close: f64,
    pub limit_up: f64,
}

impl PrevClose {
    /// Whether the ticker finished the previous session pinned at limit-up.
    pub fn closed_limit_up(&self) -> bool {
        self.limit_up > 0.0 && self.close >= self.limit_up * 0.999
    }
}

/// Static listing information for one ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityInfo {
    pub listing_date: NaiveDate,
    pub is_st: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_limit_up_detection() {
        let snap = Snapshot {
            last_price: 11.0,
            limit_up: 11.0,
            limit_down: 9.0,
        };
        assert!(snap.is_limit_up());
        assert!(!snap.is_limit_down());
    }

    #[test]
    fn snapshot_limit_up_rounding_tolerance() {
        // 10.995 vs limit 11.0 is within the 0.1% band
        let snap = Snapshot {
            last_price: 10.995,
            limit_up: 11.0,
            limit_down: 9.0,
        };
        assert!(snap.is_limit_up());
    }

    #[test]
    fn snapshot_mid_band() {
        let snap = Snapshot {
            last_price: 10.0,
            limit_up: 11.0,
            limit_down: 9.0,
        };
        assert!(!snap.is_limit_up());
        assert!(!snap.is_limit_down());
    }

    #[test]
    fn snapshot_limit_down_detection() {
        let snap = Snapshot {
            last_price: 9.0,
            limit_up: 11.0,
            limit_down: 9.0,
        };
        assert!(snap.is_limit_down());
    }

    #[test]
    fn snapshot_zero_limits_never_match() {
        let snap = Snapshot {
            last_price: 10.0,
            limit_up: 0.0,
            limit_down: 0.0,
        };
        assert!(!snap.is_limit_up());
        assert!(!snap.is_limit_down());
    }

    #[test]
    fn prev_close_limit_up() {
        let prev = PrevClose {
            close: 11.0,
            limit_up: 11.0,
        };
        assert!(prev.closed_limit_up());

        let prev = PrevClose {
            close: 10.5,
            limit_up: 11.0,
        };
        assert!(!prev.closed_limit_up());
    }
}
