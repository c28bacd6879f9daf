//! Configuration for a pool store.

/// Colors offered for dice, bags and new custom dice.
pub const PRESET_COLORS: [&str; 10] = [
    "#ef4444", "#3b82f6", "#22c55e", "#eab308", "#a855f7", "#f97316", "#06b6d4", "#ec4899",
    "#f1f5f9", "#475569",
];

/// Events kept per pool, and in the global history view.
pub const DEFAULT_HISTORY_CAP: usize = 30;

/// Items of each preset color in a new blind bag.
pub const DEFAULT_BAG_QUANTITY: u32 = 5;

/// Narrowest accepted sidebar width, in pixels.
pub const MIN_SIDEBAR_WIDTH: u32 = 250;

/// Widest accepted sidebar width, in pixels.
pub const MAX_SIDEBAR_WIDTH: u32 = 650;

/// Sidebar width used when none was persisted.
pub const DEFAULT_SIDEBAR_WIDTH: u32 = 320;

/// Configuration for a [`PoolStore`](crate::PoolStore).
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// RNG seed for reproducible rolls; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Maximum events kept in each pool's history.
    pub history_cap: usize,
    /// Maximum events returned by the global history view.
    pub global_history_cap: usize,
    /// Colors for new bags, and cycled through for new custom dice.
    pub preset_colors: Vec<String>,
    /// Items of each color in a new blind bag.
    pub bag_quantity: u32,
    /// Name given to new standard pools.
    pub standard_pool_name: String,
    /// Name given to new blind-bag pools.
    pub blind_bag_pool_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed: None,
            history_cap: DEFAULT_HISTORY_CAP,
            global_history_cap: DEFAULT_HISTORY_CAP,
            preset_colors: PRESET_COLORS.iter().map(|c| c.to_string()).collect(),
            bag_quantity: DEFAULT_BAG_QUANTITY,
            standard_pool_name: "Combat Pool".to_string(),
            blind_bag_pool_name: "Logistics Bag".to_string(),
        }
    }
}

impl StoreConfig {
    /// Seed the RNG.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set both history caps (at least 1).
    pub fn with_history_cap(mut self, cap: usize) -> Self {
        self.history_cap = cap.max(1);
        self.global_history_cap = cap.max(1);
        self
    }

    /// Replace the preset colors.
    pub fn with_preset_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preset_colors = colors.into_iter().map(Into::into).collect();
        self
    }

    /// Set the per-color quantity of new blind bags.
    pub fn with_bag_quantity(mut self, quantity: u32) -> Self {
        self.bag_quantity = quantity;
        self
    }

    /// The `n`th preset color, cycling; white when no presets exist.
    pub fn preset_color(&self, n: usize) -> String {
        if self.preset_colors.is_empty() {
            return "#f1f5f9".to_string();
        }
        self.preset_colors[n % self.preset_colors.len()].clone()
    }
}
