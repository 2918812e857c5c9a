//! Darkness level to window opacity mapping.
//!
//! `_NET_WM_WINDOW_OPACITY` is a 32-bit cardinal whose high byte is the alpha
//! the compositor blends with; the low 24 bits stay zero (black channels).

/// Fully opaque black.
pub const FULL_ALPHA: u32 = 0xFF00_0000;

/// The five fixed opacities of the stepped scale, levels 1 through 5.
const STEP_TABLE: [u32; 5] = [
    0x3300_0000,
    0x6600_0000,
    0x9900_0000,
    0xCC00_0000,
    0xFF00_0000,
];

/// Level-to-opacity policy. Each binary picks one variant; everything else
/// about the overlay lifecycle is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpacityScale {
    /// Continuous linear mapping over `levels` steps; `level == levels` is
    /// fully opaque.
    Linear { levels: u32 },
    /// Five fixed steps, 20% apart.
    Stepped,
}

impl OpacityScale {
    /// Highest valid darkness level for this scale.
    pub fn max_level(&self) -> u32 {
        match self {
            Self::Linear { levels } => *levels,
            Self::Stepped => STEP_TABLE.len() as u32,
        }
    }

    /// Midpoint of the valid range, used when no level is given on the
    /// command line (10 of 20, 3 of 5).
    pub fn default_level(&self) -> u32 {
        (self.max_level() + 1) / 2
    }

    /// Clamp any integer into the valid `[1, max]` range. Out-of-range
    /// values snap silently to the nearest boundary.
    pub fn clamp_level(&self, raw: i64) -> u32 {
        raw.clamp(1, self.max_level() as i64) as u32
    }

    /// 32-bit ARGB opacity for a level.
    pub fn opacity(&self, level: u32) -> u32 {
        match self {
            // Widen before multiplying so level * 0xFF000000 cannot overflow.
            Self::Linear { levels } => {
                (level as u64 * FULL_ALPHA as u64 / *levels as u64) as u32
            }
            // Out-of-table levels fall back to the level-3 value.
            Self::Stepped => STEP_TABLE
                .get(level.wrapping_sub(1) as usize)
                .copied()
                .unwrap_or(STEP_TABLE[2]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINEAR_20: OpacityScale = OpacityScale::Linear { levels: 20 };

    #[test]
    fn test_clamp_out_of_range() {
        assert_eq!(LINEAR_20.clamp_level(0), 1);
        assert_eq!(LINEAR_20.clamp_level(-7), 1);
        assert_eq!(LINEAR_20.clamp_level(40), 20);
        assert_eq!(LINEAR_20.clamp_level(15), 15);
        assert_eq!(OpacityScale::Stepped.clamp_level(99), 5);
        assert_eq!(OpacityScale::Stepped.clamp_level(-1), 1);
        assert_eq!(OpacityScale::Stepped.clamp_level(2), 2);
    }

    #[test]
    fn test_default_is_midpoint() {
        assert_eq!(LINEAR_20.default_level(), 10);
        assert_eq!(OpacityScale::Stepped.default_level(), 3);
    }

    #[test]
    fn test_linear_monotonic_with_exact_endpoints() {
        let mut prev = 0;
        for level in 1..=20 {
            let opacity = LINEAR_20.opacity(level);
            assert!(opacity >= prev, "opacity decreased at level {}", level);
            prev = opacity;
        }
        assert_eq!(LINEAR_20.opacity(20), FULL_ALPHA);
        // Level 1 is 5% of full alpha, modulo integer-division rounding.
        assert_eq!(LINEAR_20.opacity(1), FULL_ALPHA / 20);
    }

    #[test]
    fn test_stepped_table_exact() {
        let expected = [
            0x3300_0000,
            0x6600_0000,
            0x9900_0000,
            0xCC00_0000,
            0xFF00_0000,
        ];
        for (i, want) in expected.iter().enumerate() {
            assert_eq!(OpacityScale::Stepped.opacity(i as u32 + 1), *want);
        }
    }

    #[test]
    fn test_stepped_out_of_table_falls_back_to_level_three() {
        assert_eq!(OpacityScale::Stepped.opacity(0), 0x9900_0000);
        assert_eq!(OpacityScale::Stepped.opacity(6), 0x9900_0000);
    }

    #[test]
    fn test_overshooting_arg_matches_max_level() {
        // "40" on the 20-level command line behaves exactly like "20".
        let clamped = LINEAR_20.opacity(LINEAR_20.clamp_level(40));
        let exact = LINEAR_20.opacity(LINEAR_20.clamp_level(20));
        assert_eq!(clamped, exact);
        assert_eq!(clamped, FULL_ALPHA);
    }

    #[test]
    fn test_stepped_default_opacity() {
        let scale = OpacityScale::Stepped;
        assert_eq!(scale.opacity(scale.default_level()), 0x9900_0000);
    }
}
