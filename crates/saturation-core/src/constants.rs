//! Constants used throughout the crate.

/// Default deterministic seed for RNG operations.
///
/// Same seed + same configuration = same Monte Carlo result.
/// The value `0x7468656D6573` is "themes" encoded in ASCII.
pub const DEFAULT_SEED: u64 = 0x7468656D6573;

/// Standard normal quantile for a two-sided 90% band.
pub const Z_90: f64 = 1.6448536269514722;

/// Standard normal quantile for a two-sided 95% band.
pub const Z_95: f64 = 1.959963984540054;

/// Standard normal quantile for a two-sided 99% band.
pub const Z_99: f64 = 2.5758293035489004;

// =============================================================================
// Search defaults
// =============================================================================

/// Default cap on the trial count explored by integer searches.
pub const DEFAULT_N_MAX: u64 = 2000;

/// Default cap on the per-trial probability explored by real searches.
pub const DEFAULT_P_MAX: f64 = 0.40;

/// Smallest probability a real search will bracket from.
pub const DEFAULT_P_FLOOR: f64 = 1e-4;

/// Bisection stops once the real bracket is narrower than this.
pub const DEFAULT_P_TOLERANCE: f64 = 1e-4;

/// Geometric growth factor for real bracket expansion.
pub const REAL_BRACKET_GROWTH: f64 = 1.8;

/// Additive nudge applied with each real bracket expansion, so a bracket
/// starting near zero still moves.
pub const REAL_BRACKET_NUDGE: f64 = 1e-4;

/// Smallest initial upper bound for a real bracket.
pub const REAL_BRACKET_MIN_HI: f64 = 0.002;

/// Smallest initial upper bound for an integer bracket.
pub const INTEGER_BRACKET_MIN_HI: u64 = 3;

/// Hard cap on real bisection iterations.
///
/// A bracket of width 1 reaches `1e-12` in 40 halvings, so this only guards
/// against a non-finite tolerance.
pub const MAX_BISECTION_ITERATIONS: usize = 64;

// =============================================================================
// Simulation defaults
// =============================================================================

/// Default population size per experiment.
pub const DEFAULT_POPULATION: usize = 1000;

/// Default number of independent experiments per evaluation point.
pub const DEFAULT_EXPERIMENTS: usize = 1000;

/// Default number of interviews in a synthetic interview population.
pub const DEFAULT_INTERVIEWS: usize = 200;

/// Default number of distinct themes in a synthetic interview population.
pub const DEFAULT_THEMES: usize = 800;

/// Default mean number of theme tokens emitted per interview.
pub const DEFAULT_MEAN_TOKENS: f64 = 20.0;

/// Default Zipf exponent of the theme distribution.
pub const DEFAULT_ZIPF_EXPONENT: f64 = 1.05;
