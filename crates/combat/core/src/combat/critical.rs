/// Effective critical multiplier.
///
/// `base + bonus` is the raw multiplier; `reduction_percent` (clamped to
/// 0..=100) cancels part of the portion above 1.0. The result never drops
/// below the non-critical 1.0.
pub fn critical_multiplier(base: f64, bonus: f64, reduction_percent: i32) -> f64 {
    let extra = (base + bonus - 1.0).max(0.0);
    let kept = f64::from(100 - reduction_percent.clamp(0, 100)) / 100.0;
    1.0 + extra * kept
}
