/// Convert whole seconds to milliseconds, saturating at `u64::MAX`
pub fn secs_to_millis(secs: u64) -> u64 {
    secs.saturating_mul(1000)
}
