mod concurrency;

use ctor::ctor;

#[ctor]
fn logs() {
    env_logger::init();
}

/// Returns the number of rounds for stress tests. Can be overridden with
/// `MAGICSNIFF_STRESS_ITERATIONS`.
pub(crate) fn get_stress_iterations_count() -> usize {
    std::env::var("MAGICSNIFF_STRESS_ITERATIONS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(20)
}
