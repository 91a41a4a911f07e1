//! Session code generation.
//!
//! Codes are short human-shareable strings: six decimal digits,
//! uniform over `[100000, 999999]`.

use rand::Rng;
use signal_types::SessionCode;

const CODE_MIN: u32 = 100_000;
const CODE_MAX: u32 = 999_999;

/// Generate one candidate code.
pub fn generate(rng: &mut impl Rng) -> SessionCode {
    SessionCode::new(rng.gen_range(CODE_MIN..=CODE_MAX).to_string())
}

/// Generate a code for which `taken` returns false.
///
/// Retries without bound; with six-digit codes the collision rate is
/// negligible for any realistic number of live sessions, so there is
/// no error path.
pub fn unique(rng: &mut impl Rng, taken: impl Fn(&SessionCode) -> bool) -> SessionCode {
    loop {
        let code = generate(rng);
        if !taken(&code) {
            return code;
        }
    }
}
