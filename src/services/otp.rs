// SPDX-License-Identifier: MIT

//! One-time password generation.

use anyhow::Context;
use ring::rand::{SecureRandom, SystemRandom};

const OTP_MIN: u32 = 100_000;
const OTP_RANGE: u32 = 900_000;

/// Generate a 6-digit OTP, uniform over [100000, 999999].
///
/// Uses the OS CSPRNG; draws in the final partial bucket are rejected so the
/// modulo reduction stays uniform.
pub fn generate() -> anyhow::Result<String> {
    let rng = SystemRandom::new();
    let zone = (u32::MAX / OTP_RANGE) * OTP_RANGE;

    loop {
        let mut buf = [0u8; 4];
        rng.fill(&mut buf)
            .map_err(|_| anyhow::anyhow!("system RNG failure"))
            .context("OTP generation failed")?;

        let draw = u32::from_be_bytes(buf);
        if draw < zone {
            return Ok((OTP_MIN + draw % OTP_RANGE).to_string());
        }
    }
}
