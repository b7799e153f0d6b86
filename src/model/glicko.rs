//! Glicko-2 rating math.
//!
//! Everything here works on a single player and is free of shared state. Ratings are
//! converted onto the Glicko-2 scale (`mu`, `phi`) for the update and converted back
//! afterwards. Clamping into the committed range is left to the caller.
use std::f64::consts::PI;

use thiserror::Error;

use crate::model::{
    constants::{CONVERGENCE_TOLERANCE, MAX_SOLVER_ITERATIONS, RATING_CENTER, SCALE},
    structures::player_rating::PlayerRating
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvergenceError {
    #[error("no sign change found while bracketing the volatility root")]
    NoSignChange,

    #[error("volatility root not found within {iterations} iterations")]
    NotConverged { iterations: usize }
}

/// Converts a rating and deviation onto the Glicko-2 scale, returning `(mu, phi)`.
pub fn scale(rating: f64, deviation: f64) -> (f64, f64) {
    ((rating - RATING_CENTER) / SCALE, deviation / SCALE)
}

/// Inverse of [`scale`], returning `(rating, deviation)`.
pub fn unscale(mu: f64, phi: f64) -> (f64, f64) {
    (RATING_CENTER + SCALE * mu, SCALE * phi)
}

/// Discount applied to an opponent's rating by their uncertainty.
pub fn g(phi: f64) -> f64 {
    1.0 / (1.0 + 3.0 * phi * phi / (PI * PI)).sqrt()
}

/// Expected score of a player at `mu` against an opponent at `(mu_j, phi_j)`.
pub fn expectation(mu: f64, mu_j: f64, phi_j: f64) -> f64 {
    1.0 / (1.0 + (-g(phi_j) * (mu - mu_j)).exp())
}

/// Deviation after one idle rating period: `phi* = sqrt(phi^2 + sigma^2)`.
pub fn phi_star(phi: f64, volatility: f64) -> f64 {
    (phi * phi + volatility * volatility).sqrt()
}

/// Idle-round update for a previously active player.
/// Only the deviation grows; rating and volatility carry over.
pub fn decay(player: &PlayerRating) -> PlayerRating {
    let (mu, phi) = scale(player.rating, player.deviation);
    let (_, deviation) = unscale(mu, phi_star(phi, player.volatility));

    PlayerRating {
        deviation,
        ..*player
    }
}

/// Rates `player` against every `(opponent, outcome)` faced in one round.
///
/// `games` must not be empty. The returned rating is marked active and is not clamped.
pub fn rate<'a, I>(player: &PlayerRating, games: I, tau: f64) -> Result<PlayerRating, ConvergenceError>
where
    I: IntoIterator<Item = (&'a PlayerRating, f64)>
{
    let (mu, phi) = scale(player.rating, player.deviation);

    let mut variance_inv = 0.0;
    let mut improvement = 0.0;
    for (opponent, outcome) in games {
        let (mu_j, phi_j) = scale(opponent.rating, opponent.deviation);
        let g_j = g(phi_j);
        let e_j = expectation(mu, mu_j, phi_j);

        variance_inv += g_j * g_j * e_j * (1.0 - e_j);
        improvement += g_j * (outcome - e_j);
    }

    let v = 1.0 / variance_inv;
    let delta = v * improvement;

    let volatility = solve_volatility(delta, phi, v, player.volatility, tau)?;

    let phi_star = phi_star(phi, volatility);
    let new_phi = 1.0 / (1.0 / (phi_star * phi_star) + 1.0 / v).sqrt();
    let new_mu = mu + new_phi * new_phi * improvement;
    let (rating, deviation) = unscale(new_mu, new_phi);

    Ok(PlayerRating {
        rating,
        deviation,
        volatility,
        active: true
    })
}

/// Finds the new volatility with the Illinois variant of regula falsi.
fn solve_volatility(delta: f64, phi: f64, v: f64, volatility: f64, tau: f64) -> Result<f64, ConvergenceError> {
    solve_volatility_within(
        delta,
        phi,
        v,
        volatility,
        tau,
        CONVERGENCE_TOLERANCE,
        MAX_SOLVER_ITERATIONS
    )
}

fn solve_volatility_within(
    delta: f64,
    phi: f64,
    v: f64,
    volatility: f64,
    tau: f64,
    tolerance: f64,
    max_iterations: usize
) -> Result<f64, ConvergenceError> {
    let a = (volatility * volatility).ln();
    let delta2 = delta * delta;
    let phi2 = phi * phi;
    let tau2 = tau * tau;

    let f = |x: f64| {
        let ex = x.exp();
        let denominator = phi2 + v + ex;
        ex * (delta2 - phi2 - v - ex) / (2.0 * denominator * denominator) - (x - a) / tau2
    };

    let mut lower = a;
    let mut upper = if delta2 > phi2 + v {
        (delta2 - phi2 - v).ln()
    } else {
        let mut k = 1.0;
        let mut steps = 0;
        while f(a - k * tau) < 0.0 {
            steps += 1;
            if steps >= max_iterations {
                return Err(ConvergenceError::NoSignChange);
            }
            k += 1.0;
        }
        a - k * tau
    };

    let mut f_lower = f(lower);
    let mut f_upper = f(upper);
    if !f_lower.is_finite() || !f_upper.is_finite() || f_lower * f_upper > 0.0 {
        return Err(ConvergenceError::NoSignChange);
    }

    let mut iterations = 0;
    while (upper - lower).abs() > tolerance {
        if iterations >= max_iterations {
            return Err(ConvergenceError::NotConverged { iterations });
        }
        iterations += 1;

        let c = lower + (lower - upper) * f_lower / (f_upper - f_lower);
        let f_c = f(c);

        if f_c * f_upper <= 0.0 {
            lower = upper;
            f_lower = f_upper;
        } else {
            f_lower /= 2.0;
        }

        upper = c;
        f_upper = f_c;
    }

    Ok((lower / 2.0).exp())
}
