//! Simulated Price Generation
//!
//! Pure domain logic: maps a tick index to a (symbol, price) quote and
//! formats it as a Server-Sent Events frame. No I/O and no clocks; the
//! tick cadence is owned by the session loop.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Ordered symbol set cycled by the generator. Never mutated.
pub const DEFAULT_SYMBOLS: [&str; 3] = ["XAI", "TSLA", "SPCE"];

/// Base price for simulated quotes.
const BASE_PRICE: f64 = 100.0;

/// Width of the random band above the base price.
const PRICE_SPREAD: f64 = 10.0;

/// One simulated price quote.
///
/// Value-only: created fresh per tick, written once, then discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    /// Ticker symbol, drawn from the fixed symbol set.
    pub symbol: &'static str,
    /// Simulated price in `[100.0, 110.0)`.
    pub price: f64,
}

impl Quote {
    /// Format this quote as a single SSE frame.
    ///
    /// Exact wire form: `data: {SYMBOL}: {PRICE}\n\n` with the price fixed
    /// to two decimal digits.
    #[must_use]
    pub fn to_frame(&self) -> String {
        format!("data: {}: {:.2}\n\n", self.symbol, self.price)
    }
}

/// Maps tick indices to quotes.
///
/// Symbol selection is deterministic (`symbols[i % len]`); the price is a
/// fresh draw from the generator's own RNG. One generator per session,
/// seeded once, so rapid consecutive draws never correlate.
#[derive(Debug)]
pub struct PriceGenerator {
    symbols: &'static [&'static str],
    rng: StdRng,
}

impl PriceGenerator {
    /// Create a generator over the default symbol set, seeded from OS
    /// entropy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Create a generator with an explicit RNG (deterministic tests).
    #[must_use]
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            symbols: &DEFAULT_SYMBOLS,
            rng,
        }
    }

    /// Produce the quote for the given tick index.
    pub fn quote_at(&mut self, tick_index: usize) -> Quote {
        let symbol = self.symbols[tick_index % self.symbols.len()];
        let price = BASE_PRICE + self.rng.random::<f64>() * PRICE_SPREAD;
        Quote { symbol, price }
    }
}

impl Default for PriceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_cycle_in_order() {
        let mut generator = PriceGenerator::with_rng(StdRng::seed_from_u64(7));

        let symbols: Vec<&str> = (0..10).map(|i| generator.quote_at(i).symbol).collect();
        assert_eq!(
            symbols,
            vec!["XAI", "TSLA", "SPCE", "XAI", "TSLA", "SPCE", "XAI", "TSLA", "SPCE", "XAI"]
        );
    }

    #[test]
    fn prices_stay_in_band() {
        let mut generator = PriceGenerator::with_rng(StdRng::seed_from_u64(42));

        for i in 0..1_000 {
            let quote = generator.quote_at(i);
            assert!(
                (100.0..110.0).contains(&quote.price),
                "price {} out of band at tick {i}",
                quote.price
            );
        }
    }

    #[test]
    fn consecutive_draws_differ() {
        let mut generator = PriceGenerator::with_rng(StdRng::seed_from_u64(1));

        let first = generator.quote_at(0).price;
        let all_equal = (1..100).all(|i| generator.quote_at(i).price == first);
        assert!(!all_equal, "RNG produced identical values across draws");
    }

    #[test]
    fn frame_format_is_exact() {
        let quote = Quote {
            symbol: "XAI",
            price: 104.368,
        };
        assert_eq!(quote.to_frame(), "data: XAI: 104.37\n\n");
    }

    #[test]
    fn frame_always_has_two_decimals() {
        let quote = Quote {
            symbol: "TSLA",
            price: 101.0,
        };
        assert_eq!(quote.to_frame(), "data: TSLA: 101.00\n\n");
    }
}
