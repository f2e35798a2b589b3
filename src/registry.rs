//! Canonical-instance pool for [`MoneyAmount`]

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock, PoisonError};

use log::trace;

use crate::MoneyAmount;

/// Interning pool mapping cent values to their canonical instances.
///
/// Insert-if-absent only: entries are never evicted or replaced, so every
/// handle the pool gives out stays canonical for the rest of the process.
/// [`MoneyAmount::of`] goes through a private process-wide instance of this
/// type; separate registries exist for callers that want an isolated pool,
/// e.g. in tests, and behave identically.
pub struct AmountRegistry {
    pool: Mutex<HashMap<i64, &'static MoneyAmount>>,
}

impl AmountRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        AmountRegistry {
            pool: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the canonical instance for `cents`, interning one on first use.
    ///
    /// Passing an out-of-range value is a caller bug and panics, exactly as
    /// in [`MoneyAmount::of`]; no pool ever holds an invalid instance.
    pub fn canonical(&self, cents: i64) -> &'static MoneyAmount {
        assert!(
            MoneyAmount::is_valid_cents(cents),
            "amount of {cents} cents is outside the supported range"
        );
        let mut pool = self.pool.lock().unwrap_or_else(PoisonError::into_inner);
        *pool.entry(cents).or_insert_with(|| {
            trace!("interning canonical amount for {cents} cents");
            Box::leak(Box::new(MoneyAmount(cents)))
        })
    }
}

impl Default for AmountRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide registry backing [`MoneyAmount::of`].
pub(crate) fn global() -> &'static AmountRegistry {
    static GLOBAL: OnceLock<AmountRegistry> = OnceLock::new();
    GLOBAL.get_or_init(AmountRegistry::new)
}
