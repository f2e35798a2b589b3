//! Bounded, canonicalized monetary amounts in minor units
//!
//! [`MoneyAmount`] stores a signed number of cents, capped at nine significant
//! decimal digits, and is handed out exclusively as a canonical reference:
//! [`MoneyAmount::of`] returns the same `&'static` instance for the same
//! amount for the lifetime of the process, so equal amounts are also
//! pointer-equal. All arithmetic is guarded by feasibility predicates that
//! reject any result outside the supported range before it is computed.

use core::fmt;

use thiserror::Error;

mod registry;

pub use registry::AmountRegistry;

/// Monetary value stored as an integer number of cents.
///
/// Valid amounts span `[MIN_CENTS, MAX_CENTS]` — nine decimal digits on either
/// side of zero, with no distinguished negative zero. The type is neither
/// `Clone` nor `Copy`; instances come out of the canonical pool via
/// [`MoneyAmount::of`] or [`MoneyAmount::parse`] and are never mutated.
/// Equality, ordering and hashing all go by the raw cent value.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MoneyAmount(i64);

/// Total number of significant decimal digits an amount may carry.
const MAX_DIGITS: u32 = 9;

/// Maximum number of digits before the decimal comma in the display grammar.
const MAX_WHOLE_DIGITS: usize = 6;

impl MoneyAmount {
    /// Largest representable amount, in cents.
    pub const MAX_CENTS: i64 = 10i64.pow(MAX_DIGITS) - 1;
    /// Smallest representable amount, in cents (symmetric range).
    pub const MIN_CENTS: i64 = -Self::MAX_CENTS;

    /// Returns the canonical instance for the given amount of cents.
    ///
    /// Looks `cents` up in the process-wide pool; the first call for a value
    /// interns a new instance, every later call returns the same reference.
    ///
    /// Passing an out-of-range value is a caller bug and panics; check
    /// [`MoneyAmount::is_valid_cents`] first, or use [`MoneyAmount::try_of`].
    pub fn of(cents: i64) -> &'static MoneyAmount {
        assert!(
            Self::is_valid_cents(cents),
            "amount of {cents} cents is outside the supported range"
        );
        registry::global().canonical(cents)
    }

    /// Fallible variant of [`MoneyAmount::of`].
    pub fn try_of(cents: i64) -> Result<&'static MoneyAmount, AmountOutOfRange> {
        if Self::is_valid_cents(cents) {
            Ok(registry::global().canonical(cents))
        } else {
            Err(AmountOutOfRange(cents))
        }
    }

    /// Parses a human-readable amount such as `"3,50"` or `"-1500,99"`.
    ///
    /// The accepted grammar is an optional `-`, a whole part of one to six
    /// digits without a leading zero (unless it is the single digit `0`), a
    /// literal decimal comma and exactly two cent digits. No whitespace, no
    /// currency symbol, no thousands separator. Every accepted string is in
    /// range by construction.
    ///
    /// Passing a malformed string is a caller bug and panics; check
    /// [`MoneyAmount::is_valid_display_str`] first, or use
    /// [`MoneyAmount::try_parse`].
    pub fn parse(text: &str) -> &'static MoneyAmount {
        assert!(
            Self::is_valid_display_str(text),
            "malformed amount string {text:?}"
        );
        Self::of(decode_cents(text))
    }

    /// Fallible variant of [`MoneyAmount::parse`].
    pub fn try_parse(text: &str) -> Result<&'static MoneyAmount, ParseAmountError> {
        if Self::is_valid_display_str(text) {
            Ok(Self::of(decode_cents(text)))
        } else {
            Err(ParseAmountError)
        }
    }

    /// The raw amount in cents.
    pub fn cents(&self) -> i64 {
        self.0
    }

    /// True iff `cents` lies within `[MIN_CENTS, MAX_CENTS]`.
    pub fn is_valid_cents(cents: i64) -> bool {
        (Self::MIN_CENTS..=Self::MAX_CENTS).contains(&cents)
    }

    /// True iff `text` matches the display grammar exactly (full match).
    pub fn is_valid_display_str(text: &str) -> bool {
        let unsigned = text.strip_prefix('-').unwrap_or(text);
        let Some((whole, frac)) = unsigned.split_once(',') else {
            return false;
        };
        if frac.len() != 2 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        match whole.as_bytes() {
            [d] => d.is_ascii_digit(),
            // Multi-digit whole parts must not start with a zero.
            [b'1'..=b'9', rest @ ..] if rest.len() < MAX_WHOLE_DIGITS => {
                rest.iter().all(u8::is_ascii_digit)
            }
            _ => false,
        }
    }

    /// True iff the amount is zero or greater.
    ///
    /// Zero counts as non-negative here, mirroring the sign function; the
    /// feasibility predicates below rely on that when they branch on signs.
    pub fn is_non_negative(&self) -> bool {
        self.0 >= 0
    }

    /// True iff `self + rhs` stays within the supported range.
    pub fn can_add(&self, rhs: &MoneyAmount) -> bool {
        fits(i128::from(self.0) + i128::from(rhs.0))
    }

    /// Adds two amounts. Infeasible sums (see [`MoneyAmount::can_add`]) are a
    /// caller bug and panic.
    pub fn add(&self, rhs: &MoneyAmount) -> &'static MoneyAmount {
        assert!(
            self.can_add(rhs),
            "sum of {self} and {rhs} leaves the supported range"
        );
        Self::of(self.0 + rhs.0)
    }

    /// True iff `self - rhs` stays within the supported range.
    ///
    /// Subtracting a negative amount adds magnitudes, so unlike addition the
    /// mixed-sign case can overflow and gets the same headroom check as the
    /// same-sign cases.
    pub fn can_subtract(&self, rhs: &MoneyAmount) -> bool {
        fits(i128::from(self.0) - i128::from(rhs.0))
    }

    /// Subtracts `rhs` from `self`. Infeasible differences (see
    /// [`MoneyAmount::can_subtract`]) are a caller bug and panic.
    pub fn subtract(&self, rhs: &MoneyAmount) -> &'static MoneyAmount {
        assert!(
            self.can_subtract(rhs),
            "difference of {self} and {rhs} leaves the supported range"
        );
        Self::of(self.0 - rhs.0)
    }

    /// True iff `factor` is non-negative and `self * factor` stays within the
    /// supported range. A factor of zero is always feasible.
    pub fn can_multiply(&self, factor: i64) -> bool {
        factor >= 0 && fits(i128::from(self.0) * i128::from(factor))
    }

    /// Multiplies the amount by a non-negative factor. A negative factor or an
    /// infeasible product (see [`MoneyAmount::can_multiply`]) is a caller bug
    /// and panics.
    pub fn multiply(&self, factor: i64) -> &'static MoneyAmount {
        assert!(factor >= 0, "multiplier must be non-negative, got {factor}");
        assert!(
            self.can_multiply(factor),
            "product of {self} and {factor} leaves the supported range"
        );
        Self::of(self.0 * factor)
    }
}

/// Range check on a widened intermediate.
///
/// Operands are capped at nine decimal digits, so sums and products of two of
/// them fit an `i128` with room to spare and the check itself cannot wrap.
fn fits(result: i128) -> bool {
    const MIN: i128 = MoneyAmount::MIN_CENTS as i128;
    const MAX: i128 = MoneyAmount::MAX_CENTS as i128;
    (MIN..=MAX).contains(&result)
}

/// Reads the cent value out of a grammar-checked display string.
///
/// Works directly on the digit bytes; the grammar caps them at eight, which
/// an `i64` holds without overflow.
fn decode_cents(text: &str) -> i64 {
    let mut cents = 0i64;
    for b in text.bytes() {
        if b.is_ascii_digit() {
            cents = cents * 10 + i64::from(b - b'0');
        }
    }
    if text.starts_with('-') {
        -cents
    } else {
        cents
    }
}

impl fmt::Display for MoneyAmount {
    /// Renders the amount as `[-]<whole>,<2-digit cents>`, e.g. `-1500,99`.
    ///
    /// Zero is rendered unsigned as `0,00`. The exact inverse of
    /// [`MoneyAmount::parse`] for every string the grammar accepts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{sign}{},{:02}", abs / 100, abs % 100)
    }
}

/// A raw cent value outside `[MIN_CENTS, MAX_CENTS]`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("amount of {0} cents is outside the supported range")]
pub struct AmountOutOfRange(pub i64);

/// A string rejected by the display grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed amount string")]
pub struct ParseAmountError;

#[cfg(feature = "serde")]
mod serde_impls {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{AmountOutOfRange, MoneyAmount};

    impl Serialize for MoneyAmount {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_i64(self.0)
        }
    }

    // NOTE: deserialized values are range-checked but not interned; equality
    // with canonical instances is by value, which is all the wire format needs.
    impl<'de> Deserialize<'de> for MoneyAmount {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let cents = i64::deserialize(deserializer)?;
            if !MoneyAmount::is_valid_cents(cents) {
                return Err(D::Error::custom(AmountOutOfRange(cents)));
            }
            Ok(MoneyAmount(cents))
        }
    }
}
