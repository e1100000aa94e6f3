//! Named bitmask view
//!
//! A `FlagHandler` pairs a raw integer with a static table mapping flag names
//! to single-bit values. Bits that are set but absent from the table are ignored.

use std::fmt;

/// Static name -> bit table. Every value must be a distinct power of two.
pub type FlagTable = &'static [(&'static str, u64)];

/// Message flags carried on `MESSAGE_CREATE` / `MESSAGE_UPDATE`
pub const MESSAGE_FLAGS: FlagTable = &[
    ("CROSSPOSTED", 1 << 0),
    ("IS_CROSSPOST", 1 << 1),
    ("SUPPRESS_EMBEDS", 1 << 2),
    ("SOURCE_MESSAGE_DELETED", 1 << 3),
    ("URGENT", 1 << 4),
];

/// Read-only view over a bitmask and its flag table
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FlagHandler {
    bits: u64,
    table: FlagTable,
}

impl FlagHandler {
    /// Wrap a raw bitmask
    #[inline]
    pub const fn new(bits: u64, table: FlagTable) -> Self {
        Self { bits, table }
    }

    /// Build a bitmask from flag names; unknown names contribute nothing
    pub fn encode<'a, I>(names: I, table: FlagTable) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let bits = names
            .into_iter()
            .filter_map(|name| Self::bit_for(table, name))
            .fold(0, |acc, bit| acc | bit);
        Self { bits, table }
    }

    /// Raw bits as received, including bits the table does not name
    #[inline]
    pub const fn bits(&self) -> u64 {
        self.bits
    }

    /// Check whether the named flag is set
    pub fn has(&self, name: &str) -> bool {
        Self::bit_for(self.table, name).is_some_and(|bit| self.bits & bit == bit)
    }

    /// All named flags that are set, in table order
    pub fn list(&self) -> Vec<&'static str> {
        self.table
            .iter()
            .filter(|(_, bit)| self.bits & bit == *bit)
            .map(|(name, _)| *name)
            .collect()
    }

    /// Check whether no named flag is set
    pub fn is_empty(&self) -> bool {
        self.table.iter().all(|(_, bit)| self.bits & bit == 0)
    }

    fn bit_for(table: FlagTable, name: &str) -> Option<u64> {
        table
            .iter()
            .find(|(flag, _)| *flag == name)
            .map(|(_, bit)| *bit)
    }
}

impl fmt::Debug for FlagHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagHandler")
            .field("bits", &self.bits)
            .field("flags", &self.list())
            .finish()
    }
}
