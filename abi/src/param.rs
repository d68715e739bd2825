//! Parameter width classification.

/// Type spellings that occupy two 32-bit machine words.
pub const WIDE_TYPE_PREFIXES: [&str; 7] = [
    "int64_t",
    "uint64_t",
    "loff_t",
    "off64_t",
    "long long",
    "unsigned long long",
    "signed long long",
];

/// How many 32-bit machine words a parameter needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamWidth {
    Narrow,
    Wide,
}

impl ParamWidth {
    /// Classify a raw parameter declaration such as `off64_t offset`.
    ///
    /// Pointers are always narrow, even when they point at a 64-bit type.
    pub fn classify(raw: &str) -> Self {
        let text = raw.trim();
        let wide_prefix = WIDE_TYPE_PREFIXES
            .iter()
            .any(|prefix| text.starts_with(prefix));
        if wide_prefix && !text.contains('*') {
            ParamWidth::Wide
        } else {
            ParamWidth::Narrow
        }
    }

    #[inline]
    pub const fn words(self) -> usize {
        match self {
            ParamWidth::Narrow => 1,
            ParamWidth::Wide => 2,
        }
    }
}
