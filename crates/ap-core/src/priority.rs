use std::fmt;

/// Service class of an entity.  `High` entities are pulled from waiting
/// before any `Normal` one, regardless of arrival order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Priority {
    #[default]
    Normal,
    High,
}

impl Priority {
    /// Small integer used in decision observations: `0` normal, `1` high.
    #[inline]
    pub fn code(self) -> i32 {
        match self {
            Priority::Normal => 0,
            Priority::High => 1,
        }
    }

    #[inline]
    pub fn is_high(self) -> bool {
        self == Priority::High
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Priority::Normal => "normal",
            Priority::High => "high",
        })
    }
}
