use std::fmt;

/// Stable identifier of a quest template.
///
/// Assigned at content-authoring time and unique across the catalog. Progress
/// entries, hand-in records, and save data all key off this value.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct QuestId(pub String);

impl QuestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for QuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for QuestId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Reference to an item definition stored outside the core (lookup via env).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of an interactive terminal in the world.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TerminalId(pub String);

impl TerminalId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TerminalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TerminalId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Completion flag for one terminal, as reported by the world oracle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerminalStatus {
    pub id: TerminalId,
    pub completed: bool,
}

impl TerminalStatus {
    pub fn new(id: impl Into<TerminalId>, completed: bool) -> Self {
        Self {
            id: id.into(),
            completed,
        }
    }
}
