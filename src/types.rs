use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Backend identifier of a build.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BuildId(pub u64);

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A weapon loadout as served by the builds endpoint.
///
/// Empty or null `top*` fields mean the build does not hold that rank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRecord {
    pub id: BuildId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub weapon_type: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub top1: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub top2: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub top3: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tabs: Vec<Tab>,
}

/// One equipment slot group of a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub label: String,
    /// Module keys; order does not affect scoring.
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<String>,
}

/// Rank tag a build can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopRank {
    First,
    Second,
    Third,
}

impl TopRank {
    pub const ALL: [Self; 3] = [Self::First, Self::Second, Self::Third];

    /// Tag as shown to users.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::First => "#1",
            Self::Second => "#2",
            Self::Third => "#3",
        }
    }
}

impl BuildRecord {
    /// Rank variant text for `rank`, if the build holds it.
    pub fn top(&self, rank: TopRank) -> Option<&str> {
        match rank {
            TopRank::First => self.top1.as_deref(),
            TopRank::Second => self.top2.as_deref(),
            TopRank::Third => self.top3.as_deref(),
        }
    }

    /// Ranks this build holds, in rank order.
    pub fn ranks(&self) -> impl Iterator<Item = TopRank> + '_ {
        TopRank::ALL
            .into_iter()
            .filter(move |rank| self.top(*rank).is_some_and(|s| !s.is_empty()))
    }
}

/// Entry of the weapon types endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponType {
    pub key: String,
    #[serde(default)]
    pub label: String,
}

/// Module entry of a per-type modules file: English key and display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleEntry {
    pub en: String,
    #[serde(default)]
    pub ru: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    null_as_default(deserializer)
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}
