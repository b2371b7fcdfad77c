// Card and color model: the working card used during simulation, the
// minimal persisted card, and the five-color alphabet.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

/// One symbol of the fixed five-color alphabet, in enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
}

impl Color {
    pub const ALL: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
    ];

    /// Position of this color in enumeration order (W=0 .. G=4).
    pub fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Blue => 1,
            Color::Black => 2,
            Color::Red => 3,
            Color::Green => 4,
        }
    }

    /// Single-letter mana symbol.
    pub fn symbol(self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }

    /// Parse a mana symbol (case-insensitive).
    pub fn from_symbol(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'W' => Some(Color::White),
            'U' => Some(Color::Blue),
            'B' => Some(Color::Black),
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A subset of the color alphabet stored as bitflags. Also serves as the key
/// for color combinations (all 32 subsets, colorless included).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorSet(u8);

impl ColorSet {
    pub const COLORLESS: Self = Self(0);
    pub const WHITE: Self = Self(1 << 0);
    pub const BLUE: Self = Self(1 << 1);
    pub const BLACK: Self = Self(1 << 2);
    pub const RED: Self = Self(1 << 3);
    pub const GREEN: Self = Self(1 << 4);

    /// Number of distinct color combinations.
    pub const COMBINATIONS: usize = 32;

    pub const fn from_color(color: Color) -> Self {
        match color {
            Color::White => Self::WHITE,
            Color::Blue => Self::BLUE,
            Color::Black => Self::BLACK,
            Color::Red => Self::RED,
            Color::Green => Self::GREEN,
        }
    }

    /// Every combination, colorless first, in bit order.
    pub fn all_combinations() -> impl Iterator<Item = ColorSet> {
        (0..Self::COMBINATIONS as u8).map(ColorSet)
    }

    /// Dense index in `0..COMBINATIONS`, used for per-combination tables.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, color: Color) -> bool {
        self.0 & Self::from_color(color).0 != 0
    }

    /// True if every color of `other` is also in `self`.
    pub const fn contains_all(self, other: ColorSet) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: ColorSet) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn union(self, other: ColorSet) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    pub const fn with(self, color: Color) -> Self {
        self.union(Self::from_color(color))
    }

    /// The member colors in enumeration order.
    pub fn colors(self) -> impl Iterator<Item = Color> {
        Color::ALL.into_iter().filter(move |&c| self.contains(c))
    }

    /// Symbols joined by `sep`, e.g. `"W, U"`.
    pub fn join(self, sep: &str) -> String {
        self.colors()
            .map(|c| c.symbol().to_string())
            .collect::<Vec<_>>()
            .join(sep)
    }

    /// Parse a string of mana symbols such as `"WU"`. Empty means colorless.
    pub fn parse(s: &str) -> Option<Self> {
        s.chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .map(Color::from_symbol)
            .collect::<Option<ColorSet>>()
    }
}

impl From<Color> for ColorSet {
    fn from(color: Color) -> Self {
        Self::from_color(color)
    }
}

impl FromIterator<Color> for ColorSet {
    fn from_iter<T: IntoIterator<Item = Color>>(iter: T) -> Self {
        iter.into_iter()
            .fold(ColorSet::COLORLESS, |set, color| set.with(color))
    }
}

impl fmt::Display for ColorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.join(""))
    }
}

impl From<ColorSet> for String {
    fn from(set: ColorSet) -> Self {
        set.join("")
    }
}

impl TryFrom<String> for ColorSet {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        ColorSet::parse(&s).ok_or_else(|| format!("invalid color string: {s:?}"))
    }
}

// ---------------------------------------------------------------------------
// Working card
// ---------------------------------------------------------------------------

/// Type-line words that mark cards living outside the main deck and sideboard.
const SPECIAL_ZONE_TYPES: &[&str] = &[
    "conspiracy",
    "vanguard",
    "scheme",
    "plane",
    "phenomenon",
    "contraption",
    "attraction",
    "dungeon",
];

/// A card with its full metadata, as used while drafting and building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Cube-level identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Full type line, e.g. "Legendary Creature - Elf Druid" or "Basic Land - Forest".
    pub type_line: String,
    /// Color identity.
    #[serde(default)]
    pub colors: ColorSet,
    /// Converted mana value.
    #[serde(default)]
    pub mana_value: f64,
    /// Similarity embedding. Missing or empty vectors mean "maximally distant".
    #[serde(default)]
    pub embedding: Option<Vec<f64>>,
    /// Colors a fetch land can find, when that differs from its color identity.
    #[serde(default)]
    pub fetches: Option<ColorSet>,
    /// Cached base rating from the oracle. Bots fill in a default on first exposure.
    #[serde(default)]
    pub rating: Option<f64>,
    /// Synthetic basic-land filler added during deck construction.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_unlimited: bool,
}

impl Card {
    /// Minimal constructor; remaining metadata defaults to empty.
    pub fn new(id: impl Into<String>, name: impl Into<String>, type_line: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            type_line: type_line.into(),
            colors: ColorSet::COLORLESS,
            mana_value: 0.0,
            embedding: None,
            fetches: None,
            rating: None,
            is_unlimited: false,
        }
    }

    pub fn with_colors(mut self, colors: ColorSet) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_mana_value(mut self, mana_value: f64) -> Self {
        self.mana_value = mana_value;
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f64>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    pub fn with_fetches(mut self, fetches: ColorSet) -> Self {
        self.fetches = Some(fetches);
        self
    }

    pub fn is_land(&self) -> bool {
        self.type_line.to_lowercase().contains("land")
    }

    pub fn is_creature(&self) -> bool {
        self.type_line.to_lowercase().contains("creature")
    }

    pub fn is_basic(&self) -> bool {
        self.type_line.to_lowercase().contains("basic")
    }

    /// Cards that occupy neither a main-deck nor a sideboard slot.
    pub fn is_special_zone(&self) -> bool {
        let lower = self.type_line.to_lowercase();
        lower
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| SPECIAL_ZONE_TYPES.contains(&word))
    }

    /// Colors a land contributes to the mana base.
    pub fn mana_production(&self) -> ColorSet {
        self.fetches.unwrap_or(self.colors)
    }

    /// Non-empty embedding, if any.
    pub fn embedding(&self) -> Option<&[f64]> {
        self.embedding.as_deref().filter(|e| !e.is_empty())
    }

    /// Project to the minimal persisted shape.
    pub fn persisted(&self) -> PersistedCard {
        PersistedCard::from(self)
    }
}

// ---------------------------------------------------------------------------
// Persisted card
// ---------------------------------------------------------------------------

/// The identity fields that survive in the finished draft record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersistedCard {
    pub id: String,
    pub name: String,
}

impl From<&Card> for PersistedCard {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id.clone(),
            name: card.name.clone(),
        }
    }
}

/// Project a list of buckets to persisted cards.
pub fn persist_buckets(buckets: &[Vec<Card>]) -> Vec<Vec<PersistedCard>> {
    buckets
        .iter()
        .map(|bucket| bucket.iter().map(PersistedCard::from).collect())
        .collect()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
