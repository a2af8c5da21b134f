//! Deriving the data card's text from recipe fields.

use serde::{Deserialize, Serialize};

use crate::recipe::{is_set, RecipeFields, MAX_RATING};

/// Text stamped at the bottom of every card.
pub const WATERMARK: &str = "SUPERTHING";

const FILLED_STAR: char = '★';
const EMPTY_STAR: char = '☆';

/// Card colour scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardTheme {
    /// Dark text on a translucent white card.
    #[default]
    Light,
    /// Light text on a translucent black card.
    Dark,
}

/// Presentation variant. Only the flavor-note separator differs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardPresentation {
    /// Editor and export screens.
    #[default]
    Classic,
    /// Station screen.
    Station,
}

impl CardPresentation {
    /// Separator between flavor notes.
    #[must_use]
    pub const fn flavor_separator(self) -> &'static str {
        match self {
            Self::Classic => ", ",
            Self::Station => " · ",
        }
    }
}

/// One rendered row of the card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum CardLine {
    /// Coffee name, upper-cased. Never wraps; renderers truncate.
    Title(String),
    /// Roaster, single line.
    Roaster(String),
    /// Dose/water transfer and ratio, laid out on one row.
    Recipe {
        /// `"{dose}g → {water}g"` when both are set.
        transfer: Option<String>,
        /// Ratio as typed.
        ratio: Option<String>,
    },
    /// Method, temperature and time.
    Details(String),
    /// Grind size.
    Grind(String),
    /// Joined flavor notes.
    Flavors(String),
    /// Star string.
    Rating(String),
    /// Brand watermark.
    Watermark(String),
}

impl CardLine {
    /// Plain text of the line.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Recipe { transfer, ratio } => [transfer.as_deref(), ratio.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join("  "),
            Self::Title(t)
            | Self::Roaster(t)
            | Self::Details(t)
            | Self::Grind(t)
            | Self::Flavors(t)
            | Self::Rating(t)
            | Self::Watermark(t) => t.clone(),
        }
    }

    /// Whether the line must stay on a single row.
    #[must_use]
    pub const fn is_single_line(&self) -> bool {
        matches!(self, Self::Title(_) | Self::Roaster(_))
    }
}

/// Ordered card content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardContent {
    /// Lines top to bottom.
    pub lines: Vec<CardLine>,
}

impl CardContent {
    /// Plain text of every line.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.lines.iter().map(CardLine::text).collect()
    }
}

/// Turns [`RecipeFields`] into [`CardContent`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardContentFormatter {
    presentation: CardPresentation,
}

impl CardContentFormatter {
    /// Create a formatter for a presentation variant.
    #[must_use]
    pub const fn new(presentation: CardPresentation) -> Self {
        Self { presentation }
    }

    /// Presentation variant in use.
    #[must_use]
    pub const fn presentation(&self) -> CardPresentation {
        self.presentation
    }

    /// Build the card, or `None` when there is nothing worth showing.
    ///
    /// A card needs at least one of coffee name, dose or brew method; other
    /// fields alone never produce a card.
    #[must_use]
    pub fn format(&self, recipe: &RecipeFields) -> Option<CardContent> {
        if !recipe.has_card_content() {
            return None;
        }

        let mut lines = Vec::new();

        if is_set(&recipe.coffee_name) {
            lines.push(CardLine::Title(recipe.coffee_name.trim().to_uppercase()));
        }
        if is_set(&recipe.roaster) {
            lines.push(CardLine::Roaster(recipe.roaster.trim().to_string()));
        }

        let transfer = (is_set(&recipe.dose) && is_set(&recipe.water))
            .then(|| format!("{}g → {}g", recipe.dose.trim(), recipe.water.trim()));
        let ratio = is_set(&recipe.ratio).then(|| recipe.ratio.trim().to_string());
        if transfer.is_some() || ratio.is_some() {
            lines.push(CardLine::Recipe { transfer, ratio });
        }

        let details: Vec<String> = [
            is_set(&recipe.brew_method).then(|| recipe.brew_method.trim().to_string()),
            is_set(&recipe.temperature).then(|| format!("{}°C", recipe.temperature.trim())),
            is_set(&recipe.brew_time).then(|| recipe.brew_time.trim().to_string()),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !details.is_empty() {
            lines.push(CardLine::Details(details.join("  ")));
        }

        if is_set(&recipe.grind_size) {
            lines.push(CardLine::Grind(recipe.grind_size.trim().to_string()));
        }

        let notes: Vec<&str> = recipe
            .flavor_notes
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .collect();
        if !notes.is_empty() {
            lines.push(CardLine::Flavors(
                notes.join(self.presentation.flavor_separator()),
            ));
        }

        if let Some(stars) = render_stars(recipe.clamped_rating()) {
            lines.push(CardLine::Rating(stars));
        }

        lines.push(CardLine::Watermark(WATERMARK.to_string()));
        Some(CardContent { lines })
    }
}

/// `★` per point and `☆` for the rest, or `None` for an unrated brew.
#[must_use]
pub fn render_stars(rating: u8) -> Option<String> {
    let rating = rating.min(MAX_RATING);
    if rating == 0 {
        return None;
    }
    let mut stars = String::with_capacity(usize::from(MAX_RATING) * 3);
    stars.extend(std::iter::repeat(FILLED_STAR).take(usize::from(rating)));
    stars.extend(std::iter::repeat(EMPTY_STAR).take(usize::from(MAX_RATING - rating)));
    Some(stars)
}

/// Cut `text` to at most `max_chars` characters, ending in `…` when cut.
#[must_use]
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}
