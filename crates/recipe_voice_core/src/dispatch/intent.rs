//! Closed set of supported voice intents.

/// Slot carrying the recipe name for ingredient lookups.
pub const SLOT_RECIPE: &str = "recipe";
pub const SLOT_INGREDIENT_ONE: &str = "ingredientone";
pub const SLOT_INGREDIENT_TWO: &str = "ingredienttwo";

/// Intent recognized by the voice platform.
///
/// Names match case-sensitively; anything else is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// "What goes into <recipe>?"
    GetIngredientsForRecipe,
    /// "What can I make with <one> and <two>?"
    GetRecipeFromIngredients,
    About,
    Unknown,
}

impl Intent {
    pub fn from_name(name: &str) -> Self {
        match name {
            "GetIngredientsForRecipeIntent" => Self::GetIngredientsForRecipe,
            "GetRecipeFromIngredientsIntent" => Self::GetRecipeFromIngredients,
            "AboutIntent" => Self::About,
            _ => Self::Unknown,
        }
    }

    /// Stable label used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetIngredientsForRecipe => "GetIngredientsForRecipeIntent",
            Self::GetRecipeFromIngredients => "GetRecipeFromIngredientsIntent",
            Self::About => "AboutIntent",
            Self::Unknown => "unknown",
        }
    }
}
