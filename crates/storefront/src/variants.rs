//! Variant lookup per product category.
//!
//! The catalog API has no variant model, so the storefront configures the
//! selectable sizes and colors per category here. Categories outside the
//! table get a single-option default, which guarantees every product has a
//! valid size and color selection and spares downstream code a "no
//! variants" special case.

/// A selectable color: display name plus CSS hex code for the swatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorOption {
    pub name: &'static str,
    pub color_code: &'static str,
}

/// The selectable sizes and colors for one category, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantConfig {
    pub sizes: &'static [&'static str],
    pub colors: &'static [ColorOption],
}

const MENS_SHIRTS: VariantConfig = VariantConfig {
    sizes: &["S", "M", "L", "XL", "XXL"],
    colors: &[
        ColorOption { name: "Black", color_code: "#000000" },
        ColorOption { name: "White", color_code: "#FFFFFF" },
        ColorOption { name: "Navy", color_code: "#1e3a8a" },
        ColorOption { name: "Gray", color_code: "#6b7280" },
        ColorOption { name: "Red", color_code: "#dc2626" },
    ],
};

const MENS_SHOES: VariantConfig = VariantConfig {
    sizes: &["39", "40", "41", "42", "43", "44", "45"],
    colors: &[
        ColorOption { name: "Black", color_code: "#000000" },
        ColorOption { name: "White", color_code: "#FFFFFF" },
        ColorOption { name: "Brown", color_code: "#78350f" },
        ColorOption { name: "Blue", color_code: "#1e40af" },
        ColorOption { name: "Gray", color_code: "#4b5563" },
    ],
};

const MENS_WATCHES: VariantConfig = VariantConfig {
    sizes: &["38mm", "42mm", "44mm"],
    colors: &[
        ColorOption { name: "Black", color_code: "#000000" },
        ColorOption { name: "Silver", color_code: "#d1d5db" },
        ColorOption { name: "Gold", color_code: "#f59e0b" },
        ColorOption { name: "Rose Gold", color_code: "#ec4899" },
        ColorOption { name: "Blue", color_code: "#3b82f6" },
    ],
};

/// Fallback for categories without a configured table.
const DEFAULT_VARIANT: VariantConfig = VariantConfig {
    sizes: &["One Size"],
    colors: &[ColorOption { name: "Default", color_code: "#000000" }],
};

/// Variant configuration for a product category (case-insensitive).
#[must_use]
pub fn variants_for(category: &str) -> VariantConfig {
    match category.to_lowercase().as_str() {
        "mens-shirts" => MENS_SHIRTS,
        "mens-shoes" => MENS_SHOES,
        "mens-watches" => MENS_WATCHES,
        _ => DEFAULT_VARIANT,
    }
}

/// Whether a category offers a real choice of size or color.
///
/// Presentation uses this to decide whether to render variant pickers at
/// all.
#[must_use]
pub fn has_multiple_variants(category: &str) -> bool {
    let config = variants_for(category);
    config.sizes.len() > 1 || config.colors.len() > 1
}

/// Format a size + color pair into the display label stored on cart lines.
#[must_use]
pub fn variant_label(size: &str, color_name: &str) -> String {
    format!("{size} / {color_name}")
}

/// A user's in-progress size and color choice on a product detail view.
///
/// Ephemeral: it is folded into a display label when the product is added
/// to the cart, and never persisted on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantSelection {
    pub size: &'static str,
    pub color: ColorOption,
}

impl VariantSelection {
    /// The default selection for a category: first size, first color.
    ///
    /// Always well-defined because every category resolves to at least one
    /// of each.
    #[must_use]
    pub fn default_for(category: &str) -> Self {
        let config = variants_for(category);
        Self {
            size: config.sizes.first().copied().unwrap_or("One Size"),
            color: config.colors.first().copied().unwrap_or(ColorOption {
                name: "Default",
                color_code: "#000000",
            }),
        }
    }

    /// The display label for this selection.
    #[must_use]
    pub fn label(&self) -> String {
        variant_label(self.size, self.color.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_categories_have_full_tables() {
        let shirts = variants_for("mens-shirts");
        assert_eq!(shirts.sizes, ["S", "M", "L", "XL", "XXL"]);
        assert_eq!(shirts.colors.len(), 5);

        let shoes = variants_for("mens-shoes");
        assert_eq!(shoes.sizes.len(), 7);

        let watches = variants_for("mens-watches");
        assert_eq!(watches.sizes, ["38mm", "42mm", "44mm"]);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(variants_for("MENS-SHIRTS"), MENS_SHIRTS);
        assert_eq!(variants_for("Mens-Watches"), MENS_WATCHES);
    }

    #[test]
    fn test_unknown_category_gets_single_option_default() {
        let config = variants_for("groceries");
        assert_eq!(config.sizes, ["One Size"]);
        assert_eq!(config.colors.len(), 1);
        assert_eq!(config.colors[0].name, "Default");
    }

    #[test]
    fn test_has_multiple_variants() {
        assert!(has_multiple_variants("mens-shirts"));
        assert!(has_multiple_variants("mens-shoes"));
        assert!(!has_multiple_variants("groceries"));
    }

    #[test]
    fn test_variant_label_format() {
        assert_eq!(variant_label("M", "Black"), "M / Black");
    }

    #[test]
    fn test_default_selection() {
        let selection = VariantSelection::default_for("mens-watches");
        assert_eq!(selection.size, "38mm");
        assert_eq!(selection.color.name, "Black");
        assert_eq!(selection.label(), "38mm / Black");

        let fallback = VariantSelection::default_for("unknown");
        assert_eq!(fallback.label(), "One Size / Default");
    }
}
