//! Category registry: the closed allow-list of product categories.
//!
//! Description generation only accepts categories listed here. The registry is
//! built once on first access and never mutated, so it is safe to share
//! between concurrent requests.

use std::sync::OnceLock;

/// A product category accepted by the description endpoint.
#[derive(Debug, Clone)]
pub struct Category {
    /// Stable machine key sent by callers (e.g. "electronics")
    pub key: &'static str,

    /// Bilingual display label, English first then Arabic
    pub label: &'static str,
}

/// Global category registry singleton.
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

static REGISTRY: OnceLock<CategoryRegistry> = OnceLock::new();

impl CategoryRegistry {
    /// Get the global category registry instance.
    pub fn get() -> &'static CategoryRegistry {
        REGISTRY.get_or_init(|| CategoryRegistry {
            categories: default_categories(),
        })
    }

    /// Look up a category by its machine key.
    pub fn get_by_key(&self, key: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.key == key)
    }

    /// Check whether a machine key is part of the allow-list.
    ///
    /// Keys are matched exactly; "Electronics" is not "electronics".
    pub fn is_valid(&self, key: &str) -> bool {
        self.get_by_key(key).is_some()
    }

    /// Bilingual label for a key, `None` for keys outside the allow-list.
    pub fn label(&self, key: &str) -> Option<&'static str> {
        self.get_by_key(key).map(|category| category.label)
    }

    /// All categories in declaration order.
    pub fn list(&self) -> Vec<&Category> {
        self.categories.iter().collect()
    }
}

fn default_categories() -> Vec<Category> {
    const ENTRIES: &[(&str, &str)] = &[
        ("general", "General / عام"),
        ("clothing", "Clothing / ملابس"),
        ("fashion", "Fashion / أزياء"),
        ("clothing_fashion", "Clothing & Fashion / ملابس_وأزياء"),
        ("clothing_accessories", "Clothing & Accessories / ملابس_و_اكسسوارات"),
        ("dress", "Dress / فستان"),
        ("skin_care", "Skin Care / بشرة"),
        ("makeup", "Makeup / مكياج"),
        ("beauty", "Beauty / تجميل"),
        ("food", "Food / طعام"),
        ("beverages", "Beverages / مشروبات"),
        ("food_items", "Food Items / مأكولات"),
        ("electronics", "Electronics / إلكترونيات"),
        ("technology", "Technology / تقنيات"),
        ("devices", "Devices / أجهزة"),
        ("furniture", "Furniture / أثاث"),
        ("decor", "Decor / ديكور"),
        ("home", "Home / منزلي"),
        ("kitchen", "Kitchen / مطبخ"),
        ("sports", "Sports / رياضة"),
        ("jewelry", "Jewelry / مجوهرات"),
        ("books", "Books / كتب"),
        ("pets", "Pets / حيوانات"),
        ("handmade", "Handmade / يدوي"),
        ("kids", "Kids / اطفال"),
    ];

    ENTRIES
        .iter()
        .map(|&(key, label)| Category { key, label })
        .collect()
}
