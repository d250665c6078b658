//! Navigation category labels.
//!
//! Navigation links use fine-grained labels (`"laptops"`, `"fiction"`) while
//! catalog products carry one of the broad categories (`"electronics"`,
//! `"books"`, `"fashion"`, `"home-garden"`). Both lookups fall back to the
//! input label unchanged.

/// Fine-grained label, broad category, display name.
const CATEGORY_TABLE: &[(&str, &str, &str)] = &[
    ("laptops", "electronics", "Laptops & Computers"),
    ("smartphones", "electronics", "Smartphones"),
    ("audio", "electronics", "Audio & Headphones"),
    ("tv", "electronics", "TV & Home Theater"),
    ("cameras", "electronics", "Cameras & Photography"),
    ("gaming", "electronics", "Gaming"),
    ("fiction", "books", "Fiction Books"),
    ("education", "books", "Education Books"),
    ("business", "books", "Business Books"),
    ("health", "books", "Health & Wellness"),
    ("children", "books", "Children's Books"),
    ("history", "books", "History & Biography"),
    ("mens", "fashion", "Men's Clothing"),
    ("womens", "fashion", "Women's Clothing"),
    ("kids", "fashion", "Kids' Clothing"),
    ("athletic", "fashion", "Athletic Wear"),
    ("shoes", "fashion", "Shoes"),
    ("accessories", "fashion", "Accessories"),
    ("furniture", "home-garden", "Furniture"),
    ("decor", "home-garden", "Home Décor"),
    ("garden", "home-garden", "Garden & Outdoor"),
    ("kitchen", "home-garden", "Kitchen & Dining"),
    ("bedding", "home-garden", "Bedding & Bath"),
    ("tools", "home-garden", "Tools & Hardware"),
];

fn lookup(label: &str) -> Option<&'static (&'static str, &'static str, &'static str)> {
    CATEGORY_TABLE.iter().find(|(key, _, _)| *key == label)
}

/// Map a navigation label to the broad catalog category it belongs to.
///
/// ```
/// use shopvista_core::canonical_category;
///
/// assert_eq!(canonical_category("laptops"), "electronics");
/// assert_eq!(canonical_category("books"), "books");
/// ```
#[must_use]
pub fn canonical_category(label: &str) -> &str {
    lookup(label).map_or(label, |&(_, broad, _)| broad)
}

/// Human-readable name for a navigation label.
#[must_use]
pub fn category_display_name(label: &str) -> &str {
    lookup(label).map_or(label, |&(_, _, name)| name)
}
