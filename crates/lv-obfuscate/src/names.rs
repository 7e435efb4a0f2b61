//! Fixed name lists for human-readable substitutes.

/// City names, one per letter of the alphabet (minus one).
pub const CITIES: [&str; 25] = [
    "Atlanta", "Berlin", "Chicago", "Dublin", "ElPaso",
    "Foshan", "Giza", "Hongkong", "Istanbul", "Jakarta",
    "London", "Miami", "NewYork", "Orlando", "Paris",
    "Queens", "Rome", "Sydney", "Taipei", "Utica",
    "Vancouver", "Warsaw", "Xiamen", "Yonkers", "Zurich",
];

/// Flower names, same shape as [`CITIES`].
pub const FLOWERS: [&str; 25] = [
    "Aster", "Begonia", "Carnation", "Daisy", "Erica",
    "Freesia", "Gardenia", "Hyacinth", "Iris", "Jasmine",
    "Kalmia", "Lavender", "Marigold", "Narcissus", "Orchid",
    "Peony", "Rose", "Sunflower", "Tulip", "Ursinia",
    "Violet", "Wisteria", "Xylobium", "Yarrow", "Zinnia",
];

/// City picked by hashing `key`.
pub fn city_for(key: &str) -> &'static str {
    CITIES[crate::hash::hash_index(key, CITIES.len())]
}

/// Flower picked by hashing `key` salted with `"flower"`.
pub fn flower_for(key: &str) -> &'static str {
    FLOWERS[crate::hash::hash_index(&format!("{}flower", key), FLOWERS.len())]
}
