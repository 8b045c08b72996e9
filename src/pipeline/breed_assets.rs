use std::{collections::HashMap, sync::OnceLock};

/// Breed labels (lowercase) to the rigged model that represents them. Several
/// breeds share one model.
const BREED_ASSETS: &[(&str, &str)] = &[
    ("beagle", "Beagle"),
    ("border_collie", "Border Collie"),
    ("boxer", "Boxer"),
    ("french_bulldog", "French Bulldog"),
    ("golden_retriever", "Golden Retriever"),
    ("siberian_husky", "Husky"),
    ("labrador_retriever", "Labrador"),
    ("pug", "Pug"),
    ("rottweiler", "Rottweiler"),
    ("german_shepherd", "Shepherd"),
    ("doberman", "Doberman"),
    ("pomeranian", "Pomeranian Spitz"),
    ("toy_terrier", "Toy Terrier"),
    ("pembroke", "Corgi"),
    ("cardigan", "Corgi"),
    ("akita_inu", "Husky"),
    ("bulldog", "French Bulldog"),
    ("dalmatian", "Labrador"),
    ("jack_russell_terrier", "Toy Terrier"),
    ("pitbull", "Boxer"),
    ("shiba_inu", "Pomeranian Spitz"),
];

fn table() -> &'static HashMap<&'static str, &'static str> {
    static TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| BREED_ASSETS.iter().copied().collect())
}

/// Asset name for a breed label, or `None` when no model exists for it.
pub fn resolve(breed_label: &str) -> Option<&'static str> {
    table().get(breed_label.to_lowercase().as_str()).copied()
}

/// Every distinct asset name, in table order.
pub fn asset_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Vec::new();
    for &(_, asset) in BREED_ASSETS {
        if !names.contains(&asset) {
            names.push(asset);
        }
    }
    names
}
