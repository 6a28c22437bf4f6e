//! Keyword and pattern heuristics used when no provider answers.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::ProductCategory;

/// Keywords per category, matched against lowercase words and phrases.
const CATEGORY_KEYWORDS: &[(ProductCategory, &[&str])] = &[
    (ProductCategory::Chicks, &["chick", "chicks", "day old", "day-old", "doc", "hatchling", "brooding"]),
    (
        ProductCategory::LiveBirds,
        &[
            "hen", "hens", "cock", "cockerel", "rooster", "pullet", "pullets", "broiler", "broilers",
            "layer", "layers", "kienyeji", "kuroiler", "kenbro", "duck", "ducks", "turkey", "turkeys",
            "quail", "quails", "guinea fowl", "goose", "geese", "bird", "birds", "chicken", "chickens",
        ],
    ),
    (ProductCategory::Eggs, &["egg", "eggs", "tray", "trays", "fertile", "hatching eggs", "yolk"]),
    (
        ProductCategory::Meat,
        &["meat", "dressed", "slaughtered", "carcass", "drumstick", "wings", "gizzard", "fillet", "frozen"],
    ),
    (
        ProductCategory::Feed,
        &["feed", "mash", "pellets", "crumbs", "starter", "grower", "finisher", "chick mash", "layers mash", "maize bran"],
    ),
    (
        ProductCategory::Equipment,
        &["incubator", "feeder", "feeders", "drinker", "drinkers", "waterer", "cage", "cages", "brooder", "heater", "lamp", "coop", "nest box"],
    ),
    (
        ProductCategory::Health,
        &["vaccine", "vaccines", "newcastle", "gumboro", "dewormer", "antibiotic", "vitamin", "vitamins", "disinfectant", "coccidiostat", "medicine"],
    ),
];

/// Image labels that indicate poultry content (ImageNet / COCO style names).
const POULTRY_IMAGE_LABELS: &[&str] = &[
    "hen", "cock", "chicken", "rooster", "bird", "chick", "duck", "drake", "goose", "turkey",
    "quail", "egg", "poultry", "broiler", "layer", "feather", "coop", "incubator",
];

/// Listings for these are refused outright.
const PROHIBITED_TERMS: &[&str] = &[
    "stolen", "counterfeit", "fake vaccine", "expired vaccine", "steroid", "steroids",
    "growth hormone", "smuggled", "uncertified drug", "banned antibiotic", "dead birds",
    "sick birds", "diseased",
];

const PROFANITY: &[&str] = &["idiot", "stupid", "scam", "fraud", "damn", "shit", "fuck"];

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?254|\b0)[\s-]?(?:7|1)\d{2}[\s-]?\d{3}[\s-]?\d{3}\b").expect("valid phone pattern")
});
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:https?://|www\.)\S+|\b[a-z0-9-]+\.(?:com|co\.ke|ke|net|org|info)\b")
        .expect("valid url pattern")
});
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b").expect("valid email pattern")
});
static REPEATED_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[!?]{3,}").expect("valid punctuation pattern"));
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9']+").expect("valid word pattern"));

fn words(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD.find_iter(&lower).map(|m| m.as_str().to_string()).collect()
}

fn contains_term(lower: &str, tokens: &[String], term: &str) -> bool {
    if term.contains(' ') || term.contains('-') {
        lower.contains(term)
    } else {
        tokens.iter().any(|token| token == term)
    }
}

/// Scores every category by keyword hits and returns the best one.
pub fn classify_text(text: &str) -> Option<(ProductCategory, f32)> {
    let lower = text.to_lowercase();
    let tokens = words(text);
    let mut best: Option<(ProductCategory, usize)> = None;
    let mut total_hits = 0;
    for (category, keywords) in CATEGORY_KEYWORDS {
        let hits = keywords.iter().filter(|keyword| contains_term(&lower, &tokens, keyword)).count();
        total_hits += hits;
        if hits > best.map_or(0, |(_, best_hits)| best_hits) {
            best = Some((*category, hits));
        }
    }
    best.map(|(category, hits)| (category, hits as f32 / total_hits as f32))
}

pub fn is_poultry_text(text: &str) -> bool {
    classify_text(text).is_some()
}

pub fn is_poultry_label(label: &str) -> bool {
    let lower = label.to_lowercase();
    POULTRY_IMAGE_LABELS.iter().any(|known| lower.contains(known))
}

/// Category implied by an image label, if any.
pub fn category_for_label(label: &str) -> Option<ProductCategory> {
    classify_text(label).map(|(category, _)| category)
}

/// Turns `https://cdn/x/kienyeji_hens-2.jpg?v=1` into `kienyeji hens 2`.
pub fn image_name_hint(image_url: &str) -> String {
    let path = image_url.split(['?', '#']).next().unwrap_or_default();
    let file = path.rsplit('/').next().unwrap_or_default();
    let stem = file.rsplit_once('.').map_or(file, |(stem, _)| stem);
    stem.replace(['_', '-', '+'], " ").trim().to_string()
}

/// Finding from the heuristic content scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentFinding {
    Prohibited(String),
    Profanity(String),
    PhoneNumber,
    ExternalLink,
    EmailAddress,
    Shouting,
    ExcessivePunctuation,
    TooShort,
    OffTopic,
}

/// Runs every heuristic rule over listing text.
pub fn scan_content(text: &str) -> Vec<ContentFinding> {
    let lower = text.to_lowercase();
    let tokens = words(text);
    let mut findings = Vec::new();

    for term in PROHIBITED_TERMS {
        if contains_term(&lower, &tokens, term) {
            findings.push(ContentFinding::Prohibited(term.to_string()));
        }
    }
    for term in PROFANITY {
        if contains_term(&lower, &tokens, term) {
            findings.push(ContentFinding::Profanity(term.to_string()));
        }
    }
    if PHONE_PATTERN.is_match(text) {
        findings.push(ContentFinding::PhoneNumber);
    }
    if EMAIL_PATTERN.is_match(text) {
        findings.push(ContentFinding::EmailAddress);
    } else if URL_PATTERN.is_match(text) {
        findings.push(ContentFinding::ExternalLink);
    }
    if REPEATED_PUNCTUATION.is_match(text) {
        findings.push(ContentFinding::ExcessivePunctuation);
    }

    let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() >= 12 {
        let upper = letters.iter().filter(|c| c.is_uppercase()).count();
        if upper * 10 > letters.len() * 7 {
            findings.push(ContentFinding::Shouting);
        }
    }
    if tokens.len() < 2 {
        findings.push(ContentFinding::TooShort);
    }
    if !tokens.is_empty() && !is_poultry_text(text) {
        findings.push(ContentFinding::OffTopic);
    }
    findings
}

/// Template description used when no text generator answers.
pub fn template_description(name: &str, category: ProductCategory, location: Option<&str>) -> String {
    let body = match category {
        ProductCategory::LiveBirds => "Healthy, well-fed birds raised with proper vaccination and care. Ideal for farmers looking to grow or restock their flock.",
        ProductCategory::Chicks => "Vigorous chicks from a trusted hatchery, vaccinated and ready for brooding. Suitable for both new and experienced poultry keepers.",
        ProductCategory::Eggs => "Fresh, clean eggs collected daily and carefully packed to arrive intact. Great for households, hotels and retailers.",
        ProductCategory::Meat => "Hygienically processed poultry meat, handled under cold chain from farm to delivery.",
        ProductCategory::Feed => "Balanced poultry feed formulated for healthy growth and good production at every stage.",
        ProductCategory::Equipment => "Durable poultry equipment built for everyday farm use and easy cleaning.",
        ProductCategory::Health => "Poultry health product from approved suppliers. Follow the label directions or consult a veterinary officer before use.",
        ProductCategory::Other => "Quality poultry product supplied by a verified Poultry Hub vendor.",
    };
    match location {
        Some(location) if !location.trim().is_empty() => {
            format!("{}. {} Available from {}.", name.trim(), body, location.trim())
        }
        _ => format!("{}. {}", name.trim(), body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_text_picks_best_category() {
        assert_eq!(classify_text("Layers mash 70kg bag, starter and grower").unwrap().0, ProductCategory::Feed);
        assert_eq!(classify_text("Day old kuroiler chicks").unwrap().0, ProductCategory::Chicks);
        assert_eq!(classify_text("Newcastle vaccine 1000 doses").unwrap().0, ProductCategory::Health);
        assert!(classify_text("Second hand laptop").is_none());
    }

    #[test]
    fn test_scan_flags_contact_details() {
        let findings = scan_content("Kienyeji hens for sale, call 0712 345 678 or visit www.myfarm.co.ke");
        assert!(findings.contains(&ContentFinding::PhoneNumber));
        assert!(findings.contains(&ContentFinding::ExternalLink));
        assert!(!findings.contains(&ContentFinding::OffTopic));

        let findings = scan_content("Broilers ready, email sales@farm.co.ke");
        assert!(findings.contains(&ContentFinding::EmailAddress));
        assert!(!findings.contains(&ContentFinding::ExternalLink));

        assert!(scan_content("Hens available +254 722 000 111").contains(&ContentFinding::PhoneNumber));
    }

    #[test]
    fn test_scan_flags_prohibited_and_tone() {
        let findings = scan_content("Cheap steroids for broilers");
        assert!(findings.contains(&ContentFinding::Prohibited("steroids".into())));

        let findings = scan_content("BEST LAYERS IN NAKURU BUY NOW!!!");
        assert!(findings.contains(&ContentFinding::Shouting));
        assert!(findings.contains(&ContentFinding::ExcessivePunctuation));

        assert!(scan_content("chicks").contains(&ContentFinding::TooShort));
        assert!(scan_content("Toyota spare parts").contains(&ContentFinding::OffTopic));
    }

    #[test]
    fn test_clean_listing_has_no_findings() {
        assert!(scan_content("Fresh farm eggs, 30 per tray, collected daily").is_empty());
    }

    #[test]
    fn test_image_hints() {
        assert_eq!(image_name_hint("https://cdn.example/u/kienyeji_hens-2.jpg?v=3"), "kienyeji hens 2");
        assert!(is_poultry_label("Hen"));
        assert!(is_poultry_label("black grouse, bird"));
        assert!(!is_poultry_label("sports car"));
    }

    #[test]
    fn test_template_mentions_location() {
        let text = template_description("Fresh eggs", ProductCategory::Eggs, Some("Kiambu"));
        assert!(text.starts_with("Fresh eggs."));
        assert!(text.ends_with("Available from Kiambu."));
    }
}
