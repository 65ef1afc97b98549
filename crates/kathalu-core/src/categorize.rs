//! Title-based story categorization.
//!
//! Classification is an ordered cascade of keyword rules evaluated against the
//! lower-cased title. The first rule with any keyword contained in the title
//! wins; a title that matches nothing is [`Category::General`].
//!
//! Matching is plain substring containment: no stemming and no word
//! boundaries, so a keyword embedded in a longer word still matches.
//!
//! # Rule Order
//!
//! | Priority | Category | Example keywords |
//! |----------|----------|------------------|
//! | 1 | `family` | అమ్మ, నాన్న, పెళ్లి, family |
//! | 2 | `spiritual` | దేవుడు, పూజ, శ్రీ, spiritual |
//! | 3 | `travel` | ప్రయాణ, యాత్ర, trip, travel |
//! | 4 | `kids` | పిల్లల, బాల, kids, children |
//! | 5 | `philosophical` | జీవిత, తత్వ, lesson, wisdom |
//! | 6 | `general` | (fallback) |

use crate::models::{Category, Story};

/// A single classification tier: a category and the keywords that select it.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub category: Category,
    pub keywords: &'static [&'static str],
}

impl KeywordRule {
    /// True if any keyword occurs in the (already lower-cased) title.
    pub fn matches(&self, lowered_title: &str) -> bool {
        self.keywords.iter().any(|kw| lowered_title.contains(kw))
    }
}

/// Classification rules in strict priority order.
pub const RULES: [KeywordRule; 5] = [
    KeywordRule {
        category: Category::Family,
        keywords: &[
            "అమ్మ", "నాన్న", "కుటుంబ", "పెళ్లి", "వివాహ", "అల్లుడు", "కోడలు", "వదిన", "family",
        ],
    },
    KeywordRule {
        category: Category::Spiritual,
        keywords: &[
            "దేవుడు",
            "భగవాన్",
            "పూజ",
            "మంత్ర",
            "స్తోత్ర",
            "spiritual",
            "శ్రీ",
            "గణేశ",
            "విష్ణు",
            "శివ",
            "దేవ",
            "దేవి",
        ],
    },
    KeywordRule {
        category: Category::Travel,
        keywords: &[
            "ప్రయాణ", "యాత్ర", "ట్రిప్", "travel", "trip", "విమాన", "రైలు", "బస్",
        ],
    },
    KeywordRule {
        category: Category::Kids,
        keywords: &[
            "పిల్లల", "చిన్న", "బాల", "పాప", "kids", "children", "బుడ్డి", "అబ్బాయి", "అమ్మాయి",
        ],
    },
    KeywordRule {
        category: Category::Philosophical,
        keywords: &[
            "జీవిత",
            "తత్వ",
            "జ్ఞాన",
            "విషయ",
            "అనుభవ",
            "lesson",
            "wisdom",
            "philosophical",
        ],
    },
];

/// Classify a title. Total and deterministic.
pub fn categorize(title: &str) -> Category {
    let lowered = title.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.category)
        .unwrap_or(Category::General)
}

/// Classify a story by its title, ignoring any stored tags.
pub fn categorize_story(story: &Story) -> Category {
    categorize(&story.title)
}

/// Resolve the category set for a story at ingestion time.
///
/// Recognised stored tags win and are returned in priority order without
/// duplicates. With no recognised stored tag the single derived category is
/// used.
pub fn resolve_categories(stored: &[Category], title: &str) -> Vec<Category> {
    let mut resolved: Vec<Category> = Category::PRIORITY
        .iter()
        .copied()
        .filter(|c| stored.contains(c))
        .collect();
    if resolved.is_empty() {
        resolved.push(categorize(title));
    }
    resolved
}
