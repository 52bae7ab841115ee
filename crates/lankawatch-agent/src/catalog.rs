//! Risk category catalog and keyword matching

use crate::error::AgentError;
use lankawatch_domain::RiskCategory;
use std::collections::HashSet;

/// One category's hits in a piece of text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryHit<'a> {
    /// The matched category
    pub category: &'a RiskCategory,
    /// Total occurrences of its trigger terms, always at least 1
    pub count: usize,
}

impl CategoryHit<'_> {
    /// Weighted contribution to the risk score
    pub fn score(&self) -> f64 {
        self.category.base_weight * self.count as f64
    }
}

/// Immutable registry of risk categories
///
/// Built once at startup and shared by both strategies. Categories keep
/// the order they were supplied in; matches are reported in that order.
#[derive(Debug, Clone)]
pub struct RiskCategoryCatalog {
    categories: Vec<RiskCategory>,
    // lowercased non-blank terms, parallel to `categories`
    needles: Vec<Vec<String>>,
}

impl RiskCategoryCatalog {
    /// Build a catalog from user-supplied categories
    ///
    /// # Errors
    ///
    /// Returns `AgentError::Catalog` if the list is empty, a name is blank or
    /// duplicated, a category has no usable term, or a weight is not a
    /// strictly positive finite number.
    pub fn new(categories: Vec<RiskCategory>) -> Result<Self, AgentError> {
        if categories.is_empty() {
            return Err(AgentError::Catalog(
                "catalog must contain at least one category".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for category in &categories {
            let name = category.name.trim();
            if name.is_empty() {
                return Err(AgentError::Catalog("category name cannot be empty".to_string()));
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(AgentError::Catalog(format!("duplicate category '{}'", name)));
            }
            if category.trigger_terms.iter().all(|t| t.trim().is_empty()) {
                return Err(AgentError::Catalog(format!(
                    "category '{}' has no trigger terms",
                    name
                )));
            }
            if !(category.base_weight.is_finite() && category.base_weight > 0.0) {
                return Err(AgentError::Catalog(format!(
                    "category '{}' has non-positive weight {}",
                    name, category.base_weight
                )));
            }
        }

        Ok(Self::from_validated(categories))
    }

    fn from_validated(categories: Vec<RiskCategory>) -> Self {
        let needles = categories
            .iter()
            .map(|c| {
                c.trigger_terms
                    .iter()
                    .map(|t| t.to_lowercase())
                    .filter(|t| !t.trim().is_empty())
                    .collect()
            })
            .collect();
        Self {
            categories,
            needles,
        }
    }

    /// The built-in Sri Lanka news catalog
    pub fn builtin() -> Self {
        Self::from_validated(builtin_categories())
    }

    /// All categories in catalog order
    pub fn categories(&self) -> &[RiskCategory] {
        &self.categories
    }

    /// Look a category up by name, ignoring case
    pub fn get(&self, name: &str) -> Option<&RiskCategory> {
        let name = name.trim();
        self.categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Always false for a validated catalog
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Count trigger-term occurrences per category
    ///
    /// Matching is case-insensitive term matching: a hit must start at a
    /// word boundary and may only run on into a plain inflection ("protests",
    /// "bombing"), so "isis" never fires inside "crisis". Every
    /// non-overlapping occurrence of every term counts. Categories without
    /// a hit are left out.
    pub fn match_text(&self, text: &str) -> Vec<CategoryHit<'_>> {
        let haystack = text.to_lowercase();
        self.categories
            .iter()
            .zip(&self.needles)
            .filter_map(|(category, needles)| {
                let count: usize = needles
                    .iter()
                    .map(|needle| count_term(&haystack, needle))
                    .sum();
                (count > 0).then_some(CategoryHit { category, count })
            })
            .collect()
    }
}

/// Word endings a term may carry and still count as a hit
const INFLECTIONS: [&str; 8] = ["s", "es", "d", "ed", "er", "ers", "ing", "ings"];

/// Non-overlapping occurrences of `needle` that sit on word boundaries
fn count_term(haystack: &str, needle: &str) -> usize {
    haystack
        .match_indices(needle)
        .filter(|(start, _)| {
            let starts_word = haystack[..*start]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric());

            let rest = &haystack[start + needle.len()..];
            let tail_len = rest
                .find(|c: char| !c.is_alphanumeric())
                .unwrap_or(rest.len());
            let tail = &rest[..tail_len];

            starts_word && (tail.is_empty() || INFLECTIONS.contains(&tail))
        })
        .count()
}

impl Default for RiskCategoryCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Categories of the built-in catalog
pub fn builtin_categories() -> Vec<RiskCategory> {
    vec![
        // Geopolitical & security
        RiskCategory::new(
            "Political Instability",
            &[
                "government collapse",
                "coup",
                "regime change",
                "political crisis",
                "election violence",
                "parliament dissolved",
                "cabinet reshuffle",
            ],
            4.0,
        ),
        RiskCategory::new(
            "Civil Unrest",
            &[
                "protest",
                "riot",
                "strike",
                "demonstration",
                "unrest",
                "clashes",
                "violence",
                "mob attack",
                "agitation",
            ],
            3.0,
        ),
        RiskCategory::new(
            "Terrorism",
            &[
                "terrorist",
                "bomb",
                "explosion",
                "attack",
                "militant",
                "extremist",
                "suicide bomber",
                "isis",
                "al-qaeda",
            ],
            5.0,
        ),
        RiskCategory::new(
            "Military Conflict",
            &[
                "military offensive",
                "armed forces",
                "troops",
                "airstrike",
                "shelling",
                "border clash",
                "warfare",
                "war crimes",
            ],
            5.0,
        ),
        // Economic & financial
        RiskCategory::new(
            "Economic Crisis",
            &[
                "economic crisis",
                "inflation",
                "debt default",
                "bankruptcy",
                "currency collapse",
                "recession",
                "financial crisis",
                "imf bailout",
            ],
            3.0,
        ),
        RiskCategory::new(
            "Financial Fraud",
            &[
                "financial fraud",
                "ponzi",
                "pyramid scheme",
                "scam",
                "forgery",
                "insider trading",
            ],
            3.0,
        ),
        RiskCategory::new(
            "Corruption",
            &[
                "corruption",
                "bribery",
                "embezzlement",
                "fraud",
                "kickback",
                "money laundering",
                "misappropriation",
                "graft",
            ],
            3.0,
        ),
        RiskCategory::new(
            "Sanctions",
            &[
                "sanctions",
                "embargo",
                "blacklisted",
                "asset freeze",
                "export ban",
                "travel ban",
            ],
            3.0,
        ),
        // Legal & compliance
        RiskCategory::new(
            "Regulatory Changes",
            &[
                "new regulation",
                "gazette notification",
                "import restrictions",
                "tax hike",
                "new law",
                "regulatory",
            ],
            1.0,
        ),
        RiskCategory::new(
            "Legal Violations",
            &[
                "lawsuit",
                "indicted",
                "illegal",
                "charged with",
                "remanded",
                "court case",
            ],
            2.0,
        ),
        RiskCategory::new(
            "Human Rights Violations",
            &[
                "human rights",
                "torture",
                "arbitrary arrest",
                "disappearance",
                "unlawful detention",
                "abuse",
                "violation",
            ],
            3.0,
        ),
        // Operational
        RiskCategory::new(
            "Infrastructure Damage",
            &[
                "power outage",
                "power cut",
                "blackout",
                "bridge collapse",
                "derailed",
                "infrastructure damage",
            ],
            3.0,
        ),
        RiskCategory::new(
            "Supply Chain Disruption",
            &[
                "supply chain",
                "shortage",
                "supply disruption",
                "port congestion",
                "fuel queue",
                "import delay",
            ],
            2.0,
        ),
        RiskCategory::new(
            "Cyber Security Threat",
            &[
                "cyber attack",
                "data breach",
                "hacking",
                "ransomware",
                "phishing",
                "malware",
                "cyber threat",
            ],
            3.0,
        ),
        // Reputational
        RiskCategory::new(
            "Corporate Scandal",
            &[
                "scandal",
                "accounting irregularities",
                "whistleblower",
                "cover-up",
                "ceo resigns",
            ],
            2.0,
        ),
        RiskCategory::new(
            "Environmental Risk",
            &[
                "pollution",
                "toxic",
                "environmental damage",
                "deforestation",
                "oil spill",
                "chemical leak",
                "waste dumping",
            ],
            2.0,
        ),
        RiskCategory::new(
            "Social Issues",
            &[
                "poverty",
                "unemployment",
                "homelessness",
                "discrimination",
                "malnutrition",
                "brain drain",
            ],
            1.0,
        ),
        // Other
        RiskCategory::new(
            "Public Health Crisis",
            &[
                "epidemic",
                "pandemic",
                "outbreak",
                "disease",
                "health crisis",
                "contamination",
                "food poisoning",
            ],
            4.0,
        ),
        RiskCategory::new(
            "Natural Disaster",
            &[
                "flood",
                "landslide",
                "cyclone",
                "earthquake",
                "tsunami",
                "drought",
                "wildfire",
                "natural disaster",
            ],
            4.0,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_catalog() -> RiskCategoryCatalog {
        RiskCategoryCatalog::new(vec![
            RiskCategory::new("Civil Unrest", &["protest", "riot"], 3.0),
            RiskCategory::new("Economic Crisis", &["inflation", "economic crisis"], 3.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_builtin_is_valid() {
        let builtin = builtin_categories();
        assert_eq!(builtin.len(), 19);
        assert!(RiskCategoryCatalog::new(builtin).is_ok());
        assert!(RiskCategoryCatalog::builtin().get("unknown/other").is_none());
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let catalog = small_catalog();
        let hits = catalog.match_text("PROTEST over Inflation");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].category.name, "Civil Unrest");
        assert_eq!(hits[0].count, 1);
        assert_eq!(hits[1].category.name, "Economic Crisis");
    }

    #[test]
    fn test_match_counts_every_occurrence() {
        let catalog = small_catalog();
        let hits = catalog.match_text("Protest after protest, then a riot");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].count, 3);
        assert_eq!(hits[0].score(), 9.0);
    }

    #[test]
    fn test_match_substring_semantics() {
        let catalog = small_catalog();
        let hits = catalog.match_text("Mass protests erupt");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].count, 1);
    }

    #[test]
    fn test_match_respects_word_boundaries() {
        let catalog = RiskCategoryCatalog::new(vec![
            RiskCategory::new("Terrorism", &["isis", "bomb"], 5.0),
            RiskCategory::new("Political Instability", &["coup"], 4.0),
        ])
        .unwrap();

        assert!(catalog.match_text("Health crisis looms").is_empty());
        assert!(catalog.match_text("Firms recoup losses with coupons").is_empty());
        assert!(catalog.match_text("Bombay duck prices").is_empty());

        let hits = catalog.match_text("Bombing claimed by ISIS; bombers at large after coup-attempt");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].count, 3);
        assert_eq!(hits[1].count, 1);
    }

    #[test]
    fn test_builtin_crisis_headlines() {
        let catalog = RiskCategoryCatalog::builtin();
        for headline in [
            "Health crisis looms as dengue cases rise",
            "Mass protests erupt in Colombo over economic crisis",
            "Political crisis deepens in parliament",
            "Financial crisis hits small lenders",
        ] {
            let names: Vec<&str> = catalog
                .match_text(headline)
                .iter()
                .map(|h| h.category.name.as_str())
                .collect();
            assert!(!names.contains(&"Terrorism"), "{} -> {:?}", headline, names);
        }
    }

    #[test]
    fn test_builtin_protest_and_bakery() {
        let catalog = RiskCategoryCatalog::builtin();

        let hits = catalog.match_text("Mass protests erupt in Colombo over economic crisis");
        let names: Vec<&str> = hits.iter().map(|h| h.category.name.as_str()).collect();
        assert_eq!(names, vec!["Civil Unrest", "Economic Crisis"]);
        assert_eq!(hits.iter().map(|h| h.score()).sum::<f64>(), 6.0);

        assert!(catalog.match_text("Local bakery wins regional award").is_empty());
    }

    #[test]
    fn test_match_none() {
        let catalog = RiskCategoryCatalog::builtin();
        assert!(catalog.match_text("Local bakery wins regional award").is_empty());
        assert!(catalog.match_text("").is_empty());
    }

    #[test]
    fn test_match_reports_catalog_order() {
        let catalog = small_catalog();
        let hits = catalog.match_text("inflation sparks protest");
        let names: Vec<&str> = hits.iter().map(|h| h.category.name.as_str()).collect();
        assert_eq!(names, vec!["Civil Unrest", "Economic Crisis"]);
    }

    #[test]
    fn test_rejects_empty_catalog() {
        assert!(matches!(
            RiskCategoryCatalog::new(vec![]),
            Err(AgentError::Catalog(_))
        ));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let result = RiskCategoryCatalog::new(vec![
            RiskCategory::new("Terrorism", &["bomb"], 5.0),
            RiskCategory::new("terrorism", &["attack"], 5.0),
        ]);
        assert!(matches!(result, Err(AgentError::Catalog(msg)) if msg.contains("duplicate")));
    }

    #[test]
    fn test_rejects_bad_weight_and_terms() {
        assert!(RiskCategoryCatalog::new(vec![RiskCategory::new("A", &["x"], 0.0)]).is_err());
        assert!(RiskCategoryCatalog::new(vec![RiskCategory::new("A", &["x"], -1.0)]).is_err());
        assert!(RiskCategoryCatalog::new(vec![RiskCategory::new("A", &["x"], f64::NAN)]).is_err());
        assert!(RiskCategoryCatalog::new(vec![RiskCategory::new("A", &["  "], 1.0)]).is_err());
        assert!(RiskCategoryCatalog::new(vec![RiskCategory::new(" ", &["x"], 1.0)]).is_err());
    }

    #[test]
    fn test_blank_terms_are_ignored() {
        let catalog =
            RiskCategoryCatalog::new(vec![RiskCategory::new("A", &["", "flood"], 1.0)]).unwrap();
        assert!(catalog.match_text("calm day").is_empty());
        assert_eq!(catalog.match_text("flood").len(), 1);
    }

    #[test]
    fn test_get_by_name() {
        let catalog = RiskCategoryCatalog::builtin();
        assert_eq!(
            catalog.get("natural disaster").map(|c| c.name.as_str()),
            Some("Natural Disaster")
        );
        assert!(catalog.get("Weather").is_none());
    }
}
