//! Rule-based theme tagging.

use std::collections::{BTreeMap, BTreeSet};

/// Immutable mapping from theme name to its trigger lemma set.
///
/// Loaded once and passed by reference into the enricher; never
/// mutated at runtime. A review is tagged with every theme whose
/// trigger set intersects its lemma set, so labels are independent
/// booleans and the empty set is a valid outcome.
#[derive(Debug, Clone)]
pub struct ThemeRules {
    rules: BTreeMap<&'static str, BTreeSet<&'static str>>,
}

impl ThemeRules {
    /// The six themes of the review campaign, trigger terms in base
    /// (lemma) form.
    pub fn default_rules() -> Self {
        let mut rules = BTreeMap::new();
        rules.insert(
            "Account & Login Issues",
            triggers(&[
                "login", "password", "account", "register", "access", "otp", "block", "lock",
                "verify", "verification",
            ]),
        );
        rules.insert(
            "Transaction Performance",
            triggers(&[
                "transfer", "transaction", "slow", "fail", "stuck", "error", "fee", "charge",
                "limit", "pending",
            ]),
        );
        rules.insert(
            "UI & User Experience",
            triggers(&[
                "ui", "interface", "design", "easy", "simple", "update", "dark", "mode",
                "confuse", "hard", "look", "feel",
            ]),
        );
        rules.insert(
            "Reliability & Bugs",
            triggers(&[
                "crash", "bug", "glitch", "work", "stop", "open", "load", "freeze", "problem",
                "issue", "fix",
            ]),
        );
        rules.insert(
            "Customer Support",
            triggers(&[
                "support", "customer", "service", "call", "center", "help", "contact",
                "response", "agent", "branch",
            ]),
        );
        rules.insert(
            "Features & Functionality",
            triggers(&[
                "feature", "add", "option", "cbebirr", "telebirr", "loan", "statement",
                "balance", "notification",
            ]),
        );
        Self { rules }
    }

    /// Assign every theme whose trigger set intersects the lemmas.
    pub fn assign(&self, lemmas: &[String]) -> BTreeSet<String> {
        let lemma_set: BTreeSet<&str> = lemmas.iter().map(String::as_str).collect();
        self.rules
            .iter()
            .filter(|(_, triggers)| triggers.iter().any(|term| lemma_set.contains(term)))
            .map(|(theme, _)| (*theme).to_string())
            .collect()
    }

    pub fn theme_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.keys().copied()
    }
}

fn triggers(terms: &[&'static str]) -> BTreeSet<&'static str> {
    terms.iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lemmas(words: &[&str]) -> Vec<String> {
        words.iter().map(|word| (*word).to_string()).collect()
    }

    #[test]
    fn single_theme_from_clear_triggers() {
        let rules = ThemeRules::default_rules();
        let assigned = rules.assign(&lemmas(&["app", "crash", "bug", "fix"]));
        assert_eq!(
            assigned,
            ["Reliability & Bugs"].into_iter().map(String::from).collect()
        );
    }

    #[test]
    fn multiple_themes_from_mixed_triggers() {
        let rules = ThemeRules::default_rules();
        let assigned = rules.assign(&lemmas(&["login", "password", "slow", "transfer"]));
        assert!(assigned.contains("Account & Login Issues"));
        assert!(assigned.contains("Transaction Performance"));
    }

    #[test]
    fn no_match_yields_the_empty_set() {
        let rules = ThemeRules::default_rules();
        assert!(rules.assign(&lemmas(&["great", "thing"])).is_empty());
        assert!(rules.assign(&[]).is_empty());
    }

    #[test]
    fn assignment_is_idempotent() {
        let rules = ThemeRules::default_rules();
        let input = lemmas(&["login", "crash", "fee", "support"]);
        let first = rules.assign(&input);
        let second = rules.assign(&input);
        assert_eq!(first, second);
    }

    #[test]
    fn six_themes_are_defined() {
        let rules = ThemeRules::default_rules();
        assert_eq!(rules.theme_names().count(), 6);
    }
}
