//! Keyword-based page classification.

use crate::config::KeywordTable;

/// What a page's text says the page contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Label,
    Invoice,
    /// Matched both keyword sets; the merge policy emits the page to both
    /// roles.
    Both,
    Neither,
}

impl Classification {
    pub fn is_label(self) -> bool {
        matches!(self, Classification::Label | Classification::Both)
    }

    pub fn is_invoice(self) -> bool {
        matches!(self, Classification::Invoice | Classification::Both)
    }
}

/// Classify one page's extracted text.
///
/// Pure function of the text and the keyword table: matching is
/// case-insensitive substring containment, so the result depends only on set
/// membership, never on keyword order. Pages whose trimmed text is shorter
/// than `min_len` are Neither regardless of content (blank and near-blank
/// pages carry nothing worth cropping).
pub fn classify(text: &str, keywords: &KeywordTable, min_len: usize) -> Classification {
    let text = text.to_lowercase();
    if text.trim().len() < min_len {
        return Classification::Neither;
    }

    let matches_any = |set: &[String]| set.iter().any(|k| text.contains(&k.to_lowercase()));

    match (matches_any(&keywords.label), matches_any(&keywords.invoice)) {
        (true, true) => Classification::Both,
        (true, false) => Classification::Label,
        (false, true) => Classification::Invoice,
        (false, false) => Classification::Neither,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> KeywordTable {
        KeywordTable::default()
    }

    #[test]
    fn short_text_is_neither_even_with_keyword() {
        // "label" is a keyword but the guard wins
        assert_eq!(classify("label", &table(), 20), Classification::Neither);
        assert_eq!(classify("label", &table(), 3), Classification::Label);
    }

    #[test]
    fn empty_text_is_neither() {
        assert_eq!(classify("", &table(), 20), Classification::Neither);
        assert_eq!(classify("   \n  ", &table(), 1), Classification::Neither);
    }

    #[test]
    fn invoice_keywords_classify_invoice() {
        let text = "original for recipient tax invoice no. 4412";
        assert_eq!(classify(text, &table(), 20), Classification::Invoice);
    }

    #[test]
    fn label_keywords_classify_label() {
        let text = "ordered through marketplace, ship to soni singh, mumbai 400001";
        assert_eq!(classify(text, &table(), 20), Classification::Label);
    }

    #[test]
    fn dual_match_classifies_both() {
        let text = "ordered through marketplace -- tax invoice attached below";
        assert_eq!(classify(text, &table(), 20), Classification::Both);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let text = "ORIGINAL FOR RECIPIENT -- TAX INVOICE NO. 4412";
        assert_eq!(classify(text, &table(), 20), Classification::Invoice);
    }

    #[test]
    fn long_text_without_keywords_is_neither() {
        let text = "terms and conditions apply to this shipment of goods";
        assert_eq!(classify(text, &table(), 20), Classification::Neither);
    }

    #[test]
    fn keyword_order_does_not_matter() {
        let mut reversed = table();
        reversed.label.reverse();
        reversed.invoice.reverse();
        let text = "ordered through marketplace -- tax invoice attached";
        assert_eq!(
            classify(text, &table(), 20),
            classify(text, &reversed, 20)
        );
    }
}
