// Card Builder
// Flat list of summary cards, sliced into fixed-size pages for the home tab

use crate::stats::StatisticsSnapshot;
use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStyle {
    /// Total-count card
    Primary,
    /// Per-bank card
    Secondary,
}

impl CardStyle {
    /// CSS class used by the web front end
    pub fn css_class(&self) -> &'static str {
        match self {
            CardStyle::Primary => "bg-primary",
            CardStyle::Secondary => "bg-secondary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub label: String,
    pub style: CardStyle,
}

impl Card {
    fn new(label: String, style: CardStyle) -> Self {
        Card { label, style }
    }
}

/// Total card first, then one card per bank in the snapshot's bank order
pub fn build_cards(stats: &StatisticsSnapshot) -> Vec<Card> {
    let mut cards = Vec::with_capacity(stats.comments_by_bank.len() + 1);

    cards.push(Card::new(
        format!("Total de Commentaires: {}", stats.total_comments),
        CardStyle::Primary,
    ));

    for bank in &stats.comments_by_bank {
        cards.push(Card::new(
            format!("Total de Commentaires pour {}: {}", bank.bank, bank.count),
            CardStyle::Secondary,
        ));
    }

    cards
}

/// Cards on `page_number`. Short or empty at the tail; never panics for out-of-range pages.
pub fn page(cards: &[Card], page_number: usize, page_size: usize) -> &[Card] {
    let start = page_number.saturating_mul(page_size).min(cards.len());
    let end = start.saturating_add(page_size).min(cards.len());
    &cards[start..end]
}

/// Last valid page index: ceil(count / size) - 1, or 0 when there is nothing to show
pub fn max_page(card_count: usize, page_size: usize) -> usize {
    if card_count == 0 || page_size == 0 {
        return 0;
    }
    card_count.div_ceil(page_size) - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CommentRecord, CommentTable};
    use crate::stats::compute_statistics;

    fn cards_for_banks(bank_count: usize) -> Vec<Card> {
        let records = (0..bank_count)
            .map(|i| CommentRecord::new(&format!("Bank{i:02}"), 2020, None))
            .collect();
        build_cards(&compute_statistics(&CommentTable::new(records, false)))
    }

    #[test]
    fn test_build_cards_labels() {
        let table = CommentTable::new(
            vec![
                CommentRecord::new("BankA", 2020, None),
                CommentRecord::new("BankA", 2021, None),
                CommentRecord::new("BankB", 2020, None),
            ],
            false,
        );
        let cards = build_cards(&compute_statistics(&table));

        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].label, "Total de Commentaires: 3");
        assert_eq!(cards[0].style, CardStyle::Primary);
        assert_eq!(cards[1].label, "Total de Commentaires pour BankA: 2");
        assert_eq!(cards[2].label, "Total de Commentaires pour BankB: 1");
        assert!(cards[1..].iter().all(|c| c.style == CardStyle::Secondary));
    }

    #[test]
    fn test_empty_table_still_has_total_card() {
        let cards = build_cards(&compute_statistics(&CommentTable::default()));

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].label, "Total de Commentaires: 0");
    }

    #[test]
    fn test_page_lengths() {
        let cards = cards_for_banks(39); // 40 cards

        for (page_number, expected) in [(0, 16), (1, 16), (2, 8), (3, 0), (usize::MAX, 0)] {
            assert_eq!(
                page(&cards, page_number, DEFAULT_PAGE_SIZE).len(),
                expected,
                "page {page_number}"
            );
        }
    }

    #[test]
    fn test_pages_reconstruct_cards() {
        for bank_count in [0, 1, 15, 16, 31, 47] {
            let cards = cards_for_banks(bank_count);
            let last = max_page(cards.len(), DEFAULT_PAGE_SIZE);

            let rebuilt: Vec<Card> = (0..=last)
                .flat_map(|p| page(&cards, p, DEFAULT_PAGE_SIZE).to_vec())
                .collect();

            assert_eq!(rebuilt, cards, "{bank_count} banks");
        }
    }

    #[test]
    fn test_max_page() {
        assert_eq!(max_page(0, 16), 0);
        assert_eq!(max_page(1, 16), 0);
        assert_eq!(max_page(16, 16), 0);
        assert_eq!(max_page(17, 16), 1);
        assert_eq!(max_page(33, 16), 2);
        assert_eq!(max_page(5, 0), 0);
    }
}
