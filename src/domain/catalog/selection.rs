//! Selection from a numbered menu by index or by name.

/// Anything that can be listed in a numbered menu.
pub trait Named {
    fn display_name(&self) -> &str;
}

/// Resolves a menu answer against a catalog.
///
/// A 1-based index wins first; otherwise the first entry whose display name
/// contains the answer (case-insensitive) is chosen. Blank answers never match.
pub fn select_by_index_or_name<'a, T: Named>(items: &'a [T], answer: &str) -> Option<&'a T> {
    let answer = answer.trim();
    if answer.is_empty() {
        return None;
    }

    if let Ok(index) = answer.parse::<usize>() {
        if (1..=items.len()).contains(&index) {
            return items.get(index - 1);
        }
    }

    let needle = answer.to_lowercase();
    items
        .iter()
        .find(|item| item.display_name().to_lowercase().contains(&needle))
}

/// Renders items as `1. Name` lines, one per entry.
pub fn numbered_menu<T: Named>(items: &[T]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item.display_name()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item(&'static str);

    impl Named for Item {
        fn display_name(&self) -> &str {
            self.0
        }
    }

    fn items() -> Vec<Item> {
        vec![
            Item("Bệnh viện Chợ Rẫy"),
            Item("Bệnh viện Đại học Y Dược"),
            Item("Bệnh viện Nhi Đồng 1"),
        ]
    }

    #[test]
    fn index_selects_one_based_entry() {
        let items = items();
        let chosen = select_by_index_or_name(&items, "2").unwrap();
        assert_eq!(chosen.0, "Bệnh viện Đại học Y Dược");
    }

    #[test]
    fn index_tolerates_surrounding_whitespace() {
        let items = items();
        assert_eq!(select_by_index_or_name(&items, "  1 ").unwrap().0, "Bệnh viện Chợ Rẫy");
    }

    #[test]
    fn falls_back_to_case_insensitive_substring() {
        let items = items();
        let chosen = select_by_index_or_name(&items, "chợ rẫy").unwrap();
        assert_eq!(chosen.0, "Bệnh viện Chợ Rẫy");
    }

    #[test]
    fn out_of_range_index_without_name_match_is_none() {
        let items = items();
        assert!(select_by_index_or_name(&items, "7").is_none());
        assert!(select_by_index_or_name(&items, "0").is_none());
    }

    #[test]
    fn names_containing_digits_match_by_substring() {
        let items = items();
        assert_eq!(select_by_index_or_name(&items, "đồng 1").unwrap().0, "Bệnh viện Nhi Đồng 1");
    }

    #[test]
    fn blank_answer_never_matches() {
        let items = items();
        assert!(select_by_index_or_name(&items, "   ").is_none());
    }

    #[test]
    fn numbered_menu_lists_every_entry() {
        let menu = numbered_menu(&items());
        assert_eq!(
            menu,
            "1. Bệnh viện Chợ Rẫy\n2. Bệnh viện Đại học Y Dược\n3. Bệnh viện Nhi Đồng 1"
        );
    }
}
