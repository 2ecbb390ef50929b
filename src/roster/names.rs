/// Split bulk input into names. Lines and commas both separate entries;
/// whitespace is trimmed and empty entries dropped. Input order is kept,
/// duplicates included.
pub fn parse_names(raw: &str) -> Vec<String> {
    raw.lines()
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Outcome of a bulk add. Both zero means the input held no names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BulkAdd {
    pub added: usize,
    pub skipped: usize,
}

impl BulkAdd {
    pub fn is_empty_input(&self) -> bool {
        self.added == 0 && self.skipped == 0
    }

    /// "Added 2 people, skipped 1 duplicate"
    pub fn summary(&self, singular: &str, plural: &str) -> String {
        if self.added == 0 {
            return format!("All {} were already in the list", plural);
        }
        let noun = if self.added == 1 { singular } else { plural };
        let mut msg = format!("Added {} {}", self.added, noun);
        if self.skipped > 0 {
            let dup = if self.skipped == 1 { "duplicate" } else { "duplicates" };
            msg.push_str(&format!(", skipped {} {}", self.skipped, dup));
        }
        msg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_mixed_separators() {
        assert_eq!(
            parse_names("Alice, Bob\nCarol,,\n  \n Dan "),
            vec!["Alice", "Bob", "Carol", "Dan"]
        );
    }

    #[test]
    fn test_parse_names_empty() {
        assert!(parse_names("").is_empty());
        assert!(parse_names(" ,\n , ").is_empty());
    }

    #[test]
    fn test_parse_names_windows_newlines() {
        assert_eq!(parse_names("Alice\r\nBob"), vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_summary() {
        let r = BulkAdd { added: 2, skipped: 1 };
        assert_eq!(r.summary("person", "people"), "Added 2 people, skipped 1 duplicate");
        let r = BulkAdd { added: 1, skipped: 0 };
        assert_eq!(r.summary("class", "classes"), "Added 1 class");
        let r = BulkAdd { added: 0, skipped: 3 };
        assert_eq!(r.summary("class", "classes"), "All classes were already in the list");
    }
}
