// Recognizer rules for free-text diagram extraction.

use std::sync::LazyLock;

use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern compiles")
}

/// Sentence boundaries for class extraction: runs of `.` and newlines.
pub static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| compile(r"[.\n]+"));

/// `create [a|an] NAME class [with ATTR_LIST]`
pub static CREATE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\bcreate\s+(?:an?\s+)?(?P<name>\w+)\s+class\b(?:\s+with\s+(?P<attrs>.+))?")
});

/// `LEFT has many RIGHT`
pub static HAS_MANY: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(?P<left>\w+)\s+has\s+many\s+(?P<right>\w+)"));

/// `LEFT belongs to [a|an|the] RIGHT`
pub static BELONGS_TO: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\b(?P<left>\w+)\s+belongs\s+to\s+(?:(?:an?|the)\s+)?(?P<right>\w+)")
});

/// `LEFT can be assigned to one RIGHT`
pub static ASSIGNED_TO: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\b(?P<left>\w+)\s+can\s+be\s+assigned\s+to\s+one\s+(?P<right>\w+)")
});

/// `actors: A, B, C`
pub static ACTORS_LINE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)^\s*actors\s*:(?P<list>.*)$"));

/// `use cases: X, Y`
pub static USE_CASES_LINE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)^\s*use\s*cases\s*:(?P<list>.*)$"));

/// `FROM -> TO : LABEL`
pub static MESSAGE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^\s*(?P<from>[^:]+?)\s*->\s*(?P<to>[^:]+?)\s*:\s*(?P<label>.*?)\s*$")
});

/// `ACTOR uses USE_CASE`
pub static USES_LINE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)^\s*(?P<actor>.+?)\s+uses\s+(?P<use_case>.+?)\s*$"));

/// Trigger word for the canned library templates.
pub fn mentions_library(text: &str) -> bool {
    text.to_lowercase().contains("library")
}

/// Split a comma-separated list, trimming items and dropping empties.
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Title-case a word: first letter of each alphabetic run upper, the rest lower.
pub fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut prev_alpha = false;
    for c in word.chars() {
        if prev_alpha {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}

/// Title-cased first whitespace-separated word of `text`, if any.
pub fn first_word_title(text: &str) -> Option<String> {
    text.split_whitespace().next().map(title_case)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_class_captures_name_and_attributes() {
        let caps = CREATE_CLASS
            .captures("Create an Invoice class with total and due_date")
            .unwrap();
        assert_eq!(&caps["name"], "Invoice");
        assert_eq!(&caps["attrs"], "total and due_date");

        let caps = CREATE_CLASS.captures("create User class").unwrap();
        assert_eq!(&caps["name"], "User");
        assert!(caps.name("attrs").is_none());
    }

    #[test]
    fn relationship_rules_are_case_insensitive() {
        let caps = HAS_MANY.captures("author HAS MANY book").unwrap();
        assert_eq!((&caps["left"], &caps["right"]), ("author", "book"));

        let caps = BELONGS_TO.captures("Loan belongs to a Member").unwrap();
        assert_eq!((&caps["left"], &caps["right"]), ("Loan", "Member"));

        let caps = ASSIGNED_TO
            .captures("Ticket can be assigned to one Agent")
            .unwrap();
        assert_eq!((&caps["left"], &caps["right"]), ("Ticket", "Agent"));
    }

    #[test]
    fn message_line_splits_participants_and_label() {
        let caps = MESSAGE_LINE.captures("  Client -> Server : GET /items ").unwrap();
        assert_eq!(&caps["from"], "Client");
        assert_eq!(&caps["to"], "Server");
        assert_eq!(&caps["label"], "GET /items");
        assert!(MESSAGE_LINE.captures("Client -> Server").is_none());
    }

    #[test]
    fn list_lines() {
        let caps = ACTORS_LINE.captures("Actors: Student, Instructor").unwrap();
        assert_eq!(split_list(&caps["list"]), vec!["Student", "Instructor"]);
        let caps = USE_CASES_LINE.captures("use cases: Enroll,, Grade ").unwrap();
        assert_eq!(split_list(&caps["list"]), vec!["Enroll", "Grade"]);
    }

    #[test]
    fn title_case_matches_word_boundaries() {
        assert_eq!(title_case("hello"), "Hello");
        assert_eq!(title_case("hELLO"), "Hello");
        assert_eq!(title_case("order_item"), "Order_Item");
        assert_eq!(first_word_title("   inventory tracker"), Some("Inventory".into()));
        assert_eq!(first_word_title("   "), None);
    }

    #[test]
    fn library_trigger_is_case_insensitive() {
        assert!(mentions_library("A LIBRARY system"));
        assert!(!mentions_library("a bookstore"));
    }
}
