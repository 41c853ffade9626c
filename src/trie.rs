//! Prefix tree for longest-match token lookup.
//!
//! The parser never runs a separate lexer pass; instead every registered symbol
//! (operator symbols, constant names, function names, variable names) lives in
//! a [`CharTree`] and is matched directly against the source text at the
//! current cursor position. Lookup is longest-match: a tree containing both
//! `sin` and `sinh` matches `sinh` on input `"sinh(x)"`.
//!
//! The tree is keyed one byte per edge with a dense 256-entry child table per
//! node, so lookup on the hot path is a plain array index per character and an
//! absent key is reported as `None` rather than an error.

/// A prefix tree mapping ASCII symbol strings to values.
pub struct CharTree<T> {
    root: Node<T>,
}

struct Node<T> {
    value: Option<T>,
    children: [Option<Box<Node<T>>>; 256],
}

impl<T> Node<T> {
    fn new() -> Self {
        Self {
            value: None,
            children: std::array::from_fn(|_| None),
        }
    }
}

impl<T> CharTree<T> {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self { root: Node::new() }
    }

    /// Stores `value` under `key`, creating nodes along the byte path as
    /// needed. The last write wins on duplicate keys.
    pub fn set(&mut self, key: &str, value: T) {
        let mut node = &mut self.root;
        for &byte in key.as_bytes() {
            node = node.children[byte as usize].get_or_insert_with(|| Box::new(Node::new()));
        }
        node.value = Some(value);
    }

    /// Looks up the exact key, returning `None` if it was never set.
    pub fn get(&self, key: &str) -> Option<&T> {
        let mut node = &self.root;
        for &byte in key.as_bytes() {
            node = node.children[byte as usize].as_deref()?;
        }
        node.value.as_ref()
    }

    /// Walks forward from `start` in `text` and returns the value of the
    /// longest registered key that prefixes the remaining input, along with
    /// the number of bytes it spans.
    ///
    /// The walk remembers the last node along the path that carries a value,
    /// not the final node reached, which is what makes `sinh` win over `sin`.
    /// Returns `(None, 0)` when nothing matches.
    pub fn get_from(&self, text: &str, start: usize) -> (Option<&T>, usize) {
        let mut node = &self.root;
        let mut best = (None, 0);
        let mut walked = 0;
        for &byte in &text.as_bytes()[start..] {
            match node.children[byte as usize].as_deref() {
                Some(next) => node = next,
                None => break,
            }
            walked += 1;
            if let Some(value) = node.value.as_ref() {
                best = (Some(value), walked);
            }
        }
        best
    }
}

impl<T> Default for CharTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut tree = CharTree::new();
        tree.set("sin", 1);
        tree.set("cos", 2);
        assert_eq!(tree.get("sin"), Some(&1));
        assert_eq!(tree.get("cos"), Some(&2));
        assert_eq!(tree.get("tan"), None);
        assert_eq!(tree.get("si"), None);
    }

    #[test]
    fn test_last_write_wins() {
        let mut tree = CharTree::new();
        tree.set("pi", 1);
        tree.set("pi", 2);
        assert_eq!(tree.get("pi"), Some(&2));
    }

    #[test]
    fn test_longest_match() {
        let mut tree = CharTree::new();
        tree.set("sin", "sin");
        tree.set("sinh", "sinh");
        assert_eq!(tree.get_from("sinh(x)", 0), (Some(&"sinh"), 4));
        assert_eq!(tree.get_from("sin(x)", 0), (Some(&"sin"), 3));
        // "sini" descends past "sin" but falls off before another value
        assert_eq!(tree.get_from("sini", 0), (Some(&"sin"), 3));
    }

    #[test]
    fn test_match_from_offset() {
        let mut tree = CharTree::new();
        tree.set("+", '+');
        assert_eq!(tree.get_from("1+2", 1), (Some(&'+'), 1));
        assert_eq!(tree.get_from("1+2", 0), (None, 0));
    }

    #[test]
    fn test_no_match_at_end_of_input() {
        let mut tree = CharTree::new();
        tree.set("x", ());
        assert_eq!(tree.get_from("abc", 3), (None, 0));
    }
}
