//! Selection model: at most one block is inspected at a time.

/// Zero-or-one reference to a block id.
///
/// Transitions: empty → selected on click, selected → empty on close,
/// selected → selected on clicking a different block. Dependent state
/// (explanation, chat transcript) is reset by the owner on every change;
/// see [`crate::viewer`].
#[derive(Debug, Default, Clone)]
pub struct Selection {
    current: Option<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, id: impl Into<String>) {
        self.current = Some(id.into());
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.current.as_deref() == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_then_clear_returns_to_empty() {
        let mut sel = Selection::new();
        assert_eq!(sel.current(), None);

        sel.select("Encoder-attention");
        assert_eq!(sel.current(), Some("Encoder-attention"));
        assert!(sel.is_selected("Encoder-attention"));
        assert!(!sel.is_selected("Decoder-attention"));

        sel.clear();
        assert_eq!(sel.current(), None);
    }

    #[test]
    fn selecting_another_block_replaces_the_first() {
        let mut sel = Selection::new();
        sel.select("Encoder-ffn");
        sel.select("Decoder-softmax");
        assert_eq!(sel.current(), Some("Decoder-softmax"));
    }
}
