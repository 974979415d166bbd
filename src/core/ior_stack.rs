// Copyright @yucwang 2026

use crate::math::constants::Float;

#[derive(Debug, Clone, Copy, PartialEq)]
struct IorEntry {
    object: Option<usize>,
    ior: Float,
}

/// Indices of refraction of the nested dielectrics a path is currently inside.
/// The ambient entry at the bottom is never popped.
#[derive(Debug, Clone, PartialEq)]
pub struct IorStack {
    entries: Vec<IorEntry>,
}

impl IorStack {
    pub fn new(ambient_ior: Float) -> Self {
        Self { entries: vec![IorEntry { object: None, ior: ambient_ior }] }
    }

    pub fn push(&mut self, object: usize, ior: Float) {
        self.entries.push(IorEntry { object: Some(object), ior });
    }

    /// Removes the innermost entry belonging to `object`.
    pub fn pop(&mut self, object: usize) -> bool {
        match self.entries.iter().rposition(|e| e.object == Some(object)) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => {
                log::warn!("IorStack: pop for object {} which was never entered.", object);
                false
            }
        }
    }

    pub fn top(&self) -> Float {
        self.entries.last().map(|e| e.ior).unwrap_or(1.0)
    }

    pub fn contains(&self, object: usize) -> bool {
        self.entries.iter().any(|e| e.object == Some(object))
    }

    /// Number of dielectrics entered.
    pub fn depth(&self) -> usize {
        self.entries.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::IorStack;

    #[test]
    fn test_push_pop_nesting() {
        let mut stack = IorStack::new(1.0);
        assert_eq!(stack.top(), 1.0);

        stack.push(3, 1.5);
        stack.push(8, 1.33);
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.top(), 1.33);

        assert!(stack.pop(3));
        assert_eq!(stack.top(), 1.33);
        assert!(stack.pop(8));
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.top(), 1.0);
    }

    #[test]
    fn test_base_entry_survives_bad_pop() {
        let mut stack = IorStack::new(1.2);
        assert!(!stack.pop(42));
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.top(), 1.2);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut a = IorStack::new(1.0);
        a.push(1, 1.5);
        let mut b = a.clone();
        b.pop(1);
        assert!(a.contains(1));
        assert!(!b.contains(1));
    }
}
