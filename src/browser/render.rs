//! Display hook for fetched content.

use crate::identifiers::TabId;

// ============================================================================
// Renderer
// ============================================================================

/// Receives the body of every successfully applied fetch.
///
/// Called on the session owner, once per applied result. Failures are not
/// rendered; they show up in the tab's status instead.
pub trait Renderer: Send {
    /// Displays `body` for `tab_id`.
    fn render(&mut self, tab_id: TabId, body: &str);
}

impl<F> Renderer for F
where
    F: FnMut(TabId, &str) + Send,
{
    fn render(&mut self, tab_id: TabId, body: &str) {
        self(tab_id, body);
    }
}

// ============================================================================
// NoopRenderer
// ============================================================================

/// Renderer that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRenderer;

impl Renderer for NoopRenderer {
    fn render(&mut self, _tab_id: TabId, _body: &str) {}
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_renderer() {
        let mut seen = Vec::new();
        {
            let mut renderer = |tab_id: TabId, body: &str| seen.push((tab_id, body.to_string()));
            renderer.render(TabId::FIRST, "<p>x</p>");
        }
        assert_eq!(seen, vec![(TabId::FIRST, "<p>x</p>".to_string())]);
    }
}
