//! The external renderer seam.

use livediff_core::Node;

use crate::error::{Error, Result};

/// Produces the rendered tree for the session's current view state.
///
/// Implementations own the view state; the session only sees trees. A
/// renderer must be deterministic for identical state, and must emit children
/// in final DOM order — the differ trusts that ordering.
pub trait Renderer: Send {
    fn render(&mut self) -> Result<Node>;
}

/// Adapts a closure into a renderer.
pub struct FnRenderer<F>(F);

impl<F> FnRenderer<F>
where
    F: FnMut() -> Result<Node> + Send,
{
    pub fn new(render: F) -> Self {
        Self(render)
    }
}

impl<F> Renderer for FnRenderer<F>
where
    F: FnMut() -> Result<Node> + Send,
{
    fn render(&mut self) -> Result<Node> {
        (self.0)()
    }
}

/// Adapts a renderer that produces HTML strings (the common template-engine
/// shape) by parsing its output into a tree.
#[cfg(feature = "html")]
pub struct HtmlRenderer<F>(F);

#[cfg(feature = "html")]
impl<F> HtmlRenderer<F>
where
    F: FnMut() -> Result<String> + Send,
{
    pub fn new(render: F) -> Self {
        Self(render)
    }
}

#[cfg(feature = "html")]
impl<F> Renderer for HtmlRenderer<F>
where
    F: FnMut() -> Result<String> + Send,
{
    fn render(&mut self) -> Result<Node> {
        let html = (self.0)()?;
        Ok(livediff_core::parse_html(&html)?)
    }
}

/// Replays a fixed sequence of trees, one per render; errors once exhausted.
/// Useful for tests and scripted demos.
pub struct SequenceRenderer {
    frames: Vec<Node>,
    cursor: usize,
}

impl SequenceRenderer {
    pub fn new(frames: Vec<Node>) -> Self {
        Self { frames, cursor: 0 }
    }
}

impl Renderer for SequenceRenderer {
    fn render(&mut self) -> Result<Node> {
        let frame = self
            .frames
            .get(self.cursor)
            .cloned()
            .ok_or_else(|| Error::Renderer("render sequence exhausted".to_string()))?;
        self.cursor += 1;
        Ok(frame)
    }
}
