//! A scripted layout host for probe tests.

#![allow(dead_code)]

use reflow_css::DomRect;
use reflow_probe::{LayoutHost, ProbeError};

/// Handle into [`MockHost`]: the document generation and the element slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockElement {
    pub generation: u32,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
struct MockBox {
    id: String,
    width: f64,
    height: f64,
}

/// Boxes stacked vertically from the origin. Style changes to `width` and
/// `height` take effect at the next geometry read, unless the host is
/// `stale`, in which case they only show up after a rebuild.
#[derive(Debug)]
pub struct MockHost {
    boxes: Vec<MockBox>,
    laid_out: Vec<MockBox>,
    generation: u32,
    stale: bool,
    pub rebuilds: usize,
    pub reads: usize,
}

impl MockHost {
    pub fn new(boxes: &[(&str, f64, f64)]) -> Self {
        let boxes: Vec<MockBox> = boxes
            .iter()
            .map(|&(id, width, height)| MockBox {
                id: id.to_string(),
                width,
                height,
            })
            .collect();
        Self {
            laid_out: boxes.clone(),
            boxes,
            generation: 0,
            stale: false,
            rebuilds: 0,
            reads: 0,
        }
    }

    /// A host whose incremental layout never picks up style changes.
    pub fn stale(boxes: &[(&str, f64, f64)]) -> Self {
        Self {
            stale: true,
            ..Self::new(boxes)
        }
    }

    fn resolve(&self, element: MockElement) -> Result<usize, ProbeError> {
        if element.generation != self.generation || element.index >= self.boxes.len() {
            return Err(ProbeError::Host(format!("{element:?} is detached")));
        }
        Ok(element.index)
    }
}

impl LayoutHost for MockHost {
    type Element = MockElement;

    fn get_element_by_id(&self, id: &str) -> Option<MockElement> {
        self.boxes
            .iter()
            .position(|b| b.id == id)
            .map(|index| MockElement {
                generation: self.generation,
                index,
            })
    }

    fn element_id(&self, element: MockElement) -> Result<Option<String>, ProbeError> {
        let index = self.resolve(element)?;
        Ok(Some(self.boxes[index].id.clone()))
    }

    fn bounding_client_rect(&mut self, element: MockElement) -> Result<DomRect, ProbeError> {
        let index = self.resolve(element)?;
        self.reads += 1;
        if !self.stale {
            self.laid_out.clone_from(&self.boxes);
        }
        let y: f64 = self.laid_out[..index].iter().map(|b| b.height).sum();
        let b = &self.laid_out[index];
        Ok(DomRect::new(0.0, y, b.width, b.height))
    }

    fn set_style_property(
        &mut self,
        element: MockElement,
        name: &str,
        value: &str,
    ) -> Result<(), ProbeError> {
        let index = self.resolve(element)?;
        let px: f64 = value
            .trim_end_matches("px")
            .parse()
            .map_err(|_| ProbeError::Host(format!("bad length {value}")))?;
        match name {
            "width" => self.boxes[index].width = px,
            "height" => self.boxes[index].height = px,
            other => return Err(ProbeError::Host(format!("unsupported property {other}"))),
        }
        Ok(())
    }

    fn document_markup(&self) -> Result<String, ProbeError> {
        Ok(self
            .boxes
            .iter()
            .map(|b| format!("{} {} {}\n", b.id, b.width, b.height))
            .collect())
    }

    fn replace_document_markup(&mut self, markup: &str) -> Result<(), ProbeError> {
        let mut boxes = Vec::new();
        for line in markup.lines() {
            let parts: Vec<&str> = line.split(' ').collect();
            let [id, width, height] = parts[..] else {
                return Err(ProbeError::Host(format!("bad markup line {line:?}")));
            };
            let number = |s: &str| {
                s.parse::<f64>()
                    .map_err(|_| ProbeError::Host(format!("bad number {s}")))
            };
            boxes.push(MockBox {
                id: id.to_string(),
                width: number(width)?,
                height: number(height)?,
            });
        }
        self.laid_out.clone_from(&boxes);
        self.boxes = boxes;
        self.generation += 1;
        self.rebuilds += 1;
        Ok(())
    }
}
