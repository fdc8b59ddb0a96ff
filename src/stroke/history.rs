use crate::stroke::model::Stroke;

/// Committed strokes of a drawing session with undo/redo.
#[derive(Clone, Debug, Default)]
pub struct StrokeHistory {
    strokes: Vec<Stroke>,
    redo: Vec<Stroke>,
}

impl StrokeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finished stroke. Strokes that fail [`Stroke::is_committable`] are dropped.
    pub fn commit(&mut self, stroke: Stroke) -> bool {
        if !stroke.is_committable() {
            tracing::debug!(tool = %stroke.tool, points = stroke.points.len(), "discarding stroke");
            return false;
        }
        self.strokes.push(stroke);
        self.redo.clear();
        true
    }

    pub fn undo(&mut self) -> bool {
        match self.strokes.pop() {
            Some(s) => {
                self.redo.push(s);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.redo.pop() {
            Some(s) => {
                self.strokes.push(s);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.strokes.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.redo.clear();
    }

    /// Replace the whole list, e.g. on session load.
    pub fn replace(&mut self, strokes: Vec<Stroke>) {
        self.strokes = strokes;
        self.redo.clear();
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Rescale captured times of every stroke, including those on the redo stack.
    pub fn rescale_time(&mut self, ratio: f64, duration: f64) {
        for s in self.strokes.iter_mut().chain(self.redo.iter_mut()) {
            s.rescale_time(ratio, duration);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stroke/history.rs"]
mod tests;
