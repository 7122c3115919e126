//! Bounding-box helpers over groups of elements.

use crate::elements::Element;
use kurbo::{Point, Rect};

/// Axis-aligned bounds of a single element, rotation ignored.
pub fn bounds(element: &Element) -> Rect {
    element.bounds()
}

/// Union of the bounds of all given elements, or `None` when empty.
pub fn union_bounds<'a>(elements: impl IntoIterator<Item = &'a Element>) -> Option<Rect> {
    let mut result: Option<Rect> = None;
    for element in elements {
        let b = element.bounds();
        result = Some(match result {
            Some(r) => r.union(b),
            None => b,
        });
    }
    result
}

/// Center of an element's bounds.
pub fn center(element: &Element) -> Point {
    element.bounds().center()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Circle, Line, Rectangle};

    #[test]
    fn test_union_bounds() {
        let a = Element::Rectangle(Rectangle::new(Point::new(0.0, 0.0), 10.0, 10.0));
        let b = Element::Circle(Circle::new(Point::new(100.0, 100.0), 20.0));
        let u = union_bounds([&a, &b]).unwrap();
        assert_eq!(u, Rect::new(0.0, 0.0, 120.0, 120.0));
    }

    #[test]
    fn test_union_of_nothing() {
        assert!(union_bounds(std::iter::empty::<&Element>()).is_none());
    }

    #[test]
    fn test_line_center() {
        let line = Element::Line(Line::new(Point::new(0.0, 0.0), Point::new(40.0, 20.0)));
        assert_eq!(center(&line), Point::new(20.0, 10.0));
    }
}
