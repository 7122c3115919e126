//! Starter designs that replace the canvas contents.

use crate::elements::{
    Circle, Element, ElementStyle, Fill, Rectangle, SerializableColor, Text, TextAlign,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A named design of fixed size. Element ids in template files are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub category: String,
    pub width: f64,
    pub height: f64,
    pub elements: Vec<Element>,
}

impl Template {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse a list of templates.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Copies of the elements with fresh ids, ready to become the scene.
    pub fn instantiate(&self) -> Vec<Element> {
        self.elements
            .iter()
            .cloned()
            .map(|mut e| {
                e.regenerate_id();
                e
            })
            .collect()
    }

    /// Templates offered out of the box.
    pub fn builtin() -> Vec<Template> {
        vec![business_card(), social_media_post(), presentation_slide()]
    }
}

fn color(hex: &str) -> SerializableColor {
    SerializableColor::from_css(hex).unwrap_or_else(SerializableColor::black)
}

fn panel(x: f64, y: f64, width: f64, height: f64, fill: &str) -> Element {
    let mut rect = Rectangle::new(Point::new(x, y), width, height);
    rect.style = ElementStyle {
        fill: Some(Fill::Solid(color(fill))),
        ..ElementStyle::default()
    };
    Element::Rectangle(rect)
}

struct TextSpec<'a> {
    at: (f64, f64),
    content: &'a str,
    font_size: f64,
    width: f64,
    fill: &'a str,
    bold: bool,
    align: TextAlign,
}

fn label(spec: TextSpec<'_>) -> Element {
    let mut text = Text::new(Point::new(spec.at.0, spec.at.1), spec.content.to_string());
    text.font_size = spec.font_size;
    text.width = spec.width;
    text.bold = spec.bold;
    text.align = spec.align;
    text.style.fill = Some(Fill::Solid(color(spec.fill)));
    Element::Text(text)
}

fn plain(at: (f64, f64), content: &str, font_size: f64, width: f64, fill: &str) -> Element {
    label(TextSpec {
        at,
        content,
        font_size,
        width,
        fill,
        bold: false,
        align: TextAlign::Left,
    })
}

fn business_card() -> Template {
    Template {
        id: "business-card".to_string(),
        name: "Business Card".to_string(),
        category: "Business".to_string(),
        width: 350.0,
        height: 200.0,
        elements: vec![
            panel(0.0, 0.0, 350.0, 200.0, "#1a1a1a"),
            label(TextSpec {
                at: (30.0, 30.0),
                content: "John Doe",
                font_size: 24.0,
                width: 200.0,
                fill: "#ffffff",
                bold: true,
                align: TextAlign::Left,
            }),
            plain((30.0, 60.0), "Creative Director", 14.0, 200.0, "#cccccc"),
            panel(30.0, 90.0, 60.0, 2.0, "#3b82f6"),
            plain((30.0, 110.0), "john.doe@company.com", 12.0, 200.0, "#ffffff"),
            plain((30.0, 130.0), "+1 (555) 123-4567", 12.0, 200.0, "#ffffff"),
        ],
    }
}

fn social_media_post() -> Template {
    let mut accent = Circle::new(Point::new(250.0, 150.0), 80.0);
    accent.style = ElementStyle {
        fill: Some(Fill::Solid(color("#3b82f6"))),
        opacity: 0.2,
        ..ElementStyle::default()
    };

    Template {
        id: "social-media-post".to_string(),
        name: "Social Media Post".to_string(),
        category: "Social".to_string(),
        width: 500.0,
        height: 500.0,
        elements: vec![
            panel(0.0, 0.0, 500.0, 500.0, "#f3f4f6"),
            Element::Circle(accent),
            label(TextSpec {
                at: (50.0, 250.0),
                content: "Amazing Design",
                font_size: 48.0,
                width: 400.0,
                fill: "#1a1a1a",
                bold: true,
                align: TextAlign::Center,
            }),
            label(TextSpec {
                at: (50.0, 320.0),
                content: "Create stunning visuals in minutes",
                font_size: 18.0,
                width: 400.0,
                fill: "#666666",
                bold: false,
                align: TextAlign::Center,
            }),
        ],
    }
}

fn presentation_slide() -> Template {
    Template {
        id: "presentation-slide".to_string(),
        name: "Presentation Slide".to_string(),
        category: "Presentation".to_string(),
        width: 800.0,
        height: 600.0,
        elements: vec![
            panel(0.0, 0.0, 800.0, 600.0, "#ffffff"),
            panel(0.0, 0.0, 800.0, 100.0, "#3b82f6"),
            label(TextSpec {
                at: (50.0, 30.0),
                content: "Slide Title Here",
                font_size: 36.0,
                width: 700.0,
                fill: "#ffffff",
                bold: true,
                align: TextAlign::Left,
            }),
            plain((50.0, 150.0), "• First bullet point", 24.0, 700.0, "#333333"),
            plain((50.0, 200.0), "• Second bullet point", 24.0, 700.0, "#333333"),
            plain((50.0, 250.0), "• Third bullet point", 24.0, 700.0, "#333333"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_instantiate_regenerates_ids() {
        let template = business_card();
        let first = template.instantiate();
        let second = template.instantiate();
        assert_eq!(first.len(), template.elements.len());

        let originals: HashSet<_> = template.elements.iter().map(|e| e.id()).collect();
        for (a, b) in first.iter().zip(&second) {
            assert!(!originals.contains(&a.id()));
            assert_ne!(a.id(), b.id());
        }
    }

    #[test]
    fn test_builtin_templates() {
        let templates = Template::builtin();
        let ids: Vec<_> = templates.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["business-card", "social-media-post", "presentation-slide"]);

        let slide = &templates[2];
        let Element::Text(title) = &slide.elements[2] else {
            panic!("expected title text");
        };
        assert!(title.bold);
        assert!((title.font_size - 36.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_list_from_json() {
        let json = serde_json::to_string(&Template::builtin()).unwrap();
        let templates = Template::list_from_json(&json).unwrap();
        assert_eq!(templates.len(), 3);
        assert_eq!(templates[1].name, Template::builtin()[1].name);
        assert!(Template::list_from_json("{}").is_err());
    }

    #[test]
    fn test_from_json_without_ids() {
        let json = r#"{
            "id": "blank",
            "name": "Blank",
            "category": "Basic",
            "width": 100.0,
            "height": 100.0,
            "elements": [{
                "type": "rectangle",
                "position": {"x": 0.0, "y": 0.0},
                "width": 100.0,
                "height": 100.0,
                "style": {"fill": null, "stroke_color": null, "stroke_width": 0.0}
            }]
        }"#;
        let template = Template::from_json(json).unwrap();
        assert_eq!(template.elements.len(), 1);
        assert!(!template.elements[0].id().is_nil());
    }
}
