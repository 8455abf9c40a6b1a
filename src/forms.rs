//! Typed form configuration rendered by `templates/partials/form.html`.
//!
//! Pages describe their forms as data — a list of headings and fields with
//! an enumerated field kind — and bind values from the loaded record before
//! rendering. Validation of submitted values stays in the handlers.

#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone)]
pub enum FieldKind {
    Text { max_length: Option<u32> },
    Number { decimal_places: u8 },
    Select { options: Vec<SelectOption> },
    Hidden,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub label: String,
    pub description: String,
    pub value: String,
    pub required: bool,
    pub readonly: bool,
    pub kind: FieldKind,
}

impl Field {
    fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Field {
            name: name.to_string(),
            label: label.to_string(),
            description: String::new(),
            value: String::new(),
            required: false,
            readonly: false,
            kind,
        }
    }

    pub fn text(name: &str, label: &str) -> Self {
        Field::new(name, label, FieldKind::Text { max_length: None })
    }

    pub fn number(name: &str, label: &str, decimal_places: u8) -> Self {
        Field::new(name, label, FieldKind::Number { decimal_places })
    }

    pub fn select(name: &str, label: &str, options: &[(&str, &str)]) -> Self {
        let options = options
            .iter()
            .map(|(value, label)| SelectOption {
                value: value.to_string(),
                label: label.to_string(),
            })
            .collect();
        Field::new(name, label, FieldKind::Select { options })
    }

    pub fn max_length(mut self, limit: u32) -> Self {
        if let FieldKind::Text { max_length } = &mut self.kind {
            *max_length = Some(limit);
        }
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.description = text.to_string();
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    // Accessors used by the form partial, which renders on kind checks
    // rather than matching the enum in template syntax.

    pub fn is_hidden(&self) -> bool {
        matches!(self.kind, FieldKind::Hidden)
    }

    pub fn is_select(&self) -> bool {
        matches!(self.kind, FieldKind::Select { .. })
    }

    pub fn input_type(&self) -> &'static str {
        match self.kind {
            FieldKind::Text { .. } => "text",
            FieldKind::Number { .. } => "number",
            FieldKind::Select { .. } => "text",
            FieldKind::Hidden => "hidden",
        }
    }

    pub fn options(&self) -> &[SelectOption] {
        match &self.kind {
            FieldKind::Select { options } => options,
            _ => &[],
        }
    }

    pub fn max_length_attr(&self) -> Option<u32> {
        match self.kind {
            FieldKind::Text { max_length } => max_length,
            _ => None,
        }
    }

    /// Step attribute for number inputs, derived from the decimal places.
    pub fn step_attr(&self) -> Option<String> {
        match self.kind {
            FieldKind::Number { decimal_places: 0 } => Some("1".to_string()),
            FieldKind::Number { decimal_places } => {
                Some(format!("0.{}1", "0".repeat(decimal_places as usize - 1)))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum FormItem {
    Heading(String),
    Field(Field),
}

impl FormItem {
    pub fn heading_text(&self) -> Option<&str> {
        match self {
            FormItem::Heading(title) => Some(title),
            FormItem::Field(_) => None,
        }
    }

    pub fn field(&self) -> Option<&Field> {
        match self {
            FormItem::Field(field) => Some(field),
            FormItem::Heading(_) => None,
        }
    }
}

/// A declarative page form: action target, ordered items, submit label.
/// CSRF is injected at render time from the page context.
#[derive(Debug, Clone)]
pub struct Form {
    pub id: String,
    pub action: String,
    pub submit_label: String,
    pub items: Vec<FormItem>,
}

impl Form {
    pub fn new(id: &str, action: impl Into<String>) -> Self {
        Form {
            id: id.to_string(),
            action: action.into(),
            submit_label: "Submit".to_string(),
            items: Vec::new(),
        }
    }

    pub fn heading(mut self, title: &str) -> Self {
        self.items.push(FormItem::Heading(title.to_string()));
        self
    }

    pub fn field(mut self, field: Field) -> Self {
        self.items.push(FormItem::Field(field));
        self
    }

    pub fn hidden(mut self, name: &str, value: impl Into<String>) -> Self {
        self.items
            .push(FormItem::Field(Field::new(name, "", FieldKind::Hidden).value(value)));
        self
    }

    pub fn submit(mut self, label: &str) -> Self {
        self.submit_label = label.to_string();
        self
    }

    /// Names of required fields, for handler-side validation messages.
    pub fn required_fields(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter_map(|item| match item {
                FormItem::Field(f) if f.required => Some(f.name.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> Form {
        Form::new("templatesManage", "/reports/templates/edit")
            .hidden("template_id", "7")
            .heading("Basic Information")
            .field(
                Field::text("name", "Name")
                    .max_length(90)
                    .required()
                    .description("Must be unique")
                    .value("End of Term"),
            )
            .field(Field::text("context", "Context").readonly().value("Term Reports"))
            .field(
                Field::select(
                    "orientation",
                    "Orientation",
                    &[("portrait", "Portrait"), ("landscape", "Landscape")],
                )
                .required()
                .value("portrait"),
            )
            .field(Field::number("margin_x", "Margin X", 2).required().value("15"))
    }

    #[test]
    fn items_keep_declaration_order() {
        let form = sample_form();
        assert_eq!(form.items.len(), 6);
        assert!(matches!(&form.items[1], FormItem::Heading(h) if h == "Basic Information"));
        match &form.items[0] {
            FormItem::Field(f) => {
                assert!(matches!(f.kind, FieldKind::Hidden));
                assert_eq!(f.value, "7");
            }
            _ => panic!("expected hidden field first"),
        }
    }

    #[test]
    fn required_fields_lists_only_required() {
        let form = sample_form();
        assert_eq!(form.required_fields(), vec!["name", "orientation", "margin_x"]);
    }

    #[test]
    fn text_field_carries_constraints() {
        let form = sample_form();
        let FormItem::Field(name) = &form.items[2] else {
            panic!("expected field");
        };
        assert!(name.required);
        assert!(!name.readonly);
        assert_eq!(name.description, "Must be unique");
        assert!(matches!(name.kind, FieldKind::Text { max_length: Some(90) }));
    }

    #[test]
    fn select_field_keeps_option_order() {
        let form = sample_form();
        let FormItem::Field(select) = &form.items[4] else {
            panic!("expected field");
        };
        let FieldKind::Select { options } = &select.kind else {
            panic!("expected select");
        };
        assert_eq!(options[0].value, "portrait");
        assert_eq!(options[1].label, "Landscape");
    }
}
