use maud::{Markup, html};

use crate::{
    hierarchy::{Entity, EntityId},
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

/// How a select reloads its cascade when it changes.
#[derive(Debug, Clone, Copy)]
pub struct CascadeTrigger<'a> {
    /// The endpoint that re-renders the cascade.
    pub endpoint: &'a str,
    /// The CSS selector of the element that is replaced by the response.
    pub target: &'a str,
    /// The CSS selector of the element whose inputs are sent with the request.
    pub include: &'a str,
}

/// A labelled `<select>` of lookup entities.
#[derive(Debug, Clone, Copy)]
pub struct SelectField<'a> {
    pub name: &'a str,
    pub label: &'a str,
    pub options: &'a [Entity],
    pub selected: &'a [EntityId],
    /// Text of the empty option. Multi-selects do not get one.
    pub placeholder: &'a str,
    pub multiple: bool,
    pub required: bool,
    pub disabled: bool,
    pub cascade: Option<CascadeTrigger<'a>>,
}

impl<'a> SelectField<'a> {
    pub fn new(name: &'a str, label: &'a str, options: &'a [Entity]) -> Self {
        Self {
            name,
            label,
            options,
            selected: &[],
            placeholder: "Select…",
            multiple: false,
            required: false,
            disabled: false,
            cascade: None,
        }
    }

    pub fn selected(mut self, selected: &'a [EntityId]) -> Self {
        self.selected = selected;
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn cascade(mut self, endpoint: &'a str, target: &'a str) -> Self {
        self.cascade = Some(CascadeTrigger {
            endpoint,
            target,
            include: target,
        });
        self
    }

    /// Send the inputs of `include` instead of the target's with the cascade request.
    pub fn include(mut self, include: &'a str) -> Self {
        if let Some(trigger) = self.cascade.as_mut() {
            trigger.include = include;
        }
        self
    }
}

pub fn select_field(field: SelectField<'_>) -> Markup {
    let changed = format!(r#"{{"changed": "{}"}}"#, field.name);

    html! {
        div
        {
            label for=(field.name) class=(FORM_LABEL_STYLE) { (field.label) }

            @match field.cascade {
                Some(trigger) => {
                    select
                        id=(field.name)
                        name=(field.name)
                        class=(FORM_TEXT_INPUT_STYLE)
                        multiple[field.multiple]
                        required[field.required]
                        disabled[field.disabled]
                        hx-get=(trigger.endpoint)
                        hx-trigger="change"
                        hx-include=(trigger.include)
                        hx-target=(trigger.target)
                        hx-swap="outerHTML"
                        hx-vals=(changed)
                        hx-sync="closest form:replace"
                    {
                        (options(&field))
                    }
                }
                None => {
                    select
                        id=(field.name)
                        name=(field.name)
                        class=(FORM_TEXT_INPUT_STYLE)
                        multiple[field.multiple]
                        required[field.required]
                        disabled[field.disabled]
                    {
                        (options(&field))
                    }
                }
            }
        }
    }
}

fn options(field: &SelectField<'_>) -> Markup {
    html! {
        @if !field.multiple {
            option value="" selected[field.selected.is_empty()] { (field.placeholder) }
        }

        @for entity in field.options {
            option
                value=(entity.id)
                selected[field.selected.contains(&entity.id)]
            {
                (entity.name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::hierarchy::{Entity, SelectField, select_field};

    fn render(field: SelectField<'_>) -> Html {
        Html::parse_fragment(&select_field(field).into_string())
    }

    #[test]
    fn marks_selected_option() {
        let options = [Entity::new(1, "Tower A"), Entity::new(2, "Tower B")];
        let html = render(SelectField::new("projectId", "Project", &options).selected(&[2]));

        let selected = html
            .select(&Selector::parse("option[selected]").unwrap())
            .map(|option| option.value().attr("value").unwrap_or_default().to_owned())
            .collect::<Vec<_>>();

        assert_eq!(selected, ["2"]);
    }

    #[test]
    fn empty_selection_selects_placeholder() {
        let options = [Entity::new(1, "Tower A")];
        let html = render(
            SelectField::new("projectId", "Project", &options).placeholder("Select a project"),
        );

        let selected = html
            .select(&Selector::parse("option[selected]").unwrap())
            .next()
            .expect("no selected option");

        assert_eq!(selected.value().attr("value"), Some(""));
        assert_eq!(selected.text().collect::<String>(), "Select a project");
    }

    #[test]
    fn multi_select_has_no_placeholder() {
        let options = [Entity::new(1, "Tower A")];
        let html = render(SelectField::new("project", "Projects", &options).multiple());

        let option_count = html.select(&Selector::parse("option").unwrap()).count();
        let select = html
            .select(&Selector::parse("select").unwrap())
            .next()
            .unwrap();

        assert_eq!(option_count, 1);
        assert!(select.value().attr("multiple").is_some());
    }

    #[test]
    fn cascading_select_reloads_its_container() {
        let html = render(
            SelectField::new("groupId", "Group", &[])
                .cascade("/expenses/hierarchy", "#expense-hierarchy")
                .disabled(true),
        );

        let select = html
            .select(&Selector::parse("select").unwrap())
            .next()
            .unwrap();

        assert_eq!(select.value().attr("hx-get"), Some("/expenses/hierarchy"));
        assert_eq!(select.value().attr("hx-target"), Some("#expense-hierarchy"));
        assert_eq!(select.value().attr("hx-vals"), Some(r#"{"changed": "groupId"}"#));
        assert!(select.value().attr("disabled").is_some());
    }

    #[test]
    fn cascade_can_include_a_wider_form() {
        let html = render(
            SelectField::new("project", "Projects", &[])
                .multiple()
                .cascade("/bills/content", "#bills-content")
                .include("#bills-filters"),
        );

        let select = html
            .select(&Selector::parse("select").unwrap())
            .next()
            .unwrap();

        assert_eq!(select.value().attr("hx-target"), Some("#bills-content"));
        assert_eq!(select.value().attr("hx-include"), Some("#bills-filters"));
    }
}
