//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - Route handlers for the dashboard page and its htmx fragments
//! - HTML view functions for rendering the dashboard UI
//! - The state used by the handlers

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState,
    alert::Alert,
    api::{ApiClient, wire::format_date},
    dashboard::{
        DashboardSummary,
        cards::summary_cards_view,
        charts::{build_dashboard_charts, charts_script, charts_view},
        summary::{DashboardQuery, SummaryFilter},
    },
    endpoints,
    hierarchy::{
        DASHBOARD_FILTER, Level, Lookup, SelectField, SelectionController, fetch_candidates,
        lookup_failed_alert, rebuild, select_field,
    },
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement,
        base, link, loading_spinner,
    },
    navigation::NavBar,
};

const CASCADE_ID: &str = "dashboard-cascade";
const CASCADE_SELECTOR: &str = "#dashboard-cascade";
const SUMMARY_ID: &str = "dashboard-summary";
const SUMMARY_SELECTOR: &str = "#dashboard-summary";

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The client for the expense API.
    pub api: ApiClient,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
        }
    }
}

/// The summary as far as it could be loaded.
enum SummaryOutcome {
    Loaded {
        summary: DashboardSummary,
        project_count: usize,
    },
    Unavailable,
}

async fn load_summary(api: &ApiClient, filter: &SummaryFilter) -> SummaryOutcome {
    let ((projects, _), summary) = tokio::join!(
        fetch_candidates(api, Lookup::AllProjects, None),
        api.dashboard_summary(filter)
    );

    match summary {
        Ok(summary) => SummaryOutcome::Loaded {
            summary,
            project_count: projects.len(),
        },
        Err(error) => {
            tracing::error!("Could not load the dashboard summary for {filter:?}: {error}");
            SummaryOutcome::Unavailable
        }
    }
}

/// Display the dashboard with the filter bar, summary cards and charts.
///
/// Filters given in the query string are applied, so a filtered dashboard can
/// be bookmarked.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let filter = query.filter();
    let submitted = query.submitted();
    let (cascade, summary) = tokio::join!(
        rebuild(DASHBOARD_FILTER, &submitted, None, &state.api),
        state.api.dashboard_summary(&filter)
    );

    let outcome = match summary {
        Ok(summary) => SummaryOutcome::Loaded {
            summary,
            project_count: cascade.controller.candidates(Level::Project).len(),
        },
        Err(error) => {
            tracing::error!("Could not load the dashboard summary for {filter:?}: {error}");
            SummaryOutcome::Unavailable
        }
    };

    dashboard_view(&cascade.controller, cascade.failed, &query, &outcome).into_response()
}

/// Render the summary cards and charts for the submitted filters.
pub async fn get_dashboard_summary(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let filter = query.filter();
    let outcome = load_summary(&state.api, &filter).await;

    (
        [("hx-push-url", dashboard_url(&filter))],
        summary_content(&outcome),
    )
        .into_response()
}

/// The dashboard page URL with `filter` applied, for bookmarking.
fn dashboard_url(filter: &SummaryFilter) -> String {
    match serde_urlencoded::to_string(filter.query_pairs()) {
        Ok(query) if !query.is_empty() => format!("{}?{query}", endpoints::DASHBOARD_VIEW),
        Ok(_) => endpoints::DASHBOARD_VIEW.to_owned(),
        Err(error) => {
            tracing::warn!("Could not encode dashboard filters {filter:?}: {error}");
            endpoints::DASHBOARD_VIEW.to_owned()
        }
    }
}

/// Re-render the project, group and category selects after one of them changed.
pub async fn get_dashboard_filters(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let cascade = rebuild(
        DASHBOARD_FILTER,
        &query.submitted(),
        query.changed_level(),
        &state.api,
    )
    .await;

    html! {
        (cascade_fieldset(&cascade.controller))

        @if cascade.failed {
            (lookup_failed_alert().into_oob_html())
        }
    }
    .into_response()
}

fn cascade_fieldset(cascade: &SelectionController) -> Markup {
    html! {
        fieldset id=(CASCADE_ID) class="grid grid-cols-1 md:grid-cols-3 gap-4"
        {
            @for level in DASHBOARD_FILTER.levels() {
                @let label = level.to_string();
                @let placeholder = format!("All {}s", label.to_lowercase());
                @let selected = cascade.selected(level);

                (select_field(
                    SelectField::new(level.field_name(), &label, cascade.candidates(level))
                        .selected(selected.as_slice())
                        .placeholder(&placeholder)
                        .cascade(endpoints::DASHBOARD_FILTERS, CASCADE_SELECTOR)
                        .disabled(!cascade.is_enabled(level))
                ))
            }
        }
    }
}

fn date_input(name: &str, label: &str, value: &str) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }
            input
                type="date"
                id=(name)
                name=(name)
                value=(value)
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

fn filter_bar(cascade: &SelectionController, query: &DashboardQuery) -> Markup {
    let filter = query.filter();
    let start = filter.start.map(format_date).unwrap_or_default();
    let end = filter.end.map(format_date).unwrap_or_default();
    let spinner = loading_spinner();

    html! {
        form
            id="dashboard-filters"
            hx-get=(endpoints::DASHBOARD_SUMMARY)
            hx-target=(SUMMARY_SELECTOR)
            hx-swap="innerHTML"
            hx-target-error="#alert-container"
            class={ (CARD_STYLE) " w-full mb-8 space-y-4" }
        {
            h3 class="text-lg font-semibold" { "Filters" }

            (cascade_fieldset(cascade))

            div class="grid grid-cols-1 md:grid-cols-3 gap-4 items-end"
            {
                (date_input("start", "Start Date", &start))
                (date_input("end", "End Date", &end))

                button type="submit" class=(BUTTON_PRIMARY_STYLE)
                {
                    span class="inline htmx-indicator" { (spinner) }
                    " Apply"
                }
            }
        }
    }
}

fn summary_unavailable_view() -> Markup {
    Alert::Error {
        message: "Could not load the dashboard summary".to_owned(),
        details: "The expense service did not respond. Try again in a few minutes.".to_owned(),
    }
    .into_html()
}

/// The cards and charts, or a notice when there is nothing to show.
fn summary_content(outcome: &SummaryOutcome) -> Markup {
    let (summary, project_count) = match outcome {
        SummaryOutcome::Loaded {
            summary,
            project_count,
        } => (summary, *project_count),
        SummaryOutcome::Unavailable => return summary_unavailable_view(),
    };

    if summary.is_empty() {
        let new_expense_link = link(endpoints::NEW_EXPENSE_VIEW, "add an expense");

        return html! {
            (summary_cards_view(summary, project_count))

            div class="flex flex-col items-center py-8"
            {
                h2 class="text-xl font-bold" { "Nothing here yet..." }

                p
                {
                    "Charts will show up here once expenses match these filters. \
                    You can " (new_expense_link) " or change the filters."
                }
            }
        };
    }

    let charts = build_dashboard_charts(summary);

    html! {
        (summary_cards_view(summary, project_count))
        (charts_view(&charts))
        (charts_script(&charts))
    }
}

fn dashboard_view(
    cascade: &SelectionController,
    lookup_failed: bool,
    query: &DashboardQuery,
    outcome: &SummaryOutcome,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            @if lookup_failed {
                div class="w-full mb-4" { (lookup_failed_alert().into_html()) }
            }

            (filter_bar(cascade, query))

            div id=(SUMMARY_ID) class="w-full"
            {
                (summary_content(outcome))
            }
        }
    );

    let scripts = [HeadElement::ScriptLink(
        "/static/echarts.6.0.0.min.js".to_owned(),
    )];

    base("Dashboard", &scripts, &content)
}
