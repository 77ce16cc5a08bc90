//! The bills page: filter bar, totals and the expense table(s).
//!
//! Every filter change fetches [endpoints::BILLS_CONTENT] with the whole filter
//! form. The response replaces the totals and tables, re-renders the filter
//! selects out of band and pushes the filter into the address bar, so a
//! filtered view can be reloaded or shared.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};

use crate::{
    AppState,
    alert::Alert,
    api::{ApiClient, wire::format_date},
    bills::{
        filter::{Totals, group_by_category},
        query::{BillSelection, BillsQuery, field_name},
        table::expenses_table,
    },
    endpoints,
    expense::{EXPENSES_CHANGED_EVENT, Expense},
    hierarchy::{
        BILL_FILTER, Entity, Level, Lookup, SelectField, SelectionController, fetch_candidates,
        lookup_failed_alert, prepopulate, select_field,
    },
    html::{
        BUTTON_SECONDARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        base, format_currency, link,
    },
    navigation::NavBar,
    pagination::{
        PageLinks, PaginationConfig, create_pagination_indicators, page_count, pagination_view,
    },
};

const FILTERS_SELECTOR: &str = "#bills-filters";
const CASCADE_ID: &str = "bills-cascade";
const CONTENT_ID: &str = "bills-content";
const CONTENT_SELECTOR: &str = "#bills-content";

/// The state needed for the bills page, its fragments and downloads.
#[derive(Debug, Clone)]
pub struct BillsState {
    /// The client for the expense API.
    pub api: ApiClient,
    /// The config that controls how the ungrouped table is paged.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for BillsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The option lists of the filter bar.
struct FilterOptions {
    cascade: SelectionController,
    persons: Vec<Entity>,
    lookup_failed: bool,
}

async fn load_filter_options(api: &ApiClient, selection: &BillSelection) -> FilterOptions {
    let selected = selection.cascade();
    let (cascade, (persons, persons_loaded)) = tokio::join!(
        prepopulate(BILL_FILTER, &selected, api),
        fetch_candidates(api, Lookup::AllPersons, None)
    );

    FilterOptions {
        cascade: cascade.controller,
        persons,
        lookup_failed: cascade.failed || !persons_loaded,
    }
}

async fn load_expenses(api: &ApiClient) -> Option<Vec<Expense>> {
    api.expenses()
        .await
        .inspect_err(|error| tracing::error!("Could not load expenses for the bills page: {error}"))
        .ok()
}

/// What the content area shows for one request.
struct BillsContent<'a> {
    selection: &'a BillSelection,
    /// `None` when the expenses could not be loaded.
    expenses: Option<&'a [Expense]>,
    page: u64,
    pagination_config: &'a PaginationConfig,
}

/// Display the bills page for the filters in the query string.
pub async fn get_bills_page(
    State(state): State<BillsState>,
    Query(query): Query<BillsQuery>,
) -> Response {
    let selection = query.selection();
    let (options, expenses) = tokio::join!(
        load_filter_options(&state.api, &selection),
        load_expenses(&state.api)
    );

    let content = BillsContent {
        selection: &selection,
        expenses: expenses.as_deref(),
        page: query.page.unwrap_or(state.pagination_config.default_page),
        pagination_config: &state.pagination_config,
    };

    bills_view(&options, &content).into_response()
}

/// Render the totals and tables for the submitted filters.
///
/// The filter selects are sent along out of band so their options follow the
/// new project and category selection.
pub async fn get_bills_content(
    State(state): State<BillsState>,
    Query(query): Query<BillsQuery>,
) -> Response {
    let selection = query.selection();
    let (options, expenses) = tokio::join!(
        load_filter_options(&state.api, &selection),
        load_expenses(&state.api)
    );

    let content = BillsContent {
        selection: &selection,
        expenses: expenses.as_deref(),
        page: query.page.unwrap_or(state.pagination_config.default_page),
        pagination_config: &state.pagination_config,
    };
    let page_url = selection.to_url(endpoints::BILLS_VIEW, query.page);

    (
        [("hx-push-url", page_url)],
        html! {
            (content_view(&content))
            (filter_selects(&options, &selection, true))

            @if options.lookup_failed {
                (lookup_failed_alert().into_oob_html())
            }
        },
    )
        .into_response()
}

fn filter_selects(options: &FilterOptions, selection: &BillSelection, oob: bool) -> Markup {
    let cascade = &options.cascade;
    let select = |level: Level, label: &str, selected: &[i64]| {
        select_field(
            SelectField::new(field_name(level), label, cascade.candidates(level))
                .selected(selected)
                .multiple()
                .cascade(endpoints::BILLS_CONTENT, CONTENT_SELECTOR)
                .include(FILTERS_SELECTOR)
                .disabled(!cascade.is_enabled(level)),
        )
    };

    html! {
        fieldset
            id=(CASCADE_ID)
            hx-swap-oob=[oob.then_some("true")]
            class="grid grid-cols-1 md:grid-cols-2 xl:grid-cols-4 gap-4"
        {
            (select(Level::Project, "Projects", &selection.projects))

            (select_field(
                SelectField::new("person", "Persons", &options.persons)
                    .selected(&selection.persons)
                    .multiple()
            ))

            (select(Level::Category, "Categories", &selection.categories))
            (select(Level::Subcategory, "Subcategories", &selection.subcategories))
        }
    }
}

fn date_input(name: &str, label: &str, value: Option<time::Date>) -> Markup {
    let value = value.map(format_date).unwrap_or_default();

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

fn filter_bar(options: &FilterOptions, selection: &BillSelection) -> Markup {
    html! {
        form
            id="bills-filters"
            hx-get=(endpoints::BILLS_CONTENT)
            hx-trigger="change[!target.hasAttribute('hx-get')], submit"
            hx-target=(CONTENT_SELECTOR)
            hx-swap="outerHTML"
            hx-sync="this:replace"
            hx-target-error="#alert-container"
            class={ (CARD_STYLE) " w-full mb-6 space-y-4" }
        {
            div class="flex justify-between items-center"
            {
                h3 class="text-lg font-semibold" { "Filters" }

                @if !selection.is_empty() {
                    a href=(endpoints::BILLS_VIEW) class=(LINK_STYLE) { "Reset Filters" }
                }
            }

            (filter_selects(options, selection, false))

            div class="grid grid-cols-1 md:grid-cols-3 gap-4"
            {
                div
                {
                    label for="search" class=(FORM_LABEL_STYLE) { "Search" }
                    input
                        type="search"
                        id="search"
                        name="search"
                        value=(selection.search)
                        placeholder="Vendor, description or invoice no."
                        hx-get=(endpoints::BILLS_CONTENT)
                        hx-trigger="input changed delay:300ms, search"
                        hx-include=(FILTERS_SELECTOR)
                        hx-target=(CONTENT_SELECTOR)
                        hx-swap="outerHTML"
                        hx-sync="closest form:replace"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                (date_input("from", "From", selection.from))
                (date_input("to", "To", selection.to))
            }
        }
    }
}

fn totals_view(totals: &Totals, expense_count: usize) -> Markup {
    let figures = [
        ("Amount", totals.amount),
        ("Tax", totals.tax_amount),
        ("Grand Total", totals.total_amount),
    ];

    html! {
        section id="bills-totals" class="grid grid-cols-1 md:grid-cols-4 gap-4 mb-6 w-full"
        {
            @for (label, value) in figures {
                @let value = format_currency(value);

                div class=(CARD_STYLE) aria-label=(format!("{label}: {value}"))
                {
                    p class="text-sm text-gray-500 dark:text-gray-400" { (label) }
                    p class="text-2xl font-bold" { (value) }
                }
            }

            div class=(CARD_STYLE) aria-label=(format!("Bills: {expense_count}"))
            {
                p class="text-sm text-gray-500 dark:text-gray-400" { "Bills" }
                p class="text-2xl font-bold" { (expense_count) }
            }
        }
    }
}

fn export_link(url: &str) -> Markup {
    html! {
        a href=(url) class=(BUTTON_SECONDARY_STYLE) download { "Export CSV" }
    }
}

fn grouped_tables(selection: &BillSelection, expenses: &[Expense]) -> Markup {
    html! {
        @for group in group_by_category(expenses) {
            @let totals = group.totals();

            section class="w-full mb-8" data-category=(group.name)
            {
                div class="flex justify-between items-center mb-2"
                {
                    h3 class="text-xl font-semibold"
                    {
                        (group.name) " (" (group.expenses.len()) ")"
                    }

                    (export_link(&selection.export_url(Some(&group.name))))
                }

                (expenses_table(&group.expenses, 1))

                p class="mt-2 text-sm text-right"
                {
                    "Subtotal: " (format_currency(totals.total_amount))
                }
            }
        }
    }
}

fn paged_table(content: &BillsContent<'_>, expenses: &[Expense]) -> Markup {
    let config = content.pagination_config;
    let page_size = config.default_page_size.max(1);
    let page_count = page_count(expenses.len(), page_size);
    let page = content.page.clamp(1, page_count);

    let offset = ((page - 1) * page_size) as usize;
    let rows = expenses
        .iter()
        .skip(offset)
        .take(page_size as usize)
        .cloned()
        .collect::<Vec<_>>();

    let indicators = create_pagination_indicators(page, page_count, config.max_pages);
    let links = PageLinks {
        href: |page: u64| content.selection.to_url(endpoints::BILLS_VIEW, Some(page)),
        hx_get: |page: u64| content.selection.to_url(endpoints::BILLS_CONTENT, Some(page)),
        target: CONTENT_SELECTOR,
    };

    html! {
        div class="flex justify-end w-full mb-2"
        {
            (export_link(&content.selection.export_url(None)))
        }

        (expenses_table(&rows, offset + 1))

        @if page_count > 1 {
            (pagination_view(&indicators, &links))
        }
    }
}

fn content_view(content: &BillsContent<'_>) -> Markup {
    let refresh_url = content
        .selection
        .to_url(endpoints::BILLS_CONTENT, Some(content.page));
    let refresh_trigger = format!("{EXPENSES_CHANGED_EVENT} from:body");

    html! {
        div
            id=(CONTENT_ID)
            class="w-full"
            hx-get=(refresh_url)
            hx-trigger=(refresh_trigger)
            hx-swap="outerHTML"
        {
            @match content.expenses {
                None => {
                    (Alert::Error {
                        message: "Could not load the bills".to_owned(),
                        details: "The expense service did not respond. Try again in a few minutes."
                            .to_owned(),
                    }
                    .into_html())
                }
                Some([]) => {
                    div class="flex flex-col items-center py-8"
                    {
                        h2 class="text-xl font-bold" { "No bills yet" }
                        p
                        {
                            "Bills will show up here once you "
                            (link(endpoints::NEW_EXPENSE_VIEW, "add an expense"))
                            "."
                        }
                    }
                }
                Some(expenses) => {
                    @let filtered = content.selection.filter().apply(expenses);

                    (totals_view(&filtered.totals, filtered.visible.len()))

                    @if filtered.visible.is_empty() {
                        p class="py-8 text-center"
                        {
                            "No expenses match these filters. "
                            (link(endpoints::BILLS_VIEW, "Reset the filters"))
                            " to see every bill."
                        }
                    } @else if content.selection.is_grouped() {
                        (grouped_tables(content.selection, &filtered.visible))
                    } @else {
                        (paged_table(content, &filtered.visible))
                    }
                }
            }
        }
    }
}

fn bills_view(options: &FilterOptions, content: &BillsContent<'_>) -> Markup {
    let nav_bar = NavBar::new(endpoints::BILLS_VIEW).into_html();

    let body = html!(
        (nav_bar)

        div
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            div class="flex justify-between items-center w-full mb-4"
            {
                h1 class="text-2xl font-bold" { "Bills" }

                a href=(endpoints::NEW_EXPENSE_VIEW) class=(BUTTON_SECONDARY_STYLE)
                {
                    "Add Expense"
                }
            }

            @if options.lookup_failed {
                div class="w-full mb-4" { (lookup_failed_alert().into_html()) }
            }

            (filter_bar(options, content.selection))
            (content_view(content))
        }
    );

    base("Bills", &[], &body)
}
