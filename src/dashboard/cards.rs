//! Summary cards shown above the dashboard charts.

use maud::{Markup, html};

use crate::{dashboard::DashboardSummary, html::format_currency};

const SUMMARY_CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md flex flex-col justify-between";

/// A headline figure with a label.
struct SummaryCard {
    label: &'static str,
    value: String,
    caption: &'static str,
}

fn summary_card(card: &SummaryCard) -> Markup {
    html! {
        div
            class=(SUMMARY_CARD_STYLE)
            aria-label=(format!("{}: {}", card.label, card.value))
        {
            h4 class="text-sm font-medium text-gray-600 dark:text-gray-400 mb-2" { (card.label) }
            div class="text-3xl font-bold mb-1" { (card.value) }
            div class="text-sm text-gray-600 dark:text-gray-400" { (card.caption) }
        }
    }
}

/// Renders the total expense, total GST, person and project cards.
///
/// `project_count` is the length of the project list, which the summary
/// endpoint does not report.
pub(super) fn summary_cards_view(summary: &DashboardSummary, project_count: usize) -> Markup {
    let cards = [
        SummaryCard {
            label: "Total Expense",
            value: format_currency(summary.total_expense),
            caption: "Across the selected filters",
        },
        SummaryCard {
            label: "Total GST",
            value: format_currency(summary.total_gst),
            caption: "Tax paid on bills",
        },
        SummaryCard {
            label: "Persons",
            value: summary.person_count().to_string(),
            caption: "With recorded spend",
        },
        SummaryCard {
            label: "Projects",
            value: project_count.to_string(),
            caption: "Being tracked",
        },
    ];

    html! {
        section id="summary-cards" class="w-full mx-auto mb-8"
        {
            div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4"
            {
                @for card in &cards {
                    (summary_card(card))
                }
            }
        }
    }
}
