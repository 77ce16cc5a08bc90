//! Chart generation and rendering for the dashboard.
//!
//! This module creates interactive ECharts visualizations from the summary:
//! - **Expense by Person**: bar chart of spend per person
//! - **Expense by Subcategory**: doughnut chart of spend per subcategory
//! - **Monthly Trend**: line chart of spend per month
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Orient, Tooltip, Trigger,
    },
    series::{Bar, Line, Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::dashboard::{DashboardSummary, summary::format_month_label};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Creates the dashboard charts from the summary.
pub(super) fn build_dashboard_charts(summary: &DashboardSummary) -> [DashboardChart; 3] {
    [
        DashboardChart {
            id: "person-chart",
            options: person_chart(&summary.expense_by_person).to_string(),
        },
        DashboardChart {
            id: "subcategory-chart",
            options: subcategory_chart(&summary.expense_by_subcategory).to_string(),
        },
        DashboardChart {
            id: "monthly-chart",
            options: monthly_chart(&summary.monthly_expense).to_string(),
        },
    ]
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates the script that initializes the ECharts instances.
///
/// The script is rendered inline after the chart containers, so it runs both on
/// a full page load and when htmx swaps in a new summary.
pub(super) fn charts_script(charts: &[DashboardChart]) -> Markup {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    if (!chartDom || typeof echarts === 'undefined') {{
                        return;
                    }}
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    html! {
        script { (PreEscaped(script_content)) }
    }
}

fn person_chart(expense_by_person: &[(String, f64)]) -> Chart {
    let (labels, values): (Vec<String>, Vec<f64>) = expense_by_person.iter().cloned().unzip();

    Chart::new()
        .title(Title::new().text("Expense by Person"))
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name("Expense").data(values))
}

fn subcategory_chart(expense_by_subcategory: &[(String, f64)]) -> Chart {
    let data = expense_by_subcategory
        .iter()
        .map(|(label, amount)| (*amount, label.as_str()))
        .collect::<Vec<_>>();

    Chart::new()
        .title(Title::new().text("Expense by Subcategory"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().orient(Orient::Vertical).left("left").top(40))
        .series(
            Pie::new()
                .name("Expense")
                .radius(vec!["40%", "70%"])
                .center(vec!["60%", "55%"])
                .data(data),
        )
}

fn monthly_chart(monthly_expense: &[(String, f64)]) -> Chart {
    let labels = monthly_expense
        .iter()
        .map(|(month, _)| format_month_label(month))
        .collect::<Vec<_>>();
    let values = monthly_expense
        .iter()
        .map(|(_, amount)| *amount)
        .collect::<Vec<_>>();

    Chart::new()
        .title(Title::new().text("Monthly Expense Trend"))
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Line::new().name("Expense").data(values))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-IN', {
              style: 'currency',
              currency: 'INR'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
