//! Report command implementations (summary, gamify)

use anyhow::Result;
use pitstop_core::gamification;
use pitstop_core::summary::{
    category_usage, month_totals, monthly_series, top_spending_category, CategoryUsage, MonthPoint,
    PeriodTotals,
};
use serde::Serialize;

use super::{money, render_json, truncate, Session};

const SERIES_MONTHS: u32 = 6;

#[derive(Serialize)]
struct BudgetSummary {
    month: PeriodTotals,
    monthly_budget: f64,
    categories: Vec<CategoryUsage>,
    series: Vec<MonthPoint>,
}

pub fn cmd_summary(session: &Session, json: bool) -> Result<String> {
    let today = session.now.date();
    let income = &session.config.income_category;
    let summary = BudgetSummary {
        month: month_totals(&session.snapshot, today),
        monthly_budget: session.snapshot.monthly_budget,
        categories: category_usage(&session.snapshot, income),
        series: monthly_series(&session.snapshot, today, SERIES_MONTHS),
    };

    if json {
        return render_json(&summary);
    }

    let mut out = String::from("\n📊 Budget Summary\n");
    out.push_str(&format!("   Month of {}\n", today.format("%B %Y")));
    out.push_str("   ─────────────────────────────────────────────────────────────\n");
    out.push_str(&format!("   Income:   {:>12}\n", money(summary.month.income)));
    out.push_str(&format!("   Expenses: {:>12}\n", money(summary.month.expenses)));
    out.push_str(&format!("   Balance:  {:>12}\n", money(summary.month.balance())));
    if let Some(top) = top_spending_category(&session.snapshot, income) {
        out.push_str(&format!("   Top category: {} ({})\n", top.name, money(top.amount)));
    }

    if !summary.categories.is_empty() {
        out.push('\n');
        out.push_str(&format!(
            "   {:18} │ {:>10} │ {:>10} │ {:>7}\n",
            "Category", "Used", "Budget", "%"
        ));
        out.push_str("   ───────────────────┼────────────┼────────────┼────────\n");
        for c in &summary.categories {
            let flag = if c.percentage > 100.0 { " ⚠️" } else { "" };
            out.push_str(&format!(
                "   {:18} │ {:>10} │ {:>10} │ {:>6.1}%{}\n",
                truncate(&c.name, 18),
                money(c.used),
                money(c.budget),
                c.percentage,
                flag
            ));
        }
    }

    out.push_str("\n   Last months (income / expenses)\n");
    for p in &summary.series {
        out.push_str(&format!(
            "   {}-{:02}  {:>12} / {:>12}\n",
            p.year,
            p.month,
            money(p.income),
            money(p.expenses)
        ));
    }
    Ok(out)
}

pub fn cmd_gamify(session: &Session, json: bool) -> Result<String> {
    let data = gamification(&session.context());

    if json {
        return render_json(&data);
    }

    let mut out = format!("\n🏆 {} points\n", data.points);
    out.push_str("   ─────────────────────────────\n");

    if data.badges.is_empty() {
        out.push_str("   No badges yet\n");
    }
    for b in &data.badges {
        out.push_str(&format!("   🎖️  {} - {} ({:.0}%)\n", b.name, b.description, b.progress));
    }

    for c in &data.challenges {
        out.push_str(&format!(
            "\n   🎯 {}: {} (target {})\n",
            c.title,
            c.description,
            money(c.target)
        ));
    }

    out.push_str("\n   Tips\n");
    for tip in &data.tips {
        out.push_str(&format!("   • {}\n", tip));
    }
    Ok(out)
}
