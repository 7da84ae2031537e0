//! Analysis command implementations (classify, patterns, anomalies, forecast,
//! insights, costs)

use anyhow::Result;
use pitstop_core::{
    analyze_patterns, detect_anomalies, detect_lifestyle_creep, merge_insights,
    predict_cash_flow, Insight, InsightEngine, Priority, TransactionClassifier,
};

use super::{money, render_json, truncate, Session};

pub fn cmd_classify(session: &Session, description: &str, amount: f64, json: bool) -> Result<String> {
    let classifier = TransactionClassifier::from_config(&session.config);
    let result = classifier.classify(description, amount, &session.snapshot);

    if json {
        return render_json(&result);
    }

    Ok(format!(
        "🏷️  {} → {} ({:.0}% confidence, {} match)",
        description,
        result.category,
        result.confidence * 100.0,
        result.source.as_str()
    ))
}

pub fn cmd_patterns(session: &Session, json: bool) -> Result<String> {
    let patterns = analyze_patterns(&session.snapshot, &session.config.patterns);

    if json {
        return render_json(&patterns);
    }

    let mut out = String::from("\n📈 Spending Patterns\n");
    if patterns.is_empty() {
        out.push_str("   No categories with spending yet.\n");
        return Ok(out);
    }

    out.push_str(&format!(
        "   {:18} │ {:>9} │ {:>10} │ {:>10} │ {:>7}\n",
        "Category", "Frequency", "Average", "Trend", "Steady"
    ));
    out.push_str("   ───────────────────┼───────────┼────────────┼────────────┼────────\n");
    for p in &patterns {
        out.push_str(&format!(
            "   {:18} │ {:>9} │ {:>10} │ {:>10} │ {:>6.0}%\n",
            truncate(&p.category, 18),
            p.frequency.as_str(),
            money(p.average_amount),
            p.trend.as_str(),
            p.predictability * 100.0
        ));
    }
    Ok(out)
}

pub fn cmd_anomalies(session: &Session, json: bool) -> Result<String> {
    let anomalies = detect_anomalies(&session.snapshot, &session.config.anomalies);

    if json {
        return render_json(&anomalies);
    }

    if anomalies.is_empty() {
        return Ok("✅ No unusual expenses found.".to_string());
    }

    let mut out = format!("\n🚨 {} unusual expense(s)\n", anomalies.len());
    out.push_str("   ─────────────────────────────\n");
    for a in &anomalies {
        out.push_str(&format!(
            "   [{:>2}/10] {} ({})\n          → {}\n",
            a.severity, a.description, a.transaction_id, a.suggested_action
        ));
    }
    Ok(out)
}

pub fn cmd_forecast(session: &Session, json: bool) -> Result<String> {
    let today = session.now.date();
    let forecast = &session.config.forecast;

    let mut predictions = vec![predict_cash_flow(&session.snapshot, today, forecast)];
    if let Some(creep) = detect_lifestyle_creep(&session.snapshot, today, forecast) {
        predictions.push(creep.to_prediction(forecast));
    }

    if json {
        return render_json(&predictions);
    }

    let mut out = String::from("\n🔮 Forecast\n");
    out.push_str("   ─────────────────────────────\n");
    for p in &predictions {
        out.push_str(&format!(
            "   {} ({}, {:.0}% confidence)\n",
            p.prediction,
            p.timeframe,
            p.confidence * 100.0
        ));
        for action in &p.recommended_actions {
            out.push_str(&format!("     • {}\n", action));
        }
    }
    Ok(out)
}

fn priority_icon(priority: Priority) -> &'static str {
    match priority {
        Priority::Critical => "🔴",
        Priority::High => "🟠",
        Priority::Medium => "🟡",
        Priority::Low => "🟢",
    }
}

fn render_insights(title: &str, insights: &[Insight], json: bool) -> Result<String> {
    if json {
        return render_json(insights);
    }

    if insights.is_empty() {
        return Ok("✅ Nothing needs attention right now.".to_string());
    }

    let mut out = format!("\n💡 {}\n", title);
    out.push_str("   ─────────────────────────────\n");
    for i in insights {
        out.push_str(&format!(
            "   {} {} [{} · impact {}]\n      {}\n",
            priority_icon(i.priority),
            i.title,
            i.kind,
            i.impact,
            i.description
        ));
        for action in &i.actions {
            out.push_str(&format!("      • {}\n", action));
        }
    }
    Ok(out)
}

pub fn cmd_insights(session: &Session, with_costs: bool, json: bool) -> Result<String> {
    let ctx = session.context();
    let mut insights = InsightEngine::new().analyze_all(&ctx);
    if with_costs {
        insights = merge_insights(insights, InsightEngine::cost_reduction(&ctx));
    }
    render_insights("Insights", &insights, json)
}

pub fn cmd_costs(session: &Session, json: bool) -> Result<String> {
    let insights = InsightEngine::cost_reduction(&session.context());
    render_insights("Cost reduction candidates", &insights, json)
}
