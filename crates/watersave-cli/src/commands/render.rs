//! Text rendering for action outcomes

use watersave_core::billing::{BASE_RATE, UNIT_PRICE};
use watersave_core::{AdviceKind, BillEstimate, ChartPoint, Outcome};

/// Widest bar in the usage chart, in characters
pub const CHART_WIDTH: usize = 40;

/// Render an outcome for the terminal
pub fn render_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::UsageRecorded {
            date,
            liters,
            replaced: None,
        } => format!("✅ Recorded {:.1} L for {}", liters, date),
        Outcome::UsageRecorded {
            date,
            liters,
            replaced: Some(previous),
        } => format!(
            "✅ Updated {}: {:.1} L (was {:.1} L)",
            date, liters, previous
        ),

        Outcome::BehaviorRecorded {
            date,
            behavior,
            replaced,
        } => {
            let mut line = format!(
                "✅ Recorded behavior for {}: {} min of showers, {} laundry load(s)",
                date, behavior.shower_minutes, behavior.laundry_loads
            );
            if *replaced {
                line.push_str(" (replaced earlier entry)");
            }
            line
        }

        Outcome::Chart { points } => render_chart(points),

        Outcome::GoalSuggested { suggested, current } => {
            let mut out = if *suggested > 0.0 {
                format!(
                    "Suggested daily goal: {:.1} L (90% of your average)\n",
                    suggested
                )
            } else {
                "Suggested daily goal: 0.0 L (no usage recorded yet)\n".to_string()
            };
            match current {
                Some(goal) => out.push_str(&format!(
                    "Current goal: {:.1} L/day\n",
                    goal.liters_per_day
                )),
                None => out.push_str("No goal set yet.\n"),
            }
            out.push_str("Use `goal <liters>` to set one.");
            out
        }

        Outcome::GoalSet { goal } => {
            format!("🎯 Daily goal set to {:.1} L", goal.liters_per_day)
        }

        Outcome::Bill {
            estimate,
            projected_days,
        } => render_bill(estimate, *projected_days),

        Outcome::Advice { kind, text } => {
            let title = match kind {
                AdviceKind::Answer => "💬 Assistant",
                AdviceKind::PatternAnalysis => "📊 Usage pattern analysis",
                AdviceKind::Challenge => "🏆 Your water-saving challenge",
            };
            format!("{}\n\n{}", title, text.trim_end())
        }

        Outcome::InsufficientData { message } => format!("ℹ️  {}", message),
        Outcome::Invalid { message } => format!("⚠️  {}", message),
        Outcome::Failed { message } => format!("❌ {}", message),
    }
}

/// Render usage as one horizontal bar per day, scaled to the largest day
pub fn render_chart(points: &[ChartPoint]) -> String {
    let max = points.iter().map(|p| p.liters).fold(0.0_f64, f64::max);

    let mut out = String::from("Water usage (liters per day)\n");
    for point in points {
        let width = if max > 0.0 {
            ((point.liters / max) * CHART_WIDTH as f64).round() as usize
        } else {
            0
        };
        out.push_str(&format!(
            "{}  {:<bar$}  {:.1}\n",
            point.date,
            "█".repeat(width),
            point.liters,
            bar = CHART_WIDTH
        ));
    }
    out.truncate(out.trim_end().len());
    out
}

/// Render a bill estimate with its breakdown
pub fn render_bill(estimate: &BillEstimate, projected_days: Option<u32>) -> String {
    let mut out = String::new();
    if let Some(days) = projected_days {
        out.push_str(&format!(
            "Projected usage: {:.1} L over {} days at your current average\n",
            estimate.monthly_liters, days
        ));
    }
    out.push_str(&format!(
        "💧 Estimated monthly bill: {}\n   base {} + {} x {} per 1000 L",
        estimate.amount, BASE_RATE, estimate.blocks, UNIT_PRICE
    ));
    out
}
