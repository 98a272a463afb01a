use super::RenderContext;
use crate::format::{render_float, render_month};

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub day: u32,
    pub total: f64,
    pub cumulative: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthChartView {
    pub month_label: String,
    pub points: Vec<ChartPoint>,
    /// Largest cumulative value, the top of the y axis.
    pub max: f64,
    pub total_label: String,
}

pub fn build(ctx: &RenderContext<'_>, daily_totals: &[f64]) -> MonthChartView {
    let mut cumulative = 0.0;
    let points: Vec<ChartPoint> = daily_totals
        .iter()
        .enumerate()
        .map(|(idx, total)| {
            cumulative += total;
            ChartPoint {
                day: idx as u32 + 1,
                total: *total,
                cumulative,
            }
        })
        .collect();

    let max = points
        .iter()
        .map(|point| point.cumulative)
        .fold(0.0_f64, f64::max);

    MonthChartView {
        month_label: render_month(ctx.state.date, ctx.locale),
        points,
        max,
        total_label: render_float(cumulative, ctx.locale),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::colors::ColorRegistry;
    use crate::expense::{DEFAULT_CURRENCY, Ledger};
    use crate::format::Locale;
    use crate::labels::LabelCache;
    use crate::state::{MonthDisplay, ViewState};

    #[test]
    fn running_total_carries_over_empty_days() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).expect("valid date");
        let state = ViewState::new(date, MonthDisplay::Chart);
        let ledger = Ledger::default();
        let colors = ColorRegistry::load();
        let labels = LabelCache::default();
        let ctx = RenderContext {
            state: &state,
            ledger: &ledger,
            colors: &colors,
            labels: &labels,
            locale: Locale::De,
            default_currency: DEFAULT_CURRENCY,
        };

        let view = build(&ctx, &[5.0, 0.0, 0.0, 2.5, 0.0]);

        let cumulative: Vec<f64> = view.points.iter().map(|p| p.cumulative).collect();
        assert_eq!(cumulative, vec![5.0, 5.0, 5.0, 7.5, 7.5]);
        assert_eq!(view.points[3].day, 4);
        assert_eq!(view.points[3].total, 2.5);
        assert_eq!(view.max, 7.5);
        assert_eq!(view.total_label, "7,50");
    }

    #[test]
    fn empty_month_has_a_zero_axis() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 1).expect("valid date");
        let state = ViewState::new(date, MonthDisplay::Chart);
        let ledger = Ledger::default();
        let colors = ColorRegistry::load();
        let labels = LabelCache::default();
        let ctx = RenderContext {
            state: &state,
            ledger: &ledger,
            colors: &colors,
            labels: &labels,
            locale: Locale::De,
            default_currency: DEFAULT_CURRENCY,
        };

        let view = build(&ctx, &[0.0; 28]);
        assert_eq!(view.points.len(), 28);
        assert_eq!(view.max, 0.0);
    }
}
