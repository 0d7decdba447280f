use super::sink::RenderSink;
use crate::analysis::aggregator::HubMetrics;
use crate::analysis::rank::RankInfo;
use crate::config::DisplayTargets;
use log::trace;

/// Write the metrics, and the rank display when `rank` is present, to `sink`.
pub fn render<R: RenderSink + ?Sized>(
    sink: &mut R,
    targets: &DisplayTargets,
    metrics: &HubMetrics,
    rank: Option<&RankInfo>,
) {
    write_text(sink, &targets.win_rate, &metrics.win_rate.to_string());
    write_text(sink, &targets.total, &metrics.total.to_string());
    write_text(sink, &targets.kda, &metrics.kda);
    write_text(sink, &targets.avg_kills, &metrics.avg_kills);
    write_text(sink, &targets.mvp, &metrics.mvp_pct.to_string());

    let Some(rank) = rank else {
        return;
    };

    write_text(sink, &targets.rank_name, &rank.tier_name);
    write_text(sink, &targets.current_rp, &rank.rp_display());
    write_text(sink, &targets.next_rp, &rank.next_threshold.to_string());

    if !sink.set_width(&targets.progress_fill, &rank.progress_width()) {
        trace!("No width target {}, skipping", targets.progress_fill);
    }

    sink.set_attribute(&targets.theme_attribute, &rank.rank_id);
}

fn write_text<R: RenderSink + ?Sized>(sink: &mut R, id: &str, value: &str) {
    if !sink.set_text(id, value) {
        trace!("No text target {}, skipping", id);
    }
}
