use anyhow::Result;
use clap::Args;
use ztrack_core::tracking::TrackerKind;

use crate::summary::print_tracker_catalog;

#[derive(Args)]
pub struct TrackersArgs {
    /// Only list trackers of this group (eye, tail, freeswim)
    #[arg(short, long)]
    pub group: Option<String>,
}

pub fn run(args: &TrackersArgs) -> Result<()> {
    let kinds: Vec<TrackerKind> = match &args.group {
        Some(group) => TrackerKind::in_group(group).collect(),
        None => TrackerKind::ALL.to_vec(),
    };
    if kinds.is_empty() {
        anyhow::bail!("No trackers in group {:?}", args.group.as_deref().unwrap_or(""));
    }

    let trackers = kinds
        .into_iter()
        .map(|kind| Ok((kind, kind.build()?)))
        .collect::<Result<Vec<_>>>()?;
    print_tracker_catalog(&trackers);
    Ok(())
}
