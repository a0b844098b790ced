//! Per-team medal evaluation against precomputed lookup tables.

mod adjust;
mod binary;
mod categorical;
mod engine;
mod league;
mod medal;
mod numeric;
mod template;

pub use adjust::{Adjustment, Adjustments, RivalTeams};
pub use categorical::{team_medal_categorical, CategoryStanding, UNSEEN_CATEGORY_SHARE};
pub use engine::{add_consolation_if_needed, combine_medals, sort_medals, MedalEngine};
pub use league::score_league;
pub use medal::determine_medal;
pub use numeric::{lookup_key, partition_label, percentile_rank, FALLBACK_PERCENTILE};
pub use template::{ordinal, percentage_label, render, thousands, Placeholder, TemplateValues};

pub const NOT_SPECIFIED: &str = "Not Specified";
