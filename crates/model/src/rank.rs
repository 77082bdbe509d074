use crate::{amount::Volume, config::RankDefinition};

/// The rank of members who do not qualify for any configured rank.
pub const STARTER_RANK: &str = "starter";

/// Determine the highest rank the given figures qualify for.
///
/// Ranks are walked from the last (hardest) to the first (easiest), the first
/// one whose requirements are all met is returned. Ranks are not re-sorted, so the
/// result is only the highest rank when `ranks` is ordered by ascending difficulty.
///
/// Returns [`STARTER_RANK`] if no rank is met.
pub fn determine_rank<'a>(
    ranks: &'a [RankDefinition],
    personal_pv: &Volume,
    group_pv: &Volume,
    direct_referrals: u32,
) -> &'a str {
    let rank = ranks
        .iter()
        .rev()
        .find(|rank| rank.is_met_by(personal_pv, group_pv, direct_referrals))
        .map(RankDefinition::name)
        .unwrap_or(STARTER_RANK);
    tracing::trace!(%personal_pv, %group_pv, direct_referrals, rank, "determined rank");
    rank
}
