use crate::models::{MapItem, TeamId, WarMapData, WarVictoryPointSummary};

/// Add one map item to a running tally. Only victory towns count; a scorched
/// town counts as scorched regardless of its owner.
fn tally_item(summary: &mut WarVictoryPointSummary, item: &MapItem) {
    if !item.is_victory_point() {
        return;
    }
    if item.is_scorched() {
        summary.scorched += 1;
        return;
    }
    match item.team_id {
        TeamId::Wardens => summary.warden += 1,
        TeamId::Colonials => summary.colonial += 1,
        TeamId::None | TeamId::Unknown => {}
    }
}

/// Victory-point summary across every map of a war.
///
/// `required` is `required_victory_towns - scorched` and is deliberately not
/// clamped: it goes negative when more towns are scorched than required.
pub fn victory_point_summary<'a, I>(required_victory_towns: i64, maps: I) -> WarVictoryPointSummary
where
    I: IntoIterator<Item = &'a WarMapData>,
{
    let mut summary = WarVictoryPointSummary::default();
    for map in maps {
        for item in &map.map_items {
            tally_item(&mut summary, item);
        }
    }
    summary.required = required_victory_towns - summary.scorched;
    summary
}
