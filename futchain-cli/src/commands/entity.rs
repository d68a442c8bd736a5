//! Single-entity command implementations.

use clap::Args;

use super::{connect, discover_defaults, report, resolve_defaults, Context};
use crate::output;

/// Arguments for the match, league and team commands.
#[derive(Args)]
pub struct EntityArgs {
    /// Numeric id; discovered from live data when omitted
    pub id: Option<u64>,
}

/// Run the unfinished command.
pub async fn unfinished(ctx: &Context) -> i32 {
    let Some((reader, status)) = connect(ctx).await else {
        return super::EXIT_FATAL;
    };

    if !ctx.json {
        output::header("getUnfinishedMatches()");
    }
    let result = reader.read_unfinished_matches().await;
    report(ctx, status, &result, |ids| output::match_ids(ids))
}

/// Run the match command.
pub async fn fixture(ctx: &Context, args: EntityArgs) -> i32 {
    let Some((reader, status)) = connect(ctx).await else {
        return super::EXIT_FATAL;
    };

    let id = match args.id {
        Some(id) => id,
        None => discover_defaults(ctx, &reader).await.match_id,
    };

    if !ctx.json {
        output::header(&format!("getMatch({})", id));
    }
    let result = reader.read_match(id).await;
    report(ctx, status, &result, output::fixture)
}

/// Run the league command.
pub async fn league(ctx: &Context, args: EntityArgs) -> i32 {
    let Some((reader, status)) = connect(ctx).await else {
        return super::EXIT_FATAL;
    };

    let id = match args.id {
        Some(id) => id,
        None => resolve_defaults(ctx, &reader).await.league_id,
    };

    if !ctx.json {
        output::header(&format!("getLeague({})", id));
    }
    let result = reader.read_league(id).await;
    report(ctx, status, &result, output::league)
}

/// Run the team command.
pub async fn team(ctx: &Context, args: EntityArgs) -> i32 {
    let Some((reader, status)) = connect(ctx).await else {
        return super::EXIT_FATAL;
    };

    let id = match args.id {
        Some(id) => id,
        None => resolve_defaults(ctx, &reader).await.team_id,
    };

    if !ctx.json {
        output::header(&format!("getTeam({})", id));
    }
    let result = reader.read_team(id).await;
    report(ctx, status, &result, output::team)
}
