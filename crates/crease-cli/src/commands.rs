use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use tracing::debug;

use crease_live::{LiveConfig, LiveMatch};
use crease_scoring::wicket::eligible_replacements;
use crease_scoring::{
    BowlerLine, InningsState, MatchState, PointsTable, ScoreboardSnapshot, ScoringAction,
};
use crease_store::{FileMatchStore, MatchRepository, MatchRoster, RosterProvider};
use crease_types::{Delivery, DismissalKind, MatchId, PlayerId, TeamId, Wicket};

use crate::cli::*;
use crate::setup::MatchSetup;

type Repo = Arc<dyn MatchRepository>;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    let repo: Repo = Arc::new(FileMatchStore::open(&cli.store).await?);
    match cli.command {
        Command::New(args) => cmd_new(repo, args, format).await,
        Command::List => cmd_list(repo).await,
        Command::Start(args) => {
            let action = ScoringAction::StartInnings {
                striker: args.striker,
                non_striker: args.non_striker,
                bowler: args.bowler,
            };
            score(repo, &args.match_id, action, format).await
        }
        Command::Ball(args) => {
            let delivery = delivery_from(&args)?;
            score(repo, &args.match_id, ScoringAction::Deliver(delivery), format).await
        }
        Command::Bowler(args) => {
            let action = ScoringAction::SelectBowler { bowler: args.bowler };
            score(repo, &args.match_id, action, format).await
        }
        Command::Swap(args) => score(repo, &args.match_id, ScoringAction::SwapStrike, format).await,
        Command::Undo(args) => score(repo, &args.match_id, ScoringAction::Undo, format).await,
        Command::Close(args) => score(repo, &args.match_id, ScoringAction::CloseInnings, format).await,
        Command::Reset(args) => score(repo, &args.match_id, ScoringAction::ResetInnings, format).await,
        Command::Show(args) => {
            let state = load(&repo, &args.match_id).await?;
            print_snapshot(&state.snapshot(), format)
        }
        Command::Scorecard(args) => cmd_scorecard(repo, args, format).await,
        Command::Points(args) => cmd_points(repo, args, format).await,
        Command::Players(args) => cmd_players(repo, args).await,
    }
}

async fn load(repo: &Repo, id: &MatchId) -> anyhow::Result<MatchState> {
    repo.load(id)
        .await?
        .with_context(|| format!("no match with id {id}"))
}

async fn cmd_new(repo: Repo, args: NewArgs, format: OutputFormat) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.setup)
        .with_context(|| format!("reading {}", args.setup.display()))?;
    let setup = MatchSetup::parse(&text)?;
    let id = match args.id {
        Some(id) => id,
        None => MatchId::generate(),
    };
    let state = MatchState::new(id, setup.info.clone(), setup.rules(), setup.teams()?)?;
    let live = LiveMatch::create(state, repo, LiveConfig::default()).await?;
    let state = live.state();

    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(state)?);
        return Ok(());
    }
    println!("{} Created match {}", "✓".green().bold(), state.id.as_str().yellow().bold());
    println!(
        "  {} v {} ({}, {})",
        state.teams[0].name.bold(),
        state.teams[1].name.bold(),
        state.info.format,
        state.info.venue
    );
    match state.rules.overs_limit {
        Some(overs) => println!("  {overs} overs, {} innings per side", state.rules.innings_per_side),
        None => println!("  No overs limit, {} innings per side", state.rules.innings_per_side),
    }
    Ok(())
}

async fn cmd_list(repo: Repo) -> anyhow::Result<()> {
    let ids = repo.list().await?;
    if ids.is_empty() {
        println!("No matches.");
        return Ok(());
    }
    for id in ids {
        let Some(state) = repo.load(&id).await? else { continue };
        let summary = state
            .result_text()
            .unwrap_or_else(|| state.status.to_string());
        println!(
            "{}  {} v {}  {}",
            id.as_str().yellow(),
            state.teams[0].short_name,
            state.teams[1].short_name,
            summary.dimmed()
        );
    }
    Ok(())
}

/// Apply one action through a live session and report the scoreboard.
async fn score(
    repo: Repo,
    id: &MatchId,
    action: ScoringAction,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut live = LiveMatch::open(id, repo, LiveConfig::default()).await?;
    debug!(match_id = %id, ?action, "Scoring");
    let outcome = live.act(action)?;
    live.flush().await?;

    let snapshot = live.snapshot();
    print_snapshot(&snapshot, format)?;
    if let OutputFormat::Json = format {
        return Ok(());
    }
    if outcome.innings_completed {
        println!("{} Innings {} complete", "✓".green().bold(), snapshot.innings_number);
    }
    if outcome.match_completed {
        if let Some(result) = &snapshot.result {
            println!("{} {}", "✓".green().bold(), result.bold());
        }
    } else if snapshot.awaiting_bowler {
        println!("  {}", "Over complete; select the next bowler.".cyan());
    }
    Ok(())
}

fn delivery_from(args: &BallArgs) -> anyhow::Result<Delivery> {
    let delivery: Delivery = args.notation.parse()?;
    let Some(kind) = args.wicket else {
        return Ok(delivery);
    };
    let mut wicket = Wicket::new(dismissal(kind, args.fielder.clone())?);
    if let Some(out) = &args.out {
        wicket = wicket.of(out.clone());
    }
    if let Some(incoming) = &args.incoming {
        wicket = wicket.replaced_by(incoming.clone());
    }
    Ok(delivery.with_wicket(wicket))
}

fn dismissal(kind: WicketKind, fielder: Option<PlayerId>) -> anyhow::Result<DismissalKind> {
    Ok(match kind {
        WicketKind::Bowled => DismissalKind::Bowled,
        WicketKind::Caught => DismissalKind::Caught {
            fielder: fielder.context("a catch needs --fielder")?,
        },
        WicketKind::Lbw => DismissalKind::Lbw,
        WicketKind::Stumped => DismissalKind::Stumped {
            keeper: fielder.context("a stumping needs --fielder (the wicketkeeper)")?,
        },
        WicketKind::RunOut => DismissalKind::RunOut { fielder },
        WicketKind::HitWicket => DismissalKind::HitWicket,
        WicketKind::Obstructing => DismissalKind::ObstructingField,
        WicketKind::RetiredOut => DismissalKind::RetiredOut,
    })
}

fn print_snapshot(s: &ScoreboardSnapshot, format: OutputFormat) -> anyhow::Result<()> {
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(s)?);
        return Ok(());
    }
    let Some(team) = &s.batting_team else {
        println!("Match {} has not started.", s.match_id.as_str().yellow());
        return Ok(());
    };
    println!(
        "{}  {}  ({})  RR {:.2}",
        team.bold(),
        format!("{}/{}", s.runs, s.wickets).green().bold(),
        s.overs,
        s.run_rate
    );
    if let Some(target) = s.target {
        let need = target.saturating_sub(s.runs);
        match s.required_run_rate {
            Some(rrr) => println!("  Target {target}, need {need} at {rrr:.2}"),
            None => println!("  Target {target}, need {need}"),
        }
    }
    for batter in [&s.striker, &s.non_striker].into_iter().flatten() {
        let marker = if batter.on_strike { "*" } else { " " };
        println!(
            "  {marker} {:<20} {:>3} ({})  4s {}  6s {}  SR {:.1}",
            batter.name, batter.runs, batter.balls, batter.fours, batter.sixes, batter.strike_rate
        );
    }
    if let Some(bowler) = &s.bowler {
        println!("    {}", bowler_figures(bowler));
    }
    if !s.timeline.is_empty() {
        let recent: Vec<&str> = s.timeline.iter().map(|t| t.token.as_str()).collect();
        println!("  Recent: {}", recent.join(" ").dimmed());
    }
    if let Some(result) = &s.result {
        println!("  {}", result.bold());
    }
    Ok(())
}

fn bowler_figures(b: &BowlerLine) -> String {
    format!(
        "{:<20} {}-{}-{}-{}  Econ {:.1}",
        b.name, b.overs, b.maidens, b.runs, b.wickets, b.economy
    )
}

async fn cmd_scorecard(repo: Repo, args: MatchArgs, format: OutputFormat) -> anyhow::Result<()> {
    let state = load(&repo, &args.match_id).await?;
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(&state.innings)?);
        return Ok(());
    }
    if state.innings.is_empty() {
        println!("No innings played.");
    }
    for innings in &state.innings {
        print_innings(&state, innings);
        println!();
    }
    if let Some(result) = state.result_text() {
        println!("{}", result.bold());
    }
    Ok(())
}

fn print_innings(state: &MatchState, innings: &InningsState) {
    let bpo = state.rules.balls_per_over;
    let batting_name = team_name(state, &innings.batting_team);
    println!("{} innings ({})", batting_name.bold(), innings.status);
    for b in &innings.batting {
        println!(
            "  {:<20} {:<30} {:>3} ({})",
            b.player_name,
            b.dismissal_text().dimmed(),
            b.runs,
            b.balls
        );
    }
    let x = innings.extras;
    println!(
        "  {:<20} {:<30} {:>3}",
        "Extras",
        format!("(wd {}, nb {}, b {}, lb {})", x.wides, x.no_balls, x.byes, x.leg_byes),
        x.total()
    );
    println!(
        "  {:<20} {:<30} {:>3}",
        "Total".bold(),
        format!("({} wkts, {} ov)", innings.total_wickets, innings.counter),
        innings.total_runs.to_string().bold()
    );
    if let Some(team) = state.team(&innings.batting_team) {
        let dnb: Vec<String> = innings
            .did_not_bat(team)
            .into_iter()
            .map(|id| team.player_name(id))
            .collect();
        if !dnb.is_empty() {
            println!("  Did not bat: {}", dnb.join(", "));
        }
    }
    println!("  {:<20} {:>5} {:>3} {:>4} {:>3} {:>6}", "Bowling", "O", "M", "R", "W", "Econ");
    for b in &innings.bowling {
        println!(
            "  {:<20} {:>5} {:>3} {:>4} {:>3} {:>6.1}",
            b.player_name,
            b.overs(bpo).to_string(),
            b.maidens,
            b.runs,
            b.wickets,
            b.economy(bpo)
        );
    }
}

fn team_name(state: &MatchState, id: &TeamId) -> String {
    state
        .team(id)
        .map_or_else(|| id.to_string(), |t| t.name.clone())
}

fn player_name(state: &MatchState, id: &PlayerId) -> String {
    state
        .teams
        .iter()
        .find(|t| t.contains(id))
        .map_or_else(|| id.to_string(), |t| t.player_name(id))
}

async fn cmd_points(repo: Repo, args: PointsArgs, format: OutputFormat) -> anyhow::Result<()> {
    let state = load(&repo, &args.match_id).await?;
    let table = match &args.table {
        Some(path) => load_points_table(path)?,
        None => PointsTable::default(),
    };
    let points = table.match_points(&state);
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(&points)?);
        return Ok(());
    }
    if points.is_empty() {
        println!("No points yet.");
    }
    for (rank, p) in points.iter().enumerate() {
        println!(
            "{:>2}. {:<20} {:>4}  (bat {}, bowl {}, field {})",
            rank + 1,
            player_name(&state, &p.player_id),
            p.total().to_string().bold(),
            p.batting,
            p.bowling,
            p.fielding
        );
    }
    Ok(())
}

fn load_points_table(path: &Path) -> anyhow::Result<PointsTable> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("invalid points table {}", path.display()))
}

async fn cmd_players(repo: Repo, args: PlayersArgs) -> anyhow::Result<()> {
    let state = load(&repo, &args.match_id).await?;
    let team_id = args.team;
    let players = MatchRoster::from_state(&state)
        .eligible_players(&team_id)
        .await?;

    let available: Option<Vec<&PlayerId>> = match (args.available, state.current_innings()) {
        (true, Some(innings)) if innings.batting_team == team_id => {
            let team = state.team(&team_id).context("batting team missing from match")?;
            Some(eligible_replacements(innings, team))
        }
        _ => None,
    };
    for player in &players {
        if let Some(ids) = &available {
            if !ids.contains(&&player.id) {
                continue;
            }
        }
        println!("  {:<8} {:<20} {}", player.id.as_str().yellow(), player.name, player.role.to_string().dimmed());
    }
    Ok(())
}
