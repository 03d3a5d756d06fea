use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crease_types::{MatchId, PlayerId, TeamId};

#[derive(Parser)]
#[command(
    name = "crease",
    about = "crease: ball-by-ball cricket scoring",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Directory holding saved matches
    #[arg(long, global = true, default_value = ".crease")]
    pub store: PathBuf,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a match from a TOML setup file
    New(NewArgs),
    /// List saved matches
    List,
    /// Start the next innings
    Start(StartArgs),
    /// Record one delivery
    Ball(BallArgs),
    /// Select the bowler for the next over
    Bowler(BowlerArgs),
    /// Swap striker and non-striker
    Swap(MatchArgs),
    /// Remove the last delivery
    Undo(MatchArgs),
    /// Close the current innings
    Close(MatchArgs),
    /// Discard the current innings
    Reset(MatchArgs),
    /// Show the live scoreboard
    Show(MatchArgs),
    /// Print the full scorecard
    Scorecard(MatchArgs),
    /// Show MVP points
    Points(PointsArgs),
    /// List a team's players
    Players(PlayersArgs),
}

#[derive(Args)]
pub struct NewArgs {
    /// Match setup file
    pub setup: PathBuf,
    /// Match id; generated when omitted
    #[arg(long)]
    pub id: Option<MatchId>,
}

#[derive(Args)]
pub struct MatchArgs {
    pub match_id: MatchId,
}

#[derive(Args)]
pub struct StartArgs {
    pub match_id: MatchId,
    #[arg(long)]
    pub striker: PlayerId,
    #[arg(long)]
    pub non_striker: PlayerId,
    #[arg(long)]
    pub bowler: PlayerId,
}

#[derive(Args)]
pub struct BallArgs {
    pub match_id: MatchId,
    /// Ball notation: 0-7, `.`, wd, wd+N, nb, nb+N, nb+bN, nb+lbN, bN, lbN
    pub notation: String,
    /// A wicket fell on this ball
    #[arg(long, value_enum)]
    pub wicket: Option<WicketKind>,
    /// Catcher, wicketkeeper or run-out fielder
    #[arg(long)]
    pub fielder: Option<PlayerId>,
    /// Dismissed batsman; the striker by default
    #[arg(long)]
    pub out: Option<PlayerId>,
    /// Replacement batsman
    #[arg(long)]
    pub incoming: Option<PlayerId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum WicketKind {
    Bowled,
    Caught,
    Lbw,
    Stumped,
    RunOut,
    HitWicket,
    Obstructing,
    RetiredOut,
}

#[derive(Args)]
pub struct BowlerArgs {
    pub match_id: MatchId,
    pub bowler: PlayerId,
}

#[derive(Args)]
pub struct PointsArgs {
    pub match_id: MatchId,
    /// Points table in TOML; the default table when omitted
    #[arg(long)]
    pub table: Option<PathBuf>,
}

#[derive(Args)]
pub struct PlayersArgs {
    pub match_id: MatchId,
    pub team: TeamId,
    /// Only batsmen still available to come in
    #[arg(long)]
    pub available: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_new() {
        let cli = Cli::try_parse_from(["crease", "new", "setup.toml", "--id", "final"]).unwrap();
        if let Command::New(args) = cli.command {
            assert_eq!(args.setup, PathBuf::from("setup.toml"));
            assert_eq!(args.id, Some("final".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_start() {
        let cli = Cli::try_parse_from([
            "crease", "start", "m1", "--striker", "a1", "--non-striker", "a2", "--bowler", "b11",
        ])
        .unwrap();
        if let Command::Start(args) = cli.command {
            assert_eq!(args.non_striker, PlayerId::from("a2"));
            assert_eq!(args.bowler, PlayerId::from("b11"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_ball_with_wicket() {
        let cli = Cli::try_parse_from([
            "crease", "ball", "m1", "1", "--wicket", "run-out", "--fielder", "b3", "--out", "a2",
            "--incoming", "a3",
        ])
        .unwrap();
        if let Command::Ball(args) = cli.command {
            assert_eq!(args.notation, "1");
            assert_eq!(args.wicket, Some(WicketKind::RunOut));
            assert_eq!(args.out, Some("a2".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn padded_ids_are_rejected() {
        assert!(Cli::try_parse_from(["crease", "show", " m1"]).is_err());
        assert!(Cli::try_parse_from([
            "crease", "start", "m1", "--striker", "a1 ", "--non-striker", "a2", "--bowler", "b11",
        ])
        .is_err());
        assert!(Cli::try_parse_from(["crease", "players", "m1", ""]).is_err());
    }

    #[test]
    fn parse_extras_notation() {
        let cli = Cli::try_parse_from(["crease", "ball", "m1", "nb+lb2"]).unwrap();
        if let Command::Ball(args) = cli.command {
            assert_eq!(args.notation, "nb+lb2");
            assert!(args.wicket.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_players_available() {
        let cli = Cli::try_parse_from(["crease", "players", "m1", "thd", "--available"]).unwrap();
        if let Command::Players(args) = cli.command {
            assert!(args.available);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::try_parse_from([
            "crease", "--store", "/tmp/matches", "--format", "json", "-v", "list",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.store, PathBuf::from("/tmp/matches"));
    }

    #[test]
    fn store_defaults_to_dot_crease() {
        let cli = Cli::try_parse_from(["crease", "show", "m1"]).unwrap();
        assert_eq!(cli.store, PathBuf::from(".crease"));
        assert!(matches!(cli.command, Command::Show(_)));
    }
}
