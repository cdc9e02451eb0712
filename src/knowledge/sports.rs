//! 体育知识库
//!
//! 覆盖足球（重点）与篮球的球队、球员、联赛事实，另提供体育话题
//! 的关键词分类。查询按精确或包含匹配，不做模糊排序。

use once_cell::sync::Lazy;

/// 球队事实
#[derive(Debug, Clone)]
pub struct TeamFacts {
    pub name: &'static str,
    pub full_name: &'static str,
    pub stadium: &'static str,
    pub city: &'static str,
    pub legendary_players: &'static [&'static str],
    pub current_stars: &'static [&'static str],
    pub achievements: &'static str,
    pub playing_style: &'static str,
}

/// 球员事实
#[derive(Debug, Clone)]
pub struct PlayerFacts {
    pub name: &'static str,
    pub full_name: &'static str,
    pub nationality: &'static str,
    pub position: &'static str,
    pub current_club: &'static str,
    pub achievements: &'static [&'static str],
    pub playing_style: &'static str,
}

/// 联赛事实
#[derive(Debug, Clone)]
pub struct LeagueFacts {
    pub name: &'static str,
    pub region: &'static str,
    pub teams: &'static [&'static str],
    pub description: &'static str,
}

static TEAMS: Lazy<Vec<TeamFacts>> = Lazy::new(|| {
    vec![
        TeamFacts {
            name: "Real Madrid",
            full_name: "Real Madrid CF",
            stadium: "Santiago Bernabéu",
            city: "Madrid",
            legendary_players: &["Cristiano Ronaldo", "Zinedine Zidane", "Alfredo Di Stéfano", "Raúl"],
            current_stars: &["Jude Bellingham", "Vinícius Júnior", "Rodrygo"],
            achievements: "14-time Champions League winners",
            playing_style: "possession-based attacking football",
        },
        TeamFacts {
            name: "Barcelona",
            full_name: "FC Barcelona",
            stadium: "Camp Nou",
            city: "Barcelona",
            legendary_players: &["Lionel Messi", "Xavi", "Andrés Iniesta", "Ronaldinho"],
            current_stars: &["Robert Lewandowski", "Pedri", "Gavi"],
            achievements: "multiple Champions League and La Liga titles",
            playing_style: "tiki-taka possession football",
        },
        TeamFacts {
            name: "Manchester City",
            full_name: "Manchester City FC",
            stadium: "Etihad Stadium",
            city: "Manchester",
            legendary_players: &["Sergio Agüero", "David Silva", "Yaya Touré"],
            current_stars: &["Erling Haaland", "Kevin De Bruyne", "Phil Foden"],
            achievements: "recent Premier League dominance and a Champions League title",
            playing_style: "high-pressing, possession-based football",
        },
        TeamFacts {
            name: "Liverpool",
            full_name: "Liverpool FC",
            stadium: "Anfield",
            city: "Liverpool",
            legendary_players: &["Steven Gerrard", "Kenny Dalglish", "Ian Rush"],
            current_stars: &["Mohamed Salah", "Virgil van Dijk"],
            achievements: "six European Cups and a long domestic history",
            playing_style: "high-intensity gegenpressing",
        },
    ]
});

static PLAYERS: Lazy<Vec<PlayerFacts>> = Lazy::new(|| {
    vec![
        PlayerFacts {
            name: "Messi",
            full_name: "Lionel Andrés Messi",
            nationality: "Argentinian",
            position: "forward",
            current_club: "Inter Miami",
            achievements: &["8 Ballon d'Or awards", "World Cup winner", "Champions League winner"],
            playing_style: "dribbling, vision and playmaking",
        },
        PlayerFacts {
            name: "Ronaldo",
            full_name: "Cristiano Ronaldo dos Santos Aveiro",
            nationality: "Portuguese",
            position: "forward",
            current_club: "Al Nassr",
            achievements: &["5 Ballon d'Or awards", "Champions League winner with multiple clubs", "Euro 2016 winner"],
            playing_style: "athleticism, goal scoring and leadership",
        },
        PlayerFacts {
            name: "Haaland",
            full_name: "Erling Braut Haaland",
            nationality: "Norwegian",
            position: "striker",
            current_club: "Manchester City",
            achievements: &["Premier League Golden Boot", "Champions League winner"],
            playing_style: "physical presence and clinical finishing",
        },
        PlayerFacts {
            name: "Curry",
            full_name: "Stephen Curry",
            nationality: "American",
            position: "point guard",
            current_club: "Golden State Warriors",
            achievements: &["4 NBA championships", "2-time MVP"],
            playing_style: "long-range shooting and off-ball movement",
        },
    ]
});

static LEAGUES: Lazy<Vec<LeagueFacts>> = Lazy::new(|| {
    vec![
        LeagueFacts {
            name: "Premier League",
            region: "England",
            teams: &["Manchester City", "Arsenal", "Liverpool", "Chelsea", "Manchester United"],
            description: "the most competitive and popular football league in the world",
        },
        LeagueFacts {
            name: "La Liga",
            region: "Spain",
            teams: &["Real Madrid", "Barcelona", "Atletico Madrid", "Sevilla"],
            description: "home to technical football and legendary clubs",
        },
        LeagueFacts {
            name: "Champions League",
            region: "Europe",
            teams: &["Real Madrid", "Bayern Munich", "Liverpool", "AC Milan"],
            description: "the most prestigious club competition in world football",
        },
        LeagueFacts {
            name: "NBA",
            region: "North America",
            teams: &["Lakers", "Warriors", "Celtics", "Heat"],
            description: "the premier professional basketball league",
        },
    ]
});

/// 体育话题
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SportsTopic {
    MatchAnalysis,
    PlayerPerformance,
    TransferNews,
    Tactics,
    LeagueStandings,
    Tournaments,
    Historical,
    Predictions,
}

impl SportsTopic {
    pub fn as_str(&self) -> &'static str {
        match self {
            SportsTopic::MatchAnalysis => "match_analysis",
            SportsTopic::PlayerPerformance => "player_performance",
            SportsTopic::TransferNews => "transfer_news",
            SportsTopic::Tactics => "tactics",
            SportsTopic::LeagueStandings => "league_standings",
            SportsTopic::Tournaments => "tournaments",
            SportsTopic::Historical => "historical",
            SportsTopic::Predictions => "predictions",
        }
    }
}

/// 话题关键词表，按声明顺序评估
static TOPIC_KEYWORDS: &[(SportsTopic, &[&str])] = &[
    (SportsTopic::TransferNews, &["transfer", "signing", "deal", "contract", "rumor"]),
    (SportsTopic::Tactics, &["tactic", "formation", "strategy", "style", "system"]),
    (SportsTopic::LeagueStandings, &["table", "standing", "position", "points", "rank"]),
    (SportsTopic::Tournaments, &["tournament", "cup", "championship", "trophy", "final"]),
    (SportsTopic::Historical, &["history", "legend", "record", "achievement", "memorable"]),
    (SportsTopic::Predictions, &["predict", "future", "chance", "expect", "forecast"]),
    (SportsTopic::PlayerPerformance, &["player", "goal", "assist", "form", "stats"]),
    (SportsTopic::MatchAnalysis, &["match", "game", "score", "result", "performance"]),
];

/// 体育知识查询接口
pub trait SportsLookup: Send + Sync {
    /// 按名称查球队（不区分大小写，允许包含匹配）
    fn team(&self, name: &str) -> Option<&TeamFacts>;

    /// 按名称查球员
    fn player(&self, name: &str) -> Option<&PlayerFacts>;

    /// 按名称查联赛
    fn league(&self, name: &str) -> Option<&LeagueFacts>;

    /// 从原文推断体育话题，无关键词时退回比赛分析
    fn classify_topic(&self, text: &str) -> SportsTopic;
}

/// 编译期固化的体育知识库
#[derive(Debug, Default)]
pub struct StaticSportsKb;

fn name_matches(candidate: &str, query: &str) -> bool {
    let candidate = candidate.to_lowercase();
    let query = query.trim().to_lowercase();
    !query.is_empty() && (candidate == query || candidate.contains(&query) || query.contains(&candidate))
}

impl SportsLookup for StaticSportsKb {
    fn team(&self, name: &str) -> Option<&TeamFacts> {
        TEAMS.iter().find(|t| name_matches(t.name, name))
    }

    fn player(&self, name: &str) -> Option<&PlayerFacts> {
        PLAYERS
            .iter()
            .find(|p| name_matches(p.name, name) || name_matches(p.full_name, name))
    }

    fn league(&self, name: &str) -> Option<&LeagueFacts> {
        LEAGUES.iter().find(|l| name_matches(l.name, name))
    }

    fn classify_topic(&self, text: &str) -> SportsTopic {
        let lowered = text.to_lowercase();
        for (topic, keywords) in TOPIC_KEYWORDS {
            if keywords.iter().any(|k| lowered.contains(k)) {
                return *topic;
            }
        }
        SportsTopic::MatchAnalysis
    }
}

/// 创建体育知识库
pub fn create_sports_kb() -> Box<dyn SportsLookup> {
    Box::new(StaticSportsKb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_lookup_case_insensitive() {
        let kb = StaticSportsKb;
        let team = kb.team("real madrid").expect("team should exist");
        assert_eq!(team.stadium, "Santiago Bernabéu");
        assert!(kb.team("REAL MADRID").is_some());
        assert!(kb.team("Sporting Gijón").is_none());
    }

    #[test]
    fn test_player_lookup_by_full_name() {
        let kb = StaticSportsKb;
        assert!(kb.player("messi").is_some());
        let player = kb.player("Lionel Andrés Messi").expect("player should exist");
        assert_eq!(player.nationality, "Argentinian");
    }

    #[test]
    fn test_league_lookup() {
        let kb = StaticSportsKb;
        let league = kb.league("premier league").expect("league should exist");
        assert_eq!(league.region, "England");
    }

    #[test]
    fn test_topic_classification() {
        let kb = StaticSportsKb;
        assert_eq!(kb.classify_topic("any transfer rumor today?"), SportsTopic::TransferNews);
        assert_eq!(kb.classify_topic("best formation for pressing"), SportsTopic::Tactics);
        assert_eq!(kb.classify_topic("who wins the cup final"), SportsTopic::Tournaments);
        // 无关键词时退回比赛分析
        assert_eq!(kb.classify_topic("hello"), SportsTopic::MatchAnalysis);
    }

    #[test]
    fn test_empty_query_never_matches() {
        let kb = StaticSportsKb;
        assert!(kb.team("").is_none());
        assert!(kb.player("   ").is_none());
    }
}
