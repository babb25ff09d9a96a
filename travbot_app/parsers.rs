//! Text parsing for what the game prints on its pages.

use regex::Regex;
use std::sync::LazyLock;

use travbot_game::models::buildings::SiteLabel;
use travbot_types::{buildings::BuildingName, common::ResourceGroup};

static SITE_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[?&]id=(\d+)").unwrap());
static UNBUILT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^build an? (?P<name>.+)$").unwrap());
static BUILT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<name>\D+?)\s+(?:level\s+)?(?P<level>\d+)$").unwrap()
});
static TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+):([0-5]\d):([0-5]\d)$").unwrap());

/// Site id from a marker link, e.g. `build.php?id=26`.
pub fn parse_site_id(href: &str) -> Option<u8> {
    SITE_ID
        .captures(href)
        .and_then(|caps| caps[1].parse::<u8>().ok())
}

/// Marker label: `"Empty place"`, `"Build a Rally Point"` or `"Cranny level 4"`.
pub fn parse_site_label(label: &str) -> Option<SiteLabel> {
    let label = label.trim();

    if label.eq_ignore_ascii_case("empty place") {
        return Some(SiteLabel::EmptyPlace);
    }

    if let Some(caps) = UNBUILT.captures(label) {
        return BuildingName::from_display_name(&caps["name"]).map(SiteLabel::Unbuilt);
    }

    let caps = BUILT.captures(label)?;
    let name = BuildingName::from_display_name(&caps["name"])?;
    let level = caps["level"].parse::<u8>().ok()?;

    Some(SiteLabel::Built { name, level })
}

/// Seconds from a `hh:mm:ss` time. Hours may exceed 24.
pub fn parse_time(text: &str) -> Option<u32> {
    let caps = TIME.captures(text.trim())?;
    let hours = caps[1].parse::<u32>().ok()?;
    let minutes = caps[2].parse::<u32>().ok()?;
    let seconds = caps[3].parse::<u32>().ok()?;

    hours.checked_mul(3600)?.checked_add(minutes * 60 + seconds)
}

/// A countdown as printed by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub secs: u32,
    /// The timer ran past zero and the page shows a trailing `?` until reloaded.
    pub jammed: bool,
}

pub fn parse_countdown(text: &str) -> Option<Countdown> {
    let text = text.trim();
    let (text, jammed) = match text.strip_suffix('?') {
        Some(stripped) => (stripped, true),
        None => (text, false),
    };

    parse_time(text).map(|secs| Countdown { secs, jammed })
}

/// Contract cost line as read from the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractCost {
    pub resources: Option<ResourceGroup>,
    pub upkeep: Option<u32>,
    pub duration_secs: u32,
}

/// Parses `lumber|clay|iron|crop|upkeep|hh:mm:ss`. Only the trailing duration
/// is mandatory, the amounts are kept when all of them are readable.
pub fn parse_contract_cost(text: &str) -> Option<ContractCost> {
    let fields: Vec<&str> = text.split('|').map(str::trim).collect();
    let (duration, amounts) = fields.split_last()?;
    let duration_secs = parse_countdown(duration)?.secs;

    let numbers: Option<Vec<u32>> = amounts
        .iter()
        .map(|field| field.replace([',', '.'], "").parse::<u32>().ok())
        .collect();

    let (resources, upkeep) = match numbers.as_deref() {
        Some([lumber, clay, iron, crop, upkeep]) => (
            Some(ResourceGroup::new(*lumber, *clay, *iron, *crop)),
            Some(*upkeep),
        ),
        Some([lumber, clay, iron, crop]) => {
            (Some(ResourceGroup::new(*lumber, *clay, *iron, *crop)), None)
        }
        _ => (None, None),
    };

    Some(ContractCost {
        resources,
        upkeep,
        duration_secs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_site_id() {
        assert_eq!(parse_site_id("build.php?id=26"), Some(26));
        assert_eq!(parse_site_id("/build.php?category=2&id=39"), Some(39));
        assert_eq!(parse_site_id("dorf2.php"), None);
        assert_eq!(parse_site_id("build.php?id=abc"), None);
    }

    #[test]
    fn test_parse_site_label() {
        assert_eq!(parse_site_label("Empty place"), Some(SiteLabel::EmptyPlace));
        assert_eq!(
            parse_site_label("Build a Rally Point"),
            Some(SiteLabel::Unbuilt(BuildingName::RallyPoint))
        );
        assert_eq!(
            parse_site_label("Build an Earth Wall"),
            Some(SiteLabel::Unbuilt(BuildingName::EarthWall))
        );
        assert_eq!(
            parse_site_label(" Main Building level 12 "),
            Some(SiteLabel::Built {
                name: BuildingName::MainBuilding,
                level: 12
            })
        );
        assert_eq!(
            parse_site_label("Stonemason's Lodge 3"),
            Some(SiteLabel::Built {
                name: BuildingName::StonemasonsLodge,
                level: 3
            })
        );
    }

    #[test]
    fn test_parse_site_label_rejects_garbage() {
        assert_eq!(parse_site_label("Cranny level ?"), None);
        assert_eq!(parse_site_label("Moat level 2"), None);
        assert_eq!(parse_site_label("Build a Moat"), None);
        assert_eq!(parse_site_label(""), None);
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("01:02:03"), Some(3723));
        assert_eq!(parse_time("0:00:45"), Some(45));
        assert_eq!(parse_time("36:00:00"), Some(129_600));
        assert_eq!(parse_time("01:62:03"), None);
        assert_eq!(parse_time("1:2:3"), None);
        assert_eq!(parse_time("soon"), None);
    }

    #[test]
    fn test_parse_time_rejects_overflowing_hours() {
        assert_eq!(parse_time("1193046:28:15"), Some(u32::MAX));
        assert_eq!(parse_time("1193046:28:16"), None);
        assert_eq!(parse_time("9999999:00:00"), None);
        assert_eq!(parse_time("99999999999:00:00"), None);
        assert_eq!(parse_countdown("2000000:00:00?"), None);
        assert_eq!(parse_contract_cost("80|70|60|30|1|9999999:00:00"), None);
    }

    #[test]
    fn test_parse_countdown_detects_jammed_timer() {
        assert_eq!(
            parse_countdown("00:00:12"),
            Some(Countdown {
                secs: 12,
                jammed: false
            })
        );
        assert_eq!(
            parse_countdown("00:00:00?"),
            Some(Countdown {
                secs: 0,
                jammed: true
            })
        );
        assert_eq!(parse_countdown("?"), None);
    }

    #[test]
    fn test_parse_contract_cost() {
        let cost = parse_contract_cost("70 | 90 | 70 | 20 | 2 | 0:33:20").unwrap();
        assert_eq!(cost.resources, Some(ResourceGroup::new(70, 90, 70, 20)));
        assert_eq!(cost.upkeep, Some(2));
        assert_eq!(cost.duration_secs, 2000);

        let cost = parse_contract_cost("1,040|910|780|390|1|01:00:00").unwrap();
        assert_eq!(cost.resources, Some(ResourceGroup::new(1040, 910, 780, 390)));

        let cost = parse_contract_cost("n/a|00:10:00").unwrap();
        assert_eq!(cost.resources, None);
        assert_eq!(cost.duration_secs, 600);

        assert_eq!(parse_contract_cost("70|90|70|20|2"), None);
    }
}
